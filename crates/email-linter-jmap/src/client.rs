//! JMAP client and HTTP transport.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::model::{Email, Mailbox};
use crate::query::{DataType, QueryEnvelope, QueryOptions, build_batch, read_batch};
use crate::request::{Filter, Property};
use crate::session::Session;

/// Sends serialized JMAP requests and returns raw response bodies.
///
/// Authentication and deadlines are the transport's business; the client
/// only sees bodies.
pub trait Transport {
    /// Sends one API request.
    fn send(&self, body: String) -> impl Future<Output = Result<String>> + Send;
}

/// Bearer-token HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Client,
    api_url: Url,
    token: String,
}

impl HttpTransport {
    /// Creates a transport posting to `api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(api_url: &str, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http_client: Client::new(),
            api_url: Url::parse(api_url)?,
            token: token.into(),
        })
    }

    /// Fetches the session resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    pub async fn fetch_session(session_url: &str, token: &str) -> Result<Session> {
        let session_url = Url::parse(session_url)?;
        let response = Client::new()
            .get(session_url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }
        Session::parse(&response.text().await?)
    }
}

impl Transport for HttpTransport {
    async fn send(&self, body: String) -> Result<String> {
        let response = self
            .http_client
            .post(self.api_url.clone())
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }
        Ok(response.text().await?)
    }
}

/// Establishes a session and returns a client bound to the primary mail account.
///
/// # Errors
///
/// Returns an error if the session cannot be fetched or has no mail account.
pub async fn connect(session_url: &str, token: &str) -> Result<JmapClient<HttpTransport>> {
    let session = HttpTransport::fetch_session(session_url, token).await?;
    let account_id = session.mail_account_id()?;
    debug!("account ID: {account_id}");

    let transport = HttpTransport::new(&session.api_url, token)?;
    Ok(JmapClient::new(transport, account_id))
}

/// JMAP client scoped to one account.
#[derive(Debug, Clone)]
pub struct JmapClient<T> {
    transport: T,
    account_id: String,
}

impl<T: Transport> JmapClient<T> {
    /// Creates a client over an existing transport.
    #[must_use]
    pub fn new(transport: T, account_id: impl Into<String>) -> Self {
        Self {
            transport,
            account_id: account_id.into(),
        }
    }

    /// Account the client queries.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs one query+get batch and returns the fetched records with the
    /// store-wide match count.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails, the body is not a JMAP
    /// response, or either method reports an error.
    pub async fn execute<R: DeserializeOwned>(
        &self,
        data_type: DataType,
        filter: &Filter,
        properties: &[Property],
        options: &QueryOptions,
    ) -> Result<QueryEnvelope<R>> {
        let request = build_batch(&self.account_id, data_type, filter, properties, options)?;
        let body = self.transport.send(serde_json::to_string(&request)?).await?;
        let envelope = read_batch(&body, data_type)?;
        debug!(
            "{} returned {} of {} matches",
            data_type.get_method(),
            envelope.retrieved(),
            envelope.total
        );
        Ok(envelope)
    }

    /// Queries emails and fetches the given properties.
    ///
    /// # Errors
    ///
    /// See [`JmapClient::execute`].
    pub async fn query_emails(
        &self,
        filter: &Filter,
        properties: &[Property],
        options: &QueryOptions,
    ) -> Result<QueryEnvelope<Email>> {
        self.execute(DataType::Email, filter, properties, options)
            .await
    }

    /// Queries mailboxes and fetches their id, role and name.
    ///
    /// # Errors
    ///
    /// See [`JmapClient::execute`].
    pub async fn query_mailboxes(&self, filter: &Filter) -> Result<Vec<Mailbox>> {
        let envelope = self
            .execute(
                DataType::Mailbox,
                filter,
                &[Property::Id, Property::Role, Property::Name],
                &QueryOptions::mailboxes(),
            )
            .await?;
        Ok(envelope.records)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CannedTransport {
        body: String,
        sent: Mutex<Vec<String>>,
    }

    impl Transport for CannedTransport {
        async fn send(&self, body: String) -> Result<String> {
            self.sent.lock().unwrap().push(body);
            Ok(self.body.clone())
        }
    }

    fn client(body: &str) -> JmapClient<CannedTransport> {
        JmapClient::new(
            CannedTransport {
                body: body.to_string(),
                sent: Mutex::new(Vec::new()),
            },
            "acc",
        )
    }

    #[test]
    fn test_query_emails_sends_one_request() {
        let client = client(
            r#"{"methodResponses": [
                ["Email/query", {"ids": ["e1"], "total": 3}, "0"],
                ["Email/get", {"list": [{"to": [{"email": "X@Duck.com"}]}]}, "1"]
            ]}"#,
        );
        let envelope = tokio_test::block_on(client.query_emails(
            &Filter::in_mailbox("inbox"),
            &[Property::To],
            &QueryOptions::emails(),
        ))
        .unwrap();

        assert_eq!(envelope.records[0].to[0].email, "X@Duck.com");
        assert!(envelope.is_truncated());

        let sent = client.transport().sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let request: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(request["methodCalls"][0][1]["accountId"], "acc");
    }

    #[test]
    fn test_query_mailboxes() {
        let client = client(
            r#"{"methodResponses": [
                ["Mailbox/query", {"ids": ["m1", "m2"]}, "0"],
                ["Mailbox/get", {"list": [
                    {"id": "m1", "name": "Inbox", "role": "inbox"},
                    {"id": "m2", "name": "Spam", "role": null}
                ]}, "1"]
            ]}"#,
        );
        let mailboxes = tokio_test::block_on(client.query_mailboxes(&Filter::role("inbox"))).unwrap();
        assert_eq!(mailboxes.len(), 2);
        assert_eq!(mailboxes[0].role.as_deref(), Some("inbox"));
    }

    #[test]
    fn test_malformed_json_body_is_transport_error() {
        let client = client("Malformed JSON");
        let err = tokio_test::block_on(client.query_emails(
            &Filter::in_mailbox("inbox"),
            &[Property::To],
            &QueryOptions::emails(),
        ))
        .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn test_http_transport_rejects_bad_url() {
        assert!(matches!(
            HttpTransport::new("not a url", "token"),
            Err(Error::Url(_))
        ));
    }
}
