//! Batched query+get requests.
//!
//! A batch is one JMAP request with two method calls: `Foo/query` resolves a
//! filter to an id list and a total, then `Foo/get` fetches the requested
//! properties for exactly those ids through a result reference.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::request::{Comparator, Filter, Property, Request, ResultReference};
use crate::response::{GetResponse, QueryResponse, Response};

/// Default page size for email queries.
pub const DEFAULT_LIMIT: u32 = 100;

const QUERY_CALL_ID: &str = "0";
const GET_CALL_ID: &str = "1";

/// JMAP data type a batch operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// `Email` objects.
    Email,
    /// `Mailbox` objects.
    Mailbox,
}

impl DataType {
    /// Name of the query method.
    #[must_use]
    pub const fn query_method(self) -> &'static str {
        match self {
            Self::Email => "Email/query",
            Self::Mailbox => "Mailbox/query",
        }
    }

    /// Name of the get method.
    #[must_use]
    pub const fn get_method(self) -> &'static str {
        match self {
            Self::Email => "Email/get",
            Self::Mailbox => "Mailbox/get",
        }
    }
}

/// Paging and ordering of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Maximum number of ids to return; `None` lets the server decide.
    pub limit: Option<u32>,
    /// Sort by `receivedAt`, newest first.
    pub newest_first: bool,
    /// Return only one email per thread.
    pub collapse_threads: bool,
}

impl QueryOptions {
    /// Email defaults: 100 per page, newest first, one email per thread.
    #[must_use]
    pub const fn emails() -> Self {
        Self {
            limit: Some(DEFAULT_LIMIT),
            newest_first: true,
            collapse_threads: true,
        }
    }

    /// Mailbox queries: no paging, no email-specific ordering.
    #[must_use]
    pub const fn mailboxes() -> Self {
        Self {
            limit: None,
            newest_first: false,
            collapse_threads: false,
        }
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::emails()
    }
}

/// Records returned by a batch together with the store-wide match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEnvelope<T> {
    /// Fetched records, in server order.
    pub records: Vec<T>,
    /// Number of records matching the filter across the whole store.
    pub total: u64,
}

impl<T> QueryEnvelope<T> {
    /// Number of records actually fetched.
    #[must_use]
    pub fn retrieved(&self) -> u64 {
        self.records.len() as u64
    }

    /// True when more records matched than were fetched.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.total > self.retrieved()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryArguments<'a> {
    account_id: &'a str,
    filter: &'a Filter,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sort: Vec<Comparator>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    collapse_threads: bool,
    position: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    calculate_total: bool,
}

#[derive(Serialize)]
struct GetArguments<'a> {
    #[serde(rename = "accountId")]
    account_id: &'a str,
    #[serde(rename = "#ids")]
    ids: ResultReference,
    properties: &'a [Property],
}

/// Builds the two-call request for a batch.
///
/// # Errors
///
/// Returns [`Error::Protocol`] if the arguments cannot be serialized.
pub fn build_batch(
    account_id: &str,
    data_type: DataType,
    filter: &Filter,
    properties: &[Property],
    options: &QueryOptions,
) -> Result<Request> {
    let query = QueryArguments {
        account_id,
        filter,
        sort: if options.newest_first {
            vec![Comparator::newest_first()]
        } else {
            Vec::new()
        },
        collapse_threads: options.collapse_threads,
        position: 0,
        limit: options.limit,
        calculate_total: true,
    };
    let get = GetArguments {
        account_id,
        ids: ResultReference::ids_of(QUERY_CALL_ID, data_type.query_method()),
        properties,
    };

    Ok(Request::new()
        .call(data_type.query_method(), serde_json::to_value(query)?, QUERY_CALL_ID)
        .call(data_type.get_method(), serde_json::to_value(get)?, GET_CALL_ID))
}

/// Validates the response to a batch built by [`build_batch`].
///
/// # Errors
///
/// Returns [`Error::Query`] or [`Error::Fetch`]/[`Error::RequestTooLarge`]
/// for method errors, [`Error::Transport`]/[`Error::Protocol`] for bodies
/// that are not JMAP, and [`Error::UnexpectedResponse`] if the server
/// returned more records than it says matched.
pub fn read_batch<T: DeserializeOwned>(body: &str, data_type: DataType) -> Result<QueryEnvelope<T>> {
    let mut response = Response::parse(body)?;

    let query: QueryResponse = response
        .take(QUERY_CALL_ID, data_type.query_method())?
        .into_result(|e| Error::query(e.kind.clone(), e.description()))?;
    let get: GetResponse<T> = response
        .take(GET_CALL_ID, data_type.get_method())?
        .into_result(|e| Error::fetch(e.kind.clone(), e.description()))?;

    let total = query.total.unwrap_or(query.ids.len() as u64);
    let envelope = QueryEnvelope {
        records: get.list,
        total,
    };
    if envelope.retrieved() > envelope.total {
        return Err(Error::UnexpectedResponse(format!(
            "{} returned {} records but reported only {} matches",
            data_type.get_method(),
            envelope.retrieved(),
            envelope.total
        )));
    }
    Ok(envelope)
}
