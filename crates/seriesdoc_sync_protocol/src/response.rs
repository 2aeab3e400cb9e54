//! Store responses and error causes.

use crate::error::{ProtocolError, ProtocolResult};
use serde::{Deserialize, Serialize};

/// Error type the store reports when an index already exists.
const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Error type the store reports when a query hits an index with nothing searchable yet.
const SEARCH_PHASE: &str = "search_phase_execution_exception";

/// A store-level error cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorCause {
    /// Machine-readable error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Nested root causes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_cause: Vec<ErrorCause>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Cause(ErrorCause),
    Text(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorField,
}

impl ErrorCause {
    /// Creates a cause from a type and reason.
    pub fn new(error_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            reason: Some(reason.into()),
            root_cause: Vec::new(),
        }
    }

    /// Extracts the cause from an error response body.
    ///
    /// Bodies that are not the store's error envelope become an `http_<status>`
    /// cause carrying the raw text.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(ErrorBody {
                error: ErrorField::Cause(cause),
            }) => cause,
            Ok(ErrorBody {
                error: ErrorField::Text(text),
            }) => Self::new(format!("http_{}", status), text),
            Err(_) => Self::new(
                format!("http_{}", status),
                String::from_utf8_lossy(body).into_owned(),
            ),
        }
    }

    fn mentions(&self, error_type: &str, phrase: &str) -> bool {
        self.error_type == error_type
            || self.reason.as_deref().is_some_and(|r| r.contains(phrase))
            || self.root_cause.iter().any(|c| c.mentions(error_type, phrase))
    }

    /// True when creation failed because the index already exists.
    pub fn is_already_exists(&self) -> bool {
        self.mentions(ALREADY_EXISTS, "already exists")
    }

    /// True when a query failed because the index has no searchable data yet.
    pub fn is_search_phase(&self) -> bool {
        self.mentions(SEARCH_PHASE, SEARCH_PHASE)
    }
}

impl std::fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{}: {}", self.error_type, reason),
            None => write!(f, "{}", self.error_type),
        }
    }
}

/// Outcome of one bulk action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkItemResult {
    /// Index the action targeted.
    #[serde(rename = "_index", default)]
    pub index: String,
    /// Document identity.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// HTTP-like status code of the action.
    pub status: u16,
    /// Result word, e.g. `created`, `updated`, `deleted`, `not_found`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Error details for failed actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCause>,
}

/// One entry of a bulk response, keyed by the action kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkItem {
    /// Result of an index action.
    Index(BulkItemResult),
    /// Result of a create action.
    Create(BulkItemResult),
    /// Result of an update action.
    Update(BulkItemResult),
    /// Result of a delete action.
    Delete(BulkItemResult),
}

impl BulkItem {
    /// Returns the per-action outcome.
    pub fn result(&self) -> &BulkItemResult {
        match self {
            BulkItem::Index(r) | BulkItem::Create(r) | BulkItem::Update(r) | BulkItem::Delete(r) => r,
        }
    }

    /// True when the action did not succeed (status outside 2xx).
    pub fn is_failure(&self) -> bool {
        !(200..300).contains(&self.result().status)
    }

    /// True when the action failed only because the document did not exist.
    pub fn is_not_found(&self) -> bool {
        self.result()
            .result
            .as_deref()
            .is_some_and(|r| r.contains("not_found"))
    }
}

/// Response to a bulk submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkResponse {
    /// Milliseconds spent by the store.
    #[serde(default)]
    pub took: u64,
    /// True when at least one item failed.
    #[serde(default)]
    pub errors: bool,
    /// One entry per submitted action, in submission order.
    #[serde(default)]
    pub items: Vec<BulkItem>,
}

impl BulkResponse {
    /// Parses a bulk response body.
    pub fn from_slice(body: &[u8]) -> ProtocolResult<Self> {
        serde_json::from_slice(body).map_err(ProtocolError::from)
    }

    /// Positions and entries of failed items.
    pub fn failed(&self) -> impl Iterator<Item = (usize, &BulkItem)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_failure())
    }
}

/// Response to an index creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateIndexResponse {
    /// Whether the cluster acknowledged the creation.
    #[serde(default)]
    pub acknowledged: bool,
    /// Whether the shards were started in time.
    #[serde(default)]
    pub shards_acknowledged: bool,
    /// Created index name.
    #[serde(default)]
    pub index: Option<String>,
}

/// Response to a delete-by-query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteByQueryResponse {
    /// Milliseconds spent by the store.
    #[serde(default)]
    pub took: u64,
    /// Documents matched.
    #[serde(default)]
    pub total: u64,
    /// Documents deleted.
    #[serde(default)]
    pub deleted: u64,
    /// Version conflicts encountered.
    #[serde(default)]
    pub version_conflicts: u64,
    /// Per-document failures.
    #[serde(default)]
    pub failures: Vec<serde_json::Value>,
}

/// Store version details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version number, e.g. `7.17.9`.
    pub number: String,
}

/// Response to a reachability check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    /// Node name.
    #[serde(default)]
    pub name: Option<String>,
    /// Cluster name.
    #[serde(default)]
    pub cluster_name: Option<String>,
    /// Version details.
    pub version: VersionInfo,
}
