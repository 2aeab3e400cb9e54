//! In-memory document store.
//!
//! `MemoryStore` follows the bulk, index and delete-by-query semantics of the
//! real store closely enough to drive the engine end to end, and can inject
//! the failures the engine has to tolerate or surface.

use crate::error::{SyncError, SyncResult};
use crate::store::DocumentStore;
use parking_lot::Mutex;
use seriesdoc_core::DocumentId;
use seriesdoc_sync_protocol::{
    BulkAction, BulkItem, BulkItemResult, BulkRequest, BulkResponse, ClusterInfo,
    CreateIndexResponse, DeleteByQueryResponse, ErrorCause, IndexSettings, Query, VersionInfo,
};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

type Source = Map<String, Value>;

#[derive(Debug, Clone)]
struct ItemFault {
    status: u16,
    cause: ErrorCause,
    remaining: usize,
}

#[derive(Debug, Default)]
struct MemoryState {
    indexes: BTreeMap<String, BTreeMap<DocumentId, Source>>,
    settings: BTreeMap<String, IndexSettings>,
    bulk_calls: usize,
    create_calls: usize,
    next_bulk_failure: Option<(u16, ErrorCause)>,
    next_query_failure: Option<(u16, ErrorCause)>,
    delete_faults: HashMap<DocumentId, ItemFault>,
    insert_faults: HashMap<DocumentId, ItemFault>,
    hidden_index_checks: usize,
    unacknowledged_creates: usize,
    pending_drop: Option<(usize, usize)>,
}

/// In-memory store for tests and dry runs.
#[derive(Debug)]
pub struct MemoryStore {
    connected: AtomicBool,
    state: Mutex<MemoryState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Sets the connected state. While disconnected every call fails.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Rejects the next bulk request as a whole.
    pub fn fail_next_bulk(&self, status: u16, cause: ErrorCause) {
        self.state.lock().next_bulk_failure = Some((status, cause));
    }

    /// Rejects the next delete-by-query as a whole.
    pub fn fail_next_query(&self, status: u16, cause: ErrorCause) {
        self.state.lock().next_query_failure = Some((status, cause));
    }

    /// Fails the next `times` delete actions targeting `id`.
    pub fn fail_delete(&self, id: &DocumentId, status: u16, cause: ErrorCause, times: usize) {
        self.state.lock().delete_faults.insert(
            id.clone(),
            ItemFault {
                status,
                cause,
                remaining: times,
            },
        );
    }

    /// Fails the next `times` index actions targeting `id`.
    pub fn fail_insert(&self, id: &DocumentId, status: u16, cause: ErrorCause, times: usize) {
        self.state.lock().insert_faults.insert(
            id.clone(),
            ItemFault {
                status,
                cause,
                remaining: times,
            },
        );
    }

    /// Reports the next existence check as "missing" even if the index exists,
    /// as when another writer creates it between check and create.
    pub fn hide_index_once(&self) {
        self.state.lock().hidden_index_checks += 1;
    }

    /// Answers the next index creation without acknowledgement.
    pub fn refuse_next_create(&self) {
        self.state.lock().unacknowledged_creates += 1;
    }

    /// Leaves the last `count` actions of a bulk request unexecuted, after
    /// letting `skip` requests through untouched.
    pub fn drop_items(&self, skip: usize, count: usize) {
        self.state.lock().pending_drop = Some((skip, count));
    }

    /// Stores a document directly, creating its index.
    pub fn insert_document(&self, index: &str, id: DocumentId, source: Source) {
        self.state
            .lock()
            .indexes
            .entry(index.to_string())
            .or_default()
            .insert(id, source);
    }

    /// Number of documents in an index.
    pub fn document_count(&self, index: &str) -> usize {
        self.state.lock().indexes.get(index).map_or(0, BTreeMap::len)
    }

    /// Fetches a document.
    pub fn get(&self, index: &str, id: &DocumentId) -> Option<Source> {
        self.state
            .lock()
            .indexes
            .get(index)
            .and_then(|docs| docs.get(id).cloned())
    }

    /// All documents of an index, ordered by identity.
    pub fn documents(&self, index: &str) -> Vec<(DocumentId, Source)> {
        self.state
            .lock()
            .indexes
            .get(index)
            .map(|docs| docs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    /// Names of existing indexes.
    pub fn index_names(&self) -> Vec<String> {
        self.state.lock().indexes.keys().cloned().collect()
    }

    /// Settings an index was created with, if it was created explicitly.
    pub fn index_settings(&self, index: &str) -> Option<IndexSettings> {
        self.state.lock().settings.get(index).cloned()
    }

    /// Number of bulk requests received.
    pub fn bulk_calls(&self) -> usize {
        self.state.lock().bulk_calls
    }

    /// Number of index creations attempted.
    pub fn create_calls(&self) -> usize {
        self.state.lock().create_calls
    }

    fn check_connected(&self) -> SyncResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SyncError::NotConnected)
        }
    }
}

fn take_fault(faults: &mut HashMap<DocumentId, ItemFault>, id: &DocumentId) -> Option<ItemFault> {
    let fault = faults.get_mut(id)?;
    if fault.remaining == 0 {
        return None;
    }
    fault.remaining -= 1;
    Some(fault.clone())
}

fn item(index: &str, id: &DocumentId, status: u16, result: Option<&str>) -> BulkItemResult {
    BulkItemResult {
        index: index.to_string(),
        id: Some(id.to_string()),
        status,
        result: result.map(str::to_string),
        error: None,
    }
}

fn failed_item(index: &str, id: &DocumentId, fault: ItemFault) -> BulkItemResult {
    BulkItemResult {
        error: Some(fault.cause),
        ..item(index, id, fault.status, None)
    }
}

impl MemoryState {
    fn apply(&mut self, action: &BulkAction) -> BulkItem {
        match action {
            BulkAction::Delete { index, id } => {
                if let Some(fault) = take_fault(&mut self.delete_faults, id) {
                    return BulkItem::Delete(failed_item(index, id, fault));
                }
                let removed = self
                    .indexes
                    .get_mut(index)
                    .and_then(|docs| docs.remove(id))
                    .is_some();
                BulkItem::Delete(if removed {
                    item(index, id, 200, Some("deleted"))
                } else {
                    item(index, id, 404, Some("not_found"))
                })
            }
            BulkAction::Index { index, id, source } => {
                if let Some(fault) = take_fault(&mut self.insert_faults, id) {
                    return BulkItem::Index(failed_item(index, id, fault));
                }
                let previous = self
                    .indexes
                    .entry(index.clone())
                    .or_default()
                    .insert(id.clone(), source.clone());
                BulkItem::Index(match previous {
                    Some(_) => item(index, id, 200, Some("updated")),
                    None => item(index, id, 201, Some("created")),
                })
            }
        }
    }
}

impl DocumentStore for MemoryStore {
    fn ping(&self) -> SyncResult<ClusterInfo> {
        self.check_connected()?;
        Ok(ClusterInfo {
            name: Some("memory".into()),
            cluster_name: Some("memory".into()),
            version: VersionInfo {
                number: env!("CARGO_PKG_VERSION").into(),
            },
        })
    }

    fn index_exists(&self, index: &str) -> SyncResult<bool> {
        self.check_connected()?;
        let mut state = self.state.lock();
        if state.hidden_index_checks > 0 {
            state.hidden_index_checks -= 1;
            return Ok(false);
        }
        Ok(state.indexes.contains_key(index))
    }

    fn create_index(
        &self,
        index: &str,
        settings: &IndexSettings,
    ) -> SyncResult<CreateIndexResponse> {
        self.check_connected()?;
        let mut state = self.state.lock();
        state.create_calls += 1;
        if state.indexes.contains_key(index) {
            return Err(SyncError::Store {
                status: 400,
                cause: ErrorCause::new(
                    "resource_already_exists_exception",
                    format!("index [{}] already exists", index),
                ),
            });
        }
        if state.unacknowledged_creates > 0 {
            state.unacknowledged_creates -= 1;
            return Ok(CreateIndexResponse {
                acknowledged: false,
                shards_acknowledged: false,
                index: Some(index.to_string()),
            });
        }
        state.indexes.insert(index.to_string(), BTreeMap::new());
        state.settings.insert(index.to_string(), settings.clone());
        Ok(CreateIndexResponse {
            acknowledged: true,
            shards_acknowledged: true,
            index: Some(index.to_string()),
        })
    }

    fn bulk(&self, request: &BulkRequest) -> SyncResult<BulkResponse> {
        self.check_connected()?;
        let mut state = self.state.lock();
        state.bulk_calls += 1;
        if let Some((status, cause)) = state.next_bulk_failure.take() {
            return Err(SyncError::Store { status, cause });
        }

        let dropped = match state.pending_drop.take() {
            Some((0, count)) => count,
            Some((skip, count)) => {
                state.pending_drop = Some((skip - 1, count));
                0
            }
            None => 0,
        };
        let executed = request.len().saturating_sub(dropped);
        let items: Vec<BulkItem> = request.actions()[..executed]
            .iter()
            .map(|action| state.apply(action))
            .collect();

        Ok(BulkResponse {
            took: 0,
            errors: items.iter().any(BulkItem::is_failure),
            items,
        })
    }

    fn delete_by_query(&self, index: &str, query: &Query) -> SyncResult<DeleteByQueryResponse> {
        self.check_connected()?;
        let mut state = self.state.lock();
        if let Some((status, cause)) = state.next_query_failure.take() {
            return Err(SyncError::Store { status, cause });
        }
        let docs = state.indexes.get_mut(index).ok_or_else(|| SyncError::Store {
            status: 404,
            cause: ErrorCause::new("index_not_found_exception", format!("no such index [{}]", index)),
        })?;

        let before = docs.len();
        docs.retain(|_, source| !matches(query, source));
        let deleted = (before - docs.len()) as u64;

        Ok(DeleteByQueryResponse {
            took: 0,
            total: deleted,
            deleted,
            version_conflicts: 0,
            failures: Vec::new(),
        })
    }
}

fn matches(query: &Query, source: &Source) -> bool {
    match query {
        Query::Terms(pairs) => pairs
            .iter()
            .all(|(field, value)| source.get(field) == Some(value)),
        Query::Wildcard { field, pattern } => source
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|text| glob(pattern.as_bytes(), text.as_bytes())),
    }
}

/// Matches `*` (any run) and `?` (one byte) against `text`.
fn glob(pattern: &[u8], text: &[u8]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p).copied() {
            Some(b'*') => {
                star = Some((p, t));
                p += 1;
            }
            Some(c) if c == b'?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((sp, st)) => {
                    p = sp + 1;
                    t = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == b'*')
}

#[cfg(test)]
mod tests {
    use super::*;
    use seriesdoc_core::Document;
    use serde_json::json;

    fn id(s: &str) -> DocumentId {
        DocumentId::from_string(s)
    }

    fn doc(doc_type: &str) -> Document {
        Document::new(doc_type)
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = MemoryStore::new();
        let req: BulkRequest = [BulkAction::delete("d_x", id("a"))].into_iter().collect();
        let resp = store.bulk(&req).unwrap();
        assert_eq!(resp.items.len(), 1);
        assert!(resp.items[0].is_failure());
        assert!(resp.items[0].is_not_found());
        assert_eq!(store.bulk_calls(), 1);
    }

    #[test]
    fn index_creates_then_updates() {
        let store = MemoryStore::new();
        let req: BulkRequest = [BulkAction::index("d_x", id("a"), doc("sx"))]
            .into_iter()
            .collect();
        let first = store.bulk(&req).unwrap();
        let second = store.bulk(&req).unwrap();
        assert_eq!(first.items[0].result().result.as_deref(), Some("created"));
        assert_eq!(second.items[0].result().result.as_deref(), Some("updated"));
        assert_eq!(store.document_count("d_x"), 1);
        assert_eq!(store.get("d_x", &id("a")).unwrap()["type"], "sx");
    }

    #[test]
    fn create_existing_index_fails() {
        let store = MemoryStore::new();
        let settings = IndexSettings::standard();
        assert!(store.create_index("d_x", &settings).unwrap().acknowledged);
        let err = store.create_index("d_x", &settings).unwrap_err();
        assert!(err.store_cause().unwrap().is_already_exists());
        assert_eq!(store.create_calls(), 2);
        assert_eq!(store.index_settings("d_x"), Some(settings));
    }

    #[test]
    fn hidden_index_reports_missing_once() {
        let store = MemoryStore::new();
        store.insert_document("d_x", id("a"), Map::new());
        store.hide_index_once();
        assert!(!store.index_exists("d_x").unwrap());
        assert!(store.index_exists("d_x").unwrap());
    }

    #[test]
    fn injected_item_faults_expire() {
        let store = MemoryStore::new();
        store.insert_document("d_x", id("a"), Map::new());
        store.fail_delete(&id("a"), 409, ErrorCause::new("version_conflict_engine_exception", "c"), 1);
        let req: BulkRequest = [BulkAction::delete("d_x", id("a"))].into_iter().collect();

        let resp = store.bulk(&req).unwrap();
        assert_eq!(resp.items[0].result().status, 409);
        assert!(!resp.items[0].is_not_found());

        let resp = store.bulk(&req).unwrap();
        assert!(!resp.items[0].is_failure());
        assert_eq!(store.document_count("d_x"), 0);
    }

    #[test]
    fn dropped_items_are_not_executed() {
        let store = MemoryStore::new();
        let req: BulkRequest = ["a", "b", "c"]
            .iter()
            .map(|s| BulkAction::index("d_x", id(s), doc("sx")))
            .collect();
        store.drop_items(1, 2);
        assert_eq!(store.bulk(&req).unwrap().items.len(), 3);
        let resp = store.bulk(&req).unwrap();
        assert_eq!(resp.items.len(), 1);
        assert_eq!(store.bulk(&req).unwrap().items.len(), 3);
    }

    #[test]
    fn whole_request_failure_is_one_shot() {
        let store = MemoryStore::new();
        store.fail_next_bulk(503, ErrorCause::new("search_phase_execution_exception", "x"));
        let req = BulkRequest::new();
        assert!(store.bulk(&req).unwrap_err().store_cause().unwrap().is_search_phase());
        assert!(store.bulk(&req).is_ok());
    }

    #[test]
    fn delete_by_query_terms_and_wildcard() {
        let store = MemoryStore::new();
        let src = |t: &str, p: &str| {
            json!({"type": t, "period": p}).as_object().cloned().unwrap()
        };
        store.insert_document("d_x", id("1"), src("sprs", "d"));
        store.insert_document("d_x", id("2"), src("sprs", "m"));
        store.insert_document("d_x", id("3"), src("isprs", "d"));
        store.insert_document("d_x", id("4"), src("tprs", "d"));

        let resp = store
            .delete_by_query("d_x", &Query::terms([("type", "sprs"), ("period", "d")]))
            .unwrap();
        assert_eq!(resp.deleted, 1);

        let resp = store
            .delete_by_query("d_x", &Query::wildcard("type", "*sprs"))
            .unwrap();
        assert_eq!(resp.deleted, 2);
        assert_eq!(store.document_count("d_x"), 1);

        let err = store
            .delete_by_query("d_missing", &Query::wildcard("type", "*"))
            .unwrap_err();
        assert_eq!(err.store_cause().unwrap().error_type, "index_not_found_exception");
    }

    #[test]
    fn disconnected_store_fails() {
        let store = MemoryStore::new();
        store.set_connected(false);
        assert!(matches!(store.ping(), Err(SyncError::NotConnected)));
        store.set_connected(true);
        assert!(store.ping().is_ok());
    }

    #[test]
    fn glob_patterns() {
        assert!(glob(b"*", b""));
        assert!(glob(b"s*", b"sprs"));
        assert!(glob(b"?prs", b"sprs"));
        assert!(glob(b"*r*", b"sprs"));
        assert!(glob(b"s*s", b"sprs"));
        assert!(!glob(b"s*x", b"sprs"));
        assert!(!glob(b"?", b""));
        assert!(!glob(b"abc", b"ab"));
    }
}
