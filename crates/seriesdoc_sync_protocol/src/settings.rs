//! Fixed schema of the destination index.

use seriesdoc_core::time::MAPPING_DATE_FORMAT;
use serde_json::{json, Value};

/// Settings and mappings used when the destination index is created.
///
/// Unmatched string attributes map to exact-match keywords and unmatched
/// integer attributes map to floats, so wide documents with arbitrary
/// tag/field names index without an explicit schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    /// Primary shard count.
    pub shards: u32,
    /// Replica count.
    pub replicas: u32,
}

impl IndexSettings {
    /// Single shard, no replicas.
    pub fn standard() -> Self {
        Self {
            shards: 1,
            replicas: 0,
        }
    }

    /// Renders the index creation body.
    pub fn to_body(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": self.shards,
                "number_of_replicas": self.replicas,
            },
            "mappings": {
                "dynamic_templates": [
                    {"not_analyzed": {
                        "match": "*",
                        "match_mapping_type": "string",
                        "mapping": {"type": "keyword"},
                    }},
                    {"numbers": {
                        "match": "*",
                        "match_mapping_type": "long",
                        "mapping": {"type": "float"},
                    }},
                ],
                "properties": {
                    "type": {"type": "keyword"},
                    "time": {"type": "date", "format": MAPPING_DATE_FORMAT},
                    "series": {"type": "keyword"},
                    "period": {"type": "keyword"},
                    "descr": {"type": "keyword"},
                    "name": {"type": "keyword"},
                    "svalue": {"type": "keyword"},
                    "ivalue": {"type": "double"},
                    "data.svalue": {"type": "keyword"},
                    "data.ivalue": {"type": "double"},
                    "value": {"type": "double"},
                },
            },
        })
    }
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self::standard()
    }
}
