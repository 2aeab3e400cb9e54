//! Query bodies for delete-by-query.

use serde_json::{json, Map, Value};

/// A query selecting documents to delete.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// All term conditions must match.
    Terms(Vec<(String, Value)>),
    /// A wildcard pattern on one attribute.
    Wildcard {
        /// Attribute name.
        field: String,
        /// Pattern with `*` and `?`.
        pattern: String,
    },
}

impl Query {
    /// Builds a conjunction of exact-term conditions.
    pub fn terms<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Query::Terms(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a wildcard condition.
    pub fn wildcard(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Query::Wildcard {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    /// Renders the request body.
    pub fn to_body(&self) -> Value {
        let query = match self {
            Query::Terms(pairs) => {
                let must: Vec<Value> = pairs
                    .iter()
                    .map(|(field, value)| json!({ "term": single(field, value.clone()) }))
                    .collect();
                json!({ "bool": { "must": must } })
            }
            Query::Wildcard { field, pattern } => {
                json!({ "wildcard": single(field, Value::String(pattern.clone())) })
            }
        };
        json!({ "query": query })
    }
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_body() {
        let q = Query::terms([("type", "sprs"), ("period", "d")]);
        let body = q.to_body();
        let must = body["query"]["bool"]["must"].as_array().unwrap();
        assert_eq!(must.len(), 2);
        assert_eq!(must[0]["term"]["type"], "sprs");
        assert_eq!(must[1]["term"]["period"], "d");
    }

    #[test]
    fn wildcard_body() {
        let body = Query::wildcard("type", "is*").to_body();
        assert_eq!(body["query"]["wildcard"]["type"], "is*");
    }
}
