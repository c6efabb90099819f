//! Key/value capability required of an options variable.

use super::{Mapping, Value};
use tracing::debug;

/// A mapping that supports lookup, presence tests and assignment by string key.
pub trait Bindings {
    fn lookup(&self, key: &str) -> Option<&Value>;

    fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    fn assign(&mut self, key: &str, value: Value);

    /// String-keyed entries, in mapping order.
    fn entries(&self) -> Vec<(String, Value)>;
}

impl Bindings for Mapping {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn assign(&mut self, key: &str, value: Value) {
        self.insert(Value::String(key.to_string()), value);
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.iter()
            .filter_map(|(k, v)| match k {
                Value::String(s) => Some((s.clone(), v.clone())),
                other => {
                    debug!(key = ?other, "skipping non-string key in options mapping");
                    None
                }
            })
            .collect()
    }
}
