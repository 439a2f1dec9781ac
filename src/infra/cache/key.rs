//! Cache keys derived from a call and its arguments.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::CACHE_KEY_SEPARATOR;

/// Deterministic cache key built from a prefix, an operation name and its
/// arguments.
///
/// Renders as `prefix:name:arg1:arg2:key=value`. Empty parts are skipped and
/// keyword arguments are ordered by name.
///
/// ```ignore
/// let key = CacheKey::new("users", "find").arg(42).kwarg("active", true);
/// assert_eq!(key.to_string(), "users:find:42:active=true");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheKey {
    prefix: String,
    name: String,
    args: Vec<String>,
    kwargs: BTreeMap<String, String>,
}

impl CacheKey {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.kwargs.insert(name.into(), value.to_string());
        self
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kwargs = self.kwargs.iter().map(|(k, v)| format!("{k}={v}"));

        let parts: Vec<String> = [self.prefix.clone(), self.name.clone()]
            .into_iter()
            .chain(self.args.iter().cloned())
            .chain(kwargs)
            .filter(|part| !part.is_empty())
            .collect();

        f.write_str(&parts.join(CACHE_KEY_SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_key() {
        let key = CacheKey::new("users", "find")
            .arg(42)
            .kwarg("sort", "name")
            .kwarg("active", true);
        assert_eq!(key.to_string(), "users:find:42:active=true:sort=name");
    }

    #[test]
    fn test_empty_parts_are_dropped() {
        assert_eq!(CacheKey::new("", "stats").to_string(), "stats");
        assert_eq!(CacheKey::new("p", "f").arg("").arg("x").to_string(), "p:f:x");
    }
}
