//! The structured event record the decoder reads from and writes into.
//!
//! An [`Event`] is a JSON-object-backed key/value record with dotted-path
//! access: `get("user.name")` walks nested objects, and `put("user.name", v)`
//! creates intermediate objects as needed. Keys containing literal dots are
//! not addressable; a dot always separates path segments.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EventError;

/// A structured event record with dotted-path lookup and assignment.
///
/// Values are [`serde_json::Value`]s, so events hold strings, numbers, bools,
/// arrays, and nested objects. The decoder mutates events in place; it never
/// takes ownership of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    /// Create an empty event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an event from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Borrow the underlying key/value map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consume the event, returning the underlying key/value map.
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// Look up a value by dotted path.
    ///
    /// Errors with [`EventError::KeyNotFound`] if any segment is absent, and
    /// with [`EventError::NotAnObject`] if traversal runs through a value that
    /// is not an object (e.g. `get("a.b")` when `a` holds a string).
    pub fn get(&self, path: &str) -> Result<&Value, EventError> {
        let mut current: &Value = match self.fields.get(first_segment(path)) {
            Some(v) => v,
            None => return Err(key_not_found(path)),
        };

        for segment in path.split('.').skip(1) {
            let map = current.as_object().ok_or_else(|| EventError::NotAnObject {
                path: path.to_string(),
                segment: prior_segment(path, segment).to_string(),
            })?;
            current = map.get(segment).ok_or_else(|| key_not_found(path))?;
        }
        Ok(current)
    }

    /// Returns true if `path` resolves to a value.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Assign a value at a dotted path, creating intermediate objects.
    ///
    /// Returns the value previously stored at the path, if any. Errors with
    /// [`EventError::NotAnObject`] when an intermediate segment already holds
    /// a non-object value; the event is unchanged in that case.
    pub fn put(&mut self, path: &str, value: Value) -> Result<Option<Value>, EventError> {
        let segments: Vec<&str> = path.split('.').collect();
        let (last, intermediate) = segments.split_last().unwrap_or((&path, &[]));

        let mut current = &mut self.fields;
        for segment in intermediate {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match entry {
                Value::Object(map) => map,
                _ => {
                    return Err(EventError::NotAnObject {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    });
                }
            };
        }
        Ok(current.insert(last.to_string(), value))
    }

    /// Merge a flat decoded map into the event root, key by key.
    ///
    /// When `overwrite` is false, keys that already resolve in the event are
    /// skipped and keep their existing value; other keys are still written.
    /// A key whose write fails (dotted key blocked by a scalar) is recorded
    /// under `error_key` at the root instead of aborting the merge; if several
    /// keys fail, the last failure wins.
    pub fn merge_root(&mut self, decoded: Map<String, Value>, overwrite: bool, error_key: &str) {
        for (key, value) in decoded {
            if !overwrite && self.contains(&key) {
                continue;
            }
            if let Err(err) = self.put(&key, value) {
                self.fields
                    .insert(error_key.to_string(), Value::String(err.to_string()));
            }
        }
    }
}

impl From<Map<String, Value>> for Event {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

fn key_not_found(path: &str) -> EventError {
    EventError::KeyNotFound {
        path: path.to_string(),
    }
}

fn first_segment(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

/// Returns the segment preceding `segment` in `path`, for error reporting.
fn prior_segment<'a>(path: &'a str, segment: &str) -> &'a str {
    let mut prior = first_segment(path);
    for s in path.split('.').skip(1) {
        if s == segment {
            break;
        }
        prior = s;
    }
    prior
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Event;
    use crate::error::EventError;

    fn sample_event() -> Event {
        Event::from_value(json!({
            "msg": "a,b,c",
            "user": { "name": "ada", "id": 7 },
        }))
        .unwrap()
    }

    #[test]
    fn get_walks_nested_objects() {
        let event = sample_event();
        assert_eq!(event.get("msg").unwrap(), &json!("a,b,c"));
        assert_eq!(event.get("user.name").unwrap(), &json!("ada"));
    }

    #[test]
    fn get_reports_missing_keys() {
        let event = sample_event();
        assert_eq!(
            event.get("user.email"),
            Err(EventError::KeyNotFound {
                path: "user.email".to_string()
            })
        );
        assert!(matches!(
            event.get("nope"),
            Err(EventError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn get_reports_blocked_traversal() {
        let event = sample_event();
        let err = event.get("msg.inner").unwrap_err();
        assert_eq!(
            err,
            EventError::NotAnObject {
                path: "msg.inner".to_string(),
                segment: "msg".to_string(),
            }
        );
    }

    #[test]
    fn put_creates_intermediate_objects() {
        let mut event = Event::new();
        let replaced = event.put("a.b.c", json!(1)).unwrap();
        assert!(replaced.is_none());
        assert_eq!(event.get("a.b.c").unwrap(), &json!(1));
    }

    #[test]
    fn put_returns_replaced_value() {
        let mut event = sample_event();
        let replaced = event.put("user.name", json!("grace")).unwrap();
        assert_eq!(replaced, Some(json!("ada")));
    }

    #[test]
    fn put_fails_on_scalar_intermediate() {
        let mut event = sample_event();
        let err = event.put("msg.sub", json!(1)).unwrap_err();
        assert_eq!(
            err,
            EventError::NotAnObject {
                path: "msg.sub".to_string(),
                segment: "msg".to_string(),
            }
        );
        // Event unchanged.
        assert_eq!(event, sample_event());
    }

    #[test]
    fn merge_root_respects_overwrite_flag() {
        let decoded = serde_json::from_value(json!({"msg": "new", "extra": "x"})).unwrap();

        let mut event = sample_event();
        event.merge_root(decoded, false, "csv_error");
        assert_eq!(event.get("msg").unwrap(), &json!("a,b,c"));
        assert_eq!(event.get("extra").unwrap(), &json!("x"));

        let decoded = serde_json::from_value(json!({"msg": "new"})).unwrap();
        let mut event = sample_event();
        event.merge_root(decoded, true, "csv_error");
        assert_eq!(event.get("msg").unwrap(), &json!("new"));
    }

    #[test]
    fn merge_root_records_write_failures() {
        // "msg.sub" cannot be written because "msg" holds a string.
        let decoded = serde_json::from_value(json!({"msg.sub": "v", "ok": "1"})).unwrap();

        let mut event = sample_event();
        event.merge_root(decoded, true, "csv_error");
        assert_eq!(event.get("ok").unwrap(), &json!("1"));
        assert!(event.contains("csv_error"));
    }
}
