use serde_json::Value;
use std::fmt;

use crate::constants::display;

/// Comparable identity of an opaque JSON field value
///
/// Device exports use strings for UIDs and integers for most other keys, but
/// nothing is validated, so any JSON value (or a missing key) can act as an
/// identifier. Strings are kept apart from other values so that `"5"` and `5`
/// never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    /// The key is not present on the record
    Absent,
    /// A JSON string, stored unquoted
    Text(String),
    /// Any other JSON value, stored as compact JSON text
    Json(String),
}

impl FieldKey {
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None => FieldKey::Absent,
            Some(Value::String(s)) => FieldKey::Text(s.clone()),
            Some(other) => FieldKey::Json(other.to_string()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldKey::Absent)
    }

    /// Text a user would type to refer to this key
    pub fn display_text(&self) -> &str {
        match self {
            FieldKey::Absent => display::ABSENT_KEY,
            FieldKey::Text(s) | FieldKey::Json(s) => s,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

/// Key of a routing link, present only for non-negative JSON integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u64);

impl LinkId {
    /// Interpret a link reference; `-1`, null, missing and non-integers are the sentinel
    pub fn from_ref(value: Option<&Value>) -> Option<Self> {
        value.and_then(Value::as_u64).map(LinkId)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_and_number_keys_do_not_collide() {
        let text = FieldKey::of(Some(&json!("5")));
        let number = FieldKey::of(Some(&json!(5)));
        assert_ne!(text, number);
        assert_eq!(text.display_text(), "5");
        assert_eq!(number.display_text(), "5");
    }

    #[test]
    fn test_absent_key_is_a_value() {
        assert_eq!(FieldKey::of(None), FieldKey::Absent);
        assert!(FieldKey::of(None).is_absent());
        // null is present, just unusual
        assert_eq!(FieldKey::of(Some(&Value::Null)), FieldKey::Json("null".to_string()));
    }

    #[test]
    fn test_link_id_sentinels() {
        assert_eq!(LinkId::from_ref(Some(&json!(3))), Some(LinkId(3)));
        assert_eq!(LinkId::from_ref(Some(&json!(0))), Some(LinkId(0)));
        assert_eq!(LinkId::from_ref(Some(&json!(-1))), None);
        assert_eq!(LinkId::from_ref(Some(&json!(1.5))), None);
        assert_eq!(LinkId::from_ref(Some(&json!("2"))), None);
        assert_eq!(LinkId::from_ref(Some(&Value::Null)), None);
        assert_eq!(LinkId::from_ref(None), None);
    }
}
