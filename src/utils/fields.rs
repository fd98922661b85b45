//! Static field tables shared by query encoding and validation.
//!
//! Each query type lists its wire fields once, in order, as a
//! [`FieldTable`]. A [`Field`] pairs the wire key with a getter that
//! borrows the current value and the [`Rule`]s it must satisfy. The same
//! table drives [`encode_fields`] and
//! [`validate_fields`](crate::utils::validate_fields), so a field cannot be
//! encoded without also being checked.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::Timeframe;
use crate::utils::Rule;

/// Flat parameter map sent as the URL query string.
pub type QueryMap = BTreeMap<String, String>;

/// Separator used when joining list-valued fields.
pub const LIST_SEPARATOR: &str = ",";

/// Wire date format for `from_date` / `to_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Borrowed view of one field's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(&'a [String]),
    Number(Option<u32>),
    /// Pseudo-boolean encoded as `1` / `0`.
    Flag(Option<bool>),
    Date(Option<NaiveDate>),
    Timeframe(Option<Timeframe>),
}

impl FieldValue<'_> {
    /// Whether the field is unset. Unset fields are never encoded and skip validation.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Number(n) => n.is_none(),
            FieldValue::Flag(f) => f.is_none(),
            FieldValue::Date(d) => d.is_none(),
            FieldValue::Timeframe(t) => t.is_none(),
        }
    }

    /// Wire representation, or `None` when the field is unset.
    pub fn encode(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        match *self {
            FieldValue::Text(s) => Some(s.to_string()),
            FieldValue::List(items) => Some(items.join(LIST_SEPARATOR)),
            FieldValue::Number(n) => n.map(|n| n.to_string()),
            FieldValue::Flag(f) => f.map(|f| if f { "1" } else { "0" }.to_string()),
            FieldValue::Date(d) => d.map(|d| d.format(DATE_FORMAT).to_string()),
            FieldValue::Timeframe(t) => t.map(|t| t.to_string()),
        }
    }
}

/// One entry of a query type's field table.
pub struct Field<T: 'static> {
    /// Wire key, also used to name the field in validation errors
    pub key: &'static str,
    pub get: for<'a> fn(&'a T) -> FieldValue<'a>,
    pub rules: &'static [Rule],
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("rules", &self.rules)
            .finish()
    }
}

/// A type whose wire fields are described by a static, ordered table.
pub trait FieldTable: Sized + 'static {
    const FIELDS: &'static [Field<Self>];

    /// Look up a field's current value by wire key.
    fn field_value(&self, key: &str) -> Option<FieldValue<'_>> {
        Self::FIELDS
            .iter()
            .find(|field| field.key == key)
            .map(|field| (field.get)(self))
    }
}

/// Append every set field of `value` to `out`. Existing keys are overwritten.
pub fn encode_fields<T: FieldTable>(value: &T, out: &mut QueryMap) {
    for field in T::FIELDS {
        if let Some(encoded) = (field.get)(value).encode() {
            out.insert(field.key.to_string(), encoded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        name: String,
        tags: Vec<String>,
        size: Option<u32>,
        flag: Option<bool>,
    }

    impl FieldTable for Sample {
        const FIELDS: &'static [Field<Self>] = &[
            Field {
                key: "name",
                get: |s| FieldValue::Text(&s.name),
                rules: &[],
            },
            Field {
                key: "tag",
                get: |s| FieldValue::List(&s.tags),
                rules: &[],
            },
            Field {
                key: "size",
                get: |s| FieldValue::Number(s.size),
                rules: &[],
            },
            Field {
                key: "flag",
                get: |s| FieldValue::Flag(s.flag),
                rules: &[],
            },
        ];
    }

    #[test]
    fn test_encode_skips_empty_fields() {
        let sample = Sample {
            name: String::new(),
            tags: Vec::new(),
            size: None,
            flag: None,
        };
        let mut out = QueryMap::new();
        encode_fields(&sample, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_encode_joins_lists_and_flags() {
        let sample = Sample {
            name: "ai".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
            size: Some(10),
            flag: Some(false),
        };
        let mut out = QueryMap::new();
        encode_fields(&sample, &mut out);

        assert_eq!(out.get("name").map(String::as_str), Some("ai"));
        assert_eq!(out.get("tag").map(String::as_str), Some("a,b"));
        assert_eq!(out.get("size").map(String::as_str), Some("10"));
        assert_eq!(out.get("flag").map(String::as_str), Some("0"));
    }

    #[test]
    fn test_field_value_lookup() {
        let sample = Sample {
            name: "x".to_string(),
            tags: Vec::new(),
            size: None,
            flag: Some(true),
        };
        assert_eq!(sample.field_value("name"), Some(FieldValue::Text("x")));
        assert_eq!(sample.field_value("flag"), Some(FieldValue::Flag(Some(true))));
        assert_eq!(sample.field_value("missing"), None);
    }

    #[test]
    fn test_date_encoding() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(FieldValue::Date(date).encode().as_deref(), Some("2024-03-09"));
    }
}
