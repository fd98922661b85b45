//! Pre-flight validation of query parameters.
//!
//! Rules are attached to fields in each query type's [`FieldTable`] and
//! checked in table order; the first violation is returned.

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::utils::{FieldTable, FieldValue};

/// Maximum length of any free-text search field.
pub const MAX_QUERY_LEN: usize = 512;

/// Maximum number of values in a list-valued filter.
pub const MAX_LIST_ITEMS: usize = 5;

/// Validation error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} and {other} cannot be used together")]
    MutuallyExclusive {
        field: &'static str,
        other: &'static str,
    },

    #[error("{field} cannot be longer than {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("{field} accepts at most {max} values (got {count})")]
    TooManyValues {
        field: &'static str,
        max: usize,
        count: usize,
    },

    #[error("invalid value in {field}: {value}")]
    NotAllowed { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },

    #[error("{field} must not be in the future (got {date})")]
    FutureDate { field: &'static str, date: NaiveDate },

    #[error("invalid timeframe: {0}")]
    InvalidTimeframe(String),
}

/// A single constraint on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Text no longer than this many characters
    MaxLen(usize),
    /// List with at most this many values
    MaxItems(usize),
    /// Text or every list value drawn from this allow-list
    OneOf(&'static [&'static str]),
    /// Number within an inclusive range
    Range(u32, u32),
    /// Date not after today (UTC)
    NotFuture,
    /// Field must be unset when any of these sibling keys is set
    ExclusiveWith(&'static [&'static str]),
    /// Timeframe within the API's hour/minute bounds
    ValidTimeframe,
}

impl Rule {
    fn check<T: FieldTable>(
        &self,
        owner: &T,
        field: &'static str,
        value: &FieldValue<'_>,
    ) -> Result<(), ValidationError> {
        match (*self, *value) {
            (Rule::MaxLen(max), FieldValue::Text(s)) => {
                let len = s.chars().count();
                if len > max {
                    return Err(ValidationError::TooLong { field, max, len });
                }
            }
            (Rule::MaxItems(max), FieldValue::List(items)) => {
                if items.len() > max {
                    return Err(ValidationError::TooManyValues {
                        field,
                        max,
                        count: items.len(),
                    });
                }
            }
            (Rule::OneOf(allowed), FieldValue::Text(s)) => check_allowed(field, s, allowed)?,
            (Rule::OneOf(allowed), FieldValue::List(items)) => {
                for item in items {
                    check_allowed(field, item, allowed)?;
                }
            }
            (Rule::Range(min, max), FieldValue::Number(Some(n))) => {
                if n < min || n > max {
                    return Err(ValidationError::OutOfRange {
                        field,
                        min,
                        max,
                        value: n,
                    });
                }
            }
            (Rule::NotFuture, FieldValue::Date(Some(date))) => {
                if date > Utc::now().date_naive() {
                    return Err(ValidationError::FutureDate { field, date });
                }
            }
            (Rule::ExclusiveWith(others), _) => {
                for &other in others {
                    if owner.field_value(other).is_some_and(|v| !v.is_empty()) {
                        return Err(ValidationError::MutuallyExclusive { field, other });
                    }
                }
            }
            (Rule::ValidTimeframe, FieldValue::Timeframe(Some(timeframe))) => {
                if !timeframe.is_valid() {
                    return Err(ValidationError::InvalidTimeframe(timeframe.to_string()));
                }
            }
            // A rule that does not apply to this kind of value is a table mistake,
            // not a user error; it is ignored.
            _ => {}
        }
        Ok(())
    }
}

fn check_allowed(
    field: &'static str,
    value: &str,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::NotAllowed {
            field,
            value: value.to_string(),
        })
    }
}

/// Check every set field of `value` against its rules, in table order.
pub fn validate_fields<T: FieldTable>(value: &T) -> Result<(), ValidationError> {
    for field in T::FIELDS {
        let current = (field.get)(value);
        if current.is_empty() {
            continue;
        }
        for rule in field.rules {
            rule.check(value, field.key, &current)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timeframe;
    use crate::utils::Field;
    use chrono::Duration;

    #[derive(Default)]
    struct Sample {
        title: String,
        meta: String,
        langs: Vec<String>,
        size: Option<u32>,
        from: Option<NaiveDate>,
        timeframe: Option<Timeframe>,
    }

    impl FieldTable for Sample {
        const FIELDS: &'static [Field<Self>] = &[
            Field {
                key: "qInTitle",
                get: |p| FieldValue::Text(&p.title),
                rules: &[Rule::MaxLen(MAX_QUERY_LEN), Rule::ExclusiveWith(&["qInMeta"])],
            },
            Field {
                key: "qInMeta",
                get: |p| FieldValue::Text(&p.meta),
                rules: &[Rule::MaxLen(MAX_QUERY_LEN), Rule::ExclusiveWith(&["qInTitle"])],
            },
            Field {
                key: "language",
                get: |p| FieldValue::List(&p.langs),
                rules: &[Rule::MaxItems(MAX_LIST_ITEMS), Rule::OneOf(&["en", "fr", "de", "es", "it", "pt"])],
            },
            Field {
                key: "size",
                get: |p| FieldValue::Number(p.size),
                rules: &[Rule::Range(1, 50)],
            },
            Field {
                key: "from_date",
                get: |p| FieldValue::Date(p.from),
                rules: &[Rule::NotFuture],
            },
            Field {
                key: "timeframe",
                get: |p| FieldValue::Timeframe(p.timeframe),
                rules: &[Rule::ValidTimeframe],
            },
        ];
    }

    fn langs(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_sample_is_valid() {
        assert_eq!(validate_fields(&Sample::default()), Ok(()));
    }

    #[test]
    fn test_mutually_exclusive() {
        let sample = Sample {
            title: "a".into(),
            meta: "b".into(),
            ..Default::default()
        };
        assert_eq!(
            validate_fields(&sample),
            Err(ValidationError::MutuallyExclusive {
                field: "qInTitle",
                other: "qInMeta"
            })
        );
    }

    #[test]
    fn test_max_len_counts_characters() {
        let sample = Sample {
            title: "é".repeat(MAX_QUERY_LEN),
            ..Default::default()
        };
        assert!(validate_fields(&sample).is_ok());

        let sample = Sample {
            title: "x".repeat(MAX_QUERY_LEN + 1),
            ..Default::default()
        };
        assert!(matches!(
            validate_fields(&sample),
            Err(ValidationError::TooLong { len: 513, .. })
        ));
    }

    #[test]
    fn test_list_cardinality_and_membership() {
        let sample = Sample {
            langs: langs(&["en", "fr", "de", "es", "it", "pt"]),
            ..Default::default()
        };
        assert!(matches!(
            validate_fields(&sample),
            Err(ValidationError::TooManyValues { count: 6, .. })
        ));

        let sample = Sample {
            langs: langs(&["en", "klingon"]),
            ..Default::default()
        };
        assert_eq!(
            validate_fields(&sample),
            Err(ValidationError::NotAllowed {
                field: "language",
                value: "klingon".to_string()
            })
        );
    }

    #[test]
    fn test_size_range() {
        for (size, ok) in [(0, false), (1, true), (50, true), (51, false)] {
            let sample = Sample {
                size: Some(size),
                ..Default::default()
            };
            assert_eq!(validate_fields(&sample).is_ok(), ok, "size {size}");
        }
    }

    #[test]
    fn test_future_date_rejected() {
        let tomorrow = Utc::now().date_naive() + Duration::days(1);
        let sample = Sample {
            from: Some(tomorrow),
            ..Default::default()
        };
        assert!(matches!(
            validate_fields(&sample),
            Err(ValidationError::FutureDate { field: "from_date", .. })
        ));

        let sample = Sample {
            from: Some(Utc::now().date_naive()),
            ..Default::default()
        };
        assert!(validate_fields(&sample).is_ok());
    }

    #[test]
    fn test_timeframe_bounds() {
        let sample = Sample {
            timeframe: Some(Timeframe::Hours(49)),
            ..Default::default()
        };
        assert_eq!(
            validate_fields(&sample),
            Err(ValidationError::InvalidTimeframe("49".to_string()))
        );

        let sample = Sample {
            timeframe: Some(Timeframe::Minutes(90)),
            ..Default::default()
        };
        assert!(validate_fields(&sample).is_ok());
    }
}
