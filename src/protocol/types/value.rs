//! Decoded column values.

use bigdecimal::BigDecimal;
use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// A single decoded column value.
///
/// A decode call produces exactly the arm matching the requested target.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL value, also used for the zero-date sentinel of rich decoders.
    Null,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Arbitrary-precision decimal (DECIMAL, and integers beyond i64).
    Decimal(BigDecimal),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Raw bytes (binary BLOB, BIT).
    Bytes(Bytes),
}

impl Value {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as an i64, widening the smaller integer arms.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get the value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Try to get the value as raw bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::Bytes(b) => write!(f, "<BYTES: {} bytes>", b.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_value_null() {
        let val = Value::Null;
        assert!(val.is_null());
        assert_eq!(val.as_str(), None);
        assert_eq!(format!("{}", val), "NULL");
    }

    #[test]
    fn test_value_integers_widen() {
        assert_eq!(Value::Byte(-3).as_i64(), Some(-3));
        assert_eq!(Value::Short(300).as_i64(), Some(300));
        assert_eq!(Value::Long(i64::MAX).as_i64(), Some(i64::MAX));
        assert_eq!(Value::String("1".to_string()).as_i64(), None);
    }

    #[test]
    fn test_value_display() {
        let d = BigDecimal::from_str("12.970").unwrap();
        assert_eq!(format!("{}", Value::Decimal(d)), "12.970");
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(format!("{}", Value::Date(date)), "2024-02-29");
        assert_eq!(
            format!("{}", Value::Bytes(Bytes::from_static(&[1, 2, 3]))),
            "<BYTES: 3 bytes>"
        );
    }
}
