//! DATE decoder.
//!
//! Text values are `YYYY-MM-DD` literals. Binary values are
//! length-prefixed:
//! - length 0: the zero date
//! - bytes[0..2]: year (little-endian)
//! - byte[2]: month (1-12, 0 in zero dates)
//! - byte[3]: day (1-31, 0 in zero dates)
//!
//! The zero date `0000-00-00` decodes to the sentinel string, or to NULL
//! for the natural representation.

use chrono::NaiveDate;

use super::timestamp::read_wire_datetime;
use super::{incompatible, read_string, Decoders, DecoderTable};
use crate::error::{Error, Result};
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::codec::Calendar;
use crate::protocol::constants::ZERO_DATE;
use crate::protocol::types::{ColumnDefinition, Value};

pub(super) static TABLE: DecoderTable = DecoderTable {
    text: Decoders {
        boolean: incompatible,
        byte: incompatible,
        short: incompatible,
        int: incompatible,
        long: incompatible,
        float: incompatible,
        double: incompatible,
        string: read_string,
        decimal: incompatible,
        bytes: incompatible,
        natural: text_natural,
    },
    binary: Decoders {
        boolean: incompatible,
        byte: incompatible,
        short: incompatible,
        int: incompatible,
        long: incompatible,
        float: incompatible,
        double: incompatible,
        string: binary_string,
        decimal: incompatible,
        bytes: incompatible,
        natural: binary_natural,
    },
};

/// Build a date from its parts.
///
/// Returns `Ok(None)` for the all-zero date.
pub(crate) fn make_date(year: i32, month: u32, day: u32) -> Result<Option<NaiveDate>> {
    if year == 0 && month == 0 && day == 0 {
        return Ok(None);
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or_else(|| {
            Error::malformed(format!(
                "value '{:04}-{:02}-{:02}' cannot be decoded as Date",
                year, month, day
            ))
        })
}

/// Parse the date part of a `YYYY-MM-DD[ ...]` literal.
///
/// Returns `Ok(None)` for the zero date.
pub(crate) fn parse_date(s: &str) -> Result<Option<NaiveDate>> {
    let malformed = || Error::malformed(format!("value '{}' cannot be decoded as Date", s));
    let mut parts = s.trim().split(|c| c == '-' || c == ' ' || c == 'T');
    let mut next = || -> Result<i64> {
        parts
            .next()
            .and_then(|p| p.parse::<i64>().ok())
            .ok_or_else(malformed)
    };
    let year = next()?;
    let month = next()?;
    let day = next()?;
    let year = i32::try_from(year).map_err(|_| malformed())?;
    let month = u32::try_from(month).map_err(|_| malformed())?;
    let day = u32::try_from(day).map_err(|_| malformed())?;
    make_date(year, month, day)
}

/// Expand a YEAR value.
///
/// Two-digit years map 0-69 to 2000-2069 and 70-99 to 1970-1999.
pub(crate) fn expand_year(raw: i32, two_digit: bool) -> i32 {
    match raw {
        y if two_digit && y <= 69 => 2000 + y,
        y if two_digit => 1900 + y,
        y => y,
    }
}

fn text_natural(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<Value> {
    let s = buf.read_ascii(length)?;
    Ok(parse_date(&s)?.map_or(Value::Null, Value::Date))
}

fn binary_string(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<String> {
    if length == 0 {
        return Ok(ZERO_DATE.to_string());
    }
    let wire = read_wire_datetime(buf, length)?;
    Ok(format!("{:04}-{:02}-{:02}", wire.year, wire.month, wire.day))
}

fn binary_natural(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<Value> {
    let wire = read_wire_datetime(buf, length)?;
    Ok(wire.date()?.map_or(Value::Null, Value::Date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use crate::protocol::types::ServerType;
    use bytes::Bytes;
    use chrono::Datelike;

    fn column() -> ColumnDefinition {
        ColumnDefinition::generated("d", ServerType::Date, 10, 0)
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-10-21").unwrap().unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 10);
        assert_eq!(date.day(), 21);

        let date = parse_date("1999-06-15 12:30:45").unwrap().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1999, 6, 15).unwrap());

        assert_eq!(parse_date("0000-00-00").unwrap(), None);
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("2024-10").is_err());
        assert!(parse_date("2024-13-01").is_err());
        let err = parse_date("2024-02-30").unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Malformed));
    }

    #[test]
    fn test_expand_year_two_digit() {
        assert_eq!(expand_year(69, true), 2069);
        assert_eq!(expand_year(70, true), 1970);
        assert_eq!(expand_year(0, true), 2000);
        assert_eq!(expand_year(1969, false), 1969);
    }

    #[test]
    fn test_binary_string_zero_length() {
        let mut buf = ReadBuffer::new(Bytes::new());
        assert_eq!(binary_string(&mut buf, 0, &column(), None).unwrap(), "0000-00-00");
    }

    #[test]
    fn test_binary_string_keeps_partial_zero_dates() {
        let mut buf = ReadBuffer::new(Bytes::from_static(&[0xe8, 0x07, 0x00, 0x00]));
        assert_eq!(binary_string(&mut buf, 4, &column(), None).unwrap(), "2024-00-00");
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_binary_natural() {
        let mut buf = ReadBuffer::new(Bytes::from_static(&[
            0xe8, 0x07, 0x02, 0x1d, // 2024-02-29
            0x00, 0x00, 0x00, 0x00, // zero date
        ]));
        assert_eq!(
            binary_natural(&mut buf, 4, &column(), None).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
        assert_eq!(binary_natural(&mut buf, 4, &column(), None).unwrap(), Value::Null);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_numeric_targets_refused() {
        let mut buf = ReadBuffer::new(Bytes::from_static(b"2024-01-01"));
        let err = (TABLE.text.int)(&mut buf, 10, &column(), None).unwrap_err();
        assert_eq!(err.to_string(), "Data type DATE cannot be decoded as Integer");
        assert_eq!(buf.remaining(), 0);
    }
}
