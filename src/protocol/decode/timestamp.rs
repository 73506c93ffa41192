//! TIMESTAMP and DATETIME decoder.
//!
//! Binary layout (length-prefixed, trailing groups omitted when zero):
//! - length 0: the zero date-time
//! - length >= 4: bytes[0..2]: year (little-endian), byte[2]: month, byte[3]: day
//! - length >= 7: byte[4]: hour, byte[5]: minute, byte[6]: second
//! - length >= 11: bytes[7..11]: microseconds (little-endian)

use chrono::{NaiveDate, NaiveDateTime, TimeZone};

use super::date::make_date;
use super::{incompatible, read_string, Decoders, DecoderTable};
use crate::error::{Error, Result};
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::codec::Calendar;
use crate::protocol::constants::{MAX_MICROSECOND_DIGITS, ZERO_DATETIME};
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

/// Fields of a binary DATE/DATETIME/TIMESTAMP value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct WireDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub micros: u32,
}

impl WireDateTime {
    pub fn is_zero_date(&self) -> bool {
        self.year == 0 && self.month == 0 && self.day == 0
    }

    /// Calendar date, `None` for the zero date.
    pub fn date(&self) -> Result<Option<NaiveDate>> {
        make_date(self.year.into(), self.month.into(), self.day.into())
    }

    /// Date-time, `None` for the zero date.
    pub fn datetime(&self) -> Result<Option<NaiveDateTime>> {
        let Some(date) = self.date()? else {
            return Ok(None);
        };
        date.and_hms_micro_opt(
            self.hour.into(),
            self.minute.into(),
            self.second.into(),
            self.micros,
        )
        .map(Some)
        .ok_or_else(|| {
            Error::malformed(format!(
                "value '{:02}:{:02}:{:02}.{:06}' cannot be decoded as Timestamp",
                self.hour, self.minute, self.second, self.micros
            ))
        })
    }
}

/// Read a binary date-time of `length` bytes, consuming all of them.
///
/// A field group is read only when it fits entirely inside `length`.
/// Values shorter than the date group are malformed.
pub(crate) fn read_wire_datetime(buf: &mut ReadBuffer, length: usize) -> Result<WireDateTime> {
    let mut wire = WireDateTime::default();
    if length == 0 {
        return Ok(wire);
    }
    if length < 4 {
        buf.skip(length)?;
        return Err(Error::malformed(format!(
            "binary date value of {} bytes is too short",
            length
        )));
    }
    wire.year = buf.read_u16()?;
    wire.month = buf.read_u8()?;
    wire.day = buf.read_u8()?;
    let mut consumed = 4;
    if length >= 7 {
        wire.hour = buf.read_u8()?;
        wire.minute = buf.read_u8()?;
        wire.second = buf.read_u8()?;
        consumed = 7;
        if length >= 11 {
            wire.micros = buf.read_u32()?;
            consumed = 11;
        }
    }
    buf.skip(length - consumed)?;
    Ok(wire)
}

/// Fractional-second suffix (`.ffffff`), truncated to `decimals` digits.
///
/// Columns declared without decimals still show all six digits when the
/// value has a fraction.
pub(crate) fn format_fraction(micros: u32, decimals: u8) -> String {
    if decimals == 0 && micros == 0 {
        return String::new();
    }
    let digits = match decimals {
        0 => MAX_MICROSECOND_DIGITS,
        d => d.min(MAX_MICROSECOND_DIGITS),
    };
    let full = format!("{:06}", micros);
    format!(".{}", &full[..digits as usize])
}

/// Zero sentinel followed by `decimals` zero digits.
pub(crate) fn zero_with_fraction(zero: &str, decimals: u8) -> String {
    let digits = decimals.min(MAX_MICROSECOND_DIGITS) as usize;
    if digits == 0 {
        return zero.to_string();
    }
    format!("{}.{}", zero, "0".repeat(digits))
}

fn parse_time_of_day(t: &str) -> Option<(u32, u32, u32, u32)> {
    let mut parts = t.splitn(3, ':');
    let hour = parts.next()?.parse().ok()?;
    let minute = parts.next()?.parse().ok()?;
    let rest = parts.next()?;
    let (second, fraction) = rest.split_once('.').unwrap_or((rest, ""));
    let second = second.parse().ok()?;
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut digits: String = fraction.chars().take(MAX_MICROSECOND_DIGITS as usize).collect();
    while digits.len() < MAX_MICROSECOND_DIGITS as usize {
        digits.push('0');
    }
    let micros = digits.parse().ok()?;
    Some((hour, minute, second, micros))
}

/// Parse a `YYYY-MM-DD[ HH:MM:SS[.ffffff]]` literal.
///
/// Returns `Ok(None)` for the zero date.
pub(crate) fn parse_timestamp(s: &str) -> Result<Option<NaiveDateTime>> {
    let malformed = || Error::malformed(format!("value '{}' cannot be decoded as Timestamp", s));
    let trimmed = s.trim();
    let (date_part, time_part) = match trimmed.split_once(|c| c == ' ' || c == 'T') {
        Some((d, t)) => (d, Some(t)),
        None => (trimmed, None),
    };
    let Some(date) = super::parse_date(date_part)? else {
        return Ok(None);
    };
    let (hour, minute, second, micros) = match time_part {
        Some(t) => parse_time_of_day(t.trim()).ok_or_else(malformed)?,
        None => (0, 0, 0, 0),
    };
    date.and_hms_micro_opt(hour, minute, second, micros)
        .map(Some)
        .ok_or_else(malformed)
}

/// Reinterpret a wall-clock value read in `calendar`'s offset as UTC.
///
/// Without a calendar the value is returned as sent.
pub(crate) fn apply_calendar(value: NaiveDateTime, calendar: Option<&Calendar>) -> NaiveDateTime {
    match calendar.and_then(|cal| cal.from_local_datetime(&value).single()) {
        Some(dt) => dt.naive_utc(),
        None => value,
    }
}

fn text_natural(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    cal: Option<&Calendar>,
) -> Result<Value> {
    let s = buf.read_ascii(length)?;
    Ok(match parse_timestamp(&s)? {
        Some(dt) => Value::DateTime(apply_calendar(dt, cal)),
        None => Value::Null,
    })
}

fn binary_string(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<String> {
    let wire = read_wire_datetime(buf, length)?;
    if wire.is_zero_date() {
        return Ok(zero_with_fraction(ZERO_DATETIME, column.decimals()));
    }
    Ok(format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}{}",
        wire.year,
        wire.month,
        wire.day,
        wire.hour,
        wire.minute,
        wire.second,
        format_fraction(wire.micros, column.decimals())
    ))
}

fn binary_natural(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    cal: Option<&Calendar>,
) -> Result<Value> {
    let wire = read_wire_datetime(buf, length)?;
    Ok(match wire.datetime()? {
        Some(dt) => Value::DateTime(apply_calendar(dt, cal)),
        None => Value::Null,
    })
}
