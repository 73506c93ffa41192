//! Per-type value decoders.
//!
//! Every server type belongs to a family, and every family provides a
//! `DecoderTable`: one set of decode functions for the text protocol and one
//! for the binary protocol, each with an entry per target representation.
//!
//! | Family    | Server types                                   | Module      |
//! |-----------|------------------------------------------------|-------------|
//! | Integer   | TINYINT SMALLINT MEDIUMINT INTEGER BIGINT YEAR | `integer`   |
//! | Float     | FLOAT DOUBLE                                   | `float`     |
//! | Decimal   | OLDDECIMAL DECIMAL                             | `decimal`   |
//! | Bit       | BIT                                            | `bit`       |
//! | Blob      | TINYBLOB MEDIUMBLOB LONGBLOB BLOB GEOMETRY     | `blob`      |
//! | String    | VARCHAR VARSTRING STRING JSON ENUM SET NULL    | `blob`      |
//! | Date      | DATE NEWDATE                                   | `date`      |
//! | Time      | TIME                                           | `time`      |
//! | Timestamp | TIMESTAMP DATETIME                             | `timestamp` |
//!
//! Every decoder consumes exactly `length` bytes, whether it succeeds or
//! fails. Decoders skip their payload before returning an error, and
//! [`run`] moves the cursor to the end of the value when one does not.

mod bit;
mod blob;
mod date;
mod decimal;
mod float;
mod integer;
mod time;
mod timestamp;

pub(crate) use date::{expand_year, make_date, parse_date};
pub(crate) use timestamp::{apply_calendar, parse_timestamp, read_wire_datetime};

use bigdecimal::BigDecimal;
use bytes::Bytes;
use std::fmt;
use std::str::FromStr;
use tracing::{event, Level};

use crate::error::{Error, Result};
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::codec::Calendar;
use crate::protocol::types::{ColumnDefinition, TypeFamily, Value};

/// Wire encoding of a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Values are ASCII literals (plain queries).
    Text,
    /// Values are packed native encodings (prepared statements).
    Binary,
}

/// Representation requested from a decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Decimal,
    Bytes,
    /// The column type's default representation.
    Natural,
}

impl Target {
    /// Name used in decode error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Target::Boolean => <bool as DecodeTarget>::NAME,
            Target::Byte => <i8 as DecodeTarget>::NAME,
            Target::Short => <i16 as DecodeTarget>::NAME,
            Target::Int => <i32 as DecodeTarget>::NAME,
            Target::Long => <i64 as DecodeTarget>::NAME,
            Target::Float => <f32 as DecodeTarget>::NAME,
            Target::Double => <f64 as DecodeTarget>::NAME,
            Target::String => <String as DecodeTarget>::NAME,
            Target::Decimal => <BigDecimal as DecodeTarget>::NAME,
            Target::Bytes => <Bytes as DecodeTarget>::NAME,
            Target::Natural => "Object",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rust type produced for a target, with its name for error messages.
pub trait DecodeTarget: Sized {
    const NAME: &'static str;
}

impl DecodeTarget for bool {
    const NAME: &'static str = "Boolean";
}

impl DecodeTarget for i8 {
    const NAME: &'static str = "Byte";
}

impl DecodeTarget for i16 {
    const NAME: &'static str = "Short";
}

impl DecodeTarget for i32 {
    const NAME: &'static str = "Integer";
}

impl DecodeTarget for i64 {
    const NAME: &'static str = "Long";
}

impl DecodeTarget for f32 {
    const NAME: &'static str = "Float";
}

impl DecodeTarget for f64 {
    const NAME: &'static str = "Double";
}

impl DecodeTarget for String {
    const NAME: &'static str = "String";
}

impl DecodeTarget for BigDecimal {
    const NAME: &'static str = "BigDecimal";
}

impl DecodeTarget for Bytes {
    const NAME: &'static str = "byte[]";
}

/// A decode function: reads one value of `length` bytes described by the column.
pub type DecodeFn<T> =
    fn(&mut ReadBuffer, usize, &ColumnDefinition, Option<&Calendar>) -> Result<T>;

/// Decode functions for one protocol, one per target.
pub struct Decoders {
    pub boolean: DecodeFn<bool>,
    pub byte: DecodeFn<i8>,
    pub short: DecodeFn<i16>,
    pub int: DecodeFn<i32>,
    pub long: DecodeFn<i64>,
    pub float: DecodeFn<f32>,
    pub double: DecodeFn<f64>,
    pub string: DecodeFn<String>,
    pub decimal: DecodeFn<BigDecimal>,
    pub bytes: DecodeFn<Bytes>,
    pub natural: DecodeFn<Value>,
}

/// Text and binary decoders of one family.
pub struct DecoderTable {
    pub text: Decoders,
    pub binary: Decoders,
}

impl DecoderTable {
    pub fn for_protocol(&self, protocol: Protocol) -> &Decoders {
        match protocol {
            Protocol::Text => &self.text,
            Protocol::Binary => &self.binary,
        }
    }
}

/// Decoder table of a family.
pub fn table(family: TypeFamily) -> &'static DecoderTable {
    match family {
        TypeFamily::Integer => &integer::TABLE,
        TypeFamily::Float => &float::TABLE,
        TypeFamily::Decimal => &decimal::TABLE,
        TypeFamily::Bit => &bit::TABLE,
        TypeFamily::Blob => &blob::BLOB_TABLE,
        TypeFamily::String => &blob::STRING_TABLE,
        TypeFamily::Date => &date::TABLE,
        TypeFamily::Time => &time::TABLE,
        TypeFamily::Timestamp => &timestamp::TABLE,
    }
}

/// Decoders for a column in the given protocol.
pub fn decoders(column: &ColumnDefinition, protocol: Protocol) -> &'static Decoders {
    table(column.server_type().family()).for_protocol(protocol)
}

/// Decode one value of `length` bytes into the requested target.
///
/// The cursor always ends `length` bytes after where it started, unless the
/// buffer itself is too short.
pub fn decode(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    target: Target,
    protocol: Protocol,
    calendar: Option<&Calendar>,
) -> Result<Value> {
    let d = decoders(column, protocol);
    match target {
        Target::Boolean => run(buf, length, column, target, calendar, d.boolean).map(Value::Boolean),
        Target::Byte => run(buf, length, column, target, calendar, d.byte).map(Value::Byte),
        Target::Short => run(buf, length, column, target, calendar, d.short).map(Value::Short),
        Target::Int => run(buf, length, column, target, calendar, d.int).map(Value::Int),
        Target::Long => run(buf, length, column, target, calendar, d.long).map(Value::Long),
        Target::Float => run(buf, length, column, target, calendar, d.float).map(Value::Float),
        Target::Double => run(buf, length, column, target, calendar, d.double).map(Value::Double),
        Target::String => run(buf, length, column, target, calendar, d.string).map(Value::String),
        Target::Decimal => run(buf, length, column, target, calendar, d.decimal).map(Value::Decimal),
        Target::Bytes => run(buf, length, column, target, calendar, d.bytes).map(Value::Bytes),
        Target::Natural => run(buf, length, column, target, calendar, d.natural),
    }
}

/// Run a decode function, re-aligning the cursor if it fails.
pub(crate) fn run<T>(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    target: Target,
    calendar: Option<&Calendar>,
    f: DecodeFn<T>,
) -> Result<T> {
    let start = buf.position();
    event!(
        Level::TRACE,
        server_type = %column.server_type(),
        %target,
        length,
        "decoding value"
    );
    let result = f(buf, length, column, calendar)
        .and_then(|value| check_consumed(buf, start, length).map(|()| value));
    if let Err(err) = &result {
        realign(buf, start, length);
        event!(
            Level::DEBUG,
            server_type = %column.server_type(),
            %target,
            error = %err,
            "decode failed"
        );
    }
    result
}

/// Move the cursor to the end of the value that started at `start`.
pub(crate) fn realign(buf: &mut ReadBuffer, start: usize, length: usize) {
    let end = start + length;
    if buf.position() != end && buf.set_position(end).is_err() {
        event!(Level::DEBUG, end, "value extends past the end of the packet");
    }
}

/// Fixed-width binary numbers must arrive at their exact width.
pub(crate) fn check_width(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
) -> Result<()> {
    let server_type = column.server_type();
    match server_type.binary_width() {
        Some(width) if width != length => {
            buf.skip(length)?;
            Err(Error::malformed(format!(
                "binary {} value of {} bytes, expected {}",
                server_type, length, width
            )))
        }
        _ => Ok(()),
    }
}

/// A decoder must consume exactly the announced value length.
pub(crate) fn check_consumed(buf: &ReadBuffer, start: usize, length: usize) -> Result<()> {
    let consumed = buf.position().saturating_sub(start);
    if consumed == length {
        return Ok(());
    }
    Err(Error::malformed(format!(
        "value of {} bytes was decoded from {} bytes",
        length, consumed
    )))
}

/// Skip the payload and refuse the target.
pub(crate) fn incompatible<T: DecodeTarget>(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _calendar: Option<&Calendar>,
) -> Result<T> {
    buf.skip(length)?;
    Err(Error::incompatible(column.server_type(), T::NAME))
}

/// Read the payload as a string, in either protocol.
pub(crate) fn read_string(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _calendar: Option<&Calendar>,
) -> Result<String> {
    buf.read_string(length)
}

/// Read the payload as raw bytes.
pub(crate) fn read_bytes(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _calendar: Option<&Calendar>,
) -> Result<Bytes> {
    buf.read_bytes(length)
}

/// Parse an ASCII integer literal at full width.
pub(crate) fn parse_integer(s: &str) -> Result<i128> {
    s.trim()
        .parse::<i128>()
        .map_err(|_| Error::malformed(format!("value '{}' cannot be decoded as integer", s)))
}

/// Parse an ASCII decimal literal.
pub(crate) fn parse_decimal(s: &str, target: &str) -> Result<BigDecimal> {
    BigDecimal::from_str(s.trim())
        .map_err(|_| Error::malformed(format!("value '{}' cannot be decoded as {}", s, target)))
}

pub(crate) fn parse_f32(s: &str) -> Result<f32> {
    s.trim()
        .parse::<f32>()
        .map_err(|_| Error::malformed(format!("value '{}' cannot be decoded as Float", s)))
}

pub(crate) fn parse_f64(s: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| Error::malformed(format!("value '{}' cannot be decoded as Double", s)))
}

/// Reject negative values read from an unsigned column.
pub(crate) fn check_unsigned(value: i128, column: &ColumnDefinition) -> Result<i128> {
    if value < 0 && !column.is_signed() {
        return Err(Error::overflow(format!(
            "value '{}' cannot be decoded from an unsigned column",
            value
        )));
    }
    Ok(value)
}

pub(crate) fn narrow_byte(value: i128) -> Result<i8> {
    i8::try_from(value).map_err(|_| Error::overflow("byte overflow"))
}

pub(crate) fn narrow_short(value: i128) -> Result<i16> {
    i16::try_from(value).map_err(|_| Error::overflow("Short overflow"))
}

pub(crate) fn narrow_int(value: i128) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::overflow("integer overflow"))
}

pub(crate) fn narrow_long(value: i128) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| Error::overflow(format!("value '{}' cannot be decoded as Long", value)))
}

/// Truncate a decimal toward zero and convert it exactly to i64.
pub(crate) fn decimal_to_long(value: &BigDecimal, literal: &str) -> Result<i64> {
    use bigdecimal::ToPrimitive;

    value
        .with_scale(0)
        .to_i64()
        .ok_or_else(|| Error::inexact(format!("value '{}' cannot be decoded as Long", literal)))
}

/// Smallest natural representation of an integer: Int, then Long, then Decimal.
pub(crate) fn natural_integer(value: i128) -> Value {
    if let Ok(v) = i32::try_from(value) {
        Value::Int(v)
    } else if let Ok(v) = i64::try_from(value) {
        Value::Long(v)
    } else {
        Value::Decimal(BigDecimal::new(value.into(), 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use crate::protocol::types::ServerType;

    #[test]
    fn test_narrowing() {
        assert_eq!(narrow_byte(127).unwrap(), 127);
        assert!(narrow_byte(128).is_err());
        assert_eq!(narrow_short(-32768).unwrap(), i16::MIN);
        assert!(narrow_int(i64::MAX as i128).is_err());
        assert_eq!(
            narrow_long(u64::MAX as i128).unwrap_err().decode_kind(),
            Some(DecodeErrorKind::Overflow)
        );
    }

    #[test]
    fn test_decimal_to_long_truncates_toward_zero() {
        let d = BigDecimal::from_str("12.97").unwrap();
        assert_eq!(decimal_to_long(&d, "12.97").unwrap(), 12);
        let d = BigDecimal::from_str("-12.97").unwrap();
        assert_eq!(decimal_to_long(&d, "-12.97").unwrap(), -12);
        let d = BigDecimal::from_str("99999999999999999999").unwrap();
        assert_eq!(
            decimal_to_long(&d, "99999999999999999999").unwrap_err().decode_kind(),
            Some(DecodeErrorKind::Inexact)
        );
    }

    #[test]
    fn test_natural_integer_widths() {
        assert_eq!(natural_integer(5), Value::Int(5));
        assert_eq!(natural_integer(1 << 40), Value::Long(1 << 40));
        assert!(matches!(natural_integer(u64::MAX as i128), Value::Decimal(_)));
    }

    #[test]
    fn test_incompatible_skips_payload() {
        let col = ColumnDefinition::generated("d", ServerType::Date, 10, 0);
        let mut buf = ReadBuffer::new(Bytes::from_static(b"2024-01-01"));
        let err = incompatible::<i32>(&mut buf, 10, &col, None).unwrap_err();
        assert_eq!(err.to_string(), "Data type DATE cannot be decoded as Integer");
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_run_realigns_on_error() {
        fn failing(
            buf: &mut ReadBuffer,
            _length: usize,
            _column: &ColumnDefinition,
            _calendar: Option<&Calendar>,
        ) -> Result<i32> {
            buf.skip(1)?;
            Err(Error::malformed("bad"))
        }
        let col = ColumnDefinition::generated("c", ServerType::Integer, 11, 0);
        let mut buf = ReadBuffer::new(Bytes::from_static(b"abcdef"));
        assert!(run(&mut buf, 4, &col, Target::Int, None, failing).is_err());
        assert_eq!(buf.position(), 4);
    }

    #[test]
    fn test_target_names() {
        assert_eq!(Target::Int.to_string(), "Integer");
        assert_eq!(Target::Decimal.name(), "BigDecimal");
    }
}
