//! DECIMAL decoder.
//!
//! DECIMAL values are ASCII literals in both protocols. Integral targets
//! truncate toward zero and must then fit the target exactly.

use bigdecimal::{BigDecimal, Zero};

use super::{
    check_unsigned, decimal_to_long, incompatible, narrow_byte, narrow_int, narrow_long,
    narrow_short, parse_decimal, parse_f32, parse_f64, read_string, Decoders, DecoderTable,
};
use crate::error::Result;
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::codec::Calendar;
use crate::protocol::types::{ColumnDefinition, Value};

const DECODERS: Decoders = Decoders {
    boolean: decode_boolean,
    byte: decode_byte,
    short: decode_short,
    int: decode_int,
    long: decode_long,
    float: decode_float,
    double: decode_double,
    string: read_string,
    decimal: decode_decimal,
    bytes: incompatible,
    natural: decode_natural,
};

pub(super) static TABLE: DecoderTable = DecoderTable {
    text: DECODERS,
    binary: DECODERS,
};

/// Read the literal and its truncated integral value.
fn read_long(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    target: &str,
) -> Result<i128> {
    let literal = buf.read_ascii(length)?;
    let value = parse_decimal(&literal, target)?;
    check_unsigned(decimal_to_long(&value, &literal)?.into(), column)
}

fn decode_boolean(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<bool> {
    let value = parse_decimal(&buf.read_ascii(length)?, "Boolean")?;
    Ok(!value.with_scale(0).is_zero())
}

fn decode_byte(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i8> {
    narrow_byte(read_long(buf, length, column, "Byte")?)
}

fn decode_short(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i16> {
    narrow_short(read_long(buf, length, column, "Short")?)
}

fn decode_int(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i32> {
    narrow_int(read_long(buf, length, column, "Integer")?)
}

fn decode_long(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i64> {
    narrow_long(read_long(buf, length, column, "Long")?)
}

fn decode_float(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<f32> {
    parse_f32(&buf.read_ascii(length)?)
}

fn decode_double(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<f64> {
    parse_f64(&buf.read_ascii(length)?)
}

fn decode_decimal(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<BigDecimal> {
    parse_decimal(&buf.read_ascii(length)?, "BigDecimal")
}

fn decode_natural(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    cal: Option<&Calendar>,
) -> Result<Value> {
    decode_decimal(buf, length, column, cal).map(Value::Decimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use crate::protocol::types::ServerType;
    use bytes::Bytes;

    fn column() -> ColumnDefinition {
        ColumnDefinition::generated("d", ServerType::Decimal, 10, 0)
    }

    #[test]
    fn test_integral_truncates_toward_zero() {
        let col = column();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"12.97-12.97"));
        assert_eq!(decode_long(&mut buf, 5, &col, None).unwrap(), 12);
        assert_eq!(decode_int(&mut buf, 6, &col, None).unwrap(), -12);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_boolean_uses_truncated_value() {
        let col = column();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"0.501.00"));
        assert!(!decode_boolean(&mut buf, 4, &col, None).unwrap());
        assert!(decode_boolean(&mut buf, 4, &col, None).unwrap());
    }

    #[test]
    fn test_byte_overflow() {
        let col = column();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"300.1"));
        let err = decode_byte(&mut buf, 5, &col, None).unwrap_err();
        assert_eq!(err.to_string(), "byte overflow");
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_negative_on_unsigned_column() {
        let col = ColumnDefinition::generated(
            "d",
            ServerType::Decimal,
            10,
            crate::protocol::constants::COLUMN_FLAG_UNSIGNED,
        );
        let mut buf = ReadBuffer::new(Bytes::from_static(b"-1-0.5"));
        let err = decode_int(&mut buf, 2, &col, None).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Overflow));
        assert_eq!(buf.position(), 2);
        // truncates to zero first
        assert_eq!(decode_long(&mut buf, 4, &col, None).unwrap(), 0);
    }

    #[test]
    fn test_long_beyond_i64_is_inexact() {
        let col = column();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"99999999999999999999.5"));
        let err = decode_long(&mut buf, 22, &col, None).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Inexact));
    }

    #[test]
    fn test_malformed_literal() {
        let col = column();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"1.2.3"));
        let err = decode_short(&mut buf, 5, &col, None).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Malformed));
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_natural_keeps_scale() {
        let col = column();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"10.50"));
        match decode_natural(&mut buf, 5, &col, None).unwrap() {
            Value::Decimal(d) => assert_eq!(d.to_string(), "10.50"),
            other => panic!("Expected Decimal, got {:?}", other),
        }
    }
}
