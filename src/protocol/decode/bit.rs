//! BIT decoder.
//!
//! BIT(n) values are sent as ceil(n / 8) big-endian bytes in both protocols.

use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, ToPrimitive};
use bytes::Bytes;

use super::{incompatible, narrow_int, narrow_short, read_bytes, Decoders, DecoderTable};
use crate::error::{Error, Result};
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::codec::Calendar;
use crate::protocol::types::{ColumnDefinition, Value};

const DECODERS: Decoders = Decoders {
    boolean: decode_boolean,
    byte: decode_byte,
    short: decode_short,
    int: decode_int,
    long: decode_long,
    float: incompatible,
    double: incompatible,
    string: decode_string,
    decimal: decode_decimal,
    bytes: read_bytes,
    natural: decode_natural,
};

pub(super) static TABLE: DecoderTable = DecoderTable {
    text: DECODERS,
    binary: DECODERS,
};

fn read_value(buf: &mut ReadBuffer, length: usize) -> Result<BigInt> {
    let bytes = buf.read_bytes(length)?;
    Ok(BigInt::from_bytes_be(Sign::Plus, &bytes))
}

fn to_long(value: &BigInt) -> Result<i64> {
    value
        .to_i64()
        .ok_or_else(|| Error::overflow(format!("value '{}' cannot be decoded as Long", value)))
}

/// Render bits as a `b'...'` literal without leading zero bits.
fn bit_literal(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 8 + 3);
    s.push_str("b'");
    let mut seen_one = false;
    for byte in bytes {
        for shift in (0..8).rev() {
            if *byte & (1u8 << shift) != 0 {
                s.push('1');
                seen_one = true;
            } else if seen_one {
                s.push('0');
            }
        }
    }
    s.push('\'');
    s
}

fn decode_boolean(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<bool> {
    Ok(buf.read_bytes(length)?.iter().any(|b| *b != 0))
}

fn decode_byte(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i8> {
    let value = read_value(buf, length)?;
    match value.to_u8() {
        // bit pattern, not magnitude: b'11111111' is -1
        Some(v) => Ok(v as i8),
        None => Err(Error::overflow("byte overflow")),
    }
}

fn decode_short(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i16> {
    let value = read_value(buf, length)?;
    let long = value.to_i64().ok_or_else(|| Error::overflow("Short overflow"))?;
    narrow_short(long.into())
}

fn decode_int(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i32> {
    let value = read_value(buf, length)?;
    let long = value.to_i64().ok_or_else(|| Error::overflow("integer overflow"))?;
    narrow_int(long.into())
}

fn decode_long(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i64> {
    to_long(&read_value(buf, length)?)
}

fn decode_string(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<String> {
    Ok(bit_literal(&buf.read_bytes(length)?))
}

fn decode_decimal(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<BigDecimal> {
    Ok(BigDecimal::new(read_value(buf, length)?, 0))
}

fn decode_natural(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<Value> {
    let bytes: Bytes = buf.read_bytes(length)?;
    if column.column_length() == 1 {
        return Ok(Value::Boolean(bytes.iter().any(|b| *b != 0)));
    }
    Ok(Value::Bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use crate::protocol::types::ServerType;

    fn column(bits: u32) -> ColumnDefinition {
        ColumnDefinition::generated("b", ServerType::Bit, bits, 0)
    }

    #[test]
    fn test_bit_literal_suppresses_leading_zeros() {
        assert_eq!(bit_literal(&[0b0000_1010]), "b'1010'");
        assert_eq!(bit_literal(&[0x00, 0x81]), "b'10000001'");
        assert_eq!(bit_literal(&[0x01, 0x00]), "b'100000000'");
    }

    #[test]
    fn test_long_is_big_endian() {
        let col = column(16);
        let mut buf = ReadBuffer::new(Bytes::from_static(&[0x01, 0x02]));
        assert_eq!(decode_long(&mut buf, 2, &col, None).unwrap(), 0x0102);
    }

    #[test]
    fn test_long_exceeding_i64() {
        let col = column(64);
        let mut buf = ReadBuffer::new(Bytes::from_static(&[0xff; 8]));
        let err = decode_long(&mut buf, 8, &col, None).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Overflow));
        assert_eq!(buf.remaining(), 0);

        let mut buf = ReadBuffer::new(Bytes::from_static(&[0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]));
        assert_eq!(decode_long(&mut buf, 8, &col, None).unwrap(), i64::MAX);
    }

    #[test]
    fn test_byte_accepts_full_pattern() {
        let col = column(8);
        let mut buf = ReadBuffer::new(Bytes::from_static(&[0xff, 0x01, 0x00]));
        assert_eq!(decode_byte(&mut buf, 1, &col, None).unwrap(), -1);
        let err = decode_byte(&mut buf, 2, &col, None).unwrap_err();
        assert_eq!(err.to_string(), "byte overflow");
    }

    #[test]
    fn test_short_overflow() {
        let col = column(16);
        let mut buf = ReadBuffer::new(Bytes::from_static(&[0x80, 0x00]));
        let err = decode_short(&mut buf, 2, &col, None).unwrap_err();
        assert_eq!(err.to_string(), "Short overflow");
    }

    #[test]
    fn test_natural() {
        let mut buf = ReadBuffer::new(Bytes::from_static(&[0x01, 0x00, 0x05]));
        assert_eq!(
            decode_natural(&mut buf, 1, &column(1), None).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            decode_natural(&mut buf, 2, &column(12), None).unwrap(),
            Value::Bytes(Bytes::from_static(&[0x00, 0x05]))
        );
    }

    #[test]
    fn test_float_refused() {
        let col = column(8);
        let mut buf = ReadBuffer::new(Bytes::from_static(&[0x01]));
        let err = incompatible::<f32>(&mut buf, 1, &col, None).unwrap_err();
        assert_eq!(err.to_string(), "Data type BIT cannot be decoded as Float");
        assert_eq!(buf.remaining(), 0);
    }
}
