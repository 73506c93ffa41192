//! FLOAT and DOUBLE decoder.
//!
//! Binary values are little-endian IEEE-754 (4 bytes for FLOAT, 8 for
//! DOUBLE). Integral targets truncate toward zero before narrowing.

use bigdecimal::BigDecimal;
use std::str::FromStr;

use super::{
    check_unsigned, check_width, incompatible, narrow_byte, narrow_int, narrow_long, narrow_short,
    parse_decimal, parse_f32, parse_f64, read_string, Decoders, DecoderTable,
};
use crate::error::{Error, Result};
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::codec::Calendar;
use crate::protocol::types::{ColumnDefinition, ServerType, Value};

pub(super) static TABLE: DecoderTable = DecoderTable {
    text: Decoders {
        boolean: text_boolean,
        byte: text_byte,
        short: text_short,
        int: text_int,
        long: text_long,
        float: text_float,
        double: text_double,
        string: read_string,
        decimal: text_decimal,
        bytes: incompatible,
        natural: text_natural,
    },
    binary: Decoders {
        boolean: binary_boolean,
        byte: binary_byte,
        short: binary_short,
        int: binary_int,
        long: binary_long,
        float: binary_float,
        double: binary_double,
        string: binary_string,
        decimal: binary_decimal,
        bytes: incompatible,
        natural: binary_natural,
    },
};

/// Truncate toward zero; NaN and infinities have no integral value.
fn integral(value: f64, column: &ColumnDefinition) -> Result<i128> {
    if !value.is_finite() {
        return Err(Error::overflow(format!(
            "value '{}' cannot be decoded as an integer",
            value
        )));
    }
    // `as` saturates, and narrowing rejects anything beyond i64 anyway
    check_unsigned(value.trunc() as i128, column)
}

fn text_value(buf: &mut ReadBuffer, length: usize) -> Result<f64> {
    parse_f64(&buf.read_ascii(length)?)
}

fn binary_value(buf: &mut ReadBuffer, length: usize, column: &ColumnDefinition) -> Result<f64> {
    check_width(buf, length, column)?;
    match column.server_type() {
        ServerType::Float => Ok(f64::from(buf.read_f32()?)),
        ServerType::Double => buf.read_f64(),
        other => {
            buf.skip(length)?;
            Err(Error::incompatible(other, "Double"))
        }
    }
}

fn text_boolean(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<bool> {
    Ok(text_value(buf, length)? != 0.0)
}

fn text_byte(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i8> {
    narrow_byte(integral(text_value(buf, length)?, column)?)
}

fn text_short(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i16> {
    narrow_short(integral(text_value(buf, length)?, column)?)
}

fn text_int(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i32> {
    narrow_int(integral(text_value(buf, length)?, column)?)
}

fn text_long(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i64> {
    narrow_long(integral(text_value(buf, length)?, column)?)
}

fn text_float(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<f32> {
    parse_f32(&buf.read_ascii(length)?)
}

fn text_double(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<f64> {
    text_value(buf, length)
}

fn text_decimal(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<BigDecimal> {
    parse_decimal(&buf.read_ascii(length)?, "BigDecimal")
}

fn text_natural(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<Value> {
    let s = buf.read_ascii(length)?;
    match column.server_type() {
        ServerType::Float => parse_f32(&s).map(Value::Float),
        _ => parse_f64(&s).map(Value::Double),
    }
}

fn binary_boolean(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<bool> {
    Ok(binary_value(buf, length, column)? != 0.0)
}

fn binary_byte(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i8> {
    narrow_byte(integral(binary_value(buf, length, column)?, column)?)
}

fn binary_short(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i16> {
    narrow_short(integral(binary_value(buf, length, column)?, column)?)
}

fn binary_int(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i32> {
    narrow_int(integral(binary_value(buf, length, column)?, column)?)
}

fn binary_long(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i64> {
    narrow_long(integral(binary_value(buf, length, column)?, column)?)
}

fn binary_float(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<f32> {
    Ok(binary_value(buf, length, column)? as f32)
}

fn binary_double(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<f64> {
    binary_value(buf, length, column)
}

fn binary_string(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    cal: Option<&Calendar>,
) -> Result<String> {
    Ok(binary_natural(buf, length, column, cal)?.to_string())
}

fn binary_decimal(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    cal: Option<&Calendar>,
) -> Result<BigDecimal> {
    let literal = binary_string(buf, length, column, cal)?;
    BigDecimal::from_str(&literal)
        .map_err(|_| Error::overflow(format!("value '{}' cannot be decoded as BigDecimal", literal)))
}

fn binary_natural(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<Value> {
    match column.server_type() {
        ServerType::Float => Ok(Value::Float(buf.read_f32()?)),
        ServerType::Double => Ok(Value::Double(buf.read_f64()?)),
        other => {
            buf.skip(length)?;
            Err(Error::incompatible(other, "Double"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use bytes::Bytes;

    #[test]
    fn test_text_integral_truncates() {
        let col = ColumnDefinition::generated("f", ServerType::Double, 22, 0);
        let mut buf = ReadBuffer::new(Bytes::from_static(b"-12.97"));
        assert_eq!(text_int(&mut buf, 6, &col, None).unwrap(), -12);
    }

    #[test]
    fn test_binary_float_widths() {
        let col = ColumnDefinition::generated("f", ServerType::Float, 12, 0);
        let mut buf = ReadBuffer::new(Bytes::copy_from_slice(&1.5f32.to_le_bytes()));
        assert_eq!(binary_natural(&mut buf, 4, &col, None).unwrap(), Value::Float(1.5));
        assert_eq!(buf.remaining(), 0);

        let col = ColumnDefinition::generated("d", ServerType::Double, 22, 0);
        let mut buf = ReadBuffer::new(Bytes::copy_from_slice(&0.1f64.to_le_bytes()));
        assert_eq!(binary_string(&mut buf, 8, &col, None).unwrap(), "0.1");
    }

    #[test]
    fn test_non_finite_overflows() {
        let col = ColumnDefinition::generated("d", ServerType::Double, 22, 0);
        let mut buf = ReadBuffer::new(Bytes::copy_from_slice(&f64::NAN.to_le_bytes()));
        let err = binary_long(&mut buf, 8, &col, None).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Overflow));
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_negative_on_unsigned_column() {
        let col = ColumnDefinition::generated(
            "d",
            ServerType::Double,
            22,
            crate::protocol::constants::COLUMN_FLAG_UNSIGNED,
        );
        let mut buf = ReadBuffer::new(Bytes::from_static(b"-1"));
        let err = text_long(&mut buf, 2, &col, None).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Overflow));

        let mut buf = ReadBuffer::new(Bytes::copy_from_slice(&(-3.5f64).to_le_bytes()));
        let err = binary_short(&mut buf, 8, &col, None).unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Overflow));
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_binary_decimal_shortest_literal() {
        let col = ColumnDefinition::generated("d", ServerType::Double, 22, 0);
        let mut buf = ReadBuffer::new(Bytes::copy_from_slice(&2.25f64.to_le_bytes()));
        assert_eq!(
            binary_decimal(&mut buf, 8, &col, None).unwrap(),
            BigDecimal::from_str("2.25").unwrap()
        );
    }
}
