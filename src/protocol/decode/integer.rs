//! Integer family decoder (TINYINT, SMALLINT, MEDIUMINT, INTEGER, BIGINT, YEAR).
//!
//! Both protocols first produce the full-width value as an `i128`, then
//! narrow it to the requested target. Binary widths:
//!
//! | Type      | Bytes | Notes                      |
//! |-----------|-------|----------------------------|
//! | TINYINT   | 1     |                            |
//! | SMALLINT  | 2     | also YEAR                  |
//! | MEDIUMINT | 4     | 3 significant, 1 padding   |
//! | INTEGER   | 4     |                            |
//! | BIGINT    | 8     |                            |

use bigdecimal::BigDecimal;

use super::{
    check_unsigned, check_width, incompatible, narrow_byte, narrow_int, narrow_long,
    narrow_short, natural_integer, parse_decimal, parse_f32, parse_f64, parse_integer,
    read_string, Decoders, DecoderTable,
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

fn text_value(buf: &mut ReadBuffer, length: usize, column: &ColumnDefinition) -> Result<i128> {
    let s = buf.read_ascii(length)?;
    check_unsigned(parse_integer(&s)?, column)
}

/// Read a binary integer at the column's declared width and signedness.
fn binary_value(buf: &mut ReadBuffer, length: usize, column: &ColumnDefinition) -> Result<i128> {
    check_width(buf, length, column)?;
    let signed = column.is_signed();
    let value = match column.server_type() {
        ServerType::TinyInt if signed => i128::from(buf.read_i8()?),
        ServerType::TinyInt => i128::from(buf.read_u8()?),
        ServerType::SmallInt | ServerType::Year if signed => i128::from(buf.read_i16()?),
        ServerType::SmallInt | ServerType::Year => i128::from(buf.read_u16()?),
        ServerType::MediumInt => {
            let v = if signed {
                i128::from(buf.read_i24()?)
            } else {
                i128::from(buf.read_u24()?)
            };
            buf.skip(1)?;
            v
        }
        ServerType::Integer if signed => i128::from(buf.read_i32()?),
        ServerType::Integer => i128::from(buf.read_u32()?),
        ServerType::BigInt if signed => i128::from(buf.read_i64()?),
        ServerType::BigInt => i128::from(buf.read_u64()?),
        other => {
            buf.skip(length)?;
            return Err(Error::incompatible(other, "Integer"));
        }
    };
    Ok(value)
}

fn text_boolean(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<bool> {
    Ok(buf.read_ascii(length)? != "0")
}

fn text_byte(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i8> {
    narrow_byte(text_value(buf, length, column)?)
}

fn text_short(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i16> {
    narrow_short(text_value(buf, length, column)?)
}

fn text_int(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i32> {
    narrow_int(text_value(buf, length, column)?)
}

fn text_long(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i64> {
    narrow_long(text_value(buf, length, column)?)
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
    parse_f64(&buf.read_ascii(length)?)
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
    Ok(natural_integer(text_value(buf, length, column)?))
}

fn binary_boolean(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<bool> {
    Ok(binary_value(buf, length, column)? != 0)
}

fn binary_byte(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i8> {
    narrow_byte(binary_value(buf, length, column)?)
}

fn binary_short(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i16> {
    narrow_short(binary_value(buf, length, column)?)
}

fn binary_int(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i32> {
    narrow_int(binary_value(buf, length, column)?)
}

fn binary_long(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i64> {
    narrow_long(binary_value(buf, length, column)?)
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
    Ok(binary_value(buf, length, column)? as f64)
}

fn binary_string(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<String> {
    Ok(binary_value(buf, length, column)?.to_string())
}

fn binary_decimal(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<BigDecimal> {
    Ok(BigDecimal::new(binary_value(buf, length, column)?.into(), 0))
}

fn binary_natural(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<Value> {
    Ok(natural_integer(binary_value(buf, length, column)?))
}
