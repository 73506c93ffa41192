//! BLOB/TEXT and character-string decoders.
//!
//! Both families are length-prefixed byte strings in either protocol. What
//! the bytes mean depends on the column charset: with the binary charset the
//! payload is opaque and only byte, string and bytes targets are served;
//! otherwise the payload is text and numeric targets parse it.
//!
//! The BLOB family never decodes to Short. The character-string family
//! (VARCHAR, CHAR, JSON, ENUM, SET) does.

use bigdecimal::BigDecimal;

use super::{
    check_unsigned, decimal_to_long, narrow_byte, narrow_int, narrow_long, narrow_short,
    parse_decimal, parse_f32, parse_f64, read_bytes, read_string, DecodeTarget, Decoders,
    DecoderTable,
};
use crate::error::{Error, Result};
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::codec::Calendar;
use crate::protocol::types::{ColumnDefinition, Value};

const BLOB_DECODERS: Decoders = Decoders {
    boolean: decode_boolean,
    byte: decode_byte,
    short: super::incompatible,
    int: decode_int,
    long: decode_long,
    float: decode_float,
    double: decode_double,
    string: read_string,
    decimal: decode_decimal,
    bytes: read_bytes,
    natural: decode_natural,
};

const STRING_DECODERS: Decoders = Decoders {
    short: decode_short,
    ..BLOB_DECODERS
};

pub(super) static BLOB_TABLE: DecoderTable = DecoderTable {
    text: Decoders {
        long: text_long,
        ..BLOB_DECODERS
    },
    binary: BLOB_DECODERS,
};

pub(super) static STRING_TABLE: DecoderTable = DecoderTable {
    text: Decoders {
        long: text_long,
        ..STRING_DECODERS
    },
    binary: STRING_DECODERS,
};

/// Read the payload as text, refusing binary-charset columns.
fn read_text<T: DecodeTarget>(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
) -> Result<String> {
    if column.is_binary() {
        buf.skip(length)?;
        return Err(Error::incompatible(column.server_type(), T::NAME));
    }
    buf.read_string(length)
}

/// Parse a text payload as a number truncated toward zero.
fn text_integral<T: DecodeTarget>(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
) -> Result<i64> {
    let literal = read_text::<T>(buf, length, column)?;
    let value = decimal_to_long(&parse_decimal(&literal, T::NAME)?, &literal)?;
    check_unsigned(value.into(), column)?;
    Ok(value)
}

fn decode_boolean(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<bool> {
    Ok(read_text::<bool>(buf, length, column)? != "0")
}

fn decode_byte(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i8> {
    if !column.is_binary() {
        return narrow_byte(text_integral::<i8>(buf, length, column)?.into());
    }
    if length == 0 {
        return Err(Error::malformed("empty String value cannot be decoded as Byte"));
    }
    let first = buf.read_i8()?;
    buf.skip(length - 1)?;
    Ok(first)
}

fn decode_short(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i16> {
    narrow_short(text_integral::<i16>(buf, length, column)?.into())
}

fn decode_int(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i32> {
    narrow_int(text_integral::<i32>(buf, length, column)?.into())
}

fn decode_long(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i64> {
    text_integral::<i64>(buf, length, column)
}

/// Text-protocol Long takes an exact integer literal; fractions are malformed.
fn text_long(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<i64> {
    let literal = read_text::<i64>(buf, length, column)?;
    let value = literal
        .trim()
        .parse::<i128>()
        .map_err(|_| Error::malformed(format!("value '{}' cannot be decoded as Long", literal)))?;
    narrow_long(check_unsigned(value, column)?)
}

fn decode_float(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<f32> {
    parse_f32(&read_text::<f32>(buf, length, column)?)
}

fn decode_double(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<f64> {
    parse_f64(&read_text::<f64>(buf, length, column)?)
}

fn decode_decimal(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<BigDecimal> {
    parse_decimal(&read_text::<BigDecimal>(buf, length, column)?, "BigDecimal")
}

fn decode_natural(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<Value> {
    if column.is_binary() {
        return buf.read_bytes(length).map(Value::Bytes);
    }
    buf.read_string(length).map(Value::String)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use crate::protocol::buffer::WriteBuffer;
    use crate::protocol::constants::{BINARY_CHARSET, COLUMN_FLAG_BINARY, COLUMN_FLAG_BLOB};
    use crate::protocol::types::ServerType;
    use bytes::Bytes;

    fn text_blob() -> ColumnDefinition {
        ColumnDefinition::generated("t", ServerType::Blob, 65535, COLUMN_FLAG_BLOB)
    }

    fn binary_blob() -> ColumnDefinition {
        ColumnDefinition::generated("b", ServerType::Blob, 65535, COLUMN_FLAG_BLOB | COLUMN_FLAG_BINARY)
            .with_charset(BINARY_CHARSET)
    }

    #[test]
    fn test_binary_blob_refuses_numbers() {
        let col = binary_blob();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"1234"));
        let err = decode_int(&mut buf, 4, &col, None).unwrap_err();
        assert_eq!(err.to_string(), "Data type BLOB cannot be decoded as Integer");
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Incompatible));
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_binary_blob_byte_is_first_raw_byte() {
        let col = binary_blob();
        let mut buf = ReadBuffer::new(Bytes::from_static(&[0xfe, 0x01, 0x02]));
        assert_eq!(decode_byte(&mut buf, 3, &col, None).unwrap(), -2);
        assert_eq!(buf.remaining(), 0);

        let err = decode_byte(&mut buf, 0, &col, None).unwrap_err();
        assert_eq!(err.to_string(), "empty String value cannot be decoded as Byte");
    }

    #[test]
    fn test_text_blob_parses_numbers() {
        let col = text_blob();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"42.9-7"));
        assert_eq!(decode_int(&mut buf, 4, &col, None).unwrap(), 42);
        assert_eq!(decode_long(&mut buf, 2, &col, None).unwrap(), -7);
    }

    #[test]
    fn test_text_long_rejects_fraction() {
        let col = text_blob();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"12.512.5 -40"));
        let err = (BLOB_TABLE.text.long)(&mut buf, 4, &col, None).unwrap_err();
        assert_eq!(err.to_string(), "value '12.5' cannot be decoded as Long");
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Malformed));
        assert_eq!(buf.position(), 4);
        // the binary protocol truncates
        assert_eq!((BLOB_TABLE.binary.long)(&mut buf, 4, &col, None).unwrap(), 12);
        assert_eq!((STRING_TABLE.text.long)(&mut buf, 4, &col, None).unwrap(), -40);
    }

    #[test]
    fn test_text_blob_byte_overflow() {
        let col = text_blob();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"200"));
        let err = decode_byte(&mut buf, 3, &col, None).unwrap_err();
        assert_eq!(err.to_string(), "byte overflow");
    }

    #[test]
    fn test_short_only_for_string_family() {
        let blob = text_blob();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"123123"));
        let err = (BLOB_TABLE.text.short)(&mut buf, 3, &blob, None).unwrap_err();
        assert_eq!(err.to_string(), "Data type BLOB cannot be decoded as Short");
        assert_eq!(buf.position(), 3);

        let varchar = ColumnDefinition::generated("v", ServerType::VarString, 30, 0);
        assert_eq!((STRING_TABLE.text.short)(&mut buf, 3, &varchar, None).unwrap(), 123);
    }

    #[test]
    fn test_natural_depends_on_charset() {
        let mut w = WriteBuffer::new();
        w.write_ascii("abcabc");
        let mut buf = ReadBuffer::new(w.freeze());
        assert_eq!(
            decode_natural(&mut buf, 3, &text_blob(), None).unwrap(),
            Value::String("abc".to_string())
        );
        assert_eq!(
            decode_natural(&mut buf, 3, &binary_blob(), None).unwrap(),
            Value::Bytes(Bytes::from_static(b"abc"))
        );
    }
}
