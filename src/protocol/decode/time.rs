//! TIME decoder.
//!
//! TIME is a signed duration, not a time of day, so it is only decoded to
//! strings. Binary layout (length-prefixed, trailing groups omitted when
//! zero):
//! - length 0: `00:00:00`
//! - byte[0]: 1 when negative
//! - length >= 5: bytes[1..5]: days (little-endian)
//! - length >= 8: byte[5]: hours, byte[6]: minutes, byte[7]: seconds
//! - length >= 12: bytes[8..12]: microseconds (little-endian)

use super::timestamp::{format_fraction, zero_with_fraction};
use super::{incompatible, read_string, Decoders, DecoderTable};
use crate::error::{Error, Result};
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::codec::Calendar;
use crate::protocol::constants::ZERO_TIME;
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

fn text_natural(
    buf: &mut ReadBuffer,
    length: usize,
    _column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<Value> {
    buf.read_string(length).map(Value::String)
}

fn binary_string(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    _cal: Option<&Calendar>,
) -> Result<String> {
    if length == 0 {
        return Ok(zero_with_fraction(ZERO_TIME, column.decimals()));
    }
    if length < 5 {
        buf.skip(length)?;
        return Err(Error::malformed(format!(
            "binary time value of {} bytes is too short",
            length
        )));
    }
    let negative = buf.read_u8()? == 1;
    let days = u64::from(buf.read_u32()?);
    let (mut hours, mut minutes, mut seconds, mut micros) = (0u8, 0u8, 0u8, 0u32);
    let mut consumed = 5;
    if length >= 8 {
        hours = buf.read_u8()?;
        minutes = buf.read_u8()?;
        seconds = buf.read_u8()?;
        consumed = 8;
        if length >= 12 {
            micros = buf.read_u32()?;
            consumed = 12;
        }
    }
    buf.skip(length - consumed)?;

    let total_hours = days * 24 + u64::from(hours);
    Ok(format!(
        "{}{:02}:{:02}:{:02}{}",
        if negative { "-" } else { "" },
        total_hours,
        minutes,
        seconds,
        format_fraction(micros, column.decimals())
    ))
}

fn binary_natural(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    cal: Option<&Calendar>,
) -> Result<Value> {
    binary_string(buf, length, column, cal).map(Value::String)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::ServerType;
    use bytes::Bytes;

    fn column(decimals: u8) -> ColumnDefinition {
        ColumnDefinition::generated("t", ServerType::Time, 10, 0).with_decimals(decimals)
    }

    #[test]
    fn test_zero_length() {
        let mut buf = ReadBuffer::new(Bytes::new());
        assert_eq!(binary_string(&mut buf, 0, &column(0), None).unwrap(), "00:00:00");
        assert_eq!(binary_string(&mut buf, 0, &column(3), None).unwrap(), "00:00:00.000");
    }

    #[test]
    fn test_days_fold_into_hours() {
        let mut buf = ReadBuffer::new(Bytes::from_static(&[
            0x01, // negative
            0x02, 0x00, 0x00, 0x00, // 2 days
            0x03, 0x04, 0x05, // 03:04:05
        ]));
        assert_eq!(binary_string(&mut buf, 8, &column(0), None).unwrap(), "-51:04:05");
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_fraction() {
        let mut buf = ReadBuffer::new(Bytes::from_static(&[
            0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x40, 0xe2, 0x01, 0x00,
        ]));
        assert_eq!(
            binary_natural(&mut buf, 12, &column(3), None).unwrap(),
            Value::String("01:02:03.123".to_string())
        );
    }

    #[test]
    fn test_incomplete_groups() {
        let mut buf = ReadBuffer::new(Bytes::from_static(&[
            0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04, // 9 bytes: fraction incomplete
            0x00, 0x00, 0x00, // 3 bytes: too short
        ]));
        assert_eq!(binary_string(&mut buf, 9, &column(0), None).unwrap(), "01:02:03");
        assert_eq!(buf.position(), 9);
        let err = binary_string(&mut buf, 3, &column(0), None).unwrap_err();
        assert_eq!(err.decode_kind(), Some(crate::error::DecodeErrorKind::Malformed));
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_numeric_refused() {
        let mut buf = ReadBuffer::new(Bytes::from_static(b"10:00:00"));
        let err = (TABLE.text.long)(&mut buf, 8, &column(0), None).unwrap_err();
        assert_eq!(err.to_string(), "Data type TIME cannot be decoded as Long");
        assert_eq!(buf.remaining(), 0);
    }
}
