use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

use super::{parse_year, read_wire_year, refuse, Calendar, Codec};
use crate::error::Result;
use crate::protocol::buffer::{ReadBuffer, WriteBuffer};
use crate::protocol::decode::{
    apply_calendar, expand_year, make_date, parse_date, parse_timestamp, read_wire_datetime,
};
use crate::protocol::types::{ColumnDefinition, ServerType};

const COMPATIBLE: &[ServerType] = &[
    ServerType::Date,
    ServerType::NewDate,
    ServerType::DateTime,
    ServerType::Timestamp,
    ServerType::Year,
    ServerType::VarString,
    ServerType::VarChar,
    ServerType::String,
    ServerType::Blob,
    ServerType::TinyBlob,
    ServerType::MediumBlob,
    ServerType::LongBlob,
];

const TYPE_NAME: &str = "DateTime";

/// Date-time codec.
///
/// DATETIME and TIMESTAMP values are read as wall-clock time in the
/// calendar's offset and returned in UTC; encoding does the reverse.
/// Values from DATE, YEAR and character columns are returned as sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeCodec;

fn midnight(date: Option<NaiveDate>) -> Option<NaiveDateTime> {
    date.map(|d| d.and_time(NaiveTime::MIN))
}

impl DateTimeCodec {
    fn decode_character(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        column: &ColumnDefinition,
    ) -> Result<Option<NaiveDateTime>> {
        if column.server_type().is_blob() && column.is_binary() {
            return refuse(buf, length, column, TYPE_NAME);
        }
        let literal = buf.read_string(length)?;
        parse_timestamp(&literal)
    }

    fn to_wire(value: &NaiveDateTime, calendar: Option<&Calendar>) -> NaiveDateTime {
        match calendar {
            Some(cal) => cal.from_utc_datetime(value).naive_local(),
            None => *value,
        }
    }
}

impl Codec for DateTimeCodec {
    type Value = NaiveDateTime;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn compatible_types(&self) -> &'static [ServerType] {
        COMPATIBLE
    }

    fn decode_text(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        column: &ColumnDefinition,
        calendar: Option<&Calendar>,
    ) -> Result<Option<NaiveDateTime>> {
        match column.server_type() {
            ServerType::Year => {
                let raw = parse_year(&buf.read_ascii(length)?)?;
                let two_digit = length == 2 && column.column_length() == 2;
                Ok(midnight(make_date(expand_year(raw, two_digit), 1, 1)?))
            }
            ServerType::Date | ServerType::NewDate => {
                Ok(midnight(parse_date(&buf.read_ascii(length)?)?))
            }
            ServerType::DateTime | ServerType::Timestamp => Ok(
                parse_timestamp(&buf.read_ascii(length)?)?.map(|dt| apply_calendar(dt, calendar)),
            ),
            t if t.is_character_like() && COMPATIBLE.contains(&t) => {
                self.decode_character(buf, length, column)
            }
            _ => refuse(buf, length, column, TYPE_NAME),
        }
    }

    fn decode_binary(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        column: &ColumnDefinition,
        calendar: Option<&Calendar>,
    ) -> Result<Option<NaiveDateTime>> {
        match column.server_type() {
            ServerType::DateTime | ServerType::Timestamp => Ok(read_wire_datetime(buf, length)?
                .datetime()?
                .map(|dt| apply_calendar(dt, calendar))),
            ServerType::Date | ServerType::NewDate => {
                Ok(midnight(read_wire_datetime(buf, length)?.date()?))
            }
            ServerType::Year => {
                if length == 0 {
                    return Ok(None);
                }
                let raw = read_wire_year(buf, length)?;
                buf.skip(length - 2)?;
                let year = expand_year(raw.into(), column.column_length() == 2);
                Ok(midnight(make_date(year, 1, 1)?))
            }
            t if t.is_character_like() && COMPATIBLE.contains(&t) => {
                self.decode_character(buf, length, column)
            }
            _ => refuse(buf, length, column, TYPE_NAME),
        }
    }

    fn encode_text(
        &self,
        out: &mut WriteBuffer,
        value: &NaiveDateTime,
        calendar: Option<&Calendar>,
        _max_length: Option<u64>,
    ) -> Result<()> {
        let local = Self::to_wire(value, calendar);
        let micros = local.nanosecond() / 1_000;
        let mut literal = format!(
            "'{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            local.year(),
            local.month(),
            local.day(),
            local.hour(),
            local.minute(),
            local.second()
        );
        if micros > 0 {
            literal.push_str(&format!(".{:06}", micros));
        }
        literal.push('\'');
        out.write_ascii(&literal);
        Ok(())
    }

    fn encode_binary(
        &self,
        out: &mut WriteBuffer,
        value: &NaiveDateTime,
        calendar: Option<&Calendar>,
        _max_length: Option<u64>,
    ) -> Result<()> {
        let local = Self::to_wire(value, calendar);
        let micros = local.nanosecond() / 1_000;
        out.write_u8(if micros > 0 { 11 } else { 7 });
        out.write_u16(local.year() as u16);
        out.write_u8(local.month() as u8);
        out.write_u8(local.day() as u8);
        out.write_u8(local.hour() as u8);
        out.write_u8(local.minute() as u8);
        out.write_u8(local.second() as u8);
        if micros > 0 {
            out.write_u32(micros);
        }
        Ok(())
    }

    fn binary_encode_type(&self) -> ServerType {
        ServerType::DateTime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;
    use bytes::Bytes;
    use chrono::FixedOffset;

    fn datetime_column() -> ColumnDefinition {
        ColumnDefinition::generated("dt", ServerType::DateTime, 26, 0)
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, micros: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_micro_opt(h, mi, s, micros)
            .unwrap()
    }

    fn round_trip(value: NaiveDateTime, calendar: Option<&Calendar>) -> NaiveDateTime {
        let mut out = WriteBuffer::new();
        DateTimeCodec.encode_binary(&mut out, &value, calendar, None).unwrap();
        let mut buf = ReadBuffer::new(out.freeze());
        let length = buf.read_u8().unwrap() as usize;
        let decoded = DateTimeCodec
            .decode_binary(&mut buf, length, &datetime_column(), calendar)
            .unwrap()
            .unwrap();
        assert_eq!(buf.remaining(), 0);
        decoded
    }

    #[test]
    fn test_binary_round_trip() {
        let whole = at(2024, 10, 21, 12, 36, 5, 0);
        let fractional = at(1999, 12, 31, 23, 59, 59, 999_999);
        assert_eq!(round_trip(whole, None), whole);
        assert_eq!(round_trip(fractional, None), fractional);

        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(round_trip(whole, Some(&offset)), whole);
    }

    #[test]
    fn test_binary_length_follows_fraction() {
        let mut out = WriteBuffer::new();
        DateTimeCodec
            .encode_binary(&mut out, &at(2024, 1, 2, 3, 4, 5, 0), None, None)
            .unwrap();
        assert_eq!(out.as_bytes(), &[7, 0xe8, 0x07, 1, 2, 3, 4, 5]);

        let mut out = WriteBuffer::new();
        DateTimeCodec
            .encode_binary(&mut out, &at(2024, 1, 2, 3, 4, 5, 6), None, None)
            .unwrap();
        assert_eq!(out.as_bytes(), &[11, 0xe8, 0x07, 1, 2, 3, 4, 5, 6, 0, 0, 0]);
        assert_eq!(DateTimeCodec.binary_encode_type(), ServerType::DateTime);
    }

    #[test]
    fn test_encode_text() {
        let mut out = WriteBuffer::new();
        DateTimeCodec
            .encode_text(&mut out, &at(2024, 1, 2, 3, 4, 5, 0), None, None)
            .unwrap();
        assert_eq!(out.as_bytes(), b"'2024-01-02 03:04:05'");

        let offset = FixedOffset::east_opt(3600).unwrap();
        let mut out = WriteBuffer::new();
        DateTimeCodec
            .encode_text(&mut out, &at(2024, 1, 2, 3, 4, 5, 120), Some(&offset), None)
            .unwrap();
        assert_eq!(out.as_bytes(), b"'2024-01-02 04:04:05.000120'");
    }

    #[test]
    fn test_decode_text_timestamp_with_calendar() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let col = ColumnDefinition::generated("ts", ServerType::Timestamp, 19, 0);
        let mut buf = ReadBuffer::new(Bytes::from_static(b"2024-01-02 04:04:05"));
        assert_eq!(
            DateTimeCodec.decode_text(&mut buf, 19, &col, Some(&offset)).unwrap(),
            Some(at(2024, 1, 2, 3, 4, 5, 0))
        );
    }

    #[test]
    fn test_date_and_year_at_midnight() {
        let date = ColumnDefinition::generated("d", ServerType::Date, 10, 0);
        let mut buf = ReadBuffer::new(Bytes::from_static(&[0xe8, 0x07, 0x02, 0x1d]));
        assert_eq!(
            DateTimeCodec.decode_binary(&mut buf, 4, &date, None).unwrap(),
            Some(at(2024, 2, 29, 0, 0, 0, 0))
        );

        let year = ColumnDefinition::generated("y", ServerType::Year, 2, 0);
        let mut buf = ReadBuffer::new(Bytes::from_static(b"70"));
        assert_eq!(
            DateTimeCodec.decode_text(&mut buf, 2, &year, None).unwrap(),
            Some(at(1970, 1, 1, 0, 0, 0, 0))
        );
    }

    #[test]
    fn test_zero_and_malformed() {
        let col = datetime_column();
        let mut buf = ReadBuffer::new(Bytes::from_static(b"0000-00-00 00:00:002024-99-99 00:00:00"));
        assert_eq!(DateTimeCodec.decode_text(&mut buf, 19, &col, None).unwrap(), None);
        assert_eq!(DateTimeCodec.decode_binary(&mut buf, 0, &col, None).unwrap(), None);

        let err = DateTimeCodec
            .decode(&mut buf, 19, &col, crate::protocol::decode::Protocol::Text, None)
            .unwrap_err();
        assert_eq!(err.decode_kind(), Some(DecodeErrorKind::Malformed));
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_time_refused() {
        let col = ColumnDefinition::generated("t", ServerType::Time, 10, 0);
        let mut buf = ReadBuffer::new(Bytes::from_static(b"10:00:00"));
        let err = DateTimeCodec.decode_text(&mut buf, 8, &col, None).unwrap_err();
        assert_eq!(err.to_string(), "Data type TIME cannot be decoded as DateTime");
        assert_eq!(buf.remaining(), 0);
    }
}
