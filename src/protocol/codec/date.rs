use chrono::{Datelike, NaiveDate};

use super::{parse_year, read_wire_year, refuse, Calendar, Codec};
use crate::error::Result;
use crate::protocol::buffer::{ReadBuffer, WriteBuffer};
use crate::protocol::decode::{expand_year, make_date, parse_date, parse_timestamp, read_wire_datetime};
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

const TYPE_NAME: &str = "Date";

/// Calendar date codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateCodec;

impl DateCodec {
    fn decode_character(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        column: &ColumnDefinition,
    ) -> Result<Option<NaiveDate>> {
        if column.server_type().is_blob() && column.is_binary() {
            return refuse(buf, length, column, TYPE_NAME);
        }
        let literal = buf.read_string(length)?;
        parse_date(&literal)
    }
}

impl Codec for DateCodec {
    type Value = NaiveDate;

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
        _calendar: Option<&Calendar>,
    ) -> Result<Option<NaiveDate>> {
        match column.server_type() {
            ServerType::Year => {
                let raw = parse_year(&buf.read_ascii(length)?)?;
                let two_digit = length == 2 && column.column_length() == 2;
                make_date(expand_year(raw, two_digit), 1, 1)
            }
            ServerType::Date | ServerType::NewDate => parse_date(&buf.read_ascii(length)?),
            ServerType::DateTime | ServerType::Timestamp => {
                Ok(parse_timestamp(&buf.read_ascii(length)?)?.map(|dt| dt.date()))
            }
            t if t.is_character_like() && COMPATIBLE.contains(&t) => self.decode_character(buf, length, column),
            _ => refuse(buf, length, column, TYPE_NAME),
        }
    }

    fn decode_binary(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        column: &ColumnDefinition,
        _calendar: Option<&Calendar>,
    ) -> Result<Option<NaiveDate>> {
        match column.server_type() {
            ServerType::DateTime | ServerType::Timestamp => {
                if length == 0 {
                    return Ok(None);
                }
                read_wire_datetime(buf, length)?.date()
            }
            ServerType::Date | ServerType::NewDate | ServerType::Year => {
                if length == 0 {
                    return Ok(None);
                }
                let raw = read_wire_year(buf, length)?;
                let (mut month, mut day, mut consumed) = (1, 1, 2);
                if length >= 4 {
                    month = buf.read_u8()?;
                    day = buf.read_u8()?;
                    consumed = 4;
                }
                buf.skip(length - consumed)?;
                let year = expand_year(raw.into(), column.column_length() == 2);
                make_date(year, month.into(), day.into())
            }
            t if t.is_character_like() && COMPATIBLE.contains(&t) => self.decode_character(buf, length, column),
            _ => refuse(buf, length, column, TYPE_NAME),
        }
    }

    fn encode_text(
        &self,
        out: &mut WriteBuffer,
        value: &NaiveDate,
        _calendar: Option<&Calendar>,
        _max_length: Option<u64>,
    ) -> Result<()> {
        out.write_ascii(&format!(
            "'{:04}-{:02}-{:02}'",
            value.year(),
            value.month(),
            value.day()
        ));
        Ok(())
    }

    fn encode_binary(
        &self,
        out: &mut WriteBuffer,
        value: &NaiveDate,
        _calendar: Option<&Calendar>,
        _max_length: Option<u64>,
    ) -> Result<()> {
        out.write_u8(7);
        out.write_u16(value.year() as u16);
        out.write_u8(value.month() as u8);
        out.write_u8(value.day() as u8);
        out.write_zeros(3);
        Ok(())
    }

    fn binary_encode_type(&self) -> ServerType {
        ServerType::Date
    }
}
