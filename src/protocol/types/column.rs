//! Column definition metadata.
//!
//! A `ColumnDefinition` is parsed once per result column and then shared
//! read-only by every row of the result set. Identifier strings are not
//! decoded up front: only their byte ranges inside the owned packet are
//! kept, and each accessor decodes on demand.

use bigdecimal::BigDecimal;
use bytes::Bytes;
use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use tracing::{event, Level};

use crate::error::{Error, Result};
use crate::protocol::buffer::{ReadBuffer, WriteBuffer};
use crate::protocol::codec::Calendar;
use crate::protocol::constants::*;
use crate::protocol::decode::{self, DecodeFn, Protocol, Target};

use super::metadata::MetadataOptions;
use super::server_type::ServerType;
use super::value::Value;

/// Which name `ColumnDefinition::table` reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameMode {
    /// The underlying table name.
    #[default]
    Table,
    /// The alias used in the query.
    Alias,
}

/// Metadata describing one result column.
#[derive(Debug, Clone)]
pub struct ColumnDefinition {
    packet: Bytes,
    schema: Range<usize>,
    table_alias: Range<usize>,
    table: Range<usize>,
    column_alias: Range<usize>,
    column: Range<usize>,
    ext_type_name: Option<String>,
    ext_type_format: Option<String>,
    charset: u16,
    column_length: u32,
    server_type: ServerType,
    decimals: u8,
    flags: u16,
}

impl ColumnDefinition {
    /// Parse a column-definition packet.
    ///
    /// `buf` must be positioned at the catalog field. On success the cursor
    /// is left after the packet.
    pub fn parse(buf: &mut ReadBuffer, options: &MetadataOptions) -> Result<Self> {
        let packet = buf.packet().clone();

        skip_identifier(buf)?; // catalog, always "def"
        let schema = identifier_range(buf)?;
        let table_alias = identifier_range(buf)?;
        let table = identifier_range(buf)?;
        let column_alias = identifier_range(buf)?;
        let column = identifier_range(buf)?;

        let (ext_type_name, ext_type_format) = if options.extended_type_info {
            read_extended_info(buf)?
        } else {
            (None, None)
        };

        let fixed_length = buf.read_lenenc()?;
        if fixed_length != COLUMN_DEFINITION_FIXED_LENGTH {
            return Err(Error::protocol(format!(
                "unexpected column definition field length {}",
                fixed_length
            )));
        }
        let charset = buf.read_u16()?;
        let column_length = buf.read_u32()?;
        let server_type = ServerType::from_raw(buf.read_u8()?)?;
        let flags = buf.read_u16()?;
        let decimals = buf.read_u8()?;
        // filler
        if buf.has_remaining(2) {
            buf.skip(2)?;
        }

        let definition = Self {
            packet,
            schema,
            table_alias,
            table,
            column_alias,
            column,
            ext_type_name,
            ext_type_format,
            charset,
            column_length,
            server_type,
            decimals,
            flags,
        };
        event!(
            Level::TRACE,
            column = %definition.column_alias(),
            server_type = %server_type,
            charset,
            column_length,
            flags,
            decimals,
            "parsed column definition"
        );
        Ok(definition)
    }

    /// Build metadata for a column the client synthesizes itself.
    ///
    /// The definition owns a packet laid out like a server one, so every
    /// accessor behaves the same as for parsed columns.
    pub fn generated(name: &str, server_type: ServerType, column_length: u32, flags: u16) -> Self {
        let mut w = WriteBuffer::with_capacity(32 + 2 * name.len());
        w.write_lenenc_str("def");
        let schema = write_identifier(&mut w, "");
        let table_alias = write_identifier(&mut w, "");
        let table = write_identifier(&mut w, "");
        let column_alias = write_identifier(&mut w, name);
        let column = write_identifier(&mut w, name);
        w.write_lenenc(COLUMN_DEFINITION_FIXED_LENGTH);
        w.write_u16(UTF8_GENERAL_CI);
        w.write_u32(column_length);
        w.write_u8(server_type.type_num());
        w.write_u16(flags);
        w.write_u8(0);
        w.write_zeros(2);

        Self {
            packet: w.freeze(),
            schema,
            table_alias,
            table,
            column_alias,
            column,
            ext_type_name: None,
            ext_type_format: None,
            charset: UTF8_GENERAL_CI,
            column_length,
            server_type,
            decimals: 0,
            flags,
        }
    }

    /// Override the collation id.
    #[cfg(test)]
    pub(crate) fn with_charset(mut self, charset: u16) -> Self {
        self.charset = charset;
        self
    }

    /// Override the declared scale.
    #[cfg(test)]
    pub(crate) fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    fn identifier(&self, range: &Range<usize>) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.packet[range.clone()])
    }

    pub fn schema(&self) -> Cow<'_, str> {
        self.identifier(&self.schema)
    }

    pub fn table_alias(&self) -> Cow<'_, str> {
        self.identifier(&self.table_alias)
    }

    /// Table name, or its alias when `mode` is `NameMode::Alias`.
    pub fn table(&self, mode: NameMode) -> Cow<'_, str> {
        match mode {
            NameMode::Table => self.identifier(&self.table),
            NameMode::Alias => self.identifier(&self.table_alias),
        }
    }

    /// Column label as written in the query.
    pub fn column_alias(&self) -> Cow<'_, str> {
        self.identifier(&self.column_alias)
    }

    /// Underlying column name (empty for expressions).
    pub fn column_name(&self) -> Cow<'_, str> {
        self.identifier(&self.column)
    }

    pub fn charset(&self) -> u16 {
        self.charset
    }

    pub fn column_length(&self) -> u32 {
        self.column_length
    }

    pub fn server_type(&self) -> ServerType {
        self.server_type
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Vendor type name from extended type info (e.g. `json`, `uuid`).
    pub fn ext_type_name(&self) -> Option<&str> {
        self.ext_type_name.as_deref()
    }

    pub fn ext_type_format(&self) -> Option<&str> {
        self.ext_type_format.as_deref()
    }

    /// Whether the column carries binary (non-character) data.
    pub fn is_binary(&self) -> bool {
        self.charset == BINARY_CHARSET
    }

    pub fn is_signed(&self) -> bool {
        self.flags & COLUMN_FLAG_UNSIGNED == 0
    }

    pub fn is_primary_key(&self) -> bool {
        self.flags & COLUMN_FLAG_PRIMARY_KEY != 0
    }

    pub fn is_auto_increment(&self) -> bool {
        self.flags & COLUMN_FLAG_AUTO_INCREMENT != 0
    }

    pub fn has_default(&self) -> bool {
        self.flags & COLUMN_FLAG_NO_DEFAULT_VALUE == 0
    }

    /// Display width in characters.
    ///
    /// Character columns report their declared byte length divided by the
    /// charset's maximum character width; everything else reports the
    /// declared length.
    pub fn display_size(&self) -> u32 {
        if !self.is_binary() && self.server_type.is_character_like() {
            if let Some(width) = max_char_len(self.charset) {
                return self.column_length / width;
            }
        }
        self.column_length
    }

    /// Decode one value into the requested target.
    pub fn decode(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        target: Target,
        protocol: Protocol,
        calendar: Option<&Calendar>,
    ) -> Result<Value> {
        decode::decode(buf, length, self, target, protocol, calendar)
    }

    fn decode_with<T>(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        target: Target,
        calendar: Option<&Calendar>,
        f: DecodeFn<T>,
    ) -> Result<T> {
        decode::run(buf, length, self, target, calendar, f)
    }

    pub fn decode_boolean(&self, buf: &mut ReadBuffer, length: usize, protocol: Protocol) -> Result<bool> {
        let f = decode::decoders(self, protocol).boolean;
        self.decode_with(buf, length, Target::Boolean, None, f)
    }

    pub fn decode_byte(&self, buf: &mut ReadBuffer, length: usize, protocol: Protocol) -> Result<i8> {
        let f = decode::decoders(self, protocol).byte;
        self.decode_with(buf, length, Target::Byte, None, f)
    }

    pub fn decode_short(&self, buf: &mut ReadBuffer, length: usize, protocol: Protocol) -> Result<i16> {
        let f = decode::decoders(self, protocol).short;
        self.decode_with(buf, length, Target::Short, None, f)
    }

    pub fn decode_int(&self, buf: &mut ReadBuffer, length: usize, protocol: Protocol) -> Result<i32> {
        let f = decode::decoders(self, protocol).int;
        self.decode_with(buf, length, Target::Int, None, f)
    }

    pub fn decode_long(&self, buf: &mut ReadBuffer, length: usize, protocol: Protocol) -> Result<i64> {
        let f = decode::decoders(self, protocol).long;
        self.decode_with(buf, length, Target::Long, None, f)
    }

    pub fn decode_float(&self, buf: &mut ReadBuffer, length: usize, protocol: Protocol) -> Result<f32> {
        let f = decode::decoders(self, protocol).float;
        self.decode_with(buf, length, Target::Float, None, f)
    }

    pub fn decode_double(&self, buf: &mut ReadBuffer, length: usize, protocol: Protocol) -> Result<f64> {
        let f = decode::decoders(self, protocol).double;
        self.decode_with(buf, length, Target::Double, None, f)
    }

    pub fn decode_string(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        protocol: Protocol,
        calendar: Option<&Calendar>,
    ) -> Result<String> {
        let f = decode::decoders(self, protocol).string;
        self.decode_with(buf, length, Target::String, calendar, f)
    }

    pub fn decode_decimal(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        protocol: Protocol,
    ) -> Result<BigDecimal> {
        let f = decode::decoders(self, protocol).decimal;
        self.decode_with(buf, length, Target::Decimal, None, f)
    }

    pub fn decode_bytes(&self, buf: &mut ReadBuffer, length: usize, protocol: Protocol) -> Result<Bytes> {
        let f = decode::decoders(self, protocol).bytes;
        self.decode_with(buf, length, Target::Bytes, None, f)
    }

    /// Decode into the column's default representation.
    pub fn decode_natural(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        protocol: Protocol,
        calendar: Option<&Calendar>,
    ) -> Result<Value> {
        let f = decode::decoders(self, protocol).natural;
        self.decode_with(buf, length, Target::Natural, calendar, f)
    }
}

// Identity ignores names: two result sets with the same column shapes share decoders.
impl PartialEq for ColumnDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.charset == other.charset
            && self.column_length == other.column_length
            && self.server_type == other.server_type
            && self.decimals == other.decimals
            && self.flags == other.flags
    }
}

impl Eq for ColumnDefinition {}

impl Hash for ColumnDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.charset.hash(state);
        self.column_length.hash(state);
        self.server_type.hash(state);
        self.decimals.hash(state);
        self.flags.hash(state);
    }
}

fn skip_identifier(buf: &mut ReadBuffer) -> Result<()> {
    buf.skip_lenenc().map(|_| ())
}

fn identifier_range(buf: &mut ReadBuffer) -> Result<Range<usize>> {
    let len = buf.read_lenenc()? as usize;
    let start = buf.position();
    buf.skip(len)?;
    Ok(start..start + len)
}

fn write_identifier(w: &mut WriteBuffer, s: &str) -> Range<usize> {
    w.write_lenenc(s.len() as u64);
    let start = w.len();
    w.write_ascii(s);
    start..w.len()
}

/// Read the `(tag, value)` pairs of the extended type-info sub-record.
fn read_extended_info(buf: &mut ReadBuffer) -> Result<(Option<String>, Option<String>)> {
    let mut sub = buf.read_length_buffer()?;
    let mut type_name = None;
    let mut type_format = None;
    while sub.has_remaining(1) {
        match sub.read_u8()? {
            EXT_TYPE_NAME => type_name = Some(sub.read_lenenc_str()?),
            EXT_TYPE_FORMAT => type_format = Some(sub.read_lenenc_str()?),
            tag => {
                event!(Level::TRACE, tag, "skipping unknown extended type info");
                sub.skip_lenenc()?;
            }
        }
    }
    Ok((type_name, type_format))
}
