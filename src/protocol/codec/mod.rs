//! Rich-value codecs.
//!
//! The decoder tables in [`crate::protocol::decode`] cover the primitive
//! targets. A [`Codec`] covers one application type end to end: it decides
//! which columns it can read, decodes both protocols and writes the value
//! back as a text literal or a binary parameter.

mod date;
mod datetime;

pub use date::DateCodec;
pub use datetime::DateTimeCodec;

use std::any::{Any, TypeId};

use tracing::{event, Level};

use crate::error::{Error, Result};
use crate::protocol::buffer::{ReadBuffer, WriteBuffer};
use crate::protocol::decode::{check_consumed, realign, Protocol};
use crate::protocol::types::{ColumnDefinition, ServerType};

/// Time zone applied to date-time values that carry none on the wire.
pub type Calendar = chrono::FixedOffset;

/// Reads and writes one application type.
pub trait Codec {
    type Value: 'static;

    /// Name used in error messages.
    fn type_name(&self) -> &'static str;

    /// Server types this codec can read.
    fn compatible_types(&self) -> &'static [ServerType];

    /// Whether `column` can be read as `requested`.
    fn can_decode(&self, column: &ColumnDefinition, requested: TypeId) -> bool {
        requested == TypeId::of::<Self::Value>()
            && self.compatible_types().contains(&column.server_type())
    }

    fn can_encode(&self, value: &dyn Any) -> bool {
        value.is::<Self::Value>()
    }

    /// Decode a text-protocol value. `Ok(None)` is the zero date.
    fn decode_text(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        column: &ColumnDefinition,
        calendar: Option<&Calendar>,
    ) -> Result<Option<Self::Value>>;

    /// Decode a binary-protocol value. `Ok(None)` is the zero date.
    fn decode_binary(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        column: &ColumnDefinition,
        calendar: Option<&Calendar>,
    ) -> Result<Option<Self::Value>>;

    /// Decode in either protocol, leaving the cursor `length` bytes further
    /// on even when decoding fails.
    fn decode(
        &self,
        buf: &mut ReadBuffer,
        length: usize,
        column: &ColumnDefinition,
        protocol: Protocol,
        calendar: Option<&Calendar>,
    ) -> Result<Option<Self::Value>> {
        let start = buf.position();
        let result = match protocol {
            Protocol::Text => self.decode_text(buf, length, column, calendar),
            Protocol::Binary => self.decode_binary(buf, length, column, calendar),
        }
        .and_then(|value| check_consumed(buf, start, length).map(|()| value));
        if let Err(err) = &result {
            realign(buf, start, length);
            event!(
                Level::DEBUG,
                server_type = %column.server_type(),
                codec = self.type_name(),
                error = %err,
                "codec decode failed"
            );
        }
        result
    }

    /// Write `value` as an SQL literal.
    fn encode_text(
        &self,
        out: &mut WriteBuffer,
        value: &Self::Value,
        calendar: Option<&Calendar>,
        max_length: Option<u64>,
    ) -> Result<()>;

    /// Write `value` as a length-prefixed binary parameter.
    fn encode_binary(
        &self,
        out: &mut WriteBuffer,
        value: &Self::Value,
        calendar: Option<&Calendar>,
        max_length: Option<u64>,
    ) -> Result<()>;

    /// Parameter type announced for binary-encoded values.
    fn binary_encode_type(&self) -> ServerType;
}

/// Skip the payload and refuse the column.
pub(crate) fn refuse<T>(
    buf: &mut ReadBuffer,
    length: usize,
    column: &ColumnDefinition,
    type_name: &str,
) -> Result<T> {
    buf.skip(length)?;
    Err(Error::incompatible(column.server_type(), type_name))
}

/// Binary YEAR, DATE and NEWDATE values open with a little-endian year.
pub(crate) fn read_wire_year(buf: &mut ReadBuffer, length: usize) -> Result<u16> {
    if length < 2 {
        buf.skip(length)?;
        return Err(Error::malformed(format!(
            "binary date value of {} bytes is too short",
            length
        )));
    }
    buf.read_u16()
}

/// YEAR text payloads are plain digits.
pub(crate) fn parse_year(literal: &str) -> Result<i32> {
    let value = crate::protocol::decode::parse_integer(literal.trim())?;
    i32::try_from(value)
        .map_err(|_| Error::malformed(format!("value '{}' cannot be decoded as Date", literal)))
}
