//! MariaDB wire codec
//!
//! Decoding of MariaDB/MySQL column definitions and row values as they
//! arrive on the wire, in both the text and the binary result-set protocol.
//! No connection handling lives here: callers hand over the packet bytes and
//! get typed values back.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use mariadb_wire_codec::{decode, ColumnDefinition, Protocol, ReadBuffer, ServerType, Target, Value};
//!
//! // TINYINT column, text protocol
//! let column = ColumnDefinition::generated("n", ServerType::TinyInt, 4, 0);
//! let mut buf = ReadBuffer::new(Bytes::from_static(b"127256"));
//!
//! let value = decode(&mut buf, 3, &column, Target::Byte, Protocol::Text, None)?;
//! assert_eq!(value, Value::Byte(127));
//!
//! // Out of range: the error still leaves the cursor after the value
//! assert!(decode(&mut buf, 3, &column, Target::Byte, Protocol::Text, None).is_err());
//! assert_eq!(buf.remaining(), 0);
//! # Ok::<(), mariadb_wire_codec::Error>(())
//! ```

pub mod error;
pub mod protocol;

// Re-export main types
pub use error::{DecodeErrorKind, Error, Result};
pub use protocol::buffer::{ReadBuffer, WriteBuffer};
pub use protocol::codec::{Calendar, Codec, DateCodec, DateTimeCodec};
pub use protocol::decode::{decode, Protocol, Target};
pub use protocol::types::{
    ColumnDefinition, MetadataOptions, NameMode, ServerType, TypeFamily, Value,
};
