//! MariaDB wire protocol value handling.

pub mod buffer;
pub mod codec;
pub mod constants;
pub mod decode;
pub mod types;

pub use buffer::{ReadBuffer, WriteBuffer};
pub use codec::{Calendar, Codec, DateCodec, DateTimeCodec};
pub use decode::{Protocol, Target};
pub use types::{ColumnDefinition, MetadataOptions, NameMode, ServerType, TypeFamily, Value};
