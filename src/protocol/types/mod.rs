//! Column metadata and value types.

mod column;
mod metadata;
mod server_type;
mod value;

pub use column::{ColumnDefinition, NameMode};
pub use metadata::MetadataOptions;
pub use server_type::{ServerType, TypeFamily};
pub use value::Value;
