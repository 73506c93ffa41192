//! Server field type enum.
//!
//! Each column definition carries one of these tags. The tag decides which
//! decoder family interprets the column's values.

use crate::error::{Error, Result};
use crate::protocol::constants::*;

/// Server field type as sent in a column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerType {
    OldDecimal,
    TinyInt,
    SmallInt,
    Integer,
    Float,
    Double,
    Null,
    Timestamp,
    BigInt,
    MediumInt,
    Date,
    Time,
    DateTime,
    Year,
    NewDate,
    VarChar,
    Bit,
    Json,
    Decimal,
    Enum,
    Set,
    TinyBlob,
    MediumBlob,
    LongBlob,
    Blob,
    VarString,
    String,
    Geometry,
}

/// Decoder family a server type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    Integer,
    Float,
    Decimal,
    Bit,
    Blob,
    String,
    Date,
    Time,
    Timestamp,
}

impl ServerType {
    /// Create from the raw type code.
    ///
    /// Returns `Err(Error::UnsupportedType)` for unknown codes.
    pub fn from_raw(type_num: u8) -> Result<Self> {
        Ok(match type_num {
            MYSQL_TYPE_OLDDECIMAL => ServerType::OldDecimal,
            MYSQL_TYPE_TINY => ServerType::TinyInt,
            MYSQL_TYPE_SHORT => ServerType::SmallInt,
            MYSQL_TYPE_LONG => ServerType::Integer,
            MYSQL_TYPE_FLOAT => ServerType::Float,
            MYSQL_TYPE_DOUBLE => ServerType::Double,
            MYSQL_TYPE_NULL => ServerType::Null,
            MYSQL_TYPE_TIMESTAMP => ServerType::Timestamp,
            MYSQL_TYPE_LONGLONG => ServerType::BigInt,
            MYSQL_TYPE_INT24 => ServerType::MediumInt,
            MYSQL_TYPE_DATE => ServerType::Date,
            MYSQL_TYPE_TIME => ServerType::Time,
            MYSQL_TYPE_DATETIME => ServerType::DateTime,
            MYSQL_TYPE_YEAR => ServerType::Year,
            MYSQL_TYPE_NEWDATE => ServerType::NewDate,
            MYSQL_TYPE_VARCHAR => ServerType::VarChar,
            MYSQL_TYPE_BIT => ServerType::Bit,
            MYSQL_TYPE_JSON => ServerType::Json,
            MYSQL_TYPE_NEWDECIMAL => ServerType::Decimal,
            MYSQL_TYPE_ENUM => ServerType::Enum,
            MYSQL_TYPE_SET => ServerType::Set,
            MYSQL_TYPE_TINY_BLOB => ServerType::TinyBlob,
            MYSQL_TYPE_MEDIUM_BLOB => ServerType::MediumBlob,
            MYSQL_TYPE_LONG_BLOB => ServerType::LongBlob,
            MYSQL_TYPE_BLOB => ServerType::Blob,
            MYSQL_TYPE_VAR_STRING => ServerType::VarString,
            MYSQL_TYPE_STRING => ServerType::String,
            MYSQL_TYPE_GEOMETRY => ServerType::Geometry,
            _ => return Err(Error::UnsupportedType { type_num }),
        })
    }

    /// Get the raw type code.
    pub fn type_num(&self) -> u8 {
        match self {
            ServerType::OldDecimal => MYSQL_TYPE_OLDDECIMAL,
            ServerType::TinyInt => MYSQL_TYPE_TINY,
            ServerType::SmallInt => MYSQL_TYPE_SHORT,
            ServerType::Integer => MYSQL_TYPE_LONG,
            ServerType::Float => MYSQL_TYPE_FLOAT,
            ServerType::Double => MYSQL_TYPE_DOUBLE,
            ServerType::Null => MYSQL_TYPE_NULL,
            ServerType::Timestamp => MYSQL_TYPE_TIMESTAMP,
            ServerType::BigInt => MYSQL_TYPE_LONGLONG,
            ServerType::MediumInt => MYSQL_TYPE_INT24,
            ServerType::Date => MYSQL_TYPE_DATE,
            ServerType::Time => MYSQL_TYPE_TIME,
            ServerType::DateTime => MYSQL_TYPE_DATETIME,
            ServerType::Year => MYSQL_TYPE_YEAR,
            ServerType::NewDate => MYSQL_TYPE_NEWDATE,
            ServerType::VarChar => MYSQL_TYPE_VARCHAR,
            ServerType::Bit => MYSQL_TYPE_BIT,
            ServerType::Json => MYSQL_TYPE_JSON,
            ServerType::Decimal => MYSQL_TYPE_NEWDECIMAL,
            ServerType::Enum => MYSQL_TYPE_ENUM,
            ServerType::Set => MYSQL_TYPE_SET,
            ServerType::TinyBlob => MYSQL_TYPE_TINY_BLOB,
            ServerType::MediumBlob => MYSQL_TYPE_MEDIUM_BLOB,
            ServerType::LongBlob => MYSQL_TYPE_LONG_BLOB,
            ServerType::Blob => MYSQL_TYPE_BLOB,
            ServerType::VarString => MYSQL_TYPE_VAR_STRING,
            ServerType::String => MYSQL_TYPE_STRING,
            ServerType::Geometry => MYSQL_TYPE_GEOMETRY,
        }
    }

    /// Decoder family for this type.
    pub fn family(&self) -> TypeFamily {
        match self {
            ServerType::TinyInt
            | ServerType::SmallInt
            | ServerType::MediumInt
            | ServerType::Integer
            | ServerType::BigInt
            | ServerType::Year => TypeFamily::Integer,
            ServerType::Float | ServerType::Double => TypeFamily::Float,
            ServerType::OldDecimal | ServerType::Decimal => TypeFamily::Decimal,
            ServerType::Bit => TypeFamily::Bit,
            ServerType::TinyBlob
            | ServerType::MediumBlob
            | ServerType::LongBlob
            | ServerType::Blob
            | ServerType::Geometry => TypeFamily::Blob,
            ServerType::VarChar
            | ServerType::VarString
            | ServerType::String
            | ServerType::Json
            | ServerType::Enum
            | ServerType::Set
            | ServerType::Null => TypeFamily::String,
            ServerType::Date | ServerType::NewDate => TypeFamily::Date,
            ServerType::Time => TypeFamily::Time,
            ServerType::Timestamp | ServerType::DateTime => TypeFamily::Timestamp,
        }
    }

    /// Whether this is one of the BLOB/TEXT wire types.
    pub fn is_blob(&self) -> bool {
        matches!(
            self,
            ServerType::TinyBlob | ServerType::MediumBlob | ServerType::LongBlob | ServerType::Blob
        )
    }

    /// Whether values of this type are variable-width character data when not binary.
    pub fn is_character_like(&self) -> bool {
        self.is_blob()
            || matches!(
                self,
                ServerType::VarChar
                    | ServerType::Json
                    | ServerType::Enum
                    | ServerType::Set
                    | ServerType::VarString
                    | ServerType::String
            )
    }

    /// Width in bytes of the binary-protocol integer encoding, for integer types.
    ///
    /// MEDIUMINT is sent on 4 bytes although only 3 are meaningful.
    pub fn binary_width(&self) -> Option<usize> {
        match self {
            ServerType::TinyInt => Some(1),
            ServerType::SmallInt | ServerType::Year => Some(2),
            ServerType::MediumInt | ServerType::Integer => Some(4),
            ServerType::BigInt => Some(8),
            ServerType::Float => Some(4),
            ServerType::Double => Some(8),
            _ => None,
        }
    }
}

impl std::fmt::Display for ServerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServerType::OldDecimal => "OLDDECIMAL",
            ServerType::TinyInt => "TINYINT",
            ServerType::SmallInt => "SMALLINT",
            ServerType::Integer => "INTEGER",
            ServerType::Float => "FLOAT",
            ServerType::Double => "DOUBLE",
            ServerType::Null => "NULL",
            ServerType::Timestamp => "TIMESTAMP",
            ServerType::BigInt => "BIGINT",
            ServerType::MediumInt => "MEDIUMINT",
            ServerType::Date => "DATE",
            ServerType::Time => "TIME",
            ServerType::DateTime => "DATETIME",
            ServerType::Year => "YEAR",
            ServerType::NewDate => "NEWDATE",
            ServerType::VarChar => "VARCHAR",
            ServerType::Bit => "BIT",
            ServerType::Json => "JSON",
            ServerType::Decimal => "DECIMAL",
            ServerType::Enum => "ENUM",
            ServerType::Set => "SET",
            ServerType::TinyBlob => "TINYBLOB",
            ServerType::MediumBlob => "MEDIUMBLOB",
            ServerType::LongBlob => "LONGBLOB",
            ServerType::Blob => "BLOB",
            ServerType::VarString => "VARSTRING",
            ServerType::String => "STRING",
            ServerType::Geometry => "GEOMETRY",
        };
        write!(f, "{}", name)
    }
}
