//! MariaDB/MySQL protocol constants.
//!
//! These constants follow the MariaDB client/server protocol documentation.

// Field types
pub const MYSQL_TYPE_OLDDECIMAL: u8 = 0x00;
pub const MYSQL_TYPE_TINY: u8 = 0x01;
pub const MYSQL_TYPE_SHORT: u8 = 0x02;
pub const MYSQL_TYPE_LONG: u8 = 0x03;
pub const MYSQL_TYPE_FLOAT: u8 = 0x04;
pub const MYSQL_TYPE_DOUBLE: u8 = 0x05;
pub const MYSQL_TYPE_NULL: u8 = 0x06;
pub const MYSQL_TYPE_TIMESTAMP: u8 = 0x07;
pub const MYSQL_TYPE_LONGLONG: u8 = 0x08;
pub const MYSQL_TYPE_INT24: u8 = 0x09;
pub const MYSQL_TYPE_DATE: u8 = 0x0a;
pub const MYSQL_TYPE_TIME: u8 = 0x0b;
pub const MYSQL_TYPE_DATETIME: u8 = 0x0c;
pub const MYSQL_TYPE_YEAR: u8 = 0x0d;
pub const MYSQL_TYPE_NEWDATE: u8 = 0x0e;
pub const MYSQL_TYPE_VARCHAR: u8 = 0x0f;
pub const MYSQL_TYPE_BIT: u8 = 0x10;
pub const MYSQL_TYPE_JSON: u8 = 0xf5;
pub const MYSQL_TYPE_NEWDECIMAL: u8 = 0xf6;
pub const MYSQL_TYPE_ENUM: u8 = 0xf7;
pub const MYSQL_TYPE_SET: u8 = 0xf8;
pub const MYSQL_TYPE_TINY_BLOB: u8 = 0xf9;
pub const MYSQL_TYPE_MEDIUM_BLOB: u8 = 0xfa;
pub const MYSQL_TYPE_LONG_BLOB: u8 = 0xfb;
pub const MYSQL_TYPE_BLOB: u8 = 0xfc;
pub const MYSQL_TYPE_VAR_STRING: u8 = 0xfd;
pub const MYSQL_TYPE_STRING: u8 = 0xfe;
pub const MYSQL_TYPE_GEOMETRY: u8 = 0xff;

// Column definition flags
pub const COLUMN_FLAG_NOT_NULL: u16 = 1;
pub const COLUMN_FLAG_PRIMARY_KEY: u16 = 2;
pub const COLUMN_FLAG_UNIQUE_KEY: u16 = 4;
pub const COLUMN_FLAG_MULTIPLE_KEY: u16 = 8;
pub const COLUMN_FLAG_BLOB: u16 = 16;
pub const COLUMN_FLAG_UNSIGNED: u16 = 32;
pub const COLUMN_FLAG_ZEROFILL: u16 = 64;
pub const COLUMN_FLAG_BINARY: u16 = 128;
pub const COLUMN_FLAG_ENUM: u16 = 256;
pub const COLUMN_FLAG_AUTO_INCREMENT: u16 = 512;
pub const COLUMN_FLAG_TIMESTAMP: u16 = 1024;
pub const COLUMN_FLAG_SET: u16 = 2048;
pub const COLUMN_FLAG_NO_DEFAULT_VALUE: u16 = 4096;
pub const COLUMN_FLAG_ON_UPDATE_NOW: u16 = 8192;
pub const COLUMN_FLAG_NUM: u16 = 32768;

// Character sets
/// Collation id the server uses to mark binary (non-character) data.
pub const BINARY_CHARSET: u16 = 63;
/// utf8mb3_general_ci, used for generated metadata.
pub const UTF8_GENERAL_CI: u16 = 33;

// Capabilities
/// MariaDB extended capability: column definitions carry extended type info.
pub const MARIADB_CLIENT_EXTENDED_TYPE_INFO: u64 = 1 << 35;

// Length-encoded integer prefixes
pub const LENENC_NULL: u8 = 0xfb;
pub const LENENC_PREFIX_U16: u8 = 0xfc;
pub const LENENC_PREFIX_U24: u8 = 0xfd;
pub const LENENC_PREFIX_U64: u8 = 0xfe;

// Column definition
/// Length of the fixed-size trailer of a column definition.
pub const COLUMN_DEFINITION_FIXED_LENGTH: u64 = 0x0c;

// Extended type info tags
pub const EXT_TYPE_NAME: u8 = 0;
pub const EXT_TYPE_FORMAT: u8 = 1;

// Temporal
pub const ZERO_DATE: &str = "0000-00-00";
pub const ZERO_TIME: &str = "00:00:00";
pub const ZERO_DATETIME: &str = "0000-00-00 00:00:00";
/// Maximum fractional-second digits the server stores.
pub const MAX_MICROSECOND_DIGITS: u8 = 6;

/// Maximum bytes per character for a collation id, when known.
///
/// Used to turn a declared byte length into a character count.
pub fn max_char_len(charset: u16) -> Option<u32> {
    match charset {
        // latin1, ascii, binary and other single-byte sets
        5 | 8 | 11 | 15 | 31 | 47 | 48 | 49 | 63 | 65 | 94 => Some(1),
        // big5, euckr, gb2312, gbk, sjis, cp932
        1 | 84 | 19 | 85 | 24 | 86 | 28 | 87 | 13 | 88 | 95 | 96 => Some(2),
        // ucs2
        35 | 90 | 128..=151 | 159 => Some(2),
        // ujis, eucjpms
        12 | 91 | 97 | 98 => Some(3),
        // utf8mb3
        33 | 83 | 192..=215 | 223 => Some(3),
        // utf8mb4
        45 | 46 | 224..=247 | 255 => Some(4),
        // utf16, utf16le, utf32
        54 | 55 | 56 | 62 | 101..=124 | 60 | 61 | 160..=183 => Some(4),
        // gb18030
        248..=250 => Some(4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_char_len() {
        assert_eq!(max_char_len(UTF8_GENERAL_CI), Some(3));
        assert_eq!(max_char_len(45), Some(4));
        assert_eq!(max_char_len(8), Some(1));
        assert_eq!(max_char_len(9999), None);
    }
}
