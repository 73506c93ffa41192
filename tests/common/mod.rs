//! Shared packet builders for the integration tests.

#![allow(dead_code)]

use bytes::Bytes;
use mariadb_wire_codec::protocol::constants::UTF8_GENERAL_CI;
use mariadb_wire_codec::{ColumnDefinition, MetadataOptions, ReadBuffer, WriteBuffer};

/// Column-definition packet with fixed names and the given type fields.
pub fn column_packet(type_num: u8, charset: u16, column_length: u32, flags: u16, decimals: u8) -> Bytes {
    let mut w = WriteBuffer::new();
    w.write_lenenc_str("def");
    w.write_lenenc_str("test");
    w.write_lenenc_str("t");
    w.write_lenenc_str("t_real");
    w.write_lenenc_str("c");
    w.write_lenenc_str("c_real");
    w.write_lenenc(0x0c);
    w.write_u16(charset);
    w.write_u32(column_length);
    w.write_u8(type_num);
    w.write_u16(flags);
    w.write_u8(decimals);
    w.write_zeros(2);
    w.freeze()
}

pub fn column_with(type_num: u8, charset: u16, column_length: u32, flags: u16, decimals: u8) -> ColumnDefinition {
    let mut buf = ReadBuffer::new(column_packet(type_num, charset, column_length, flags, decimals));
    ColumnDefinition::parse(&mut buf, &MetadataOptions::new()).unwrap()
}

/// Text-charset column with no decimals.
pub fn column(type_num: u8, column_length: u32, flags: u16) -> ColumnDefinition {
    column_with(type_num, UTF8_GENERAL_CI, column_length, flags, 0)
}

/// Text-protocol row: every value length-encoded, back to back.
pub fn text_row(values: &[&[u8]]) -> ReadBuffer {
    let mut w = WriteBuffer::new();
    for value in values {
        w.write_lenenc_bytes(value);
    }
    ReadBuffer::new(w.freeze())
}
