//! Options controlling how column-definition packets are read.

use crate::protocol::constants::MARIADB_CLIENT_EXTENDED_TYPE_INFO;

/// Options for parsing column definitions.
///
/// The server only sends the extended type-info sub-record when the
/// client negotiated it, so the parser must be told up front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetadataOptions {
    /// Column definitions carry the extended type-info sub-record.
    pub extended_type_info: bool,
}

impl MetadataOptions {
    /// Options for a plain MySQL-compatible server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive options from the negotiated capability bitmap.
    pub fn from_capabilities(capabilities: u64) -> Self {
        Self {
            extended_type_info: capabilities & MARIADB_CLIENT_EXTENDED_TYPE_INFO != 0,
        }
    }

    /// Set whether the extended type-info sub-record is present.
    pub fn with_extended_type_info(mut self, enabled: bool) -> Self {
        self.extended_type_info = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_capabilities() {
        assert!(!MetadataOptions::from_capabilities(0xffff_ffff).extended_type_info);
        assert!(MetadataOptions::from_capabilities(MARIADB_CLIENT_EXTENDED_TYPE_INFO).extended_type_info);
    }

    #[test]
    fn test_builder() {
        let opts = MetadataOptions::new().with_extended_type_info(true);
        assert!(opts.extended_type_info);
        assert_eq!(MetadataOptions::new(), MetadataOptions::default());
    }
}
