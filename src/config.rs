/// Upper bounds checked against a container's length fields before anything
/// is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    pub max_original_len: u64,
    pub max_tree_len: u64,
    pub max_payload_len: u64,
}

impl CodecConfig {
    /// The largest possible tree: 511 node records and 512 absent markers.
    pub const MAX_TREE_LEN: u64 = 511 * 6 + 512;

    pub fn with_max_original_len(mut self, len: u64) -> Self {
        self.max_original_len = len;
        self
    }

    pub fn with_max_tree_len(mut self, len: u64) -> Self {
        self.max_tree_len = len;
        self
    }

    pub fn with_max_payload_len(mut self, len: u64) -> Self {
        self.max_payload_len = len;
        self
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            max_original_len: 1 << 30,
            max_tree_len: 4096,
            max_payload_len: 1 << 30,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_fits_largest_tree() {
        let config = CodecConfig::default();
        assert!(config.max_tree_len >= CodecConfig::MAX_TREE_LEN);
    }

    #[test]
    fn test_builder() {
        let config = CodecConfig::default()
            .with_max_original_len(10)
            .with_max_tree_len(20)
            .with_max_payload_len(30);
        assert_eq!(config.max_original_len, 10);
        assert_eq!(config.max_tree_len, 20);
        assert_eq!(config.max_payload_len, 30);
    }
}
