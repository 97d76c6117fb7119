//! Decoder limits.

use serde::Deserialize;

/// Limits applied while decoding untrusted input.
///
/// Deserializable so a broker can carry it in its own configuration file;
/// missing fields take their defaults.
///
/// ```
/// use amqp_codec::DecoderConfig;
///
/// let config = DecoderConfig::default().with_max_depth(8);
/// assert_eq!(config.max_depth, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum number of compound or described values enclosing any value.
    pub max_depth: usize,
    /// Maximum number of zero-width array elements in one decoded value,
    /// summed over every array it contains. Other arrays are bounded by their
    /// declared byte size.
    pub max_array_len: usize,
}

impl DecoderConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
    pub const DEFAULT_MAX_ARRAY_LEN: usize = 1 << 20;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_array_len(mut self, max_array_len: usize) -> Self {
        self.max_array_len = max_array_len;
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_array_len: Self::DEFAULT_MAX_ARRAY_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let config: DecoderConfig = serde_json::from_str(r#"{"max_depth": 16}"#).unwrap();
        assert_eq!(config.max_depth, 16);
        assert_eq!(config.max_array_len, DecoderConfig::DEFAULT_MAX_ARRAY_LEN);

        let config: DecoderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DecoderConfig::default());
    }
}
