//! On-disk encodings for layers.
//!
//! The store only needs symmetric encode/decode plus a file extension, so
//! the format is a type parameter of [`crate::store::ConfigStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Symmetric text encoding for layer files.
pub trait LayerCodec {
    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    fn encode<T: Serialize>(&self, value: &T) -> Result<String, String>;

    fn decode<T: DeserializeOwned>(&self, content: &str) -> Result<T, String>;
}

/// TOML layer files (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl LayerCodec for TomlCodec {
    fn extension(&self) -> &'static str {
        "toml"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<String, String> {
        toml::to_string_pretty(value).map_err(|e| e.to_string())
    }

    fn decode<T: DeserializeOwned>(&self, content: &str) -> Result<T, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

/// JSON layer files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl LayerCodec for JsonCodec {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<String, String> {
        serde_json::to_string_pretty(value).map_err(|e| e.to_string())
    }

    fn decode<T: DeserializeOwned>(&self, content: &str) -> Result<T, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{Layer, LayerKind};

    #[test]
    fn test_toml_decode_rejects_invalid_input() {
        let result: Result<Layer, _> = TomlCodec.decode("invalid toml [[[");
        assert!(result.is_err());
    }

    #[test]
    fn test_json_codec_uses_same_field_names() {
        let layer = Layer::scaffold(LayerKind::Team, Some("infra".to_string()), "fish", "emacs");
        let json = JsonCodec.encode(&layer).unwrap();
        assert!(json.contains("\"type\": \"team\""));

        let decoded: Layer = JsonCodec.decode(&json).unwrap();
        assert_eq!(decoded, layer);
    }

    #[test]
    fn test_toml_decode_unknown_kind_fails() {
        let result: Result<Layer, _> = TomlCodec.decode("type = \"machine\"");
        assert!(result.is_err());
    }
}
