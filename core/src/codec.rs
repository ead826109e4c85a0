//! String-keyed codec registry.
//!
//! Media-type codecs turn a handler's body value into bytes; compression
//! codecs turn bytes into bytes. Both are looked up by the name negotiation
//! stored in the assigns, and both fail loudly: a missing registration and
//! a misbehaving implementation are distinct, operator-facing errors that
//! name the codec and the offending value.

use bytes::Bytes;
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use thiserror::Error;

use crate::error::EvalError;

/// What a handler node hands back for the response body.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyValue {
    /// Leave the in-progress response body as it is (empty).
    Empty,
    Text(String),
    Json(Value),
    Bytes(Bytes),
}

impl BodyValue {
    /// Short printable rendition for error reports.
    pub fn describe(&self) -> String {
        match self {
            BodyValue::Empty => "<empty>".to_string(),
            BodyValue::Text(text) => format!("text {text:?}"),
            BodyValue::Json(value) => format!("json {value}"),
            BodyValue::Bytes(bytes) => format!("{} raw bytes", bytes.len()),
        }
    }
}

impl From<&str> for BodyValue {
    fn from(value: &str) -> Self {
        BodyValue::Text(value.to_string())
    }
}

impl From<String> for BodyValue {
    fn from(value: String) -> Self {
        BodyValue::Text(value)
    }
}

impl From<Value> for BodyValue {
    fn from(value: Value) -> Self {
        BodyValue::Json(value)
    }
}

impl From<Bytes> for BodyValue {
    fn from(value: Bytes) -> Self {
        BodyValue::Bytes(value)
    }
}

/// A codec implementation refusing (or failing) to produce bytes.
#[derive(Error, Debug)]
#[error("{reason} (got {value})")]
pub struct EncodeFailure {
    pub value: String,
    pub reason: String,
}

impl EncodeFailure {
    pub fn new(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Encoder capability registered under a media-type name.
pub trait Encoder: Send + Sync {
    fn name(&self) -> &str;
    fn encode(&self, body: &BodyValue) -> Result<Bytes, EncodeFailure>;
}

/// Encoder capability registered under a content-coding name.
pub trait Compressor: Send + Sync {
    fn name(&self) -> &str;
    fn compress(&self, input: &[u8]) -> Result<Bytes, EncodeFailure>;
}

/// `text/plain`: renders whatever the handler produced as UTF-8 text.
pub struct PlainTextEncoder;

impl Encoder for PlainTextEncoder {
    fn name(&self) -> &str {
        "PlainTextEncoder"
    }

    fn encode(&self, body: &BodyValue) -> Result<Bytes, EncodeFailure> {
        Ok(match body {
            BodyValue::Empty => Bytes::new(),
            BodyValue::Text(text) => Bytes::copy_from_slice(text.as_bytes()),
            BodyValue::Json(Value::String(text)) => Bytes::copy_from_slice(text.as_bytes()),
            BodyValue::Json(value) => Bytes::from(value.to_string()),
            BodyValue::Bytes(bytes) => bytes.clone(),
        })
    }
}

/// `application/json`: structured values are serialized, text becomes a JSON
/// string, raw bytes are refused.
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn name(&self) -> &str {
        "JsonEncoder"
    }

    fn encode(&self, body: &BodyValue) -> Result<Bytes, EncodeFailure> {
        match body {
            BodyValue::Empty => Ok(Bytes::new()),
            BodyValue::Text(text) => serde_json::to_vec(text)
                .map(Bytes::from)
                .map_err(|err| EncodeFailure::new(body.describe(), err.to_string())),
            BodyValue::Json(value) => serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(|err| EncodeFailure::new(body.describe(), err.to_string())),
            BodyValue::Bytes(_) => Err(EncodeFailure::new(
                body.describe(),
                "raw bytes are not JSON-encodable",
            )),
        }
    }
}

pub struct IdentityCompressor;

impl Compressor for IdentityCompressor {
    fn name(&self) -> &str {
        "IdentityCompressor"
    }

    fn compress(&self, input: &[u8]) -> Result<Bytes, EncodeFailure> {
        Ok(Bytes::copy_from_slice(input))
    }
}

pub struct GzipCompressor;

impl Compressor for GzipCompressor {
    fn name(&self) -> &str {
        "GzipCompressor"
    }

    fn compress(&self, input: &[u8]) -> Result<Bytes, EncodeFailure> {
        let failed =
            |err: std::io::Error| EncodeFailure::new(format!("{} raw bytes", input.len()), err.to_string());
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(input).map_err(failed)?;
        encoder.finish().map(Bytes::from).map_err(failed)
    }
}

pub struct DeflateCompressor;

impl Compressor for DeflateCompressor {
    fn name(&self) -> &str {
        "DeflateCompressor"
    }

    fn compress(&self, input: &[u8]) -> Result<Bytes, EncodeFailure> {
        let failed =
            |err: std::io::Error| EncodeFailure::new(format!("{} raw bytes", input.len()), err.to_string());
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(input).map_err(failed)?;
        encoder.finish().map(Bytes::from).map_err(failed)
    }
}

type EncoderMap = HashMap<String, Arc<dyn Encoder>, ahash::RandomState>;
type CompressorMap = HashMap<String, Arc<dyn Compressor>, ahash::RandomState>;

/// The static name-to-capability tables one `Endpoint` consults.
#[derive(Clone)]
pub struct CodecRegistry {
    media: EncoderMap,
    compression: CompressorMap,
}

impl Default for CodecRegistry {
    /// Registry with the stock codecs: `text/plain`, `application/json`,
    /// `identity`, `gzip`, `deflate`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_encoder("text/plain", Arc::new(PlainTextEncoder));
        registry.register_encoder("application/json", Arc::new(JsonEncoder));
        registry.register_compressor("identity", Arc::new(IdentityCompressor));
        registry.register_compressor("gzip", Arc::new(GzipCompressor));
        registry.register_compressor("deflate", Arc::new(DeflateCompressor));
        registry
    }
}

impl CodecRegistry {
    pub fn empty() -> Self {
        Self {
            media: EncoderMap::default(),
            compression: CompressorMap::default(),
        }
    }

    pub fn register_encoder(&mut self, media_type: impl Into<String>, encoder: Arc<dyn Encoder>) {
        self.media.insert(media_type.into().to_ascii_lowercase(), encoder);
    }

    pub fn register_compressor(
        &mut self,
        encoding: impl Into<String>,
        compressor: Arc<dyn Compressor>,
    ) {
        self.compression
            .insert(encoding.into().to_ascii_lowercase(), compressor);
    }

    pub fn encoder(&self, media_type: &str) -> Option<&Arc<dyn Encoder>> {
        self.media.get(&media_type.to_ascii_lowercase())
    }

    pub fn compressor(&self, encoding: &str) -> Option<&Arc<dyn Compressor>> {
        self.compression.get(&encoding.to_ascii_lowercase())
    }

    /// Constructor-time check that every value a resource can negotiate has
    /// a registered codec, for callers who want registry misconfiguration
    /// to fail at definition time instead of on the first request.
    pub fn validate<'a>(
        &self,
        media_types: impl IntoIterator<Item = &'a str>,
        encodings: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), EvalError> {
        for media_type in media_types {
            if self.encoder(media_type).is_none() {
                return Err(EvalError::MediaTypeCodecNotFound {
                    media_type: media_type.to_string(),
                });
            }
        }
        for encoding in encodings {
            if encoding != "*" && self.compressor(encoding).is_none() {
                return Err(EvalError::CompressionCodecNotFound {
                    encoding: encoding.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use serde_json::json;
    use std::io::Read;

    #[test]
    fn plain_text_renders_structured_values() {
        let encoder = PlainTextEncoder;
        assert_eq!(encoder.encode(&BodyValue::from("OK")).unwrap(), Bytes::from("OK"));
        assert_eq!(
            encoder.encode(&BodyValue::Json(json!("hello"))).unwrap(),
            Bytes::from("hello")
        );
        assert_eq!(
            encoder.encode(&BodyValue::Json(json!({"a": 1}))).unwrap(),
            Bytes::from(r#"{"a":1}"#)
        );
    }

    #[test]
    fn json_refuses_raw_bytes() {
        let err = JsonEncoder
            .encode(&BodyValue::Bytes(Bytes::from_static(b"\xff")))
            .unwrap_err();
        assert!(err.to_string().contains("not JSON-encodable"));
        assert!(err.value.contains("raw bytes"));
    }

    #[test]
    fn gzip_round_trips() {
        let compressed = GzipCompressor.compress(b"hello hello hello").unwrap();
        let mut decoder = GzDecoder::new(compressed.as_ref());
        let mut restored = String::new();
        decoder.read_to_string(&mut restored).unwrap();
        assert_eq!(restored, "hello hello hello");
    }

    #[test]
    fn default_registry_serves_stock_codecs() {
        let registry = CodecRegistry::default();
        assert!(registry.encoder("text/plain").is_some());
        assert!(registry.encoder("Application/JSON").is_some());
        assert!(registry.compressor("gzip").is_some());
        assert!(registry.encoder("application/xml").is_none());
    }

    #[test]
    fn validate_names_the_missing_codec() {
        let registry = CodecRegistry::default();
        let err = registry
            .validate(["text/plain", "application/xml"], ["identity"])
            .unwrap_err();
        assert!(err.to_string().contains("application/xml"));
        assert!(registry.validate(["application/json"], ["gzip", "*"]).is_ok());
    }
}
