//! Payload conversion between opaque history strings and typed values
//!
//! Every payload slot the service stores (inputs, outputs, details) is an
//! opaque string. A [`DataConverter`] turns values into those strings and
//! back. The trait core is object-safe (string ⇄ [`serde_json::Value`]) so it
//! can live behind an `Arc<dyn DataConverter>`; the typed helpers are blanket
//! provided by [`DataConverterExt`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Error from serializing or deserializing an opaque payload.
#[derive(Debug, thiserror::Error)]
#[error("payload conversion failed: {message}")]
pub struct ConversionError {
    message: String,
    #[source]
    source: Option<serde_json::Error>,
}

impl ConversionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for ConversionError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Object-safe core of payload conversion.
///
/// Implementations are free to use any wire format as long as a value
/// round-trips; the engine only ever holds the produced strings.
pub trait DataConverter: Send + Sync {
    /// Render a JSON value as an opaque payload string.
    fn write_value(&self, value: &Value) -> Result<String, ConversionError>;

    /// Parse an opaque payload string back into a JSON value.
    fn read_value(&self, data: &str) -> Result<Value, ConversionError>;
}

/// Typed conversion helpers for any [`DataConverter`].
pub trait DataConverterExt: DataConverter {
    /// Serialize any value to its opaque payload string.
    fn to_data<T: Serialize>(&self, value: &T) -> Result<String, ConversionError> {
        let value = serde_json::to_value(value)?;
        self.write_value(&value)
    }

    /// Deserialize an opaque payload string into a target type.
    fn from_data<T: DeserializeOwned>(&self, data: &str) -> Result<T, ConversionError> {
        let value = self.read_value(data)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Deserialize a possibly-absent payload; absence reads as JSON null,
    /// so steps recorded without a result deserialize cleanly into `()` or
    /// option types.
    fn from_optional_data<T: DeserializeOwned>(
        &self,
        data: Option<&str>,
    ) -> Result<T, ConversionError> {
        let value = match data {
            Some(data) => self.read_value(data)?,
            None => Value::Null,
        };
        Ok(serde_json::from_value(value)?)
    }
}

impl<C: DataConverter + ?Sized> DataConverterExt for C {}

/// The default converter: payloads are JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDataConverter;

impl DataConverter for JsonDataConverter {
    fn write_value(&self, value: &Value) -> Result<String, ConversionError> {
        Ok(serde_json::to_string(value)?)
    }

    fn read_value(&self, data: &str) -> Result<Value, ConversionError> {
        Ok(serde_json::from_str(data)?)
    }
}
