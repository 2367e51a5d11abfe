//! The `{success, message, data}` wrapper every response is nested in

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Standard response envelope
///
/// `data` is optional at parse time: delete responses and most error bodies
/// carry no payload. Callers that need a payload use [`Envelope::into_data`]
/// or check `data` themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Failure envelope with no payload
    ///
    /// Also used to stand in for error bodies that could not be decoded, in
    /// which case `message` holds the raw body text.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Case-sensitive substring check against `message`; false when absent
    pub fn message_contains(&self, needle: &str) -> bool {
        self.message
            .as_deref()
            .map(|message| message.contains(needle))
            .unwrap_or(false)
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Payload type for responses that carry no data (deletes)
///
/// Accepts any JSON value and throws it away, so a backend that echoes
/// something under `data` does not break decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Void;

impl<'de> Deserialize<'de> for Void {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde::de::IgnoredAny::deserialize(deserializer)?;
        Ok(Void)
    }
}

impl Serialize for Void {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_unit()
    }
}
