/// Result alias that carries the custom [`ShadesError`] type.
pub type Result<T> = std::result::Result<T, ShadesError>;

/// Common error type for the core crate.
///
/// Only the outer surfaces (configuration, message text, effect lookup,
/// audio traces and recordings) can fail. Effect steps never return errors.
#[derive(Debug, thiserror::Error)]
pub enum ShadesError {
    /// Free-form message for conditions without a dedicated variant.
    #[error("{0}")]
    Message(String),
    /// A caller supplied a value outside of what the engine supports.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// No effect is registered under the requested name.
    #[error("unknown effect `{0}`")]
    UnknownEffect(String),
    /// Message text contains a character the built-in font cannot draw.
    #[error("character {0:?} has no glyph in the built-in font")]
    UnsupportedGlyph(char),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl ShadesError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for ShadesError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for ShadesError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
