/// Convenience result type used across greetcard.
pub type GreetcardResult<T> = Result<T, GreetcardError>;

/// Message shown to the user whenever a card run ends in `Failed`.
pub const USER_FAILURE_MESSAGE: &str = "خطا در ساخت کارت تبریک. لطفاً دوباره تلاش کنید.";

/// Top-level error taxonomy for the card pipeline.
#[derive(thiserror::Error, Debug)]
pub enum GreetcardError {
    /// Invalid request or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The template asset could not be fetched or decoded.
    ///
    /// Recovered inside the template provider; never surfaced as a run failure.
    #[error("asset unavailable: {0}")]
    AssetUnavailable(String),

    /// The payload does not fit into the barcode format.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Surface allocation failed or an input raster was unusable at draw time.
    #[error("composition error: {0}")]
    Composition(String),

    /// Any other fault caught at the orchestrator boundary.
    #[error("unexpected failure: {0}")]
    Unexpected(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GreetcardError {
    /// Build a [`GreetcardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GreetcardError::AssetUnavailable`] value.
    pub fn asset_unavailable(msg: impl Into<String>) -> Self {
        Self::AssetUnavailable(msg.into())
    }

    /// Build a [`GreetcardError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`GreetcardError::Composition`] value.
    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    /// Build a [`GreetcardError::Unexpected`] value.
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Localized message for the presentation layer.
    ///
    /// `Display` keeps the technical reason for logs; users always see the same sentence.
    pub fn user_message(&self) -> &'static str {
        USER_FAILURE_MESSAGE
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
