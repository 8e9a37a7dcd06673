use crate::compose::compositor::CardResult;
use crate::foundation::error::{GreetcardError, GreetcardResult};

/// Identity of one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardRequest {
    board_id: String,
}

impl CardRequest {
    /// Fails with [`GreetcardError::Validation`] for an empty or blank board id.
    pub fn new(board_id: impl Into<String>) -> GreetcardResult<Self> {
        let board_id = board_id.into();
        if board_id.trim().is_empty() {
            return Err(GreetcardError::validation("board id must be non-empty"));
        }
        Ok(Self { board_id })
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }
}

/// Lifecycle of the card as seen by the presentation layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    Loading {
        board_id: String,
    },
    Ready(CardResult),
    Failed {
        board_id: String,
        /// Technical reason, for logs.
        reason: String,
        /// Localized sentence shown to the user.
        message: &'static str,
    },
}

impl GenerationState {
    pub(crate) fn failed(board_id: &str, error: &GreetcardError) -> Self {
        Self::Failed {
            board_id: board_id.to_string(),
            reason: error.to_string(),
            message: error.user_message(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn result(&self) -> Option<&CardResult> {
        match self {
            Self::Ready(r) => Some(r),
            _ => None,
        }
    }

    /// Short label for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Ready(_) => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Handle for one opened run; commits carrying a superseded ticket are discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunTicket {
    pub(crate) run_id: u64,
    pub(crate) request: CardRequest,
}

impl RunTicket {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn request(&self) -> &CardRequest {
        &self.request
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/state.rs"]
mod tests;
