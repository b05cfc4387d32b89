//! Error kinds the engine must distinguish (spec §7).
//!
//! `Infeasible` is deliberately absent: a terminal the engine cannot connect
//! is reported in-band as an `unrouted`/`problematic` entry, not as an
//! `Err`, so a single bad cable never fails the whole request.

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InputInvalid(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn input_invalid(msg: impl Into<String>) -> Self {
        Self::InputInvalid(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
