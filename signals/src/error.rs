use thiserror::Error;

/// A failure raised by a slot while it was being invoked.
/// Signals catch these at the invocation site; they are logged and never returned from `notify`.
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("slot panicked: {message}")]
    Panicked { message: String },
    #[error("slot failed: {0}")]
    Failed(Box<dyn std::error::Error + 'static>),
}

impl SlotError {
    /// Converts a payload caught by `catch_unwind` into an error.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_string()
        };
        SlotError::Panicked { message }
    }
}
