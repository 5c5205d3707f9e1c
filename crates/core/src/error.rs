use crate::pitch::PITCH_NAMES;

/// Result alias that carries the custom [`ChordError`] type.
pub type Result<T> = std::result::Result<T, ChordError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum ChordError {
    /// The root token did not match any of the twelve pitch-class names after
    /// folding its first character to uppercase.
    #[error("unknown root note `{name}`; expected one of {}", PITCH_NAMES.join(", "))]
    UnknownRoot { name: String },
    /// Input ended before both a root and a mode could be read.
    #[error("expected a root note followed by a mode character (M/m)")]
    MalformedInput,
    /// Rejected mode character under the strict mode policy.
    #[error("unsupported mode `{flag}`; expected `M` or `m`")]
    InvalidMode { flag: char },
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration could not be parsed or output could not be encoded.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChordError {
    pub fn unknown_root<T: Into<String>>(name: T) -> Self {
        Self::UnknownRoot { name: name.into() }
    }

    /// Errors that only affect a single query. The interactive loop reports
    /// these and keeps reading.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownRoot { .. } | Self::MalformedInput | Self::InvalidMode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_root_lists_valid_names() {
        let err = ChordError::unknown_root("H");
        let message = err.to_string();
        assert!(message.contains("`H`"));
        assert!(message.contains("A, A#, B"));
        assert!(message.ends_with("G#"));
    }

    #[test]
    fn classifies_recoverable_errors() {
        assert!(ChordError::unknown_root("H").is_recoverable());
        assert!(ChordError::MalformedInput.is_recoverable());
        assert!(ChordError::InvalidMode { flag: 'x' }.is_recoverable());

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(!ChordError::from(io).is_recoverable());
    }
}
