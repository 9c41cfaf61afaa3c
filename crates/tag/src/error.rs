use thiserror::Error;

pub type Result<T> = std::result::Result<T, TagError>;

/// Parse failures for reference tags. All variants are recoverable: batch
/// callers skip the offending tag and continue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("malformed tag at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    #[error("unknown type designator: {code}")]
    UnknownKind { code: String },

    #[error("malformed metadata: {reason}")]
    MalformedMetadata { reason: String },
}

impl TagError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        TagError::Malformed {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn metadata(reason: impl Into<String>) -> Self {
        TagError::MalformedMetadata {
            reason: reason.into(),
        }
    }
}
