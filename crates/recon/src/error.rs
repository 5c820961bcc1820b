use std::fmt;

use barkeep_core::EntityKind;
use barkeep_io::PayloadError;
use barkeep_store::StoreError;

#[derive(Debug)]
pub enum ImportError {
    /// Payload failed to decode or normalize.
    Payload(PayloadError),
    /// Persistence-layer failure.
    Store(StoreError),
    /// A required reference points at a source id with no mapping entry.
    MissingReference { kind: EntityKind, old_id: String },
    /// A recipe arrived without any ice reference; the destination schema
    /// requires one, so the whole import aborts.
    MissingIce { recipe: String },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payload(e) => write!(f, "payload error: {e}"),
            Self::Store(e) => write!(f, "store error: {e}"),
            Self::MissingReference { kind, old_id } => {
                write!(f, "unresolvable {kind} reference '{old_id}'")
            }
            Self::MissingIce { recipe } => {
                write!(f, "recipe '{recipe}' has no resolvable ice reference")
            }
        }
    }
}

impl std::error::Error for ImportError {}

impl From<PayloadError> for ImportError {
    fn from(e: PayloadError) -> Self {
        Self::Payload(e)
    }
}

impl From<StoreError> for ImportError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Payload(PayloadError::from(e))
    }
}
