use std::fmt;

#[derive(Debug)]
pub enum PayloadError {
    /// Payload is not valid JSON or does not match any known shape.
    Json(String),
    /// A required field is absent after legacy decoding.
    MissingField { entity: &'static str, field: &'static str, id: String },
    /// An export item carries none of the supported entity kinds.
    UnknownExportKind,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "payload parse error: {msg}"),
            Self::MissingField { entity, field, id } => {
                write!(f, "{entity} '{id}': missing required field '{field}'")
            }
            Self::UnknownExportKind => {
                write!(f, "export item carries no supported entity kind")
            }
        }
    }
}

impl std::error::Error for PayloadError {}

impl From<serde_json::Error> for PayloadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
