use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad `{kind}` params: {source}")]
    Params {
        kind: String,
        source: serde_json::Error,
    },
    #[error("unknown message type `{0}`")]
    UnknownType(String),
    #[error("tick received before start_game")]
    NotStarted,
    #[error("tick {0} has no entry for the local player")]
    MissingSelf(i32),
}

impl ProtocolError {
    /// Type of the message that failed, when the line got that far.
    pub fn message_type(&self) -> Option<&str> {
        match self {
            ProtocolError::Params { kind, .. } | ProtocolError::UnknownType(kind) => {
                Some(kind.as_str())
            }
            ProtocolError::NotStarted | ProtocolError::MissingSelf(_) => Some("tick"),
            ProtocolError::Json(_) => None,
        }
    }
}
