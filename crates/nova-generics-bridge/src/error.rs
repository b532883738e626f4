pub type Result<T> = std::result::Result<T, BridgeError>;

/// Malformed class-file metadata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("invalid signature `{signature}` at offset {offset}")]
    InvalidSignature { signature: String, offset: usize },
}
