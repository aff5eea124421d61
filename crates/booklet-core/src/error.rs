use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookletError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Incorrect password for {0}")]
    IncorrectPassword(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("No documents to process")]
    NoDocuments,

    #[error("PDF operation failed: {0}")]
    OperationError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
