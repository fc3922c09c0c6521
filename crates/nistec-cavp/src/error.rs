use thiserror::Error;

#[derive(Debug, Error)]
pub enum CavpError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: field `{field}` is not valid hex")]
    InvalidHex { line: usize, field: String },

    #[error("failed to read vector file: {0}")]
    Io(#[from] std::io::Error),
}
