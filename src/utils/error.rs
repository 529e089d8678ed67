use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("{message}")]
    ServerError { code: Option<u16>, message: String },

    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    #[error("{kind} not found: {name}")]
    NotFoundError { kind: &'static str, name: String },

    #[error("{message}")]
    PreconditionError { message: String },

    #[error("Publish job {job_id} ended with {status}: {message}")]
    JobFailedError {
        job_id: String,
        status: String,
        message: String,
    },

    #[error("Invalid value for {field} '{value}': {reason}")]
    InvalidArgumentError {
        field: String,
        value: String,
        reason: String,
    },
}

impl AdminError {
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionError {
            message: message.into(),
        }
    }

    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFoundError {
            kind,
            name: name.into(),
        }
    }

    /// 伺服器回報的錯誤碼 (若有)
    pub fn server_code(&self) -> Option<u16> {
        match self {
            Self::ServerError { code, .. } => *code,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
