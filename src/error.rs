use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Network error")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid payload")]
    Decode(#[from] serde_json::Error),

    #[error("Internal Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message shown to the user: the server's own message verbatim where one
    /// exists, a generic fallback otherwise. Errors never crash the page.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthenticated => "Please sign in first".to_string(),
            AppError::Forbidden => "Admin access required".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Backend { message, .. } if !message.is_empty() => message.clone(),
            AppError::Backend { .. } => "Something went wrong. Please try again.".to_string(),
            AppError::Transport(_) => {
                "Connection problem. Please check your network and try again.".to_string()
            }
            AppError::Decode(_) | AppError::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// True for failures the user may retry by repeating the action.
    /// Nothing in this crate auto-retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Transport(_) | AppError::Backend { .. })
    }
}

pub type AppResult<T> = Result<T, AppError>;
