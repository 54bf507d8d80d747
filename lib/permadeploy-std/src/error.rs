use thiserror::Error;

#[derive(Debug, Error)]
pub enum PermadeployStdError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidEnvValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("{0} is not valid unicode")]
    NotUnicode(String),
}

pub type PermadeployStdResult<T> = Result<T, PermadeployStdError>;
