use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("predictor failed: {0}")]
    Predictor(String),

    #[error("tracking pipeline is closed")]
    PipelineClosed,
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn predictor<S: Into<String>>(msg: S) -> Self {
        Self::Predictor(msg.into())
    }
}
