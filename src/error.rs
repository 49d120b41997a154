use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("transfer initiation failed: {0}")]
    TransferInitiation(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("widget error: {0}")]
    Widget(String),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
