use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CoreError),

    #[error("Invalid stock range: {0}")]
    InvalidRange(String),

    #[error("Calculation error in metric '{0}': value out of range")]
    Calculation(&'static str),
}
