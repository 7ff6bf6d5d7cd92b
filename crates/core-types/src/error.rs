use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("{field} must be greater than 0, got {value}")]
    InvalidRate { field: &'static str, value: Decimal },

    #[error("{field} must be a percentage between 0 and 100, got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },

    #[error("{field} cannot be negative, got {value}")]
    NegativeValue { field: &'static str, value: Decimal },
}
