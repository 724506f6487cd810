use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("exchange rate must be a finite value > 0, got {0}")]
    InvalidExchangeRate(f64),

    #[error("monthly contribution must be a finite value >= 0, got {0}")]
    InvalidContribution(f64),

    #[error("annual return must be a finite percentage >= -100, got {0}")]
    InvalidAnnualReturn(f64),

    #[error("horizon must be between 1 and 1000 years, got {0}")]
    HorizonOutOfRange(u32),

    #[error("monthly contribution of {contribution} at exchange rate {exchange_rate} overflows the projection")]
    ContributionOverflow { contribution: f64, exchange_rate: f64 },

    #[error("projection is not finite from month {month}; use smaller inputs")]
    NonFiniteResult { month: u32 },

    #[error("{field} must be a finite number")]
    NonFiniteInput { field: &'static str },
}
