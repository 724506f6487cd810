use super::error::SimulationError;
use super::types::{MAX_HORIZON_YEARS, MIN_HORIZON_YEARS, SimulationInput};

pub const MIN_EXCHANGE_RATE: f64 = 0.01;

/// Unclamped values as typed by a user.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawInput {
    pub monthly_contribution: f64,
    pub exchange_rate: f64,
    pub annual_return_pct: f64,
    pub horizon_years: f64,
}

impl From<SimulationInput> for RawInput {
    fn from(input: SimulationInput) -> Self {
        Self {
            monthly_contribution: input.monthly_contribution,
            exchange_rate: input.exchange_rate,
            annual_return_pct: input.annual_return_pct,
            horizon_years: f64::from(input.horizon_years),
        }
    }
}

fn finite(value: f64, field: &'static str) -> Result<f64, SimulationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimulationError::NonFiniteInput { field })
    }
}

pub fn clamp_monthly_contribution(value: f64) -> Result<f64, SimulationError> {
    Ok(finite(value, "monthly contribution")?.max(0.0))
}

pub fn clamp_exchange_rate(value: f64) -> Result<f64, SimulationError> {
    Ok(finite(value, "exchange rate")?.max(MIN_EXCHANGE_RATE))
}

pub fn clamp_annual_return_pct(value: f64) -> Result<f64, SimulationError> {
    finite(value, "annual return")
}

/// Whole years, truncated toward zero and clamped to the supported horizon.
pub fn clamp_horizon_years(value: f64) -> Result<u32, SimulationError> {
    let years = finite(value, "years")?.trunc();
    let clamped = years.clamp(f64::from(MIN_HORIZON_YEARS), f64::from(MAX_HORIZON_YEARS));
    Ok(clamped as u32)
}

impl SimulationInput {
    /// Applies the input-field clamping rules. Annual return is passed through
    /// untouched, so a return below -100% is still rejected by the engine.
    pub fn clamped(raw: RawInput) -> Result<Self, SimulationError> {
        Ok(Self {
            monthly_contribution: clamp_monthly_contribution(raw.monthly_contribution)?,
            exchange_rate: clamp_exchange_rate(raw.exchange_rate)?,
            annual_return_pct: clamp_annual_return_pct(raw.annual_return_pct)?,
            horizon_years: clamp_horizon_years(raw.horizon_years)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_contribution_clamps_to_zero() {
        assert_eq!(clamp_monthly_contribution(-500.0), Ok(0.0));
        assert_eq!(clamp_monthly_contribution(1_250.5), Ok(1_250.5));
    }

    #[test]
    fn exchange_rate_has_a_floor() {
        assert_eq!(clamp_exchange_rate(0.0), Ok(MIN_EXCHANGE_RATE));
        assert_eq!(clamp_exchange_rate(-3.0), Ok(MIN_EXCHANGE_RATE));
        assert_eq!(clamp_exchange_rate(17.5), Ok(17.5));
    }

    #[test]
    fn years_truncate_and_clamp() {
        assert_eq!(clamp_horizon_years(0.0), Ok(1));
        assert_eq!(clamp_horizon_years(-4.0), Ok(1));
        assert_eq!(clamp_horizon_years(2.9), Ok(2));
        assert_eq!(clamp_horizon_years(1000.0), Ok(1000));
        assert_eq!(clamp_horizon_years(5000.0), Ok(1000));
    }

    #[test]
    fn annual_return_is_not_clamped() {
        assert_eq!(clamp_annual_return_pct(-250.0), Ok(-250.0));
        assert_eq!(clamp_annual_return_pct(300.0), Ok(300.0));
    }

    #[test]
    fn non_finite_values_are_rejected_with_field_name() {
        let err = clamp_exchange_rate(f64::NAN).expect_err("NaN must be rejected");
        assert_eq!(
            err,
            SimulationError::NonFiniteInput {
                field: "exchange rate"
            }
        );
        assert!(err.to_string().contains("exchange rate"));
        assert!(clamp_horizon_years(f64::INFINITY).is_err());
        assert!(clamp_monthly_contribution(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn clamped_input_always_validates_for_sane_returns() {
        let input = SimulationInput::clamped(RawInput {
            monthly_contribution: -10.0,
            exchange_rate: 0.0,
            annual_return_pct: 7.0,
            horizon_years: 0.0,
        })
        .expect("finite values");

        assert_eq!(input.monthly_contribution, 0.0);
        assert_eq!(input.exchange_rate, MIN_EXCHANGE_RATE);
        assert_eq!(input.horizon_years, 1);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn default_input_round_trips_through_clamping() {
        let input = SimulationInput::default();
        let clamped = SimulationInput::clamped(input.into()).expect("finite values");
        assert_eq!(clamped, input);
    }
}
