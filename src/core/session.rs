use super::engine::{fee_totals, simulate};
use super::error::SimulationError;
use super::input::{
    clamp_annual_return_pct, clamp_exchange_rate, clamp_horizon_years, clamp_monthly_contribution,
};
use super::types::{MonthSnapshot, PerBroker, SimulationInput};

/// Current inputs plus the projection derived from them.
///
/// Every setter clamps its raw value and recomputes the whole sequence before
/// returning, so readers never see snapshots from a previous input. A rejected
/// value leaves both the input and the sequence untouched.
#[derive(Debug, Clone)]
pub struct Session {
    input: SimulationInput,
    snapshots: Vec<MonthSnapshot>,
}

impl Default for Session {
    fn default() -> Self {
        let input = SimulationInput::default();
        Self {
            snapshots: simulate(&input).unwrap_or_default(),
            input,
        }
    }
}

impl Session {
    pub fn new(input: SimulationInput) -> Result<Self, SimulationError> {
        let snapshots = simulate(&input)?;
        Ok(Self { input, snapshots })
    }

    pub fn input(&self) -> &SimulationInput {
        &self.input
    }

    pub fn snapshots(&self) -> &[MonthSnapshot] {
        &self.snapshots
    }

    pub fn fee_totals(&self) -> Option<PerBroker<f64>> {
        fee_totals(&self.snapshots)
    }

    pub fn set_monthly_contribution(&mut self, raw: f64) -> Result<(), SimulationError> {
        let value = clamp_monthly_contribution(raw)?;
        self.update(|input| input.monthly_contribution = value)
    }

    pub fn set_exchange_rate(&mut self, raw: f64) -> Result<(), SimulationError> {
        let value = clamp_exchange_rate(raw)?;
        self.update(|input| input.exchange_rate = value)
    }

    pub fn set_annual_return_pct(&mut self, raw: f64) -> Result<(), SimulationError> {
        let value = clamp_annual_return_pct(raw)?;
        self.update(|input| input.annual_return_pct = value)
    }

    pub fn set_horizon_years(&mut self, raw: f64) -> Result<(), SimulationError> {
        let value = clamp_horizon_years(raw)?;
        self.update(|input| input.horizon_years = value)
    }

    fn update(&mut self, apply: impl FnOnce(&mut SimulationInput)) -> Result<(), SimulationError> {
        let mut next = self.input;
        apply(&mut next);
        self.snapshots = simulate(&next)?;
        self.input = next;
        Ok(())
    }
}
