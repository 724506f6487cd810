use super::error::SimulationError;
use super::types::{Broker, BrokerTotals, MonthSnapshot, PerBroker, SimulationInput};

/// Running USD totals for one broker.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    value_usd: f64,
    fees_usd: f64,
}

impl Accumulator {
    fn contribute(&mut self, broker: Broker, contribution_usd: f64, growth_factor: f64) {
        let fee = broker.monthly_fee(contribution_usd);
        self.fees_usd += fee;
        self.value_usd = (self.value_usd + contribution_usd - fee) * growth_factor;
    }

    fn is_finite(self) -> bool {
        self.value_usd.is_finite() && self.fees_usd.is_finite()
    }

    fn to_mxn(self, exchange_rate: f64) -> BrokerTotals {
        BrokerTotals {
            accumulated_value: self.value_usd * exchange_rate,
            accumulated_fees: self.fees_usd * exchange_rate,
        }
    }
}

/// Equivalent monthly compounding rate for an annual percentage return.
/// Negative for a loss, zero for a flat year.
pub fn monthly_return_rate(annual_return_pct: f64) -> f64 {
    (1.0 + annual_return_pct / 100.0).powf(1.0 / 12.0) - 1.0
}

/// Projects every month of the horizon for all brokers.
///
/// Each month the MXN contribution is converted to USD, the broker fee is
/// taken out, the remainder is added to the running value and the whole
/// balance grows by one month of return. Values and fees are reported back
/// in MXN. The running totals are carried forward, so month `m` is the same
/// sequence of operations as re-walking months `1..=m` from zero.
pub fn simulate(input: &SimulationInput) -> Result<Vec<MonthSnapshot>, SimulationError> {
    input.validate()?;

    let months = input.total_months();
    let growth_factor = 1.0 + monthly_return_rate(input.annual_return_pct);
    let contribution_usd = input.monthly_contribution / input.exchange_rate;

    let mut accumulators = PerBroker::<Accumulator>::default();
    let mut snapshots = Vec::with_capacity(months as usize);

    for month_index in 1..=months {
        for broker in Broker::ALL {
            accumulators
                .get_mut(broker)
                .contribute(broker, contribution_usd, growth_factor);
        }

        let per_broker = accumulators.map(|acc| acc.to_mxn(input.exchange_rate));
        let finite = accumulators.iter().all(|(_, acc)| acc.is_finite())
            && per_broker
                .iter()
                .all(|(_, t)| t.accumulated_value.is_finite() && t.accumulated_fees.is_finite());
        if !finite {
            return Err(SimulationError::NonFiniteResult { month: month_index });
        }

        snapshots.push(MonthSnapshot {
            month_index,
            total_invested: input.monthly_contribution * f64::from(month_index),
            per_broker,
        });
    }

    Ok(snapshots)
}

/// Cumulative MXN fees per broker at the end of the horizon.
pub fn fee_totals(snapshots: &[MonthSnapshot]) -> Option<PerBroker<f64>> {
    snapshots
        .last()
        .map(|last| last.per_broker.map(|totals| totals.accumulated_fees))
}
