use serde::Serialize;

use super::error::SimulationError;

pub const MIN_HORIZON_YEARS: u32 = 1;
pub const MAX_HORIZON_YEARS: u32 = 1000;
pub const MONTHS_PER_YEAR: u32 = 12;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub enum Broker {
    #[serde(rename = "GBM")]
    Gbm,
    Actinver,
    #[serde(rename = "IBKR")]
    Ibkr,
}

impl Broker {
    pub const ALL: [Broker; 3] = [Broker::Gbm, Broker::Actinver, Broker::Ibkr];

    pub fn name(self) -> &'static str {
        match self {
            Broker::Gbm => "GBM",
            Broker::Actinver => "Actinver",
            Broker::Ibkr => "IBKR",
        }
    }
}

/// One value per broker. Every broker always has an entry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct PerBroker<T> {
    #[serde(rename = "GBM")]
    pub gbm: T,
    #[serde(rename = "Actinver")]
    pub actinver: T,
    #[serde(rename = "IBKR")]
    pub ibkr: T,
}

impl<T> PerBroker<T> {
    pub fn from_fn(mut f: impl FnMut(Broker) -> T) -> Self {
        Self {
            gbm: f(Broker::Gbm),
            actinver: f(Broker::Actinver),
            ibkr: f(Broker::Ibkr),
        }
    }

    pub fn get(&self, broker: Broker) -> &T {
        match broker {
            Broker::Gbm => &self.gbm,
            Broker::Actinver => &self.actinver,
            Broker::Ibkr => &self.ibkr,
        }
    }

    pub fn get_mut(&mut self, broker: Broker) -> &mut T {
        match broker {
            Broker::Gbm => &mut self.gbm,
            Broker::Actinver => &mut self.actinver,
            Broker::Ibkr => &mut self.ibkr,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PerBroker<U> {
        PerBroker::from_fn(|broker| f(self.get(broker)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Broker, &T)> {
        Broker::ALL.into_iter().map(move |broker| (broker, self.get(broker)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    /// MXN invested every month.
    pub monthly_contribution: f64,
    /// MXN per USD. Must be > 0.
    pub exchange_rate: f64,
    pub annual_return_pct: f64,
    pub horizon_years: u32,
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            monthly_contribution: 10_000.0,
            exchange_rate: 17.5,
            annual_return_pct: 7.0,
            horizon_years: 1,
        }
    }
}

impl SimulationInput {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !self.exchange_rate.is_finite() || self.exchange_rate <= 0.0 {
            return Err(SimulationError::InvalidExchangeRate(self.exchange_rate));
        }
        if !self.monthly_contribution.is_finite() || self.monthly_contribution < 0.0 {
            return Err(SimulationError::InvalidContribution(
                self.monthly_contribution,
            ));
        }
        if !self.annual_return_pct.is_finite() || self.annual_return_pct < -100.0 {
            return Err(SimulationError::InvalidAnnualReturn(self.annual_return_pct));
        }
        if !(MIN_HORIZON_YEARS..=MAX_HORIZON_YEARS).contains(&self.horizon_years) {
            return Err(SimulationError::HorizonOutOfRange(self.horizon_years));
        }
        let contributed_usd =
            self.monthly_contribution / self.exchange_rate * f64::from(self.total_months());
        if !contributed_usd.is_finite() || !(contributed_usd * self.exchange_rate).is_finite() {
            return Err(SimulationError::ContributionOverflow {
                contribution: self.monthly_contribution,
                exchange_rate: self.exchange_rate,
            });
        }
        Ok(())
    }

    pub fn total_months(&self) -> u32 {
        self.horizon_years * MONTHS_PER_YEAR
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct BrokerTotals {
    /// Net-of-fee compounded value in MXN.
    #[serde(rename = "value")]
    pub accumulated_value: f64,
    /// Cumulative fees in MXN.
    #[serde(rename = "fees")]
    pub accumulated_fees: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthSnapshot {
    #[serde(rename = "month")]
    pub month_index: u32,
    /// Raw contributions to date in MXN, before fees and returns.
    #[serde(rename = "invested")]
    pub total_invested: f64,
    #[serde(rename = "brokers")]
    pub per_broker: PerBroker<BrokerTotals>,
}

impl MonthSnapshot {
    pub fn broker(&self, broker: Broker) -> &BrokerTotals {
        self.per_broker.get(broker)
    }
}
