mod engine;
mod error;
mod fees;
mod input;
mod session;
mod types;

pub use engine::{fee_totals, monthly_return_rate, simulate};
pub use error::SimulationError;
pub use fees::{FeeSchedule, fee_schedules};
pub use input::{MIN_EXCHANGE_RATE, RawInput};
pub use session::Session;
pub use types::{
    Broker, BrokerTotals, MAX_HORIZON_YEARS, MIN_HORIZON_YEARS, MONTHS_PER_YEAR, MonthSnapshot,
    PerBroker, SimulationInput,
};
