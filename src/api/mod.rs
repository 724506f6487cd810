use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Broker, FeeSchedule, MonthSnapshot, PerBroker, RawInput, SimulationError, SimulationInput,
    fee_schedules, fee_totals, monthly_return_rate, simulate,
};

#[derive(Parser, Debug)]
#[command(
    name = "brokersim",
    about = "Compare projected growth and fees across GBM, Actinver and IBKR"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the monthly projection and print it.
    Simulate(SimulateArgs),
    /// Serve the projection as a JSON HTTP API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[arg(
        long,
        default_value_t = 10_000.0,
        allow_negative_numbers = true,
        help = "Amount invested every month in MXN; negative values clamp to 0"
    )]
    monthly_contribution: f64,
    #[arg(
        long,
        default_value_t = 17.5,
        allow_negative_numbers = true,
        help = "Exchange rate in MXN per USD; clamps to a minimum of 0.01"
    )]
    exchange_rate: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        allow_negative_numbers = true,
        help = "Expected annual return in percent, e.g. 7"
    )]
    annual_return: f64,
    #[arg(
        long,
        default_value_t = 1.0,
        allow_negative_numbers = true,
        help = "Horizon in whole years, clamped to 1..=1000"
    )]
    years: f64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl From<&SimulateArgs> for RawInput {
    fn from(args: &SimulateArgs) -> Self {
        RawInput {
            monthly_contribution: args.monthly_contribution,
            exchange_rate: args.exchange_rate,
            annual_return_pct: args.annual_return,
            horizon_years: args.years,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    #[serde(alias = "monthlyInvestment")]
    monthly_contribution: Option<f64>,
    exchange_rate: Option<f64>,
    #[serde(alias = "annualReturnPct")]
    annual_return: Option<f64>,
    #[serde(alias = "horizonYears")]
    years: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    input: SimulationInput,
    monthly_return_rate: f64,
    months: Vec<MonthSnapshot>,
    total_fees: PerBroker<f64>,
}

#[derive(Debug, Serialize)]
struct BrokersResponse {
    brokers: Vec<FeeSchedule>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn raw_input_from_payload(payload: SimulatePayload) -> RawInput {
    let mut raw = RawInput::from(SimulationInput::default());

    if let Some(v) = payload.monthly_contribution {
        raw.monthly_contribution = v;
    }
    if let Some(v) = payload.exchange_rate {
        raw.exchange_rate = v;
    }
    if let Some(v) = payload.annual_return {
        raw.annual_return_pct = v;
    }
    if let Some(v) = payload.years {
        raw.horizon_years = v;
    }

    raw
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<SimulationInput, String> {
    SimulationInput::clamped(raw_input_from_payload(payload)).map_err(|e| e.to_string())
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<SimulationInput, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn build_simulate_response(input: SimulationInput) -> Result<SimulateResponse, SimulationError> {
    let months = simulate(&input)?;
    let total_fees = fee_totals(&months).unwrap_or_default();
    Ok(SimulateResponse {
        input,
        monthly_return_rate: monthly_return_rate(input.annual_return_pct),
        months,
        total_fees,
    })
}

/// Runs the `simulate` subcommand and returns the rendered output.
pub fn run_simulate_command(args: &SimulateArgs) -> Result<String, String> {
    let input = SimulationInput::clamped(args.into()).map_err(|e| e.to_string())?;
    let response = build_simulate_response(input).map_err(|e| e.to_string())?;
    match args.format {
        OutputFormat::Table => Ok(render_table(&response)),
        OutputFormat::Json => serde_json::to_string_pretty(&response)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| format!("Failed to serialize response: {e}")),
    }
}

fn render_table(response: &SimulateResponse) -> String {
    let mut out = format!("{:>6} {:>16}", "month", "invested");
    for broker in Broker::ALL {
        let fees_label = format!("{} fees", broker.name());
        out.push_str(&format!(" {:>16} {:>14}", broker.name(), fees_label));
    }
    out.push('\n');

    for snapshot in &response.months {
        out.push_str(&format!(
            "{:>6} {:>16.2}",
            snapshot.month_index, snapshot.total_invested
        ));
        for (_, totals) in snapshot.per_broker.iter() {
            out.push_str(&format!(
                " {:>16.2} {:>14.2}",
                totals.accumulated_value, totals.accumulated_fees
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "\nTotal fees after {} year(s):\n",
        response.input.horizon_years
    ));
    for (broker, fees) in response.total_fees.iter() {
        out.push_str(&format!("  {:<9} {:>14.2}\n", broker.name(), fees));
    }
    out
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("brokersim HTTP API listening on http://{addr}");
    tracing::info!("Local access: http://127.0.0.1:{port}/api/simulate");

    axum::serve(listener, app).await
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/brokers", get(brokers_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler)
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn brokers_handler() -> Response {
    json_response(
        StatusCode::OK,
        BrokersResponse {
            brokers: fee_schedules(),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(
    payload: Result<Query<SimulatePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => rejected_payload_response(&rejection.body_text()),
    }
}

async fn simulate_post_handler(
    payload: Result<Json<SimulatePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => rejected_payload_response(&rejection.body_text()),
    }
}

fn rejected_payload_response(msg: &str) -> Response {
    tracing::warn!(error = %msg, "malformed simulation payload");
    error_response(StatusCode::BAD_REQUEST, msg)
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let input = match api_request_from_payload(payload) {
        Ok(input) => input,
        Err(msg) => {
            tracing::warn!(error = %msg, "rejected simulation request");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    match build_simulate_response(input) {
        Ok(response) => {
            tracing::debug!(
                ?input,
                months = response.months.len(),
                "simulation computed"
            );
            json_response(StatusCode::OK, response)
        }
        Err(e) => {
            tracing::warn!(error = %e, ?input, "simulation rejected input");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
