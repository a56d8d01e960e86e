use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{CelebrationState, GoalResult, Inputs, compute, evaluate_celebration};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Savings goal projector (disposable income, months to goal, progress)"
)]
struct Cli {
    #[arg(long, default_value_t = 0.0, help = "Monthly take-home income")]
    monthly_income: f64,
    #[arg(long, default_value_t = 0.0, help = "Total monthly expenses")]
    monthly_expenses: f64,
    #[arg(long, default_value_t = 0.0, help = "Savings goal to project against")]
    savings_goal: f64,
    #[arg(long, default_value_t = 0.0, help = "Amount already put aside")]
    current_savings: f64,
}

/// Wire payload for `/api/evaluate`. Every field is optional; absent
/// amounts fall back to the CLI defaults (all zero). `celebrated` carries
/// the client's celebration flag so the server can stay stateless.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EvaluatePayload {
    #[serde(alias = "monthly_income", alias = "income")]
    monthly_income: Option<f64>,
    #[serde(alias = "monthly_expenses", alias = "expenses")]
    monthly_expenses: Option<f64>,
    #[serde(alias = "savings_goal", alias = "goal")]
    savings_goal: Option<f64>,
    #[serde(alias = "current_savings", alias = "current")]
    current_savings: Option<f64>,
    celebrated: Option<bool>,
}

#[derive(Debug)]
struct EvaluateRequest {
    inputs: Inputs,
    celebration: CelebrationState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateResponse {
    #[serde(flatten)]
    result: GoalResult,
    /// Genuinely reached, with the zero-goal vacuous case filtered out.
    goal_reached: bool,
    /// Fire the celebration animation now.
    celebrate: bool,
    /// Celebration flag for the client to echo back on its next request.
    celebrated: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// The engine requires finite numbers; anything else counts as "no input"
/// and becomes zero, matching what the web form does with unparseable text.
fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn build_inputs(cli: Cli) -> Inputs {
    Inputs {
        monthly_income: sanitize_amount(cli.monthly_income),
        monthly_expenses: sanitize_amount(cli.monthly_expenses),
        savings_goal: sanitize_amount(cli.savings_goal),
        current_savings: sanitize_amount(cli.current_savings),
    }
}

fn default_cli_for_api() -> Cli {
    Cli {
        monthly_income: 0.0,
        monthly_expenses: 0.0,
        savings_goal: 0.0,
        current_savings: 0.0,
    }
}

fn evaluate_request_from_payload(payload: EvaluatePayload) -> EvaluateRequest {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.monthly_income {
        cli.monthly_income = v;
    }
    if let Some(v) = payload.monthly_expenses {
        cli.monthly_expenses = v;
    }
    if let Some(v) = payload.savings_goal {
        cli.savings_goal = v;
    }
    if let Some(v) = payload.current_savings {
        cli.current_savings = v;
    }

    let celebration = if payload.celebrated.unwrap_or(false) {
        CelebrationState::Celebrated
    } else {
        CelebrationState::Idle
    };

    EvaluateRequest {
        inputs: build_inputs(cli),
        celebration,
    }
}

fn build_evaluate_response(request: &EvaluateRequest) -> EvaluateResponse {
    let result = compute(&request.inputs);
    let step = evaluate_celebration(request.celebration, &result, request.inputs.savings_goal);

    EvaluateResponse {
        result,
        goal_reached: result.is_goal_reached(request.inputs.savings_goal),
        celebrate: step.fire,
        celebrated: step.state == CelebrationState::Celebrated,
    }
}

/// Runs one projection from CLI flags and returns it as a JSON line.
pub fn run_projection<I, T>(args: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let request = EvaluateRequest {
        inputs: build_inputs(cli),
        celebration: CelebrationState::Idle,
    };
    serde_json::to_string(&build_evaluate_response(&request)).expect("response should serialize")
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/evaluate",
            get(evaluate_get_handler).post(evaluate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("nestegg listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn evaluate_get_handler(Query(payload): Query<EvaluatePayload>) -> Response {
    evaluate_handler_impl(payload)
}

async fn evaluate_post_handler(Json(payload): Json<EvaluatePayload>) -> Response {
    evaluate_handler_impl(payload)
}

fn evaluate_handler_impl(payload: EvaluatePayload) -> Response {
    let request = evaluate_request_from_payload(payload);
    json_response(StatusCode::OK, build_evaluate_response(&request))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
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

#[cfg(test)]
fn evaluate_request_from_json(json: &str) -> Result<EvaluateRequest, String> {
    let payload = serde_json::from_str::<EvaluatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(evaluate_request_from_payload(payload))
}
