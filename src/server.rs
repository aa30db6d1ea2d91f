//! HTTP endpoints using axum.
//!
//! Endpoints (all POST, plain-text answers). Bodies may be either
//! `application/x-www-form-urlencoded` or `multipart/form-data`; when a key
//! repeats, only its first value counts.
//!
//! - POST /predict - state values in, action index out
//! - POST /save    - one raw transition record into replay memory
//! - POST /train   - run N training iterations, then save the model
//! - POST /debug   - accepted and ignored

use std::collections::HashSet;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use log::{debug, info};
use ndarray::Array1;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::agent::QAgent;
use crate::config::ServiceConfig;
use crate::error::{PendulumError, Result};
use crate::replay_buffer::{parse_float, Record};
use crate::STATE_SIZE;

/// The agent shared by every handler.
pub type SharedAgent = Arc<Mutex<QAgent>>;

/// Form fields in submission order, decoded from either a urlencoded or a
/// multipart body.
struct FormFields(Vec<(String, String)>);

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|content_type| content_type.starts_with("multipart/form-data"))
            .unwrap_or(false);

        let fields = if is_multipart {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            let mut fields = Vec::new();
            while let Some(field) = multipart.next_field().await.map_err(IntoResponse::into_response)? {
                let name = field.name().unwrap_or_default().to_string();
                let value = field.text().await.map_err(IntoResponse::into_response)?;
                fields.push((name, value));
            }
            fields
        } else {
            let Form(fields) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            fields
        };
        Ok(FormFields(first_per_key(fields)))
    }
}

/// Keep the first value of every key, in submission order.
fn first_per_key(fields: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    fields.into_iter().filter(|(name, _)| seen.insert(name.clone())).collect()
}

#[derive(Clone)]
pub struct AppState {
    pub agent: SharedAgent,
}

/// Build the axum router with all endpoints.
pub fn router(agent: SharedAgent) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/save", post(save))
        .route("/train", post(train))
        .route("/debug", post(debug_payload))
        .with_state(AppState { agent })
}

/// Load the model named by `config` and serve until Ctrl-C.
pub async fn run(config: ServiceConfig) -> Result<()> {
    let agent = QAgent::from_config(&config)?;
    let app = router(Arc::new(Mutex::new(agent)));

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("pendulum-q listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

// ── Error responses ─────────────────────────────────────────────────

/// JSON body returned on error.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: u16,
}

impl IntoResponse for PendulumError {
    fn into_response(self) -> Response {
        let status = match &self {
            PendulumError::EmptyBuffer(_) => StatusCode::CONFLICT,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        debug!("request failed with {}: {}", status, self);

        let body = ErrorBody {
            error: self.to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

// ── Handlers ────────────────────────────────────────────────────────

async fn predict(
    State(state): State<AppState>,
    FormFields(fields): FormFields,
) -> std::result::Result<String, PendulumError> {
    let values = fields
        .iter()
        .map(|(name, value)| parse_float(name, value))
        .collect::<Result<Vec<f32>>>()?;
    if values.len() != STATE_SIZE {
        return Err(PendulumError::dimension_mismatch(
            format!("{} state values", STATE_SIZE),
            values.len().to_string(),
        ));
    }

    let action = state.agent.lock().await.act(Array1::from(values).view())?;
    Ok(action.to_string())
}

async fn save(
    State(state): State<AppState>,
    FormFields(fields): FormFields,
) -> std::result::Result<&'static str, PendulumError> {
    if fields.is_empty() {
        return Ok("done");
    }
    let record = Record::from_values(fields.into_iter().map(|(_, value)| value).collect())?;

    let mut agent = state.agent.lock().await;
    agent.remember(record);
    debug!("replay memory holds {} records", agent.memory.len());
    Ok("done")
}

async fn train(
    State(state): State<AppState>,
    FormFields(fields): FormFields,
) -> std::result::Result<&'static str, PendulumError> {
    let Some((name, value)) = fields.first() else {
        return Ok("done");
    };
    let batches = value
        .trim()
        .parse::<i64>()
        .map_err(|_| PendulumError::invalid_value(name.as_str(), value.as_str()))?
        .max(0) as usize;

    let mut agent = state.agent.clone().lock_owned().await;
    let report = tokio::task::spawn_blocking(move || agent.train(batches))
        .await
        .map_err(|e| PendulumError::TrainingError(e.to_string()))??;

    info!(
        "trained {} iterations on {} samples, mean loss {:?}",
        report.iterations, report.samples, report.mean_loss
    );
    Ok("done")
}

async fn debug_payload(FormFields(fields): FormFields) -> &'static str {
    debug!("debug payload: {:?}", fields);
    "done"
}
