//! The factory-failure HTTP intake: one multipart endpoint that resolves
//! the reporting production order and forwards a notice to the operator
//! channel via the shared `Orchestrator`.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use tracing::{info, warn};

use lineplan_orchestrator::{FactoryFailureNotice, Orchestrator};

use crate::error::{IntakeError, IntakeResponse};
use crate::resolve::resolve_production_order;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new().route("/factory/failure", post(failure_handler)).with_state(AppState { orchestrator })
}

#[derive(Default)]
struct Payload {
    image: Option<Vec<u8>>,
    description: Option<String>,
    po_id: Option<String>,
}

async fn parse_multipart(mut multipart: Multipart) -> Result<Payload, IntakeError> {
    let mut payload = Payload::default();
    while let Some(field) =
        multipart.next_field().await.map_err(|e| IntakeError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("image") => {
                let bytes = field.bytes().await.map_err(|e| IntakeError::BadRequest(format!("unreadable image field: {e}")))?;
                payload.image = Some(bytes.to_vec());
            }
            Some("description") => {
                let text = field.text().await.map_err(|e| IntakeError::BadRequest(format!("unreadable description field: {e}")))?;
                payload.description = Some(text);
            }
            Some("po_id") => {
                let text = field.text().await.map_err(|e| IntakeError::BadRequest(format!("unreadable po_id field: {e}")))?;
                payload.po_id = Some(text);
            }
            _ => {}
        }
    }
    Ok(payload)
}

async fn failure_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<IntakeResponse>, IntakeError> {
    let payload = parse_multipart(multipart).await?;
    let image = payload.image.ok_or_else(|| IntakeError::BadRequest("missing required `image` field".into()))?;

    let schedule = state
        .orchestrator
        .approved_schedule()
        .await
        .ok_or_else(|| IntakeError::Resolution("no approved schedule against which to resolve a production order".into()))?;

    let resolved = resolve_production_order(&schedule, payload.po_id.as_deref(), Utc::now())?;

    info!(
        sales_order_id = %resolved.sales_order_id,
        production_order_id = %resolved.production_order_id,
        "resolved factory-failure event"
    );

    let notice = FactoryFailureNotice {
        sales_order_id: resolved.sales_order_id,
        production_order_id: resolved.production_order_id,
        image,
        description: payload.description,
    };

    if let Err(e) = state.orchestrator.notify_factory_failure(notice).await {
        warn!(error = %e, "failed to push factory-failure notice to the operator channel");
        return Err(IntakeError::Internal(e.to_string()));
    }

    Ok(Json(IntakeResponse { status: "accepted", message: "factory failure notice delivered to operator".into() }))
}
