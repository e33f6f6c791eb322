use super::response::GenerateResponse;
use crate::app::App;
use crate::intake::GenerateBody;
use crate::{Error, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub(crate) async fn generate(
    State(app): State<Arc<App>>,
    payload: std::result::Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerateResponse>> {
    let request_id = Uuid::new_v4();

    async move {
        let Json(body) = payload
            .map_err(|e| Error::InvalidInput(format!("invalid request body: {}", e.body_text())))?;

        let request = app.parse_request(body)?;
        info!(
            "Accepted generation request ({}s, {}, {} char prompt)",
            request.duration,
            request.ratio,
            request.prompt.chars().count()
        );

        let video_url = app.generate(&request).await?;
        Ok(Json(GenerateResponse { video_url }))
    }
    .instrument(info_span!("generate", %request_id))
    .await
}

pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
