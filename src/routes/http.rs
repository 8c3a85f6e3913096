//! HTTP endpoint handlers. These are thin wrappers that forward to the
//! engine and state; each handler is instrumented with basic result info.

use std::sync::Arc;

use axum::{
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{error, info, instrument};

use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true, service: "datrix-backend" })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let out = catalog_to_out(&state.catalog);
  info!(target: "datrix_backend", categories = out.categories.len(), "HTTP catalog served");
  Json(out)
}

#[instrument(level = "info", skip(state, body), fields(answer_count = body.answers.len()))]
pub async fn http_post_submit(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SubmitIn>,
) -> impl IntoResponse {
  match state.submit(&body.answers).await {
    Ok((assessment_id, result)) => {
      info!(target: "scoring", %assessment_id, pct = result.percentage, "HTTP submission scored");
      (
        StatusCode::CREATED,
        Json(SubmitOut { success: true, assessment_id, result }),
      )
        .into_response()
    }
    // Malformed reference data is an operator problem, not user error.
    Err(e) => {
      error!(target: "scoring", error = %e, "Submission rejected: invalid catalog");
      (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorOut { message: e.to_string() }),
      )
        .into_response()
    }
  }
}

#[instrument(level = "info", skip(state), fields(%q.assessment_id))]
pub async fn http_get_result(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ResultQuery>,
) -> impl IntoResponse {
  match state.get_result(&q.assessment_id).await {
    Some(result) => Json(result).into_response(),
    None => (
      StatusCode::NOT_FOUND,
      Json(ErrorOut { message: format!("Unknown assessmentId: {}", q.assessment_id) }),
    )
      .into_response(),
  }
}
