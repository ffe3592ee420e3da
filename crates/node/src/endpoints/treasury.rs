//! # POST /withdraw
//!
//! 累計売上をオーナーに全額送金する。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mintpass_types::{CallerRequest, Withdrawal};

use crate::config::NodeState;
use crate::error::NodeError;

pub async fn handle_withdraw(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<CallerRequest>, JsonRejection>,
) -> Result<Json<Withdrawal>, NodeError> {
    let Json(body) = payload?;
    let mut deployment = state.deployment.write().await;
    let withdrawal = deployment.withdraw_all_funds(body.caller)?;
    Ok(Json(withdrawal))
}
