//! # GET /events
//!
//! 償還成功の完了レコードを発行順に返す。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use mintpass_types::MintEvent;

use crate::config::NodeState;

pub async fn handle_events(State(state): State<Arc<NodeState>>) -> Json<Vec<MintEvent>> {
    let deployment = state.deployment.read().await;
    Json(deployment.events().to_vec())
}
