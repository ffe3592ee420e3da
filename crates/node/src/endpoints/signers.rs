//! # 署名者管理エンドポイント
//!
//! - `POST /signers` — オーナーによる署名者追加
//! - `POST /signers/renounce` — 署名者自身による辞退
//! - `GET /signers/{address}` — 署名者かどうかの照会

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use mintpass_types::{AddSignerRequest, Address, CallerRequest, SignerStatus};

use crate::config::NodeState;
use crate::error::NodeError;

pub async fn handle_add_signer(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<AddSignerRequest>, JsonRejection>,
) -> Result<Json<SignerStatus>, NodeError> {
    let Json(body) = payload?;
    let mut deployment = state.deployment.write().await;
    deployment.add_signer(body.caller, body.signer)?;
    Ok(Json(SignerStatus {
        address: body.signer,
        is_signer: true,
    }))
}

pub async fn handle_renounce_signer(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<CallerRequest>, JsonRejection>,
) -> Result<Json<SignerStatus>, NodeError> {
    let Json(body) = payload?;
    let mut deployment = state.deployment.write().await;
    deployment.renounce_signer(body.caller)?;
    Ok(Json(SignerStatus {
        address: body.caller,
        is_signer: false,
    }))
}

pub async fn handle_signer_status(
    State(state): State<Arc<NodeState>>,
    Path(address): Path<String>,
) -> Result<Json<SignerStatus>, NodeError> {
    let address: Address = address
        .parse()
        .map_err(|e| NodeError::BadRequest(format!("アドレスのパースに失敗: {e}")))?;
    let deployment = state.deployment.read().await;
    Ok(Json(SignerStatus {
        address,
        is_signer: deployment.is_signer(address),
    }))
}
