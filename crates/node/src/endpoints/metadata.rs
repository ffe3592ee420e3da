//! # メタデータエンドポイント
//!
//! - `POST /reveal`, `POST /seal`, `GET /sealed` — トークンID指定型のみ
//! - `GET /tokens/{id}/uri` — 両方式

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use mintpass_types::{
    CallerRequest, CollectionInfo, RevealRequest, SealStatus, TokenId, TokenUriResponse,
};

use crate::config::NodeState;
use crate::error::NodeError;

/// POST /reveal — ベースURIの置き換え。更新後のコレクション情報を返す。
pub async fn handle_reveal(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<RevealRequest>, JsonRejection>,
) -> Result<Json<CollectionInfo>, NodeError> {
    let Json(body) = payload?;
    let mut deployment = state.deployment.write().await;
    deployment.token_mut()?.reveal(body.caller, body.base_uri)?;
    Ok(Json(deployment.info()))
}

/// POST /seal — メタデータの永久封印。
pub async fn handle_seal(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<CallerRequest>, JsonRejection>,
) -> Result<Json<SealStatus>, NodeError> {
    let Json(body) = payload?;
    let mut deployment = state.deployment.write().await;
    deployment.token_mut()?.seal_contract_permanently(body.caller)?;
    Ok(Json(SealStatus { sealed: true }))
}

pub async fn handle_sealed(
    State(state): State<Arc<NodeState>>,
) -> Result<Json<SealStatus>, NodeError> {
    let deployment = state.deployment.read().await;
    Ok(Json(SealStatus {
        sealed: deployment.token()?.is_sealed(),
    }))
}

/// GET /tokens/{id}/uri — トークンのロケータ（tokenURI相当）。
pub async fn handle_token_uri(
    State(state): State<Arc<NodeState>>,
    Path(token_id): Path<TokenId>,
) -> Result<Json<TokenUriResponse>, NodeError> {
    let deployment = state.deployment.read().await;
    let uri = deployment.locator_of(token_id)?;
    Ok(Json(TokenUriResponse { token_id, uri }))
}
