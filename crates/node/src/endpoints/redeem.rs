//! # POST /redeem/content, POST /redeem/token
//!
//! バウチャーを償還し、発行されたトークンの完了レコードを返す。
//! ホスト中のコレクションと異なる種別のエンドポイントは400を返す。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mintpass_types::{
    ContentClaim, ContentRedeemRequest, MintEvent, TokenClaim, TokenRedeemRequest,
};

use crate::config::NodeState;
use crate::error::NodeError;

/// Hexエンコードされた署名をデコードする（`0x`接頭辞は任意）。
pub fn decode_signature(raw: &str) -> Result<Vec<u8>, NodeError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits).map_err(|e| NodeError::BadRequest(format!("署名のHexデコードに失敗: {e}")))
}

/// POST /redeem/content — コンテンツアドレス型の償還。
pub async fn handle_redeem_content(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<ContentRedeemRequest>, JsonRejection>,
) -> Result<Json<MintEvent>, NodeError> {
    let Json(body) = payload?;
    let signature = decode_signature(&body.signature)?;
    let claim = ContentClaim {
        cid: body.cid,
        price: body.price,
    };

    let mut deployment = state.deployment.write().await;
    let event = deployment
        .content_mut()?
        .redeem(body.caller, &claim, &signature, body.value)?;
    Ok(Json(event))
}

/// POST /redeem/token — トークンID指定型の償還。
pub async fn handle_redeem_token(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<TokenRedeemRequest>, JsonRejection>,
) -> Result<Json<MintEvent>, NodeError> {
    let Json(body) = payload?;
    let signature = decode_signature(&body.signature)?;
    let claim = TokenClaim {
        token_id: body.token_id,
        price: body.price,
        nonce: body.nonce,
    };

    let mut deployment = state.deployment.write().await;
    let event = deployment
        .token_mut()?
        .redeem(body.caller, &claim, &signature, body.value)?;
    Ok(Json(event))
}
