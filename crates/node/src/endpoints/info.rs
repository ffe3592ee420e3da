//! # GET /.well-known/collection-info
//!
//! コレクション情報公開エンドポイント。
//! バウチャー発行者はここから署名ドメインを取得する。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use mintpass_types::CollectionInfo;

use crate::config::NodeState;

pub async fn handle_collection_info(State(state): State<Arc<NodeState>>) -> Json<CollectionInfo> {
    let deployment = state.deployment.read().await;
    Json(deployment.info())
}
