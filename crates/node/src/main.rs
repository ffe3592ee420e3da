//! # Mintpass Node
//!
//! 署名付きバウチャーで認可されるミントを1つのコレクションについて提供するHTTPサービス。
//!
//! ## API エンドポイント
//! - `GET /.well-known/collection-info` — コレクション情報（署名ドメイン含む）
//! - `POST /redeem/content` — コンテンツアドレス型の償還
//! - `POST /redeem/token` — トークンID指定型の償還
//! - `POST /signers` — 署名者追加（オーナーのみ）
//! - `POST /signers/renounce` — 署名者の辞退
//! - `GET /signers/{address}` — 署名者の照会
//! - `POST /reveal`, `POST /seal`, `GET /sealed` — メタデータ管理（トークンID指定型のみ）
//! - `GET /tokens/{id}/uri` — トークンのロケータ
//! - `GET /events` — 償還の完了レコード
//! - `POST /withdraw` — 売上の引き出し（オーナーのみ）

mod config;
mod endpoints;
mod error;

use std::sync::Arc;

use axum::routing::{get, post};

use config::{NodeConfig, NodeState};
use endpoints::*;

/// ルーターを構築する。
fn router(state: Arc<NodeState>) -> axum::Router {
    axum::Router::new()
        .route(
            "/.well-known/collection-info",
            get(handle_collection_info),
        )
        .route("/redeem/content", post(handle_redeem_content))
        .route("/redeem/token", post(handle_redeem_token))
        .route("/signers", post(handle_add_signer))
        .route("/signers/renounce", post(handle_renounce_signer))
        .route("/signers/{address}", get(handle_signer_status))
        .route("/reveal", post(handle_reveal))
        .route("/seal", post(handle_seal))
        .route("/sealed", get(handle_sealed))
        .route("/tokens/{id}/uri", get(handle_token_uri))
        .route("/events", get(handle_events))
        .route("/withdraw", post(handle_withdraw))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = NodeConfig::from_env()?;
    let collection = &config.collection;
    tracing::info!(
        kind = ?collection.kind,
        name = %collection.name,
        symbol = %collection.symbol,
        chain_id = collection.chain_id,
        verifying_contract = %collection.verifying_contract,
        owner = %collection.owner,
        "コレクションを構築します"
    );

    let state = Arc::new(NodeState::from_config(collection, &config.initial_signers)?);
    tracing::info!(signers = config.initial_signers.len(), "初期署名者を登録しました");

    let app = router(state);

    tracing::info!("Mintpassノードを {} で起動します", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
