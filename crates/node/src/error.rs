//! # ノードエラー型
//!
//! 全エンドポイントで共通のエラー型。コレクションのエラーをHTTPステータスに対応付ける。

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use mintpass_core::CollectionError;
use mintpass_types::CollectionKind;

/// ノードエラー型。
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// コレクション操作の失敗
    #[error(transparent)]
    Collection(#[from] CollectionError),
    /// 不正なリクエスト（パース失敗、Hexデコード失敗）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// ホスト中のコレクション種別では提供されない操作
    #[error("この操作は{actual:?}型のコレクションでは利用できません（{expected:?}型が必要）")]
    KindMismatch {
        expected: CollectionKind,
        actual: CollectionKind,
    },
}

impl From<JsonRejection> for NodeError {
    fn from(e: JsonRejection) -> Self {
        NodeError::BadRequest(e.body_text())
    }
}

impl NodeError {
    pub fn status(&self) -> StatusCode {
        match self {
            NodeError::Collection(e) => match e {
                CollectionError::InvalidSignature
                | CollectionError::CallerNotOwner(_)
                | CollectionError::CallerNotSigner(_) => StatusCode::FORBIDDEN,
                CollectionError::InvalidValue { .. } | CollectionError::InvalidUri => {
                    StatusCode::BAD_REQUEST
                }
                CollectionError::SignatureUsed
                | CollectionError::NonceUsed(_)
                | CollectionError::AlreadyHasRole(_)
                | CollectionError::ContractSealed
                | CollectionError::AlreadyAssigned(_) => StatusCode::CONFLICT,
                CollectionError::NonexistentToken(_) => StatusCode::NOT_FOUND,
                CollectionError::BalanceOverflow => StatusCode::INTERNAL_SERVER_ERROR,
            },
            NodeError::BadRequest(_) | NodeError::KindMismatch { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl axum::response::IntoResponse for NodeError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), self.to_string()).into_response()
    }
}
