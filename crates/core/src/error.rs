//! # コレクションのエラー型
//!
//! 全ての失敗は呼び出し全体を中断し、状態を変更しない。
//! 例外はミント時のID衝突（リプレイキーは消費済みのまま残る）のみ。

use mintpass_types::{Address, TokenId, Wei};

/// コレクション操作のエラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    /// 署名が不正、フィールドが改ざんされている、または署名者が認可されていない
    #[error("InvalidSignature")]
    InvalidSignature,
    /// 支払額が署名された価格と一致しない
    #[error("InvalidValue: 価格 {expected} に対して {actual} が支払われました")]
    InvalidValue { expected: Wei, actual: Wei },
    /// コンテンツ識別子が空
    #[error("InvalidURI")]
    InvalidUri,
    /// 署名は使用済み
    #[error("SignatureUsed")]
    SignatureUsed,
    /// nonceは使用済み
    #[error("NonceUsed: {0}")]
    NonceUsed(u64),
    /// 既に署名者ロールを持っている
    #[error("AlreadyHasRole: {0}")]
    AlreadyHasRole(Address),
    /// 呼び出し元がオーナーではない
    #[error("CallerNotOwner: {0}")]
    CallerNotOwner(Address),
    /// 呼び出し元が署名者ではない
    #[error("CallerNotSigner: {0}")]
    CallerNotSigner(Address),
    /// メタデータは封印済み
    #[error("ContractSealed")]
    ContractSealed,
    /// トークンが存在しない
    #[error("NonexistentToken: {0}")]
    NonexistentToken(TokenId),
    /// トークンIDは割り当て済み
    #[error("AlreadyAssigned: {0}")]
    AlreadyAssigned(TokenId),
    /// 残高の加算がオーバーフローする
    #[error("BalanceOverflow")]
    BalanceOverflow,
}

/// トークン台帳のエラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// トークンIDは割り当て済み
    #[error("トークン {0} は既にミントされています")]
    AlreadyAssigned(TokenId),
    /// トークンが存在しない
    #[error("トークン {0} は存在しません")]
    NonexistentToken(TokenId),
}

impl From<LedgerError> for CollectionError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::AlreadyAssigned(id) => CollectionError::AlreadyAssigned(id),
            LedgerError::NonexistentToken(id) => CollectionError::NonexistentToken(id),
        }
    }
}
