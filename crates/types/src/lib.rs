//! # Mintpass 共有型定義
//!
//! バウチャー、ドメイン情報、ノードAPIのリクエスト/レスポンスをRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - Hex (`0x`プレフィックス付き): アドレス、署名
//! - 10進整数: トークンID、nonce、価格（wei単位）

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// トークン識別子。
pub type TokenId = u64;

/// 価格・残高の単位（wei）。
pub type Wei = u128;

/// 署名者がバウチャーに署名する際に使用するプロトコルバージョン。
pub const PROTOCOL_VERSION: &str = "1.0.0";

// ---------------------------------------------------------------------------
// アドレス
// ---------------------------------------------------------------------------

/// 20バイトのアカウントアドレス。
/// 全ゼロのアドレスは「無効なID」として扱う。
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub [u8; 20]);

/// アドレス文字列のパースエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    /// `0x`プレフィックスがない
    #[error("アドレスは0xで始まる必要があります")]
    MissingPrefix,
    /// 16進数として不正
    #[error("アドレスの16進数デコードに失敗: {0}")]
    InvalidHex(String),
    /// 長さが20バイトでない
    #[error("アドレスは20バイトである必要があります（実際: {0}バイト）")]
    InvalidLength(usize),
}

impl Address {
    /// 全ゼロのアドレス
    pub const ZERO: Address = Address([0u8; 20]);

    /// バイト列からアドレスを構築する。長さが20バイトでない場合はエラー。
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressParseError> {
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| AddressParseError::InvalidLength(bytes.len()))?;
        Ok(Address(arr))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressParseError::MissingPrefix)?;
        let bytes =
            hex::decode(hex_part).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        Address::from_slice(&bytes)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

// ---------------------------------------------------------------------------
// ドメイン情報
// ---------------------------------------------------------------------------

/// ダイジェストを特定のデプロイに束縛するドメイン情報。
/// 構築後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainContext {
    /// 発行者名（コレクション名）
    pub name: String,
    /// プロトコルバージョン
    pub version: String,
    /// チェーンID
    pub chain_id: u64,
    /// 検証を行うコントラクトのアドレス
    pub verifying_contract: Address,
}

impl DomainContext {
    /// 標準のプロトコルバージョンでドメイン情報を構築する。
    pub fn new(name: impl Into<String>, chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: name.into(),
            version: PROTOCOL_VERSION.to_string(),
            chain_id,
            verifying_contract,
        }
    }
}

// ---------------------------------------------------------------------------
// バウチャー
// ---------------------------------------------------------------------------

/// コンテンツアドレス型のバウチャー（トークンIDは自動採番）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentVoucher {
    /// ミントを許可されたアカウント
    pub account: Address,
    /// コンテンツ識別子（IPFS CID等）
    pub cid: String,
    /// 支払うべき価格（wei）
    pub price: Wei,
}

/// トークンID指定型のバウチャー（nonceでリプレイを防止）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenVoucher {
    /// ミントを許可されたアカウント
    pub account: Address,
    /// ミントするトークンID
    pub token_id: TokenId,
    /// 支払うべき価格（wei）
    pub price: Wei,
    /// 使い捨てのnonce（コレクション全体で一意）
    pub nonce: u64,
}

/// 償還時に呼び出し元が提示するフィールド（コンテンツアドレス型）。
/// アカウントは呼び出し元自身のIDから補完される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentClaim {
    pub cid: String,
    pub price: Wei,
}

impl ContentClaim {
    /// 呼び出し元のIDを補完してバウチャーを再構築する。
    pub fn voucher_for(&self, account: Address) -> ContentVoucher {
        ContentVoucher {
            account,
            cid: self.cid.clone(),
            price: self.price,
        }
    }
}

/// 償還時に呼び出し元が提示するフィールド（トークンID指定型）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaim {
    pub token_id: TokenId,
    pub price: Wei,
    pub nonce: u64,
}

impl TokenClaim {
    /// 呼び出し元のIDを補完してバウチャーを再構築する。
    pub fn voucher_for(&self, account: Address) -> TokenVoucher {
        TokenVoucher {
            account,
            token_id: self.token_id,
            price: self.price,
            nonce: self.nonce,
        }
    }
}

// ---------------------------------------------------------------------------
// 償還結果
// ---------------------------------------------------------------------------

/// 償還成功時に発行される完了レコード。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintEvent {
    /// 確定したトークンID
    pub token_id: TokenId,
    /// トークンの受取人
    pub recipient: Address,
    /// コンテンツ識別子（コンテンツアドレス型のみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    /// 支払われた価格（wei）
    pub price: Wei,
}

/// 資金引き出しの結果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// 送金先（オーナー）
    pub recipient: Address,
    /// 引き出した金額（wei）
    pub amount: Wei,
}

/// コレクションの種別。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// コンテンツアドレス型（署名単位でリプレイ防止、ID自動採番）
    Content,
    /// トークンID指定型（nonce単位でリプレイ防止）
    Token,
}

impl FromStr for CollectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content" => Ok(CollectionKind::Content),
            "token" => Ok(CollectionKind::Token),
            other => Err(format!("不明なコレクション種別: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// ノード API リクエスト/レスポンス
// ---------------------------------------------------------------------------

/// POST /redeem/content リクエスト。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRedeemRequest {
    /// 呼び出し元アカウント
    pub caller: Address,
    pub cid: String,
    pub price: Wei,
    /// Hexエンコードされた65バイト署名
    pub signature: String,
    /// 添付された支払額（wei）
    pub value: Wei,
}

/// POST /redeem/token リクエスト。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRedeemRequest {
    /// 呼び出し元アカウント
    pub caller: Address,
    pub token_id: TokenId,
    pub price: Wei,
    pub nonce: u64,
    /// Hexエンコードされた65バイト署名
    pub signature: String,
    /// 添付された支払額（wei）
    pub value: Wei,
}

/// POST /signers リクエスト。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSignerRequest {
    /// 呼び出し元アカウント（オーナーである必要がある）
    pub caller: Address,
    /// 追加する署名者
    pub signer: Address,
}

/// 呼び出し元のみを指定する管理系リクエスト
/// （POST /signers/renounce, /seal, /withdraw）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerRequest {
    pub caller: Address,
}

/// POST /reveal リクエスト。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealRequest {
    /// 呼び出し元アカウント（オーナーである必要がある）
    pub caller: Address,
    /// 新しいベースURI
    pub base_uri: String,
}

/// GET /signers/{address} レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerStatus {
    pub address: Address,
    pub is_signer: bool,
}

/// GET /sealed レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealStatus {
    pub sealed: bool,
}

/// GET /tokens/{id}/uri レスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUriResponse {
    pub token_id: TokenId,
    pub uri: String,
}

/// /.well-known/collection-info レスポンス。
/// バウチャー発行者はここからドメイン情報を取得する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    /// コレクション種別
    pub kind: CollectionKind,
    /// コレクションのシンボル
    pub symbol: String,
    /// 署名ドメイン
    pub domain: DomainContext,
    /// 管理者アカウント
    pub owner: Address,
    /// メタデータが封印済みか（トークンID指定型のみ意味を持つ）
    pub sealed: bool,
    /// 現在のベースURI（トークンID指定型のみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    /// ミント済みトークン数
    pub total_supply: u64,
    /// 未引き出しの残高（wei）
    pub balance: Wei,
}
