//! # 発行方式
//!
//! 償還ステートマシンは1つで、リプレイキーとトークンIDの割り当て方だけが方式ごとに異なる。
//!
//! | 方式 | リプレイキー | トークンID | ロケータ |
//! |------|------------|-----------|---------|
//! | [`ContentAddressed`] | 署名バイト列 | 1から自動採番 | `prefix + cid` |
//! | [`ExplicitId`] | nonce（コレクション全体） | 呼び出し元が指定 | `baseURI + tokenId` |

use std::collections::BTreeMap;
use std::hash::Hash;

use mintpass_crypto::TypedStruct;
use mintpass_types::{
    Address, CollectionKind, ContentClaim, ContentVoucher, MintEvent, TokenClaim, TokenId,
    TokenVoucher, Wei,
};

use crate::error::CollectionError;
use crate::ledger::TokenLedger;
use crate::metadata::MetadataGate;

/// コンテンツアドレス型のデフォルトのロケータ接頭辞
pub const DEFAULT_CONTENT_PREFIX: &str = "ipfs://";

/// 発行方式のトレイト。
pub trait MintScheme: Send + Sync {
    /// 呼び出し元が提示するフィールド
    type Claim;
    /// 署名対象のバウチャー
    type Voucher: TypedStruct;
    /// リプレイガードのキー
    type ReplayKey: Eq + Hash + Send + Sync;

    const KIND: CollectionKind;

    fn voucher(claim: &Self::Claim, caller: Address) -> Self::Voucher;

    fn price(voucher: &Self::Voucher) -> Wei;

    /// 署名検証より前に行う形式チェック
    fn check_shape(_voucher: &Self::Voucher) -> Result<(), CollectionError> {
        Ok(())
    }

    fn replay_key(voucher: &Self::Voucher, signature: &[u8]) -> Self::ReplayKey;

    fn replay_error(key: &Self::ReplayKey) -> CollectionError;

    /// 台帳にトークンを発行し、確定したIDを返す。
    fn assign(
        &mut self,
        ledger: &mut dyn TokenLedger,
        voucher: &Self::Voucher,
    ) -> Result<TokenId, CollectionError>;

    fn mint_event(voucher: &Self::Voucher, token_id: TokenId) -> MintEvent;

    fn locator(&self, ledger: &dyn TokenLedger, token_id: TokenId)
        -> Result<String, CollectionError>;
}

// ---------------------------------------------------------------------------
// コンテンツアドレス型
// ---------------------------------------------------------------------------

/// IDを1から順に採番する。
///
/// 台帳は空の状態からこの方式だけが書き込む前提で、`next_id` は常に未使用のIDを指す。
#[derive(Debug, Clone)]
pub struct ContentAddressed {
    prefix: String,
    next_id: TokenId,
    cids: BTreeMap<TokenId, String>,
}

impl ContentAddressed {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next_id: 1,
            cids: BTreeMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// 次の償還で割り当てられるトークンID
    pub fn next_id(&self) -> TokenId {
        self.next_id
    }
}

impl Default for ContentAddressed {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_PREFIX)
    }
}

impl MintScheme for ContentAddressed {
    type Claim = ContentClaim;
    type Voucher = ContentVoucher;
    type ReplayKey = Vec<u8>;

    const KIND: CollectionKind = CollectionKind::Content;

    fn voucher(claim: &ContentClaim, caller: Address) -> ContentVoucher {
        claim.voucher_for(caller)
    }

    fn price(voucher: &ContentVoucher) -> Wei {
        voucher.price
    }

    fn check_shape(voucher: &ContentVoucher) -> Result<(), CollectionError> {
        if voucher.cid.is_empty() {
            return Err(CollectionError::InvalidUri);
        }
        Ok(())
    }

    fn replay_key(_voucher: &ContentVoucher, signature: &[u8]) -> Vec<u8> {
        signature.to_vec()
    }

    fn replay_error(_key: &Vec<u8>) -> CollectionError {
        CollectionError::SignatureUsed
    }

    fn assign(
        &mut self,
        ledger: &mut dyn TokenLedger,
        voucher: &ContentVoucher,
    ) -> Result<TokenId, CollectionError> {
        let token_id = self.next_id;
        ledger.mint(voucher.account, token_id)?;
        self.next_id += 1;
        self.cids.insert(token_id, voucher.cid.clone());
        Ok(token_id)
    }

    fn mint_event(voucher: &ContentVoucher, token_id: TokenId) -> MintEvent {
        MintEvent {
            token_id,
            recipient: voucher.account,
            cid: Some(voucher.cid.clone()),
            price: voucher.price,
        }
    }

    fn locator(
        &self,
        ledger: &dyn TokenLedger,
        token_id: TokenId,
    ) -> Result<String, CollectionError> {
        if !ledger.exists(token_id) {
            return Err(CollectionError::NonexistentToken(token_id));
        }
        let cid = self
            .cids
            .get(&token_id)
            .ok_or(CollectionError::NonexistentToken(token_id))?;
        Ok(format!("{}{}", self.prefix, cid))
    }
}

// ---------------------------------------------------------------------------
// トークンID指定型
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ExplicitId {
    metadata: MetadataGate,
}

impl ExplicitId {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            metadata: MetadataGate::new(base_uri),
        }
    }

    pub fn metadata(&self) -> &MetadataGate {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut MetadataGate {
        &mut self.metadata
    }
}

impl MintScheme for ExplicitId {
    type Claim = TokenClaim;
    type Voucher = TokenVoucher;
    type ReplayKey = u64;

    const KIND: CollectionKind = CollectionKind::Token;

    fn voucher(claim: &TokenClaim, caller: Address) -> TokenVoucher {
        claim.voucher_for(caller)
    }

    fn price(voucher: &TokenVoucher) -> Wei {
        voucher.price
    }

    fn replay_key(voucher: &TokenVoucher, _signature: &[u8]) -> u64 {
        voucher.nonce
    }

    fn replay_error(key: &u64) -> CollectionError {
        CollectionError::NonceUsed(*key)
    }

    fn assign(
        &mut self,
        ledger: &mut dyn TokenLedger,
        voucher: &TokenVoucher,
    ) -> Result<TokenId, CollectionError> {
        ledger.mint(voucher.account, voucher.token_id)?;
        Ok(voucher.token_id)
    }

    fn mint_event(voucher: &TokenVoucher, token_id: TokenId) -> MintEvent {
        MintEvent {
            token_id,
            recipient: voucher.account,
            cid: None,
            price: voucher.price,
        }
    }

    fn locator(
        &self,
        ledger: &dyn TokenLedger,
        token_id: TokenId,
    ) -> Result<String, CollectionError> {
        if !ledger.exists(token_id) {
            return Err(CollectionError::NonexistentToken(token_id));
        }
        Ok(self.metadata.locator(token_id))
    }
}
