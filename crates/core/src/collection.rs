//! # コレクション
//!
//! 1つのデプロイメントの全状態（署名者、リプレイ集合、台帳、売上、メタデータ）をまとめる。
//! 状態の変更は名前付きの操作を通じてのみ行われ、呼び出し元は常に明示的な引数として渡す。

use mintpass_crypto::{Secp256k1Verifier, SignatureVerifier};
use mintpass_types::{
    Address, CollectionKind, DomainContext, MintEvent, TokenId, Wei, Withdrawal,
};

use crate::error::CollectionError;
use crate::ledger::{MemoryLedger, TokenLedger};
use crate::registry::SignerRegistry;
use crate::replay::ReplayGuard;
use crate::scheme::{ContentAddressed, ExplicitId, MintScheme, DEFAULT_CONTENT_PREFIX};
use crate::treasury::Treasury;

/// コンテンツアドレス型のコレクション
pub type ContentCollection = Collection<ContentAddressed>;
/// トークンID指定型のコレクション
pub type TokenCollection = Collection<ExplicitId>;

/// デプロイメントの設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    /// EIP-712ドメイン名（コレクション名）
    pub name: String,
    pub symbol: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
    pub owner: Address,
    pub kind: CollectionKind,
    /// トークンID指定型の初期ベースURI
    pub base_uri: String,
    /// コンテンツアドレス型のロケータ接頭辞
    pub content_prefix: String,
}

impl CollectionConfig {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
        owner: Address,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            chain_id,
            verifying_contract,
            owner,
            kind: CollectionKind::Token,
            base_uri: String::new(),
            content_prefix: DEFAULT_CONTENT_PREFIX.to_string(),
        }
    }

    pub fn domain(&self) -> DomainContext {
        DomainContext::new(self.name.clone(), self.chain_id, self.verifying_contract)
    }
}

pub struct Collection<S: MintScheme> {
    pub(crate) symbol: String,
    pub(crate) domain: DomainContext,
    pub(crate) registry: SignerRegistry,
    pub(crate) replay: ReplayGuard<S::ReplayKey>,
    pub(crate) ledger: Box<dyn TokenLedger>,
    pub(crate) treasury: Treasury,
    pub(crate) verifier: Box<dyn SignatureVerifier>,
    pub(crate) scheme: S,
    pub(crate) events: Vec<MintEvent>,
}

impl<S: MintScheme> Collection<S> {
    /// 設定と発行方式からコレクションを構築する。
    /// 署名者は空、台帳はメモリ内実装、署名検証はsecp256k1で開始する。
    pub fn with_scheme(config: &CollectionConfig, scheme: S) -> Self {
        Self {
            symbol: config.symbol.clone(),
            domain: config.domain(),
            registry: SignerRegistry::new(config.owner),
            replay: ReplayGuard::new(),
            ledger: Box::new(MemoryLedger::new()),
            treasury: Treasury::default(),
            verifier: Box::new(Secp256k1Verifier),
            scheme,
            events: Vec::new(),
        }
    }

    /// 署名検証器を差し替える（テスト用スタブ等）。
    pub fn with_verifier(mut self, verifier: Box<dyn SignatureVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    // -----------------------------------------------------------------------
    // 署名者管理
    // -----------------------------------------------------------------------

    pub fn add_signer(&mut self, caller: Address, signer: Address) -> Result<(), CollectionError> {
        self.registry.add_signer(caller, signer)
    }

    pub fn renounce_signer(&mut self, caller: Address) -> Result<(), CollectionError> {
        self.registry.renounce_signer(caller)
    }

    pub fn is_signer(&self, identity: Address) -> bool {
        self.registry.is_signer(identity)
    }

    // -----------------------------------------------------------------------
    // 売上
    // -----------------------------------------------------------------------

    /// 累計残高をオーナーに全額送金する。
    pub fn withdraw_all_funds(&mut self, caller: Address) -> Result<Withdrawal, CollectionError> {
        self.registry.ensure_owner(caller)?;
        let amount = self.treasury.withdraw_all();
        let recipient = self.registry.owner();
        tracing::info!(recipient = %recipient, amount, "売上を引き出しました");
        Ok(Withdrawal { recipient, amount })
    }

    // -----------------------------------------------------------------------
    // 参照
    // -----------------------------------------------------------------------

    pub fn kind(&self) -> CollectionKind {
        S::KIND
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn domain(&self) -> &DomainContext {
        &self.domain
    }

    pub fn owner(&self) -> Address {
        self.registry.owner()
    }

    pub fn balance(&self) -> Wei {
        self.treasury.balance()
    }

    /// トークンのロケータ（tokenURI相当）
    pub fn locator_of(&self, token_id: TokenId) -> Result<String, CollectionError> {
        self.scheme.locator(self.ledger.as_ref(), token_id)
    }

    pub fn owner_of(&self, token_id: TokenId) -> Result<Address, CollectionError> {
        Ok(self.ledger.owner_of(token_id)?)
    }

    pub fn balance_of(&self, owner: Address) -> u64 {
        self.ledger.balance_of(owner)
    }

    pub fn total_supply(&self) -> u64 {
        self.ledger.total_supply()
    }

    /// 償還成功の記録（発行順）
    pub fn events(&self) -> &[MintEvent] {
        &self.events
    }
}

impl Collection<ContentAddressed> {
    pub fn new(config: &CollectionConfig) -> Self {
        Self::with_scheme(config, ContentAddressed::new(config.content_prefix.clone()))
    }

    pub fn is_signature_used(&self, signature: &[u8]) -> bool {
        self.replay.is_used(&signature.to_vec())
    }

    pub fn content_prefix(&self) -> &str {
        self.scheme.prefix()
    }
}

impl Collection<ExplicitId> {
    pub fn new(config: &CollectionConfig) -> Self {
        Self::with_scheme(config, ExplicitId::new(config.base_uri.clone()))
    }

    pub fn is_nonce_used(&self, nonce: u64) -> bool {
        self.replay.is_used(&nonce)
    }

    /// ベースURIを置き換える（オーナーのみ、封印前のみ）。
    pub fn reveal(
        &mut self,
        caller: Address,
        new_base_uri: impl Into<String>,
    ) -> Result<(), CollectionError> {
        self.registry.ensure_owner(caller)?;
        let new_base_uri = new_base_uri.into();
        self.scheme.metadata_mut().reveal(new_base_uri.clone())?;
        tracing::info!(base_uri = %new_base_uri, "ベースURIを更新しました");
        Ok(())
    }

    /// メタデータを永久に封印する（オーナーのみ）。
    pub fn seal_contract_permanently(&mut self, caller: Address) -> Result<(), CollectionError> {
        self.registry.ensure_owner(caller)?;
        self.scheme.metadata_mut().seal()?;
        tracing::info!("メタデータを封印しました");
        Ok(())
    }

    pub fn is_sealed(&self) -> bool {
        self.scheme.metadata().is_sealed()
    }

    pub fn base_uri(&self) -> &str {
        self.scheme.metadata().base_uri()
    }
}
