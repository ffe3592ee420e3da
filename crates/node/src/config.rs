//! # ノード設定・共有状態
//!
//! 環境変数から1つのコレクションの設定を読み込み、共有状態を構築する。
//! 全ての変更系呼び出しは単一の`RwLock`で直列化される。

use std::net::SocketAddr;

use mintpass_core::{CollectionConfig, CollectionError, ContentCollection, TokenCollection};
use mintpass_types::{Address, CollectionInfo, CollectionKind, MintEvent, TokenId, Withdrawal};
use tokio::sync::RwLock;

use crate::error::NodeError;

/// デフォルトの待受アドレス
pub const DEFAULT_NODE_ADDR: &str = "0.0.0.0:8545";
/// デフォルトのチェーンID（Hardhatローカルネット）
pub const DEFAULT_CHAIN_ID: u64 = 31337;

/// ノード設定。
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// 待受アドレス
    pub addr: SocketAddr,
    /// ホストするコレクション
    pub collection: CollectionConfig,
    /// 起動時にオーナー権限で追加する署名者
    pub initial_signers: Vec<Address>,
}

impl NodeConfig {
    /// 環境変数から構築する。`OWNER_ADDRESS`のみ必須。
    pub fn from_env() -> anyhow::Result<Self> {
        let addr = env_or("NODE_ADDR", DEFAULT_NODE_ADDR).parse()?;

        let kind: CollectionKind = env_or("COLLECTION_KIND", "token")
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;

        let chain_id = match std::env::var("CHAIN_ID") {
            Ok(v) => v.parse()?,
            Err(_) => DEFAULT_CHAIN_ID,
        };

        let owner: Address = std::env::var("OWNER_ADDRESS")
            .map_err(|_| anyhow::anyhow!("OWNER_ADDRESSが未設定です"))?
            .parse()?;

        let verifying_contract = match std::env::var("VERIFYING_CONTRACT") {
            Ok(v) => v.parse()?,
            Err(_) => {
                tracing::warn!("VERIFYING_CONTRACTが未設定です。ゼロアドレスを使用します");
                Address::ZERO
            }
        };

        let mut collection = CollectionConfig::new(
            env_or("COLLECTION_NAME", "DecentralverseLands"),
            env_or("COLLECTION_SYMBOL", "DVL"),
            chain_id,
            verifying_contract,
            owner,
        );
        collection.kind = kind;
        collection.base_uri = env_or("BASE_URI", "");
        if let Ok(prefix) = std::env::var("CONTENT_PREFIX") {
            collection.content_prefix = prefix;
        }

        let initial_signers = parse_signer_list(&env_or("INITIAL_SIGNERS", ""))?;

        Ok(Self {
            addr,
            collection,
            initial_signers,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// カンマ区切りのアドレス一覧をパースする（空要素は無視）。
pub fn parse_signer_list(raw: &str) -> anyhow::Result<Vec<Address>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Address>().map_err(anyhow::Error::from))
        .collect()
}

/// ホスト中のコレクション。
pub enum Deployment {
    Content(ContentCollection),
    Token(TokenCollection),
}

impl Deployment {
    pub fn kind(&self) -> CollectionKind {
        match self {
            Deployment::Content(_) => CollectionKind::Content,
            Deployment::Token(_) => CollectionKind::Token,
        }
    }

    pub fn content_mut(&mut self) -> Result<&mut ContentCollection, NodeError> {
        match self {
            Deployment::Content(c) => Ok(c),
            Deployment::Token(_) => Err(mismatch(CollectionKind::Content, CollectionKind::Token)),
        }
    }

    pub fn token(&self) -> Result<&TokenCollection, NodeError> {
        match self {
            Deployment::Token(c) => Ok(c),
            Deployment::Content(_) => Err(mismatch(CollectionKind::Token, CollectionKind::Content)),
        }
    }

    pub fn token_mut(&mut self) -> Result<&mut TokenCollection, NodeError> {
        match self {
            Deployment::Token(c) => Ok(c),
            Deployment::Content(_) => Err(mismatch(CollectionKind::Token, CollectionKind::Content)),
        }
    }

    pub fn add_signer(&mut self, caller: Address, signer: Address) -> Result<(), CollectionError> {
        match self {
            Deployment::Content(c) => c.add_signer(caller, signer),
            Deployment::Token(c) => c.add_signer(caller, signer),
        }
    }

    pub fn renounce_signer(&mut self, caller: Address) -> Result<(), CollectionError> {
        match self {
            Deployment::Content(c) => c.renounce_signer(caller),
            Deployment::Token(c) => c.renounce_signer(caller),
        }
    }

    pub fn is_signer(&self, identity: Address) -> bool {
        match self {
            Deployment::Content(c) => c.is_signer(identity),
            Deployment::Token(c) => c.is_signer(identity),
        }
    }

    pub fn withdraw_all_funds(&mut self, caller: Address) -> Result<Withdrawal, CollectionError> {
        match self {
            Deployment::Content(c) => c.withdraw_all_funds(caller),
            Deployment::Token(c) => c.withdraw_all_funds(caller),
        }
    }

    pub fn locator_of(&self, token_id: TokenId) -> Result<String, CollectionError> {
        match self {
            Deployment::Content(c) => c.locator_of(token_id),
            Deployment::Token(c) => c.locator_of(token_id),
        }
    }

    pub fn events(&self) -> &[MintEvent] {
        match self {
            Deployment::Content(c) => c.events(),
            Deployment::Token(c) => c.events(),
        }
    }

    pub fn info(&self) -> CollectionInfo {
        match self {
            Deployment::Content(c) => CollectionInfo {
                kind: c.kind(),
                symbol: c.symbol().to_string(),
                domain: c.domain().clone(),
                owner: c.owner(),
                sealed: false,
                base_uri: None,
                total_supply: c.total_supply(),
                balance: c.balance(),
            },
            Deployment::Token(c) => CollectionInfo {
                kind: c.kind(),
                symbol: c.symbol().to_string(),
                domain: c.domain().clone(),
                owner: c.owner(),
                sealed: c.is_sealed(),
                base_uri: Some(c.base_uri().to_string()),
                total_supply: c.total_supply(),
                balance: c.balance(),
            },
        }
    }
}

fn mismatch(expected: CollectionKind, actual: CollectionKind) -> NodeError {
    NodeError::KindMismatch { expected, actual }
}

/// ノードの共有状態。
pub struct NodeState {
    /// 全ての呼び出しを直列化する調停点
    pub deployment: RwLock<Deployment>,
}

impl NodeState {
    /// 設定からコレクションを構築し、初期署名者を登録する。
    pub fn from_config(
        config: &CollectionConfig,
        initial_signers: &[Address],
    ) -> Result<Self, CollectionError> {
        let deployment = match config.kind {
            CollectionKind::Content => {
                let mut collection = ContentCollection::new(config);
                for signer in initial_signers {
                    collection.add_signer(config.owner, *signer)?;
                }
                Deployment::Content(collection)
            }
            CollectionKind::Token => {
                let mut collection = TokenCollection::new(config);
                for signer in initial_signers {
                    collection.add_signer(config.owner, *signer)?;
                }
                Deployment::Token(collection)
            }
        };
        Ok(Self {
            deployment: RwLock::new(deployment),
        })
    }
}
