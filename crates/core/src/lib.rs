//! # Mintpass Core
//!
//! 署名付きバウチャーによるミント認可を実装する。
//!
//! ## 構成
//! - [`SignerRegistry`]: オーナーと認可された署名者
//! - [`ReplayGuard`]: 消費済みの署名/nonce
//! - [`MetadataGate`]: ベースURIと封印フラグ
//! - [`TokenLedger`]: トークンの所有と存在
//! - [`Collection`]: 上記をまとめた状態と償還ステートマシン
//!
//! 発行方式は [`MintScheme`] で切り替える（[`ContentAddressed`] / [`ExplicitId`]）。

mod authorizer;
pub mod collection;
pub mod error;
pub mod ledger;
pub mod metadata;
pub mod registry;
pub mod replay;
pub mod scheme;
pub mod treasury;

pub use collection::{Collection, CollectionConfig, ContentCollection, TokenCollection};
pub use error::{CollectionError, LedgerError};
pub use ledger::{MemoryLedger, TokenLedger};
pub use metadata::MetadataGate;
pub use registry::SignerRegistry;
pub use replay::ReplayGuard;
pub use scheme::{ContentAddressed, ExplicitId, MintScheme, DEFAULT_CONTENT_PREFIX};
pub use treasury::Treasury;
