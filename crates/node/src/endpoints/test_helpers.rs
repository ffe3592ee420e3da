//! # エンドポイントテスト用共通ヘルパー

use std::sync::Arc;

use mintpass_core::CollectionConfig;
use mintpass_crypto::VoucherSigner;
use mintpass_types::{Address, CollectionKind, ContentVoucher, DomainContext, TokenVoucher};

use crate::config::NodeState;

pub const OWNER: Address = Address([0x01; 20]);
pub const PRICE: u128 = 10_000_000_000_000_000;

const SIGNER_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub fn signer() -> VoucherSigner {
    VoucherSigner::from_hex(SIGNER_KEY).unwrap()
}

pub fn user() -> Address {
    "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC".parse().unwrap()
}

pub fn collection_config(kind: CollectionKind) -> CollectionConfig {
    let mut config = CollectionConfig::new(
        "DecentralverseLands",
        "DVL",
        31337,
        "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap(),
        OWNER,
    );
    config.kind = kind;
    config.base_uri = "https://metadata.decentralverse.com/".to_string();
    config
}

/// 署名者登録済みの共有状態を構築する
pub fn make_state(kind: CollectionKind) -> Arc<NodeState> {
    let config = collection_config(kind);
    Arc::new(NodeState::from_config(&config, &[signer().address()]).unwrap())
}

pub fn domain() -> DomainContext {
    collection_config(CollectionKind::Token).domain()
}

pub fn sign_token(account: Address, token_id: u64, price: u128, nonce: u64) -> String {
    let voucher = TokenVoucher {
        account,
        token_id,
        price,
        nonce,
    };
    let sig = signer().sign_voucher(&domain(), &voucher).unwrap();
    format!("0x{}", hex::encode(sig))
}

pub fn sign_content(account: Address, cid: &str, price: u128) -> String {
    let voucher = ContentVoucher {
        account,
        cid: cid.to_string(),
        price,
    };
    let sig = signer().sign_voucher(&domain(), &voucher).unwrap();
    hex::encode(sig)
}
