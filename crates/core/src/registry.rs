//! # 署名者レジストリ
//!
//! 認可された署名者の集合と、構築時に固定される単一のオーナー。
//! 署名者はオーナーによってのみ追加され、本人の辞退によってのみ削除される。

use std::collections::BTreeSet;

use mintpass_types::Address;

use crate::error::CollectionError;

#[derive(Debug, Clone)]
pub struct SignerRegistry {
    owner: Address,
    signers: BTreeSet<Address>,
}

impl SignerRegistry {
    /// オーナーを指定して空のレジストリを作成する。
    /// オーナー自身は署名者に含まれない。
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            signers: BTreeSet::new(),
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn ensure_owner(&self, caller: Address) -> Result<(), CollectionError> {
        if caller != self.owner {
            return Err(CollectionError::CallerNotOwner(caller));
        }
        Ok(())
    }

    /// 署名者を追加する。オーナーのみ実行可能で、重複追加はエラー。
    pub fn add_signer(&mut self, caller: Address, signer: Address) -> Result<(), CollectionError> {
        self.ensure_owner(caller)?;
        if self.signers.contains(&signer) {
            return Err(CollectionError::AlreadyHasRole(signer));
        }
        self.signers.insert(signer);
        tracing::info!(signer = %signer, "署名者を追加しました");
        Ok(())
    }

    /// 呼び出し元自身の署名者ロールを辞退する。
    pub fn renounce_signer(&mut self, caller: Address) -> Result<(), CollectionError> {
        if !self.signers.remove(&caller) {
            return Err(CollectionError::CallerNotSigner(caller));
        }
        tracing::info!(signer = %caller, "署名者ロールを辞退しました");
        Ok(())
    }

    pub fn is_signer(&self, identity: Address) -> bool {
        self.signers.contains(&identity)
    }
}
