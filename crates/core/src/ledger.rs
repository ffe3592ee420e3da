//! # トークン台帳
//!
//! トークンの所有と存在を管理する外部コラボレータのインターフェースと、
//! メモリ内実装。

use std::collections::{BTreeMap, HashMap};

use mintpass_types::{Address, TokenId};

use crate::error::LedgerError;

/// トークン台帳のトレイト。
pub trait TokenLedger: Send + Sync {
    /// トークンを`to`に発行する。割り当て済みのIDはエラー。
    fn mint(&mut self, to: Address, token_id: TokenId) -> Result<(), LedgerError>;

    fn exists(&self, token_id: TokenId) -> bool;

    fn owner_of(&self, token_id: TokenId) -> Result<Address, LedgerError>;

    fn balance_of(&self, owner: Address) -> u64;

    fn total_supply(&self) -> u64;
}

/// メモリ内のトークン台帳。
#[derive(Debug, Default)]
pub struct MemoryLedger {
    owners: BTreeMap<TokenId, Address>,
    balances: HashMap<Address, u64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenLedger for MemoryLedger {
    fn mint(&mut self, to: Address, token_id: TokenId) -> Result<(), LedgerError> {
        if self.owners.contains_key(&token_id) {
            return Err(LedgerError::AlreadyAssigned(token_id));
        }
        self.owners.insert(token_id, to);
        *self.balances.entry(to).or_default() += 1;
        Ok(())
    }

    fn exists(&self, token_id: TokenId) -> bool {
        self.owners.contains_key(&token_id)
    }

    fn owner_of(&self, token_id: TokenId) -> Result<Address, LedgerError> {
        self.owners
            .get(&token_id)
            .copied()
            .ok_or(LedgerError::NonexistentToken(token_id))
    }

    fn balance_of(&self, owner: Address) -> u64 {
        self.balances.get(&owner).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u64 {
        self.owners.len() as u64
    }
}
