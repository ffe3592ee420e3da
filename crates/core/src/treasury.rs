//! # 売上残高
//!
//! 償還で受け取った支払いの累計。オーナーが全額を引き出す。

use mintpass_types::Wei;

use crate::error::CollectionError;

#[derive(Debug, Clone, Default)]
pub struct Treasury {
    balance: Wei,
}

impl Treasury {
    pub fn balance(&self) -> Wei {
        self.balance
    }

    /// `amount`を加算できるか確認する（状態は変更しない）。
    pub fn ensure_can_accept(&self, amount: Wei) -> Result<(), CollectionError> {
        self.balance
            .checked_add(amount)
            .map(|_| ())
            .ok_or(CollectionError::BalanceOverflow)
    }

    pub fn deposit(&mut self, amount: Wei) -> Result<(), CollectionError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(CollectionError::BalanceOverflow)?;
        Ok(())
    }

    /// 残高を全額取り出し、ゼロに戻す。
    pub fn withdraw_all(&mut self) -> Wei {
        std::mem::take(&mut self.balance)
    }
}
