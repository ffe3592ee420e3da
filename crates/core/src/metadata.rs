//! # メタデータゲート
//!
//! オーナーが変更できるベースURIと、一方向の封印フラグ。
//! 封印後はベースURIが永久に固定される。

use mintpass_types::TokenId;

use crate::error::CollectionError;

#[derive(Debug, Clone)]
pub struct MetadataGate {
    base_uri: String,
    sealed: bool,
}

impl MetadataGate {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            sealed: false,
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// ベースURIを置き換える。形式の検証は行わない。
    pub fn reveal(&mut self, new_base_uri: impl Into<String>) -> Result<(), CollectionError> {
        if self.sealed {
            return Err(CollectionError::ContractSealed);
        }
        self.base_uri = new_base_uri.into();
        Ok(())
    }

    /// 封印する。2回目以降は常にエラー。
    pub fn seal(&mut self) -> Result<(), CollectionError> {
        if self.sealed {
            return Err(CollectionError::ContractSealed);
        }
        self.sealed = true;
        Ok(())
    }

    /// `baseURI + tokenId`（存在確認は呼び出し側で行う）
    pub fn locator(&self, token_id: TokenId) -> String {
        format!("{}{}", self.base_uri, token_id)
    }
}
