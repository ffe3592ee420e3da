//! # オフチェーン署名
//!
//! 署名者が保持する秘密鍵でバウチャーに署名する。
//! 償還時に受け付けられる`signature`を生成する唯一の手段。

use k256::ecdsa::SigningKey;
use mintpass_types::{Address, DomainContext};

use crate::eip712::{typed_data_digest, TypedStruct};
use crate::recover::{address_of, SIGNATURE_LENGTH};
use crate::CryptoError;

/// secp256k1秘密鍵を保持するバウチャー署名者。
pub struct VoucherSigner {
    key: SigningKey,
    address: Address,
}

impl VoucherSigner {
    pub fn new(key: SigningKey) -> Self {
        let address = address_of(key.verifying_key());
        Self { key, address }
    }

    /// OSの乱数源から新しい鍵を生成する。
    pub fn random() -> Self {
        Self::new(SigningKey::random(&mut rand::rngs::OsRng))
    }

    /// 32バイトの秘密鍵（Hex、`0x`は任意）から構築する。
    pub fn from_hex(secret_hex: &str) -> Result<Self, CryptoError> {
        let trimmed = secret_hex.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes =
            hex::decode(trimmed).map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidSecretKey(format!(
                "32バイトである必要があります（実際: {}バイト）",
                bytes.len()
            )));
        }
        let key = SigningKey::from_slice(&bytes)
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        Ok(Self::new(key))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// 秘密鍵をHex文字列（`0x`付き）で返す。
    pub fn secret_hex(&self) -> String {
        format!("0x{}", hex::encode(self.key.to_bytes()))
    }

    /// ダイジェストに署名し、`r ‖ s ‖ v`（v ∈ {27, 28}、sは下半分）を返す。
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<[u8; SIGNATURE_LENGTH], CryptoError> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

        let (signature, parity) = match signature.normalize_s() {
            Some(normalized) => (normalized, !recovery_id.is_y_odd()),
            None => (signature, recovery_id.is_y_odd()),
        };

        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = 27 + u8::from(parity);
        Ok(out)
    }

    /// ドメインとバウチャーからダイジェストを構築して署名する。
    pub fn sign_voucher<T: TypedStruct>(
        &self,
        domain: &DomainContext,
        voucher: &T,
    ) -> Result<[u8; SIGNATURE_LENGTH], CryptoError> {
        self.sign_digest(&typed_data_digest(domain, voucher))
    }
}

impl std::fmt::Debug for VoucherSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoucherSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
