//! # 署名者の復元
//!
//! ダイジェストと65バイト署名から署名者のアドレスを復元する。
//! 認可判断（署名者が現在信頼されているか）は行わない。

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use mintpass_types::Address;

use crate::{keccak256, CryptoError};

/// 署名長（r: 32バイト ‖ s: 32バイト ‖ v: 1バイト）
pub const SIGNATURE_LENGTH: usize = 65;

/// 「このダイジェストに誰が署名したか」に答えるインターフェース。
///
/// テストでは決定的なスタブに差し替えられる。
pub trait SignatureVerifier: Send + Sync {
    fn recover(&self, digest: &[u8; 32], signature: &[u8]) -> Result<Address, CryptoError>;
}

/// secp256k1 ECDSAによる署名者復元。
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Verifier;

impl SignatureVerifier for Secp256k1Verifier {
    fn recover(&self, digest: &[u8; 32], signature: &[u8]) -> Result<Address, CryptoError> {
        if signature.len() != SIGNATURE_LENGTH {
            return Err(CryptoError::InvalidSignatureLength(signature.len()));
        }

        // v は 27/28 のみ
        let v = signature[64];
        let recovery_id = match v {
            27 | 28 => RecoveryId::from_byte(v - 27).ok_or(CryptoError::InvalidRecoveryId(v))?,
            other => return Err(CryptoError::InvalidRecoveryId(other)),
        };

        // r/s == 0 は from_slice が拒否する
        let sig =
            Signature::from_slice(&signature[..64]).map_err(|_| CryptoError::MalformedSignature)?;
        // 上半分のsは受け付けない（normalize_sがSomeを返す = sが上半分）
        if sig.normalize_s().is_some() {
            return Err(CryptoError::MalformedSignature);
        }

        let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
            .map_err(|_| CryptoError::RecoveryFailed)?;
        let address = address_of(&key);
        if address.is_zero() {
            return Err(CryptoError::ZeroAddress);
        }

        tracing::debug!(signer = %address, "署名者を復元しました");
        Ok(address)
    }
}

/// 公開鍵からアドレスを導出する（非圧縮公開鍵64バイトのKeccak-256の末尾20バイト）。
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[12..]);
    Address(out)
}
