//! # Mintpass 暗号処理
//!
//! バウチャーのダイジェスト構築、署名者の復元、オフチェーン署名を実装する。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | 構造化ハッシュ | EIP-712 |
//! | ハッシュ | Keccak-256 |
//! | 署名 | secp256k1 ECDSA（65バイト、復元可能） |

pub mod eip712;
pub mod recover;
pub mod signer;

use sha3::{Digest, Keccak256};

pub use eip712::{domain_separator, typed_data_digest, TypedStruct};
pub use recover::{address_of, Secp256k1Verifier, SignatureVerifier, SIGNATURE_LENGTH};
pub use signer::VoucherSigner;

/// 暗号処理のエラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// 署名の長さが不正
    #[error("署名は65バイトである必要があります（実際: {0}バイト）")]
    InvalidSignatureLength(usize),
    /// 復元IDが不正
    #[error("署名のv値が不正です: {0}")]
    InvalidRecoveryId(u8),
    /// r/sが範囲外、またはsが上半分（可鍛性のある形式）
    #[error("署名のr/s値が不正です")]
    MalformedSignature,
    /// 公開鍵の復元に失敗
    #[error("署名者の復元に失敗しました")]
    RecoveryFailed,
    /// 復元結果がゼロアドレス
    #[error("署名者がゼロアドレスに復元されました")]
    ZeroAddress,
    /// 秘密鍵が不正
    #[error("秘密鍵が不正です: {0}")]
    InvalidSecretKey(String),
    /// 署名処理に失敗
    #[error("署名に失敗しました: {0}")]
    SigningFailed(String),
}

/// Keccak-256ハッシュ計算。
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
