//! # EIP-712 構造化データハッシュ
//!
//! バウチャーの全フィールドとデプロイ情報（ドメイン）を束縛したダイジェストを構築する。
//!
//! ```text
//! domainSeparator = keccak256(typeHash(EIP712Domain) ‖ name ‖ version
//!                             ‖ chainId ‖ verifyingContract)
//! digest          = keccak256(0x19 ‖ 0x01 ‖ domainSeparator ‖ hashStruct(value))
//! ```

use mintpass_types::{Address, ContentVoucher, DomainContext, TokenVoucher};

use crate::keccak256;

/// ドメインの型定義（フィールド名と型、固定順）。
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// コンテンツアドレス型バウチャーの型定義。
pub const CONTENT_VOUCHER_TYPE: &str = "NFT(address account,string cid,uint256 price)";

/// トークンID指定型バウチャーの型定義。
pub const TOKEN_VOUCHER_TYPE: &str =
    "NFT(address account,uint256 tokenId,uint256 price,uint256 nonce)";

/// EIP-712で署名可能な構造体。
///
/// `TYPE`はencodeType（参照する型を含む完全な型文字列）、
/// `encode_data`は各フィールドを32バイトずつ定義順に連結したもの。
pub trait TypedStruct {
    const TYPE: &'static str;

    fn encode_data(&self) -> Vec<u8>;

    fn type_hash() -> [u8; 32] {
        keccak256(Self::TYPE.as_bytes())
    }

    /// hashStruct(value) = keccak256(typeHash ‖ encodeData(value))
    fn struct_hash(&self) -> [u8; 32] {
        let data = self.encode_data();
        let mut buf = Vec::with_capacity(32 + data.len());
        buf.extend_from_slice(&Self::type_hash());
        buf.extend_from_slice(&data);
        keccak256(&buf)
    }
}

/// `address`型のエンコード（左ゼロ詰め32バイト）。
pub fn encode_address(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// `uint256`型のエンコード（ビッグエンディアン32バイト）。
pub fn encode_uint(value: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// `string`型のエンコード（内容のKeccak-256）。
pub fn encode_string(value: &str) -> [u8; 32] {
    keccak256(value.as_bytes())
}

/// ドメインセパレータを計算する。
pub fn domain_separator(domain: &DomainContext) -> [u8; 32] {
    let mut buf = Vec::with_capacity(32 * 5);
    buf.extend_from_slice(&keccak256(DOMAIN_TYPE.as_bytes()));
    buf.extend_from_slice(&encode_string(&domain.name));
    buf.extend_from_slice(&encode_string(&domain.version));
    buf.extend_from_slice(&encode_uint(u128::from(domain.chain_id)));
    buf.extend_from_slice(&encode_address(&domain.verifying_contract));
    keccak256(&buf)
}

/// 署名対象のダイジェストを計算する。
pub fn typed_data_digest<T: TypedStruct>(domain: &DomainContext, value: &T) -> [u8; 32] {
    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(&[0x19, 0x01]);
    buf.extend_from_slice(&domain_separator(domain));
    buf.extend_from_slice(&value.struct_hash());
    keccak256(&buf)
}

impl TypedStruct for ContentVoucher {
    const TYPE: &'static str = CONTENT_VOUCHER_TYPE;

    fn encode_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(32 * 3);
        data.extend_from_slice(&encode_address(&self.account));
        data.extend_from_slice(&encode_string(&self.cid));
        data.extend_from_slice(&encode_uint(self.price));
        data
    }
}

impl TypedStruct for TokenVoucher {
    const TYPE: &'static str = TOKEN_VOUCHER_TYPE;

    fn encode_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(32 * 4);
        data.extend_from_slice(&encode_address(&self.account));
        data.extend_from_slice(&encode_uint(u128::from(self.token_id)));
        data.extend_from_slice(&encode_uint(self.price));
        data.extend_from_slice(&encode_uint(u128::from(self.nonce)));
        data
    }
}
