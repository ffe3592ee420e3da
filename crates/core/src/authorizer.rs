//! # 償還ステートマシン
//!
//! ## 検証順序
//! 1. 形式チェック（コンテンツアドレス型のみ、空のCIDは `InvalidURI`）
//! 2. 認可: 呼び出し元IDと提示フィールドからバウチャーを再構築し、署名者を復元してレジストリと照合
//! 3. 支払額と署名された価格の完全一致
//! 4. リプレイチェック
//! 5. コミット: リプレイキーを消費し、台帳にトークンを発行
//! 6. 完了レコードの記録
//!
//! いずれかの段階で失敗した場合は状態を変更しない。
//! 例外として、台帳でのID衝突はリプレイキーを消費済みのまま残す。

use mintpass_crypto::typed_data_digest;
use mintpass_types::{Address, MintEvent, Wei};

use crate::collection::Collection;
use crate::error::CollectionError;
use crate::scheme::MintScheme;

impl<S: MintScheme> Collection<S> {
    /// バウチャーを償還してトークンを発行する。
    ///
    /// `caller` がバウチャーの `account` として補完される。
    /// `value` は呼び出しに添付された支払額。
    pub fn redeem(
        &mut self,
        caller: Address,
        claim: &S::Claim,
        signature: &[u8],
        value: Wei,
    ) -> Result<MintEvent, CollectionError> {
        match self.try_redeem(caller, claim, signature, value) {
            Ok(event) => {
                tracing::info!(
                    kind = ?S::KIND,
                    token_id = event.token_id,
                    recipient = %event.recipient,
                    price = event.price,
                    "バウチャーを償還しました"
                );
                Ok(event)
            }
            Err(e) => {
                tracing::warn!(kind = ?S::KIND, caller = %caller, error = %e, "償還を拒否しました");
                Err(e)
            }
        }
    }

    fn try_redeem(
        &mut self,
        caller: Address,
        claim: &S::Claim,
        signature: &[u8],
        value: Wei,
    ) -> Result<MintEvent, CollectionError> {
        let voucher = S::voucher(claim, caller);

        S::check_shape(&voucher)?;

        self.authorize(&voucher, signature)?;

        let price = S::price(&voucher);
        if value != price {
            return Err(CollectionError::InvalidValue {
                expected: price,
                actual: value,
            });
        }

        let key = S::replay_key(&voucher, signature);
        if self.replay.is_used(&key) {
            return Err(S::replay_error(&key));
        }

        self.treasury.ensure_can_accept(value)?;

        // ここから先の台帳エラーではリプレイキーを戻さない
        self.replay.mark(key);
        let token_id = self.scheme.assign(self.ledger.as_mut(), &voucher)?;

        self.treasury.deposit(value)?;
        let event = S::mint_event(&voucher, token_id);
        self.events.push(event.clone());
        Ok(event)
    }

    /// 署名者を復元し、現在の署名者であることを確認する。
    /// 失敗理由は全て `InvalidSignature` に集約する。
    fn authorize(&self, voucher: &S::Voucher, signature: &[u8]) -> Result<(), CollectionError> {
        let digest = typed_data_digest(&self.domain, voucher);
        let signer = self.verifier.recover(&digest, signature).map_err(|e| {
            tracing::debug!(error = %e, "署名者の復元に失敗しました");
            CollectionError::InvalidSignature
        })?;
        tracing::debug!(digest = %hex::encode(digest), signer = %signer, "署名者を復元しました");

        if !self.registry.is_signer(signer) {
            return Err(CollectionError::InvalidSignature);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mintpass_crypto::{CryptoError, SignatureVerifier, VoucherSigner};
    use mintpass_types::{
        Address, ContentClaim, ContentVoucher, DomainContext, TokenClaim, TokenVoucher,
    };

    use crate::collection::{CollectionConfig, ContentCollection, TokenCollection};
    use crate::error::CollectionError;

    const OWNER: Address = Address([0x01; 20]);
    const SIGNER_KEY: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
    const USER_KEY: &str = "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";
    const PRICE: u128 = 10_000_000_000_000_000;
    const CID: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    fn config() -> CollectionConfig {
        let mut config = CollectionConfig::new(
            "DecentralverseLands",
            "DVL",
            31337,
            "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap(),
            OWNER,
        );
        config.base_uri = "https://metadata.decentralverse.com/".to_string();
        config
    }

    fn signer() -> VoucherSigner {
        VoucherSigner::from_hex(SIGNER_KEY).unwrap()
    }

    fn user() -> Address {
        VoucherSigner::from_hex(USER_KEY).unwrap().address()
    }

    fn token_collection() -> TokenCollection {
        let mut collection = TokenCollection::new(&config());
        collection.add_signer(OWNER, signer().address()).unwrap();
        collection
    }

    fn content_collection() -> ContentCollection {
        let mut collection = ContentCollection::new(&config());
        collection.add_signer(OWNER, signer().address()).unwrap();
        collection
    }

    fn sign_token(
        by: &VoucherSigner,
        domain: &DomainContext,
        account: Address,
        token_id: u64,
        price: u128,
        nonce: u64,
    ) -> Vec<u8> {
        let voucher = TokenVoucher {
            account,
            token_id,
            price,
            nonce,
        };
        by.sign_voucher(domain, &voucher).unwrap().to_vec()
    }

    fn sign_content(
        by: &VoucherSigner,
        domain: &DomainContext,
        account: Address,
        cid: &str,
        price: u128,
    ) -> Vec<u8> {
        let voucher = ContentVoucher {
            account,
            cid: cid.to_string(),
            price,
        };
        by.sign_voucher(domain, &voucher).unwrap().to_vec()
    }

    fn token_claim(token_id: u64, price: u128, nonce: u64) -> TokenClaim {
        TokenClaim {
            token_id,
            price,
            nonce,
        }
    }

    fn content_claim(cid: &str, price: u128) -> ContentClaim {
        ContentClaim {
            cid: cid.to_string(),
            price,
        }
    }

    // -----------------------------------------------------------------------
    // トークンID指定型
    // -----------------------------------------------------------------------

    #[test]
    fn test_token_redeem_success() {
        let mut collection = token_collection();
        let sig = sign_token(&signer(), collection.domain(), user(), 1250, PRICE, 0);

        let event = collection
            .redeem(user(), &token_claim(1250, PRICE, 0), &sig, PRICE)
            .unwrap();
        assert_eq!(event.token_id, 1250);
        assert_eq!(event.recipient, user());
        assert_eq!(event.cid, None);
        assert_eq!(event.price, PRICE);

        assert_eq!(collection.owner_of(1250), Ok(user()));
        assert_eq!(collection.balance_of(user()), 1);
        assert_eq!(collection.balance(), PRICE);
        assert!(collection.is_nonce_used(0));
        assert_eq!(collection.events(), &[event]);
        assert_eq!(
            collection.locator_of(1250).unwrap(),
            "https://metadata.decentralverse.com/1250"
        );

        collection.reveal(OWNER, "ipfs://test-folder/").unwrap();
        assert_eq!(collection.locator_of(1250).unwrap(), "ipfs://test-folder/1250");
    }

    #[test]
    fn test_token_redeem_twice_fails_nonce_used() {
        let mut collection = token_collection();
        let sig = sign_token(&signer(), collection.domain(), user(), 1250, PRICE, 0);
        let claim = token_claim(1250, PRICE, 0);

        collection.redeem(user(), &claim, &sig, PRICE).unwrap();
        assert_eq!(
            collection.redeem(user(), &claim, &sig, PRICE),
            Err(CollectionError::NonceUsed(0))
        );
        assert_eq!(collection.balance(), PRICE);
        assert_eq!(collection.events().len(), 1);
    }

    /// nonceはアカウントやトークンIDに関係なくコレクション全体で一意
    #[test]
    fn test_nonce_is_global_across_accounts() {
        let mut collection = token_collection();
        let other = Address([0x3c; 20]);
        let sig_a = sign_token(&signer(), collection.domain(), user(), 1, PRICE, 7);
        let sig_b = sign_token(&signer(), collection.domain(), other, 2, PRICE, 7);

        collection.redeem(user(), &token_claim(1, PRICE, 7), &sig_a, PRICE).unwrap();
        assert_eq!(
            collection.redeem(other, &token_claim(2, PRICE, 7), &sig_b, PRICE),
            Err(CollectionError::NonceUsed(7))
        );
        assert_eq!(collection.total_supply(), 1);
    }

    #[test]
    fn test_tampered_token_id_fails_invalid_signature() {
        let mut collection = token_collection();
        let sig = sign_token(&signer(), collection.domain(), user(), 1250, PRICE, 0);

        assert_eq!(
            collection.redeem(user(), &token_claim(1251, PRICE, 0), &sig, PRICE),
            Err(CollectionError::InvalidSignature)
        );
        assert!(!collection.is_nonce_used(0));
        assert_eq!(collection.total_supply(), 0);
    }

    #[test]
    fn test_every_single_field_tamper_fails() {
        let mut collection = token_collection();
        let sig = sign_token(&signer(), collection.domain(), user(), 1250, PRICE, 0);

        // 他のアカウント
        assert_eq!(
            collection.redeem(Address([0x3c; 20]), &token_claim(1250, PRICE, 0), &sig, PRICE),
            Err(CollectionError::InvalidSignature)
        );
        // nonce
        assert_eq!(
            collection.redeem(user(), &token_claim(1250, PRICE, 1), &sig, PRICE),
            Err(CollectionError::InvalidSignature)
        );
        // 価格（支払額は改ざん後の価格と一致）
        assert_eq!(
            collection.redeem(user(), &token_claim(1250, PRICE - 1, 0), &sig, PRICE - 1),
            Err(CollectionError::InvalidSignature)
        );

        collection
            .redeem(user(), &token_claim(1250, PRICE, 0), &sig, PRICE)
            .unwrap();
    }

    #[test]
    fn test_wrong_payment_fails_invalid_value() {
        let mut collection = token_collection();
        let sig = sign_token(&signer(), collection.domain(), user(), 1250, PRICE, 0);
        let claim = token_claim(1250, PRICE, 0);

        for value in [0, PRICE - 1, PRICE + 1] {
            assert_eq!(
                collection.redeem(user(), &claim, &sig, value),
                Err(CollectionError::InvalidValue {
                    expected: PRICE,
                    actual: value,
                })
            );
        }
        assert!(!collection.is_nonce_used(0));
        assert_eq!(collection.balance(), 0);
    }

    #[test]
    fn test_self_signed_voucher_fails() {
        let mut collection = token_collection();
        let user_signer = VoucherSigner::from_hex(USER_KEY).unwrap();
        let sig = sign_token(&user_signer, collection.domain(), user(), 1250, PRICE, 0);

        assert_eq!(
            collection.redeem(user(), &token_claim(1250, PRICE, 0), &sig, PRICE),
            Err(CollectionError::InvalidSignature)
        );
    }

    #[test]
    fn test_voucher_for_other_deployment_fails() {
        let mut collection = token_collection();
        let mut planets = config();
        planets.name = "DecentralversePlanets".to_string();
        let sig = sign_token(&signer(), &planets.domain(), user(), 1250, PRICE, 0);

        assert_eq!(
            collection.redeem(user(), &token_claim(1250, PRICE, 0), &sig, PRICE),
            Err(CollectionError::InvalidSignature)
        );
    }

    #[test]
    fn test_malformed_signature_fails_invalid_signature() {
        let mut collection = token_collection();
        let claim = token_claim(1250, PRICE, 0);
        assert_eq!(
            collection.redeem(user(), &claim, &[0u8; 10], PRICE),
            Err(CollectionError::InvalidSignature)
        );
        assert_eq!(
            collection.redeem(user(), &claim, &[0u8; 65], PRICE),
            Err(CollectionError::InvalidSignature)
        );
    }

    /// ID衝突時はnonceが消費されたまま残り、支払いとイベントは記録されない
    #[test]
    fn test_ledger_collision_burns_nonce() {
        let mut collection = token_collection();
        let sig0 = sign_token(&signer(), collection.domain(), user(), 1250, PRICE, 0);
        let sig1 = sign_token(&signer(), collection.domain(), user(), 1250, PRICE, 1);

        collection.redeem(user(), &token_claim(1250, PRICE, 0), &sig0, PRICE).unwrap();
        assert_eq!(
            collection.redeem(user(), &token_claim(1250, PRICE, 1), &sig1, PRICE),
            Err(CollectionError::AlreadyAssigned(1250))
        );
        assert!(collection.is_nonce_used(1));
        assert_eq!(collection.balance(), PRICE);
        assert_eq!(collection.events().len(), 1);
        assert_eq!(
            collection.redeem(user(), &token_claim(1250, PRICE, 1), &sig1, PRICE),
            Err(CollectionError::NonceUsed(1))
        );
    }

    #[test]
    fn test_balance_overflow_leaves_no_trace() {
        let mut collection = token_collection();
        let big = u128::MAX;
        let sig0 = sign_token(&signer(), collection.domain(), user(), 1, big, 0);
        let sig1 = sign_token(&signer(), collection.domain(), user(), 2, 1, 1);

        collection.redeem(user(), &token_claim(1, big, 0), &sig0, big).unwrap();
        assert_eq!(
            collection.redeem(user(), &token_claim(2, 1, 1), &sig1, 1),
            Err(CollectionError::BalanceOverflow)
        );
        assert!(!collection.is_nonce_used(1));
        assert_eq!(collection.total_supply(), 1);

        collection.withdraw_all_funds(OWNER).unwrap();
        collection.redeem(user(), &token_claim(2, 1, 1), &sig1, 1).unwrap();
    }

    #[test]
    fn test_withdraw_sweeps_redemptions() {
        let mut collection = token_collection();
        for nonce in 0..3u64 {
            let sig = sign_token(&signer(), collection.domain(), user(), 100 + nonce, PRICE, nonce);
            collection
                .redeem(user(), &token_claim(100 + nonce, PRICE, nonce), &sig, PRICE)
                .unwrap();
        }
        assert_eq!(collection.balance(), 3 * PRICE);

        let withdrawal = collection.withdraw_all_funds(OWNER).unwrap();
        assert_eq!(withdrawal.recipient, OWNER);
        assert_eq!(withdrawal.amount, 3 * PRICE);
        assert_eq!(collection.balance(), 0);
    }

    // -----------------------------------------------------------------------
    // 署名者の変更
    // -----------------------------------------------------------------------

    #[test]
    fn test_duplicate_signer_and_renounce_invalidate_vouchers() {
        let mut collection = token_collection();
        let signer = signer();
        assert_eq!(
            collection.add_signer(OWNER, signer.address()),
            Err(CollectionError::AlreadyHasRole(signer.address()))
        );

        let pending = sign_token(&signer, collection.domain(), user(), 1250, PRICE, 0);
        collection.renounce_signer(signer.address()).unwrap();
        assert!(!collection.is_signer(signer.address()));

        assert_eq!(
            collection.redeem(user(), &token_claim(1250, PRICE, 0), &pending, PRICE),
            Err(CollectionError::InvalidSignature)
        );
        let fresh = sign_token(&signer, collection.domain(), user(), 1251, PRICE, 1);
        assert_eq!(
            collection.redeem(user(), &token_claim(1251, PRICE, 1), &fresh, PRICE),
            Err(CollectionError::InvalidSignature)
        );
    }

    #[test]
    fn test_newly_added_signer_can_issue() {
        let mut collection = TokenCollection::new(&config());
        let sig = sign_token(&signer(), collection.domain(), user(), 5, PRICE, 0);
        let claim = token_claim(5, PRICE, 0);

        assert_eq!(
            collection.redeem(user(), &claim, &sig, PRICE),
            Err(CollectionError::InvalidSignature)
        );
        collection.add_signer(OWNER, signer().address()).unwrap();
        collection.redeem(user(), &claim, &sig, PRICE).unwrap();
    }

    // -----------------------------------------------------------------------
    // コンテンツアドレス型
    // -----------------------------------------------------------------------

    #[test]
    fn test_content_redeem_assigns_sequential_ids() {
        let mut collection = content_collection();
        let sig1 = sign_content(&signer(), collection.domain(), user(), CID, PRICE);
        let sig2 = sign_content(&signer(), collection.domain(), user(), "QmOther", PRICE);

        let first = collection
            .redeem(user(), &content_claim(CID, PRICE), &sig1, PRICE)
            .unwrap();
        let second = collection
            .redeem(user(), &content_claim("QmOther", PRICE), &sig2, PRICE)
            .unwrap();

        assert_eq!(first.token_id, 1);
        assert_eq!(first.cid.as_deref(), Some(CID));
        assert_eq!(second.token_id, 2);
        assert_eq!(collection.locator_of(1).unwrap(), format!("ipfs://{CID}"));
        assert_eq!(collection.locator_of(2).unwrap(), "ipfs://QmOther");
        assert!(collection.is_signature_used(&sig1));
        assert_eq!(collection.balance(), 2 * PRICE);
    }

    #[test]
    fn test_content_signature_is_single_use() {
        let mut collection = content_collection();
        let sig = sign_content(&signer(), collection.domain(), user(), CID, PRICE);
        let claim = content_claim(CID, PRICE);

        collection.redeem(user(), &claim, &sig, PRICE).unwrap();
        assert_eq!(
            collection.redeem(user(), &claim, &sig, PRICE),
            Err(CollectionError::SignatureUsed)
        );
        assert_eq!(collection.total_supply(), 1);
    }

    #[test]
    fn test_empty_cid_fails_invalid_uri_even_if_signed() {
        let mut collection = content_collection();
        let sig = sign_content(&signer(), collection.domain(), user(), "", PRICE);

        assert_eq!(
            collection.redeem(user(), &content_claim("", PRICE), &sig, PRICE),
            Err(CollectionError::InvalidUri)
        );
        assert!(!collection.is_signature_used(&sig));
    }

    #[test]
    fn test_content_tampered_cid_fails() {
        let mut collection = content_collection();
        let sig = sign_content(&signer(), collection.domain(), user(), CID, PRICE);

        assert_eq!(
            collection.redeem(user(), &content_claim("QmEvil", PRICE), &sig, PRICE),
            Err(CollectionError::InvalidSignature)
        );
        assert_eq!(
            collection.redeem(user(), &content_claim(CID, PRICE), &sig, PRICE + 1),
            Err(CollectionError::InvalidValue {
                expected: PRICE,
                actual: PRICE + 1,
            })
        );
    }

    /// 別アカウントによる償還と不足額の支払いはどちらも状態を変えない
    #[test]
    fn test_content_other_account_and_underpayment_fail() {
        let mut collection = content_collection();
        let sig = sign_content(&signer(), collection.domain(), user(), CID, PRICE);
        let claim = content_claim(CID, PRICE);
        let other = Address([0x3c; 20]);

        assert_eq!(
            collection.redeem(other, &claim, &sig, PRICE),
            Err(CollectionError::InvalidSignature)
        );
        assert_eq!(
            collection.redeem(user(), &claim, &sig, PRICE - 1),
            Err(CollectionError::InvalidValue {
                expected: PRICE,
                actual: PRICE - 1,
            })
        );

        assert!(!collection.is_signature_used(&sig));
        assert_eq!(collection.total_supply(), 0);
        assert_eq!(collection.balance(), 0);
        assert!(collection.events().is_empty());

        let event = collection.redeem(user(), &claim, &sig, PRICE).unwrap();
        assert_eq!(event.token_id, 1);
    }

    // -----------------------------------------------------------------------
    // 署名検証のスタブ
    // -----------------------------------------------------------------------

    /// 署名の1バイト目をアドレスの全バイトとして返すスタブ
    struct StubVerifier;

    impl SignatureVerifier for StubVerifier {
        fn recover(&self, _digest: &[u8; 32], signature: &[u8]) -> Result<Address, CryptoError> {
            match signature.first() {
                Some(0) | None => Err(CryptoError::RecoveryFailed),
                Some(b) => Ok(Address([*b; 20])),
            }
        }
    }

    #[test]
    fn test_stub_verifier_drives_authorization() {
        let mut collection =
            TokenCollection::new(&config()).with_verifier(Box::new(StubVerifier));
        collection.add_signer(OWNER, Address([0xaa; 20])).unwrap();
        let claim = token_claim(1, 0, 0);

        assert_eq!(
            collection.redeem(user(), &claim, &[0xbb], 0),
            Err(CollectionError::InvalidSignature)
        );
        assert_eq!(
            collection.redeem(user(), &claim, &[0x00], 0),
            Err(CollectionError::InvalidSignature)
        );
        collection.redeem(user(), &claim, &[0xaa], 0).unwrap();
        assert_eq!(
            collection.redeem(user(), &claim, &[0xaa], 0),
            Err(CollectionError::NonceUsed(0))
        );
    }
}
