//! # ノードクライアント
//!
//! Mintpassノードの HTTP API を呼び出す薄いラッパー。

use mintpass_types::{
    AddSignerRequest, CallerRequest, CollectionInfo, ContentRedeemRequest, MintEvent,
    SignerStatus, TokenRedeemRequest, Withdrawal,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct NodeClient {
    base_url: String,
    http: reqwest::Client,
}

impl NodeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn collection_info(&self) -> anyhow::Result<CollectionInfo> {
        self.get("/.well-known/collection-info").await
    }

    pub async fn signer_status(&self, address: &str) -> anyhow::Result<SignerStatus> {
        self.get(&format!("/signers/{address}")).await
    }

    pub async fn events(&self) -> anyhow::Result<Vec<MintEvent>> {
        self.get("/events").await
    }

    pub async fn redeem_token(&self, request: &TokenRedeemRequest) -> anyhow::Result<MintEvent> {
        self.post("/redeem/token", request).await
    }

    pub async fn redeem_content(
        &self,
        request: &ContentRedeemRequest,
    ) -> anyhow::Result<MintEvent> {
        self.post("/redeem/content", request).await
    }

    pub async fn add_signer(&self, request: &AddSignerRequest) -> anyhow::Result<SignerStatus> {
        self.post("/signers", request).await
    }

    pub async fn renounce_signer(&self, request: &CallerRequest) -> anyhow::Result<SignerStatus> {
        self.post("/signers/renounce", request).await
    }

    pub async fn withdraw(&self, request: &CallerRequest) -> anyhow::Result<Withdrawal> {
        self.post("/withdraw", request).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::read(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> anyhow::Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            anyhow::bail!("ノードがエラーを返しました: HTTP {} - {}", status, body);
        }
        serde_json::from_str(&body)
            .map_err(|e| anyhow::anyhow!("レスポンスのパースに失敗: {e}"))
    }
}
