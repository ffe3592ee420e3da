//! # Mintpass CLI
//!
//! バウチャーの発行（オフライン署名）と、ノードに対する管理・償還操作を行う。
//!
//! ## 使用例
//! ```bash
//! # 署名者鍵の生成
//! mintpass-cli keygen
//!
//! # トークンID指定型バウチャーへの署名（ドメインはノードから取得）
//! mintpass-cli --key $SIGNER_KEY sign-token --account 0x... --token-id 1250 \
//!     --price 10000000000000000 --nonce 0
//!
//! # 償還
//! mintpass-cli --key $USER_KEY redeem-token --token-id 1250 \
//!     --price 10000000000000000 --nonce 0 --signature 0x...
//! ```

mod client;

use clap::{Args, Parser, Subcommand};
use mintpass_crypto::VoucherSigner;
use mintpass_types::{
    AddSignerRequest, Address, CallerRequest, ContentRedeemRequest, ContentVoucher,
    DomainContext, TokenId, TokenRedeemRequest, TokenVoucher, Wei,
};

use client::NodeClient;

#[derive(Parser)]
#[command(name = "mintpass-cli")]
#[command(about = "Mintpass - 署名付きバウチャーの発行とコレクション管理", long_about = None)]
struct Cli {
    /// ノードのエンドポイント
    #[arg(long, global = true, env = "MINTPASS_NODE", default_value = "http://localhost:8545")]
    node: String,

    /// 秘密鍵（32バイトHex）
    #[arg(long, global = true, env = "MINTPASS_KEY", hide_env_values = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// 署名ドメインの指定。全て省略した場合はノードから取得する。
#[derive(Args, Debug, Clone, Default)]
struct DomainArgs {
    /// コレクション名（EIP-712ドメイン名）
    #[arg(long)]
    name: Option<String>,

    /// チェーンID
    #[arg(long)]
    chain_id: Option<u64>,

    /// 検証コントラクトのアドレス
    #[arg(long)]
    contract: Option<Address>,
}

#[derive(Subcommand)]
enum Commands {
    /// 新しい鍵を生成する
    Keygen,

    /// 鍵のアドレスを表示する
    Address,

    /// トークンID指定型のバウチャーに署名する
    SignToken {
        /// ミントを許可するアカウント
        #[arg(long)]
        account: Address,
        #[arg(long)]
        token_id: TokenId,
        /// 価格（wei）
        #[arg(long)]
        price: Wei,
        #[arg(long)]
        nonce: u64,
        #[command(flatten)]
        domain: DomainArgs,
    },

    /// コンテンツアドレス型のバウチャーに署名する
    SignContent {
        /// ミントを許可するアカウント
        #[arg(long)]
        account: Address,
        /// コンテンツ識別子
        #[arg(long)]
        cid: String,
        /// 価格（wei）
        #[arg(long)]
        price: Wei,
        #[command(flatten)]
        domain: DomainArgs,
    },

    /// 署名者を追加する（オーナー鍵で実行）
    AddSigner {
        #[arg(long)]
        signer: Address,
    },

    /// 自身の署名者ロールを辞退する
    Renounce,

    /// アドレスが署名者かどうかを照会する
    IsSigner {
        address: Address,
    },

    /// トークンID指定型のバウチャーを償還する
    RedeemToken {
        #[arg(long)]
        token_id: TokenId,
        #[arg(long)]
        price: Wei,
        #[arg(long)]
        nonce: u64,
        #[arg(long)]
        signature: String,
        /// 支払額（省略時は価格と同額）
        #[arg(long)]
        value: Option<Wei>,
    },

    /// コンテンツアドレス型のバウチャーを償還する
    RedeemContent {
        #[arg(long)]
        cid: String,
        #[arg(long)]
        price: Wei,
        #[arg(long)]
        signature: String,
        /// 支払額（省略時は価格と同額）
        #[arg(long)]
        value: Option<Wei>,
    },

    /// 売上を引き出す（オーナー鍵で実行）
    Withdraw,

    /// コレクション情報を表示する
    Info,

    /// 償還の完了レコードを表示する
    Events,
}

fn load_signer(key: Option<&str>) -> anyhow::Result<VoucherSigner> {
    let key = key.ok_or_else(|| anyhow::anyhow!("--key または MINTPASS_KEY が必要です"))?;
    Ok(VoucherSigner::from_hex(key)?)
}

/// 指定されたフィールドでノードのドメインを上書きする。
fn merge_domain(args: &DomainArgs, base: Option<DomainContext>) -> anyhow::Result<DomainContext> {
    match (base, &args.name, args.chain_id, args.contract) {
        (_, Some(name), Some(chain_id), Some(contract)) => {
            Ok(DomainContext::new(name.clone(), chain_id, contract))
        }
        (Some(mut domain), name, chain_id, contract) => {
            if let Some(name) = name {
                domain.name = name.clone();
            }
            if let Some(chain_id) = chain_id {
                domain.chain_id = chain_id;
            }
            if let Some(contract) = contract {
                domain.verifying_contract = contract;
            }
            Ok(domain)
        }
        (None, ..) => anyhow::bail!("--name, --chain-id, --contract を全て指定してください"),
    }
}

async fn resolve_domain(args: &DomainArgs, client: &NodeClient) -> anyhow::Result<DomainContext> {
    if args.name.is_some() && args.chain_id.is_some() && args.contract.is_some() {
        return merge_domain(args, None);
    }
    let info = client.collection_info().await?;
    tracing::debug!(domain = ?info.domain, "ノードから署名ドメインを取得しました");
    merge_domain(args, Some(info.domain))
}

/// keygenの出力。秘密鍵の行はそのまま `--key` に渡せる形式。
fn render_keygen(signer: &VoucherSigner) -> String {
    format!("secret:  {}\naddress: {}", signer.secret_hex(), signer.address())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = NodeClient::new(cli.node.clone());
    let key = cli.key.as_deref();

    match cli.command {
        Commands::Keygen => {
            println!("{}", render_keygen(&VoucherSigner::random()));
        }
        Commands::Address => {
            println!("{}", load_signer(key)?.address());
        }
        Commands::SignToken {
            account,
            token_id,
            price,
            nonce,
            domain,
        } => {
            let signer = load_signer(key)?;
            let domain = resolve_domain(&domain, &client).await?;
            let voucher = TokenVoucher {
                account,
                token_id,
                price,
                nonce,
            };
            let signature = signer.sign_voucher(&domain, &voucher)?;
            tracing::info!(signer = %signer.address(), token_id, nonce, "バウチャーに署名しました");
            println!("0x{}", hex::encode(signature));
        }
        Commands::SignContent {
            account,
            cid,
            price,
            domain,
        } => {
            let signer = load_signer(key)?;
            let domain = resolve_domain(&domain, &client).await?;
            let voucher = ContentVoucher {
                account,
                cid,
                price,
            };
            let signature = signer.sign_voucher(&domain, &voucher)?;
            tracing::info!(signer = %signer.address(), cid = %voucher.cid, "バウチャーに署名しました");
            println!("0x{}", hex::encode(signature));
        }
        Commands::AddSigner { signer } => {
            let caller = load_signer(key)?.address();
            let status = client
                .add_signer(&AddSignerRequest { caller, signer })
                .await?;
            print_json(&status)?;
        }
        Commands::Renounce => {
            let caller = load_signer(key)?.address();
            let status = client.renounce_signer(&CallerRequest { caller }).await?;
            print_json(&status)?;
        }
        Commands::IsSigner { address } => {
            let status = client.signer_status(&address.to_string()).await?;
            print_json(&status)?;
        }
        Commands::RedeemToken {
            token_id,
            price,
            nonce,
            signature,
            value,
        } => {
            let caller = load_signer(key)?.address();
            let event = client
                .redeem_token(&TokenRedeemRequest {
                    caller,
                    token_id,
                    price,
                    nonce,
                    signature,
                    value: value.unwrap_or(price),
                })
                .await?;
            print_json(&event)?;
        }
        Commands::RedeemContent {
            cid,
            price,
            signature,
            value,
        } => {
            let caller = load_signer(key)?.address();
            let event = client
                .redeem_content(&ContentRedeemRequest {
                    caller,
                    cid,
                    price,
                    signature,
                    value: value.unwrap_or(price),
                })
                .await?;
            print_json(&event)?;
        }
        Commands::Withdraw => {
            let caller = load_signer(key)?.address();
            let withdrawal = client.withdraw(&CallerRequest { caller }).await?;
            print_json(&withdrawal)?;
        }
        Commands::Info => {
            print_json(&client.collection_info().await?)?;
        }
        Commands::Events => {
            print_json(&client.events().await?)?;
        }
    }

    Ok(())
}
