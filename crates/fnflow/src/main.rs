mod commands;
mod context;

use clap::{Parser, Subcommand};
use colored::Colorize;
use context::Context;
use fnflow_config::Settings;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fnflow")]
#[command(
    about = "OCI Functions のネットワーク・アプリケーション・関数を作って、呼んで、片付ける",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// VCN から関数までを順番に作成
    Setup {
        /// ラン名（リソース名の接頭辞、FN_RUN_NAME 環境変数）
        #[arg(short, long)]
        name: Option<String>,
        /// 関数イメージ（OCIR_FN_IMAGE 環境変数）
        #[arg(short, long)]
        image: Option<String>,
        /// 結果を JSON で出力
        #[arg(long)]
        json: bool,
    },
    /// 関数を一度呼び出してレスポンスを表示
    Invoke {
        /// ラン名（リソース名の接頭辞、FN_RUN_NAME 環境変数）
        #[arg(short, long)]
        name: Option<String>,
        /// リクエストボディ（FN_PAYLOAD 環境変数）
        #[arg(short, long)]
        payload: Option<String>,
    },
    /// 作成したリソースの状態を表示
    Status {
        /// ラン名（リソース名の接頭辞、FN_RUN_NAME 環境変数）
        #[arg(short, long)]
        name: Option<String>,
        /// 結果を JSON で出力
        #[arg(long)]
        json: bool,
    },
    /// 関数から VCN までを逆順に削除
    Teardown {
        /// ラン名（リソース名の接頭辞、FN_RUN_NAME 環境変数）
        #[arg(short, long)]
        name: Option<String>,
        /// 猶予期間の注意を表示しない
        #[arg(short, long)]
        yes: bool,
        /// 結果を JSON で出力
        #[arg(long)]
        json: bool,
    },
    /// バージョン情報を表示
    Version,
}

/// DEBUG が 1 以上なら debug レベル、RUST_LOG があればそちらを優先
fn init_tracing() {
    let debug = std::env::var("DEBUG")
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .is_some_and(|level| level > 0);
    let default_level = if debug { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Versionコマンドは設定不要
    if matches!(cli.command, Commands::Version) {
        println!("fnflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_tracing();

    // 環境変数の検証はリモート呼び出しより前に済ませる
    let mut settings = Settings::from_env()?;

    match cli.command {
        Commands::Setup { name, image, json } => {
            if let Some(name) = name {
                settings.run_name = name;
            }
            if let Some(image) = image {
                settings.image = Some(image);
            }
            let image = settings.require_image()?.to_string();

            let ctx = Context::connect(settings).await?;
            commands::setup::handle(&ctx, &image, json).await?;
        }
        Commands::Invoke { name, payload } => {
            if let Some(name) = name {
                settings.run_name = name;
            }
            if let Some(payload) = payload {
                settings.payload = payload;
            }

            let ctx = Context::connect(settings).await?;
            commands::invoke::handle(&ctx).await?;
        }
        Commands::Status { name, json } => {
            if let Some(name) = name {
                settings.run_name = name;
            }

            let ctx = Context::connect(settings).await?;
            commands::status::handle(&ctx, json).await?;
        }
        Commands::Teardown { name, yes, json } => {
            if let Some(name) = name {
                settings.run_name = name;
            }

            let ctx = Context::connect(settings).await?;
            if !yes && !json {
                println!(
                    "{}",
                    "注意: 最後の呼び出しから約30分経過するまで、関数基盤がサブネットを解放しないことがあります"
                        .yellow()
                );
            }
            commands::teardown::handle(&ctx, json).await?;
        }
        Commands::Version => {
            unreachable!("Version is handled before settings are loaded");
        }
    }

    Ok(())
}
