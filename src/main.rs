use clap::Parser;
use contact_extract::{app, cli, client, config, error, export, poller, render, search};
use app::App;
use cli::{Cli, Commands, DisplayArgs};
use client::HttpJobApi;
use config::Config;
use contact_extract_common::{normalize, Phase, ViewState};
use error::{ContactExtractError, Result};
use poller::JobClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    config.apply_overrides(cli.base_url.clone(), None);

    match cli.command {
        Commands::Run { display, max_polls } => {
            println!("📇 contact-extract - 連絡先抽出\n");

            let mut app = build_app(&config, &display, max_polls)?;
            println!("[1/2] ジョブを投入中...");
            app.submit_and_poll().await;

            let state = app.into_state();
            if let Some(job) = &state.job {
                println!("✔ ジョブID: {}\n", job.id);
            }
            println!("[2/2] 結果");
            finish(state, &display)?;
        }

        Commands::Submit => {
            config.client.validate()?;
            let api = HttpJobApi::new(&config)?;
            let client = JobClient::new(api, config.client.clone());
            let job_id = client.submit().await?;
            println!("{}", job_id);
        }

        Commands::Poll { job_id, display, max_polls } => {
            println!("📇 contact-extract - ポーリング\n");

            let mut app = build_app(&config, &display, max_polls)?;
            println!("ジョブ {} の結果を待機中...", job_id);
            app.poll_existing(&job_id).await;

            finish(app.into_state(), &display)?;
        }

        Commands::Show { input, search, no_dedup } => {
            if !input.exists() {
                return Err(ContactExtractError::FileNotFound(input.display().to_string()));
            }
            let content = std::fs::read_to_string(&input)?;
            let value: serde_json::Value = serde_json::from_str(&content)?;

            let mut client_config = config.client.clone();
            if no_dedup {
                client_config.dedup_by_email = false;
            }
            let result = normalize(value, client_config.dedup_policy())?;

            let state = ViewState::with_result(result).set_search_term(search);
            print!("{}", render::render_state(&state));
        }

        Commands::Config { set_base_url, set_resource_id, show } => {
            // 環境変数の上書きを保存しないようファイルだけを読む
            let mut config = Config::load_file()?;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if let Some(id) = set_resource_id {
                config.set_resource_id(id)?;
                println!("✔ リソースIDを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ベースURL: {}", config.client.base_url);
                println!("  リソースID: {}", config.client.resource_id);
                println!("  ポーリング間隔: {}ms", config.client.poll_interval_ms);
                println!(
                    "  ポーリング上限: {}",
                    config.client.max_polls.map(|n| n.to_string()).unwrap_or_else(|| "なし".into())
                );
                println!("  email重複除去: {}", if config.client.dedup_by_email { "有効" } else { "無効" });
                println!("  タイムアウト: {}秒", config.request_timeout_secs);
                println!("  設定ファイル: {}", Config::config_path()?.display());
                for (name, value) in Config::active_env_overrides() {
                    println!("  実行時は環境変数 {} で上書き: {}", name, value);
                }
            }
        }
    }

    Ok(())
}

/// RUST_LOG があればそれを使い、無ければ --verbose で debug
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("contact_extract={0},contact_extract_common={0}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_app(config: &Config, display: &DisplayArgs, max_polls: Option<u32>) -> Result<App<HttpJobApi>> {
    let mut client_config = config.client.clone();
    if display.no_dedup {
        client_config.dedup_by_email = false;
    }
    if max_polls.is_some() {
        client_config.max_polls = max_polls;
    }
    client_config.validate()?;

    let api = HttpJobApi::new(config)?;
    let client = JobClient::new(api, client_config);

    // Ctrl-C でポーリングを止める
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    Ok(App::new(client, cancel).with_spinner())
}

/// 表示・対話検索・書き出し
fn finish(state: ViewState, display: &DisplayArgs) -> Result<()> {
    let state = state.set_search_term(display.search.clone());
    print!("{}", render::render_state(&state));

    if state.phase == Phase::Idle {
        println!("中断しました");
        return Ok(());
    }

    let state = if display.interactive {
        search::run_interactive_search(state)?
    } else {
        state
    };

    if let Some(output) = &display.output {
        if state.result.is_some() {
            let path = export::export_state(&state, display.format, output)?;
            println!("✔ {}出力: {}", display.format, path.display());
        }
    }

    // エラーは表示済みなので終了コードだけ返す
    if state.error.is_some() {
        std::process::exit(1);
    }

    println!("\n✅ 完了");
    Ok(())
}
