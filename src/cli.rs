use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "contact-extract")]
#[command(about = "GreenCloud 連絡先抽出クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// APIのベースURL（この実行だけ上書き）
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ジョブを投入し、完了までポーリングして結果を表示
    Run {
        #[command(flatten)]
        display: DisplayArgs,

        /// ポーリング回数の上限
        #[arg(long)]
        max_polls: Option<u32>,
    },

    /// ジョブを投入してIDだけ表示
    Submit,

    /// 既存ジョブをポーリングして結果を表示
    Poll {
        /// ジョブID
        #[arg(required = true)]
        job_id: String,

        #[command(flatten)]
        display: DisplayArgs,

        /// ポーリング回数の上限
        #[arg(long)]
        max_polls: Option<u32>,
    },

    /// 保存済みの結果JSONを正規化して表示
    Show {
        /// 結果JSONファイル（フラット配列またはResultBundle）
        #[arg(required = true)]
        input: PathBuf,

        /// 検索語
        #[arg(short, long, default_value = "")]
        search: String,

        /// email重複除去をしない
        #[arg(long)]
        no_dedup: bool,
    },

    /// 設定
    Config {
        /// ベースURLを保存
        #[arg(long)]
        set_base_url: Option<String>,

        /// リソースIDを保存
        #[arg(long)]
        set_resource_id: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 結果表示・出力のオプション
#[derive(Args, Clone, Debug)]
pub struct DisplayArgs {
    /// 検索語（大文字小文字を無視して全列を部分一致）
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// email重複除去をしない
    #[arg(long)]
    pub no_dedup: bool,

    /// 表示後に対話検索を行う
    #[arg(short, long)]
    pub interactive: bool,

    /// 出力ファイル
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 出力形式 (json/excel)
    #[arg(short, long, default_value = "json")]
    pub format: ExportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Excel => write!(f, "excel"),
        }
    }
}
