//! Logging Module
//!
//! `tracing` と `tracing-subscriber` によるログ出力の初期化を行うモジュール。
//!
//! ログはすべて標準エラー出力に書き出されます。`RUST_LOG` 環境変数が
//! 設定されている場合は、そのフィルタが設定値より優先されます。
//!
//! # Log Levels
//!
//! - `error`: 変換に失敗したファイル
//! - `warn`: 出力の上書きなど、処理は続行できる問題
//! - `info`: JSONの保存、XMLのコピー、実行結果の集計
//! - `debug`: 読み飛ばした識別子やルール、データセットごとの詳細

use std::io;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// ログ出力の設定
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// このクレートのログレベル（他のクレートは `warn` 固定）
    pub level: Level,
    /// タイムスタンプを出力するか
    pub with_timestamps: bool,
    /// ターゲット（モジュールパス）を出力するか
    pub with_target: bool,
    /// ANSIカラーを使用するか
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_timestamps: false,
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// ログレベルを指定する
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// タイムスタンプの有無を指定する
    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.with_timestamps = enable;
        self
    }

    /// ANSIカラーの有無を指定する
    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// グローバルなサブスクライバーを初期化し、標準エラー出力に書き出す
///
/// # 発生し得るエラー
///
/// * サブスクライバーが既に設定されている場合
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    init_logging_with_writer(config, io::stderr)
}

/// 任意の出力先でログ出力を初期化する
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W) -> io::Result<()>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(config.level);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target);

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.with_timestamps {
        registry.with(layer).try_init()
    } else {
        registry.with(layer.without_time()).try_init()
    };

    result.map_err(io::Error::other)
}

/// `RUST_LOG` が未設定の場合に、指定レベルから `EnvFilter` を構築する
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // 他のクレートは warn のみ
        EnvFilter::new(format!(
            "warn,xlsxdataset={level}",
            level = level.as_str().to_lowercase()
        ))
    })
}
