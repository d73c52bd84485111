//! Run Summary
//!
//! ルールディレクトリ全体を処理した結果の集計。

use std::path::PathBuf;

/// 1つのスプレッドシートについて書き出したファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutput {
    pub json_path: PathBuf,
    /// コピーしたXMLファイル（存在した場合）
    pub xml_path: Option<PathBuf>,
}

/// 変換に成功したファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    pub rule_id: String,
    pub source: PathBuf,
    pub output: WrittenOutput,
}

/// 変換に失敗したファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub rule_id: String,
    pub source: PathBuf,
    pub message: String,
}

/// 1回の実行結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub converted: Vec<ConvertedFile>,
    pub failed: Vec<FailedFile>,
    /// スプレッドシートが見つからなかったルールID
    pub skipped_rules: Vec<String>,
}

impl RunSummary {
    /// 失敗したファイルがあるか
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}
