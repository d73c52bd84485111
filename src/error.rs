//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// xlsxdatasetクレート全体で使用するエラー型
///
/// Excelファイルの読み込み、データセットシートの解析、JSONの書き出し中に
/// 発生するすべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み・書き込み失敗など）
/// - `Parse`: Excelファイルの解析中に発生したエラー（calamine由来）
/// - `Json`: JSONシリアライズ中に発生したエラー
/// - `SheetNotFound` / `MissingColumn` / `MissingMetadataRows` / `InvalidLength`:
///   シートのレイアウトが規約に従っていない場合のエラー
/// - `RulesDirectory`: ルールディレクトリを読み込めない場合のエラー（起動時エラー）
/// - `Config`: 設定の検証に失敗したエラー
/// - `SecurityViolation`: 入力ファイルサイズ制限などに違反したエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxdataset::DatasetError;
/// use std::fs::File;
///
/// fn open_spreadsheet(path: &str) -> Result<(), DatasetError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイル、サポートされていない形式などが
    /// 原因となります。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// JSONへのシリアライズ中に発生したエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 必須シートがワークブックに存在しない
    ///
    /// データセット一覧シート（`Datasets`）が見つからない場合に発生します。
    #[error("Sheet '{sheet}' not found")]
    SheetNotFound {
        /// 見つからなかったシート名
        sheet: String,
    },

    /// 必須列がシートのヘッダー行に存在しない
    #[error("Column '{column}' not found in sheet '{sheet}'")]
    MissingColumn {
        /// シート名
        sheet: String,
        /// 見つからなかった列名
        column: String,
    },

    /// データセットシートにメタデータ行（名前・ラベル・型・長さ）が揃っていない
    #[error("Sheet '{sheet}' has {found} rows, but 4 metadata rows are required")]
    MissingMetadataRows {
        /// シート名
        sheet: String,
        /// 実際の行数
        found: usize,
    },

    /// 長さ行の値を整数に変換できない
    #[error("Invalid length '{value}' for column {column} in sheet '{sheet}'")]
    InvalidLength {
        /// シート名
        sheet: String,
        /// 列インデックス（0始まり）
        column: usize,
        /// 変換できなかったセルのテキスト
        value: String,
    },

    /// ルールディレクトリを読み込めない
    #[error("Cannot read rules directory {}: {source}", path.display())]
    RulesDirectory {
        /// ルールディレクトリのパス
        path: PathBuf,
        /// 元のI/Oエラー
        source: std::io::Error,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use xlsxdataset::{ConverterBuilder, DatasetError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_output_root("")
    ///     .build();
    ///
    /// match result {
    ///     Err(DatasetError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルサイズの上限を超えた場合などに発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
