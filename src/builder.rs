//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::path::{Path, PathBuf};

use tracing::{debug, error, info_span, warn};

use crate::api::ConversionResult;
use crate::dataset::{build_dataset, read_directory};
use crate::error::DatasetError;
use crate::formatter::CellFormatter;
use crate::locator::{find_spreadsheets_for_rule, list_rule_ids, TreeListing};
use crate::output::OutputWriter;
use crate::parser::WorkbookParser;
use crate::security::SecurityConfig;
use crate::summary::{ConvertedFile, FailedFile, RunSummary, WrittenOutput};
use crate::types::SpreadsheetDocument;

/// 出力ルートのデフォルト値
pub const DEFAULT_OUTPUT_ROOT: &str = "json_datasets";

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// 出力ルート（`<output_root>/<rule_id>/` に書き出す）
    pub output_root: PathBuf,

    /// セキュリティ設定
    pub security: SecurityConfig,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            security: SecurityConfig::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxdataset::ConverterBuilder;
///
/// # fn main() -> Result<(), xlsxdataset::DatasetError> {
/// let converter = ConverterBuilder::new()
///     .with_output_root("build/json_datasets")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 出力ルート: `json_datasets`
    /// - 入力ファイルの最大サイズ: 2GB
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 出力ルートを指定する
    ///
    /// ルールごとの出力は `<output_root>/<rule_id>/` に書き出されます。
    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.config.output_root = output_root.into();
        self
    }

    /// 入力ファイルの最大サイズ（バイト）を指定する
    pub fn with_max_input_file_size(mut self, bytes: u64) -> Self {
        self.config.security.max_input_file_size = bytes;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `DatasetError::Config(String)`: 設定の検証に失敗した場合
    ///   * 出力ルートが空
    ///   * 入力ファイルの最大サイズが0
    pub fn build(self) -> Result<Converter, DatasetError> {
        if self.config.output_root.as_os_str().is_empty() {
            return Err(DatasetError::Config(
                "Output root must not be empty".to_string(),
            ));
        }

        if self.config.security.max_input_file_size == 0 {
            return Err(DatasetError::Config(
                "Maximum input file size must be greater than 0".to_string(),
            ));
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// スプレッドシートをデータセットJSON文書に変換するためのメインエントリーポイントです。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsxdataset::ConverterBuilder;
/// use std::path::Path;
///
/// # fn main() -> Result<(), xlsxdataset::DatasetError> {
/// let converter = ConverterBuilder::new().build()?;
/// let result = converter.convert_file(Path::new("CG0001/negative/data.xlsx"))?;
/// println!("{} datasets", result.datasets.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,

    /// 出力ライター
    writer: OutputWriter,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            formatter: CellFormatter::new(),
            writer: OutputWriter::new(config.output_root.clone()),
            config,
        }
    }

    /// 出力ライターを取得
    pub fn output_writer(&self) -> &OutputWriter {
        &self.writer
    }

    /// スプレッドシート文書を変換する
    ///
    /// `Datasets` シートに列挙され、かつ同名のシートが存在するデータセットだけを
    /// 一覧の順に変換します。対応するシートのない識別子はエラーにせず読み飛ばします。
    ///
    /// # 発生し得るエラー
    ///
    /// * `DatasetError::SheetNotFound` / `DatasetError::MissingColumn` - 一覧シートが不正
    /// * `DatasetError::MissingMetadataRows` / `DatasetError::InvalidLength` - データセットシートが不正
    pub fn convert_document(
        &self,
        document: &SpreadsheetDocument,
    ) -> Result<ConversionResult, DatasetError> {
        let mut result = ConversionResult::default();

        for entry in read_directory(document)? {
            match document.sheet(&entry.identifier) {
                Some(sheet) => {
                    let dataset = build_dataset(&self.formatter, sheet, entry.label)?;
                    result.datasets.push(dataset);
                }
                None => {
                    debug!(identifier = %entry.identifier, "no sheet matches dataset identifier");
                }
            }
        }

        Ok(result)
    }

    /// スプレッドシートファイルを読み込んで変換する
    pub fn convert_file(&self, path: &Path) -> Result<ConversionResult, DatasetError> {
        let mut parser = WorkbookParser::open(path, &self.config.security)?;
        let document = parser.read_document()?;
        self.convert_document(&document)
    }

    /// スプレッドシートファイルを変換し、出力先ディレクトリに書き出す
    ///
    /// `converted_dataset.json` を書き出した後、元ファイルと同じベース名の
    /// `.xml` ファイルが隣にあれば出力先にコピーします。
    pub fn convert_to_dir(&self, path: &Path, dest: &Path) -> Result<WrittenOutput, DatasetError> {
        let result = self.convert_file(path)?;
        let json_path = self.writer.write_result(dest, &result)?;
        let xml_path = self.writer.copy_sibling_xml(path, dest)?;
        Ok(WrittenOutput {
            json_path,
            xml_path,
        })
    }

    /// ルールディレクトリ内のすべてのルールについて変換を実行する
    ///
    /// ルールごとにデータセットツリーから対応するスプレッドシートを探し、
    /// `<output_root>/<rule_id>/` に書き出します。1ファイルの失敗はログに記録して
    /// 集計に加え、残りのファイルの処理を続けます。
    ///
    /// # 発生し得るエラー
    ///
    /// * `DatasetError::RulesDirectory` - ルールディレクトリを読み込めない場合
    pub fn process_rules(
        &self,
        rules_dir: &Path,
        datasets_dir: &Path,
    ) -> Result<RunSummary, DatasetError> {
        let rule_ids = list_rule_ids(rules_dir)?;
        let listing = TreeListing::scan(datasets_dir);
        let mut summary = RunSummary::default();

        for rule_id in rule_ids {
            let span = info_span!("rule", rule_id = %rule_id);
            let _guard = span.enter();

            let spreadsheets = find_spreadsheets_for_rule(&listing, &rule_id);
            if spreadsheets.is_empty() {
                debug!("no spreadsheet found for rule");
                summary.skipped_rules.push(rule_id);
                continue;
            }
            if spreadsheets.len() > 1 {
                warn!(
                    count = spreadsheets.len(),
                    "several spreadsheets write to the same output directory; the last one wins"
                );
            }

            let dest = self.writer.destination_for(&rule_id);
            for (subfolder, source) in spreadsheets {
                debug!(subfolder = %subfolder, path = %source.display(), "converting spreadsheet");
                match self.convert_to_dir(&source, &dest) {
                    Ok(output) => summary.converted.push(ConvertedFile {
                        rule_id: rule_id.clone(),
                        source,
                        output,
                    }),
                    Err(err) => {
                        error!(path = %source.display(), error = %err, "Error processing spreadsheet");
                        summary.failed.push(FailedFile {
                            rule_id: rule_id.clone(),
                            source,
                            message: err.to_string(),
                        });
                    }
                }
            }
        }

        Ok(summary)
    }
}
