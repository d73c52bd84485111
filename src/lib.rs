//! xlsxdataset - Excel test datasets to dataset JSON converter
//!
//! ルールIDごとに配置されたExcelファイル（XLSX / XLS）を探し、データセット・変数・
//! レコードを記述するJSON文書に変換するクレートです。
//!
//! 各スプレッドシートは `Datasets` シートでデータセットシートを列挙します。
//! データセットシートの先頭4行は変数名・ラベル・型・長さで、5行目以降がレコードです。
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xlsxdataset::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // 1ファイルを変換して出力先ディレクトリに書き出す
//!     let output = converter.convert_to_dir(
//!         Path::new("datasets/CG0001/negative/data.xlsx"),
//!         Path::new("json_datasets/CG0001"),
//!     )?;
//!     println!("{}", output.json_path.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Processing a Rules Directory
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xlsxdataset::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_output_root("json_datasets")
//!         .build()?;
//!
//!     let summary = converter.process_rules(Path::new("rules"), Path::new("datasets"))?;
//!     println!("{} converted, {} failed", summary.converted.len(), summary.failed.len());
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod dataset;
mod error;
mod formatter;
pub mod locator;
pub mod logging;
mod output;
mod parser;
mod security;
mod summary;
mod types;

// 公開API
pub use api::{
    ConversionResult, DatasetDescriptor, Standard, VariableDescriptor, VariableType,
    STANDARD_PRODUCT, STANDARD_VERSION,
};
pub use builder::{Converter, ConverterBuilder, DEFAULT_OUTPUT_ROOT};
pub use dataset::domain_of;
pub use error::DatasetError;
pub use output::{OutputWriter, OUTPUT_FILE_NAME};
pub use summary::{ConvertedFile, FailedFile, RunSummary, WrittenOutput};
pub use types::{CellValue, Sheet, SheetGrid, SpreadsheetDocument};
