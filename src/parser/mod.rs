//! Parser Module
//!
//! calamineを使用したExcelファイル（XLSX / XLS）解析の実装。
//! ワークブック全体を `SpreadsheetDocument` として読み込みます。

mod workbook;

pub(crate) use workbook::WorkbookParser;
