//! Workbook Parser
//!
//! calamineのラッパーとして、ワークブックを `SpreadsheetDocument` に変換します。

use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Range, Reader, Sheets};

use crate::error::DatasetError;
use crate::security::SecurityConfig;
use crate::types::{CellValue, SheetGrid, SpreadsheetDocument};

/// ワークブックパーサー
///
/// ファイル全体をメモリに読み込み、calamineで開きます。
/// 形式（XLSX / XLS / XLSB / ODS）は内容から自動判定されます。
pub(crate) struct WorkbookParser {
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// ファイルパスからワークブックを開く
    ///
    /// 読み込み前にファイルサイズを検証します。
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(DatasetError::SecurityViolation)` - ファイルサイズが上限を超えた場合
    /// * `Err(DatasetError::Io)` / `Err(DatasetError::Parse)` - 読み込みまたは解析に失敗した場合
    pub fn open(path: &Path, security: &SecurityConfig) -> Result<Self, DatasetError> {
        security.check_input_size(fs::metadata(path)?.len())?;
        let buffer = fs::read(path)?;
        Self::from_bytes(buffer, security)
    }

    /// メモリ上のバイト列からワークブックを開く
    pub fn from_bytes(buffer: Vec<u8>, security: &SecurityConfig) -> Result<Self, DatasetError> {
        security.check_input_size(buffer.len() as u64)?;
        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        Ok(Self { workbook })
    }

    /// すべてのシート名を取得（ワークブック内の順序）
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// すべてのシートを読み込み、`SpreadsheetDocument` を生成
    pub fn read_document(&mut self) -> Result<SpreadsheetDocument, DatasetError> {
        let mut document = SpreadsheetDocument::new();
        for sheet_name in self.sheet_names() {
            let range = self.workbook.worksheet_range(&sheet_name)?;
            document.push_sheet(sheet_name, build_grid(&range));
        }
        Ok(document)
    }
}

/// calamineのセル範囲を絶対座標のグリッドに展開
///
/// calamineの範囲は最初の使用セルから始まるため、(0, 0) からの位置に置き直します。
fn build_grid(range: &Range<Data>) -> SheetGrid {
    let Some((start_row, start_col)) = range.start() else {
        return SheetGrid::default();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);
    let (height, width) = range.get_size();

    let mut rows = vec![vec![CellValue::Empty; start_col + width]; start_row + height];
    for (row, col, cell) in range.cells() {
        rows[start_row + row][start_col + col] = convert_cell(cell);
    }

    SheetGrid::from_rows(rows)
}

/// calamineのセル値を `CellValue` に変換
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::String(cell.to_string())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}
