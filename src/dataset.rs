//! Dataset Module
//!
//! データセット一覧シートの読み取りと、データセットシートから
//! `DatasetDescriptor` を再構成する処理を提供するモジュール。
//!
//! データセットシートの先頭4行はメタデータ行（変数名・ラベル・型・長さ）で、
//! 5行目以降がデータ行です。空行もデータ行として保持されます。

use serde_json::{Map, Value};
use tracing::debug;

use crate::api::{DatasetDescriptor, VariableDescriptor, VariableType};
use crate::error::DatasetError;
use crate::formatter::CellFormatter;
use crate::types::{Sheet, SpreadsheetDocument};

/// データセット一覧シートの名前
pub(crate) const DIRECTORY_SHEET: &str = "Datasets";

/// データセット一覧シートのラベル列の見出し
pub(crate) const LABEL_COLUMN: &str = "Label";

/// データセットシートのメタデータ行数
pub(crate) const METADATA_ROWS: usize = 4;

const NAME_ROW: usize = 0;
const LABEL_ROW: usize = 1;
const TYPE_ROW: usize = 2;
const LENGTH_ROW: usize = 3;

/// データセット一覧シートの1エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectoryEntry {
    /// データセット識別子（シート名）
    pub identifier: String,
    /// 人間向けのラベル
    pub label: Option<String>,
}

/// データセット一覧シートを読み取る
///
/// 1行目は見出し行です。識別子は1列目、ラベルは見出しが `Label` の列から
/// 取得します。識別子が空の行は読み飛ばし、同じ識別子が複数回現れた場合は
/// 最初の位置を保ったまま最後のラベルを採用します。
///
/// # 発生し得るエラー
///
/// * `DatasetError::SheetNotFound` - `Datasets` シートが存在しない
/// * `DatasetError::MissingColumn` - 見出し行に `Label` 列が存在しない
pub(crate) fn read_directory(
    document: &SpreadsheetDocument,
) -> Result<Vec<DirectoryEntry>, DatasetError> {
    let sheet = document
        .sheet(DIRECTORY_SHEET)
        .ok_or_else(|| DatasetError::SheetNotFound {
            sheet: DIRECTORY_SHEET.to_string(),
        })?;
    let grid = &sheet.grid;

    let label_col = grid
        .row(0)
        .iter()
        .position(|cell| cell.to_text() == LABEL_COLUMN)
        .ok_or_else(|| DatasetError::MissingColumn {
            sheet: DIRECTORY_SHEET.to_string(),
            column: LABEL_COLUMN.to_string(),
        })?;

    let mut entries: Vec<DirectoryEntry> = Vec::new();
    for row in 1..grid.height() {
        let id_cell = grid.get(row, 0);
        if id_cell.is_blank() {
            continue;
        }

        let identifier = id_cell.to_text();
        let label_cell = grid.get(row, label_col);
        let label = (!label_cell.is_blank()).then(|| label_cell.to_text());

        match entries.iter_mut().find(|e| e.identifier == identifier) {
            Some(existing) => existing.label = label,
            None => entries.push(DirectoryEntry { identifier, label }),
        }
    }

    Ok(entries)
}

/// データセット識別子からドメインを導出する
///
/// 最初の `.` より前の部分を大文字にします。`.` がなければ識別子全体を使用します。
pub fn domain_of(identifier: &str) -> String {
    identifier
        .split_once('.')
        .map_or(identifier, |(prefix, _)| prefix)
        .to_uppercase()
}

/// データセットシートから `DatasetDescriptor` を構築する
///
/// # 発生し得るエラー
///
/// * `DatasetError::MissingMetadataRows` - シートの行数が4行未満
/// * `DatasetError::InvalidLength` - 長さ行の値を整数に変換できない
pub(crate) fn build_dataset(
    formatter: &CellFormatter,
    sheet: &Sheet,
    label: Option<String>,
) -> Result<DatasetDescriptor, DatasetError> {
    let grid = &sheet.grid;
    if grid.height() < METADATA_ROWS {
        return Err(DatasetError::MissingMetadataRows {
            sheet: sheet.name.clone(),
            found: grid.height(),
        });
    }

    let row_count = grid.height() - METADATA_ROWS;
    let mut variables = Vec::with_capacity(grid.width());
    let mut records = Map::new();

    for col in 0..grid.width() {
        let name = grid.get(NAME_ROW, col).to_text();
        let var_type = VariableType::from(grid.get(TYPE_ROW, col).to_text());
        let length = formatter.format_length(grid.get(LENGTH_ROW, col), &sheet.name, col)?;

        let cells = (METADATA_ROWS..grid.height()).map(|row| grid.get(row, col));
        let values = formatter.format_column(cells, &var_type, row_count);
        records.insert(name.clone(), Value::Array(values));

        variables.push(VariableDescriptor {
            name,
            label: grid.get(LABEL_ROW, col).to_text(),
            var_type,
            length,
        });
    }

    debug!(
        sheet = %sheet.name,
        variables = variables.len(),
        records = row_count,
        "dataset sheet converted"
    );

    Ok(DatasetDescriptor {
        filename: sheet.name.clone(),
        label,
        domain: domain_of(&sheet.name),
        variables,
        records,
    })
}
