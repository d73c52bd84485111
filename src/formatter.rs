//! Formatter Module
//!
//! セル値を変数型に応じてJSON値へ変換する処理を提供するモジュール。
//! 列単位の変換とパディング、長さ行の整数化を担当します。

use serde_json::Value;

use crate::api::VariableType;
use crate::error::DatasetError;
use crate::types::CellValue;

/// セルフォーマッター
///
/// 変数型ごとのセル値変換のファサードとして機能します。
#[derive(Debug, Default)]
pub(crate) struct CellFormatter {
    /// 数値フォーマッター
    number_formatter: NumberFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new() -> Self {
        Self {
            number_formatter: NumberFormatter,
        }
    }

    /// 1つのセル値をフォーマット
    ///
    /// # 戻り値
    ///
    /// * `Some(Value)` - 出力する値
    /// * `None` - 値を出力しない場合（`Char` / `Num` 以外の型で、空でないセル）
    pub fn format_value(&self, cell: &CellValue, var_type: &VariableType) -> Option<Value> {
        if cell.is_blank() {
            return Some(var_type.blank_value());
        }

        match var_type {
            VariableType::Char => Some(Value::String(cell.to_text())),
            VariableType::Num => Some(self.number_formatter.format(cell)),
            VariableType::Other(_) => None,
        }
    }

    /// 1列分のセル値をフォーマットし、`row_count` 件にパディングする
    ///
    /// 出力しない値があった場合でも、戻り値の長さは常に `row_count` です。
    pub fn format_column<'a, I>(
        &self,
        cells: I,
        var_type: &VariableType,
        row_count: usize,
    ) -> Vec<Value>
    where
        I: IntoIterator<Item = &'a CellValue>,
    {
        let mut values: Vec<Value> = cells
            .into_iter()
            .filter_map(|cell| self.format_value(cell, var_type))
            .collect();

        values.resize(row_count, var_type.blank_value());
        values
    }

    /// 長さ行のセルを整数に変換
    ///
    /// 空セルは0、数値は0方向に切り捨て、文字列は数値として解析します。
    /// 負の値もそのまま出力します。
    ///
    /// # 発生し得るエラー
    ///
    /// * `DatasetError::InvalidLength` - 数値として解析できない値
    pub fn format_length(
        &self,
        cell: &CellValue,
        sheet: &str,
        column: usize,
    ) -> Result<i64, DatasetError> {
        let invalid = || DatasetError::InvalidLength {
            sheet: sheet.to_string(),
            column,
            value: cell.to_text(),
        };

        let number = match cell {
            _ if cell.is_blank() => return Ok(0),
            CellValue::Number(n) => *n,
            CellValue::Bool(b) => f64::from(u8::from(*b)),
            CellValue::String(s) => s.trim().parse::<f64>().map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };

        if !number.is_finite() {
            return Err(invalid());
        }

        Ok(number.trunc() as i64)
    }
}

/// 数値型列のフォーマッター
///
/// テキスト表現が10進数字のみで構成される場合に限り整数へ変換し、
/// それ以外は元の値をそのまま出力します。小数や桁区切りを含む文字列は
/// 数値として解析しません。
#[derive(Debug, Default)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    pub fn format(&self, cell: &CellValue) -> Value {
        let text = cell.to_text();
        if is_decimal_digits(&text) {
            // u64に収まらない桁数の場合は元の値のまま
            if let Ok(n) = text.parse::<u64>() {
                return Value::from(n);
            }
        }
        cell.to_json()
    }
}

fn is_decimal_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
