//! Types Module
//!
//! スプレッドシート文書を表す共通データ型を定義するモジュール。
//! パーサーが生成し、変換処理が消費する中間表現です。

use chrono::NaiveDateTime;
use serde_json::Value;

/// 範囲外のセル参照に返す空セル
static EMPTY_CELL: CellValue = CellValue::Empty;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// 日付時刻（Excelのシリアル値から復元したもの）
    DateTime(NaiveDateTime),

    /// エラー値（例: #N/A）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が欠損（空）とみなされるかを判定
    ///
    /// 空セルに加えて、空文字列とエラー値も欠損として扱います。
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty | CellValue::Error(_) => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 値のテキスト表現を取得
    ///
    /// 整数値の数値は小数点なしで出力します（例: `34.0` → `"34"`）。
    /// 論理値は `True` / `False`、日付時刻は `YYYY-MM-DD HH:MM:SS` 形式です。
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Number(n) => match integral_value(*n) {
                Some(i) => i.to_string(),
                None => n.to_string(),
            },
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }

    /// 元の値をそのままJSON値に変換
    ///
    /// 整数値の数値はJSON整数、それ以外の有限な数値はJSON浮動小数点数、
    /// 非有限値と欠損値は `null` になります。
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Number(n) => match integral_value(*n) {
                Some(i) => Value::from(i),
                None => serde_json::Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            },
            CellValue::String(s) => Value::String(s.clone()),
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::DateTime(_) => Value::String(self.to_text()),
            CellValue::Error(_) | CellValue::Empty => Value::Null,
        }
    }
}

/// `i64`で正確に表現できる整数値であれば、その値を返す
fn integral_value(n: f64) -> Option<i64> {
    // 2^63はi64::MAXを超えるため、半開区間で判定する
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if n.is_finite() && n.fract() == 0.0 && (-LIMIT..LIMIT).contains(&n) {
        Some(n as i64)
    } else {
        None
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// シートの2次元セルグリッド
///
/// 座標は (0, 0) を起点とする絶対座標です。すべての行は同じ幅に揃えられ、
/// 値のないセルは `CellValue::Empty` で埋められます。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetGrid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl SheetGrid {
    /// 行のリストからグリッドを生成（最も長い行の幅に揃える）
    pub fn from_rows(mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self { rows, width }
    }

    /// 行数
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// 列数
    pub fn width(&self) -> usize {
        self.width
    }

    /// 指定座標のセルを取得（範囲外は空セル）
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// 指定行のセルを取得（範囲外は空スライス）
    pub fn row(&self, row: usize) -> &[CellValue] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// 名前付きシート
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub grid: SheetGrid,
}

/// シートの順序付きコレクションとしてのスプレッドシート文書
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpreadsheetDocument {
    sheets: Vec<Sheet>,
}

impl SpreadsheetDocument {
    /// 空の文書を生成
    pub fn new() -> Self {
        Self::default()
    }

    /// シートを末尾に追加
    pub fn push_sheet(&mut self, name: impl Into<String>, grid: SheetGrid) {
        self.sheets.push(Sheet {
            name: name.into(),
            grid,
        });
    }

    /// シートを追加した文書を返す（ビルダー形式）
    pub fn with_sheet(mut self, name: impl Into<String>, grid: SheetGrid) -> Self {
        self.push_sheet(name, grid);
        self
    }

    /// 名前でシートを検索
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// すべてのシート名（文書内の順序）
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }
}
