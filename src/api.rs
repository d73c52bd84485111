//! Public API Types
//!
//! 変換結果（データセットJSON文書）を表す公開型を定義するモジュール。
//! フィールド名と入れ子構造は出力JSONのスキーマそのものです。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 出力文書が準拠する標準の製品名
pub const STANDARD_PRODUCT: &str = "sdtmig";

/// 出力文書が準拠する標準のバージョン
pub const STANDARD_VERSION: &str = "3-3";

/// 変数（列）の型
///
/// 型行に書かれた文字列をそのまま保持します。`Char` と `Num` 以外の値も
/// 受け入れ、`Other` として記録します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VariableType {
    /// 文字型（`Char`）
    Char,

    /// 数値型（`Num`）
    Num,

    /// 上記以外の型文字列
    ///
    /// この型の列では空でないセルの値は出力されず、パディングによって
    /// すべて `null` になります。
    Other(String),
}

impl VariableType {
    /// 型行に書かれる文字列表現
    pub fn as_str(&self) -> &str {
        match self {
            VariableType::Char => "Char",
            VariableType::Num => "Num",
            VariableType::Other(s) => s,
        }
    }

    /// 欠損セルおよびパディングに使用する値
    ///
    /// `Char` は空文字列、それ以外は `null` です。
    pub fn blank_value(&self) -> Value {
        match self {
            VariableType::Char => Value::String(String::new()),
            _ => Value::Null,
        }
    }
}

impl From<String> for VariableType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Char" => VariableType::Char,
            "Num" => VariableType::Num,
            _ => VariableType::Other(value),
        }
    }
}

impl From<&str> for VariableType {
    fn from(value: &str) -> Self {
        VariableType::from(value.to_string())
    }
}

impl From<VariableType> for String {
    fn from(value: VariableType) -> Self {
        match value {
            VariableType::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// 変数（列）の定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    /// 変数名（メタデータ1行目）
    pub name: String,

    /// 変数ラベル（メタデータ2行目）
    pub label: String,

    /// 変数型（メタデータ3行目）
    #[serde(rename = "type")]
    pub var_type: VariableType,

    /// 変数長（メタデータ4行目、空の場合は0）
    pub length: i64,
}

/// 1つのデータセット（データセットシート1枚分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// 元のシート名（データセット識別子）
    pub filename: String,

    /// データセット一覧シートのラベル（空の場合は `null`）
    pub label: Option<String>,

    /// 識別子の最初の `.` より前の部分を大文字にしたもの
    pub domain: String,

    /// 列の定義（シート上の列順）
    pub variables: Vec<VariableDescriptor>,

    /// 列名から値の列へのマップ
    ///
    /// すべての列がデータ行数と同じ長さを持ちます。キーは列順を保持します。
    pub records: Map<String, Value>,
}

/// 出力文書が準拠する標準
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    pub product: String,
    pub version: String,
}

impl Default for Standard {
    fn default() -> Self {
        Self {
            product: STANDARD_PRODUCT.to_string(),
            version: STANDARD_VERSION.to_string(),
        }
    }
}

/// 1つのスプレッドシートの変換結果
///
/// # 出力例
///
/// ```json
/// {
///     "datasets": [
///         {
///             "filename": "DM",
///             "label": "Demographics",
///             "domain": "DM",
///             "variables": [
///                 {"name": "SUBJID", "label": "Subject", "type": "Char", "length": 8}
///             ],
///             "records": {"SUBJID": ["S1", ""]}
///         }
///     ],
///     "standard": {"product": "sdtmig", "version": "3-3"},
///     "codelists": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub datasets: Vec<DatasetDescriptor>,
    pub standard: Standard,
    /// 現行バージョンでは常に空
    pub codelists: Vec<Value>,
}

impl Default for ConversionResult {
    fn default() -> Self {
        Self {
            datasets: Vec::new(),
            standard: Standard::default(),
            codelists: Vec::new(),
        }
    }
}
