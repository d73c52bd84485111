//! JSON Serialization
//!
//! 変換結果を4スペースインデントのJSONテキストにシリアライズします。

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;

use crate::error::DatasetError;

const INDENT: &[u8] = b"    ";

/// 値を4スペースインデントのJSON（UTF-8）にシリアライズ
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, DatasetError> {
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(buffer)
}
