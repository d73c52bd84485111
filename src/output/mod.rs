//! Output Module
//!
//! 変換結果の書き出しと、付随するXMLファイルのコピーを担当するモジュール。

mod json;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::api::ConversionResult;
use crate::error::DatasetError;

pub(crate) use json::to_pretty_json;

/// 出力JSONファイルの名前
pub const OUTPUT_FILE_NAME: &str = "converted_dataset.json";

/// 付随メタデータファイルの拡張子
pub const SIBLING_EXTENSION: &str = "xml";

/// 出力ライター
///
/// 出力ルートは設定値として注入されます。ルールIDごとに
/// `<output_root>/<rule_id>/` へ書き出します。
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_root: PathBuf,
}

impl OutputWriter {
    /// 出力ルートを指定してライターを生成
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// 出力ルート
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// ルールIDに対応する出力先ディレクトリ
    pub fn destination_for(&self, rule_id: &str) -> PathBuf {
        self.output_root.join(rule_id)
    }

    /// 変換結果を `<dest>/converted_dataset.json` に書き出す
    ///
    /// 出力先ディレクトリは親ディレクトリも含めて作成されます。
    /// JSONはメモリ上で完成させてから1回の書き込みで保存するため、
    /// シリアライズに失敗した場合にファイルは作成されません。
    ///
    /// # 戻り値
    ///
    /// * `Ok(PathBuf)` - 書き出したJSONファイルのパス
    pub fn write_result(
        &self,
        dest: &Path,
        result: &ConversionResult,
    ) -> Result<PathBuf, DatasetError> {
        fs::create_dir_all(dest)?;
        let bytes = to_pretty_json(result)?;
        let json_path = dest.join(OUTPUT_FILE_NAME);
        fs::write(&json_path, bytes)?;

        info!(path = %json_path.display(), "JSON saved");
        Ok(json_path)
    }

    /// 元ファイルと同じベース名の `.xml` ファイルが隣にあれば、出力先にコピーする
    ///
    /// 同名のファイルが既に存在する場合は上書きします。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Some(PathBuf))` - コピー先のパス
    /// * `Ok(None)` - XMLファイルが存在しない場合
    pub fn copy_sibling_xml(
        &self,
        source: &Path,
        dest: &Path,
    ) -> Result<Option<PathBuf>, DatasetError> {
        let xml_path = source.with_extension(SIBLING_EXTENSION);
        if !xml_path.is_file() {
            return Ok(None);
        }
        let Some(file_name) = xml_path.file_name() else {
            return Ok(None);
        };

        fs::create_dir_all(dest)?;
        let target = dest.join(file_name);
        fs::copy(&xml_path, &target)?;

        info!(path = %xml_path.display(), "XML copied");
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_destination_for() {
        let writer = OutputWriter::new("json_datasets");
        assert_eq!(
            writer.destination_for("CG0001"),
            PathBuf::from("json_datasets/CG0001")
        );
        assert_eq!(writer.output_root(), Path::new("json_datasets"));
    }

    #[test]
    fn test_write_result_creates_directories() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path().join("out"));
        let dest = writer.destination_for("CG0001");

        let path = writer
            .write_result(&dest, &ConversionResult::default())
            .unwrap();

        assert_eq!(path, dest.join(OUTPUT_FILE_NAME));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n    \"datasets\": []"));
    }

    #[test]
    fn test_copy_sibling_xml() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("case.xlsx");
        fs::write(&source, b"xlsx").unwrap();
        fs::write(dir.path().join("case.xml"), b"<define/>").unwrap();

        let dest = dir.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("case.xml"), b"stale").unwrap();

        let writer = OutputWriter::new(dir.path());
        let copied = writer.copy_sibling_xml(&source, &dest).unwrap();

        assert_eq!(copied, Some(dest.join("case.xml")));
        assert_eq!(fs::read(dest.join("case.xml")).unwrap(), b"<define/>");
    }

    #[test]
    fn test_copy_sibling_xml_absent() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("case.xlsx");
        fs::write(&source, b"xlsx").unwrap();

        let dest = dir.path().join("out");
        let writer = OutputWriter::new(dir.path());

        assert_eq!(writer.copy_sibling_xml(&source, &dest).unwrap(), None);
        assert!(!dest.exists());
    }
}
