//! File Locator Module
//!
//! ルールIDで索引付けされたディレクトリツリーからスプレッドシートを探すモジュール。
//!
//! ファイルシステムの走査（`TreeListing::scan`）と、走査結果から対象ファイルを
//! 選ぶ規則（`first_spreadsheet_per_subfolder` / `locate_rule_folder`）を分離しています。
//! 選択規則は一覧を受け取る純粋関数なので、実ファイルなしでテストできます。

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::DatasetError;

/// スプレッドシートとして扱う拡張子（大文字小文字は区別しない）
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls"];

/// パスの拡張子がスプレッドシートのものかを判定
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// ディレクトリツリーの走査結果
///
/// `dirs` と `files` は深さ優先の前順序で並びます。同じディレクトリ内では
/// ファイルがサブディレクトリより先に、それぞれ名前順に現れます。
/// `dirs` にはルート自身も含まれます。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeListing {
    pub root: PathBuf,
    pub dirs: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl TreeListing {
    /// ディレクトリツリーを走査して一覧を作成
    ///
    /// 読み込めないエントリは読み飛ばします。ルートが存在しない場合は空の一覧になります。
    pub fn scan(root: &Path) -> Self {
        let mut listing = Self {
            root: root.to_path_buf(),
            ..Self::default()
        };

        let walker = WalkDir::new(root).sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        });

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => listing.dirs.push(entry.into_path()),
                Ok(entry) if entry.path().is_file() => listing.files.push(entry.into_path()),
                Ok(_) => {}
                Err(err) if err.depth() == 0 => {
                    warn!(root = %root.display(), error = %err, "cannot read dataset root");
                }
                Err(err) => debug!(error = %err, "skipping unreadable entry"),
            }
        }

        listing
    }
}

/// フォルダ直下の各サブフォルダについて、最初に見つかるスプレッドシートを選ぶ
///
/// `files` の順序で最初に現れたものが優先されます。`folder` 直下のファイルは
/// 対象外で、スプレッドシートが見つからないサブフォルダは結果に含まれません。
pub fn first_spreadsheet_per_subfolder(
    folder: &Path,
    files: &[PathBuf],
) -> BTreeMap<String, PathBuf> {
    let mut found = BTreeMap::new();

    for file in files {
        let Ok(relative) = file.strip_prefix(folder) else {
            continue;
        };
        let mut components = relative.components();
        let Some(Component::Normal(subfolder)) = components.next() else {
            continue;
        };
        if components.next().is_none() || !is_spreadsheet(file) {
            continue;
        }

        found
            .entry(subfolder.to_string_lossy().into_owned())
            .or_insert_with(|| file.clone());
    }

    found
}

/// 名前が `rule_id` と一致するディレクトリを探す
///
/// `dirs` の順にディレクトリを訪れ、その子ディレクトリの中から一致するものを
/// 探します。浅い位置で先に訪れた候補が優先され、ルート自身は一致しません。
pub fn locate_rule_folder(dirs: &[PathBuf], rule_id: &str) -> Option<PathBuf> {
    let name = OsStr::new(rule_id);
    dirs.iter().find_map(|parent| {
        dirs.iter()
            .find(|dir| dir.parent() == Some(parent.as_path()) && dir.file_name() == Some(name))
            .cloned()
    })
}

/// ルールIDに対応するスプレッドシートをサブフォルダごとに探す
pub fn find_spreadsheets_for_rule(
    listing: &TreeListing,
    rule_id: &str,
) -> BTreeMap<String, PathBuf> {
    match locate_rule_folder(&listing.dirs, rule_id) {
        Some(folder) => first_spreadsheet_per_subfolder(&folder, &listing.files),
        None => BTreeMap::new(),
    }
}

/// ルールディレクトリ直下のサブディレクトリ名（ルールID）を名前順で取得
///
/// # 発生し得るエラー
///
/// * `DatasetError::RulesDirectory` - ルールディレクトリを読み込めない場合
pub fn list_rule_ids(rules_dir: &Path) -> Result<Vec<String>, DatasetError> {
    let read_error = |source| DatasetError::RulesDirectory {
        path: rules_dir.to_path_buf(),
        source,
    };

    let mut rule_ids = Vec::new();
    for entry in fs::read_dir(rules_dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        if entry.path().is_dir() {
            rule_ids.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    rule_ids.sort();
    Ok(rule_ids)
}
