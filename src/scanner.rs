// ディレクトリ走査と訪問者インターフェース

use anyhow::Result;
use mockall::automock;
use std::path::Path;
use walkdir::WalkDir;

/// 対象ファイル名の末尾一致（リテラル・大文字小文字を区別する）
pub const BMP_SUFFIX: &str = ".bmp";

/// 走査中に一致したファイルごとに呼ばれる訪問者
#[automock]
pub trait FileVisitor {
    fn handle(&mut self, path: &Path);
}

/// ディレクトリ直下（非再帰）を走査し、名前が`.bmp`で終わる
/// 通常ファイルごとに訪問者を呼び出す。
pub fn visit_bmp_files(directory: &Path, visitor: &mut dyn FileVisitor) -> Result<()> {
    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry?;

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if name.ends_with(BMP_SUFFIX) {
            visitor.handle(entry.path());
        }
    }

    Ok(())
}
