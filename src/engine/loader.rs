// ローダー
// 2パスのディレクトリ走査。第1パスで総数を確定させてから、
// 第2パスで同じディレクトリを歩き直してデコード・公開する。

use crate::bmp::decode_bmp;
use crate::engine::reporter::ProgressReporter;
use crate::engine::state::PipelineState;
use crate::scanner::{visit_bmp_files, FileVisitor};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 第1パス用: 一致したファイル数だけを数える
#[derive(Default)]
struct CountVisitor {
    count: usize,
}

impl FileVisitor for CountVisitor {
    fn handle(&mut self, _path: &Path) {
        self.count += 1;
    }
}

/// 第2パス用: 一致したパスを走査順のまま集める
#[derive(Default)]
struct CollectVisitor {
    paths: Vec<PathBuf>,
}

impl FileVisitor for CollectVisitor {
    fn handle(&mut self, path: &Path) {
        self.paths.push(path.to_path_buf());
    }
}

/// ローダータスクを起動する。
///
/// 公開した画像1枚につき起床チケットを1通送る。フォーマット不正は
/// mark_skipped、I/O失敗はmark_failedで総数から外し、どちらも
/// 解析対象には数えない。タスクの終了（wake_txのドロップ）が
/// ワーカーへの「これ以上来ない」の合図になる。
pub fn spawn_loader<R>(
    directory: PathBuf,
    state: Arc<PipelineState>,
    wake_tx: mpsc::Sender<()>,
    reporter: Arc<R>,
) -> JoinHandle<Result<()>>
where
    R: ProgressReporter + 'static,
{
    tokio::spawn(async move {
        // 第1パス: 解析対象の総数を確定させる。ワーカーが総数に
        // 依存できるのは公開が始まる前のこの時点以降。
        let total = {
            let directory = directory.clone();
            tokio::task::spawn_blocking(move || -> Result<usize> {
                let mut visitor = CountVisitor::default();
                visit_bmp_files(&directory, &mut visitor)?;
                Ok(visitor.count)
            })
            .await
            .context("directory count task failed")??
        };
        state.set_total(total);
        reporter.report_scan_completed(total).await;

        if total == 0 {
            return Ok(());
        }

        // 第2パス: 同じディレクトリを歩き直す
        let paths = {
            let directory = directory.clone();
            tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>> {
                let mut visitor = CollectVisitor::default();
                visit_bmp_files(&directory, &mut visitor)?;
                Ok(visitor.paths)
            })
            .await
            .context("directory walk task failed")??
        };

        for path in paths {
            let decoded = {
                let path = path.clone();
                tokio::task::spawn_blocking(move || decode_bmp(&path))
                    .await
                    .context("decode task failed")?
            };

            match decoded {
                Ok(image) => {
                    state.publish(image);
                    reporter.report_loaded(&path).await;
                    if wake_tx.send(()).await.is_err() {
                        // ワーカーが全て終了している
                        break;
                    }
                }
                Err(error) => {
                    if error.is_io() {
                        state.mark_failed();
                    } else {
                        state.mark_skipped();
                    }
                    reporter.report_skipped(&path, &error.to_string()).await;
                }
            }
        }

        Ok(())
    })
}
