// 進捗報告
// ログ出力はstdoutの結果出力を汚さないよう、すべてstderrに書く。

use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

/// パイプラインの進行を報告するトレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 第1パス完了（解析対象の総数確定）の報告
    async fn report_scan_completed(&self, total_images: usize);

    /// 画像1枚の読み込み・公開完了の報告
    async fn report_loaded(&self, path: &Path);

    /// デコード失敗によるスキップの報告
    async fn report_skipped(&self, path: &Path, reason: &str);

    /// ワーカーによる画像確保の報告
    async fn report_claimed(&self, worker_id: usize, path: &Path);

    /// 画像1枚の解析完了の報告
    async fn report_analyzed(&self, worker_id: usize, path: &Path, analyzed: usize, total: usize);

    /// パイプライン全体の完了報告
    async fn report_completed(&self, analyzed: usize, skipped: usize);
}

/// stderrへのコンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_scan_completed(&self, total_images: usize) {
        if !self.quiet {
            eprintln!("scan finished: {total_images} bitmap(s) found");
        }
    }

    async fn report_loaded(&self, path: &Path) {
        if !self.quiet {
            eprintln!("loaded {}", path.display());
        }
    }

    async fn report_skipped(&self, path: &Path, reason: &str) {
        if !self.quiet {
            eprintln!("skipped {}: {reason}", path.display());
        }
    }

    async fn report_claimed(&self, worker_id: usize, path: &Path) {
        if !self.quiet {
            eprintln!("worker {worker_id}: processing {}", path.display());
        }
    }

    async fn report_analyzed(&self, worker_id: usize, path: &Path, analyzed: usize, total: usize) {
        if !self.quiet {
            eprintln!(
                "worker {worker_id}: finished {} ({analyzed}/{total})",
                path.display()
            );
        }
    }

    async fn report_completed(&self, analyzed: usize, skipped: usize) {
        if !self.quiet {
            eprintln!("analysis complete: {analyzed} analyzed, {skipped} skipped");
        }
    }
}

/// 何も出力しない進捗報告実装（テスト・バックグラウンド用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_scan_completed(&self, _total_images: usize) {}

    async fn report_loaded(&self, _path: &Path) {}

    async fn report_skipped(&self, _path: &Path, _reason: &str) {}

    async fn report_claimed(&self, _worker_id: usize, _path: &Path) {}

    async fn report_analyzed(
        &self,
        _worker_id: usize,
        _path: &Path,
        _analyzed: usize,
        _total: usize,
    ) {
    }

    async fn report_completed(&self, _analyzed: usize, _skipped: usize) {}
}
