// オーケストレーター
// ローダーとワーカープールを起動し、完了を検出して結果を返す。

use crate::engine::config::EngineConfig;
use crate::engine::loader::spawn_loader;
use crate::engine::reporter::ProgressReporter;
use crate::engine::state::PipelineState;
use crate::engine::types::AnalysisSummary;
use crate::engine::worker::spawn_workers;
use anyhow::Result;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// 解析パイプラインのエンジン
pub struct AnalysisEngine<R>
where
    R: ProgressReporter,
{
    config: EngineConfig,
    reporter: Arc<R>,
}

impl<R> AnalysisEngine<R>
where
    R: ProgressReporter + 'static,
{
    pub fn new(config: EngineConfig, reporter: R) -> Self {
        Self {
            config,
            reporter: Arc::new(reporter),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// ディレクトリ内の全`.bmp`画像を解析する。
    ///
    /// 手順: 共有状態を作り直し、ローダーとN個のワーカーを起動。
    /// ローダーの合流後は総数が確定しているので、完了チックを
    /// 受け取るたびに `analyzed == total` を確認して完了を検出する
    /// （publish_resultの後に必ずチックが届くため取りこぼしはない）。
    /// 完了後は停止フラグを立てて全ワーカーを合流させてから、
    /// 結果列（公開された順、長さ==総数）を取り出して返す。
    pub async fn analyze_directory(&self, directory: &Path) -> Result<AnalysisSummary> {
        let start_time = Instant::now();

        // 実行ごとに共有状態をリセットする
        let state = Arc::new(PipelineState::new());
        let (wake_tx, wake_rx) = mpsc::channel::<()>(self.config.channel_buffer_size());
        let (done_tx, mut done_rx) = mpsc::channel::<()>(self.config.channel_buffer_size());
        let stop = Arc::new(AtomicBool::new(false));

        let loader_handle = spawn_loader(
            directory.to_path_buf(),
            Arc::clone(&state),
            wake_tx,
            Arc::clone(&self.reporter),
        );
        let worker_handles = spawn_workers(
            Arc::clone(&state),
            wake_rx,
            done_tx,
            Arc::clone(&stop),
            Arc::clone(&self.reporter),
            self.config.worker_count(),
        );

        // ローダーの合流。以降、総数は変化しない。
        loader_handle.await??;

        // 完了待ち
        while !state.is_complete() {
            if done_rx.recv().await.is_none() {
                break;
            }
        }
        assert!(
            state.is_complete(),
            "workers finished but analyzed != total"
        );

        // 協調的停止と合流
        stop.store(true, Ordering::Release);
        for handle in worker_handles {
            handle.await??;
        }

        let results = state.take_results();
        assert_eq!(
            results.len(),
            state.total(),
            "result count must match the image total"
        );

        self.reporter
            .report_completed(results.len(), state.skipped() + state.failed())
            .await;

        Ok(AnalysisSummary {
            results,
            skipped_files: state.skipped(),
            io_failures: state.failed(),
            total_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
