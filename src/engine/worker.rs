// ワーカープール
// 起床チケットを受け取るたびに共有キューから1枚確保して解析する。

use crate::engine::reporter::ProgressReporter;
use crate::engine::state::PipelineState;
use crate::engine::types::AnalysisResult;
use crate::rect::find_max_rect;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 単一ワーカー
///
/// 停止フラグの確認は外側ループの先頭だけで行い、走査の途中で
/// 中断されることはない。確保済みの画像は必ず解析・公開してから
/// 次の周回に入るため、中途半端な結果が公開されることも、
/// 確保されたまま放置される画像もない。
pub fn spawn_single_worker<R>(
    worker_id: usize,
    state: Arc<PipelineState>,
    wake_rx: Arc<tokio::sync::Mutex<mpsc::Receiver<()>>>,
    done_tx: mpsc::Sender<()>,
    stop: Arc<AtomicBool>,
    reporter: Arc<R>,
) -> JoinHandle<Result<()>>
where
    R: ProgressReporter + 'static,
{
    tokio::spawn(async move {
        loop {
            // 協調的停止チェックポイント
            if stop.load(Ordering::Acquire) {
                break;
            }

            // 起床チケットを待つ。チャンネルが閉じていればローダー完了
            // かつキュー枯渇なので終了する。
            let ticket = {
                let mut rx = wake_rx.lock().await;
                rx.recv().await
            };
            if ticket.is_none() {
                break;
            }

            // チケット1通につき必ず1枚が公開済み
            let image = state
                .claim()
                .expect("wake ticket received but the queue was empty");
            reporter.report_claimed(worker_id, &image.path).await;

            // ロックを一切持たずに走査する
            let result = tokio::task::spawn_blocking(move || {
                let rect = find_max_rect(&image);
                AnalysisResult {
                    path: image.path,
                    top_left: rect.top_left,
                    bottom_right: rect.bottom_right,
                }
            })
            .await
            .context("rectangle scan task failed")?;

            let path = result.path.clone();
            state.publish_result(result);
            reporter
                .report_analyzed(worker_id, &path, state.analyzed(), state.total())
                .await;

            // オーケストレーターへ完了チックを送る。チックは起床合図で
            // しかないので、バッファが満杯（= 未消費の合図が既にある）
            // でも閉鎖済みでも捨ててよい。
            let _ = done_tx.try_send(());
        }

        Ok(())
    })
}

/// ワーカープールを起動する。全ワーカーが1つの受信側を共有する。
pub fn spawn_workers<R>(
    state: Arc<PipelineState>,
    wake_rx: mpsc::Receiver<()>,
    done_tx: mpsc::Sender<()>,
    stop: Arc<AtomicBool>,
    reporter: Arc<R>,
    worker_count: usize,
) -> Vec<JoinHandle<Result<()>>>
where
    R: ProgressReporter + 'static,
{
    let wake_rx = Arc::new(tokio::sync::Mutex::new(wake_rx));
    let mut handles = Vec::new();

    for worker_id in 0..worker_count {
        let handle = spawn_single_worker(
            worker_id,
            Arc::clone(&state),
            Arc::clone(&wake_rx),
            done_tx.clone(),
            Arc::clone(&stop),
            Arc::clone(&reporter),
        );
        handles.push(handle);
    }

    handles
}
