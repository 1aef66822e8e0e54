// パイプライン共有状態
// 参照実装のグローバル変数群（総数・公開済み数・解析済み数・キュー・結果）を
// 1つの構造体に閉じ込め、2つの独立したロック区画で守る。

use crate::bmp::BmpImage;
use crate::engine::types::AnalysisResult;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// 結果区画。解析済み数と結果列は同じロックの下で更新する。
#[derive(Default)]
struct ResultsSection {
    analyzed: usize,
    entries: Vec<AnalysisResult>,
}

/// ローダーとワーカーが共有するパイプライン状態。
///
/// ロック区画は2つ（キュー区画と結果区画）で、互いに独立しており
/// 入れ子には決してしない。`total`はローダーの第1パスで一度だけ
/// 確定し、デコード失敗のぶんだけ減算される。
/// 完了条件は常に `analyzed == total`。
pub struct PipelineState {
    total: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
    queue: Mutex<Vec<BmpImage>>,
    results: Mutex<ResultsSection>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineState {
    pub fn new() -> Self {
        Self {
            total: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            queue: Mutex::new(Vec::new()),
            results: Mutex::new(ResultsSection::default()),
        }
    }

    /// 第1パスの件数を確定する。0件なら格納領域は確保しない。
    pub fn set_total(&self, total: usize) {
        self.total.store(total, Ordering::Release);
        if total > 0 {
            self.queue
                .lock()
                .expect("queue lock poisoned")
                .reserve_exact(total);
            self.results
                .lock()
                .expect("results lock poisoned")
                .entries
                .reserve_exact(total);
        }
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Acquire)
    }

    /// フォーマット不正でスキップしたファイルを記録し、総数から外す
    pub fn mark_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::AcqRel);
        let previous = self.total.fetch_sub(1, Ordering::AcqRel);
        assert!(previous > 0, "skipped more files than were counted");
    }

    /// I/O失敗でスキップしたファイルを記録し、総数から外す
    pub fn mark_failed(&self) {
        self.failed.fetch_add(1, Ordering::AcqRel);
        let previous = self.total.fetch_sub(1, Ordering::AcqRel);
        assert!(previous > 0, "failed more files than were counted");
    }

    pub fn skipped(&self) -> usize {
        self.skipped.load(Ordering::Acquire)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Acquire)
    }

    /// デコード済み画像をキュー区画に公開する
    pub fn publish(&self, image: BmpImage) {
        let mut queue = self.queue.lock().expect("queue lock poisoned");
        queue.push(image);
        assert!(
            queue.len() <= self.total(),
            "published more images than were counted"
        );
    }

    /// 画像を1枚確保する。後入れ先出し（スタック）で、空なら
    /// ブロックせずNoneを返す。
    pub fn claim(&self) -> Option<BmpImage> {
        self.queue.lock().expect("queue lock poisoned").pop()
    }

    /// 確保可能な画像の枚数
    pub fn available(&self) -> usize {
        self.queue.lock().expect("queue lock poisoned").len()
    }

    /// 解析結果を結果区画に公開する
    pub fn publish_result(&self, result: AnalysisResult) {
        let mut results = self.results.lock().expect("results lock poisoned");
        assert!(
            results.analyzed < self.total(),
            "analyzed count exceeded the image total"
        );
        results.entries.push(result);
        results.analyzed += 1;
    }

    pub fn analyzed(&self) -> usize {
        self.results.lock().expect("results lock poisoned").analyzed
    }

    /// 全画像の解析が完了したか
    pub fn is_complete(&self) -> bool {
        self.analyzed() == self.total()
    }

    /// 結果列を取り出す（公開された順のまま）
    pub fn take_results(&self) -> Vec<AnalysisResult> {
        std::mem::take(
            &mut self
                .results
                .lock()
                .expect("results lock poisoned")
                .entries,
        )
    }
}
