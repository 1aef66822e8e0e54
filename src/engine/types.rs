// 解析結果とサマリーの型定義

use serde::Serialize;
use std::path::PathBuf;

/// 1枚の画像に対する解析結果。
/// 座標は `0 ≤ top_left.x ≤ bottom_right.x < width`（yも同様）を満たす。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub path: PathBuf,
    /// 最大単色矩形の左上隅 (x, y)
    pub top_left: (u32, u32),
    /// 最大単色矩形の右下隅 (x, y)
    pub bottom_right: (u32, u32),
}

/// パイプライン実行全体の集計。結果はワーカーが公開した順のまま。
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub results: Vec<AnalysisResult>,
    /// フォーマット不正でスキップしたファイル数
    pub skipped_files: usize,
    /// I/O失敗でスキップしたファイル数
    pub io_failures: usize,
    pub total_time_ms: u64,
}

impl AnalysisSummary {
    pub fn analyzed_count(&self) -> usize {
        self.results.len()
    }
}
