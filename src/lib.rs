// ディレクトリ内の24bitビットマップ群を並列に解析し、
// 画像ごとに最大の単色矩形を求めるパイプライン。

pub mod bmp;
pub mod engine;
pub mod rect;
pub mod scanner;

pub use bmp::{decode_bmp, BmpImage, DecodeError};
pub use engine::{
    AnalysisEngine, AnalysisResult, AnalysisSummary, ConsoleProgressReporter, EngineConfig,
    NoOpProgressReporter,
};
pub use rect::{find_max_rect, Rect};
