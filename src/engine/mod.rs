// 解析パイプラインのエンジンモジュール

pub mod config;
pub mod loader;
pub mod orchestrator;
pub mod reporter;
pub mod state;
pub mod types;
pub mod worker;

pub use config::EngineConfig;
pub use orchestrator::AnalysisEngine;
pub use reporter::{ConsoleProgressReporter, NoOpProgressReporter, ProgressReporter};
pub use state::PipelineState;
pub use types::{AnalysisResult, AnalysisSummary};
