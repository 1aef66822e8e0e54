use anyhow::{Context, Result};
use bmp_analyzer::engine::{
    AnalysisEngine, AnalysisSummary, ConsoleProgressReporter, EngineConfig, NoOpProgressReporter,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bmp_analyzer")]
#[command(about = "Finds the largest rectangle of uniform color in each .bmp image of a directory")]
#[command(version)]
struct Cli {
    /// Number of analyzer workers (must be at least 1)
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    thread_limit: u64,

    /// Directory containing the .bmp files to analyze
    directory: PathBuf,

    /// Report per-file progress on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Also write the full summary as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = EngineConfig::default().with_worker_count(cli.thread_limit as usize);

    let summary = if cli.verbose {
        AnalysisEngine::new(config, ConsoleProgressReporter::new())
            .analyze_directory(&cli.directory)
            .await?
    } else {
        AnalysisEngine::new(config, NoOpProgressReporter::new())
            .analyze_directory(&cli.directory)
            .await?
    };

    print_results(&summary);

    if let Some(json_path) = &cli.json {
        let file = std::fs::File::create(json_path)
            .with_context(|| format!("failed to create {}", json_path.display()))?;
        serde_json::to_writer_pretty(file, &summary)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
    }

    Ok(())
}

fn print_results(summary: &AnalysisSummary) {
    println!("{} image(s) analyzed.", summary.analyzed_count());
    for result in &summary.results {
        println!(
            "{}  ({},{})-({},{})",
            result.path.display(),
            result.top_left.0,
            result.top_left.1,
            result.bottom_right.0,
            result.bottom_right.1
        );
    }
}
