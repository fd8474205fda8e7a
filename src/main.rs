use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use fundus_enhance_rs::enhancement::{
    EvaluationConfig, Evaluator, ExportConfig, FundusImageReader, PreprocessConfig, RankingReport,
    ReportExporter, TiffCompression, load_image, rank,
};
use fundus_enhance_rs::logger;

use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "fundus-enhance")]
#[command(version, about = "Evaluate enhancement filters on a retinal fundus image", long_about = None)]
struct Cli {
    /// Input image (PNG, JPEG, TIFF or BMP)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write every filter output and metrics.csv into this directory
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Run filters one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Compression for exported TIFF files
    #[arg(long, value_enum, default_value_t = CompressionArg::None)]
    compression: CompressionArg,

    /// Stretch the input to the full intensity range before evaluation
    #[arg(long)]
    normalize: bool,

    /// Longest side after downsampling
    #[arg(long, value_name = "N", default_value_t = 512)]
    max_dimension: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum CompressionArg {
    None,
    Lzw,
    Deflate,
}

impl From<CompressionArg> for TiffCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::Deflate => TiffCompression::Deflate,
        }
    }
}

fn print_table(ranking: &RankingReport) {
    println!(
        "{:<18} {:>10} {:>8} {:>10} {:>8} {:>8}",
        "Filter", "PSNR", "SSIM", "MSE", "Entropy", "CII"
    );
    for row in &ranking.rows {
        let m = &row.metrics;
        println!(
            "{:<18} {:>10.4} {:>8.4} {:>10.4} {:>8.4} {:>8.4}",
            row.name, m.psnr, m.ssim, m.mse, m.entropy, m.cii
        );
    }
    match ranking.winner {
        Some(name) => println!("\nBest filter: {name}"),
        None => println!("\nNo candidate filters evaluated"),
    }
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let cli = Cli::parse();

    info!("Starting fundus-enhance...");

    let preprocess = PreprocessConfig::builder()
        .max_dimension(cli.max_dimension)
        .normalize(cli.normalize)
        .build();
    let image = load_image(&FundusImageReader, &cli.input, &preprocess)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;

    let config = EvaluationConfig::builder().parallel(!cli.sequential).build();
    let evaluator = Evaluator::new(config);
    let report = evaluator.evaluate(&image).context("evaluation failed")?;

    for failed in report.failures() {
        warn!(filter = failed.name, status = ?failed.status, "Filter fell back to input");
    }

    let ranking = rank(&report);
    print_table(&ranking);

    if let Some(dir) = &cli.out {
        let export = ExportConfig::builder().compression(cli.compression.into()).build();
        let written = ReportExporter::new(export)
            .export(dir, &report, &ranking)
            .with_context(|| format!("failed to export to {}", dir.display()))?;
        info!(files = written.len(), dir = %dir.display(), "Results written");
    }

    Ok(())
}
