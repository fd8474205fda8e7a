use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tiff::encoder::{Compression, TiffEncoder, colortype::Gray8, compression::DeflateLevel};
use tracing::{debug, info, instrument};

use crate::enhancement::common::error::{EnhancementError, Result};
use crate::enhancement::evaluation::EvaluationReport;
use crate::enhancement::io::types::{ExportConfig, TiffCompression};
use crate::enhancement::raster::GrayImageData;
use crate::enhancement::ranking::{RankedRow, RankingReport};

pub trait RasterWriter {
    fn write_raster(&self, image: &GrayImageData, output: &mut dyn Write, config: &ExportConfig) -> Result<()>;
}

/// Writes 8-bit single-channel TIFF files.
pub struct StandardTiffWriter;

impl RasterWriter for StandardTiffWriter {
    fn write_raster(&self, image: &GrayImageData, output: &mut dyn Write, config: &ExportConfig) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", image.width, image.height);
        image.validate()?;

        let mut buffer = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::Deflate => Compression::Deflate(DeflateLevel::Balanced),
        };

        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| EnhancementError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder
            .write_image::<Gray8>(image.width as u32, image.height as u32, &image.data)
            .map_err(|e| EnhancementError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}

/// Writes the ranked table as CSV, one row per filter.
pub fn write_metrics_csv(rows: &[RankedRow], output: &mut dyn Write) -> Result<()> {
    writeln!(output, "Filter,PSNR,SSIM,MSE,Entropy,CII")?;
    for row in rows {
        let m = &row.metrics;
        writeln!(
            output,
            "{},{:.4},{:.4},{:.4},{:.4},{:.4}",
            row.name, m.psnr, m.ssim, m.mse, m.entropy, m.cii
        )?;
    }
    Ok(())
}

/// Writes filter outputs and the metrics table into a directory.
pub struct ReportExporter<W: RasterWriter> {
    writer: W,
    config: ExportConfig,
}

impl ReportExporter<StandardTiffWriter> {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            writer: StandardTiffWriter,
            config,
        }
    }
}

impl<W: RasterWriter> ReportExporter<W> {
    pub fn with_custom(writer: W, config: ExportConfig) -> Self {
        Self { writer, config }
    }

    fn create_file(path: &Path) -> Result<BufWriter<File>> {
        File::create(path)
            .map(BufWriter::new)
            .map_err(|e| EnhancementError::OutputWriteError(format!("{}: {}", path.display(), e)))
    }

    /// Exports into `dir`, creating it if needed, and returns the written paths.
    ///
    /// Rasters land in `<name>.tiff`, the table in `metrics.csv`.
    #[instrument(skip(self, dir, report, ranking), fields(dir = %dir.as_ref().display()))]
    pub fn export<P: AsRef<Path>>(
        &self,
        dir: P,
        report: &EvaluationReport,
        ranking: &RankingReport,
    ) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .map_err(|e| EnhancementError::OutputWriteError(format!("{}: {}", dir.display(), e)))?;

        let mut written = Vec::new();

        if self.config.write_images {
            let _span = tracing::info_span!("write_rasters", count = report.len()).entered();
            for result in report {
                let path = dir.join(format!("{}.tiff", result.name));
                let mut file = Self::create_file(&path)?;
                self.writer.write_raster(&result.image, &mut file, &self.config)?;
                file.flush()?;
                written.push(path);
            }
        }

        if self.config.write_metrics {
            let path = dir.join("metrics.csv");
            let mut file = Self::create_file(&path)?;
            write_metrics_csv(&ranking.rows, &mut file)?;
            file.flush()?;
            written.push(path);
        }

        info!(files = written.len(), "Export complete");
        Ok(written)
    }
}
