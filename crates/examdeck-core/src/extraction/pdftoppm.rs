use crate::error::ExamDeckError;
use crate::extraction::{image_file, PageRasterizer, RasterPage};
use std::io::Write;
use std::process::{Command, Output};

/// Resolution of a PDF page at scale 1.0.
const BASE_DPI: f64 = 72.0;

/// PDF rasterization backend using pdftoppm and pdfinfo (from poppler-utils).
pub struct PdftoppmRasterizer;

impl PdftoppmRasterizer {
    pub fn new() -> Self {
        PdftoppmRasterizer
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExamDeckError> {
        let tmpfile = write_temp_pdf(pdf_bytes)?;
        let output = run_tool(
            "pdfinfo",
            Command::new("pdfinfo").arg(tmpfile.path()),
        )?;
        let text = String::from_utf8_lossy(&output.stdout);
        parse_page_count(&text).ok_or_else(|| ExamDeckError::PopplerFailed {
            tool: "pdfinfo",
            code: 0,
            stderr: "no 'Pages:' line in pdfinfo output".into(),
        })
    }

    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page: usize,
        scale: f64,
    ) -> Result<RasterPage, ExamDeckError> {
        let pages = self.page_count(pdf_bytes)?;
        if page >= pages {
            return Err(ExamDeckError::PageOutOfRange { page, pages });
        }

        let tmpfile = write_temp_pdf(pdf_bytes)?;
        let outdir = tempfile::tempdir()?;
        let prefix = outdir.path().join("page");
        // pdftoppm pages are 1-indexed
        let page_arg = (page + 1).to_string();
        let dpi = (BASE_DPI * scale).round().max(1.0).to_string();

        run_tool(
            "pdftoppm",
            Command::new("pdftoppm")
                .arg("-f")
                .arg(&page_arg)
                .arg("-l")
                .arg(&page_arg)
                .arg("-r")
                .arg(&dpi)
                .arg("-png")
                .arg("-singlefile")
                .arg(tmpfile.path())
                .arg(&prefix),
        )?;

        let png = std::fs::read(prefix.with_extension("png"))?;
        let raster = image_file::decode_image(&png)?;
        tracing::info!(
            page,
            dpi = %dpi,
            width = raster.natural_width(),
            height = raster.natural_height(),
            "rasterized PDF page"
        );
        Ok(raster)
    }

    fn backend_name(&self) -> &str {
        "pdftoppm"
    }
}

fn write_temp_pdf(pdf_bytes: &[u8]) -> Result<tempfile::NamedTempFile, ExamDeckError> {
    let mut tmpfile = tempfile::Builder::new().suffix(".pdf").tempfile()?;
    tmpfile.write_all(pdf_bytes)?;
    tmpfile.flush()?;
    Ok(tmpfile)
}

fn run_tool(tool: &'static str, command: &mut Command) -> Result<Output, ExamDeckError> {
    let output = command.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExamDeckError::PopplerNotFound { tool }
        } else {
            ExamDeckError::PopplerFailed {
                tool,
                code: -1,
                stderr: e.to_string(),
            }
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(ExamDeckError::PopplerFailed { tool, code, stderr });
    }

    Ok(output)
}

/// Extract the page count from `pdfinfo` output ("Pages:          3").
fn parse_page_count(info: &str) -> Option<usize> {
    info.lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|rest| rest.trim().parse().ok())
}
