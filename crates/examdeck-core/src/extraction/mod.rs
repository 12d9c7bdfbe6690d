pub mod image_file;
pub mod pdftoppm;
pub mod spreadsheet;

use std::path::Path;

use image::DynamicImage;

use crate::error::ExamDeckError;

/// A rasterized exam page at full (original) resolution.
#[derive(Debug, Clone)]
pub struct RasterPage {
    pub image: DynamicImage,
}

impl RasterPage {
    pub fn natural_width(&self) -> u32 {
        self.image.width()
    }

    pub fn natural_height(&self) -> u32 {
        self.image.height()
    }
}

/// Trait for PDF rasterization backends.
pub trait PageRasterizer {
    /// Number of pages in the document.
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExamDeckError>;

    /// Render page `page` (0-indexed) at `scale` times the document's
    /// natural 72 dpi resolution.
    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page: usize,
        scale: f64,
    ) -> Result<RasterPage, ExamDeckError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Kind of exam page source, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSourceKind {
    Image,
    Pdf,
}

impl PageSourceKind {
    pub fn from_path(path: &Path) -> PageSourceKind {
        let is_pdf = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            PageSourceKind::Pdf
        } else {
            PageSourceKind::Image
        }
    }
}
