use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::ExamDeckError;
use crate::extraction::{image_file, PageRasterizer, PageSourceKind, RasterPage};
use crate::regions::crop::{crop_all, fit_scale};
use crate::regions::{persist, RegionStore, MIN_REGION_SIZE};
use crate::report::{check_preconditions, Deck, ReportAssembler};
use crate::scoring::outcome::AnalysisResult;
use crate::Scoresheet;

/// Tunables for one analysis session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Display box the page is fitted into, in pixels.
    pub max_display_width: u32,
    pub max_display_height: u32,
    /// PDF rasterization multiplier over 72 dpi.
    pub pdf_render_scale: f64,
    /// Regions must exceed this many display pixels in both dimensions.
    pub min_region_size: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            // 80% x 70% of a 1920x1080 screen
            max_display_width: 1536,
            max_display_height: 756,
            pdf_render_scale: 2.0,
            min_region_size: MIN_REGION_SIZE,
        }
    }
}

impl SessionOptions {
    /// Load options from a JSON file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<SessionOptions, ExamDeckError> {
        let content = std::fs::read_to_string(path).map_err(|e| ExamDeckError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let options: SessionOptions =
            serde_json::from_str(&content).map_err(|e| ExamDeckError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if options.pdf_render_scale.is_nan() || options.pdf_render_scale <= 0.0 {
            return Err(ExamDeckError::Config {
                path: path.to_path_buf(),
                reason: "pdf_render_scale must be positive".into(),
            });
        }
        Ok(options)
    }
}

/// The exam page currently shown to the operator.
#[derive(Debug, Clone)]
pub struct DisplayPage {
    pub source: PathBuf,
    /// 0-indexed page for PDFs, `None` for plain images.
    pub page: Option<usize>,
    pub page_count: Option<usize>,
    /// Full-resolution raster used for cropping.
    pub image: DynamicImage,
    /// Display pixels per original pixel; fixed for this page.
    pub scale_factor: f64,
}

impl DisplayPage {
    /// Size of the scaled page as the operator sees it.
    pub fn display_size(&self) -> (u32, u32) {
        (
            (self.image.width() as f64 * self.scale_factor).round() as u32,
            (self.image.height() as f64 * self.scale_factor).round() as u32,
        )
    }
}

/// Summary of a generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub backend: String,
    pub question_slides: usize,
    pub questions_without_stats: Vec<u32>,
}

/// State of one operator session: score sheet, exam page and regions.
///
/// Replacing the page resets the regions, since their coordinates only
/// make sense on the page they were drawn on.
#[derive(Debug)]
pub struct Session {
    options: SessionOptions,
    scoresheet: Option<Scoresheet>,
    page: Option<DisplayPage>,
    regions: RegionStore,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl Session {
    pub fn new(options: SessionOptions) -> Self {
        let regions = RegionStore::with_min_size(options.min_region_size);
        Session {
            options,
            scoresheet: None,
            page: None,
            regions,
        }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn scoresheet(&self) -> Option<&Scoresheet> {
        self.scoresheet.as_ref()
    }

    pub fn page(&self) -> Option<&DisplayPage> {
        self.page.as_ref()
    }

    pub fn regions(&self) -> &RegionStore {
        &self.regions
    }

    pub fn regions_mut(&mut self) -> &mut RegionStore {
        &mut self.regions
    }

    /// Load a score sheet. The previous one stays installed on failure.
    pub fn load_scoresheet(&mut self, path: &Path) -> Result<&Scoresheet, ExamDeckError> {
        let sheet = crate::load_scoresheet(path)?;
        Ok(self.scoresheet.insert(sheet))
    }

    /// Install an already loaded score sheet.
    pub fn set_scoresheet(&mut self, sheet: Scoresheet) {
        self.scoresheet = Some(sheet);
    }

    /// Load an exam image or the first page of a PDF.
    pub fn load_page_source(
        &mut self,
        path: &Path,
        rasterizer: &dyn PageRasterizer,
    ) -> Result<&DisplayPage, ExamDeckError> {
        self.load_page(path, 0, rasterizer)
    }

    /// Load page `page` (0-indexed) of a PDF, or a plain image when `path`
    /// is not a PDF (`page` is then ignored). Regions are reset on success.
    pub fn load_page(
        &mut self,
        path: &Path,
        page: usize,
        rasterizer: &dyn PageRasterizer,
    ) -> Result<&DisplayPage, ExamDeckError> {
        let (raster, page, page_count) = match PageSourceKind::from_path(path) {
            PageSourceKind::Image => (image_file::load_image(path)?, None, None),
            PageSourceKind::Pdf => {
                let bytes = std::fs::read(path).map_err(|e| ExamDeckError::load(path, e))?;
                let count = rasterizer.page_count(&bytes)?;
                if page >= count {
                    return Err(ExamDeckError::PageOutOfRange { page, pages: count });
                }
                let raster =
                    rasterizer.render_page(&bytes, page, self.options.pdf_render_scale)?;
                (raster, Some(page), Some(count))
            }
        };
        Ok(self.install_page(path, raster, page, page_count))
    }

    /// Install a rendered page directly and reset the regions.
    pub fn install_page(
        &mut self,
        source: &Path,
        raster: RasterPage,
        page: Option<usize>,
        page_count: Option<usize>,
    ) -> &DisplayPage {
        let scale_factor = fit_scale(
            raster.natural_width(),
            raster.natural_height(),
            self.options.max_display_width,
            self.options.max_display_height,
        );
        self.regions.clear();
        tracing::info!(
            source = %source.display(),
            ?page,
            scale_factor,
            "page installed, regions reset"
        );
        self.page.insert(DisplayPage {
            source: source.to_path_buf(),
            page,
            page_count,
            image: raster.image,
            scale_factor,
        })
    }

    /// Replace the regions from a config file; unchanged on error.
    pub fn load_regions(&mut self, path: &Path) -> Result<(), ExamDeckError> {
        persist::load(&mut self.regions, path)
    }

    /// Save the regions next to the page source (`<stem>_config.json`)
    /// unless `path` is given. Returns the written path.
    pub fn save_regions(&self, path: Option<&Path>) -> Result<PathBuf, ExamDeckError> {
        let target = match (path, &self.page) {
            (Some(p), _) => p.to_path_buf(),
            (None, Some(page)) => persist::default_config_path(&page.source),
            (None, None) => {
                return Err(ExamDeckError::Preconditions(vec![
                    "exam image or PDF page".to_string()
                ]))
            }
        };
        persist::save(&self.regions, &target)?;
        Ok(target)
    }

    /// Score the loaded sheet.
    pub fn analyze(&self) -> Option<AnalysisResult> {
        self.scoresheet.as_ref().and_then(Scoresheet::analyze)
    }

    /// Crop, score and assemble the report.
    ///
    /// All missing inputs are reported together and nothing is written.
    pub fn generate_report(
        &self,
        assembler: &dyn ReportAssembler,
        out: &Path,
    ) -> Result<ReportSummary, ExamDeckError> {
        let (sheet, page) = check_preconditions(
            self.scoresheet.as_ref(),
            self.page.as_ref(),
            self.regions.len(),
        )?;

        let crops = crop_all(&page.image, self.regions.regions(), page.scale_factor);
        tracing::info!(regions = crops.len(), "cropped question regions");

        let stats = sheet
            .analyze()
            .map(|a| a.questions)
            .unwrap_or_default();
        let deck = Deck::new(crops, &stats, sheet.table.row_count());

        assembler.assemble(&deck, out)?;

        Ok(ReportSummary {
            path: out.to_path_buf(),
            backend: assembler.backend_name().to_string(),
            question_slides: deck.question_count(),
            questions_without_stats: deck
                .slides
                .iter()
                .filter(|s| s.stats.is_none())
                .map(|s| s.question_number)
                .collect(),
        })
    }
}
