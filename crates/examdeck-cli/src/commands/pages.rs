use examdeck_core::error::ExamDeckError;
use examdeck_core::extraction::pdftoppm::PdftoppmRasterizer;
use examdeck_core::extraction::PageRasterizer;
use std::path::Path;

pub fn run(pdf: &Path) -> Result<(), ExamDeckError> {
    let bytes = std::fs::read(pdf)?;
    let pages = PdftoppmRasterizer::new().page_count(&bytes)?;
    println!("{pages}");
    Ok(())
}
