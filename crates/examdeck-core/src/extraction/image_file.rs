use std::path::Path;

use crate::error::ExamDeckError;
use crate::extraction::RasterPage;

/// Decode an exam image (png, jpeg or bmp) from memory.
pub fn decode_image(bytes: &[u8]) -> Result<RasterPage, ExamDeckError> {
    let image = image::load_from_memory(bytes)?;
    Ok(RasterPage { image })
}

/// Read and decode an exam image file.
pub fn load_image(path: &Path) -> Result<RasterPage, ExamDeckError> {
    let bytes = std::fs::read(path).map_err(|e| ExamDeckError::load(path, e))?;
    let page = decode_image(&bytes).map_err(|e| ExamDeckError::load(path, e))?;
    tracing::info!(
        path = %path.display(),
        width = page.natural_width(),
        height = page.natural_height(),
        "loaded exam image"
    );
    Ok(page)
}
