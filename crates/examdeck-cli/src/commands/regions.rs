use examdeck_core::error::ExamDeckError;
use examdeck_core::regions::{persist, Rect, RegionStore, MIN_REGION_SIZE};
use std::path::Path;

use crate::output;

pub fn add(file: &Path, rects: &[String], min_size: Option<u32>) -> Result<(), ExamDeckError> {
    let mut store = RegionStore::with_min_size(min_size.unwrap_or(MIN_REGION_SIZE));
    if file.exists() {
        persist::load(&mut store, file)?;
    }

    // Parse everything first so a typo leaves the file untouched
    let rects = rects
        .iter()
        .map(|s| parse_rect(s))
        .collect::<Result<Vec<_>, _>>()?;

    for rect in rects {
        let question = store.next_question_number();
        if store.append(rect) {
            eprintln!("  Q{question}: {}x{} at ({}, {})", rect.width, rect.height, rect.x, rect.y);
        } else {
            eprintln!(
                "  skipped {}x{} at ({}, {}): too small",
                rect.width, rect.height, rect.x, rect.y
            );
        }
    }

    persist::save(&store, file)?;
    eprintln!("{} region(s) in {}", store.len(), file.display());
    Ok(())
}

pub fn undo(file: &Path) -> Result<(), ExamDeckError> {
    let mut store = load(file)?;
    match store.undo() {
        Some(region) => eprintln!("Removed Q{}", region.question_number),
        None => eprintln!("No regions to remove."),
    }
    persist::save(&store, file)?;
    Ok(())
}

pub fn clear(file: &Path) -> Result<(), ExamDeckError> {
    let mut store = load(file)?;
    let removed = store.len();
    store.clear();
    persist::save(&store, file)?;
    eprintln!("Removed {removed} region(s)");
    Ok(())
}

pub fn list(file: &Path, output_format: &str) -> Result<(), ExamDeckError> {
    let store = load(file)?;
    match output_format {
        "json" => output::json::print(&store.sorted())?,
        _ => output::table::print_regions(&store.sorted(), store.next_question_number()),
    }
    Ok(())
}

fn load(file: &Path) -> Result<RegionStore, ExamDeckError> {
    let mut store = RegionStore::new();
    persist::load(&mut store, file)?;
    Ok(store)
}

fn parse_rect(s: &str) -> Result<Rect, ExamDeckError> {
    let invalid =
        || ExamDeckError::ConfigInvalid(format!("invalid rectangle '{s}', expected x,y,width,height"));
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<u32>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, w, h] => Ok(Rect::new(*x, *y, *w, *h)),
        _ => Err(invalid()),
    }
}
