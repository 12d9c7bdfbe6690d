pub mod crop;
pub mod persist;

use serde::{Deserialize, Serialize};

use crate::error::ExamDeckError;
use persist::RegionRecord;

/// Rectangles must be larger than this (in display pixels) in both
/// dimensions to be admitted.
pub const MIN_REGION_SIZE: u32 = 10;

/// Axis-aligned rectangle in display-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge, saturating at `u32::MAX`.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge, saturating at `u32::MAX`.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }
}

/// An operator-drawn rectangle tagged with its question number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub question_number: u32,
    pub rect: Rect,
}

/// Ordered regions for one page, with the next question number to assign.
#[derive(Debug, Clone)]
pub struct RegionStore {
    regions: Vec<Region>,
    next_question: u32,
    min_size: u32,
}

impl Default for RegionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionStore {
    pub fn new() -> Self {
        Self::with_min_size(MIN_REGION_SIZE)
    }

    pub fn with_min_size(min_size: u32) -> Self {
        RegionStore {
            regions: Vec::new(),
            next_question: 1,
            min_size,
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn next_question_number(&self) -> u32 {
        self.next_question
    }

    /// Admit `rect` under the next question number if it is larger than the
    /// minimum size in both dimensions and question numbers are not
    /// exhausted. Returns whether it was admitted.
    pub fn append(&mut self, rect: Rect) -> bool {
        if rect.width <= self.min_size || rect.height <= self.min_size {
            tracing::debug!(?rect, "rectangle too small, ignored");
            return false;
        }
        let Some(next) = self.next_question.checked_add(1) else {
            tracing::warn!(?rect, "question numbers exhausted, rectangle ignored");
            return false;
        };
        let region = Region {
            question_number: self.next_question,
            rect,
        };
        tracing::info!(question = region.question_number, ?rect, "region added");
        self.regions.push(region);
        self.next_question = next;
        true
    }

    /// Remove the most recently appended region. No-op when empty.
    pub fn undo(&mut self) -> Option<Region> {
        let removed = self.regions.pop()?;
        self.next_question = self.next_question.saturating_sub(1).max(1);
        tracing::info!(question = removed.question_number, "region removed");
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.regions.clear();
        self.next_question = 1;
    }

    /// Regions as portable records, in insertion order.
    pub fn serialize(&self) -> Vec<RegionRecord> {
        self.regions.iter().map(RegionRecord::from).collect()
    }

    /// Replace the contents with `records`.
    ///
    /// The next question number becomes one past the largest loaded number.
    /// On error the store is left unchanged.
    pub fn deserialize(&mut self, records: &[RegionRecord]) -> Result<(), ExamDeckError> {
        let regions = records
            .iter()
            .enumerate()
            .map(|(i, r)| r.to_region(i))
            .collect::<Result<Vec<_>, _>>()?;

        self.next_question = regions
            .iter()
            .map(|r| r.question_number)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        self.regions = regions;
        Ok(())
    }

    /// Regions in ascending question-number order.
    pub fn sorted(&self) -> Vec<Region> {
        let mut sorted = self.regions.clone();
        sorted.sort_by_key(|r| r.question_number);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_boundary() {
        let mut store = RegionStore::new();
        assert!(!store.append(Rect::new(0, 0, 10, 50)));
        assert!(!store.append(Rect::new(0, 0, 50, 10)));
        assert!(store.is_empty());
        assert_eq!(store.next_question_number(), 1);

        assert!(store.append(Rect::new(0, 0, 11, 11)));
        assert_eq!(store.regions()[0].question_number, 1);
        assert_eq!(store.next_question_number(), 2);
    }

    #[test]
    fn test_undo_is_lifo() {
        let mut store = RegionStore::new();
        store.append(Rect::new(0, 0, 20, 20));
        store.append(Rect::new(0, 40, 20, 20));
        let removed = store.undo().unwrap();
        assert_eq!(removed.question_number, 2);
        assert_eq!(store.next_question_number(), 2);
        store.append(Rect::new(0, 80, 20, 20));
        assert_eq!(store.regions()[1].question_number, 2);

        store.undo();
        store.undo();
        assert!(store.undo().is_none());
        assert_eq!(store.next_question_number(), 1);
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut store = RegionStore::new();
        store.append(Rect::new(0, 0, 20, 20));
        store.append(Rect::new(0, 0, 20, 20));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.next_question_number(), 1);
    }

    #[test]
    fn test_round_trip() {
        let mut store = RegionStore::new();
        store.append(Rect::new(5, 5, 100, 40));
        store.append(Rect::new(5, 60, 100, 40));
        store.append(Rect::new(120, 5, 30, 30));

        let mut restored = RegionStore::new();
        restored.deserialize(&store.serialize()).unwrap();
        assert_eq!(restored.regions(), store.regions());
        assert_eq!(restored.next_question_number(), store.next_question_number());
    }

    #[test]
    fn test_deserialize_counter_from_max() {
        let mut store = RegionStore::new();
        let records = vec![
            RegionRecord::new(4, 0, 0, 20, 20),
            RegionRecord::new(2, 0, 30, 20, 20),
        ];
        store.deserialize(&records).unwrap();
        assert_eq!(store.next_question_number(), 5);
        let order: Vec<u32> = store.sorted().iter().map(|r| r.question_number).collect();
        assert_eq!(order, vec![2, 4]);

        store.deserialize(&[]).unwrap();
        assert_eq!(store.next_question_number(), 1);
    }

    #[test]
    fn test_deserialize_error_leaves_store_unchanged() {
        let mut store = RegionStore::new();
        store.append(Rect::new(0, 0, 20, 20));
        let records = vec![
            RegionRecord::new(1, 0, 0, 20, 20),
            RegionRecord::new(0, 0, 0, 20, 20),
        ];
        assert!(store.deserialize(&records).is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_question_number(), 2);
    }

    #[test]
    fn test_deserialize_rejects_last_question_number() {
        let mut store = RegionStore::new();
        store.append(Rect::new(0, 0, 20, 20));
        let records = vec![RegionRecord::new(u32::MAX, 0, 0, 20, 20)];
        let err = store.deserialize(&records).unwrap_err();
        assert!(matches!(err, ExamDeckError::ConfigInvalid(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_question_number(), 2);

        store
            .deserialize(&[RegionRecord::new(u32::MAX - 1, 0, 0, 20, 20)])
            .unwrap();
        assert_eq!(store.next_question_number(), u32::MAX);
        // the counter cannot advance past the last number
        assert!(!store.append(Rect::new(0, 0, 20, 20)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_question_number(), u32::MAX);
    }

    #[test]
    fn test_deserialize_rejects_overflowing_edges() {
        let mut store = RegionStore::new();
        for record in [
            RegionRecord::new(1, 4_294_967_000, 0, 4_294_967_000, 20),
            RegionRecord::new(1, 0, u32::MAX, 20, 1),
        ] {
            let err = store.deserialize(&[record]).unwrap_err();
            assert!(matches!(err, ExamDeckError::ConfigInvalid(_)));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_edges_saturate() {
        let r = Rect::new(u32::MAX - 5, 10, 50, 20);
        assert_eq!(r.right(), u32::MAX);
        assert_eq!(r.bottom(), 30);
    }
}
