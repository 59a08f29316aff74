use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

use crate::atomic::{filled, AtomicF32};

/// Backwards row jumps smaller than this are treated as jitter and clear
/// nothing.
pub const WRAP_TOLERANCE_ROWS: usize = 500;

/// Maps wall-clock time since start to a history row.
#[derive(Debug, Clone, Copy)]
pub struct RowClock {
    start: Instant,
    secs_per_row: f64,
    history_size: usize,
}

impl RowClock {
    /// `time_window` seconds are spread across `plot_width` rows.
    pub fn new(start: Instant, time_window: f64, plot_width: usize, history_size: usize) -> Self {
        Self {
            start,
            secs_per_row: time_window / plot_width.max(1) as f64,
            history_size: history_size.max(1),
        }
    }

    pub fn row_at(&self, now: Instant) -> usize {
        self.row_for(now.saturating_duration_since(self.start))
    }

    pub fn row_for(&self, elapsed: Duration) -> usize {
        let rows = (elapsed.as_secs_f64() / self.secs_per_row).floor() as u64;
        (rows % self.history_size as u64) as usize
    }

    pub fn history_size(&self) -> usize {
        self.history_size
    }
}

/// Fixed-depth ring of grid snapshots indexed by time row.
///
/// Only the receiver thread advances or writes; readers may observe a row
/// mid-clear.
#[derive(Debug)]
pub struct HistoryRing {
    data: Box<[AtomicF32]>,
    cells: usize,
    size: usize,
    last: AtomicUsize,
    fill: f32,
}

impl HistoryRing {
    pub fn new(size: usize, cells: usize, fill: f32) -> Self {
        Self {
            data: filled(size * cells, fill),
            cells,
            size,
            last: AtomicUsize::new(0),
            fill,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn last_row(&self) -> usize {
        self.last.load(Ordering::Relaxed)
    }

    /// Clears the rows after the previous write position up to and including
    /// `row`, then makes `row` current. Returns how many rows were cleared.
    pub fn advance_and_invalidate(&self, row: usize) -> usize {
        let last = self.last.load(Ordering::Relaxed);
        let to_clear = if row >= last {
            row - last
        } else if row + WRAP_TOLERANCE_ROWS > last {
            0
        } else {
            row + self.size - last
        };

        for i in 0..to_clear {
            self.clear_row((1 + i + last) % self.size);
        }
        self.last.store(row, Ordering::Relaxed);
        to_clear
    }

    pub fn write(&self, row: usize, cell: usize, value: f32) {
        if let Some(slot) = self.slot(row, cell) {
            slot.store(value);
        }
    }

    pub fn get(&self, row: usize, cell: usize) -> Option<f32> {
        self.slot(row, cell).map(AtomicF32::load)
    }

    pub fn row(&self, row: usize) -> impl Iterator<Item = f32> + '_ {
        let start = (row % self.size) * self.cells;
        self.data[start..start + self.cells].iter().map(AtomicF32::load)
    }

    fn clear_row(&self, row: usize) {
        let start = row * self.cells;
        for cell in &self.data[start..start + self.cells] {
            cell.store(self.fill);
        }
    }

    fn slot(&self, row: usize, cell: usize) -> Option<&AtomicF32> {
        if row >= self.size || cell >= self.cells {
            return None;
        }
        self.data.get(row * self.cells + cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: f32 = -66666.0;

    fn filled_ring(size: usize, cells: usize) -> HistoryRing {
        let ring = HistoryRing::new(size, cells, EMPTY);
        for r in 0..size {
            for c in 0..cells {
                ring.write(r, c, 1.0);
            }
        }
        ring
    }

    fn cleared_rows(ring: &HistoryRing) -> Vec<usize> {
        (0..ring.size())
            .filter(|&r| ring.row(r).all(|v| v == EMPTY))
            .collect()
    }

    #[test]
    fn row_clock_spreads_window_across_plot() {
        let clock = RowClock::new(Instant::now(), 3.5, 630, 3500);
        let per_row = 3.5 / 630.0;
        assert_eq!(clock.row_for(Duration::ZERO), 0);
        assert_eq!(clock.row_for(Duration::from_secs_f64(per_row * 10.5)), 10);
        assert_eq!(clock.row_for(Duration::from_secs_f64(per_row * 3501.5)), 1);
    }

    #[test]
    fn forward_advance_clears_exactly_the_gap() {
        let ring = filled_ring(100, 3);
        ring.last.store(10, Ordering::Relaxed);
        assert_eq!(ring.advance_and_invalidate(14), 4);
        assert_eq!(cleared_rows(&ring), vec![11, 12, 13, 14]);
        assert_eq!(ring.last_row(), 14);
    }

    #[test]
    fn same_row_clears_nothing() {
        let ring = filled_ring(100, 2);
        ring.last.store(7, Ordering::Relaxed);
        assert_eq!(ring.advance_and_invalidate(7), 0);
        assert!(cleared_rows(&ring).is_empty());
    }

    #[test]
    fn wraparound_clears_only_the_overhang() {
        // advancing by history_size + 20 from row 990
        let ring = filled_ring(1000, 2);
        ring.last.store(990, Ordering::Relaxed);
        let row = (990 + 1000 + 20) % 1000;
        assert_eq!(ring.advance_and_invalidate(row), 20);
        let cleared = cleared_rows(&ring);
        assert_eq!(cleared.len(), 20);
        assert!(!cleared.contains(&990));
        assert_eq!(cleared.first(), Some(&0));
        assert_eq!(cleared.last(), Some(&999));
        assert!(cleared.contains(&10));
    }

    #[test]
    fn small_backwards_jump_is_tolerated() {
        let ring = filled_ring(1000, 2);
        ring.last.store(300, Ordering::Relaxed);
        assert_eq!(ring.advance_and_invalidate(299), 0);
        assert!(cleared_rows(&ring).is_empty());
        assert_eq!(ring.last_row(), 299);
    }

    #[test]
    fn tolerance_boundary_is_literal() {
        let ring = filled_ring(1000, 1);
        ring.last.store(600, Ordering::Relaxed);
        // 100 + 500 is not greater than 600, so this is a wrap
        assert_eq!(ring.advance_and_invalidate(100), 500);
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let ring = HistoryRing::new(4, 4, EMPTY);
        ring.write(4, 0, 1.0);
        ring.write(0, 4, 1.0);
        assert_eq!(ring.get(4, 0), None);
        assert!(ring.row(0).all(|v| v == EMPTY));
    }
}
