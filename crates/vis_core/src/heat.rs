use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Instant,
};

use parking_lot::Mutex;
use sdp::{decode_heat_payload, heat_word_count, FixedPoint};

use crate::{
    atomic::{filled, AtomicF32},
    config::VisConfig,
    grid::{Grid, Orientation},
    history::{HistoryRing, RowClock},
    sink::{Datagram, SampleSink},
};

pub const MAX_DATA: f32 = 65535.0;
pub const MIN_DATA: f32 = -65535.0;

/// Sentinel for cells that have never received a reading.
pub const NOT_DEFINED: f32 = -66666.0;

pub fn is_defined(v: f32) -> bool {
    v > NOT_DEFINED + 1.0
}

/// Shared heat-map state: latest reading per cell, the history ring and the
/// colour-scale watermarks.
#[derive(Debug)]
pub struct HeatSink {
    grid: Grid,
    fixed_point: FixedPoint,
    clock: RowClock,
    immediate: Box<[AtomicF32]>,
    history: HistoryRing,
    high: AtomicF32,
    low: AtomicF32,
    default_high: f32,
    default_low: f32,
    board_known: AtomicBool,
    frozen: AtomicBool,
    dirty: AtomicBool,
    orientation: Mutex<Orientation>,
}

impl HeatSink {
    pub fn new(config: &VisConfig, plot_width: usize, start: Instant) -> Self {
        let grid = config.grid();
        let clock = RowClock::new(start, config.time_window, plot_width, config.history_size);
        Self {
            grid,
            fixed_point: config.fixed_point(),
            clock,
            immediate: filled(grid.cells(), NOT_DEFINED),
            history: HistoryRing::new(config.history_size, grid.cells(), NOT_DEFINED),
            high: AtomicF32::new(config.high_water),
            low: AtomicF32::new(config.low_water),
            default_high: config.high_water,
            default_low: config.low_water,
            board_known: AtomicBool::new(false),
            frozen: AtomicBool::new(false),
            dirty: AtomicBool::new(false),
            orientation: Mutex::new(Orientation::default()),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    /// Stores one reading. Cells outside the grid are dropped; returns whether
    /// the reading was applied.
    pub fn update(&self, cell: usize, value: f32, row: usize) -> bool {
        let Some(slot) = self.immediate.get(cell) else {
            return false;
        };
        let value = value.clamp(MIN_DATA, MAX_DATA);
        slot.store(value);
        self.history.write(row, cell, value);
        if self.board_known.load(Ordering::Relaxed) {
            self.high.fetch_max(value);
            self.low.fetch_min(value);
        }
        self.dirty.store(true, Ordering::Release);
        true
    }

    /// Invalidates history rows up to `row`; must run before `update` writes there.
    pub fn advance_and_invalidate(&self, row: usize) -> usize {
        self.history.advance_and_invalidate(row)
    }

    pub fn clear_all(&self) {
        for cell in self.immediate.iter() {
            cell.store(NOT_DEFINED);
        }
        self.high.store(self.default_high);
        self.low.store(self.default_low);
        *self.orientation.lock() = Orientation::default();
        self.dirty.store(true, Ordering::Release);
    }

    pub fn value(&self, cell: usize) -> Option<f32> {
        self.immediate.get(cell).map(AtomicF32::load)
    }

    /// `(high, low)` colour-scale bounds.
    pub fn watermarks(&self) -> (f32, f32) {
        (self.high.load(), self.low.load())
    }

    pub fn set_board_known(&self) {
        self.board_known.store(true, Ordering::Relaxed);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Relaxed)
    }

    pub fn set_frozen(&self, frozen: bool) {
        self.frozen.store(frozen, Ordering::Relaxed);
        self.dirty.store(true, Ordering::Release);
    }

    pub fn orientation(&self) -> Orientation {
        *self.orientation.lock()
    }

    pub fn update_orientation(&self, f: impl FnOnce(&mut Orientation)) {
        f(&mut self.orientation.lock());
        self.dirty.store(true, Ordering::Release);
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Applies one heat datagram. The source chip address selects the tile the
    /// payload words fill.
    pub fn apply(&self, dgram: &Datagram<'_>) -> sdp::Result<usize> {
        if self.is_frozen() {
            return Ok(0);
        }
        self.advance_and_invalidate(dgram.row);

        let chip_x = usize::from(dgram.header.src_addr >> 8);
        let chip_y = usize::from(dgram.header.src_addr & 0xFF);
        let base = self.grid.tile_base(chip_x, chip_y);
        let words = decode_heat_payload(dgram.bytes, base, heat_word_count(dgram.bytes))?;

        let mut applied = 0;
        for (cell, raw) in words {
            if self.update(cell, self.fixed_point.to_float(raw), dgram.row) {
                applied += 1;
            }
        }
        Ok(applied)
    }
}

impl SampleSink for HeatSink {
    fn row_clock(&self) -> Option<RowClock> {
        Some(self.clock)
    }

    fn on_board_known(&self) {
        self.set_board_known();
    }

    fn on_datagram(&self, dgram: &Datagram<'_>) -> sdp::Result<usize> {
        self.apply(dgram)
    }

    fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use sdp::SdpHeader;
    use std::net::SocketAddr;

    fn config() -> VisConfig {
        VisConfig {
            dimensions: [8, 8],
            chip_size: [4, 4],
            history_size: 1000,
            ..VisConfig::default()
        }
    }

    fn sink() -> HeatSink {
        HeatSink::new(&config(), 630, Instant::now())
    }

    fn heat_packet(src_addr: u16, words: &[u32]) -> Vec<u8> {
        let header = SdpHeader { src_addr, ..SdpHeader::default() };
        let mut buf = BytesMut::new();
        header.encode(&mut buf);
        for w in words {
            buf.extend_from_slice(&w.to_le_bytes());
        }
        buf.to_vec()
    }

    fn datagram(bytes: &[u8], row: usize) -> Datagram<'_> {
        Datagram {
            header: SdpHeader::decode(bytes).unwrap(),
            bytes,
            source: SocketAddr::from(([127, 0, 0, 1], 17893)),
            row,
        }
    }

    #[test]
    fn fresh_sink_is_undefined_and_clean() {
        let s = sink();
        assert!((0..64).all(|i| !is_defined(s.value(i).unwrap())));
        assert!(!s.take_dirty());
    }

    #[test]
    fn update_clamps_and_writes_both_buffers() {
        let s = sink();
        assert!(s.update(3, 100_000.0, 5));
        assert_eq!(s.value(3), Some(MAX_DATA));
        assert_eq!(s.history().get(5, 3), Some(MAX_DATA));
        s.update(4, -100_000.0, 5);
        assert_eq!(s.value(4), Some(MIN_DATA));
        assert!(s.take_dirty());
        assert!(!s.take_dirty());
    }

    #[test]
    fn out_of_range_cell_is_dropped_silently() {
        let s = sink();
        assert!(!s.update(64, 1.0, 0));
        assert!(!s.is_dirty());
    }

    #[test]
    fn watermarks_wait_for_board() {
        let s = sink();
        s.update(0, 50.0, 0);
        assert_eq!(s.watermarks(), (10.0, 0.0));
        s.set_board_known();
        s.update(0, 50.0, 0);
        s.update(1, -2.0, 0);
        assert_eq!(s.watermarks(), (50.0, -2.0));
    }

    #[test]
    fn last_write_wins() {
        let s = sink();
        let a = heat_packet(0, &[65536]);
        let b = heat_packet(0, &[131072]);
        s.apply(&datagram(&a, 0)).unwrap();
        s.apply(&datagram(&b, 0)).unwrap();
        assert_eq!(s.value(0), Some(2.0));
    }

    #[test]
    fn source_address_selects_tile() {
        let s = sink();
        // chip (1, 0) owns the second tile of 16 cells
        let pkt = heat_packet(0x0100, &[65536, 32768]);
        assert_eq!(s.apply(&datagram(&pkt, 0)).unwrap(), 2);
        assert_eq!(s.value(16), Some(1.0));
        assert_eq!(s.value(17), Some(0.5));
        assert_eq!(s.grid().index_to_coord(16), (4, 0));
    }

    #[test]
    fn words_past_the_grid_are_dropped() {
        let s = sink();
        // chip (1, 1) is the last tile: cells 48..64
        let pkt = heat_packet(0x0101, &[65536; 20]);
        assert_eq!(s.apply(&datagram(&pkt, 0)).unwrap(), 16);
        let pkt = heat_packet(0x0500, &[65536]);
        assert_eq!(s.apply(&datagram(&pkt, 0)).unwrap(), 0);
    }

    #[test]
    fn frozen_sink_ignores_packets() {
        let s = sink();
        s.set_frozen(true);
        s.take_dirty();
        let pkt = heat_packet(0, &[65536]);
        assert_eq!(s.apply(&datagram(&pkt, 40)).unwrap(), 0);
        assert!(!is_defined(s.value(0).unwrap()));
        assert_eq!(s.history().last_row(), 0);
        s.set_frozen(false);
        s.apply(&datagram(&pkt, 40)).unwrap();
        assert_eq!(s.history().last_row(), 40);
    }

    #[test]
    fn advancing_clears_stale_history() {
        let s = sink();
        s.update(0, 1.0, 3);
        let pkt = heat_packet(0, &[]);
        s.apply(&datagram(&pkt, 2)).unwrap();
        s.apply(&datagram(&pkt, 4)).unwrap();
        // rows 3 and 4 were cleared when the clock moved from 2 to 4
        assert_eq!(s.history().get(3, 0), Some(NOT_DEFINED));
    }

    #[test]
    fn clear_all_resets_cells_watermarks_and_orientation() {
        let s = sink();
        s.set_board_known();
        s.update(0, 99.0, 0);
        s.update_orientation(|o| {
            o.x_flip = true;
            o.rotate = true;
        });
        s.clear_all();
        assert!(!is_defined(s.value(0).unwrap()));
        assert_eq!(s.watermarks(), (10.0, 0.0));
        assert_eq!(s.orientation(), Orientation::default());
        // history survives a clear
        assert_eq!(s.history().get(0, 0), Some(99.0));
    }
}
