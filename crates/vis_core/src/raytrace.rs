use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use sdp::{decode_pixel_records, PIXEL_DATA_COMMAND};

use crate::sink::{Datagram, SampleSink};

/// Progressive frame: per-pixel running mean of every sample received.
#[derive(Debug)]
pub struct PixelAccumulator {
    width: usize,
    height: usize,
    rgb: Box<[AtomicU8]>,
    counts: Box<[AtomicU32]>,
    dirty: AtomicBool,
}

impl PixelAccumulator {
    pub fn new(width: usize, height: usize) -> Self {
        let n = width * height;
        Self {
            width,
            height,
            rgb: (0..n * 3).map(|_| AtomicU8::new(0)).collect(),
            counts: (0..n).map(|_| AtomicU32::new(0)).collect(),
            dirty: AtomicBool::new(false),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Flat index for board coordinates; the board's y axis points up.
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        let (x, y) = (usize::from(x), usize::from(y));
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((self.height - y - 1) * self.width + x)
    }

    /// Folds one sample into the pixel's mean with truncating integer division.
    pub fn update(&self, index: usize, r: u8, g: u8, b: u8) -> bool {
        let Some(count) = self.counts.get(index) else {
            return false;
        };
        let n = count.load(Ordering::Relaxed);
        let next = u64::from(n) + 1;
        for (channel, sample) in self.rgb[index * 3..index * 3 + 3].iter().zip([r, g, b]) {
            let avg = u64::from(channel.load(Ordering::Relaxed));
            let mean = (u64::from(sample) + u64::from(n) * avg) / next;
            channel.store(mean as u8, Ordering::Relaxed);
        }
        count.store(n.saturating_add(1), Ordering::Relaxed);
        self.dirty.store(true, Ordering::Release);
        true
    }

    pub fn pixel(&self, index: usize) -> Option<([u8; 3], u32)> {
        let count = self.counts.get(index)?.load(Ordering::Relaxed);
        let c = &self.rgb[index * 3..index * 3 + 3];
        let rgb = [0, 1, 2].map(|i| c[i].load(Ordering::Relaxed));
        Some((rgb, count))
    }

    /// Copies the frame into `out` as packed RGB rows, top row first.
    pub fn snapshot_into(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend(self.rgb.iter().map(|c| c.load(Ordering::Relaxed)));
    }
}

impl SampleSink for PixelAccumulator {
    fn on_datagram(&self, dgram: &Datagram<'_>) -> sdp::Result<usize> {
        if dgram.header.command != PIXEL_DATA_COMMAND {
            return Ok(0);
        }
        let records = decode_pixel_records(dgram.bytes, dgram.header.arg1 as usize)?;
        let mut applied = 0;
        for p in records {
            if let Some(index) = self.index_of(p.x, p.y) {
                if self.update(index, p.r, p.g, p.b) {
                    applied += 1;
                }
            }
        }
        Ok(applied)
    }

    fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}
