use std::sync::atomic::{AtomicU32, Ordering};

/// An `f32` cell shared between the receiver and render threads.
///
/// Every access is a single word-sized atomic, so a concurrent reader sees
/// either the old or the new value and never a torn one.
#[derive(Debug, Default)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(v: f32) -> Self {
        Self(AtomicU32::new(v.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, v: f32) {
        self.0.store(v.to_bits(), Ordering::Relaxed)
    }

    /// Raises the stored value to `v` if `v` is larger. Returns the previous value.
    pub fn fetch_max(&self, v: f32) -> f32 {
        self.update(|cur| (v > cur).then_some(v))
    }

    /// Lowers the stored value to `v` if `v` is smaller. Returns the previous value.
    pub fn fetch_min(&self, v: f32) -> f32 {
        self.update(|cur| (v < cur).then_some(v))
    }

    fn update(&self, mut f: impl FnMut(f32) -> Option<f32>) -> f32 {
        let prev = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                f(f32::from_bits(bits)).map(f32::to_bits)
            })
            .unwrap_or_else(|bits| bits);
        f32::from_bits(prev)
    }
}

/// Allocates `n` cells all holding `v`.
pub fn filled(n: usize, v: f32) -> Box<[AtomicF32]> {
    (0..n).map(|_| AtomicF32::new(v)).collect()
}
