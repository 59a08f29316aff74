//! Grid geometry: flat cell indices, tile decomposition and screen coordinates.
//!
//! Cells are stored tile-major. Within a tile, cells run column-major
//! (`elem = ex * each_y + ey`); tiles themselves are numbered
//! `tile = tile_x * y_chips + tile_y`.

/// Static shape of the sensor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub xdim: usize,
    pub ydim: usize,
    pub each_x: usize,
    pub each_y: usize,
    pub x_chips: usize,
    pub y_chips: usize,
}

impl Grid {
    /// Tiles are derived from the dimensions; callers with an explicit chip
    /// count use [`Grid::with_chips`].
    pub fn new(xdim: usize, ydim: usize, each_x: usize, each_y: usize) -> Self {
        Self::with_chips(xdim, ydim, each_x, each_y, xdim / each_x, ydim / each_y)
    }

    pub fn with_chips(
        xdim: usize,
        ydim: usize,
        each_x: usize,
        each_y: usize,
        x_chips: usize,
        y_chips: usize,
    ) -> Self {
        Self {
            xdim,
            ydim,
            each_x,
            each_y,
            x_chips,
            y_chips,
        }
    }

    pub fn cells(&self) -> usize {
        self.xdim * self.ydim
    }

    pub fn tile_size(&self) -> usize {
        self.each_x * self.each_y
    }

    pub fn chips(&self) -> usize {
        self.x_chips * self.y_chips
    }

    /// First cell of the tile owned by the chip at `(x, y)`.
    pub fn tile_base(&self, chip_x: usize, chip_y: usize) -> usize {
        self.tile_size() * (chip_x * self.y_chips + chip_y)
    }

    pub fn index_to_coord(&self, index: usize) -> (usize, usize) {
        let (tile, elem) = divmod(index, self.tile_size());
        let (ex, ey) = divmod(elem, self.each_y);
        let (tx, ty) = divmod(tile, self.y_chips);
        (tx * self.each_x + ex, ty * self.each_y + ey)
    }

    pub fn coord_to_index(&self, x: usize, y: usize) -> usize {
        let (tx, ex) = divmod(x, self.each_x);
        let (ty, ey) = divmod(y, self.each_y);
        ex * self.each_y + ey + self.tile_size() * (tx * self.y_chips + ty)
    }

    /// Maps a display cell to the data cell drawn there. Transforms apply in a
    /// fixed order: y flip, x flip, vector reversal, then rotation. Returns
    /// `None` when a rotation lands outside a non-square grid.
    pub fn transform(&self, index: usize, o: Orientation) -> Option<usize> {
        if !o.any() {
            return Some(index);
        }
        let (tile, elem) = divmod(index, self.tile_size());
        let (mut ex, mut ey) = divmod(elem, self.each_y);
        let (mut tx, mut ty) = divmod(tile, self.y_chips);

        if o.y_flip {
            ey = self.each_y - 1 - ey;
            ty = self.y_chips.checked_sub(1 + ty)?;
        }
        if o.x_flip {
            ex = self.each_x - 1 - ex;
            tx = self.x_chips.checked_sub(1 + tx)?;
        }
        let mut i = ex * self.each_y + ey + self.tile_size() * (tx * self.y_chips + ty);

        if o.vector_flip {
            i = self.cells().checked_sub(1 + i)?;
        }
        if o.rotate {
            let (x, y) = self.index_to_coord(i);
            let (rx, ry) = (y, self.xdim.checked_sub(1 + x)?);
            if rx >= self.xdim || ry >= self.ydim {
                return None;
            }
            i = self.coord_to_index(rx, ry);
        }
        (i < self.cells()).then_some(i)
    }
}

fn divmod(a: usize, b: usize) -> (usize, usize) {
    (a / b, a % b)
}

/// Display orientation toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Orientation {
    pub x_flip: bool,
    pub y_flip: bool,
    pub vector_flip: bool,
    pub rotate: bool,
}

impl Orientation {
    pub fn any(&self) -> bool {
        self.x_flip || self.y_flip || self.vector_flip || self.rotate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grids() -> Vec<Grid> {
        vec![
            Grid::new(32, 32, 4, 4),
            Grid::new(8, 4, 2, 2),
            Grid::new(6, 9, 3, 3),
            Grid::new(5, 5, 1, 1),
        ]
    }

    #[test]
    fn index_mapping_is_invertible() {
        for g in grids() {
            for i in 0..g.cells() {
                let (x, y) = g.index_to_coord(i);
                assert!(x < g.xdim && y < g.ydim, "{g:?} {i} -> ({x},{y})");
                assert_eq!(g.coord_to_index(x, y), i);
            }
        }
    }

    #[test]
    fn mapping_is_a_bijection() {
        for g in grids() {
            let mut seen = vec![false; g.cells()];
            for x in 0..g.xdim {
                for y in 0..g.ydim {
                    let i = g.coord_to_index(x, y);
                    assert!(!seen[i]);
                    seen[i] = true;
                }
            }
            assert!(seen.into_iter().all(|s| s));
        }
    }

    #[test]
    fn tile_base_matches_coords() {
        let g = Grid::new(32, 32, 4, 4);
        let base = g.tile_base(2, 3);
        assert_eq!(g.index_to_coord(base), (8, 12));
    }

    #[test]
    fn identity_orientation_is_noop() {
        let g = Grid::new(8, 4, 2, 2);
        for i in 0..g.cells() {
            assert_eq!(g.transform(i, Orientation::default()), Some(i));
        }
    }

    #[test]
    fn flips_mirror_coordinates() {
        let g = Grid::new(8, 8, 2, 2);
        let xf = Orientation { x_flip: true, ..Default::default() };
        let yf = Orientation { y_flip: true, ..Default::default() };
        for i in 0..g.cells() {
            let (x, y) = g.index_to_coord(i);
            assert_eq!(g.index_to_coord(g.transform(i, xf).unwrap()), (7 - x, y));
            assert_eq!(g.index_to_coord(g.transform(i, yf).unwrap()), (x, 7 - y));
        }
    }

    #[test]
    fn vector_flip_reverses_storage_order() {
        let g = Grid::new(4, 4, 2, 2);
        let vf = Orientation { vector_flip: true, ..Default::default() };
        assert_eq!(g.transform(0, vf), Some(15));
        assert_eq!(g.transform(15, vf), Some(0));
    }

    #[test]
    fn rotate_four_times_is_identity_on_square_grid() {
        let g = Grid::new(8, 8, 2, 2);
        let r = Orientation { rotate: true, ..Default::default() };
        for i in 0..g.cells() {
            let mut j = i;
            for _ in 0..4 {
                j = g.transform(j, r).unwrap();
            }
            assert_eq!(j, i);
        }
    }

    #[test]
    fn flip_order_is_y_then_x_then_vector_then_rotate() {
        let g = Grid::new(4, 4, 2, 2);
        let all = Orientation { x_flip: true, y_flip: true, vector_flip: true, rotate: true };
        for i in 0..g.cells() {
            let (x, y) = g.index_to_coord(i);
            let flipped = g.coord_to_index(3 - x, 3 - y);
            let reversed = 15 - flipped;
            let (rx, ry) = g.index_to_coord(reversed);
            let expect = g.coord_to_index(ry, 3 - rx);
            assert_eq!(g.transform(i, all), Some(expect));
        }
    }

    #[test]
    fn rotate_off_a_wide_grid_is_dropped() {
        let g = Grid::new(8, 4, 2, 2);
        let r = Orientation { rotate: true, ..Default::default() };
        let rotated: Vec<_> = (0..g.cells()).map(|i| g.transform(i, r)).collect();
        assert!(rotated.iter().any(Option::is_none));
        assert!(rotated.iter().flatten().all(|&j| j < g.cells()));
    }
}
