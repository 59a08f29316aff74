//! On-screen controls: pause/resume/quit buttons along the top right and the
//! N/E/S/W edge editor in the bottom right.

use crate::layout::Layout;

pub const BOX_SIZE: f32 = 40.0;
pub const GAP: f32 = 5.0;
/// Spacing between the pause/resume/quit buttons.
pub const CONTROL_GAP: f32 = 10.0;
pub const CONTROL_BOXES: usize = 3;

/// Cells of the 3x3 editor; the numbering is `column * 3 + row`, counted
/// from the right-hand column and the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East = 1,
    South = 3,
    Centre = 4,
    North = 5,
    West = 7,
}

impl Direction {
    pub const ALL: [Direction; 5] = [
        Direction::East,
        Direction::South,
        Direction::Centre,
        Direction::North,
        Direction::West,
    ];

    pub fn from_box(id: usize) -> Option<Self> {
        match id {
            1 => Some(Self::East),
            3 => Some(Self::South),
            4 => Some(Self::Centre),
            5 => Some(Self::North),
            7 => Some(Self::West),
            _ => None,
        }
    }

    /// `(column, row)` within the editor.
    pub fn cell(self) -> (usize, usize) {
        let id = self as usize;
        (id / CONTROL_BOXES, id % CONTROL_BOXES)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlBox {
    Pause = 0,
    Resume = 1,
    Quit = 2,
}

/// Edge temperatures sent with `set`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edges {
    pub north: f32,
    pub east: f32,
    pub south: f32,
    pub west: f32,
}

impl Default for Edges {
    fn default() -> Self {
        Self {
            north: 40.0,
            east: 10.0,
            south: 10.0,
            west: 40.0,
        }
    }
}

impl Edges {
    pub const ZERO: Edges = Edges {
        north: 0.0,
        east: 0.0,
        south: 0.0,
        west: 0.0,
    };

    pub fn get(&self, d: Direction) -> Option<f32> {
        match d {
            Direction::North => Some(self.north),
            Direction::East => Some(self.east),
            Direction::South => Some(self.south),
            Direction::West => Some(self.west),
            Direction::Centre => None,
        }
    }

    pub fn adjust(&mut self, d: Direction, by: f32) {
        match d {
            Direction::North => self.north += by,
            Direction::East => self.east += by,
            Direction::South => self.south += by,
            Direction::West => self.west += by,
            Direction::Centre => {}
        }
    }

    pub fn all_below(&self, v: f32) -> bool {
        self.north < v && self.east < v && self.south < v && self.west < v
    }
}

/// Bottom-left corner of a pause/resume/quit button.
pub fn control_origin(layout: &Layout, b: ControlBox) -> (f32, f32) {
    let step = BOX_SIZE + CONTROL_GAP;
    let x = layout.width - CONTROL_BOXES as f32 * step + b as usize as f32 * step;
    (x, layout.height - step)
}

pub fn control_box_at(layout: &Layout, x: f32, y: f32) -> Option<ControlBox> {
    [ControlBox::Pause, ControlBox::Resume, ControlBox::Quit]
        .into_iter()
        .find(|&b| {
            let (ox, oy) = control_origin(layout, b);
            (ox..ox + BOX_SIZE).contains(&x) && (oy..oy + BOX_SIZE).contains(&y)
        })
}

/// Bottom-left corner of an editor cell.
pub fn editor_origin(layout: &Layout, d: Direction) -> (f32, f32) {
    let step = BOX_SIZE + GAP;
    let (col, row) = d.cell();
    (
        layout.width - (col + 1) as f32 * step,
        GAP + row as f32 * step,
    )
}

pub fn editor_box_at(layout: &Layout, x: f32, y: f32) -> Option<Direction> {
    Direction::ALL.into_iter().find(|&d| {
        let (ox, oy) = editor_origin(layout, d);
        (ox..ox + BOX_SIZE).contains(&x) && (oy..oy + BOX_SIZE).contains(&y)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_is_a_cross() {
        let l = Layout::default();
        let (ex, ey) = editor_origin(&l, Direction::East);
        let (wx, wy) = editor_origin(&l, Direction::West);
        let (nx, ny) = editor_origin(&l, Direction::North);
        let (sx, sy) = editor_origin(&l, Direction::South);
        let (cx, cy) = editor_origin(&l, Direction::Centre);
        assert!(ex > cx && cx > wx);
        assert!(ny > cy && cy > sy);
        assert_eq!((ey, wy), (cy, cy));
        assert_eq!((nx, sx), (cx, cx));
        assert_eq!((ex, ey), (855.0, 50.0));
    }

    #[test]
    fn editor_hit_test_matches_drawing() {
        let l = Layout::default();
        for d in Direction::ALL {
            let (x, y) = editor_origin(&l, d);
            assert_eq!(editor_box_at(&l, x + 1.0, y + 1.0), Some(d));
            assert_eq!(editor_box_at(&l, x + BOX_SIZE - 0.5, y + BOX_SIZE - 0.5), Some(d));
        }
        // the corners of the 3x3 block are not boxes
        assert_eq!(editor_box_at(&l, 856.0, 6.0), None);
        assert_eq!(editor_box_at(&l, 10.0, 10.0), None);
    }

    #[test]
    fn control_boxes_sit_top_right() {
        let l = Layout::default();
        assert_eq!(control_origin(&l, ControlBox::Pause), (750.0, 650.0));
        assert_eq!(control_box_at(&l, 760.0, 660.0), Some(ControlBox::Pause));
        assert_eq!(control_box_at(&l, 810.0, 660.0), Some(ControlBox::Resume));
        assert_eq!(control_box_at(&l, 889.0, 689.0), Some(ControlBox::Quit));
        assert_eq!(control_box_at(&l, 795.0, 660.0), None);
        assert_eq!(control_box_at(&l, 760.0, 640.0), None);
    }

    #[test]
    fn edges_reinitialise_rule() {
        let mut e = Edges::ZERO;
        assert!(e.all_below(1.0));
        e.adjust(Direction::North, 2.0);
        assert!(!e.all_below(1.0));
        assert_eq!(e.get(Direction::North), Some(2.0));
        assert_eq!(e.get(Direction::Centre), None);
    }
}
