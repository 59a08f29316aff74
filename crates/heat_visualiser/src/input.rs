use std::collections::HashMap;

use vis_host::MenuEntry;

use crate::controls::Direction;

/// Everything a key press or menu pick can ask the heat display to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeatAction {
    ToggleFullscreen,
    Clear,
    Quit,
    Pause,
    Resume,
    ToggleGrid,
    ToggleValues,
    Rotate,
    VectorFlip,
    XFlip,
    YFlip,
    Increase,
    Decrease,
    Select(Direction),
    EditMode,
    SendSet,
    RandomSet,
    ZeroEdges,
}

pub fn default_bindings() -> HashMap<char, HeatAction> {
    use HeatAction::*;
    HashMap::from([
        ('f', ToggleFullscreen),
        ('c', Clear),
        ('q', Quit),
        ('"', Pause),
        ('p', Resume),
        ('b', ToggleGrid),
        ('#', ToggleValues),
        ('d', Rotate),
        ('v', VectorFlip),
        ('x', XFlip),
        ('y', YFlip),
        ('+', Increase),
        ('-', Decrease),
        ('n', Select(Direction::North)),
        ('e', Select(Direction::East)),
        ('s', Select(Direction::South)),
        ('w', Select(Direction::West)),
        ('a', EditMode),
        ('g', SendSet),
        ('9', RandomSet),
        ('0', ZeroEdges),
    ])
}

/// Right-click menu entries; ids are stable across rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    XFlip = 1,
    YFlip = 2,
    VectorFlip = 3,
    Rotate = 4,
    Revert = 5,
    Borders = 6,
    Numbers = 7,
    Fullscreen = 8,
    Pause = 9,
    Resume = 10,
    Quit = 11,
}

impl MenuItem {
    pub fn from_id(id: usize) -> Option<Self> {
        use MenuItem::*;
        [
            XFlip, YFlip, VectorFlip, Rotate, Revert, Borders, Numbers, Fullscreen, Pause,
            Resume, Quit,
        ]
        .into_iter()
        .find(|m| *m as usize == id)
    }

    pub fn action(self) -> HeatAction {
        match self {
            MenuItem::XFlip => HeatAction::XFlip,
            MenuItem::YFlip => HeatAction::YFlip,
            MenuItem::VectorFlip => HeatAction::VectorFlip,
            MenuItem::Rotate => HeatAction::Rotate,
            MenuItem::Revert => HeatAction::Clear,
            MenuItem::Borders => HeatAction::ToggleGrid,
            MenuItem::Numbers => HeatAction::ToggleValues,
            MenuItem::Fullscreen => HeatAction::ToggleFullscreen,
            MenuItem::Pause => HeatAction::Pause,
            MenuItem::Resume => HeatAction::Resume,
            MenuItem::Quit => HeatAction::Quit,
        }
    }
}

/// Toggles the menu labels reflect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuState {
    pub grid_lines: bool,
    pub values_in_cells: bool,
    pub fullscreen: bool,
    pub frozen: bool,
}

pub fn menu_entries(s: MenuState) -> Vec<MenuEntry> {
    let entry = |m: MenuItem, label: &str| MenuEntry::new(m as usize, label);
    let on_off = |on: bool| if on { "off" } else { "on" };
    let mut entries = vec![
        entry(MenuItem::XFlip, "(X) Mirror (left to right swap)"),
        entry(MenuItem::YFlip, "(Y) Reflect (top to bottom swap)"),
        entry(MenuItem::VectorFlip, "(V) Vector Swap (Full X+Y Reversal)"),
        entry(MenuItem::Rotate, "90 (D)egree Rotate Toggle"),
        entry(MenuItem::Revert, "(C) Revert changes back to default"),
        entry(MenuItem::Borders, &format!("Grid (B)orders {}", on_off(s.grid_lines))),
        entry(MenuItem::Numbers, &format!("Numbers (#) {}", on_off(s.values_in_cells))),
        entry(MenuItem::Fullscreen, &format!("(F)ull Screen {}", on_off(s.fullscreen))),
    ];
    entries.push(if s.frozen {
        entry(MenuItem::Resume, "(P)lay / Restart Plot")
    } else {
        entry(MenuItem::Pause, "(\") Pause Plot")
    });
    entries.push(entry(MenuItem::Quit, "(Q)uit"));
    entries
}
