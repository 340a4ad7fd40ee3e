use menubar_core::messages::{Key, Msg, MouseAction};
use menubar_core::{Cell, Grid, Point, Rect, Style};

use crate::item::MenuEntry;
use crate::mnemonic::Mnemonic;
use crate::submenu::{Placement, SubmenuController, SubmenuOptions, SubmenuStyle};

/// Actions returned by [`ContextMenu::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextMenuAction {
    /// Nothing happened.
    Pass,
    /// The highlighted entry changed.
    Move,
    /// Entry `i` was chosen.
    Invoke(usize),
}

/// A boxed dropdown list drawn into the terminal grid.
#[derive(Debug, Clone)]
pub struct ContextMenu {
    id: String,
    style: SubmenuStyle,
    placement: Placement,
    entries: Vec<MenuEntry>,
    labels: Vec<Mnemonic>,
    origin: Option<Point>,
    scroll: Point,
    active: Option<usize>,
}

impl ContextMenu {
    pub fn new(options: SubmenuOptions) -> Self {
        Self {
            id: options.id,
            style: options.style,
            placement: options.placement,
            entries: Vec::new(),
            labels: Vec::new(),
            origin: None,
            scroll: Point::ZERO,
            active: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_open(&self) -> bool {
        self.origin.is_some()
    }

    /// The highlighted entry.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Page scroll position. Popup points are page coordinates; drawing
    /// and pointer input are in viewport coordinates.
    pub fn set_page_offset(&mut self, offset: Point) {
        self.scroll = offset;
    }

    /// The frame rectangle while open, in page coordinates.
    pub fn region(&self) -> Option<Rect> {
        let origin = self.origin?;
        let inner = self
            .entries
            .iter()
            .zip(&self.labels)
            .map(|(entry, label)| {
                let accel = entry
                    .accelerator
                    .as_deref()
                    .map_or(0, |a| a.chars().count() as i32 + 2);
                label.width() + accel
            })
            .max()
            .unwrap_or(0);
        let width = (inner + 4).max(self.style.min_width);
        let height = self.entries.len() as i32 + 2;
        Some(Rect::from_origin(
            origin.shift(0, self.style.margin_top),
            width,
            height,
        ))
    }

    /// The frame rectangle while open, as drawn on screen.
    pub fn viewport_region(&self) -> Option<Rect> {
        self.region().map(|r| r.translate(-self.scroll))
    }

    /// Index of the entry row under viewport point `p`, separators included.
    pub fn entry_at(&self, p: Point) -> Option<usize> {
        let r = self.viewport_region()?;
        let inner = Rect::new(r.min.x + 1, r.min.y + 1, r.max.x - 1, r.max.y - 1);
        inner.contains(p).then(|| (p.y - inner.min.y) as usize)
    }

    /// Process an input message while open.
    pub fn update(&mut self, msg: &Msg) -> ContextMenuAction {
        if !self.is_open() {
            return ContextMenuAction::Pass;
        }
        match *msg {
            Msg::Mouse { action: MouseAction::Move, pos, .. } => {
                let hit = self.selectable_at(pos);
                if hit.is_some() && hit != self.active {
                    self.active = hit;
                    ContextMenuAction::Move
                } else {
                    ContextMenuAction::Pass
                }
            }
            Msg::Mouse { action: MouseAction::Release, pos, .. } => match self.selectable_at(pos) {
                Some(i) => {
                    self.active = Some(i);
                    ContextMenuAction::Invoke(i)
                }
                None => ContextMenuAction::Pass,
            },
            Msg::KeyDown { key: Key::ArrowUp, .. } => self.move_active(-1),
            Msg::KeyDown { key: Key::ArrowDown, .. } => self.move_active(1),
            Msg::KeyDown { key: Key::Enter, .. } => match self.active {
                Some(i) if self.entries[i].is_selectable() => ContextMenuAction::Invoke(i),
                _ => ContextMenuAction::Pass,
            },
            _ => ContextMenuAction::Pass,
        }
    }

    /// Draw the dropdown if open.
    pub fn draw(&self, grid: &Grid) {
        let Some(r) = self.viewport_region() else {
            return;
        };
        let s = &self.style;
        let (tl, tr) = if s.rounded && !s.square_top {
            ('\u{256d}', '\u{256e}')
        } else {
            ('\u{250c}', '\u{2510}')
        };
        let (bl, br) = if s.rounded {
            ('\u{2570}', '\u{256f}')
        } else {
            ('\u{2514}', '\u{2518}')
        };
        let (x0, y0, x1, y1) = (r.min.x, r.min.y, r.max.x - 1, r.max.y - 1);

        set(grid, Point::new(x0, y0), tl, s.frame);
        set(grid, Point::new(x1, y0), tr, s.frame);
        set(grid, Point::new(x0, y1), bl, s.frame);
        set(grid, Point::new(x1, y1), br, s.frame);
        for x in x0 + 1..x1 {
            set(grid, Point::new(x, y0), '\u{2500}', s.frame);
            set(grid, Point::new(x, y1), '\u{2500}', s.frame);
        }

        for (i, (entry, label)) in self.entries.iter().zip(&self.labels).enumerate() {
            let y = y0 + 1 + i as i32;
            if entry.separator {
                set(grid, Point::new(x0, y), '\u{251c}', s.frame);
                set(grid, Point::new(x1, y), '\u{2524}', s.frame);
                for x in x0 + 1..x1 {
                    set(grid, Point::new(x, y), '\u{2500}', s.frame);
                }
                continue;
            }

            let row = if entry.disabled {
                s.disabled
            } else if self.active == Some(i) {
                s.active
            } else {
                s.entry
            };
            set(grid, Point::new(x0, y), '\u{2502}', s.frame);
            set(grid, Point::new(x1, y), '\u{2502}', s.frame);
            for x in x0 + 1..x1 {
                set(grid, Point::new(x, y), ' ', row);
            }
            for (dx, cell) in label.cells(row, !entry.disabled).enumerate() {
                grid.set(Point::new(x0 + 2 + dx as i32, y), cell);
            }
            if let Some(accel) = entry.accelerator.as_deref() {
                let accel_style = if self.active == Some(i) { row } else { s.accelerator };
                let x = x1 - 1 - accel.chars().count() as i32;
                grid.print(Point::new(x, y), accel, accel_style);
            }
        }
    }

    fn selectable_at(&self, p: Point) -> Option<usize> {
        self.entry_at(p)
            .filter(|&i| self.entries.get(i).is_some_and(MenuEntry::is_selectable))
    }

    fn move_active(&mut self, delta: i32) -> ContextMenuAction {
        let len = self.entries.len() as i32;
        if !self.entries.iter().any(MenuEntry::is_selectable) {
            return ContextMenuAction::Pass;
        }
        let mut idx = match self.active {
            Some(i) => i as i32,
            None if delta > 0 => -1,
            None => len,
        };
        loop {
            idx = (idx + delta).rem_euclid(len);
            if self.entries[idx as usize].is_selectable() {
                break;
            }
        }
        self.active = Some(idx as usize);
        ContextMenuAction::Move
    }
}

impl SubmenuController for ContextMenu {
    fn set_menu(&mut self, entries: &[MenuEntry]) {
        if self.entries == entries {
            return;
        }
        self.entries = entries.to_vec();
        self.labels = entries.iter().map(|e| Mnemonic::parse(&e.label)).collect();
        self.active = None;
    }

    fn popup(&mut self, at: Point) {
        if self.origin.is_none() {
            self.active = None;
        }
        log::trace!("{}: popup at {at}", self.id);
        self.origin = Some(at);
    }

    fn close(&mut self) {
        if self.origin.take().is_some() {
            log::trace!("{}: closed", self.id);
        }
        self.active = None;
    }

    fn contains(&self, p: Point) -> bool {
        self.region().is_some_and(|r| r.contains(p))
    }
}

fn set(grid: &Grid, p: Point, ch: char, style: Style) {
    grid.set(p, Cell::new(ch, style));
}
