//! The menu bar interaction state machine.
//!
//! [`transition`] is a pure function from the current [`Machine`] and one
//! input [`Event`] to the next machine and the [`Command`]s the owner must
//! execute, in order, against its submenu controllers and hook registry.
//! Everything the rules need to know about the outside world is asked
//! through [`Geometry`].

use menubar_core::{Key, ModMask, Point, Rect};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Authoritative interaction state of one menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuBarState {
    /// Hover opens menus and outside clicks dismiss.
    pub active: bool,
    /// Keyboard navigation mode, toggled by a clean alt tap.
    pub alt_key_pressed: bool,
    /// The item whose dropdown is shown.
    pub opened_menu_index: Option<usize>,
    /// The highlighted item.
    pub focus_menu_index: Option<usize>,
}

impl MenuBarState {
    pub const IDLE: Self = Self {
        active: false,
        alt_key_pressed: false,
        opened_menu_index: None,
        focus_menu_index: None,
    };

    pub fn phase(&self) -> Phase {
        match (self.active, self.focus_menu_index) {
            (false, _) => Phase::Idle,
            (true, None) => Phase::ActiveNoFocus,
            (true, Some(i)) => Phase::ActiveFocused(i),
        }
    }
}

/// Coarse view of [`MenuBarState`]. The opened dropdown is orthogonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    ActiveNoFocus,
    ActiveFocused(usize),
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// A key event as the bar sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: ModMask,
}

impl KeyInput {
    pub const fn new(key: Key, modifiers: ModMask) -> Self {
        Self { key, modifiers }
    }

    pub const fn plain(key: Key) -> Self {
        Self::new(key, ModMask::NONE)
    }
}

/// Modifier state plus key, recorded on key down and compared on key up.
///
/// Alt itself is left out: it is the key being tapped, and its flag flips
/// between the press and the release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyFingerprint {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub key: Key,
}

impl From<KeyInput> for KeyFingerprint {
    fn from(input: KeyInput) -> Self {
        Self {
            shift: input.modifiers.contains(ModMask::SHIFT),
            ctrl: input.modifiers.contains(ModMask::CTRL),
            meta: input.modifiers.contains(ModMask::META),
            key: input.key,
        }
    }
}

// ---------------------------------------------------------------------------
// Events / commands
// ---------------------------------------------------------------------------

/// An input the bar reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Button pressed on label `i`.
    LabelMouseDown(usize),
    /// Label `i` clicked.
    LabelClick(usize),
    /// Pointer entered label `i`.
    LabelOver(usize),
    /// Button pressed anywhere on the page, in viewport coordinates.
    DocumentMouseDown(Point),
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    /// The open dropdown reported a chosen entry.
    SubmenuItemClick { menu: usize, entry: usize },
    /// The items sequence is about to be replaced.
    ItemsReplaced,
    /// The bar is being taken down.
    Unmount,
}

/// A side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Close(usize),
    /// Load item `index`'s entries into its controller and show it at the
    /// page-absolute `at`.
    Popup { index: usize, at: Point },
    /// Register the page-level mouse-down hook.
    ArmOutsideClick,
    /// Deregister the page-level mouse-down hook.
    DisarmOutsideClick,
    /// Suppress the host's default handling of the current key.
    PreventDefault,
    /// Tell the host which entry was chosen.
    NotifyItemClick { menu: usize, entry: usize },
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// What the rules need to know about the mounted bar.
pub trait Geometry {
    /// Number of top-level items.
    fn item_count(&self) -> usize;

    /// Whether item `index` exists and has a live controller.
    fn has_submenu(&self, index: usize) -> bool;

    /// Viewport rectangle of label `index`.
    fn anchor(&self, index: usize) -> Option<Rect>;

    /// Page scroll position, added to viewport coordinates to get page
    /// coordinates.
    fn page_offset(&self) -> Point;

    /// Viewport rectangle of the whole bar; `None` until mounted.
    fn root(&self) -> Option<Rect>;

    /// Whether dropdown `index` covers the page-absolute `p`.
    fn submenu_contains(&self, index: usize, p: Point) -> bool;
}

/// Per-bar switches that shape the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub alt_navigation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alt_navigation: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Machine / transition
// ---------------------------------------------------------------------------

/// State plus the last key-down fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Machine {
    pub state: MenuBarState,
    pub keydown: Option<KeyFingerprint>,
}

/// Result of one [`transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub machine: Machine,
    pub commands: Vec<Command>,
}

/// Apply `event` to `machine`.
pub fn transition(
    machine: &Machine,
    event: &Event,
    geometry: &dyn Geometry,
    settings: &Settings,
) -> Transition {
    let mut step = Step {
        state: machine.state,
        keydown: machine.keydown,
        commands: Vec::new(),
        geometry,
    };

    match *event {
        Event::LabelMouseDown(_) => step.activate(),
        Event::LabelClick(index) => {
            if step.state.opened_menu_index == Some(index) {
                step.reset();
            } else {
                step.open(index);
            }
        }
        Event::LabelOver(index) => {
            if step.state.active && step.state.focus_menu_index != Some(index) {
                step.open(index);
            }
        }
        Event::DocumentMouseDown(p) => step.outside_mouse_down(p),
        Event::KeyDown(input) => step.key_down(input),
        Event::KeyUp(input) => step.key_up(input, settings),
        Event::SubmenuItemClick { menu, entry } => {
            step.commands.push(Command::NotifyItemClick { menu, entry });
            step.reset();
        }
        Event::ItemsReplaced | Event::Unmount => step.reset(),
    }

    step.cascade_focus(&machine.state);

    Transition {
        machine: Machine {
            state: step.state,
            keydown: step.keydown,
        },
        commands: step.commands,
    }
}

struct Step<'a> {
    state: MenuBarState,
    keydown: Option<KeyFingerprint>,
    commands: Vec<Command>,
    geometry: &'a dyn Geometry,
}

impl Step<'_> {
    fn activate(&mut self) {
        if !self.state.active {
            self.state.active = true;
            self.commands.push(Command::ArmOutsideClick);
        }
    }

    /// Back to idle: close the open dropdown and release the outside-click
    /// hook.
    fn reset(&mut self) {
        if let Some(opened) = self.state.opened_menu_index {
            self.commands.push(Command::Close(opened));
        }
        if self.state.active {
            self.commands.push(Command::DisarmOutsideClick);
        }
        self.state = MenuBarState::IDLE;
    }

    /// Show dropdown `index` under its label, closing any other first.
    /// Silently does nothing when the item, its controller, its label or
    /// the bar itself is missing.
    fn open(&mut self, index: usize) {
        if !self.geometry.has_submenu(index) {
            log::debug!("menubar: no submenu for item {index}, not opening");
            return;
        }
        if self.geometry.root().is_none() {
            log::debug!("menubar: not mounted, not opening item {index}");
            return;
        }
        let Some(anchor) = self.geometry.anchor(index) else {
            log::debug!("menubar: no label for item {index}, not opening");
            return;
        };

        if let Some(opened) = self.state.opened_menu_index {
            if opened != index {
                self.commands.push(Command::Close(opened));
            }
        }
        self.activate();
        let at = anchor.bottom_left() + self.geometry.page_offset();
        self.commands.push(Command::Popup { index, at });
        self.state.opened_menu_index = Some(index);
        self.state.focus_menu_index = Some(index);
    }

    fn outside_mouse_down(&mut self, p: Point) {
        if !self.state.active {
            return;
        }
        let Some(root) = self.geometry.root() else {
            return;
        };
        if root.contains(p) {
            return;
        }
        let page = p + self.geometry.page_offset();
        if let Some(opened) = self.state.opened_menu_index {
            if self.geometry.submenu_contains(opened, page) {
                return;
            }
        }
        self.reset();
    }

    fn key_down(&mut self, input: KeyInput) {
        self.keydown = Some(input.into());

        if input.key == Key::Escape {
            self.reset();
            return;
        }
        if !self.state.alt_key_pressed {
            return;
        }

        let count = self.geometry.item_count();
        match input.key {
            Key::ArrowRight => {
                self.commands.push(Command::PreventDefault);
                if count > 0 {
                    let next = self.state.focus_menu_index.map_or(0, |i| (i + 1) % count);
                    self.state.focus_menu_index = Some(next);
                }
            }
            Key::ArrowLeft => {
                self.commands.push(Command::PreventDefault);
                if count > 0 {
                    let prev = self
                        .state
                        .focus_menu_index
                        .map_or(count - 1, |i| (i + count - 1) % count);
                    self.state.focus_menu_index = Some(prev);
                }
            }
            Key::ArrowDown => {
                self.commands.push(Command::PreventDefault);
                if let Some(focus) = self.state.focus_menu_index {
                    self.open(focus);
                }
            }
            _ => {}
        }
    }

    fn key_up(&mut self, input: KeyInput, settings: &Settings) {
        let fingerprint = KeyFingerprint::from(input);
        if input.key != Key::Alt || self.keydown != Some(fingerprint) {
            return;
        }
        if !settings.alt_navigation {
            return;
        }

        if self.state.alt_key_pressed {
            self.reset();
        } else {
            self.activate();
            self.state.alt_key_pressed = true;
            self.state.focus_menu_index = (self.geometry.item_count() > 0).then_some(0);
        }
    }

    /// While a dropdown is open, a focus change moves the dropdown along.
    fn cascade_focus(&mut self, prev: &MenuBarState) {
        let (Some(opened), Some(focus)) =
            (self.state.opened_menu_index, self.state.focus_menu_index)
        else {
            return;
        };
        if focus != opened && Some(focus) != prev.focus_menu_index {
            self.open(focus);
        }
    }
}

#[cfg(test)]
mod tests;
