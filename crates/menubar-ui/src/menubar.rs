use std::ops::BitOrAssign;

use menubar_core::messages::{Msg, MouseAction};
use menubar_core::{AttrMask, Cell, Color, Grid, Hook, HookRegistry, Point, Rect, Style};

use crate::item::{ItemClick, MenuItem, MenuItems};
use crate::layout::LabelLayout;
use crate::mnemonic::Mnemonic;
use crate::state::{
    Command, Event, Geometry, KeyInput, Machine, MenuBarState, Settings, transition,
};
use crate::submenu::{Placement, SubmenuController, SubmenuFactory, SubmenuOptions, SubmenuStyle};

/// Visual style of the label row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarStyle {
    /// Row background while idle.
    pub bar: Style,
    /// Row background while active.
    pub bar_active: Style,
    pub label: Style,
    /// The opened or focused label.
    pub label_active: Style,
    /// Columns on each side of a label.
    pub padding: i32,
}

impl Default for BarStyle {
    fn default() -> Self {
        let bar = Style::default()
            .with_fg(Color::from_rgb(220, 220, 220))
            .with_bg(Color::from_rgb(40, 40, 52));
        Self {
            bar,
            bar_active: bar.with_bg(Color::from_rgb(48, 48, 64)),
            label: bar,
            label_active: bar.with_attrs(AttrMask::REVERSE),
            padding: 1,
        }
    }
}

/// Everything a [`MenuBar`] is built from.
#[derive(Debug, Clone)]
pub struct MenuBarConfig {
    pub items: MenuItems,
    pub placement: Placement,
    /// Shared by every dropdown; adjusted for `placement` on each rebuild.
    pub submenu_style: SubmenuStyle,
    /// Whether a clean alt tap enters keyboard navigation.
    pub alt_navigation: bool,
    pub bar_style: BarStyle,
    /// Top-left corner of the bar row.
    pub origin: Point,
    /// Minimum width of the bar row.
    pub width: i32,
}

impl Default for MenuBarConfig {
    fn default() -> Self {
        Self {
            items: MenuItems::default(),
            placement: Placement::Bottom,
            submenu_style: SubmenuStyle::default(),
            alt_navigation: true,
            bar_style: BarStyle::default(),
            origin: Point::ZERO,
            width: 80,
        }
    }
}

/// How an input was handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Response {
    /// The input belonged to the bar or its dropdown.
    pub consumed: bool,
    /// The host should skip its own handling of the key.
    pub prevent_default: bool,
    /// The bar state changed and needs a redraw.
    pub changed: bool,
}

impl BitOrAssign for Response {
    fn bitor_assign(&mut self, rhs: Self) {
        self.consumed |= rhs.consumed;
        self.prevent_default |= rhs.prevent_default;
        self.changed |= rhs.changed;
    }
}

type ClickHandler = Box<dyn FnMut(&ItemClick)>;

/// A row of menu labels with one dropdown per label.
///
/// The bar does nothing until [`mount`](MenuBar::mount)ed: that creates the
/// dropdown controllers and subscribes to the global key hooks. The
/// page-level mouse-down hook is held only while the bar is active.
pub struct MenuBar<C: SubmenuController> {
    config: MenuBarConfig,
    factory: Box<dyn SubmenuFactory<C>>,
    submenus: Vec<C>,
    machine: Machine,
    layout: LabelLayout,
    registry: Option<Box<dyn HookRegistry>>,
    held: Vec<Hook>,
    on_item_click: Option<ClickHandler>,
    pressed: Option<usize>,
    page_offset: Point,
}

impl<C: SubmenuController> MenuBar<C> {
    pub fn new(config: MenuBarConfig, factory: impl SubmenuFactory<C> + 'static) -> Self {
        let layout = layout_for(&config);
        Self {
            config,
            factory: Box::new(factory),
            submenus: Vec::new(),
            machine: Machine::default(),
            layout,
            registry: None,
            held: Vec::new(),
            on_item_click: None,
            pressed: None,
            page_offset: Point::ZERO,
        }
    }

    /// Set the handler told about every chosen submenu entry.
    pub fn on_item_click(mut self, handler: impl FnMut(&ItemClick) + 'static) -> Self {
        self.on_item_click = Some(Box::new(handler));
        self
    }

    // -- Accessors --

    pub fn state(&self) -> MenuBarState {
        self.machine.state
    }

    pub fn items(&self) -> &MenuItems {
        &self.config.items
    }

    pub fn layout(&self) -> &LabelLayout {
        &self.layout
    }

    pub fn is_mounted(&self) -> bool {
        self.registry.is_some()
    }

    /// Whether the bar currently holds `hook`.
    pub fn holds(&self, hook: Hook) -> bool {
        self.held.contains(&hook)
    }

    pub fn submenus(&self) -> &[C] {
        &self.submenus
    }

    pub fn submenus_mut(&mut self) -> &mut [C] {
        &mut self.submenus
    }

    /// The open dropdown and the index of its item.
    pub fn opened_submenu(&self) -> Option<(usize, &C)> {
        let i = self.machine.state.opened_menu_index?;
        self.submenus.get(i).map(|c| (i, c))
    }

    pub fn opened_submenu_mut(&mut self) -> Option<(usize, &mut C)> {
        let i = self.machine.state.opened_menu_index?;
        self.submenus.get_mut(i).map(|c| (i, c))
    }

    // -- Lifecycle --

    /// Create the dropdowns and subscribe to the global key hooks.
    pub fn mount(&mut self, registry: impl HookRegistry + 'static) {
        if self.is_mounted() {
            log::warn!("menubar: already mounted");
            return;
        }
        self.registry = Some(Box::new(registry));
        self.rebuild();
        self.hold(Hook::KeyDown);
        self.hold(Hook::KeyUp);
    }

    /// Reset, drop the dropdowns and release every hook.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.dispatch(Event::Unmount);
        for hook in std::mem::take(&mut self.held) {
            if let Some(registry) = self.registry.as_mut() {
                registry.deregister(hook);
            }
        }
        self.registry = None;
        self.submenus.clear();
        self.pressed = None;
        log::debug!("menubar: unmounted");
    }

    /// Replace the items. A sequence with a new identity discards every
    /// dropdown and builds fresh ones; the same sequence is a no-op.
    pub fn set_items(&mut self, items: MenuItems) {
        if items.same_identity(&self.config.items) {
            return;
        }
        self.dispatch(Event::ItemsReplaced);
        self.config.items = items;
        self.layout = layout_for(&self.config);
        if self.is_mounted() {
            self.rebuild();
        }
    }

    /// Move or resize the bar row.
    pub fn set_bounds(&mut self, origin: Point, width: i32) {
        self.config.origin = origin;
        self.config.width = width;
        self.layout = layout_for(&self.config);
    }

    /// Page scroll position added to label positions when placing dropdowns.
    pub fn set_page_offset(&mut self, offset: Point) {
        self.page_offset = offset;
    }

    // -- Inputs --

    pub fn label_mouse_down(&mut self, index: usize) -> Response {
        self.dispatch(Event::LabelMouseDown(index))
    }

    pub fn label_click(&mut self, index: usize) -> Response {
        self.dispatch(Event::LabelClick(index))
    }

    pub fn label_over(&mut self, index: usize) -> Response {
        self.dispatch(Event::LabelOver(index))
    }

    /// A button press anywhere on the page, in viewport coordinates.
    pub fn document_mouse_down(&mut self, p: Point) -> Response {
        self.dispatch(Event::DocumentMouseDown(p))
    }

    pub fn key_down(&mut self, input: KeyInput) -> Response {
        self.dispatch(Event::KeyDown(input))
    }

    /// Note a key down taken by someone else, such as the open dropdown.
    /// Only the fingerprint used by the alt-tap check is updated.
    pub fn record_key_down(&mut self, input: KeyInput) {
        self.machine.keydown = Some(input.into());
    }

    pub fn key_up(&mut self, input: KeyInput) -> Response {
        self.dispatch(Event::KeyUp(input))
    }

    /// The open dropdown reported entry `entry` of menu `menu` as chosen.
    pub fn submenu_item_click(&mut self, menu: usize, entry: usize) -> Response {
        self.dispatch(Event::SubmenuItemClick { menu, entry })
    }

    /// Route a raw input message. Global events are only seen while the
    /// matching hook is held; a press and release on the same label make a
    /// click.
    pub fn handle_msg(&mut self, msg: &Msg) -> Response {
        match *msg {
            Msg::KeyDown { key, modifiers, .. } if self.holds(Hook::KeyDown) => {
                let mut resp = self.key_down(KeyInput::new(key, modifiers));
                resp.consumed = resp.prevent_default || resp.changed;
                resp
            }
            Msg::KeyUp { key, modifiers, .. } if self.holds(Hook::KeyUp) => {
                let mut resp = self.key_up(KeyInput::new(key, modifiers));
                resp.consumed = resp.changed;
                resp
            }
            Msg::Mouse { action, pos, .. } => self.handle_mouse(action, pos),
            _ => Response::default(),
        }
    }

    fn handle_mouse(&mut self, action: MouseAction, pos: Point) -> Response {
        let mut resp = Response::default();
        let label = self.layout.hit(pos);

        if action.is_press() {
            if self.holds(Hook::DocumentMouseDown) {
                resp |= self.document_mouse_down(pos);
            }
            self.pressed = None;
            if let (MouseAction::Main, Some(i)) = (action, label) {
                self.pressed = Some(i);
                resp |= self.label_mouse_down(i);
            }
        } else if action == MouseAction::Release {
            if let (Some(i), Some(pressed)) = (label, self.pressed.take()) {
                if i == pressed {
                    resp |= self.label_click(i);
                }
            }
        } else if action == MouseAction::Move {
            if let Some(i) = label {
                resp |= self.label_over(i);
            }
        }

        let in_dropdown = self
            .opened_submenu()
            .is_some_and(|(_, c)| c.contains(pos + self.page_offset));
        resp.consumed = self.layout.bounds().contains(pos) || in_dropdown;
        resp
    }

    // -- Drawing --

    /// Draw the label row. Dropdowns draw themselves.
    pub fn draw(&self, grid: &Grid) {
        let state = self.machine.state;
        let st = &self.config.bar_style;
        let row = if state.active { st.bar_active } else { st.bar };
        grid.slice(self.layout.bounds()).fill(Cell::new(' ', row));

        for (i, item) in self.config.items.iter().enumerate() {
            let Some(r) = self.layout.rect(i) else {
                continue;
            };
            let highlighted = state.opened_menu_index == Some(i)
                || (state.active && state.focus_menu_index == Some(i));
            let style = if highlighted { st.label_active } else { st.label };
            grid.slice(r).fill(Cell::new(' ', style));
            let label = Mnemonic::parse(&item.label);
            for (dx, cell) in label.cells(style, state.alt_key_pressed).enumerate() {
                grid.set(Point::new(r.min.x + st.padding + dx as i32, r.min.y), cell);
            }
        }
    }

    // -- Internals --

    fn dispatch(&mut self, event: Event) -> Response {
        let before = self.machine.state;
        let settings = Settings {
            alt_navigation: self.config.alt_navigation,
        };
        let t = {
            let view = View {
                items: &self.config.items,
                submenus: &self.submenus,
                layout: &self.layout,
                page_offset: self.page_offset,
                mounted: self.registry.is_some(),
            };
            transition(&self.machine, &event, &view, &settings)
        };
        self.machine = t.machine;

        let after = self.machine.state;
        if before != after {
            log::debug!(
                "menubar: {event:?}: {:?} -> {:?}, opened {:?}",
                before.phase(),
                after.phase(),
                after.opened_menu_index
            );
        }
        let prevent_default = self.execute(&t.commands);
        Response {
            consumed: false,
            prevent_default,
            changed: before != after,
        }
    }

    /// Run `commands` in order. Returns whether the current key's default
    /// handling was suppressed.
    fn execute(&mut self, commands: &[Command]) -> bool {
        let mut prevent_default = false;
        for cmd in commands {
            log::trace!("menubar: {cmd:?}");
            match *cmd {
                Command::Close(i) => {
                    if let Some(c) = self.submenus.get_mut(i) {
                        c.close();
                    }
                }
                Command::Popup { index, at } => {
                    if let (Some(item), Some(c)) =
                        (self.config.items.get(index), self.submenus.get_mut(index))
                    {
                        c.set_menu(&item.submenu);
                        c.popup(at);
                    }
                }
                Command::ArmOutsideClick => self.hold(Hook::DocumentMouseDown),
                Command::DisarmOutsideClick => self.release(Hook::DocumentMouseDown),
                Command::PreventDefault => prevent_default = true,
                Command::NotifyItemClick { menu, entry } => {
                    let label = self
                        .config
                        .items
                        .get(menu)
                        .and_then(|item| item.submenu.get(entry))
                        .map(|e| Mnemonic::parse(&e.label).text)
                        .unwrap_or_default();
                    if let Some(handler) = self.on_item_click.as_mut() {
                        handler(&ItemClick { menu, entry, label });
                    }
                }
            }
        }
        prevent_default
    }

    /// Discard every dropdown and create one per item.
    fn rebuild(&mut self) {
        let placement = self.config.placement;
        let style = self.config.submenu_style.clone().for_placement(placement);
        self.submenus = self
            .config
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let mut c = self.factory.create(SubmenuOptions {
                    id: format!("menu-{i}"),
                    style: style.clone(),
                    placement,
                });
                c.set_menu(&item.submenu);
                c
            })
            .collect();
        log::debug!("menubar: built {} submenus", self.submenus.len());
    }

    fn hold(&mut self, hook: Hook) {
        if self.held.contains(&hook) {
            return;
        }
        match self.registry.as_mut() {
            Some(registry) => {
                registry.register(hook);
                self.held.push(hook);
            }
            None => log::debug!("menubar: not mounted, cannot hold {hook:?}"),
        }
    }

    fn release(&mut self, hook: Hook) {
        if let Some(pos) = self.held.iter().position(|&h| h == hook) {
            self.held.swap_remove(pos);
            if let Some(registry) = self.registry.as_mut() {
                registry.deregister(hook);
            }
        }
    }
}

impl<C: SubmenuController> Drop for MenuBar<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn layout_for(config: &MenuBarConfig) -> LabelLayout {
    LabelLayout::compute(
        &config.items,
        config.origin,
        config.width,
        config.bar_style.padding,
    )
}

/// The mounted bar as the state machine sees it.
struct View<'a, C> {
    items: &'a [MenuItem],
    submenus: &'a [C],
    layout: &'a LabelLayout,
    page_offset: Point,
    mounted: bool,
}

impl<C: SubmenuController> Geometry for View<'_, C> {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn has_submenu(&self, index: usize) -> bool {
        index < self.items.len() && index < self.submenus.len()
    }

    fn anchor(&self, index: usize) -> Option<Rect> {
        if !self.mounted {
            return None;
        }
        self.layout.rect(index)
    }

    fn page_offset(&self) -> Point {
        self.page_offset
    }

    fn root(&self) -> Option<Rect> {
        self.mounted.then(|| self.layout.bounds())
    }

    fn submenu_contains(&self, index: usize, p: Point) -> bool {
        self.submenus.get(index).is_some_and(|c| c.contains(p))
    }
}
