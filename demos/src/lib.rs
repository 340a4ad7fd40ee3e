//! A terminal application with a File/Edit/View/Help menu bar.
//!
//! The host side of the widget: it owns the hook registry, routes global
//! key and mouse input to the bar only while the bar holds the matching
//! hook, forwards dropdown input to the open [`ContextMenu`], and reacts
//! to chosen entries.

use std::cell::RefCell;
use std::rc::Rc;

use menubar_core::{
    Cell, Color, Grid, Hook, Point, SharedHooks, Style,
    app::{Effect, Model},
    messages::{Key, Msg},
};
use menubar_ui::{
    ContextMenu, ContextMenuAction, DefinitionError, ItemClick, KeyInput, MenuBar,
    MenuDefinition, Response,
};

pub const UI_WIDTH: i32 = 80;
pub const UI_HEIGHT: i32 = 24;

const MENUS: &str = include_str!("../menus.toml");

const HELP_TEXT: &[&str] = &[
    "Click a label to open its menu, then hover to switch menus.",
    "Tap Alt for keyboard mode: Left/Right move, Down opens.",
    "Up/Down/Enter pick an entry, Escape closes.",
    "Press q (or File > Quit) to leave.",
];

/// The demo model: a menu bar over an empty page with a status line.
pub struct DemoModel {
    bar: MenuBar<ContextMenu>,
    hooks: SharedHooks,
    clicked: Rc<RefCell<Option<ItemClick>>>,
    status: String,
    size: Point,
}

impl DemoModel {
    /// Build the model from the bundled menu definition.
    pub fn new() -> Result<Self, DefinitionError> {
        Self::from_toml(MENUS)
    }

    pub fn from_toml(doc: &str) -> Result<Self, DefinitionError> {
        let mut config = MenuDefinition::from_toml_str(doc)?.into_config();
        config.width = UI_WIDTH;

        let clicked = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&clicked);
        let mut bar: MenuBar<ContextMenu> = MenuBar::new(config, ContextMenu::new)
            .on_item_click(move |click| *sink.borrow_mut() = Some(click.clone()));

        let hooks = SharedHooks::new();
        bar.mount(hooks.clone());

        Ok(Self {
            bar,
            hooks,
            clicked,
            status: String::from("Ready"),
            size: Point::new(UI_WIDTH, UI_HEIGHT),
        })
    }

    pub fn bar(&self) -> &MenuBar<ContextMenu> {
        &self.bar
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Scroll the page under the bar. Dropdowns keep their page position
    /// and move on screen accordingly.
    pub fn set_page_offset(&mut self, offset: Point) {
        self.bar.set_page_offset(offset);
        for menu in self.bar.submenus_mut() {
            menu.set_page_offset(offset);
        }
    }

    /// Route one message. Returns whether the bar or its dropdown took it.
    fn route(&mut self, msg: &Msg) -> Response {
        let mut resp = Response::default();

        if let Some(action) = self.route_to_dropdown(msg) {
            resp.consumed = true;
            resp.changed = true;
            if let ContextMenuAction::Invoke(entry) = action {
                if let Some(menu) = self.bar.state().opened_menu_index {
                    resp |= self.bar.submenu_item_click(menu, entry);
                }
            }
            if let Msg::KeyDown { key, modifiers, .. } = *msg {
                if self.hooks.is_registered(Hook::KeyDown) {
                    self.bar.record_key_down(KeyInput::new(key, modifiers));
                }
                return resp;
            }
        }

        let routed = match msg {
            Msg::KeyDown { .. } => self.hooks.is_registered(Hook::KeyDown),
            Msg::KeyUp { .. } => self.hooks.is_registered(Hook::KeyUp),
            Msg::Mouse { .. } => true,
            _ => false,
        };
        if routed {
            resp |= self.bar.handle_msg(msg);
        }
        resp
    }

    /// Hand dropdown input to the open menu: entry navigation keys, and
    /// mouse input over its region.
    fn route_to_dropdown(&mut self, msg: &Msg) -> Option<ContextMenuAction> {
        let (_, menu) = self.bar.opened_submenu_mut()?;
        let wanted = match *msg {
            Msg::KeyDown { key, .. } => {
                matches!(key, Key::ArrowUp | Key::ArrowDown | Key::Enter)
            }
            Msg::Mouse { pos, .. } => menu.viewport_region().is_some_and(|r| r.contains(pos)),
            _ => false,
        };
        if !wanted {
            return None;
        }
        match menu.update(msg) {
            ContextMenuAction::Pass if matches!(msg, Msg::Mouse { .. }) => None,
            action => Some(action),
        }
    }
}

impl Model for DemoModel {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        if let Msg::Screen { width, height, .. } = msg {
            self.size = Point::new(width, height);
            self.bar.set_bounds(Point::ZERO, width);
            return None;
        }

        let resp = self.route(&msg);

        if let Some(click) = self.clicked.borrow_mut().take() {
            log::info!("demo: chose {} ({}/{})", click.label, click.menu, click.entry);
            if click.label == "Quit" {
                return Some(Effect::End);
            }
            self.status = format!("Chose \"{}\"", click.label);
            return None;
        }

        match msg {
            Msg::KeyDown {
                key: Key::Char('q'),
                ..
            } if !resp.consumed => Some(Effect::End),
            Msg::Quit => Some(Effect::End),
            _ => None,
        }
    }

    fn draw(&self, grid: &Grid) {
        let page = Style::default().with_bg(Color::from_rgb(20, 20, 28));
        grid.fill(Cell::new(' ', page));

        for (i, line) in HELP_TEXT.iter().enumerate() {
            grid.print(Point::new(2, 3 + i as i32), line, page);
        }

        let state = self.bar.state();
        let mode = match (state.active, state.alt_key_pressed) {
            (false, _) => "idle",
            (true, false) => "active",
            (true, true) => "keyboard",
        };
        let status = format!(" {} | {mode}", self.status);
        grid.print(
            Point::new(0, self.size.y - 1),
            &status,
            page.with_fg(Color::from_rgb(150, 150, 170)),
        );

        self.bar.draw(grid);
        if let Some((_, menu)) = self.bar.opened_submenu() {
            menu.draw(grid);
        }
    }
}

#[cfg(test)]
mod tests {
    use menubar_core::ModMask;
    use menubar_core::messages::MouseAction;

    use super::*;

    fn press(model: &mut DemoModel, pos: Point) -> Option<Effect> {
        model.update(Msg::mouse(MouseAction::Main, pos));
        model.update(Msg::mouse(MouseAction::Release, pos))
    }

    #[test]
    fn bundled_menus_load() {
        let model = DemoModel::new().unwrap();
        let labels: Vec<_> = model.bar().items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["&File", "&Edit", "&View", "&Help"]);
        assert_eq!(model.bar().submenus().len(), 4);
    }

    #[test]
    fn choose_an_entry_with_the_keyboard() {
        let mut model = DemoModel::new().unwrap();
        model.update(Msg::key_down(Key::Alt, ModMask::ALT));
        model.update(Msg::key_up(Key::Alt, ModMask::NONE));
        assert!(model.bar().state().alt_key_pressed);

        // Edit > Undo.
        model.update(Msg::key_down(Key::ArrowRight, ModMask::NONE));
        model.update(Msg::key_down(Key::ArrowDown, ModMask::NONE));
        assert_eq!(model.bar().state().opened_menu_index, Some(1));
        model.update(Msg::key_down(Key::ArrowDown, ModMask::NONE));
        let effect = model.update(Msg::key_down(Key::Enter, ModMask::NONE));
        assert!(effect.is_none());
        assert_eq!(model.status(), "Chose \"Undo\"");
        assert!(!model.bar().state().active);
    }

    #[test]
    fn quit_entry_ends_the_app() {
        let mut model = DemoModel::new().unwrap();
        press(&mut model, Point::new(1, 0));
        let (_, menu) = model.bar().opened_submenu().unwrap();
        let region = menu.viewport_region().unwrap();
        // File: New, Open, Save, separator, Quit.
        let quit = Point::new(region.min.x + 2, region.min.y + 5);
        model.update(Msg::mouse(MouseAction::Move, quit));
        let effect = press(&mut model, quit);
        assert!(matches!(effect, Some(Effect::End)));
    }

    #[test]
    fn alt_chord_over_an_open_menu_is_not_a_tap() {
        let mut model = DemoModel::new().unwrap();
        press(&mut model, Point::new(1, 0));
        model.update(Msg::key_down(Key::Alt, ModMask::ALT));
        model.update(Msg::key_down(Key::ArrowDown, ModMask::ALT));
        model.update(Msg::key_up(Key::Alt, ModMask::NONE));

        let state = model.bar().state();
        assert!(!state.alt_key_pressed);
        assert_eq!(state.opened_menu_index, Some(0));
        let (_, menu) = model.bar().opened_submenu().unwrap();
        assert_eq!(menu.active(), Some(0));
    }

    #[test]
    fn scrolled_page_keeps_the_dropdown_under_its_label() {
        let mut model = DemoModel::new().unwrap();
        model.set_page_offset(Point::new(0, 10));
        press(&mut model, Point::new(1, 0));
        let (_, menu) = model.bar().opened_submenu().unwrap();
        let region = menu.viewport_region().unwrap();
        assert_eq!(region.min.y, 1);
        assert_eq!(menu.region().unwrap().min.y, 11);

        let grid = Grid::new(UI_WIDTH, UI_HEIGHT);
        model.draw(&grid);
        assert!(grid.row_text(1).starts_with('\u{250c}'));

        // Pressing inside the dropdown keeps it open; Quit still works.
        let quit = Point::new(region.min.x + 2, region.min.y + 5);
        model.update(Msg::mouse(MouseAction::Move, quit));
        model.update(Msg::mouse(MouseAction::Main, quit));
        assert_eq!(model.bar().state().opened_menu_index, Some(0));
        let effect = model.update(Msg::mouse(MouseAction::Release, quit));
        assert!(matches!(effect, Some(Effect::End)));
    }

    #[test]
    fn q_quits_only_when_not_consumed() {
        let mut model = DemoModel::new().unwrap();
        assert!(matches!(
            model.update(Msg::key_down(Key::Char('q'), ModMask::NONE)),
            Some(Effect::End)
        ));
    }

    #[test]
    fn clicking_the_page_closes_the_menu() {
        let mut model = DemoModel::new().unwrap();
        press(&mut model, Point::new(7, 0));
        assert_eq!(model.bar().state().opened_menu_index, Some(1));
        model.update(Msg::mouse(MouseAction::Main, Point::new(60, 15)));
        assert!(!model.bar().state().active);
        assert!(!model.hooks.is_registered(Hook::DocumentMouseDown));
    }
}
