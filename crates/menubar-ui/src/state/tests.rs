use super::*;
use proptest::prelude::*;

/// Three labels of width 6 on row 0, dropdowns of 10x4 hanging under the
/// opened label.
struct Page {
    count: usize,
    controllers: usize,
    mounted: bool,
    offset: Point,
    opened_region: Option<(usize, Rect)>,
}

impl Page {
    fn new(count: usize) -> Self {
        Self {
            count,
            controllers: count,
            mounted: true,
            offset: Point::ZERO,
            opened_region: None,
        }
    }

    fn label(index: usize) -> Rect {
        Rect::from_origin(Point::new(index as i32 * 6, 0), 6, 1)
    }
}

impl Geometry for Page {
    fn item_count(&self) -> usize {
        self.count
    }

    fn has_submenu(&self, index: usize) -> bool {
        index < self.count && index < self.controllers
    }

    fn anchor(&self, index: usize) -> Option<Rect> {
        (self.mounted && index < self.count).then(|| Self::label(index))
    }

    fn page_offset(&self) -> Point {
        self.offset
    }

    fn root(&self) -> Option<Rect> {
        self.mounted
            .then(|| Rect::new(0, 0, 80, 1))
    }

    fn submenu_contains(&self, index: usize, p: Point) -> bool {
        self.opened_region
            .is_some_and(|(i, r)| i == index && r.contains(p))
    }
}

fn run(page: &Page, machine: &mut Machine, event: Event) -> Vec<Command> {
    let t = transition(machine, &event, page, &Settings::default());
    *machine = t.machine;
    t.commands
}

fn alt() -> KeyInput {
    KeyInput::new(Key::Alt, ModMask::ALT)
}

fn alt_tap(page: &Page, machine: &mut Machine) -> Vec<Command> {
    run(page, machine, Event::KeyDown(alt()));
    run(page, machine, Event::KeyUp(KeyInput::plain(Key::Alt)))
}

fn key(page: &Page, machine: &mut Machine, key: Key) -> Vec<Command> {
    run(page, machine, Event::KeyDown(KeyInput::plain(key)))
}

fn click(page: &Page, machine: &mut Machine, index: usize) -> Vec<Command> {
    let mut cmds = run(page, machine, Event::LabelMouseDown(index));
    cmds.extend(run(page, machine, Event::LabelClick(index)));
    cmds
}

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

#[test]
fn mouse_down_activates_and_arms_once() {
    let page = Page::new(3);
    let mut m = Machine::default();
    assert_eq!(run(&page, &mut m, Event::LabelMouseDown(1)), vec![Command::ArmOutsideClick]);
    assert_eq!(m.state.phase(), Phase::ActiveNoFocus);
    assert!(run(&page, &mut m, Event::LabelMouseDown(2)).is_empty());
}

#[test]
fn click_opens_under_the_label() {
    let page = Page::new(3);
    let mut m = Machine::default();
    let cmds = click(&page, &mut m, 1);
    assert_eq!(
        cmds,
        vec![
            Command::ArmOutsideClick,
            Command::Popup {
                index: 1,
                at: Point::new(6, 1)
            }
        ]
    );
    assert_eq!(m.state.opened_menu_index, Some(1));
    assert_eq!(m.state.phase(), Phase::ActiveFocused(1));
}

#[test]
fn popup_position_is_page_absolute() {
    let mut page = Page::new(3);
    page.offset = Point::new(0, 40);
    let mut m = Machine::default();
    let cmds = click(&page, &mut m, 2);
    assert!(cmds.contains(&Command::Popup {
        index: 2,
        at: Point::new(12, 41)
    }));
}

#[test]
fn clicking_the_open_label_closes_everything() {
    let page = Page::new(3);
    let mut m = Machine::default();
    click(&page, &mut m, 0);
    let cmds = click(&page, &mut m, 0);
    assert_eq!(cmds, vec![Command::Close(0), Command::DisarmOutsideClick]);
    assert_eq!(m.state, MenuBarState::IDLE);
}

#[test]
fn clicking_another_label_closes_the_first() {
    let page = Page::new(3);
    let mut m = Machine::default();
    click(&page, &mut m, 0);
    let cmds = click(&page, &mut m, 2);
    assert_eq!(
        cmds,
        vec![
            Command::Close(0),
            Command::Popup {
                index: 2,
                at: Point::new(12, 1)
            }
        ]
    );
}

#[test]
fn hover_never_activates_from_idle() {
    let page = Page::new(3);
    let mut m = Machine::default();
    assert!(run(&page, &mut m, Event::LabelOver(1)).is_empty());
    assert_eq!(m.state, MenuBarState::IDLE);
}

#[test]
fn hover_sweeps_the_open_dropdown() {
    let page = Page::new(3);
    let mut m = Machine::default();
    click(&page, &mut m, 0);
    assert!(run(&page, &mut m, Event::LabelOver(0)).is_empty());
    let cmds = run(&page, &mut m, Event::LabelOver(1));
    assert_eq!(
        cmds,
        vec![
            Command::Close(0),
            Command::Popup {
                index: 1,
                at: Point::new(6, 1)
            }
        ]
    );
    assert_eq!(m.state.opened_menu_index, Some(1));
}

#[test]
fn outside_mouse_down_resets_but_dropdown_clicks_do_not() {
    let mut page = Page::new(3);
    let mut m = Machine::default();
    click(&page, &mut m, 0);
    page.opened_region = Some((0, Rect::from_origin(Point::new(0, 1), 10, 4)));

    assert!(run(&page, &mut m, Event::DocumentMouseDown(Point::new(3, 2))).is_empty());
    assert!(run(&page, &mut m, Event::DocumentMouseDown(Point::new(40, 0))).is_empty());
    assert_eq!(m.state.opened_menu_index, Some(0));

    let cmds = run(&page, &mut m, Event::DocumentMouseDown(Point::new(40, 10)));
    assert_eq!(cmds, vec![Command::Close(0), Command::DisarmOutsideClick]);
    assert_eq!(m.state, MenuBarState::IDLE);
}

#[test]
fn outside_mouse_down_while_idle_is_ignored() {
    let page = Page::new(3);
    let mut m = Machine::default();
    assert!(run(&page, &mut m, Event::DocumentMouseDown(Point::new(40, 10))).is_empty());
}

#[test]
fn submenu_containment_uses_page_coordinates() {
    let mut page = Page::new(3);
    page.offset = Point::new(0, 100);
    let mut m = Machine::default();
    click(&page, &mut m, 0);
    page.opened_region = Some((0, Rect::from_origin(Point::new(0, 101), 10, 4)));
    assert!(run(&page, &mut m, Event::DocumentMouseDown(Point::new(2, 2))).is_empty());
    assert_eq!(m.state.opened_menu_index, Some(0));
}

#[test]
fn item_click_notifies_then_resets() {
    let page = Page::new(3);
    let mut m = Machine::default();
    click(&page, &mut m, 1);
    let cmds = run(&page, &mut m, Event::SubmenuItemClick { menu: 1, entry: 4 });
    assert_eq!(
        cmds,
        vec![
            Command::NotifyItemClick { menu: 1, entry: 4 },
            Command::Close(1),
            Command::DisarmOutsideClick
        ]
    );
    assert_eq!(m.state, MenuBarState::IDLE);
}

// ---------------------------------------------------------------------------
// Silent aborts
// ---------------------------------------------------------------------------

#[test]
fn open_aborts_without_controller_or_mount() {
    let mut page = Page::new(3);
    page.controllers = 1;
    let mut m = Machine::default();
    run(&page, &mut m, Event::LabelMouseDown(2));
    assert!(run(&page, &mut m, Event::LabelClick(2)).is_empty());
    assert_eq!(m.state.opened_menu_index, None);
    assert!(run(&page, &mut m, Event::LabelClick(7)).is_empty());

    let mut page = Page::new(3);
    page.mounted = false;
    let mut m = Machine::default();
    assert!(run(&page, &mut m, Event::LabelClick(0)).is_empty());
    assert_eq!(m.state, MenuBarState::IDLE);
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

#[test]
fn escape_resets_from_anywhere() {
    let page = Page::new(3);
    let mut m = Machine::default();
    assert!(key(&page, &mut m, Key::Escape).is_empty());

    alt_tap(&page, &mut m);
    key(&page, &mut m, Key::ArrowDown);
    let cmds = key(&page, &mut m, Key::Escape);
    assert_eq!(cmds, vec![Command::Close(0), Command::DisarmOutsideClick]);
    assert_eq!(m.state, MenuBarState::IDLE);
}

#[test]
fn clean_alt_tap_toggles_menu_mode() {
    let page = Page::new(3);
    let mut m = Machine::default();
    assert_eq!(alt_tap(&page, &mut m), vec![Command::ArmOutsideClick]);
    assert_eq!(
        m.state,
        MenuBarState {
            active: true,
            alt_key_pressed: true,
            opened_menu_index: None,
            focus_menu_index: Some(0),
        }
    );

    assert_eq!(alt_tap(&page, &mut m), vec![Command::DisarmOutsideClick]);
    assert_eq!(m.state, MenuBarState::IDLE);
}

#[test]
fn alt_chord_does_not_toggle() {
    let page = Page::new(3);
    let mut m = Machine::default();
    run(&page, &mut m, Event::KeyDown(alt()));
    run(&page, &mut m, Event::KeyDown(KeyInput::new(Key::Tab, ModMask::ALT)));
    run(&page, &mut m, Event::KeyUp(KeyInput::plain(Key::Tab)));
    run(&page, &mut m, Event::KeyUp(KeyInput::plain(Key::Alt)));
    assert_eq!(m.state, MenuBarState::IDLE);

    // Shift held down on press but released first.
    run(&page, &mut m, Event::KeyDown(KeyInput::new(Key::Alt, ModMask::ALT | ModMask::SHIFT)));
    run(&page, &mut m, Event::KeyUp(KeyInput::plain(Key::Alt)));
    assert_eq!(m.state, MenuBarState::IDLE);
}

#[test]
fn only_the_latest_key_down_is_compared() {
    let page = Page::new(3);
    let mut m = Machine::default();
    // Two presses before one release: the last one wins.
    run(&page, &mut m, Event::KeyDown(KeyInput::plain(Key::Char('x'))));
    run(&page, &mut m, Event::KeyDown(alt()));
    run(&page, &mut m, Event::KeyUp(KeyInput::plain(Key::Alt)));
    assert!(m.state.alt_key_pressed);
}

#[test]
fn alt_tap_ignored_when_disabled() {
    let page = Page::new(3);
    let mut m = Machine::default();
    let settings = Settings {
        alt_navigation: false,
    };
    m = transition(&m, &Event::KeyDown(alt()), &page, &settings).machine;
    let t = transition(&m, &Event::KeyUp(KeyInput::plain(Key::Alt)), &page, &settings);
    assert!(t.commands.is_empty());
    assert_eq!(t.machine.state, MenuBarState::IDLE);
}

#[test]
fn alt_mode_on_an_empty_bar_has_no_focus() {
    let page = Page::new(0);
    let mut m = Machine::default();
    alt_tap(&page, &mut m);
    assert_eq!(m.state.phase(), Phase::ActiveNoFocus);
    assert_eq!(key(&page, &mut m, Key::ArrowRight), vec![Command::PreventDefault]);
    assert_eq!(m.state.focus_menu_index, None);
}

#[test]
fn arrows_wrap_around() {
    let page = Page::new(3);
    let mut m = Machine::default();
    alt_tap(&page, &mut m);
    assert_eq!(key(&page, &mut m, Key::ArrowLeft), vec![Command::PreventDefault]);
    assert_eq!(m.state.focus_menu_index, Some(2));
    key(&page, &mut m, Key::ArrowRight);
    assert_eq!(m.state.focus_menu_index, Some(0));
    key(&page, &mut m, Key::ArrowRight);
    key(&page, &mut m, Key::ArrowRight);
    key(&page, &mut m, Key::ArrowRight);
    assert_eq!(m.state.focus_menu_index, Some(0));
    assert_eq!(m.state.opened_menu_index, None);
}

#[test]
fn arrows_outside_menu_mode_pass_through() {
    let page = Page::new(3);
    let mut m = Machine::default();
    click(&page, &mut m, 0);
    assert!(key(&page, &mut m, Key::ArrowRight).is_empty());
    assert_eq!(m.state.focus_menu_index, Some(0));
}

#[test]
fn arrow_down_opens_the_focused_item() {
    let page = Page::new(3);
    let mut m = Machine::default();
    alt_tap(&page, &mut m);
    key(&page, &mut m, Key::ArrowRight);
    let cmds = key(&page, &mut m, Key::ArrowDown);
    assert_eq!(
        cmds,
        vec![
            Command::PreventDefault,
            Command::Popup {
                index: 1,
                at: Point::new(6, 1)
            }
        ]
    );
}

#[test]
fn focus_moves_carry_the_open_dropdown() {
    let page = Page::new(3);
    let mut m = Machine::default();
    alt_tap(&page, &mut m);
    key(&page, &mut m, Key::ArrowDown);
    let cmds = key(&page, &mut m, Key::ArrowLeft);
    assert_eq!(
        cmds,
        vec![
            Command::PreventDefault,
            Command::Close(0),
            Command::Popup {
                index: 2,
                at: Point::new(12, 1)
            }
        ]
    );
    assert_eq!(m.state.opened_menu_index, Some(2));
    assert_eq!(m.state.focus_menu_index, Some(2));
}

#[test]
fn alt_tap_with_a_clicked_menu_moves_it_to_the_first_item() {
    let page = Page::new(3);
    let mut m = Machine::default();
    click(&page, &mut m, 2);
    let cmds = alt_tap(&page, &mut m);
    assert_eq!(
        cmds,
        vec![
            Command::Close(2),
            Command::Popup {
                index: 0,
                at: Point::new(0, 1)
            }
        ]
    );
}

#[test]
fn replacing_items_resets() {
    let page = Page::new(3);
    let mut m = Machine::default();
    click(&page, &mut m, 1);
    let cmds = run(&page, &mut m, Event::ItemsReplaced);
    assert_eq!(cmds, vec![Command::Close(1), Command::DisarmOutsideClick]);
    assert_eq!(m.state, MenuBarState::IDLE);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn event_strategy(count: usize) -> impl Strategy<Value = Event> {
    let idx = 0..count + 1;
    prop_oneof![
        idx.clone().prop_map(Event::LabelMouseDown),
        idx.clone().prop_map(Event::LabelClick),
        idx.clone().prop_map(Event::LabelOver),
        (0..30i32, 0..8i32).prop_map(|(x, y)| Event::DocumentMouseDown(Point::new(x, y))),
        prop_oneof![
            Just(Key::Alt),
            Just(Key::Escape),
            Just(Key::ArrowLeft),
            Just(Key::ArrowRight),
            Just(Key::ArrowDown),
            Just(Key::Tab),
        ]
        .prop_flat_map(|k| prop_oneof![
            Just(Event::KeyDown(KeyInput::plain(k))),
            Just(Event::KeyUp(KeyInput::plain(k))),
        ]),
        (idx, 0..4usize).prop_map(|(menu, entry)| Event::SubmenuItemClick { menu, entry }),
    ]
}

/// Tracks which controllers are open and how many outside-click hooks are
/// live while replaying commands.
#[derive(Default)]
struct Ledger {
    open: Vec<usize>,
    hooks: i32,
}

impl Ledger {
    fn apply(&mut self, cmds: &[Command]) {
        for cmd in cmds {
            match *cmd {
                Command::Close(i) => self.open.retain(|&o| o != i),
                Command::Popup { index, .. } => {
                    assert!(
                        self.open.iter().all(|&o| o == index),
                        "popup {index} while {:?} still open",
                        self.open
                    );
                    if !self.open.contains(&index) {
                        self.open.push(index);
                    }
                }
                Command::ArmOutsideClick => self.hooks += 1,
                Command::DisarmOutsideClick => self.hooks -= 1,
                Command::PreventDefault | Command::NotifyItemClick { .. } => {}
            }
        }
    }
}

proptest! {
    #[test]
    fn at_most_one_dropdown_and_paired_hooks(
        events in proptest::collection::vec(event_strategy(3), 0..60)
    ) {
        let page = Page::new(3);
        let mut m = Machine::default();
        let mut ledger = Ledger::default();
        for event in events {
            let cmds = run(&page, &mut m, event);
            ledger.apply(&cmds);
            prop_assert!(ledger.open.len() <= 1);
            prop_assert_eq!(ledger.open.first().copied(), m.state.opened_menu_index);
            prop_assert_eq!(ledger.hooks, i32::from(m.state.active));
            if let Some(i) = m.state.opened_menu_index {
                prop_assert!(i < 3);
            }
            if !m.state.active {
                prop_assert_eq!(m.state, MenuBarState::IDLE);
            }
        }
    }

    #[test]
    fn escape_always_lands_idle(
        events in proptest::collection::vec(event_strategy(3), 0..40)
    ) {
        let page = Page::new(3);
        let mut m = Machine::default();
        let mut ledger = Ledger::default();
        for event in events {
            ledger.apply(&run(&page, &mut m, event));
        }
        ledger.apply(&key(&page, &mut m, Key::Escape));
        prop_assert_eq!(m.state, MenuBarState::IDLE);
        prop_assert!(ledger.open.is_empty());
        prop_assert_eq!(ledger.hooks, 0);
    }

    #[test]
    fn arrow_right_cycles_back(count in 1usize..8, start in 0usize..8) {
        let page = Page::new(count);
        let mut m = Machine::default();
        alt_tap(&page, &mut m);
        for _ in 0..(start % count) {
            key(&page, &mut m, Key::ArrowRight);
        }
        let begin = m.state.focus_menu_index;
        for _ in 0..count {
            key(&page, &mut m, Key::ArrowRight);
        }
        prop_assert_eq!(m.state.focus_menu_index, begin);
        for _ in 0..(start % count) {
            key(&page, &mut m, Key::ArrowLeft);
        }
        prop_assert_eq!(m.state.focus_menu_index, Some(0));
        key(&page, &mut m, Key::ArrowLeft);
        prop_assert_eq!(m.state.focus_menu_index, Some(count - 1));
    }
}
