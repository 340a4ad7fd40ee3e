//! The dropdown side of the menu bar: the controller interface the bar
//! drives, and the options each controller is created with.

use menubar_core::{Point, Style};

use crate::item::MenuEntry;

/// Where dropdowns sit relative to their label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Placement {
    /// Attached to the underside of the bar.
    #[default]
    Bottom,
    /// Free-standing, like a context menu.
    Floating,
}

/// Visual style shared by every dropdown of one bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmenuStyle {
    pub frame: Style,
    pub entry: Style,
    pub active: Style,
    pub disabled: Style,
    pub accelerator: Style,
    /// Rounded corners on the frame.
    pub rounded: bool,
    /// Square the two top corners even when `rounded` is set.
    pub square_top: bool,
    /// Rows left empty between the anchor and the frame.
    pub margin_top: i32,
    /// Minimum frame width in columns.
    pub min_width: i32,
}

impl Default for SubmenuStyle {
    fn default() -> Self {
        Self {
            frame: Style::default(),
            entry: Style::default(),
            active: Style::default().with_attrs(menubar_core::AttrMask::REVERSE),
            disabled: Style::default().with_attrs(menubar_core::AttrMask::DIM),
            accelerator: Style::default().with_attrs(menubar_core::AttrMask::DIM),
            rounded: true,
            square_top: false,
            margin_top: 1,
            min_width: 12,
        }
    }
}

impl SubmenuStyle {
    /// Adjust the style for `placement`: a bottom-placed dropdown joins the
    /// bar flush, with squared top corners.
    pub fn for_placement(mut self, placement: Placement) -> Self {
        if placement == Placement::Bottom {
            self.square_top = true;
            self.margin_top = 0;
        }
        self
    }
}

/// What a controller is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmenuOptions {
    /// `menu-{index}` of the top-level item it belongs to.
    pub id: String,
    pub style: SubmenuStyle,
    pub placement: Placement,
}

/// Control surface of one dropdown.
///
/// Implementations must tolerate repeated calls: `set_menu` with the same
/// entries, `popup` while already open (reposition), and `close` while
/// closed are all allowed.
pub trait SubmenuController {
    /// Replace the displayed entries.
    fn set_menu(&mut self, entries: &[MenuEntry]);

    /// Show the dropdown with its top-left corner at the page-absolute `at`.
    fn popup(&mut self, at: Point);

    /// Hide the dropdown.
    fn close(&mut self);

    /// Whether the page-absolute `p` lies in the dropdown's rendered region.
    fn contains(&self, p: Point) -> bool;
}

/// Creates one controller per top-level item.
pub trait SubmenuFactory<C> {
    fn create(&mut self, options: SubmenuOptions) -> C;
}

impl<C, F> SubmenuFactory<C> for F
where
    F: FnMut(SubmenuOptions) -> C,
{
    fn create(&mut self, options: SubmenuOptions) -> C {
        self(options)
    }
}
