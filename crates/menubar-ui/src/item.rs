use std::ops::Deref;
use std::rc::Rc;

/// One entry of a dropdown submenu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MenuEntry {
    /// Display text, `&` marks the access key.
    pub label: String,
    /// Shortcut hint shown right-aligned, e.g. `Ctrl+S`.
    pub accelerator: Option<String>,
    pub disabled: bool,
    /// Draw a divider line instead of a label.
    pub separator: bool,
}

impl MenuEntry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn separator() -> Self {
        Self {
            separator: true,
            ..Self::default()
        }
    }

    pub fn with_accelerator(mut self, accelerator: impl Into<String>) -> Self {
        self.accelerator = Some(accelerator.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Whether the entry can be highlighted and invoked.
    #[inline]
    pub fn is_selectable(&self) -> bool {
        !self.disabled && !self.separator
    }
}

/// A top-level menu: a label on the bar plus its submenu entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct MenuItem {
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub submenu: Vec<MenuEntry>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, submenu: Vec<MenuEntry>) -> Self {
        Self {
            label: label.into(),
            submenu,
        }
    }
}

/// The ordered sequence of top-level menus handed to a menu bar.
///
/// Cloning is cheap and keeps the identity. Two `MenuItems` built
/// separately are different sequences even when their content is equal,
/// and replacing one with the other rebuilds every submenu.
#[derive(Debug, Clone)]
pub struct MenuItems(Rc<[MenuItem]>);

impl MenuItems {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self(items.into())
    }

    /// Whether both handles point at the same sequence.
    #[inline]
    pub fn same_identity(&self, other: &MenuItems) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for MenuItems {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<MenuItem>> for MenuItems {
    fn from(items: Vec<MenuItem>) -> Self {
        Self::new(items)
    }
}

impl Deref for MenuItems {
    type Target = [MenuItem];

    fn deref(&self) -> &[MenuItem] {
        &self.0
    }
}

/// A submenu entry chosen by the user, passed to the host's click handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemClick {
    /// Index of the top-level menu.
    pub menu: usize,
    /// Index of the entry within that menu's submenu.
    pub entry: usize,
    pub label: String,
}
