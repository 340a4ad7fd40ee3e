//! Menu bar widget: a row of labels, each revealing a dropdown submenu.
//!
//! The interaction rules live in [`state`] as a pure transition function;
//! [`MenuBar`] wraps it with lifecycle, hook registration, command execution
//! and drawing. Dropdowns are reached through the [`SubmenuController`]
//! trait; [`ContextMenu`] is the terminal implementation.

mod context_menu;
#[cfg(feature = "definitions")]
mod definition;
mod item;
mod layout;
mod menubar;
mod mnemonic;
pub mod state;
mod submenu;

pub use context_menu::{ContextMenu, ContextMenuAction};
#[cfg(feature = "definitions")]
pub use definition::{DefinitionError, MenuDefinition};
pub use item::{ItemClick, MenuEntry, MenuItem, MenuItems};
pub use layout::LabelLayout;
pub use menubar::{BarStyle, MenuBar, MenuBarConfig, Response};
pub use mnemonic::Mnemonic;
pub use state::{KeyFingerprint, KeyInput, MenuBarState, Phase};
pub use submenu::{Placement, SubmenuController, SubmenuFactory, SubmenuOptions, SubmenuStyle};
