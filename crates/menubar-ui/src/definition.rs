//! Menu bars described in TOML.
//!
//! ```toml
//! alt_navigation = true
//! placement = "bottom"
//!
//! [[menu]]
//! label = "&File"
//!
//! [[menu.submenu]]
//! label = "&Save"
//! accelerator = "Ctrl+S"
//!
//! [[menu.submenu]]
//! separator = true
//! ```

use serde::Deserialize;
use thiserror::Error;

use crate::item::{MenuItem, MenuItems};
use crate::menubar::MenuBarConfig;
use crate::submenu::Placement;

/// Errors from loading a [`MenuDefinition`].
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The document is not valid TOML or does not match the schema.
    #[error("menu definition parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A top-level menu has no label.
    #[error("menu {index} has an empty label")]
    EmptyLabel { index: usize },

    /// A submenu entry that is not a separator has no label.
    #[error("entry {entry} of menu {menu} has an empty label")]
    EmptyEntryLabel { menu: usize, entry: usize },
}

/// A whole bar as read from a document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuDefinition {
    #[serde(default = "default_alt_navigation")]
    pub alt_navigation: bool,
    #[serde(default)]
    pub placement: Placement,
    #[serde(rename = "menu", default)]
    pub items: Vec<MenuItem>,
}

fn default_alt_navigation() -> bool {
    true
}

impl MenuDefinition {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, DefinitionError> {
        let def: Self = toml::from_str(s)?;
        def.validate()?;
        log::debug!("menubar: loaded definition with {} menus", def.items.len());
        Ok(def)
    }

    fn validate(&self) -> Result<(), DefinitionError> {
        for (index, item) in self.items.iter().enumerate() {
            if item.label.trim().is_empty() {
                return Err(DefinitionError::EmptyLabel { index });
            }
            if let Some(entry) = item
                .submenu
                .iter()
                .position(|e| !e.separator && e.label.trim().is_empty())
            {
                return Err(DefinitionError::EmptyEntryLabel { menu: index, entry });
            }
        }
        Ok(())
    }

    /// A bar configuration with these items and switches, default styles.
    pub fn into_config(self) -> MenuBarConfig {
        MenuBarConfig {
            items: MenuItems::new(self.items),
            placement: self.placement,
            alt_navigation: self.alt_navigation,
            ..MenuBarConfig::default()
        }
    }
}
