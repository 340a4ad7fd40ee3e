//! **menubar-core**: primitives shared by the menubar crates.
//!
//! Geometry, styled cells, a shared-buffer grid, input messages, the
//! process-wide input hook registry, and the Elm-architecture application
//! loop that drivers and widgets plug into.

pub mod app;
pub mod geom;
pub mod grid;
pub mod hooks;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model};
pub use geom::{Point, Rect};
pub use grid::{Frame, FrameCell, Grid};
pub use hooks::{Hook, HookRegistry, SharedHooks};
pub use messages::*;
pub use style::{AttrMask, Cell, Color, Style};
