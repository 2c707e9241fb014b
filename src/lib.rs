//! stackwm: a reparenting-free, non-compositing tiling window manager
//! core for X11. The library crate holds the whole window-management
//! state machine and is independently testable against a `MockDisplay`,
//! without an X server; `src/bin/main.rs` wires it to a real X11
//! connection.

#[macro_use]
extern crate log;

pub mod bar;
pub mod client;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod focus;
pub mod keys;
pub mod layout;
pub mod monitor;
pub mod spawn;
pub mod workspace;
pub mod wm;

#[cfg(test)]
mod mock;
