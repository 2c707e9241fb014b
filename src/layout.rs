//! Layout Engine.
//!
//! Pure function of a monitor's rectangle and its active client list onto a
//! sequence of `move_resize` calls. Holds no state of its own and issues no
//! calls when the list is empty.
//!
//! The single-window branch uses the monitor parameter `m` throughout;
//! geometry for a given monitor is always derived from that monitor's own
//! rectangle, never the selected monitor's, even when tiling a
//! non-selected one.

use crate::display::{DisplaySurface, Rect, WindowId};
use crate::monitor::Monitor;

pub const GAP: i32 = 10;
pub const BAR_HEIGHT: u32 = 20;
pub const MASTER_FRACTION: f64 = 0.55;

/// Computes and applies tile geometry for `monitor`'s `windows` (master
/// first, stack in insertion order).
pub fn apply(display: &mut dyn DisplaySurface, monitor: &Monitor, windows: &[WindowId]) {
    if windows.is_empty() {
        return;
    }

    let m = monitor.rect;
    let top = m.y + BAR_HEIGHT as i32 + GAP;
    let left = m.x + GAP;

    if windows.len() == 1 {
        let width = (m.width as i32 - 3 * GAP).max(0) as u32;
        let height = (m.height as i32 - 3 * GAP - BAR_HEIGHT as i32).max(0) as u32;
        display.move_resize(windows[0], Rect::new(left, top, width, height));
        return;
    }

    let master_width = (MASTER_FRACTION * m.width as f64).floor() as i32;
    let master_height = (m.height as i32 - 2 * GAP - BAR_HEIGHT as i32).max(0) as u32;
    display.move_resize(windows[0], Rect::new(left, top, master_width.max(0) as u32, master_height));

    let stack = &windows[1..];
    let n = stack.len() as i32;
    let stack_width = (m.width as i32 - master_width - 5 * GAP).max(0) as u32;
    let row_height = m.height as i32 / n;
    let stack_height = (row_height - 2 * GAP).max(0) as u32;
    let stack_x = m.x + master_width + 3 * GAP;

    let mut y = top;
    for &window in stack {
        display.move_resize(window, Rect::new(stack_x, y, stack_width, stack_height));
        y += row_height;
    }
}
