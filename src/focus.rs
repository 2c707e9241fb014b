//! Focus Controller.
//!
//! `update` is the only operation that talks to the Display Surface; the
//! cycling operations just move the workspace's focus cursor and leave
//! painting borders / directing keyboard focus to the next `update` call
//! the caller issues (handlers call both in sequence).
//!
//! All operations are no-ops when focused is `None`.

use crate::display::{Color, DisplaySurface};
use crate::workspace::Workspace;

pub const FOCUS_BORDER_WIDTH: u32 = 5;

/// update(): paints borders, raises and directs keyboard focus to the
/// focused client; unfocused clients get the unfocus border color only.
pub fn update(display: &mut dyn DisplaySurface, workspace: &Workspace, focus: Color, unfocus: Color) {
    let focused = workspace.focused_window();
    for window in workspace.windows() {
        if Some(window) == focused {
            display.set_border_width(window, FOCUS_BORDER_WIDTH);
            display.set_border_color(window, focus);
            display.raise(window);
            display.set_input_focus(window);
        } else {
            display.set_border_color(window, unfocus);
        }
    }
}

/// cycle_first (move_left): focused := head.
pub fn move_left(ws: &mut Workspace) {
    if ws.focused_index().is_none() {
        return;
    }
    ws.set_focused_index(Some(0));
}

/// cycle_to_stack (move_right): master -> first stack client, else no-op.
pub fn move_right(ws: &mut Workspace) {
    if ws.focused_index() == Some(0) && ws.len() > 1 {
        ws.set_focused_index(Some(1));
    }
}

/// cycle_prev (move_up): focused != head -> focused.prev, else no-op.
pub fn move_up(ws: &mut Workspace) {
    if let Some(i) = ws.focused_index() {
        if i > 0 {
            ws.set_focused_index(Some(i - 1));
        }
    }
}

/// cycle_next (move_down): focused.next if it exists, else no-op.
pub fn move_down(ws: &mut Workspace) {
    if let Some(i) = ws.focused_index() {
        if i + 1 < ws.len() {
            ws.set_focused_index(Some(i + 1));
        }
    }
}

/// swap_with_master: swaps window handles of head and focused, not the
/// nodes; refocuses the (now-master) slot. No-op when focused is null or
/// already master.
pub fn swap_with_master(ws: &mut Workspace) {
    if let Some(i) = ws.focused_index() {
        ws.swap_to_master(i);
    }
}
