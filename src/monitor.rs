//! Monitor Set.
//!
//! Held as a `Vec<Monitor>` rather than a linked list of siblings, for the
//! same reason `ClientList` is a `Vec`: the element count is small (one
//! output per physical display) and a dense vector removes a
//! pointer-chasing hazard for no real cost. The "next sibling"
//! relationship becomes "next index, wrapping", used by
//! `focus_next_monitor`.

use crate::display::{DisplaySurface, OutputInfo, Rect, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    pub rect: Rect,
    pub is_primary: bool,
    pub bar: WindowId,
    pub active_workspace: usize,
}

impl Monitor {
    pub fn new(rect: Rect, is_primary: bool, bar: WindowId) -> Self {
        Monitor {
            rect,
            is_primary,
            bar,
            active_workspace: 0,
        }
    }

    /// Does this monitor's rectangle contain the given point?
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.rect.x
            && x < self.rect.x + self.rect.width as i32
            && y >= self.rect.y
            && y < self.rect.y + self.rect.height as i32
    }
}

#[derive(Debug)]
pub struct MonitorSet {
    monitors: Vec<Monitor>,
    selected: usize,
}

impl MonitorSet {
    /// discover(): enumerates connected outputs with an active CRTC; the
    /// first discovered becomes primary and selected. If RandR yields
    /// none, a single synthetic monitor equal to the root geometry is
    /// created instead.
    pub fn discover(display: &mut dyn DisplaySurface, root_rect: Rect) -> Self {
        let outputs = display.query_outputs();
        let monitors: Vec<Monitor> = if outputs.is_empty() {
            vec![Monitor::new(root_rect, true, display.create_bar(bar_rect(root_rect)))]
        } else {
            outputs
                .into_iter()
                .enumerate()
                .map(|(i, out)| Monitor::new(out.rect, i == 0, display.create_bar(bar_rect(out.rect))))
                .collect()
        };
        MonitorSet {
            monitors,
            selected: 0,
        }
    }

    pub fn selected(&self) -> &Monitor {
        &self.monitors[self.selected]
    }

    pub fn selected_mut(&mut self) -> &mut Monitor {
        &mut self.monitors[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn iter(&self) -> impl Iterator<Item = &Monitor> {
        self.monitors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Monitor> {
        self.monitors.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// monitor_for(window): the selected monitor for the root window;
    /// otherwise the monitor whose rectangle contains the window's
    /// origin; falls back to selected. Asks the Display Surface for the
    /// window's actual origin rather than relying on uninitialized
    /// coordinates.
    pub fn monitor_for(&self, display: &dyn DisplaySurface, root: WindowId, window: WindowId) -> usize {
        if window == root {
            return self.selected;
        }
        if let Some((x, y)) = display.window_origin(window) {
            if let Some(idx) = self.monitors.iter().position(|m| m.contains(x, y)) {
                return idx;
            }
        }
        self.selected
    }

    /// focus(m): if m != selected, selects it. Returns whether the
    /// selection actually changed (callers use this to decide whether to
    /// trigger a Focus Controller update and Bar repaint).
    pub fn focus(&mut self, index: usize) -> bool {
        if index == self.selected {
            return false;
        }
        self.selected = index;
        true
    }

    /// focus_next_monitor: advances selected monitor to its successor, if
    /// any. With monitors as a dense vector this always succeeds when
    /// there is more than one monitor; wrapping to the first past the
    /// last mirrors a "next sibling" traversal restarting at the list
    /// head.
    pub fn focus_next(&mut self) -> bool {
        if self.monitors.len() <= 1 {
            return false;
        }
        let next = (self.selected + 1) % self.monitors.len();
        self.focus(next)
    }
}

fn bar_rect(monitor_rect: Rect) -> Rect {
    Rect::new(monitor_rect.x, monitor_rect.y, monitor_rect.width, crate::layout::BAR_HEIGHT)
}
