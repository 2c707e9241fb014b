//! Workspace Table, and the Workspace type.
//!
//! Workspaces are modeled as **global**: a single `WorkspaceTable` of ten
//! slots is shared by every monitor, and `current` always equals the
//! selected monitor's `active_workspace` field at any quiescent moment.
//! Under that model `save`/`load` degenerate to trivial operations: the
//! "live" pair already *is* `slots[current]`, and there is no separate
//! scratch copy to shuttle data through. Both are kept as named
//! operations so the component boundary stays visible at the call site.

use crate::client::ClientList;
use crate::display::WindowId;

pub const WORKSPACE_COUNT: usize = 10;

/// An ordered list of Clients with a focus cursor.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    list: ClientList,
    /// Index into `list`. Invariant: `Some(i)` only if `i` is a valid
    /// index into `list`; `None` iff `list` is empty.
    focused: Option<usize>,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace {
            list: ClientList::new(),
            focused: None,
        }
    }

    pub fn list(&self) -> &ClientList {
        &self.list
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn set_focused_index(&mut self, index: Option<usize>) {
        debug_assert!(match index {
            None => self.list.is_empty(),
            Some(i) => i < self.list.len(),
        });
        self.focused = index;
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.focused.and_then(|i| self.list.get(i)).map(|c| c.window)
    }

    pub fn master_window(&self) -> Option<WindowId> {
        self.list.master_index().and_then(|i| self.list.get(i)).map(|c| c.window)
    }

    pub fn windows(&self) -> Vec<WindowId> {
        self.list.iter().map(|c| c.window).collect()
    }

    /// append(list, window): new node becomes focused.
    pub fn append(&mut self, window: WindowId) {
        let idx = self.list.append(window);
        self.focused = Some(idx);
    }

    /// remove(list, window): post-condition is the previous node if
    /// present, else the next one, else null. Returns whether a node was
    /// removed.
    pub fn remove(&mut self, window: WindowId) -> bool {
        let idx = match self.list.find(window) {
            Some(i) => i,
            None => return false,
        };
        self.list.remove_at(idx);
        self.focused = match self.focused {
            None => None,
            Some(f) if f < idx => Some(f),
            Some(f) if f > idx => Some(f - 1),
            Some(_) => {
                // f == idx: the removed node was focused.
                if idx > 0 {
                    Some(idx - 1)
                } else if !self.list.is_empty() {
                    Some(0)
                } else {
                    None
                }
            }
        };
        true
    }

    /// swap_with_master: swaps the window handles of head and `index`, not
    /// the nodes themselves, and refocuses the (now-master) node.
    pub fn swap_to_master(&mut self, index: usize) {
        if index == 0 {
            return;
        }
        if self.list.get(index).is_none() || self.list.get(0).is_none() {
            return;
        }
        let master_window = self.list.get(0).unwrap().window;
        let other_window = self.list.get(index).unwrap().window;
        self.list.get_mut(0).unwrap().window = other_window;
        self.list.get_mut(index).unwrap().window = master_window;
        self.focused = Some(0);
    }
}

/// A single Workspace Table of length 10, shared across all monitors.
/// `current` is the index of the slot presently considered "live" by
/// handlers, kept in lockstep with the selected monitor's
/// `active_workspace` field.
#[derive(Debug)]
pub struct WorkspaceTable {
    slots: [Workspace; WORKSPACE_COUNT],
    current: usize,
}

impl WorkspaceTable {
    pub fn new() -> Self {
        WorkspaceTable {
            slots: std::array::from_fn(|_| Workspace::new()),
            current: 0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Workspace {
        &self.slots[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Workspace {
        &mut self.slots[self.current]
    }

    pub fn get(&self, idx: usize) -> &Workspace {
        &self.slots[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut Workspace {
        &mut self.slots[idx]
    }

    /// save(idx): copies the live pair into slot `idx`. Under the global
    /// model `idx` is always `self.current` at the moment this is called,
    /// so there is nothing to copy; the call exists to keep the component
    /// boundary visible and to make the no-op assumption an explicit,
    /// checked one rather than silent.
    pub fn save(&mut self, idx: usize) {
        debug_assert_eq!(idx, self.current);
    }

    /// load(idx): the inverse of `save`, and sets the active workspace to
    /// `idx`.
    pub fn load(&mut self, idx: usize) {
        self.current = idx;
    }

    /// Which slot (if any) holds `window`. Used by DestroyNotify and
    /// MapRequest's membership pre-check: under the global model a
    /// client moved by `client_to_workspace` can be managed on a slot
    /// other than `current`, so membership has to be checked across all
    /// ten rather than just the live one.
    pub fn contains(&self, window: WindowId) -> Option<usize> {
        self.slots.iter().position(|ws| ws.list.contains(window))
    }
}

impl Default for WorkspaceTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(n: u64) -> WindowId {
        WindowId(n)
    }

    #[test]
    fn focus_membership_after_append() {
        let mut ws = Workspace::new();
        ws.append(w(1));
        assert_eq!(ws.focused_window(), Some(w(1)));
        ws.append(w(2));
        assert_eq!(ws.focused_window(), Some(w(2)));
    }

    #[test]
    fn remove_focused_falls_back_to_previous() {
        let mut ws = Workspace::new();
        ws.append(w(1));
        ws.append(w(2));
        ws.append(w(3));
        // focused = w(3) (index 2)
        ws.remove(w(3));
        assert_eq!(ws.focused_window(), Some(w(2)));
    }

    #[test]
    fn remove_focused_master_falls_back_to_next() {
        let mut ws = Workspace::new();
        ws.append(w(1));
        ws.append(w(2));
        ws.set_focused_index(Some(0));
        ws.remove(w(1));
        assert_eq!(ws.focused_window(), Some(w(2)));
    }

    #[test]
    fn remove_last_client_leaves_focus_null() {
        let mut ws = Workspace::new();
        ws.append(w(1));
        ws.remove(w(1));
        assert!(ws.is_empty());
        assert_eq!(ws.focused_window(), None);
    }

    #[test]
    fn remove_nonfocused_before_focused_shifts_cursor() {
        let mut ws = Workspace::new();
        ws.append(w(1));
        ws.append(w(2));
        ws.append(w(3));
        ws.set_focused_index(Some(2)); // w(3)
        ws.remove(w(1));
        assert_eq!(ws.focused_window(), Some(w(3)));
    }

    #[test]
    fn swap_with_master_exchanges_handles_not_nodes() {
        let mut ws = Workspace::new();
        ws.append(w(1));
        ws.append(w(2));
        ws.append(w(3));
        ws.swap_to_master(2);
        assert_eq!(ws.windows(), vec![w(3), w(2), w(1)]);
        assert_eq!(ws.focused_window(), Some(w(3)));
    }

    #[test]
    fn round_trip_workspace_switch_preserves_state() {
        let mut table = WorkspaceTable::new();
        table.current_mut().append(w(1));
        table.current_mut().append(w(2));
        let head_before = table.current().master_window();
        let focus_before = table.current().focused_window();
        let windows_before = table.current().windows();

        table.save(0);
        table.load(2);
        table.save(2);
        table.load(0);

        assert_eq!(table.current().master_window(), head_before);
        assert_eq!(table.current().focused_window(), focus_before);
        assert_eq!(table.current().windows(), windows_before);
    }
}
