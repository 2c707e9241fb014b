//! Command Layer: operations invoked by keybindings.
//!
//! Every command here is the thing a `KeyAction` variant dispatches to
//! (see event.rs); none of them read X wire types, only the `WmState`
//! they are lent and the `DisplaySurface`/`Spawner` collaborators.

use log::{debug, info};

use crate::display::DisplaySurface;
use crate::event::Direction;
use crate::focus;
use crate::spawn::Spawner;
use crate::wm::WmState;

/// spawn(argv): hands off to the Spawner collaborator. The double-fork
/// and FD-closing dance lives entirely in `spawn::ForkSpawner`; the
/// command layer just forwards the argv carried as the keybinding
/// argument.
pub fn spawn(spawner: &dyn Spawner, argv: &[String]) {
    spawner.spawn(argv);
}

/// kill_curr: asks the focused client to close itself via WM_DELETE_WINDOW.
/// No forced XKillClient; an unresponsive client is a documented
/// limitation, not a recovered error.
pub fn kill_curr(state: &mut WmState, display: &mut dyn DisplaySurface) {
    if let Some(window) = state.workspaces.current().focused_window() {
        info!("kill_curr: sending WM_DELETE_WINDOW to {}", window);
        display.send_delete_window(window);
    }
}

/// change_workspace(idx): no-op if idx is already current. Unmaps the
/// outgoing workspace's clients, switches the live slot, maps the
/// incoming workspace's clients, then relayouts/refocuses/repaints.
pub fn change_workspace(state: &mut WmState, display: &mut dyn DisplaySurface, idx: usize) {
    let current = state.workspaces.current_index();
    if idx == current {
        return;
    }
    debug!("change_workspace: {} -> {}", current, idx);
    for window in state.workspaces.current().windows() {
        display.unmap(window);
    }
    state.workspaces.save(current);
    state.workspaces.load(idx);
    state.monitors.selected_mut().active_workspace = idx;
    for window in state.workspaces.current().windows() {
        display.map(window);
    }
    state.relayout_selected(display);
    state.refocus_selected(display);
    state.repaint_bar(display, state.monitors.selected_index());
}

/// client_to_workspace(idx): no-op if idx is current or nothing is
/// focused. Appends the focused window to workspace idx and removes it
/// from the current one; since idx != current the window is unmapped
/// (it is no longer visible) the moment the current workspace relayouts.
pub fn client_to_workspace(state: &mut WmState, display: &mut dyn DisplaySurface, idx: usize) {
    let current = state.workspaces.current_index();
    if idx == current {
        return;
    }
    let Some(window) = state.workspaces.current().focused_window() else {
        return;
    };
    info!("client_to_workspace: moving {} to workspace {}", window, idx);
    state.workspaces.get_mut(idx).append(window);
    state.workspaces.current_mut().remove(window);
    display.unmap(window);
    state.relayout_selected(display);
    state.refocus_selected(display);
}

/// move_focus: dispatches to the Focus Controller's four cycling
/// operations, then refocuses to reflect the new cursor.
pub fn move_focus(state: &mut WmState, display: &mut dyn DisplaySurface, dir: Direction) {
    let ws = state.workspaces.current_mut();
    match dir {
        Direction::Left => focus::move_left(ws),
        Direction::Right => focus::move_right(ws),
        Direction::Up => focus::move_up(ws),
        Direction::Down => focus::move_down(ws),
    }
    state.refocus_selected(display);
}

/// swap_with_master, exposed as a command for the keybinding that
/// triggers it directly.
pub fn swap_master(state: &mut WmState, display: &mut dyn DisplaySurface) {
    focus::swap_with_master(state.workspaces.current_mut());
    state.relayout_selected(display);
    state.refocus_selected(display);
}

/// focus_next_monitor: advances the selected monitor, rebinds the
/// workspace table's live slot to that monitor's own active workspace
/// (the table is shared across monitors, so "current" has to track
/// whichever monitor is selected), then relayouts, refocuses and repaints
/// bars to reflect the new selection.
pub fn focus_next_monitor(state: &mut WmState, display: &mut dyn DisplaySurface) {
    if state.monitors.focus_next() {
        state.workspaces.load(state.monitors.selected().active_workspace);
        state.relayout_selected(display);
        state.refocus_selected(display);
        for index in 0..state.monitors.len() {
            state.repaint_bar(display, index);
        }
    }
}

/// quit: two-phase shutdown latch. First call broadcasts WM_DELETE_WINDOW
/// to every root child and moves RUNNING -> DRAINING; if the child set is
/// already empty it moves straight to STOPPED. Subsequent calls are
/// no-ops.
pub fn quit(state: &mut WmState, display: &mut dyn DisplaySurface) {
    state.begin_quit(display);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::display::{OutputInfo, Rect, WindowId};
    use crate::mock::MockDisplay;

    fn setup() -> (WmState, MockDisplay) {
        let mut display = MockDisplay::new();
        display.set_outputs(vec![OutputInfo { rect: Rect::new(0, 0, 1920, 1080) }]);
        let state = WmState::new(&mut display, Config::defaults());
        (state, display)
    }

    #[test]
    fn change_workspace_noop_when_already_current() {
        let (mut state, mut display) = setup();
        state.workspaces.current_mut().append(WindowId(1));
        let unmaps_before = display.unmap_calls().len();
        change_workspace(&mut state, &mut display, 0);
        assert_eq!(display.unmap_calls().len(), unmaps_before);
    }

    #[test]
    fn change_workspace_unmaps_old_maps_new() {
        let (mut state, mut display) = setup();
        state.workspaces.current_mut().append(WindowId(1));
        change_workspace(&mut state, &mut display, 2);
        assert!(display.unmap_calls().contains(&WindowId(1)));
        assert_eq!(state.workspaces.current_index(), 2);
        assert!(state.workspaces.get(2).is_empty());
        assert_eq!(state.workspaces.get(0).windows(), vec![WindowId(1)]);
    }

    #[test]
    fn round_trip_change_workspace_preserves_state() {
        let (mut state, mut display) = setup();
        state.workspaces.current_mut().append(WindowId(1));
        state.workspaces.current_mut().append(WindowId(2));
        let windows_before = state.workspaces.current().windows();
        let focus_before = state.workspaces.current().focused_window();

        change_workspace(&mut state, &mut display, 3);
        change_workspace(&mut state, &mut display, 0);

        assert_eq!(state.workspaces.current().windows(), windows_before);
        assert_eq!(state.workspaces.current().focused_window(), focus_before);
    }

    #[test]
    fn client_to_workspace_moves_focused_window_and_unmaps_it() {
        let (mut state, mut display) = setup();
        state.workspaces.current_mut().append(WindowId(1));
        state.workspaces.current_mut().append(WindowId(2));
        client_to_workspace(&mut state, &mut display, 5);
        assert_eq!(state.workspaces.current().windows(), vec![WindowId(1)]);
        assert_eq!(state.workspaces.get(5).windows(), vec![WindowId(2)]);
        assert!(display.unmap_calls().contains(&WindowId(2)));
    }

    #[test]
    fn client_to_workspace_noop_when_nothing_focused() {
        let (mut state, mut display) = setup();
        client_to_workspace(&mut state, &mut display, 5);
        assert!(state.workspaces.get(5).is_empty());
    }

    #[test]
    fn client_to_workspace_noop_when_idx_is_current() {
        let (mut state, mut display) = setup();
        state.workspaces.current_mut().append(WindowId(1));
        client_to_workspace(&mut state, &mut display, 0);
        assert_eq!(state.workspaces.current().windows(), vec![WindowId(1)]);
    }

    #[test]
    fn kill_curr_sends_delete_window_to_focused_only() {
        let (mut state, mut display) = setup();
        state.workspaces.current_mut().append(WindowId(1));
        state.workspaces.current_mut().append(WindowId(2));
        kill_curr(&mut state, &mut display);
        assert_eq!(display.delete_window_calls(), vec![WindowId(2)]);
    }

    #[test]
    fn quit_broadcasts_delete_window_to_root_children() {
        let (mut state, mut display) = setup();
        display.add_root_child(WindowId(1));
        display.add_root_child(WindowId(2));
        quit(&mut state, &mut display);
        assert_eq!(display.delete_window_calls(), vec![WindowId(1), WindowId(2)]);
        assert!(!state.is_stopped());
    }

    #[test]
    fn quit_with_no_children_stops_immediately() {
        let (mut state, mut display) = setup();
        quit(&mut state, &mut display);
        assert!(state.is_stopped());
    }

    #[test]
    fn focus_next_monitor_rebinds_the_workspace_table_to_the_new_monitors_workspace() {
        let mut display = MockDisplay::new();
        display.set_outputs(vec![
            OutputInfo { rect: Rect::new(0, 0, 1920, 1080) },
            OutputInfo { rect: Rect::new(1920, 0, 1920, 1080) },
        ]);
        let mut state = WmState::new(&mut display, Config::defaults());

        // Monitor 0 switches to workspace 3; monitor 1 stays on its
        // default workspace 0.
        change_workspace(&mut state, &mut display, 3);
        state.workspaces.current_mut().append(WindowId(1));

        focus_next_monitor(&mut state, &mut display);

        assert_eq!(state.monitors.selected_index(), 1);
        assert_eq!(state.workspaces.current_index(), 0);
        assert!(state.workspaces.current().is_empty());
    }
}
