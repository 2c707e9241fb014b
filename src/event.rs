//! Keybinding schema and Event Dispatcher.
//!
//! The dispatcher is a pure match over `Event` (already translated out of
//! X wire types by the Display Surface) that mutates the `WmState` it is
//! lent for the one dispatch, then asks the layout, focus and bar modules
//! to reconcile visible state; never the other way around.

use log::{debug, info, trace};

use crate::command;
use crate::display::{DisplaySurface, Event, KeyPress};
use crate::spawn::Spawner;
use crate::wm::WmState;

/// One keybinding action: a proper sum type over the argv-vs-workspace-
/// index argument shapes; handlers match variants instead of branching on
/// a raw union tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Spawn(Vec<String>),
    Kill,
    Quit,
    ChangeWorkspace(usize),
    ClientToWorkspace(usize),
    MoveFocus(Direction),
    SwapMaster,
    FocusNextMonitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// One entry in the (build-time) keybinding table: modifier mask, keysym,
/// action and argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub modmask: u32,
    pub keysym: u64,
    pub action: KeyAction,
}

/// Pulls one event and routes it to the appropriate handler, mutating
/// `state` and issuing whatever Display Surface calls that handler
/// implies. Returns after handling exactly one event (the caller's loop
/// calls this once per `next_event`).
pub fn dispatch(
    state: &mut WmState,
    display: &mut dyn DisplaySurface,
    spawner: &dyn Spawner,
    bindings: &[KeyBinding],
    event: Event,
) {
    trace!("dispatch: {:?}", event);
    match event {
        Event::KeyPress(key) => on_key_press(state, display, spawner, bindings, key),
        Event::MapRequest(window) => on_map_request(state, display, window),
        Event::DestroyNotify(window) | Event::ClientDestroyed(window) => {
            on_destroy_notify(state, display, window)
        }
        Event::EnterNotify(window) => on_enter_notify(state, display, window),
        Event::ConfigureRequest(req) => {
            debug!("ConfigureRequest for {:?}: honoring verbatim", req.window);
            display.configure(&req);
        }
        Event::ConfigureNotify => {
            trace!("ConfigureNotify ignored (monitor hot-plug is a non-goal)");
        }
        Event::Expose { window, count } => {
            if count == 0 {
                on_expose(state, display, window);
            }
        }
    }
}

/// KeyPress: look up the keycode's resolved keysym + modmask in the
/// binding table; the first match wins; unknown combinations are ignored.
fn on_key_press(
    state: &mut WmState,
    display: &mut dyn DisplaySurface,
    spawner: &dyn Spawner,
    bindings: &[KeyBinding],
    key: KeyPress,
) {
    let binding = bindings
        .iter()
        .find(|b| b.modmask == key.modmask && b.keysym == key.keysym);
    let Some(binding) = binding else {
        trace!("KeyPress {:?}: no matching binding", key);
        return;
    };
    info!("KeyPress {:?} -> {:?}", key, binding.action);
    match &binding.action {
        KeyAction::Spawn(argv) => command::spawn(spawner, argv),
        KeyAction::Kill => command::kill_curr(state, display),
        KeyAction::Quit => command::quit(state, display),
        KeyAction::ChangeWorkspace(idx) => command::change_workspace(state, display, *idx),
        KeyAction::ClientToWorkspace(idx) => command::client_to_workspace(state, display, *idx),
        KeyAction::MoveFocus(dir) => command::move_focus(state, display, *dir),
        KeyAction::SwapMaster => command::swap_master(state, display),
        KeyAction::FocusNextMonitor => command::focus_next_monitor(state, display),
    }
}

/// MapRequest: already-managed windows are just mapped; new windows are
/// appended, mapped, subscribed to EnterNotify, then laid out and
/// focused.
fn on_map_request(state: &mut WmState, display: &mut dyn DisplaySurface, window: crate::display::WindowId) {
    if state.workspaces.contains(window).is_some() {
        display.map(window);
        return;
    }
    info!("MapRequest: managing new window {}", window);
    state.workspaces.current_mut().append(window);
    display.map(window);
    display.select_enter_events(window);
    state.relayout_selected(display);
    state.refocus_selected(display);
}

/// DestroyNotify: ignored for windows nobody tracks; otherwise removed
/// from whichever workspace holds it (not necessarily the current one;
/// `client_to_workspace` can leave a client managed on a workspace that
/// isn't selected) and, if that was the visible workspace, relaid out and
/// refocused. Feeds the quit drain (the two-phase shutdown).
fn on_destroy_notify(state: &mut WmState, display: &mut dyn DisplaySurface, window: crate::display::WindowId) {
    let Some(idx) = state.workspaces.contains(window) else {
        trace!("DestroyNotify for unmanaged window {}: ignored", window);
        return;
    };
    debug!("DestroyNotify: removing {} from workspace {}", window, idx);
    state.workspaces.get_mut(idx).remove(window);
    if idx == state.workspaces.current_index() {
        state.relayout_selected(display);
        state.refocus_selected(display);
    }
    state.note_client_destroyed(display);
}

/// EnterNotify: root is ignored; a managed client in the live workspace
/// becomes focused and is refocused. Does not switch monitors:
/// `monitor_for` is used only for geometry lookups, never here.
fn on_enter_notify(state: &mut WmState, display: &mut dyn DisplaySurface, window: crate::display::WindowId) {
    if window == display.root() {
        return;
    }
    if let Some(idx) = state.workspaces.current().list().find(window) {
        state.workspaces.current_mut().set_focused_index(Some(idx));
        state.refocus_selected(display);
    }
}

/// Expose: repaint the bar if the exposed window belongs to one (and
/// `count == 0`, i.e. this is the last of a batch of expose events).
fn on_expose(state: &mut WmState, display: &mut dyn DisplaySurface, window: crate::display::WindowId) {
    if let Some(index) = state.monitors.iter().position(|m| m.bar == window) {
        state.repaint_bar(display, index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::display::{OutputInfo, Rect, WindowId};
    use crate::mock::MockDisplay;
    use crate::spawn::RecordingSpawner;

    fn setup() -> (WmState, MockDisplay, RecordingSpawner) {
        let mut display = MockDisplay::new();
        display.set_outputs(vec![OutputInfo { rect: Rect::new(0, 0, 1920, 1080) }]);
        let state = WmState::new(&mut display, Config::defaults());
        (state, display, RecordingSpawner::new())
    }

    #[test]
    fn map_request_appends_and_focuses() {
        let (mut state, mut display, spawner) = setup();
        dispatch(&mut state, &mut display, &spawner, &[], Event::MapRequest(WindowId(1)));
        assert_eq!(state.workspaces.current().windows(), vec![WindowId(1)]);
        assert_eq!(state.workspaces.current().focused_window(), Some(WindowId(1)));
        assert!(display.map_calls().contains(&WindowId(1)));
    }

    #[test]
    fn map_request_for_already_managed_window_just_maps() {
        let (mut state, mut display, spawner) = setup();
        dispatch(&mut state, &mut display, &spawner, &[], Event::MapRequest(WindowId(1)));
        let maps_before = display.map_calls().len();
        dispatch(&mut state, &mut display, &spawner, &[], Event::MapRequest(WindowId(1)));
        assert_eq!(state.workspaces.current().len(), 1);
        assert_eq!(display.map_calls().len(), maps_before + 1);
    }

    #[test]
    fn destroy_notify_for_unmanaged_window_is_noop() {
        let (mut state, mut display, spawner) = setup();
        dispatch(&mut state, &mut display, &spawner, &[], Event::DestroyNotify(WindowId(42)));
        assert!(state.workspaces.current().is_empty());
        assert!(display.move_resize_calls().is_empty());
    }

    #[test]
    fn destroy_notify_removes_and_relayouts() {
        let (mut state, mut display, spawner) = setup();
        dispatch(&mut state, &mut display, &spawner, &[], Event::MapRequest(WindowId(1)));
        dispatch(&mut state, &mut display, &spawner, &[], Event::MapRequest(WindowId(2)));
        dispatch(&mut state, &mut display, &spawner, &[], Event::DestroyNotify(WindowId(1)));
        assert_eq!(state.workspaces.current().windows(), vec![WindowId(2)]);
    }

    #[test]
    fn enter_notify_on_root_is_ignored() {
        let (mut state, mut display, spawner) = setup();
        dispatch(&mut state, &mut display, &spawner, &[], Event::MapRequest(WindowId(1)));
        let root = display.root();
        dispatch(&mut state, &mut display, &spawner, &[], Event::EnterNotify(root));
        assert_eq!(state.workspaces.current().focused_window(), Some(WindowId(1)));
    }

    #[test]
    fn enter_notify_refocuses_managed_client() {
        let (mut state, mut display, spawner) = setup();
        dispatch(&mut state, &mut display, &spawner, &[], Event::MapRequest(WindowId(1)));
        dispatch(&mut state, &mut display, &spawner, &[], Event::MapRequest(WindowId(2)));
        dispatch(&mut state, &mut display, &spawner, &[], Event::EnterNotify(WindowId(1)));
        assert_eq!(state.workspaces.current().focused_window(), Some(WindowId(1)));
    }

    #[test]
    fn key_press_with_no_matching_binding_is_ignored() {
        let (mut state, mut display, spawner) = setup();
        dispatch(
            &mut state,
            &mut display,
            &spawner,
            &[],
            Event::KeyPress(KeyPress { modmask: 0, keysym: 0 }),
        );
        assert!(spawner.calls.borrow().is_empty());
    }

    #[test]
    fn key_press_spawn_invokes_spawner() {
        let (mut state, mut display, spawner) = setup();
        let bindings = vec![KeyBinding {
            modmask: 1,
            keysym: 2,
            action: KeyAction::Spawn(vec!["dmenu_run".to_string()]),
        }];
        dispatch(
            &mut state,
            &mut display,
            &spawner,
            &bindings,
            Event::KeyPress(KeyPress { modmask: 1, keysym: 2 }),
        );
        assert_eq!(spawner.calls.borrow()[0], vec!["dmenu_run".to_string()]);
    }
}
