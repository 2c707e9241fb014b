//! `WmState`: the single context threaded through every handler, in
//! place of separate global singletons. The event loop owns it and lends
//! a mutable borrow for the duration of one dispatch.
//!
//! Owns the Monitor Set, the Workspace Table, the loaded `Config` and
//! the quit latch. `Selected Monitor` lives inside `MonitorSet` itself.

use log::{info, warn};

use crate::config::Config;
use crate::display::{Color, DisplaySurface, FontId};
use crate::{bar, focus, layout};
use crate::monitor::MonitorSet;
use crate::workspace::WorkspaceTable;

/// The quit state machine: RUNNING -> DRAINING -> STOPPED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuitState {
    Running,
    Draining,
    Stopped,
}

pub struct WmState {
    pub monitors: MonitorSet,
    pub workspaces: WorkspaceTable,
    pub config: Config,
    focus_color: Color,
    unfocus_color: Color,
    font: FontId,
    quit: QuitState,
}

impl WmState {
    /// Discovers monitors (falling back to a single synthetic one),
    /// allocates the two border colors and loads the configured font.
    /// Colour allocation / font loading failures are `FatalInit` and are
    /// the caller's responsibility to turn into a `die()`; this
    /// constructor propagates them instead of panicking, since the actual
    /// X connection and startup wiring live in the binary crate, not
    /// here.
    pub fn new(display: &mut dyn DisplaySurface, config: Config) -> Self {
        match Self::try_new(display, config) {
            Ok(state) => state,
            Err(e) => crate::error::die(e),
        }
    }

    pub fn try_new(display: &mut dyn DisplaySurface, config: Config) -> Result<Self, crate::error::FatalError> {
        let root_rect = display.root_geometry();
        let monitors = MonitorSet::discover(display, root_rect);
        let focus_color = display.alloc_color(&config.colors.focus)?;
        let unfocus_color = display.alloc_color(&config.colors.unfocus)?;
        let font = display.load_font(&config.font)?;

        Ok(WmState {
            monitors,
            workspaces: WorkspaceTable::new(),
            config,
            focus_color,
            unfocus_color,
            font,
            quit: QuitState::Running,
        })
    }

    pub fn is_stopped(&self) -> bool {
        self.quit == QuitState::Stopped
    }

    /// Runs the layout engine (4.D) against the selected monitor and its
    /// live workspace.
    pub fn relayout_selected(&self, display: &mut dyn DisplaySurface) {
        let monitor = *self.monitors.selected();
        let windows = self.workspaces.current().windows();
        layout::apply(display, &monitor, &windows);
    }

    /// Runs the Focus Controller's `update` (4.E) against the selected
    /// monitor's live workspace.
    pub fn refocus_selected(&self, display: &mut dyn DisplaySurface) {
        focus::update(display, self.workspaces.current(), self.focus_color, self.unfocus_color);
    }

    /// Repaints one monitor's bar, reading its own `active_workspace`
    /// field against the (global) workspace table; bars are per-monitor,
    /// not a single shared surface.
    pub fn repaint_bar(&self, display: &mut dyn DisplaySurface, monitor_index: usize) {
        let monitors: Vec<_> = self.monitors.iter().copied().collect();
        if let Some(monitor) = monitors.get(monitor_index) {
            bar::repaint(display, monitor, monitor.active_workspace, self.font, self.focus_color, self.unfocus_color);
        }
    }

    pub fn repaint_all_bars(&self, display: &mut dyn DisplaySurface) {
        for index in 0..self.monitors.len() {
            self.repaint_bar(display, index);
        }
    }

    /// quit, phase one: latches RUNNING -> DRAINING, broadcasts
    /// WM_DELETE_WINDOW to every root child, and falls straight through
    /// to STOPPED if the child set is already empty. Re-invocation while
    /// already draining is a no-op.
    pub fn begin_quit(&mut self, display: &mut dyn DisplaySurface) {
        if self.quit != QuitState::Running {
            return;
        }
        info!("quit: latching DRAINING, broadcasting WM_DELETE_WINDOW to root children");
        self.quit = QuitState::Draining;
        for child in display.root_children() {
            display.send_delete_window(child);
        }
        self.note_client_destroyed(display);
    }

    /// DRAINING -> STOPPED once the root child set is empty. Called after
    /// any DestroyNotify is processed, continuing to dispatch events as
    /// windows die until the child set becomes empty and control returns
    /// to the main loop.
    pub fn note_client_destroyed(&mut self, display: &dyn DisplaySurface) {
        if self.quit == QuitState::Draining && display.root_children().is_empty() {
            info!("quit: root child set empty, STOPPED");
            self.quit = QuitState::Stopped;
        }
    }

    /// The main event loop: block for the next event, dispatch it, repeat
    /// until the Quit Flag reaches STOPPED. Exits by ungrabbing keys and
    /// closing the Display Surface; the process then falls off the end of
    /// `main` and exits 0 rather than going through the fatal-exit path.
    pub fn run(
        &mut self,
        display: &mut dyn DisplaySurface,
        spawner: &dyn crate::spawn::Spawner,
        bindings: &[crate::event::KeyBinding],
    ) {
        while !self.is_stopped() {
            let event = display.next_event();
            crate::event::dispatch(self, display, spawner, bindings, event);
        }
        let root = display.root();
        display.ungrab_keys(root);
        display.close();
    }

    /// Grabs every keybinding's keysym on the root window, and repaints
    /// every monitor's bar once at startup. Called once before `run`.
    pub fn grab_keys_and_paint(&self, display: &mut dyn DisplaySurface, bindings: &[crate::event::KeyBinding]) {
        let root = display.root();
        for binding in bindings {
            display.grab_key(root, binding.modmask, binding.keysym);
        }
        if self.monitors.len() == 0 {
            warn!("no monitors discovered");
        }
        self.repaint_all_bars(display);
    }
}
