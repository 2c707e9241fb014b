//! The **Display Surface**: the abstract collaborator the core consumes
//! instead of talking to X directly. Everything the state machine needs
//! from the X server (and nothing more) is named here as a trait;
//! `backend::X11Display` is the one real implementation,
//! `mock::MockDisplay` (test-only) is the other.

use std::fmt;

use crate::error::FatalError;

/// An opaque handle to a top-level window. The core never interprets this
/// beyond equality and hashing; the Display Surface is the only thing that
/// knows what it actually is (an X11 `Window` ID, concretely).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// An RGB color already resolved to whatever the Display Surface needs to
/// paint with (an allocated X pixel value, concretely).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u64);

/// An opaque handle to a loaded font, used only to ask the Display Surface
/// to measure and draw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontId(pub u64);

/// A rectangle in root-window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect { x, y, width, height }
    }
}

/// One physical output as reported by RandR at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputInfo {
    pub rect: Rect,
}

/// A key combination as delivered by the Display Surface: the modifier
/// mask bits it observed plus the keysym it resolved the keycode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub modmask: u32,
    pub keysym: u64,
}

/// The ordered stream of input/notification events the core reacts to.
/// Everything X-specific (atoms, wire types, unions) is translated into
/// this enum by the Display Surface adapter before it ever reaches the
/// event dispatcher, keeping the core free of X wire types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    MapRequest(WindowId),
    DestroyNotify(WindowId),
    EnterNotify(WindowId),
    ConfigureRequest(ConfigureRequest),
    ConfigureNotify,
    KeyPress(KeyPress),
    Expose { window: WindowId, count: u32 },
    ClientDestroyed(WindowId),
}

/// The geometry/stacking fields of an `XConfigureRequestEvent`, honored
/// verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub window: WindowId,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub border_width: u32,
}

/// Everything the core asks of the X server, named as an interface: the
/// core consumes an abstract Display Surface and never touches X wire
/// types directly.
pub trait DisplaySurface {
    /// Block until the next event is available and return it.
    fn next_event(&mut self) -> Event;

    fn root(&self) -> WindowId;

    /// The root window's own rectangle, used as the synthetic monitor
    /// fallback when RandR reports no connected outputs.
    fn root_geometry(&self) -> Rect;

    /// Children of the root window still mapped, used by the quit drain to
    /// know when it is safe to stop.
    fn root_children(&self) -> Vec<WindowId>;

    fn map(&mut self, window: WindowId);
    fn unmap(&mut self, window: WindowId);
    fn move_resize(&mut self, window: WindowId, rect: Rect);
    fn raise(&mut self, window: WindowId);
    fn set_border_width(&mut self, window: WindowId, width: u32);
    fn set_border_color(&mut self, window: WindowId, color: Color);
    fn set_input_focus(&mut self, window: WindowId);

    /// Subscribe to EnterNotify on `window`, done at MapRequest time.
    fn select_enter_events(&mut self, window: WindowId);

    /// The window's current origin in root coordinates. Used by
    /// `MonitorSet::monitor_for` to find which monitor a non-root window
    /// belongs to.
    fn window_origin(&self, window: WindowId) -> Option<(i32, i32)>;

    /// Apply a `ConfigureRequest` verbatim.
    fn configure(&mut self, req: &ConfigureRequest);

    /// Send two WM_DELETE_WINDOW ClientMessages via WM_PROTOCOLS.
    fn send_delete_window(&mut self, window: WindowId);

    fn grab_key(&mut self, root: WindowId, modmask: u32, keysym: u64);
    fn ungrab_keys(&mut self, root: WindowId);

    /// RandR output discovery, performed once at startup.
    fn query_outputs(&mut self) -> Vec<OutputInfo>;

    fn alloc_color(&mut self, spec: &str) -> Result<Color, FatalError>;
    fn load_font(&mut self, name: &str) -> Result<FontId, FatalError>;
    fn text_width(&self, font: FontId, text: &str) -> u32;
    fn font_ascent(&self, font: FontId) -> i32;

    /// Create a non-interactive override-redirect bar window for a
    /// monitor's rectangle; returns its handle.
    fn create_bar(&mut self, rect: Rect) -> WindowId;
    fn fill_rect(&mut self, window: WindowId, rect: Rect, color: Color);
    fn draw_text(&mut self, window: WindowId, x: i32, baseline: i32, color: Color, text: &str);

    /// Release all X resources held by the surface (fonts, colors,
    /// connection). Called once, from the terminal `STOPPED` state.
    fn close(&mut self);
}
