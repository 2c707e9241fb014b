//! The real Display Surface: wires `stackwm`'s window-management core to
//! an actual Xlib connection. Startup wiring, color allocation, cursor
//! creation and root-window event-mask selection all live here, outside
//! the testable core.

#[macro_use]
extern crate log;

use std::collections::VecDeque;
use std::ffi::CString;
use std::sync::Mutex;

use env_logger::WriteStyle::Auto;
use lazy_static::lazy_static;
use libc::{c_int, c_uchar, c_uint};
use x11::xft;
use x11::xlib;
use x11::xrandr;

use stackwm::config::Config;
use stackwm::display::{Color, ConfigureRequest, DisplaySurface, Event, FontId, KeyPress, OutputInfo, Rect, WindowId};
use stackwm::error::{die, FatalError};
use stackwm::keys::default_bindings;
use stackwm::spawn::{install_sigchld_reaper, ForkSpawner};
use stackwm::wm::WmState;

lazy_static! {
    static ref WM_DETECTED: Mutex<bool> = Mutex::new(false);
}

const WM_PROTOCOLS: &str = "WM_PROTOCOLS";
const WM_DELETE_WINDOW: &str = "WM_DELETE_WINDOW";

/// The one real `DisplaySurface`: an Xlib connection, a pair of allocated
/// border colors, a loaded Xft font and an atom cache, plus the per-call
/// bookkeeping (the GC used for bar fills, the font's draw context).
struct X11Display {
    display: *mut xlib::Display,
    screen: c_int,
    root: WindowId,
    gc: xlib::GC,
    visual: *mut xlib::Visual,
    colormap: xlib::Colormap,
    draw: *mut xft::XftDraw,
    fonts: Vec<*mut xft::XftFont>,
    wm_protocols: xlib::Atom,
    wm_delete_window: xlib::Atom,
    pending: VecDeque<Event>,
}

impl X11Display {
    /// Opens the display, installs the `WM_DETECTED` error handler,
    /// claims substructure redirection on the root window and syncs;
    /// the `BadAccess` a second window manager would trigger here is
    /// caught by `on_wm_detected` and surfaced as `FatalInit::WmDetected`
    /// rather than raw X protocol noise.
    fn open() -> Result<Self, FatalError> {
        let display = unsafe { xlib::XOpenDisplay(std::ptr::null()) };
        if display.is_null() {
            return Err(FatalError::NoDisplay);
        }

        let screen = unsafe { xlib::XDefaultScreen(display) };
        if unsafe { xlib::XScreenOfDisplay(display, screen) }.is_null() {
            return Err(FatalError::NoScreen);
        }
        let root = unsafe { xlib::XRootWindow(display, screen) };
        let visual = unsafe { xlib::XDefaultVisual(display, screen) };
        let colormap = unsafe { xlib::XDefaultColormap(display, screen) };
        let gc = unsafe { xlib::XCreateGC(display, root, 0, std::ptr::null_mut()) };
        let draw = unsafe { xft::XftDrawCreate(display, root, visual, colormap) };

        *WM_DETECTED.lock().unwrap() = false;
        unsafe {
            xlib::XSetErrorHandler(Some(on_wm_detected));
            xlib::XSelectInput(
                display,
                root,
                xlib::SubstructureRedirectMask | xlib::SubstructureNotifyMask | xlib::KeyPressMask,
            );
            xlib::XSync(display, xlib::False);
        }
        if *WM_DETECTED.lock().unwrap() {
            return Err(FatalError::WmDetected);
        }

        let wm_protocols = intern_atom(display, WM_PROTOCOLS);
        let wm_delete_window = intern_atom(display, WM_DELETE_WINDOW);

        Ok(X11Display {
            display,
            screen,
            root: WindowId(root),
            gc,
            visual,
            colormap,
            draw,
            fonts: Vec::new(),
            wm_protocols,
            wm_delete_window,
            pending: VecDeque::new(),
        })
    }

    fn xfont(&self, font: FontId) -> *mut xft::XftFont {
        self.fonts[(font.0 - 1) as usize]
    }

    /// Blocks for the next raw `XEvent` and translates it into the
    /// core's event enum, keeping the core free of X wire types.
    /// `ButtonPress`/`LeaveNotify`/etc. the core never
    /// reacts to are simply dropped and the next event is pulled.
    fn next_raw_event(&mut self) -> Event {
        loop {
            let mut xevent: xlib::XEvent = unsafe { std::mem::zeroed() };
            unsafe { xlib::XNextEvent(self.display, &mut xevent) };
            trace!("XNextEvent: {:?}", unsafe { xevent.get_type() });

            #[allow(non_upper_case_globals)]
            let translated = match unsafe { xevent.get_type() } {
                xlib::MapRequest => {
                    let e: xlib::XMapRequestEvent = unsafe { xevent.map_request };
                    Some(Event::MapRequest(WindowId(e.window)))
                }
                xlib::DestroyNotify => {
                    let e: xlib::XDestroyWindowEvent = unsafe { xevent.destroy_window };
                    Some(Event::DestroyNotify(WindowId(e.window)))
                }
                xlib::EnterNotify => {
                    let e: xlib::XCrossingEvent = unsafe { xevent.crossing };
                    Some(Event::EnterNotify(WindowId(e.window)))
                }
                xlib::ConfigureRequest => {
                    let e: xlib::XConfigureRequestEvent = unsafe { xevent.configure_request };
                    Some(Event::ConfigureRequest(ConfigureRequest {
                        window: WindowId(e.window),
                        x: e.x,
                        y: e.y,
                        width: e.width.max(1) as u32,
                        height: e.height.max(1) as u32,
                        border_width: e.border_width.max(0) as u32,
                    }))
                }
                xlib::ConfigureNotify => Some(Event::ConfigureNotify),
                xlib::KeyPress => {
                    let e: xlib::XKeyEvent = unsafe { xevent.key };
                    let keysym = unsafe { xlib::XKeycodeToKeysym(self.display, e.keycode as u8, 0) };
                    Some(Event::KeyPress(KeyPress { modmask: e.state, keysym }))
                }
                xlib::Expose => {
                    let e: xlib::XExposeEvent = unsafe { xevent.expose };
                    Some(Event::Expose { window: WindowId(e.window), count: e.count as u32 })
                }
                _ => None,
            };
            if let Some(event) = translated {
                return event;
            }
        }
    }
}

impl DisplaySurface for X11Display {
    fn next_event(&mut self) -> Event {
        if let Some(event) = self.pending.pop_front() {
            return event;
        }
        self.next_raw_event()
    }

    fn root(&self) -> WindowId {
        self.root
    }

    fn root_geometry(&self) -> Rect {
        let mut root: xlib::Window = 0;
        let mut x = 0;
        let mut y = 0;
        let mut width = 0;
        let mut height = 0;
        let mut border_width = 0;
        let mut depth = 0;
        unsafe {
            xlib::XGetGeometry(
                self.display,
                self.root.0,
                &mut root,
                &mut x,
                &mut y,
                &mut width,
                &mut height,
                &mut border_width,
                &mut depth,
            );
        }
        Rect::new(0, 0, width, height)
    }

    fn root_children(&self) -> Vec<WindowId> {
        let mut root: xlib::Window = 0;
        let mut parent: xlib::Window = 0;
        let mut children: *mut xlib::Window = std::ptr::null_mut();
        let mut num: c_uint = 0;
        unsafe {
            xlib::XQueryTree(self.display, self.root.0, &mut root, &mut parent, &mut children, &mut num);
            let windows = std::slice::from_raw_parts(children, num as usize)
                .iter()
                .map(|w| WindowId(*w))
                .collect();
            if !children.is_null() {
                xlib::XFree(children as *mut _);
            }
            windows
        }
    }

    fn map(&mut self, window: WindowId) {
        unsafe { xlib::XMapWindow(self.display, window.0) };
    }

    fn unmap(&mut self, window: WindowId) {
        unsafe { xlib::XUnmapWindow(self.display, window.0) };
    }

    fn move_resize(&mut self, window: WindowId, rect: Rect) {
        unsafe {
            xlib::XMoveResizeWindow(self.display, window.0, rect.x, rect.y, rect.width.max(1), rect.height.max(1));
        }
    }

    fn raise(&mut self, window: WindowId) {
        unsafe { xlib::XRaiseWindow(self.display, window.0) };
    }

    fn set_border_width(&mut self, window: WindowId, width: u32) {
        unsafe { xlib::XSetWindowBorderWidth(self.display, window.0, width) };
    }

    fn set_border_color(&mut self, window: WindowId, color: Color) {
        unsafe { xlib::XSetWindowBorder(self.display, window.0, color.0) };
    }

    fn set_input_focus(&mut self, window: WindowId) {
        unsafe {
            xlib::XSetInputFocus(self.display, window.0, xlib::RevertToParent, xlib::CurrentTime);
        }
    }

    fn select_enter_events(&mut self, window: WindowId) {
        unsafe { xlib::XSelectInput(self.display, window.0, xlib::EnterWindowMask) };
    }

    fn window_origin(&self, window: WindowId) -> Option<(i32, i32)> {
        let mut attrs: xlib::XWindowAttributes = unsafe { std::mem::zeroed() };
        let ok = unsafe { xlib::XGetWindowAttributes(self.display, window.0, &mut attrs) };
        if ok == 0 {
            None
        } else {
            Some((attrs.x, attrs.y))
        }
    }

    fn configure(&mut self, req: &ConfigureRequest) {
        let mut changes = xlib::XWindowChanges {
            x: req.x,
            y: req.y,
            width: req.width as c_int,
            height: req.height as c_int,
            border_width: req.border_width as c_int,
            sibling: 0,
            stack_mode: 0,
        };
        let mask = (xlib::CWX | xlib::CWY | xlib::CWWidth | xlib::CWHeight | xlib::CWBorderWidth) as c_uint;
        unsafe { xlib::XConfigureWindow(self.display, req.window.0, mask, &mut changes) };
    }

    fn send_delete_window(&mut self, window: WindowId) {
        let mut event: xlib::XClientMessageEvent = unsafe { std::mem::zeroed() };
        event.type_ = xlib::ClientMessage;
        event.window = window.0;
        event.message_type = self.wm_protocols;
        event.format = 32;
        event.data.set_long(0, self.wm_delete_window as i64);
        event.data.set_long(1, xlib::CurrentTime as i64);
        let mut xevent = xlib::XEvent { client_message: event };
        unsafe {
            xlib::XSendEvent(self.display, window.0, xlib::False, xlib::NoEventMask, &mut xevent);
        }
    }

    fn grab_key(&mut self, root: WindowId, modmask: u32, keysym: u64) {
        let keycode = unsafe { xlib::XKeysymToKeycode(self.display, keysym) };
        unsafe {
            xlib::XGrabKey(
                self.display,
                keycode as c_int,
                modmask,
                root.0,
                xlib::True,
                xlib::GrabModeAsync,
                xlib::GrabModeAsync,
            );
        }
    }

    fn ungrab_keys(&mut self, root: WindowId) {
        unsafe { xlib::XUngrabKey(self.display, xlib::AnyKey, xlib::AnyModifier, root.0) };
    }

    fn query_outputs(&mut self) -> Vec<OutputInfo> {
        let resources = unsafe { xrandr::XRRGetScreenResourcesCurrent(self.display, self.root.0) };
        if resources.is_null() {
            return Vec::new();
        }
        let mut outputs = Vec::new();
        unsafe {
            let count = (*resources).noutput;
            for i in 0..count {
                let output_id = *(*resources).outputs.offset(i as isize);
                let info = xrandr::XRRGetOutputInfo(self.display, resources, output_id);
                if info.is_null() {
                    continue;
                }
                if (*info).connection == xrandr::RR_Connected as u16 && (*info).crtc != 0 {
                    let crtc = xrandr::XRRGetCrtcInfo(self.display, resources, (*info).crtc);
                    if !crtc.is_null() {
                        outputs.push(OutputInfo {
                            rect: Rect::new((*crtc).x, (*crtc).y, (*crtc).width, (*crtc).height),
                        });
                        xrandr::XRRFreeCrtcInfo(crtc);
                    }
                }
                xrandr::XRRFreeOutputInfo(info);
            }
            xrandr::XRRFreeScreenResources(resources);
        }
        outputs
    }

    fn alloc_color(&mut self, spec: &str) -> Result<Color, FatalError> {
        let cstr = CString::new(spec).map_err(|_| FatalError::ColorAlloc(spec.to_string()))?;
        let mut color: xlib::XColor = unsafe { std::mem::zeroed() };
        let ok = unsafe { xlib::XParseColor(self.display, self.colormap, cstr.as_ptr(), &mut color) };
        if ok == 0 {
            return Err(FatalError::ColorAlloc(spec.to_string()));
        }
        let ok = unsafe { xlib::XAllocColor(self.display, self.colormap, &mut color) };
        if ok == 0 {
            return Err(FatalError::ColorAlloc(spec.to_string()));
        }
        Ok(Color(color.pixel))
    }

    fn load_font(&mut self, name: &str) -> Result<FontId, FatalError> {
        let cstr = CString::new(name).map_err(|_| FatalError::FontLoad(name.to_string()))?;
        let font = unsafe { xft::XftFontOpenName(self.display, self.screen, cstr.as_ptr()) };
        if font.is_null() {
            return Err(FatalError::FontLoad(name.to_string()));
        }
        self.fonts.push(font);
        Ok(FontId(self.fonts.len() as u64))
    }

    fn text_width(&self, font: FontId, text: &str) -> u32 {
        let mut extents: x11::xrender::XGlyphInfo = unsafe { std::mem::zeroed() };
        unsafe {
            xft::XftTextExtentsUtf8(
                self.display,
                self.xfont(font),
                text.as_ptr(),
                text.len() as c_int,
                &mut extents,
            );
        }
        extents.xOff as u32
    }

    fn font_ascent(&self, font: FontId) -> i32 {
        unsafe { (*self.xfont(font)).ascent }
    }

    fn create_bar(&mut self, rect: Rect) -> WindowId {
        let window = unsafe {
            xlib::XCreateSimpleWindow(self.display, self.root.0, rect.x, rect.y, rect.width.max(1), rect.height.max(1), 0, 0, 0)
        };
        unsafe {
            xlib::XSelectInput(self.display, window, xlib::ExposureMask);
            xlib::XMapWindow(self.display, window);
        }
        WindowId(window)
    }

    fn fill_rect(&mut self, window: WindowId, rect: Rect, color: Color) {
        unsafe {
            xlib::XSetForeground(self.display, self.gc, color.0);
            xlib::XFillRectangle(self.display, window.0, self.gc, rect.x, rect.y, rect.width.max(1), rect.height.max(1));
        }
    }

    fn draw_text(&mut self, window: WindowId, x: i32, baseline: i32, color: Color, text: &str) {
        // Only one font is ever loaded; the bar is the sole caller of
        // draw_text and always means that font.
        let font = self.fonts[0];
        let mut xft_color: xft::XftColor = unsafe { std::mem::zeroed() };
        xft_color.pixel = color.0;
        unsafe {
            xft::XftDrawChange(self.draw, window.0);
            xft::XftDrawStringUtf8(
                self.draw,
                &xft_color,
                font,
                x,
                baseline,
                text.as_ptr(),
                text.len() as c_int,
            );
        }
    }

    fn close(&mut self) {
        unsafe {
            for font in &self.fonts {
                xft::XftFontClose(self.display, *font);
            }
            xft::XftDrawDestroy(self.draw);
            xlib::XFreeGC(self.display, self.gc);
            xlib::XCloseDisplay(self.display);
        }
        info!("closed display");
    }
}

fn intern_atom(display: *mut xlib::Display, name: &str) -> xlib::Atom {
    let cstr = CString::new(name).unwrap();
    unsafe { xlib::XInternAtom(display, cstr.as_ptr(), xlib::False) }
}

/// Caught when `XSelectInput`'s `SubstructureRedirectMask` request
/// conflicts with an already-running window manager (`BadAccess`).
/// Standard `WM_DETECTED` startup guard.
unsafe extern "C" fn on_wm_detected(_display: *mut xlib::Display, event: *mut xlib::XErrorEvent) -> c_int {
    let code: c_uchar = (*event).error_code;
    if code == xlib::BadAccess as c_uchar {
        error!("another window manager is already running");
        *WM_DETECTED.lock().unwrap() = true;
    }
    0
}

fn main() {
    env_logger::builder().format_timestamp(None).write_style(Auto).init();
    info!("starting logger OK");

    install_sigchld_reaper();

    let mut display = match X11Display::open() {
        Ok(d) => d,
        Err(e) => die(e),
    };
    info!("connected to display OK");

    let config = Config::load();
    let mut state = WmState::new(&mut display, config);
    let spawner = ForkSpawner::new(unsafe { xlib::XConnectionNumber(display.display) });
    let bindings = default_bindings();

    state.grab_keys_and_paint(&mut display, &bindings);
    info!("entering event loop");
    state.run(&mut display, &spawner, &bindings);
    info!("finished OK");
}
