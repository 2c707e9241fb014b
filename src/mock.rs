//! `MockDisplay`: a `DisplaySurface` that records every call instead of
//! touching an X server, so state-machine invariants can be verified
//! against the recorded call sequence. Test-only; not part of the public
//! API.

#![cfg(test)]
#![allow(dead_code)]

use std::collections::VecDeque;

use crate::display::{Color, ConfigureRequest, DisplaySurface, Event, FontId, OutputInfo, Rect, WindowId};
use crate::error::FatalError;

#[derive(Debug, Default)]
pub struct MockDisplay {
    root: WindowId,
    root_rect: Rect,
    root_children: Vec<WindowId>,
    outputs: Vec<OutputInfo>,
    events: VecDeque<Event>,
    window_origins: Vec<(WindowId, i32, i32)>,
    next_bar_id: u64,
    next_font_id: u64,

    map_calls: Vec<WindowId>,
    unmap_calls: Vec<WindowId>,
    move_resize_calls: Vec<(WindowId, Rect)>,
    raise_calls: Vec<WindowId>,
    border_width_calls: Vec<(WindowId, u32)>,
    border_color_calls: Vec<(WindowId, Color)>,
    input_focus_calls: Vec<WindowId>,
    delete_window_calls: Vec<WindowId>,
    configure_calls: Vec<ConfigureRequest>,
    grab_key_calls: Vec<(WindowId, u32, u64)>,
    ungrab_keys_calls: Vec<WindowId>,
    fill_rect_calls: Vec<(WindowId, Rect, Color)>,
    draw_text_calls: Vec<(WindowId, i32, i32, String)>,
    select_enter_events_calls: Vec<WindowId>,
    closed: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        MockDisplay {
            root: WindowId(1),
            root_rect: Rect::new(0, 0, 1920, 1080),
            next_bar_id: 1000,
            next_font_id: 1,
            ..Default::default()
        }
    }

    pub fn set_outputs(&mut self, outputs: Vec<OutputInfo>) {
        self.outputs = outputs;
    }

    pub fn set_root_geometry(&mut self, rect: Rect) {
        self.root_rect = rect;
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn add_root_child(&mut self, window: WindowId) {
        self.root_children.push(window);
    }

    /// Simulates a window actually disappearing from the root's child
    /// set (a real `DestroyNotify` arriving, sometime after whatever
    /// `send_delete_window` asked for). Kept distinct from
    /// `send_delete_window` itself, which only records that a
    /// WM_DELETE_WINDOW was sent and does not imply the client obeyed it.
    pub fn remove_root_child(&mut self, window: WindowId) {
        self.root_children.retain(|&w| w != window);
    }

    pub fn place_window(&mut self, window: WindowId, x: i32, y: i32) {
        self.window_origins.push((window, x, y));
    }

    pub fn map_calls(&self) -> Vec<WindowId> {
        self.map_calls.clone()
    }

    pub fn unmap_calls(&self) -> Vec<WindowId> {
        self.unmap_calls.clone()
    }

    pub fn move_resize_calls(&self) -> Vec<(WindowId, Rect)> {
        self.move_resize_calls.clone()
    }

    pub fn raise_calls(&self) -> Vec<WindowId> {
        self.raise_calls.clone()
    }

    pub fn border_width_calls(&self) -> Vec<(WindowId, u32)> {
        self.border_width_calls.clone()
    }

    pub fn border_color_calls(&self) -> Vec<(WindowId, Color)> {
        self.border_color_calls.clone()
    }

    pub fn input_focus_calls(&self) -> Vec<WindowId> {
        self.input_focus_calls.clone()
    }

    pub fn delete_window_calls(&self) -> Vec<WindowId> {
        self.delete_window_calls.clone()
    }

    pub fn fill_rect_calls(&self) -> Vec<(WindowId, Rect, Color)> {
        self.fill_rect_calls.clone()
    }

    pub fn draw_text_calls(&self) -> Vec<(WindowId, i32, i32, String)> {
        self.draw_text_calls.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl DisplaySurface for MockDisplay {
    fn next_event(&mut self) -> Event {
        self.events.pop_front().expect("MockDisplay: no queued events")
    }

    fn root(&self) -> WindowId {
        self.root
    }

    fn root_geometry(&self) -> Rect {
        self.root_rect
    }

    fn root_children(&self) -> Vec<WindowId> {
        self.root_children.clone()
    }

    fn map(&mut self, window: WindowId) {
        self.map_calls.push(window);
        self.unmap_calls.retain(|&w| w != window);
    }

    fn unmap(&mut self, window: WindowId) {
        self.unmap_calls.push(window);
    }

    fn move_resize(&mut self, window: WindowId, rect: Rect) {
        self.move_resize_calls.push((window, rect));
    }

    fn raise(&mut self, window: WindowId) {
        self.raise_calls.push(window);
    }

    fn set_border_width(&mut self, window: WindowId, width: u32) {
        self.border_width_calls.push((window, width));
    }

    fn set_border_color(&mut self, window: WindowId, color: Color) {
        self.border_color_calls.push((window, color));
    }

    fn set_input_focus(&mut self, window: WindowId) {
        self.input_focus_calls.push(window);
    }

    fn select_enter_events(&mut self, window: WindowId) {
        self.select_enter_events_calls.push(window);
    }

    fn window_origin(&self, window: WindowId) -> Option<(i32, i32)> {
        self.window_origins
            .iter()
            .find(|(w, _, _)| *w == window)
            .map(|(_, x, y)| (*x, *y))
    }

    fn configure(&mut self, req: &ConfigureRequest) {
        self.configure_calls.push(*req);
    }

    fn send_delete_window(&mut self, window: WindowId) {
        self.delete_window_calls.push(window);
    }

    fn grab_key(&mut self, root: WindowId, modmask: u32, keysym: u64) {
        self.grab_key_calls.push((root, modmask, keysym));
    }

    fn ungrab_keys(&mut self, root: WindowId) {
        self.ungrab_keys_calls.push(root);
    }

    fn query_outputs(&mut self) -> Vec<OutputInfo> {
        self.outputs.clone()
    }

    fn alloc_color(&mut self, _spec: &str) -> Result<Color, FatalError> {
        Ok(Color(0))
    }

    fn load_font(&mut self, _name: &str) -> Result<FontId, FatalError> {
        let id = self.next_font_id;
        self.next_font_id += 1;
        Ok(FontId(id))
    }

    fn text_width(&self, _font: FontId, text: &str) -> u32 {
        text.len() as u32 * 6
    }

    fn font_ascent(&self, _font: FontId) -> i32 {
        12
    }

    fn create_bar(&mut self, _rect: Rect) -> WindowId {
        let id = self.next_bar_id;
        self.next_bar_id += 1;
        WindowId(id)
    }

    fn fill_rect(&mut self, window: WindowId, rect: Rect, color: Color) {
        self.fill_rect_calls.push((window, rect, color));
    }

    fn draw_text(&mut self, window: WindowId, x: i32, baseline: i32, _color: Color, text: &str) {
        self.draw_text_calls.push((window, x, baseline, text.to_string()));
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
