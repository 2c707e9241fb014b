//! Bar Renderer.
//!
//! Every monitor owns its own bar window and paints it independently:
//! `repaint` takes a single monitor and the caller decides whether that
//! means "just the selected one" (Expose) or "all of them" (a workspace
//! switch or monitor-selection change, both of which can move the tag
//! highlight on more than one bar under the global-table model).

use crate::display::{Color, DisplaySurface, FontId, Rect};
use crate::layout::BAR_HEIGHT;
use crate::monitor::Monitor;

pub const TAGS: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"];

/// Repaints `monitor`'s bar, highlighting `active_workspace` as the live
/// tag. `active_workspace` is passed explicitly rather than read off
/// `monitor` so callers can paint a non-selected monitor's bar under the
/// global-table model without first mutating that monitor's own field.
pub fn repaint(
    display: &mut dyn DisplaySurface,
    monitor: &Monitor,
    active_workspace: usize,
    font: FontId,
    focus: Color,
    unfocus: Color,
) {
    let bar = monitor.bar;
    display.fill_rect(bar, Rect::new(0, 0, monitor.rect.width, BAR_HEIGHT), unfocus);

    let ascent = display.font_ascent(font);
    let baseline = BAR_HEIGHT as i32 - (BAR_HEIGHT as i32 - ascent) / 2;

    let mut x = 0i32;
    for (i, tag) in TAGS.iter().enumerate() {
        let text_width = display.text_width(font, tag);
        let cell_width = text_width + 10;
        let is_active = i == active_workspace;
        let (bg, fg) = if is_active { (focus, unfocus) } else { (unfocus, focus) };
        display.fill_rect(bar, Rect::new(x, 0, cell_width, BAR_HEIGHT), bg);
        display.draw_text(bar, x + 5, baseline, fg, tag);
        x += cell_width as i32;
    }
}
