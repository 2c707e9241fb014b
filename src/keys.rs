//! Default keybinding table. Build-time data: the schema
//! (`KeyBinding`/`KeyAction`) lives in `event.rs`, the table below is the
//! concrete configuration it is populated with.

use x11::keysym::*;
use x11::xlib::{Mod4Mask, ShiftMask};

use crate::event::{Direction, KeyAction, KeyBinding};

const SUPER: u32 = Mod4Mask;
const SUPER_SHIFT: u32 = Mod4Mask | ShiftMask;

/// Digit keysyms in keyboard order: 1..9, then 0, mapping to workspace
/// indices 0..8, then 9 (digit−1, with 0→9).
const DIGITS: [(u64, usize); 10] = [
    (XK_1 as u64, 0),
    (XK_2 as u64, 1),
    (XK_3 as u64, 2),
    (XK_4 as u64, 3),
    (XK_5 as u64, 4),
    (XK_6 as u64, 5),
    (XK_7 as u64, 6),
    (XK_8 as u64, 7),
    (XK_9 as u64, 8),
    (XK_0 as u64, 9),
];

pub fn default_bindings() -> Vec<KeyBinding> {
    let mut bindings = vec![
        KeyBinding {
            modmask: SUPER_SHIFT,
            keysym: XK_p as u64,
            action: KeyAction::Spawn(vec!["dmenu_run".to_string()]),
        },
        KeyBinding {
            modmask: SUPER_SHIFT,
            keysym: XK_Return as u64,
            action: KeyAction::Spawn(vec!["kitty".to_string()]),
        },
        KeyBinding {
            modmask: SUPER_SHIFT,
            keysym: XK_q as u64,
            action: KeyAction::Kill,
        },
        KeyBinding {
            modmask: SUPER_SHIFT,
            keysym: XK_e as u64,
            action: KeyAction::Quit,
        },
        KeyBinding {
            modmask: SUPER,
            keysym: XK_h as u64,
            action: KeyAction::MoveFocus(Direction::Left),
        },
        KeyBinding {
            modmask: SUPER,
            keysym: XK_l as u64,
            action: KeyAction::MoveFocus(Direction::Right),
        },
        KeyBinding {
            modmask: SUPER,
            keysym: XK_k as u64,
            action: KeyAction::MoveFocus(Direction::Up),
        },
        KeyBinding {
            modmask: SUPER,
            keysym: XK_j as u64,
            action: KeyAction::MoveFocus(Direction::Down),
        },
    ];

    for (keysym, workspace) in DIGITS {
        bindings.push(KeyBinding {
            modmask: SUPER,
            keysym,
            action: KeyAction::ChangeWorkspace(workspace),
        });
        bindings.push(KeyBinding {
            modmask: SUPER_SHIFT,
            keysym,
            action: KeyAction::ClientToWorkspace(workspace),
        });
    }

    bindings
}
