// ── X11 keysyms ───────────────────────────────────────────────────────────────
//
// Source of truth: X11/keysymdef.h (`XK_*`).  Latin-1 keysyms equal their
// character code, so printable keys are written as byte literals below.
//
// The backend looks up the *first* keysym bound to a keycode.  For keypad
// keys that is the NumLock-off symbol (KP_End, KP_Down, …), so both the
// navigation and the digit keysyms are mapped to the numpad keys.

use crate::keys::Key;

/// Keysyms used here all fit in 16 bits.
pub(crate) const TABLE_LEN: usize = 0x1_0000;

// ── TTY function keys ─────────────────────────────────────────────────────────

pub const XK_BACKSPACE: u32 = 0xFF08;
pub const XK_TAB: u32 = 0xFF09;
pub const XK_RETURN: u32 = 0xFF0D;
pub const XK_PAUSE: u32 = 0xFF13;
pub const XK_SCROLL_LOCK: u32 = 0xFF14;
pub const XK_ESCAPE: u32 = 0xFF1B;
pub const XK_DELETE: u32 = 0xFFFF;

// ── Cursor control ────────────────────────────────────────────────────────────

pub const XK_HOME: u32 = 0xFF50;
pub const XK_LEFT: u32 = 0xFF51;
pub const XK_UP: u32 = 0xFF52;
pub const XK_RIGHT: u32 = 0xFF53;
pub const XK_DOWN: u32 = 0xFF54;
pub const XK_PAGE_UP: u32 = 0xFF55;
pub const XK_PAGE_DOWN: u32 = 0xFF56;
pub const XK_END: u32 = 0xFF57;

// ── Misc functions ────────────────────────────────────────────────────────────

pub const XK_PRINT: u32 = 0xFF61;
pub const XK_INSERT: u32 = 0xFF63;
pub const XK_NUM_LOCK: u32 = 0xFF7F;

// ── Keypad ────────────────────────────────────────────────────────────────────

pub const XK_KP_ENTER: u32 = 0xFF8D;
pub const XK_KP_HOME: u32 = 0xFF95;
pub const XK_KP_LEFT: u32 = 0xFF96;
pub const XK_KP_UP: u32 = 0xFF97;
pub const XK_KP_RIGHT: u32 = 0xFF98;
pub const XK_KP_DOWN: u32 = 0xFF99;
pub const XK_KP_PAGE_UP: u32 = 0xFF9A;
pub const XK_KP_PAGE_DOWN: u32 = 0xFF9B;
pub const XK_KP_END: u32 = 0xFF9C;
pub const XK_KP_BEGIN: u32 = 0xFF9D;
pub const XK_KP_INSERT: u32 = 0xFF9E;
pub const XK_KP_DELETE: u32 = 0xFF9F;
pub const XK_KP_MULTIPLY: u32 = 0xFFAA;
pub const XK_KP_ADD: u32 = 0xFFAB;
pub const XK_KP_SUBTRACT: u32 = 0xFFAD;
pub const XK_KP_DECIMAL: u32 = 0xFFAE;
pub const XK_KP_DIVIDE: u32 = 0xFFAF;
/// `XK_KP_0`..=`XK_KP_9` are contiguous.
pub const XK_KP_0: u32 = 0xFFB0;
pub const XK_KP_EQUAL: u32 = 0xFFBD;

// ── Function keys ─────────────────────────────────────────────────────────────

/// `XK_F1`..=`XK_F35` are contiguous.
pub const XK_F1: u32 = 0xFFBE;

// ── Modifiers ─────────────────────────────────────────────────────────────────

pub const XK_SHIFT_L: u32 = 0xFFE1;
pub const XK_SHIFT_R: u32 = 0xFFE2;
pub const XK_CONTROL_L: u32 = 0xFFE3;
pub const XK_CONTROL_R: u32 = 0xFFE4;
pub const XK_CAPS_LOCK: u32 = 0xFFE5;
pub const XK_ALT_L: u32 = 0xFFE9;
pub const XK_ALT_R: u32 = 0xFFEA;

const DIGITS: [Key; 10] = [
    Key::Num0,
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num5,
    Key::Num6,
    Key::Num7,
    Key::Num8,
    Key::Num9,
];

const KEYPAD_DIGITS: [Key; 10] = [
    Key::Numpad0,
    Key::Numpad1,
    Key::Numpad2,
    Key::Numpad3,
    Key::Numpad4,
    Key::Numpad5,
    Key::Numpad6,
    Key::Numpad7,
    Key::Numpad8,
    Key::Numpad9,
];

const LETTERS: [Key; 26] = [
    Key::A,
    Key::B,
    Key::C,
    Key::D,
    Key::E,
    Key::F,
    Key::G,
    Key::H,
    Key::I,
    Key::J,
    Key::K,
    Key::L,
    Key::M,
    Key::N,
    Key::O,
    Key::P,
    Key::Q,
    Key::R,
    Key::S,
    Key::T,
    Key::U,
    Key::V,
    Key::W,
    Key::X,
    Key::Y,
    Key::Z,
];

const FUNCTION: [Key; 25] = [
    Key::F1,
    Key::F2,
    Key::F3,
    Key::F4,
    Key::F5,
    Key::F6,
    Key::F7,
    Key::F8,
    Key::F9,
    Key::F10,
    Key::F11,
    Key::F12,
    Key::F13,
    Key::F14,
    Key::F15,
    Key::F16,
    Key::F17,
    Key::F18,
    Key::F19,
    Key::F20,
    Key::F21,
    Key::F22,
    Key::F23,
    Key::F24,
    Key::F25,
];

/// Every `(keysym, Key)` mapping.
pub(crate) fn pairs() -> Vec<(u32, Key)> {
    let mut pairs = Vec::with_capacity(160);

    pairs.extend((0..).zip(DIGITS).map(|(i, k)| (u32::from(b'0') + i, k)));
    // Lower case is what an unshifted letter key reports; upper case shows up
    // on layouts that bind the capital first.
    pairs.extend((0..).zip(LETTERS).map(|(i, k)| (u32::from(b'a') + i, k)));
    pairs.extend((0..).zip(LETTERS).map(|(i, k)| (u32::from(b'A') + i, k)));
    pairs.extend((0..).zip(KEYPAD_DIGITS).map(|(i, k)| (XK_KP_0 + i, k)));
    pairs.extend((0..).zip(FUNCTION).map(|(i, k)| (XK_F1 + i, k)));

    pairs.extend_from_slice(&[
        (u32::from(b' '), Key::Space),
        (u32::from(b'\''), Key::Apostrophe),
        (u32::from(b','), Key::Comma),
        (u32::from(b'-'), Key::Minus),
        (u32::from(b'.'), Key::Period),
        (u32::from(b'/'), Key::Slash),
        (u32::from(b';'), Key::Semicolon),
        (u32::from(b'='), Key::Equal),
        (u32::from(b'['), Key::LeftBracket),
        (u32::from(b'\\'), Key::Backslash),
        (u32::from(b']'), Key::RightBracket),
        (u32::from(b'`'), Key::GraveAccent),
        (XK_BACKSPACE, Key::Backspace),
        (XK_TAB, Key::Tab),
        (XK_RETURN, Key::Enter),
        (XK_PAUSE, Key::Pause),
        (XK_SCROLL_LOCK, Key::ScrollLock),
        (XK_PRINT, Key::PrintScreen),
        (XK_CAPS_LOCK, Key::CapsLock),
        (XK_ESCAPE, Key::Escape),
        (XK_PAGE_UP, Key::PageUp),
        (XK_PAGE_DOWN, Key::PageDown),
        (XK_END, Key::End),
        (XK_HOME, Key::Home),
        (XK_INSERT, Key::Insert),
        (XK_DELETE, Key::Delete),
        (XK_UP, Key::Up),
        (XK_DOWN, Key::Down),
        (XK_LEFT, Key::Left),
        (XK_RIGHT, Key::Right),
        (XK_NUM_LOCK, Key::NumLock),
        // Left/right collapse into one code each.
        (XK_SHIFT_L, Key::Shift),
        (XK_SHIFT_R, Key::Shift),
        (XK_CONTROL_L, Key::Control),
        (XK_CONTROL_R, Key::Control),
        (XK_ALT_L, Key::Alt),
        (XK_ALT_R, Key::Alt),
        // Keypad with NumLock off.
        (XK_KP_INSERT, Key::Numpad0),
        (XK_KP_END, Key::Numpad1),
        (XK_KP_DOWN, Key::Numpad2),
        (XK_KP_PAGE_DOWN, Key::Numpad3),
        (XK_KP_LEFT, Key::Numpad4),
        (XK_KP_BEGIN, Key::Numpad5),
        (XK_KP_RIGHT, Key::Numpad6),
        (XK_KP_HOME, Key::Numpad7),
        (XK_KP_UP, Key::Numpad8),
        (XK_KP_PAGE_UP, Key::Numpad9),
        (XK_KP_DELETE, Key::NumpadDecimal),
        (XK_KP_DECIMAL, Key::NumpadDecimal),
        (XK_KP_ADD, Key::NumpadAdd),
        (XK_KP_SUBTRACT, Key::NumpadSubtract),
        (XK_KP_MULTIPLY, Key::NumpadMultiply),
        (XK_KP_DIVIDE, Key::NumpadDivide),
        (XK_KP_ENTER, Key::NumpadEnter),
        (XK_KP_EQUAL, Key::NumpadEqual),
    ]);

    pairs
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap;

    #[test]
    fn latin1_keys_use_their_character_code() {
        let t = keymap::x11();
        assert_eq!(t.lookup(u32::from(b'a')), Some(Key::A));
        assert_eq!(t.lookup(u32::from(b'Q')), Some(Key::Q));
        assert_eq!(t.lookup(u32::from(b'7')), Some(Key::Num7));
        assert_eq!(t.lookup(u32::from(b' ')), Some(Key::Space));
        assert_eq!(t.lookup(u32::from(b'`')), Some(Key::GraveAccent));
    }

    #[test]
    fn brackets_use_bracket_keysyms_not_braces() {
        let t = keymap::x11();
        assert_eq!(t.lookup(u32::from(b'[')), Some(Key::LeftBracket));
        assert_eq!(t.lookup(u32::from(b']')), Some(Key::RightBracket));
        assert_eq!(t.lookup(u32::from(b'{')), None);
        assert_eq!(t.lookup(u32::from(b'}')), None);
    }

    #[test]
    fn function_keys_run_f1_to_f25() {
        let t = keymap::x11();
        assert_eq!(t.lookup(XK_F1), Some(Key::F1));
        assert_eq!(t.lookup(0xFFC9), Some(Key::F12));
        assert_eq!(t.lookup(0xFFD6), Some(Key::F25));
        assert_eq!(t.lookup(0xFFD7), None);
    }

    #[test]
    fn keypad_resolves_with_and_without_numlock() {
        let t = keymap::x11();
        assert_eq!(t.lookup(XK_KP_END), Some(Key::Numpad1));
        assert_eq!(t.lookup(XK_KP_0 + 1), Some(Key::Numpad1));
        assert_eq!(t.lookup(XK_KP_BEGIN), Some(Key::Numpad5));
        assert_eq!(t.lookup(XK_KP_DELETE), Some(Key::NumpadDecimal));
        assert_eq!(t.lookup(XK_KP_ENTER), Some(Key::NumpadEnter));
        assert_eq!(t.lookup(XK_KP_EQUAL), Some(Key::NumpadEqual));
    }

    #[test]
    fn modifiers_collapse_sides() {
        let t = keymap::x11();
        assert_eq!(t.lookup(XK_SHIFT_L), Some(Key::Shift));
        assert_eq!(t.lookup(XK_SHIFT_R), Some(Key::Shift));
        assert_eq!(t.lookup(XK_CONTROL_L), Some(Key::Control));
        assert_eq!(t.lookup(XK_CONTROL_R), Some(Key::Control));
        assert_eq!(t.lookup(XK_ALT_L), Some(Key::Alt));
        assert_eq!(t.lookup(XK_ALT_R), Some(Key::Alt));
    }

    #[test]
    fn unknown_keysyms_are_unmapped() {
        let t = keymap::x11();
        assert_eq!(t.lookup(0), None);
        assert_eq!(t.lookup(0xFFEB), None); // Super_L
        assert_eq!(t.lookup(0x1000_0000), None);
    }
}
