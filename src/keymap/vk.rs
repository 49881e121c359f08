// ── Win32 virtual-key codes ───────────────────────────────────────────────────
//
// Source of truth: WinUser.h (`VK_*`).  Kept as plain integers so the table can
// be tested off Windows.  Letters and digits use their ASCII values and have
// no named constant.

use crate::keys::Key;

/// Virtual-key codes fit in one byte.
pub(crate) const TABLE_LEN: usize = 0x100;

// ── Editing & control ─────────────────────────────────────────────────────────

pub const VK_BACK: u32 = 0x08;
pub const VK_TAB: u32 = 0x09;
pub const VK_RETURN: u32 = 0x0D;
pub const VK_SHIFT: u32 = 0x10;
pub const VK_CONTROL: u32 = 0x11;
/// Alt.  Delivered with `WM_SYSKEYDOWN`, not `WM_KEYDOWN`.
pub const VK_MENU: u32 = 0x12;
pub const VK_PAUSE: u32 = 0x13;
pub const VK_CAPITAL: u32 = 0x14;
pub const VK_ESCAPE: u32 = 0x1B;
pub const VK_SPACE: u32 = 0x20;

// ── Navigation ────────────────────────────────────────────────────────────────

pub const VK_PRIOR: u32 = 0x21;
pub const VK_NEXT: u32 = 0x22;
pub const VK_END: u32 = 0x23;
pub const VK_HOME: u32 = 0x24;
pub const VK_LEFT: u32 = 0x25;
pub const VK_UP: u32 = 0x26;
pub const VK_RIGHT: u32 = 0x27;
pub const VK_DOWN: u32 = 0x28;
pub const VK_SNAPSHOT: u32 = 0x2C;
pub const VK_INSERT: u32 = 0x2D;
pub const VK_DELETE: u32 = 0x2E;

// ── Numpad ────────────────────────────────────────────────────────────────────

pub const VK_NUMPAD0: u32 = 0x60;
pub const VK_MULTIPLY: u32 = 0x6A;
pub const VK_ADD: u32 = 0x6B;
pub const VK_SUBTRACT: u32 = 0x6D;
pub const VK_DECIMAL: u32 = 0x6E;
pub const VK_DIVIDE: u32 = 0x6F;

// ── Function keys ─────────────────────────────────────────────────────────────

/// `VK_F1`..=`VK_F24` are contiguous.
pub const VK_F1: u32 = 0x70;
pub const VK_NUMLOCK: u32 = 0x90;
pub const VK_SCROLL: u32 = 0x91;

// ── Sided modifiers (only seen through raw input or GetKeyState) ──────────────

pub const VK_LSHIFT: u32 = 0xA0;
pub const VK_RSHIFT: u32 = 0xA1;
pub const VK_LCONTROL: u32 = 0xA2;
pub const VK_RCONTROL: u32 = 0xA3;
pub const VK_LMENU: u32 = 0xA4;
pub const VK_RMENU: u32 = 0xA5;

// ── OEM punctuation (US layout) ───────────────────────────────────────────────

/// `;:`
pub const VK_OEM_1: u32 = 0xBA;
/// `=+`
pub const VK_OEM_PLUS: u32 = 0xBB;
pub const VK_OEM_COMMA: u32 = 0xBC;
pub const VK_OEM_MINUS: u32 = 0xBD;
pub const VK_OEM_PERIOD: u32 = 0xBE;
/// `/?`
pub const VK_OEM_2: u32 = 0xBF;
/// `` `~ ``
pub const VK_OEM_3: u32 = 0xC0;
/// `[{`
pub const VK_OEM_4: u32 = 0xDB;
/// `\|`
pub const VK_OEM_5: u32 = 0xDC;
/// `]}`
pub const VK_OEM_6: u32 = 0xDD;
/// `'"`
pub const VK_OEM_7: u32 = 0xDE;

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

const NUMPAD: [Key; 10] = [
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

const FUNCTION: [Key; 24] = [
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
];

/// Every `(virtual key, Key)` mapping.
///
/// Win32 has no virtual key for F25, numpad Enter (it is `VK_RETURN` with the
/// extended bit) or numpad `=`, so those keys never come from this table.
pub(crate) fn pairs() -> Vec<(u32, Key)> {
    let mut pairs = Vec::with_capacity(128);

    pairs.extend((0..).zip(DIGITS).map(|(i, k)| (u32::from(b'0') + i, k)));
    pairs.extend((0..).zip(LETTERS).map(|(i, k)| (u32::from(b'A') + i, k)));
    pairs.extend((0..).zip(NUMPAD).map(|(i, k)| (VK_NUMPAD0 + i, k)));
    pairs.extend((0..).zip(FUNCTION).map(|(i, k)| (VK_F1 + i, k)));

    pairs.extend_from_slice(&[
        (VK_BACK, Key::Backspace),
        (VK_TAB, Key::Tab),
        (VK_RETURN, Key::Enter),
        (VK_PAUSE, Key::Pause),
        (VK_SCROLL, Key::ScrollLock),
        (VK_SNAPSHOT, Key::PrintScreen),
        (VK_CAPITAL, Key::CapsLock),
        (VK_ESCAPE, Key::Escape),
        (VK_SPACE, Key::Space),
        (VK_PRIOR, Key::PageUp),
        (VK_NEXT, Key::PageDown),
        (VK_END, Key::End),
        (VK_HOME, Key::Home),
        (VK_INSERT, Key::Insert),
        (VK_DELETE, Key::Delete),
        (VK_UP, Key::Up),
        (VK_DOWN, Key::Down),
        (VK_LEFT, Key::Left),
        (VK_RIGHT, Key::Right),
        (VK_NUMLOCK, Key::NumLock),
        // Left/right collapse into one code each.
        (VK_SHIFT, Key::Shift),
        (VK_LSHIFT, Key::Shift),
        (VK_RSHIFT, Key::Shift),
        (VK_CONTROL, Key::Control),
        (VK_LCONTROL, Key::Control),
        (VK_RCONTROL, Key::Control),
        (VK_MENU, Key::Alt),
        (VK_LMENU, Key::Alt),
        (VK_RMENU, Key::Alt),
        (VK_ADD, Key::NumpadAdd),
        (VK_SUBTRACT, Key::NumpadSubtract),
        (VK_MULTIPLY, Key::NumpadMultiply),
        (VK_DIVIDE, Key::NumpadDivide),
        (VK_DECIMAL, Key::NumpadDecimal),
        (VK_OEM_1, Key::Semicolon),
        (VK_OEM_2, Key::Slash),
        (VK_OEM_3, Key::GraveAccent),
        (VK_OEM_4, Key::LeftBracket),
        (VK_OEM_5, Key::Backslash),
        (VK_OEM_6, Key::RightBracket),
        (VK_OEM_7, Key::Apostrophe),
        (VK_OEM_COMMA, Key::Comma),
        (VK_OEM_MINUS, Key::Minus),
        (VK_OEM_PERIOD, Key::Period),
        (VK_OEM_PLUS, Key::Equal),
    ]);

    pairs
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap;

    #[test]
    fn ascii_letters_and_digits() {
        let t = keymap::win32();
        assert_eq!(t.lookup(u32::from(b'A')), Some(Key::A));
        assert_eq!(t.lookup(u32::from(b'Z')), Some(Key::Z));
        assert_eq!(t.lookup(u32::from(b'0')), Some(Key::Num0));
        assert_eq!(t.lookup(u32::from(b'9')), Some(Key::Num9));
        // Lower-case ASCII is VK_NUMPAD1.. territory, not letters.
        assert_eq!(t.lookup(u32::from(b'a')), Some(Key::Numpad1));
    }

    #[test]
    fn function_keys_run_f1_to_f24() {
        let t = keymap::win32();
        assert_eq!(t.lookup(VK_F1), Some(Key::F1));
        assert_eq!(t.lookup(0x7B), Some(Key::F12));
        assert_eq!(t.lookup(0x87), Some(Key::F24));
        assert_eq!(t.lookup(0x88), None);
    }

    #[test]
    fn modifiers_collapse_sides() {
        let t = keymap::win32();
        for code in [VK_SHIFT, VK_LSHIFT, VK_RSHIFT] {
            assert_eq!(t.lookup(code), Some(Key::Shift));
        }
        for code in [VK_CONTROL, VK_LCONTROL, VK_RCONTROL] {
            assert_eq!(t.lookup(code), Some(Key::Control));
        }
        for code in [VK_MENU, VK_LMENU, VK_RMENU] {
            assert_eq!(t.lookup(code), Some(Key::Alt));
        }
    }

    #[test]
    fn oem_punctuation() {
        let t = keymap::win32();
        assert_eq!(t.lookup(VK_OEM_1), Some(Key::Semicolon));
        assert_eq!(t.lookup(VK_OEM_PLUS), Some(Key::Equal));
        assert_eq!(t.lookup(VK_OEM_4), Some(Key::LeftBracket));
        assert_eq!(t.lookup(VK_OEM_7), Some(Key::Apostrophe));
    }

    #[test]
    fn unassigned_codes_are_unmapped() {
        let t = keymap::win32();
        assert_eq!(t.lookup(0x00), None);
        assert_eq!(t.lookup(0x5B), None); // VK_LWIN
        assert_eq!(t.lookup(0xFF), None);
        assert_eq!(t.lookup(0x100), None);
    }
}
