// ── Portable input codes ──────────────────────────────────────────────────────
//
// The key and button enumerations handed to application callbacks.  They are
// decoupled from Win32 virtual keys and X11 keysyms; see `keymap` for the
// per-platform translation tables.

/// A keyboard key, independent of the native platform.
///
/// Declaration order is part of the API: `Key::index()` follows it and
/// `Key::COUNT` bounds it, so per-key arrays can be sized statically.
///
/// Shift, Control and Alt are reported without a left/right distinction on
/// every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    // ── Printable keys ────────────────────────────────────────────────────────
    Space,
    /// `'`
    Apostrophe,
    /// `,`
    Comma,
    /// `-`
    Minus,
    /// `.`
    Period,
    /// `/`
    Slash,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    /// `;`
    Semicolon,
    /// `=`
    Equal,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    /// `[`
    LeftBracket,
    /// `\`
    Backslash,
    /// `]`
    RightBracket,
    /// `` ` ``
    GraveAccent,

    // ── Function keys ─────────────────────────────────────────────────────────
    Escape,
    Enter,
    Tab,
    Backspace,
    Insert,
    Delete,
    Right,
    Left,
    Down,
    Up,
    PageUp,
    PageDown,
    Home,
    End,
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,
    F25,

    // ── Numpad ────────────────────────────────────────────────────────────────
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadDecimal,
    NumpadDivide,
    NumpadMultiply,
    NumpadSubtract,
    NumpadAdd,
    NumpadEnter,
    NumpadEqual,

    // ── Modifiers ─────────────────────────────────────────────────────────────
    Shift,
    Control,
    Alt,
}

impl Key {
    /// Number of portable keys; one past the largest `index()`.
    pub const COUNT: usize = Key::Alt as usize + 1;

    /// Position of this key in declaration order, in `0..Key::COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A mouse button reported to mouse callbacks.
///
/// Only the three primary buttons are reported; side buttons are ignored and
/// the wheel is delivered through the scroll callback instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Number of reportable buttons.
    pub const COUNT: usize = 3;
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_bounds_every_index() {
        assert_eq!(Key::Space.index(), 0);
        assert_eq!(Key::Alt.index(), Key::COUNT - 1);
        assert!(Key::NumpadEqual.index() < Key::COUNT);
    }

    #[test]
    fn declaration_order_is_stable() {
        assert!(Key::Num9 < Key::Semicolon);
        assert!(Key::GraveAccent < Key::Escape);
        assert!(Key::F25 < Key::Numpad0);
        assert!(Key::NumpadEqual < Key::Shift);
        assert_eq!(Key::B.index() - Key::A.index(), 1);
    }
}
