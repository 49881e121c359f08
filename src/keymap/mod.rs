// ── Native key → portable key tables ──────────────────────────────────────────
//
// One table per native key space:
//   • `vk`     – Win32 virtual-key codes (`WM_KEYDOWN` WPARAM), 0x00..=0xFF.
//   • `keysym` – X11 keysyms (first keysym of the pressed keycode), 0x0000..=0xFFFF.
//
// Both tables are plain data with no platform imports, so they are built and
// tested on every host.  Each is built on first use and shared for the rest of
// the process.

use std::sync::OnceLock;

use crate::keys::Key;

pub mod keysym;
pub mod vk;

/// Read-only lookup from a native key value to a portable `Key`.
///
/// Codes outside the table, and codes inside it without a mapping, both
/// resolve to `None`; callers never see a sentinel value.
#[derive(Debug)]
pub struct KeyTable {
    entries: Box<[Option<Key>]>,
}

impl KeyTable {
    /// Build a table covering native codes `0..len` from `(code, key)` pairs.
    ///
    /// Later pairs win when a code appears twice.  Pairs whose code is not
    /// below `len` are ignored.
    pub fn from_pairs(len: usize, pairs: &[(u32, Key)]) -> Self {
        let mut entries = vec![None; len].into_boxed_slice();
        for &(code, key) in pairs {
            if let Some(slot) = entries.get_mut(code as usize) {
                *slot = Some(key);
            }
        }
        Self { entries }
    }

    /// Resolve a native code.  `None` means "not a key we report".
    pub fn lookup(&self, code: u32) -> Option<Key> {
        self.entries.get(code as usize).copied().flatten()
    }

    /// Number of native codes the table spans.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the table spans no codes at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of native codes with a mapping.
    pub fn mapped(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}

/// The Win32 virtual-key table.
pub fn win32() -> &'static KeyTable {
    static TABLE: OnceLock<KeyTable> = OnceLock::new();
    TABLE.get_or_init(|| KeyTable::from_pairs(vk::TABLE_LEN, &vk::pairs()))
}

/// The X11 keysym table.
pub fn x11() -> &'static KeyTable {
    static TABLE: OnceLock<KeyTable> = OnceLock::new();
    TABLE.get_or_init(|| KeyTable::from_pairs(keysym::TABLE_LEN, &keysym::pairs()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
