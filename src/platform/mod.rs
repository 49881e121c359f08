// ── Platform abstraction layer ────────────────────────────────────────────────
//
// This module defines the interface the rest of the crate uses to talk to the
// OS.  No `unsafe` lives here; all Win32 FFI is confined to the `win32`
// sub-module and never leaks outward.  The X11 backend speaks the wire
// protocol through x11rb and needs no `unsafe` at all.
//
// A backend only moves bytes and events across the OS boundary.  Window
// records, key translation and callback dispatch belong to `Context`.

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;
use crate::framebuffer::Surface;
use crate::keymap::KeyTable;
use crate::keys::MouseButton;

pub mod headless;

#[cfg(windows)]
pub mod win32;

#[cfg(target_os = "linux")]
pub mod x11;

/// The backend `Context::init` opens on this platform.
#[cfg(windows)]
pub type NativeBackend = win32::Win32Backend;

/// The backend `Context::init` opens on this platform.
#[cfg(target_os = "linux")]
pub type NativeBackend = x11::X11Backend;

/// No native window system on this target; only `Context::with_backend`
/// is available.
#[cfg(not(any(windows, target_os = "linux")))]
pub type NativeBackend = headless::HeadlessBackend;

/// Open the window system of the running platform.
#[cfg(windows)]
pub(crate) fn open_native() -> Result<NativeBackend> {
    win32::Win32Backend::register()
}

/// Open the window system of the running platform.
#[cfg(target_os = "linux")]
pub(crate) fn open_native() -> Result<NativeBackend> {
    x11::X11Backend::connect()
}

/// An input or window-manager event, already stripped of platform detail
/// except for the raw key code, which `Context` resolves through the
/// backend's `KeyTable`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeEvent {
    /// The window manager asked the window to close.
    CloseRequested,
    /// A key went down or up.  `code` is in the backend's key space.
    Key { code: u32, pressed: bool },
    /// A primary mouse button went down or up.
    Button { button: MouseButton, pressed: bool },
    /// The wheel moved; one notch is `±1.0`.
    Scroll { offset: f32 },
}

/// One native windowing system.
pub trait Backend {
    /// The native window identifier (`HWND` value, X11 window id, …).
    type Handle: Copy + Eq + Hash + Debug;

    /// The table that resolves `NativeEvent::Key` codes from this backend.
    fn key_table(&self) -> &KeyTable;

    /// Create and show a fixed-size window whose client area is exactly
    /// `width` x `height` pixels.
    fn create_window(&mut self, title: &str, width: u32, height: u32) -> Result<Self::Handle>;

    /// Hide and destroy a window created by this backend.
    fn destroy_window(&mut self, handle: Self::Handle) -> Result<()>;

    /// Append every event queued right now to `out`, oldest first, without
    /// waiting for more.
    fn drain_events(&mut self, out: &mut Vec<(Self::Handle, NativeEvent)>) -> Result<()>;

    /// Show `surface` in the window's client area, synchronously.
    fn present(&mut self, handle: Self::Handle, surface: &Surface) -> Result<()>;

    /// Pointer position relative to the window's client area, top-left origin.
    fn cursor_pos(&self, handle: Self::Handle) -> Result<(f32, f32)>;

    /// Release process-wide resources.  Called once, after every window has
    /// been destroyed.
    fn shutdown(&mut self) -> Result<()>;
}
