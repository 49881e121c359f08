// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in twh return `error::Result<T>`.  Every variant is a
// setup failure or a misuse of the API; nothing here is transient, so nothing
// is retried.

use crate::window::WindowId;

/// Every error that twh can produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A Win32 API call returned a failure code.
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// Could not open the X display.
    #[cfg(target_os = "linux")]
    #[error("cannot connect to the X server: {0}")]
    X11Connect(#[from] x11rb::errors::ConnectError),

    /// The X connection broke while sending or receiving.
    #[cfg(target_os = "linux")]
    #[error("X11 connection error: {0}")]
    X11Connection(#[from] x11rb::errors::ConnectionError),

    /// The X server answered a request with an error.
    #[cfg(target_os = "linux")]
    #[error("X11 request failed: {0}")]
    X11Reply(#[from] x11rb::errors::ReplyError),

    /// The X server answered with an error or ran out of resource ids.
    #[cfg(target_os = "linux")]
    #[error("X11 request failed: {0}")]
    X11ReplyOrId(#[from] x11rb::errors::ReplyOrIdError),

    /// The default visual cannot display a 32-bit BGRX image as-is.
    #[error("unsupported visual: depth {depth}, {bits_per_pixel} bits per pixel")]
    UnsupportedVisual { depth: u8, bits_per_pixel: u8 },

    /// A window or framebuffer was requested with a zero or oversized extent.
    #[error("invalid size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// A pixel coordinate lies outside the framebuffer.
    #[error("pixel ({x}, {y}) is outside a {width}x{height} framebuffer")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// `render` was handed a framebuffer whose size differs from the window.
    #[error(
        "framebuffer is {framebuffer_width}x{framebuffer_height} \
         but the window surface is {surface_width}x{surface_height}"
    )]
    SizeMismatch {
        framebuffer_width: u32,
        framebuffer_height: u32,
        surface_width: u32,
        surface_height: u32,
    },

    /// The id does not name a live window (already released, or never ours).
    #[error("unknown window {0:?}")]
    UnknownWindow(WindowId),

    /// A standard I/O error (config file open, read, …).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for `WindowConfig`.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

// Convert a windows-crate error (HRESULT) directly into an `Error` so that
// `?` can be used on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for Error {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

// ── Tests ─────────────────────────────────────────────────────────────────────
