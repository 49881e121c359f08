// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32` – Win32 / WinAPI FFI
// Each unsafe block in that module MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! twh: a tiny window helper.
//!
//! Opens fixed-size native windows (Win32 or X11), delivers keyboard, mouse
//! button and wheel input to per-window callbacks, and shows an RGB
//! framebuffer in a window's client area.
//!
//! ```no_run
//! use twh::{Context, Framebuffer, Key};
//!
//! # fn main() -> twh::Result<()> {
//! let mut ctx = Context::init()?;
//! let id = ctx.create_window("hello", 320, 240)?;
//! ctx.window_mut(id)?.set_key_callback(|w, key, pressed| {
//!     if key == Key::Escape && pressed {
//!         w.close();
//!     }
//! });
//!
//! let mut fb = Framebuffer::new(320, 240)?;
//! fb.fill(0x336699);
//! while !ctx.should_close(id)? {
//!     ctx.render(id, &fb)?;
//!     ctx.poll_events()?;
//! }
//! ctx.release_window(id)?;
//! ctx.terminate()
//! # }
//! ```

pub mod config;
mod context;
pub mod error;
pub mod framebuffer;
pub mod keymap;
mod keys;
pub mod platform;
mod time;
mod window;

pub use config::WindowConfig;
pub use context::Context;
pub use error::{Error, Result};
pub use framebuffer::{Framebuffer, Surface};
pub use keys::{Key, MouseButton};
pub use platform::headless::HeadlessBackend;
pub use platform::{Backend, NativeBackend, NativeEvent};
pub use window::{KeyCallback, MouseCallback, ScrollCallback, Window, WindowId};
