// ── X11 platform implementation ───────────────────────────────────────────────
//
// Responsibilities in this file:
//   • Connect to the X server and check it can show 32-bit BGRX images as-is.
//   • Create fixed-size top-level windows that speak WM_DELETE_WINDOW.
//   • Translate queued events (keys via the keyboard mapping, buttons, wheel,
//     close requests) into `NativeEvent`s.
//   • Upload surfaces with PutImage, split into bands that respect the
//     server's maximum request length.
//
// Everything goes over the wire through x11rb; no `unsafe` and no libX11.

use std::collections::HashMap;

use log::{debug, trace, warn};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::properties::WmSizeHints;
use x11rb::protocol::xproto::{
    AtomEnum, ConnectionExt as _, CreateGCAux, CreateWindowAux, EventMask, Gcontext,
    ImageFormat, ImageOrder, Keycode, Keysym, Mapping, PropMode, Setup, Window, WindowClass,
};
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::COPY_DEPTH_FROM_PARENT;

use crate::error::{Error, Result};
use crate::framebuffer::Surface;
use crate::keymap::{self, KeyTable};
use crate::keys::MouseButton;

use super::{Backend, NativeEvent};

/// Fixed part of a PutImage request, in bytes.
const PUT_IMAGE_HEADER: usize = 24;

x11rb::atom_manager! {
    /// Atoms interned once per connection.
    Atoms: AtomsCookie {
        WM_PROTOCOLS,
        WM_DELETE_WINDOW,
        _NET_WM_NAME,
        UTF8_STRING,
    }
}

// ── Keyboard mapping ──────────────────────────────────────────────────────────

/// Keycode → keysym table, fetched at connect time and after `MappingNotify`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct KeyboardMap {
    min_keycode: Keycode,
    keysyms_per_keycode: u8,
    keysyms: Vec<Keysym>,
}

impl KeyboardMap {
    fn fetch(conn: &RustConnection) -> Result<Self> {
        let setup = conn.setup();
        let (min, max) = (setup.min_keycode, setup.max_keycode);
        let reply = conn.get_keyboard_mapping(min, max - min + 1)?.reply()?;
        Ok(Self {
            min_keycode: min,
            keysyms_per_keycode: reply.keysyms_per_keycode,
            keysyms: reply.keysyms,
        })
    }

    /// The unshifted keysym bound to `keycode`, or 0 (`NoSymbol`).
    fn first_keysym(&self, keycode: Keycode) -> Keysym {
        let Some(row) = keycode.checked_sub(self.min_keycode) else {
            return 0;
        };
        let index = usize::from(row) * usize::from(self.keysyms_per_keycode);
        self.keysyms.get(index).copied().unwrap_or(0)
    }
}

/// Core-protocol button numbers: 1 left, 2 middle, 3 right, 4/5 wheel.
/// Horizontal wheel (6/7) and side buttons are not reported.
fn button_event(detail: u8, pressed: bool) -> Option<NativeEvent> {
    let button = match detail {
        1 => MouseButton::Left,
        2 => MouseButton::Middle,
        3 => MouseButton::Right,
        // The wheel sends a press/release pair per notch; count the press.
        4 if pressed => return Some(NativeEvent::Scroll { offset: 1.0 }),
        5 if pressed => return Some(NativeEvent::Scroll { offset: -1.0 }),
        _ => return None,
    };
    Some(NativeEvent::Button { button, pressed })
}

/// Only depth 24/32 visuals stored as 32 bits per pixel, least significant
/// byte first, take our BGRX surface byte-for-byte.
fn check_visual(setup: &Setup, depth: u8) -> Result<()> {
    let bits_per_pixel = setup
        .pixmap_formats
        .iter()
        .find(|f| f.depth == depth)
        .map_or(0, |f| f.bits_per_pixel);
    let depth_ok = depth == 24 || depth == 32;
    if !depth_ok || bits_per_pixel != 32 || setup.image_byte_order != ImageOrder::LSB_FIRST {
        return Err(Error::UnsupportedVisual {
            depth,
            bits_per_pixel,
        });
    }
    Ok(())
}

fn extent(width: u32, height: u32) -> Result<(u16, u16)> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(Error::InvalidSize { width, height }),
    }
}

// ── Backend ───────────────────────────────────────────────────────────────────

/// A connection to an X server plus the windows created through it.
pub struct X11Backend {
    conn: RustConnection,
    screen_num: usize,
    depth: u8,
    atoms: Atoms,
    keyboard: KeyboardMap,
    /// Every live window and the graphics context used to draw into it.
    windows: HashMap<Window, Gcontext>,
}

impl X11Backend {
    /// Connect to the display named by `$DISPLAY`.
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;

        let depth = {
            let setup = conn.setup();
            let screen = &setup.roots[screen_num];
            check_visual(setup, screen.root_depth)?;
            debug!(
                "connected to X server: screen {screen_num}, {}x{}, depth {}",
                screen.width_in_pixels, screen.height_in_pixels, screen.root_depth
            );
            screen.root_depth
        };

        let atoms = Atoms::new(&conn)?.reply()?;
        let keyboard = KeyboardMap::fetch(&conn)?;

        Ok(Self {
            conn,
            screen_num,
            depth,
            atoms,
            keyboard,
            windows: HashMap::new(),
        })
    }

    fn set_title(&self, window: Window, title: &str) -> Result<()> {
        let bytes = title.as_bytes();
        self.conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NAME,
            AtomEnum::STRING,
            bytes,
        )?;
        self.conn.change_property8(
            PropMode::REPLACE,
            window,
            self.atoms._NET_WM_NAME,
            self.atoms.UTF8_STRING,
            bytes,
        )?;
        // WM_CLASS is "instance\0class\0"; the title doubles as both.
        let class = [bytes, b"\0", bytes, b"\0"].concat();
        self.conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            &class,
        )?;
        Ok(())
    }

    fn translate(&mut self, event: Event, out: &mut Vec<(Window, NativeEvent)>) -> Result<()> {
        match translate_event(&event, &self.atoms, &self.keyboard) {
            Translated::Event(window, ev) => out.push((window, ev)),
            Translated::KeyboardChanged => {
                debug!("keyboard mapping changed; refetching");
                self.keyboard = KeyboardMap::fetch(&self.conn)?;
            }
            Translated::Ignored => match event {
                Event::Error(e) => warn!("X11 error: {e:?}"),
                other => trace!("ignored X11 event {other:?}"),
            },
        }
        Ok(())
    }

    /// Name, size hints, close protocol and GC for a freshly created window.
    fn configure_window(&self, window: Window, title: &str, w: u16, h: u16) -> Result<Gcontext> {
        self.set_title(window, title)?;

        // Not resizable: pin min and max to the requested size.
        let mut hints = WmSizeHints::new();
        hints.min_size = Some((i32::from(w), i32::from(h)));
        hints.max_size = Some((i32::from(w), i32::from(h)));
        hints.set_normal_hints(&self.conn, window)?;

        self.conn.change_property32(
            PropMode::REPLACE,
            window,
            self.atoms.WM_PROTOCOLS,
            AtomEnum::ATOM,
            &[self.atoms.WM_DELETE_WINDOW],
        )?;

        let gc = self.conn.generate_id()?;
        self.conn.create_gc(gc, window, &CreateGCAux::new())?;
        Ok(gc)
    }
}

// ── Event translation ─────────────────────────────────────────────────────────

/// Outcome of looking at one X11 event.
#[derive(Debug, PartialEq)]
enum Translated {
    Event(Window, NativeEvent),
    /// The keyboard mapping must be fetched again.
    KeyboardChanged,
    Ignored,
}

fn translate_event(event: &Event, atoms: &Atoms, keyboard: &KeyboardMap) -> Translated {
    let key = |window: Window, keycode: Keycode, pressed: bool| {
        let code = keyboard.first_keysym(keycode);
        Translated::Event(window, NativeEvent::Key { code, pressed })
    };
    let button = |window: Window, detail: u8, pressed: bool| match button_event(detail, pressed) {
        Some(ev) => Translated::Event(window, ev),
        None => Translated::Ignored,
    };

    match event {
        Event::KeyPress(e) => key(e.event, e.detail, true),
        Event::KeyRelease(e) => key(e.event, e.detail, false),
        Event::ButtonPress(e) => button(e.event, e.detail, true),
        Event::ButtonRelease(e) => button(e.event, e.detail, false),
        Event::ClientMessage(e) => {
            let is_delete = e.format == 32
                && e.type_ == atoms.WM_PROTOCOLS
                && e.data.as_data32()[0] == atoms.WM_DELETE_WINDOW;
            if is_delete {
                Translated::Event(e.window, NativeEvent::CloseRequested)
            } else {
                Translated::Ignored
            }
        }
        Event::MappingNotify(e) if e.request == Mapping::KEYBOARD => Translated::KeyboardChanged,
        _ => Translated::Ignored,
    }
}

impl Backend for X11Backend {
    type Handle = Window;

    fn key_table(&self) -> &KeyTable {
        keymap::x11()
    }

    fn create_window(&mut self, title: &str, width: u32, height: u32) -> Result<Window> {
        let (w, h) = extent(width, height)?;
        let window = self.conn.generate_id()?;
        let screen = &self.conn.setup().roots[self.screen_num];

        let aux = CreateWindowAux::new()
            .background_pixel(screen.black_pixel)
            .border_pixel(screen.white_pixel)
            .event_mask(
                EventMask::KEY_PRESS
                    | EventMask::KEY_RELEASE
                    | EventMask::BUTTON_PRESS
                    | EventMask::BUTTON_RELEASE,
            );
        self.conn
            .create_window(
                COPY_DEPTH_FROM_PARENT,
                window,
                screen.root,
                0,
                0,
                w,
                h,
                0,
                WindowClass::INPUT_OUTPUT,
                screen.root_visual,
                &aux,
            )?
            .check()?;

        let gc = match self.configure_window(window, title, w, h) {
            Ok(gc) => gc,
            Err(e) => {
                // Do not leave a half-built window behind.
                let _ = self.conn.destroy_window(window);
                let _ = self.conn.flush();
                return Err(e);
            }
        };

        self.conn.map_window(window)?;
        self.conn.flush()?;

        self.windows.insert(window, gc);
        Ok(window)
    }

    fn destroy_window(&mut self, handle: Window) -> Result<()> {
        if let Some(gc) = self.windows.remove(&handle) {
            self.conn.free_gc(gc)?;
        }
        self.conn.unmap_window(handle)?;
        self.conn.destroy_window(handle)?;
        self.conn.flush()?;
        Ok(())
    }

    fn drain_events(&mut self, out: &mut Vec<(Window, NativeEvent)>) -> Result<()> {
        while let Some(event) = self.conn.poll_for_event()? {
            self.translate(event, out)?;
        }
        self.conn.flush()?;
        Ok(())
    }

    fn present(&mut self, handle: Window, surface: &Surface) -> Result<()> {
        let Some(&gc) = self.windows.get(&handle) else {
            return Ok(());
        };
        let (width, _) = extent(surface.width(), surface.height())?;
        let stride = surface.stride();
        let budget = self.conn.maximum_request_bytes().saturating_sub(PUT_IMAGE_HEADER);
        let band_rows = (budget / stride).max(1);

        for (band, rows) in surface.as_bytes().chunks(band_rows * stride).enumerate() {
            // Bounded by `extent` above, so both fit.
            let y = (band * band_rows) as i16;
            let height = (rows.len() / stride) as u16;
            self.conn.put_image(
                ImageFormat::Z_PIXMAP,
                handle,
                gc,
                width,
                height,
                0,
                y,
                0,
                self.depth,
                rows,
            )?;
        }
        self.conn.flush()?;
        Ok(())
    }

    fn cursor_pos(&self, handle: Window) -> Result<(f32, f32)> {
        let reply = self.conn.query_pointer(handle)?.reply()?;
        Ok((f32::from(reply.win_x), f32::from(reply.win_y)))
    }

    fn shutdown(&mut self) -> Result<()> {
        for (window, gc) in self.windows.drain() {
            self.conn.free_gc(gc)?;
            self.conn.destroy_window(window)?;
        }
        self.conn.flush()?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
