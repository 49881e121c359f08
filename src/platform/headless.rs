// ── Headless backend ──────────────────────────────────────────────────────────
//
// A backend with no display: windows are plain records, events come from an
// in-memory queue the caller fills, and presented surfaces are kept for
// inspection.  Used by the test-suite and by CI machines without an X server.

use std::collections::{HashMap, VecDeque};

use log::debug;

use crate::error::{Error, Result};
use crate::framebuffer::Surface;
use crate::keymap::{self, KeyTable};

use super::{Backend, NativeEvent};

#[derive(Debug)]
struct HeadlessWindow {
    title: String,
    size: (u32, u32),
    cursor: (f32, f32),
    frame: Option<Vec<u8>>,
    presents: usize,
}

/// In-memory stand-in for a native windowing system.
#[derive(Debug)]
pub struct HeadlessBackend {
    key_table: &'static KeyTable,
    next_handle: u32,
    windows: HashMap<u32, HeadlessWindow>,
    queue: VecDeque<(u32, NativeEvent)>,
    shut_down: bool,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    /// A headless backend whose key codes are Win32 virtual keys.
    pub fn new() -> Self {
        Self::with_key_table(keymap::win32())
    }

    /// A headless backend that resolves key codes through `key_table`.
    pub fn with_key_table(key_table: &'static KeyTable) -> Self {
        Self {
            key_table,
            next_handle: 1,
            windows: HashMap::new(),
            queue: VecDeque::new(),
            shut_down: false,
        }
    }

    /// Queue an event as if the window system had produced it.
    ///
    /// The handle does not have to name a live window; such events are
    /// dropped by the event pump, as they would be for a destroyed window.
    pub fn push_event(&mut self, handle: u32, event: NativeEvent) {
        self.queue.push_back((handle, event));
    }

    /// Number of events not yet drained.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Move the pointer over `handle`.
    pub fn set_cursor(&mut self, handle: u32, x: f32, y: f32) {
        if let Some(w) = self.windows.get_mut(&handle) {
            w.cursor = (x, y);
        }
    }

    /// The bytes of the most recent `present` for `handle`.
    pub fn last_frame(&self, handle: u32) -> Option<&[u8]> {
        self.windows.get(&handle)?.frame.as_deref()
    }

    /// How many times `handle` has been presented.
    pub fn present_count(&self, handle: u32) -> usize {
        self.windows.get(&handle).map_or(0, |w| w.presents)
    }

    pub fn is_open(&self, handle: u32) -> bool {
        self.windows.contains_key(&handle)
    }

    pub fn window_title(&self, handle: u32) -> Option<&str> {
        self.windows.get(&handle).map(|w| w.title.as_str())
    }

    pub fn open_windows(&self) -> usize {
        self.windows.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Backend for HeadlessBackend {
    type Handle = u32;

    fn key_table(&self) -> &KeyTable {
        self.key_table
    }

    fn create_window(&mut self, title: &str, width: u32, height: u32) -> Result<u32> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidSize { width, height });
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.windows.insert(
            handle,
            HeadlessWindow {
                title: title.to_owned(),
                size: (width, height),
                cursor: (0.0, 0.0),
                frame: None,
                presents: 0,
            },
        );
        debug!("headless window {handle} created ({width}x{height})");
        Ok(handle)
    }

    fn destroy_window(&mut self, handle: u32) -> Result<()> {
        self.windows.remove(&handle);
        Ok(())
    }

    fn drain_events(&mut self, out: &mut Vec<(u32, NativeEvent)>) -> Result<()> {
        out.extend(self.queue.drain(..));
        Ok(())
    }

    fn present(&mut self, handle: u32, surface: &Surface) -> Result<()> {
        if let Some(w) = self.windows.get_mut(&handle) {
            debug_assert_eq!(w.size, (surface.width(), surface.height()));
            w.frame = Some(surface.as_bytes().to_vec());
            w.presents += 1;
        }
        Ok(())
    }

    fn cursor_pos(&self, handle: u32) -> Result<(f32, f32)> {
        Ok(self.windows.get(&handle).map_or((0.0, 0.0), |w| w.cursor))
    }

    fn shutdown(&mut self) -> Result<()> {
        self.queue.clear();
        self.shut_down = true;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::MouseButton;

    #[test]
    fn handles_are_unique() {
        let mut b = HeadlessBackend::new();
        let h1 = b.create_window("a", 1, 1).expect("window");
        let h2 = b.create_window("b", 1, 1).expect("window");
        assert_ne!(h1, h2);
        assert_eq!(b.open_windows(), 2);
        assert_eq!(b.window_title(h2), Some("b"));
    }

    #[test]
    fn drain_preserves_order_and_empties_queue() {
        let mut b = HeadlessBackend::new();
        b.push_event(1, NativeEvent::CloseRequested);
        b.push_event(1, NativeEvent::Scroll { offset: -1.0 });
        b.push_event(
            2,
            NativeEvent::Button {
                button: MouseButton::Middle,
                pressed: true,
            },
        );

        let mut out = Vec::new();
        b.drain_events(&mut out).expect("drain");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], (1, NativeEvent::CloseRequested));
        assert_eq!(out[1], (1, NativeEvent::Scroll { offset: -1.0 }));
        assert_eq!(b.pending(), 0);

        out.clear();
        b.drain_events(&mut out).expect("drain");
        assert!(out.is_empty());
    }

    #[test]
    fn destroy_forgets_the_window() {
        let mut b = HeadlessBackend::new();
        let h = b.create_window("a", 2, 2).expect("window");
        b.set_cursor(h, 1.0, 2.0);
        assert_eq!(b.cursor_pos(h).expect("cursor"), (1.0, 2.0));
        b.destroy_window(h).expect("destroy");
        assert!(!b.is_open(h));
        assert_eq!(b.cursor_pos(h).expect("cursor"), (0.0, 0.0));
    }

    #[test]
    fn zero_sized_windows_are_refused() {
        let mut b = HeadlessBackend::new();
        assert!(b.create_window("a", 0, 5).is_err());
    }
}
