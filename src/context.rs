// ── Context ───────────────────────────────────────────────────────────────────
//
// `Context` owns one backend and every window opened through it.  Window
// records live in a slotmap arena keyed by `WindowId`; a side-table maps
// native handles back to ids so the event pump can route what the backend
// drains.  Everything runs on the thread that created the context.

use std::collections::HashMap;

use log::{debug, trace, warn};
use slotmap::SlotMap;

use crate::config::WindowConfig;
use crate::error::{Error, Result};
use crate::framebuffer::{blit_bgr, Framebuffer};
use crate::platform::{Backend, NativeBackend, NativeEvent};
use crate::time::Clock;
use crate::window::{Window, WindowId};

struct Entry<H> {
    handle: H,
    window: Window,
}

/// The library instance: one window system connection plus its windows.
pub struct Context<B: Backend = NativeBackend> {
    backend: B,
    windows: SlotMap<WindowId, Entry<B::Handle>>,
    routes: HashMap<B::Handle, WindowId>,
    /// Reused between polls so draining does not allocate every frame.
    events: Vec<(B::Handle, NativeEvent)>,
    clock: Clock,
    terminated: bool,
}

#[cfg(any(windows, target_os = "linux"))]
impl Context<NativeBackend> {
    /// Connect to the platform's window system.
    pub fn init() -> Result<Self> {
        let backend = crate::platform::open_native()?;
        debug!("native backend ready");
        Ok(Self::with_backend(backend))
    }
}

impl<B: Backend> Context<B> {
    /// Wrap an already opened backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            windows: SlotMap::with_key(),
            routes: HashMap::new(),
            events: Vec::new(),
            clock: Clock::new(),
            terminated: false,
        }
    }

    /// Release every remaining window and close the backend.
    ///
    /// Dropping a context does the same but can only log failures.
    pub fn terminate(mut self) -> Result<()> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<()> {
        self.terminated = true;
        let mut first_error = None;

        self.routes.clear();
        for (id, entry) in self.windows.drain() {
            debug!("releasing window {id:?} at teardown");
            if let Err(e) = self.backend.destroy_window(entry.handle) {
                first_error.get_or_insert(e);
            }
        }
        if let Err(e) = self.backend.shutdown() {
            first_error.get_or_insert(e);
        }
        debug!("context terminated");

        first_error.map_or(Ok(()), Err)
    }

    /// Seconds since the first call to `time`; the first call returns `0.0`.
    pub fn time(&self) -> f64 {
        self.clock.seconds()
    }

    // ── Windows ───────────────────────────────────────────────────────────────

    /// Open a visible, fixed-size window with a `width` x `height` client area.
    pub fn create_window(&mut self, title: &str, width: u32, height: u32) -> Result<WindowId> {
        // Allocating the surface validates the size before anything native
        // is created.
        let mut window = Window::new(WindowId::default(), title, width, height)?;
        let handle = self.backend.create_window(title, width, height)?;

        let id = self.windows.insert_with_key(|id| {
            window.assign_id(id);
            Entry { handle, window }
        });
        self.routes.insert(handle, id);
        debug!("window {id:?} created as {handle:?} ({width}x{height}, {title:?})");
        Ok(id)
    }

    /// Open a window described by `config`.
    pub fn create_window_with(&mut self, config: &WindowConfig) -> Result<WindowId> {
        config.validate()?;
        self.create_window(&config.title, config.width, config.height)
    }

    /// Destroy the native window and drop its record, user data and
    /// callbacks.  Events still queued for it are discarded.
    pub fn release_window(&mut self, id: WindowId) -> Result<()> {
        let entry = self.windows.remove(id).ok_or(Error::UnknownWindow(id))?;
        self.routes.remove(&entry.handle);
        self.backend.destroy_window(entry.handle)?;
        debug!("window {id:?} released");
        Ok(())
    }

    pub fn window(&self, id: WindowId) -> Result<&Window> {
        self.entry(id).map(|e| &e.window)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Result<&mut Window> {
        self.entry_mut(id).map(|e| &mut e.window)
    }

    /// Ids of every live window, in no particular order.
    pub fn window_ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.keys()
    }

    /// The backend's identifier for the window (`HWND` value, X11 id, …).
    pub fn native_handle(&self, id: WindowId) -> Result<B::Handle> {
        self.entry(id).map(|e| e.handle)
    }

    pub fn should_close(&self, id: WindowId) -> Result<bool> {
        self.window(id).map(Window::should_close)
    }

    pub fn close(&mut self, id: WindowId) -> Result<()> {
        self.window_mut(id).map(Window::close)
    }

    /// Pointer position relative to the window's top-left corner.
    pub fn cursor_pos(&self, id: WindowId) -> Result<(f32, f32)> {
        let entry = self.entry(id)?;
        self.backend.cursor_pos(entry.handle)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn entry(&self, id: WindowId) -> Result<&Entry<B::Handle>> {
        self.windows.get(id).ok_or(Error::UnknownWindow(id))
    }

    fn entry_mut(&mut self, id: WindowId) -> Result<&mut Entry<B::Handle>> {
        self.windows.get_mut(id).ok_or(Error::UnknownWindow(id))
    }

    // ── Events ────────────────────────────────────────────────────────────────

    /// Process every event queued right now, invoking callbacks on this
    /// thread.  Never waits for new events.
    ///
    /// If the backend fails part-way through draining, the events it had
    /// already taken off the native queue are still dispatched before the
    /// error is returned.
    pub fn poll_events(&mut self) -> Result<()> {
        let mut events = std::mem::take(&mut self.events);
        let drained = self.backend.drain_events(&mut events);

        for (handle, event) in events.drain(..) {
            let Some(entry) = self
                .routes
                .get(&handle)
                .and_then(|&id| self.windows.get_mut(id))
            else {
                trace!("dropping {event:?} for unknown window {handle:?}");
                continue;
            };
            let window = &mut entry.window;

            match event {
                NativeEvent::CloseRequested => window.close(),
                NativeEvent::Key { code, pressed } => {
                    match self.backend.key_table().lookup(code) {
                        Some(key) => window.dispatch_key(key, pressed),
                        None => trace!("unmapped key code {code:#x}"),
                    }
                }
                NativeEvent::Button { button, pressed } => window.dispatch_mouse(button, pressed),
                NativeEvent::Scroll { offset } => window.dispatch_scroll(offset),
            }
        }

        self.events = events;
        drained
    }

    // ── Presentation ──────────────────────────────────────────────────────────

    /// Convert `framebuffer` into the window's surface and show it.
    ///
    /// The framebuffer must have exactly the window's size.
    pub fn render(&mut self, id: WindowId, framebuffer: &Framebuffer) -> Result<()> {
        let entry = self.windows.get_mut(id).ok_or(Error::UnknownWindow(id))?;
        blit_bgr(framebuffer, entry.window.surface_mut())?;
        self.backend.present(entry.handle, entry.window.surface())
    }
}

impl<B: Backend> Drop for Context<B> {
    fn drop(&mut self) {
        if self.terminated {
            return;
        }
        if let Err(e) = self.teardown() {
            warn!("context teardown failed: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
