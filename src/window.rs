// ── Window records ────────────────────────────────────────────────────────────
//
// A `Window` is the platform-independent half of an on-screen window: its
// presentation surface, the should-close flag, user data and the three input
// callbacks.  The native half (HWND / X11 window id) lives in the backend and
// is tied to this record by the `Context` side-table.
//
// Callbacks receive `&mut Window`, so they can close the window, read or
// replace user data, or swap callbacks while they run.

use std::any::Any;
use std::fmt;

use crate::error::Result;
use crate::framebuffer::Surface;
use crate::keys::{Key, MouseButton};

slotmap::new_key_type! {
    /// Stable id of a window owned by a `Context`.
    ///
    /// Ids are generation-checked: once a window is released its id never
    /// names another window.
    pub struct WindowId;
}

/// Called for every mapped key press (`true`) and release (`false`).
pub type KeyCallback = Box<dyn FnMut(&mut Window, Key, bool)>;
/// Called for every primary mouse button press (`true`) and release (`false`).
pub type MouseCallback = Box<dyn FnMut(&mut Window, MouseButton, bool)>;
/// Called once per wheel notch; positive is away from the user.
pub type ScrollCallback = Box<dyn FnMut(&mut Window, f32)>;

// ── Callback slots ────────────────────────────────────────────────────────────

/// One callback plus a counter bumped on every set/clear.
///
/// While a callback runs it is taken out of its slot; on return it is put
/// back only if nobody set or cleared that slot in the meantime.
struct Slot<F> {
    callback: Option<F>,
    generation: u64,
}

impl<F> Default for Slot<F> {
    fn default() -> Self {
        Self {
            callback: None,
            generation: 0,
        }
    }
}

impl<F> Slot<F> {
    fn set(&mut self, callback: Option<F>) {
        self.callback = callback;
        self.generation = self.generation.wrapping_add(1);
    }

    fn take(&mut self) -> Option<(F, u64)> {
        self.callback.take().map(|cb| (cb, self.generation))
    }

    fn restore(&mut self, callback: F, generation: u64) {
        if self.generation == generation {
            self.callback = Some(callback);
        }
    }
}

#[derive(Default)]
struct Callbacks {
    key: Slot<KeyCallback>,
    mouse: Slot<MouseCallback>,
    scroll: Slot<ScrollCallback>,
}

// ── Window ────────────────────────────────────────────────────────────────────

pub struct Window {
    id: WindowId,
    title: String,
    surface: Surface,
    should_close: bool,
    user_data: Option<Box<dyn Any>>,
    callbacks: Callbacks,
}

impl Window {
    pub(crate) fn new(id: WindowId, title: &str, width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            id,
            title: title.to_owned(),
            surface: Surface::new(width, height)?,
            should_close: false,
            user_data: None,
            callbacks: Callbacks::default(),
        })
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: WindowId) {
        self.id = id;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Client-area size in pixels; fixed for the window's lifetime.
    pub fn size(&self) -> (u32, u32) {
        (self.surface.width(), self.surface.height())
    }

    /// The last frame handed to `Context::render`, in native BGRX layout.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    // ── Close flag ────────────────────────────────────────────────────────────

    /// `true` once the user asked to close the window or `close` was called.
    /// Never resets.
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Ask the application loop to stop.  The window stays on screen until
    /// it is released.
    pub fn close(&mut self) {
        self.should_close = true;
    }

    // ── User data ─────────────────────────────────────────────────────────────

    /// Attach arbitrary data, replacing whatever was there.
    pub fn set_user_data<T: Any>(&mut self, data: T) {
        self.user_data = Some(Box::new(data));
    }

    /// Borrow the user data if it is a `T`.
    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_deref()?.downcast_ref()
    }

    pub fn user_data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.user_data.as_deref_mut()?.downcast_mut()
    }

    /// Remove and return the user data if it is a `T`; otherwise leave it.
    pub fn take_user_data<T: Any>(&mut self) -> Option<T> {
        let data = self.user_data.take()?;
        match data.downcast::<T>() {
            Ok(data) => Some(*data),
            Err(data) => {
                self.user_data = Some(data);
                None
            }
        }
    }

    pub fn clear_user_data(&mut self) {
        self.user_data = None;
    }

    // ── Callbacks ─────────────────────────────────────────────────────────────

    /// Install the key callback, replacing any previous one.
    pub fn set_key_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Window, Key, bool) + 'static,
    {
        self.callbacks.key.set(Some(Box::new(callback)));
    }

    /// Install the mouse button callback, replacing any previous one.
    pub fn set_mouse_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Window, MouseButton, bool) + 'static,
    {
        self.callbacks.mouse.set(Some(Box::new(callback)));
    }

    /// Install the scroll callback, replacing any previous one.
    pub fn set_scroll_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Window, f32) + 'static,
    {
        self.callbacks.scroll.set(Some(Box::new(callback)));
    }

    pub fn clear_key_callback(&mut self) {
        self.callbacks.key.set(None);
    }

    pub fn clear_mouse_callback(&mut self) {
        self.callbacks.mouse.set(None);
    }

    pub fn clear_scroll_callback(&mut self) {
        self.callbacks.scroll.set(None);
    }

    pub fn has_key_callback(&self) -> bool {
        self.callbacks.key.callback.is_some()
    }

    pub fn has_mouse_callback(&self) -> bool {
        self.callbacks.mouse.callback.is_some()
    }

    pub fn has_scroll_callback(&self) -> bool {
        self.callbacks.scroll.callback.is_some()
    }

    // ── Dispatch (event pump only) ────────────────────────────────────────────

    pub(crate) fn dispatch_key(&mut self, key: Key, pressed: bool) {
        if let Some((mut cb, generation)) = self.callbacks.key.take() {
            cb(self, key, pressed);
            self.callbacks.key.restore(cb, generation);
        }
    }

    pub(crate) fn dispatch_mouse(&mut self, button: MouseButton, pressed: bool) {
        if let Some((mut cb, generation)) = self.callbacks.mouse.take() {
            cb(self, button, pressed);
            self.callbacks.mouse.restore(cb, generation);
        }
    }

    pub(crate) fn dispatch_scroll(&mut self, offset: f32) {
        if let Some((mut cb, generation)) = self.callbacks.scroll.take() {
            cb(self, offset);
            self.callbacks.scroll.restore(cb, generation);
        }
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("size", &self.size())
            .field("should_close", &self.should_close)
            .field("has_user_data", &self.user_data.is_some())
            .field("key_callback", &self.has_key_callback())
            .field("mouse_callback", &self.has_mouse_callback())
            .field("scroll_callback", &self.has_scroll_callback())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn window() -> Window {
        Window::new(WindowId::default(), "test", 4, 3).expect("window")
    }

    #[test]
    fn fresh_window_is_open_and_bare() {
        let w = window();
        assert!(!w.should_close());
        assert_eq!(w.size(), (4, 3));
        assert_eq!(w.title(), "test");
        assert!(!w.has_key_callback());
        assert!(!w.has_mouse_callback());
        assert!(!w.has_scroll_callback());
        assert!(w.user_data::<u32>().is_none());
    }

    #[test]
    fn close_is_sticky() {
        let mut w = window();
        w.close();
        assert!(w.should_close());
        w.close();
        assert!(w.should_close());
    }

    #[test]
    fn user_data_is_typed_pass_through() {
        let mut w = window();
        w.set_user_data(41_u32);
        *w.user_data_mut::<u32>().expect("u32") += 1;
        assert_eq!(w.user_data::<u32>(), Some(&42));
        assert_eq!(w.user_data::<String>(), None);

        // Wrong type leaves the data in place.
        assert_eq!(w.take_user_data::<i64>(), None);
        assert_eq!(w.take_user_data::<u32>(), Some(42));
        assert!(w.user_data::<u32>().is_none());
    }

    #[test]
    fn dispatch_without_callback_is_a_no_op() {
        let mut w = window();
        w.dispatch_key(Key::A, true);
        w.dispatch_mouse(MouseButton::Left, true);
        w.dispatch_scroll(1.0);
        assert!(!w.should_close());
    }

    #[test]
    fn key_callback_sees_the_window() {
        let mut w = window();
        w.set_key_callback(|w, key, pressed| {
            if key == Key::Escape && pressed {
                w.close();
            }
        });
        w.dispatch_key(Key::Escape, false);
        assert!(!w.should_close());
        w.dispatch_key(Key::Escape, true);
        assert!(w.should_close());
        assert!(w.has_key_callback(), "callback survives its own call");
    }

    #[test]
    fn callback_can_clear_itself() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut w = window();
        w.set_scroll_callback(move |w, _| {
            *counter.borrow_mut() += 1;
            w.clear_scroll_callback();
        });
        w.dispatch_scroll(1.0);
        w.dispatch_scroll(1.0);
        assert_eq!(*calls.borrow(), 1);
        assert!(!w.has_scroll_callback());
    }

    #[test]
    fn callback_can_replace_itself() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&log);
        let mut w = window();
        w.set_mouse_callback(move |w, _, _| {
            first.borrow_mut().push("first");
            let second = Rc::clone(&first);
            w.set_mouse_callback(move |_, _, _| second.borrow_mut().push("second"));
        });
        w.dispatch_mouse(MouseButton::Left, true);
        w.dispatch_mouse(MouseButton::Left, false);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn callback_touching_another_slot_keeps_its_own() {
        let mut w = window();
        w.set_scroll_callback(|_, _| {});
        w.set_key_callback(|w, _, _| w.clear_scroll_callback());
        w.dispatch_key(Key::A, true);
        assert!(w.has_key_callback());
        assert!(!w.has_scroll_callback());
    }
}
