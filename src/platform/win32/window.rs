// ── Win32 windows ─────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register one window class per backend and unregister it on shutdown.
//   • Create fixed-size top-level windows sized so the client area matches
//     the requested surface.
//   • Pump the thread's message queue without blocking (PeekMessageW).
//   • Translate WM_CLOSE, key, button and wheel messages in WndProc and hand
//     them to the backend through a channel.
//   • Present surfaces with SetDIBitsToDevice as a top-down 32-bit DIB.

#![allow(unsafe_code)]

use std::collections::HashSet;
use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};

use log::{debug, warn};
use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{
            GetLastError, FALSE, HANDLE, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM,
        },
        Graphics::Gdi::{
            GetDC, GetStockObject, ReleaseDC, ScreenToClient, SetDIBitsToDevice, BITMAPINFO,
            BITMAPINFOHEADER, BI_RGB, BLACK_BRUSH, DIB_RGB_COLORS, HBRUSH,
        },
        System::LibraryLoader::GetModuleHandleW,
        UI::{
            HiDpi::{SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2},
            WindowsAndMessaging::{
                AdjustWindowRect, CreateWindowExW, DefWindowProcW, DestroyWindow,
                DispatchMessageW, GetCursorPos, GetPropW, LoadCursorW, LoadIconW, PeekMessageW,
                RegisterClassExW, RemovePropW, SetPropW, ShowWindow, TranslateMessage,
                UnregisterClassW, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, HMENU, IDC_ARROW,
                IDI_APPLICATION, MSG, PM_REMOVE, SW_HIDE, SW_SHOW, WINDOW_EX_STYLE,
                WM_CLOSE, WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MBUTTONDOWN,
                WM_MBUTTONUP, WM_MOUSEWHEEL, WM_RBUTTONDOWN, WM_RBUTTONUP, WM_SYSKEYDOWN,
                WM_SYSKEYUP, WNDCLASSEXW, WS_CAPTION, WS_MINIMIZEBOX, WS_SYSMENU,
            },
        },
    },
};

use crate::error::{Error, Result};
use crate::framebuffer::Surface;
use crate::keymap::{self, KeyTable};
use crate::keys::MouseButton;
use crate::platform::{Backend, NativeEvent};

// ── Window identity ───────────────────────────────────────────────────────────

/// Window property that points at the owning backend's event sender.
const QUEUE_PROP: PCWSTR = w!("TwhEventQueue");

/// Wheel distance of one notch (`WHEEL_DELTA`).
const WHEEL_DELTA: f32 = 120.0;

/// Makes every backend's class name unique so several contexts can coexist.
static CLASS_SERIAL: AtomicUsize = AtomicUsize::new(0);

type EventSender = Sender<(isize, NativeEvent)>;

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn hwnd_of(handle: isize) -> HWND {
    HWND(handle as *mut c_void)
}

// ── Backend ───────────────────────────────────────────────────────────────────

/// A registered window class plus the event channel its WndProc feeds.
pub struct Win32Backend {
    hinstance: HINSTANCE,
    class_name: Vec<u16>,
    /// Boxed so its address is stable; every window's `QUEUE_PROP` points here.
    sender: Box<EventSender>,
    receiver: Receiver<(isize, NativeEvent)>,
    /// Windows whose `QUEUE_PROP` still points at `sender`.
    live: HashSet<isize>,
    registered: bool,
}

impl Win32Backend {
    /// Opt into per-monitor DPI awareness and register this backend's class.
    pub fn register() -> Result<Self> {
        // SAFETY: Must precede window creation on this thread.  A second call
        // (another context) fails harmlessly and is ignored.
        unsafe {
            let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
        }

        // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
        // always valid for the process lifetime.
        let hmodule = unsafe { GetModuleHandleW(None) }
            .map_err(|e| win32_error("GetModuleHandleW", &e))?;
        let hinstance = HINSTANCE(hmodule.0);

        let serial = CLASS_SERIAL.fetch_add(1, Ordering::Relaxed);
        let class_name = wide(&format!("TwhWindowClass{serial}"));
        register_class(hinstance, &class_name)?;
        debug!("registered window class TwhWindowClass{serial}");

        let (sender, receiver) = channel();
        Ok(Self {
            hinstance,
            class_name,
            sender: Box::new(sender),
            receiver,
            live: HashSet::new(),
            registered: true,
        })
    }

    /// Detach and destroy every window still alive.  Each window loses its
    /// queue property first, so even a window that refuses to die can no
    /// longer reach `sender`.
    fn destroy_remaining(&mut self) -> Result<()> {
        let mut first_error = None;
        for handle in self.live.drain() {
            if let Err(e) = detach_and_destroy(hwnd_of(handle)) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for Win32Backend {
    fn drop(&mut self) {
        if let Err(e) = self.destroy_remaining() {
            warn!("destroying leftover windows failed: {e}");
        }
        if let Err(e) = self.shutdown() {
            warn!("unregistering window class failed: {e}");
        }
    }
}

/// Clear the queue property, then hide and destroy the window.
fn detach_and_destroy(hwnd: HWND) -> Result<()> {
    // SAFETY: hwnd was created by a backend on this thread.  The property goes
    // first so messages sent during destruction fall through to
    // DefWindowProcW instead of the channel.
    unsafe {
        let _ = RemovePropW(hwnd, QUEUE_PROP);
        let _ = ShowWindow(hwnd, SW_HIDE);
        DestroyWindow(hwnd).map_err(|e| win32_error("DestroyWindow", &e))
    }
}

impl Backend for Win32Backend {
    type Handle = isize;

    fn key_table(&self) -> &KeyTable {
        keymap::win32()
    }

    fn create_window(&mut self, title: &str, width: u32, height: u32) -> Result<isize> {
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(Error::InvalidSize { width, height });
        };

        // Caption, system menu and minimize box; no sizing border, no maximize.
        let style = WS_CAPTION | WS_SYSMENU | WS_MINIMIZEBOX;
        let mut rect = RECT {
            left: 0,
            top: 0,
            right: w,
            bottom: h,
        };
        // SAFETY: rect is a valid, writable RECT for the duration of the call.
        unsafe { AdjustWindowRect(&mut rect, style, FALSE) }
            .map_err(|e| win32_error("AdjustWindowRect", &e))?;

        let title_wide = wide(title);

        // SAFETY: class_name was registered by `register` and stays registered
        // until `shutdown`; title_wide is null-terminated and outlives the call.
        // HWND::default() (null parent) creates a top-level window.
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                PCWSTR(self.class_name.as_ptr()),
                PCWSTR(title_wide.as_ptr()),
                style,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                rect.right - rect.left,
                rect.bottom - rect.top,
                HWND::default(),
                HMENU::default(),
                self.hinstance,
                None,
            )
        }
        .map_err(|e| win32_error("CreateWindowExW", &e))?;

        let sender: *const EventSender = &*self.sender;
        // SAFETY: hwnd is valid.  The boxed sender outlives every window of this
        // backend: every window in `live` is detached and destroyed before the
        // backend is dropped (see `Drop for Win32Backend`).
        let attached = unsafe { SetPropW(hwnd, QUEUE_PROP, HANDLE(sender as *mut c_void)) };
        if let Err(e) = attached {
            let _ = detach_and_destroy(hwnd);
            return Err(win32_error("SetPropW", &e));
        }
        self.live.insert(hwnd.0 as isize);

        // SAFETY: hwnd was just created.  The return value is the previous
        // visibility state and is intentionally ignored.
        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOW);
        }

        Ok(hwnd.0 as isize)
    }

    fn destroy_window(&mut self, handle: isize) -> Result<()> {
        if !self.live.remove(&handle) {
            return Ok(());
        }
        detach_and_destroy(hwnd_of(handle))
    }

    fn drain_events(&mut self, out: &mut Vec<(isize, NativeEvent)>) -> Result<()> {
        let mut msg = MSG::default();

        // SAFETY: &mut msg is a valid MSG pointer; HWND::default() retrieves
        // messages for all windows on this thread; 0,0 filter accepts all.
        // PM_REMOVE never blocks.
        while unsafe { PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE) }.as_bool() {
            // SAFETY: msg was populated by a successful PeekMessageW call.
            // TranslateMessage return value (whether it generated WM_CHAR)
            // and DispatchMessageW's LRESULT are intentionally unused.
            unsafe {
                let _ = TranslateMessage(&msg);
                let _ = DispatchMessageW(&msg);
            }
        }

        out.extend(self.receiver.try_iter());
        Ok(())
    }

    fn present(&mut self, handle: isize, surface: &Surface) -> Result<()> {
        let hwnd = hwnd_of(handle);
        let (width, height) = (surface.width(), surface.height());

        let info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width as i32,
                // Negative height: rows are stored top-down.
                biHeight: -(height as i32),
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };

        // SAFETY: hwnd is a live window of this backend.  surface holds exactly
        // width * height * 4 bytes, matching `info`, and outlives the call.
        // The DC is released before returning.
        let lines = unsafe {
            let hdc = GetDC(hwnd);
            let lines = SetDIBitsToDevice(
                hdc,
                0,
                0,
                width,
                height,
                0,
                0,
                0,
                height,
                surface.as_bytes().as_ptr().cast(),
                &info,
                DIB_RGB_COLORS,
            );
            let _ = ReleaseDC(hwnd, hdc);
            lines
        };

        if lines == 0 {
            return Err(last_error("SetDIBitsToDevice"));
        }
        Ok(())
    }

    fn cursor_pos(&self, handle: isize) -> Result<(f32, f32)> {
        let mut point = POINT::default();
        // SAFETY: point is a valid, writable POINT; hwnd is a live window.
        unsafe {
            GetCursorPos(&mut point).map_err(|e| win32_error("GetCursorPos", &e))?;
            let _ = ScreenToClient(hwnd_of(handle), &mut point);
        }
        Ok((point.x as f32, point.y as f32))
    }

    fn shutdown(&mut self) -> Result<()> {
        self.destroy_remaining()?;
        if !self.registered {
            return Ok(());
        }
        self.registered = false;
        // SAFETY: class_name was registered with this hinstance and every
        // window of the class has already been destroyed.
        unsafe { UnregisterClassW(PCWSTR(self.class_name.as_ptr()), self.hinstance) }
            .map_err(|e| win32_error("UnregisterClassW", &e))
    }
}

// ── Window class registration ─────────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE, class_name: &[u16]) -> Result<()> {
    // SAFETY: LoadIconW with IDI_APPLICATION always succeeds; it loads the
    // built-in application icon resource, which exists on all Windows versions.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }
        .map_err(|e| win32_error("LoadIconW", &e))?;

    // SAFETY: LoadCursorW with IDC_ARROW always succeeds; the arrow cursor is
    // a built-in resource guaranteed to exist on all Windows versions.
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }
        .map_err(|e| win32_error("LoadCursorW", &e))?;

    // SAFETY: GetStockObject with BLACK_BRUSH always returns a valid HGDIOBJ.
    // Casting to HBRUSH is correct: stock brush objects are compatible types.
    let bg_brush = unsafe { HBRUSH(GetStockObject(BLACK_BRUSH).0) };

    let wndclass = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        hbrBackground: bg_brush,
        lpszMenuName: PCWSTR::null(),
        lpszClassName: PCWSTR(class_name.as_ptr()),
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised with valid handles; class_name is
    // a null-terminated UTF-16 string that outlives the call.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }

    Ok(())
}

// ── Message translation ───────────────────────────────────────────────────────

/// What WndProc should do with a message after translating it.
#[derive(Debug, PartialEq)]
enum Disposition {
    /// Return 0 without default processing.
    Handled,
    /// Forward to DefWindowProcW.
    Default,
}

/// Map one window message to the event it carries, if any.
fn translate(msg: u32, wparam: WPARAM, _lparam: LPARAM) -> (Option<NativeEvent>, Disposition) {
    use Disposition::{Default, Handled};

    let key = |pressed| NativeEvent::Key {
        code: (wparam.0 & 0xFF) as u32,
        pressed,
    };
    let button = |button, pressed| NativeEvent::Button { button, pressed };

    match msg {
        // The window stays alive; the application decides when to release it.
        WM_CLOSE => (Some(NativeEvent::CloseRequested), Handled),

        WM_KEYDOWN => (Some(key(true)), Handled),
        WM_KEYUP => (Some(key(false)), Handled),
        // Alt and F10 arrive as system keys; keep default handling so Alt+F4
        // and the system menu still work.
        WM_SYSKEYDOWN => (Some(key(true)), Default),
        WM_SYSKEYUP => (Some(key(false)), Default),

        WM_LBUTTONDOWN => (Some(button(MouseButton::Left, true)), Handled),
        WM_LBUTTONUP => (Some(button(MouseButton::Left, false)), Handled),
        WM_RBUTTONDOWN => (Some(button(MouseButton::Right, true)), Handled),
        WM_RBUTTONUP => (Some(button(MouseButton::Right, false)), Handled),
        WM_MBUTTONDOWN => (Some(button(MouseButton::Middle, true)), Handled),
        WM_MBUTTONUP => (Some(button(MouseButton::Middle, false)), Handled),

        WM_MOUSEWHEEL => {
            // High word of WPARAM is the signed wheel distance.
            let delta = ((wparam.0 >> 16) & 0xFFFF) as u16 as i16;
            let offset = f32::from(delta) / WHEEL_DELTA;
            (Some(NativeEvent::Scroll { offset }), Handled)
        }

        _ => (None, Default),
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; we must not store hwnd beyond the message handler.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    // Messages sent before SetPropW (WM_CREATE, WM_NCCREATE, …) or after
    // RemovePropW find no queue and get default processing.
    let queue = GetPropW(hwnd, QUEUE_PROP);
    if queue.is_invalid() {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    let (event, disposition) = translate(msg, wparam, lparam);
    if let Some(event) = event {
        // SAFETY: the property holds the address of the owning backend's boxed
        // sender, which outlives the window (see `create_window`).
        let sender = &*(queue.0 as *const EventSender);
        // The receiver lives next to the sender; send cannot fail while the
        // backend is alive.
        let _ = sender.send((hwnd.0 as isize, event));
    }

    match disposition {
        Disposition::Handled => LRESULT(0),
        Disposition::Default => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Name the failing function on a windows-crate error.
fn win32_error(function: &'static str, e: &windows::core::Error) -> Error {
    // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
    Error::Win32 {
        function,
        code: e.code().0 as u32,
    }
}

/// Capture the current Win32 last-error code and wrap it in an `Error`.
///
/// Call immediately after a Win32 function that signals failure: `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
fn last_error(function: &'static str) -> Error {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    Error::Win32 {
        function,
        code: code.0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use windows::Win32::UI::WindowsAndMessaging::IsWindow;

    use super::*;
    use crate::keymap::vk;

    fn is_window(handle: isize) -> bool {
        // SAFETY: IsWindow accepts any value and only reports whether it names
        // a live window.
        unsafe { IsWindow(hwnd_of(handle)) }.as_bool()
    }

    fn wheel(delta: i16) -> WPARAM {
        WPARAM(((delta as u16 as usize) << 16) | 0x0008)
    }

    #[test]
    fn close_is_reported_and_swallowed() {
        let (event, disposition) = translate(WM_CLOSE, WPARAM(0), LPARAM(0));
        assert_eq!(event, Some(NativeEvent::CloseRequested));
        assert_eq!(disposition, Disposition::Handled);
    }

    #[test]
    fn key_messages_carry_the_virtual_key() {
        let (event, _) = translate(WM_KEYDOWN, WPARAM(vk::VK_ESCAPE as usize), LPARAM(0));
        assert_eq!(
            event,
            Some(NativeEvent::Key { code: vk::VK_ESCAPE, pressed: true })
        );
        let (event, _) = translate(WM_KEYUP, WPARAM(0x41), LPARAM(0));
        assert_eq!(event, Some(NativeEvent::Key { code: 0x41, pressed: false }));
    }

    #[test]
    fn system_keys_still_reach_default_processing() {
        let (event, disposition) = translate(WM_SYSKEYDOWN, WPARAM(vk::VK_MENU as usize), LPARAM(0));
        assert_eq!(event, Some(NativeEvent::Key { code: vk::VK_MENU, pressed: true }));
        assert_eq!(disposition, Disposition::Default);
    }

    #[test]
    fn buttons_map_to_left_right_middle() {
        let cases = [
            (WM_LBUTTONDOWN, MouseButton::Left, true),
            (WM_LBUTTONUP, MouseButton::Left, false),
            (WM_RBUTTONDOWN, MouseButton::Right, true),
            (WM_RBUTTONUP, MouseButton::Right, false),
            (WM_MBUTTONDOWN, MouseButton::Middle, true),
            (WM_MBUTTONUP, MouseButton::Middle, false),
        ];
        for (msg, button, pressed) in cases {
            let (event, _) = translate(msg, WPARAM(0), LPARAM(0));
            assert_eq!(event, Some(NativeEvent::Button { button, pressed }));
        }
    }

    #[test]
    fn wheel_is_normalised_per_notch() {
        let (event, _) = translate(WM_MOUSEWHEEL, wheel(120), LPARAM(0));
        assert_eq!(event, Some(NativeEvent::Scroll { offset: 1.0 }));
        let (event, _) = translate(WM_MOUSEWHEEL, wheel(-240), LPARAM(0));
        assert_eq!(event, Some(NativeEvent::Scroll { offset: -2.0 }));
    }

    #[test]
    fn other_messages_pass_through() {
        let (event, disposition) = translate(0x000F, WPARAM(0), LPARAM(0)); // WM_PAINT
        assert_eq!(event, None);
        assert_eq!(disposition, Disposition::Default);
    }

    #[test]
    fn dropping_the_backend_destroys_its_windows() {
        let mut backend = Win32Backend::register().expect("register");
        let handle = backend.create_window("dropped", 16, 16).expect("window");
        assert!(is_window(handle));
        drop(backend);
        assert!(!is_window(handle));

        // Pumping the thread's queue afterwards must not reach the old channel.
        let mut other = Win32Backend::register().expect("register");
        let mut out = Vec::new();
        other.drain_events(&mut out).expect("drain");
        assert!(out.iter().all(|&(h, _)| h != handle));
        other.shutdown().expect("shutdown");
    }

    #[test]
    fn shutdown_destroys_windows_left_open() {
        let mut backend = Win32Backend::register().expect("register");
        let handle = backend.create_window("left open", 16, 16).expect("window");
        backend.shutdown().expect("shutdown");
        assert!(!is_window(handle));
    }

    #[test]
    fn destroying_an_unknown_handle_is_a_no_op() {
        let mut backend = Win32Backend::register().expect("register");
        let handle = backend.create_window("twice", 16, 16).expect("window");
        backend.destroy_window(handle).expect("destroy");
        backend.destroy_window(handle).expect("second destroy is ignored");
        backend.shutdown().expect("shutdown");
    }
}
