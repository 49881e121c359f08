// ── twh demo ──────────────────────────────────────────────────────────────────
//
// Opens one window filled with a solid color, logs mouse clicks and wheel
// notches, and exits on Escape or when the window is closed.
//
// RUST_LOG controls verbosity (default `info`); TWH_CONFIG may name a JSON
// file with `title`, `width`, `height` and `clear_color`.

#![deny(unsafe_code)]

use log::{error, info};

use twh::config::CONFIG_ENV;
use twh::WindowConfig;

fn load_config() -> twh::Result<WindowConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            info!("loading window config from {}", path.to_string_lossy());
            WindowConfig::load(path)
        }
        None => Ok(WindowConfig::default()),
    }
}

#[cfg(any(windows, target_os = "linux"))]
fn run() -> twh::Result<()> {
    use std::time::Duration;

    use twh::{Context, Framebuffer, Key, MouseButton};

    /// Interval between frame-rate reports, in seconds.
    const REPORT_EVERY: f64 = 5.0;

    let config = load_config()?;
    let mut ctx = Context::init()?;
    let id = ctx.create_window_with(&config)?;

    let window = ctx.window_mut(id)?;
    window.set_key_callback(|w, key, pressed| {
        if pressed && key == Key::Escape {
            w.close();
        }
    });
    window.set_mouse_callback(|_, button, pressed| {
        if !pressed {
            return;
        }
        match button {
            MouseButton::Left => info!("left click"),
            MouseButton::Right => info!("right click"),
            MouseButton::Middle => info!("middle click"),
        }
    });
    window.set_scroll_callback(|_, offset| info!("scroll: {offset}"));

    let mut fb = Framebuffer::new(config.width, config.height)?;
    fb.fill(config.clear_color);

    let mut frames = 0_u32;
    let mut last_report = ctx.time();
    while !ctx.should_close(id)? {
        ctx.render(id, &fb)?;
        ctx.poll_events()?;

        frames += 1;
        let now = ctx.time();
        if now - last_report >= REPORT_EVERY {
            info!("{:.1} frames/s", f64::from(frames) / (now - last_report));
            frames = 0;
            last_report = now;
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    ctx.release_window(id)?;
    ctx.terminate()
}

#[cfg(not(any(windows, target_os = "linux")))]
fn run() -> twh::Result<()> {
    let config = load_config()?;
    error!(
        "no native window system on this platform; cannot open {:?}",
        config.title
    );
    std::process::exit(1);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}
