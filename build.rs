/// twh build script.
///
/// Native windows exist only for Windows (Win32) and Linux (X11).  Other
/// targets still build, with only the headless backend, so say so loudly.
fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" && target_os != "linux" {
        println!(
            "cargo:warning=twh has no native window backend for \
             CARGO_CFG_TARGET_OS = {target_os:?}; Context::init is unavailable"
        );
    }

    // Only re-run the build script when it changes.
    println!("cargo:rerun-if-changed=build.rs");
}
