// Browser console logging. On native targets (unit tests) the macros still
// type-check their arguments but print nothing.

use std::cell::Cell;

thread_local! {
    static DEBUG: Cell<bool> = const { Cell::new(false) };
}

pub fn set_debug(on: bool) {
    DEBUG.with(|d| d.set(on));
}

pub fn debug_enabled() -> bool {
    DEBUG.with(|d| d.get())
}

#[cfg(target_arch = "wasm32")]
pub fn write_info(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

#[cfg(target_arch = "wasm32")]
pub fn write_debug(msg: &str) {
    web_sys::console::debug_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write_info(_msg: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn write_debug(_msg: &str) {}

/// Always-on console line, prefixed with `[stage]`.
#[macro_export]
macro_rules! console_log {
    ($($arg:tt)*) => {
        $crate::log::write_info(&format!("[stage] {}", format_args!($($arg)*)))
    };
}

/// Console line emitted only when `StageConfig::debug` is set.
#[macro_export]
macro_rules! console_debug {
    ($($arg:tt)*) => {
        if $crate::log::debug_enabled() {
            $crate::log::write_debug(&format!("[stage] {}", format_args!($($arg)*)))
        }
    };
}
