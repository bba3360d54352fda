//! Profiling hooks based on the `puffin` crate.
//!
//! With the `profiling` feature disabled the scope macros expand to nothing,
//! so firmware builds carry no instrumentation cost.

#[cfg(feature = "profiling")]
pub use puffin::{profile_function, profile_scope};

#[cfg(not(feature = "profiling"))]
#[macro_export]
#[doc(hidden)]
macro_rules! __lumen_profile_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "profiling"))]
pub use crate::__lumen_profile_noop as profile_function;
#[cfg(not(feature = "profiling"))]
pub use crate::__lumen_profile_noop as profile_scope;

/// Turn scope collection on or off at runtime.
pub fn set_enabled(enabled: bool) {
    #[cfg(feature = "profiling")]
    {
        puffin::set_scopes_on(enabled);
        tracing::info!("puffin scopes {}", if enabled { "enabled" } else { "disabled" });
    }
    #[cfg(not(feature = "profiling"))]
    let _ = enabled;
}

/// Mark the start of a new frame for profiling.
///
/// Call this once per display refresh, next to the animation tick.
#[inline]
pub fn new_frame() {
    #[cfg(feature = "profiling")]
    puffin::GlobalProfiler::lock().new_frame();
}
