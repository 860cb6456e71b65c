//! Caller identity resolution.
//!
//! Answers "which plugin is running right now" without the caller passing its
//! package:
//!
//! - **Ambient** (default): O(1) read of the per-thread slot the loader sets
//!   around each plugin entry point. Reports the most recently *entered*
//!   plugin, so a front-lib plugin called directly by another plugin is
//!   attributed to its caller.
//! - **Call stack**: walks the explicit call-frame stack outward and returns
//!   the first instance call on a plugin type. Correct for nested
//!   plugin-to-plugin calls, but several times slower; keep it off hot paths.

pub mod ambient;
pub mod frames;

pub use ambient::{AmbientGuard, enter_plugin};
pub use frames::{CallFrame, CallStack, Dispatch, FrameGuard};

use crate::plugin::Plugin;

/// Type name of the resolver's own frame.
const RESOLVER_FRAME: &str = "ezbot_plugins::identity::whoami";

/// Resolve the current plugin with the chosen strategy.
pub fn whoami(accurate: bool) -> Option<String> {
    if accurate {
        resolve_call_stack()
    } else {
        ambient::current()
    }
}

/// Resolve from the live call-frame stack of this thread.
pub fn resolve_call_stack() -> Option<String> {
    let _own = CallStack::enter(CallFrame::host(RESOLVER_FRAME));
    resolve_frames(&CallStack::snapshot())
}

/// Resolve from `frames`, innermost first.
///
/// Frame 0 is the resolver's own frame and is never considered. The walk goes
/// outward and the first instance call on a type with a package marker wins;
/// host frames and static calls are skipped, not treated as a miss.
pub fn resolve_frames(frames: &[CallFrame]) -> Option<String> {
    frames
        .iter()
        .skip(1)
        .find_map(CallFrame::plugin_package)
        .map(str::to_string)
}

/// Run `f` as a method call on `plugin` from another plugin.
///
/// Only the call-frame stack sees this call; the ambient slot keeps the outer
/// plugin.
pub fn call_plugin<R>(plugin: &dyn Plugin, f: impl FnOnce() -> R) -> R {
    let _frame = CallStack::enter(CallFrame::instance(plugin));
    f()
}

/// Run `f` as a loader-dispatched entry point of `plugin`.
///
/// Sets the ambient slot and pushes an instance frame for the duration of `f`.
pub fn run_entry<R>(plugin: &dyn Plugin, f: impl FnOnce() -> R) -> R {
    let _ambient = enter_plugin(plugin.package());
    let _frame = CallStack::enter(CallFrame::instance(plugin));
    f()
}
