//! Explicit call-frame stack.
//!
//! Every boundary where the host calls into plugin code pushes a frame; the
//! accurate identity resolver walks these frames instead of the native stack.

use std::cell::RefCell;
use std::marker::PhantomData;

use crate::plugin::Plugin;

thread_local! {
    static FRAMES: RefCell<Vec<CallFrame>> = const { RefCell::new(Vec::new()) };
}

/// How a frame's method was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dispatch {
    /// Called through an instance
    Instance,
    /// Called through the type, with no instance
    Static,
}

/// One entry of the call-frame stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    /// Type whose method is executing
    pub type_name: String,
    /// Package marker exposed by the type, if it is a plugin
    pub package: Option<String>,
    pub dispatch: Dispatch,
}

impl CallFrame {
    /// Frame for a method invoked on a plugin instance.
    pub fn instance(plugin: &dyn Plugin) -> Self {
        Self {
            type_name: plugin.class_name().to_string(),
            package: Some(plugin.package().to_string()),
            dispatch: Dispatch::Instance,
        }
    }

    /// Frame for a type-qualified call on a plugin type.
    pub fn associated(type_name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            package: Some(package.into()),
            dispatch: Dispatch::Static,
        }
    }

    /// Frame for host or library code.
    pub fn host(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            package: None,
            dispatch: Dispatch::Instance,
        }
    }

    /// The package this frame attributes execution to.
    ///
    /// Only instance calls on types carrying a package marker count.
    pub fn plugin_package(&self) -> Option<&str> {
        match (self.dispatch, self.package.as_deref()) {
            (Dispatch::Instance, Some(package)) if !package.is_empty() => Some(package),
            _ => None,
        }
    }
}

/// Pops its frame when dropped.
#[must_use = "the frame is popped as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FrameGuard {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        FRAMES.with(|frames| frames.borrow_mut().truncate(self.depth));
    }
}

/// Access to the current thread's call-frame stack.
pub struct CallStack;

impl CallStack {
    /// Push a frame until the guard drops.
    pub fn enter(frame: CallFrame) -> FrameGuard {
        let depth = FRAMES.with(|frames| {
            let mut frames = frames.borrow_mut();
            let depth = frames.len();
            frames.push(frame);
            depth
        });
        FrameGuard {
            depth,
            _not_send: PhantomData,
        }
    }

    /// Frames of this thread, innermost first.
    pub fn snapshot() -> Vec<CallFrame> {
        FRAMES.with(|frames| frames.borrow().iter().rev().cloned().collect())
    }

    pub fn depth() -> usize {
        FRAMES.with(|frames| frames.borrow().len())
    }
}
