//! Ambient "current plugin" slot.
//!
//! The loader pushes a package before running a plugin entry point and pops it
//! afterwards. Only the top entry is observable, so a plugin calling into
//! another plugin without going through the loader still reads as the outer
//! plugin.
//!
//! The slot is per thread. Plugins running concurrently on different threads
//! each see their own identity.

use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static AMBIENT: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Restores the previous ambient identity when dropped.
#[must_use = "the ambient identity is popped as soon as the guard is dropped"]
#[derive(Debug)]
pub struct AmbientGuard {
    depth: usize,
    // Tied to the thread whose slot it pushed onto
    _not_send: PhantomData<*const ()>,
}

impl Drop for AmbientGuard {
    fn drop(&mut self) {
        AMBIENT.with(|slot| slot.borrow_mut().truncate(self.depth));
    }
}

/// Make `package` the current ambient identity until the guard drops.
pub fn enter_plugin(package: impl Into<String>) -> AmbientGuard {
    let package = package.into();
    let depth = AMBIENT.with(|slot| {
        let mut slot = slot.borrow_mut();
        let depth = slot.len();
        slot.push(package);
        depth
    });
    AmbientGuard {
        depth,
        _not_send: PhantomData,
    }
}

/// The most recently entered package, if any.
pub fn current() -> Option<String> {
    AMBIENT.with(|slot| slot.borrow().last().filter(|p| !p.is_empty()).cloned())
}

/// Number of nested plugin entries on this thread.
pub fn depth() -> usize {
    AMBIENT.with(|slot| slot.borrow().len())
}
