//! # Busy flag — scoped "request in flight" state
//!
//! Every feature hook shows a spinner while its call is in flight. Rather than
//! trusting each caller to clear the flag on every exit path, the call wrapper
//! holds a [`BusyGuard`] for the duration of the request: the flag is raised
//! when the guard is acquired and lowered when it drops, whether the call
//! succeeded, failed, or the future was dropped mid-flight.

use std::cell::Cell;
use std::rc::Rc;

/// Something that can display a busy state.
pub trait BusyFlag {
    fn set_busy(&self, busy: bool);
}

impl BusyFlag for Cell<bool> {
    fn set_busy(&self, busy: bool) {
        self.set(busy);
    }
}

impl<B: BusyFlag + ?Sized> BusyFlag for Rc<B> {
    fn set_busy(&self, busy: bool) {
        (**self).set_busy(busy);
    }
}

impl<B: BusyFlag + ?Sized> BusyFlag for &B {
    fn set_busy(&self, busy: bool) {
        (**self).set_busy(busy);
    }
}

/// For calls nobody is watching.
#[derive(Clone, Copy, Debug, Default)]
pub struct NotBusy;

impl BusyFlag for NotBusy {
    fn set_busy(&self, _busy: bool) {}
}

/// Raises a [`BusyFlag`] on acquire and lowers it on drop.
#[must_use = "the flag is lowered as soon as the guard is dropped"]
pub struct BusyGuard<'a, B: BusyFlag + ?Sized> {
    flag: &'a B,
}

impl<'a, B: BusyFlag + ?Sized> BusyGuard<'a, B> {
    pub fn acquire(flag: &'a B) -> Self {
        flag.set_busy(true);
        Self { flag }
    }
}

impl<B: BusyFlag + ?Sized> Drop for BusyGuard<'_, B> {
    fn drop(&mut self) {
        self.flag.set_busy(false);
    }
}
