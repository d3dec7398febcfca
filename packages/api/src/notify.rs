//! User-facing notifications raised by the call wrapper.

use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Shows a short message to the user (a toast, a status line, a log).
pub trait Notifier {
    fn notify(&self, level: NoticeLevel, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for Rc<N> {
    fn notify(&self, level: NoticeLevel, message: &str) {
        (**self).notify(level, message);
    }
}

/// Notifier for headless use: writes notices to the tracing log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Error => tracing::error!("{}", message),
            NoticeLevel::Warning => tracing::warn!("{}", message),
            NoticeLevel::Info | NoticeLevel::Success => tracing::info!("{}", message),
        }
    }
}
