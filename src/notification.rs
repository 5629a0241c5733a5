use std::{cell::Cell, rc::Rc};

use serde_json::json;

use crate::{config::Settings, logging::Logger, schedule::Scheduler};

pub const STYLE_ELEMENT_ID: &str = "notification-styles";
pub const EXIT_ANIMATION: &str = "slideOutRight 0.3s ease";

pub const NOTIFICATION_STYLES: &str = r#"
.notification {
    position: fixed;
    top: 20px;
    right: 20px;
    z-index: 10000;
    max-width: 400px;
    padding: 16px 20px;
    border-radius: 8px;
    box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15);
    animation: slideInRight 0.3s ease;
    backdrop-filter: blur(10px);
    font-family: 'Inter', sans-serif;
}

.notification--success {
    background-color: rgba(34, 197, 94, 0.9);
    color: white;
    border: 1px solid rgba(34, 197, 94, 1);
}

.notification--info {
    background-color: rgba(59, 130, 246, 0.9);
    color: white;
    border: 1px solid rgba(59, 130, 246, 1);
}

.notification--error {
    background-color: rgba(239, 68, 68, 0.9);
    color: white;
    border: 1px solid rgba(239, 68, 68, 1);
}

.notification-content {
    display: flex;
    justify-content: space-between;
    align-items: center;
    gap: 12px;
}

.notification-close {
    background: none;
    border: none;
    color: inherit;
    cursor: pointer;
    padding: 4px;
    opacity: 0.8;
    transition: opacity 0.2s ease;
    border-radius: 4px;
}

.notification-close:hover {
    opacity: 1;
    background: rgba(0, 0, 0, 0.1);
}

@keyframes slideInRight {
    from { transform: translateX(100%); opacity: 0; }
    to { transform: translateX(0); opacity: 1; }
}

@keyframes slideOutRight {
    from { transform: translateX(0); opacity: 1; }
    to { transform: translateX(100%); opacity: 0; }
}
"#;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn class_name(self) -> String {
        format!("notification notification--{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub created_at_ms: u64,
}

/// Where notifications are drawn. The browser implementation lives in
/// `frontend`; tests use an in-memory one.
pub trait ToastSurface: 'static {
    type Handle: Clone + 'static;

    /// Called once, before the first notification is mounted.
    fn inject_styles(&self);

    /// Returns `None` when the notification could not be displayed.
    fn mount(&self, notification: &Notification) -> Option<Self::Handle>;

    fn is_mounted(&self, handle: &Self::Handle) -> bool;

    fn begin_exit(&self, handle: &Self::Handle);

    fn remove(&self, handle: &Self::Handle);

    fn remove_all(&self);
}

pub trait Notify {
    fn notify(&self, message: &str, kind: NotificationKind);
}

pub struct NotificationCenter<S: Scheduler, T: ToastSurface> {
    scheduler: S,
    surface: Rc<T>,
    logger: Logger,
    duration_ms: u32,
    exit_ms: u32,
    styles_injected: Cell<bool>,
}

impl<S: Scheduler, T: ToastSurface> NotificationCenter<S, T> {
    pub fn new(scheduler: S, surface: T, settings: &Settings, logger: Logger) -> Self {
        Self {
            scheduler,
            surface: Rc::new(surface),
            logger,
            duration_ms: settings.notification_duration_ms,
            exit_ms: settings.notification_exit_ms,
            styles_injected: Cell::new(false),
        }
    }

    #[cfg(test)]
    pub fn surface(&self) -> &T {
        &self.surface
    }

    fn schedule_dismissal(&self, handle: T::Handle) {
        let surface = Rc::clone(&self.surface);
        let scheduler = self.scheduler.clone();
        let exit_ms = self.exit_ms;

        // Timers are never cancelled; a newer notification or a manual close
        // may already have removed this one.
        self.scheduler.defer(self.duration_ms, move || {
            if !surface.is_mounted(&handle) {
                return;
            }
            surface.begin_exit(&handle);

            scheduler.defer(exit_ms, move || {
                if surface.is_mounted(&handle) {
                    surface.remove(&handle);
                }
            });
        });
    }
}

impl<S: Scheduler, T: ToastSurface> Notify for NotificationCenter<S, T> {
    fn notify(&self, message: &str, kind: NotificationKind) {
        self.surface.remove_all();

        if !self.styles_injected.replace(true) {
            self.surface.inject_styles();
        }

        let notification = Notification {
            message: message.to_string(),
            kind,
            created_at_ms: self.scheduler.now_ms(),
        };

        let Some(handle) = self.surface.mount(&notification) else {
            self.logger.debug(
                "dom.missing",
                json!({ "target": "notification", "kind": kind.as_str() }),
            );
            return;
        };

        self.logger.debug(
            "notification.shown",
            json!({ "kind": kind.as_str(), "created_at_ms": notification.created_at_ms }),
        );
        self.schedule_dismissal(handle);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MemorySurface;
    use super::*;
    use crate::{logging::LogLevel, schedule::testing::ManualScheduler};

    fn center(scheduler: &ManualScheduler) -> NotificationCenter<ManualScheduler, MemorySurface> {
        NotificationCenter::new(
            scheduler.clone(),
            MemorySurface::default(),
            &Settings::default(),
            Logger::new(LogLevel::Warn),
        )
    }

    #[test]
    fn second_notification_replaces_the_first() {
        for kind in [NotificationKind::Info, NotificationKind::Success, NotificationKind::Error] {
            let scheduler = ManualScheduler::new();
            let center = center(&scheduler);

            center.notify("first", kind);
            center.notify("second", kind);

            let mounted = center.surface().mounted.borrow();
            assert_eq!(mounted.len(), 1);
            assert_eq!(mounted[0].message, "second");
            assert_eq!(mounted[0].kind, kind);
        }
    }

    #[test]
    fn styles_are_injected_once() {
        let scheduler = ManualScheduler::new();
        let center = center(&scheduler);

        center.notify("a", NotificationKind::Info);
        center.notify("b", NotificationKind::Error);
        center.notify("c", NotificationKind::Success);

        assert_eq!(*center.surface().style_injections.borrow(), 1);
    }

    #[test]
    fn notification_lives_for_duration_plus_exit() {
        let scheduler = ManualScheduler::new();
        let center = center(&scheduler);

        center.notify("hello", NotificationKind::Info);

        scheduler.advance(3_999);
        assert_eq!(center.surface().mounted.borrow().len(), 1);
        assert!(!center.surface().mounted.borrow()[0].exiting);

        scheduler.advance(1);
        assert!(center.surface().mounted.borrow()[0].exiting);

        scheduler.advance(299);
        assert_eq!(center.surface().mounted.borrow().len(), 1);

        scheduler.advance(1);
        assert!(center.surface().mounted.borrow().is_empty());
    }

    #[test]
    fn manual_close_makes_pending_timers_no_ops() {
        let scheduler = ManualScheduler::new();
        let center = center(&scheduler);

        center.notify("closable", NotificationKind::Success);
        let id = center.surface().mounted.borrow()[0].id;
        center.surface().close(id);
        assert!(center.surface().mounted.borrow().is_empty());

        scheduler.advance(10_000);
        assert!(center.surface().mounted.borrow().is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn stale_timer_does_not_dismiss_newer_notification() {
        let scheduler = ManualScheduler::new();
        let center = center(&scheduler);

        center.notify("old", NotificationKind::Info);
        scheduler.advance(3_000);
        center.notify("new", NotificationKind::Info);

        // The first notification's timer fires here against a removed element.
        scheduler.advance(1_300);
        let mounted = center.surface().mounted.borrow();
        assert_eq!(mounted.len(), 1);
        assert_eq!(mounted[0].message, "new");
        assert!(!mounted[0].exiting);
    }

    #[test]
    fn kind_maps_to_modifier_class() {
        assert_eq!(NotificationKind::default(), NotificationKind::Info);
        assert_eq!(
            NotificationKind::Error.class_name(),
            "notification notification--error"
        );
    }
}
