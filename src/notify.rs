//! User-visible notification channel. I/O failures (persistence, resource
//! loads) are routed here instead of being thrown across async boundaries.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

pub trait NotificationSink {
    fn notify(&self, severity: Severity, message: &str);
}

impl<T: NotificationSink + ?Sized> NotificationSink for std::rc::Rc<T> {
    fn notify(&self, severity: Severity, message: &str) {
        (**self).notify(severity, message);
    }
}

/// Default sink: forwards notifications to the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!(message),
            Severity::Warning => tracing::warn!(message),
            Severity::Error => tracing::error!(message),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;

    /// Records notifications for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub messages: RefCell<Vec<(Severity, String)>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, severity: Severity, message: &str) {
            self.messages
                .borrow_mut()
                .push((severity, message.to_string()));
        }
    }
}
