use ev_api_types::{Notification, NotificationKind};
use std::cell::{Cell, RefCell};

/// Holds at most one visible notification; a new one replaces the old.
///
/// Hosts clear by sequence number, so a timer scheduled for an overwritten
/// notification leaves the newer one alone.
#[derive(Default)]
pub struct Notifier {
    current: RefCell<Option<Notification>>,
    next_seq: Cell<u64>,
}

impl Notifier {
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> Notification {
        let seq = self.next_seq.get() + 1;
        self.next_seq.set(seq);

        let notification = Notification {
            seq,
            message: message.into(),
            kind,
        };
        *self.current.borrow_mut() = Some(notification.clone());
        notification
    }

    pub fn current(&self) -> Option<Notification> {
        self.current.borrow().clone()
    }

    /// Clears the visible notification only if it is still the one with `seq`.
    pub fn clear_if_current(&self, seq: u64) -> bool {
        let mut current = self.current.borrow_mut();
        if current.as_ref().is_some_and(|n| n.seq == seq) {
            current.take();
            return true;
        }
        false
    }
}
