use crate::events::StatusChangedEvent;
use crate::models::ReservationStatus;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// Receives reservation status changes from a [`ReservationNotifier`]
pub trait ReservationObserver {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    fn on_status_changed(
        &self,
        reservation_id: Uuid,
        old_status: ReservationStatus,
        new_status: ReservationStatus,
    ) -> Result<(), ObserverError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    #[error("{channel} delivery failed: {reason}")]
    Delivery { channel: String, reason: String },

    #[error("Failed to encode audit entry: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Observer '{observer}' failed: {source}")]
    ObserverFailed {
        observer: String,
        #[source]
        source: ObserverError,
    },
}

/// Fans status changes out to attached observers in attachment order.
///
/// Attaching the same observer twice means it is notified twice per event.
#[derive(Default)]
pub struct ReservationNotifier {
    observers: Vec<Rc<dyn ReservationObserver>>,
}

impl ReservationNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, observer: Rc<dyn ReservationObserver>) {
        tracing::debug!(observer = observer.name(), "Observer attached");
        self.observers.push(observer);
    }

    /// Remove the first attachment of `observer`. Returns false if it was not attached.
    pub fn detach<O: ReservationObserver + ?Sized>(&mut self, observer: &Rc<O>) -> bool {
        let target = Rc::as_ptr(observer);
        match self
            .observers
            .iter()
            .position(|o| std::ptr::addr_eq(Rc::as_ptr(o), target))
        {
            Some(index) => {
                self.observers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Invoke every observer. A failing observer does not stop the rest;
    /// the first failure is returned once all have run.
    pub fn notify(
        &self,
        reservation_id: Uuid,
        old_status: ReservationStatus,
        new_status: ReservationStatus,
    ) -> Result<(), NotifierError> {
        let mut first_failure = None;

        for observer in &self.observers {
            if let Err(e) = observer.on_status_changed(reservation_id, old_status, new_status) {
                tracing::warn!(
                    observer = observer.name(),
                    %reservation_id,
                    error = %e,
                    "Observer failed to handle status change"
                );
                if first_failure.is_none() {
                    first_failure = Some(NotifierError::ObserverFailed {
                        observer: observer.name().to_string(),
                        source: e,
                    });
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn publish(&self, event: &StatusChangedEvent) -> Result<(), NotifierError> {
        self.notify(event.reservation_id, event.old_status, event.new_status)
    }
}

fn render_message(reservation_id: Uuid, old_status: ReservationStatus, new_status: ReservationStatus) -> String {
    format!("Reservation {} changed status: {} -> {}", reservation_id, old_status, new_status)
}

/// Simulated e-mail delivery; messages land in a local outbox
pub struct EmailObserver {
    sender: String,
    outbox: RefCell<Vec<String>>,
}

impl EmailObserver {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            outbox: RefCell::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.outbox.borrow().clone()
    }
}

impl ReservationObserver for EmailObserver {
    fn name(&self) -> &str {
        "email"
    }

    fn on_status_changed(
        &self,
        reservation_id: Uuid,
        old_status: ReservationStatus,
        new_status: ReservationStatus,
    ) -> Result<(), ObserverError> {
        let message = render_message(reservation_id, old_status, new_status);
        tracing::info!(from = %self.sender, "[Email] {}", message);
        self.outbox.borrow_mut().push(message);
        Ok(())
    }
}

/// Simulated SMS gateway
pub struct SmsObserver {
    sender_id: String,
    outbox: RefCell<Vec<String>>,
}

impl SmsObserver {
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            outbox: RefCell::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.outbox.borrow().clone()
    }
}

impl ReservationObserver for SmsObserver {
    fn name(&self) -> &str {
        "sms"
    }

    fn on_status_changed(
        &self,
        reservation_id: Uuid,
        old_status: ReservationStatus,
        new_status: ReservationStatus,
    ) -> Result<(), ObserverError> {
        let message = render_message(reservation_id, old_status, new_status);
        tracing::info!(from = %self.sender_id, "[SMS] {}", message);
        self.outbox.borrow_mut().push(message);
        Ok(())
    }
}

/// One recorded status change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub sequence: u64,
    pub event: StatusChangedEvent,
}

/// Append-only record of every status change it has seen
#[derive(Default)]
pub struct AuditLogObserver {
    entries: RefCell<Vec<AuditEntry>>,
}

impl AuditLogObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl ReservationObserver for AuditLogObserver {
    fn name(&self) -> &str {
        "audit_log"
    }

    fn on_status_changed(
        &self,
        reservation_id: Uuid,
        old_status: ReservationStatus,
        new_status: ReservationStatus,
    ) -> Result<(), ObserverError> {
        let mut entries = self.entries.borrow_mut();
        let entry = AuditEntry {
            sequence: entries.len() as u64 + 1,
            event: StatusChangedEvent::new(reservation_id, old_status, new_status),
        };

        let line = serde_json::to_string(&entry)?;
        tracing::info!(audit = %line, "[Audit]");
        entries.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    /// Records its tag into a shared journal so tests can see call order
    struct Recorder {
        tag: &'static str,
        journal: Rc<RefCell<Vec<&'static str>>>,
        fail: bool,
    }

    impl ReservationObserver for Recorder {
        fn name(&self) -> &str {
            self.tag
        }

        fn on_status_changed(
            &self,
            _reservation_id: Uuid,
            _old_status: ReservationStatus,
            _new_status: ReservationStatus,
        ) -> Result<(), ObserverError> {
            self.journal.borrow_mut().push(self.tag);
            if self.fail {
                return Err(ObserverError::Delivery {
                    channel: self.tag.to_string(),
                    reason: "gateway offline".to_string(),
                });
            }
            Ok(())
        }
    }

    fn recorder(tag: &'static str, journal: &Rc<RefCell<Vec<&'static str>>>, fail: bool) -> Rc<Recorder> {
        Rc::new(Recorder { tag, journal: journal.clone(), fail })
    }

    #[test]
    fn test_fan_out_order_and_detach() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let o1 = recorder("o1", &journal, false);
        let o2 = recorder("o2", &journal, false);
        let o3 = recorder("o3", &journal, false);

        let mut notifier = ReservationNotifier::new();
        notifier.attach(o1.clone());
        notifier.attach(o2.clone());
        notifier.attach(o3.clone());

        let id = Uuid::new_v4();
        notifier.notify(id, Created, Confirmed).unwrap();
        assert_eq!(*journal.borrow(), vec!["o1", "o2", "o3"]);

        journal.borrow_mut().clear();
        assert!(notifier.detach(&o2));
        notifier.notify(id, Confirmed, Active).unwrap();
        assert_eq!(*journal.borrow(), vec!["o1", "o3"]);

        // Already gone
        assert!(!notifier.detach(&o2));
        assert_eq!(notifier.observer_count(), 2);
    }

    #[test]
    fn test_duplicate_attach_notifies_twice() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let o1 = recorder("o1", &journal, false);

        let mut notifier = ReservationNotifier::new();
        notifier.attach(o1.clone());
        notifier.attach(o1.clone());
        notifier.notify(Uuid::new_v4(), Created, Cancelled).unwrap();
        assert_eq!(journal.borrow().len(), 2);

        // Detach removes one attachment at a time
        assert!(notifier.detach(&o1));
        assert_eq!(notifier.observer_count(), 1);
    }

    #[test]
    fn test_failing_observer_is_isolated() {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ReservationNotifier::new();
        notifier.attach(recorder("first", &journal, false));
        notifier.attach(recorder("flaky", &journal, true));
        notifier.attach(recorder("broken", &journal, true));
        notifier.attach(recorder("last", &journal, false));

        let err = notifier.notify(Uuid::new_v4(), Created, Confirmed).unwrap_err();

        assert_eq!(*journal.borrow(), vec!["first", "flaky", "broken", "last"]);
        let NotifierError::ObserverFailed { observer, .. } = err;
        assert_eq!(observer, "flaky");
    }

    #[test]
    fn test_builtin_observers_record() {
        let email = Rc::new(EmailObserver::new("reservas@locadora.test"));
        let sms = Rc::new(SmsObserver::new("LOCADORA"));
        let audit = Rc::new(AuditLogObserver::new());

        let mut notifier = ReservationNotifier::new();
        notifier.attach(email.clone());
        notifier.attach(sms.clone());
        notifier.attach(audit.clone());

        let event = StatusChangedEvent::new(Uuid::new_v4(), Created, Confirmed);
        notifier.publish(&event).unwrap();
        notifier.notify(event.reservation_id, Confirmed, Active).unwrap();

        assert_eq!(email.sent().len(), 2);
        assert!(sms.sent()[0].ends_with("created -> confirmed"));

        let entries = audit.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].sequence, 2);
        assert_eq!(entries[1].event.new_status, Active);
        assert_eq!(entries[0].event.reservation_id, event.reservation_id);
    }
}
