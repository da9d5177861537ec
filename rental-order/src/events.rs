use crate::models::ReservationStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted by a successful status change and published through the notifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChangedEvent {
    pub reservation_id: Uuid,
    pub old_status: ReservationStatus,
    pub new_status: ReservationStatus,
    pub timestamp: i64,
}

impl StatusChangedEvent {
    pub fn new(reservation_id: Uuid, old_status: ReservationStatus, new_status: ReservationStatus) -> Self {
        Self {
            reservation_id,
            old_status,
            new_status,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}
