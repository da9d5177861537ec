pub mod models;
pub mod events;
pub mod factory;
pub mod notifier;

pub use models::{Channel, Reservation, ReservationStatus, ReservationSummary};
pub use events::StatusChangedEvent;
pub use factory::{LocalReservationFactory, OnlineReservationFactory, ReservationFactory, ReservationRequest};
pub use notifier::{
    AuditEntry, AuditLogObserver, EmailObserver, NotifierError, ObserverError, ReservationNotifier,
    ReservationObserver, SmsObserver,
};

use rental_catalog::{CatalogError, PricingError};

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Unknown reservation status: {0}")]
    UnknownStatus(String),
}

pub type OrderResult<T> = Result<T, OrderError>;
