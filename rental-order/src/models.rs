use crate::events::StatusChangedEvent;
use crate::{OrderError, OrderResult};
use chrono::{DateTime, Utc};
use rental_catalog::{PricingError, PricingKind, PricingStrategy, Vehicle};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Reservation status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Created,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ReservationStatus::Completed | ReservationStatus::Cancelled)
    }

    /// Created → Confirmed → Active → Completed, Cancelled from any non-terminal state
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;

        match (self, next) {
            (Created, Confirmed) | (Confirmed, Active) | (Active, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReservationStatus::Created => "created",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Active => "active",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

impl FromStr for ReservationStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" => Ok(ReservationStatus::Created),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "active" => Ok(ReservationStatus::Active),
            "completed" => Ok(ReservationStatus::Completed),
            "cancelled" | "canceled" => Ok(ReservationStatus::Cancelled),
            _ => Err(OrderError::UnknownStatus(s.to_string())),
        }
    }
}

/// Where the reservation was placed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Local,
    Online,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Local => f.write_str("local"),
            Channel::Online => f.write_str("online"),
        }
    }
}

/// Derived view of a reservation, recomputed on every call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationSummary {
    pub reservation_id: Uuid,
    pub customer_name: String,
    pub channel: Channel,
    pub description: String,
    pub duration_days: i64,
    pub pricing: PricingKind,
    pub total_price: Decimal,
    pub status: ReservationStatus,
}

impl fmt::Display for ReservationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reservation for {}: {} for {} day(s) ({}, {} pricing) - Total: {:.2} [{}]",
            self.customer_name,
            self.description,
            self.duration_days,
            self.channel,
            self.pricing,
            self.total_price,
            self.status
        )
    }
}

/// A vehicle rental owned by one customer.
///
/// The vehicle and pricing strategy are owned exclusively. Status only moves
/// through [`Reservation::change_status`], which never notifies anyone itself.
pub struct Reservation {
    id: Uuid,
    customer_name: String,
    channel: Channel,
    duration_days: i64,
    vehicle: Box<dyn Vehicle>,
    pricing: Box<dyn PricingStrategy>,
    status: ReservationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Fails with `InvalidDuration` unless `duration_days` is positive
    pub fn new(
        customer_name: String,
        channel: Channel,
        vehicle: Box<dyn Vehicle>,
        pricing: Box<dyn PricingStrategy>,
        duration_days: i64,
    ) -> OrderResult<Self> {
        if duration_days <= 0 {
            return Err(PricingError::InvalidDuration(duration_days).into());
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            customer_name,
            channel,
            duration_days,
            vehicle,
            pricing,
            status: ReservationStatus::Created,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn duration_days(&self) -> i64 {
        self.duration_days
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn vehicle(&self) -> &dyn Vehicle {
        self.vehicle.as_ref()
    }

    pub fn pricing_kind(&self) -> PricingKind {
        self.pricing.kind()
    }

    /// Swap the pricing strategy, leaving everything else untouched
    pub fn set_pricing_strategy(&mut self, pricing: Box<dyn PricingStrategy>) {
        self.pricing = pricing;
        self.updated_at = Utc::now();
    }

    pub fn total_price(&self) -> Result<Decimal, PricingError> {
        self.pricing.compute(self.vehicle.as_ref(), self.duration_days)
    }

    pub fn summarize(&self) -> Result<ReservationSummary, PricingError> {
        Ok(ReservationSummary {
            reservation_id: self.id,
            customer_name: self.customer_name.clone(),
            channel: self.channel,
            description: self.vehicle.description(),
            duration_days: self.duration_days,
            pricing: self.pricing.kind(),
            total_price: self.total_price()?,
            status: self.status,
        })
    }

    /// Move to `new_status` if the lifecycle allows it.
    ///
    /// On failure the reservation is left unchanged. On success the returned
    /// event is what the caller hands to the notifier.
    pub fn change_status(
        &mut self,
        new_status: ReservationStatus,
    ) -> Result<StatusChangedEvent, OrderError> {
        let old_status = self.status;
        if !old_status.can_transition_to(new_status) {
            return Err(OrderError::InvalidTransition {
                from: old_status,
                to: new_status,
            });
        }

        self.status = new_status;
        self.updated_at = Utc::now();
        tracing::info!(
            reservation_id = %self.id,
            from = %old_status,
            to = %new_status,
            "Reservation status changed"
        );

        Ok(StatusChangedEvent::new(self.id, old_status, new_status))
    }

    pub fn confirm(&mut self) -> Result<StatusChangedEvent, OrderError> {
        self.change_status(ReservationStatus::Confirmed)
    }

    pub fn activate(&mut self) -> Result<StatusChangedEvent, OrderError> {
        self.change_status(ReservationStatus::Active)
    }

    pub fn complete(&mut self) -> Result<StatusChangedEvent, OrderError> {
        self.change_status(ReservationStatus::Completed)
    }

    pub fn cancel(&mut self) -> Result<StatusChangedEvent, OrderError> {
        self.change_status(ReservationStatus::Cancelled)
    }
}

impl fmt::Debug for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reservation")
            .field("id", &self.id)
            .field("customer_name", &self.customer_name)
            .field("channel", &self.channel)
            .field("vehicle", &self.vehicle.description())
            .field("pricing", &self.pricing.kind())
            .field("duration_days", &self.duration_days)
            .field("status", &self.status)
            .finish()
    }
}
