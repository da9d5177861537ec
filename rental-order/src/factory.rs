use crate::models::{Channel, Reservation};
use crate::OrderResult;
use rental_catalog::{
    build_vehicle, strategy_for, AddOn, PricingConfig, PricingKind, RateCard, VehicleClass,
};
use serde::Deserialize;

/// Everything a caller supplies to open a reservation
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationRequest {
    pub customer_name: String,
    /// "economy", "suv" or "luxury"
    pub vehicle_spec: String,
    /// Add-ons, wrapped in the order given
    #[serde(default)]
    pub extras: Vec<String>,
    /// Overrides the channel default when present
    pub strategy_kind: Option<String>,
    pub duration_days: i64,
}

/// Builds reservations for one sales channel.
///
/// Implementors only decide the channel, its default pricing, and the policy
/// they price with. Object-graph construction lives in `create_reservation`.
pub trait ReservationFactory {
    fn channel(&self) -> Channel;

    fn default_pricing(&self) -> PricingKind;

    fn rates(&self) -> &RateCard;

    fn pricing_config(&self) -> &PricingConfig;

    /// Returns a reservation in `Created` status with no observers involved
    fn create_reservation(&self, request: ReservationRequest) -> OrderResult<Reservation> {
        let class: VehicleClass = request.vehicle_spec.parse()?;
        let extras = request
            .extras
            .iter()
            .map(|extra| extra.parse::<AddOn>())
            .collect::<Result<Vec<_>, _>>()?;

        let kind = match request.strategy_kind.as_deref() {
            Some(kind) => kind.parse()?,
            None => self.default_pricing(),
        };
        let pricing = strategy_for(kind, self.pricing_config())?;

        let vehicle = build_vehicle(class, &extras, self.rates());
        let reservation = Reservation::new(
            request.customer_name,
            self.channel(),
            vehicle,
            pricing,
            request.duration_days,
        )?;

        tracing::info!(
            reservation_id = %reservation.id(),
            channel = %reservation.channel(),
            pricing = %kind,
            vehicle = %reservation.vehicle().description(),
            "Reservation created"
        );
        Ok(reservation)
    }
}

/// Counter reservations, priced with `BasicPricing` unless overridden
#[derive(Debug, Clone, Default)]
pub struct LocalReservationFactory {
    rates: RateCard,
    pricing: PricingConfig,
}

impl LocalReservationFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(rates: RateCard, pricing: PricingConfig) -> Self {
        Self { rates, pricing }
    }
}

impl ReservationFactory for LocalReservationFactory {
    fn channel(&self) -> Channel {
        Channel::Local
    }

    fn default_pricing(&self) -> PricingKind {
        PricingKind::Basic
    }

    fn rates(&self) -> &RateCard {
        &self.rates
    }

    fn pricing_config(&self) -> &PricingConfig {
        &self.pricing
    }
}

/// Online reservations, priced with `PremiumPricing` unless overridden
#[derive(Debug, Clone, Default)]
pub struct OnlineReservationFactory {
    rates: RateCard,
    pricing: PricingConfig,
}

impl OnlineReservationFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(rates: RateCard, pricing: PricingConfig) -> Self {
        Self { rates, pricing }
    }
}

impl ReservationFactory for OnlineReservationFactory {
    fn channel(&self) -> Channel {
        Channel::Online
    }

    fn default_pricing(&self) -> PricingKind {
        PricingKind::Premium
    }

    fn rates(&self) -> &RateCard {
        &self.rates
    }

    fn pricing_config(&self) -> &PricingConfig {
        &self.pricing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReservationStatus;
    use crate::OrderError;
    use rental_catalog::{CatalogError, PricingError};
    use rust_decimal::Decimal;

    fn request(vehicle: &str, extras: &[&str], strategy: Option<&str>, days: i64) -> ReservationRequest {
        ReservationRequest {
            customer_name: "Bruno".to_string(),
            vehicle_spec: vehicle.to_string(),
            extras: extras.iter().map(|e| e.to_string()).collect(),
            strategy_kind: strategy.map(str::to_string),
            duration_days: days,
        }
    }

    #[test]
    fn test_channel_defaults() {
        let local = LocalReservationFactory::new()
            .create_reservation(request("suv", &[], None, 2))
            .unwrap();
        let online = OnlineReservationFactory::new()
            .create_reservation(request("suv", &[], None, 2))
            .unwrap();

        assert_eq!(local.channel(), Channel::Local);
        assert_eq!(local.pricing_kind(), PricingKind::Basic);
        assert_eq!(online.channel(), Channel::Online);
        assert_eq!(online.pricing_kind(), PricingKind::Premium);
        assert_eq!(online.status(), ReservationStatus::Created);

        // 220 * 2 + 50 service fee
        assert_eq!(online.total_price().unwrap(), Decimal::from(490));
    }

    #[test]
    fn test_strategy_override() {
        let res = OnlineReservationFactory::new()
            .create_reservation(request("economy", &[], Some("long_term"), 5))
            .unwrap();

        assert_eq!(res.pricing_kind(), PricingKind::LongTerm);
        // 120 * 5 * 0.90
        assert_eq!(res.total_price().unwrap(), Decimal::from(540));
    }

    #[test]
    fn test_extras_wrapped_in_order() {
        let res = LocalReservationFactory::new()
            .create_reservation(request("luxury", &["insurance", "gps"], None, 1))
            .unwrap();

        assert_eq!(res.vehicle().description(), "Luxury Car + Extra Insurance + GPS");
    }

    #[test]
    fn test_rejected_requests() {
        let factory = LocalReservationFactory::new();

        let err = factory
            .create_reservation(request("economy", &[], Some("surge"), 3))
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::Pricing(PricingError::InvalidStrategy(ref kind)) if kind == "surge"
        ));

        let err = factory
            .create_reservation(request("tank", &[], None, 3))
            .unwrap_err();
        assert!(matches!(err, OrderError::Catalog(CatalogError::UnknownVehicle(_))));

        let err = factory
            .create_reservation(request("economy", &["jetpack"], None, 3))
            .unwrap_err();
        assert!(matches!(err, OrderError::Catalog(CatalogError::UnknownExtra(_))));

        let err = factory
            .create_reservation(request("economy", &[], None, 0))
            .unwrap_err();
        assert!(matches!(err, OrderError::Pricing(PricingError::InvalidDuration(0))));
    }
}
