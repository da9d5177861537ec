use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A rentable vehicle, either a bare fleet car or a car wrapped in add-ons
pub trait Vehicle {
    /// Human-readable label, add-ons appended in wrap order
    fn description(&self) -> String;

    /// Daily rate including every add-on surcharge
    fn base_rate(&self) -> Decimal;
}

/// Vehicle classes offered by the fleet
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleClass {
    Economy,
    Suv,
    Luxury,
}

impl FromStr for VehicleClass {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "economy" => Ok(VehicleClass::Economy),
            "suv" => Ok(VehicleClass::Suv),
            "luxury" => Ok(VehicleClass::Luxury),
            _ => Err(CatalogError::UnknownVehicle(s.to_string())),
        }
    }
}

impl VehicleClass {
    /// Build the bare fleet car for this class at the rate card's price
    pub fn build(self, rates: &RateCard) -> Box<dyn Vehicle> {
        match self {
            VehicleClass::Economy => Box::new(EconomyVehicle::new(rates.economy)),
            VehicleClass::Suv => Box::new(SuvVehicle::new(rates.suv)),
            VehicleClass::Luxury => Box::new(LuxuryVehicle::new(rates.luxury)),
        }
    }
}

/// Optional extras that can be stacked on any vehicle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddOn {
    Gps,
    ChildSeat,
    ExtraInsurance,
}

impl FromStr for AddOn {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gps" => Ok(AddOn::Gps),
            "child_seat" => Ok(AddOn::ChildSeat),
            "insurance" | "extra_insurance" => Ok(AddOn::ExtraInsurance),
            _ => Err(CatalogError::UnknownExtra(s.to_string())),
        }
    }
}

impl AddOn {
    pub fn surcharge(self, rates: &RateCard) -> Decimal {
        match self {
            AddOn::Gps => rates.gps,
            AddOn::ChildSeat => rates.child_seat,
            AddOn::ExtraInsurance => rates.extra_insurance,
        }
    }

    /// Wrap `vehicle` in the decorator for this add-on
    pub fn wrap(self, vehicle: Box<dyn Vehicle>, rates: &RateCard) -> Box<dyn Vehicle> {
        let surcharge = self.surcharge(rates);
        match self {
            AddOn::Gps => Box::new(GpsAddOn::new(vehicle, surcharge)),
            AddOn::ChildSeat => Box::new(ChildSeatAddOn::new(vehicle, surcharge)),
            AddOn::ExtraInsurance => Box::new(ExtraInsuranceAddOn::new(vehicle, surcharge)),
        }
    }
}

/// Daily rates for the fleet and surcharges for add-ons
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RateCard {
    pub economy: Decimal,
    pub suv: Decimal,
    pub luxury: Decimal,

    pub gps: Decimal,
    pub child_seat: Decimal,
    pub extra_insurance: Decimal,
}

impl Default for RateCard {
    fn default() -> Self {
        Self {
            economy: Decimal::from(120),
            suv: Decimal::from(220),
            luxury: Decimal::from(400),
            gps: Decimal::from(20),
            child_seat: Decimal::from(15),
            extra_insurance: Decimal::from(50),
        }
    }
}

/// Build a base vehicle and wrap it with `extras` in the order given
pub fn build_vehicle(class: VehicleClass, extras: &[AddOn], rates: &RateCard) -> Box<dyn Vehicle> {
    extras
        .iter()
        .fold(class.build(rates), |vehicle, extra| extra.wrap(vehicle, rates))
}

#[derive(Debug, Clone, PartialEq)]
pub struct EconomyVehicle {
    daily_rate: Decimal,
}

impl EconomyVehicle {
    pub fn new(daily_rate: Decimal) -> Self {
        Self { daily_rate }
    }
}

impl Vehicle for EconomyVehicle {
    fn description(&self) -> String {
        "Economy Car".to_string()
    }

    fn base_rate(&self) -> Decimal {
        self.daily_rate
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuvVehicle {
    daily_rate: Decimal,
}

impl SuvVehicle {
    pub fn new(daily_rate: Decimal) -> Self {
        Self { daily_rate }
    }
}

impl Vehicle for SuvVehicle {
    fn description(&self) -> String {
        "SUV".to_string()
    }

    fn base_rate(&self) -> Decimal {
        self.daily_rate
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LuxuryVehicle {
    daily_rate: Decimal,
}

impl LuxuryVehicle {
    pub fn new(daily_rate: Decimal) -> Self {
        Self { daily_rate }
    }
}

impl Vehicle for LuxuryVehicle {
    fn description(&self) -> String {
        "Luxury Car".to_string()
    }

    fn base_rate(&self) -> Decimal {
        self.daily_rate
    }
}

/// GPS add-on. The wrapped vehicle is fixed at construction.
pub struct GpsAddOn {
    inner: Box<dyn Vehicle>,
    surcharge: Decimal,
}

impl GpsAddOn {
    pub fn new(inner: Box<dyn Vehicle>, surcharge: Decimal) -> Self {
        Self { inner, surcharge }
    }
}

impl Vehicle for GpsAddOn {
    fn description(&self) -> String {
        format!("{} + GPS", self.inner.description())
    }

    fn base_rate(&self) -> Decimal {
        self.inner.base_rate() + self.surcharge
    }
}

pub struct ChildSeatAddOn {
    inner: Box<dyn Vehicle>,
    surcharge: Decimal,
}

impl ChildSeatAddOn {
    pub fn new(inner: Box<dyn Vehicle>, surcharge: Decimal) -> Self {
        Self { inner, surcharge }
    }
}

impl Vehicle for ChildSeatAddOn {
    fn description(&self) -> String {
        format!("{} + Child Seat", self.inner.description())
    }

    fn base_rate(&self) -> Decimal {
        self.inner.base_rate() + self.surcharge
    }
}

/// Extra collision cover; stacking it twice charges twice
pub struct ExtraInsuranceAddOn {
    inner: Box<dyn Vehicle>,
    surcharge: Decimal,
}

impl ExtraInsuranceAddOn {
    pub fn new(inner: Box<dyn Vehicle>, surcharge: Decimal) -> Self {
        Self { inner, surcharge }
    }
}

impl Vehicle for ExtraInsuranceAddOn {
    fn description(&self) -> String {
        format!("{} + Extra Insurance", self.inner.description())
    }

    fn base_rate(&self) -> Decimal {
        self.inner.base_rate() + self.surcharge
    }
}

/// Catalog lookup errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("Unknown vehicle type: {0}")]
    UnknownVehicle(String),

    #[error("Unknown extra: {0}")]
    UnknownExtra(String),
}
