pub mod vehicle;
pub mod pricing;

pub use vehicle::{
    build_vehicle, AddOn, CatalogError, ChildSeatAddOn, EconomyVehicle, ExtraInsuranceAddOn,
    GpsAddOn, LuxuryVehicle, RateCard, SuvVehicle, Vehicle, VehicleClass,
};
pub use pricing::{
    strategy_for, BasicPricing, DiscountTier, LongTermPricing, PremiumPricing, PricingConfig,
    PricingError, PricingKind, PricingStrategy,
};
