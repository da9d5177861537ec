use crate::vehicle::Vehicle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pricing strategies available to a reservation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingKind {
    Basic,
    Premium,
    LongTerm,
}

impl FromStr for PricingKind {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(PricingKind::Basic),
            "premium" => Ok(PricingKind::Premium),
            "long_term" | "longterm" | "long-term" => Ok(PricingKind::LongTerm),
            _ => Err(PricingError::InvalidStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for PricingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingKind::Basic => write!(f, "basic"),
            PricingKind::Premium => write!(f, "premium"),
            PricingKind::LongTerm => write!(f, "long_term"),
        }
    }
}

/// One step of the long-term discount schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountTier {
    /// Rentals of at least this many days qualify
    pub min_days: i64,

    /// Applied to the linear total, strictly between 0 and 1
    pub multiplier: Decimal,
}

/// Pricing policy constants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingConfig {
    /// Flat fee added once per premium rental
    pub premium_service_fee: Decimal,

    /// Long-term discount schedule
    pub long_term_tiers: Vec<DiscountTier>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            premium_service_fee: Decimal::from(50),
            long_term_tiers: vec![
                DiscountTier { min_days: 5, multiplier: Decimal::new(90, 2) },
                DiscountTier { min_days: 10, multiplier: Decimal::new(80, 2) },
            ],
        }
    }
}

/// Computes the total price of renting a vehicle for a number of days.
///
/// Implementations are pure: identical inputs always give identical totals.
pub trait PricingStrategy {
    fn kind(&self) -> PricingKind;

    fn compute(&self, vehicle: &dyn Vehicle, duration_days: i64) -> Result<Decimal, PricingError>;
}

/// Daily rate times days, shared by every strategy
fn linear_total(vehicle: &dyn Vehicle, duration_days: i64) -> Result<Decimal, PricingError> {
    if duration_days <= 0 {
        return Err(PricingError::InvalidDuration(duration_days));
    }
    Ok(vehicle.base_rate() * Decimal::from(duration_days))
}

#[derive(Debug, Clone, Default)]
pub struct BasicPricing;

impl PricingStrategy for BasicPricing {
    fn kind(&self) -> PricingKind {
        PricingKind::Basic
    }

    fn compute(&self, vehicle: &dyn Vehicle, duration_days: i64) -> Result<Decimal, PricingError> {
        linear_total(vehicle, duration_days).map(|total| total.round_dp(2))
    }
}

#[derive(Debug, Clone)]
pub struct PremiumPricing {
    service_fee: Decimal,
}

impl PremiumPricing {
    pub fn new(service_fee: Decimal) -> Self {
        Self { service_fee }
    }
}

impl PricingStrategy for PremiumPricing {
    fn kind(&self) -> PricingKind {
        PricingKind::Premium
    }

    fn compute(&self, vehicle: &dyn Vehicle, duration_days: i64) -> Result<Decimal, PricingError> {
        let total = linear_total(vehicle, duration_days)? + self.service_fee;
        Ok(total.round_dp(2))
    }
}

/// Linear pricing with a discount for longer rentals
#[derive(Debug, Clone)]
pub struct LongTermPricing {
    // Sorted by min_days ascending
    tiers: Vec<DiscountTier>,
}

impl LongTermPricing {
    pub fn new(mut tiers: Vec<DiscountTier>) -> Result<Self, PricingError> {
        if let Some(bad) = tiers
            .iter()
            .find(|t| t.multiplier <= Decimal::ZERO || t.multiplier >= Decimal::ONE)
        {
            return Err(PricingError::InvalidPolicy(format!(
                "discount multiplier {} for {} days is outside (0, 1)",
                bad.multiplier, bad.min_days
            )));
        }
        tiers.sort_by_key(|t| t.min_days);
        Ok(Self { tiers })
    }

    /// Multiplier for the highest tier reached by `duration_days`
    pub fn multiplier_for(&self, duration_days: i64) -> Decimal {
        self.tiers
            .iter()
            .rev()
            .find(|t| duration_days >= t.min_days)
            .map(|t| t.multiplier)
            .unwrap_or(Decimal::ONE)
    }
}

impl PricingStrategy for LongTermPricing {
    fn kind(&self) -> PricingKind {
        PricingKind::LongTerm
    }

    fn compute(&self, vehicle: &dyn Vehicle, duration_days: i64) -> Result<Decimal, PricingError> {
        let base = linear_total(vehicle, duration_days)?;
        let multiplier = self.multiplier_for(duration_days);
        tracing::debug!(duration_days, %multiplier, "Applying long-term multiplier");
        Ok((base * multiplier).round_dp(2))
    }
}

/// Instantiate the strategy for `kind` using the configured policy
pub fn strategy_for(
    kind: PricingKind,
    config: &PricingConfig,
) -> Result<Box<dyn PricingStrategy>, PricingError> {
    Ok(match kind {
        PricingKind::Basic => Box::new(BasicPricing),
        PricingKind::Premium => Box::new(PremiumPricing::new(config.premium_service_fee)),
        PricingKind::LongTerm => Box::new(LongTermPricing::new(config.long_term_tiers.clone())?),
    })
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PricingError {
    #[error("Invalid pricing strategy: {0}")]
    InvalidStrategy(String),

    #[error("Invalid rental duration: {0} day(s)")]
    InvalidDuration(i64),

    #[error("Invalid pricing policy: {0}")]
    InvalidPolicy(String),
}
