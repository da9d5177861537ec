use rental_catalog::{PricingConfig, RateCard};
use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub rates: RateCard,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    #[serde(default = "default_email_sender")]
    pub email_sender: String,
    #[serde(default = "default_sms_sender")]
    pub sms_sender: String,
}

fn default_email_sender() -> String { "reservations@rental.local".to_string() }
fn default_sms_sender() -> String { "RENTAL".to_string() }

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            email_sender: default_email_sender(),
            sms_sender: default_sms_sender(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(
            Path::new("config"),
            // Eg. `RENTAL__PRICING__PREMIUM_SERVICE_FEE=75`
            config::Environment::with_prefix("RENTAL").separator("__"),
        )
    }

    /// Layer `config_dir` files under `environment`, later sources winning
    pub fn load_from(config_dir: &Path, environment: config::Environment) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Built-in policy covers anything the files leave out
            .add_source(config::File::from(config_dir.join("default")).required(false))
            .add_source(config::File::from(config_dir.join(&run_mode)).required(false))
            // Not checked in
            .add_source(config::File::from(config_dir.join("local")).required(false))
            .add_source(environment)
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, Environment, File, FileFormat, Map};
    use rental_catalog::DiscountTier;
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    fn repo_config_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../config")
    }

    fn rental_env(vars: &[(&str, &str)]) -> Environment {
        let map: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("RENTAL").separator("__").source(Some(map))
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let toml = r#"
            [rates]
            economy = 99

            [pricing]
            premium_service_fee = "12.50"
        "#;

        let cfg: AppConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.rates.economy, Decimal::from(99));
        assert_eq!(cfg.rates.suv, RateCard::default().suv);
        assert_eq!(cfg.pricing.premium_service_fee, Decimal::new(1250, 2));
        assert_eq!(cfg.pricing.long_term_tiers.len(), 2);
        assert_eq!(cfg.notifications.sms_sender, "RENTAL");
    }

    #[test]
    fn test_checked_in_default_file() {
        let cfg: AppConfig = Config::builder()
            .add_source(File::from(repo_config_dir().join("default")).required(true))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.rates, RateCard::default());
        assert_eq!(cfg.pricing, PricingConfig::default());
        assert_eq!(
            cfg.pricing.long_term_tiers[1],
            DiscountTier { min_days: 10, multiplier: Decimal::new(80, 2) }
        );
        assert_eq!(cfg.notifications.email_sender, "reservations@rental.local");
    }

    #[test]
    fn test_environment_overrides_files() {
        let cfg = AppConfig::load_from(
            &repo_config_dir(),
            rental_env(&[
                ("RENTAL__PRICING__PREMIUM_SERVICE_FEE", "75"),
                ("RENTAL__RATES__GPS", "12.5"),
                ("RENTAL__NOTIFICATIONS__SMS_SENDER", "FROTA"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.pricing.premium_service_fee, Decimal::from(75));
        assert_eq!(cfg.rates.gps, Decimal::new(125, 1));
        assert_eq!(cfg.notifications.sms_sender, "FROTA");
        // Untouched keys still come from the file
        assert_eq!(cfg.rates.luxury, Decimal::from(400));
        assert_eq!(cfg.pricing.long_term_tiers.len(), 2);
    }
}
