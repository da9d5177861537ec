mod app_config;

use anyhow::Context;
use app_config::AppConfig;
use clap::Parser;
use rental_order::{
    AuditLogObserver, EmailObserver, LocalReservationFactory, OnlineReservationFactory,
    Reservation, ReservationFactory, ReservationNotifier, ReservationRequest, ReservationStatus,
    SmsObserver,
};
use std::rc::Rc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[clap(
    name = "rental-cli",
    version,
    about = "Walks demo car rentals through their lifecycle."
)]
struct Cli {
    /// Statuses to apply, in order, to the counter reservation
    /// (created, confirmed, active, completed, cancelled)
    #[clap(long = "status", value_delimiter = ',')]
    statuses: Vec<ReservationStatus>,
}

impl Cli {
    fn counter_steps(&self) -> Vec<ReservationStatus> {
        if self.statuses.is_empty() {
            vec![
                ReservationStatus::Confirmed,
                ReservationStatus::Active,
                ReservationStatus::Completed,
            ]
        } else {
            self.statuses.clone()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rental_cli=info,rental_order=info,rental_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load config")?;
    tracing::info!("Starting rental demo");

    let mut notifier = ReservationNotifier::new();
    let audit = Rc::new(AuditLogObserver::new());
    notifier.attach(Rc::new(EmailObserver::new(config.notifications.email_sender.clone())));
    notifier.attach(Rc::new(SmsObserver::new(config.notifications.sms_sender.clone())));
    notifier.attach(audit.clone());

    let local = LocalReservationFactory::with_policy(config.rates.clone(), config.pricing.clone());
    let online = OnlineReservationFactory::with_policy(config.rates.clone(), config.pricing.clone());

    let mut counter = local.create_reservation(ReservationRequest {
        customer_name: "Ana Souza".to_string(),
        vehicle_spec: "economy".to_string(),
        extras: vec!["gps".to_string(), "child_seat".to_string()],
        strategy_kind: None,
        duration_days: 3,
    })?;
    run_lifecycle(&mut counter, &notifier, &cli.counter_steps());

    let mut web = online.create_reservation(ReservationRequest {
        customer_name: "Bruno Lima".to_string(),
        vehicle_spec: "luxury".to_string(),
        extras: vec!["insurance".to_string()],
        strategy_kind: Some("long_term".to_string()),
        duration_days: 12,
    })?;
    run_lifecycle(
        &mut web,
        &notifier,
        &[ReservationStatus::Confirmed, ReservationStatus::Cancelled],
    );

    // Terminal reservations stay put
    if let Err(e) = web.change_status(ReservationStatus::Active) {
        tracing::warn!("Rejected: {}", e);
    }

    println!("{} audit entries recorded", audit.len());
    Ok(())
}

/// Apply `steps` in order. A rejected step is reported and skipped.
fn run_lifecycle(reservation: &mut Reservation, notifier: &ReservationNotifier, steps: &[ReservationStatus]) {
    print_summary(reservation);

    for step in steps {
        let event = match reservation.change_status(*step) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Rejected: {}", e);
                continue;
            }
        };
        // A failed delivery is reported but does not abort the rental
        if let Err(e) = notifier.publish(&event) {
            tracing::error!("Notification failed: {}", e);
        }
    }

    print_summary(reservation);
}

fn print_summary(reservation: &Reservation) {
    match reservation.summarize() {
        Ok(summary) => println!("{}", summary),
        Err(e) => tracing::error!(reservation_id = %reservation.id(), "Cannot price reservation: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_counter_steps() {
        let cli = Cli::try_parse_from(["rental-cli"]).unwrap();
        assert_eq!(cli.counter_steps().last(), Some(&ReservationStatus::Completed));
    }

    #[test]
    fn test_status_args_parsed_in_order() {
        let cli = Cli::try_parse_from([
            "rental-cli",
            "--status",
            "confirmed,Active",
            "--status",
            "cancelled",
        ])
        .unwrap();

        assert_eq!(
            cli.counter_steps(),
            vec![
                ReservationStatus::Confirmed,
                ReservationStatus::Active,
                ReservationStatus::Cancelled,
            ]
        );
    }

    #[test]
    fn test_unknown_status_arg_rejected() {
        let err = Cli::try_parse_from(["rental-cli", "--status", "returned"]).unwrap_err();
        assert!(err.to_string().contains("Unknown reservation status: returned"));
    }
}
