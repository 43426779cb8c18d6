//! # Shift Simulator
//!
//! Opens the standard desk on a manual clock, plays a short scripted shift
//! through the actor, then prints the transactions and the revenue summary.
//!
//! ## Usage
//! ```bash
//! # Default: settle after 90 minutes
//! cargo run -p arcade-desk --bin simulate
//!
//! # Custom config file and shift length
//! cargo run -p arcade-desk --bin simulate -- --config ./desk.toml --minutes 150
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use arcade_core::{Floor, Membership, NewCustomer};
use arcade_desk::{init_tracing, DeskActor, DeskConfig, DeskEvent, ManualClock, RentalDesk};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let config_path = arg_value(&args, "--config").map(PathBuf::from);
    let minutes: i64 = match arg_value(&args, "--minutes") {
        Some(raw) => raw.parse()?,
        None => 90,
    };

    let config = DeskConfig::load(config_path)?;
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let desk = RentalDesk::from_config(&config, clock.clone());
    let (handle, join) = DeskActor::spawn(desk, config.tick_interval());
    let mut events = handle.subscribe();

    info!(minutes, "Simulating shift");

    let budi = handle
        .add_customer(NewCustomer {
            name: "Budi Santoso".into(),
            phone: "0812-3456-7890".into(),
            address: "Jl. Merdeka 10".into(),
            ktp_photo_url: None,
            membership: Membership::Regular,
        })
        .await?;
    let sari = handle
        .add_customer(NewCustomer {
            name: "Sari Dewi".into(),
            phone: "0813-1111-2222".into(),
            membership: Membership::Vip,
            ..Default::default()
        })
        .await?;

    let vip = handle.console_views(Some(Floor::Vip)).await?;
    let vip_console = vip
        .first()
        .map(|v| v.console_id)
        .ok_or("no VIP consoles")?;

    let first = handle.start_session(1, &budi.id, 1.0).await?;
    handle.add_order_line(&first.id, "fb1").await?;
    handle.add_order_line(&first.id, "fb5").await?;
    handle.add_order_line(&first.id, "fb5").await?;

    let second = handle.start_session(vip_console, &sari.id, 2.0).await?;
    handle.add_order_line(&second.id, "fb3").await?;
    handle.extend_session(&second.id, 0.5).await?;

    clock.advance(Duration::minutes(minutes));
    for view in handle.tick_now().await? {
        println!(
            "{:<8} {} remaining{}",
            view.name,
            view.countdown,
            if view.is_overtime { " (overtime)" } else { "" }
        );
    }

    for session_id in [&first.id, &second.id] {
        let tx = handle.end_session(session_id).await?;
        println!(
            "{} {:<8} rental {:>12}  f&b {:>10}  total {:>12}",
            tx.id,
            tx.console_name,
            config.format_currency(tx.rental_cost),
            config.format_currency(tx.food_and_beverage_cost),
            config.format_currency(tx.total_cost),
        );
    }

    let summary = handle.revenue_summary().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!(
        "{} transactions, revenue {}",
        summary.transaction_count,
        config.format_currency(summary.total_revenue)
    );

    handle.shutdown().await?;
    join.await?;

    let mut shortfalls = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, DeskEvent::StockShortfall { .. }) {
            shortfalls += 1;
        }
    }
    info!(shortfalls, "Shift complete");

    Ok(())
}

/// The value following `flag`, if present.
fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
