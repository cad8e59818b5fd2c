// common/src/utils.rs
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Setup tracing for consistent logging across the dashboard.
///
/// Unknown level names fall back to `INFO`.
pub fn setup_tracing(level: &str) {
    let level = Level::from_str(level).unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Seconds since the Unix epoch, the unit JWT `iat`/`exp` claims use
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
