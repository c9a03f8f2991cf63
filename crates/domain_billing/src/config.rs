//! Billing engine configuration

use serde::Deserialize;

use core_kernel::Timezone;

/// Billing engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Trailing window, in seconds, within which an identical payment
    /// request (same invoice, amount, and user) is treated as a duplicate
    /// submit when no idempotency key was supplied
    pub duplicate_window_secs: u64,
    /// Facility timezone used to date invoice numbers
    pub timezone: Timezone,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            duplicate_window_secs: 5,
            timezone: Timezone::default(),
        }
    }
}

impl BillingConfig {
    /// Loads configuration from the environment
    ///
    /// Reads `BILLING_DUPLICATE_WINDOW_SECS` and `BILLING_TIMEZONE`,
    /// falling back to the defaults above.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        config::Config::builder()
            .set_default("duplicate_window_secs", 5_u64)?
            .set_default("timezone", "UTC")?
            .add_source(config::Environment::with_prefix("BILLING").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// The duplicate window as a chrono duration
    pub fn duplicate_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.duplicate_window_secs as i64)
    }
}
