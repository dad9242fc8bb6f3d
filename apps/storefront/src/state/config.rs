//! # Storefront Configuration
//!
//! Settings loaded once at startup. Read-only afterwards, so no lock.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file: the path passed in, else `KEYTOWISH_CONFIG`
//! 3. Environment variables (`KEYTOWISH_*`)
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! store_name = "KeyToWish"
//! currency_symbol = "$"
//! tax_rate_bps = 1000          # 10%
//! merchant_upi_id = "keytowish@upi"
//! share_base_url = "https://yourdomain.com/wishes/"
//! delivery_days = 7
//! gateway_latency_ms = 300
//! ```

use keytowish_core::{CheckoutPolicy, TaxRate, UpiApp};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use ts_rs::TS;

/// Fractional digits of the stored amounts (`Money` is in cents).
const CENT_DECIMALS: u32 = 2;

/// Highest `currency_decimals` that `format_currency` supports.
const MAX_CURRENCY_DECIMALS: u8 = 4;

/// Names the config file when no path is given explicitly.
pub const CONFIG_PATH_ENV: &str = "KEYTOWISH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Shown in the header and on confirmations
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Flat tax in basis points, e.g. 1000 = 10%
    pub tax_rate_bps: u32,

    /// Payee shown for UPI QR / manual transfer
    pub merchant_upi_id: String,

    /// Wish pages live at `{share_base_url}{key}`
    pub share_base_url: String,

    /// Days from order to estimated delivery
    pub delivery_days: u32,

    /// Simulated order-service round trip
    pub gateway_latency_ms: u64,

    /// Shown on the confirmation page for order questions
    pub support_email: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            store_name: "KeyToWish".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            tax_rate_bps: keytowish_core::DEFAULT_TAX_RATE_BPS,
            merchant_upi_id: "keytowish@upi".to_string(),
            share_base_url: "https://yourdomain.com/wishes/".to_string(),
            delivery_days: keytowish_core::DEFAULT_DELIVERY_DAYS,
            gateway_latency_ms: 300,
            support_email: "support@keytowish.com".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = StorefrontConfig::default();

        let path = config_path.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies environment variable overrides.
    ///
    /// ## Environment Variables
    /// - `KEYTOWISH_STORE_NAME`
    /// - `KEYTOWISH_TAX_RATE`: percent, e.g. "8.25"
    /// - `KEYTOWISH_MERCHANT_UPI_ID`
    /// - `KEYTOWISH_SHARE_BASE_URL`
    /// - `KEYTOWISH_DELIVERY_DAYS`
    /// - `KEYTOWISH_GATEWAY_LATENCY_MS`
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("KEYTOWISH_STORE_NAME") {
            self.store_name = name;
        }

        if let Ok(rate) = std::env::var("KEYTOWISH_TAX_RATE") {
            match parse_percent_bps(&rate) {
                Some(bps) => {
                    debug!(bps, "Overriding tax rate from environment");
                    self.tax_rate_bps = bps;
                }
                None => warn!(rate = %rate, "Ignoring unparseable KEYTOWISH_TAX_RATE"),
            }
        }

        if let Ok(upi) = std::env::var("KEYTOWISH_MERCHANT_UPI_ID") {
            self.merchant_upi_id = upi;
        }

        if let Ok(url) = std::env::var("KEYTOWISH_SHARE_BASE_URL") {
            self.share_base_url = url;
        }

        if let Ok(days) = std::env::var("KEYTOWISH_DELIVERY_DAYS") {
            if let Ok(d) = days.parse::<u32>() {
                self.delivery_days = d;
            }
        }

        if let Ok(ms) = std::env::var("KEYTOWISH_GATEWAY_LATENCY_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                self.gateway_latency_ms = ms;
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tax_rate_bps > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "tax_rate_bps must be at most 10000, got {}",
                self.tax_rate_bps
            )));
        }

        if !self.merchant_upi_id.contains('@') {
            return Err(ConfigError::Invalid(format!(
                "merchant_upi_id must look like name@bank, got '{}'",
                self.merchant_upi_id
            )));
        }

        if !self.share_base_url.starts_with("http://") && !self.share_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "share_base_url must be an http(s) URL, got '{}'",
                self.share_base_url
            )));
        }

        if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be between 0 and {}, got {}",
                MAX_CURRENCY_DECIMALS, self.currency_decimals
            )));
        }

        Ok(())
    }

    /// Pricing policy handed to each new checkout session.
    pub fn checkout_policy(&self) -> CheckoutPolicy {
        CheckoutPolicy {
            tax_rate: TaxRate::from_bps(self.tax_rate_bps),
            delivery_days: self.delivery_days,
        }
    }

    pub fn gateway_latency(&self) -> Duration {
        Duration::from_millis(self.gateway_latency_ms)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// Amounts are always held in cents; they are rescaled to
    /// `currency_decimals` places, rounding half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use keytowish_storefront::state::StorefrontConfig;
    ///
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.format_currency(1098), "$10.98");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let decimals = u32::from(self.currency_decimals);
        let units = rescale_cents(cents, decimals);
        let divisor = 10_i64.pow(decimals);
        let whole = (units / divisor).abs();
        let frac = (units % divisor).abs();

        format!(
            "{}{}{}",
            if units < 0 { "-" } else { "" },
            self.currency_symbol,
            if decimals > 0 {
                format!("{}.{:0width$}", whole, frac, width = decimals as usize)
            } else {
                whole.to_string()
            }
        )
    }

    /// The subset of configuration the frontend may see.
    pub fn public_view(&self) -> StoreInfo {
        StoreInfo {
            store_name: self.store_name.clone(),
            currency_code: self.currency_code.clone(),
            currency_symbol: self.currency_symbol.clone(),
            tax_rate_bps: self.tax_rate_bps,
            merchant_upi_id: self.merchant_upi_id.clone(),
            upi_apps: UpiApp::ALL
                .into_iter()
                .map(|app| UpiAppInfo {
                    id: app.id().to_string(),
                    name: app.display_name().to_string(),
                })
                .collect(),
            support_email: self.support_email.clone(),
        }
    }
}

/// "8.25" → 825. Negative or non-numeric input yields `None`.
fn parse_percent_bps(raw: &str) -> Option<u32> {
    let percent: f64 = raw.trim().trim_end_matches('%').parse().ok()?;
    if !percent.is_finite() || percent < 0.0 {
        return None;
    }
    Some((percent * 100.0).round() as u32)
}

/// Re-expresses a cent amount with `decimals` fractional digits.
fn rescale_cents(cents: i64, decimals: u32) -> i64 {
    match decimals.cmp(&CENT_DECIMALS) {
        Ordering::Equal => cents,
        Ordering::Greater => cents.saturating_mul(10_i64.pow(decimals - CENT_DECIMALS)),
        Ordering::Less => {
            let step = 10_i64.pow(CENT_DECIMALS - decimals);
            let half = step / 2;
            if cents < 0 {
                (cents - half) / step
            } else {
                (cents + half) / step
            }
        }
    }
}

/// Store details for the frontend header, payment step and confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StoreInfo {
    pub store_name: String,
    pub currency_code: String,
    pub currency_symbol: String,
    pub tax_rate_bps: u32,
    pub merchant_upi_id: String,
    pub upi_apps: Vec<UpiAppInfo>,
    pub support_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpiAppInfo {
    pub id: String,
    pub name: String,
}
