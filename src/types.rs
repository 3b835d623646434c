//! Record, configuration, and statistics types.

use serde::de::Error;
use serde::{Deserialize, Serialize};

use crate::cell::MAX_LEVEL;

/// A point-of-interest record.
///
/// Identified by `id` across the whole store; storing another room under the
/// same id overwrites the previous record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: u64,
    /// Short currency code, e.g. "EUR".
    pub currency: String,
    pub address: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Room {
    pub fn new(
        id: u64,
        currency: impl Into<String>,
        address: impl Into<String>,
        lat: f64,
        lng: f64,
    ) -> Self {
        Self {
            id,
            currency: currency.into(),
            address: address.into(),
            lat,
            lng,
        }
    }
}

/// Budget for one covering computation.
///
/// `max_cells` caps how many cells a covering may use; `min_level` and
/// `max_level` bound how coarse and how fine those cells may be. A tighter
/// budget widens the over-approximation, a looser one tracks the region more
/// closely at the cost of more range scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CovererParams {
    /// Coarsest subdivision level a covering cell may have.
    #[serde(default = "CovererParams::default_min_level")]
    pub min_level: u8,
    /// Finest subdivision level a covering cell may have.
    #[serde(default = "CovererParams::default_max_level")]
    pub max_level: u8,
    /// Upper bound on the number of cells in a covering.
    #[serde(default = "CovererParams::default_max_cells")]
    pub max_cells: usize,
}

impl CovererParams {
    const fn default_min_level() -> u8 {
        1
    }

    const fn default_max_level() -> u8 {
        MAX_LEVEL
    }

    const fn default_max_cells() -> usize {
        8
    }

    /// Parameters of the fine coverer used for point lookups.
    pub const fn lookup() -> Self {
        Self {
            min_level: 1,
            max_level: MAX_LEVEL,
            max_cells: 8,
        }
    }

    /// Parameters of the coarse coverer used for area display.
    pub const fn display() -> Self {
        Self {
            min_level: 1,
            max_level: 15,
            max_cells: 8,
        }
    }

    /// Validate covering budget values.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_level > self.max_level {
            return Err(format!(
                "min_level {} exceeds max_level {}",
                self.min_level, self.max_level
            ));
        }
        if self.max_level > MAX_LEVEL {
            return Err(format!(
                "max_level {} exceeds the deepest level {}",
                self.max_level, MAX_LEVEL
            ));
        }
        if self.max_cells == 0 {
            return Err("max_cells must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for CovererParams {
    fn default() -> Self {
        Self::lookup()
    }
}

/// Store configuration.
///
/// # Examples
///
/// ```rust
/// use cellstore::{Config, CovererParams};
///
/// let config = Config::default()
///     .with_cache_capacity(10_000)
///     .with_display_coverer(CovererParams {
///         min_level: 1,
///         max_level: 12,
///         max_cells: 6,
///     });
/// assert!(config.validate().is_ok());
///
/// // Load from JSON
/// let json = r#"{ "cache_capacity": 1000 }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.cache_capacity, 1000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of decoded buckets retained by the cache.
    #[serde(default = "Config::default_cache_capacity")]
    pub cache_capacity: usize,

    /// Fine coverer used by lookup queries.
    #[serde(default = "CovererParams::lookup")]
    pub lookup_coverer: CovererParams,

    /// Coarse coverer used for area display.
    #[serde(default = "CovererParams::display")]
    pub display_coverer: CovererParams,
}

impl Config {
    const fn default_cache_capacity() -> usize {
        50_000
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Cache capacity must be greater than zero");
        self.cache_capacity = capacity;
        self
    }

    pub fn with_lookup_coverer(mut self, params: CovererParams) -> Self {
        self.lookup_coverer = params;
        self
    }

    pub fn with_display_coverer(mut self, params: CovererParams) -> Self {
        self.display_coverer = params;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_capacity == 0 {
            return Err("Cache capacity must be greater than zero".to_string());
        }
        self.lookup_coverer
            .validate()
            .map_err(|e| format!("lookup coverer: {}", e))?;
        self.display_coverer
            .validate()
            .map_err(|e| format!("display coverer: {}", e))?;
        Ok(())
    }

    /// Load configuration from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature).
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature).
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: Self::default_cache_capacity(),
            lookup_coverer: CovererParams::lookup(),
            display_coverer: CovererParams::display(),
        }
    }
}

/// Point-in-time snapshot of store size counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Cell buckets ever written.
    pub buckets: u64,
    /// Distinct rooms indexed.
    pub rooms: u64,
    /// Decoded buckets currently cached.
    pub cached_buckets: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_new() {
        let room = Room::new(1, "EUR", "Rotterdam", 51.9244, 4.4777);
        assert_eq!(room.id, 1);
        assert_eq!(room.currency, "EUR");
        assert_eq!(room.address, "Rotterdam");
        assert_eq!(room.lat, 51.9244);
        assert_eq!(room.lng, 4.4777);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache_capacity, 50_000);
        assert_eq!(config.lookup_coverer, CovererParams::lookup());
        assert_eq!(config.display_coverer, CovererParams::display());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_operational_coverer_params() {
        let lookup = CovererParams::lookup();
        assert_eq!(lookup.min_level, 1);
        assert_eq!(lookup.max_level, 30);
        assert_eq!(lookup.max_cells, 8);

        let display = CovererParams::display();
        assert_eq!(display.max_level, 15);
        assert_eq!(display.max_cells, 8);
    }

    #[test]
    fn test_builder_chain() {
        let config = Config::default()
            .with_cache_capacity(123)
            .with_lookup_coverer(CovererParams {
                min_level: 2,
                max_level: 20,
                max_cells: 4,
            });
        assert_eq!(config.cache_capacity, 123);
        assert_eq!(config.lookup_coverer.max_level, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[should_panic(expected = "Cache capacity must be greater than zero")]
    fn test_zero_cache_capacity_builder_panics() {
        Config::default().with_cache_capacity(0);
    }

    #[test]
    fn test_validate_rejects_bad_coverer() {
        let inverted = CovererParams {
            min_level: 10,
            max_level: 5,
            max_cells: 8,
        };
        assert!(inverted.validate().is_err());

        let too_deep = CovererParams {
            min_level: 1,
            max_level: 31,
            max_cells: 8,
        };
        assert!(too_deep.validate().is_err());

        let no_cells = CovererParams {
            min_level: 1,
            max_level: 30,
            max_cells: 0,
        };
        assert!(no_cells.validate().is_err());

        let config = Config::default().with_lookup_coverer(inverted);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = Config::default().with_cache_capacity(777);
        let json = config.to_json().unwrap();
        let loaded = Config::from_json(&json).unwrap();
        assert_eq!(loaded.cache_capacity, 777);
        assert_eq!(loaded.lookup_coverer, config.lookup_coverer);
    }

    #[test]
    fn test_config_from_json_defaults_missing_fields() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.cache_capacity, 50_000);
        assert_eq!(config.display_coverer.max_level, 15);
    }

    #[test]
    fn test_config_from_json_rejects_invalid_values() {
        let json = r#"{ "cache_capacity": 0 }"#;
        assert!(Config::from_json(json).is_err());

        let json = r#"{ "lookup_coverer": { "min_level": 9, "max_level": 3 } }"#;
        assert!(Config::from_json(json).is_err());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default().with_cache_capacity(42);
        let toml_str = config.to_toml().unwrap();
        let loaded = Config::from_toml(&toml_str).unwrap();
        assert_eq!(loaded.cache_capacity, 42);
    }
}
