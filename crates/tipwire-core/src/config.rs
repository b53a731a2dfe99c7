#![forbid(unsafe_code)]

//! Tooltip configuration.
//!
//! [`TooltipConfig`] gathers the attribute names, spacing, and surface markup
//! knobs used by the controller. Every field defaults to the stock behavior,
//! so `TooltipConfig::default()` needs no further setup.
//!
//! # Loading
//!
//! With the `config` feature the config can be read from TOML or JSON:
//!
//! ```toml
//! trigger_attribute = "data-tip"
//! default_placement = "bottom"
//! gap = 10.0
//! ```
//!
//! ```rust,ignore
//! let config = TooltipConfig::from_toml_str(text)?;
//! ```

use crate::placement::{DEFAULT_EDGE_PADDING, DEFAULT_GAP, Placement, PlacementConfig};

/// Attribute carrying the tooltip text on a trigger.
pub const DEFAULT_TRIGGER_ATTRIBUTE: &str = "data-tooltip";
/// Attribute carrying the preferred side on a trigger.
pub const DEFAULT_PLACEMENT_ATTRIBUTE: &str = "data-placement";
/// Class applied to the surface element.
pub const DEFAULT_SURFACE_CLASS: &str = "tooltip";
/// Prefix of generated surface ids.
pub const DEFAULT_SURFACE_ID_PREFIX: &str = "tooltip-";

const SURFACE_ID_SUFFIX_LEN: usize = 7;

/// Controller configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TooltipConfig {
    /// Attribute whose non-empty value makes an element a trigger.
    pub trigger_attribute: String,
    /// Attribute holding the preferred side.
    pub placement_attribute: String,
    /// Side used when the placement attribute is absent or invalid.
    pub default_placement: Placement,
    /// Distance between trigger and tooltip, in pixels.
    pub gap: f64,
    /// Minimum distance between tooltip and viewport edges, in pixels.
    pub edge_padding: f64,
    /// Class applied to the surface element.
    pub surface_class: String,
    /// Prefix for generated surface ids.
    pub surface_id_prefix: String,
    /// Explicit surface id. Generated from a seed when `None`.
    pub surface_id: Option<String>,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            trigger_attribute: DEFAULT_TRIGGER_ATTRIBUTE.to_owned(),
            placement_attribute: DEFAULT_PLACEMENT_ATTRIBUTE.to_owned(),
            default_placement: Placement::Top,
            gap: DEFAULT_GAP,
            edge_padding: DEFAULT_EDGE_PADDING,
            surface_class: DEFAULT_SURFACE_CLASS.to_owned(),
            surface_id_prefix: DEFAULT_SURFACE_ID_PREFIX.to_owned(),
            surface_id: None,
        }
    }
}

impl TooltipConfig {
    /// Use a fixed surface id instead of a generated one.
    #[must_use]
    pub fn with_surface_id(mut self, id: impl Into<String>) -> Self {
        self.surface_id = Some(id.into());
        self
    }

    /// Override the preferred-side fallback.
    #[must_use]
    pub fn with_default_placement(mut self, placement: Placement) -> Self {
        self.default_placement = placement;
        self
    }

    /// Spacing for the placement engine.
    #[must_use]
    pub fn placement_config(&self) -> PlacementConfig {
        PlacementConfig {
            gap: self.gap,
            edge_padding: self.edge_padding,
        }
    }

    /// Surface id: the explicit one, or `prefix + 7 base-36 chars` from `seed`.
    #[must_use]
    pub fn resolve_surface_id(&self, seed: u64) -> String {
        match &self.surface_id {
            Some(id) => id.clone(),
            None => generate_surface_id(&self.surface_id_prefix, seed),
        }
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.trigger_attribute.trim().is_empty() {
            errors.push("trigger_attribute must not be empty".into());
        }
        if self.placement_attribute.trim().is_empty() {
            errors.push("placement_attribute must not be empty".into());
        }
        if self.trigger_attribute == self.placement_attribute {
            errors.push(format!(
                "trigger_attribute and placement_attribute must differ, both are {:?}",
                self.trigger_attribute
            ));
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            errors.push(format!("gap must be finite and >= 0, got {}", self.gap));
        }
        if !self.edge_padding.is_finite() || self.edge_padding < 0.0 {
            errors.push(format!(
                "edge_padding must be finite and >= 0, got {}",
                self.edge_padding
            ));
        }
        if let Some(id) = &self.surface_id {
            if id.is_empty() || id.chars().any(char::is_whitespace) {
                errors.push(format!(
                    "surface_id must be non-empty without whitespace, got {id:?}"
                ));
            }
        }

        errors
    }

    /// Load from a TOML string and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Return `self` if valid, otherwise the validation errors.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// `prefix` followed by seven base-36 characters derived from `seed`.
#[must_use]
pub fn generate_surface_id(prefix: &str, seed: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut value = mix(seed);
    let mut out = String::with_capacity(prefix.len() + SURFACE_ID_SUFFIX_LEN);
    out.push_str(prefix);
    for _ in 0..SURFACE_ID_SUFFIX_LEN {
        out.push(DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    out
}

/// Wall-clock derived seed for surface ids.
///
/// Uses `web-time` so the same call works on `wasm32-unknown-unknown`.
#[must_use]
pub fn entropy_seed() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}

/// SplitMix64 finalizer so adjacent seeds give unrelated ids.
fn mix(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a tooltip configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_stock_behavior() {
        let config = TooltipConfig::default();
        assert_eq!(config.trigger_attribute, "data-tooltip");
        assert_eq!(config.placement_attribute, "data-placement");
        assert_eq!(config.default_placement, Placement::Top);
        assert_eq!(config.placement_config(), PlacementConfig::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn validate_reports_every_problem() {
        let config = TooltipConfig {
            trigger_attribute: "data-x".into(),
            placement_attribute: "data-x".into(),
            gap: f64::NAN,
            edge_padding: -1.0,
            surface_id: Some("has space".into()),
            ..TooltipConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("must differ")));
        assert!(errors.iter().any(|e| e.starts_with("gap")));
        assert!(errors.iter().any(|e| e.starts_with("edge_padding")));
        assert!(errors.iter().any(|e| e.starts_with("surface_id")));
    }

    #[test]
    fn validated_wraps_errors() {
        let err = TooltipConfig {
            trigger_attribute: String::new(),
            ..TooltipConfig::default()
        }
        .validated()
        .unwrap_err();
        assert!(err.to_string().contains("trigger_attribute must not be empty"));
    }

    #[test]
    fn generated_ids_have_stable_shape() {
        let id = generate_surface_id("tooltip-", 42);
        assert!(id.starts_with("tooltip-"));
        assert_eq!(id.len(), "tooltip-".len() + 7);
        assert!(id["tooltip-".len()..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_eq!(id, generate_surface_id("tooltip-", 42));
        assert_ne!(id, generate_surface_id("tooltip-", 43));
    }

    #[test]
    fn explicit_surface_id_wins() {
        let config = TooltipConfig::default().with_surface_id("tip");
        assert_eq!(config.resolve_surface_id(7), "tip");
    }

    #[cfg(feature = "config")]
    #[test]
    fn loads_partial_toml() {
        let config = TooltipConfig::from_toml_str(
            "trigger_attribute = \"data-tip\"\ndefault_placement = \"bottom\"\ngap = 10.0\n",
        )
        .expect("valid toml");
        assert_eq!(config.trigger_attribute, "data-tip");
        assert_eq!(config.default_placement, Placement::Bottom);
        assert_eq!(config.gap, 10.0);
        assert_eq!(config.edge_padding, DEFAULT_EDGE_PADDING);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_validation_errors_surface() {
        let err = TooltipConfig::from_json_str(r#"{"gap": -3.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
