use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extensions::easing::Easing;

/// Tunables for one viewing session, provided by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// System scale used when the prompt is left empty or invalid (default: 1.0).
    pub default_scale: f32,
    /// Opacity fade duration in seconds (default: 0.5).
    pub fade_duration: f32,
    /// Re-zoom move duration in seconds (default: 0.5).
    pub move_duration: f32,
    pub fade_easing: Easing,
    pub move_easing: Easing,
    /// Whether the paid feature is unlocked: all planets become selectable.
    pub feature_unlocked: bool,
    /// Initial background opacity, 0 = transparent (default: 0.5).
    pub background_opacity: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_scale: 1.0,
            fade_duration: 0.5,
            move_duration: 0.5,
            fade_easing: Easing::Linear,
            move_easing: Easing::SineInOut,
            feature_unlocked: false,
            background_opacity: 0.5,
        }
    }
}

impl SessionConfig {
    /// Parse from a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse the user's scale prompt. Accepts a decimal comma; anything
    /// missing, unparsable or non-positive yields `default_scale`.
    pub fn parse_scale(&self, input: Option<&str>) -> f32 {
        let Some(raw) = input else {
            return self.default_scale;
        };
        match raw.trim().replace(',', ".").parse::<f32>() {
            Ok(v) if v.is_finite() && v > 0.0 => v,
            _ => {
                log::warn!("invalid scale {:?}, using {}", raw, self.default_scale);
                self.default_scale
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_accepts_decimal_comma() {
        let config = SessionConfig::default();
        assert_eq!(config.parse_scale(Some("0,5")), 0.5);
        assert_eq!(config.parse_scale(Some(" 2.25 ")), 2.25);
    }

    #[test]
    fn bad_scale_falls_back_to_default() {
        let config = SessionConfig::default();
        assert_eq!(config.parse_scale(None), 1.0);
        assert_eq!(config.parse_scale(Some("")), 1.0);
        assert_eq!(config.parse_scale(Some("abc")), 1.0);
        assert_eq!(config.parse_scale(Some("-3")), 1.0);
        assert_eq!(config.parse_scale(Some("0")), 1.0);
        assert_eq!(config.parse_scale(Some("inf")), 1.0);
    }

    #[test]
    fn json_overrides_only_given_fields() {
        let config = SessionConfig::from_json(r#"{"feature_unlocked": true, "fade_easing": "quad_out"}"#)
            .unwrap();
        assert!(config.feature_unlocked);
        assert_eq!(config.fade_easing, Easing::QuadOut);
        assert_eq!(config.fade_duration, 0.5);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SessionConfig::from_json("{not json").is_err());
    }
}
