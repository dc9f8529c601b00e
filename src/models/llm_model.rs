//! LLM model model
//!
//! A model belongs to one provider. At most one model per provider is
//! active at a time; new models start inactive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{ModelId, ProviderId};

/// Maximum length of model IDs and display names
pub const MAX_MODEL_FIELD_LEN: usize = 255;

/// Digits kept after the decimal point in a cost
const COST_SCALE: u32 = 6;

/// Largest accepted cost, in millionths (9999.999999)
const MAX_COST_MICROS: u64 = 9_999_999_999;

/// Price per 1000 tokens, stored in millionths of a currency unit
///
/// Serialized as a decimal string such as `"0.0025"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CostPer1k(u64);

impl CostPer1k {
    /// Cost from millionths of a unit
    pub fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Cost in millionths of a unit
    pub fn micros(&self) -> u64 {
        self.0
    }

    /// Parse an optional form field; blank means "no cost"
    pub fn parse_optional(input: Option<&str>) -> Result<Option<Self>, ModelValidationError> {
        match input.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => value.parse().map(Some),
            None => Ok(None),
        }
    }
}

impl FromStr for CostPer1k {
    type Err = ModelValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelValidationError::InvalidCost(s.to_string());
        let s = s.trim();

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > COST_SCALE as usize
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_micros: u64 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac, width = COST_SCALE as usize);
            padded.parse().map_err(|_| invalid())?
        };

        let micros = whole
            .checked_mul(10u64.pow(COST_SCALE))
            .and_then(|w| w.checked_add(frac_micros))
            .filter(|m| *m <= MAX_COST_MICROS)
            .ok_or_else(invalid)?;

        Ok(Self(micros))
    }
}

impl fmt::Display for CostPer1k {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = 10u64.pow(COST_SCALE);
        let whole = self.0 / unit;
        let frac = self.0 % unit;
        if frac == 0 {
            return f.pad(&whole.to_string());
        }
        let frac = format!("{:0width$}", frac, width = COST_SCALE as usize);
        f.pad(&format!("{}.{}", whole, frac.trim_end_matches('0')))
    }
}

impl TryFrom<String> for CostPer1k {
    type Error = ModelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CostPer1k> for String {
    fn from(cost: CostPer1k) -> Self {
        cost.to_string()
    }
}

/// An LLM model offered through a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmModel {
    pub id: ModelId,

    /// Owning provider
    pub provider_id: ProviderId,

    /// Provider-side model identifier, e.g. `gpt-4o`
    pub model_id: String,

    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_cost_per_1k: Option<CostPer1k>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_cost_per_1k: Option<CostPer1k>,

    /// Whether this is the provider's active model
    #[serde(default)]
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LlmModel {
    /// Create an inactive model for a provider
    pub fn new(provider_id: ProviderId, model_id: &str, display_name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: ModelId::new(),
            provider_id,
            model_id: model_id.trim().to_string(),
            display_name: display_name.trim().to_string(),
            input_cost_per_1k: None,
            output_cost_per_1k: None,
            is_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the model
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.model_id.is_empty() {
            return Err(ModelValidationError::EmptyModelId);
        }
        if self.display_name.trim().is_empty() {
            return Err(ModelValidationError::EmptyDisplayName);
        }
        if self.model_id.len() > MAX_MODEL_FIELD_LEN || self.display_name.len() > MAX_MODEL_FIELD_LEN {
            return Err(ModelValidationError::TooLong);
        }
        Ok(())
    }
}

impl fmt::Display for LlmModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.model_id)
    }
}

/// Validation errors for models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    EmptyModelId,
    EmptyDisplayName,
    TooLong,
    InvalidCost(String),
}

impl fmt::Display for ModelValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyModelId => write!(f, "Model ID is required"),
            Self::EmptyDisplayName => write!(f, "Display name is required"),
            Self::TooLong => write!(
                f,
                "Model ID and display name must be at most {} chars",
                MAX_MODEL_FIELD_LEN
            ),
            Self::InvalidCost(value) => write!(
                f,
                "Invalid cost '{}': expected a non-negative decimal with at most 6 decimal places",
                value
            ),
        }
    }
}

impl std::error::Error for ModelValidationError {}
