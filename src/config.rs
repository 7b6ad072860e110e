use serde::{Deserialize, Serialize};

use crate::format::DEFAULT_MAX_FRACTION_DIGITS;

/// Settings for a [`Calculator`](crate::Calculator).
///
/// Every field has a default, so a partial TOML document is enough:
///
/// ```toml
/// max_fraction_digits = 4
///
/// [tax]
/// enabled = true
/// mode = "custom"
/// rate = 5.0
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub max_fraction_digits: usize,
    /// Only offer local repairs that the evaluator accepts.
    pub validate_suggestions: bool,
    pub remote_timeout_ms: u64,
    pub tax: TaxSettings,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_fraction_digits: DEFAULT_MAX_FRACTION_DIGITS,
            validate_suggestions: true,
            remote_timeout_ms: 5000,
            tax: TaxSettings::default(),
        }
    }
}

impl CalculatorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxSettings {
    pub enabled: bool,
    pub mode: TaxMode,
    /// Percent rate used by [`TaxMode::Custom`] and [`TaxMode::ExtractCustom`].
    pub rate: f64,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: TaxMode::Add15,
            rate: 15.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxMode {
    /// Add a fixed 15% tax.
    #[default]
    #[serde(rename = "add-15")]
    Add15,
    /// Add `rate` percent.
    Custom,
    /// Remove `rate` percent that is already included.
    ExtractCustom,
    /// Divide by 0.93.
    #[serde(rename = "divide-93")]
    Divide93,
}

/// A tax figure derived from a successful result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub value: f64,
    pub formatted: String,
    pub mode: TaxMode,
    pub rate: f64,
    pub label: String,
}

impl TaxSettings {
    /// The rate actually applied by the current mode.
    pub fn effective_rate(&self) -> f64 {
        match self.mode {
            TaxMode::Add15 => 15.0,
            _ => self.rate,
        }
    }

    /// Apply the tax mode to `value`. `None` when tax is disabled.
    pub fn apply(&self, value: f64) -> Option<f64> {
        if !self.enabled {
            return None;
        }
        let factor = 1.0 + self.rate / 100.0;
        Some(match self.mode {
            TaxMode::Add15 => value * 1.15,
            TaxMode::Custom => value * factor,
            TaxMode::ExtractCustom => value / factor,
            TaxMode::Divide93 => value / 0.93,
        })
    }

    pub fn label(&self) -> &'static str {
        match self.mode {
            TaxMode::ExtractCustom => "Amount before tax",
            _ => "Total with tax",
        }
    }
}
