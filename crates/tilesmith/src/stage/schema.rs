//! Settings schemas and values for generation stages.
//!
//! Every stage declares an ordered schema of typed settings. Supplied values
//! are resolved against the schema before execution: missing keys fall back to
//! declared defaults, out-of-schema keys are ignored, and numbers are clamped
//! to declared bounds. Each setting also carries an independent randomize
//! policy used for exploratory configuration.
use std::collections::HashMap;

use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::TileKind;
use crate::rng::rand01;

/// A concrete setting value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Number(f64),
    Toggle(bool),
    Choice(String),
}

/// One option of an enumerated setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: &'static str,
    pub value: &'static str,
}

/// Typed descriptor for a single setting.
#[derive(Debug, Clone)]
pub enum SettingSpec {
    Number {
        label: &'static str,
        default: f64,
        min: f64,
        max: f64,
        step: f64,
        /// Inclusive range sampled by [`Schema::randomize`]; `None` keeps the default.
        random_range: Option<(f64, f64)>,
    },
    Toggle {
        label: &'static str,
        default: bool,
        /// Whether [`Schema::randomize`] may flip this toggle.
        random_flip: bool,
    },
    Choice {
        label: &'static str,
        default: &'static str,
        options: &'static [ChoiceOption],
        /// Subset drawn from by [`Schema::randomize`]; empty keeps the default.
        random_subset: &'static [&'static str],
    },
}

impl SettingSpec {
    fn default_value(&self) -> SettingValue {
        match self {
            SettingSpec::Number { default, .. } => SettingValue::Number(*default),
            SettingSpec::Toggle { default, .. } => SettingValue::Toggle(*default),
            SettingSpec::Choice { default, .. } => SettingValue::Choice((*default).to_owned()),
        }
    }

    /// Accepts a supplied value when its kind matches, normalizing numbers to
    /// the declared bounds.
    fn accept(&self, supplied: &SettingValue) -> Option<SettingValue> {
        match (self, supplied) {
            (SettingSpec::Number { min, max, .. }, SettingValue::Number(v)) => {
                Some(SettingValue::Number(v.clamp(*min, *max)))
            }
            (SettingSpec::Toggle { .. }, SettingValue::Toggle(v)) => {
                Some(SettingValue::Toggle(*v))
            }
            (SettingSpec::Choice { .. }, SettingValue::Choice(v)) => {
                Some(SettingValue::Choice(v.clone()))
            }
            _ => None,
        }
    }

    fn randomized(&self, rng: &mut dyn RngCore) -> SettingValue {
        match self {
            SettingSpec::Number {
                step, random_range, ..
            } => match random_range {
                Some((lo, hi)) => {
                    let intervals = ((hi - lo) / step) + 1.0;
                    let interval = (rand01(rng) * intervals).floor();
                    SettingValue::Number(lo + interval * step)
                }
                None => self.default_value(),
            },
            SettingSpec::Toggle {
                default,
                random_flip,
                ..
            } => {
                if *random_flip {
                    SettingValue::Toggle(rand01(rng) < 0.5)
                } else {
                    SettingValue::Toggle(*default)
                }
            }
            SettingSpec::Choice { random_subset, .. } => {
                if random_subset.is_empty() {
                    self.default_value()
                } else {
                    let index = (rand01(rng) * random_subset.len() as f64).floor() as usize;
                    SettingValue::Choice(random_subset[index].to_owned())
                }
            }
        }
    }
}

/// The ordered settings schema a stage declares.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: Vec<(&'static str, SettingSpec)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, spec: SettingSpec) -> Self {
        self.entries.push((key, spec));
        self
    }

    pub fn entries(&self) -> &[(&'static str, SettingSpec)] {
        &self.entries
    }

    /// Settings holding every declared default.
    pub fn default_values(&self) -> Settings {
        let mut settings = Settings::new();
        for (key, spec) in &self.entries {
            settings.set(*key, spec.default_value());
        }
        settings
    }

    /// Resolves supplied settings against this schema.
    pub fn resolve(&self, supplied: &Settings) -> Settings {
        let mut settings = Settings::new();
        for (key, spec) in &self.entries {
            let value = supplied
                .get(key)
                .and_then(|v| spec.accept(v))
                .unwrap_or_else(|| spec.default_value());
            settings.set(*key, value);
        }
        settings
    }

    /// Draws a fresh settings map per each setting's randomize policy.
    pub fn randomize(&self, rng: &mut dyn RngCore) -> Settings {
        let mut settings = Settings::new();
        for (key, spec) in &self.entries {
            settings.set(*key, spec.randomized(rng));
        }
        settings
    }
}

/// A mapping from setting name to value, as supplied by callers or presets.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    values: HashMap<String, SettingValue>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: SettingValue) {
        self.values.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: SettingValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_number(self, key: impl Into<String>, value: f64) -> Self {
        self.with(key, SettingValue::Number(value))
    }

    pub fn with_toggle(self, key: impl Into<String>, value: bool) -> Self {
        self.with(key, SettingValue::Toggle(value))
    }

    pub fn with_choice(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(key, SettingValue::Choice(value.into()))
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn number(&self, key: &str) -> Result<f64> {
        match self.values.get(key) {
            Some(SettingValue::Number(v)) => Ok(*v),
            _ => Err(Error::InvalidSettings(format!(
                "missing number setting '{key}'"
            ))),
        }
    }

    pub fn toggle(&self, key: &str) -> Result<bool> {
        match self.values.get(key) {
            Some(SettingValue::Toggle(v)) => Ok(*v),
            _ => Err(Error::InvalidSettings(format!(
                "missing toggle setting '{key}'"
            ))),
        }
    }

    pub fn choice(&self, key: &str) -> Result<&str> {
        match self.values.get(key) {
            Some(SettingValue::Choice(v)) => Ok(v),
            _ => Err(Error::InvalidSettings(format!(
                "missing choice setting '{key}'"
            ))),
        }
    }

    /// Parses an enumerated setting as a tile kind.
    pub fn tile_kind(&self, key: &str) -> Result<TileKind> {
        let value = self.choice(key)?;
        TileKind::parse(value).ok_or_else(|| {
            Error::InvalidSettings(format!("setting '{key}' is not a tile kind: '{value}'"))
        })
    }

    /// Parses an enumerated setting as a tile kind, where `"none"` selects no kind.
    pub fn optional_tile_kind(&self, key: &str) -> Result<Option<TileKind>> {
        let value = self.choice(key)?;
        if value == "none" {
            return Ok(None);
        }
        TileKind::parse(value).map(Some).ok_or_else(|| {
            Error::InvalidSettings(format!("setting '{key}' is not a tile kind: '{value}'"))
        })
    }
}
