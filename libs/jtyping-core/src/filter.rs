//! Selection filter: which pool to draw from and how to narrow it.

use crate::error::{QuizError, Result};
use crate::types::SubjectKind;
use serde::{Deserialize, Serialize};

/// Any learnable grade, jinmeiyō included.
pub const DEFAULT_GRADE_MAX: u8 = 9;
pub const DEFAULT_FREQ_MIN: f64 = 5.0;
pub const MAX_GRADE: u8 = 10;

/// Active selection filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizFilter {
    pub grade_max: u8,
    /// Minimum Zipf score for frequency-weighted vocabulary selection;
    /// `None` draws uniformly from all vocabulary.
    pub freq_min: Option<f64>,
    pub mode: SubjectKind,
}

impl Default for QuizFilter {
    fn default() -> Self {
        Self {
            grade_max: DEFAULT_GRADE_MAX,
            freq_min: Some(DEFAULT_FREQ_MIN),
            mode: SubjectKind::default(),
        }
    }
}

/// Unparsed filter options as they arrive in a query string or environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOverrides {
    pub grade_max: Option<String>,
    pub freq_min: Option<String>,
    pub mode: Option<String>,
}

impl QuizFilter {
    /// Apply overrides on top of this filter. `freqMin` of `""`, `none` or
    /// `off` switches to uniform vocabulary selection.
    pub fn with_overrides(&self, overrides: &FilterOverrides) -> Result<Self> {
        let mut filter = self.clone();

        if let Some(value) = &overrides.grade_max {
            let grade = value
                .trim()
                .parse::<u8>()
                .map_err(|_| QuizError::InvalidFilter(format!("gradeMax {value:?}")))?;
            filter.grade_max = grade;
        }

        if let Some(value) = &overrides.freq_min {
            filter.freq_min = match value.trim() {
                "" | "none" | "off" => None,
                v => Some(
                    v.parse::<f64>()
                        .map_err(|_| QuizError::InvalidFilter(format!("freqMin {value:?}")))?,
                ),
            };
        }

        if let Some(value) = &overrides.mode {
            filter.mode = SubjectKind::from_str(value.trim())
                .ok_or_else(|| QuizError::InvalidFilter(format!("mode {value:?}")))?;
        }

        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_GRADE).contains(&self.grade_max) {
            return Err(QuizError::InvalidFilter(format!(
                "gradeMax must be within 1..={MAX_GRADE}, got {}",
                self.grade_max
            )));
        }
        if let Some(min) = self.freq_min {
            if !min.is_finite() {
                return Err(QuizError::InvalidFilter(format!("freqMin must be finite, got {min}")));
            }
        }
        Ok(())
    }
}
