use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("grade scale must define at least one band")]
    Empty,
    #[error("grade band labels must not be empty")]
    EmptyLabel,
    #[error("grade band '{label}' needs a finite cutoff")]
    NonFiniteCutoff { label: String },
    #[error("grade bands must be in strictly descending cutoff order ('{previous}' before '{label}')")]
    NotDescending { previous: String, label: String },
    #[error("grade scale fallback label must not be empty")]
    EmptyFallback,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GradeBand {
    pub label: String,
    pub min_rating: f64,
}

/// Rating-to-grade boundaries, scanned from the highest cutoff down; the
/// first band whose inclusive lower bound is satisfied wins, and ratings
/// below every band take the fallback label. Descending cutoffs are a
/// validated invariant, otherwise the first-match scan is ill-defined.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GradeScale {
    bands: Vec<GradeBand>,
    fallback: String,
}

impl GradeScale {
    pub fn new(bands: Vec<GradeBand>, fallback: impl Into<String>) -> Result<Self, ScaleError> {
        let scale = Self {
            bands,
            fallback: fallback.into(),
        };
        scale.validate()?;
        Ok(scale)
    }

    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Band labels from highest to lowest, fallback last.
    pub fn labels(&self) -> Vec<&str> {
        self.bands
            .iter()
            .map(|band| band.label.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
            .collect()
    }

    pub fn classify(&self, rating: f64) -> &str {
        self.bands
            .iter()
            .find(|band| rating >= band.min_rating)
            .map(|band| band.label.as_str())
            .unwrap_or(&self.fallback)
    }

    pub fn validate(&self) -> Result<(), ScaleError> {
        if self.bands.is_empty() {
            return Err(ScaleError::Empty);
        }
        if self.fallback.trim().is_empty() {
            return Err(ScaleError::EmptyFallback);
        }

        let mut previous: Option<&GradeBand> = None;
        for band in &self.bands {
            if band.label.trim().is_empty() {
                return Err(ScaleError::EmptyLabel);
            }
            if !band.min_rating.is_finite() {
                return Err(ScaleError::NonFiniteCutoff {
                    label: band.label.clone(),
                });
            }
            if let Some(prev) = previous
                && prev.min_rating <= band.min_rating
            {
                return Err(ScaleError::NotDescending {
                    previous: prev.label.clone(),
                    label: band.label.clone(),
                });
            }
            previous = Some(band);
        }
        Ok(())
    }
}
