use serde::{Deserialize, Serialize};

use crate::schema::Platform;
use crate::types::Dimension;

/// Relative importance of each dimension in the final score. Any
/// non-negative values; they are normalized to sum to 1 before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionWeights {
    pub presenca: f64,
    pub popularidade: f64,
    pub atividade: f64,
    pub engajamento: f64,
    pub difusao: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            presenca: 12.0,
            popularidade: 24.0,
            atividade: 16.0,
            engajamento: 28.0,
            difusao: 20.0,
        }
    }
}

impl DimensionWeights {
    #[must_use]
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Presenca => self.presenca,
            Dimension::Popularidade => self.popularidade,
            Dimension::Atividade => self.atividade,
            Dimension::Engajamento => self.engajamento,
            Dimension::Difusao => self.difusao,
        }
    }

    /// Weights scaled to sum to 1. An all-zero set stays all zero.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let sum: f64 = Dimension::ALL.iter().map(|d| self.get(*d)).sum();
        let denom = if sum > 0.0 { sum } else { 1.0 };
        Self {
            presenca: self.presenca / denom,
            popularidade: self.popularidade / denom,
            atividade: self.atividade / denom,
            engajamento: self.engajamento / denom,
            difusao: self.difusao / denom,
        }
    }
}

/// Parameters of the floor/cap normalization law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationParams {
    /// Score given to the smallest positive raw value.
    #[serde(alias = "piso_positivo")]
    pub floor: f64,
    /// Ceiling used when no single entity dominates.
    pub cap_min: f64,
    /// Largest/second-largest ratio at which the ceiling reaches 100.
    pub dominance_factor: f64,
}

impl Default for NormalizationParams {
    fn default() -> Self {
        Self {
            floor: 1.0,
            cap_min: 98.0,
            dominance_factor: 10.0,
        }
    }
}

/// Per-platform multipliers. Accepted for compatibility but not applied;
/// see [`crate::platform::apply_platform_weights`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformWeights {
    pub facebook: f64,
    pub instagram: f64,
    pub twitter: f64,
    pub tiktok: f64,
}

impl Default for PlatformWeights {
    fn default() -> Self {
        Self {
            facebook: 1.0,
            instagram: 1.0,
            twitter: 1.0,
            tiktok: 1.0,
        }
    }
}

impl PlatformWeights {
    #[must_use]
    pub fn get(&self, platform: Platform) -> f64 {
        match platform {
            Platform::Facebook => self.facebook,
            Platform::Instagram => self.instagram,
            Platform::Twitter => self.twitter,
            Platform::Tiktok => self.tiktok,
        }
    }

    /// Platforms whose weight differs from 1.0.
    #[must_use]
    pub fn non_default(&self) -> Vec<(Platform, f64)> {
        Platform::ALL
            .iter()
            .map(|p| (*p, self.get(*p)))
            .filter(|(_, w)| (*w - 1.0).abs() > f64::EPSILON)
            .collect()
    }
}

/// Everything the scoring engine is parameterized by.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: DimensionWeights,
    pub normalization: NormalizationParams,
    pub platform_weights: PlatformWeights,
}
