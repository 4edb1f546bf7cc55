use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Arité invalide : {0} (minimum 2)")]
    Arity(usize),

    #[error("Fraction limite invalide : {0} (attendue dans [0, 1])")]
    BorderlineFraction(f64),

    #[error(
        "Poids de classement invalides : {near_miss}, {near_complete}, {complete} \
         (attendu 0 ≤ a < b < c)"
    )]
    RankWeights {
        near_miss: f64,
        near_complete: f64,
        complete: f64,
    },

    #[error("Bornes de somme invalides : [{min}, {max}]")]
    SumBounds { min: u64, max: u64 },

    #[error("Seuil de parité invalide : {0} (attendu dans ]0.5, 1])")]
    ParityShare(f64),

    #[error("Seuil de paires consécutives invalide : {0} (minimum 1)")]
    ConsecutivePairs(usize),

    #[error("Seuil de terminaisons invalide : {0} (minimum 1)")]
    TerminalDigits(usize),

    #[error("Plafond d'export invalide : 0")]
    ZeroCap,
}

/// Seuils du détecteur d'anomalies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyThresholds {
    pub min_consecutive_pairs: usize,
    pub sum_min: u64,
    pub sum_max: u64,
    /// Part de la parité majoritaire à partir de laquelle on signale
    /// (1.0 = tous pairs ou tous impairs).
    pub parity_share: f64,
    /// On signale quand le nombre de terminaisons distinctes (n mod 10) est ≤ à cette valeur.
    pub max_terminal_digits: usize,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            min_consecutive_pairs: 2,
            sum_min: 60,
            sum_max: 200,
            parity_share: 1.0,
            max_terminal_digits: 1,
        }
    }
}

/// Poids des trois paliers supérieurs de l'histogramme (arité-2, arité-1, arité).
/// Les paliers inférieurs pèsent 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankWeights {
    pub near_miss: f64,
    pub near_complete: f64,
    pub complete: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            near_miss: 1.0,
            near_complete: 8.0,
            complete: 50.0,
        }
    }
}

impl RankWeights {
    pub fn weight(&self, matches: usize, arity: usize) -> f64 {
        if matches == arity {
            self.complete
        } else if matches + 1 == arity {
            self.near_complete
        } else if matches + 2 == arity {
            self.near_miss
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportPolicy {
    /// Exclut toute variante signalée par le détecteur d'anomalies.
    #[default]
    Strict,
    /// Exporte FORTE + LIMITE sans tenir compte des anomalies.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub policy: ExportPolicy,
    /// `None` = pas de plafond.
    pub cap: Option<usize>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            policy: ExportPolicy::Strict,
            cap: Some(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub arity: usize,
    /// Fraction des tirages que doit dépasser le palier arité-2 pour classer LIMITE.
    /// Les versions historiques de l'outil utilisaient 0.15 ou 0.2.
    pub borderline_fraction: f64,
    pub anomaly: AnomalyThresholds,
    pub weights: RankWeights,
    pub export: ExportConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            arity: 4,
            borderline_fraction: 0.15,
            anomaly: AnomalyThresholds::default(),
            weights: RankWeights::default(),
            export: ExportConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arity < 2 {
            return Err(ConfigError::Arity(self.arity));
        }

        let f = self.borderline_fraction;
        if !f.is_finite() || !(0.0..=1.0).contains(&f) {
            return Err(ConfigError::BorderlineFraction(f));
        }

        let w = &self.weights;
        let finite = [w.near_miss, w.near_complete, w.complete].iter().all(|x| x.is_finite());
        let increasing = w.near_miss >= 0.0
            && w.near_miss < w.near_complete
            && w.near_complete < w.complete;
        if !finite || !increasing {
            return Err(ConfigError::RankWeights {
                near_miss: w.near_miss,
                near_complete: w.near_complete,
                complete: w.complete,
            });
        }

        let a = &self.anomaly;
        if a.sum_min > a.sum_max {
            return Err(ConfigError::SumBounds {
                min: a.sum_min,
                max: a.sum_max,
            });
        }
        if !a.parity_share.is_finite() || a.parity_share <= 0.5 || a.parity_share > 1.0 {
            return Err(ConfigError::ParityShare(a.parity_share));
        }
        if a.min_consecutive_pairs == 0 {
            return Err(ConfigError::ConsecutivePairs(a.min_consecutive_pairs));
        }
        if a.max_terminal_digits == 0 {
            return Err(ConfigError::TerminalDigits(a.max_terminal_digits));
        }

        if self.export.cap == Some(0) {
            return Err(ConfigError::ZeroCap);
        }

        Ok(())
    }

    /// Charge et valide une configuration JSON.
    /// Les champs absents prennent leur valeur par défaut.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire la configuration {:?}", path))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Configuration JSON invalide dans {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Échec de la sérialisation")?;
        std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.arity, 4);
        assert!((config.borderline_fraction - 0.15).abs() < 1e-12);
        assert_eq!(config.export.cap, Some(500));
        assert_eq!(config.export.policy, ExportPolicy::Strict);
    }

    #[test]
    fn test_rejects_small_arity() {
        let config = AnalysisConfig { arity: 1, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::Arity(1)));
    }

    #[test]
    fn test_rejects_fraction_out_of_range() {
        for f in [-0.1, 1.5, f64::NAN] {
            let config = AnalysisConfig { borderline_fraction: f, ..Default::default() };
            assert!(matches!(config.validate(), Err(ConfigError::BorderlineFraction(_))));
        }
    }

    #[test]
    fn test_rejects_non_increasing_weights() {
        let config = AnalysisConfig {
            weights: RankWeights { near_miss: 1.0, near_complete: 1.0, complete: 50.0 },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::RankWeights { .. })));

        let config = AnalysisConfig {
            weights: RankWeights { near_miss: -1.0, near_complete: 8.0, complete: 50.0 },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::RankWeights { .. })));
    }

    #[test]
    fn test_rejects_anomaly_thresholds() {
        let mut config = AnalysisConfig::default();
        config.anomaly.sum_min = 300;
        assert!(matches!(config.validate(), Err(ConfigError::SumBounds { .. })));

        let mut config = AnalysisConfig::default();
        config.anomaly.parity_share = 0.5;
        assert!(matches!(config.validate(), Err(ConfigError::ParityShare(_))));

        let mut config = AnalysisConfig::default();
        config.anomaly.min_consecutive_pairs = 0;
        assert_eq!(config.validate(), Err(ConfigError::ConsecutivePairs(0)));

        let mut config = AnalysisConfig::default();
        config.anomaly.max_terminal_digits = 0;
        assert_eq!(config.validate(), Err(ConfigError::TerminalDigits(0)));
    }

    #[test]
    fn test_rejects_zero_cap() {
        let mut config = AnalysisConfig::default();
        config.export.cap = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroCap));
        config.export.cap = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_weight_buckets() {
        let w = RankWeights::default();
        assert_eq!(w.weight(4, 4), 50.0);
        assert_eq!(w.weight(3, 4), 8.0);
        assert_eq!(w.weight(2, 4), 1.0);
        assert_eq!(w.weight(1, 4), 0.0);
        assert_eq!(w.weight(0, 4), 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"borderline_fraction": 0.2, "export": {"policy": "lenient", "cap": null}}"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert!((config.borderline_fraction - 0.2).abs() < 1e-12);
        assert_eq!(config.arity, 4);
        assert_eq!(config.export.policy, ExportPolicy::Lenient);
        assert_eq!(config.export.cap, None);
        assert_eq!(config.anomaly, AnomalyThresholds::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AnalysisConfig::default();
        config.borderline_fraction = 0.2;
        config.save(&path).unwrap();
        assert_eq!(AnalysisConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"arity": 0}"#).unwrap();
        let err = AnalysisConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Arité invalide"));
    }
}
