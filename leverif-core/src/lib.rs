//! Évaluation de variantes de loterie contre un historique de tirages :
//! matrice des intersections, statistiques par variante, anomalies structurelles,
//! classement pondéré et sélection pour l'export.

pub mod analysis;
pub mod anomaly;
pub mod classify;
pub mod config;
pub mod export;
pub mod matrix;
pub mod models;
pub mod parse;
pub mod stats;

pub use analysis::{Analysis, Analyzer, ArityMismatch, Summary};
pub use config::{AnalysisConfig, ConfigError, ExportPolicy};
pub use models::{Anomaly, ExportRow, Round, Snapshot, Tier, Variant, VariantAnalysis, VariantStats};
