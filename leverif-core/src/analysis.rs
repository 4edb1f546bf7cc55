use tracing::{info, warn};

use crate::anomaly::detect;
use crate::classify::{classify, rank_order, rank_score};
use crate::config::{AnalysisConfig, ConfigError};
use crate::export::select;
use crate::matrix::{build_matrix_from_sets, MatchMatrix};
use crate::models::{ExportRow, NumberSet, Round, Snapshot, Tier, Variant, VariantAnalysis};
use crate::stats::aggregate;

/// Variante écartée : nombre de numéros saisis différent de l'arité, ou numéros répétés.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArityMismatch {
    /// Position dans la liste d'entrée.
    pub index: usize,
    pub id: String,
    /// Nombre de numéros saisis, doublons compris.
    pub found: usize,
    /// Saisies en trop par rapport aux numéros distincts.
    pub duplicates: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub rounds: usize,
    pub variants: usize,
    pub accepted: usize,
    pub strong: usize,
    pub borderline: usize,
    pub weak: usize,
    pub flagged: usize,
}

/// Pipeline complet avec une configuration validée à la construction.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Recalcule tout depuis l'instantané ; rien n'est conservé entre deux appels.
    pub fn analyze(&self, snapshot: &Snapshot<'_>) -> Analysis {
        let arity = self.config.arity;

        let mut accepted: Vec<&Variant> = Vec::with_capacity(snapshot.variants.len());
        let mut arity_mismatches = Vec::new();
        for (index, variant) in snapshot.variants.iter().enumerate() {
            let found = variant.numbers().len();
            let duplicates = found - variant.arity();
            if found == arity && duplicates == 0 {
                accepted.push(variant);
            } else {
                arity_mismatches.push(ArityMismatch {
                    index,
                    id: variant.id().to_string(),
                    found,
                    duplicates,
                });
            }
        }
        if !arity_mismatches.is_empty() {
            warn!(
                count = arity_mismatches.len(),
                arity, "variantes écartées : arité différente de la configuration"
            );
        }

        let round_sets: Vec<&NumberSet> = snapshot.rounds.iter().map(Round::numbers).collect();
        let variant_sets: Vec<&NumberSet> = accepted.iter().map(|v| v.set()).collect();
        let matrix = build_matrix_from_sets(&round_sets, &variant_sets);

        let n_rounds = snapshot.rounds.len();
        let variants: Vec<VariantAnalysis> = accepted
            .iter()
            .zip(matrix.rows())
            .map(|(variant, row)| {
                let stats = aggregate(row, arity);
                let tier = classify(&stats, arity, n_rounds, self.config.borderline_fraction);
                let rank_score = rank_score(&stats, arity, &self.config.weights);
                VariantAnalysis {
                    id: variant.id().to_string(),
                    numbers: variant.numbers().to_vec(),
                    anomalies: detect(variant.numbers(), &self.config.anomaly),
                    stats,
                    tier,
                    rank_score,
                }
            })
            .collect();

        let analysis = Analysis {
            config: self.config.clone(),
            total_variants: snapshot.variants.len(),
            n_rounds,
            matrix,
            variants,
            arity_mismatches,
        };

        let summary = analysis.summary();
        info!(
            rounds = summary.rounds,
            variants = summary.variants,
            strong = summary.strong,
            borderline = summary.borderline,
            weak = summary.weak,
            flagged = summary.flagged,
            "analyse terminée"
        );
        analysis
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    config: AnalysisConfig,
    total_variants: usize,
    n_rounds: usize,
    /// Lignes alignées sur `variants` (variantes retenues uniquement).
    pub matrix: MatchMatrix,
    pub variants: Vec<VariantAnalysis>,
    pub arity_mismatches: Vec<ArityMismatch>,
}

impl Analysis {
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Indices de `variants` par score décroissant, égalités dans l'ordre d'entrée.
    pub fn ranking(&self) -> Vec<usize> {
        let scores: Vec<f64> = self.variants.iter().map(|v| v.rank_score).collect();
        rank_order(&scores)
    }

    pub fn by_tier(&self, tier: Tier) -> impl Iterator<Item = &VariantAnalysis> {
        self.variants.iter().filter(move |v| v.tier == tier)
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        if self.n_rounds == 0 {
            return Vec::new();
        }
        select(&self.variants, &self.config.export)
    }

    pub fn summary(&self) -> Summary {
        let count = |tier: Tier| self.variants.iter().filter(|v| v.tier == tier).count();
        Summary {
            rounds: self.n_rounds,
            variants: self.total_variants,
            accepted: self.variants.len(),
            strong: count(Tier::Strong),
            borderline: count(Tier::Borderline),
            weak: count(Tier::Weak),
            flagged: self.variants.iter().filter(|v| !v.anomalies.is_empty()).count(),
        }
    }
}
