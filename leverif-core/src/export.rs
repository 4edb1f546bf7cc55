use crate::classify::rank_order;
use crate::config::{ExportConfig, ExportPolicy};
use crate::models::{ExportRow, Tier, VariantAnalysis};

/// Sélectionne les variantes FORTE et LIMITE, exclut les variantes signalées en mode strict,
/// trie par score décroissant (stable) et applique le plafond.
pub fn select(analyses: &[VariantAnalysis], config: &ExportConfig) -> Vec<ExportRow> {
    let eligible: Vec<&VariantAnalysis> = analyses
        .iter()
        .filter(|a| matches!(a.tier, Tier::Strong | Tier::Borderline))
        .filter(|a| config.policy == ExportPolicy::Lenient || a.anomalies.is_empty())
        .collect();

    let scores: Vec<f64> = eligible.iter().map(|a| a.rank_score).collect();
    let limit = config.cap.unwrap_or(usize::MAX);

    rank_order(&scores)
        .into_iter()
        .take(limit)
        .map(|i| {
            let a = eligible[i];
            ExportRow {
                id: a.id.clone(),
                numbers: a.numbers.clone(),
                score: a.rank_score,
            }
        })
        .collect()
}
