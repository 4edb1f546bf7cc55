use crate::config::RankWeights;
use crate::models::{Tier, VariantStats};

/// FORTE si la variante a touché au moins arité-1 une fois ;
/// LIMITE si le palier arité-2 dépasse `fraction × rounds` ; FAIBLE sinon.
/// Sans tirage le seuil LIMITE n'est pas défini : on tombe sur FAIBLE.
pub fn classify(stats: &VariantStats, arity: usize, rounds: usize, fraction: f64) -> Tier {
    if arity > 0 && stats.max as usize >= arity - 1 {
        return Tier::Strong;
    }
    if rounds == 0 || arity < 2 {
        return Tier::Weak;
    }
    let near_miss = stats.count(arity - 2) as f64;
    if near_miss > fraction * rounds as f64 {
        Tier::Borderline
    } else {
        Tier::Weak
    }
}

pub fn rank_score(stats: &VariantStats, arity: usize, weights: &RankWeights) -> f64 {
    stats
        .histogram
        .iter()
        .enumerate()
        .map(|(k, &count)| weights.weight(k, arity) * count as f64)
        .sum()
}

/// Indices triés par score décroissant. Le tri est stable : à score égal,
/// la variante vue en premier reste devant.
pub fn rank_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Propriété : relancer le classement sur la même entrée donne le même ordre.
        #[test]
        fn test_rank_order_reproducible(scores in prop::collection::vec(0u8..6, 0..40)) {
            let scores: Vec<f64> = scores.into_iter().map(f64::from).collect();
            let first = rank_order(&scores);
            prop_assert_eq!(&first, &rank_order(&scores));
            for w in first.windows(2) {
                let (a, b) = (w[0], w[1]);
                prop_assert!(scores[a] > scores[b] || (scores[a] == scores[b] && a < b));
            }
        }
    }
}
