use crate::models::VariantStats;

/// Réduit une ligne de la matrice en histogramme, maximum et moyenne.
/// Ligne vide : max = 0, moyenne = 0.0, histogramme nul.
pub fn aggregate(row: &[u32], arity: usize) -> VariantStats {
    let mut stats = VariantStats::empty(arity);
    if row.is_empty() {
        return stats;
    }

    let mut total = 0u64;
    for &score in row {
        let idx = score as usize;
        if idx >= stats.histogram.len() {
            // variante plus large que l'arité annoncée : on agrandit, aucun tirage perdu
            stats.histogram.resize(idx + 1, 0);
        }
        stats.histogram[idx] += 1;
        stats.max = stats.max.max(score);
        total += score as u64;
    }
    stats.mean = total as f64 / row.len() as f64;
    stats
}

/// Écrit "0/4: n | 1/4: n | 2/4: n" pour les paliers 0..=upto.
pub fn format_distribution(stats: &VariantStats, arity: usize, upto: usize) -> String {
    (0..=upto)
        .map(|k| format!("{}/{}: {}", k, arity, stats.count(k)))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_perfect_round() {
        let stats = aggregate(&[4], 4);
        assert_eq!(stats.max, 4);
        assert!((stats.mean - 4.0).abs() < 1e-12);
        assert_eq!(stats.histogram, vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_two_rounds_histogram() {
        let stats = aggregate(&[2, 2], 4);
        assert_eq!(stats.count(2), 2);
        assert_eq!(stats.max, 2);
        assert!((stats.mean - 2.0).abs() < 1e-12);
        assert_eq!(stats.rounds(), 2);
    }

    #[test]
    fn test_empty_row() {
        let stats = aggregate(&[], 4);
        assert_eq!(stats.max, 0);
        assert_eq!(stats.mean, 0.0);
        assert!(stats.histogram.iter().all(|&c| c == 0));
        assert_eq!(stats.histogram.len(), 5);
    }

    #[test]
    fn test_score_above_arity_is_kept() {
        let stats = aggregate(&[5, 1], 4);
        assert_eq!(stats.histogram.len(), 6);
        assert_eq!(stats.rounds(), 2);
    }

    #[test]
    fn test_format_distribution() {
        let stats = aggregate(&[0, 0, 1, 2, 3], 4);
        assert_eq!(format_distribution(&stats, 4, 2), "0/4: 2 | 1/4: 1 | 2/4: 1");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Propriété : l'histogramme conserve le nombre de tirages,
        /// et 0 ≤ moyenne ≤ max ≤ arité.
        #[test]
        fn test_histogram_conservation(row in prop::collection::vec(0u32..=4, 0..200)) {
            let stats = aggregate(&row, 4);
            prop_assert_eq!(stats.rounds() as usize, row.len());
            prop_assert_eq!(stats.histogram.len(), 5);
            if !row.is_empty() {
                prop_assert!(stats.mean >= 0.0);
                prop_assert!(stats.mean <= stats.max as f64 + 1e-9);
                prop_assert!(stats.max <= 4);
            }
        }
    }
}
