use tracing::debug;

use crate::models::{NumberSet, Round, Variant};

/// Au-delà, les bitsets deviennent trop larges : on repasse à la fusion de listes triées.
pub const BITSET_LIMIT: u32 = 4096;

/// Matrice V×R des intersections, stockée ligne par ligne (une ligne par variante).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchMatrix {
    n_variants: usize,
    n_rounds: usize,
    cells: Vec<u32>,
}

impl MatchMatrix {
    pub fn n_variants(&self) -> usize {
        self.n_variants
    }

    pub fn n_rounds(&self) -> usize {
        self.n_rounds
    }

    /// Vrai dès qu'il manque des tirages ou des variantes.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, variant: usize, round: usize) -> u32 {
        self.row(variant)[round]
    }

    /// Ligne d'une variante. Vide quand il n'y a aucun tirage.
    pub fn row(&self, variant: usize) -> &[u32] {
        let start = variant * self.n_rounds;
        &self.cells[start..start + self.n_rounds]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        (0..self.n_variants).map(move |v| self.row(v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    Bitset { words: usize },
    SortedMerge,
}

impl Strategy {
    fn choose(rounds: &[&NumberSet], variants: &[&NumberSet]) -> Self {
        let max = rounds
            .iter()
            .chain(variants.iter())
            .filter_map(|s| s.max())
            .max()
            .unwrap_or(0);
        if max <= BITSET_LIMIT {
            Strategy::Bitset {
                words: max as usize / 64 + 1,
            }
        } else {
            Strategy::SortedMerge
        }
    }
}

pub fn build_matrix(rounds: &[Round], variants: &[Variant]) -> MatchMatrix {
    let round_sets: Vec<&NumberSet> = rounds.iter().map(Round::numbers).collect();
    let variant_sets: Vec<&NumberSet> = variants.iter().map(Variant::set).collect();
    build_matrix_from_sets(&round_sets, &variant_sets)
}

/// Cellule (v, r) = |variants[v] ∩ rounds[r]|.
/// Si l'une des deux collections est vide, aucune intersection n'est calculée.
pub fn build_matrix_from_sets(rounds: &[&NumberSet], variants: &[&NumberSet]) -> MatchMatrix {
    if rounds.is_empty() || variants.is_empty() {
        return MatchMatrix {
            n_variants: variants.len(),
            n_rounds: rounds.len(),
            cells: Vec::new(),
        };
    }

    let strategy = Strategy::choose(rounds, variants);
    debug!(
        variants = variants.len(),
        rounds = rounds.len(),
        ?strategy,
        "construction de la matrice"
    );
    build_with(strategy, rounds, variants)
}

pub(crate) fn build_with(
    strategy: Strategy,
    rounds: &[&NumberSet],
    variants: &[&NumberSet],
) -> MatchMatrix {
    let mut cells = Vec::with_capacity(variants.len() * rounds.len());

    match strategy {
        Strategy::Bitset { words } => {
            // Un bitset par tirage, puis test d'appartenance des numéros de la variante.
            let mut bits = vec![0u64; rounds.len() * words];
            for (r, set) in rounds.iter().enumerate() {
                let row = &mut bits[r * words..(r + 1) * words];
                for &n in set.as_slice() {
                    row[n as usize / 64] |= 1u64 << (n % 64);
                }
            }
            for set in variants {
                for r in 0..rounds.len() {
                    let row = &bits[r * words..(r + 1) * words];
                    let hits = set
                        .as_slice()
                        .iter()
                        .filter(|&&n| row[n as usize / 64] & (1u64 << (n % 64)) != 0)
                        .count();
                    cells.push(hits as u32);
                }
            }
        }
        Strategy::SortedMerge => {
            for set in variants {
                for round in rounds {
                    cells.push(set.intersection_len(round) as u32);
                }
            }
        }
    }

    MatchMatrix {
        n_variants: variants.len(),
        n_rounds: rounds.len(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_full_match() {
        let rounds = vec![Round::new(&[1, 2, 3, 4])];
        let variants = vec![Variant::new("A1", vec![1, 2, 3, 4])];
        let m = build_matrix(&rounds, &variants);
        assert_eq!(m.n_variants(), 1);
        assert_eq!(m.n_rounds(), 1);
        assert_eq!(m.row(0), &[4]);
    }

    #[test]
    fn test_two_rounds() {
        let rounds = vec![Round::new(&[1, 2, 3, 4]), Round::new(&[5, 6, 7, 8])];
        let variants = vec![Variant::new("B1", vec![1, 2, 5, 6])];
        let m = build_matrix(&rounds, &variants);
        assert_eq!(m.row(0), &[2, 2]);
        assert_eq!(m.get(0, 1), 2);
    }

    #[test]
    fn test_empty_rounds_keeps_variant_rows() {
        let variants = vec![
            Variant::new("A", vec![1, 2, 3, 4]),
            Variant::new("B", vec![5, 6, 7, 8]),
        ];
        let m = build_matrix(&[], &variants);
        assert!(m.is_empty());
        assert_eq!(m.n_variants(), 2);
        assert!(m.row(1).is_empty());
        assert_eq!(m.rows().count(), 2);
    }

    #[test]
    fn test_empty_variants() {
        let rounds = vec![Round::new(&[1, 2, 3])];
        let m = build_matrix(&rounds, &[]);
        assert!(m.is_empty());
        assert_eq!(m.rows().count(), 0);
    }

    #[test]
    fn test_large_numbers_use_merge() {
        let rounds = vec![Round::new(&[10_000, 20_000, 3])];
        let variants = vec![Variant::new("X", vec![3, 20_000, 7, 8])];
        let round_sets: Vec<&NumberSet> = rounds.iter().map(Round::numbers).collect();
        let variant_sets: Vec<&NumberSet> = variants.iter().map(Variant::set).collect();
        assert_eq!(Strategy::choose(&round_sets, &variant_sets), Strategy::SortedMerge);
        assert_eq!(build_matrix(&rounds, &variants).row(0), &[2]);
    }

    #[test]
    fn test_bitset_word_boundaries() {
        let rounds = vec![Round::new(&[63, 64, 127, 128])];
        let variants = vec![Variant::new("W", vec![63, 64, 128, 200])];
        let m = build_matrix(&rounds, &variants);
        assert_eq!(m.row(0), &[3]);
    }
}
