use std::fmt;

use serde::{Deserialize, Serialize};

/// Ensemble de numéros triés et dédupliqués : la forme utilisée pour les intersections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberSet(Vec<u32>);

impl NumberSet {
    pub fn from_numbers(numbers: &[u32]) -> Self {
        let mut sorted = numbers.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        Self(sorted)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn max(&self) -> Option<u32> {
        self.0.last().copied()
    }

    pub fn contains(&self, n: u32) -> bool {
        self.0.binary_search(&n).is_ok()
    }

    /// Cardinal de l'intersection, par fusion des deux listes triées.
    pub fn intersection_len(&self, other: &NumberSet) -> usize {
        let (a, b) = (&self.0, &other.0);
        let (mut i, mut j, mut count) = (0, 0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    count += 1;
                    i += 1;
                    j += 1;
                }
            }
        }
        count
    }
}

/// Un tirage historique. Les doublons sont absorbés par le `NumberSet`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    numbers: NumberSet,
}

impl Round {
    pub fn new(numbers: &[u32]) -> Self {
        Self {
            numbers: NumberSet::from_numbers(numbers),
        }
    }

    pub fn numbers(&self) -> &NumberSet {
        &self.numbers
    }
}

/// Une variante candidate. `numbers` garde la saisie brute (ordre conservé pour l'export).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    id: String,
    numbers: Vec<u32>,
    set: NumberSet,
}

impl Variant {
    pub fn new(id: impl Into<String>, numbers: Vec<u32>) -> Self {
        let set = NumberSet::from_numbers(&numbers);
        Self {
            id: id.into(),
            numbers,
            set,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn numbers(&self) -> &[u32] {
        &self.numbers
    }

    pub fn set(&self) -> &NumberSet {
        &self.set
    }

    /// Nombre de numéros distincts.
    pub fn arity(&self) -> usize {
        self.set.len()
    }
}

/// Instantané immuable transmis au pipeline. L'appelant possède les collections.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub rounds: &'a [Round],
    pub variants: &'a [Variant],
}

impl<'a> Snapshot<'a> {
    pub fn new(rounds: &'a [Round], variants: &'a [Variant]) -> Self {
        Self { rounds, variants }
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty() || self.variants.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantStats {
    /// histogram[k] = nombre de tirages avec exactement k numéros communs.
    pub histogram: Vec<u32>,
    pub max: u32,
    pub mean: f64,
}

impl VariantStats {
    pub fn empty(arity: usize) -> Self {
        Self {
            histogram: vec![0; arity + 1],
            max: 0,
            mean: 0.0,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.histogram.iter().sum()
    }

    pub fn count(&self, matches: usize) -> u32 {
        self.histogram.get(matches).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Strong,
    Borderline,
    Weak,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Strong => write!(f, "FORTE"),
            Tier::Borderline => write!(f, "LIMITE"),
            Tier::Weak => write!(f, "FAIBLE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// Nombre de paires adjacentes (après tri) séparées d'exactement 1.
    Consecutive { pairs: usize },
    AtypicalSum { sum: u64 },
    ParityImbalance { even: usize, odd: usize },
    IdenticalTerminalDigit { distinct: usize },
}

impl Anomaly {
    /// Identifiant stable, utilisé dans les exports CSV.
    pub fn label(&self) -> &'static str {
        match self {
            Anomaly::Consecutive { .. } => "consecutive",
            Anomaly::AtypicalSum { .. } => "atypical-sum",
            Anomaly::ParityImbalance { .. } => "parity-imbalance",
            Anomaly::IdenticalTerminalDigit { .. } => "identical-terminal-digit",
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::Consecutive { pairs } => write!(f, "consécutifs ({} paires)", pairs),
            Anomaly::AtypicalSum { sum } => write!(f, "somme atypique ({})", sum),
            Anomaly::ParityImbalance { even, odd } => {
                write!(f, "déséquilibre pair/impair ({}P/{}I)", even, odd)
            }
            Anomaly::IdenticalTerminalDigit { .. } => write!(f, "terminaison identique"),
        }
    }
}

/// Anomalies déclenchées, dans l'ordre d'évaluation des règles.
pub type AnomalyReport = Vec<Anomaly>;

/// Résultat complet pour une variante retenue.
#[derive(Debug, Clone)]
pub struct VariantAnalysis {
    pub id: String,
    pub numbers: Vec<u32>,
    pub stats: VariantStats,
    pub anomalies: AnomalyReport,
    pub tier: Tier,
    pub rank_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub id: String,
    pub numbers: Vec<u32>,
    pub score: f64,
}
