use std::collections::BTreeSet;

use crate::config::AnomalyThresholds;
use crate::models::{Anomaly, AnomalyReport};

/// Contrôles structurels sur les numéros bruts d'une variante, indépendants des tirages.
/// Les quatre règles sont toujours toutes évaluées, dans cet ordre :
/// consécutifs, somme, parité, terminaison.
pub fn detect(numbers: &[u32], thresholds: &AnomalyThresholds) -> AnomalyReport {
    let mut report = Vec::new();
    if numbers.is_empty() {
        return report;
    }

    let pairs = consecutive_pairs(numbers);
    if pairs >= thresholds.min_consecutive_pairs {
        report.push(Anomaly::Consecutive { pairs });
    }

    let sum: u64 = numbers.iter().map(|&n| n as u64).sum();
    if sum < thresholds.sum_min || sum > thresholds.sum_max {
        report.push(Anomaly::AtypicalSum { sum });
    }

    let even = numbers.iter().filter(|&&n| n % 2 == 0).count();
    let odd = numbers.len() - even;
    let share = even.max(odd) as f64 / numbers.len() as f64;
    if share >= thresholds.parity_share {
        report.push(Anomaly::ParityImbalance { even, odd });
    }

    let distinct = numbers.iter().map(|&n| n % 10).collect::<BTreeSet<_>>().len();
    if distinct <= thresholds.max_terminal_digits {
        report.push(Anomaly::IdenticalTerminalDigit { distinct });
    }

    report
}

/// Paires adjacentes (après tri) séparées d'exactement 1. Les doublons ne comptent pas.
fn consecutive_pairs(numbers: &[u32]) -> usize {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).filter(|w| w[0].checked_add(1) == Some(w[1])).count()
}
