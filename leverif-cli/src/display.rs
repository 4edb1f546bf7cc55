use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::Imported;
use leverif_core::stats::format_distribution;
use leverif_core::{Analysis, ArityMismatch, Summary, Tier, VariantAnalysis};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn numbers_str(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Strong => Color::Green,
        Tier::Borderline => Color::Yellow,
        Tier::Weak => Color::Red,
    }
}

pub fn display_import_summary<T>(label: &str, imported: &Imported<T>) {
    println!("{} ({} fichier(s)) :", label, imported.files);
    println!("  Lignes retenues  : {}", imported.records.len());
    if !imported.skipped.is_empty() {
        println!("  Lignes ignorées  : {}", imported.skipped.len());
        for (path, line) in &imported.skipped {
            println!(
                "    {}:{} « {} » — {}",
                path.display(),
                line.line_no,
                line.content,
                line.reason
            );
        }
    }
}

pub fn display_arity_mismatches(mismatches: &[ArityMismatch], arity: usize) {
    if mismatches.is_empty() {
        return;
    }
    println!(
        "\n⚠ {} variante(s) écartée(s) : {} numéros distincts attendus",
        mismatches.len(),
        arity
    );
    let mut table = new_table(vec!["Ligne", "ID", "Numéros saisis", "Doublons"]);
    for m in mismatches {
        table.add_row(vec![
            Cell::new(m.index + 1),
            Cell::new(&m.id),
            Cell::new(m.found),
            Cell::new(m.duplicates).fg(if m.duplicates > 0 { Color::Red } else { Color::White }),
        ]);
    }
    println!("{table}");
}

pub fn display_summary(summary: &Summary) {
    println!("\n📊 Bilan\n");
    let mut table = new_table(vec![
        "Tirages",
        "Variantes",
        "Retenues",
        "Fortes",
        "Limites",
        "Faibles",
        "Signalées",
    ]);
    table.add_row(vec![
        Cell::new(summary.rounds),
        Cell::new(summary.variants),
        Cell::new(summary.accepted),
        Cell::new(summary.strong).fg(Color::Green),
        Cell::new(summary.borderline).fg(Color::Yellow),
        Cell::new(summary.weak).fg(Color::Red),
        Cell::new(summary.flagged),
    ]);
    println!("{table}");
}

/// Variantes FORTE et LIMITE, dans l'ordre du classement.
pub fn display_ranked(analysis: &Analysis) {
    let arity = analysis.config().arity;
    let ranked: Vec<&VariantAnalysis> = analysis
        .ranking()
        .into_iter()
        .map(|i| &analysis.variants[i])
        .filter(|v| v.tier != Tier::Weak)
        .collect();

    println!(
        "\n✅ Variantes retenues (minimum {}/{} ou palier {}/{} fréquent)\n",
        arity - 1,
        arity,
        arity - 2,
        arity
    );
    if ranked.is_empty() {
        println!("Aucune variante forte ou limite.");
        return;
    }

    let mut table = new_table(vec![
        "#", "ID", "Numéros", "Niveau", "Meilleur", "Moyenne", "Score", "Anomalies",
    ]);
    for (i, v) in ranked.iter().enumerate() {
        let anomalies = if v.anomalies.is_empty() {
            "—".to_string()
        } else {
            v.anomalies
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&v.id),
            Cell::new(numbers_str(&v.numbers)),
            Cell::new(v.tier).fg(tier_color(v.tier)),
            Cell::new(format!("{}/{}", v.stats.max, arity)),
            Cell::new(format!("{:.3}", v.stats.mean)),
            Cell::new(format!("{:.1}", v.rank_score)),
            Cell::new(anomalies).fg(if v.anomalies.is_empty() {
                Color::White
            } else {
                Color::Magenta
            }),
        ]);
    }
    println!("{table}");
}

/// Variantes FAIBLE avec leur répartition 0..arité-2.
pub fn display_weak(analysis: &Analysis) {
    let arity = analysis.config().arity;
    let weak: Vec<&VariantAnalysis> = analysis.by_tier(Tier::Weak).collect();

    println!("\n❌ Variantes faibles (max {}/{})\n", arity - 2, arity);
    if weak.is_empty() {
        println!("Aucune variante faible.");
        return;
    }

    let mut table = new_table(vec!["ID", "Numéros", "Répartition"]);
    for v in weak {
        table.add_row(vec![
            Cell::new(&v.id).fg(Color::Red),
            Cell::new(numbers_str(&v.numbers)),
            Cell::new(format_distribution(&v.stats, arity, arity - 2)),
        ]);
    }
    println!("{table}");
}
