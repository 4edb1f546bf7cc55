use std::path::Path;

use anyhow::{Context, Result};

use leverif_core::{Analysis, ExportRow};

/// "<identifiant>, <numéros séparés par des espaces>"
pub fn format_export_line(row: &ExportRow) -> String {
    let numbers = row
        .numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}, {}", row.id, numbers)
}

/// Une ligne par variante, terminée par '\n', sans en-tête.
pub fn render_export(rows: &[ExportRow]) -> String {
    rows.iter().map(|row| format_export_line(row) + "\n").collect()
}

pub fn write_export(path: &Path, rows: &[ExportRow]) -> Result<()> {
    std::fs::write(path, render_export(rows))
        .with_context(|| format!("Impossible d'écrire l'export {:?}", path))
}

/// Statistiques détaillées de chaque variante retenue, dans l'ordre du classement.
pub fn write_stats_csv(path: &Path, analysis: &Analysis) -> Result<()> {
    let arity = analysis.config().arity;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Impossible de créer {:?}", path))?;

    let mut header = vec![
        "id".to_string(),
        "numbers".to_string(),
        "tier".to_string(),
        "best".to_string(),
        "mean".to_string(),
        "rank_score".to_string(),
    ];
    header.extend((0..=arity).map(|k| format!("hits_{}", k)));
    header.push("anomalies".to_string());
    writer.write_record(&header)?;

    for idx in analysis.ranking() {
        let v = &analysis.variants[idx];
        let numbers = v
            .numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let anomalies = v
            .anomalies
            .iter()
            .map(|a| a.label())
            .collect::<Vec<_>>()
            .join(";");

        let mut record = vec![
            v.id.clone(),
            numbers,
            v.tier.to_string(),
            format!("{}/{}", v.stats.max, arity),
            format!("{:.4}", v.stats.mean),
            format!("{}", v.rank_score),
        ];
        record.extend((0..=arity).map(|k| v.stats.count(k).to_string()));
        record.push(anomalies);
        writer.write_record(&record)?;
    }

    writer.flush().context("Échec de l'écriture CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leverif_core::{AnalysisConfig, Analyzer, Round, Snapshot, Variant};

    fn row(id: &str, numbers: &[u32], score: f64) -> ExportRow {
        ExportRow {
            id: id.to_string(),
            numbers: numbers.to_vec(),
            score,
        }
    }

    #[test]
    fn test_format_export_line() {
        assert_eq!(format_export_line(&row("A1", &[4, 8, 15, 16], 9.0)), "A1, 4 8 15 16");
    }

    #[test]
    fn test_render_export_no_header() {
        let rows = vec![row("A", &[1, 2, 3, 4], 50.0), row("B", &[9, 8, 7, 6], 8.0)];
        assert_eq!(render_export(&rows), "A, 1 2 3 4\nB, 9 8 7 6\n");
        assert_eq!(render_export(&[]), "");
    }

    #[test]
    fn test_write_export_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("export1.txt");
        let second = dir.path().join("export2.txt");
        let rows = vec![row("A", &[7, 18, 33, 44], 50.0)];
        write_export(&first, &rows).unwrap();
        write_export(&second, &rows).unwrap();
        assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "A, 7 18 33 44\n");
    }

    #[test]
    fn test_write_stats_csv() {
        let rounds = vec![Round::new(&[7, 18, 33, 44]), Round::new(&[1, 2, 3, 4])];
        let variants = vec![
            Variant::new("weak", vec![1, 9, 20, 30]),
            Variant::new("strong", vec![7, 18, 33, 45]),
        ];
        let analysis = Analyzer::new(AnalysisConfig::default())
            .unwrap()
            .analyze(&Snapshot::new(&rounds, &variants));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        write_stats_csv(&path, &analysis).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "id,numbers,tier,best,mean,rank_score,hits_0,hits_1,hits_2,hits_3,hits_4,anomalies"
        );
        assert_eq!(lines[1], "strong,7 18 33 45,FORTE,3/4,1.5000,8,1,0,0,1,0,");
        assert!(lines[2].starts_with("weak,1 9 20 30,FAIBLE,1/4,0.5000,0,1,1,0,0,0,"));
    }
}
