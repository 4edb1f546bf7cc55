use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use leverif_core::parse::{parse_rounds, parse_variants, ParseReport, SkippedLine};
use leverif_core::{Round, Variant};

/// Enregistrements lus depuis un ou plusieurs fichiers, ajoutés à la suite.
pub struct Imported<T> {
    pub records: Vec<T>,
    pub skipped: Vec<(PathBuf, SkippedLine)>,
    pub files: usize,
}

fn import_files<T>(paths: &[PathBuf], parse: fn(&str) -> ParseReport<T>) -> Result<Imported<T>> {
    let mut imported = Imported {
        records: Vec::new(),
        skipped: Vec::new(),
        files: 0,
    };

    for path in paths {
        let text = read_text(path)?;
        let report = parse(&text);
        debug!(
            file = %path.display(),
            records = report.records.len(),
            skipped = report.skipped.len(),
            "fichier lu"
        );
        imported.records.extend(report.records);
        imported
            .skipped
            .extend(report.skipped.into_iter().map(|s| (path.clone(), s)));
        imported.files += 1;
    }

    Ok(imported)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Impossible de lire {:?}", path))
}

pub fn import_rounds(paths: &[PathBuf]) -> Result<Imported<Round>> {
    import_files(paths, parse_rounds)
}

pub fn import_variants(paths: &[PathBuf]) -> Result<Imported<Variant>> {
    import_files(paths, parse_variants)
}
