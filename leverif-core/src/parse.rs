use std::fmt;

use crate::models::{Round, Variant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    InvalidToken(String),
    NonPositive,
    MissingComma,
    EmptyIdentifier,
    NoNumbers,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidToken(token) => write!(f, "valeur non numérique '{}'", token),
            SkipReason::NonPositive => write!(f, "numéro nul"),
            SkipReason::MissingComma => write!(f, "virgule manquante après l'identifiant"),
            SkipReason::EmptyIdentifier => write!(f, "identifiant vide"),
            SkipReason::NoNumbers => write!(f, "aucun numéro"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome<T> {
    Parsed(T),
    Blank,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// Numéro de ligne, à partir de 1.
    pub line_no: usize,
    pub content: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedLine>,
}

impl<T> Default for ParseReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> ParseReport<T> {
    /// Ajoute un autre rapport à la suite (plusieurs fichiers d'entrée).
    pub fn extend(&mut self, other: ParseReport<T>) {
        self.records.extend(other.records);
        self.skipped.extend(other.skipped);
    }
}

fn parse_numbers<'a>(tokens: impl Iterator<Item = &'a str>) -> Result<Vec<u32>, SkipReason> {
    let mut numbers = Vec::new();
    for token in tokens.filter(|t| !t.is_empty()) {
        let n: u32 = token
            .parse()
            .map_err(|_| SkipReason::InvalidToken(token.to_string()))?;
        if n == 0 {
            return Err(SkipReason::NonPositive);
        }
        numbers.push(n);
    }
    if numbers.is_empty() {
        return Err(SkipReason::NoNumbers);
    }
    Ok(numbers)
}

/// Un tirage par ligne, numéros séparés par des virgules ou des espaces : "1,6,7,9,44,77".
pub fn parse_round_line(line: &str) -> LineOutcome<Round> {
    let line = line.trim();
    if line.is_empty() {
        return LineOutcome::Blank;
    }
    let tokens = line.split(|c: char| c == ',' || c.is_whitespace());
    match parse_numbers(tokens) {
        Ok(numbers) => LineOutcome::Parsed(Round::new(&numbers)),
        Err(reason) => LineOutcome::Skipped(reason),
    }
}

/// Une variante par ligne : "ID, 1 2 3 4". Seule la première virgule sépare l'identifiant.
pub fn parse_variant_line(line: &str) -> LineOutcome<Variant> {
    let line = line.trim();
    if line.is_empty() {
        return LineOutcome::Blank;
    }
    let Some((id, rest)) = line.split_once(',') else {
        return LineOutcome::Skipped(SkipReason::MissingComma);
    };
    let id = id.trim();
    if id.is_empty() {
        return LineOutcome::Skipped(SkipReason::EmptyIdentifier);
    }
    match parse_numbers(rest.split_whitespace()) {
        Ok(numbers) => LineOutcome::Parsed(Variant::new(id, numbers)),
        Err(reason) => LineOutcome::Skipped(reason),
    }
}

fn parse_lines<T>(text: &str, parse_line: impl Fn(&str) -> LineOutcome<T>) -> ParseReport<T> {
    let mut report = ParseReport::default();
    for (i, line) in text.lines().enumerate() {
        match parse_line(line) {
            LineOutcome::Parsed(record) => report.records.push(record),
            LineOutcome::Blank => {}
            LineOutcome::Skipped(reason) => report.skipped.push(SkippedLine {
                line_no: i + 1,
                content: line.trim().to_string(),
                reason,
            }),
        }
    }
    report
}

pub fn parse_rounds(text: &str) -> ParseReport<Round> {
    parse_lines(text, parse_round_line)
}

pub fn parse_variants(text: &str) -> ParseReport<Variant> {
    parse_lines(text, parse_variant_line)
}
