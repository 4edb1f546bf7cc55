mod display;
mod import;
mod report;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use leverif_core::{Analysis, AnalysisConfig, Analyzer, ExportPolicy, Round, Snapshot, Variant};

use crate::display::{
    display_arity_mismatches, display_import_summary, display_ranked, display_summary,
    display_weak,
};
use crate::import::{import_rounds, import_variants};

/// Taille de matrice à partir de laquelle on affiche un spinner.
const SPINNER_CELLS: usize = 1_000_000;

#[derive(Parser)]
#[command(name = "leverif", about = "Vérification de variantes contre l'historique des tirages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct InputArgs {
    /// Fichier(s) de tirages, un tirage par ligne : 1,6,7,9,44,77
    #[arg(short, long, required = true, num_args = 1..)]
    rounds: Vec<PathBuf>,

    /// Fichier(s) de variantes, une par ligne : ID, 1 2 3 4
    #[arg(short, long, required = true, num_args = 1..)]
    variants: Vec<PathBuf>,

    /// Fichier de configuration JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Nombre de numéros par variante
    #[arg(long)]
    arity: Option<usize>,

    /// Fraction des tirages que doit dépasser le palier arité-2 (LIMITE)
    #[arg(short, long)]
    threshold: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyser les variantes et afficher le classement
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Afficher aussi les variantes faibles
        #[arg(long)]
        show_weak: bool,
    },

    /// Écrire la liste classée des variantes à jouer
    Export {
        #[command(flatten)]
        input: InputArgs,

        /// Fichier de sortie
        #[arg(short, long, default_value = "variantes_export.txt")]
        output: PathBuf,

        /// Nombre maximal de lignes exportées
        #[arg(long, conflicts_with = "no_cap")]
        cap: Option<usize>,

        /// Exporter sans plafond
        #[arg(long)]
        no_cap: bool,

        /// Exporter FORTE + LIMITE même si des anomalies sont signalées
        #[arg(long)]
        lenient: bool,
    },

    /// Écrire les statistiques de chaque variante en CSV
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Fichier CSV de sortie
        #[arg(short, long, default_value = "statistiques.csv")]
        output: PathBuf,
    },

    /// Afficher ou écrire la configuration par défaut
    Config {
        /// Fichier de sortie (sinon stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { input, show_weak } => cmd_analyze(&input, show_weak),
        Command::Export {
            input,
            output,
            cap,
            no_cap,
            lenient,
        } => {
            let overrides = Overrides {
                cap,
                no_cap,
                lenient,
                ..input.overrides()
            };
            cmd_export(&input, &overrides, &output)
        }
        Command::Report { input, output } => cmd_report(&input, &output),
        Command::Config { output } => cmd_config(output.as_deref()),
    }
}

impl InputArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            arity: self.arity,
            threshold: self.threshold,
            ..Overrides::default()
        }
    }
}

/// Options de ligne de commande qui priment sur le fichier de configuration.
#[derive(Debug, Default)]
struct Overrides {
    arity: Option<usize>,
    threshold: Option<f64>,
    cap: Option<usize>,
    no_cap: bool,
    lenient: bool,
}

impl Overrides {
    /// Applique les options puis revalide : une valeur saisie en ligne de commande
    /// est soumise aux mêmes règles qu'une valeur lue dans le fichier.
    fn apply(&self, mut config: AnalysisConfig) -> Result<AnalysisConfig> {
        if let Some(arity) = self.arity {
            config.arity = arity;
        }
        if let Some(threshold) = self.threshold {
            config.borderline_fraction = threshold;
        }
        if self.no_cap {
            config.export.cap = None;
        } else if self.cap.is_some() {
            config.export.cap = self.cap;
        }
        if self.lenient {
            config.export.policy = ExportPolicy::Lenient;
        }
        config.validate().context("Configuration invalide")?;
        Ok(config)
    }
}

fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> Result<AnalysisConfig> {
    let config = match path {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    overrides.apply(config)
}

struct Loaded {
    rounds: Vec<Round>,
    variants: Vec<Variant>,
}

fn load_input(input: &InputArgs) -> Result<Loaded> {
    let rounds = import_rounds(&input.rounds)?;
    display_import_summary("Tirages", &rounds);
    let variants = import_variants(&input.variants)?;
    display_import_summary("Variantes", &variants);

    Ok(Loaded {
        rounds: rounds.records,
        variants: variants.records,
    })
}

fn run_analysis(analyzer: &Analyzer, snapshot: &Snapshot) -> Analysis {
    let cells = snapshot.rounds.len().saturating_mul(snapshot.variants.len());

    if cells < SPINNER_CELLS {
        return analyzer.analyze(snapshot);
    }

    let pb = ProgressBar::new_spinner();
    let template = "{spinner:.green} [{elapsed_precise}] {msg}";
    if let Ok(style) = ProgressStyle::default_spinner().template(template) {
        pb.set_style(style);
    }
    pb.set_message(format!("Calcul de {} intersections...", cells));
    pb.enable_steady_tick(Duration::from_millis(100));
    let analysis = analyzer.analyze(snapshot);
    pb.finish_and_clear();
    analysis
}

/// Charge les entrées et lance l'analyse. `None` si les données sont insuffisantes.
fn prepare(input: &InputArgs, config: AnalysisConfig) -> Result<Option<Analysis>> {
    let analyzer = Analyzer::new(config).context("Configuration invalide")?;
    let loaded = load_input(input)?;

    let snapshot = Snapshot::new(&loaded.rounds, &loaded.variants);
    if snapshot.is_empty() {
        println!("\nIntroduisez des tirages et des variantes pour lancer l'analyse.");
        return Ok(None);
    }

    let analysis = run_analysis(&analyzer, &snapshot);
    display_arity_mismatches(&analysis.arity_mismatches, analysis.config().arity);
    Ok(Some(analysis))
}

fn cmd_analyze(input: &InputArgs, show_weak: bool) -> Result<()> {
    let config = resolve_config(input.config.as_deref(), &input.overrides())?;
    let Some(analysis) = prepare(input, config)? else {
        return Ok(());
    };

    display_summary(&analysis.summary());
    display_ranked(&analysis);
    if show_weak {
        display_weak(&analysis);
    }
    Ok(())
}

fn cmd_export(input: &InputArgs, overrides: &Overrides, output: &Path) -> Result<()> {
    let config = resolve_config(input.config.as_deref(), overrides)?;

    let Some(analysis) = prepare(input, config)? else {
        report::write_export(output, &[])?;
        return Ok(());
    };

    let rows = analysis.export_rows();
    report::write_export(output, &rows)?;

    let policy = match analysis.config().export.policy {
        ExportPolicy::Strict => "anomalies exclues",
        ExportPolicy::Lenient => "anomalies incluses",
    };
    println!(
        "\n{} variante(s) exportée(s) dans {} ({})",
        rows.len(),
        output.display(),
        policy
    );
    Ok(())
}

fn cmd_report(input: &InputArgs, output: &Path) -> Result<()> {
    let config = resolve_config(input.config.as_deref(), &input.overrides())?;
    let Some(analysis) = prepare(input, config)? else {
        return Ok(());
    };

    report::write_stats_csv(output, &analysis)?;
    println!(
        "\nStatistiques de {} variante(s) écrites dans {}",
        analysis.variants.len(),
        output.display()
    );
    Ok(())
}

fn cmd_config(output: Option<&Path>) -> Result<()> {
    let config = AnalysisConfig::default();
    match output {
        Some(path) => {
            config.save(path)?;
            println!("Configuration par défaut écrite dans {}", path.display());
        }
        None => {
            let json =
                serde_json::to_string_pretty(&config).context("Échec de la sérialisation")?;
            println!("{}", json);
        }
    }
    Ok(())
}
