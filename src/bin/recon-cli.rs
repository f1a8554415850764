#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use skud_tabell_recon::comparator;
use skud_tabell_recon::detector::{self, DetectorWindows};
use skud_tabell_recon::error::ReconError;
use skud_tabell_recon::skud;
use skud_tabell_recon::tabell::{self, LocalFileTabellSource};
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de rapprochement tabell / SKUD (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs détaillés (niveau debug)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare un export SKUD (XLSX) à un tabell (CSV) sur une plage de dates
    Compare {
        /// Export de pointages SKUD, format XLSX
        #[arg(long)]
        xlsx: String,

        /// Export tabell, format CSV
        #[arg(long)]
        tabell_csv: String,

        /// Début de la plage, YYYY-MM-DD
        #[arg(long)]
        from: String,

        /// Fin de la plage, YYYY-MM-DD (incluse)
        #[arg(long)]
        to: String,

        /// Fichier de sortie JSON (par défaut: stdout)
        #[arg(long)]
        out: Option<String>,
    },

    /// Liste les projets distincts présents dans un tabell
    ListProjects {
        #[arg(long)]
        tabell_csv: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.log {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = Subscriber::builder().with_env_filter(filter).try_init();

    let code = match cli.cmd {
        Commands::Compare { xlsx, tabell_csv, from, to, out } => {
            match run_compare(&xlsx, &tabell_csv, &from, &to, out.as_deref()) {
                Ok(()) => 0,
                Err(e) => report_error(e),
            }
        }
        Commands::ListProjects { tabell_csv } => match run_list_projects(&tabell_csv) {
            Ok(()) => 0,
            Err(e) => report_error(e),
        },
    };

    std::process::exit(code);
}

fn run_compare(xlsx: &str, tabell_csv: &str, from: &str, to: &str, out: Option<&str>) -> Result<(), ReconError> {
    let date_from = parse_date(from).map_err(|e| ReconError::BadInput(e.to_string()))?;
    let date_to = parse_date(to).map_err(|e| ReconError::BadInput(e.to_string()))?;
    if date_from > date_to {
        return Err(ReconError::BadInput(format!("--from ({date_from}) is after --to ({date_to})")));
    }

    let source = LocalFileTabellSource::new(tabell_csv);
    let tabell_entries = tabell::fetch_tabell(&source, date_from, date_to)?;
    let punches = skud::parse_skud_xlsx(xlsx, date_from, date_to)?;
    let windows = DetectorWindows::default();
    let (shifts_by_employee, broken_shifts) = detector::detect_all_shifts(&punches, date_from, date_to, &windows);
    let result = comparator::compare(&shifts_by_employee, &broken_shifts, &tabell_entries, date_from, date_to);

    let json = serde_json::to_string_pretty(&result).map_err(|e| ReconError::Other(e.into()))?;
    match out {
        Some(path) => {
            std::fs::write(path, &json).map_err(|e| ReconError::Other(anyhow::anyhow!("writing {path}: {e}")))?;
            println!(
                "Wrote comparison for {} employee(s), {} broken shift(s), to {}",
                result.summary.total_employees_tabell, result.summary.broken_count, path
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_list_projects(tabell_csv: &str) -> Result<(), ReconError> {
    let source = LocalFileTabellSource::new(tabell_csv);
    let projects = tabell::fetch_projects(&source)?;
    for p in projects {
        println!("{p}");
    }
    Ok(())
}

/// Prints the error to stderr and returns the CLI's exit code convention
/// for it (0 ok, 2 bad input, else 1).
fn report_error(e: ReconError) -> i32 {
    eprintln!("error: {e}");
    e.exit_code()
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {value}"))
}
