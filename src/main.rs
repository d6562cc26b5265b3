use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use lincoln_importer::config::{DatabaseConfig, Settings};
use lincoln_importer::logging;
use lincoln_importer::records::DatasetKind;
use lincoln_importer::storage::{PostgresStore, RecordStore, SchemaMode, SqliteStore};
use lincoln_importer::{ImportSummary, Importer};

#[derive(Parser)]
#[command(name = "lincoln-importer")]
#[command(about = "Import Lincoln Institution student and Civil War orphan records")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the boarding-school students file
    Students(RunArgs),
    /// Import the Civil War orphans file
    Orphans(RunArgs),
    /// Resolve columns and report data quality without writing anything
    Inspect {
        #[arg(long, value_enum)]
        dataset: DatasetKind,
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print the mapping and report as JSON
        #[arg(long)]
        json: bool,
        #[arg(long)]
        convention: Option<String>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Source file (CSV or spreadsheet); defaults to the dataset's usual location
    #[arg(long)]
    file: Option<PathBuf>,
    /// Drop and recreate the target table before loading
    #[arg(long)]
    recreate: bool,
    /// Header convention to use instead of detecting one
    #[arg(long)]
    convention: Option<String>,
    /// Write to this SQLite database instead of PostgreSQL
    #[arg(long)]
    sqlite: Option<PathBuf>,
}

fn run_import(kind: DatasetKind, args: RunArgs, settings: &Settings) -> anyhow::Result<ImportSummary> {
    let span = tracing::info_span!("import", dataset = %kind);
    let file = args.file.unwrap_or_else(|| PathBuf::from(kind.default_file()));
    let mode = if args.recreate {
        SchemaMode::Recreate
    } else {
        settings.schema_mode
    };

    let mut store: Box<dyn RecordStore> = match args.sqlite {
        Some(path) => Box::new(SqliteStore::open(path, span.clone())?),
        None => {
            let db = DatabaseConfig::from_env()?;
            Box::new(PostgresStore::connect(&db, span.clone())?)
        }
    };

    let importer = Importer::new(settings.reference_year, span).with_convention(args.convention);
    Ok(importer.run_dataset(kind, &file, store.as_mut(), mode)?)
}

fn print_summary(summary: &ImportSummary) {
    println!("\n✅ Import of {} finished", summary.dataset);
    println!("   File: {}", summary.file.display());
    println!("   Column format: {}", summary.convention);
    println!("   Rows read: {}", summary.rows_read);
    println!("   Imported: {} ({})", summary.imported, summary.backend);
    println!("   Skipped: {}", summary.skipped);
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    logging::init_logging(&settings.log_dir);

    let result = match cli.command {
        Commands::Students(args) => run_import(DatasetKind::Students, args, &settings).map(|s| print_summary(&s)),
        Commands::Orphans(args) => run_import(DatasetKind::Orphans, args, &settings).map(|s| print_summary(&s)),
        Commands::Inspect {
            dataset,
            file,
            json,
            convention,
        } => {
            let file = file.unwrap_or_else(|| PathBuf::from(dataset.default_file()));
            let span = tracing::info_span!("inspect", dataset = %dataset);
            Importer::new(settings.reference_year, span)
                .with_convention(convention)
                .inspect(dataset, &file)
                .map_err(anyhow::Error::from)
                .and_then(|inspection| {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&inspection)?);
                    } else {
                        println!("Column format: {}", inspection.mapping.convention);
                        for (field, label) in &inspection.mapping.fields {
                            println!("   {:<30} <- {}", field, label.as_deref().unwrap_or("(missing)"));
                        }
                        if !inspection.mapping.dropped.is_empty() {
                            println!("   dropped: {}", inspection.mapping.dropped.join(", "));
                        }
                        println!();
                        print!("{}", inspection.report);
                    }
                    Ok(())
                })
        }
    };

    match result {
        Ok(()) => info!("Done"),
        Err(e) => {
            error!("Import failed: {:#}", e);
            eprintln!("\n❌ Import failed: {e:#}");
            std::process::exit(1);
        }
    }
}
