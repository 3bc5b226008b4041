//! Imlink CLI
//!
//! Links the authors of an input CSV against a reference database and
//! writes the linkage and discovery artifacts next to the output path.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use imlink_core::search::run_affiliation_search;
use imlink_core::{
    KeywordTagger, LinkConfig, LinkagePipeline, LinkageStatus, MatchType, Result, RunSummary,
    SqliteReferenceStore,
};

#[derive(Parser)]
#[command(name = "imlink")]
#[command(about = "Author record linkage and affiliation-based work discovery")]
#[command(version)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Reference database (SQLite)
    #[arg(long)]
    db_file: PathBuf,

    /// Configuration file (.toml, otherwise YAML)
    #[arg(long)]
    config: PathBuf,

    /// Input CSV
    #[arg(long)]
    input_file: PathBuf,

    /// Output CSV path; artifacts are named after its stem
    #[arg(long)]
    output_file: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Link input authors and discover works at their affiliations
    Process {
        #[command(flatten)]
        args: CommonArgs,

        /// Skip organization entity extraction
        #[arg(long)]
        no_entities: bool,
    },

    /// Find reference rows for a column of affiliation names
    SearchAffiliation {
        #[command(flatten)]
        args: CommonArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Process { args, no_entities } => {
            let mut config = load_config(&args.config)?;
            if no_entities {
                config.entity_extraction_enabled = false;
            }
            let store = SqliteReferenceStore::open(&args.db_file)?;
            let tagger = KeywordTagger::new();

            let summary = LinkagePipeline::new(&store, &config)
                .with_tagger(&tagger)
                .run(&args.input_file, &args.output_file)?;
            print_summary(&summary);
        }
        Commands::SearchAffiliation { args } => {
            let config = load_config(&args.config)?;
            let store = SqliteReferenceStore::open(&args.db_file)?;
            let rows =
                run_affiliation_search(&store, &config, &args.input_file, &args.output_file)?;
            println!("{rows} rows written to {}", args.output_file.display());
        }
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<LinkConfig> {
    Ok(LinkConfig::from_path(path)?)
}

fn print_summary(summary: &RunSummary) {
    println!("Input identifiers:    {}", summary.input_ids);
    println!("Linkages:             {}", summary.linkages);
    for status in [
        LinkageStatus::OrgMatchFound,
        LinkageStatus::FirstAvailable,
        LinkageStatus::NameMatchNoOrgAffiliation,
    ] {
        println!("  {:<30} {}", status.as_str(), summary.linkage_count(status));
    }
    println!(
        "Entities:             {} candidates, {} validated",
        summary.entity_candidates, summary.validated_entities
    );
    println!("Discovered works:     {}", summary.discovered_works);
    for match_type in [MatchType::AffiliationExact, MatchType::EntityExtracted] {
        println!(
            "  {:<30} {} distinct",
            match_type.as_str(),
            summary.distinct_work_count(match_type)
        );
    }
    println!("Linkage file:         {}", summary.paths.linkage.display());
    println!("Discovered works file: {}", summary.paths.discovered_works.display());
}
