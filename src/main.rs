//! gitschema command-line interface.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gitschema::config::{ImportConfig, SchemaConfig, DEFAULT_MYSQL_PORT, DEFAULT_SCHEMA_ROOT};
use gitschema::ddl::{dump_revision, write_statements, SnapshotDiffer};
use gitschema::import::{MySqlCatalog, SchemaImporter};

/// Database schemas versioned as git trees.
#[derive(Parser)]
#[command(name = "gitschema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository to operate on (searched upwards).
    #[arg(short = 'C', long = "repo", global = true, default_value = ".")]
    repo: PathBuf,

    /// Tree path holding the tables.
    #[arg(long, global = true, default_value = DEFAULT_SCHEMA_ROOT)]
    root: String,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a snapshot as CREATE TABLE statements.
    Show {
        /// Revision, or `rev:path` for an explicit tables tree.
        #[arg(default_value = "HEAD")]
        revision: String,

        /// Only show these tables.
        tables: Vec<String>,
    },

    /// Print the statements that turn one snapshot into another.
    Diff {
        from: String,

        #[arg(default_value = "HEAD")]
        to: String,
    },

    /// Import a live MySQL schema as a new commit on HEAD.
    Import {
        #[arg(long)]
        host: String,

        #[arg(long, default_value_t = DEFAULT_MYSQL_PORT)]
        port: u16,

        #[arg(long)]
        user: String,

        #[arg(long, env = "MYSQL_PWD", hide_env_values = true)]
        password: Option<String>,

        #[arg(long)]
        dbname: String,

        /// Commit message.
        #[arg(short, long)]
        message: Option<String>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SchemaConfig::new(&cli.repo).schema_root(cli.root);
    let repo = config
        .open()
        .with_context(|| format!("opening repository at {}", cli.repo.display()))?;
    debug!(path = %repo.path().display(), root = %config.schema_root, "opened repository");

    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Show { revision, tables } => {
            let statements = dump_revision(&repo, &revision, &config.schema_root, &tables)
                .with_context(|| format!("no valid table schema found at {}", revision))?;
            write_statements(&mut stdout, &statements)?;
        }

        Commands::Diff { from, to } => {
            let statements = SnapshotDiffer::new(&repo, config.schema_root.as_str())
                .diff(&from, &to)
                .with_context(|| format!("diffing {} against {}", from, to))?;
            write_statements(&mut stdout, &statements)?;
        }

        Commands::Import {
            host,
            port,
            user,
            password,
            dbname,
            message,
        } => {
            let import = ImportConfig::new(host, user, dbname)
                .port(port)
                .password(password);
            import.validate()?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("starting async runtime")?;
            let snapshot = runtime.block_on(async {
                let catalog = MySqlCatalog::connect(&import).await?;
                let snapshot = catalog.snapshot(&import.dbname).await;
                catalog.close().await;
                snapshot
            })?;

            let commit = SchemaImporter::new(&repo, config.schema_root.as_str())
                .import(&snapshot, message.as_deref())?;
            writeln!(stdout, "{}", commit)?;
        }
    }

    Ok(())
}
