use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use langpack_resolver::config::{
    ResolverConfig, cache_db_path, config_path, data_dir, db_path, log_path,
};
use langpack_resolver::request::{CatalogRequest, UpdateCheckRequest};
use langpack_resolver::service::TranslationService;
use langpack_resolver::translation::cache::SqliteResultCache;
use langpack_resolver::translation::store::SqliteRecordStore;
use langpack_resolver::translation::types::{ProjectType, TranslationRecord};

#[derive(Parser)]
#[command(name = "langpack")]
#[command(version, about = "Resolve WordPress language packs and update checks")]
struct Cli {
    /// Config file (defaults to config.json in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to the log file in the data directory instead of stderr
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the translation catalog of a project
    Catalog {
        #[arg(long = "type", value_parser = parse_project_type)]
        project_type: ProjectType,
        #[arg(long, default_value = "default")]
        domain: String,
        #[arg(long)]
        version: Option<String>,
        /// Build http package URLs
        #[arg(long)]
        insecure: bool,
    },
    /// Run an update check from a JSON request ("-" reads stdin)
    Check {
        request: PathBuf,
        /// Refresh check for installed items instead of an update-paired check
        #[arg(long)]
        installed: bool,
    },
    /// Import translation records from a JSON file
    Import { file: PathBuf },
    /// Remove expired result cache entries
    PurgeCache,
}

/// Row format accepted by `import`
#[derive(Deserialize)]
struct ImportRecord {
    #[serde(rename = "type")]
    project_type: ProjectType,
    domain: String,
    #[serde(flatten)]
    record: TranslationRecord,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

fn parse_project_type(value: &str) -> Result<ProjectType, String> {
    value
        .parse()
        .map_err(|_| format!("unknown project type '{value}' (expected core, plugin or theme)"))
}

fn init_logging(log_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if !log_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    let path = log_path();
    std::fs::create_dir_all(data_dir())?;
    let file_name = path
        .file_name()
        .context("log path has no file name")?
        .to_owned();
    let appender = tracing_appender::rolling::never(data_dir(), file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

fn read_request(path: &Path) -> anyhow::Result<UpdateCheckRequest> {
    let mut content = String::new();
    if path == Path::new("-") {
        std::io::stdin().read_to_string(&mut content)?;
    } else {
        content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request {:?}", path))?;
    }
    let request: UpdateCheckRequest =
        serde_json::from_str(&content).context("invalid update check request")?;
    request.validate()?;
    Ok(request)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file)?;

    let config_file = cli.config.unwrap_or_else(config_path);
    let config = ResolverConfig::load(&config_file)?;

    match cli.command {
        Command::Catalog {
            project_type,
            domain,
            version,
            insecure,
        } => {
            let request = CatalogRequest {
                project_type,
                domain,
                version,
                secure: !insecure,
            };
            request.validate()?;
            let service = TranslationService::open(&config)?;
            let catalog = service.catalog(&request);
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }
        Command::Check { request, installed } => {
            let request = read_request(&request)?;
            let service = TranslationService::open(&config)?;
            let packs = if installed {
                service.check_installed(&request)
            } else {
                service.check_update(&request)
            };
            println!("{}", serde_json::to_string_pretty(&packs)?);
        }
        Command::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {:?}", file))?;
            let rows: Vec<ImportRecord> =
                serde_json::from_str(&content).context("invalid import file")?;

            std::fs::create_dir_all(data_dir())?;
            let store = SqliteRecordStore::open(&db_path())?;
            let imported = store.insert_records(
                rows.iter()
                    .map(|row| (row.project_type, row.domain.as_str(), &row.record, row.active)),
            )?;
            info!("Imported {} translation records", imported);
        }
        Command::PurgeCache => {
            std::fs::create_dir_all(data_dir())?;
            let cache = SqliteResultCache::open(&cache_db_path())?;
            let removed = cache.purge_expired()?;
            info!("Removed {} expired cache entries", removed);
        }
    }

    Ok(())
}
