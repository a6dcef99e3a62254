//! Vanity import server.
//!
//! Answers `go get` style requests for custom import paths with the
//! `go-import`/`go-source` meta tags pointing at the real repository.
//!
//! # Architecture Overview
//!
//! ```text
//!   startup                                   per request
//!   ───────                                   ───────────
//!   --redirects (URL or path)                 GET /{project}[/...]
//!        │                                          │
//!        ▼                                          ▼
//!   config::source (fetch bytes)              http::server (axum)
//!        │                                          │
//!        ▼                                          ▼
//!   config::loader + validation  ──────▶  routing::PathResolver::find
//!   (VanityConfig)                                  │
//!                                                   ▼
//!                                             http::pages (askama)
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use vanity_import::config::{load_from_source, load_settings, ServerSettings};
use vanity_import::lifecycle::{startup, Shutdown};
use vanity_import::observability::logging::init_logging;
use vanity_import::routing::{PathResolver, VcsKind};

#[derive(Parser)]
#[command(name = "vanity-import")]
#[command(about = "Handles vanity import redirect requests", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve redirect requests (default)
    Serve(ServeArgs),
    /// Validate a redirect document and list its import paths
    Check(DocumentArgs),
    /// Resolve one request path against a redirect document
    Resolve {
        #[command(flatten)]
        document: DocumentArgs,

        /// Request path, e.g. /myproject/subpkg
        path: String,

        /// Print the match as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the version
    Version,
}

#[derive(Args, Clone, Default)]
struct ServeArgs {
    /// Settings file (TOML)
    #[arg(short, long, env = "VANITY_CONFIG")]
    config: Option<PathBuf>,

    /// Remote URL or local path to the vanity redirects document
    #[arg(short, long, env = "VANITY_REDIRECTS")]
    redirects: Option<String>,

    /// host:port for the http server
    #[arg(short = 'a', long, env = "VANITY_HTTP_ADDRESS")]
    http_address: Option<String>,

    /// Print detailed logs
    #[arg(short, long, env = "VANITY_DEBUG")]
    debug: bool,

    /// Number of path segments accepted after the project segment
    #[arg(short = 'n', long, env = "VANITY_NO_OF_SUBPATHS")]
    no_of_subpaths: Option<usize>,
}

#[derive(Args, Clone)]
struct DocumentArgs {
    /// Remote URL or local path to the vanity redirects document
    #[arg(short, long, env = "VANITY_REDIRECTS")]
    redirects: String,

    /// Timeout for fetching a remote document, in seconds
    #[arg(long, default_value_t = 10)]
    fetch_timeout: u64,
}

#[derive(Serialize)]
struct ResolveOutput<'a> {
    import: &'a str,
    subpath: &'a str,
    repo: &'a str,
    vcs: VcsKind,
    display: &'a str,
}

impl ServeArgs {
    /// Settings file first, then flags on top.
    fn into_settings(self) -> Result<ServerSettings, Box<dyn std::error::Error>> {
        let mut settings = match &self.config {
            Some(path) => load_settings(path)?,
            None => ServerSettings::default(),
        };
        if let Some(redirects) = self.redirects {
            settings.redirects = redirects;
        }
        if let Some(address) = self.http_address {
            settings.listener.bind_address = address;
        }
        if let Some(depth) = self.no_of_subpaths {
            settings.subpath_depth = depth;
        }
        if self.debug {
            settings.observability.log_level = "debug".to_string();
        }
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve(cli.serve)) {
        Commands::Serve(args) => serve(args).await,
        Commands::Check(document) => check(document).await,
        Commands::Resolve {
            document,
            path,
            json,
        } => resolve(document, &path, json).await,
        Commands::Version => {
            println!("vanity-import {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = args.into_settings()?;
    init_logging(&settings.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        redirects = %settings.redirects,
        bind_address = %settings.listener.bind_address,
        subpath_depth = settings.subpath_depth,
        "vanity-import starting"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    if let Err(e) = startup::run(settings, &shutdown).await {
        tracing::error!(error = %e, "Startup failed");
        return Err(e.into());
    }
    Ok(())
}

async fn check(document: DocumentArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging("warn");
    let config = load_from_source(&document.redirects, Duration::from_secs(document.fetch_timeout)).await?;

    println!("host: {}", config.host.as_deref().unwrap_or("<request host>"));
    println!("cache-control: {}", config.cache_control());
    let resolver = PathResolver::new(config.entries);
    for entry in resolver.entries() {
        println!("{} {} {}", entry.path(), entry.vcs(), entry.repository());
    }
    Ok(())
}

async fn resolve(document: DocumentArgs, path: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    init_logging("warn");
    let config = load_from_source(&document.redirects, Duration::from_secs(document.fetch_timeout)).await?;
    let resolver = PathResolver::new(config.entries);

    let Some(resolved) = resolver.find(path) else {
        eprintln!("no import path matches {path}");
        std::process::exit(1);
    };

    let output = ResolveOutput {
        import: resolved.entry.path(),
        subpath: resolved.subpath,
        repo: resolved.entry.repository(),
        vcs: resolved.entry.vcs(),
        display: resolved.entry.display(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} {} {} (subpath {:?})",
            output.import, output.vcs, output.repo, output.subpath
        );
    }
    Ok(())
}
