mod cli;

use media_explorer::{
    config::{self, Config},
    fs::LocalFs,
    server::{self, AppContext},
};
use media_explorer_common::{DirectoryListing, MediaType, SortSpec};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load config from file, then apply `MEDIA_ROOT`/`PORT` and CLI overrides.
fn resolve_config(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    root: Option<PathBuf>,
) -> Result<Config> {
    let mut config = config::load_config_or_default(config_path)?;
    config::apply_env_overrides(&mut config)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(root) = root {
        config.media.root = PathBuf::from(shellexpand::tilde(&root.to_string_lossy()).as_ref());
    }

    config::validate_config(&config)?;
    Ok(config)
}

async fn start_server(config: Config) -> Result<()> {
    tracing::info!("Starting Media Explorer");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!("Serving media from {:?}", config.media.root);

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "media_explorer=trace,media_explorer_common=debug,tower_http=debug".to_string()
        } else {
            "media_explorer=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port, root } => {
            let config = resolve_config(cli.config.as_deref(), host, port, root)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(config))
        }
        Commands::List {
            path,
            root,
            sort,
            order,
            json,
        } => {
            let config = resolve_config(cli.config.as_deref(), None, None, root)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(list_directory(
                config,
                path.as_deref(),
                SortSpec::new(sort, order),
                json,
            ))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("media-explorer {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn list_directory(
    config: Config,
    path: Option<&str>,
    sort: SortSpec,
    json: bool,
) -> Result<()> {
    let ctx = AppContext::new(config, Arc::new(LocalFs::new()))
        .await
        .context("Failed to establish media root")?;

    let dir = ctx.resolver.resolve_for_listing(path).await;
    let listing = ctx
        .lister
        .list(&dir, sort)
        .await
        .with_context(|| format!("Failed to list {:?}", dir))?;

    if json {
        let json_str = serde_json::to_string_pretty(&listing)?;
        println!("{}", json_str);
    } else {
        print_listing(&listing);
    }

    Ok(())
}

fn print_listing(listing: &DirectoryListing) {
    println!("Directory: {}", listing.path.display());
    if let Some(ref parent) = listing.parent {
        println!("Parent: {}", parent.display());
    }
    println!();

    for entry in &listing.items {
        let size = if entry.media_type == MediaType::Directory {
            "-".to_string()
        } else {
            format_size(entry.size)
        };
        println!(
            "  {:<9} {:>10}  {}  {}",
            entry.media_type.to_string(),
            size,
            entry.mtime.format("%Y-%m-%d %H:%M"),
            entry.name
        );
    }

    println!("\n{} entries", listing.items.len());
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    config::validate_config(&config)?;
    println!("✓ Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Media root: {}", config.media.root.display());
    match config.server.static_dir {
        Some(ref dir) => println!("  Static files: {}", dir.display()),
        None => println!("  Static files: none"),
    }

    Ok(())
}
