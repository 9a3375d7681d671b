//! Inspect directory packages the way the injector and file provider see them.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use embedded_content::asset_paths::{identity_key, normalize_resource_name};
use embedded_content::{
    BlockRules, DebugLog, DirectoryPackage, EmbedConfig, PackageRef, VirtualFileProvider,
};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "embedded-content")]
#[command(about = "Inspect embedded asset packages")]
struct Args {
    /// Package to load, as `Name=DIR`; repeat to add more, first wins on name collisions
    #[arg(short, long = "package", value_name = "NAME=DIR", global = true)]
    packages: Vec<String>,

    /// Version reported for loaded packages
    #[arg(long, default_value = "1.0.0", global = true)]
    package_version: String,

    /// JSON configuration with `debugLogging` and `blockCssFiles`
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every resource with its canonical name, URL, element id and block decision
    List {
        /// Additional block rule; repeatable
        #[arg(short, long = "block", value_name = "RULE")]
        blocks: Vec<String>,
    },
    /// Write a served file to stdout
    Cat {
        /// Request path, e.g. `_content/Widgets/site.css`
        path: String,
    },
    /// List a virtual directory, e.g. `_content/Widgets`
    Ls {
        /// Request path
        path: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EmbedConfig::load(path)?,
        None => EmbedConfig::default(),
    };
    config.debug_logging |= args.verbose;
    setup_tracing(config.debug_logging);

    let packages = load_packages(&args.packages, &args.package_version)?;

    match args.command {
        Command::List { blocks } => {
            config.block_css_files.extend(blocks);
            list(&packages, &config.block_rules(), config.debug_log())
        }
        Command::Cat { path } => cat(&packages, &path, config.debug_log()),
        Command::Ls { path } => ls(&packages, &path, config.debug_log()),
    }
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("embedded_content=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_packages(entries: &[String], version: &str) -> Result<Vec<PackageRef>> {
    if entries.is_empty() {
        return Err(anyhow!("no packages given; pass --package Name=DIR"));
    }

    entries
        .iter()
        .map(|entry| {
            let (name, dir) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("invalid package `{entry}`, expected Name=DIR"))?;
            let package = DirectoryPackage::load(name, version, dir)
                .with_context(|| format!("failed to load package `{name}` from {dir}"))?;
            Ok(Arc::new(package) as PackageRef)
        })
        .collect()
}

fn list(packages: &[PackageRef], rules: &BlockRules, log: DebugLog) -> Result<()> {
    let provider = VirtualFileProvider::new(packages.iter().cloned(), log);
    let mut out = io::stdout().lock();

    for package in packages {
        writeln!(out, "{} ({})", package.name(), package.version())?;
        for resource in package.resource_names()? {
            let normalized = normalize_resource_name(package.name(), resource);
            let served_by_this =
                provider.file_info(&normalized.file_name).resource_id() == Some(resource);
            let blocked = rules.should_block(package.name(), resource, &normalized.extension);

            writeln!(
                out,
                "  {resource}\n    file: {}{}\n    url:  {}\n    id:   {}{}",
                normalized.file_name,
                if served_by_this { "" } else { " (shadowed)" },
                normalized.http_path,
                identity_key(package.name(), resource),
                if blocked { "\n    ** blocked **" } else { "" },
            )?;
        }
    }

    Ok(())
}

fn cat(packages: &[PackageRef], path: &str, log: DebugLog) -> Result<()> {
    let provider = VirtualFileProvider::new(packages.iter().cloned(), log);
    let info = provider.file_info(path);
    let mut stream = info.open().with_context(|| format!("cannot serve {path}"))?;
    io::copy(&mut stream, &mut io::stdout().lock())?;
    Ok(())
}

fn ls(packages: &[PackageRef], path: &str, log: DebugLog) -> Result<()> {
    let provider = VirtualFileProvider::new(packages.iter().cloned(), log);
    let listing = provider.directory_contents(path);
    if !listing.exists() {
        return Err(anyhow!("{path} is not a virtual directory"));
    }

    let mut out = io::stdout().lock();
    for entry in &listing {
        writeln!(out, "{:>10}  {}", entry.length(), entry.name())?;
    }
    Ok(())
}
