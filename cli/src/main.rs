//! hforge CLI — resolve function class references from the terminal.
//!
//! # Commands
//! ```text
//! hforge resolve hforge:acme/widget --host 172.22.2.117 --port 3000
//! hforge resolve com.acme.Widget
//! hforge explain widget hforge:acme/widget --base-url http://localhost:3000
//! hforge explain widget hforge:acme/widget --static entries.json --lenient
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use hforge_core::{ClassRegistry, CreateFunctionDesc, Resolver, ResolverConfig, StaticRegistry};
use hforge_http::{HttpRegistryClient, RegistryConfig};

mod logging;

#[derive(Parser)]
#[command(
    name = "hforge",
    about = "Resolve CREATE FUNCTION class references",
    long_about = "
Resolve class references for CREATE FUNCTION descriptors.

A reference starting with `hforge:` (any case) is looked up in the class
registry at GET {base_url}/list/<owner>/<name>/class. Anything else is
used as the class name unchanged.

ENVIRONMENT VARIABLES:
  RUST_LOG    Log filter, e.g. `hforge_http=trace`
",
    version
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a class reference and print the class name
    Resolve {
        /// Class reference, e.g. `hforge:acme/widget` or `com.acme.Widget`
        reference: String,
        #[command(flatten)]
        registry: RegistryArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a CREATE FUNCTION descriptor and print its explain output
    Explain {
        /// Function name
        function_name: String,
        /// Class reference
        reference: String,
        #[command(flatten)]
        registry: RegistryArgs,
        /// Leave the class unset instead of failing when resolution fails
        #[arg(long)]
        lenient: bool,
        /// Output the descriptor as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct RegistryArgs {
    /// JSON registry config file (base_url, path_template, timeout_ms, ...)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Registry base URL, e.g. http://localhost:3000
    #[arg(long, conflicts_with = "host")]
    base_url: Option<String>,
    /// Registry host
    #[arg(long)]
    host: Option<String>,
    /// Registry port [default: 3000]
    #[arg(long, requires = "host")]
    port: Option<u16>,
    /// Per-attempt timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Retry transient failures this many times
    #[arg(long)]
    retries: Option<u32>,
    /// Resolve from a JSON map of name → class instead of the network
    #[arg(long = "static", conflicts_with_all = ["config", "base_url", "host"])]
    static_entries: Option<PathBuf>,
}

impl RegistryArgs {
    fn registry_config(&self) -> Result<RegistryConfig> {
        let mut config = match &self.config {
            Some(path) => RegistryConfig::from_json_file(path)
                .with_context(|| format!("loading registry config {}", path.display()))?,
            None => RegistryConfig::default(),
        };
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        } else if let Some(host) = &self.host {
            config.base_url = format!("http://{host}:{}", self.port.unwrap_or(3000));
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(retries) = self.retries {
            config.retry = config.retry.with_max_retries(retries);
        }
        Ok(config)
    }

    /// Timeout and retry settings for `--static` lookups.
    fn static_resolver_config(&self) -> ResolverConfig {
        let mut config = ResolverConfig::default();
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout = Some(Duration::from_millis(timeout_ms));
        }
        if let Some(retries) = self.retries {
            config.retry = config.retry.with_max_retries(retries);
        }
        config
    }

    fn resolver(&self) -> Result<Resolver<Arc<dyn ClassRegistry>>> {
        if let Some(path) = &self.static_entries {
            let registry = StaticRegistry::from_json_file(path)
                .with_context(|| format!("loading static registry {}", path.display()))?;
            tracing::debug!(entries = registry.len(), "using static registry");
            let registry: Arc<dyn ClassRegistry> = Arc::new(registry);
            return Ok(Resolver::new(registry, self.static_resolver_config()));
        }

        let config = self.registry_config()?;
        let resolver_config = config.resolver_config();
        let client = HttpRegistryClient::new(config).context("building registry client")?;
        let registry: Arc<dyn ClassRegistry> = Arc::new(client);
        Ok(Resolver::new(registry, resolver_config))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Resolve {
            reference,
            registry,
            json,
        } => cmd_resolve(&reference, &registry, json).await,
        Commands::Explain {
            function_name,
            reference,
            registry,
            lenient,
            json,
        } => cmd_explain(&function_name, &reference, &registry, lenient, json).await,
    }
}

async fn cmd_resolve(reference: &str, args: &RegistryArgs, json: bool) -> Result<()> {
    let resolver = args.resolver()?;
    tracing::debug!(endpoint = resolver.registry().endpoint(), reference, "resolving");
    let class = resolver
        .resolve_until(reference, ctrl_c())
        .await
        .with_context(|| format!("resolving {reference}"))?;

    if json {
        let out = json!({ "reference": reference, "class": class });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{class}");
    }
    Ok(())
}

async fn cmd_explain(
    function_name: &str,
    reference: &str,
    args: &RegistryArgs,
    lenient: bool,
    json: bool,
) -> Result<()> {
    let resolver = args.resolver()?;
    let desc = if lenient {
        CreateFunctionDesc::resolve_lenient(function_name, reference, &resolver).await
    } else {
        CreateFunctionDesc::resolve(function_name, reference, &resolver)
            .await
            .with_context(|| format!("resolving {reference}"))?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&desc)?);
    } else {
        print!("{desc}");
    }
    Ok(())
}

/// Completes when the user presses Ctrl-C.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; never cancel.
        std::future::pending::<()>().await;
    }
}
