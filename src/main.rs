use clap::{Parser, Subcommand};
use primojobs::backend::listings;
use primojobs::context::AppContext;
use primojobs::{config, output, server};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{}@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "primojobs")]
#[command(about = "Server-rendered job portal front end")]
#[command(long_about = "\
Server-rendered job portal front end

Serves the PrimoJobs pages (home, jobs, webinars, blog, services, dashboard)
as HTML. Listings and accounts come from a hosted PostgREST + GoTrue backend,
or from an in-memory store seeded from JSON for offline development.

Configuration is read from primojobs.toml (all keys optional). Secrets can be
supplied through PRIMOJOBS_BACKEND_URL, PRIMOJOBS_BACKEND_KEY and
PRIMOJOBS_PORT instead.

Logging honours RUST_LOG (default: info).

Run 'primojobs gen-config' to generate a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = "primojobs.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Render one path through the router and print the HTML
    Render {
        /// Request path, e.g. /jobs?work_mode=remote
        path: String,
        /// Write the body to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Access token to send as the session cookie
        #[arg(long)]
        token: Option<String>,
    },
    /// Validate config and fetch each listing once
    Check,
    /// Print a stock primojobs.toml with all options documented
    GenConfig,
    /// Print the route table
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            let site_config = config::load_config(&cli.config)?;
            let ctx = AppContext::from_config(site_config)?;
            server::serve(ctx).await?;
        }
        Command::Render { path, out, token } => {
            let site_config = config::load_config(&cli.config)?;
            let ctx = AppContext::from_config(site_config)?;
            let (status, body) = server::render_path(ctx, &path, token.as_deref()).await?;
            if status >= 400 {
                eprintln!("{path}: HTTP {status}");
            }
            match out {
                Some(file) => std::fs::write(&file, body)?,
                None => print!("{body}"),
            }
        }
        Command::Check => {
            let site_config = config::load_config(&cli.config)?;
            println!("==> Checking {}", cli.config.display());
            let ctx = AppContext::from_config(site_config)?;
            let checks = listings::check_listings(ctx.backend.as_ref()).await;
            output::print_check_report(&ctx.config, &checks);
            if checks.iter().any(|p| p.outcome.is_err()) {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Routes => {
            output::print_routes();
        }
    }

    Ok(())
}
