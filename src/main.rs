use anyhow::Result;
use clap::Parser;
use relwin::commands::{
    self,
    config::{Config, InventorySource},
};
use std::path::PathBuf;

/// relwin - release-window filter for Composer package lists
///
/// Drops candidate packages of an umbrella project and its split components
/// whose release line is known but outside the required constraint.
///
/// If the RELWIN_AUTH_TOKEN environment variable is set, it is sent as a
/// bearer token when the inventory is fetched over HTTP.
///
/// Examples:
///   relwin --require '~3.4' --inventory-file versions.json filter candidates.json
///   relwin --require '^5.0' --inventory-url https://example.test/versions.json window
#[derive(Parser, Debug)]
#[command(author, version = env!("RELWIN_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Constraint the project declared for the umbrella (also via RELWIN_REQUIRE)
    #[arg(
        long,
        env = "RELWIN_REQUIRE",
        value_name = "CONSTRAINT",
        global = true
    )]
    require: Option<String>,

    /// Name of the umbrella package
    #[arg(
        long,
        env = "RELWIN_UMBRELLA",
        value_name = "NAME",
        default_value = "symfony/symfony",
        global = true
    )]
    umbrella: String,

    /// URL of the release-line inventory document (also via RELWIN_INVENTORY_URL)
    #[arg(
        long = "inventory-url",
        env = "RELWIN_INVENTORY_URL",
        value_name = "URL",
        global = true
    )]
    inventory_url: Option<String>,

    /// Local release-line inventory document
    #[arg(long = "inventory-file", value_name = "PATH", global = true)]
    inventory_file: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Filter a candidate package list and print the survivors as JSON
    Filter(FilterArgs),

    /// Show the computed release window of every filterable family
    Window,
}

#[derive(clap::Args, Debug)]
pub struct FilterArgs {
    /// JSON file with an array of packages or a {"packages": [...]} object
    #[arg(value_name = "CANDIDATES.json")]
    pub candidates: PathBuf,
}

impl Cli {
    fn into_config(self) -> Result<(Config<relwin::runtime::RealRuntime>, Commands)> {
        let Some(require) = self.require.filter(|r| !r.trim().is_empty()) else {
            anyhow::bail!("No constraint given. Pass --require or set RELWIN_REQUIRE.");
        };
        let source = InventorySource::from_args(self.inventory_url, self.inventory_file)?;
        let config = Config::new(
            relwin::runtime::RealRuntime,
            &require,
            &self.umbrella,
            source,
        )?;
        Ok((config, self.command))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let (config, command) = Cli::parse().into_config()?;

    match command {
        Commands::Filter(args) => commands::filter(config, &args.candidates).await?,
        Commands::Window => commands::window(config).await?,
    }
    Ok(())
}
