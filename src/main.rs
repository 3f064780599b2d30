// ABOUTME: CLI entrypoint for wikipub command
// ABOUTME: Wires settings, reporter, and publisher; maps errors to exit codes

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use wikipub::{
    cli::{Cli, Commands, ConfigCommand},
    graphql::GraphQlClient,
    report::{ConsoleReporter, Reporter},
    settings::{Overrides, Settings, SettingsStore},
    Publisher, Result,
};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let reporter = ConsoleReporter;
    if let Err(e) = run(cli, &reporter) {
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("wikipub=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Every error leaving this function has already been shown to the user.
fn run(cli: Cli, reporter: &ConsoleReporter) -> Result<()> {
    let store = reported(reporter, SettingsStore::new(cli.config_file.clone()))?;
    let stored = reported(reporter, store.load())?;

    match cli.command {
        Commands::Publish { file, root } => {
            let root = root.unwrap_or_else(|| PathBuf::from("."));
            let settings = effective(stored, cli.api_url, cli.token);
            let client = reported(reporter, GraphQlClient::new(settings))?;
            Publisher::new(&client, reporter).publish_file_and_notify(&file, &root)?;
        }
        Commands::TestConnection => {
            let settings = effective(stored, cli.api_url, cli.token);
            let client = reported(reporter, GraphQlClient::new(settings))?;
            Publisher::new(&client, reporter).test_connection_and_notify()?;
        }
        Commands::Config(ConfigCommand::Show) => {
            let settings = effective(stored, cli.api_url, cli.token);
            reporter.notify(&format!("settings file: {}", store.path().display()));
            reporter.notify(&format!("API URL: {}", settings.api_url));
            reporter.notify(&format!("bearer token: {}", settings.bearer_token));
        }
        Commands::Config(ConfigCommand::SetUrl { url }) => {
            let updated = Settings {
                api_url: url,
                ..stored
            };
            reported(reporter, store.save(&updated))?;
            reporter.notify("API URL saved");
        }
        Commands::Config(ConfigCommand::SetToken { token }) => {
            let updated = Settings {
                bearer_token: token,
                ..stored
            };
            reported(reporter, store.save(&updated))?;
            reporter.notify("Bearer token saved");
        }
    }

    Ok(())
}

fn effective(stored: Settings, api_url: Option<String>, token: Option<String>) -> Settings {
    stored
        .with_overrides(Overrides::from_env())
        .with_overrides(Overrides {
            api_url,
            bearer_token: token,
        })
}

fn reported<T>(reporter: &dyn Reporter, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        reporter.log(&format!("{:?}", e));
        reporter.notify(&format!("wikipub: {}", e));
    }
    result
}
