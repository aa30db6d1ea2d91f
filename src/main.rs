//! Binary entrypoint: run the service or drive a simulated pendulum.

use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;

use pendulum_q::client::ServiceClient;
use pendulum_q::config::ServiceConfig;
use pendulum_q::error::Result;
use pendulum_q::simulate::{Controller, Simulation, SimulationConfig};

#[derive(Parser)]
#[command(name = "pendulum-q", about = "Q-learning service for an inverted pendulum")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve /predict, /save, /train and /debug
    Serve {
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Listen address, overrides the config file
        #[arg(long)]
        bind: Option<String>,

        /// Model file, overrides the config file
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Swing the pendulum, optionally against a running service
    Simulate {
        /// Service root URL; transitions are posted to it when set
        #[arg(long)]
        server: Option<String>,

        /// Take actions from the service's network instead of the rule-based controller
        #[arg(long, requires = "server")]
        neural: bool,

        /// Request one training iteration after every transition
        #[arg(long, requires = "server")]
        train: bool,

        #[arg(long, default_value_t = 1)]
        runs: usize,

        #[arg(long, default_value_t = 200)]
        iterations: usize,

        /// Start each run at a random angle
        #[arg(long)]
        random_start: bool,
    },
}

async fn serve(config: Option<PathBuf>, bind: Option<String>, model: Option<PathBuf>) -> Result<()> {
    let mut config = match config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = bind {
        config.bind = bind;
    }
    if let Some(model) = model {
        config.model_path = model;
    }
    pendulum_q::server::run(config).await
}

async fn simulate(
    server: Option<String>,
    neural: bool,
    train: bool,
    runs: usize,
    iterations: usize,
    random_start: bool,
) -> Result<()> {
    let client = server.map(ServiceClient::new);
    let controller = match (&client, neural) {
        (Some(client), true) => Controller::Network(client.clone()),
        _ => Controller::RuleBased,
    };
    let config = SimulationConfig {
        runs,
        iterations_per_run: iterations,
        random_start,
        train,
        ..Default::default()
    };
    Simulation::new(config, controller, client).run().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Serve { config, bind, model } => serve(config, bind, model).await,
        Command::Simulate {
            server,
            neural,
            train,
            runs,
            iterations,
            random_start,
        } => simulate(server, neural, train, runs, iterations, random_start).await,
    };

    if let Err(e) = result {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
