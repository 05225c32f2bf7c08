use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::info;

use metro::config::Config;
use metro::network::DuplicatePolicy;
use metro::{load_network, shortest_path_with, utils, Network, NetworkSummary, PathError, QueryOptions, SearchStrategy, StationId, WeightProfile};

#[derive(Parser)]
#[command(name = "metro", about = "Descriptive statistics and shortest paths over a transit network.")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Stations table, overriding the configuration.
    #[arg(long)]
    stations: Option<PathBuf>,
    /// Connections table, overriding the configuration.
    #[arg(long)]
    connections: Option<PathBuf>,
    /// What to do with stations or connections defined twice.
    #[arg(long, value_enum)]
    duplicates: Option<DuplicatePolicy>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print counts per zone and line, mean degree and mean weight.
    Summary,
    /// Find the minimum-weight path between two stations.
    Route {
        #[arg(long)]
        from: StationId,
        #[arg(long)]
        to: StationId,
        #[arg(long, value_enum)]
        profile: Option<WeightProfile>,
        /// Pick the time-of-day weights for a departure time (HH:MM).
        #[arg(long, conflicts_with = "profile")]
        at: Option<String>,
        #[arg(long, value_enum)]
        strategy: Option<SearchStrategy>,
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Route between two randomly chosen stations.
    Random {
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn print_route(network: &Network, source: StationId, target: StationId, options: &QueryOptions<'_>) -> Result<(), PathError> {
    println!(
        "Route from {} to {}:",
        utils::station_label(network, source),
        utils::station_label(network, target)
    );
    match shortest_path_with(network, source, target, options) {
        Ok(path) => println!("{path}"),
        Err(PathError::PathNotFound { .. }) => println!("No path found."),
        Err(error) => return Err(error),
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(stations) = cli.stations {
        config.data.stations = stations;
    }
    if let Some(connections) = cli.connections {
        config.data.connections = connections;
    }
    if let Some(duplicates) = cli.duplicates {
        config.load.duplicates = duplicates;
    }

    let network = load_network(&config.data.stations, &config.data.connections, &config.load_options()?)?;

    match cli.command {
        Command::Summary => {
            print!("{}", NetworkSummary::of(&network));
        }
        Command::Route { from, to, profile, at, strategy, timeout_ms } => {
            let profile = match (profile, at) {
                (Some(profile), _) => profile,
                (None, Some(at)) => WeightProfile::for_time(utils::parse_time(&at)?),
                (None, None) => config.query.profile,
            };
            let mut options = config.query_options().with_profile(profile);
            if let Some(strategy) = strategy {
                options = options.with_strategy(strategy);
            }
            if let Some(timeout_ms) = timeout_ms {
                options = options.with_timeout(Duration::from_millis(timeout_ms));
            }
            print_route(&network, from, to, &options)?;
        }
        Command::Random { seed } => {
            let mut rng = seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
            let mut station_ids: Vec<StationId> = network.station_ids().collect();
            if station_ids.is_empty() {
                return Err("The network has no stations.".into());
            }
            station_ids.sort_unstable();
            let source = station_ids[rng.usize(..station_ids.len())];
            let target = station_ids[rng.usize(..station_ids.len())];
            info!("Picked stations {source} and {target}.");
            print_route(&network, source, target, &config.query_options())?;
        }
    }

    Ok(())
}
