use std::path::PathBuf;

use metro::network::{Connection, Network, StationId};
use metro::{load_network, LoadError, LoadOptions};

// Common example data for the demos, benchmarks and integration tests.

pub fn example_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

pub fn load_example_network() -> Result<Network, LoadError> {
    let data_dir = example_data_dir();
    load_network(data_dir.join("stations.csv"), data_dir.join("connections.csv"), &LoadOptions::default())
}

pub fn get_example_start_station(network: &Network) -> StationId {
    network.find_station_by_name("Baker Street").unwrap()
}

pub fn get_example_end_station(network: &Network) -> StationId {
    network.find_station_by_name("Bank").unwrap()
}

pub fn get_example_scenario() -> (Network, StationId, StationId) {
    let network = load_example_network().unwrap();
    let start = get_example_start_station(&network);
    let end = get_example_end_station(&network);
    (network, start, end)
}

/// A connected random network: a ring through every station plus `extra_connections` random shortcuts.
pub fn random_network(num_stations: u32, extra_connections: usize, seed: u64) -> Network {
    assert!(num_stations > 1, "A random network needs at least two stations.");
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut network = Network::new();

    for from in 0..num_stations {
        let to = (from + 1) % num_stations;
        let weight = f64::from(rng.u8(1..10));
        network.add_connection(from, to, Connection::new("Ring", weight)).unwrap();
        network.add_connection(to, from, Connection::new("Ring", weight)).unwrap();
    }
    for _ in 0..extra_connections {
        let from = rng.u32(..num_stations);
        let to = rng.u32(..num_stations);
        let weight = f64::from(rng.u8(1..30));
        network.add_connection(from, to, Connection::new("Shortcut", weight)).unwrap();
    }
    network
}

pub fn random_station_pair(network: &Network, seed: u64) -> (StationId, StationId) {
    let mut rng = fastrand::Rng::with_seed(seed);
    let ids: Vec<StationId> = network.station_ids().collect();
    (ids[rng.usize(..ids.len())], ids[rng.usize(..ids.len())])
}
