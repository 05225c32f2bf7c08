pub mod network;

pub use network::{Connection, Network, NetworkError, Station, StationId, Weight};

pub mod path;

pub use path::{Path, PathError, PathResult};

pub mod dijkstra;

pub use dijkstra::{shortest_path, shortest_path_with, QueryOptions, SearchStrategy};

pub mod profile;

pub use profile::WeightProfile;

pub mod loader;

pub use loader::{load_network, LoadError, LoadOptions};

pub mod stats;

pub use stats::NetworkSummary;

pub mod config;

pub mod utils;
