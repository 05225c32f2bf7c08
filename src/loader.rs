use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::info;
use serde::de::DeserializeOwned;

use crate::network::{ConnectionRecord, DuplicatePolicy, Network, NetworkError, StationRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub duplicates: DuplicatePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b';', duplicates: DuplicatePolicy::Replace }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("Failed to open '{}': {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Malformed record in '{}': {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error(transparent)]
    Network(#[from] NetworkError),
}

fn read_records<T, R>(reader: R, delimiter: u8) -> Result<Vec<T>, csv::Error>
where
    T: DeserializeOwned,
    R: Read,
{
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize()
        .collect()
}

pub fn read_stations<R: Read>(reader: R, delimiter: u8) -> Result<Vec<StationRecord>, csv::Error> {
    read_records(reader, delimiter)
}

pub fn read_connections<R: Read>(reader: R, delimiter: u8) -> Result<Vec<ConnectionRecord>, csv::Error> {
    read_records(reader, delimiter)
}

fn read_file<T: DeserializeOwned>(path: &Path, delimiter: u8) -> Result<Vec<T>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    read_records(file, delimiter).map_err(|source| LoadError::Csv { path: path.to_path_buf(), source })
}

/// Reads the stations and connections tables and builds the network from them.
///
/// # Errors
///
/// Fails if either file cannot be read, a row does not parse, or a record is rejected by the network
/// (invalid weight, or a duplicate under [`DuplicatePolicy::Reject`]).
pub fn load_network(stations: impl AsRef<Path>, connections: impl AsRef<Path>, options: &LoadOptions) -> Result<Network, LoadError> {
    let stations_path = stations.as_ref();
    let connections_path = connections.as_ref();

    let stations: Vec<StationRecord> = read_file(stations_path, options.delimiter)?;
    info!("Read {} station records from {}.", stations.len(), stations_path.display());
    let connections: Vec<ConnectionRecord> = read_file(connections_path, options.delimiter)?;
    info!("Read {} connection records from {}.", connections.len(), connections_path.display());

    let network = Network::build_with_policy(stations, connections, options.duplicates)?;
    info!(
        "Network loaded with {} stations and {} connections.",
        network.num_stations(),
        network.num_connections()
    );
    Ok(network)
}
