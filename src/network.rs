use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use crate::profile::WeightProfile;
use crate::utils;

pub type StationId = u32;
pub type StationIndex = usize;
pub type Weight = f64;

#[derive(Clone, Debug, PartialEq)]
pub struct StationDetails {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Box<str>,
    pub zone: f32,
    pub total_lines: u32,
    pub rail: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub id: StationId,
    // None when the station is only known from a connection referencing it.
    pub details: Option<StationDetails>,
}

impl Station {
    pub fn name(&self) -> Option<&str> {
        self.details.as_ref().map(|details| &*details.name)
    }

    pub fn is_placeholder(&self) -> bool { self.details.is_none() }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
    pub line: Box<str>,
    pub weight: Weight,
    pub off_peak: Weight,
    pub am_peak: Weight,
    pub inter_peak: Weight,
}

impl Connection {
    /// A connection whose time-of-day weights all equal `weight`.
    pub fn new(line: &str, weight: Weight) -> Self {
        Self {
            line: line.into(),
            weight,
            off_peak: weight,
            am_peak: weight,
            inter_peak: weight,
        }
    }

    pub fn weight_for(&self, profile: WeightProfile) -> Weight {
        match profile {
            WeightProfile::Weight => self.weight,
            WeightProfile::OffPeak => self.off_peak,
            WeightProfile::AmPeak => self.am_peak,
            WeightProfile::InterPeak => self.inter_peak,
        }
    }

    /// Mean of the three time-of-day weights.
    pub fn mean_peak_weight(&self) -> Weight {
        (self.off_peak + self.am_peak + self.inter_peak) / 3.
    }

    fn invalid_weight(&self) -> Option<Weight> {
        [self.weight, self.off_peak, self.am_peak, self.inter_peak]
            .into_iter()
            .find(|weight| !weight.is_finite() || *weight < 0.)
    }
}

// Row of the stations table.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StationRecord {
    pub id: StationId,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub zone: f32,
    pub total_lines: u32,
    #[serde(deserialize_with = "utils::deserialize_flag")]
    pub rail: bool,
}

impl StationRecord {
    pub fn into_parts(self) -> (StationId, StationDetails) {
        let details = StationDetails {
            latitude: self.latitude,
            longitude: self.longitude,
            name: self.name.into_boxed_str(),
            zone: self.zone,
            total_lines: self.total_lines,
            rail: self.rail,
        };
        (self.id, details)
    }
}

// Row of the connections table.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ConnectionRecord {
    pub from_id: StationId,
    pub to_id: StationId,
    pub line: String,
    pub weight: Weight,
    pub off_peak: Weight,
    pub am_peak: Weight,
    pub inter_peak: Weight,
}

impl ConnectionRecord {
    pub fn into_parts(self) -> (StationId, StationId, Connection) {
        let connection = Connection {
            line: self.line.into_boxed_str(),
            weight: self.weight,
            off_peak: self.off_peak,
            am_peak: self.am_peak,
            inter_peak: self.inter_peak,
        };
        (self.from_id, self.to_id, connection)
    }
}

/// What happens when a station or connection is defined a second time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The last definition wins.
    #[default]
    Replace,
    /// A second definition is an error.
    Reject,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Station {0} not found.")]
    NodeNotFound(StationId),
    #[error("No connection from station {from} to station {to}.")]
    EdgeNotFound { from: StationId, to: StationId },
    #[error("Connection from station {from} to station {to} has invalid weight {weight}.")]
    InvalidWeight { from: StationId, to: StationId, weight: Weight },
    #[error("Station {0} is defined more than once.")]
    DuplicateStation(StationId),
    #[error("Connection from station {from} to station {to} is defined more than once.")]
    DuplicateConnection { from: StationId, to: StationId },
}

/// Directed weighted graph of stations, with at most one connection per ordered pair.
///
/// Stations get a dense index in insertion order. Connections may name stations that
/// were never defined; those become placeholder stations without details.
#[derive(Clone, Debug, Default)]
pub struct Network {
    pub(crate) stations: Vec<Station>,
    pub(crate) station_index: HashMap<StationId, StationIndex>,
    // Outgoing neighbours of each station, in the order their connection was first added.
    pub(crate) out_edges: Vec<Vec<StationIndex>>,
    pub(crate) connections: HashMap<(StationIndex, StationIndex), Connection>,
    pub(crate) duplicate_policy: DuplicatePolicy,
}

impl Network {
    pub fn new() -> Self { Self::default() }

    pub fn with_policy(duplicate_policy: DuplicatePolicy) -> Self {
        Self { duplicate_policy, ..Self::default() }
    }

    pub fn build(
        stations: impl IntoIterator<Item = StationRecord>,
        connections: impl IntoIterator<Item = ConnectionRecord>,
    ) -> Result<Self, NetworkError> {
        Self::build_with_policy(stations, connections, DuplicatePolicy::Replace)
    }

    pub fn build_with_policy(
        stations: impl IntoIterator<Item = StationRecord>,
        connections: impl IntoIterator<Item = ConnectionRecord>,
        duplicate_policy: DuplicatePolicy,
    ) -> Result<Self, NetworkError> {
        let mut network = Self::with_policy(duplicate_policy);
        for record in stations {
            let (id, details) = record.into_parts();
            network.add_station(id, details)?;
        }
        for record in connections {
            let (from, to, connection) = record.into_parts();
            network.add_connection(from, to, connection)?;
        }
        Ok(network)
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy { self.duplicate_policy }

    fn index_or_insert(&mut self, id: StationId) -> StationIndex {
        if let Some(&idx) = self.station_index.get(&id) {
            return idx;
        }
        let idx = self.stations.len();
        self.stations.push(Station { id, details: None });
        self.out_edges.push(Vec::new());
        self.station_index.insert(id, idx);
        idx
    }

    /// Inserts a station, returning the details it replaced.
    pub fn add_station(&mut self, id: StationId, details: StationDetails) -> Result<Option<StationDetails>, NetworkError> {
        let idx = self.index_or_insert(id);
        let station = &mut self.stations[idx];
        if station.details.is_some() && self.duplicate_policy == DuplicatePolicy::Reject {
            return Err(NetworkError::DuplicateStation(id));
        }
        let previous = station.details.replace(details);
        if previous.is_some() {
            debug!("Station {id} redefined, keeping the latest record.");
        }
        Ok(previous)
    }

    /// Inserts the connection `from -> to`, returning the connection it replaced.
    pub fn add_connection(&mut self, from: StationId, to: StationId, connection: Connection) -> Result<Option<Connection>, NetworkError> {
        if let Some(weight) = connection.invalid_weight() {
            return Err(NetworkError::InvalidWeight { from, to, weight });
        }

        let from_idx = self.index_or_insert(from);
        let to_idx = self.index_or_insert(to);
        match self.connections.entry((from_idx, to_idx)) {
            Entry::Occupied(mut entry) => {
                if self.duplicate_policy == DuplicatePolicy::Reject {
                    return Err(NetworkError::DuplicateConnection { from, to });
                }
                debug!("Connection {from} -> {to} redefined, keeping the latest record.");
                Ok(Some(entry.insert(connection)))
            }
            Entry::Vacant(entry) => {
                entry.insert(connection);
                self.out_edges[from_idx].push(to_idx);
                Ok(None)
            }
        }
    }

    pub fn num_stations(&self) -> usize { self.stations.len() }

    pub fn num_connections(&self) -> usize { self.connections.len() }

    pub fn is_empty(&self) -> bool { self.stations.is_empty() }

    pub fn contains(&self, id: StationId) -> bool { self.station_index.contains_key(&id) }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.index_of(id).map(|idx| &self.stations[idx])
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> { self.stations.iter() }

    pub fn station_ids(&self) -> impl Iterator<Item = StationId> + '_ {
        self.stations.iter().map(|station| station.id)
    }

    pub fn find_station_by_name(&self, name: &str) -> Option<StationId> {
        self.stations
            .iter()
            .find(|station| station.name().is_some_and(|station_name| station_name.eq_ignore_ascii_case(name)))
            .map(|station| station.id)
    }

    /// Stations directly reachable from `id` by one connection.
    pub fn neighbours(&self, id: StationId) -> Result<impl Iterator<Item = StationId> + '_, NetworkError> {
        let idx = self.index_of(id).ok_or(NetworkError::NodeNotFound(id))?;
        Ok(self.out_edges[idx].iter().map(move |&to| self.stations[to].id))
    }

    pub fn out_degree(&self, id: StationId) -> Result<usize, NetworkError> {
        let idx = self.index_of(id).ok_or(NetworkError::NodeNotFound(id))?;
        Ok(self.out_edges[idx].len())
    }

    pub fn connection(&self, from: StationId, to: StationId) -> Option<&Connection> {
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;
        self.connections.get(&(from_idx, to_idx))
    }

    pub fn edge_weight(&self, from: StationId, to: StationId) -> Result<Weight, NetworkError> {
        self.edge_weight_for(from, to, WeightProfile::Weight)
    }

    pub fn edge_weight_for(&self, from: StationId, to: StationId, profile: WeightProfile) -> Result<Weight, NetworkError> {
        self.connection(from, to)
            .map(|connection| connection.weight_for(profile))
            .ok_or(NetworkError::EdgeNotFound { from, to })
    }

    /// Every connection as `(from, to, connection)`, grouped by origin station in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = (StationId, StationId, &Connection)> + '_ {
        (0..self.stations.len()).flat_map(move |from_idx| {
            self.out_edges_of(from_idx)
                .map(move |(to_idx, connection)| (self.stations[from_idx].id, self.stations[to_idx].id, connection))
        })
    }

    pub(crate) fn index_of(&self, id: StationId) -> Option<StationIndex> {
        self.station_index.get(&id).copied()
    }

    pub(crate) fn out_edges_of(&self, idx: StationIndex) -> impl Iterator<Item = (StationIndex, &Connection)> + '_ {
        self.out_edges[idx]
            .iter()
            .map(move |&to_idx| (to_idx, &self.connections[&(idx, to_idx)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(name: &str, zone: f32) -> StationDetails {
        StationDetails {
            latitude: 51.5,
            longitude: -0.1,
            name: name.into(),
            zone,
            total_lines: 1,
            rail: false,
        }
    }

    #[test]
    fn station_redefinition_keeps_latest() {
        let mut network = Network::new();
        assert_eq!(network.add_station(1, details("Old", 1.)).unwrap(), None);
        let previous = network.add_station(1, details("New", 2.)).unwrap();

        assert_eq!(previous.map(|d| d.name), Some("Old".into()));
        assert_eq!(network.num_stations(), 1);
        assert_eq!(network.station(1).and_then(Station::name), Some("New"));
    }

    #[test]
    fn duplicate_connection_last_write_wins() {
        let mut network = Network::new();
        network.add_connection(1, 2, Connection::new("Central", 5.)).unwrap();
        let replaced = network.add_connection(1, 2, Connection::new("Central", 2.)).unwrap();

        assert_eq!(replaced.map(|c| c.weight), Some(5.));
        assert_eq!(network.edge_weight(1, 2), Ok(2.));
        assert_eq!(network.num_connections(), 1);
        assert_eq!(network.out_degree(1), Ok(1));
        assert_eq!(network.neighbours(1).unwrap().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn reject_policy_refuses_duplicates() {
        let mut network = Network::with_policy(DuplicatePolicy::Reject);
        network.add_station(1, details("A", 1.)).unwrap();
        network.add_connection(1, 2, Connection::new("Central", 5.)).unwrap();

        assert_eq!(network.add_station(1, details("A", 1.)), Err(NetworkError::DuplicateStation(1)));
        assert_eq!(
            network.add_connection(1, 2, Connection::new("Central", 2.)),
            Err(NetworkError::DuplicateConnection { from: 1, to: 2 })
        );
        assert_eq!(network.edge_weight(1, 2), Ok(5.));
    }

    #[test]
    fn placeholder_is_filled_in_by_later_definition() {
        let mut network = Network::with_policy(DuplicatePolicy::Reject);
        network.add_connection(1, 2, Connection::new("Victoria", 1.)).unwrap();
        assert!(network.station(2).is_some_and(Station::is_placeholder));

        // Filling in a placeholder is not a duplicate.
        network.add_station(2, details("Euston", 1.)).unwrap();
        assert_eq!(network.station(2).and_then(Station::name), Some("Euston"));
        assert_eq!(network.num_stations(), 2);
    }

    #[test]
    fn invalid_weights_are_rejected() {
        let mut network = Network::new();
        let negative = Connection::new("Jubilee", -1.);
        let mut nan_peak = Connection::new("Jubilee", 1.);
        nan_peak.am_peak = f64::NAN;

        assert!(matches!(
            network.add_connection(1, 2, negative),
            Err(NetworkError::InvalidWeight { from: 1, to: 2, .. })
        ));
        assert!(network.add_connection(1, 2, nan_peak).is_err());
        assert!(network.is_empty());
    }

    #[test]
    fn lookups_report_missing_ids() {
        let mut network = Network::new();
        network.add_connection(1, 2, Connection::new("Central", 1.)).unwrap();

        assert_eq!(network.edge_weight(2, 1), Err(NetworkError::EdgeNotFound { from: 2, to: 1 }));
        assert_eq!(network.edge_weight(1, 9), Err(NetworkError::EdgeNotFound { from: 1, to: 9 }));
        assert!(matches!(network.neighbours(9), Err(NetworkError::NodeNotFound(9))));
        assert_eq!(network.out_degree(9), Err(NetworkError::NodeNotFound(9)));
        assert!(!network.contains(9));
    }

    #[test]
    fn profile_weights_are_looked_up() {
        let mut network = Network::new();
        let connection = Connection {
            line: "Northern".into(),
            weight: 2.,
            off_peak: 1.5,
            am_peak: 3.,
            inter_peak: 2.5,
        };
        network.add_connection(1, 2, connection).unwrap();

        assert_eq!(network.edge_weight_for(1, 2, WeightProfile::AmPeak), Ok(3.));
        assert_eq!(network.edge_weight_for(1, 2, WeightProfile::OffPeak), Ok(1.5));
        assert_eq!(network.connection(1, 2).map(Connection::mean_peak_weight), Some(7. / 3.));
    }

    #[test]
    fn build_from_records() {
        let stations = vec![
            StationRecord { id: 7, latitude: 51.5, longitude: -0.1, name: "Bank".into(), zone: 1., total_lines: 4, rail: false },
            StationRecord { id: 3, latitude: 51.5, longitude: -0.1, name: "Holborn".into(), zone: 1., total_lines: 2, rail: false },
        ];
        let connections = vec![ConnectionRecord {
            from_id: 3,
            to_id: 7,
            line: "Central".into(),
            weight: 2.5,
            off_peak: 2.5,
            am_peak: 3.,
            inter_peak: 2.6,
        }];
        let network = Network::build(stations, connections).unwrap();

        assert_eq!(network.station_ids().collect::<Vec<_>>(), vec![7, 3]);
        assert_eq!(network.find_station_by_name("holborn"), Some(3));
        let all: Vec<_> = network.connections().map(|(from, to, c)| (from, to, c.weight)).collect();
        assert_eq!(all, vec![(3, 7, 2.5)]);
    }
}
