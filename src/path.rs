use std::fmt::Display;

use crate::network::{Connection, Network, StationId, Weight};
use crate::profile::WeightProfile;
use crate::utils;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Station {0} is not in the network.")]
    NodeNotFound(StationId),
    #[error("No connection from station {from} to station {to}.")]
    EdgeNotFound { from: StationId, to: StationId },
    #[error("No path from station {start} to station {end}.")]
    PathNotFound { start: StationId, end: StationId },
    #[error("A path needs at least one station.")]
    EmptyPath,
    #[error("Query cancelled before completion.")]
    Cancelled,
}

pub type PathResult<'a> = Result<Path<'a>, PathError>;

/// Stations from source to target, each consecutive pair joined by a connection.
pub struct Path<'a> {
    pub stations: Vec<StationId>,
    pub total_weight: Weight,
    pub profile: WeightProfile,
    pub network: &'a Network,
}

impl<'a> Path<'a> {
    pub(crate) fn new(stations: Vec<StationId>, total_weight: Weight, profile: WeightProfile, network: &'a Network) -> Self {
        debug_assert!(!stations.is_empty());
        Self { stations, total_weight, profile, network }
    }

    /// Checks that `stations` is a walk through `network` and sums its weights.
    pub fn from_stations(network: &'a Network, stations: Vec<StationId>, profile: WeightProfile) -> PathResult<'a> {
        let Some(&first) = stations.first() else {
            return Err(PathError::EmptyPath);
        };
        if !network.contains(first) {
            return Err(PathError::NodeNotFound(first));
        }

        let mut total_weight = 0.;
        for pair in stations.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if !network.contains(to) {
                return Err(PathError::NodeNotFound(to));
            }
            total_weight += network
                .edge_weight_for(from, to, profile)
                .map_err(|_| PathError::EdgeNotFound { from, to })?;
        }
        Ok(Self::new(stations, total_weight, profile, network))
    }

    pub fn source(&self) -> StationId { self.stations[0] }

    pub fn target(&self) -> StationId { self.stations[self.stations.len() - 1] }

    /// Number of stations on the path.
    pub fn len(&self) -> usize { self.stations.len() }

    pub fn is_empty(&self) -> bool { self.stations.is_empty() }

    pub fn legs(&self) -> impl Iterator<Item = (StationId, StationId, &'a Connection)> + '_ {
        let network = self.network;
        self.stations.windows(2).filter_map(move |pair| {
            network
                .connection(pair[0], pair[1])
                .map(|connection| (pair[0], pair[1], connection))
        })
    }
}

impl Display for Path<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "-----------------------------------------------")?;
        writeln!(f)?;
        if self.len() == 1 {
            writeln!(f, "Already at {}.", utils::station_label(self.network, self.source()))?;
        }
        for (from, to, connection) in self.legs() {
            writeln!(f,
                     "Take the {} line from {} to {} ({}).",
                     connection.line,
                     utils::station_label(self.network, from),
                     utils::station_label(self.network, to),
                     utils::format_weight(connection.weight_for(self.profile)),
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total {}: {}.", self.profile, utils::format_weight(self.total_weight))?;
        writeln!(f, "-----------------------------------------------")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::StationDetails;

    fn network() -> Network {
        let mut network = Network::new();
        for (id, name) in [(1, "Baker Street"), (2, "Bond Street"), (3, "Green Park")] {
            let details = StationDetails {
                latitude: 51.5,
                longitude: -0.15,
                name: name.into(),
                zone: 1.,
                total_lines: 2,
                rail: false,
            };
            network.add_station(id, details).unwrap();
        }
        network.add_connection(1, 2, Connection::new("Jubilee", 2.)).unwrap();
        network.add_connection(2, 3, Connection::new("Jubilee", 1.5)).unwrap();
        network
    }

    #[test]
    fn from_stations_sums_weights() {
        let network = network();
        let path = Path::from_stations(&network, vec![1, 2, 3], WeightProfile::Weight).unwrap();

        assert_eq!(path.total_weight, 3.5);
        assert_eq!((path.source(), path.target(), path.len()), (1, 3, 3));
        let lines: Vec<_> = path.legs().map(|(_, _, c)| &*c.line).collect();
        assert_eq!(lines, vec!["Jubilee", "Jubilee"]);
    }

    #[test]
    fn from_stations_rejects_broken_walks() {
        let network = network();

        assert_eq!(
            Path::from_stations(&network, vec![1, 3], WeightProfile::Weight).err(),
            Some(PathError::EdgeNotFound { from: 1, to: 3 })
        );
        assert_eq!(
            Path::from_stations(&network, vec![1, 9], WeightProfile::Weight).err(),
            Some(PathError::NodeNotFound(9))
        );
        assert_eq!(
            Path::from_stations(&network, vec![9], WeightProfile::Weight).err(),
            Some(PathError::NodeNotFound(9))
        );
        assert_eq!(
            Path::from_stations(&network, Vec::new(), WeightProfile::Weight).err(),
            Some(PathError::EmptyPath)
        );
    }

    #[test]
    fn display_names_stations() {
        let network = network();
        let path = Path::from_stations(&network, vec![1, 2, 3], WeightProfile::Weight).unwrap();
        let text = path.to_string();

        assert!(text.contains("Take the Jubilee line from Baker Street to Bond Street (2.00)."));
        assert!(text.contains("Total weight: 3.50."));
    }
}
