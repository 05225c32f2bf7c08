use std::collections::BTreeMap;
use std::fmt::Display;

use crate::network::Network;
use crate::utils;

/// Descriptive aggregates over a loaded network.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkSummary {
    /// Every station, placeholders included.
    pub num_stations: usize,
    /// Stations with details, counted per zone and sorted by zone.
    pub stations_per_zone: Vec<(f32, usize)>,
    pub num_connections: usize,
    pub connections_per_line: Vec<(Box<str>, usize)>,
    /// Mean out-degree, rounded to two decimals.
    pub mean_degree: f64,
    /// Mean over connections of their mean time-of-day weight, rounded to two decimals.
    pub mean_weight: Option<f64>,
}

impl NetworkSummary {
    pub fn of(network: &Network) -> Self {
        let mut zones: Vec<f32> = network
            .stations()
            .filter_map(|station| station.details.as_ref())
            .map(|details| details.zone)
            .collect();
        zones.sort_unstable_by(f32::total_cmp);

        let mut stations_per_zone: Vec<(f32, usize)> = Vec::new();
        for zone in zones {
            match stations_per_zone.last_mut() {
                Some((last, count)) if *last == zone => *count += 1,
                _ => stations_per_zone.push((zone, 1)),
            }
        }

        let mut lines: BTreeMap<&str, usize> = BTreeMap::new();
        let mut weight_sum = 0.;
        for (_, _, connection) in network.connections() {
            *lines.entry(&*connection.line).or_default() += 1;
            weight_sum += connection.mean_peak_weight();
        }

        let num_stations = network.num_stations();
        let num_connections = network.num_connections();
        let mean_degree = if num_stations == 0 {
            0.
        } else {
            utils::round2(num_connections as f64 / num_stations as f64)
        };
        let mean_weight = (num_connections > 0).then(|| utils::round2(weight_sum / num_connections as f64));

        Self {
            num_stations,
            stations_per_zone,
            num_connections,
            connections_per_line: lines.into_iter().map(|(line, count)| (line.into(), count)).collect(),
            mean_degree,
            mean_weight,
        }
    }
}

fn header(f: &mut std::fmt::Formatter<'_>, title: &str) -> std::fmt::Result {
    writeln!(f, "---------- {title} ----------")
}

impl Display for NetworkSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        header(f, "STATIONS")?;
        writeln!(f, "Number of stations: {}", self.num_stations)?;
        header(f, "STATIONS PER ZONE")?;
        for (zone, count) in &self.stations_per_zone {
            writeln!(f, "Zone {zone}: {count} stations")?;
        }
        header(f, "CONNECTIONS")?;
        writeln!(f, "Number of connections: {}", self.num_connections)?;
        header(f, "CONNECTIONS PER LINE")?;
        for (line, count) in &self.connections_per_line {
            writeln!(f, "Line {line}: {count} connections")?;
        }
        header(f, "MEAN DEGREE")?;
        writeln!(f, "Mean degree: {:.2}", self.mean_degree)?;
        header(f, "MEAN WEIGHT")?;
        match self.mean_weight {
            Some(weight) => writeln!(f, "Mean weight: {weight:.2}")?,
            None => writeln!(f, "Mean weight: n/a")?,
        }
        Ok(())
    }
}
