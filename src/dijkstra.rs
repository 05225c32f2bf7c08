use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{self, AtomicBool};
use std::time::{Duration, Instant};

use log::{debug, trace};
use serde::Deserialize;

use crate::network::{Network, StationId, StationIndex, Weight};
use crate::path::{Path, PathError, PathResult};
use crate::profile::WeightProfile;

/// How the next station to settle is chosen.
///
/// Both strategies settle stations in the same order: smallest tentative distance first,
/// ties going to the smallest station id. They therefore return identical paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SearchStrategy {
    /// Scan every unvisited station each iteration, O(V²).
    #[default]
    LinearScan,
    /// Priority queue with lazy deletion, O((V + E) log V).
    BinaryHeap,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct QueryOptions<'a> {
    pub profile: WeightProfile,
    pub strategy: SearchStrategy,
    pub deadline: Option<Instant>,
    pub cancel: Option<&'a AtomicBool>,
}

impl<'a> QueryOptions<'a> {
    pub fn with_profile(mut self, profile: WeightProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancel(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn check_interrupted(&self) -> Result<(), PathError> {
        let cancelled = self.cancel.is_some_and(|flag| flag.load(atomic::Ordering::Relaxed));
        let expired = self.deadline.is_some_and(|deadline| Instant::now() >= deadline);
        if cancelled || expired {
            Err(PathError::Cancelled)
        } else {
            Ok(())
        }
    }
}

// Working state of a single query.
struct SearchState {
    distance: Vec<Weight>,
    predecessor: Vec<Option<StationIndex>>,
    settled: usize,
}

impl SearchState {
    fn new(num_stations: usize, source: StationIndex) -> Self {
        let mut distance = vec![Weight::INFINITY; num_stations];
        distance[source] = 0.;
        Self { distance, predecessor: vec![None; num_stations], settled: 0 }
    }

    // Relax every connection leaving `u`, reporting each improved station.
    fn relax(&mut self, network: &Network, u: StationIndex, profile: WeightProfile, mut on_improved: impl FnMut(StationIndex, Weight)) {
        self.settled += 1;
        let base = self.distance[u];
        for (w, connection) in network.out_edges_of(u) {
            let candidate = base + connection.weight_for(profile);
            if candidate < self.distance[w] {
                self.distance[w] = candidate;
                self.predecessor[w] = Some(u);
                on_improved(w, candidate);
            }
        }
    }

    fn into_path(self, network: &Network, source: StationIndex, target: StationIndex, profile: WeightProfile) -> PathResult<'_> {
        let total_weight = self.distance[target];
        if total_weight.is_infinite() {
            return Err(PathError::PathNotFound {
                start: network.stations[source].id,
                end: network.stations[target].id,
            });
        }

        // Reconstruct from predecessor links.
        let mut stations = Vec::new();
        let mut current = Some(target);
        while let Some(idx) = current {
            stations.push(network.stations[idx].id);
            if idx == source {
                break;
            }
            current = self.predecessor[idx];
        }
        stations.reverse();
        debug_assert_eq!(stations.first(), Some(&network.stations[source].id));

        Ok(Path::new(stations, total_weight, profile, network))
    }
}

/// Minimum-weight path from `source` to `target` using each connection's `weight`.
pub fn shortest_path(network: &Network, source: StationId, target: StationId) -> PathResult<'_> {
    shortest_path_with(network, source, target, &QueryOptions::default())
}

pub fn shortest_path_with<'a>(network: &'a Network, source: StationId, target: StationId, options: &QueryOptions<'_>) -> PathResult<'a> {
    let source_idx = network.index_of(source).ok_or(PathError::NodeNotFound(source))?;
    let target_idx = network.index_of(target).ok_or(PathError::NodeNotFound(target))?;

    if source_idx == target_idx {
        return Ok(Path::new(vec![source], 0., options.profile, network));
    }

    let state = match options.strategy {
        SearchStrategy::LinearScan => linear_scan(network, source_idx, target_idx, options)?,
        SearchStrategy::BinaryHeap => binary_heap(network, source_idx, target_idx, options)?,
    };
    debug!(
        "Query {source} -> {target} ({:?}, {}) settled {} of {} stations.",
        options.strategy,
        options.profile,
        state.settled,
        network.num_stations()
    );

    state.into_path(network, source_idx, target_idx, options.profile)
}

fn linear_scan(network: &Network, source: StationIndex, target: StationIndex, options: &QueryOptions<'_>) -> Result<SearchState, PathError> {
    let mut state = SearchState::new(network.num_stations(), source);

    // Kept in ascending id order so the first strict minimum found is the smallest id among ties.
    let mut unvisited: Vec<StationIndex> = (0..network.num_stations()).collect();
    unvisited.sort_unstable_by_key(|&idx| network.stations[idx].id);

    while !unvisited.is_empty() {
        options.check_interrupted()?;

        let mut best: Option<(usize, Weight)> = None;
        for (position, &idx) in unvisited.iter().enumerate() {
            let distance = state.distance[idx];
            if distance < best.map_or(Weight::INFINITY, |(_, best_distance)| best_distance) {
                best = Some((position, distance));
            }
        }

        // Only unreachable stations remain.
        let Some((position, distance)) = best else {
            break;
        };

        let u = unvisited.remove(position);
        trace!("Settled station {} at {distance}.", network.stations[u].id);
        if u == target {
            break;
        }
        state.relax(network, u, options.profile, |_, _| {});
    }

    Ok(state)
}

#[derive(Clone, Copy)]
struct QueueEntry {
    distance: Weight,
    station: StationId,
    idx: StationIndex,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on (distance, station id), reversed from the standard BinaryHeap.
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.station.cmp(&self.station))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

fn binary_heap(network: &Network, source: StationIndex, target: StationIndex, options: &QueryOptions<'_>) -> Result<SearchState, PathError> {
    let mut state = SearchState::new(network.num_stations(), source);
    let mut visited = vec![false; network.num_stations()];

    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry { distance: 0., station: network.stations[source].id, idx: source });

    while let Some(QueueEntry { distance, idx, .. }) = heap.pop() {
        options.check_interrupted()?;

        // Stale entry.
        if visited[idx] || distance > state.distance[idx] {
            continue;
        }

        visited[idx] = true;
        trace!("Settled station {} at {distance}.", network.stations[idx].id);
        if idx == target {
            break;
        }
        state.relax(network, idx, options.profile, |w, candidate| {
            heap.push(QueueEntry { distance: candidate, station: network.stations[w].id, idx: w });
        });
    }

    Ok(state)
}
