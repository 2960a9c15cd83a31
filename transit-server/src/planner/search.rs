//! Shortest-time trip search.
//!
//! Dijkstra over states `(node, last route ridden)`. Keeping the last
//! route in the state lets the search charge a transfer penalty when the
//! rider changes bus. Two synthetic nodes stand for the rider's raw
//! origin and destination: the origin connects to its candidate stations
//! by walking, and each destination candidate connects to the
//! destination the same way.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::domain::{Coordinates, RouteCode, Station, StationKey, Trip};
use crate::stations::StationIndex;
use crate::walkable::WalkingModel;

use super::candidates::{Candidate, nearest};
use super::config::PlannerConfig;
use super::graph::{GraphEdge, RouteGraph};
use super::legs::LegSynthesizer;

/// Why no trip could be planned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoRoute {
    /// One of the endpoints has no station near it.
    #[error("no stations near the {0}")]
    NoCandidateStations(Endpoint),

    /// The graph does not connect the endpoints.
    #[error("no path between origin and destination")]
    NoPathFound,
}

/// Which end of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Origin => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// A node of the search graph.
///
/// The derived order puts the origin first and the destination last,
/// with stations in key order between them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Node {
    Src,
    Station(StationKey),
    Dst,
}

/// `(node, last route ridden)`. `None` sorts before any route.
type State = (Node, Option<RouteCode>);

/// One step of a found path, in travel order.
#[derive(Debug, Clone, PartialEq)]
pub enum PathEdge {
    /// Walk from the origin to a station.
    WalkFromOrigin { to: Station, meters: u32 },
    /// Walk from a station to the destination.
    WalkToDestination { from: Station, meters: u32 },
    /// Ride one hop. `penalty_mins` is the transfer penalty paid to
    /// board this hop (0 when staying on the same route).
    Ride { edge: GraphEdge, penalty_mins: u32 },
}

/// Heap entry ordered for a min-heap on cost, then on state.
#[derive(Debug)]
struct Entry {
    cost: f64,
    state: State,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip both comparisons so BinaryHeap pops the smallest first
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.state.cmp(&self.state))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Trip planner over a route graph.
pub struct TripPlanner<'a> {
    graph: &'a RouteGraph,
    config: &'a PlannerConfig,
    walking: WalkingModel,
}

impl<'a> TripPlanner<'a> {
    pub fn new(graph: &'a RouteGraph, config: &'a PlannerConfig) -> Self {
        Self {
            graph,
            config,
            walking: config.walking(),
        }
    }

    /// Plan a trip between two raw positions.
    ///
    /// Picks candidate stations near each end, searches, and collapses
    /// the path into legs.
    pub fn plan(
        &self,
        stations: &StationIndex,
        origin: &Coordinates,
        destination: &Coordinates,
    ) -> Result<Trip, NoRoute> {
        let origins = self.candidates(stations, origin);
        let destinations = self.candidates(stations, destination);
        debug!(
            origins = origins.len(),
            destinations = destinations.len(),
            "Resolved candidate stations"
        );

        let path = self.search(&origins, &destinations)?;
        Ok(LegSynthesizer::new(self.walking, stations).synthesize(&path, origin, destination))
    }

    fn candidates(&self, stations: &StationIndex, point: &Coordinates) -> Vec<Candidate> {
        nearest(
            point,
            stations.stations(),
            self.config.k_nearest,
            self.config.search_radius_km,
            self.config.max_radius_km,
        )
    }

    /// Find the minimum-time path between two sets of candidate stations.
    ///
    /// The search is deterministic: equal-cost alternatives are resolved
    /// by state order, and a label is only replaced by a strictly
    /// cheaper one.
    pub fn search(
        &self,
        origins: &[Candidate],
        destinations: &[Candidate],
    ) -> Result<Vec<PathEdge>, NoRoute> {
        if origins.is_empty() {
            return Err(NoRoute::NoCandidateStations(Endpoint::Origin));
        }
        if destinations.is_empty() {
            return Err(NoRoute::NoCandidateStations(Endpoint::Destination));
        }

        let mut egress: HashMap<&StationKey, &Candidate> = HashMap::new();
        for candidate in destinations {
            egress.entry(candidate.station.key()).or_insert(candidate);
        }

        let mut dist: HashMap<State, f64> = HashMap::new();
        let mut prev: HashMap<State, (State, PathEdge)> = HashMap::new();
        let mut heap = BinaryHeap::new();

        let start: State = (Node::Src, None);
        dist.insert(start.clone(), 0.0);
        heap.push(Entry {
            cost: 0.0,
            state: start,
        });

        let mut settled = 0usize;

        while let Some(Entry { cost, state }) = heap.pop() {
            if cost > dist.get(&state).copied().unwrap_or(f64::INFINITY) {
                continue;
            }
            settled += 1;

            let (node, last) = &state;
            match node {
                Node::Dst => {
                    debug!(settled, minutes = cost, "Trip search finished");
                    return Ok(reconstruct(&prev, state.clone()));
                }
                Node::Src => {
                    for candidate in origins {
                        let next = (Node::Station(candidate.station.key().clone()), None);
                        let edge = PathEdge::WalkFromOrigin {
                            to: candidate.station.clone(),
                            meters: candidate.distance_meters,
                        };
                        let weight = self.walking.minutes_for(candidate.distance_meters);
                        relax(&mut dist, &mut prev, &mut heap, &state, next, cost + weight, edge);
                    }
                }
                Node::Station(key) => {
                    if let Some(candidate) = egress.get(key)
                        && (last.is_some() || self.config.allow_walk_only)
                    {
                        let next = (Node::Dst, last.clone());
                        let edge = PathEdge::WalkToDestination {
                            from: candidate.station.clone(),
                            meters: candidate.distance_meters,
                        };
                        let weight = self.walking.minutes_for(candidate.distance_meters);
                        relax(&mut dist, &mut prev, &mut heap, &state, next, cost + weight, edge);
                    }

                    for edge in self.graph.edges_from(key) {
                        let penalty_mins = match last {
                            Some(route) if route != &edge.route_code => {
                                self.config.transfer_penalty_mins
                            }
                            _ => 0,
                        };
                        let next = (
                            Node::Station(edge.to.clone()),
                            Some(edge.route_code.clone()),
                        );
                        let weight = f64::from(edge.minutes) + f64::from(penalty_mins);
                        let step = PathEdge::Ride {
                            edge: edge.clone(),
                            penalty_mins,
                        };
                        relax(&mut dist, &mut prev, &mut heap, &state, next, cost + weight, step);
                    }
                }
            }
        }

        debug!(settled, "Trip search exhausted");
        Err(NoRoute::NoPathFound)
    }
}

/// Replace the label of `next` if `cost` is strictly smaller.
fn relax(
    dist: &mut HashMap<State, f64>,
    prev: &mut HashMap<State, (State, PathEdge)>,
    heap: &mut BinaryHeap<Entry>,
    from: &State,
    next: State,
    cost: f64,
    edge: PathEdge,
) {
    let best = dist.get(&next).copied().unwrap_or(f64::INFINITY);
    if cost < best {
        dist.insert(next.clone(), cost);
        prev.insert(next.clone(), (from.clone(), edge));
        heap.push(Entry { cost, state: next });
    }
}

/// Walk predecessor links back from `end` and return edges in travel order.
fn reconstruct(prev: &HashMap<State, (State, PathEdge)>, end: State) -> Vec<PathEdge> {
    let mut path = Vec::new();
    let mut current = end;
    while let Some((from, edge)) = prev.get(&current) {
        path.push(edge.clone());
        current = from.clone();
    }
    path.reverse();
    path
}
