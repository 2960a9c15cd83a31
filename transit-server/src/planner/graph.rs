//! Directed route graph.
//!
//! Every pair of consecutive stops on a route direction becomes one edge.
//! Parallel edges from different routes are all kept, so the search can
//! tell which route a ride is on.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::{Route, RouteCode, StationKey};

/// One ride between consecutive stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: StationKey,
    pub to: StationKey,
    pub route_code: RouteCode,
    pub route_name: String,
    /// Whole minutes, at least 1.
    pub minutes: u32,
    /// Stop names as written on the route.
    pub from_display: String,
    pub to_display: String,
}

/// Adjacency lists keyed by station, in build order.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    adjacency: HashMap<StationKey, Vec<GraphEdge>>,
    names: HashMap<StationKey, String>,
    edge_count: usize,
}

impl RouteGraph {
    /// Build the graph from a route list.
    pub fn build(routes: &[Route]) -> Self {
        let mut builder = RouteGraphBuilder::default();
        for route in routes {
            builder.add_route(route);
        }
        builder.finish()
    }

    /// Outgoing edges from a station. Unknown stations have none.
    pub fn edges_from(&self, key: &StationKey) -> &[GraphEdge] {
        self.adjacency.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Stop name first seen for a key.
    pub fn display_name(&self, key: &StationKey) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    /// Distinct stations appearing on any edge.
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

/// Incremental graph construction.
#[derive(Debug, Default)]
pub struct RouteGraphBuilder {
    graph: RouteGraph,
}

impl RouteGraphBuilder {
    /// Add both directions of a route.
    ///
    /// A direction with fewer than two stops adds nothing.
    pub fn add_route(&mut self, route: &Route) -> &mut Self {
        for (_, stops) in route.directions() {
            if stops.len() < 2 {
                continue;
            }
            let minutes = per_hop_minutes(route.trip_duration_minutes, stops.len());

            for pair in stops.windows(2) {
                let (from_display, to_display) = (&pair[0], &pair[1]);
                let from = StationKey::from_name(from_display);
                let to = StationKey::from_name(to_display);

                self.remember(&from, from_display);
                self.remember(&to, to_display);

                self.graph
                    .adjacency
                    .entry(from.clone())
                    .or_default()
                    .push(GraphEdge {
                        from,
                        to,
                        route_code: route.code.clone(),
                        route_name: route.name.clone(),
                        minutes,
                        from_display: from_display.clone(),
                        to_display: to_display.clone(),
                    });
                self.graph.edge_count += 1;
            }
        }
        self
    }

    pub fn finish(self) -> RouteGraph {
        debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            "Built route graph"
        );
        self.graph
    }

    fn remember(&mut self, key: &StationKey, name: &str) {
        if !self.graph.names.contains_key(key) {
            self.graph.names.insert(key.clone(), name.to_string());
        }
    }
}

/// Minutes per hop: the trip duration spread evenly, at least 1.
fn per_hop_minutes(trip_duration_minutes: u32, stop_count: usize) -> u32 {
    let hops = stop_count.saturating_sub(1).max(1) as f64;
    ((f64::from(trip_duration_minutes) / hops).round() as u32).max(1)
}

/// A route list together with the graph built from it.
#[derive(Debug, Clone)]
pub struct RouteNetwork {
    pub routes: Arc<Vec<Route>>,
    pub graph: Arc<RouteGraph>,
}

impl RouteNetwork {
    pub fn new(routes: Arc<Vec<Route>>) -> Self {
        let graph = Arc::new(RouteGraph::build(&routes));
        Self { routes, graph }
    }
}
