//! Trip planner using Dijkstra search over a route graph.
//!
//! This module implements the core planning algorithm that answers:
//! "How do I get from this point to that point by bus?"
//!
//! Routes become a directed graph of stop-to-stop hops. Each raw endpoint
//! is attached to its nearest stations by walking, and the search finds
//! the minimum-time path, charging a penalty for each change of route.

mod candidates;
mod config;
mod direct;
mod graph;
mod legs;
mod search;


pub use candidates::{Candidate, nearest, within_radius};
pub use config::PlannerConfig;
pub use direct::{DirectMatch, direct_matches};
pub use graph::{GraphEdge, RouteGraph, RouteGraphBuilder, RouteNetwork};
pub use legs::LegSynthesizer;
pub use search::{Endpoint, NoRoute, PathEdge, TripPlanner};
