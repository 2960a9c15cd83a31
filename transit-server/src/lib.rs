//! Bus trip planner server.
//!
//! A web application that answers: "how do I get from here to there by
//! bus?" using a fixed route network and geocoded stop positions.

pub mod cache;
pub mod config;
pub mod domain;
pub mod planner;
pub mod routes;
pub mod service;
pub mod stations;
pub mod walkable;
pub mod web;
