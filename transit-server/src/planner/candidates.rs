//! Candidate stations near an arbitrary point.

use crate::domain::{Coordinates, Station};

/// Radius growth per step of the expanding search (km).
const RADIUS_STEP_KM: f64 = 1.0;

/// A station near a point.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub station: Station,
    pub distance_meters: u32,
}

/// Stations within `radius_km` of `point`, closest first.
///
/// Equal distances are ordered by station key.
pub fn within_radius(point: &Coordinates, stations: &[Station], radius_km: f64) -> Vec<Candidate> {
    let limit = radius_km * 1000.0;
    let mut found: Vec<Candidate> = by_distance(point, stations)
        .filter(|c| f64::from(c.distance_meters) <= limit)
        .collect();
    sort(&mut found);
    found
}

/// Up to `k` stations nearest to `point`.
///
/// Searches `start_radius_km` first. Only when nothing at all is found
/// does the radius grow, 1 km at a time, up to `max_radius_km`; if that
/// still finds nothing the globally nearest `k` stations are returned.
/// The result is empty only when `stations` is.
pub fn nearest(
    point: &Coordinates,
    stations: &[Station],
    k: usize,
    start_radius_km: f64,
    max_radius_km: f64,
) -> Vec<Candidate> {
    if k == 0 || stations.is_empty() {
        return Vec::new();
    }

    let mut radius = start_radius_km;
    loop {
        let mut found = within_radius(point, stations, radius);
        if !found.is_empty() {
            found.truncate(k);
            return found;
        }
        if radius >= max_radius_km {
            break;
        }
        radius = (radius + RADIUS_STEP_KM).min(max_radius_km);
    }

    let mut all: Vec<Candidate> = by_distance(point, stations).collect();
    sort(&mut all);
    all.truncate(k);
    all
}

fn by_distance<'a>(
    point: &'a Coordinates,
    stations: &'a [Station],
) -> impl Iterator<Item = Candidate> + 'a {
    stations.iter().map(move |station| Candidate {
        distance_meters: point.distance_meters(&station.coordinates()),
        station: station.clone(),
    })
}

fn sort(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        a.distance_meters
            .cmp(&b.distance_meters)
            .then_with(|| a.station.key().cmp(b.station.key()))
    });
}
