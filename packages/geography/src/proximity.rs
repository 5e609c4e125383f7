//! Radius filtering and distance ranking.

use shamba_geography_models::{LocationPoint, NearbyCandidate, ProximityCandidate};

use crate::GeoError;
use crate::distance::haversine_distance;

/// Returns the candidates within `radius_meters` of `origin`, nearest
/// first.
///
/// Candidates without a location are skipped. Filtering and ordering use
/// the unrounded distance; candidates at equal distance keep their input
/// order (the sort is stable and there is no secondary key).
///
/// # Errors
///
/// Returns [`GeoError::InvalidRadius`] if the radius is negative or not
/// finite.
pub fn find_nearby<I>(
    origin: &LocationPoint,
    candidates: I,
    radius_meters: f64,
) -> Result<Vec<ProximityCandidate>, GeoError>
where
    I: IntoIterator<Item = NearbyCandidate>,
{
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        return Err(GeoError::InvalidRadius { radius_meters });
    }

    let mut skipped = 0usize;
    let mut matches: Vec<ProximityCandidate> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let Some(location) = candidate.location else {
                skipped += 1;
                return None;
            };
            let distance_meters = haversine_distance(origin, &location);
            (distance_meters <= radius_meters).then(|| ProximityCandidate {
                id: candidate.id,
                display_name: candidate.display_name,
                location,
                distance_meters,
            })
        })
        .collect();

    matches.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));

    log::debug!(
        "find_nearby: {} within {radius_meters}m, {skipped} without location",
        matches.len()
    );

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> LocationPoint {
        LocationPoint::new(lat, lng).unwrap()
    }

    fn candidate(id: &str, location: Option<LocationPoint>) -> NearbyCandidate {
        NearbyCandidate {
            id: id.to_string(),
            display_name: format!("Farm {id}"),
            location,
        }
    }

    #[test]
    fn includes_within_radius() {
        let origin = point(0.0, 0.0);
        let found = find_nearby(
            &origin,
            vec![candidate("east", Some(point(0.0, 0.001)))],
            200.0,
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert!((found[0].distance_meters - 111.19).abs() < 0.01);
        assert_eq!(found[0].display_distance_meters(), 111);
    }

    #[test]
    fn excludes_beyond_radius() {
        let origin = point(0.0, 0.0);
        let found = find_nearby(
            &origin,
            vec![candidate("east", Some(point(0.0, 0.001)))],
            50.0,
        )
        .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn skips_candidates_without_location() {
        let origin = point(0.0, 0.0);
        let found = find_nearby(
            &origin,
            vec![
                candidate("a", None),
                candidate("b", Some(point(0.0, 0.0))),
                candidate("c", None),
            ],
            f64::MAX,
        )
        .unwrap();
        let ids: Vec<&str> = found.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn orders_nearest_first_with_stable_ties() {
        let origin = point(0.0, 0.0);
        let found = find_nearby(
            &origin,
            vec![
                candidate("far", Some(point(0.0, 0.003))),
                candidate("north", Some(point(0.001, 0.0))),
                candidate("near", Some(point(0.0, 0.0005))),
                candidate("south", Some(point(-0.001, 0.0))),
            ],
            1_000.0,
        )
        .unwrap();
        let ids: Vec<&str> = found.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "north", "south", "far"]);

        let reordered = find_nearby(
            &origin,
            vec![
                candidate("south", Some(point(-0.001, 0.0))),
                candidate("north", Some(point(0.001, 0.0))),
            ],
            1_000.0,
        )
        .unwrap();
        let ids: Vec<&str> = reordered.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["south", "north"]);
    }

    #[test]
    fn boundary_distance_is_inclusive() {
        let origin = point(0.0, 0.0);
        let target = point(0.0, 0.001);
        let exact = haversine_distance(&origin, &target);
        let found = find_nearby(&origin, vec![candidate("edge", Some(target))], exact).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn never_returns_anything_beyond_radius() {
        let origin = point(-0.3031, 36.08);
        let candidates: Vec<NearbyCandidate> = (0..200)
            .map(|i| {
                let offset = f64::from(i) * 0.000_7;
                let location = (i % 7 != 0).then(|| point(-0.3031 + offset, 36.08 - offset));
                candidate(&i.to_string(), location)
            })
            .collect();

        let radius = 5_000.0;
        let found = find_nearby(&origin, candidates, radius).unwrap();
        assert!(!found.is_empty());
        for c in &found {
            assert!(haversine_distance(&origin, &c.location) <= radius);
        }
        assert!(found.windows(2).all(|w| w[0].distance_meters <= w[1].distance_meters));
    }

    #[test]
    fn rejects_bad_radius() {
        let origin = point(0.0, 0.0);
        for radius in [-1.0, f64::NAN, f64::INFINITY] {
            let err = find_nearby(&origin, Vec::new(), radius).unwrap_err();
            assert!(matches!(err, GeoError::InvalidRadius { .. }));
        }
    }
}
