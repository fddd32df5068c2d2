//! End-to-end pass over a provisioned data directory: preload, filter,
//! assemble layers, export GeoJSON.

use std::path::Path;

use serde_json::json;

use urbanview_datatypes::primitives::PathAccess;
use urbanview_services::cache::CachingPathDecoder;
use urbanview_services::datasets::{Dataset, DatasetStore};
use urbanview_services::views::{
    self, ClientFilter, HotspotParams, PatternGroups, RouteComparison, RouteKind,
};

fn line_string_hex(coordinates: &[(f64, f64)]) -> String {
    let mut bytes = vec![1u8]; // little endian
    bytes.extend_from_slice(&2u32.to_le_bytes());
    bytes.extend_from_slice(&(coordinates.len() as u32).to_le_bytes());
    for &(x, y) in coordinates {
        bytes.extend_from_slice(&x.to_le_bytes());
        bytes.extend_from_slice(&y.to_le_bytes());
    }
    hex::encode(bytes)
}

fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
    std::fs::write(dir.join(name), value.to_string()).unwrap();
}

fn provision() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();

    write_json(
        dir.path(),
        "astar_routes.json",
        json!([
            {"client_id": "c1", "path": line_string_hex(&[(18.00, 59.30), (18.02, 59.31)])},
            {"client_id": "c2", "path": line_string_hex(&[(18.05, 59.33), (18.06, 59.34)])},
            {"client_id": "c2", "path": "not-decodable"},
        ]),
    );

    write_json(
        dir.path(),
        "mapf_routes.json",
        json!([
            {"client_id": "c1", "path": line_string_hex(&[(18.00, 59.30), (18.01, 59.32)])},
        ]),
    );

    write_json(
        dir.path(),
        "user_patterns.json",
        json!([
            {"client_id": "c1", "pattern_type": "commuter", "lat": 59.30, "lon": 18.00},
            {"client_id": "c2", "pattern_type": "commuter", "lat": 59.33, "lon": 18.05},
            {"client_id": "c3", "pattern_type": "wanderer", "lat": 59.40, "lon": 18.10},
        ]),
    );

    write_json(
        dir.path(),
        "view_latest_client_trajectories.json",
        json!([
            {"client_id": "c1", "created_at": "2025-05-02 07:55:00", "trajectory": [
                {"lat": 59.30, "lon": 18.00},
                {"lat": 59.31, "lon": 18.01},
            ]},
            {"client_id": "c3", "created_at": "2025-05-03 09:00:00", "trajectory": []},
        ]),
    );

    write_json(
        dir.path(),
        "hotspots.json",
        json!([
            {"lat": 59.30, "lon": 18.00, "updated_at": "2025-05-02 08:01:00"},
            {"lat": 59.31, "lon": 18.01, "updated_at": "2025-05-02 08:06:00"},
        ]),
    );

    write_json(
        dir.path(),
        "stop_points.json",
        json!([
            {"name": "Central", "type": "metro", "lat": 59.305, "lon": 18.005},
            {"name": "Harbor", "type": "bus", "lat": 59.40, "lon": 18.20},
        ]),
    );

    write_json(
        dir.path(),
        "predicted_pois_sequence.json",
        json!([
            {"client_id": "c1", "predicted_lat": 59.35, "predicted_lon": 18.07},
        ]),
    );

    write_json(
        dir.path(),
        "lines.json",
        json!([
            {"content": {"id": "L1", "name": "Blue", "transport_mode": "metro",
                         "contractor": {"name": "Acme Transit"}}},
            {"content": {"id": "L2", "name": "Four", "transport_mode": "bus",
                         "contractor": {"name": "Acme Transit"}}},
        ]),
    );

    write_json(
        dir.path(),
        "view_sites_with_stop_areas.json",
        json!([
            {"geometry": "POINT (18.0 59.3)", "site": "s1"},
        ]),
    );

    // view_top_daily_poi.json is intentionally missing

    dir
}

#[test]
fn preload_and_assemble_all_layers() {
    let dir = provision();
    let store = DatasetStore::preload(dir.path());

    // the missing export is an empty table, not a failure
    assert!(store.table(Dataset::ViewTopDailyPoi).is_empty());

    let decoder = CachingPathDecoder::new();
    let routes = views::path_layer(store.table(Dataset::AstarRoutes), &decoder).unwrap();
    assert_eq!(routes.len(), 2); // the undecodable row is dropped

    let patterns =
        views::point_layer(store.table(Dataset::UserPatterns)).unwrap();
    assert_eq!(patterns.len(), 3);

    let predicted =
        views::point_layer(store.table(Dataset::PredictedPoisSequence)).unwrap();
    assert_eq!(predicted.len(), 1);
    assert_eq!(predicted.geometries()[0], (18.07, 59.35).into());

    let sites = views::point_layer(store.table(Dataset::ViewSitesWithStopAreas)).unwrap();
    assert_eq!(sites.len(), 1);

    let geo_json = routes.to_geo_json();
    assert!(geo_json.contains("\"FeatureCollection\""));
    assert!(geo_json.contains("\"client_id\":\"c1\""));
}

#[test]
fn filtered_route_comparison() {
    let dir = provision();
    let store = DatasetStore::preload(dir.path());

    let groups = PatternGroups::from_table(store.table(Dataset::UserPatterns)).unwrap();
    let filter = groups.filter_for("commuter", Some("c1")).unwrap();

    let decoder = CachingPathDecoder::new();
    let comparison = RouteComparison::assemble(&store, Some(&filter), &decoder).unwrap();

    assert_eq!(comparison.astar.len(), 1);
    assert_eq!(comparison.mapf.len(), 1);
    assert_eq!(comparison.trajectories.len(), 1);

    let kinds: Vec<RouteKind> = comparison.layers().map(|(kind, _)| kind).collect();
    assert_eq!(
        kinds,
        vec![RouteKind::Astar, RouteKind::Mapf, RouteKind::Trajectory]
    );
}

#[test]
fn hotspot_bucketing_over_loaded_data() {
    let dir = provision();
    let store = DatasetStore::preload(dir.path());

    let dates = views::available_dates(
        store.table(Dataset::ViewLatestClientTrajectories),
        "created_at",
    )
    .unwrap();
    assert_eq!(dates.len(), 2);

    let buckets = views::hotspot_buckets(
        store.table(Dataset::Hotspots),
        dates[0],
        &HotspotParams::default(),
    )
    .unwrap();

    assert_eq!(buckets.len(), 2);
    assert!(buckets.iter().all(|bucket| bucket.points.len() == 1));
}

#[test]
fn infrastructure_views() {
    let dir = provision();
    let store = DatasetStore::preload(dir.path());

    let flat = views::flatten_lines_content(store.table(Dataset::Lines)).unwrap();
    assert_eq!(
        views::transport_modes(&flat).unwrap(),
        vec!["bus", "metro"]
    );
    assert_eq!(views::filter_by_transport_mode(&flat, "metro").unwrap().len(), 1);

    let patterns = views::point_layer(store.table(Dataset::UserPatterns)).unwrap();
    let stops = views::point_layer(store.table(Dataset::StopPoints)).unwrap();

    let connectors = views::nearest_stop_connectors(&patterns, &stops).unwrap();
    assert_eq!(connectors.len(), 3);

    // the first pattern point is closest to the central stop
    assert_eq!(
        connectors[0].coordinates()[1],
        (18.005, 59.305).into()
    );
}

#[test]
fn client_filter_passes_unscoped_tables() {
    let dir = provision();
    let store = DatasetStore::preload(dir.path());

    let filter = ClientFilter::new(["c1".to_string()]);
    let stops = filter.apply(store.table(Dataset::StopPoints)).unwrap();

    assert_eq!(stops.len(), 2);
}
