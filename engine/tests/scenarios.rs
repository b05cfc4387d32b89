//! End-to-end scenarios S1-S6 from spec §8, run against the public
//! `optimize_paths`/`update_cable_length` entry points.

use tray_router_engine::cancel::CancellationToken;
use tray_router_engine::engine::{optimize_paths, update_cable_length};
use tray_router_engine::model::{CableStatus, Point};

#[test]
fn s1_two_machines_single_l_shaped_path() {
    let layout = testing_utils::scenario_s1_two_machines();
    let response = optimize_paths(&layout, &CancellationToken::never()).unwrap();

    assert!(response.unrouted_cables.is_empty());
    let route = response.cable_routes.get("cab-1").expect("cab-1 routed");
    assert_eq!(route.first(), Some(&Point::new(1, 1)));
    assert_eq!(route.last(), Some(&Point::new(8, 8)));
    assert_eq!(route.len(), 15); // 14 unit steps
    assert!(response.steiner_points.is_empty());
    assert_eq!(response.hanan_grid.x_coords, vec![1, 8]);
    assert_eq!(response.hanan_grid.y_coords, vec![1, 8]);
}

#[test]
fn s2_shared_trunk_connects_all_three_cables() {
    let layout = testing_utils::scenario_s2_shared_trunk();
    let response = optimize_paths(&layout, &CancellationToken::never()).unwrap();

    assert!(response.unrouted_cables.is_empty());
    for label in ["ab", "ac", "bc"] {
        assert!(response.cable_routes.contains_key(label), "{label} should be routed");
    }
    // Some junction work was done: either an explicit Steiner point or at
    // least one trunk section shared by more than one cable.
    let shared_trunk_exists = response.sections.iter().any(|s| s.cables.len() > 1);
    assert!(shared_trunk_exists, "expected at least one section shared by two cables");
}

#[test]
fn s3_route_passes_through_the_perforation() {
    let layout = testing_utils::scenario_s3_wall_with_perforation();
    let response = optimize_paths(&layout, &CancellationToken::never()).unwrap();

    assert!(response.unrouted_cables.is_empty());
    let route = response.cable_routes.get("ab").expect("ab routed");
    assert!(route.contains(&Point::new(5, 5)), "route must pass through the perforation at (5,5)");
}

#[test]
fn s4_two_networks_get_disjoint_sections() {
    let layout = testing_utils::scenario_s4_two_networks();
    let response = optimize_paths(&layout, &CancellationToken::never()).unwrap();

    assert!(response.unrouted_cables.is_empty());
    let n1_sections: Vec<_> = response.sections.iter().filter(|s| s.network == "N1").collect();
    let n2_sections: Vec<_> = response.sections.iter().filter(|s| s.network == "N2").collect();
    assert!(!n1_sections.is_empty() && !n2_sections.is_empty());
    for s1 in &n1_sections {
        for s2 in &n2_sections {
            assert!(
                s1.points != s2.points,
                "networks must never share a section even when routed adjacently"
            );
        }
    }
}

#[test]
fn s5_insufficient_length_then_cleared() {
    let layout = testing_utils::scenario_s5_insufficient_length();
    let response = optimize_paths(&layout, &CancellationToken::never()).unwrap();
    let entry = response.problematic_cables.iter().find(|p| p.cable_label == "ab").unwrap();
    assert_eq!(entry.route_length, 2.0);
    assert_eq!(entry.theoretical_min_length, 2.0);
    assert_eq!(entry.excess_length, 1.0);
    assert_eq!(entry.excess_percentage, 100.0);
    assert_eq!(entry.status, CableStatus::Error);

    let cleared = update_cable_length(&layout, "ab", 3.5, &CancellationToken::never()).unwrap();
    // Cleared to `Good`: no longer over-length, so it drops out of
    // `problematicCables` entirely (spec §4.6 step 6 / §4.7).
    assert!(cleared.problematic_cables.iter().all(|p| p.cable_label != "ab"));
}

#[test]
fn s6_cancellation_returns_no_partial_result() {
    let layout = testing_utils::scenario_s2_shared_trunk();
    let token = CancellationToken::new();
    token.cancel();
    let result = optimize_paths(&layout, &token);
    assert!(result.is_err());

    // Reinvoking the same request after cancellation still returns the
    // full deterministic result (spec §8 S6).
    let response = optimize_paths(&layout, &CancellationToken::never()).unwrap();
    assert!(response.unrouted_cables.is_empty());
}

#[test]
fn determinism_same_request_yields_same_response() {
    let layout = testing_utils::scenario_s2_shared_trunk();
    let first = optimize_paths(&layout, &CancellationToken::never()).unwrap();
    let second = optimize_paths(&layout, &CancellationToken::never()).unwrap();

    let mut first_routes: Vec<_> = first.cable_routes.iter().collect();
    let mut second_routes: Vec<_> = second.cable_routes.iter().collect();
    first_routes.sort();
    second_routes.sort();
    assert_eq!(first_routes, second_routes);
    assert_eq!(first.steiner_points, second.steiner_points);
}

#[test]
fn update_cable_length_is_idempotent() {
    let layout = testing_utils::scenario_s5_insufficient_length();
    // 1.5m keeps the cable over-length (route is 2.0m) so it stays in
    // `problematicCables` across both invocations.
    let once = update_cable_length(&layout, "ab", 1.5, &CancellationToken::never()).unwrap();
    let twice_layout_a = update_cable_length(&layout, "ab", 1.5, &CancellationToken::never()).unwrap();
    assert_eq!(once.problematic_cables.len(), twice_layout_a.problematic_cables.len());
    let once_entry = once.problematic_cables.iter().find(|p| p.cable_label == "ab").unwrap();
    let twice_entry = twice_layout_a.problematic_cables.iter().find(|p| p.cable_label == "ab").unwrap();
    assert_eq!(once_entry.status, twice_entry.status);
    assert_eq!(once_entry.route_length, twice_entry.route_length);
}
