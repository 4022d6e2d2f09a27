//! # System Scenario Tests
//!
//! Builds the full default topology from a synthetic parameter table (every
//! node gets distinct, non-trivial numbers) and checks the tree-wide behaviour:
//! shape, exact inverses at every depth, and time updates without memory.

use crate::builder::{build_system, ParameterTable};
use crate::config::ModelConstants;
use crate::error::OrbitError;
use crate::system::{build_default_system, default_topology, BODIES};
use crate::time::{datetime_to_sim, sim_day, ts_to_sim};
use crate::transform::ORIGIN;
use crate::{positions, OrbitTree, Topology};
use glam::DVec4;
use serde_json::{json, Value};

const EPS: f64 = 1e-9;

fn names(topology: &Topology, out: &mut Vec<String>) {
    out.push(topology.name.clone());
    for child in &topology.orbits {
        names(child, out);
    }
}

/// One record per topology node, numbers derived from the node's position in
/// preorder so that no two orbits are alike.
fn synthetic_records(skip: &[&str]) -> Vec<Value> {
    let mut all = Vec::new();
    names(&default_topology(), &mut all);
    all.iter()
        .enumerate()
        .filter(|(_, name)| !skip.contains(&name.as_str()))
        .map(|(i, name)| {
            let k = i as f64;
            // Some records leave the z offset out entirely
            let center_c = if i % 3 == 0 { Value::Null } else { json!(k * 0.01) };
            let speed = if i % 2 == 0 { k * 0.9 } else { -k * 1.7 };
            json!({
                "name": name,
                "orbitCentera": (k * 0.37).sin() * 5.0,
                "orbitCenterb": (k * 0.91).cos() * 3.0,
                "orbitCenterc": center_c,
                "orbitTilta": k * 0.7 - 4.0,
                "orbitTiltb": -k * 0.3,
                "orbitRadius": 10.0 + k * 7.5,
                "startPos": k * 13.0,
                "speed": speed,
                "visible": i % 2 == 0,
            })
        })
        .collect()
}

fn default_system() -> OrbitTree {
    let table = ParameterTable::from_records(synthetic_records(&[]));
    build_default_system(&table).unwrap()
}

fn all_positions(tree: &OrbitTree) -> Vec<DVec4> {
    tree.preorder(tree.root())
        .into_iter()
        .map(|id| tree.transform(id, ORIGIN))
        .collect()
}

/// Test that building the default topology creates exactly one node per entry
/// and links the Moon through both of its deferents up to the root.
#[test]
fn default_system_has_one_node_per_topology_entry() {
    let tree = default_system();
    let topology = default_topology();

    assert_eq!(tree.len(), topology.count());
    assert_eq!(tree.map_names().len(), topology.count());
    assert_eq!(tree.name(tree.root()), "SystemCenter");

    let moon = tree.find("Moon").unwrap();
    let chain: Vec<&str> = tree.ancestors(moon).map(|id| tree.name(id)).collect();
    assert_eq!(
        chain,
        ["Moon", "Moon deferent B", "Moon deferent A", "Earth", "SystemCenter"]
    );
}

/// Test that `itransform` undoes `transform` for every node at several times,
/// including negative and far-future ones.
#[test]
fn itransform_inverts_transform_at_every_node() {
    let mut tree = default_system();
    let vectors = [
        ORIGIN,
        DVec4::new(1.0, -2.0, 3.0, 1.0),
        DVec4::new(250.0, 125.0, -60.0, 1.0),
    ];
    for t in [0.0, 0.5, -12.25, 300.0] {
        tree.set_time(t);
        for id in tree.preorder(tree.root()) {
            for v in vectors {
                let back = tree.itransform(id, tree.transform(id, v));
                assert!(
                    back.abs_diff_eq(v, EPS),
                    "{} at t={t}: {v:?} came back as {back:?}",
                    tree.name(id)
                );
            }
        }
    }
}

/// Test that setting the same time twice leaves every position unchanged.
#[test]
fn set_time_is_idempotent() {
    let mut tree = default_system();
    tree.set_time(7.3);
    let first = all_positions(&tree);
    tree.set_time(7.3);
    assert_eq!(all_positions(&tree), first);
}

/// Test that positions depend only on the last time set, not on the times
/// visited before it.
#[test]
fn set_time_has_no_path_dependence() {
    let mut direct = default_system();
    direct.set_time(1.5);

    let mut wandering = default_system();
    wandering.set_time(1.5).set_time(-400.0).set_time(0.001).set_time(1.5);

    assert_eq!(all_positions(&wandering), all_positions(&direct));
}

/// Test that the builder flips the sign of speed, tilt and start position and
/// converts degrees to radians.
#[test]
fn builder_negates_speed_tilt_and_start() {
    let table = ParameterTable::from_records(vec![json!({
        "name": "Solo",
        "orbitTilta": 10.0,
        "orbitTiltb": -20.0,
        "orbitRadius": 1.0,
        "startPos": 90.0,
        "speed": 2.0,
    })]);
    let tree = build_system(&Topology::leaf("Solo"), &table).unwrap();
    let orbit = tree.orbit(tree.root());

    assert_eq!(orbit.speed(), -2.0);
    assert!((orbit.phase_offset() + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    // Built in its t = 0 state: angle = -phase_offset = +90 degrees
    assert!((orbit.angle() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

    let params = table.get("Solo").unwrap().unwrap();
    let tilt = params.effective_tilt();
    assert!((tilt.x + 10f64.to_radians()).abs() < 1e-12);
    assert!((tilt.y - 20f64.to_radians()).abs() < 1e-12);
}

/// Test that a topology leaf without a parameter record aborts the build with
/// `MissingParameters` naming that body.
#[test]
fn missing_body_fails_the_build() {
    let table = ParameterTable::from_records(synthetic_records(&["Eros"]));
    assert_eq!(
        build_default_system(&table).unwrap_err(),
        OrbitError::MissingParameters("Eros".to_string())
    );
}

/// Test that a non-leaf without a record becomes a zero pass-through node and
/// its descendants still get positions.
#[test]
fn missing_root_becomes_pass_through() {
    let table = ParameterTable::from_records(synthetic_records(&["SystemCenter"]));
    let mut tree = build_default_system(&table).unwrap();
    tree.set_time(3.0);
    assert_eq!(tree.pos(tree.root()), glam::DVec3::ZERO);
    assert!(tree.position_of("Mars").is_some());
}

/// Test that a body on a plain circle stays at its radius in the ecliptic and
/// returns to its start after one simulated year.
#[test]
fn sun_keeps_its_distance_from_the_sun_deferent() {
    let table = ParameterTable::from_records(vec![
        json!({ "name": "Center", "orbitRadius": 0, "startPos": 0, "speed": 0 }),
        json!({ "name": "Sun", "orbitRadius": 100.0, "startPos": 0, "speed": 6.283185307179586 }),
    ]);
    let topology = Topology::with_orbits("Center", vec![Topology::leaf("Sun")]);
    let mut tree = build_system(&topology, &table).unwrap();

    let c = ModelConstants::default();
    for days in [0.0, 91.0, 182.6, 365.2425] {
        tree.set_time(days * sim_day(&c));
        let sun = tree.position_of("Sun").unwrap();
        assert!((sun.length() - 100.0).abs() < 1e-9);
        assert!(sun.z.abs() < 1e-9);
    }

    // A full year brings the Sun back to its start
    tree.set_time(0.0);
    let start = tree.position_of("Sun").unwrap();
    tree.set_time(1.0);
    assert!(tree.position_of("Sun").unwrap().abs_diff_eq(start, 1e-9));
}

/// Test that one tropical year after the model epoch is simulation time 1.0,
/// from both a raw timestamp and a chrono date.
#[test]
fn one_tropical_year_after_epoch_is_one_unit() {
    let c = ModelConstants::default();
    let ts = c.epoch.timestamp() as f64 + 365.2425 * 86_400.0;
    assert!((ts_to_sim(&c, ts) - 1.0).abs() < 1e-12);

    let dt = c.epoch + chrono::Duration::seconds((365.2425 * 86_400.0) as i64);
    assert!((datetime_to_sim(&c, dt) - 1.0).abs() < 1e-12);
}

/// Test that `positions` skips unknown names and reports the same numbers as
/// `position_of`.
#[test]
fn positions_report_known_bodies_only() {
    let mut tree = default_system();
    tree.set_time(0.25);

    let rows = positions(&tree, BODIES.iter().copied().chain(["Vulcan"]));
    assert_eq!(rows.len(), BODIES.len());
    assert_eq!(rows[0].name, "Earth");

    let mars = rows.iter().find(|r| r.name == "Mars").unwrap();
    let expected = tree.position_of("Mars").unwrap();
    assert_eq!((mars.x, mars.y, mars.z), (expected.x, expected.y, expected.z));
    assert!((mars.distance - expected.length()).abs() < 1e-12);
}

/// Test that detaching the root's children hides every detached body from
/// lookups, so no stale position is reported after the clock moves on.
#[test]
fn detached_bodies_have_no_position() {
    let mut tree = default_system();
    tree.set_time(1.0);
    assert!(tree.position_of("Sun").is_some());

    let root = tree.root();
    tree.set_children(root, vec![]).unwrap();
    tree.set_time(5.0);

    assert_eq!(tree.map_names().len(), 1);
    assert_eq!(tree.position_of("Sun"), None);
    assert_eq!(tree.find("Moon"), None);
    assert!(
        positions(&tree, BODIES.iter().copied()).is_empty(),
        "detached bodies must not be reported"
    );
    // Nodes stay in the arena
    assert_eq!(tree.len(), default_topology().count());
}
