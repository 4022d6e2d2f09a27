//! # System Builder
//!
//! Turns a [`Topology`] (names and nesting only) and a [`ParameterTable`]
//! (numbers per body) into a live [`OrbitTree`].
//!
//! ## Parameter records
//!
//! The upstream table is a JSON array of objects. Only these fields matter here:
//!
//! | field | unit | default |
//! |---|---|---|
//! | `name` | | required |
//! | `orbitCentera/b/c` | scene length | 0 |
//! | `orbitTilta/b/c` | degrees | 0 |
//! | `orbitRadius` | scene length | required |
//! | `startPos` | degrees | required |
//! | `speed` | radians per simulation year | required |
//!
//! Every other field (colours, sizes, labels, ...) is ignored. Records are read
//! field by field so a quirk in an unrelated field or body never poisons the
//! whole table; validation errors are kept per body and only surface when that
//! body is actually built.
//!
//! ## Handedness
//!
//! The source data treats clockwise as positive. Tilt, start position and speed
//! are converted to radians and then negated before the orbits are built.

use crate::error::OrbitError;
use crate::orbit::{Orbit, TimedOrbit};
use crate::tree::{NodeId, OrbitTree};
use glam::DVec3;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Declarative nesting of named bodies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orbits: Vec<Topology>,
}

impl Topology {
    pub fn leaf(name: impl Into<String>) -> Self {
        Topology {
            name: name.into(),
            orbits: Vec::new(),
        }
    }

    pub fn with_orbits(name: impl Into<String>, orbits: Vec<Topology>) -> Self {
        Topology {
            name: name.into(),
            orbits,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.orbits.is_empty()
    }

    /// Total number of nodes, this one included.
    pub fn count(&self) -> usize {
        1 + self.orbits.iter().map(Topology::count).sum::<usize>()
    }
}

/// Validated numeric parameters of one body, in the units of the source data.
#[derive(Clone, Debug, PartialEq)]
pub struct CelestialParameters {
    pub name: String,
    /// Orbit centre offset
    pub center: DVec3,
    /// Tilt angles in degrees
    pub tilt: DVec3,
    pub radius: f64,
    /// Phase at simulation time zero, degrees
    pub start_pos: f64,
    /// Radians per simulation year, clockwise positive
    pub speed: f64,
}

impl CelestialParameters {
    /// All-zero parameters: the node sits exactly on its parent's origin.
    pub fn pass_through(name: impl Into<String>) -> Self {
        CelestialParameters {
            name: name.into(),
            center: DVec3::ZERO,
            tilt: DVec3::ZERO,
            radius: 0.0,
            start_pos: 0.0,
            speed: 0.0,
        }
    }

    /// Read one record of the upstream table.
    pub fn from_record(name: &str, record: &Map<String, Value>) -> Result<Self, OrbitError> {
        let read = |field: &'static str| read_number(name, record, field);
        let required = |field: &'static str| {
            read(field)?.ok_or_else(|| OrbitError::Validation {
                name: name.to_string(),
                field,
                reason: "missing".to_string(),
            })
        };

        let center = DVec3::new(
            read("orbitCentera")?.unwrap_or(0.0),
            read("orbitCenterb")?.unwrap_or(0.0),
            read("orbitCenterc")?.unwrap_or(0.0),
        );
        let tilt = DVec3::new(
            read("orbitTilta")?.unwrap_or(0.0),
            read("orbitTiltb")?.unwrap_or(0.0),
            read("orbitTiltc")?.unwrap_or(0.0),
        );

        Ok(CelestialParameters {
            name: name.to_string(),
            center,
            tilt,
            radius: required("orbitRadius")?,
            start_pos: required("startPos")?,
            speed: required("speed")?,
        })
    }

    /// Tilt in radians after the handedness flip.
    pub fn effective_tilt(&self) -> DVec3 {
        -DVec3::new(
            self.tilt.x.to_radians(),
            self.tilt.y.to_radians(),
            self.tilt.z.to_radians(),
        )
    }

    pub fn effective_speed(&self) -> f64 {
        -self.speed
    }

    /// Start phase in radians after the handedness flip.
    pub fn effective_start(&self) -> f64 {
        -self.start_pos.to_radians()
    }

    pub fn to_timed_orbit(&self) -> TimedOrbit {
        let orbit = Orbit::new(self.center, self.effective_tilt(), self.radius);
        TimedOrbit::new(orbit, self.effective_speed(), self.effective_start())
    }
}

fn read_number(
    name: &str,
    record: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<f64>, OrbitError> {
    let invalid = |reason: String| OrbitError::Validation {
        name: name.to_string(),
        field,
        reason,
    };
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(invalid(format!("{n} is not a finite number"))),
        },
        Some(other) => Err(invalid(format!("expected a number, found {other}"))),
    }
}

/// Per-body parameters keyed by name.
#[derive(Clone, Debug, Default)]
pub struct ParameterTable {
    entries: HashMap<String, Result<CelestialParameters, OrbitError>>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the upstream JSON array.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<Value> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Index raw records by name. Records without a string `name` are skipped;
    /// a repeated name replaces the earlier record.
    pub fn from_records(records: Vec<Value>) -> Self {
        let mut table = ParameterTable::new();
        for (index, record) in records.into_iter().enumerate() {
            let Value::Object(fields) = record else {
                warn!("Skipping parameter record #{index}: not an object");
                continue;
            };
            let Some(name) = fields.get("name").and_then(Value::as_str) else {
                warn!("Skipping parameter record #{index}: no name");
                continue;
            };
            let entry = CelestialParameters::from_record(name, &fields);
            if table.entries.insert(name.to_string(), entry).is_some() {
                warn!("Parameter record '{name}' appears more than once, keeping the last");
            }
        }
        table
    }

    pub fn insert(&mut self, params: CelestialParameters) {
        self.entries.insert(params.name.clone(), Ok(params));
    }

    /// `None` when the table has no record for `name`.
    pub fn get(&self, name: &str) -> Option<Result<&CelestialParameters, OrbitError>> {
        self.entries
            .get(name)
            .map(|entry| entry.as_ref().map_err(Clone::clone))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the orbit tree described by `topology`.
///
/// # Errors
/// - [`OrbitError::MissingParameters`] for a leaf with no record
/// - [`OrbitError::Validation`] for a record with unusable numbers
/// - [`OrbitError::DuplicateName`] when a name appears twice in `topology`
pub fn build_system(topology: &Topology, table: &ParameterTable) -> Result<OrbitTree, OrbitError> {
    let mut tree = OrbitTree::new(topology.name.clone(), orbit_for(topology, table)?);
    let root = tree.root();
    attach_children(&mut tree, root, topology, table)?;
    Ok(tree)
}

fn attach_children(
    tree: &mut OrbitTree,
    parent: NodeId,
    topology: &Topology,
    table: &ParameterTable,
) -> Result<(), OrbitError> {
    if topology.is_leaf() {
        return Ok(());
    }
    let mut children = Vec::with_capacity(topology.orbits.len());
    for child in &topology.orbits {
        let id = tree.add_node(child.name.clone(), orbit_for(child, table)?)?;
        attach_children(tree, id, child, table)?;
        children.push(id);
    }
    tree.set_children(parent, children)?;
    Ok(())
}

fn orbit_for(topology: &Topology, table: &ParameterTable) -> Result<TimedOrbit, OrbitError> {
    match table.get(&topology.name) {
        Some(params) => Ok(params?.to_timed_orbit()),
        None if !topology.is_leaf() => {
            debug!("No parameters for '{}', using a pass-through orbit", topology.name);
            Ok(CelestialParameters::pass_through(topology.name.clone()).to_timed_orbit())
        }
        None => Err(OrbitError::MissingParameters(topology.name.clone())),
    }
}
