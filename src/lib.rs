//! # Tychos Core Library
//!
//! A geocentric (Tychonic) model of the solar system in which every apparent
//! motion is composed from nested circular orbits ("deferents"). Each orbit is a
//! fixed circle with a radius, a tilt and a centre offset, turned by an angle that
//! grows linearly with simulation time.
//!
//! ## Data Flow
//! 1. **Parameters**: a JSON table of per-body numbers ([`celestial_data`])
//! 2. **Build**: topology + parameters → [`tree::OrbitTree`] ([`builder`], [`system`])
//! 3. **Drive**: `set_time(t)` on the tree, `t` in tropical years since the epoch ([`time`])
//! 4. **Query**: `pos(node)` gives the body's position in Earth-centred coordinates
//!
//! ## Design
//! - All failures happen while building; a built tree cannot fail
//! - Angles are recomputed from `t` on every update, never accumulated, so
//!   jumping back and forth in time is exact
//! - Every transform has an exact inverse, so a root-frame point can be carried
//!   into any body's local frame
//!
//! ## Core Types
//! - [`orbit::Orbit`] / [`orbit::TimedOrbit`]: one circle, optionally clock-driven
//! - [`tree::OrbitTree`]: the chain of orbits from each body up to the root
//! - [`BodyPosition`]: one row of output

use glam::DVec3;
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod celestial_data;
pub mod config;
pub mod error;
pub mod orbit;
pub mod system;
pub mod time;
pub mod transform;
pub mod tree;

#[cfg(test)]
mod tests;

pub use builder::{build_system, CelestialParameters, ParameterTable, Topology};
pub use config::{Config, ModelConstants};
pub use error::OrbitError;
pub use tree::{NodeId, OrbitTree};

/// Position of one named body at one instant, in root coordinates.
///
/// # Example
/// ```
/// use tychos_lib::BodyPosition;
///
/// let p = BodyPosition::new("Sun", glam::DVec3::new(3.0, 4.0, 0.0));
/// assert_eq!(p.distance, 5.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Distance from the root origin
    pub distance: f64,
}

impl BodyPosition {
    pub fn new(name: impl Into<String>, p: DVec3) -> Self {
        BodyPosition {
            name: name.into(),
            x: p.x,
            y: p.y,
            z: p.z,
            distance: p.length(),
        }
    }
}

/// Current positions of `names`, skipping names that are not in the tree.
pub fn positions<'a, I>(tree: &OrbitTree, names: I) -> Vec<BodyPosition>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter_map(|name| tree.position_of(name).map(|p| BodyPosition::new(name, p)))
        .collect()
}
