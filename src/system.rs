//! # Default Tychonic System
//!
//! Earth sits at the centre. The Sun circles the Earth and carries the outer
//! bodies; the Moon, inner planets, Mars and Eros each hang off the Earth
//! through two nested deferents.

use crate::builder::{build_system, ParameterTable, Topology};
use crate::celestial_data::{self, DataError};
use crate::config::DataConfig;
use crate::error::OrbitError;
use crate::tree::OrbitTree;
use thiserror::Error;

/// Bodies with a physical position worth reporting, in display order.
pub const BODIES: [&str; 10] = [
    "Earth", "Sun", "Moon", "Mercury", "Venus", "Mars", "Jupiter", "Saturn", "Halleys", "Eros",
];

/// Failure to produce the default system.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Build(#[from] OrbitError),
}

/// `name → deferent A → deferent B → body`
fn chain(deferent_a: &str, deferent_b: &str, body: &str) -> Topology {
    Topology::with_orbits(
        deferent_a,
        vec![Topology::with_orbits(deferent_b, vec![Topology::leaf(body)])],
    )
}

/// `deferent → body`, optionally with bodies of its own.
fn carried(deferent: &str, body: Topology) -> Topology {
    Topology::with_orbits(deferent, vec![body])
}

/// Topology of the default system.
pub fn default_topology() -> Topology {
    let sun = Topology::with_orbits(
        "Sun",
        vec![
            carried("Jupiter deferent", Topology::leaf("Jupiter")),
            carried("Saturn deferent", Topology::leaf("Saturn")),
            carried("Halleys deferent", Topology::leaf("Halleys")),
        ],
    );

    let earth = Topology::with_orbits(
        "Earth",
        vec![
            chain("Moon deferent A", "Moon deferent B", "Moon"),
            carried("Sun deferent", sun),
            chain("Venus deferent A", "Venus deferent B", "Venus"),
            chain("Mercury def A", "Mercury def B", "Mercury"),
            chain("Mars E deferent", "Mars S deferent", "Mars"),
            chain("Eros deferent A", "Eros deferent B", "Eros"),
        ],
    );

    Topology::with_orbits("SystemCenter", vec![earth])
}

/// Build the default system from an already loaded table.
pub fn build_default_system(table: &ParameterTable) -> Result<OrbitTree, OrbitError> {
    build_system(&default_topology(), table)
}

/// Fetch the parameter table and build the default system.
pub async fn load_solar_system(config: &DataConfig) -> Result<OrbitTree, LoadError> {
    let table = celestial_data::fetch(config).await?;
    Ok(build_default_system(&table)?)
}
