//! Nodal force generation
//!
//! Edge stresses and lateral pressure are lumped onto mesh points by
//! tributary length and tributary area. All active cases end up in one
//! combined list written to a single `*CLOAD` block.

pub mod edge;
pub mod pressure;

use serde::{Deserialize, Serialize};

use crate::boundary::Dof;
use crate::error::ContractError;
use crate::models::Load;
use crate::topology::Mesh;

pub use edge::{distribute_edge_loads, EdgeCase};
pub use pressure::{distribute_pressure, recover_grid};

/// A concentrated force on one DOF of one mesh point (N)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodalForce {
    /// 0-based mesh point index
    pub point: usize,
    pub dof: Dof,
    pub value: f64,
}

/// Tributary length of position `i` in a sorted run of coordinates: half the
/// gap to each neighbour, nothing beyond either end of the run.
pub(crate) fn tributary_length(coords: &[u64], i: usize) -> f64 {
    let mut length = 0.0;
    if i > 0 {
        length += (coords[i] - coords[i - 1]) as f64 / 2.0;
    }
    if i + 1 < coords.len() {
        length += (coords[i + 1] - coords[i]) as f64 / 2.0;
    }
    length
}

/// Superpose every active edge case and the lateral pressure.
///
/// `thickness` is the base plate thickness used to turn edge stresses into
/// line loads.
pub fn distribute(mesh: &Mesh, load: &Load, thickness: u64) -> Result<Vec<NodalForce>, ContractError> {
    let mut forces = distribute_edge_loads(mesh, load, thickness)?;
    if load.pressure != 0.0 {
        forces.extend(distribute_pressure(mesh, load.pressure)?);
    }
    tracing::debug!("Distributed {} nodal forces", forces.len());
    Ok(forces)
}

/// Sum of the force components applied along `dof`.
pub fn resultant(forces: &[NodalForce], dof: Dof) -> f64 {
    forces.iter().filter(|f| f.dof == dof).map(|f| f.value).sum()
}
