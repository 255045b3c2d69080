//! In-plane edge loads

use crate::boundary::Dof;
use crate::error::ContractError;
use crate::loads::{tributary_length, NodalForce};
use crate::models::Load;
use crate::topology::{Mesh, PointClass};

/// One edge load case: the points of an edge (corners included), the
/// direction of the applied force and the signed stress magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCase {
    pub name: &'static str,
    pub classes: [PointClass; 3],
    pub dof: Dof,
    pub stress: f64,
}

const LEFT: [PointClass; 3] = [PointClass::Left, PointClass::LeftBottom, PointClass::LeftTop];
const RIGHT: [PointClass; 3] = [PointClass::Right, PointClass::RightBottom, PointClass::RightTop];
const TOP: [PointClass; 3] = [PointClass::Top, PointClass::LeftTop, PointClass::RightTop];
const BOTTOM: [PointClass; 3] = [PointClass::Bottom, PointClass::RightBottom, PointClass::LeftBottom];

impl EdgeCase {
    /// The eight cases of a plate under `sx`, `sy` and `tau`. Opposite
    /// edges carry opposite signs so the plate stays in equilibrium.
    pub fn all(load: &Load) -> [EdgeCase; 8] {
        let case = |name, classes, dof, stress| EdgeCase { name, classes, dof, stress };
        [
            case("Sx left", LEFT, Dof::X, load.sx),
            case("Sx right", RIGHT, Dof::X, -load.sx),
            case("Sy top", TOP, Dof::Y, load.sy),
            case("Sy bottom", BOTTOM, Dof::Y, -load.sy),
            case("Tau left", LEFT, Dof::Y, -load.tau),
            case("Tau right", RIGHT, Dof::Y, load.tau),
            case("Tau top", TOP, Dof::X, load.tau),
            case("Tau bottom", BOTTOM, Dof::X, -load.tau),
        ]
    }

    /// Lump this case onto the edge points. A zero stress yields nothing.
    pub fn distribute(&self, mesh: &Mesh, thickness: u64) -> Result<Vec<NodalForce>, ContractError> {
        if self.stress == 0.0 {
            tracing::trace!("Skipping edge case '{}' with zero stress", self.name);
            return Ok(Vec::new());
        }

        let points = mesh.points();
        let mut ids: Vec<usize> = mesh
            .classes()
            .iter()
            .enumerate()
            .filter(|(_, class)| self.classes.contains(class))
            .map(|(i, _)| i)
            .collect();
        if ids.is_empty() {
            return Err(ContractError::EmptyEdge { case: self.name });
        }

        let extent = |axis: usize| {
            let values = ids.iter().map(|&i| points[i][axis]);
            let min = values.clone().min().unwrap_or(0);
            let max = values.max().unwrap_or(0);
            max - min
        };
        let (dx, dy) = (extent(0), extent(1));
        if (dx == 0) == (dy == 0) {
            return Err(ContractError::DegenerateEdge {
                case: self.name,
                dx,
                dy,
            });
        }

        // Walk along the edge: by X for horizontal edges, by Y for vertical ones
        let axis = if dx < dy { 1 } else { 0 };
        ids.sort_by_key(|&i| points[i][axis]);
        let coords: Vec<u64> = ids.iter().map(|&i| points[i][axis]).collect();

        let forces = ids
            .iter()
            .enumerate()
            .map(|(k, &point)| NodalForce {
                point,
                dof: self.dof,
                value: tributary_length(&coords, k) * thickness as f64 * self.stress,
            })
            .collect();
        Ok(forces)
    }
}

/// Forces of every non-zero edge case, in case order.
pub fn distribute_edge_loads(
    mesh: &Mesh,
    load: &Load,
    thickness: u64,
) -> Result<Vec<NodalForce>, ContractError> {
    let mut forces = Vec::new();
    for case in EdgeCase::all(load) {
        let case_forces = case.distribute(mesh, thickness)?;
        if !case_forces.is_empty() {
            tracing::debug!("Edge case '{}': {} nodal forces", case.name, case_forces.len());
        }
        forces.extend(case_forces);
    }
    Ok(forces)
}
