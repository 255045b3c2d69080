//! Lateral pressure lumped onto the base plate

use crate::boundary::Dof;
use crate::error::ContractError;
use crate::loads::{tributary_length, NodalForce};
use crate::topology::{Mesh, PointClass};

/// Recover the distinct grid lines from a sorted coordinate list in which
/// every grid line repeats the same number of times.
///
/// The repetition period is the index of the first value that differs from
/// the first element. A count that is not a multiple of the period means the
/// refinement is not periodic and the mesh is unsupported.
pub fn recover_grid(sorted: &[u64], axis: usize) -> Result<Vec<u64>, ContractError> {
    let first = *sorted
        .first()
        .ok_or(ContractError::EmptyPressureGrid { axis })?;
    let period = sorted
        .iter()
        .position(|&v| v != first)
        .unwrap_or(sorted.len());
    if sorted.len() % period != 0 {
        return Err(ContractError::NonUniformPressureGrid {
            axis,
            count: sorted.len(),
            period,
        });
    }
    Ok(sorted.iter().step_by(period).copied().collect())
}

/// Out-of-plane forces equivalent to `pressure` over the base plate.
pub fn distribute_pressure(mesh: &Mesh, pressure: f64) -> Result<Vec<NodalForce>, ContractError> {
    let points = mesh.points();
    let loaded: Vec<usize> = mesh
        .classes()
        .iter()
        .enumerate()
        .filter(|(_, &class)| class != PointClass::Other)
        .map(|(i, _)| i)
        .collect();

    let mut grids: [Vec<u64>; 2] = [Vec::new(), Vec::new()];
    for (axis, grid) in grids.iter_mut().enumerate() {
        let mut coords: Vec<u64> = loaded.iter().map(|&i| points[i][axis]).collect();
        coords.sort_unstable();
        *grid = recover_grid(&coords, axis)?;
    }
    tracing::debug!(
        "Pressure grid: {} x {} lines",
        grids[0].len(),
        grids[1].len()
    );

    loaded
        .into_iter()
        .map(|point| -> Result<NodalForce, ContractError> {
            let mut area = 1.0;
            for (axis, grid) in grids.iter().enumerate() {
                // Grid values are sorted and unique
                let index = grid
                    .binary_search(&points[point][axis])
                    .map_err(|_| ContractError::OffGridPoint { axis, point })?;
                area *= tributary_length(grid, index);
            }
            Ok(NodalForce {
                point,
                dof: Dof::Z,
                value: area * pressure,
            })
        })
        .collect()
}
