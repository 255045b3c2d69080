//! Structured orthogonal mesher
//!
//! Produces a rectangular grid of 4-node shells for the base plate in the
//! XY plane and a grid of out-of-plane shells (positive Z) for every
//! stiffener web. Grid lines always pass through the plate outline and every
//! stiffener offset, so stiffener webs share nodes with the base plate.

use std::collections::HashMap;

use crate::error::ContractError;
use crate::models::{stiffener_region, Design, BASE_REGION};
use crate::topology::{Element, Mesh, PointClass, Topology};

#[derive(Debug, Clone, Copy, Default)]
pub struct OrthoMesher;

impl OrthoMesher {
    pub fn new() -> Self {
        Self
    }
}

/// Sorted coordinates from 0 to `extent` through every cut, with no gap
/// larger than `spacing`.
pub fn grid_lines(extent: u64, cuts: &[u64], spacing: u64) -> Vec<u64> {
    let spacing = spacing.max(1);
    let mut anchors: Vec<u64> = cuts.iter().copied().filter(|&c| c < extent).collect();
    anchors.push(0);
    anchors.push(extent);
    anchors.sort_unstable();
    anchors.dedup();

    let mut lines = Vec::new();
    for pair in anchors.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let divisions = (b - a).div_ceil(spacing).max(1);
        for k in 0..divisions {
            lines.push(a + (b - a) * k / divisions);
        }
    }
    lines.push(extent);
    lines.dedup();
    lines
}

fn classify(x: u64, y: u64, z: u64, width: u64, height: u64) -> PointClass {
    if z != 0 {
        return PointClass::Other;
    }
    let (left, right) = (x == 0, x == width);
    let (bottom, top) = (y == 0, y == height);
    match (left, right, bottom, top) {
        (true, _, true, _) => PointClass::LeftBottom,
        (true, _, _, true) => PointClass::LeftTop,
        (_, true, true, _) => PointClass::RightBottom,
        (_, true, _, true) => PointClass::RightTop,
        (true, _, _, _) => PointClass::Left,
        (_, true, _, _) => PointClass::Right,
        (_, _, true, _) => PointClass::Bottom,
        (_, _, _, true) => PointClass::Top,
        _ => PointClass::Interior,
    }
}

struct MeshBuilder {
    width: u64,
    height: u64,
    index: HashMap<[u64; 3], usize>,
    points: Vec<[u64; 3]>,
    classes: Vec<PointClass>,
    elements: Vec<Element>,
}

impl MeshBuilder {
    fn new(width: u64, height: u64) -> Self {
        Self {
            width,
            height,
            index: HashMap::new(),
            points: Vec::new(),
            classes: Vec::new(),
            elements: Vec::new(),
        }
    }

    fn point(&mut self, p: [u64; 3]) -> usize {
        if let Some(&id) = self.index.get(&p) {
            return id;
        }
        let id = self.points.len();
        self.points.push(p);
        self.classes
            .push(classify(p[0], p[1], p[2], self.width, self.height));
        self.index.insert(p, id);
        id
    }

    /// Mesh a patch spanned by two coordinate lists, `at(u, v)` mapping grid
    /// coordinates onto 3-D points. Elements are emitted counter-clockwise.
    fn patch<F>(&mut self, region: &str, us: &[u64], vs: &[u64], at: F)
    where
        F: Fn(u64, u64) -> [u64; 3],
    {
        let mut ids = vec![vec![0usize; us.len()]; vs.len()];
        for (j, &v) in vs.iter().enumerate() {
            for (i, &u) in us.iter().enumerate() {
                ids[j][i] = self.point(at(u, v));
            }
        }
        for j in 0..vs.len().saturating_sub(1) {
            for i in 0..us.len().saturating_sub(1) {
                self.elements.push(Element {
                    region: region.to_string(),
                    point_ids: vec![ids[j][i], ids[j][i + 1], ids[j + 1][i + 1], ids[j + 1][i]],
                });
            }
        }
    }

    fn finish(self) -> Result<Mesh, ContractError> {
        Mesh::new(self.points, self.elements, self.classes)
    }
}

impl Topology for OrthoMesher {
    fn generate(&self, design: &Design, max_distance: u64) -> Result<Mesh, ContractError> {
        let vertical_cuts: Vec<u64> = design
            .stiffeners
            .iter()
            .filter(|s| !s.is_horizontal)
            .map(|s| s.offset)
            .collect();
        let horizontal_cuts: Vec<u64> = design
            .stiffeners
            .iter()
            .filter(|s| s.is_horizontal)
            .map(|s| s.offset)
            .collect();

        let xs = grid_lines(design.width, &vertical_cuts, max_distance);
        let ys = grid_lines(design.height, &horizontal_cuts, max_distance);
        tracing::debug!(
            "Base plate grid: {} x {} lines at spacing {}",
            xs.len(),
            ys.len(),
            max_distance
        );

        let mut builder = MeshBuilder::new(design.width, design.height);
        builder.patch(BASE_REGION, &xs, &ys, |x, y| [x, y, 0]);

        for (index, stiffener) in design.stiffeners.iter().enumerate() {
            let zs = grid_lines(stiffener.width, &[], max_distance);
            let region = stiffener_region(index);
            let offset = stiffener.offset;
            if stiffener.is_horizontal {
                builder.patch(&region, &xs, &zs, |x, z| [x, offset, z]);
            } else {
                builder.patch(&region, &ys, &zs, |y, z| [offset, y, z]);
            }
        }

        let mesh = builder.finish()?;
        tracing::info!(
            "Generated mesh: {} points, {} elements",
            mesh.len(),
            mesh.elements().len()
        );
        Ok(mesh)
    }
}
