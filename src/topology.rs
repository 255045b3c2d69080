//! Mesh topology consumed by the boundary and load logic
//!
//! A topology adapter turns a `Design` into node coordinates, shell elements
//! tagged by region, and one `PointClass` per node. Everything downstream
//! treats the mesh as read-only and relies on the point and class lists
//! staying index-aligned.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ContractError;
use crate::models::Design;

/// Position of a mesh point relative to the base plate outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointClass {
    Interior,
    Left,
    Right,
    Top,
    Bottom,
    LeftTop,
    LeftBottom,
    RightTop,
    RightBottom,
    /// Off the base plate, e.g. on a stiffener web
    Other,
}

impl PointClass {
    pub const ALL: [PointClass; 10] = [
        PointClass::Interior,
        PointClass::Left,
        PointClass::Right,
        PointClass::Top,
        PointClass::Bottom,
        PointClass::LeftTop,
        PointClass::LeftBottom,
        PointClass::RightTop,
        PointClass::RightBottom,
        PointClass::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PointClass::Interior => "interior",
            PointClass::Left => "left",
            PointClass::Right => "right",
            PointClass::Top => "top",
            PointClass::Bottom => "bottom",
            PointClass::LeftTop => "left-top",
            PointClass::LeftBottom => "left-bottom",
            PointClass::RightTop => "right-top",
            PointClass::RightBottom => "right-bottom",
            PointClass::Other => "other",
        }
    }
}

impl FromStr for PointClass {
    type Err = ContractError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let normalized = tag.trim().to_ascii_lowercase().replace('_', "-");
        PointClass::ALL
            .iter()
            .copied()
            .find(|class| class.as_str() == normalized)
            .ok_or_else(|| ContractError::UnrecognizedPointClass(tag.to_string()))
    }
}

/// A shell element tagged with its region (element set) name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub region: String,
    /// 0-based indices into `Mesh::points`
    pub point_ids: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    points: Vec<[u64; 3]>,
    elements: Vec<Element>,
    classes: Vec<PointClass>,
}

impl Mesh {
    /// Build a mesh, checking that classifications align with points and
    /// that every element only references existing points.
    pub fn new(
        points: Vec<[u64; 3]>,
        elements: Vec<Element>,
        classes: Vec<PointClass>,
    ) -> Result<Self, ContractError> {
        if points.len() != classes.len() {
            return Err(ContractError::MisalignedMesh {
                points: points.len(),
                classes: classes.len(),
            });
        }
        for (element, e) in elements.iter().enumerate() {
            if let Some(&point) = e.point_ids.iter().find(|&&p| p >= points.len()) {
                return Err(ContractError::DanglingPoint { element, point });
            }
        }
        Ok(Self {
            points,
            elements,
            classes,
        })
    }

    /// Build a mesh from adapter-provided classification tags.
    pub fn from_tags<S: AsRef<str>>(
        points: Vec<[u64; 3]>,
        elements: Vec<Element>,
        tags: &[S],
    ) -> Result<Self, ContractError> {
        let classes = tags
            .iter()
            .map(|t| t.as_ref().parse())
            .collect::<Result<Vec<PointClass>, _>>()?;
        Self::new(points, elements, classes)
    }

    pub fn points(&self) -> &[[u64; 3]] {
        &self.points
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn classes(&self) -> &[PointClass] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Source of meshes for a design.
pub trait Topology {
    fn generate(&self, design: &Design, max_distance: u64) -> Result<Mesh, ContractError>;
}
