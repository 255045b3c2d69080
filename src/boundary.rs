//! Boundary conditions derived from point classification

use serde::{Deserialize, Serialize};

use crate::topology::PointClass;

/// Degrees of freedom in CalculiX numbering (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dof {
    X = 1,
    Y = 2,
    Z = 3,
    Rx = 4,
    Ry = 5,
    /// Drilling rotation about the plate normal
    Rz = 6,
}

impl Dof {
    pub const ALL: [Dof; 6] = [Dof::X, Dof::Y, Dof::Z, Dof::Rx, Dof::Ry, Dof::Rz];

    pub fn number(self) -> usize {
        self as usize
    }

    fn slot(self) -> usize {
        self.number() - 1
    }
}

/// Restraint flags for one point: translations X, Y, Z then rotations Rx, Ry, Rz
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restraint([bool; 6]);

impl Restraint {
    pub fn free() -> Self {
        Self::default()
    }

    pub fn with(dofs: &[Dof]) -> Self {
        let mut flags = [false; 6];
        for dof in dofs {
            flags[dof.slot()] = true;
        }
        Self(flags)
    }

    pub fn is_fixed(&self, dof: Dof) -> bool {
        self.0[dof.slot()]
    }

    pub fn fixed_dofs(&self) -> impl Iterator<Item = Dof> + '_ {
        Dof::ALL.into_iter().filter(|&d| self.is_fixed(d))
    }

    pub fn flags(&self) -> [bool; 6] {
        self.0
    }

    /// Restraint pattern of a point on the simply supported plate outline.
    ///
    /// Every outline point is held out-of-plane and against drilling. The
    /// left corners also hold both in-plane translations and the right
    /// corners hold Y only, which removes the in-plane rigid body modes
    /// without restraining the loaded direction twice.
    pub fn for_class(class: PointClass) -> Self {
        match class {
            PointClass::Interior | PointClass::Other => Self::free(),
            PointClass::Left | PointClass::Right | PointClass::Top | PointClass::Bottom => {
                Self::with(&[Dof::Z, Dof::Rz])
            }
            PointClass::LeftTop | PointClass::LeftBottom => {
                Self::with(&[Dof::X, Dof::Y, Dof::Z, Dof::Rz])
            }
            PointClass::RightTop | PointClass::RightBottom => {
                Self::with(&[Dof::Y, Dof::Z, Dof::Rz])
            }
        }
    }
}

/// One `Restraint` per mesh point, index-aligned with the mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryTable {
    restraints: Vec<Restraint>,
}

impl BoundaryTable {
    pub fn from_classes(classes: &[PointClass]) -> Self {
        Self {
            restraints: classes.iter().map(|&c| Restraint::for_class(c)).collect(),
        }
    }

    pub fn get(&self, point: usize) -> Option<&Restraint> {
        self.restraints.get(point)
    }

    pub fn len(&self) -> usize {
        self.restraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restraints.is_empty()
    }

    /// `(point, dof)` pairs for every fixed DOF, in point order then DOF order.
    pub fn fixed(&self) -> impl Iterator<Item = (usize, Dof)> + '_ {
        self.restraints
            .iter()
            .enumerate()
            .flat_map(|(point, r)| r.fixed_dofs().map(move |dof| (point, dof)))
    }
}
