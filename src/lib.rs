//! Plate buckling - linear buckling analysis of stiffened steel plates
//!
//! Builds a CalculiX deck for a rectangular plate with optional orthogonal
//! stiffeners, runs `ccx` and reduces its report to three numbers:
//! - the critical buckling factor
//! - the peak stress tensor norm
//! - the peak displacement
//!
//! ## Example
//! ```no_run
//! use plate_buckling::prelude::*;
//!
//! let design = Design {
//!     width: 1800,
//!     height: 1800,
//!     thickness: 12,
//!     stiffeners: vec![Stiffener { width: 100, thickness: 10, offset: 600, is_horizontal: true }],
//! };
//! let load = Load { sx: 1.0, ..Load::default() };
//!
//! let report = calculate(&design, &load, None).unwrap();
//! println!("{}", report);
//! ```

pub mod analysis;
pub mod api;
pub mod boundary;
pub mod error;
pub mod executor;
pub mod generator;
pub mod loads;
pub mod mesher;
pub mod models;
pub mod parser;
pub mod topology;

pub mod prelude {
    pub use crate::analysis::{calculate, Analysis};
    pub use crate::boundary::{BoundaryTable, Dof, Restraint};
    pub use crate::error::{
        ContractError, ExecutorError, GeneratorError, PlateError, PlateResult, ReportError,
        ValidationError,
    };
    pub use crate::executor::CalculiXExecutor;
    pub use crate::generator::{CalculiXGenerator, Deck, DeckInput};
    pub use crate::loads::NodalForce;
    pub use crate::mesher::OrthoMesher;
    pub use crate::models::{Config, Design, ElementFamily, Load, Report, Stiffener};
    pub use crate::parser::{parse_report, DisplacementBlocks, ReportParser};
    pub use crate::topology::{Element, Mesh, PointClass, Topology};
}
