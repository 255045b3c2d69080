//! Error types for plate buckling analyses
//!
//! Failures fall into two families. Contract and report-format violations
//! mean the mesh or the solver output cannot be trusted and the analysis is
//! abandoned. Executor failures come from the environment (missing solver,
//! scratch I/O, non-zero exit) and are safe to retry once fixed.

use thiserror::Error;

/// A broken invariant between the topology adapter and the load/boundary logic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    #[error("Unrecognized point classification '{0}'")]
    UnrecognizedPointClass(String),

    #[error("Mesh has {points} points but {classes} classifications")]
    MisalignedMesh { points: usize, classes: usize },

    #[error("Element {element} references point {point} outside the mesh")]
    DanglingPoint { element: usize, point: usize },

    #[error("Element {element} belongs to region '{region}' which has no section")]
    UnknownRegion { element: usize, region: String },

    #[error("Edge load case '{case}' selected no points")]
    EmptyEdge { case: &'static str },

    #[error("Edge load case '{case}' is not a straight transverse edge: dx={dx}, dy={dy}")]
    DegenerateEdge { case: &'static str, dx: u64, dy: u64 },

    #[error("No pressure-loaded points along axis {axis}")]
    EmptyPressureGrid { axis: usize },

    #[error("Unsupported mesh for pressure loads: {count} coordinates along axis {axis} are not divisible by period {period}")]
    NonUniformPressureGrid { axis: usize, count: usize, period: usize },

    #[error("Point {point} lies off the recovered pressure grid along axis {axis}")]
    OffGridPoint { axis: usize, point: usize },
}

/// The solver report deviates from the expected `.dat` layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("Line {line}: expected {expected} fields, found {found}: '{text}'")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
        text: String,
    },

    #[error("Line {line}: cannot parse '{token}' as a number")]
    BadNumber { line: usize, token: String },

    #[error("Report contains no buckling factors")]
    MissingBucklingFactor,
}

/// Failures while running the external solver.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Execution error: {0}")]
    ExecutionError(String),
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

/// Input rejected before any mesh is generated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Plate {0} must be greater than zero")]
    ZeroDimension(&'static str),

    #[error("Stiffener {index}: {reason}")]
    InvalidStiffener { index: usize, reason: String },

    #[error("Invalid material: {0}")]
    InvalidMaterial(String),
}

/// Failures while rendering the solver deck.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("Failed to write deck: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Top-level error returned by the analysis pipeline.
#[derive(Error, Debug)]
pub enum PlateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Contract violation: {0}")]
    Contract(#[from] ContractError),

    #[error("Deck generation failed: {0}")]
    Generator(GeneratorError),

    #[error("Malformed solver report: {0}")]
    Report(#[from] ReportError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl From<GeneratorError> for PlateError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::Contract(inner) => PlateError::Contract(inner),
            other => PlateError::Generator(other),
        }
    }
}

impl PlateError {
    /// Only environment failures may be retried; everything else signals a
    /// bug in the mesh, the deck or a solver version mismatch.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PlateError::Executor(_))
    }
}

pub type PlateResult<T> = Result<T, PlateError>;
