//! The analysis pipeline: mesh, boundary conditions, loads, deck, solver, report

use crate::boundary::BoundaryTable;
use crate::error::PlateResult;
use crate::executor::CalculiXExecutor;
use crate::generator::{CalculiXGenerator, Deck, DeckInput};
use crate::loads;
use crate::mesher::OrthoMesher;
use crate::models::{Config, Design, Load, Report};
use crate::parser::ReportParser;
use crate::topology::Topology;

/// One configured analysis pipeline. Holds no state between runs, so a
/// single value may serve many analyses.
#[derive(Debug, Clone)]
pub struct Analysis<T: Topology = OrthoMesher> {
    topology: T,
    generator: CalculiXGenerator,
    executor: CalculiXExecutor,
    parser: ReportParser,
}

impl Default for Analysis<OrthoMesher> {
    fn default() -> Self {
        Self::new()
    }
}

impl Analysis<OrthoMesher> {
    pub fn new() -> Self {
        Self {
            topology: OrthoMesher::new(),
            generator: CalculiXGenerator::new(),
            executor: CalculiXExecutor::new(),
            parser: ReportParser::new(),
        }
    }
}

impl<T: Topology> Analysis<T> {
    /// Replace the mesh source, e.g. with an external topology adapter.
    pub fn with_topology<U: Topology>(self, topology: U) -> Analysis<U> {
        Analysis {
            topology,
            generator: self.generator,
            executor: self.executor,
            parser: self.parser,
        }
    }

    pub fn with_executor(mut self, executor: CalculiXExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_parser(mut self, parser: ReportParser) -> Self {
        self.parser = parser;
        self
    }

    /// Validate the inputs and render the solver deck without running it.
    pub fn prepare_deck(&self, design: &Design, load: &Load, config: &Config) -> PlateResult<Deck> {
        design.validate()?;
        config.validate()?;

        let mesh = self.topology.generate(design, config.mesh_spacing())?;
        let boundary = BoundaryTable::from_classes(mesh.classes());
        let forces = loads::distribute(&mesh, load, design.thickness)?;
        let regions = design.regions();
        tracing::info!(
            "Prepared {} regions, {} fixed DOFs, {} nodal forces",
            regions.len(),
            boundary.fixed().count(),
            forces.len()
        );

        let deck = self.generator.generate_inp_file(&DeckInput {
            mesh: &mesh,
            regions: &regions,
            boundary: &boundary,
            forces: &forces,
            config,
        })?;
        Ok(deck)
    }

    /// Run the complete analysis and return the governing scalars.
    pub fn run(&self, design: &Design, load: &Load, config: &Config) -> PlateResult<Report> {
        let deck = self.prepare_deck(design, load, config)?;
        let content = self.executor.run(&deck)?;
        let report = self.parser.parse(&content)?;
        Ok(report)
    }
}

/// Run an analysis with the built-in mesher and the solver from the
/// environment. `None` selects `Config::default()`.
pub fn calculate(design: &Design, load: &Load, config: Option<&Config>) -> PlateResult<Report> {
    let default_config = Config::default();
    let config = config.unwrap_or(&default_config);
    Analysis::new().run(design, load, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ContractError, PlateError, ValidationError};
    use crate::topology::{Mesh, PointClass};

    fn plate() -> Design {
        Design {
            width: 1800,
            height: 1800,
            thickness: 12,
            stiffeners: vec![],
        }
    }

    #[test]
    fn test_prepare_deck_is_deterministic() {
        let analysis = Analysis::new();
        let load = Load { sx: 1.0, tau: 0.5, pressure: 0.01, ..Load::default() };
        let config = Config::default();
        let first = analysis.prepare_deck(&plate(), &load, &config).unwrap();
        let second = analysis.prepare_deck(&plate(), &load, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_design_is_rejected_before_meshing() {
        let mut design = plate();
        design.width = 0;
        let err = Analysis::new()
            .prepare_deck(&design, &Load::default(), &Config::default())
            .unwrap_err();
        assert!(matches!(err, PlateError::Validation(ValidationError::ZeroDimension("width"))));
    }

    struct BrokenTopology;

    impl Topology for BrokenTopology {
        fn generate(&self, _design: &Design, _max_distance: u64) -> Result<Mesh, ContractError> {
            // Corner only: no edge can be formed
            Mesh::new(vec![[0, 0, 0]], vec![], vec![PointClass::LeftBottom])
        }
    }

    #[test]
    fn test_contract_violation_aborts_before_solver() {
        let analysis = Analysis::new().with_topology(BrokenTopology);
        let load = Load { sx: 1.0, ..Load::default() };
        let err = analysis.run(&plate(), &load, &Config::default()).unwrap_err();
        assert!(matches!(err, PlateError::Contract(ContractError::DegenerateEdge { .. })));
        assert!(!err.is_recoverable());
    }
}
