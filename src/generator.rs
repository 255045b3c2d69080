use std::fmt::Write;

use crate::boundary::BoundaryTable;
use crate::error::{ContractError, GeneratorError};
use crate::loads::NodalForce;
use crate::models::{Config, Region};
use crate::topology::Mesh;

/// Rendered CalculiX input deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck(String);

impl Deck {
    /// Wrap an already rendered deck, e.g. one read back from disk.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the deck needs, already prepared by the pipeline
#[derive(Debug, Clone, Copy)]
pub struct DeckInput<'a> {
    pub mesh: &'a Mesh,
    /// Shell sections in output order
    pub regions: &'a [Region],
    pub boundary: &'a BoundaryTable,
    pub forces: &'a [NodalForce],
    pub config: &'a Config,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CalculiXGenerator;

impl CalculiXGenerator {
    /// Number of eigenmodes requested from `*BUCKLE`
    pub const BUCKLING_MODES: usize = 2;
    const MATERIAL: &'static str = "STEEL";
    const NODE_SET: &'static str = "NALL";

    pub fn new() -> Self {
        Self
    }

    /// Render the buckling deck. Identical inputs give byte-identical text.
    pub fn generate_inp_file(&self, input: &DeckInput<'_>) -> Result<Deck, GeneratorError> {
        let mesh = input.mesh;
        if mesh.is_empty() {
            return Err(GeneratorError::GenerationError("Mesh has no nodes".to_string()));
        }
        for (element, e) in mesh.elements().iter().enumerate() {
            if !input.regions.iter().any(|r| r.name == e.region) {
                return Err(ContractError::UnknownRegion {
                    element,
                    region: e.region.clone(),
                }
                .into());
            }
        }

        let mut inp = String::new();
        Self::write_nodes(&mut inp, mesh)?;
        Self::write_elements(&mut inp, mesh, input.regions, input.config)?;
        Self::write_boundary(&mut inp, input.boundary)?;
        Self::write_material(&mut inp, input.config)?;
        Self::write_sections(&mut inp, input.regions)?;

        writeln!(inp, "*STEP")?;
        writeln!(inp, "*BUCKLE")?;
        writeln!(inp, "{}", Self::BUCKLING_MODES)?;
        Self::write_loads(&mut inp, input.forces)?;
        Self::write_output_requests(&mut inp, input.regions)?;
        writeln!(inp, "*END STEP")?;

        tracing::debug!("Deck rendered: {} bytes", inp.len());
        Ok(Deck(inp))
    }

    fn write_nodes(inp: &mut String, mesh: &Mesh) -> std::fmt::Result {
        writeln!(inp, "*NODE, NSET={}", Self::NODE_SET)?;
        for (i, [x, y, z]) in mesh.points().iter().enumerate() {
            writeln!(inp, "{:5},{:5},{:5},{:5}", i + 1, x, y, z)?;
        }
        Ok(())
    }

    /// Elements keep their global mesh number but are grouped per region.
    fn write_elements(inp: &mut String, mesh: &Mesh, regions: &[Region], config: &Config) -> std::fmt::Result {
        for region in regions {
            writeln!(
                inp,
                "*ELEMENT, TYPE={}, ELSET={}",
                config.element_family.tag(),
                region.name
            )?;
            for (i, element) in mesh.elements().iter().enumerate() {
                if element.region != region.name {
                    continue;
                }
                write!(inp, "{:5}", i + 1)?;
                for p in &element.point_ids {
                    write!(inp, ",{:5}", p + 1)?;
                }
                writeln!(inp)?;
            }
        }
        Ok(())
    }

    fn write_boundary(inp: &mut String, boundary: &BoundaryTable) -> std::fmt::Result {
        writeln!(inp, "*BOUNDARY")?;
        for (point, dof) in boundary.fixed() {
            writeln!(inp, "{:5},{:5},{:5}", point + 1, dof.number(), dof.number())?;
        }
        Ok(())
    }

    fn write_material(inp: &mut String, config: &Config) -> std::fmt::Result {
        writeln!(inp, "*MATERIAL, NAME={}", Self::MATERIAL)?;
        writeln!(inp, "*ELASTIC")?;
        writeln!(inp, "{:12.2},{:12.2}", config.elasticity, config.poisson_ratio)
    }

    fn write_sections(inp: &mut String, regions: &[Region]) -> std::fmt::Result {
        for region in regions {
            writeln!(inp, "*SHELL SECTION,ELSET={}, MATERIAL={}", region.name, Self::MATERIAL)?;
            writeln!(inp, "{:5}", region.thickness)?;
        }
        Ok(())
    }

    fn write_loads(inp: &mut String, forces: &[NodalForce]) -> std::fmt::Result {
        writeln!(inp, "*CLOAD")?;
        for force in forces {
            writeln!(
                inp,
                "{:5},{:5}, {:+.5e}",
                force.point + 1,
                force.dof.number(),
                force.value
            )?;
        }
        Ok(())
    }

    fn write_output_requests(inp: &mut String, regions: &[Region]) -> std::fmt::Result {
        for region in regions {
            writeln!(inp, "*EL FILE  , ELSET={}", region.name)?;
            writeln!(inp, "S,PEEQ")?;
            writeln!(inp, "*EL PRINT , ELSET={}", region.name)?;
            writeln!(inp, "S,PEEQ")?;
        }
        writeln!(inp, "*NODE FILE  , NSET={}", Self::NODE_SET)?;
        writeln!(inp, "U")?;
        writeln!(inp, "*NODE PRINT , NSET={}", Self::NODE_SET)?;
        writeln!(inp, "U")
    }
}
