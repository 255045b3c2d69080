use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Default spacing used when `Config::max_distance` is left at zero (mm).
pub const DEFAULT_MAX_DISTANCE: u64 = 100;

/// Region name of the base plate elements.
pub const BASE_REGION: &str = "BASE";

/// Region name of the stiffener at position `index` in the design.
pub fn stiffener_region(index: usize) -> String {
    format!("STIFF{}", index)
}

/// Plate geometry, all dimensions in mm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Design {
    /// Extent along global X
    pub width: u64,
    /// Extent along global Y
    pub height: u64,
    pub thickness: u64,
    #[serde(default)]
    pub stiffeners: Vec<Stiffener>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stiffener {
    /// Out-of-plane depth of the stiffener web
    pub width: u64,
    pub thickness: u64,
    /// Distance from the origin along the transverse axis
    pub offset: u64,
    /// Horizontal stiffeners run along X at `y = offset`, vertical ones along Y at `x = offset`
    pub is_horizontal: bool,
}

/// Applied stresses in MPa. Positive `sx`/`sy` compress the plate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Load {
    #[serde(default)]
    pub sx: f64,
    #[serde(default)]
    pub sy: f64,
    #[serde(default)]
    pub tau: f64,
    /// Lateral pressure
    #[serde(default)]
    pub pressure: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementFamily {
    /// 4-node flat shell
    #[default]
    S4,
}

impl ElementFamily {
    pub fn tag(&self) -> &'static str {
        match self {
            ElementFamily::S4 => "S4",
        }
    }
}

/// Analysis settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub element_family: ElementFamily,
    /// Maximum distance between mesh lines in mm, 0 selects `DEFAULT_MAX_DISTANCE`
    #[serde(default)]
    pub max_distance: u64,
    /// Elastic modulus (MPa)
    #[serde(default = "default_elasticity")]
    pub elasticity: f64,
    #[serde(default = "default_poisson_ratio")]
    pub poisson_ratio: f64,
}

fn default_elasticity() -> f64 {
    205_000.0
}

fn default_poisson_ratio() -> f64 {
    0.3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            element_family: ElementFamily::S4,
            max_distance: 0,
            elasticity: default_elasticity(),
            poisson_ratio: default_poisson_ratio(),
        }
    }
}

impl Config {
    pub fn mesh_spacing(&self) -> u64 {
        if self.max_distance == 0 {
            DEFAULT_MAX_DISTANCE
        } else {
            self.max_distance
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.elasticity.is_finite() && self.elasticity > 0.0) {
            return Err(ValidationError::InvalidMaterial(format!(
                "elastic modulus must be positive (received {})",
                self.elasticity
            )));
        }
        if !(self.poisson_ratio.is_finite() && self.poisson_ratio > -1.0 && self.poisson_ratio < 0.5) {
            return Err(ValidationError::InvalidMaterial(format!(
                "Poisson ratio must lie in (-1, 0.5) (received {})",
                self.poisson_ratio
            )));
        }
        Ok(())
    }
}

impl Design {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.width == 0 {
            return Err(ValidationError::ZeroDimension("width"));
        }
        if self.height == 0 {
            return Err(ValidationError::ZeroDimension("height"));
        }
        if self.thickness == 0 {
            return Err(ValidationError::ZeroDimension("thickness"));
        }
        for (index, stiffener) in self.stiffeners.iter().enumerate() {
            let invalid = |reason: String| ValidationError::InvalidStiffener { index, reason };
            if stiffener.width == 0 {
                return Err(invalid("width must be greater than zero".to_string()));
            }
            if stiffener.thickness == 0 {
                return Err(invalid("thickness must be greater than zero".to_string()));
            }
            // Horizontal stiffeners sit at y = offset, vertical ones at x = offset
            let span = if stiffener.is_horizontal { self.height } else { self.width };
            if stiffener.offset == 0 || stiffener.offset >= span {
                return Err(invalid(format!(
                    "offset {} must lie strictly inside the plate (0, {})",
                    stiffener.offset, span
                )));
            }
        }
        Ok(())
    }

    /// Shell sections in deck order: base plate first, then stiffeners in design order.
    pub fn regions(&self) -> Vec<Region> {
        let mut regions = vec![Region {
            name: BASE_REGION.to_string(),
            thickness: self.thickness,
        }];
        regions.extend(self.stiffeners.iter().enumerate().map(|(i, s)| Region {
            name: stiffener_region(i),
            thickness: s.thickness,
        }));
        regions
    }
}

/// A named element set with its shell thickness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub thickness: u64,
}

/// The three scalars extracted from one solver run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Minimum absolute buckling factor across all modes
    pub buckling_factor: f64,
    /// Peak Euclidean norm of the stress tensor components (MPa)
    pub max_stress: f64,
    /// Peak displacement magnitude (mm)
    pub max_displacement: f64,
}

/// Analysis request accepted by the service and the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub design: Design,
    #[serde(default)]
    pub load: Load,
    #[serde(default)]
    pub config: Option<Config>,
}

/// Analysis response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub job_id: String,
    pub status: AnalysisStatus,
    pub results: Option<Report>,
    pub error_message: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnalysisStatus {
    Success,
    Failed,
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Base plate dimensions:")?;
        writeln!(f, "| {:<12}{:>6} mm |", "Height:", self.height)?;
        writeln!(f, "| {:<12}{:>6} mm |", "Width:", self.width)?;
        writeln!(f, "| {:<12}{:>6} mm |", "Thickness:", self.thickness)?;
        writeln!(f)?;
        for (i, stiffener) in self.stiffeners.iter().enumerate() {
            writeln!(f, "Stiffener position: {}", i + 1)?;
            write!(f, "{}", stiffener)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stiffener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stiffener dimensions:")?;
        writeln!(f, "| {:<19}{:>6} mm |", "Width:", self.width)?;
        writeln!(f, "| {:<19}{:>6} mm |", "Thickness:", self.thickness)?;
        writeln!(f, "| {:<19}{:>6} mm |", "Offset from plane:", self.offset)?;
        writeln!(f, "| {:<19}{:>6}    |", "Horizontal:", self.is_horizontal)
    }
}

impl fmt::Display for Load {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Loads:")?;
        writeln!(f, "| {:<18}{:>8.3} MPa |", "Sx:", self.sx)?;
        writeln!(f, "| {:<18}{:>8.3} MPa |", "Sy:", self.sy)?;
        writeln!(f, "| {:<18}{:>8.3} MPa |", "Tau:", self.tau)?;
        writeln!(f, "| {:<18}{:>8.3} MPa |", "Lateral pressure:", self.pressure)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "| {:<20}{:>8.2} times |", "Buckling factor", self.buckling_factor)?;
        writeln!(f, "| {:<20}{:>8.2} MPa   |", "Maximal stress", self.max_stress)?;
        writeln!(f, "| {:<20}{:>8.2} mm    |", "Maximal deformation", self.max_displacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plate() -> Design {
        Design {
            width: 1800,
            height: 1800,
            thickness: 12,
            stiffeners: vec![Stiffener {
                width: 100,
                thickness: 10,
                offset: 600,
                is_horizontal: true,
            }],
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.element_family, ElementFamily::S4);
        assert_eq!(config.elasticity, 205_000.0);
        assert_eq!(config.poisson_ratio, 0.3);
        assert_eq!(config.mesh_spacing(), DEFAULT_MAX_DISTANCE);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: Config = serde_json::from_str(r#"{"max_distance": 50}"#).unwrap();
        assert_eq!(config.max_distance, 50);
        assert_eq!(config.elasticity, 205_000.0);
        assert_eq!(config.mesh_spacing(), 50);
    }

    #[test]
    fn test_regions_follow_design_order() {
        let mut design = plate();
        design.stiffeners.push(Stiffener {
            width: 80,
            thickness: 8,
            offset: 900,
            is_horizontal: false,
        });
        let names: Vec<_> = design.regions().into_iter().map(|r| (r.name, r.thickness)).collect();
        assert_eq!(
            names,
            vec![
                ("BASE".to_string(), 12),
                ("STIFF0".to_string(), 10),
                ("STIFF1".to_string(), 8)
            ]
        );
    }

    #[test]
    fn test_validate_rejects_stiffener_on_edge() {
        let mut design = plate();
        design.stiffeners[0].offset = 1800;
        assert!(matches!(
            design.validate(),
            Err(ValidationError::InvalidStiffener { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_thickness() {
        let mut design = plate();
        design.thickness = 0;
        assert_eq!(design.validate(), Err(ValidationError::ZeroDimension("thickness")));
    }

    #[test]
    fn test_validate_rejects_bad_poisson_ratio() {
        let config = Config {
            poisson_ratio: 0.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_report_table() {
        let report = Report {
            buckling_factor: 269.93,
            max_stress: 1.05,
            max_displacement: 0.03,
        };
        let text = report.to_string();
        assert!(text.contains("Buckling factor"));
        assert!(text.contains("269.93 times"));
        assert!(text.contains("0.03 mm"));
    }
}
