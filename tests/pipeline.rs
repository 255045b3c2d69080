use approx::assert_relative_eq;
use plate_buckling::boundary::{BoundaryTable, Dof};
use plate_buckling::prelude::*;

fn square_plate() -> Design {
    Design {
        width: 1800,
        height: 1800,
        thickness: 12,
        stiffeners: vec![],
    }
}

fn stiffened_plate() -> Design {
    Design {
        width: 1800,
        height: 1200,
        thickness: 12,
        stiffeners: vec![
            Stiffener {
                width: 150,
                thickness: 10,
                offset: 600,
                is_horizontal: true,
            },
            Stiffener {
                width: 100,
                thickness: 8,
                offset: 900,
                is_horizontal: false,
            },
        ],
    }
}

#[test]
fn test_longitudinal_compression_is_self_equilibrated() {
    let design = square_plate();
    let mesh = OrthoMesher::new().generate(&design, 100).unwrap();
    let load = Load {
        sx: 1.0,
        ..Load::default()
    };
    let forces = plate_buckling::loads::distribute(&mesh, &load, design.thickness).unwrap();

    assert_relative_eq!(plate_buckling::loads::resultant(&forces, Dof::X), 0.0, epsilon = 1e-6);
    let pushed: f64 = forces.iter().filter(|f| f.value > 0.0).map(|f| f.value).sum();
    assert_relative_eq!(pushed, 1.0 * 1800.0 * 12.0, epsilon = 1e-6);
}

#[test]
fn test_shear_flow_is_self_equilibrated() {
    let design = stiffened_plate();
    let mesh = OrthoMesher::new().generate(&design, 100).unwrap();
    let load = Load {
        tau: 2.5,
        ..Load::default()
    };
    let forces = plate_buckling::loads::distribute(&mesh, &load, design.thickness).unwrap();

    assert_relative_eq!(plate_buckling::loads::resultant(&forces, Dof::X), 0.0, epsilon = 1e-6);
    assert_relative_eq!(plate_buckling::loads::resultant(&forces, Dof::Y), 0.0, epsilon = 1e-6);
    assert!(forces.iter().all(|f| mesh.points()[f.point][2] == 0));
}

#[test]
fn test_pressure_total_matches_plate_area() {
    let design = stiffened_plate();
    let mesh = OrthoMesher::new().generate(&design, 50).unwrap();
    let load = Load {
        pressure: 0.01,
        ..Load::default()
    };
    let forces = plate_buckling::loads::distribute(&mesh, &load, design.thickness).unwrap();

    assert!(forces.iter().all(|f| f.dof == Dof::Z));
    assert_relative_eq!(
        plate_buckling::loads::resultant(&forces, Dof::Z),
        0.01 * 1800.0 * 1200.0,
        max_relative = 1e-9
    );
}

#[test]
fn test_stiffener_points_are_never_restrained() {
    let design = stiffened_plate();
    let mesh = OrthoMesher::new().generate(&design, 100).unwrap();
    let table = BoundaryTable::from_classes(mesh.classes());

    for (point, _) in table.fixed() {
        assert_eq!(mesh.points()[point][2], 0, "restrained point {} is off the base plane", point);
    }
}

#[test]
fn test_deck_is_deterministic_and_lists_every_region() {
    let analysis = Analysis::new();
    let load = Load {
        sx: 1.0,
        sy: 0.5,
        tau: 0.2,
        pressure: 0.01,
    };
    let config = Config::default();

    let first = analysis.prepare_deck(&stiffened_plate(), &load, &config).unwrap();
    let second = analysis.prepare_deck(&stiffened_plate(), &load, &config).unwrap();
    assert_eq!(first.as_str(), second.as_str());

    let text = first.as_str();
    for region in ["BASE", "STIFF0", "STIFF1"] {
        assert!(text.contains(&format!("*ELEMENT, TYPE=S4, ELSET={}\n", region)));
        assert!(text.contains(&format!("*SHELL SECTION,ELSET={}, MATERIAL=STEEL\n", region)));
        assert!(text.contains(&format!("*EL PRINT , ELSET={}\n", region)));
    }
    assert!(text.starts_with("*NODE, NSET=NALL\n"));
    assert!(text.ends_with("*END STEP\n"));
    assert_eq!(text.matches("*CLOAD\n").count(), 1);
    assert_eq!(text.matches("*BUCKLE\n2\n").count(), 1);
}

#[test]
fn test_edge_and_pressure_forces_share_one_cload_block() {
    let load = Load {
        sx: 1.0,
        pressure: 0.01,
        ..Load::default()
    };
    let deck = Analysis::new()
        .prepare_deck(&square_plate(), &load, &Config::default())
        .unwrap();
    let text = deck.as_str();
    assert_eq!(text.matches("*CLOAD\n").count(), 1);

    let block = text.split("*CLOAD\n").nth(1).unwrap();
    let block = &block[..block.find("*EL FILE").unwrap()];
    let dofs: Vec<usize> = block
        .lines()
        .map(|line| line.split(',').nth(1).unwrap().trim().parse().unwrap())
        .collect();

    assert!(dofs.iter().all(|&dof| dof == 1 || dof == 3));
    let first_z = dofs.iter().position(|&dof| dof == 3).unwrap();
    assert!(first_z > 0);
    assert!(dofs[first_z..].iter().all(|&dof| dof == 3));
}

#[test]
fn test_zero_load_produces_no_cloads() {
    let deck = Analysis::new()
        .prepare_deck(&square_plate(), &Load::default(), &Config::default())
        .unwrap();
    let text = deck.as_str();
    let after = text.split("*CLOAD\n").nth(1).unwrap();
    assert!(after.starts_with("*EL FILE"));
}

#[test]
fn test_stiffener_outside_plate_is_rejected() {
    let mut design = square_plate();
    design.stiffeners.push(Stiffener {
        width: 100,
        thickness: 10,
        offset: 2000,
        is_horizontal: true,
    });
    let err = Analysis::new()
        .prepare_deck(&design, &Load::default(), &Config::default())
        .unwrap_err();
    assert!(matches!(err, PlateError::Validation(ValidationError::InvalidStiffener { index: 0, .. })));
    assert!(!err.is_recoverable());
}
