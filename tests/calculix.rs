//! End-to-end runs against a real `ccx`. Run with `cargo test -- --ignored`.

use approx::assert_relative_eq;
use plate_buckling::prelude::*;

fn stiffener(offset: u64) -> Stiffener {
    Stiffener {
        width: 100,
        thickness: 10,
        offset,
        is_horizontal: true,
    }
}

#[test]
#[ignore = "requires CalculiX (ccx)"]
fn test_stiffened_square_plate_under_longitudinal_compression() {
    let design = Design {
        width: 1800,
        height: 1800,
        thickness: 12,
        stiffeners: vec![stiffener(600), stiffener(1200)],
    };
    let load = Load {
        sx: 1.0,
        ..Load::default()
    };
    let config = Config {
        max_distance: 100,
        ..Config::default()
    };

    let report = calculate(&design, &load, Some(&config)).unwrap();

    assert_relative_eq!(report.buckling_factor, 269.9, max_relative = 0.01);
    assert_relative_eq!(report.max_stress, 1.05, max_relative = 0.05);
    assert_relative_eq!(report.max_displacement, 0.03, max_relative = 0.2);
}

#[test]
#[ignore = "requires CalculiX (ccx)"]
fn test_unstiffened_square_plate_buckles_far_earlier() {
    let design = Design {
        width: 1800,
        height: 1800,
        thickness: 12,
        stiffeners: vec![],
    };
    let load = Load {
        sx: 1.0,
        ..Load::default()
    };

    let report = calculate(&design, &load, None).unwrap();

    assert!(report.buckling_factor.is_finite());
    assert!(report.buckling_factor < 269.9);
    assert!(report.max_stress.is_finite());
    assert!(report.max_displacement.is_finite());
}

#[test]
#[ignore = "requires CalculiX (ccx)"]
fn test_slender_plate_under_lateral_pressure() {
    let design = Design {
        width: 2000,
        height: 500,
        thickness: 5,
        stiffeners: vec![],
    };
    let load = Load {
        pressure: 0.01,
        ..Load::default()
    };
    let config = Config {
        max_distance: 50,
        elasticity: 206000.0,
        ..Config::default()
    };

    let report = calculate(&design, &load, Some(&config)).unwrap();

    assert!(report.buckling_factor.is_finite());
    assert!(report.max_stress.is_finite());
    assert!(report.max_displacement.is_finite());
}
