use std::time::Instant;

use plate_buckling::analysis::Analysis;
use plate_buckling::models::{Config, Design, Load, Stiffener};

struct Case {
    name: &'static str,
    design: Design,
    load: Load,
    config: Config,
}

fn stiffener(offset: u64) -> Stiffener {
    Stiffener {
        width: 100,
        thickness: 10,
        offset,
        is_horizontal: true,
    }
}

fn cases() -> Vec<Case> {
    vec![
        Case {
            name: "Stiffened square plate, longitudinal compression",
            design: Design {
                width: 1800,
                height: 1800,
                thickness: 12,
                stiffeners: vec![stiffener(600), stiffener(1200)],
            },
            load: Load {
                sx: 1.0,
                ..Load::default()
            },
            config: Config {
                max_distance: 100,
                ..Config::default()
            },
        },
        Case {
            name: "Slender plate, lateral pressure",
            design: Design {
                width: 2000,
                height: 500,
                thickness: 5,
                stiffeners: vec![],
            },
            load: Load {
                pressure: 0.01,
                ..Load::default()
            },
            config: Config {
                max_distance: 50,
                elasticity: 206000.0,
                ..Config::default()
            },
        },
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plate_buckling=info".into()),
        )
        .init();

    let analysis = Analysis::new();
    for case in cases() {
        println!("=== {} ===", case.name);
        print!("{}", case.design);
        print!("{}", case.load);

        let started = Instant::now();
        let report = analysis.run(&case.design, &case.load, &case.config)?;
        println!("Results ({:.2?}):", started.elapsed());
        print!("{}", report);
        println!();
    }
    Ok(())
}
