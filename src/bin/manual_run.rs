use plate_buckling::analysis::Analysis;
use plate_buckling::models::AnalysisRequest;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    let request_path = args.get(1).map(|s| s.as_str()).unwrap_or("sample_request.json");

    let json = std::fs::read_to_string(request_path)?;
    let request: AnalysisRequest = serde_json::from_str(&json)?;
    let config = request.config.unwrap_or_default();

    let report = Analysis::new().run(&request.design, &request.load, &config)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
