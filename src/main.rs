use bikeshare::BikeShare;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

const OUTPUT_DIR: &str = "bikeshare_report";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let client = BikeShare::new()?;
    let summary = client
        .report()
        .output_dir(PathBuf::from(OUTPUT_DIR))
        .call()
        .await?;

    println!(
        "Bike rental report: {} rows, {} duplicates, {} charts",
        summary.cleaning.rows,
        summary.cleaning.duplicate_rows,
        summary.artifacts.len()
    );
    println!("Open {} to view it.", summary.index.display());
    Ok(())
}
