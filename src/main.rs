use voxcell::config::load_config;
use voxcell::io::write_json_file;
use voxcell::run_directory;
use std::env;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let started = Instant::now();
    let outcomes = run_directory(&config.input_dir, &config.batch)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let mut failed = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => {
                println!(
                    "{}  volume={:.3}  elapsed_ms={:.1}",
                    report.id, report.volume, report.elapsed_ms
                );
            }
            Err(e) => {
                failed += 1;
                println!("{}  failed: {e}", outcome.id);
            }
        }
    }
    println!(
        "{} objects ({failed} failed) in {elapsed_ms:.1} ms",
        outcomes.len()
    );

    if let Some(json_out) = &config.json_out {
        let reports: Vec<_> = outcomes.iter().filter_map(|o| o.report()).collect();
        write_json_file(json_out, &reports)?;
        println!("JSON report written to {}", json_out.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: voxcell <config.json>".to_string()
}
