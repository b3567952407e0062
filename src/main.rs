use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use neighborhoods::config::Params;
use neighborhoods::scenario::{self, Report, Scenario};
use neighborhoods::{coverage, render};

/// Count grid cells within a Manhattan distance of any positive cell.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file overriding default parameters.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute one neighborhood.
    Count {
        #[arg(long)]
        height: i64,
        #[arg(long)]
        width: i64,
        #[arg(short = 'n', long, allow_hyphen_values = true)]
        threshold: i64,
        /// Positive cell as ROW,COL. Repeatable.
        #[arg(long = "cell", value_parser = parse_cell, allow_hyphen_values = true)]
        cells: Vec<[i64; 2]>,
        /// Print every covered cell.
        #[arg(long)]
        list: bool,
        /// Write the coverage image to this PNG file.
        #[arg(long)]
        png: Option<PathBuf>,
    },
    /// Run the built-in catalogue, or scenarios from a JSON file.
    Scenarios {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        list: bool,
    },
}

fn parse_cell(s: &str) -> Result<[i64; 2], String> {
    let (r, c) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{s}'"))?;
    let r = r.trim().parse().map_err(|e| format!("bad row '{r}': {e}"))?;
    let c = c.trim().parse().map_err(|e| format!("bad column '{c}': {e}"))?;
    Ok([r, c])
}

fn print_report(report: &Report) {
    if let Some(cells) = &report.cells {
        println!("Covered cells:");
        for c in cells {
            println!("  {}", c);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    neighborhoods::init_tracing(cli.verbose);

    let params = match &cli.config {
        Some(path) => Params::from_json_file(path)?,
        None => Params::default(),
    };

    match cli.command {
        Command::Count {
            height,
            width,
            threshold,
            cells,
            list,
            png,
        } => {
            let scenario = Scenario::new("", height, width, threshold, &cells);
            let report = scenario.run(list || params.list_cells)?;
            print_report(&report);
            println!("{}: {} ({:.3} ms)", scenario, report.count, report.ms);

            if let Some(path) = png {
                let mask = coverage(&scenario.grid()?, threshold)?;
                let img = render::render_coverage(&mask, &params)?;
                image::save_buffer(&path, &img.rgba, img.w as u32, img.h as u32, image::ColorType::Rgba8)
                    .with_context(|| format!("saving {}", path.display()))?;
                eprintln!("Saved {}", path.display());
            }
        }
        Command::Scenarios { file, list } => {
            let scenarios = match file {
                Some(path) => scenario::load_json(&path)?,
                None => scenario::builtin(),
            };
            let (reports, total_ms) = scenario::run_all(&scenarios, list || params.list_cells);

            let mut mismatches = 0;
            for (i, (s, result)) in scenarios.iter().zip(reports).enumerate() {
                match result {
                    Ok(report) => {
                        print_report(&report);
                        let verdict = match report.matches(s) {
                            Some(true) => "",
                            Some(false) => {
                                mismatches += 1;
                                " MISMATCH"
                            }
                            None => "",
                        };
                        println!("scenario {} ({}): {}{}", i + 1, s, report.count, verdict);
                    }
                    Err(e) => println!("scenario {} ({}): error: {}", i + 1, s, e),
                }
            }
            println!("Total time: {:.3} ms", total_ms);
            if mismatches > 0 {
                bail!("{} scenario(s) did not match their expected count", mismatches);
            }
        }
    }
    Ok(())
}
