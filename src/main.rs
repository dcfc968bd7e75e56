use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use shelf_packer::config::PackingTask;
use shelf_packer::error::PackError;
use shelf_packer::render;
use shelf_packer::solver::Strategy;
use shelf_packer::types::{Demand, Point};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "shelf_packer",
    about = "2D shelf bin packing with Next-Fit, First-Fit and Best-Fit heuristics"
)]
struct Cli {
    /// Bin dimensions (WxH, e.g. 10x10)
    #[arg(long, value_parser = parse_dimensions, required_unless_present = "task")]
    bin: Option<Point>,

    /// Items as WxH:count, in priority order (e.g. 6x5:2 4x5:1)
    #[arg(long = "items", num_args = 1.., value_parser = parse_demand)]
    items: Vec<Demand>,

    /// JSON task file with bin, items and strategy
    #[arg(long, conflicts_with_all = ["bin", "items"])]
    task: Option<PathBuf>,

    /// Strategy: next-fit, first-fit, or best-fit (overrides the task file)
    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<Strategy>,

    /// Show ASCII layout of each bin
    #[arg(long)]
    layout: bool,

    /// Log every opened bin and shelf to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    s.parse().map_err(|e: PackError| e.to_string())
}

fn parse_dimensions(s: &str) -> Result<Point, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let width = parts[0]
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let height = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if width == 0 || height == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(Point::new(width, height))
}

fn parse_demand(s: &str) -> Result<Demand, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid item '{}', expected WxH:count", s));
    }
    let size = parse_dimensions(parts[0])?;
    let count = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("count must be a non-negative integer in '{}'", s))?;
    Ok(Demand { size, count })
}

fn load_task(cli: &Cli) -> Result<PackingTask, PackError> {
    let mut task = match (&cli.task, cli.bin) {
        (Some(path), _) => PackingTask::from_path(path)?,
        (None, Some(bin)) => PackingTask {
            bin,
            items: cli.items.clone(),
            strategy: Strategy::default(),
        },
        (None, None) => unreachable!("clap requires --bin or --task"),
    };
    if let Some(strategy) = cli.strategy {
        task.strategy = strategy;
    }
    Ok(task)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let solution = match load_task(&cli).and_then(|task| task.solver().solve()) {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Strategy: {}, bin {}x{}",
        solution.strategy, solution.bin_size.x, solution.bin_size.y
    );
    println!();

    for (i, bin) in solution.bins.iter().enumerate() {
        println!(
            "Bin {} ({:.1}% filled):",
            i + 1,
            100.0 * bin.filled_area_ratio()
        );
        for (shelf, shelf_offset) in bin.shelves() {
            println!("  shelf {}:", render::describe(*shelf_offset, shelf.size()));
            for (item, item_offset) in shelf.items() {
                println!(
                    "    {}",
                    render::describe(*shelf_offset + *item_offset, item.size)
                );
            }
        }
        if cli.layout {
            print!("{}", render::render_bin(bin));
        }
        println!();
    }

    println!(
        "Summary: {} bin{} used, {:.1}% filled",
        solution.bin_count(),
        if solution.bin_count() == 1 { "" } else { "s" },
        solution.filled_percent(),
    );
    ExitCode::SUCCESS
}
