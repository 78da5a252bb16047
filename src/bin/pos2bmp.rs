use anyhow::{Context, Result};
use clap::Parser;
use setpos_heatmap::{CLIArgs, Heatmap};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn init_logging(verbosity: u8) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install the log subscriber.")
}

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    init_logging(args.verbose)?;

    let points = setpos_heatmap::read_points(&args.input_path).with_context(|| {
        format!(
            "Failed to read positions from given file({}).",
            args.input_path.display()
        )
    })?;
    let heatmap = Heatmap::new(points, args.fixed_min(), args.fixed_max())
        .context("Failed to compute heatmap scores.")?;

    let bounds = heatmap.bounds();
    println!("Minimum: {}, Maximum: {}", bounds.min(), bounds.max());
    println!("Number of points: {}", heatmap.point_count());
    println!("Max score: {}", heatmap.max_score());

    let written = heatmap
        .save(&args.output_path, args.palette, args.quartiles)
        .with_context(|| {
            format!(
                "Failed to write heatmap to given file({}).",
                args.output_path.display()
            )
        })?;
    println!(
        "Wrote {} x {} heatmap({} bytes) to {}.",
        heatmap.width(),
        heatmap.height(),
        written,
        args.output_path.display()
    );

    Ok(())
}
