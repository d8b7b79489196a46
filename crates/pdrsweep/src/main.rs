use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use pdrsweep::{
    CampaignFile, CommandRunner, OutputFormat, ReportDocument, init_logging, load_references,
    render_plan,
};
use pdrsweep_core::{MemoizingGateway, SweepConfig, run_sweep};

#[derive(Parser, Debug)]
#[command(name = "pdrsweep")]
#[command(about = "Sweep a LoRaWAN simulation over arrival rates and report uplink delivery ratios")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the rate-to-period table and campaign size without running anything
    Plan {
        /// Campaign file (defaults to the built-in sweep)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run the campaign and report mean/std delivery ratio per rate
    Run {
        /// Campaign file
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML reference series to compare against
        #[arg(short, long)]
        reference: Option<PathBuf>,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_file.as_deref(), &args.log_level)?;

    match args.command {
        Command::Plan { config } => {
            let sweep = match config {
                Some(path) => CampaignFile::load(&path)?.sweep,
                None => SweepConfig::default(),
            };
            let space = sweep.plan()?;
            print!("{}", render_plan(&sweep, &space));
        }
        Command::Run {
            config,
            format,
            output,
            reference,
        } => {
            let campaign = CampaignFile::load(&config)?;
            let references = match reference {
                Some(path) => load_references(&path)?,
                None => Vec::new(),
            };

            let runner = CommandRunner::new(campaign.simulator()?);
            let mut gateway = MemoizingGateway::new(runner);
            let report = run_sweep(&campaign.sweep, &mut gateway).wrap_err("sweep failed")?;
            tracing::info!(simulations = gateway.executed_count(), "sweep complete");

            let rendered = ReportDocument::new(report, &references).render(format)?;
            match output {
                Some(path) => fs::write(&path, rendered)
                    .wrap_err_with(|| format!("failed to write report to {}", path.display()))?,
                None => print!("{rendered}"),
            }
        }
    }

    Ok(())
}
