use std::{io::Write, process};

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use kmerpeak::{
    cli::Args,
    pipeline::{Pipeline, RunRequest, RunSummary},
    runner::SystemRunner,
};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(1);
            }
        },
    };

    init_tracing(args.log_level());

    let (config, request) = match args
        .pipeline_config()
        .and_then(|config| Ok((config, args.run_request()?)))
    {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!();
            eprintln!(
                "{}\n {}",
                "Problem parsing arguments:".blue().bold(),
                e.to_string().blue()
            );
            eprintln!();
            eprintln!("{}\n {}", "Help menu:".blue().bold(), "$ kmerpeak --help".bold());
            eprintln!();
            process::exit(1);
        }
    };

    if !args.json && !args.quiet {
        print_header(&request);
    }

    let result = Pipeline::new(config, SystemRunner).and_then(|pipeline| pipeline.run(&request));
    match result {
        Ok(summary) => {
            if let Err(e) = print_summary(&summary, args.json) {
                eprintln!("{}\n {}", "Output error:".blue().bold(), e.to_string().blue());
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!(
                "{}\n {}",
                "Application error:".blue().bold(),
                e.to_string().blue()
            );
            process::exit(1);
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kmerpeak={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_header(request: &RunRequest) {
    println!("{}: {}", "stem".bold(), request.layout.stem().to_string().blue().bold());
    println!(
        "{}: {}",
        "forward".bold(),
        request.reads.forward.display().to_string().underline().bold().blue()
    );
    println!(
        "{}: {}",
        "reverse".bold(),
        request.reads.reverse.display().to_string().underline().bold().blue()
    );
    println!(
        "{}: {}",
        "trim".bold(),
        (if request.trim { "yes" } else { "no" }).blue().bold()
    );
    println!();
}

fn print_summary(summary: &RunSummary, json: bool) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, summary)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "{}: {}", "histogram".bold(), summary.histogram.display())?;
    writeln!(out, "{}: {}", "plot".bold(), summary.plot.display())?;
    let stats = &summary.stats;
    writeln!(out, "{}: {}", "distinct k-mers".bold(), stats.distinct_kmers)?;
    match (stats.peak_depth, stats.genome_size_estimate) {
        (Some(depth), Some(size)) => {
            writeln!(out, "{}: {}", "peak depth".bold(), depth.to_string().blue().bold())?;
            writeln!(out, "{}: {}", "genome size estimate".bold(), size.to_string().blue().bold())?;
        }
        _ => writeln!(out, "{}", "no coverage peak found".yellow())?,
    }
    Ok(())
}
