use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use serde::Serialize;

use parcel_routing::clock::parse_clock;
use parcel_routing::report::{format_mileage, format_status, format_status_table, format_wave};
use parcel_routing::scenario::Scenario;
use parcel_routing::simulation::Simulation;

#[derive(Parser)]
#[command(name = "parcel-routing")]
#[command(about = "Simulate a day of parcel deliveries and query package status")]
struct Cli {
    /// Scenario document (JSON); the embedded demo day when omitted
    #[arg(long, global = true)]
    scenario: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Status of one package at a time of day
    Status {
        id: u32,
        /// Query time, HH:MM
        #[arg(long, value_parser = parse_clock)]
        at: NaiveTime,
    },
    /// Status of every package at a time of day
    All {
        #[arg(long, value_parser = parse_clock)]
        at: NaiveTime,
    },
    /// Total fleet mileage
    Mileage,
    /// Per-wave routes
    Routes,
    /// Interactive menu (the default)
    Menu,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("could not load scenario {}", path.display()))?,
        None => Scenario::demo().context("embedded demo scenario is invalid")?,
    };
    let mut sim = scenario
        .into_simulation()
        .context("scenario failed validation")?;
    sim.run().context("a delivery wave could not start")?;

    match cli.command.unwrap_or(Command::Menu) {
        Command::Status { id, at } => {
            let report = sim.status(id, at)?;
            emit(cli.json, &report, || format_status(&report))?;
        }
        Command::All { at } => {
            let reports = sim.statuses(at);
            emit(cli.json, &reports, || format_status_table(at, &reports))?;
        }
        Command::Mileage => {
            let report = sim.mileage_report();
            emit(cli.json, &report, || format_mileage(&report))?;
        }
        Command::Routes => {
            let reports = sim.reports();
            emit(cli.json, &reports, || {
                reports.iter().map(format_wave).collect::<Vec<_>>().join("\n")
            })?;
        }
        Command::Menu => menu(&sim)?,
    }
    Ok(())
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
        println!();
    }
    Ok(())
}

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

fn prompt_time(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Option<NaiveTime>> {
    loop {
        let Some(text) = prompt(lines, "Time (HH:MM): ")? else {
            return Ok(None);
        };
        match parse_clock(&text) {
            Ok(t) => return Ok(Some(t)),
            Err(e) => println!("{e}"),
        }
    }
}

fn menu(sim: &Simulation) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!();
        println!("1. Status of one package");
        println!("2. Status of all packages");
        println!("3. Total mileage");
        println!("4. Exit");
        let Some(choice) = prompt(&mut lines, "> ")? else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => {
                let Some(id) = prompt(&mut lines, "Package id: ")? else {
                    return Ok(());
                };
                let Ok(id) = id.parse::<u32>() else {
                    println!("'{id}' is not a package id");
                    continue;
                };
                let Some(at) = prompt_time(&mut lines)? else {
                    return Ok(());
                };
                match sim.status(id, at) {
                    Ok(report) => println!("{}", format_status(&report)),
                    Err(e) => println!("{e}"),
                }
            }
            "2" => {
                let Some(at) = prompt_time(&mut lines)? else {
                    return Ok(());
                };
                print!("{}", format_status_table(at, &sim.statuses(at)));
            }
            "3" => print!("{}", format_mileage(&sim.mileage_report())),
            "4" | "q" | "exit" => return Ok(()),
            other => println!("unknown option '{other}'"),
        }
    }
}
