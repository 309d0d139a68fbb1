extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;

pub mod assembler;
pub mod config;
pub mod emit;
pub mod error;
pub mod translator;

#[cfg(test)]
mod emulator;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use term_grid::{Cell, Direction, Filling, Grid, GridOptions};

use std::fs;

use assembler::analyzer::Analyzer;
use config::{Config, Mode};
use emit::Lines;
use error::{Error, Result};

fn main() {
    let args = process_arguments();
    initialize_logging(verbosity(&args));

    let config = match Config::from_matches(&args) {
        Ok(config) => config,
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        }
    };

    debug!("Arguments:\n\tMode: {:?}\n\tInfile: {}\n\tOutfile: {}\n\tPrint Debug: {}\n\tLabels: {:?}",
        config.mode,
        config.input.display(),
        config.output.display(),
        config.print_debug,
        config.labels,
    );

    if let Err(err) = run(&config) {
        error!("fatal: {}", err);
        std::process::exit(1);
    }
}

/// Reads the input, runs the selected pipeline and writes the output.
/// Nothing is written unless the whole pipeline succeeds.
fn run(config: &Config) -> Result<()> {
    let source = fs::read_to_string(&config.input)
        .map_err(|source| Error::Io { path: config.input.clone(), source })?;

    let output = match config.mode {
        Mode::Assemble => assemble(config, &source)?,
        Mode::Translate => translate(config, &source)?,
    };

    fs::write(&config.output, output)
        .map_err(|source| Error::Io { path: config.output.clone(), source })?;
    info!("wrote {}", config.output.display());
    Ok(())
}

fn assemble(config: &Config, source: &str) -> Result<String> {
    if !config.print_debug {
        return assembler::assemble(source, config.labels);
    }

    let program = assembler::parser::parse(source)?;
    let symbols = Analyzer::new(config.labels).run(&program)?;
    let mut gen = assembler::codegen::CodeGenerator::new(symbols);

    let mut grid = new_grid();
    let mut out = Lines::new();
    for ins in program.instructions.iter() {
        if let Some(word) = gen.instruction(ins)? {
            grid.add(Cell::from(format!("0x{:04X}:", out.len())));
            grid.add(Cell::from(format!("{}", ins)));
            grid.add(Cell::from("=>".to_string()));
            grid.add(Cell::from(assembler::codegen::format_word(word)));
            out.push(assembler::codegen::format_word(word));
        }
    }
    println!("{}", grid.fit_into_columns(4));
    debug!("{} symbol(s) known after assembly", gen.symbols().len());

    Ok(out.finish())
}

fn translate(config: &Config, source: &str) -> Result<String> {
    let prefix = config.static_prefix();
    if !config.print_debug {
        return translator::translate(source, &prefix);
    }

    let program = translator::parser::parse(source)?;
    let mut gen = translator::codegen::CodeGenerator::new(prefix);

    let mut grid = new_grid();
    let mut out = Lines::new();
    for (idx, cmd) in program.commands.iter().enumerate() {
        let block = gen.command(cmd)?;
        grid.add(Cell::from(format!("{:4}:", idx)));
        grid.add(Cell::from(format!("{}", cmd)));
        grid.add(Cell::from("=>".to_string()));
        grid.add(Cell::from(format!("{} line(s)", block.len())));
        out.extend(block);
    }
    println!("{}", grid.fit_into_columns(4));

    Ok(out.finish())
}

fn new_grid() -> Grid {
    Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    })
}

fn process_arguments() -> ArgMatches<'static> {
    let input = |ext: &str| Arg::with_name("INPUT")
        .help(if ext == "asm" { "Sets the .asm input file to use" } else { "Sets the .vm input file to use" })
        .required(true)
        .multiple(false)
        .index(1);
    let output = || Arg::with_name("output")
        .short("o")
        .takes_value(true)
        .help("write output to an outfile instead of the derived path");
    let print_debug = || Arg::with_name("print-debug")
        .short("d")
        .long("print-debug")
        .alias("show")
        .takes_value(false)
        .help("prints the debug information alongside the output to STDOUT");

    App::new(option_env!("CARGO_PKG_NAME").unwrap_or("hackc"))
        .version(option_env!("CARGO_PKG_VERSION").unwrap_or("0.0.0"))
        .author(option_env!("CARGO_PKG_AUTHORS").unwrap_or(""))
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap_or(""))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .global(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .subcommand(SubCommand::with_name("asm")
            .about("assembles Hack assembly (.asm) into machine code (.hack)")
            .arg(input("asm"))
            .arg(output())
            .arg(print_debug())
            .arg(Arg::with_name("strict-labels")
                .long("strict-labels")
                .takes_value(false)
                .help("fail on a repeated label declaration instead of keeping the first")))
        .subcommand(SubCommand::with_name("vm")
            .about("translates VM bytecode (.vm) into Hack assembly (.asm)")
            .arg(input("vm"))
            .arg(output())
            .arg(print_debug()))
        .get_matches()
}

/// `-v` may be given before or after the subcommand.
fn verbosity(args: &ArgMatches) -> u64 {
    let sub = match args.subcommand() {
        (_, Some(sub)) => sub.occurrences_of("verbose"),
        _ => 0,
    };
    args.occurrences_of("verbose").max(sub)
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 | _ => log::LevelFilter::Debug,
        })
        .chain(std::io::stdout())
        .apply().ok();
}
