//! Run configuration, derived from the command line.
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use clap::ArgMatches;

use crate::assembler::analyzer::DuplicateLabelPolicy;
use crate::error::{Error, Result};
use crate::translator::codegen::DEFAULT_STATIC_PREFIX;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mode {
    /// `.asm` => `.hack`
    Assemble,
    /// `.vm` => `.asm`
    Translate,
}

impl Mode {
    pub fn input_extension(&self) -> &'static str {
        match self {
            Mode::Assemble => "asm",
            Mode::Translate => "vm",
        }
    }

    pub fn output_extension(&self) -> &'static str {
        match self {
            Mode::Assemble => "hack",
            Mode::Translate => "asm",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Config {
    pub mode: Mode,
    pub input: PathBuf,
    pub output: PathBuf,
    pub print_debug: bool,
    pub labels: DuplicateLabelPolicy,
}

impl Config {
    /// Validates the file extensions and derives the output path
    /// from the input when none is given.
    pub fn new(mode: Mode, input: PathBuf, output: Option<PathBuf>) -> Result<Self> {
        check_extension(&input, mode.input_extension())?;
        let output = match output {
            Some(path) => {
                check_extension(&path, mode.output_extension())?;
                path
            }
            None => input.with_extension(mode.output_extension()),
        };
        Ok(Config {
            mode,
            input,
            output,
            print_debug: false,
            labels: DuplicateLabelPolicy::default(),
        })
    }

    pub fn from_matches(args: &ArgMatches) -> Result<Self> {
        let (mode, sub) = match args.subcommand() {
            ("asm", Some(sub)) => (Mode::Assemble, sub),
            ("vm", Some(sub)) => (Mode::Translate, sub),
            (name, _) => return Err(Error::semantic(format!("unknown subcommand `{}`", name))),
        };

        let input = PathBuf::from(sub.value_of("INPUT").unwrap_or_default());
        let output = sub.value_of("output").map(PathBuf::from);

        let mut config = Config::new(mode, input, output)?;
        config.print_debug = sub.is_present("print-debug");
        if sub.is_present("strict-labels") {
            config.labels = DuplicateLabelPolicy::Reject;
        }
        Ok(config)
    }

    /// Prefix for the `static` segment symbols of a translated file:
    /// the input file stem, made safe for use as an assembly symbol.
    pub fn static_prefix(&self) -> String {
        let stem = self.input.file_stem().and_then(OsStr::to_str).unwrap_or("");
        let mut prefix: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | ':') { c } else { '_' })
            .collect();
        if prefix.is_empty() {
            return DEFAULT_STATIC_PREFIX.to_string();
        }
        if prefix.starts_with(|c: char| c.is_ascii_digit()) {
            prefix.insert(0, '_');
        }
        prefix
    }
}

fn check_extension(path: &Path, expected: &'static str) -> Result<()> {
    if path.extension().and_then(OsStr::to_str) == Some(expected) {
        Ok(())
    } else {
        Err(Error::Extension { path: path.to_path_buf(), expected })
    }
}
