// Copyright 2024 The JsonCmp Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use jsoncmp::{JsonCompare, PathPattern, RenderOptions, Side, Validation};

#[doc(hidden)]
#[macro_export]
macro_rules! write_to_file {
    ($writer:expr, $msg:expr) => {
        if let Err(err) = writeln!($writer, $msg) {
            eprintln!("Error: {}", err);
            std::process::exit(Code::INTERNAL_ERROR);
        }
    };

    ($writer:expr, $msg:expr, $($arg:tt)*) => {
        if let Err(err) = writeln!($writer, $msg, $($arg)*) {
            eprintln!("Error: {}", err);
            std::process::exit(Code::INTERNAL_ERROR);
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! handle_error {
    ($code:expr, $msg:expr, $($arg:tt)*) => {
        eprintln!($msg, $($arg)*);
        std::process::exit($code);
    };

    ($code:expr, $msg:expr) => {
        eprintln!($msg);
        std::process::exit($code);
    };
}

#[doc(hidden)]
struct Code;

impl Code {
    const SUCCESS: i32 = 0;
    const INTERNAL_ERROR: i32 = 1;
    const INVALID_ARGUMENT: i32 = 2;
    const INPUT_ERROR: i32 = 3;
    const DIFFERENCES_FOUND: i32 = 4;
}

#[doc(hidden)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[doc(hidden)]
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Original JSON document, `-` reads stdin
    left: PathBuf,

    /// New JSON document, `-` reads stdin
    right: PathBuf,

    /// Include array reorderings in the output
    #[clap(short = 'r', long)]
    show_reorders: bool,

    /// Separator placed between object keys in displayed paths
    #[clap(short, long, default_value = jsoncmp::DEFAULT_SEPARATOR)]
    separator: String,

    /// Only show changes under this path, e.g. `$.users[*].name`
    #[clap(short, long)]
    only: Option<PathPattern>,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Only check that both documents are valid JSON
    #[clap(long)]
    validate: bool,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jsoncmp=warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

#[doc(hidden)]
fn main() {
    init_logging();
    let cli = Cli::parse();

    if cli.left.as_os_str() == "-" && cli.right.as_os_str() == "-" {
        handle_error!(
            Code::INVALID_ARGUMENT,
            "Error: stdin can only be used for one of the documents"
        );
    }

    let left = match read_input(&cli.left) {
        Ok(text) => text,
        Err(err) => {
            handle_error!(Code::INTERNAL_ERROR, "Error reading {}: {}", cli.left.display(), err);
        }
    };
    let right = match read_input(&cli.right) {
        Ok(text) => text,
        Err(err) => {
            handle_error!(Code::INTERNAL_ERROR, "Error reading {}: {}", cli.right.display(), err);
        }
    };

    let mut out = io::stdout().lock();

    if cli.validate {
        let validation = Validation::check(&left, &right);
        for side in [Side::Left, Side::Right] {
            let state = if validation.is_invalid(side) { "invalid" } else { "valid" };
            write_to_file!(out, "{}: {}", side, state);
        }
        std::process::exit(if validation.is_ok() {
            Code::SUCCESS
        } else {
            Code::INPUT_ERROR
        });
    }

    let mut options = RenderOptions::new()
        .show_reorders(cli.show_reorders)
        .separator(cli.separator);
    if let Some(pattern) = cli.only {
        options = options.only(pattern);
    }

    let report = match JsonCompare::new()
        .with_left(&left)
        .with_right(&right)
        .with_options(options)
        .compare()
    {
        Ok(report) => report,
        Err(err) => {
            handle_error!(Code::INPUT_ERROR, "Error: {}", err);
        }
    };

    match cli.format {
        Format::Text => {
            write_to_file!(out, "{}", report);
        }
        Format::Json => match serde_json::to_string_pretty(&report.summary()) {
            Ok(json) => {
                write_to_file!(out, "{}", json);
            }
            Err(err) => {
                handle_error!(Code::INTERNAL_ERROR, "Error: {}", err);
            }
        },
    }

    if report.has_differences() {
        std::process::exit(Code::DIFFERENCES_FOUND);
    }
    std::process::exit(Code::SUCCESS);
}
