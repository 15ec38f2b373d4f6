// ==============================================================================
// CLI for protoshape
// ==============================================================================
//
// Two subcommands, one per output:
//   - `protoshape graphql [OPTIONS] <DESCRIPTOR>...`    -- GraphQL SDL types
//   - `protoshape typescript [OPTIONS] <DESCRIPTOR>...` -- TypeScript declarations
//
// A descriptor is protobuf.js JSON. Directories are searched recursively for
// `*.json` files. All descriptors load into one root, so types may reference
// types from other files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use miette::Context;
use walkdir::WalkDir;

use protoshape::{Converter, Int64Representation, ProtoRoot, load_descriptor_into};

const USAGE: &str = "\
Convert protobuf descriptors into GraphQL SDL types or TypeScript declarations

Usage: protoshape <COMMAND> [OPTIONS] <DESCRIPTOR>...

Commands:
  graphql     Print GraphQL type definitions for the selected types and everything they reference
  typescript  Print TypeScript declarations for the selected types

Arguments:
  <DESCRIPTOR>...  protobuf.js JSON file, or a directory searched for *.json files

Options:
      --type <TYPE>      Convert only this type (repeatable; default: every type)
      --input <TYPE>     Emit this message as a GraphQL input type (repeatable)
      --int64-as-number  Map 64-bit integers to Float/number instead of String/string
  -o, --output <FILE>    Write to FILE instead of stdout
  -h, --help             Print help
  -V, --version          Print version
";

// ==============================================================================
// CLI Argument Definitions
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Print GraphQL SDL type definitions, sorted by type name.
    Graphql,
    /// Print TypeScript declarations in visitation order.
    Typescript,
}

#[derive(Debug)]
struct Cli {
    command: Command,
    /// Descriptor files, or directories searched for `*.json` files.
    descriptors: Vec<PathBuf>,
    /// Types to convert (every loaded type if empty). May be repeated.
    types: Vec<String>,
    /// Messages to emit as GraphQL input objects. May be repeated.
    inputs: Vec<String>,
    /// Map 64-bit integers to `Float`/`number` instead of `String`/`string`.
    int64_as_number: bool,
    /// Output file (writes to stdout if omitted).
    output: Option<PathBuf>,
}

/// What the command line asked for: a run, or one of the info flags.
enum Parsed {
    Run(Cli),
    Help,
    Version,
}

fn parse_args(mut parser: lexopt::Parser) -> Result<Parsed, lexopt::Error> {
    use lexopt::prelude::*;

    let mut command = None;
    let mut descriptors = Vec::new();
    let mut types = Vec::new();
    let mut inputs = Vec::new();
    let mut int64_as_number = false;
    let mut output = None;

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => return Ok(Parsed::Help),
            Short('V') | Long("version") => return Ok(Parsed::Version),
            Long("type") => types.push(parser.value()?.string()?),
            Long("input") => inputs.push(parser.value()?.string()?),
            Long("int64-as-number") => int64_as_number = true,
            Short('o') | Long("output") => output = Some(PathBuf::from(parser.value()?)),
            Value(value) if command.is_none() => {
                command = Some(match value.string()?.as_str() {
                    "graphql" => Command::Graphql,
                    "typescript" => Command::Typescript,
                    other => {
                        return Err(lexopt::Error::Custom(
                            format!("unknown command `{other}`").into(),
                        ));
                    }
                });
            }
            Value(value) => descriptors.push(PathBuf::from(value)),
            _ => return Err(arg.unexpected()),
        }
    }

    let command = command.ok_or(lexopt::Error::MissingValue {
        option: Some("<COMMAND>".to_string()),
    })?;
    if descriptors.is_empty() {
        return Err(lexopt::Error::MissingValue {
            option: Some("<DESCRIPTOR>".to_string()),
        });
    }
    Ok(Parsed::Run(Cli {
        command,
        descriptors,
        types,
        inputs,
        int64_as_number,
        output,
    }))
}

// ==============================================================================
// Entry Point
// ==============================================================================

fn main() -> miette::Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().build())
    }))?;

    let cli = match parse_args(lexopt::Parser::from_env()) {
        Ok(Parsed::Run(cli)) => cli,
        Ok(Parsed::Help) => {
            print!("{USAGE}");
            return Ok(());
        }
        Ok(Parsed::Version) => {
            println!("protoshape {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(e) => {
            return Err(miette::miette!(
                help = "run `protoshape --help` for usage",
                "{e}"
            ));
        }
    };

    run(&cli)
}

fn run(cli: &Cli) -> miette::Result<()> {
    let root = load_root(&cli.descriptors)?;

    let mut converter = Converter::new();
    for name in &cli.types {
        converter.select(name.as_str());
    }
    for name in &cli.inputs {
        converter.input_type(name.as_str());
    }
    if cli.int64_as_number {
        converter.int64_representation(Int64Representation::Number);
    }

    let content = match cli.command {
        Command::Graphql => {
            let schemas = converter.graphql(&root)?;
            if schemas.is_empty() {
                String::new()
            } else {
                format!("{}\n", schemas.join("\n\n"))
            }
        }
        Command::Typescript => {
            let output = converter.typescript(&root)?;
            for warning in &output.warnings {
                eprintln!("{warning:?}");
            }
            output.source
        }
    };

    write_output(cli.output.as_deref(), &content)
}

// ==============================================================================
// Shared Helpers: Descriptor Discovery and Output
// ==============================================================================

/// Load every descriptor into one root, in argument order. Directories
/// contribute their `*.json` files sorted by path.
fn load_root(descriptors: &[PathBuf]) -> miette::Result<ProtoRoot> {
    let mut root = ProtoRoot::new();
    for path in descriptors {
        for file in descriptor_files(path)? {
            load_descriptor_into(&mut root, &file)?;
        }
    }
    Ok(root)
}

fn descriptor_files(path: &Path) -> miette::Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry
            .map_err(|e| miette::miette!("{e}"))
            .wrap_err_with(|| format!("search {}", path.display()))?;
        let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    if files.is_empty() {
        return Err(miette::miette!(
            "no descriptor files (*.json) found in {}",
            path.display()
        ));
    }
    Ok(files)
}

/// Write output to a file or stdout.
fn write_output(output: Option<&Path>, content: &str) -> miette::Result<()> {
    match output {
        None => {
            // Exit quietly when the reader goes away early, as in
            // `protoshape graphql shop.json | head -1`.
            use std::io::Write;
            if let Err(e) = write!(io::stdout(), "{content}") {
                if e.kind() == io::ErrorKind::BrokenPipe {
                    return Ok(());
                }
                return Err(miette::miette!("{e}")).wrap_err("write to stdout");
            }
            Ok(())
        }
        Some(path) => fs::write(path, content)
            .map_err(|e| miette::miette!("{e}"))
            .wrap_err_with(|| format!("write {}", path.display())),
    }
}
