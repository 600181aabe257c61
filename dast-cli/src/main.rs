// Command-line interface for dast
//
// This binary converts rich text between the editor value, DatoCMS structured text (Dast) and
// HTML, and checks documents against the nesting rules.
//
// The core capabilities live in the dast-babel crate; this crate only reads files, picks formats,
// layers configuration and reports errors.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension
// (.slate, .dast, .html), while being overridable by an explicit --from flag.
// Usage:
//  dast <input> --to <format> [--from <format>] [--output <file>]          - Convert (default)
//  dast convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  dast check <input> [--from <format>]                                    - Parse and validate
//  dast formats                                                            - List formats
//  dast blocks                                                             - List block models
//
// An input of "-" reads from stdin and requires --from.
//
// Logging goes to stderr. RUST_LOG wins when set, otherwise -v raises the level one step per
// occurrence (warn, info, debug, trace) and --quiet lowers it to errors only.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use dast_babel::validate::check_editor;
use dast_babel::{BlockRegistry, EditorNode, FormatError, FormatOptions, FormatRegistry, NodeType};
use dast_config::{ConfigError, DastConfig, Loader};
use std::fs;
use std::io::{self, Read};
use std::process;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Names that must not be mistaken for an input file when injecting `convert`.
const SUBCOMMANDS: &[&str] = &["convert", "check", "formats", "blocks", "help"];

/// Configuration file picked up from the working directory when --config is absent.
const LOCAL_CONFIG: &str = "dast.toml";

#[derive(Debug, Error)]
enum CliError {
    #[error("Error reading '{path}': {source}")]
    Read { path: String, source: io::Error },
    #[error("Error writing '{path}': {source}")]
    Write { path: String, source: io::Error },
    #[error("Could not detect format from filename '{0}'. Please specify --from explicitly")]
    UndetectedFormat(String),
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("Unknown subcommand. Use --help for usage information.")]
    UnknownCommand,
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path, or - for stdin")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn from_arg() -> Arg {
    Arg::new("from")
        .long("from")
        .help("Source format (auto-detected from file extension if not specified)")
        .value_hint(ValueHint::Other)
}

fn build_cli() -> Command {
    Command::new("dast")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert rich text to and from DatoCMS structured text")
        .long_about(
            "dast converts documents between the rich-text editor value, DatoCMS\n\
            structured text (Dast) and HTML.\n\n\
            Commands:\n  \
            - convert: Transform between formats (default command)\n  \
            - check:   Parse a document and validate its structure\n  \
            - formats: List available formats\n  \
            - blocks:  List registered block models\n\n\
            Examples:\n  \
            dast post.slate --to dast                # Editor value to Dast (stdout)\n  \
            dast post.dast --to editor -o post.slate # Dast back to the editor value\n  \
            dast page.html --to dast --pretty        # Import HTML\n  \
            dast check post.dast                     # Validate a stored document",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a dast.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (repeatable)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between formats.\n\n\
                    Supported formats:\n  \
                    - editor: Rich-text editor value (.slate)\n  \
                    - dast:   DatoCMS structured text with block side-table (.dast)\n  \
                    - html:   HTML, import only (.html, .htm)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(input_arg())
                .arg(from_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .help("Indent JSON output")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("base-url")
                        .long("base-url")
                        .value_name("URL")
                        .help("Resolve relative HTML links against this URL")
                        .value_hint(ValueHint::Url),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse a document and validate its structure")
                .arg(input_arg())
                .arg(from_arg()),
        )
        .subcommand(Command::new("formats").about("List available formats"))
        .subcommand(Command::new("blocks").about("List registered block models"))
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            if args.len() > 1
                && !args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_tracing(matches.get_count("verbose"), matches.get_flag("quiet"));

    if let Err(err) = run(&matches) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let level = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let config_path = matches.get_one::<String>("config").map(String::as_str);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let config = load_cli_config(config_path, sub_matches)?;
            handle_convert_command(sub_matches, &config)
        }
        Some(("check", sub_matches)) => {
            let config = load_cli_config(config_path, sub_matches)?;
            handle_check_command(sub_matches, &config)
        }
        Some(("formats", _)) => {
            handle_formats_command();
            Ok(())
        }
        Some(("blocks", _)) => {
            handle_blocks_command();
            Ok(())
        }
        _ => Err(CliError::UnknownCommand),
    }
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches, config: &DastConfig) -> Result<(), CliError> {
    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let to = matches.get_one::<String>("to").expect("to is required");
    let output = matches.get_one::<String>("output");

    let registry = FormatRegistry::with_options(FormatOptions::from(config));
    let from = resolve_from(&registry, input, matches.get_one::<String>("from"))?;

    // Validate formats exist before touching the input
    registry.get(&from)?;
    registry.get(to)?;

    let source = read_input(input)?;
    let value = registry.parse(&source, &from)?;
    let mut result = registry.serialize(&value, to)?;
    tracing::info!(%from, %to, nodes = value.len(), "converted {input}");

    if !result.ends_with('\n') {
        result.push('\n');
    }
    match output {
        Some(path) => fs::write(path, result).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        }),
        None => {
            print!("{result}");
            Ok(())
        }
    }
}

/// Handle the check command
fn handle_check_command(matches: &ArgMatches, config: &DastConfig) -> Result<(), CliError> {
    let input = matches
        .get_one::<String>("input")
        .expect("input is required");

    let registry = FormatRegistry::with_options(FormatOptions::from(config));
    let from = resolve_from(&registry, input, matches.get_one::<String>("from"))?;

    let source = read_input(input)?;
    let value = registry.parse(&source, &from)?;
    check_editor(&value)?;

    println!(
        "{input}: OK ({} top-level nodes, {} blocks)",
        value.len(),
        count_blocks(&value)
    );
    Ok(())
}

/// Handle the formats command
fn handle_formats_command() {
    let registry = FormatRegistry::default();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        let Ok(format) = registry.get(&name) else {
            continue;
        };
        let mut modes = Vec::new();
        if format.supports_parsing() {
            modes.push("read");
        }
        if format.supports_serialization() {
            modes.push("write");
        }
        let extensions: Vec<String> = format
            .file_extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        println!(
            "  {name:<8} {:<11} {:<12} {}",
            modes.join("/"),
            extensions.join(" "),
            format.description()
        );
    }
}

/// Handle the blocks command
fn handle_blocks_command() {
    let registry = BlockRegistry::with_defaults();
    println!("Registered block models:\n");
    for model in registry.list_models() {
        let description = registry
            .get(&model)
            .map(|handler| handler.description())
            .unwrap_or_default();
        println!("  {model:<16} {description}");
    }
    let namespaces = registry.list_namespaces();
    if !namespaces.is_empty() {
        println!("\nNamespaces:");
        for prefix in namespaces {
            println!("  {prefix}*");
        }
    }
}

fn resolve_from(
    registry: &FormatRegistry,
    input: &str,
    explicit: Option<&String>,
) -> Result<String, CliError> {
    if let Some(from) = explicit {
        return Ok(from.clone());
    }
    registry
        .detect_format_from_filename(input)
        .ok_or_else(|| CliError::UndetectedFormat(input.to_string()))
}

fn read_input(input: &str) -> Result<String, CliError> {
    let read_error = |source| CliError::Read {
        path: input.to_string(),
        source,
    };
    if input == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source).map_err(read_error)?;
        return Ok(source);
    }
    fs::read_to_string(input).map_err(read_error)
}

fn count_blocks(nodes: &[EditorNode]) -> usize {
    nodes
        .iter()
        .map(|node| {
            usize::from(node.node_type() == NodeType::Block) + count_blocks(node.children())
        })
        .sum()
}

fn load_cli_config(
    explicit_path: Option<&str>,
    matches: &ArgMatches,
) -> Result<DastConfig, CliError> {
    let mut loader = match explicit_path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };

    // Flags only some subcommands define
    if let Ok(Some(true)) = matches.try_get_one::<bool>("pretty") {
        loader = loader.set_override("output.pretty", true)?;
    }
    if let Ok(Some(url)) = matches.try_get_one::<String>("base-url") {
        loader = loader.set_override("import.base_url", url.as_str())?;
    }

    Ok(loader.build()?)
}
