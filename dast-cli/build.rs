use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the format names registered by dast-babel's FormatRegistry.
// We need to duplicate this here since build scripts can't access the library.
const AVAILABLE_FORMATS: &[&str] = &["dast", "editor", "html"];

fn format_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS))
        .value_hint(ValueHint::Other)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path, or - for stdin")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("dast")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert rich text to and from DatoCMS structured text")
        .arg_required_else_help(true)
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
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .arg(input_arg())
                .arg(format_arg("from", "Source format"))
                .arg(format_arg("to", "Target format").required(true))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(Arg::new("pretty").long("pretty").action(ArgAction::SetTrue))
                .arg(
                    Arg::new("base-url")
                        .long("base-url")
                        .value_hint(ValueHint::Url),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse a document and validate its structure")
                .arg(input_arg())
                .arg(format_arg("from", "Source format")),
        )
        .subcommand(Command::new("formats").about("List available formats"))
        .subcommand(Command::new("blocks").about("List registered block models"));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "dast", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "dast", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "dast", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
