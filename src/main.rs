use anyhow::{Context, Result, bail};
use chordsheet::{
    Dialect, DirectiveNamePreference, DocumentParser, ParserConfig, clean_text, transform,
};
use clap::{Arg, Command};
use std::path::Path;

fn detect_dialect(file_path: Option<&str>) -> Result<Dialect> {
    let Some(file_path) = file_path else {
        return Ok(Dialect::ChordPro);
    };
    let extension = Path::new(file_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    match extension.to_lowercase().as_str() {
        "cho" | "crd" | "chopro" | "chordpro" | "pro" => Ok(Dialect::ChordPro),
        "txt" | "text" | "" => Ok(Dialect::ChordOverLyric),
        _ => bail!(
            "Cannot tell the output dialect from .{}, use --to",
            extension
        ),
    }
}

fn main() -> Result<()> {
    let matches = Command::new("chordsheet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Chord sheet converter")
        .arg(
            Arg::new("input")
                .help("Input chord sheet")
                .required(true)
                .value_name("INPUT")
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Output file, standard output when omitted")
                .value_name("OUTPUT")
                .index(2),
        )
        .arg(
            Arg::new("to")
                .help("Output dialect: chordpro, chord-over-lyric or mobilesheets")
                .long("to")
                .value_name("DIALECT")
                .value_parser(clap::value_parser!(Dialect)),
        )
        .arg(
            Arg::new("short-directives")
                .help("Write short directive names ({soc})")
                .long("short-directives")
                .conflicts_with("long-directives")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("long-directives")
                .help("Write long directive names ({start_of_chorus})")
                .long("long-directives")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("chordpro")
                .help("Read the input as ChordPro")
                .long("chordpro")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tab-width")
                .help("Columns per tab stop, 0 removes tabs")
                .long("tab-width")
                .value_name("WIDTH")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("no-tab-expansion")
                .help("Keep tabs as they are")
                .long("no-tab-expansion")
                .conflicts_with("tab-width")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("clean")
                .help("Remove trailing whitespace and extra blank lines before parsing")
                .long("clean")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("indent")
                .help("Indent nested sections with this string")
                .long("indent")
                .value_name("STRING"),
        )
        .arg(
            Arg::new("verbose")
                .help("Enable verbose output")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let input_file = matches
        .get_one::<String>("input")
        .context("Missing input file")?;
    let output_file = matches.get_one::<String>("output");
    let verbose = matches.get_flag("verbose");

    let dialect = match matches.get_one::<Dialect>("to") {
        Some(dialect) => *dialect,
        None => detect_dialect(output_file.map(String::as_str))?,
    };
    let preference = if matches.get_flag("short-directives") {
        DirectiveNamePreference::Short
    } else if matches.get_flag("long-directives") {
        DirectiveNamePreference::Long
    } else {
        DirectiveNamePreference::Original
    };

    let mut config = if matches.get_flag("chordpro") {
        ParserConfig::chordpro()
    } else {
        ParserConfig::default()
    };
    if matches.get_flag("no-tab-expansion") {
        config.tab_width = None;
    } else if let Some(width) = matches.get_one::<usize>("tab-width") {
        config.tab_width = Some(*width);
    }

    if verbose {
        println!("Reading chord sheet: {}", input_file);
    }
    let mut content = std::fs::read_to_string(input_file)
        .with_context(|| format!("Failed to read input file: {}", input_file))?;
    if matches.get_flag("clean") {
        content = clean_text(&content);
    }

    let file_name = Path::new(input_file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let document = DocumentParser::new(config)
        .parse(&content)
        .with_context(|| format!("Failed to parse chord sheet: {}", input_file))?
        .with_file_name(file_name);

    if verbose {
        println!(
            "Parsed {} sections, converting to {}",
            document.sections().len(),
            dialect
        );
    }
    let converted = transform(&document, dialect, preference);
    let indent = matches.get_one::<String>("indent").map(String::as_str);
    let output_content = converted.render_text(indent);

    match output_file {
        Some(output_file) => {
            if verbose {
                println!("Writing chord sheet: {}", output_file);
            }
            std::fs::write(output_file, output_content)
                .with_context(|| format!("Failed to write output file: {}", output_file))?;
        }
        None => print!("{}", output_content),
    }

    Ok(())
}
