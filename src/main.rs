use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "fmaps2kml",
    about = "Convert an fmaps file (markers and drawn polygons) to KML",
    version
)]
struct Cli {
    /// Input fmaps file
    input: PathBuf,

    /// Output KML file [default: the input path with a .kml extension]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log what the conversion is doing
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(output) => println!("File saved as {}", output.display()),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf> {
    if !has_extension(&cli.input, "fmaps") {
        warn!(input = %cli.input.display(), "input does not have the .fmaps extension");
    }

    let output = output_path(&cli.input, cli.output.as_deref());
    fmaps2kml::convert_file(&cli.input, &output)
        .with_context(|| format!("converting {}", cli.input.display()))?;
    Ok(output)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(output) if output.extension().is_some() => output.to_path_buf(),
        Some(output) => output.with_extension("kml"),
        None => input.with_extension("kml"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_output_path() {
        let input = Path::new("maps/rome.fmaps");
        assert_eq!(output_path(input, None), PathBuf::from("maps/rome.kml"));
        assert_eq!(
            output_path(input, Some(Path::new("out/custom"))),
            PathBuf::from("out/custom.kml")
        );
        assert_eq!(
            output_path(input, Some(Path::new("out/custom.xml"))),
            PathBuf::from("out/custom.xml")
        );
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a.fmaps"), "fmaps"));
        assert!(has_extension(Path::new("A.FMAPS"), "fmaps"));
        assert!(!has_extension(Path::new("a.json"), "fmaps"));
        assert!(!has_extension(Path::new("fmaps"), "fmaps"));
    }

    #[test]
    fn test_cli_args() {
        let cli = Cli::parse_from(["fmaps2kml", "in.fmaps", "-o", "out.kml", "-v"]);
        assert_eq!(cli.input, PathBuf::from("in.fmaps"));
        assert_eq!(cli.output, Some(PathBuf::from("out.kml")));
        assert!(cli.verbose);
    }
}
