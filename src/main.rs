use clap::Parser;
use paperform::model::{Document, Orientation};
use paperform::{BlankCells, Error, count_pages, export_to_dir, render};
use std::io::Write;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "paperform")]
#[command(about = "Lay out a JSON form document as a paginated A4 PDF")]
#[command(version)]
struct Cli {
    /// Input document (JSON)
    input: PathBuf,

    /// Directory the PDF is written to, named <CODE>-<Version>-<Title>.pdf
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Write the PDF to stdout instead of a file
    #[arg(long, conflicts_with = "out_dir")]
    stdout: bool,

    /// Only run the counting pass and print the page count
    #[arg(long)]
    pages_only: bool,

    /// Force landscape orientation
    #[arg(long)]
    landscape: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let json = std::fs::read_to_string(&cli.input)?;
    let mut doc: Document = serde_json::from_str(&json)?;
    if cli.landscape {
        doc.page.orientation = Orientation::Landscape;
    }

    if cli.pages_only {
        println!("{}", count_pages(&doc, &BlankCells)?);
        return Ok(());
    }

    let export = if cli.stdout {
        let export = render(&doc)?;
        std::io::stdout().lock().write_all(&export.bytes)?;
        export
    } else {
        let (path, export) = export_to_dir(&doc, &BlankCells, &cli.out_dir)?;
        println!(
            "Wrote {} ({} page{})",
            path.display(),
            export.pages,
            if export.pages == 1 { "" } else { "s" }
        );
        export
    };

    for warning in &export.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}
