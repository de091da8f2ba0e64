//! prettyrfc - render xml2rfc documents as HTML

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;

use prettyrfc::Document;

#[derive(Parser)]
#[command(name = "prettyrfc")]
#[command(version, about = "Render xml2rfc documents as HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    prettyrfc rfc2616.xml             Render a document to HTML on stdout
    prettyrfc --metadata rfc2616.xml  Print the document metadata as JSON
    cat rfc2616.xml | prettyrfc -     Read the source from stdin")]
struct Cli {
    /// Input xml2rfc file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Print document metadata as JSON instead of rendering
    #[arg(short, long)]
    metadata: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let source = read_input(&cli.input).map_err(|e| format!("{}: {e}", cli.input))?;
    let doc = Document::parse(&source).map_err(|e| e.to_string())?;

    if cli.metadata {
        let json =
            serde_json::to_string_pretty(&doc.metadata()).map_err(|e| e.to_string())?;
        println!("{json}");
    } else {
        let html = prettyrfc::render(&doc).map_err(|e| e.to_string())?;
        print!("{html}");
    }

    Ok(())
}

fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(path)
    }
}
