//! nbpress - republish exported notebooks

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser)]
#[command(name = "nbpress")]
#[command(version, about = "Republish an exported HTML notebook for a CMS", long_about = None)]
#[command(after_help = "EXAMPLES:
    nbpress lecture.html https://cdn.example.com/nb dist
        Writes dist/lecture.html and the images under dist/lecture/img/")]
struct Cli {
    /// Exported notebook (HTML)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Base URL the output image folder is served from
    #[arg(value_name = "PUBLIC_ADDRESS")]
    public_address: String,

    /// Output folder (created if missing)
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level.as_str().to_lowercase(), record.args()),
        })
        .init();

    match nbpress::republish(&cli.input, &cli.public_address, &cli.output_dir) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
