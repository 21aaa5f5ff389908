use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use texlive_client::{probe_queue, ReqwestCompileService, ServiceSettings, DEFAULT_BASE_URL};
use texlive_core::{EngineChoice, SessionStatus};

mod platform;

use platform::app::{run_compile, CompileOptions};
use platform::logging::{self, LogDestination};

#[derive(Parser)]
#[command(name = "texlive-compile")]
#[command(version, about = "Upload a LaTeX source archive and download the compiled PDF")]
struct Cli {
    /// Base URL of the compile service, e.g. https://host/texlive-api
    #[arg(long, env = "TEXLIVE_API_BASE", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a .zip / .rar source archive and save the PDF
    Compile {
        /// The archive to upload
        archive: PathBuf,

        /// Typesetting engine: xelatex or pdflatex
        #[arg(
            short,
            long,
            default_value_t = EngineChoice::default(),
            value_parser = str::parse::<EngineChoice>
        )]
        engine: EngineChoice,

        /// Directory the PDF is saved to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Send no engine and let the service use its default
        #[arg(long)]
        no_engine_field: bool,

        /// Give up on the compile after this many seconds (default: wait)
        #[arg(long, value_name = "SECS")]
        compile_timeout: Option<u64>,
    },
    /// Show how many compile jobs the service is running
    Queue,
    /// Check that the service is up
    Health,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let destination = match (cli.log_file.clone(), cli.verbose) {
        (Some(path), 0) => LogDestination::File(path),
        (Some(path), _) => LogDestination::Both(path),
        (None, _) => LogDestination::Terminal,
    };
    logging::initialize(destination, texlive_logging::level_for_verbosity(cli.verbose));

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", style("error:").red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut settings = ServiceSettings::with_base_url(cli.base_url);

    match cli.command {
        Commands::Compile {
            archive,
            engine,
            out_dir,
            no_engine_field,
            compile_timeout,
        } => {
            settings.compile_timeout = compile_timeout.map(Duration::from_secs);
            let outcome = run_compile(CompileOptions {
                archive,
                engine,
                engine_selectable: !no_engine_field,
                out_dir,
                settings,
            })?;
            Ok(match outcome.status {
                SessionStatus::Success => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            })
        }
        Commands::Queue => {
            let service = ReqwestCompileService::new(settings);
            let snapshot = runtime()?.block_on(probe_queue(&service));
            match snapshot {
                Some(snapshot) => {
                    println!("{} compile job(s) running", snapshot.running_jobs);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    println!("{}", style("No queue information available").dim());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Health => {
            let service = ReqwestCompileService::new(settings);
            let body = runtime()?
                .block_on(service.health())
                .context("health check failed")?;
            println!("{} {}", style("service is up:").green(), body);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use texlive_core::EngineChoice;

    use super::{Cli, Commands};

    fn compile_args(extra: &[&str]) -> (EngineChoice, Option<u64>) {
        let args = ["texlive-compile", "compile", "thesis.zip"]
            .into_iter()
            .chain(extra.iter().copied());
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Compile {
                engine,
                compile_timeout,
                ..
            } => (engine, compile_timeout),
            _ => panic!("expected compile command"),
        }
    }

    #[test]
    fn engine_defaults_to_xelatex_and_parses_wire_names() {
        assert_eq!(compile_args(&[]).0, EngineChoice::XeLatex);
        assert_eq!(compile_args(&["--engine", "PdfLaTeX"]).0, EngineChoice::PdfLatex);
        let unknown = Cli::try_parse_from(["texlive-compile", "compile", "a.zip", "-e", "lualatex"]);
        assert!(unknown.is_err());
    }

    #[test]
    fn compile_waits_without_limit_unless_asked() {
        assert_eq!(compile_args(&[]).1, None);
        let (_, secs) = compile_args(&["--compile-timeout", "900"]);
        assert_eq!(secs.map(Duration::from_secs), Some(Duration::from_secs(900)));
    }
}
