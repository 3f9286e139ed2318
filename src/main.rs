#![allow(unused_assignments)]

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use corn::{CornError, CornResult, OutputFormat};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Corn Configuration Language
///
/// Evaluates Corn documents to JSON or YAML.
#[derive(Parser)]
#[command(name = "corn")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a Corn document to JSON or YAML
    Compile {
        /// Source file to compile ("-" reads stdin)
        file: PathBuf,

        /// Output file (extension determines format: .yaml, .yml, .json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force output format: json, json-pretty, yaml
        #[arg(short, long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        /// Provide a value for $_envNAME inputs (can be used multiple times)
        #[arg(long = "env", value_parser = parse_key_value)]
        env: Vec<(String, String)>,

        /// Do not read $_env inputs from the process environment
        #[arg(long)]
        no_os_env: bool,
    },

    /// Evaluate an inline Corn document
    Eval {
        /// Corn source text
        source: String,

        /// Output format: json, json-pretty, yaml
        #[arg(short, long, value_parser = parse_format, default_value = "json-pretty")]
        format: OutputFormat,
    },

    /// Check a document for errors without producing output
    Check {
        /// Source file to check ("-" reads stdin)
        file: PathBuf,
    },

    /// Print the token stream of a document
    Lex {
        /// Source file to tokenize ("-" reads stdin)
        file: PathBuf,
    },

    /// Print the rule tree of a document
    Parse {
        /// Source file to parse ("-" reads stdin)
        file: PathBuf,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid NAME=value: no '=' found in '{}'", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(s).ok_or_else(|| {
        format!(
            "unknown format '{}': expected json, json-pretty or yaml",
            s
        )
    })
}

fn main() -> ExitCode {
    // Set up miette for nice error output
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .build(),
        )
    }))
    .ok();

    // Respects RUST_LOG; logs go to stderr so they never mix with output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            file,
            output,
            format,
            env,
            no_os_env,
        } => cmd_compile(file, output, format, env, no_os_env),
        Commands::Eval { source, format } => cmd_eval(source, format),
        Commands::Check { file } => cmd_check(file),
        Commands::Lex { file } => cmd_lex(file),
        Commands::Parse { file } => cmd_parse(file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let exit_code = match &e {
                CornError::Io { .. } => ExitCode::from(3),
                _ => ExitCode::from(1),
            };
            eprintln!("{:?}", miette::Report::new(e));
            exit_code
        }
    }
}

fn is_stdin(file: &Path) -> bool {
    file.to_str() == Some("-") || file.to_str() == Some("/dev/stdin")
}

fn display_name(file: &Path) -> String {
    if is_stdin(file) {
        "<stdin>".to_string()
    } else {
        file.display().to_string()
    }
}

fn read_source(file: &Path) -> CornResult<String> {
    if is_stdin(file) {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| CornError::io_error(format!("failed to read stdin: {}", e)))?;
        return Ok(source);
    }

    std::fs::read_to_string(file)
        .map_err(|e| CornError::io_error(format!("failed to read {}: {}", file.display(), e)))
}

fn cmd_compile(
    file: PathBuf,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    env: Vec<(String, String)>,
    no_os_env: bool,
) -> CornResult<()> {
    let source = read_source(&file)?;

    let overrides: HashMap<String, String> = env.into_iter().collect();
    debug!(overrides = overrides.len(), no_os_env, "configured environment");
    let lookup = move |name: &str| -> Option<String> {
        overrides.get(name).cloned().or_else(|| {
            if no_os_env {
                None
            } else {
                std::env::var(name).ok()
            }
        })
    };

    let value = corn::parse_with_env(&source, lookup)?;

    let format = format
        .or_else(|| {
            output
                .as_ref()
                .and_then(|p| p.extension())
                .and_then(|e| e.to_str())
                .and_then(OutputFormat::from_extension)
        })
        .unwrap_or(OutputFormat::JsonPretty);

    let mut rendered = corn::emit(&value, format)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match output {
        Some(path) => {
            std::fs::write(&path, rendered).map_err(|e| {
                CornError::io_error(format!("failed to write {}: {}", path.display(), e))
            })?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn cmd_eval(source: String, format: OutputFormat) -> CornResult<()> {
    let value = corn::parse(&source)?;
    let rendered = corn::emit(&value, format)?;
    println!("{}", rendered.trim_end());
    Ok(())
}

fn cmd_check(file: PathBuf) -> CornResult<()> {
    let source = read_source(&file)?;
    corn::parse(&source)?;
    eprintln!("{}: OK", display_name(&file));
    Ok(())
}

fn cmd_lex(file: PathBuf) -> CornResult<()> {
    let source = read_source(&file)?;
    for token in corn::lexer::tokenize(&source)? {
        println!("{}", token);
    }
    Ok(())
}

fn cmd_parse(file: PathBuf) -> CornResult<()> {
    let source = read_source(&file)?;
    let config = corn::parser::parse(corn::lexer::tokenize(&source)?)?;
    println!("{:#?}", config);
    Ok(())
}
