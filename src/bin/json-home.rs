//! json-home CLI
//!
//! Command-line interface for generating json-home documents from descriptor
//! files and linting descriptor files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use json_home::{
    assemble_lenient, docs_to_json, lint, load_descriptors_auto, to_json, DescriptorFile,
    FileStatus, GeneratorOptions, JsonHomeGenerator, Severity, DEFAULT_BASE_URI,
    DEFAULT_INCLUDE_ROOT,
};
use tracing::debug;
use url::Url;

#[derive(Parser)]
#[command(name = "json-home")]
#[command(about = "Generate and lint json-home API discovery documents")]
#[command(version)]
struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Base URIs and documentation lookup shared by all commands.
#[derive(Args)]
struct BaseArgs {
    /// Base URI for relative hrefs and href-templates
    #[arg(long, default_value = DEFAULT_BASE_URI, value_parser = Url::parse)]
    application_base_uri: Url,

    /// Base URI for relative relation types (default: application base URI)
    #[arg(long, value_parser = Url::parse)]
    relation_type_base_uri: Option<Url>,

    /// Directory markdown includes are read from
    #[arg(long, default_value = ".")]
    doc_root: PathBuf,

    /// Glob pattern locating markdown includes below the doc root
    #[arg(long, default_value = DEFAULT_INCLUDE_ROOT)]
    include_root: String,
}

impl BaseArgs {
    fn into_options(self) -> GeneratorOptions {
        let options = GeneratorOptions::new(self.application_base_uri)
            .doc_root_dir(self.doc_root)
            .include_root(self.include_root);
        match self.relation_type_base_uri {
            Some(uri) => options.relation_type_base_uri(uri),
            None => options,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a json-home document from a descriptor file
    Generate {
        /// Descriptor source: file path or URL (http:// or https://)
        descriptors: String,

        #[command(flatten)]
        base: BaseArgs,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Skip invalid or conflicting descriptor entries instead of failing
        #[arg(long)]
        lenient: bool,

        /// Also write resource documentation (descriptions, rendered includes)
        #[arg(long)]
        docs_output: Option<PathBuf>,
    },

    /// Lint descriptor files for errors (syntax, schema, hints, conflicts, docs)
    Lint {
        /// File or directory to lint
        path: PathBuf,

        #[command(flatten)]
        base: BaseArgs,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            descriptors,
            base,
            output,
            pretty,
            lenient,
            docs_output,
        } => run_generate(
            &descriptors,
            base.into_options(),
            GenerateOutput {
                output,
                docs_output,
                pretty,
            },
            lenient,
        ),

        Commands::Lint {
            path,
            base,
            format,
            strict,
            quiet,
        } => run_lint(&path, &base.into_options(), &format, strict, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

struct GenerateOutput {
    output: Option<PathBuf>,
    docs_output: Option<PathBuf>,
    pretty: bool,
}

fn run_generate(
    source: &str,
    options: GeneratorOptions,
    out: GenerateOutput,
    lenient: bool,
) -> Result<(), u8> {
    let document = if lenient {
        let set = load_descriptors_auto(source).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;
        let (descriptors, invalid) = set.into_descriptors_lenient(&options);
        for err in &invalid {
            eprintln!("Warning: skipped entry: {}", err);
        }
        let (document, conflicting) = assemble_lenient(descriptors);
        for err in &conflicting {
            eprintln!("Warning: skipped entry: {}", err);
        }
        document
    } else {
        JsonHomeGenerator::new(options, DescriptorFile::new(source))
            .generate()
            .map_err(|e| {
                eprintln!("Error: {}", e);
                e.exit_code() as u8
            })?
    };
    debug!(resources = document.len(), "writing document");

    if let Some(path) = &out.docs_output {
        write_file(path, &render(&docs_to_json(&document), out.pretty)?)?;
    }

    let json_output = render(&to_json(&document), out.pretty)?;
    match &out.output {
        Some(path) => write_file(path, &json_output)?,
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn render(json: &serde_json::Value, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(json)
    } else {
        serde_json::to_string(json)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), u8> {
    std::fs::write(path, content).map_err(|e| {
        eprintln!("Error writing to {}: {}", path.display(), e);
        3u8
    })
}

fn run_lint(
    path: &Path,
    options: &GeneratorOptions,
    format: &str,
    strict: bool,
    quiet: bool,
) -> Result<(), u8> {
    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let result = lint(path, options, strict);

    if format == "json" {
        let json = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", json);
    } else {
        if !quiet {
            println!("Linting {} ...\n", path.display());
        }

        for file_result in &result.results {
            let status_icon = match file_result.status {
                FileStatus::Ok => "\x1b[32m✓\x1b[0m",
                FileStatus::Warning => "\x1b[33m⚠\x1b[0m",
                FileStatus::Error => "\x1b[31m✗\x1b[0m",
            };

            if !quiet || file_result.status != FileStatus::Ok {
                println!("  {} {}", status_icon, file_result.file.display());
            }

            for diag in &file_result.diagnostics {
                let (color, label) = match diag.severity {
                    Severity::Error => ("\x1b[31m", "error"),
                    Severity::Warning => ("\x1b[33m", "warning"),
                };
                if !quiet || diag.severity == Severity::Error {
                    println!(
                        "    {}{}[{}]\x1b[0m: {} - {}",
                        color, label, diag.code, diag.path, diag.message
                    );
                }
            }
        }

        println!();
        if result.is_ok() && (!strict || result.warnings == 0) {
            println!(
                "\x1b[32m✓ {} files checked, all passed\x1b[0m",
                result.files_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} files checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
                result.files_checked,
                result.passed,
                result.failed,
                result.errors,
                result.warnings
            );
        }
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}
