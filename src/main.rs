use clap::{ArgAction, Parser, Subcommand};
use issue_summoner::{scan, tokenize, Family, Issue, ScanError, ScanOptions, ScanReport};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "issue-summoner")]
#[command(about = "Issue Summoner - find annotated comments and turn them into issues")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a file or directory for annotated comments
    Scan {
        /// File or directory to scan
        #[arg(default_value = ".", conflicts_with = "stdin")]
        path: PathBuf,

        /// Annotation to look for
        #[arg(short, long, env = "ISSUE_SUMMONER_ANNOTATION", default_value = "@TODO")]
        annotation: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Read a single source from stdin
        #[arg(long, requires = "ext")]
        stdin: bool,

        /// Extension selecting the comment grammar for --stdin
        #[arg(long)]
        ext: Option<String>,

        /// Skip files with no known comment grammar
        #[arg(long)]
        known_only: bool,

        /// Only report annotations without an issue number
        #[arg(long)]
        pending: bool,

        /// Include hidden files and directories
        #[arg(long)]
        hidden: bool,

        /// Worker threads
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Print the token stream of a file
    Tokens {
        file: PathBuf,

        /// Annotation to look for
        #[arg(short, long, env = "ISSUE_SUMMONER_ANNOTATION", default_value = "@TODO")]
        annotation: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Scan {
            path,
            annotation,
            json,
            stdin,
            ext,
            known_only,
            pending,
            hidden,
            jobs,
        } => {
            let options = ScanOptions {
                annotation,
                attempt_default: !known_only,
                include_hidden: hidden,
                skip_reported: pending,
                jobs,
            };
            if stdin {
                scan_stdin(ext.as_deref().unwrap_or_default(), &options, json)
            } else {
                scan_path(&path, &options, json)
            }
        }
        Commands::Tokens { file, annotation } => print_tokens(&file, &annotation),
    }
}

/// `RUST_LOG` wins when set; otherwise each -v raises the level one step from `warn`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn scan_path(path: &Path, options: &ScanOptions, json: bool) -> ExitCode {
    if !path.exists() {
        eprintln!("Error: {} does not exist", path.display());
        return ExitCode::FAILURE;
    }

    let start = Instant::now();
    let report = match scan(path, options) {
        Ok(report) => report,
        Err(err) => {
            print_failure(&err);
            return ExitCode::from(2);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{}", out),
            Err(err) => {
                eprintln!("Error: failed to encode report: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&report);
        for failure in &report.failures {
            print_failure(failure);
        }
        print_summary(&report, start.elapsed());
    }

    if report.failures.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn scan_stdin(extension: &str, options: &ScanOptions, json: bool) -> ExitCode {
    let mut source = Vec::new();
    if let Err(err) = io::stdin().read_to_end(&mut source) {
        eprintln!("Error: failed to read stdin: {}", err);
        return ExitCode::FAILURE;
    }

    let path = PathBuf::from(format!("<stdin>.{}", extension.trim_start_matches('.')));
    match issue_summoner::scan::scan_source(&path, &source, options) {
        Ok(issues) => {
            if json {
                match serde_json::to_string_pretty(&issues) {
                    Ok(out) => println!("{}", out),
                    Err(err) => {
                        eprintln!("Error: failed to encode issues: {}", err);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                for issue in &issues {
                    print_issue(issue);
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            let rendered = if io::stderr().is_terminal() {
                err.render_color(&source, "<stdin>")
            } else {
                err.render(&source, "<stdin>")
            };
            eprint!("{}", rendered);
            ExitCode::FAILURE
        }
    }
}

fn print_tokens(file: &Path, annotation: &str) -> ExitCode {
    let source = match fs::read(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: failed to read {}: {}", file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let family = Family::for_path(file);
    match tokenize(&source, family, annotation.as_bytes()) {
        Ok(tokens) => {
            println!("# {} ({})", file.display(), family);
            for token in &tokens {
                println!("{}", token);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            let failure = ScanError::Lex { path: file.to_path_buf(), error: err };
            eprint!("{}", failure.render(&source, io::stderr().is_terminal()));
            ExitCode::FAILURE
        }
    }
}

fn print_report(report: &ScanReport) {
    let is_tty = io::stdout().is_terminal();
    for (path, issues) in report.group_by_file() {
        if is_tty {
            println!("\x1b[1m{}\x1b[0m", path);
        } else {
            println!("{}", path);
        }
        for issue in issues {
            print_issue(issue);
        }
    }
}

fn print_issue(issue: &Issue) {
    let is_tty = io::stdout().is_terminal();
    let marker = match issue.comment.issue_number {
        Some(number) => format!(" (#{})", number),
        None => String::new(),
    };
    if is_tty {
        println!(
            "  \x1b[2m{:>5}:{:<3}\x1b[0m {}\x1b[36m{}\x1b[0m",
            issue.line_number,
            issue.column + 1,
            issue.title,
            marker
        );
    } else {
        println!("  {:>5}:{:<3} {}{}", issue.line_number, issue.column + 1, issue.title, marker);
    }
    if !issue.description.is_empty() {
        println!("              {}", issue.description);
    }
}

/// Re-read the failing file so lexer errors can show the offending line
fn print_failure(failure: &ScanError) {
    let color = io::stderr().is_terminal();
    let source = fs::read(failure.path()).unwrap_or_default();
    eprint!("{}", failure.render(&source, color));
}

fn print_summary(report: &ScanReport, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let count = report.issues.len();
    let issues_word = if count == 1 { "issue" } else { "issues" };
    let files_word = if report.files_scanned == 1 { "file" } else { "files" };
    let failed = match report.failures.len() {
        0 => String::new(),
        n => format!(", {} failed", n),
    };

    if is_tty {
        eprintln!(
            "\n\x1b[1m✨ Found {} {} in {} {}{} in {}\x1b[0m",
            count, issues_word, report.files_scanned, files_word, failed, time_str
        );
    } else {
        eprintln!(
            "\n✨ Found {} {} in {} {}{} in {}",
            count, issues_word, report.files_scanned, files_word, failed, time_str
        );
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
