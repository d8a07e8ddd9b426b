//! `quill` command-line runner: run a file, run `-c` code, or start a REPL.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use quill::{parse, tokenize, EvalConfig, Interpreter, Metas, QuillError, Value};

/// Quill - a small dynamically-typed scripting language
#[derive(clap::Parser, Debug)]
#[command(name = "quill", version)]
#[command(about = "Run Quill scripts or start an interactive session", long_about = None)]
struct Args {
    /// Script to run (starts a REPL when omitted)
    file: Option<PathBuf>,

    /// Run the given code instead of a file
    #[arg(short = 'c', long = "command", conflicts_with = "file")]
    command: Option<String>,

    /// Print the parsed syntax tree instead of running
    #[arg(long)]
    dump_ast: bool,

    /// Installation library directory searched by `import`
    #[arg(long, env = "QUILL_LIB_DIR")]
    lib_dir: Option<PathBuf>,

    /// Maximum call depth before a RecursionError
    #[arg(long, env = "QUILL_MAX_DEPTH", default_value_t = 1000)]
    max_depth: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = EvalConfig::with_max_call_depth(args.max_depth);
    if let Some(dir) = &args.lib_dir {
        config = config.lib_dir(dir);
    }

    if let Some(code) = &args.command {
        return Ok(run_source(config, "<command>", code, args.dump_ast));
    }

    if let Some(path) = &args.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            config = config.working_dir(dir);
        }
        return Ok(run_source(config, &path.display().to_string(), &text, args.dump_ast));
    }

    repl(config, args.dump_ast)
}

fn run_source(config: EvalConfig, file_name: &str, text: &str, dump_ast: bool) -> ExitCode {
    if dump_ast {
        return match dump(file_name, text, Metas::default()) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => report(&e),
        };
    }

    let mut interp = Interpreter::new(config);
    match interp.run(file_name, text) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

/// Print the syntax tree; returns the lexer switches for the next line.
fn dump(file_name: &str, text: &str, metas: Metas) -> std::result::Result<Metas, QuillError> {
    let (tokens, metas) = tokenize(file_name, text, metas)?;
    let ast = parse(tokens)?;
    println!("{}", ast);
    Ok(metas)
}

fn report(error: &QuillError) -> ExitCode {
    match error {
        QuillError::Exit { code } => ExitCode::from(exit_byte(*code)),
        other => {
            eprintln!("{}", other.render());
            ExitCode::FAILURE
        }
    }
}

fn exit_byte(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

fn repl(config: EvalConfig, dump_ast: bool) -> Result<ExitCode> {
    let mut editor = DefaultEditor::new().context("could not start line editor")?;
    let mut interp = Interpreter::new(config);
    let mut metas = Metas::default();

    println!("Quill {} (Ctrl+D to exit)", quill::VERSION);

    loop {
        let line = match editor.readline("quill> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("line editor failed"),
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line.as_str());

        if dump_ast {
            match dump("<stdin>", &line, metas) {
                Ok(next) => metas = next,
                Err(e) => eprintln!("{}", e.render()),
            }
            continue;
        }

        match interp.run("<stdin>", &line) {
            Ok(Value::None) => {}
            Ok(value) => println!("{:?}", value),
            Err(QuillError::Exit { code }) => return Ok(ExitCode::from(exit_byte(code))),
            Err(e) => eprintln!("{}", e.render()),
        }
    }

    Ok(ExitCode::SUCCESS)
}
