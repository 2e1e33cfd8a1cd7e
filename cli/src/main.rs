use std::io::{self, IsTerminal};
use std::process;

use ok_cli::{Source, host_environment, init_tracing, run_repl, run_sources};
use tracing::debug;

const USAGE: &str = "\
usage: ok [--repl] [--max-depth N] [FILE...]

Evaluates each FILE in order against one shared environment.
With no files, reads a program from stdin, or starts the REPL when
stdin is a terminal.

options:
  --repl          start the REPL after evaluating the files
  --max-depth N   limit nested calls to N (default 1024)
  -h, --help      print this help

environment:
  OK_LOG          log filter, e.g. debug or ok=trace (default warn)";

struct Options {
    repl: bool,
    max_depth: Option<usize>,
    files: Vec<String>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options {
        repl: false,
        max_depth: None,
        files: Vec::new(),
    };
    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                process::exit(0);
            }
            "--repl" => options.repl = true,
            "--max-depth" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--max-depth requires a value".to_string())?;
                let depth = value
                    .parse()
                    .map_err(|_| format!("invalid --max-depth value '{value}'"))?;
                options.max_depth = Some(depth);
            }
            "--" => {
                options.files.extend(args.by_ref());
            }
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option '{flag}'"));
            }
            path => options.files.push(path.to_string()),
        }
    }
    Ok(options)
}

fn run(options: Options) -> Result<(), String> {
    let mut env = host_environment();
    if let Some(depth) = options.max_depth {
        env.set_max_call_depth(depth);
    }

    let sources = if options.files.is_empty() {
        if io::stdin().is_terminal() || options.repl {
            Vec::new()
        } else {
            vec![Source::from_stdin().map_err(|e| e.to_string())?]
        }
    } else {
        options
            .files
            .iter()
            .map(|path| Source::from_file(path))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.to_string())?
    };

    let interactive = options.repl || (options.files.is_empty() && sources.is_empty());
    debug!(files = sources.len(), interactive, "starting");

    run_sources(&sources, &mut env).map_err(|e| e.to_string())?;

    if interactive {
        run_repl(env).map_err(|e| format!("repl: {e}"))?;
    }
    Ok(())
}

fn main() {
    init_tracing();

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    if let Err(message) = result {
        eprintln!("error: {message}");
        process::exit(1);
    }
}
