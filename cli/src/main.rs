//! `wayline`: run graph definitions and the code-review workflow from the command line.
//!
//! Configuration is loaded from `~/.config/wayline/config.toml` and `.env` before
//! [`config::Settings`] is read, so both sources feed the defaults below.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wayline::ReviewOptions;

#[derive(Parser, Debug)]
#[command(name = "wayline")]
#[command(about = "Wayline: run state graphs, review code, serve the HTTP API")]
struct Args {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Pretty-print JSON output (with --json)
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a graph definition (JSON) and print the run record
    Run {
        definition: PathBuf,
        /// Initial state as a JSON object
        #[arg(long, value_name = "JSON")]
        state: Option<String>,
        /// Override the definition's iteration bound for this run
        #[arg(long, value_name = "N")]
        max_iterations: Option<usize>,
    },
    /// Run the code-review workflow on a source file
    Review {
        file: PathBuf,
        /// Quality score needed to pass (default from WAYLINE_QUALITY_THRESHOLD, else 70)
        #[arg(long, value_name = "N")]
        threshold: Option<i64>,
        /// Improvement passes allowed before giving up
        #[arg(long, value_name = "N")]
        max_loops: Option<i64>,
    },
    /// Print a graph definition as text or Graphviz DOT
    Graph {
        definition: PathBuf,
        #[arg(long)]
        dot: bool,
    },
    /// List the builtin tools graph definitions can call
    Tools,
    /// Serve the HTTP API
    Serve {
        /// Listen address (default from WAYLINE_ADDR, else 127.0.0.1:8080)
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,
    },
}

/// Writes JSON to stdout. When pretty is true, multi-line; else one line.
fn write_json<T: serde::Serialize + ?Sized>(
    value: &T,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", s);
    Ok(())
}

async fn execute(
    args: Args,
    settings: config::Settings,
) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
    let record = match args.cmd {
        Command::Run {
            definition,
            state,
            max_iterations,
        } => cli::run_definition(&definition, state.as_deref(), max_iterations).await?,
        Command::Review {
            file,
            threshold,
            max_loops,
        } => {
            let defaults = ReviewOptions::default();
            let options = ReviewOptions {
                quality_threshold: threshold.unwrap_or(settings.quality_threshold),
                max_loop_iterations: max_loops.unwrap_or(defaults.max_loop_iterations),
            };
            cli::review_file(&file, options, settings.max_iterations).await?
        }
        Command::Graph { definition, dot } => {
            let rendered = cli::describe_graph(&definition, dot)?;
            if args.json {
                write_json(&serde_json::json!({ "graph": rendered }), args.pretty)?;
            } else {
                print!("{}", rendered);
            }
            return Ok(0);
        }
        Command::Tools => {
            let tools = cli::list_tools();
            if args.json {
                write_json(&tools, args.pretty)?;
            } else {
                print!("{}", cli::render_tools(&tools));
            }
            return Ok(0);
        }
        Command::Serve { addr } => {
            serve::run_serve(addr.as_deref(), settings).await?;
            return Ok(0);
        }
    };
    tracing::info!(
        run_id = %record.run_id,
        graph = %record.graph_name,
        status = ?record.status,
        steps = record.steps,
        "run finished"
    );

    if args.json {
        write_json(&record, args.pretty)?;
    } else {
        print!("{}", cli::render_record(&record)?);
    }
    Ok(cli::exit_code(&record))
}

#[tokio::main]
async fn main() {
    config::load_and_apply("wayline", None).ok();
    let settings = config::Settings::from_env();
    let args = Args::parse();

    let serving = matches!(args.cmd, Command::Serve { .. });
    let logging = if serving {
        config::tracing_init::init_stderr_or_file(settings.log_file.as_deref())
    } else {
        config::tracing_init::init_file_or_sink(settings.log_file.as_deref())
    };
    let log_guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("wayline: logging: {}", e);
            None
        }
    };

    let code = match execute(args, settings).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("wayline: {}", e);
            2
        }
    };
    drop(log_guard);
    std::process::exit(code);
}
