use chp_lang::cli::{self, CheckOptions, CheckResult, CliError, EvalOptions, RunOptions};
use clap::{Parser as ClapParser, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "chp")]
#[command(about = "CHP - A small scripting language with a tree-walking interpreter")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script file
    Run {
        /// Path of the script
        file: PathBuf,

        /// Read real input and print HELP/DIR output (default when stdin is a terminal)
        #[arg(long, conflicts_with = "batch")]
        interactive: bool,

        /// Never block on input; INPUT returns a placeholder
        #[arg(long)]
        batch: bool,

        /// Directory of help files laid out as <DIR>/<CATEGORY>/<name>.txt
        #[arg(long)]
        help_dir: Option<PathBuf>,
    },

    /// Evaluate inline code and print the value of its last statement
    Eval {
        /// The code to evaluate
        code: String,

        /// Print the value as JSON
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate the syntax of a script without running it
    Check {
        /// Path of the script
        file: PathBuf,
    },

    /// Show the documentation overview, or help for one topic
    Docs {
        /// Keyword, type or built-in function name
        topic: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            file,
            interactive,
            batch,
            help_dir,
        } => run_script(file, interactive, batch, help_dir),
        Commands::Eval { code, json, pretty } => {
            cli::execute_eval(&EvalOptions { code, json, pretty }).map(|out| println!("{}", out))
        }
        Commands::Check { file } => check_script(file),
        Commands::Docs { topic: None } => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Docs { topic: Some(topic) } => {
            cli::get_doc_topic(&topic).map(|content| println!("{}", content))
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_script(
    path: PathBuf,
    interactive: bool,
    batch: bool,
    help_dir: Option<PathBuf>,
) -> Result<(), CliError> {
    let interactive = if interactive || batch {
        interactive
    } else {
        atty::is(atty::Stream::Stdin)
    };

    let options = RunOptions {
        path,
        interactive,
        help_dir,
    };
    let result = cli::execute_run(&options)?;
    if result.input_requested {
        eprintln!("note: INPUT was called in batch mode and returned a placeholder");
    }
    Ok(())
}

fn check_script(path: PathBuf) -> Result<(), CliError> {
    let source = fs::read_to_string(&path)?;
    let options = CheckOptions {
        source_name: path.display().to_string(),
        source,
    };
    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
    }
    Ok(())
}
