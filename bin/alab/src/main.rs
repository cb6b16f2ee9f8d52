use std::path::{Path, PathBuf};

use automata_lab::{
    library::{AutomatonLibrary, LibraryError},
    prelude::*,
    random,
};

use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::{debug, info, trace, warn};
use tracing_subscriber::{filter, prelude::*};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Automaton(#[from] AutomatonError),
    #[error(transparent)]
    Representation(#[from] RepresentationError),
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error("could not access {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn automaton_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .help("path to a JSON file or name of an automaton in the library")
}

fn max_length_arg() -> Arg {
    Arg::new("max-length")
        .short('n')
        .long("max-length")
        .value_parser(value_parser!(usize))
        .default_value("4")
        .help("maximal length of the considered words")
}

fn derived(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(automaton_arg("automaton"))
        .args(output_args())
}

fn binary(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(automaton_arg("left"))
        .arg(automaton_arg("right"))
        .args(output_args())
}

fn output_args() -> [Arg; 2] {
    [
        Arg::new("output")
            .short('o')
            .long("output")
            .value_parser(value_parser!(PathBuf))
            .help("write the resulting automaton to this file instead of stdout"),
        Arg::new("save")
            .long("save")
            .action(ArgAction::SetTrue)
            .help("store the resulting automaton in the library"),
    ]
}

fn cli() -> clap::Command {
    Command::new("alab")
    .about("Finite automata laboratory")
    .subcommand_required(true)
    .arg(
        Arg::new("verbosity")
        .short('v')
        .long("verbosity")
        .num_args(0..=1)
        .require_equals(true)
        .value_parser(["info", "debug", "trace"])
        .default_missing_value("info")
    )
    .arg(
        Arg::new("library")
        .long("library")
        .value_parser(value_parser!(PathBuf))
        .default_value("automata")
        .help("directory holding the stored automata")
    )
    .subcommand(
        Command::new("show")
        .about("prints a summary of an automaton")
        .arg(automaton_arg("automaton"))
        .arg(Arg::new("table").long("table").action(ArgAction::SetTrue).help("print the transition table instead"))
    )
    .subcommand(
        Command::new("check")
        .about("reports whether an automaton is deterministic, complete and minimal")
        .arg(automaton_arg("automaton"))
    )
    .subcommand(derived("complete", "adds a sink state for all missing transitions"))
    .subcommand(derived("complement", "complements a complete deterministic automaton"))
    .subcommand(derived("determinize", "applies the subset construction"))
    .subcommand(derived("minimize", "minimizes a deterministic automaton"))
    .subcommand(binary("union", "builds the union product of two automata"))
    .subcommand(binary("intersection", "builds the intersection product of two automata"))
    .subcommand(
        Command::new("accepts")
        .about("runs a word, given as a string of single-character symbols")
        .arg(automaton_arg("automaton"))
        .arg(Arg::new("word").help("the word to run, empty if not given"))
    )
    .subcommand(
        Command::new("words")
        .about("lists the accepted words up to a length")
        .arg(automaton_arg("automaton"))
        .arg(max_length_arg())
    )
    .subcommand(
        Command::new("rejected")
        .about("lists the rejected nonempty words up to a length")
        .arg(automaton_arg("automaton"))
        .arg(max_length_arg())
    )
    .subcommand(
        Command::new("equivalent")
        .about("compares two automata on all words up to a length")
        .arg(automaton_arg("left"))
        .arg(automaton_arg("right"))
        .arg(max_length_arg())
    )
    .subcommand(
        Command::new("dot")
        .about("prints the DOT representation of an automaton")
        .arg(automaton_arg("automaton"))
        .arg(
            Arg::new("render")
            .long("render")
            .value_parser(value_parser!(PathBuf))
            .help("render to a PNG file using graphviz instead")
        )
    )
    .subcommand(
        Command::new("random")
        .about("generates a random automaton")
        .arg(Arg::new("symbols").long("symbols").value_parser(value_parser!(usize)).default_value("2"))
        .arg(Arg::new("size").long("size").value_parser(value_parser!(usize)).help("number of states, sprouted if not given"))
        .arg(Arg::new("nfa").long("nfa").action(ArgAction::SetTrue).help("generate a nondeterministic automaton of the given size"))
        .arg(Arg::new("probability").long("probability").value_parser(value_parser!(f64)).default_value("0.5"))
        .arg(Arg::new("seed").long("seed").value_parser(value_parser!(u64)))
        .arg(Arg::new("name").long("name"))
        .args(output_args())
    )
    .subcommand(Command::new("list").about("lists the automata in the library"))
    .subcommand(
        Command::new("remove")
        .about("deletes an automaton from the library")
        .arg(Arg::new("name").required(true))
    )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::INFO,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

/// Reads the automaton from a file if `source` names one, otherwise from the library.
fn load(library: &AutomatonLibrary, source: &str) -> Result<Automaton, CliError> {
    let path = Path::new(source);
    if path.is_file() {
        debug!("reading automaton from {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(Automaton::from_json(&json)?);
    }
    Ok(library.load(source)?)
}

fn load_arg(library: &AutomatonLibrary, matches: &ArgMatches, id: &str) -> Result<Automaton, CliError> {
    let source = matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default();
    load(library, source)
}

fn emit(library: &AutomatonLibrary, matches: &ArgMatches, aut: &Automaton) -> Result<(), CliError> {
    if matches.get_flag("save") {
        library.save(aut)?;
    }
    let json = aut.to_json()?;
    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            std::fs::write(path, json).map_err(|source| CliError::Io {
                path: path.clone(),
                source,
            })?;
            info!("wrote {} to {}", aut.name(), path.display());
        }
        None if !matches.get_flag("save") => println!("{json}"),
        None => {}
    }
    Ok(())
}

fn yes_no(value: bool) -> String {
    if value {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}

fn print_words(words: Vec<Word>) {
    for w in words {
        println!("{w:?}");
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let root = matches
        .get_one::<PathBuf>("library")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("automata"));
    let library = AutomatonLibrary::open(root)?;

    match matches.subcommand() {
        Some(("show", sub)) => {
            let aut = load_arg(&library, sub, "automaton")?;
            if sub.get_flag("table") {
                println!("{}", aut.transition_table());
            } else {
                print!("{}", aut.summary());
            }
        }
        Some(("check", sub)) => {
            let aut = load_arg(&library, sub, "automaton")?;
            let deterministic = aut.is_deterministic();
            println!("{}: {}", "deterministic".bold(), yes_no(deterministic));
            println!("{}: {}", "complete".bold(), yes_no(aut.is_complete()));
            if deterministic {
                println!("{}: {}", "minimal".bold(), yes_no(aut.is_minimal()?));
            }
        }
        Some(("complete", sub)) => {
            let aut = load_arg(&library, sub, "automaton")?;
            emit(&library, sub, &aut.complete()?)?;
        }
        Some(("complement", sub)) => {
            let aut = load_arg(&library, sub, "automaton")?;
            emit(&library, sub, &aut.complement()?)?;
        }
        Some(("determinize", sub)) => {
            let aut = load_arg(&library, sub, "automaton")?;
            emit(&library, sub, &aut.determinize())?;
        }
        Some(("minimize", sub)) => {
            let aut = load_arg(&library, sub, "automaton")?;
            emit(&library, sub, &aut.minimize()?)?;
        }
        Some(("union", sub)) => {
            let left = load_arg(&library, sub, "left")?;
            let right = load_arg(&library, sub, "right")?;
            emit(&library, sub, &left.union(&right)?)?;
        }
        Some(("intersection", sub)) => {
            let left = load_arg(&library, sub, "left")?;
            let right = load_arg(&library, sub, "right")?;
            emit(&library, sub, &left.intersection(&right)?)?;
        }
        Some(("accepts", sub)) => {
            let aut = load_arg(&library, sub, "automaton")?;
            let word = Word::from(
                sub.get_one::<String>("word")
                    .map(String::as_str)
                    .unwrap_or_default(),
            );
            let accepted = aut.recognizes(&word);
            println!(
                "{word:?} is {}",
                if accepted {
                    "accepted".green().to_string()
                } else {
                    "rejected".red().to_string()
                }
            );
        }
        Some(("words", sub)) => {
            let aut = load_arg(&library, sub, "automaton")?;
            print_words(aut.accepted_words(max_length(sub)));
        }
        Some(("rejected", sub)) => {
            let aut = load_arg(&library, sub, "automaton")?;
            print_words(aut.rejected_words(max_length(sub)));
        }
        Some(("equivalent", sub)) => {
            let left = load_arg(&library, sub, "left")?;
            let right = load_arg(&library, sub, "right")?;
            let max = max_length(sub);
            println!(
                "equivalent on words up to length {max}: {}",
                yes_no(left.is_equivalent_bounded(&right, max))
            );
        }
        Some(("dot", sub)) => {
            let aut = load_arg(&library, sub, "automaton")?;
            match sub.get_one::<PathBuf>("render") {
                Some(path) => match aut.try_render() {
                    Some(png) => {
                        std::fs::write(path, png).map_err(|source| CliError::Io {
                            path: path.clone(),
                            source,
                        })?;
                        info!("rendered {} to {}", aut.name(), path.display());
                    }
                    None => warn!("no diagram written, is graphviz installed?"),
                },
                None => println!("{}", aut.dot_representation()),
            }
        }
        Some(("random", sub)) => {
            let mut rng = match sub.get_one::<u64>("seed") {
                Some(seed) => fastrand::Rng::with_seed(*seed),
                None => fastrand::Rng::new(),
            };
            let symbols = sub.get_one::<usize>("symbols").copied().unwrap_or(2);
            let probability = sub.get_one::<f64>("probability").copied().unwrap_or(0.5);
            let mut aut = match (sub.get_one::<usize>("size").copied(), sub.get_flag("nfa")) {
                (Some(size), true) => random::random_nfa(&mut rng, symbols, size, probability),
                (None, true) => random::random_nfa(&mut rng, symbols, 4, probability),
                (Some(size), false) => random::random_dfa_sized(&mut rng, symbols, size),
                (None, false) => random::random_dfa(&mut rng, symbols, probability),
            };
            if let Some(name) = sub.get_one::<String>("name") {
                aut.rename(name.as_str());
            }
            emit(&library, sub, &aut)?;
        }
        Some(("list", _)) => {
            for name in library.names()? {
                println!("{name}");
            }
        }
        Some(("remove", sub)) => {
            let name = sub
                .get_one::<String>("name")
                .map(String::as_str)
                .unwrap_or_default();
            library.remove(name)?;
        }
        _ => unreachable!("a subcommand is required"),
    }
    Ok(())
}

fn max_length(matches: &ArgMatches) -> usize {
    matches.get_one::<usize>("max-length").copied().unwrap_or(4)
}

pub fn main() {
    let matches = cli().get_matches();

    setup_logging(&matches);

    if let Err(e) = run(&matches) {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}
