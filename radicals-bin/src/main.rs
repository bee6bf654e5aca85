use std::io::{self, Read};
use std::path::PathBuf;

use gumdrop::Options;
use hashbrown::HashSet;
use serde::Serialize;
use smol_str::SmolStr;

use radicals::cache::{self, CacheConfig};
use radicals::search::{group_by_distance, within_distance, SearchConfig, Similar};
use radicals::types::Distance;
use radicals::{enumerate_sorted, enumerate_sorted_with, DecompositionGraph, Node};

const DEFAULT_MAX_DISTANCE: Distance = 2.0;

trait OutputWriter {
    fn write_similar(&mut self, character: &str, results: Vec<Similar>);
    fn finish(&mut self) -> anyhow::Result<()>;
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_similar(&mut self, character: &str, results: Vec<Similar>) {
        println!("{}:", character);

        if results.is_empty() {
            println!("  (nothing within range)");
        }

        for (distance, characters) in group_by_distance(results) {
            println!("  {}: {}", distance, characters.concat());
        }

        println!();
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct SimilarRequest {
    character: String,
    results: Vec<Similar>,
}

#[derive(Serialize)]
struct JsonWriter {
    results: Vec<SimilarRequest>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter { results: vec![] }
    }
}

impl OutputWriter for JsonWriter {
    fn write_similar(&mut self, character: &str, mut results: Vec<Similar>) {
        results.sort();
        self.results.push(SimilarRequest {
            character: character.to_owned(),
            results,
        });
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "raw composition table (default: $RADICALS_JSON or rads.json)")]
    raw: Option<PathBuf>,

    #[options(help = "graph snapshot (default: $RADICALS_SNAPSHOT or radicals.snapshot)")]
    snapshot: Option<PathBuf>,

    #[options(no_short, help = "ignore any existing snapshot")]
    rebuild: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "list characters that look like the given ones")]
    Similar(SimilarArgs),

    #[options(help = "list every character, grouped by shared components")]
    Enumerate(EnumerateArgs),

    #[options(help = "list characters without a decomposition")]
    Roots(ListArgs),

    #[options(help = "list characters not used as a component")]
    Leaves(ListArgs),

    #[options(help = "list pseudo-components with no stroke count")]
    Special(ListArgs),

    #[options(help = "rebuild the graph snapshot from the raw table")]
    Build(ListArgs),
}

#[derive(Debug, Options)]
struct SimilarArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "maximum distance from each input character")]
    distance: Option<Distance>,

    #[options(no_short, long = "stroke-cost", help = "charge for stroke count differences")]
    stroke_cost: bool,

    #[options(
        no_short,
        long = "no-alternates",
        help = "skip characters sharing a component on the opposite side"
    )]
    no_alternates: bool,

    #[options(
        no_short,
        long = "no-parents",
        help = "skip siblings of the input's components"
    )]
    no_parents: bool,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "characters to be processed")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct EnumerateArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "only list characters contained in this file")]
    whitelist: Option<PathBuf>,
}

#[derive(Debug, Options)]
struct ListArgs {
    #[options(help = "print help message")]
    help: bool,
}

fn read_stdin() -> anyhow::Result<String> {
    eprintln!("Reading from stdin...");
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn cache_config(args: &Args) -> CacheConfig {
    let mut config = CacheConfig::default();

    if let Some(raw) = &args.raw {
        config.raw_path = raw.clone();
    }
    if let Some(snapshot) = &args.snapshot {
        config.snapshot_path = snapshot.clone();
    }
    config.rebuild = args.rebuild;

    config
}

fn similar(graph: &DecompositionGraph, args: SimilarArgs) -> anyhow::Result<()> {
    let mut search_cfg = SearchConfig::default();
    search_cfg.include_stroke_cost = args.stroke_cost;
    search_cfg.include_parent_alternates = !args.no_alternates;
    search_cfg.include_parent_siblings = !args.no_parents;

    let max_distance = args.distance.unwrap_or(DEFAULT_MAX_DISTANCE);

    let mut writer: Box<dyn OutputWriter> = if args.use_json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    };

    let inputs = if args.inputs.is_empty() {
        read_stdin()?
    } else {
        args.inputs.concat()
    };

    for character in inputs.chars().filter(|c| !c.is_whitespace()) {
        let character = character.to_string();
        let mut exclusions: HashSet<SmolStr> = HashSet::new();

        match within_distance(graph, &character, max_distance, &mut exclusions, &search_cfg) {
            Ok(search) => writer.write_similar(&character, search.collect()),
            Err(e) => log::warn!("Skipping '{}': {}", character, e),
        }
    }

    writer.finish()
}

fn enumerate(graph: &DecompositionGraph, args: EnumerateArgs) -> anyhow::Result<()> {
    match args.whitelist {
        Some(path) => {
            let whitelist = std::fs::read_to_string(&path)?;
            let whitelist: String = whitelist.chars().filter(|c| !c.is_whitespace()).collect();

            for character in enumerate_sorted_with(graph, whitelist.as_str()) {
                println!("{}", character);
            }
        }
        None => {
            for character in enumerate_sorted(graph) {
                println!("{}", character);
            }
        }
    }

    Ok(())
}

fn list<'a, I>(nodes: I)
where
    I: Iterator<Item = &'a Node>,
{
    for node in nodes {
        println!("{}", node.character());
    }
}

fn build(config: &CacheConfig) -> anyhow::Result<()> {
    let graph = cache::rebuild(&config.raw_path)?;
    cache::save(&graph, &config.snapshot_path)?;

    eprintln!(
        "Wrote {} characters to {}",
        graph.len(),
        config.snapshot_path.display()
    );

    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse_args_default_or_exit();
    let config = cache_config(&args);

    match args.command {
        None => Ok(()),
        Some(Command::Build(_)) => build(&config),
        Some(Command::Similar(args)) => similar(&cache::load(&config)?, args),
        Some(Command::Enumerate(args)) => enumerate(&cache::load(&config)?, args),
        Some(Command::Roots(_)) => {
            list(cache::load(&config)?.roots());
            Ok(())
        }
        Some(Command::Leaves(_)) => {
            list(cache::load(&config)?.leaves());
            Ok(())
        }
        Some(Command::Special(_)) => {
            list(cache::load(&config)?.special());
            Ok(())
        }
    }
}
