use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use memorank::{
    Config, JsonCatalog, JsonFileStore, Ranker, RankerResult, SqliteStore, StateStore,
    StoreBackend,
};
use memorank_algo::{Judgment, Mode, Pending, RankingQuery, SortKey};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const USAGE: &str = "usage: memorank [stats | rankings [sort] [search] | battle | recognize | reset]";

type CliRanker = Ranker<Box<dyn StateStore>, JsonCatalog, ChaCha8Rng>;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = memorank::logging::init_tracing(&config.log_level, config.log_dir.as_deref());

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&config, &args) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "memorank failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn open_store(config: &Config) -> RankerResult<Box<dyn StateStore>> {
    Ok(match config.store {
        StoreBackend::Json => Box::new(JsonFileStore::new(&config.state_path)),
        StoreBackend::Sqlite => Box::new(SqliteStore::open(&config.state_path)?),
    })
}

fn run(config: &Config, args: &[String]) -> RankerResult<ExitCode> {
    let command = args.first().map(String::as_str).unwrap_or("stats");
    if !matches!(command, "stats" | "rankings" | "battle" | "recognize" | "reset") {
        eprintln!("unknown command {command}\n{USAGE}");
        return Ok(ExitCode::from(2));
    }

    let rng = config
        .seed
        .map(ChaCha8Rng::seed_from_u64)
        .unwrap_or_else(ChaCha8Rng::from_entropy);
    let store = open_store(config)?;
    let catalog = JsonCatalog::new(&config.catalog_path);

    // reset skips the saved run entirely
    if command == "reset" {
        let _: CliRanker = Ranker::open_fresh(store, catalog, config.group_size, rng)?;
        println!("all ranking data reset");
        return Ok(ExitCode::SUCCESS);
    }

    let mut ranker: CliRanker = Ranker::open(store, catalog, config.group_size, rng)?;
    match command {
        "rankings" => print_rankings(&ranker, args.get(1), args.get(2)),
        "battle" => battle(&mut ranker)?,
        "recognize" => recognize(&mut ranker)?,
        _ => print_stats(&ranker),
    }
    Ok(ExitCode::SUCCESS)
}

fn prompt(text: &str) -> io::Result<()> {
    print!("{text}");
    io::stdout().flush()
}

fn print_stats(ranker: &CliRanker) {
    let session = ranker.session();
    let summary = ranker.summary();
    println!("items:      {}", summary.population);
    println!("judgments:  {}", summary.total_judgments);
    println!("mode:       {} ({})", session.mode(), session.bias_level().describe());

    match (summary.least_memorable, summary.rating_range) {
        (Some(item), Some((low, high))) => {
            println!("least memorable: {} ({} ELO)", item.display_name, item.rating());
            println!("rating range: {low} - {high} (spread: {})", high - low);
        }
        _ => println!("start comparing to find the least memorable!"),
    }
}

fn print_rankings(ranker: &CliRanker, sort: Option<&String>, search: Option<&String>) {
    let query = RankingQuery {
        search: search.cloned(),
        sort: sort.and_then(|s| SortKey::from_str(s)).unwrap_or_default(),
    };
    let listed = ranker.rankings(&query);
    if listed.is_empty() {
        println!("no items found");
        return;
    }

    for entry in listed {
        let item = entry.item;
        println!(
            "{:>5}  {:<24} #{:<5} {:>6}  W:{} L:{} M:{}",
            format!("#{}", entry.position),
            item.display_name,
            item.ordinal,
            item.rating(),
            item.wins(),
            item.losses(),
            item.matches()
        );
    }
}

fn battle(ranker: &mut CliRanker) -> RankerResult<()> {
    if ranker.session().mode() != Mode::Pairwise {
        ranker.switch_mode(Mode::Pairwise)?;
    }
    let mut lines = io::stdin().lock().lines();

    while let Some(Pending::Pair { left, right }) = ranker.pending().cloned() {
        let session = ranker.session();
        println!(
            "\n#{} which is more memorable?  [{}]",
            session.total_judgments() + 1,
            session.bias_level().describe()
        );
        for (key, id) in [("a", left), ("d", right)] {
            if let Some(item) = session.population().get(id) {
                println!(
                    "  {key}) {} (#{})  W:{} L:{}",
                    item.display_name,
                    item.ordinal,
                    item.wins(),
                    item.losses()
                );
            }
        }

        prompt("a/d, q to quit> ")?;
        let Some(line) = lines.next() else { break };
        let judgment = match line?.trim() {
            "a" | "1" | "left" => Judgment::Pairwise { winner: left, loser: right },
            "d" | "2" | "right" => Judgment::Pairwise { winner: right, loser: left },
            "q" | "quit" => break,
            _ => continue,
        };
        ranker.submit(judgment)?;
    }
    Ok(())
}

fn recognize(ranker: &mut CliRanker) -> RankerResult<()> {
    if ranker.session().mode() != Mode::Group {
        ranker.switch_mode(Mode::Group)?;
    }
    let mut lines = io::stdin().lock().lines();

    while let Some(Pending::Group { members }) = ranker.pending().cloned() {
        let session = ranker.session();
        println!(
            "\nwhich of these can you name?  [{}]",
            session.bias_level().describe()
        );
        for (pos, id) in members.iter().enumerate() {
            if let Some(item) = session.population().get(*id) {
                let image = item.image_ref.as_deref().unwrap_or("-");
                println!("  {}) #{}  {image}", pos + 1, item.ordinal);
            }
        }

        prompt("numbers separated by spaces (empty for none), q to quit> ")?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        if matches!(line.trim(), "q" | "quit") {
            break;
        }

        let selected = line
            .split_whitespace()
            .filter_map(|token| token.parse::<usize>().ok())
            .filter_map(|pos| members.get(pos.checked_sub(1)?).copied())
            .collect();
        ranker.submit(Judgment::Group { selected })?;
    }
    Ok(())
}
