use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use gambit_core::{Position, STARTING_FEN};
use gambit_engine::{Engine, MoveSource, SearchConfig, WeightedBook, format_score};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gambit", version, about = "Chess move search engine")]
struct Cli {
    /// Position to search, in FEN.
    #[arg(long, default_value = STARTING_FEN)]
    fen: String,

    /// Moves played from `--fen` to reach the position, in coordinate notation.
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    moves: Vec<String>,

    /// Maximum search depth in plies.
    #[arg(short, long, default_value_t = 6)]
    depth: u8,

    /// Time budget in milliseconds.
    #[arg(long)]
    movetime: Option<u64>,

    /// Draw contempt in centipawns.
    #[arg(long, default_value_t = 20)]
    contempt: i32,

    /// Transposition table size in megabytes.
    #[arg(long, default_value_t = 16)]
    hash: usize,

    /// Opening book file, one game per line.
    #[arg(long)]
    book: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Count leaf nodes of the legal move tree.
    Perft {
        depth: usize,

        /// Print the count below each root move.
        #[arg(long)]
        divide: bool,

        /// Also break the leaf moves down by kind.
        #[arg(long, conflicts_with = "divide")]
        stats: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (position, history) = setup_position(&cli.fen, &cli.moves)?;
    debug!(fen = %position, history = history.len(), "position ready");

    match cli.command {
        Some(Command::Perft { depth, divide, stats }) => run_perft(position, depth, divide, stats),
        None => run_search(&cli, position, history),
    }
}

/// Parse the FEN, play `moves` and collect the keys needed for repetition
/// detection. Keys before an irreversible move are dropped.
fn setup_position(fen: &str, moves: &[String]) -> Result<(Position, Vec<u64>)> {
    let mut position: Position = fen.parse().with_context(|| format!("invalid FEN {fen:?}"))?;
    let mut history = Vec::new();

    for text in moves {
        let mv = position
            .parse_move(text)
            .with_context(|| format!("cannot play {text:?} in {position}"))?;
        history.push(position.hash());
        if mv.is_irreversible() {
            history.clear();
        }
        position = position.with_move(mv);
    }

    Ok((position, history))
}

fn run_search(cli: &Cli, position: Position, history: Vec<u64>) -> Result<()> {
    let config = SearchConfig {
        max_depth: cli.depth,
        time_budget: cli.movetime.map(Duration::from_millis),
        contempt: cli.contempt,
        tt_size_mb: cli.hash,
        ..SearchConfig::default()
    };
    let mut engine = Engine::new(config);

    if let Some(path) = &cli.book {
        let book = WeightedBook::load(path).with_context(|| format!("loading book {}", path.display()))?;
        info!(path = %path.display(), positions = book.len(), "opening book loaded");
        engine.set_book(Box::new(book));
    }

    let (tx, rx) = mpsc::channel::<u8>();
    let worker = std::thread::spawn(move || {
        let decision = engine.pick_move(&position, &history, &mut |percent| {
            let _ = tx.send(percent);
        });
        (position, decision)
    });

    for percent in rx {
        eprint!("\rprogress {percent:>3}%");
    }
    eprintln!();

    let (position, decision) = worker.join().map_err(|_| anyhow!("search thread panicked"))?;

    match decision.source {
        MoveSource::Book => println!("book move"),
        MoveSource::Search(result) => {
            let pv: Vec<String> = result.pv.iter().map(|m| m.to_uci()).collect();
            println!(
                "depth {} score {} nodes {} time {}ms pv {}",
                result.depth,
                format_score(result.score),
                result.nodes,
                result.elapsed.as_millis(),
                pv.join(" ")
            );
        }
    }

    match decision.best_move {
        Some(mv) => {
            println!("bestmove {mv}");
            println!("fen {}", position.with_move(mv));
        }
        None if position.is_in_check() => println!("bestmove (none) checkmate"),
        None => println!("bestmove (none) stalemate"),
    }
    Ok(())
}

fn run_perft(mut position: Position, depth: usize, divide: bool, stats: bool) -> Result<()> {
    let start = Instant::now();
    let nodes = if stats {
        let stats = gambit_core::perft_stats(&mut position, depth);
        println!(
            "captures {} ep {} castles {} promotions {} checks {} checkmates {}",
            stats.captures, stats.en_passant, stats.castles, stats.promotions, stats.checks, stats.checkmates
        );
        stats.nodes
    } else if divide {
        let counts = gambit_core::divide(&mut position, depth);
        for (mv, count) in &counts {
            println!("{mv}: {count}");
        }
        counts.iter().map(|(_, count)| count).sum()
    } else {
        gambit_core::perft(&mut position, depth)
    };

    let elapsed = start.elapsed();
    let nps = nodes as u128 * 1000 / elapsed.as_millis().max(1);
    println!("nodes {nodes}");
    info!(depth, nodes, elapsed_ms = elapsed.as_millis() as u64, nps = nps as u64, "perft done");
    Ok(())
}
