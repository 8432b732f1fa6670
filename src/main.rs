use std::io::{self, BufRead, Write};

use clap::Parser;
use stone_garden::{Direction, Legend, LevelError, LevelPack};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Move(Direction),
    Click(i32, i32),
    Next,
    Prev,
    Restart,
    Quit,
}

const USAGE: &str =
    "commands: w/a/s/d (or up/down/left/right), c X Y (click), n (next), p (prev), r (restart), q (quit)";

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let command = match words.next()?.to_ascii_lowercase().as_str() {
        "w" | "k" | "up" => Command::Move(Direction::Up),
        "s" | "j" | "down" => Command::Move(Direction::Down),
        "a" | "h" | "left" => Command::Move(Direction::Left),
        "d" | "l" | "right" => Command::Move(Direction::Right),
        "c" | "click" => {
            let x = words.next()?.parse().ok()?;
            let y = words.next()?.parse().ok()?;
            Command::Click(x, y)
        }
        "n" | "next" => Command::Next,
        "p" | "prev" => Command::Prev,
        "r" | "restart" => Command::Restart,
        "q" | "quit" => Command::Quit,
        _ => return None,
    };

    // Trailing junk means the line was not what it looked like
    if words.next().is_some() {
        return None;
    }
    Some(command)
}

fn print_level(pack: &LevelPack) {
    let Some(level) = pack.level() else {
        println!("(no levels)");
        return;
    };

    println!(
        "level: {}/{}  moves: {}",
        pack.current_index() + 1,
        pack.len(),
        level.move_count()
    );
    if level.player_missing() {
        println!("warning: level has no player, starting at (0, 0)");
    }
    print!("{}", level);
    if level.is_won() {
        println!("Solved in {} moves! (n for next level)", level.move_count());
    }
}

#[derive(Parser)]
#[command(name = "stone-garden")]
#[command(about = "Play Sokoban level packs in the terminal", long_about = None)]
struct Args {
    /// Path to the level pack file (XSB format, levels separated by `;` lines)
    #[arg(value_name = "FILE")]
    levels_file: String,

    /// Level number to start on (1-indexed)
    #[arg(short, long, default_value = "1")]
    level: usize,

    /// Glyph overrides as role=glyph pairs, e.g. "wall=X,box=o"
    #[arg(long, value_name = "SPEC")]
    legend: Option<String>,
}

fn load_pack(args: &Args) -> Result<LevelPack, LevelError> {
    let legend = match &args.legend {
        Some(spec) => Legend::parse_overrides(spec)?,
        None => Legend::default(),
    };
    LevelPack::from_file(&args.levels_file, legend)
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let mut pack = match load_pack(&args) {
        Ok(pack) => pack,
        Err(e) => {
            eprintln!("Error loading levels: {}", e);
            std::process::exit(1);
        }
    };

    if pack.is_empty() {
        eprintln!("Error: {} contains no levels", args.levels_file);
        std::process::exit(1);
    }

    if args.level == 0 {
        eprintln!("Error: level numbers must be at least 1");
        std::process::exit(1);
    }

    if !pack.select_level(args.level - 1) {
        eprintln!(
            "Error: level {} not found (file contains {} levels)",
            args.level,
            pack.len()
        );
        std::process::exit(1);
    }

    println!("{}", USAGE);
    print_level(&pack);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                std::process::exit(1);
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let changed = match parse_command(&line) {
            Some(Command::Move(direction)) => pack.try_move(direction),
            Some(Command::Click(x, y)) => pack.handle_click(x, y),
            Some(Command::Next) => pack.load_next_level(),
            Some(Command::Prev) => pack.load_prev_level(),
            Some(Command::Restart) => pack.restart_level(),
            Some(Command::Quit) => break,
            None => {
                println!("{}", USAGE);
                continue;
            }
        };

        if changed {
            print_level(&pack);
        } else {
            println!("(nothing happens)");
        }
        // Flush so piped sessions see output line by line
        if let Err(e) = io::stdout().flush() {
            eprintln!("Error writing output: {}", e);
            std::process::exit(1);
        }
    }
}
