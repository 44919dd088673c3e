//! Play command - hotseat game in the terminal
//!
//! Both players share the keyboard. Every move goes through the same
//! select/target/confirm cycle the online client uses, so rejected input
//! prints the engine's advisory and changes nothing.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use hive_core::{Color, Game, Hex, PieceKind, RuleViolation};

pub fn run() -> Result<()> {
    let stdin = io::stdin();
    let mut game = Game::new();

    println!("Hive hotseat. Type 'help' for commands.");
    print_board(&game);

    loop {
        print!("{}> ", game.current_player().name());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            continue;
        };

        match command {
            "place" => run_place(&mut game, &parts[1..]),
            "move" => run_move(&mut game, &parts[1..]),
            "confirm" => match game.confirm() {
                Ok(snapshot) => {
                    if snapshot.game_won {
                        print_board(&game);
                        if let Some(winner) = snapshot.game_winner {
                            println!("{} wins: the queen is surrounded.", winner.name());
                        }
                        continue;
                    }
                    print_board(&game);
                }
                Err(violation) => advise(violation),
            },
            "undo" => match game.undo() {
                Ok(()) => {
                    println!("move taken back");
                    print_board(&game);
                }
                Err(violation) => advise(violation),
            },
            "show" => print_board(&game),
            "restart" => {
                game.restart();
                println!("new game");
                print_board(&game);
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("unknown command '{other}'; type 'help'"),
        }
    }

    Ok(())
}

/// place <piece> <q> <r>
fn run_place(game: &mut Game, args: &[&str]) {
    let Some((kind, rest)) = args.split_first().map(|(k, r)| (PieceKind::parse(k), r)) else {
        println!("usage: place <piece> <q> <r>");
        return;
    };
    let Some(kind) = kind else {
        println!("unknown piece; one of: queen beetle grasshopper spider ant");
        return;
    };
    let Some(at) = parse_hex(rest) else {
        println!("usage: place <piece> <q> <r>");
        return;
    };

    match game.select_inventory_piece(kind) {
        Ok(targets) => {
            if !targets.contains(&at) {
                println!("legal cells: {}", format_targets(targets));
            }
        }
        Err(violation) => {
            advise(violation);
            return;
        }
    }
    match game.target(at) {
        Ok(()) => println!("staged: {} at {}. confirm or undo.", kind.name(), at.key()),
        Err(violation) => advise(violation),
    }
}

/// move <q> <r> <q2> <r2>
fn run_move(game: &mut Game, args: &[&str]) {
    let (Some(from), Some(to)) = (parse_hex(args.get(..2).unwrap_or(&[])), parse_hex(args.get(2..).unwrap_or(&[]))) else {
        println!("usage: move <q> <r> <q2> <r2>");
        return;
    };

    match game.select_board_piece(from) {
        Ok(targets) => {
            if !targets.contains(&to) {
                println!("legal cells: {}", format_targets(targets));
            }
        }
        Err(violation) => {
            advise(violation);
            return;
        }
    }
    match game.target(to) {
        Ok(()) => println!("staged: {} -> {}. confirm or undo.", from.key(), to.key()),
        Err(violation) => advise(violation),
    }
}

fn parse_hex(args: &[&str]) -> Option<Hex> {
    let q = args.first()?.parse().ok()?;
    let r = args.get(1)?.parse().ok()?;
    Some(Hex::new(q, r))
}

fn format_targets(targets: &[Hex]) -> String {
    let mut keys: Vec<String> = targets.iter().map(|hex| hex.key()).collect();
    keys.sort();
    keys.join(" ")
}

fn advise(violation: RuleViolation) {
    println!("rejected: {violation}");
}

fn print_board(game: &Game) {
    let board = game.board();
    let mut cells: Vec<Hex> = board.occupied().collect();
    cells.sort();

    if cells.is_empty() {
        println!("  (empty board)");
    }
    for hex in cells {
        if let Some(piece) = board.top_piece(hex) {
            let height = board.height(hex);
            let stack = if height > 1 {
                format!(" (stack of {height})")
            } else {
                String::new()
            };
            println!(
                "  {:>7}  {} {}{}",
                hex.key(),
                piece.color.name(),
                piece.kind.name(),
                stack
            );
        }
    }

    for color in [Color::White, Color::Black] {
        let inventory = game.inventory(color);
        let remaining: Vec<String> = PieceKind::ALL
            .into_iter()
            .filter(|&kind| inventory.remaining(kind) > 0)
            .map(|kind| format!("{}x{}", kind.name(), inventory.remaining(kind)))
            .collect();
        println!("  {} hand: {}", color.name(), remaining.join(" "));
    }
    if game.awaiting_confirm() {
        println!("  (move staged; confirm or undo)");
    }
}

fn print_help() {
    println!("commands:");
    println!("  place <piece> <q> <r>   stage a placement (queen beetle grasshopper spider ant)");
    println!("  move <q> <r> <q2> <r2>  stage a board move");
    println!("  confirm                 end the turn");
    println!("  undo                    take back the staged move");
    println!("  show                    print the board and hands");
    println!("  restart                 start a new game");
    println!("  quit                    leave");
}
