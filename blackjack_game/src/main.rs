use blackjack_game::game::MAX_SEATS;
use blackjack_game::prelude::*;
use blackjack_game::write::write_summaries;
use blackjack_lib::Hand;
use clap::Parser;
use dialoguer::{Input, Select};
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Play blackjack against the dealer from the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of players at the table, asked for when left out
    #[arg(short, long)]
    players: Option<usize>,

    /// JSON file with the game configuration, flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the shuffle, makes a session replayable
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    decks: Option<usize>,

    /// Chips every player starts with
    #[arg(long)]
    balance: Option<u64>,

    #[arg(long)]
    min_bet: Option<u32>,

    /// Pause between the dealer's draws, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Write the session summary to this file instead of stdout
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = load_config(args)?;
    let menu = ["Start game", "Show rules", "Quit"];

    loop {
        let choice = Select::new()
            .with_prompt("Blackjack")
            .items(&menu)
            .default(0)
            .interact()?;
        match choice {
            0 => {
                let summaries = play(config, args.players)?;
                report(&summaries, args.summary_out.as_deref())?;
            }
            1 => println!("{}", rules(&config)),
            _ => return Ok(()),
        }
    }
}

/// Reads the config file if one was given, then applies the command line overrides.
fn load_config(args: &Args) -> Result<GameConfig, Box<dyn Error>> {
    let mut builder = match &args.config {
        Some(path) => GameConfigBuilder::from_json(&fs::read_to_string(path)?)?,
        None => GameConfigBuilder::default(),
    };
    if let Some(seed) = args.seed {
        builder.seed(seed);
    }
    if let Some(decks) = args.decks {
        builder.num_decks(decks);
    }
    if let Some(balance) = args.balance {
        builder.starting_balance(balance);
    }
    if let Some(min_bet) = args.min_bet {
        builder.min_bet(min_bet);
    }
    if let Some(delay) = args.delay_ms {
        builder.dealer_draw_delay_ms(delay);
    }

    let config = builder.build();
    config.validate()?;
    log::debug!("{:?}", config);
    Ok(config)
}

fn rules(config: &GameConfig) -> String {
    let max = match config.max_bet {
        Some(max) => format!("${}", max),
        None => "your balance".to_string(),
    };
    format!(
        "\nGet closer to 21 than the dealer without going over.\n\
         Number cards count their value, face cards count 10 and aces count 1 or 11.\n\
         Bets run from ${} to {}. Every player starts with ${}.\n\
         A blackjack (an ace and a ten on the deal) pays {}:1, any other win pays 1:1 and ties push.\n\
         The dealer draws to 17 and {} on a soft 17.\n\
         Players who cannot cover the minimum bet sit out the rest of the game.\n",
        config.min_bet,
        max,
        config.starting_balance,
        config.blackjack_payout,
        if config.soft_seventeen { "hits" } else { "stands" },
    )
}

/// Plays rounds until the players quit or are all out of chips.
fn play(config: GameConfig, players: Option<usize>) -> Result<Vec<SessionSummary>, Box<dyn Error>> {
    let count = match players {
        Some(n) => n,
        None => Input::<usize>::new()
            .with_prompt(format!("How many players (1-{})", MAX_SEATS))
            .default(1)
            .validate_with(|n: &usize| -> Result<(), String> {
                if (1..=MAX_SEATS).contains(n) {
                    Ok(())
                } else {
                    Err(format!("a table seats between 1 and {} players", MAX_SEATS))
                }
            })
            .interact_text()?,
    };
    let names = (1..=count)
        .map(|i| {
            Input::<String>::new()
                .with_prompt(format!("Name for player {}", i))
                .allow_empty(true)
                .interact_text()
        })
        .collect::<Result<Vec<String>, _>>()?;

    let mut game = BlackjackGame::new(config, &names)?;
    let delay = Duration::from_millis(config.dealer_draw_delay_ms);

    while game.phase() != Phase::GameOver {
        println!("\n{:=^40}", format!(" Round {} ", game.round()));

        while let Some(&seat) = game.seats_awaiting_bet().first() {
            let amount = prompt_bet(&game, seat)?;
            if let Err(e) = game.place_bet(seat, amount) {
                println!("{}", e);
            }
        }

        while let Some(seat) = game.current_seat() {
            print_table(&game);
            let name = game.seats()[seat].name.clone();
            let choice = Select::new()
                .with_prompt(format!("{}, hit or stand?", name))
                .items(&["Hit", "Stand"])
                .default(0)
                .interact()?;
            let action = if choice == 0 {
                game.hit(seat).map(|card| println!("{} draws {}", name, card))
            } else {
                game.stand(seat)
            };
            if let Err(e) = action {
                println!("{}", e);
            }
        }

        // a void round puts the game back in betting
        if game.phase() != Phase::RoundOver {
            continue;
        }
        if let Some(result) = game.last_result() {
            show_dealer(result, delay);
            show_result(result);
        }

        let next = Select::new()
            .items(&["Next round", "Quit"])
            .default(0)
            .interact()?;
        if next == 1 {
            break;
        }
        game.reset_round()?;
    }

    if game.phase() == Phase::GameOver {
        println!("{}", game.status_text());
    }
    Ok(game.stats().to_vec())
}

fn prompt_bet(game: &BlackjackGame, seat: usize) -> dialoguer::Result<u32> {
    let player = &game.seats()[seat];
    let min = game.config().min_bet;
    let affordable = u32::try_from(player.balance).unwrap_or(u32::MAX);
    let max = game
        .config()
        .max_bet
        .map_or(affordable, |max| max.min(affordable));

    Input::<u32>::new()
        .with_prompt(format!(
            "{} (balance ${}), place your bet (${}-${})",
            player.name, player.balance, min, max
        ))
        .validate_with(move |bet: &u32| -> Result<(), String> {
            if *bet < min || *bet > max {
                Err(format!("bet must be between {} and {}", min, max))
            } else {
                Ok(())
            }
        })
        .interact_text()
}

fn print_table(game: &BlackjackGame) {
    let dealer = game
        .table()
        .visible_dealer_cards()
        .iter()
        .map(|card| match card {
            Some(card) => card.to_string(),
            None => "??".to_string(),
        })
        .collect::<Vec<String>>()
        .join(" ");
    println!("\n{:<21}{} ({})", "dealer:", dealer, game.table().visible_dealer_value());
    for seat in game.seats() {
        println!("{}\n", seat);
    }
    println!("{}", game.status_text());
}

/// Replays the dealer's turn one card at a time.
fn show_dealer(result: &RoundResult, delay: Duration) {
    let mut shown = Hand::new();
    for (i, card) in result.dealer_cards.iter().enumerate() {
        shown.receive_card(*card);
        match i {
            0 => continue,
            1 => println!("Dealer reveals {} ({})", card, shown.formatted_hand_values()),
            _ => {
                thread::sleep(delay);
                println!("Dealer draws {} ({})", card, shown.formatted_hand_values());
            }
        }
    }
}

fn show_result(result: &RoundResult) {
    println!("\n{}", result);
    for seat in &result.seats {
        println!(
            "{:<21}{} with {}, bet ${}, paid ${}, balance ${}",
            seat.name, seat.outcome, seat.hand_value, seat.bet, seat.payout, seat.balance
        );
    }
}

fn report(summaries: &[SessionSummary], out: Option<&Path>) -> io::Result<()> {
    match out {
        Some(path) => {
            write_summaries(summaries, BufWriter::new(File::create(path)?))?;
            log::info!("session summary written to {}", path.display());
            Ok(())
        }
        None => write_summaries(summaries, io::stdout().lock()),
    }
}
