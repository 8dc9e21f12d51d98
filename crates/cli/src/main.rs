use anyhow::Context;
use partydeck_core::{
    CardType, Event, EventBus, GameConfig, Outcome, Phase, PlayerId, PointThreshold,
    ResolutionMode, Session, SessionError, Standing, Ticket, TypeFilter, WinCondition, Winner,
    DEFAULT_SEED, REVEAL_DELAY,
};
use partydeck_data::{load_catalog, load_catalog_dir, load_config};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct CliOptions {
    seed: u64,
    cards: Option<PathBuf>,
    config: Option<PathBuf>,
    auto_resolve: bool,
    fast: bool,
    json: bool,
}

/// Countdown the terminal is timing on behalf of the session.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    ticket: Ticket,
    at: Instant,
}

struct Table {
    session: Session,
    events: EventBus,
    setup: GameConfig,
    deadline: Option<Deadline>,
    options: CliOptions,
}

fn main() {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if let Err(err) = run(options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = std::env::var("PARTYDECK_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions {
        seed: DEFAULT_SEED,
        cards: None,
        config: None,
        auto_resolve: false,
        fast: false,
        json: false,
    };
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--auto-resolve" => options.auto_resolve = true,
            "--fast" => options.fast = true,
            "--json" => options.json = true,
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    match value.parse::<u64>() {
                        Ok(seed) => options.seed = seed,
                        Err(_) => warn!(value = %value, "ignoring invalid seed"),
                    }
                    idx += 1;
                }
            }
            "--cards" => {
                if let Some(value) = args.get(idx + 1) {
                    options.cards = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--config" => {
                if let Some(value) = args.get(idx + 1) {
                    options.config = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            other => warn!(arg = %other, "ignoring unknown argument"),
        }
        idx += 1;
    }
    options
}

fn run(options: CliOptions) -> anyhow::Result<()> {
    let cards = match &options.cards {
        Some(path) => load_catalog(path)?,
        None => load_catalog_dir(Path::new("assets")).context("load bundled catalog")?,
    };
    let mut setup = match &options.config {
        Some(path) => load_config(path)?,
        None => GameConfig::new(Vec::new()),
    };
    if options.auto_resolve {
        setup.resolution = ResolutionMode::Automatic;
    }
    println!("partydeck: {} cards loaded (seed={})", cards.len(), options.seed);
    let mut table = Table {
        session: Session::new(cards, options.seed),
        events: EventBus::default(),
        setup,
        deadline: None,
        options,
    };
    print_help();
    print_setup(&table.setup);

    let lines = spawn_line_reader();
    loop {
        print!("{} ", prompt_text(&table.session));
        io::stdout().flush().ok();
        let received = match table.deadline {
            Some(deadline) => lines.recv_timeout(time_left(deadline.at, Instant::now())),
            None => lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        let line = match received {
            Ok(line) => line.context("read command")?,
            Err(RecvTimeoutError::Timeout) => {
                println!();
                table.check_deadline();
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };
        table.check_deadline();
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        if matches!(cmd, "quit" | "exit" | "q") {
            break;
        }
        if let Err(err) = table.execute(cmd, &args) {
            println!("error: {err}");
            if let Some(hint) = error_hint(&err) {
                println!("hint: {hint}");
            }
        }
        table.settle();
    }
    Ok(())
}

/// Reads stdin on its own thread so a running countdown can fire between
/// commands.
fn spawn_line_reader() -> mpsc::Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn time_left(at: Instant, now: Instant) -> Duration {
    at.saturating_duration_since(now)
}

impl Table {
    fn execute(&mut self, cmd: &str, args: &[&str]) -> Result<(), CommandError> {
        match cmd {
            "help" | "h" | "?" => print_help(),
            "setup" => print_setup(&self.setup),
            "players" => {
                if args.is_empty() {
                    return Err(CommandError::Usage("players <name> [name...]"));
                }
                self.setup.players = args.iter().map(|name| name.to_string()).collect();
                self.setup.couples.clear();
                print_setup(&self.setup);
            }
            "couple" => {
                let pair = parse_pair(args).ok_or(CommandError::Usage("couple <n> <m>"))?;
                self.setup.couples.push(pair);
                print_setup(&self.setup);
            }
            "threshold" => {
                let points = args
                    .first()
                    .and_then(|value| value.parse::<i64>().ok())
                    .ok_or(CommandError::Usage("threshold 10|15|20|30"))?;
                self.setup.point_threshold = PointThreshold::try_from(points)
                    .map_err(|err| CommandError::Session(err.into()))?;
            }
            "mode" => {
                self.setup.resolution = match args.first().copied() {
                    Some("manual") => ResolutionMode::Manual,
                    Some("auto") | Some("automatic") => ResolutionMode::Automatic,
                    _ => return Err(CommandError::Usage("mode manual|auto")),
                };
            }
            "couples-win" => {
                self.setup.win_condition = match args.first().copied() {
                    Some("on") => WinCondition::CoupleTotal,
                    Some("off") => WinCondition::Individual,
                    _ => return Err(CommandError::Usage("couples-win on|off")),
                };
            }
            "types" => {
                let types = parse_types(args).ok_or(CommandError::Usage(
                    "types Heart,Mind,Soul,Ego,ActOut,Penalty,Wildcard",
                ))?;
                if self.session.phase() == Phase::Setup {
                    if types.is_empty() {
                        return Err(CommandError::Session(
                            partydeck_core::ConfigError::EmptyTypeSelection.into(),
                        ));
                    }
                    self.setup.selected_types = types;
                } else {
                    let purged = self.session.change_selected_types(types, &mut self.events)?;
                    self.setup.selected_types = self.session.selected_types().clone();
                    debug!(purged, "selection changed mid-game");
                }
            }
            "start" => {
                self.session.start(self.setup.clone(), &mut self.events)?;
            }
            "draw" | "d" => {
                self.session.draw(&mut self.events)?;
            }
            "done" | "c" => {
                self.session.resolve(Outcome::Complete, &mut self.events)?;
            }
            "fail" | "x" => {
                self.session.resolve(Outcome::Incomplete, &mut self.events)?;
            }
            "next" | "n" => {
                self.session.advance(&mut self.events)?;
            }
            "stop" => {
                if self.session.stop_countdown() {
                    self.deadline = None;
                    println!("countdown stopped");
                }
            }
            "wheel" => {
                let ids = parse_player_numbers(args).ok_or(CommandError::Usage("wheel <n> [m...]"))?;
                self.session.set_wheel_participants(ids)?;
                print_wheel(&self.session);
            }
            "score" | "s" => print_scoreboard(&self.session),
            "deck" => print_deck(&self.session),
            "restart" => {
                self.session.restart(&mut self.events)?;
                self.deadline = None;
            }
            "menu" => {
                self.session.abandon(&mut self.events)?;
                self.deadline = None;
            }
            _ => return Err(CommandError::Unknown(cmd.to_string())),
        }
        Ok(())
    }

    /// Drains events and plays out any reveal the last command started.
    fn settle(&mut self) {
        loop {
            let mut reveal = None;
            for event in self.events.drain() {
                if self.options.json {
                    match serde_json::to_string(&event) {
                        Ok(line) => println!("{line}"),
                        Err(err) => warn!("event not serializable: {err}"),
                    }
                } else {
                    println!("{}", format_event(&self.session, &event));
                }
                match event {
                    Event::CountdownStarted { ticket, seconds } => {
                        self.deadline = Some(Deadline {
                            ticket,
                            at: Instant::now() + Duration::from_secs(u64::from(seconds)),
                        });
                    }
                    Event::RevealStarted { ticket } => reveal = Some(ticket),
                    Event::GameEnded { .. } | Event::TurnAdvanced { .. } => self.deadline = None,
                    _ => {}
                }
            }
            let Some(ticket) = reveal else {
                break;
            };
            println!("spinning...");
            if !self.options.fast {
                std::thread::sleep(REVEAL_DELAY);
            }
            if let Err(err) = self.session.reveal_participant(ticket, &mut self.events) {
                println!("error: {err}");
            }
        }
    }

    fn check_deadline(&mut self) {
        let Some(deadline) = self.deadline else {
            return;
        };
        if Instant::now() < deadline.at {
            return;
        }
        self.deadline = None;
        if self.session.countdown_elapsed(deadline.ticket, &mut self.events) {
            self.settle();
        }
    }
}

#[derive(Debug, Error)]
enum CommandError {
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
}

fn error_hint(err: &CommandError) -> Option<&'static str> {
    let CommandError::Session(err) = err else {
        return None;
    };
    match err {
        SessionError::ResolutionPending => Some("finish the current card first (done/fail)"),
        SessionError::Deck(_) => Some("select more card types with 'types' or restart"),
        SessionError::InvalidPhase(Phase::Setup) => Some("enter players and type 'start'"),
        SessionError::GameOver => Some("type 'restart' for a new game"),
        SessionError::WrongMode(ResolutionMode::Automatic) => {
            Some("cards score on draw; use 'next' to pass the turn")
        }
        _ => None,
    }
}

fn parse_pair(args: &[&str]) -> Option<(usize, usize)> {
    let [a, b] = args else {
        return None;
    };
    let a = a.parse::<usize>().ok()?.checked_sub(1)?;
    let b = b.parse::<usize>().ok()?.checked_sub(1)?;
    Some((a, b))
}

fn parse_types(args: &[&str]) -> Option<TypeFilter> {
    let mut types = TypeFilter::new();
    for arg in args {
        for part in arg.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if part.eq_ignore_ascii_case("all") {
                types.extend(CardType::ALL);
                continue;
            }
            types.insert(CardType::from_id(part)?);
        }
    }
    Some(types)
}

fn parse_player_numbers(args: &[&str]) -> Option<Vec<PlayerId>> {
    if args.is_empty() {
        return None;
    }
    args.iter()
        .flat_map(|arg| arg.split(','))
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.trim().parse::<u32>().ok().map(PlayerId))
        .collect()
}

fn player_name(session: &Session, id: PlayerId) -> String {
    session
        .roster()
        .get(id)
        .map(|player| player.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn format_event(session: &Session, event: &Event) -> String {
    match event {
        Event::GameStarted {
            players,
            threshold,
            deck,
        } => format!("game started: {players} players, first to {threshold}, {deck} cards"),
        Event::CardDrawn { card } => {
            let mut line = format!("[{} card] {} ({:+} pts)", card.kind, card.text, card.points);
            if !card.category_description.is_empty() {
                line.push_str(&format!("\n  {}", card.category_description));
            }
            line
        }
        Event::DeckReshuffled { cards } => format!("discard pile reshuffled: {cards} cards"),
        Event::CardsExcluded { count } => format!("{count} unselected cards left play"),
        Event::ScoreChanged {
            player,
            new_score,
            delta,
        } => format!(
            "{} {:+} -> {} pts",
            player_name(session, *player),
            delta,
            new_score
        ),
        Event::TurnAdvanced { player } => format!("turn: {}", player_name(session, *player)),
        Event::CountdownStarted { seconds, .. } => format!("countdown: {seconds}s"),
        Event::TimeUp { player } => format!("time is up for {}!", player_name(session, *player)),
        Event::RevealStarted { .. } => "choosing a participant".to_string(),
        Event::ParticipantSelected { player } => {
            format!("chosen: {}", player_name(session, *player))
        }
        Event::SelectionChanged { types, purged } => {
            let names: Vec<&str> = types.iter().map(|kind| kind.id()).collect();
            format!("card types: {} ({purged} removed from deck)", names.join(", "))
        }
        Event::GameEnded { winner } => match winner {
            Winner::Player(id) => format!("{} wins!", player_name(session, *id)),
            Winner::Couple(couple) => format!(
                "{} & {} win together!",
                player_name(session, couple.0),
                player_name(session, couple.1)
            ),
        },
        Event::GameRestarted => "game reset; back to setup".to_string(),
        Event::GameAbandoned => "game abandoned; back to setup".to_string(),
    }
}

fn prompt_text(session: &Session) -> String {
    match session.phase() {
        Phase::Setup => "setup>".to_string(),
        Phase::Ended => "game over>".to_string(),
        Phase::Playing => {
            let name = session
                .current_player()
                .map(|player| player.name.as_str())
                .unwrap_or("?");
            if session.awaiting_verdict() {
                format!("{name} [done/fail]>")
            } else {
                format!("{name}>")
            }
        }
    }
}

fn print_help() {
    println!("Setup:");
    println!("  players <names...>       set player names (clears couples)");
    println!("  couple <n> <m>           pair players n and m (1-based)");
    println!("  threshold 10|15|20|30    points needed to win");
    println!("  types <list>|all         card types in play");
    println!("  mode manual|auto         score by verdict or on draw");
    println!("  couples-win on|off       couples win on combined score");
    println!("  setup                    show the pending setup");
    println!("  start                    begin the game");
    println!("Play:");
    println!("  draw|d                   draw a card");
    println!("  done|c / fail|x          resolve the card (manual mode)");
    println!("  next|n                   pass the turn (auto mode)");
    println!("  stop                     stop the countdown");
    println!("  wheel <n...>             players eligible for the spin");
    println!("  score|s / deck           show scoreboard / deck counts");
    println!("  restart / menu           reset the game / abandon it");
    println!("  quit|exit|q              exit");
}

fn print_setup(setup: &GameConfig) {
    if setup.players.is_empty() {
        println!("players: (none yet)");
    } else {
        for (idx, name) in setup.players.iter().enumerate() {
            println!("  {}. {}", idx + 1, name);
        }
    }
    for (a, b) in &setup.couples {
        println!("  couple: {} & {}", a + 1, b + 1);
    }
    let types: Vec<&str> = setup.selected_types.iter().map(|kind| kind.id()).collect();
    println!(
        "threshold={} mode={} types={}",
        setup.point_threshold.points(),
        setup.resolution,
        types.join(",")
    );
}

fn print_scoreboard(session: &Session) {
    let current = session.current_player().map(|player| player.id);
    let leader = session.roster().leading_player().map(|player| player.id);
    let line = |id: PlayerId| {
        let Some(player) = session.roster().get(id) else {
            return;
        };
        let mut marks = String::new();
        if Some(id) == current && session.phase() == Phase::Playing {
            marks.push_str(" <- turn");
        }
        if Some(id) == leader {
            marks.push_str(" *");
        }
        if let Some(partner) = session.roster().partner_of(id) {
            marks.push_str(&format!(" (with {})", partner.name));
        }
        println!("  {:<12} {:>4} pts{}", player.name, player.score, marks);
    };
    let couples = session.roster().couples();
    if couples.is_empty() {
        for player in session.roster().players() {
            line(player.id);
        }
    } else {
        for (idx, couple) in couples.iter().enumerate() {
            let total = session.roster().couple_total(*couple).unwrap_or(0);
            println!("Couple {}: {} pts total", idx + 1, total);
            line(couple.0);
            line(couple.1);
        }
        for player in session.roster().players() {
            if player.partner.is_none() {
                line(player.id);
            }
        }
    }
    let couples_rule = match session.win_condition() {
        WinCondition::CoupleTotal => ", couples win together",
        WinCondition::Individual => "",
    };
    println!(
        "first to {} ({} mode{})",
        session.threshold().points(),
        session.resolution(),
        couples_rule
    );
    match session.standing() {
        Standing::CoupleLead { couple, total } => println!(
            "{} & {} lead with {} points",
            player_name(session, couple.0),
            player_name(session, couple.1),
            total
        ),
        Standing::PlayerLead(id) => println!("{} is in the lead", player_name(session, id)),
        Standing::JustStarted => println!("game just started"),
        Standing::Empty => {}
    }
}

fn print_deck(session: &Session) {
    println!(
        "deck: {} remaining, {} discarded, {} out of play ({} total)",
        session.deck().remaining(),
        session.deck().discarded(),
        session.deck().excluded.len(),
        session.deck().total()
    );
}

fn print_wheel(session: &Session) {
    let names: Vec<String> = session
        .wheel_participants()
        .iter()
        .map(|id| player_name(session, *id))
        .collect();
    println!("wheel: {}", names.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn options_parse_flags_and_values() {
        let options = parse_cli_options(&args(&[
            "--seed",
            "42",
            "--cards",
            "deck.json",
            "--auto-resolve",
            "--fast",
        ]));
        assert_eq!(options.seed, 42);
        assert_eq!(options.cards, Some(PathBuf::from("deck.json")));
        assert!(options.auto_resolve);
        assert!(options.fast);
        assert!(!options.json);
    }

    #[test]
    fn countdown_wait_never_goes_negative() {
        let now = Instant::now();
        assert_eq!(time_left(now + Duration::from_secs(3), now), Duration::from_secs(3));
        assert_eq!(time_left(now, now + Duration::from_secs(1)), Duration::ZERO);
    }

    #[test]
    fn command_errors_render_for_the_prompt() {
        let usage = CommandError::Usage("couple <n> <m>");
        assert_eq!(usage.to_string(), "usage: couple <n> <m>");
        let session: CommandError = SessionError::GameOver.into();
        assert_eq!(session.to_string(), "the game is over");
        assert_eq!(error_hint(&session), Some("type 'restart' for a new game"));
        assert!(CommandError::Unknown("jump".into()).to_string().contains("'jump'"));
    }

    #[test]
    fn bad_seed_keeps_default() {
        let options = parse_cli_options(&args(&["--seed", "many"]));
        assert_eq!(options.seed, DEFAULT_SEED);
    }

    #[test]
    fn pairs_are_one_based() {
        assert_eq!(parse_pair(&["1", "3"]), Some((0, 2)));
        assert_eq!(parse_pair(&["0", "1"]), None);
        assert_eq!(parse_pair(&["1"]), None);
    }

    #[test]
    fn types_accept_lists_and_all() {
        let types = parse_types(&["heart,Mind", "actout"]).expect("types");
        assert_eq!(types.len(), 3);
        assert!(types.contains(&CardType::ActOut));
        assert_eq!(parse_types(&["all"]).map(|types| types.len()), Some(7));
        assert!(parse_types(&["cheese"]).is_none());
    }

    #[test]
    fn player_numbers_become_ids() {
        assert_eq!(
            parse_player_numbers(&["1,3", "4"]),
            Some(vec![PlayerId(1), PlayerId(3), PlayerId(4)])
        );
        assert_eq!(parse_player_numbers(&["x"]), None);
    }
}
