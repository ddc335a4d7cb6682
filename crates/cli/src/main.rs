use anyhow::Context;
use middl_core::{
    BettingMethod, Catalog, Event, EventBus, GridBuffer, Phase, Player, PlayerId, RoundError,
    RoundState, SequenceSource, TickOutcome, Ticker,
};
use middl_data::{default_roster_path, load_assets, load_roster_or_empty, save_roster};
use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Duration;

const PAGE_SIZE: usize = 40;

#[derive(Debug, Clone)]
struct CliOptions {
    cui: bool,
    seed: Option<u64>,
    tick_ms: Option<u64>,
    assets: PathBuf,
    roster: Option<PathBuf>,
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut cui = false;
    let mut seed = None;
    let mut tick_ms = None;
    let mut assets = PathBuf::from("assets");
    let mut roster = None;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--cui" => cui = true,
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--tick-ms" => {
                if let Some(value) = args.get(idx + 1) {
                    tick_ms = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--assets" => {
                if let Some(value) = args.get(idx + 1) {
                    assets = PathBuf::from(value);
                    idx += 1;
                }
            }
            "--roster" => {
                if let Some(value) = args.get(idx + 1) {
                    roster = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    CliOptions {
        cui,
        seed,
        tick_ms,
        assets,
        roster,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if options.cui {
        let launch = middl_cui::LaunchOptions {
            seed: options.seed,
            tick_ms: options.tick_ms,
            assets: options.assets,
            roster: options.roster,
        };
        if let Err(err) = middl_cui::run(launch) {
            eprintln!("cui launch error: {err:#}");
            std::process::exit(1);
        }
        return;
    }
    if let Err(err) = run_repl(options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

struct Session {
    round: RoundState,
    catalog: Catalog,
    events: EventBus,
    roster_path: Option<PathBuf>,
}

impl Session {
    fn bootstrap(options: &CliOptions) -> anyhow::Result<Self> {
        let assets = load_assets(&options.assets).context("load assets")?;
        let mut config = assets.config;
        if options.seed.is_some() {
            config.seed = options.seed;
        }
        if let Some(tick_ms) = options.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        let roster_path = options.roster.clone().or_else(default_roster_path);
        let roster = roster_path
            .as_deref()
            .map(load_roster_or_empty)
            .unwrap_or_default();
        let round = RoundState::new(config, roster);
        log::info!("dealer seed {}", round.seed());
        Ok(Self {
            round,
            catalog: assets.catalog,
            events: EventBus::default(),
            roster_path,
        })
    }

    fn persist(&self) {
        let Some(path) = self.roster_path.as_deref() else {
            return;
        };
        if let Err(err) = save_roster(&self.round.roster, path) {
            log::warn!("roster not saved: {err:#}");
        }
    }

    fn player_at(&self, arg: Option<&&str>) -> Result<PlayerId, String> {
        let raw = arg.ok_or("missing player number")?;
        let index = raw
            .parse::<usize>()
            .map_err(|_| format!("invalid player number: {raw}"))?;
        index
            .checked_sub(1)
            .and_then(|index| self.round.roster.at(index))
            .map(|player| player.id)
            .ok_or_else(|| format!("no player #{index}"))
    }
}

fn run_repl(options: CliOptions) -> anyhow::Result<()> {
    let mut session = Session::bootstrap(&options)?;
    println!(
        "{} betting methods loaded, sequence length {}",
        session.catalog.len(),
        session.round.config.sequence_length
    );
    print_help();
    print_players(&session.round);
    let stdin = io::stdin();
    loop {
        let Some(line) = prompt_line(&stdin, "> ")? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();
        match cmd {
            "help" | "h" | "?" => print_help(),
            "quit" | "exit" | "q" => break,
            "players" | "ls" => print_players(&session.round),
            "pot" => print_pot(&session.round),
            "methods" | "m" => print_methods(&session.catalog, &args.join(" ")),
            "add" => {
                let name = args.join(" ");
                if name.is_empty() {
                    println!("usage: add <name>");
                    continue;
                }
                match session.round.add_player(&name) {
                    Ok(id) => {
                        println!("added {name} ({id})");
                        session.persist();
                    }
                    Err(err) => print_round_error(&err),
                }
            }
            "remove" | "rm" => match session.player_at(args.first()) {
                Ok(id) => match session.round.remove_player(id) {
                    Ok(()) => {
                        println!("removed {id}");
                        session.persist();
                    }
                    Err(err) => print_round_error(&err),
                },
                Err(msg) => println!("{msg}"),
            },
            "toggle" | "t" => match session.player_at(args.first()) {
                Ok(id) => match session.round.toggle_player(id) {
                    Ok(enabled) => {
                        println!("{id} {}", if enabled { "enabled" } else { "disabled" });
                        session.persist();
                    }
                    Err(err) => print_round_error(&err),
                },
                Err(msg) => println!("{msg}"),
            },
            "assign" | "seq" => {
                let id = match session.player_at(args.first()) {
                    Ok(id) => id,
                    Err(msg) => {
                        println!("{msg}");
                        continue;
                    }
                };
                let Some(player) = session.round.roster.get(id).cloned() else {
                    continue;
                };
                let length = session.round.config.sequence_length;
                let mut source = PromptSequence::new(&stdin);
                let Some(methods) = source.request_sequence(&player, &session.catalog, length)
                else {
                    println!("selection cancelled");
                    continue;
                };
                match session
                    .round
                    .assign_sequence(id, methods, &mut session.events)
                {
                    Ok(_) => {
                        drain_events(&mut session.events);
                        session.persist();
                    }
                    Err(err) => print_round_error(&err),
                }
            }
            "start" | "go" => {
                play_round(&mut session, &stdin)?;
                session.persist();
            }
            "save" => {
                let Some(path) = args
                    .first()
                    .map(|arg| PathBuf::from(*arg))
                    .or_else(|| session.roster_path.clone())
                else {
                    println!("save path unavailable");
                    continue;
                };
                match save_roster(&session.round.roster, &path) {
                    Ok(()) => println!("saved roster to {}", path.display()),
                    Err(err) => println!("save failed: {err:#}"),
                }
            }
            "load" => {
                let Some(path) = args
                    .first()
                    .map(|arg| PathBuf::from(*arg))
                    .or_else(|| session.roster_path.clone())
                else {
                    println!("load path unavailable");
                    continue;
                };
                reload_roster(&mut session, &path);
            }
            _ => println!("unknown command: {cmd} (try `help`)"),
        }
    }
    session.persist();
    Ok(())
}

fn reload_roster(session: &mut Session, path: &Path) {
    if session.round.is_running() {
        println!("cannot load while a round is running");
        return;
    }
    match middl_data::load_roster(path) {
        Ok(roster) => {
            session.round.roster = roster;
            println!("loaded roster from {}", path.display());
            print_players(&session.round);
        }
        Err(err) => println!("load failed: {err:#}"),
    }
}

fn play_round(session: &mut Session, stdin: &io::Stdin) -> anyhow::Result<()> {
    if session.round.phase() != Phase::Setup {
        if let Err(err) = session.round.reset() {
            print_round_error(&err);
            return Ok(());
        }
    }
    let mut source = PromptSequence::new(stdin);
    if let Err(err) = session
        .round
        .prepare(&session.catalog, &mut source, &mut session.events)
    {
        print_round_error(&err);
        return Ok(());
    }
    drain_events(&mut session.events);
    if let Err(err) = session.round.start(&mut session.events) {
        print_round_error(&err);
        return Ok(());
    }
    drain_events(&mut session.events);

    let interval = Duration::from_millis(session.round.config.tick_interval_ms);
    let ticker = Ticker::new(interval);
    let mut failure = None;
    ticker.run(|| match session.round.tick(&mut session.events) {
        Ok(TickOutcome::Dealt { .. }) => {
            print_grid(&session.round.grid);
            drain_events(&mut session.events);
            ControlFlow::Continue(())
        }
        Ok(TickOutcome::Won(_)) => {
            print_grid(&session.round.grid);
            drain_events(&mut session.events);
            ControlFlow::Break(())
        }
        Ok(TickOutcome::Idle) => ControlFlow::Break(()),
        Err(err) => {
            drain_events(&mut session.events);
            failure = Some(err);
            ControlFlow::Break(())
        }
    });
    if let Some(err) = failure {
        print_round_error(&err);
    }
    print_pot(&session.round);
    print_players(&session.round);
    Ok(())
}

/// Terminal implementation of the selection port: one numbered pick per slot.
struct PromptSequence<'a> {
    stdin: &'a io::Stdin,
}

impl<'a> PromptSequence<'a> {
    fn new(stdin: &'a io::Stdin) -> Self {
        Self { stdin }
    }

    fn pick_one(&self, player: &Player, sorted: &[&BettingMethod], slot: usize) -> Option<BettingMethod> {
        let mut filter = String::new();
        loop {
            let shown: Vec<(usize, &BettingMethod)> = sorted
                .iter()
                .enumerate()
                .filter(|(_, method)| {
                    filter.is_empty() || method.label().to_ascii_lowercase().contains(&filter)
                })
                .map(|(index, method)| (index, *method))
                .collect();
            println!(
                "select method {} for {} (number, /text to filter, empty to cancel):",
                slot + 1,
                player.name
            );
            for (index, method) in shown.iter().take(PAGE_SIZE) {
                println!("{:>4}. {}", index + 1, method_line(method));
            }
            if shown.len() > PAGE_SIZE {
                println!("      ... {} more, filter with /text", shown.len() - PAGE_SIZE);
            }
            let line = prompt_line(self.stdin, "method> ").ok().flatten()?;
            let input = line.trim();
            if input.is_empty() {
                return None;
            }
            if let Some(query) = input.strip_prefix('/') {
                filter = query.trim().to_ascii_lowercase();
                continue;
            }
            match input.parse::<usize>() {
                Ok(choice) if choice >= 1 && choice <= sorted.len() => {
                    return Some(sorted[choice - 1].clone());
                }
                _ => println!("invalid choice, enter a listed number"),
            }
        }
    }
}

impl SequenceSource for PromptSequence<'_> {
    fn request_sequence(
        &mut self,
        player: &Player,
        catalog: &Catalog,
        length: usize,
    ) -> Option<Vec<BettingMethod>> {
        let sorted = catalog.sorted_by_probability();
        let mut picks = Vec::with_capacity(length);
        for slot in 0..length {
            let method = self.pick_one(player, &sorted, slot)?;
            println!("  {} -> {}", slot + 1, method_line(&method));
            picks.push(method);
        }
        Some(picks)
    }
}

fn prompt_line(stdin: &io::Stdin, prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if stdin.lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn method_line(method: &BettingMethod) -> String {
    format!(
        "{} ({}$, {}/{})",
        method.label(),
        method.price,
        method.odds.hits,
        method.odds.total
    )
}

fn drain_events(events: &mut EventBus) {
    for event in events.drain() {
        match event {
            Event::SequenceAssigned {
                player,
                cost,
                chips,
                pot,
            } => println!("{player} paid {cost}$ (chips {chips}$, pot {pot}$)"),
            Event::RoundStarted { contenders, pot } => {
                println!("round started: {contenders} contender(s), pot {pot}$")
            }
            Event::CardDealt { tick, card, .. } => println!("tick {tick}: {card}"),
            Event::RowEvicted { .. } => {}
            Event::RoundWon(win) => println!(
                "{} wins {}$ via {} with {}",
                win.name,
                win.payout.winner_share,
                win.direction,
                win.cards_label()
            ),
            Event::RoundAborted { reason } => println!("round aborted: {reason}"),
        }
    }
}

fn print_grid(grid: &GridBuffer) {
    let border = format!("+{}", "-----+".repeat(grid.width()));
    println!("{border}");
    for row in grid.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Some(card) => format!("{:^5}", card.short()),
                None => "     ".to_string(),
            })
            .collect();
        println!("|{}|", cells.join("|"));
    }
    println!("{border}");
}

fn print_pot(round: &RoundState) {
    println!(
        "pot: {}$  casino: {}$  players hold: {}$",
        round.pot(),
        round.casino(),
        round.roster.total_chips()
    );
}

fn print_players(round: &RoundState) {
    if round.roster.is_empty() {
        println!("no players yet (add <name>)");
        return;
    }
    for (index, player) in round.roster.iter().enumerate() {
        let status = if player.enabled { "" } else { " [disabled]" };
        let sequence = if player.has_sequence() {
            player.sequence_label()
        } else {
            "-".to_string()
        };
        println!(
            "{:>3}. {} ({}$){} : {}",
            index + 1,
            player.name,
            player.chips,
            status,
            sequence
        );
    }
}

fn print_methods(catalog: &Catalog, query: &str) {
    let found = catalog.search(query);
    for (index, method) in found.iter().enumerate() {
        println!("{:>4}. {}", index + 1, method_line(method));
    }
    println!("{} method(s)", found.len());
}

fn print_round_error(err: &RoundError) {
    let hint = match err {
        RoundError::NoParticipants => " (enable a player and assign a sequence)",
        RoundError::InvalidPhase(_) => " (not allowed during a running round)",
        _ => "",
    };
    println!("error: {err}{hint}");
}

fn print_help() {
    println!("commands:");
    println!("  players | ls           list players");
    println!("  add <name>             register a player");
    println!("  remove <#>             remove a player");
    println!("  toggle <#>             enable/disable a player");
    println!("  methods [text]         browse betting methods by probability");
    println!("  assign <#>             choose and pay for a player's sequence");
    println!("  start                  ask missing sequences, then deal until someone wins");
    println!("  pot                    show pot and casino");
    println!("  save [path] / load [path]");
    println!("  help, quit");
}
