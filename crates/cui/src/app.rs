use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use middl_core::{
    BettingMethod, Catalog, Event, EventBus, GameConfig, Phase, Player, PlayerId, Roster,
    RoundError, RoundState, SequenceSource, TickOutcome,
};
use middl_data::{default_roster_path, load_assets, load_roster, load_roster_or_empty, save_roster};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_EVENT_LOG: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Players,
    Methods,
    Events,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    AddPlayer,
    Filter,
    Save,
    Load,
}

/// An in-progress sequence choice for one player.
#[derive(Debug, Clone)]
pub struct Picker {
    pub player: PlayerId,
    pub picks: Vec<BettingMethod>,
}

/// Sequences gathered in the picker, handed to the round when it prepares.
#[derive(Debug, Default)]
struct PickedSequences(HashMap<PlayerId, Vec<BettingMethod>>);

impl SequenceSource for PickedSequences {
    fn request_sequence(
        &mut self,
        player: &Player,
        _catalog: &Catalog,
        _length: usize,
    ) -> Option<Vec<BettingMethod>> {
        self.0.remove(&player.id)
    }
}

pub struct App {
    pub round: RoundState,
    pub catalog: Catalog,
    pub events: EventBus,
    pub roster_path: Option<PathBuf>,
    pub focus: FocusPane,
    pub player_cursor: usize,
    pub method_cursor: usize,
    pub method_filter: String,
    pub picker: Option<Picker>,
    pending: VecDeque<PlayerId>,
    picked: PickedSequences,
    start_when_ready: bool,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub prompt_mode: Option<PromptMode>,
    pub prompt_input: String,
    pub should_quit: bool,
}

impl App {
    pub fn bootstrap(
        assets: &Path,
        roster_path: Option<PathBuf>,
        seed: Option<u64>,
        tick_ms: Option<u64>,
    ) -> Result<Self> {
        let loaded = load_assets(assets).context("load assets")?;
        let mut config = loaded.config;
        if seed.is_some() {
            config.seed = seed;
        }
        if let Some(tick_ms) = tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        let roster_path = roster_path.or_else(default_roster_path);
        let roster = roster_path
            .as_deref()
            .map(load_roster_or_empty)
            .unwrap_or_default();
        Ok(Self::new(config, loaded.catalog, roster, roster_path))
    }

    pub fn new(
        config: GameConfig,
        catalog: Catalog,
        roster: Roster,
        roster_path: Option<PathBuf>,
    ) -> Self {
        let round = RoundState::new(config, roster);
        let mut app = Self {
            round,
            catalog,
            events: EventBus::default(),
            roster_path,
            focus: FocusPane::Players,
            player_cursor: 0,
            method_cursor: 0,
            method_filter: String::new(),
            picker: None,
            pending: VecDeque::new(),
            picked: PickedSequences::default(),
            start_when_ready: false,
            event_log: VecDeque::new(),
            status_line: "ready".to_string(),
            show_help: false,
            prompt_mode: None,
            prompt_input: String::new(),
            should_quit: false,
        };
        app.push_event_line(format!(
            "{} methods, seed {}",
            app.catalog.len(),
            app.round.seed()
        ));
        app
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.round.config.tick_interval_ms)
    }

    pub fn on_tick(&mut self) {
        if !self.round.is_running() {
            return;
        }
        let outcome = self.round.tick(&mut self.events);
        self.flush_events();
        match outcome {
            Ok(TickOutcome::Won(win)) => {
                self.push_status(format!("{} wins {}$", win.name, win.payout.winner_share));
                self.persist();
            }
            Ok(_) => {}
            Err(err) => {
                self.push_error(err);
                self.persist();
            }
        }
    }

    pub fn focus_label(&self, pane: FocusPane) -> &'static str {
        match pane {
            FocusPane::Players => "Players",
            FocusPane::Methods => "Methods",
            FocusPane::Events => "Events",
        }
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        self.focus = match (self.focus, forward) {
            (FocusPane::Players, true) => FocusPane::Methods,
            (FocusPane::Methods, true) => FocusPane::Events,
            (FocusPane::Events, true) => FocusPane::Players,
            (FocusPane::Players, false) => FocusPane::Events,
            (FocusPane::Methods, false) => FocusPane::Players,
            (FocusPane::Events, false) => FocusPane::Methods,
        };
    }

    pub fn move_cursor(&mut self, down: bool) {
        match self.focus {
            FocusPane::Players => move_index(&mut self.player_cursor, self.round.roster.len(), down),
            FocusPane::Methods => {
                let len = self.visible_methods().len();
                move_index(&mut self.method_cursor, len, down);
            }
            FocusPane::Events => {}
        }
    }

    /// Methods matching the current filter, most likely first.
    pub fn visible_methods(&self) -> Vec<&BettingMethod> {
        self.catalog.search(&self.method_filter)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.round.roster.at(self.player_cursor)
    }

    pub fn next_hint(&self) -> String {
        if let Some(picker) = &self.picker {
            let name = self
                .round
                .roster
                .get(picker.player)
                .map(|player| player.name.as_str())
                .unwrap_or("-");
            return format!(
                "pick method {}/{} for {name} (enter adds, esc skips)",
                picker.picks.len() + 1,
                self.round.config.sequence_length
            );
        }
        match self.round.phase() {
            Phase::Running => "dealing... (c stops)".to_string(),
            _ if self.round.roster.is_empty() => "a adds a player".to_string(),
            _ => "enter picks a sequence, g starts the round".to_string(),
        }
    }

    pub fn activate_primary(&mut self) {
        match self.focus {
            FocusPane::Players => self.begin_pick_for_cursor(),
            FocusPane::Methods => self.pick_current_method(),
            FocusPane::Events => {}
        }
    }

    fn begin_pick_for_cursor(&mut self) {
        if self.round.is_running() {
            self.push_status("roster is locked while dealing");
            return;
        }
        let Some(id) = self.current_player().map(|player| player.id) else {
            self.push_status("no player selected");
            return;
        };
        self.pending.clear();
        self.start_when_ready = false;
        self.open_picker(id);
    }

    fn open_picker(&mut self, player: PlayerId) {
        self.picker = Some(Picker {
            player,
            picks: Vec::new(),
        });
        self.focus = FocusPane::Methods;
    }

    pub fn pick_current_method(&mut self) {
        let Some(method) = self.visible_methods().get(self.method_cursor).map(|m| (*m).clone())
        else {
            return;
        };
        let length = self.round.config.sequence_length;
        let Some(picker) = self.picker.as_mut() else {
            self.push_status(format!(
                "{}: p={:.4} price {}$",
                method.label(),
                method.probability(),
                method.price
            ));
            return;
        };
        picker.picks.push(method);
        if picker.picks.len() < length {
            return;
        }
        if let Some(done) = self.picker.take() {
            self.finish_pick(done);
        }
    }

    fn finish_pick(&mut self, done: Picker) {
        if self.start_when_ready {
            self.picked.0.insert(done.player, done.picks);
            self.advance_queue();
            return;
        }
        match self
            .round
            .assign_sequence(done.player, done.picks, &mut self.events)
        {
            Ok(cost) => {
                self.push_status(format!("sequence bought for {cost}$"));
                self.persist();
            }
            Err(err) => self.push_error(err),
        }
        self.flush_events();
        self.focus = FocusPane::Players;
    }

    /// Esc while picking: the player sits this round out.
    pub fn cancel_pick(&mut self) {
        if self.picker.take().is_none() {
            return;
        }
        self.push_status("selection cancelled");
        if self.start_when_ready {
            self.advance_queue();
        } else {
            self.focus = FocusPane::Players;
        }
    }

    fn advance_queue(&mut self) {
        match self.pending.pop_front() {
            Some(next) => self.open_picker(next),
            None => {
                self.start_when_ready = false;
                self.focus = FocusPane::Players;
                self.launch_round();
            }
        }
    }

    pub fn start_round(&mut self) {
        if self.round.is_running() {
            self.push_status("round already running");
            return;
        }
        if self.round.phase() != Phase::Setup {
            if let Err(err) = self.round.reset() {
                self.push_error(err);
                return;
            }
        }
        self.pending = self.round.waiting_players().into();
        self.picked = PickedSequences::default();
        self.start_when_ready = true;
        self.advance_queue();
    }

    fn launch_round(&mut self) {
        let mut picked = std::mem::take(&mut self.picked);
        let prepared = self
            .round
            .prepare(&self.catalog, &mut picked, &mut self.events);
        let result = prepared.and_then(|_| self.round.start(&mut self.events));
        self.flush_events();
        match result {
            Ok(()) => self.push_status("dealing"),
            Err(err) => self.push_error(err),
        }
        self.persist();
    }

    pub fn stop_round(&mut self) {
        self.round.stop(&mut self.events);
        self.flush_events();
        self.persist();
    }

    pub fn toggle_current_player(&mut self) {
        let Some(id) = self.current_player().map(|player| player.id) else {
            return;
        };
        match self.round.toggle_player(id) {
            Ok(enabled) => {
                self.push_status(format!("{id} {}", if enabled { "enabled" } else { "disabled" }));
                self.persist();
            }
            Err(err) => self.push_error(err),
        }
    }

    pub fn remove_current_player(&mut self) {
        let Some(id) = self.current_player().map(|player| player.id) else {
            return;
        };
        match self.round.remove_player(id) {
            Ok(()) => {
                self.push_status(format!("removed {id}"));
                clamp_index(&mut self.player_cursor, self.round.roster.len());
                self.persist();
            }
            Err(err) => self.push_error(err),
        }
    }

    pub fn open_prompt(&mut self, mode: PromptMode) {
        self.prompt_mode = Some(mode);
        self.prompt_input.clear();
        if mode == PromptMode::Filter {
            self.prompt_input = self.method_filter.clone();
        }
    }

    pub fn prompt_default_path_hint(&self) -> String {
        self.roster_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn handle_prompt_key(&mut self, key: KeyEvent) -> bool {
        let Some(mode) = self.prompt_mode else {
            return false;
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt_mode = None;
                self.prompt_input.clear();
                self.push_status("prompt cancelled");
            }
            KeyCode::Enter => {
                let input = self.prompt_input.trim().to_string();
                self.prompt_mode = None;
                self.prompt_input.clear();
                self.submit_prompt(mode, &input);
            }
            KeyCode::Backspace => {
                self.prompt_input.pop();
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    self.prompt_input.push(ch);
                }
            }
            _ => {}
        }
        true
    }

    fn submit_prompt(&mut self, mode: PromptMode, input: &str) {
        match mode {
            PromptMode::AddPlayer => {
                if input.is_empty() {
                    return;
                }
                match self.round.add_player(input) {
                    Ok(id) => {
                        self.push_status(format!("added {input} ({id})"));
                        self.player_cursor = self.round.roster.len().saturating_sub(1);
                        self.persist();
                    }
                    Err(err) => self.push_error(err),
                }
            }
            PromptMode::Filter => {
                self.method_filter = input.to_string();
                self.method_cursor = 0;
                self.focus = FocusPane::Methods;
            }
            PromptMode::Save | PromptMode::Load => {
                let Ok(path) = resolve_prompt_path(input, self.roster_path.clone()) else {
                    self.push_status("roster path unavailable");
                    return;
                };
                if mode == PromptMode::Save {
                    self.save_to_path(&path);
                } else {
                    self.load_from_path(&path);
                }
            }
        }
    }

    fn save_to_path(&mut self, path: &Path) {
        match save_roster(&self.round.roster, path) {
            Ok(()) => self.push_status(format!("saved roster to {}", path.display())),
            Err(err) => self.push_status(format!("save failed: {err:#}")),
        }
    }

    fn load_from_path(&mut self, path: &Path) {
        if self.round.is_running() {
            self.push_status("cannot load while dealing");
            return;
        }
        match load_roster(path) {
            Ok(roster) => {
                self.round.roster = roster;
                clamp_index(&mut self.player_cursor, self.round.roster.len());
                self.push_status(format!("loaded roster from {}", path.display()));
            }
            Err(err) => self.push_status(format!("load failed: {err:#}")),
        }
    }

    fn persist(&mut self) {
        let Some(path) = self.roster_path.clone() else {
            return;
        };
        if let Err(err) = save_roster(&self.round.roster, &path) {
            log::warn!("roster not saved: {err:#}");
            self.push_status(format!("save failed: {err:#}"));
        }
    }

    pub fn push_status(&mut self, value: impl Into<String>) {
        self.status_line = value.into();
    }

    pub fn push_error(&mut self, err: RoundError) {
        self.status_line = format!("error: {err}");
    }

    fn flush_events(&mut self) {
        let drained: Vec<_> = self.events.drain().collect();
        for event in drained {
            if let Some(line) = self.format_event(&event) {
                self.push_event_line(line);
            }
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }

    fn player_name(&self, id: PlayerId) -> String {
        self.round
            .roster
            .get(id)
            .map(|player| player.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn format_event(&self, event: &Event) -> Option<String> {
        let line = match event {
            Event::SequenceAssigned {
                player, cost, pot, ..
            } => format!("{} paid {cost}$, pot {pot}$", self.player_name(*player)),
            Event::RoundStarted { contenders, pot } => {
                format!("round started: {contenders} contender(s), pot {pot}$")
            }
            Event::CardDealt { tick, card, .. } => format!("tick {tick}: {card}"),
            Event::RowEvicted { .. } => return None,
            Event::RoundWon(win) => format!(
                "{} wins {}$ via {} with {} (house {}$)",
                win.name,
                win.payout.winner_share,
                win.direction,
                win.cards_label(),
                win.payout.house_share
            ),
            Event::RoundAborted { reason } => format!("round aborted: {reason}"),
        };
        Some(line)
    }
}

fn move_index(value: &mut usize, len: usize, down: bool) {
    if len == 0 {
        *value = 0;
        return;
    }
    if down {
        *value = (*value + 1) % len;
    } else if *value == 0 {
        *value = len - 1;
    } else {
        *value -= 1;
    }
}

fn clamp_index(value: &mut usize, len: usize) {
    if len == 0 {
        *value = 0;
    } else if *value >= len {
        *value = len - 1;
    }
}

fn resolve_prompt_path(input: &str, default_path: Option<PathBuf>) -> Result<PathBuf, String> {
    if input.is_empty() {
        return default_path.ok_or_else(|| "roster path unavailable".to_string());
    }
    Ok(PathBuf::from(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with(names: &[&str]) -> App {
        let config = GameConfig {
            seed: Some(7),
            ..GameConfig::default()
        };
        let catalog = Catalog::standard().expect("catalog");
        let mut roster = Roster::new();
        for name in names {
            roster.add(name, config.default_chips);
        }
        App::new(config, catalog, roster, None)
    }

    fn pick_label(app: &mut App, label: &str) {
        app.method_filter = label.to_string();
        app.method_cursor = app
            .visible_methods()
            .iter()
            .position(|method| method.label() == label)
            .expect("listed");
        app.pick_current_method();
    }

    #[test]
    fn picker_buys_sequence_after_last_slot() {
        let mut app = app_with(&["Ana"]);
        app.activate_primary();
        assert_eq!(app.focus, FocusPane::Methods);
        pick_label(&mut app, "red");
        pick_label(&mut app, "K");
        assert!(app.picker.is_some());
        pick_label(&mut app, "Hearts");
        assert!(app.picker.is_none());
        let player = app.current_player().expect("player");
        assert_eq!(player.sequence_label(), "red, K, Hearts");
        assert!(app.round.pot() > 0);
        assert_eq!(app.focus, FocusPane::Players);
    }

    #[test]
    fn start_asks_waiting_players_then_deals() {
        let mut app = app_with(&["Ana", "Bo"]);
        app.start_round();
        let first = app.picker.as_ref().map(|picker| picker.player);
        assert_eq!(first, app.round.roster.at(0).map(|player| player.id));
        for label in ["red", "red", "red"] {
            pick_label(&mut app, label);
        }
        // Bo declines and sits out.
        app.cancel_pick();
        assert!(app.round.is_running());
        assert_eq!(app.round.contenders(), 1);
        app.on_tick();
        assert_eq!(app.round.state.ticks, 1);
        app.stop_round();
        assert_eq!(app.round.phase(), Phase::Aborted);
    }

    #[test]
    fn start_without_sequences_reports_error() {
        let mut app = app_with(&["Ana"]);
        app.start_round();
        app.cancel_pick();
        assert!(!app.round.is_running());
        assert!(app.status_line.starts_with("error"));
    }

    #[test]
    fn add_player_prompt_registers_player() {
        let mut app = app_with(&[]);
        app.open_prompt(PromptMode::AddPlayer);
        for ch in "Cy".chars() {
            app.handle_prompt_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        app.handle_prompt_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.round.roster.len(), 1);
        assert_eq!(app.current_player().map(|p| p.name.as_str()), Some("Cy"));
        assert_eq!(app.prompt_mode, None);
    }

    #[test]
    fn resolve_prompt_path_prefers_user_input() {
        let out = resolve_prompt_path("custom/players.json", Some(PathBuf::from("default.json")))
            .expect("path");
        assert_eq!(out, PathBuf::from("custom/players.json"));
    }

    #[test]
    fn resolve_prompt_path_uses_default_for_empty_input() {
        let out = resolve_prompt_path("", Some(PathBuf::from("default.json"))).expect("path");
        assert_eq!(out, PathBuf::from("default.json"));
    }

    #[test]
    fn resolve_prompt_path_errors_without_default() {
        assert!(resolve_prompt_path("", None).is_err());
    }
}
