use middl_core::{
    BettingMethod, Card, Catalog, CellPos, Direction, Event, EventBus, FixedSequence, GameConfig,
    GridPhase, LedgerError, Phase, Player, PlayerId, Rank, Roster, RoundError, RoundState,
    SequenceSource, Suit, TickOutcome,
};
use std::vec::IntoIter;

fn catalog() -> Catalog {
    Catalog::standard().expect("catalog")
}

fn pick(catalog: &Catalog, labels: &[&str]) -> Vec<BettingMethod> {
    labels
        .iter()
        .map(|label| catalog.find(label).cloned().expect("method"))
        .collect()
}

fn scripted(cards: &[Card]) -> IntoIter<Card> {
    cards.to_vec().into_iter()
}

fn new_round<D: Iterator<Item = Card>>(dealer: D) -> RoundState<D> {
    RoundState::with_dealer(GameConfig::default(), Roster::new(), dealer)
}

fn run_until_done<D: Iterator<Item = Card>>(
    round: &mut RoundState<D>,
    events: &mut EventBus,
    limit: usize,
) -> Vec<TickOutcome> {
    let mut outcomes = Vec::new();
    for _ in 0..limit {
        let outcome = round.tick(events).expect("tick");
        let done = matches!(outcome, TickOutcome::Won(_) | TickOutcome::Idle);
        outcomes.push(outcome);
        if done {
            break;
        }
    }
    outcomes
}

#[test]
fn three_hearts_in_a_row_wins_left_right() {
    let catalog = catalog();
    let cards = [
        Card::new(Suit::Hearts, Rank::Two),
        Card::new(Suit::Hearts, Rank::Five),
        Card::new(Suit::Hearts, Rank::Nine),
    ];
    let mut round = new_round(scripted(&cards));
    let mut events = EventBus::default();
    let ana = round.add_player("Ana").expect("add");
    let bo = round.add_player("Bo").expect("add");

    let hearts = pick(&catalog, &["Hearts", "Hearts", "Hearts"]);
    assert!(hearts.iter().all(|m| m.price == 4));
    assert_eq!(round.assign_sequence(ana, hearts, &mut events).expect("assign"), 12);
    let cost = round
        .assign_sequence(bo, pick(&catalog, &["K", "Hearts", "red"]), &mut events)
        .expect("assign");
    assert_eq!(cost, 21);
    assert_eq!(round.pot(), 33);

    round.start(&mut events).expect("start");
    let outcomes = run_until_done(&mut round, &mut events, 10);
    assert_eq!(outcomes.len(), 3);
    let TickOutcome::Won(win) = outcomes.last().cloned().expect("outcome") else {
        panic!("expected a win, got {outcomes:?}");
    };
    assert_eq!(win.winner, ana);
    assert_eq!(win.direction, Direction::LeftRight);
    assert_eq!(win.cards, cards.to_vec());
    assert_eq!(
        win.cells,
        vec![CellPos::new(0, 0), CellPos::new(0, 1), CellPos::new(0, 2)]
    );
    assert_eq!(win.payout.winner_share, 16);
    assert_eq!(win.payout.house_share, 16);
    assert_eq!(win.payout.remainder, 1);

    assert_eq!(round.pot(), 0);
    assert_eq!(round.casino(), 16);
    assert_eq!(round.roster.get(ana).map(|p| p.chips), Some(100 - 12 + 16));
    assert_eq!(round.roster.get(bo).map(|p| p.chips), Some(100 - 21));
    assert!(round.roster.iter().all(|p| p.sequence.is_empty()));
    assert_eq!(round.phase(), Phase::Finished);
    assert!(!round.is_running());

    // Nothing moves after the win.
    let ticks = round.state.ticks;
    assert_eq!(round.tick(&mut events).expect("tick"), TickOutcome::Idle);
    assert_eq!(round.state.ticks, ticks);
    assert_eq!(round.casino(), 16);

    let wins = events
        .drain()
        .filter(|event| matches!(event, Event::RoundWon(_)))
        .count();
    assert_eq!(wins, 1);
}

#[test]
fn column_of_aces_wins_top_bottom() {
    let catalog = catalog();
    let club = |rank| Card::new(Suit::Clubs, rank);
    let cards = [
        club(Rank::Ace),
        club(Rank::Two),
        club(Rank::Three),
        Card::new(Suit::Diamonds, Rank::Ace),
        club(Rank::Five),
        club(Rank::Six),
        Card::new(Suit::Hearts, Rank::Ace),
    ];
    let mut round = new_round(scripted(&cards));
    let mut events = EventBus::default();
    let id = round.add_player("Cy").expect("add");
    round
        .assign_sequence(id, pick(&catalog, &["A", "A", "A"]), &mut events)
        .expect("assign");
    round.start(&mut events).expect("start");

    let outcomes = run_until_done(&mut round, &mut events, 20);
    assert_eq!(outcomes.len(), 7);
    let Some(TickOutcome::Won(win)) = outcomes.last() else {
        panic!("expected a win");
    };
    assert_eq!(win.direction, Direction::TopBottom);
    assert_eq!(
        win.cells,
        vec![CellPos::new(0, 0), CellPos::new(1, 0), CellPos::new(2, 0)]
    );
}

#[test]
fn disabled_players_never_win() {
    let catalog = catalog();
    let cards = [
        Card::new(Suit::Spades, Rank::Two),
        Card::new(Suit::Spades, Rank::Three),
        Card::new(Suit::Spades, Rank::Four),
        Card::new(Suit::Hearts, Rank::King),
    ];
    let mut round = new_round(scripted(&cards));
    let mut events = EventBus::default();
    let off = round.add_player("Off").expect("add");
    let on = round.add_player("On").expect("add");
    round
        .assign_sequence(off, pick(&catalog, &["black", "black", "black"]), &mut events)
        .expect("assign");
    round
        .assign_sequence(on, pick(&catalog, &["red", "red", "red"]), &mut events)
        .expect("assign");
    round.toggle_player(off).expect("toggle");
    round.start(&mut events).expect("start");
    for _ in 0..3 {
        assert!(matches!(
            round.tick(&mut events).expect("tick"),
            TickOutcome::Dealt { .. }
        ));
    }
    assert!(round.is_running());
}

#[test]
fn grid_scrolls_while_nobody_matches() {
    let catalog = catalog();
    let dealer = std::iter::repeat(Card::new(Suit::Clubs, Rank::Two));
    let mut round = new_round(dealer);
    let mut events = EventBus::default();
    let id = round.add_player("Dee").expect("add");
    round
        .assign_sequence(
            id,
            pick(&catalog, &["Hearts & A", "Hearts & A", "Hearts & A"]),
            &mut events,
        )
        .expect("assign");
    round.start(&mut events).expect("start");
    for _ in 0..20 {
        round.tick(&mut events).expect("tick");
    }
    let evictions: Vec<u64> = events
        .drain()
        .filter_map(|event| match event {
            Event::RowEvicted { tick } => Some(tick),
            _ => None,
        })
        .collect();
    assert_eq!(evictions, vec![12, 15, 18]);
    assert_eq!(round.grid.phase(), GridPhase::Scrolling);
    assert_eq!(round.grid.cursor(), CellPos::new(3, 2));
}

#[test]
fn wrong_sequence_length_is_rejected_without_charging() {
    let catalog = catalog();
    let mut round = new_round(scripted(&[]));
    let mut events = EventBus::default();
    let id = round.add_player("Eve").expect("add");
    let err = round
        .assign_sequence(id, pick(&catalog, &["red", "black"]), &mut events)
        .unwrap_err();
    assert!(matches!(
        err,
        RoundError::Ledger(LedgerError::InvalidSequenceLength {
            expected: 3,
            actual: 2
        })
    ));
    assert_eq!(round.pot(), 0);
    assert_eq!(round.roster.get(id).map(|p| p.chips), Some(100));
    assert!(events.is_empty());
}

#[test]
fn start_requires_a_contender() {
    let mut round = new_round(scripted(&[]));
    let mut events = EventBus::default();
    round.add_player("Fay").expect("add");
    assert!(matches!(
        round.start(&mut events),
        Err(RoundError::NoParticipants)
    ));
    assert_eq!(round.phase(), Phase::Setup);
}

#[test]
fn prepare_asks_only_enabled_players_without_sequences() {
    let catalog = catalog();
    let mut round = new_round(scripted(&[]));
    let mut events = EventBus::default();
    let a = round.add_player("a").expect("add");
    let b = round.add_player("b").expect("add");
    let c = round.add_player("c").expect("add");
    round
        .assign_sequence(a, pick(&catalog, &["K", "K", "K"]), &mut events)
        .expect("assign");
    round.toggle_player(c).expect("toggle");
    let before = round.roster.get(a).map(|p| p.chips);

    let mut source = FixedSequence::new(["letters", "letters", "letters"]);
    let assigned = round
        .prepare(&catalog, &mut source, &mut events)
        .expect("prepare");
    assert_eq!(assigned, 1);
    assert_eq!(round.roster.get(a).map(|p| p.chips), before);
    assert_eq!(round.roster.get(b).map(|p| p.sequence.len()), Some(3));
    assert!(round.roster.get(c).map(|p| p.sequence.is_empty()).unwrap_or(false));
    assert_eq!(round.contenders(), 2);
}

#[test]
fn roster_is_locked_while_running() {
    let catalog = catalog();
    let mut round = new_round(std::iter::repeat(Card::new(Suit::Clubs, Rank::Two)));
    let mut events = EventBus::default();
    let id = round.add_player("Gus").expect("add");
    round
        .assign_sequence(id, pick(&catalog, &["red", "red", "red"]), &mut events)
        .expect("assign");
    round.start(&mut events).expect("start");
    assert!(matches!(round.add_player("late"), Err(RoundError::InvalidPhase(Phase::Running))));
    assert!(matches!(round.toggle_player(id), Err(RoundError::InvalidPhase(_))));
    assert!(matches!(
        round.assign_sequence(id, pick(&catalog, &["red", "red", "red"]), &mut events),
        Err(RoundError::InvalidPhase(_))
    ));
    assert!(matches!(round.remove_player(PlayerId(99)), Err(RoundError::InvalidPhase(_))));

    round.stop(&mut events);
    assert_eq!(round.phase(), Phase::Aborted);
    assert_eq!(round.tick(&mut events).expect("tick"), TickOutcome::Idle);
    round.reset().expect("reset");
    assert_eq!(round.phase(), Phase::Setup);
    assert_eq!(round.grid.occupied(), 0);
    assert_eq!(round.contenders(), 1);
}

#[test]
fn exhausted_dealer_aborts_the_round() {
    let catalog = catalog();
    let mut round = new_round(scripted(&[Card::new(Suit::Clubs, Rank::Two)]));
    let mut events = EventBus::default();
    let id = round.add_player("Hal").expect("add");
    round
        .assign_sequence(id, pick(&catalog, &["red", "red", "red"]), &mut events)
        .expect("assign");
    round.start(&mut events).expect("start");
    round.tick(&mut events).expect("first tick");
    assert!(matches!(
        round.tick(&mut events),
        Err(RoundError::DealerExhausted)
    ));
    assert_eq!(round.phase(), Phase::Aborted);
    assert!(events
        .drain()
        .any(|event| matches!(event, Event::RoundAborted { .. })));
}

#[test]
fn seeded_rounds_replay_identically() {
    let config = GameConfig {
        seed: Some(42),
        ..GameConfig::default()
    };
    let catalog = catalog();
    let play = || {
        let mut round = RoundState::new(config.clone(), Roster::new());
        let mut events = EventBus::default();
        let id = round.add_player("Ivy").expect("add");
        round
            .assign_sequence(id, pick(&catalog, &["red", "black", "red"]), &mut events)
            .expect("assign");
        round.start(&mut events).expect("start");
        let mut dealt = Vec::new();
        for _ in 0..500 {
            match round.tick(&mut events).expect("tick") {
                TickOutcome::Dealt { card, .. } => dealt.push(card),
                TickOutcome::Won(win) => {
                    dealt.extend(win.cards.last().copied());
                    break;
                }
                TickOutcome::Idle => break,
            }
        }
        (round.seed(), dealt)
    };
    let first = play();
    assert_eq!(first.0, 42);
    assert_eq!(first, play());
}

#[test]
fn row_read_backwards_wins_right_left() {
    let catalog = catalog();
    let cards = [
        Card::new(Suit::Hearts, Rank::Two),
        Card::new(Suit::Hearts, Rank::Three),
        Card::new(Suit::Hearts, Rank::Four),
    ];
    let mut round = new_round(scripted(&cards));
    let mut events = EventBus::default();
    let id = round.add_player("Hal").expect("add");
    round
        .assign_sequence(id, pick(&catalog, &["4", "3", "2"]), &mut events)
        .expect("assign");
    round.start(&mut events).expect("start");

    let outcomes = run_until_done(&mut round, &mut events, 10);
    let Some(TickOutcome::Won(win)) = outcomes.last() else {
        panic!("expected a win, got {outcomes:?}");
    };
    assert_eq!(win.winner, id);
    assert_eq!(win.tick, 3);
    assert_eq!(win.direction, Direction::RightLeft);
    assert_eq!(
        win.cells,
        vec![CellPos::new(0, 2), CellPos::new(0, 1), CellPos::new(0, 0)]
    );
    assert_eq!(win.cards, vec![cards[2], cards[1], cards[0]]);
}

fn spade_column(top: Rank, middle: Rank, bottom: Rank) -> Vec<Card> {
    let filler = |rank| Card::new(Suit::Diamonds, rank);
    vec![
        Card::new(Suit::Spades, top),
        filler(Rank::Five),
        filler(Rank::Six),
        Card::new(Suit::Spades, middle),
        filler(Rank::Five),
        filler(Rank::Six),
        Card::new(Suit::Spades, bottom),
    ]
}

#[test]
fn registration_order_beats_direction_order() {
    let catalog = catalog();
    let cards = spade_column(Rank::Ace, Rank::King, Rank::Queen);
    let mut round = new_round(scripted(&cards));
    let mut events = EventBus::default();
    let upward = round.add_player("Ivy").expect("add");
    let downward = round.add_player("Jo").expect("add");
    round
        .assign_sequence(upward, pick(&catalog, &["Q", "K", "A"]), &mut events)
        .expect("assign");
    round
        .assign_sequence(downward, pick(&catalog, &["A", "K", "Q"]), &mut events)
        .expect("assign");
    round.start(&mut events).expect("start");

    let outcomes = run_until_done(&mut round, &mut events, 20);
    assert_eq!(outcomes.len(), 7);
    let Some(TickOutcome::Won(win)) = outcomes.last() else {
        panic!("expected a win, got {outcomes:?}");
    };
    // Jo's top-bottom read also matches, but Ivy registered first.
    assert_eq!(win.winner, upward);
    assert_eq!(win.direction, Direction::BottomTop);
    assert_eq!(
        win.cells,
        vec![CellPos::new(2, 0), CellPos::new(1, 0), CellPos::new(0, 0)]
    );
    assert_eq!(
        win.cards.iter().map(|card| card.rank).collect::<Vec<_>>(),
        vec![Rank::Queen, Rank::King, Rank::Ace]
    );
}

#[test]
fn same_player_takes_the_earlier_direction() {
    let catalog = catalog();
    let cards = spade_column(Rank::King, Rank::King, Rank::King);
    let mut round = new_round(scripted(&cards));
    let mut events = EventBus::default();
    let id = round.add_player("Kit").expect("add");
    round
        .assign_sequence(id, pick(&catalog, &["K", "K", "K"]), &mut events)
        .expect("assign");
    round.start(&mut events).expect("start");

    let outcomes = run_until_done(&mut round, &mut events, 20);
    let Some(TickOutcome::Won(win)) = outcomes.last() else {
        panic!("expected a win, got {outcomes:?}");
    };
    assert_eq!(win.direction, Direction::TopBottom);
}

#[test]
fn restored_sequence_of_another_length_is_asked_again() {
    let catalog = catalog();
    let mut saved = Roster::new();
    let id = saved.add("Lou", 100);
    if let Some(player) = saved.get_mut(id) {
        player.sequence = pick(&catalog, &["red", "red", "red"]);
    }
    let config = GameConfig {
        sequence_length: 4,
        ..GameConfig::default()
    };
    let mut round =
        RoundState::with_dealer(config, Roster::restore(saved.snapshot()), scripted(&[]));
    let mut events = EventBus::default();
    assert_eq!(round.contenders(), 0);
    assert_eq!(round.waiting_players(), vec![id]);

    let mut source = FixedSequence::new(["red", "red", "red", "red"]);
    let assigned = round
        .prepare(&catalog, &mut source, &mut events)
        .expect("prepare");
    assert_eq!(assigned, 1);
    assert_eq!(round.roster.get(id).map(|p| p.sequence.len()), Some(4));
    assert_eq!(round.pot(), 64);
    assert_eq!(round.contenders(), 1);
    round.start(&mut events).expect("start");
}

/// Hands out queued answers in order, counting how often it was asked.
struct QueuedAnswers {
    answers: Vec<Vec<BettingMethod>>,
    asked: usize,
}

impl SequenceSource for QueuedAnswers {
    fn request_sequence(
        &mut self,
        _player: &Player,
        _catalog: &Catalog,
        _length: usize,
    ) -> Option<Vec<BettingMethod>> {
        self.asked += 1;
        if self.answers.is_empty() {
            return None;
        }
        Some(self.answers.remove(0))
    }
}

#[test]
fn prepare_asks_again_after_a_rejected_answer() {
    let catalog = catalog();
    let mut round = new_round(scripted(&[]));
    let mut events = EventBus::default();
    let id = round.add_player("Mo").expect("add");
    let mut source = QueuedAnswers {
        answers: vec![pick(&catalog, &["red"]), pick(&catalog, &["Q", "Q", "Q"])],
        asked: 0,
    };
    let assigned = round
        .prepare(&catalog, &mut source, &mut events)
        .expect("prepare");
    assert_eq!(assigned, 1);
    assert_eq!(source.asked, 2);
    assert_eq!(round.pot(), 3);
    assert_eq!(round.roster.get(id).map(|p| p.chips), Some(97));
}

#[test]
fn prepare_gives_up_after_repeated_rejections() {
    let catalog = catalog();
    let mut round = new_round(scripted(&[]));
    let mut events = EventBus::default();
    let id = round.add_player("Ned").expect("add");
    let short = pick(&catalog, &["red", "red"]);
    let mut source = QueuedAnswers {
        answers: vec![short.clone(), short.clone(), short.clone(), short],
        asked: 0,
    };
    let assigned = round
        .prepare(&catalog, &mut source, &mut events)
        .expect("prepare");
    assert_eq!(assigned, 0);
    assert_eq!(source.asked, 3);
    assert_eq!(round.pot(), 0);
    assert!(round.roster.get(id).map(|p| p.sequence.is_empty()).unwrap_or(false));
    assert!(events.is_empty());
}
