use super::*;
use crate::{find_match, Event, EventBus, SequenceMatch};

impl<D: Iterator<Item = Card>> RoundState<D> {
    /// One full cycle: draw, place, match, then advance the cursor.
    pub fn tick(&mut self, events: &mut EventBus) -> Result<TickOutcome, RoundError> {
        if !self.is_running() {
            return Ok(TickOutcome::Idle);
        }
        match self.step(events) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                log::error!("round aborted at tick {}: {err}", self.state.ticks);
                self.state.phase = Phase::Aborted;
                events.push(Event::RoundAborted {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn step(&mut self, events: &mut EventBus) -> Result<TickOutcome, RoundError> {
        let card = self.dealer.next().ok_or(RoundError::DealerExhausted)?;
        self.state.ticks += 1;
        let tick = self.state.ticks;
        let at = self.grid.place(card)?;
        log::debug!("tick {tick}: {card} at ({}, {})", at.row, at.col);
        events.push(Event::CardDealt { tick, at, card });

        if let Some(found) = find_match(&self.grid, at, self.roster.players())? {
            return Ok(TickOutcome::Won(self.settle(found, events)));
        }

        let evicted = self.grid.advance();
        if evicted {
            log::debug!("tick {tick}: oldest row evicted");
            events.push(Event::RowEvicted { tick });
        }
        Ok(TickOutcome::Dealt { at, card, evicted })
    }

    fn settle(&mut self, found: SequenceMatch, events: &mut EventBus) -> WinEvent {
        let (winner, name) = {
            let player = &self.roster.players()[found.player];
            (player.id, player.name.clone())
        };
        let payout = self
            .state
            .ledger
            .credit_win(found.player, self.roster.players_mut());
        self.state.phase = Phase::Finished;
        let win = WinEvent {
            winner,
            name,
            direction: found.window.direction,
            cells: found.window.cells,
            cards: found.window.cards,
            payout,
            tick: self.state.ticks,
        };
        log::info!(
            "{} wins {} via {} with {}",
            win.name,
            payout.winner_share,
            win.direction,
            win.cards_label()
        );
        self.state.last_win = Some(win.clone());
        events.push(Event::RoundWon(win.clone()));
        win
    }
}
