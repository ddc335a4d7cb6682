use super::*;
use crate::{BettingMethod, Catalog, Event, EventBus, SequenceSource};

const MAX_PROMPTS: usize = 3;

impl<D: Iterator<Item = Card>> RoundState<D> {
    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, RoundError> {
        self.ensure_not_running()?;
        Ok(self.roster.add(name, self.config.default_chips))
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), RoundError> {
        self.ensure_not_running()?;
        self.roster
            .remove(id)
            .map(|_| ())
            .ok_or(RoundError::UnknownPlayer(id))
    }

    pub fn toggle_player(&mut self, id: PlayerId) -> Result<bool, RoundError> {
        self.ensure_not_running()?;
        self.roster.toggle(id).ok_or(RoundError::UnknownPlayer(id))
    }

    /// Charges the player for `methods` and moves the cost into the pot.
    pub fn assign_sequence(
        &mut self,
        id: PlayerId,
        methods: Vec<BettingMethod>,
        events: &mut EventBus,
    ) -> Result<i64, RoundError> {
        self.ensure_not_running()?;
        let length = self.config.sequence_length;
        let player = self
            .roster
            .get_mut(id)
            .ok_or(RoundError::UnknownPlayer(id))?;
        let cost = self.state.ledger.assign_sequence(player, methods, length)?;
        let chips = player.chips;
        let pot = self.state.ledger.pot;
        log::info!("player {id} bought a sequence for {cost} (pot {pot})");
        events.push(Event::SequenceAssigned {
            player: id,
            cost,
            chips,
            pot,
        });
        Ok(cost)
    }

    /// Asks `source` for each waiting player's sequence. Players charged
    /// before a failure keep what they bought.
    pub fn prepare(
        &mut self,
        catalog: &Catalog,
        source: &mut dyn SequenceSource,
        events: &mut EventBus,
    ) -> Result<usize, RoundError> {
        self.ensure_not_running()?;
        let length = self.config.sequence_length;
        let mut assigned = 0;
        for id in self.waiting_players() {
            for attempt in 1..=MAX_PROMPTS {
                let Some(player) = self.roster.get(id) else {
                    break;
                };
                let Some(methods) = source.request_sequence(player, catalog, length) else {
                    log::info!("player {id} sits this round out");
                    break;
                };
                match self.assign_sequence(id, methods, events) {
                    Ok(_) => {
                        assigned += 1;
                        break;
                    }
                    Err(RoundError::Ledger(err)) if attempt < MAX_PROMPTS => {
                        log::warn!("player {id}: {err}, asking again");
                    }
                    Err(RoundError::Ledger(err)) => {
                        log::warn!("player {id}: {err}, sitting this round out");
                    }
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(assigned)
    }

    /// Enabled players without a sequence of the configured length.
    pub fn waiting_players(&self) -> Vec<PlayerId> {
        let length = self.config.sequence_length;
        self.roster
            .iter()
            .filter(|player| player.enabled && !player.is_contender(length))
            .map(|player| player.id)
            .collect()
    }

    pub fn contenders(&self) -> usize {
        let length = self.config.sequence_length;
        self.roster
            .iter()
            .filter(|player| player.is_contender(length))
            .count()
    }

    pub fn start(&mut self, events: &mut EventBus) -> Result<(), RoundError> {
        if self.state.phase != Phase::Setup {
            return Err(RoundError::InvalidPhase(self.state.phase));
        }
        let contenders = self.contenders();
        if contenders == 0 {
            return Err(RoundError::NoParticipants);
        }
        self.state.phase = Phase::Running;
        let pot = self.state.ledger.pot;
        log::info!("round started with {contenders} contender(s), pot {pot}");
        events.push(Event::RoundStarted { contenders, pot });
        Ok(())
    }

    /// Cooperative cancel: the next tick sees the round is no longer running.
    pub fn stop(&mut self, events: &mut EventBus) {
        if !self.is_running() {
            return;
        }
        self.state.phase = Phase::Aborted;
        log::info!("round stopped after {} tick(s)", self.state.ticks);
        events.push(Event::RoundAborted {
            reason: "stopped".to_string(),
        });
    }

    /// Back to setup with an empty grid; balances, pot, casino and any
    /// unspent sequences carry over.
    pub fn reset(&mut self) -> Result<(), RoundError> {
        self.ensure_not_running()?;
        self.grid = GridBuffer::new(self.config.sequence_length);
        self.state.phase = Phase::Setup;
        self.state.ticks = 0;
        Ok(())
    }
}
