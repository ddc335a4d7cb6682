use crate::{BettingMethod, Catalog, Player};

/// Where sequences come from before a round: a terminal prompt, a TUI picker,
/// a script. `None` means the player declined and sits the round out.
pub trait SequenceSource {
    fn request_sequence(
        &mut self,
        player: &Player,
        catalog: &Catalog,
        length: usize,
    ) -> Option<Vec<BettingMethod>>;
}

/// Hands every asking player the same labels, looked up in the catalog.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    labels: Vec<String>,
}

impl FixedSequence {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

impl SequenceSource for FixedSequence {
    fn request_sequence(
        &mut self,
        _player: &Player,
        catalog: &Catalog,
        _length: usize,
    ) -> Option<Vec<BettingMethod>> {
        self.labels
            .iter()
            .map(|label| catalog.find(label).cloned())
            .collect()
    }
}
