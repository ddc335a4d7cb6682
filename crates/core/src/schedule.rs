use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Shared stop flag, checked before every step.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs one step at a time with a fixed pause in between; steps never overlap.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    cancel: CancelToken,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cancel: CancelToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns the number of steps executed.
    pub fn run<F>(&self, mut step: F) -> u64
    where
        F: FnMut() -> ControlFlow<()>,
    {
        let mut steps = 0;
        while !self.cancel.is_cancelled() {
            steps += 1;
            if step().is_break() {
                break;
            }
            thread::sleep(self.interval);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_on_break() {
        let ticker = Ticker::new(Duration::ZERO);
        let mut count = 0;
        let steps = ticker.run(|| {
            count += 1;
            if count == 5 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(steps, 5);
    }

    #[test]
    fn stops_when_cancelled() {
        let ticker = Ticker::new(Duration::ZERO);
        let token = ticker.cancel_token();
        let steps = ticker.run(|| {
            token.cancel();
            ControlFlow::Continue(())
        });
        assert_eq!(steps, 1);
        assert!(ticker.cancel_token().is_cancelled());
    }
}
