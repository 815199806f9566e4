use std::time::Duration;

/// Identifies one scheduled firing. Only the most recent token is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token(u64);

/// Delay-and-coalesce for a value that changes in bursts.
///
/// `schedule` stores the latest value and hands back a fresh token; the
/// caller arranges for `fire(token)` to be called after `delay`. Any
/// earlier token is dead by then, so only the last value in a burst is
/// ever released.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, value: T) -> Token {
        self.generation += 1;
        self.pending = Some(value);
        Token(self.generation)
    }

    /// Drop the pending value and invalidate every outstanding token.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending value if `token` is still the live one.
    pub fn fire(&mut self, token: Token) -> Option<T> {
        if token.0 != self.generation {
            return None;
        }
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_latest_value_wins() {
        let mut d = Debouncer::new(Duration::from_millis(300));
        let first = d.schedule("chess");
        let second = d.schedule("chess2");

        assert_eq!(d.fire(first), None);
        assert_eq!(d.fire(second), Some("chess2"));
        assert_eq!(d.fire(second), None);
    }

    #[test]
    fn test_cancel_invalidates_token() {
        let mut d = Debouncer::new(Duration::from_millis(300));
        let token = d.schedule(1);
        d.cancel();
        assert!(!d.is_pending());
        assert_eq!(d.fire(token), None);
    }

    proptest! {
        #[test]
        fn only_last_token_releases(values in proptest::collection::vec(any::<u8>(), 1..20)) {
            let mut d = Debouncer::new(Duration::from_millis(300));
            let tokens: Vec<Token> = values.iter().map(|v| d.schedule(*v)).collect();

            let released: Vec<u8> = tokens.iter().filter_map(|t| d.fire(*t)).collect();
            prop_assert_eq!(released, vec![*values.last().unwrap()]);
        }
    }
}
