/// The result of one completed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Error,
    TimeoutSuccess,
    TimeoutError,
}

impl Outcome {
    /// Maps a numeric outcome code, in declaration order, to an `Outcome`.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::Error),
            2 => Some(Self::TimeoutSuccess),
            3 => Some(Self::TimeoutError),
            _ => None,
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error | Self::TimeoutError)
    }

    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimeoutSuccess | Self::TimeoutError)
    }
}

/// Total, error and timeout counters.
///
/// `total` is never smaller than `error` or `timeout`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub total: u64,
    pub error: u64,
    pub timeout: u64,
}

impl Counts {
    #[inline]
    pub fn apply(&mut self, outcome: Outcome) {
        self.total += 1;
        if outcome.is_error() {
            self.error += 1;
        }
        if outcome.is_timeout() {
            self.timeout += 1;
        }
    }

    /// Like `apply`, but an unknown code only counts towards `total`.
    #[inline]
    pub fn apply_code(&mut self, code: u32) {
        match Outcome::from_code(code) {
            Some(outcome) => self.apply(outcome),
            None => self.total += 1,
        }
    }

    #[inline]
    pub fn subtract(&mut self, other: &Counts) {
        self.total -= other.total;
        self.error -= other.error;
        self.timeout -= other.timeout;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Fraction of outcomes that were errors, 0.0 when nothing was counted.
    #[inline]
    pub fn error_rate(&self) -> f64 {
        ratio(self.error, self.total)
    }

    /// Fraction of outcomes that timed out, 0.0 when nothing was counted.
    #[inline]
    pub fn timeout_rate(&self) -> f64 {
        ratio(self.timeout, self.total)
    }
}

impl std::ops::Add for Counts {
    type Output = Counts;

    fn add(self, rhs: Counts) -> Counts {
        Counts {
            total: self.total + rhs.total,
            error: self.error + rhs.error,
            timeout: self.timeout + rhs.timeout,
        }
    }
}

impl std::iter::Sum for Counts {
    fn sum<I: Iterator<Item = Counts>>(iter: I) -> Counts {
        iter.fold(Counts::default(), |acc, c| acc + c)
    }
}

#[inline]
fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn applied(outcome: Outcome) -> Counts {
        let mut c = Counts::default();
        c.apply(outcome);
        c
    }

    #[test]
    fn test_classification() {
        assert_eq!(
            applied(Outcome::Success),
            Counts { total: 1, error: 0, timeout: 0 }
        );
        assert_eq!(
            applied(Outcome::Error),
            Counts { total: 1, error: 1, timeout: 0 }
        );
        assert_eq!(
            applied(Outcome::TimeoutSuccess),
            Counts { total: 1, error: 0, timeout: 1 }
        );
        assert_eq!(
            applied(Outcome::TimeoutError),
            Counts { total: 1, error: 1, timeout: 1 }
        );
    }

    #[test]
    fn test_unknown_code_counts_total_only() {
        let mut c = Counts::default();
        c.apply_code(3);
        c.apply_code(42);
        c.apply_code(u32::MAX);
        assert_eq!(c, Counts { total: 3, error: 1, timeout: 1 });
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Outcome::from_code(0), Some(Outcome::Success));
        assert_eq!(Outcome::from_code(1), Some(Outcome::Error));
        assert_eq!(Outcome::from_code(2), Some(Outcome::TimeoutSuccess));
        assert_eq!(Outcome::from_code(3), Some(Outcome::TimeoutError));
        assert_eq!(Outcome::from_code(4), None);
    }

    #[test]
    fn test_subtract_and_sum() {
        let mut totals: Counts = [
            applied(Outcome::Error),
            applied(Outcome::TimeoutSuccess),
            applied(Outcome::Success),
        ]
        .into_iter()
        .sum();
        assert_eq!(totals, Counts { total: 3, error: 1, timeout: 1 });

        totals.subtract(&applied(Outcome::Error));
        assert_eq!(totals, Counts { total: 2, error: 0, timeout: 1 });
    }

    #[test]
    fn test_rates() {
        assert_eq!(Counts::default().error_rate(), 0.0);
        let c = Counts { total: 4, error: 1, timeout: 2 };
        assert_eq!(c.error_rate(), 0.25);
        assert_eq!(c.timeout_rate(), 0.5);
        assert!(!c.is_empty());
    }
}
