//! Capture budget enforcement, independent of visual change.

/// Outcome of asking for capture permission at a given video time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permit {
    Granted,
    /// The current minute's bucket is full; later minutes may capture.
    MinuteExhausted,
    /// The total budget is spent. Terminal: the sampler stops entirely.
    BudgetExhausted,
}

/// Tracks captures per elapsed-minute bucket plus a running total.
/// Buckets reset at minute boundaries, not via a sliding window.
pub struct RateController {
    minute_cap: u32,
    total_cap: u32,
    current_minute: u64,
    minute_count: u32,
    total: u32,
}

impl RateController {
    pub fn new(minute_cap: u32, total_cap: u32) -> Self {
        Self {
            minute_cap,
            total_cap,
            current_minute: 0,
            minute_count: 0,
            total: 0,
        }
    }

    /// Profile switches replace the per-minute cap mid-run.
    pub fn set_minute_cap(&mut self, cap: u32) {
        self.minute_cap = cap;
    }

    fn roll_minute(&mut self, timestamp: f64) {
        let minute = (timestamp.max(0.0) / 60.0) as u64;
        if minute != self.current_minute {
            self.current_minute = minute;
            self.minute_count = 0;
        }
    }

    pub fn permit(&mut self, timestamp: f64) -> Permit {
        if self.total >= self.total_cap {
            return Permit::BudgetExhausted;
        }
        self.roll_minute(timestamp);
        if self.minute_count >= self.minute_cap {
            Permit::MinuteExhausted
        } else {
            Permit::Granted
        }
    }

    /// Record an actual capture at `timestamp`.
    pub fn record(&mut self, timestamp: f64) {
        self.roll_minute(timestamp);
        self.minute_count += 1;
        self.total += 1;
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minute_cap_enforced() {
        let mut rate = RateController::new(3, 100);

        for i in 0..3 {
            let t = i as f64;
            assert_eq!(rate.permit(t), Permit::Granted);
            rate.record(t);
        }
        assert_eq!(rate.permit(10.0), Permit::MinuteExhausted);
    }

    #[test]
    fn test_bucket_resets_at_minute_boundary() {
        let mut rate = RateController::new(1, 100);

        assert_eq!(rate.permit(5.0), Permit::Granted);
        rate.record(5.0);
        assert_eq!(rate.permit(59.9), Permit::MinuteExhausted);
        assert_eq!(rate.permit(60.0), Permit::Granted);
    }

    #[test]
    fn test_total_budget_terminal() {
        let mut rate = RateController::new(10, 2);

        rate.record(0.0);
        rate.record(61.0);
        assert_eq!(rate.permit(122.0), Permit::BudgetExhausted);
        // stays terminal even in a fresh minute
        assert_eq!(rate.permit(300.0), Permit::BudgetExhausted);
    }

    #[test]
    fn test_cap_change_applies_to_current_minute() {
        let mut rate = RateController::new(1, 100);
        rate.record(0.0);
        assert_eq!(rate.permit(1.0), Permit::MinuteExhausted);

        rate.set_minute_cap(5);
        assert_eq!(rate.permit(1.0), Permit::Granted);
    }
}
