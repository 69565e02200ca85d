/// Pause between showing the confirmation and starting the countdown.
pub const COUNTDOWN_START_DELAY_MS: u32 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPlan {
    pub url: String,
    pub delay_ms: u32,
}

impl RedirectPlan {
    pub fn new(base_url: &str, problem: Option<&str>, delay_ms: u32) -> Self {
        let problem = problem
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or("unknown");
        let separator = if base_url.contains('?') { '&' } else { '?' };
        Self {
            url: format!(
                "{}{}problem={}",
                base_url,
                separator,
                urlencoding::encode(problem)
            ),
            delay_ms: if delay_ms == 0 { 3000 } else { delay_ms },
        }
    }

    /// Interval between two percent ticks of the countdown bar.
    pub fn tick_ms(&self) -> u32 {
        (self.delay_ms / 100).max(1)
    }
}

/// Confirmation bar that fills one percent per tick before leaving the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedirectCountdown {
    percent: u8,
}

impl RedirectCountdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Advances one percent; true once the bar is full.
    pub fn tick(&mut self) -> bool {
        if self.percent < 100 {
            self.percent += 1;
        }
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.percent >= 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_problem_into_redirect() {
        let plan = RedirectPlan::new("/pages/quiz", Some("teeth & gums"), 3000);
        assert_eq!(plan.url, "/pages/quiz?problem=teeth%20%26%20gums");
        assert_eq!(plan.tick_ms(), 30);
    }

    #[test]
    fn unknown_problem_and_existing_query() {
        let plan = RedirectPlan::new("/results?lang=en", None, 0);
        assert_eq!(plan.url, "/results?lang=en&problem=unknown");
        assert_eq!(plan.delay_ms, 3000);
    }

    #[test]
    fn countdown_finishes_after_one_hundred_ticks() {
        let mut countdown = RedirectCountdown::new();
        for _ in 0..99 {
            assert!(!countdown.tick());
        }
        assert!(countdown.tick());
        assert!(countdown.tick());
        assert_eq!(countdown.percent(), 100);
    }
}
