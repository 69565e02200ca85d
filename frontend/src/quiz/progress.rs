/// Milliseconds the progress bar takes to glide between two values.
pub const PROGRESS_TWEEN_MS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStep {
    pub start: u8,
    pub end: u8,
}

/// Percentage shown while `index` is the current step of `total`.
pub fn percent(index: usize, total: usize) -> u8 {
    let total = total.max(1);
    let raw = (100.0 * (index as f64 + 1.0) / total as f64).round();
    raw.clamp(0.0, 100.0) as u8
}

/// One entry per step, computed once when the quiz is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressTable {
    steps: Vec<ProgressStep>,
}

impl ProgressTable {
    pub fn new(total: usize) -> Self {
        let mut steps = Vec::with_capacity(total);
        let mut start = 0;
        for index in 0..total {
            let end = if index + 1 == total {
                100
            } else {
                percent(index, total)
            };
            steps.push(ProgressStep { start, end });
            start = end;
        }
        Self { steps }
    }

    pub fn get(&self, index: usize) -> Option<ProgressStep> {
        self.steps.get(index).copied()
    }

    /// Target percentage for `index`; out-of-range indexes read as the nearest end.
    pub fn end_for(&self, index: usize) -> u8 {
        match self.steps.get(index) {
            Some(step) => step.end,
            None if self.steps.is_empty() => 0,
            None => 100,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Eased interpolation between the displayed and the target percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressTween {
    pub from: u8,
    pub to: u8,
    pub duration_ms: f64,
}

impl ProgressTween {
    pub fn new(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            duration_ms: PROGRESS_TWEEN_MS,
        }
    }

    pub fn value_at(&self, elapsed_ms: f64) -> u8 {
        if self.duration_ms <= 0.0 {
            return self.to;
        }
        let eased = ease_in_out_quad(elapsed_ms / self.duration_ms);
        let from = self.from as f64;
        let to = self.to as f64;
        (from + (to - from) * eased).round().clamp(0.0, 100.0) as u8
    }

    pub fn is_done(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}
