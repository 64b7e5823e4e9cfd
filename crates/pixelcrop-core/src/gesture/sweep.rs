//! Step planning for rotation sweeps.

/// Upper bound on the number of frames in one sweep; longer sweeps use a
/// proportionally larger step.
const MAX_SWEEP_STEPS: usize = 10_000;

/// Angles visited when sweeping from one rotation to another.
///
/// Each angle is computed from the start angle and the step index rather
/// than by accumulation, and the last angle is exactly the target.
#[derive(Debug, Clone)]
pub(crate) struct RotationSweep {
    from: f64,
    span: f64,
    step: f64,
    steps: usize,
    next: usize,
}

impl RotationSweep {
    /// `step` must be positive.
    pub(crate) fn new(from: f64, to: f64, step: f64) -> Self {
        let span = to - from;
        // Slack keeps float noise from adding a vanishing extra step.
        let mut steps = (span.abs() / step - 1e-9).ceil().max(0.0) as usize;
        if steps == 0 && span != 0.0 {
            steps = 1;
        }
        let mut step = step;
        if steps > MAX_SWEEP_STEPS {
            steps = MAX_SWEEP_STEPS;
            step = span.abs() / MAX_SWEEP_STEPS as f64;
        }
        Self {
            from,
            span,
            step: step.copysign(span),
            steps,
            next: 1,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.steps
    }
}

impl Iterator for RotationSweep {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next > self.steps {
            return None;
        }
        let i = self.next;
        self.next += 1;
        if i == self.steps {
            Some(self.from + self.span)
        } else {
            Some(self.from + self.step * i as f64)
        }
    }
}
