//! Variable-rate clock driven by a fixed host step.
//!
//! Every call to [`ScaledClock::advance`] splits the configured rate into
//! `|numerator| / host_step` full sub-steps of exactly one host step each,
//! followed by one remainder sub-step of `numerator % host_step` ticks. The
//! update callback runs once per sub-step, full steps first. No sub-step is
//! ever longer than one host step, and the sum of the deltas for one call is
//! exactly the rate numerator, so there is no drift.
//!
//! The rate used for the decomposition is read once at the top of
//! `advance`. Callbacks always observe the configured rate in
//! [`ClockSnapshot::rate`]; the per-sub-step ratio is in
//! [`ClockSnapshot::step_scale`].

use serde::{Deserialize, Serialize};

use super::rate::{Rate, RateSign};
use super::{HostFrame, Ticks, ticks_to_seconds};

/// State handed to the update callback for one sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    /// Simulation time since the clock started, including this sub-step.
    pub elapsed_total: Ticks,
    /// Signed ticks simulated by this sub-step.
    pub delta: Ticks,
    /// Host frame flag: the fixed-step loop is running behind.
    pub host_is_lagging: bool,
    /// Ticks reported by the host for the frame being processed.
    pub host_delta: Ticks,
    /// The clock's configured rate.
    pub rate: Rate,
    /// `delta / host_step`; `±1.0` for full sub-steps.
    pub step_scale: f32,
    /// Zero-based index of this sub-step within the current `advance`.
    pub substep: u64,
    /// Number of sub-steps the current `advance` runs.
    pub substep_count: u64,
}

impl ClockSnapshot {
    /// A snapshot for a clock that has not run yet.
    pub fn idle(rate: Rate) -> Self {
        ClockSnapshot {
            elapsed_total: 0,
            delta: 0,
            host_is_lagging: false,
            host_delta: 0,
            rate,
            step_scale: 0.0,
            substep: 0,
            substep_count: 0,
        }
    }

    pub fn sign(&self) -> RateSign {
        RateSign::of(self.delta)
    }

    pub fn delta_seconds(&self) -> f32 {
        ticks_to_seconds(self.delta) as f32
    }

    pub fn elapsed_seconds(&self) -> f64 {
        ticks_to_seconds(self.elapsed_total)
    }

    pub fn is_last_substep(&self) -> bool {
        self.substep + 1 == self.substep_count
    }
}

/// How one `advance` call will be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    /// Number of full sub-steps.
    pub steps: u64,
    /// Signed delta of each full sub-step (`±host_step`).
    pub step_delta: Ticks,
    /// Signed delta of the trailing partial sub-step, or zero if none.
    pub remainder: Ticks,
}

impl StepPlan {
    fn new(numerator: Ticks, host_step: Ticks) -> Self {
        let steps = (numerator / host_step).unsigned_abs();
        let step_delta = if numerator < 0 { -host_step } else { host_step };
        StepPlan {
            steps,
            step_delta,
            remainder: numerator % host_step,
        }
    }

    /// Total callback invocations.
    pub fn substep_count(&self) -> u64 {
        self.steps + u64::from(self.remainder != 0)
    }

    /// Sum of all sub-step deltas; always equals the rate numerator.
    pub fn total(&self) -> Ticks {
        let total = i128::from(self.steps) * i128::from(self.step_delta) + i128::from(self.remainder);
        Ticks::try_from(total).unwrap_or(if total < 0 { Ticks::MIN } else { Ticks::MAX })
    }
}

/// Callback invoked once per sub-step.
pub type UpdateCallback<Ctx> = Box<dyn FnMut(&mut Ctx, &ClockSnapshot)>;

/// A timeline whose simulation rate is independent of the host frame rate.
///
/// `Ctx` is whatever the update callback needs mutable access to (an ECS
/// world, a game struct); it is borrowed only for the duration of
/// [`advance`](Self::advance).
pub struct ScaledClock<Ctx: ?Sized = ()> {
    host_step: Ticks,
    rate: Rate,
    elapsed_total: Ticks,
    host_is_lagging: bool,
    update: UpdateCallback<Ctx>,
}

impl<Ctx: ?Sized> ScaledClock<Ctx> {
    /// Create a clock for `host_step` ticks per host frame.
    ///
    /// A non-positive `host_step` is replaced by one tick.
    pub fn new(
        host_step: Ticks,
        initial_rate: f64,
        update: impl FnMut(&mut Ctx, &ClockSnapshot) + 'static,
    ) -> Self {
        let host_step = if host_step > 0 {
            host_step
        } else {
            log::warn!("host step of {host_step} ticks is not positive; using 1 tick");
            1
        };
        ScaledClock {
            host_step,
            rate: Rate::from_ratio(host_step, initial_rate),
            elapsed_total: 0,
            host_is_lagging: false,
            update: Box::new(update),
        }
    }

    pub fn host_step(&self) -> Ticks {
        self.host_step
    }

    /// The configured rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// The configured rate as a decimal ratio.
    pub fn configured_rate(&self) -> f64 {
        self.rate.as_f64()
    }

    pub fn elapsed_total(&self) -> Ticks {
        self.elapsed_total
    }

    /// Lag flag of the last host frame processed.
    pub fn is_lagging(&self) -> bool {
        self.host_is_lagging
    }

    /// Set the rate from a decimal ratio (negative reverses, zero freezes).
    pub fn set_rate(&mut self, ratio: f64) {
        self.rate = Rate::from_ratio(self.host_step, ratio);
    }

    /// Set the rate from an exact fraction.
    pub fn set_rate_fraction(&mut self, num: i64, den: i64) {
        self.rate = Rate::from_fraction(self.host_step, num, den);
    }

    /// Replace the rate, rescaling it if it was built for another host step.
    pub fn set_rate_exact(&mut self, rate: Rate) {
        self.rate = if rate.denominator() == self.host_step {
            rate
        } else {
            Rate::from_fraction(self.host_step, rate.numerator(), rate.denominator())
        };
    }

    /// The split the next `advance` will use at the current rate.
    pub fn plan(&self) -> StepPlan {
        StepPlan::new(self.rate.numerator(), self.host_step)
    }

    /// Zero the accumulated simulation time.
    pub fn reset(&mut self) {
        self.elapsed_total = 0;
    }

    /// Process one host frame, invoking the update callback once per
    /// sub-step. Returns the number of sub-steps run.
    pub fn advance(&mut self, ctx: &mut Ctx, host_delta: Ticks, host_is_lagging: bool) -> u64 {
        let rate = self.rate;
        let plan = self.plan();
        let count = plan.substep_count();
        self.host_is_lagging = host_is_lagging;

        log::trace!(
            "advance: rate {} -> {} x {} + {} (host delta {})",
            rate,
            plan.steps,
            plan.step_delta,
            plan.remainder,
            host_delta
        );

        for substep in 0..plan.steps {
            self.run_substep(ctx, rate, plan.step_delta, host_delta, substep, count);
        }
        if plan.remainder != 0 {
            self.run_substep(ctx, rate, plan.remainder, host_delta, plan.steps, count);
        }
        count
    }

    /// [`advance`](Self::advance) with the arguments packed in a [`HostFrame`].
    pub fn advance_frame(&mut self, ctx: &mut Ctx, frame: HostFrame) -> u64 {
        self.advance(ctx, frame.delta, frame.is_lagging)
    }

    fn run_substep(
        &mut self,
        ctx: &mut Ctx,
        rate: Rate,
        delta: Ticks,
        host_delta: Ticks,
        substep: u64,
        substep_count: u64,
    ) {
        self.elapsed_total = self.elapsed_total.saturating_add(delta);
        let snapshot = ClockSnapshot {
            elapsed_total: self.elapsed_total,
            delta,
            host_is_lagging: self.host_is_lagging,
            host_delta,
            rate,
            step_scale: (delta as f64 / self.host_step as f64) as f32,
            substep,
            substep_count,
        };
        (self.update)(ctx, &snapshot);
    }
}

impl ScaledClock<()> {
    /// [`advance`](Self::advance) for clocks whose callback needs no context.
    pub fn tick(&mut self, host_delta: Ticks, host_is_lagging: bool) -> u64 {
        self.advance(&mut (), host_delta, host_is_lagging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: Ticks = 100;

    fn recording_clock(rate: f64) -> ScaledClock<Vec<ClockSnapshot>> {
        ScaledClock::new(HOST, rate, |log: &mut Vec<ClockSnapshot>, snap: &ClockSnapshot| {
            log.push(*snap)
        })
    }

    #[test]
    fn test_normal_rate_runs_one_full_step() {
        let mut clock = recording_clock(1.0);
        let mut log = Vec::new();
        assert_eq!(clock.advance(&mut log, HOST, false), 1);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].delta, HOST);
        assert_eq!(log[0].elapsed_total, HOST);
        assert_eq!(log[0].step_scale, 1.0);
    }

    #[test]
    fn test_fast_rate_splits_into_full_steps_and_remainder() {
        let mut clock = recording_clock(2.5);
        let mut log = Vec::new();
        assert_eq!(clock.advance(&mut log, HOST, false), 3);
        let deltas: Vec<Ticks> = log.iter().map(|s| s.delta).collect();
        assert_eq!(deltas, vec![100, 100, 50]);
        let totals: Vec<Ticks> = log.iter().map(|s| s.elapsed_total).collect();
        assert_eq!(totals, vec![100, 200, 250]);
        assert_eq!(log[2].substep, 2);
        assert!(log[2].is_last_substep());
        assert_eq!(log[2].step_scale, 0.5);
    }

    #[test]
    fn test_slow_rate_runs_only_remainder() {
        let mut clock = recording_clock(0.25);
        let mut log = Vec::new();
        clock.advance(&mut log, HOST, false);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].delta, 25);
    }

    #[test]
    fn test_negative_rate_runs_backward() {
        let mut clock = recording_clock(-1.5);
        let mut log = Vec::new();
        clock.advance(&mut log, HOST, false);
        let deltas: Vec<Ticks> = log.iter().map(|s| s.delta).collect();
        assert_eq!(deltas, vec![-100, -50]);
        assert_eq!(clock.elapsed_total(), -150);
        assert_eq!(log[0].sign(), RateSign::Backward);
        assert_eq!(log[0].step_scale, -1.0);
    }

    #[test]
    fn test_zero_rate_never_calls_back() {
        let mut clock = recording_clock(1.0);
        clock.set_rate(0.0);
        let mut log = Vec::new();
        for _ in 0..50 {
            assert_eq!(clock.advance(&mut log, HOST, false), 0);
        }
        assert!(log.is_empty());
        assert_eq!(clock.elapsed_total(), 0);
    }

    #[test]
    fn test_no_drift_over_many_frames() {
        for ratio in [-7.3, -1.0, -0.37, 0.01, 0.5, 1.0, 3.99] {
            let mut clock = recording_clock(ratio);
            let numerator = clock.rate().numerator();
            let mut log = Vec::new();
            for _ in 0..1000 {
                clock.advance(&mut log, HOST, false);
            }
            assert_eq!(clock.elapsed_total(), 1000 * numerator, "ratio {ratio}");
            assert!(log.iter().all(|s| s.delta.abs() <= HOST), "ratio {ratio}");
        }
    }

    #[test]
    fn test_callbacks_see_configured_rate() {
        let mut clock = recording_clock(2.5);
        let mut log = Vec::new();
        clock.advance(&mut log, HOST, false);
        assert!(log.iter().all(|s| s.rate.numerator() == 250));
        assert_eq!(clock.rate().numerator(), 250);
        assert_eq!(clock.configured_rate(), 2.5);
    }

    #[test]
    fn test_lagging_flag_passes_through() {
        let mut clock = recording_clock(1.0);
        let mut log = Vec::new();
        clock.advance(&mut log, HOST, true);
        assert!(log[0].host_is_lagging);
        assert!(clock.is_lagging());
        clock.advance(&mut log, HOST, false);
        assert!(!log[1].host_is_lagging);
    }

    #[test]
    fn test_set_rate_round_trip() {
        let mut clock: ScaledClock = ScaledClock::new(166_667, 1.0, |_: &mut (), _: &ClockSnapshot| {});
        for ratio in [0.5, 0.333, -2.75, 1e-7] {
            clock.set_rate(ratio);
            let expected = (166_667f64 * ratio).trunc() as i64;
            assert_eq!(clock.rate().numerator(), expected);
            assert_eq!(clock.configured_rate(), expected as f64 / 166_667f64);
        }
    }

    #[test]
    fn test_set_rate_exact_rescales_other_host_step() {
        let mut clock = recording_clock(1.0);
        clock.set_rate_exact(Rate::from_ratio(1_000, 0.5));
        assert_eq!(clock.rate().numerator(), 50);
        assert_eq!(clock.rate().denominator(), HOST);
    }

    #[test]
    fn test_plan() {
        let mut clock = recording_clock(-2.25);
        let plan = clock.plan();
        assert_eq!(plan.steps, 2);
        assert_eq!(plan.step_delta, -100);
        assert_eq!(plan.remainder, -25);
        assert_eq!(plan.substep_count(), 3);
        assert_eq!(plan.total(), clock.rate().numerator());
        clock.set_rate(3.0);
        assert_eq!(clock.plan().substep_count(), 3);
        assert_eq!(clock.plan().remainder, 0);
    }

    #[test]
    fn test_plan_total_at_extreme_rates() {
        let mut clock: ScaledClock = ScaledClock::new(1, 1.0, |_: &mut (), _: &ClockSnapshot| {});
        clock.set_rate_exact(Rate::from_fraction(1, Ticks::MIN, 1));
        let plan = clock.plan();
        assert_eq!(plan.steps, 1 << 63);
        assert_eq!(plan.total(), Ticks::MIN);

        clock.set_rate_exact(Rate::from_fraction(1, Ticks::MAX, 1));
        assert_eq!(clock.plan().total(), Ticks::MAX);
    }

    #[test]
    fn test_tick_without_context() {
        let mut clock: ScaledClock = ScaledClock::new(HOST, 1.0, |_: &mut (), _: &ClockSnapshot| {});
        assert_eq!(clock.tick(HOST, false), 1);
        assert_eq!(clock.elapsed_total(), HOST);
        clock.reset();
        assert_eq!(clock.elapsed_total(), 0);
    }

    #[test]
    fn test_non_positive_host_step_is_clamped() {
        let clock: ScaledClock = ScaledClock::new(0, 1.0, |_: &mut (), _: &ClockSnapshot| {});
        assert_eq!(clock.host_step(), 1);
    }
}
