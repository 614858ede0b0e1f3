use core::fmt::{self, Debug, Display};
use core::str::FromStr;

use num_traits::float::FloatCore;

/// Errors raised when a PID configuration value is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum PidConfigError {
    /// The proportional gain is NaN or infinite.
    #[cfg_attr(feature = "std", error("proportional gain must be finite"))]
    InvalidProportionalGain,

    /// The integral gain is NaN or infinite.
    #[cfg_attr(feature = "std", error("integral gain must be finite"))]
    InvalidIntegralGain,

    /// The derivative gain is NaN or infinite.
    #[cfg_attr(feature = "std", error("derivative gain must be finite"))]
    InvalidDerivativeGain,

    /// The sample interval is zero, negative or not finite.
    #[cfg_attr(feature = "std", error("sample interval must be finite and positive"))]
    InvalidSampleTime,

    /// The integral limits are NaN or the lower limit exceeds the upper limit.
    #[cfg_attr(
        feature = "std",
        error("integral limits must not be NaN and the minimum must not exceed the maximum")
    )]
    InvalidIntegralLimits,

    /// The output limits are NaN or the lower limit exceeds the upper limit.
    #[cfg_attr(
        feature = "std",
        error("output limits must not be NaN and the minimum must not exceed the maximum")
    )]
    InvalidOutputLimits,

    /// A topology name did not match `parallel`, `ideal` or `direct`.
    #[cfg_attr(feature = "std", error("unknown summation topology"))]
    UnknownTopology,

    /// A proportional mode name was not recognized.
    #[cfg_attr(feature = "std", error("unknown proportional mode"))]
    UnknownProportionalMode,

    /// An integral mode name was not recognized.
    #[cfg_attr(feature = "std", error("unknown integral mode"))]
    UnknownIntegralMode,

    /// A derivative mode name was not recognized.
    #[cfg_attr(feature = "std", error("unknown derivative mode"))]
    UnknownDerivativeMode,
}

/// How the proportional, integral and derivative terms are combined into the raw output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// `u = kp * p + ki * i + kd * d`
    #[default]
    Parallel,

    /// `u = kp * (p + ki * i + kd * d)`
    Ideal,

    /// Velocity-style recurrence over the current error and the two previous errors:
    ///
    /// `u = (kp + ki + kd) * e[k] + (-kp - 2 kd) * e[k-1] * dt + kd * e[k-2] / dt`
    ///
    /// The `dt` scaling of the last two terms is deliberately asymmetric; it does not match the
    /// other two topologies dimensionally and changing it changes the closed-loop response.
    Direct,
}

/// Signal the proportional term acts on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ProportionalMode {
    /// `p = setpoint - measured`
    #[default]
    OnError,

    /// `p = -measured`, so setpoint changes do not kick the output.
    OnMeasurement,
}

/// Discretization of the integral term.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IntegralMode {
    /// Accumulates the current error.
    #[default]
    Backward,

    /// Accumulates the previous error; the integrator is strictly causal.
    Forward,

    /// Accumulates the mean of the current and previous error.
    Trapezoidal,
}

/// Signal the derivative term is taken on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DerivativeMode {
    /// Backward difference of the error.
    #[default]
    OnError,

    /// NEGATIVE backward difference of the measurement, which mitigates derivative kick.
    OnMeasurement,
}

impl Topology {
    /// Canonical name, as accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::Parallel => "parallel",
            Topology::Ideal => "ideal",
            Topology::Direct => "direct",
        }
    }
}

impl ProportionalMode {
    /// Canonical name, as accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            ProportionalMode::OnError => "on_error",
            ProportionalMode::OnMeasurement => "on_measurement",
        }
    }
}

impl IntegralMode {
    /// Canonical name, as accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegralMode::Backward => "backward",
            IntegralMode::Forward => "forward",
            IntegralMode::Trapezoidal => "trapezoidal",
        }
    }
}

impl DerivativeMode {
    /// Canonical name, as accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            DerivativeMode::OnError => "on_error",
            DerivativeMode::OnMeasurement => "on_measurement",
        }
    }
}

impl FromStr for Topology {
    type Err = PidConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parallel" => Ok(Topology::Parallel),
            "ideal" => Ok(Topology::Ideal),
            "direct" => Ok(Topology::Direct),
            _ => Err(PidConfigError::UnknownTopology),
        }
    }
}

impl FromStr for ProportionalMode {
    type Err = PidConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" | "on_error" => Ok(ProportionalMode::OnError),
            "measured" | "on_measurement" => Ok(ProportionalMode::OnMeasurement),
            _ => Err(PidConfigError::UnknownProportionalMode),
        }
    }
}

impl FromStr for IntegralMode {
    type Err = PidConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backward" => Ok(IntegralMode::Backward),
            "forward" => Ok(IntegralMode::Forward),
            "trapezoidal" => Ok(IntegralMode::Trapezoidal),
            _ => Err(PidConfigError::UnknownIntegralMode),
        }
    }
}

impl FromStr for DerivativeMode {
    type Err = PidConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" | "on_error" => Ok(DerivativeMode::OnError),
            "measured" | "on_measurement" => Ok(DerivativeMode::OnMeasurement),
            _ => Err(PidConfigError::UnknownDerivativeMode),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(Topology, ProportionalMode, IntegralMode, DerivativeMode);

fn from_f64<F: FloatCore>(value: f64) -> F {
    num_traits::cast(value).unwrap_or_else(F::nan)
}

// A NaN value lands on `lo`, so the bounds hold even when the arithmetic overflows.
fn clamp<F: FloatCore>(value: F, lo: F, hi: F) -> F {
    value.max(lo).min(hi)
}

fn ensure(valid: bool, err: PidConfigError) -> Result<(), PidConfigError> {
    if valid {
        Ok(())
    } else {
        log::warn!("Rejected PID configuration: {:?}", err);
        Err(err)
    }
}

fn validate_limits<F: FloatCore>(
    min: F,
    max: F,
    err: PidConfigError,
) -> Result<(), PidConfigError> {
    ensure(!min.is_nan() && !max.is_nan() && min <= max, err)
}

/// Gains, sample interval, variant selection and limits of a PID controller.
///
/// Construct with `PidConfig::default()` or through [`PidConfigBuilder`]; every setter validates
/// its input so a `PidConfig` is always usable by `compute`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidConfig<F: FloatCore> {
    /// Proportional gain coefficient.
    /// Defaults to 1.0.
    kp: F,

    /// Integral gain coefficient, applied to the accumulated (already `dt`-weighted) integral.
    /// Defaults to 1/6.
    ki: F,

    /// Derivative gain coefficient.
    /// Defaults to 0.0.
    kd: F,

    /// Fixed sample interval.
    /// Defaults to 0.1.
    dt: F,

    topology: Topology,
    proportional_mode: ProportionalMode,
    integral_mode: IntegralMode,
    derivative_mode: DerivativeMode,

    /// Bounds on the integral accumulator for anti-windup.
    /// Default to (-inf, inf), i.e. no limit.
    integral_min: F,
    integral_max: F,

    /// Bounds on the returned output.
    /// Default to (-inf, inf), i.e. no limit.
    output_min: F,
    output_max: F,
}

impl<F: FloatCore> Default for PidConfig<F> {
    fn default() -> Self {
        PidConfig {
            kp: F::one(),
            ki: from_f64(1.0 / 6.0),
            kd: F::zero(),
            dt: from_f64(0.1),
            topology: Topology::default(),
            proportional_mode: ProportionalMode::default(),
            integral_mode: IntegralMode::default(),
            derivative_mode: DerivativeMode::default(),
            integral_min: F::neg_infinity(),
            integral_max: F::infinity(),
            output_min: F::neg_infinity(),
            output_max: F::infinity(),
        }
    }
}

impl<F: FloatCore + Debug> PidConfig<F> {
    /// Starts a builder seeded with the default configuration.
    pub fn builder() -> PidConfigBuilder<F> {
        PidConfigBuilder::default()
    }

    /// Returns the proportional gain.
    pub fn kp(&self) -> F {
        self.kp
    }

    /// Returns the integral gain.
    pub fn ki(&self) -> F {
        self.ki
    }

    /// Returns the derivative gain.
    pub fn kd(&self) -> F {
        self.kd
    }

    /// Convenience method that returns the proportional, integral, and derivative gains together as a tuple.
    pub fn gains(&self) -> (F, F, F) {
        (self.kp, self.ki, self.kd)
    }

    /// Returns the sample interval.
    pub fn dt(&self) -> F {
        self.dt
    }

    /// Returns the summation topology.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Returns the signal the proportional term acts on.
    pub fn proportional_mode(&self) -> ProportionalMode {
        self.proportional_mode
    }

    /// Returns the integral discretization.
    pub fn integral_mode(&self) -> IntegralMode {
        self.integral_mode
    }

    /// Returns the signal the derivative term is taken on.
    pub fn derivative_mode(&self) -> DerivativeMode {
        self.derivative_mode
    }

    /// Returns the lower bound of the integral accumulator.
    pub fn integral_min(&self) -> F {
        self.integral_min
    }

    /// Returns the upper bound of the integral accumulator.
    pub fn integral_max(&self) -> F {
        self.integral_max
    }

    /// Returns the minimum output limit.
    pub fn output_min(&self) -> F {
        self.output_min
    }

    /// Returns the maximum output limit.
    pub fn output_max(&self) -> F {
        self.output_max
    }

    /// Human-readable identifier built from the gains and the sample interval, e.g.
    /// `1.00-0.17-0.000-0.10` for the default configuration.
    pub fn label(&self) -> PidLabel<'_, F> {
        PidLabel(self)
    }

    /// Sets the proportional gain.
    ///
    /// Any finite value is accepted, including zero and negative gains.
    ///
    /// # Errors
    /// - `PidConfigError::InvalidProportionalGain` if `kp` is NaN or infinite. The gain is left
    ///   unchanged.
    pub fn set_kp(&mut self, kp: F) -> Result<(), PidConfigError> {
        ensure(kp.is_finite(), PidConfigError::InvalidProportionalGain)?;
        self.kp = kp;
        Ok(())
    }

    /// Sets the integral gain.
    ///
    /// # Errors
    /// - `PidConfigError::InvalidIntegralGain` if `ki` is NaN or infinite.
    pub fn set_ki(&mut self, ki: F) -> Result<(), PidConfigError> {
        ensure(ki.is_finite(), PidConfigError::InvalidIntegralGain)?;
        self.ki = ki;
        Ok(())
    }

    /// Sets the derivative gain.
    ///
    /// # Errors
    /// - `PidConfigError::InvalidDerivativeGain` if `kd` is NaN or infinite.
    pub fn set_kd(&mut self, kd: F) -> Result<(), PidConfigError> {
        ensure(kd.is_finite(), PidConfigError::InvalidDerivativeGain)?;
        self.kd = kd;
        Ok(())
    }

    /// Convenience method to set the proportional, integral, and derivative gains together.
    ///
    /// All three gains are validated before any of them is written.
    pub fn set_gains(&mut self, kp: F, ki: F, kd: F) -> Result<(), PidConfigError> {
        ensure(kp.is_finite(), PidConfigError::InvalidProportionalGain)?;
        ensure(ki.is_finite(), PidConfigError::InvalidIntegralGain)?;
        ensure(kd.is_finite(), PidConfigError::InvalidDerivativeGain)?;
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
        Ok(())
    }

    /// Sets the sample interval. Unlike a time-scaled controller, the gains are NOT rescaled.
    ///
    /// # Errors
    /// - `PidConfigError::InvalidSampleTime` if `dt` is not strictly positive or not finite.
    pub fn set_dt(&mut self, dt: F) -> Result<(), PidConfigError> {
        ensure(dt.is_finite() && dt > F::zero(), PidConfigError::InvalidSampleTime)?;
        self.dt = dt;
        Ok(())
    }

    /// Sets the bounds of the integral accumulator. Infinite bounds disable clamping and equal
    /// bounds pin the accumulator.
    ///
    /// # Errors
    /// - `PidConfigError::InvalidIntegralLimits` if either bound is NaN or `integral_min` exceeds
    ///   `integral_max`.
    pub fn set_integral_limits(
        &mut self,
        integral_min: F,
        integral_max: F,
    ) -> Result<(), PidConfigError> {
        validate_limits(
            integral_min,
            integral_max,
            PidConfigError::InvalidIntegralLimits,
        )?;
        self.integral_min = integral_min;
        self.integral_max = integral_max;
        Ok(())
    }

    /// Sets the minimum and maximum output limits.
    ///
    /// # Errors
    /// - `PidConfigError::InvalidOutputLimits` if either bound is NaN or `output_min` exceeds
    ///   `output_max`.
    pub fn set_output_limits(&mut self, output_min: F, output_max: F) -> Result<(), PidConfigError> {
        validate_limits(output_min, output_max, PidConfigError::InvalidOutputLimits)?;
        self.output_min = output_min;
        self.output_max = output_max;
        Ok(())
    }

    /// Sets the summation topology.
    pub fn set_topology(&mut self, topology: Topology) {
        self.topology = topology;
    }

    /// Sets the signal the proportional term acts on.
    pub fn set_proportional_mode(&mut self, proportional_mode: ProportionalMode) {
        self.proportional_mode = proportional_mode;
    }

    /// Sets the integral discretization.
    pub fn set_integral_mode(&mut self, integral_mode: IntegralMode) {
        self.integral_mode = integral_mode;
    }

    /// Sets the signal the derivative term is taken on.
    pub fn set_derivative_mode(&mut self, derivative_mode: DerivativeMode) {
        self.derivative_mode = derivative_mode;
    }

    fn validate(&self) -> Result<(), PidConfigError> {
        ensure(self.kp.is_finite(), PidConfigError::InvalidProportionalGain)?;
        ensure(self.ki.is_finite(), PidConfigError::InvalidIntegralGain)?;
        ensure(self.kd.is_finite(), PidConfigError::InvalidDerivativeGain)?;
        ensure(
            self.dt.is_finite() && self.dt > F::zero(),
            PidConfigError::InvalidSampleTime,
        )?;
        validate_limits(
            self.integral_min,
            self.integral_max,
            PidConfigError::InvalidIntegralLimits,
        )?;
        validate_limits(
            self.output_min,
            self.output_max,
            PidConfigError::InvalidOutputLimits,
        )
    }
}

/// Display adapter returned by [`PidConfig::label`].
pub struct PidLabel<'a, F: FloatCore>(&'a PidConfig<F>);

impl<F: FloatCore + Display> Display for PidLabel<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cfg = self.0;
        write!(
            f,
            "{:.2}-{:.2}-{:.3}-{:.2}",
            cfg.kp, cfg.ki, cfg.kd, cfg.dt
        )
    }
}

impl<F: FloatCore + Display> Display for PidConfig<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "k_p={} k_i={} k_d={} dt={} topology={} proportional_mode={} integral_mode={} \
             derivative_mode={} integral_min={} integral_max={} output_min={} output_max={}",
            self.kp,
            self.ki,
            self.kd,
            self.dt,
            self.topology,
            self.proportional_mode,
            self.integral_mode,
            self.derivative_mode,
            self.integral_min,
            self.integral_max,
            self.output_min,
            self.output_max
        )
    }
}

/// Builder for [`PidConfig`] that defers validation to [`PidConfigBuilder::build`].
///
/// Unset fields take the values of `PidConfig::default()`.
#[derive(Copy, Clone, Debug)]
pub struct PidConfigBuilder<F: FloatCore> {
    config: PidConfig<F>,
}

impl<F: FloatCore> Default for PidConfigBuilder<F> {
    fn default() -> Self {
        PidConfigBuilder {
            config: PidConfig::default(),
        }
    }
}

impl<F: FloatCore + Debug> PidConfigBuilder<F> {
    /// Sets the proportional gain.
    pub fn kp(mut self, kp: F) -> Self {
        self.config.kp = kp;
        self
    }

    /// Sets the integral gain.
    pub fn ki(mut self, ki: F) -> Self {
        self.config.ki = ki;
        self
    }

    /// Sets the derivative gain.
    pub fn kd(mut self, kd: F) -> Self {
        self.config.kd = kd;
        self
    }

    /// Sets the sample interval.
    pub fn dt(mut self, dt: F) -> Self {
        self.config.dt = dt;
        self
    }

    /// Sets the summation topology.
    pub fn topology(mut self, topology: Topology) -> Self {
        self.config.topology = topology;
        self
    }

    /// Sets the signal the proportional term acts on.
    pub fn proportional_mode(mut self, proportional_mode: ProportionalMode) -> Self {
        self.config.proportional_mode = proportional_mode;
        self
    }

    /// Sets the integral discretization.
    pub fn integral_mode(mut self, integral_mode: IntegralMode) -> Self {
        self.config.integral_mode = integral_mode;
        self
    }

    /// Sets the signal the derivative term is taken on.
    pub fn derivative_mode(mut self, derivative_mode: DerivativeMode) -> Self {
        self.config.derivative_mode = derivative_mode;
        self
    }

    /// Sets the bounds of the integral accumulator.
    pub fn integral_limits(mut self, integral_min: F, integral_max: F) -> Self {
        self.config.integral_min = integral_min;
        self.config.integral_max = integral_max;
        self
    }

    /// Sets the minimum and maximum output limits.
    pub fn output_limits(mut self, output_min: F, output_max: F) -> Self {
        self.config.output_min = output_min;
        self.config.output_max = output_max;
        self
    }

    /// Validates every field and produces the configuration.
    ///
    /// # Errors
    /// The first invalid field is reported, checked in the order gains, sample interval,
    /// integral limits, output limits.
    pub fn build(self) -> Result<PidConfig<F>, PidConfigError> {
        self.config.validate()?;
        log::debug!("Built PID configuration: {:?}", self.config);
        Ok(self.config)
    }
}

/// Per-loop state of the PID controller.
///
/// Every field starts at zero and is advanced once per `compute`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidContext<F: FloatCore> {
    integral: F,
    prev_measurement: F,
    prev_error: F,
    prev_prev_error: F,
}

impl<F: FloatCore> Default for PidContext<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FloatCore> PidContext<F> {
    /// Creates a zeroed context, equivalent to a context that was just `reset`.
    pub fn new() -> Self {
        Self {
            integral: F::zero(),
            prev_measurement: F::zero(),
            prev_error: F::zero(),
            prev_prev_error: F::zero(),
        }
    }

    /// The clamped integral accumulator.
    pub fn integral(&self) -> F {
        self.integral
    }

    /// The measurement seen by the previous step.
    pub fn prev_measurement(&self) -> F {
        self.prev_measurement
    }

    /// The error of the previous step.
    pub fn prev_error(&self) -> F {
        self.prev_error
    }

    /// The error of the step before the previous one.
    pub fn prev_prev_error(&self) -> F {
        self.prev_prev_error
    }

    /// Clears the loop state. Idempotent.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<F: FloatCore + Display> Display for PidContext<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "integral={} prev_measurement={} prev_error={} prev_prev_error={}",
            self.integral, self.prev_measurement, self.prev_error, self.prev_prev_error
        )
    }
}

/// A functional implementation of a PID (Proportional-Integral-Derivative) controller.
///
/// This implementation is stateless so a context object must be passed in and returned with each
/// call to `compute`.
#[derive(Copy, Clone, Debug)]
pub struct FuncPidController<F: FloatCore> {
    config: PidConfig<F>,
}

/// A stateful implementation of a PID (Proportional-Integral-Derivative) controller.
///
/// This implementation maintains its own `PidContext`, so it can be used without passing a
/// context object. One instance serves exactly one control loop.
#[derive(Copy, Clone, Debug)]
pub struct PidController<F: FloatCore> {
    ctx: PidContext<F>,
    controller: FuncPidController<F>,
}

impl<F: FloatCore + Debug> FuncPidController<F> {
    /// Creates a functional controller from a validated configuration.
    pub fn new(config: PidConfig<F>) -> Self {
        FuncPidController { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PidConfig<F> {
        &self.config
    }

    /// Returns the configuration for modification.
    pub fn config_mut(&mut self) -> &mut PidConfig<F> {
        &mut self.config
    }

    /// Runs one control step.
    ///
    /// The integral accumulator is updated and clamped to the integral limits before the
    /// output is summed according to the configured topology and clamped to the output
    /// limits. The returned context always records the unclamped `measured` input and error.
    ///
    /// # Arguments
    /// - `ctx`: The loop state produced by the previous step, or a new/reset context.
    /// - `setpoint`: The target value.
    /// - `measured`: The current process value.
    ///
    /// # Returns
    /// The clamped output and the advanced context.
    pub fn compute(&self, mut ctx: PidContext<F>, setpoint: F, measured: F) -> (F, PidContext<F>) {
        let cfg = &self.config;
        let two = F::one() + F::one();

        let error = setpoint - measured;

        let p = match cfg.proportional_mode {
            ProportionalMode::OnError => error,
            ProportionalMode::OnMeasurement => -measured,
        };

        let increment = match cfg.integral_mode {
            IntegralMode::Backward => error * cfg.dt,
            IntegralMode::Forward => ctx.prev_error * cfg.dt,
            IntegralMode::Trapezoidal => ((error + ctx.prev_error) / two) * cfg.dt,
        };
        ctx.integral = clamp(
            ctx.integral + increment,
            cfg.integral_min,
            cfg.integral_max,
        );

        let d = match cfg.derivative_mode {
            DerivativeMode::OnError => (error - ctx.prev_error) / cfg.dt,
            DerivativeMode::OnMeasurement => -(measured - ctx.prev_measurement) / cfg.dt,
        };

        let output = match cfg.topology {
            Topology::Parallel => p * cfg.kp + ctx.integral * cfg.ki + d * cfg.kd,
            Topology::Ideal => cfg.kp * (p + ctx.integral * cfg.ki + d * cfg.kd),
            Topology::Direct => {
                let c1 = cfg.kp + cfg.ki + cfg.kd;
                let c2 = -cfg.kp - two * cfg.kd;
                let c3 = cfg.kd;
                c1 * error + c2 * ctx.prev_error * cfg.dt + c3 * ctx.prev_prev_error / cfg.dt
            }
        };
        let clamped_output = clamp(output, cfg.output_min, cfg.output_max);

        log::trace!(
            "PID step: error={:?} p={:?} i={:?} d={:?} output={:?} clamped={:?}",
            error,
            p,
            ctx.integral,
            d,
            output,
            clamped_output
        );

        ctx.prev_measurement = measured;
        ctx.prev_prev_error = ctx.prev_error;
        ctx.prev_error = error;
        (clamped_output, ctx)
    }
}

impl<F: FloatCore + Debug> PidController<F> {
    /// Creates a controller with zeroed loop state.
    pub fn new(config: PidConfig<F>) -> Self {
        Self {
            ctx: PidContext::new(),
            controller: FuncPidController::new(config),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PidConfig<F> {
        &self.controller.config
    }

    /// Freely change the configuration between steps; the loop state is kept.
    pub fn config_mut(&mut self) -> &mut PidConfig<F> {
        &mut self.controller.config
    }

    /// Returns the loop state.
    pub fn context(&self) -> &PidContext<F> {
        &self.ctx
    }

    /// The clamped integral accumulator.
    pub fn integral(&self) -> F {
        self.ctx.integral
    }

    /// The measurement seen by the previous step.
    pub fn prev_measurement(&self) -> F {
        self.ctx.prev_measurement
    }

    /// The error of the previous step.
    pub fn prev_error(&self) -> F {
        self.ctx.prev_error
    }

    /// The error of the step before the previous one.
    pub fn prev_prev_error(&self) -> F {
        self.ctx.prev_prev_error
    }

    /// Human-readable identifier of the configuration, see [`PidConfig::label`].
    pub fn label(&self) -> PidLabel<'_, F> {
        self.controller.config.label()
    }

    /// Runs one control step and returns the clamped output. See [`FuncPidController::compute`].
    pub fn compute(&mut self, setpoint: F, measured: F) -> F {
        let (output, ctx) = self.controller.compute(self.ctx, setpoint, measured);
        self.ctx = ctx;
        output
    }

    /// Clears the integral accumulator and the remembered measurement and errors. The
    /// configuration is untouched.
    pub fn reset(&mut self) {
        log::debug!("Resetting PID loop state");
        self.ctx.reset();
    }
}

impl<F: FloatCore + Display> Display for PidController<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = &self.controller.config;
        write!(
            f,
            "<PidController {}: {} {}>",
            PidLabel(config),
            config,
            self.ctx
        )
    }
}
