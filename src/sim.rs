use std::vec::Vec;

use nalgebra as na;

use crate::pid::PidController;

/// A process driven by the controller output once per sample.
pub trait Plant {
    /// The measured process value fed back to the controller
    fn output(&self) -> f64;

    /// Advances the plant by one sample of length `dt` under constant `control`
    fn step(&mut self, control: f64, dt: f64);
}

/// Position that moves by exactly the control output every sample, regardless of `dt`.
pub struct IntegratingPlant {
    pub position: f64,
}

impl Plant for IntegratingPlant {
    fn output(&self) -> f64 {
        self.position
    }

    fn step(&mut self, control: f64, _dt: f64) {
        self.position += control;
    }
}

/// Second-order system with unity DC gain.
pub struct MassSpringDamper {
    pub natural_frequency: f64,
    pub damping_ratio: f64,
}

impl MassSpringDamper {
    /// Implements the state-space realization of the mass-spring-damper system:
    /// ┌     ┐   ┌              ┐┌    ┐   ┌     ┐
    /// │ p'  │ = │  0     1     ││ p  │ + │ 0   │ u
    /// │ p'' │   │  -ωₙ²  -2ζωₙ ││ p' │   │ ωₙ² │
    /// └     ┘   └              ┘└    ┘   └     ┘
    ///     ┌      ┐┌    ┐
    /// p = │ 1  0 ││ p  │
    ///     └      ┘│ p' │
    ///             └    ┘
    pub fn f(&self, x: na::Vector2<f64>, u: f64) -> na::Vector2<f64> {
        let omega_sq = self.natural_frequency * self.natural_frequency;
        let two_zeta_omega = 2.0 * self.natural_frequency * self.damping_ratio;

        let mat_a = na::Matrix2::new(0.0, 1.0, -omega_sq, -two_zeta_omega);
        let mat_b = na::Vector2::new(0.0, omega_sq);

        mat_a * x + mat_b * u
    }

    /// Output equation: the position.
    pub fn h(&self, x: na::Vector2<f64>) -> f64 {
        x[0]
    }
}

/// A `MassSpringDamper` together with its state, integrated with RK4 between samples.
pub struct MassSpringDamperPlant {
    pub model: MassSpringDamper,
    pub state: na::Vector2<f64>,
}

impl Plant for MassSpringDamperPlant {
    fn output(&self) -> f64 {
        self.model.h(self.state)
    }

    fn step(&mut self, control: f64, dt: f64) {
        self.state = rk4_step(|x| self.model.f(x, control), self.state, dt);
    }
}

/// One classical fourth-order Runge-Kutta step of `x' = f(x)`
pub fn rk4_step<Func>(f: Func, x: na::Vector2<f64>, h: f64) -> na::Vector2<f64>
where
    Func: Fn(na::Vector2<f64>) -> na::Vector2<f64>,
{
    let k1 = f(x);
    let k2 = f(x + k1 * (h / 2.0));
    let k3 = f(x + k2 * (h / 2.0));
    let k4 = f(x + k3 * h);
    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0)
}

/// Drives `plant` toward a constant `setpoint` for `steps` samples of the controller's `dt`.
///
/// The first sample is the untouched initial plant output; every later sample is the plant
/// output after applying the control computed from the previous one.
pub fn step_response<P: Plant>(
    pid: &mut PidController<f64>,
    plant: &mut P,
    setpoint: f64,
    steps: usize,
) -> Vec<f64> {
    let dt = pid.config().dt();
    let mut trajectory = Vec::with_capacity(steps);
    if steps == 0 {
        return trajectory;
    }

    trajectory.push(plant.output());
    for _ in 1..steps {
        let control = pid.compute(setpoint, plant.output());
        plant.step(control, dt);
        trajectory.push(plant.output());
    }
    trajectory
}
