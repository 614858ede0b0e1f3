// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

#[cfg(feature = "simulation")]
mod test_pid_closed_loop_performance {
    use pidloop::pid::*;
    use pidloop::sim::{self, Plant};

    use approx::assert_relative_eq;
    use nalgebra as na;

    const DT: f64 = 1.0 / 30.0;
    // 20 seconds of samples at 30Hz
    const N_SAMPLES: usize = 600;
    const INITIAL_POSITION: f64 = 30.0;
    const SETPOINT: f64 = 180.0;

    fn run_integrating_plant(config: PidConfig<f64>) -> Vec<f64> {
        let mut pid = PidController::new(config);
        let mut plant = sim::IntegratingPlant {
            position: INITIAL_POSITION,
        };
        sim::step_response(&mut pid, &mut plant, SETPOINT, N_SAMPLES)
    }

    /// The plant position advances by the controller output every sample, so the output limit
    /// bounds the slew rate and the integral limit bounds the overshoot from windup.
    #[test]
    fn test_bounded_parallel_trapezoidal_tuning() {
        let config = PidConfigBuilder::default()
            .kp(0.09)
            .ki(0.25)
            .kd(0.02)
            .dt(DT)
            .integral_mode(IntegralMode::Trapezoidal)
            .integral_limits(-8.0, 8.0)
            .output_limits(-12.0 * DT, 12.0 * DT)
            .build()
            .unwrap();

        let trajectory = run_integrating_plant(config);

        assert_eq!(trajectory.len(), N_SAMPLES);
        assert_eq!(trajectory[0], INITIAL_POSITION);
        for w in trajectory.windows(2) {
            assert!((w[1] - w[0]).abs() <= 12.0 * DT + 1e-12);
        }

        // Saturated ramp for the first 300+ samples
        assert_relative_eq!(trajectory[300], 150.0, epsilon = 1e-9);
        assert_relative_eq!(trajectory[450], 177.50199044180474, epsilon = 1e-9);
        assert_relative_eq!(trajectory[N_SAMPLES - 1], SETPOINT, epsilon = 0.05);
        assert!(trajectory.iter().cloned().fold(f64::MIN, f64::max) < SETPOINT + 10.0);
    }

    #[test]
    fn test_unbounded_dt_scaled_tuning() {
        let config = PidConfigBuilder::default()
            .kp(1.5 * DT)
            .ki(2.0 * DT)
            .kd(0.0)
            .dt(DT)
            .integral_mode(IntegralMode::Trapezoidal)
            .build()
            .unwrap();

        let trajectory = run_integrating_plant(config);

        assert_relative_eq!(trajectory[N_SAMPLES - 1], SETPOINT, epsilon = 1e-3);
    }

    #[test]
    fn test_ideal_derivative_on_measurement_tuning() {
        let config = PidConfigBuilder::default()
            .kp(0.1)
            .ki(0.3)
            .kd(0.05)
            .dt(DT)
            .topology(Topology::Ideal)
            .integral_mode(IntegralMode::Trapezoidal)
            .derivative_mode(DerivativeMode::OnMeasurement)
            .build()
            .unwrap();

        let trajectory = run_integrating_plant(config);

        assert_relative_eq!(trajectory[N_SAMPLES - 1], SETPOINT, epsilon = 0.05);
    }

    #[test]
    fn test_step_response_sample_count() {
        let mut pid = PidController::new(PidConfig::default());
        let mut plant = sim::IntegratingPlant { position: 1.0 };

        assert!(sim::step_response(&mut pid, &mut plant, 2.0, 0).is_empty());
        assert_eq!(sim::step_response(&mut pid, &mut plant, 2.0, 1), vec![1.0]);

        // Neither call computed a control step
        assert_eq!(*pid.context(), PidContext::new());
    }

    const MSD_DT: f64 = 0.01;

    fn make_msd_plant() -> sim::MassSpringDamperPlant {
        sim::MassSpringDamperPlant {
            model: sim::MassSpringDamper {
                natural_frequency: std::f64::consts::PI,
                damping_ratio: 0.2,
            },
            state: na::Vector2::zeros(),
        }
    }

    fn make_msd_config(topology: Topology, derivative_mode: DerivativeMode) -> PidConfig<f64> {
        PidConfigBuilder::default()
            .kp(2.0)
            .ki(1.0)
            .kd(0.1)
            .dt(MSD_DT)
            .topology(topology)
            .derivative_mode(derivative_mode)
            .integral_limits(-5.0, 5.0)
            .output_limits(-10.0, 10.0)
            .build()
            .unwrap()
    }

    /// Integral action removes the steady-state error of the unity-DC-gain mass-spring-damper
    #[test]
    fn test_mass_spring_damper_settles() {
        for (topology, derivative_mode) in [
            (Topology::Parallel, DerivativeMode::OnMeasurement),
            (Topology::Parallel, DerivativeMode::OnError),
            (Topology::Ideal, DerivativeMode::OnError),
        ] {
            let mut pid = PidController::new(make_msd_config(topology, derivative_mode));
            let mut plant = make_msd_plant();

            let trajectory = sim::step_response(&mut pid, &mut plant, 1.0, 3000);

            assert_relative_eq!(trajectory[2999], 1.0, epsilon = 1e-3);
            assert!(trajectory.iter().all(|y| *y < 1.2));
        }
    }

    /// Taking the derivative on the measurement avoids the control spike at the setpoint step
    #[test]
    fn test_derivative_kick_on_mass_spring_damper() {
        let peak_control = |derivative_mode| {
            let mut pid = PidController::new(make_msd_config(Topology::Parallel, derivative_mode));
            let mut plant = make_msd_plant();
            let mut peak: f64 = 0.0;
            for _ in 0..500 {
                let control = pid.compute(1.0, plant.output());
                peak = peak.max(control.abs());
                plant.step(control, MSD_DT);
            }
            peak
        };

        let on_error = peak_control(DerivativeMode::OnError);
        let on_measurement = peak_control(DerivativeMode::OnMeasurement);

        assert_eq!(on_error, 10.0);
        assert!(on_measurement < 3.0);
    }

    #[test]
    fn test_rk4_matches_free_response() {
        // x' = -x has the exact solution x(t) = x(0) exp(-t)
        let mut x = na::Vector2::new(1.0, 2.0);
        for _ in 0..100 {
            x = sim::rk4_step(|x| -x, x, 0.01);
        }
        assert_relative_eq!(x[0], (-1.0f64).exp(), epsilon = 1e-9);
        assert_relative_eq!(x[1], 2.0 * (-1.0f64).exp(), epsilon = 1e-9);
    }
}
