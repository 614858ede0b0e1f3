//! Step response of a mass-spring-damper system under the parallel and ideal PID topologies.
//! This example requires the `--features simulation` flag to be enabled.
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
pub fn main() {
    use nalgebra as na;

    use pidloop::pid::{DerivativeMode, PidConfigBuilder, PidController, Topology};
    use pidloop::sim;

    const FIXED_STEP_SIZE_S: f64 = 0.01;
    const N_STEPS: usize = 1000;
    // Print every 50th sample
    const DOWNSAMPLE_FACTOR: usize = 50;

    let mut responses = vec![];
    let mut labels = vec![];

    for topology in [Topology::Parallel, Topology::Ideal] {
        let cfg = PidConfigBuilder::default()
            .kp(2.0)
            .ki(1.0)
            .kd(0.1)
            .dt(FIXED_STEP_SIZE_S)
            .topology(topology)
            .derivative_mode(DerivativeMode::OnMeasurement)
            .integral_limits(-5.0, 5.0)
            .output_limits(-10.0, 10.0)
            .build()
            .unwrap();
        let mut pid = PidController::new(cfg);

        let mut plant = sim::MassSpringDamperPlant {
            model: sim::MassSpringDamper {
                natural_frequency: std::f64::consts::PI,
                damping_ratio: 0.2,
            },
            state: na::Vector2::zeros(),
        };

        responses.push(sim::step_response(&mut pid, &mut plant, 1.0, N_STEPS));
        labels.push(format!("{topology} {}", pid.label()));
        println!("{pid}");
    }

    println!("{:>8} {:>24} {:>24}", "time", labels[0], labels[1]);
    for i in (0..N_STEPS).step_by(DOWNSAMPLE_FACTOR) {
        println!(
            "{:>8.2} {:>24.4} {:>24.4}",
            i as f64 * FIXED_STEP_SIZE_S,
            responses[0][i],
            responses[1][i]
        );
    }
}

#[cfg(not(feature = "simulation"))]
fn main() {
    eprintln!("This example requires `--features simulation` to run.");
}
