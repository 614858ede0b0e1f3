#![warn(missing_docs)]

//! # Fixed-Step Discrete PID Controller
//!
//! This library provides a discrete PID (Proportional-Integral-Derivative) controller in Rust,
//! evaluated once per fixed sample interval `dt` by a caller-owned control loop.
//!
//! It includes both functional and stateful implementations, allowing users to choose the approach that best suits their needs.
//!
//! ## Features
//!
//! - Selectable computation variants:
//!   - Proportional on error or on measurement.
//!   - Backward, forward or trapezoidal integration.
//!   - Derivative on error or on measurement, to mitigate derivative kick.
//!
//! - Three summation topologies: parallel, ideal, and a direct-form recurrence over the last
//!   three errors.
//!
//! - Anti reset-windup: independently bounded integral accumulator and output.
//!
//! - Configurations are fully validated on construction; `compute` itself cannot fail.
//!
//! ## Usage
//!
//! ### Functional PID Controller
//!
//! The functional PID controller lets you explicitly manage the state of the controller.
//!
//! In exchange, the controller holds no mutable state and the `compute` method is **functionally
//! pure**, making it exceptionally easy to test and validate, or to make thread-safe.
//!
//! ```rust
//! use pidloop::pid::{FuncPidController, IntegralMode, PidConfigBuilder, PidContext, Topology};
//!
//! let config = PidConfigBuilder::default()
//!     .kp(2.0)
//!     .ki(0.2)
//!     .dt(0.01)
//!     .topology(Topology::Ideal)
//!     .integral_mode(IntegralMode::Trapezoidal)
//!     .integral_limits(-10.0, 10.0)
//!     .build()
//!     .expect("Invalid PID config");
//! let pid = FuncPidController::new(config);
//! let context = PidContext::<f64>::new();
//!
//! let measured = 1.0;
//! let setpoint = 2.0;
//!
//! let (output, updated_context) = pid.compute(context, setpoint, measured);
//! assert_eq!(updated_context.prev_error(), 1.0);
//! ```
//!
//! ### Stateful PID Controller
//!
//! The stateful PID controller manages a `PidContext` internally. The controller **must** be
//! `mut`.
//!
//! ```rust
//! use pidloop::pid::{PidConfig, PidController};
//!
//! let mut pid = PidController::new(PidConfig::default());
//!
//! // Freely change the PID configuration, but take good care keeping track of your changes
//! assert!(pid.config_mut().set_kp(2.0).is_ok());
//! assert!(pid.config_mut().set_dt(0.0).is_err());
//!
//! let mut measured = 0.0;
//! for _ in 0..100 {
//!     measured += pid.compute(5.0, measured) * pid.config().dt();
//! }
//!
//! // Clears the loop state, keeps the configuration
//! pid.reset();
//! assert_eq!(pid.integral(), 0.0);
//! ```
//!
//! ### String-configured callers
//!
//! ```rust
//! use pidloop::pid::{PidConfigError, Topology};
//!
//! let topology: Topology = "direct".parse().unwrap();
//! assert_eq!(topology, Topology::Direct);
//! assert_eq!("pi".parse::<Topology>(), Err(PidConfigError::UnknownTopology));
//! ```
//!
//! ## License
//!
//! MIT
#![no_std]

#[cfg(feature = "std")]
extern crate std;

/// The main module for the PID controller library.
pub mod pid;

#[doc(hidden)]
#[cfg(feature = "simulation")]
pub mod sim;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
