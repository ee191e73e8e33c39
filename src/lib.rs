//! SWIPE' pitch tracker for Rust.
//!
//! Sawtooth implements the sawtooth-waveform-inspired pitch estimator in
//! its prime-harmonic variant (SWIPE'; Camacho, 2007): given a mono signal
//! and a search range, it produces a time-indexed track of fundamental
//! frequency estimates.
//!
//! # How it works
//!
//! - **Loudness** — multi-window short-time spectra, spline-resampled onto
//!   an ERB-spaced frequency grid and square-rooted, one matrix per rung of
//!   a power-of-two window ladder
//! - **Kernels** — sparse cosine templates with peaks at prime harmonics
//!   only, inter-harmonic valleys, and a `1/sqrt(f)` envelope
//! - **Strength** — kernel-loudness inner products accumulated over the
//!   ladder with triangular window weights into a candidate-by-frame matrix
//! - **Extraction** — per-frame argmax with parabolic refinement on a
//!   1/768-octave log-frequency grid; sub-threshold frames are NaN
//!
//! # Quick Start
//!
//! ```rust
//! use sawtooth::{io, track};
//!
//! // A 220 Hz tone, half a second at 16 kHz
//! let signal = io::tone(220.0, 16000, 0.5);
//!
//! let pitch = track::SwipeConfig::new(16000)
//!     .with_range(100.0, 600.0)
//!     .with_timestep(0.01)
//!     .compute(&signal)
//!     .unwrap();
//!
//! assert_eq!(pitch.len(), 50); // one estimate every 10 ms
//! assert!((pitch[25] - 220.0).abs() < 3.0);
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`track`] | The tracker entry point, config builder, pitch extraction |
//! | [`strength`] | Candidate grid, window ladder, strength-matrix assembly |
//! | [`loudness`] | ERB-domain loudness analysis |
//! | [`kernel`] | Prime-harmonic strength kernels |
//! | [`convert`] | Hz/ERB/Mel conversions |
//! | [`numeric`] | Bisection, cubic splines, polynomial fits, prime sieve |
//! | [`window`] | Hann window |
//! | [`fft`] | Cached real-to-complex FFT plan |
//! | [`io`] | WAV reading/writing, tone generator |
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. Numeric edge cases inside a valid run
//! (silent frames, zero-strength columns) never fail the run; they surface
//! as NaN frames in the output.
//!
//! # Safety
//!
//! This crate uses `#![forbid(unsafe_code)]` — no unsafe Rust anywhere.

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod convert;
pub mod fft;
pub mod io;
pub mod kernel;
pub mod loudness;
pub mod numeric;
pub mod strength;
pub mod track;
pub mod window;

pub use track::{swipe, SwipeConfig};
