#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! vreduce-math: lane-vector abstractions and strided kernels
//!
//! This crate holds everything that runs inside a reduction call: the
//! [`Element`] and [`LaneVector`] traits, one register wrapper per instruction
//! set, the alignment planner, and the generic kernels that stride a slice in
//! lane-width steps and finish with a scalar tail.
//!
//! It does not detect CPU features. Every SIMD entry point in [`backends`] is an
//! `unsafe fn` compiled with `#[target_feature]`; choosing which one is safe to
//! call on the running CPU is the job of the `vreduce` dispatch crate.
//!
//! # Architecture
//!
//! - `traits`: `Element` (i32, u16, f32) and `LaneVector`
//! - `align`: alignment planner and `ReductionPlan`
//! - `horizontal`: pairwise lane folding for array-backed vectors
//! - `kernels`: sum / min / add loops written once over `LaneVector`
//! - `backends`: `scalar`, `portable` (wide), `sse2`, `sse4`, `avx2`, `neon`
//!
//! # Example
//!
//! ```rust
//! use vreduce_math::backends::{portable, scalar};
//!
//! let data: Vec<i32> = (1..=10).collect();
//! assert_eq!(scalar::sum(&data), 55);
//! assert_eq!(portable::sum_i32(&data), 55);
//! ```

pub mod align;
pub mod backends;
pub mod horizontal;
mod kernels;
pub mod traits;

pub use align::{plan_alignment, ReductionPlan, UNREACHABLE};
pub use traits::{Element, LaneVector};
