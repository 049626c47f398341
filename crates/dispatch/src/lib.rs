#![warn(missing_docs)]
#![warn(clippy::all)]

//! vreduce: runtime-dispatched SIMD reductions
//!
//! Sum, minimum and elementwise addition over `i32`, `f32` and `u16` slices.
//! The widest instruction set the CPU supports is detected once, the matching
//! kernels are cached per element type, and every call goes through that
//! table. Lengths that are not a multiple of the lane count and buffers that
//! do not start on a vector boundary are handled by scalar prefix and tail
//! loops.
//!
//! # Fallback chain
//!
//! `Avx2 → Sse → Neon → Portable → Scalar`. The `Sse` tier upgrades
//! individual operations to SSSE3 horizontal add and SSE4.1 minimum when the
//! CPU has them. `Portable` uses the `wide` crate and needs no runtime
//! detection, so `Scalar` is only chosen when forced.
//!
//! # Architecture
//!
//! - `capability`: CPU flag detection and the cached [`CapabilitySet`]
//! - `dispatcher`: [`Tier`] selection and the [`Kernels`] function tables
//! - `reduce`: [`reduce_sum`], [`reduce_min`], [`add`], [`add_into`]
//! - `parallel`: chunked reductions on the rayon pool (`parallel` feature)
//! - `error`: [`ReduceError`]
//!
//! The vector types and kernels live in [`vreduce_math`], re-exported as
//! [`math`].
//!
//! # Feature Flags
//!
//! - `parallel` (default): [`par_reduce_min`] and [`par_reduce_sum`]
//! - `force-scalar`, `force-portable`, `force-sse`, `force-avx2`,
//!   `force-neon`: pin the tier for deterministic test runs; ignored with a
//!   warning if the CPU cannot run it
//!
//! # Example
//!
//! ```rust
//! use vreduce::{add, capabilities, reduce_min, reduce_sum, DispatchElement};
//!
//! let data: Vec<i32> = (1..=10).collect();
//! assert_eq!(reduce_sum(&data), 55);
//! assert_eq!(reduce_min(&data), Ok(1));
//! assert_eq!(add(&[1, 2, 3], &[10, 20, 30]), Ok(vec![11, 22, 33]));
//!
//! println!("width: {}", capabilities().width);
//! println!("i32 tier: {}", i32::dispatched().tier());
//! ```

pub mod capability;
pub mod dispatcher;
pub mod error;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod reduce;

pub use vreduce_math as math;
pub use vreduce_math::{plan_alignment, Element, ReductionPlan, UNREACHABLE};

pub use capability::{capabilities, CapabilitySet, CpuFeatures, VectorWidth};
pub use dispatcher::{select_variant, AddFn, DispatchElement, Kernels, MinFn, SumFn, Tier};
pub use error::{ReduceError, Result};
#[cfg(feature = "parallel")]
pub use parallel::{par_reduce_min, par_reduce_sum, ParallelConfig};
pub use reduce::{add, add_into, reduce_min, reduce_sum};
