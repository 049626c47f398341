//! Runtime kernel dispatcher
//!
//! Picks one implementation per operation and element type and stores it in a
//! function-pointer table ([`Kernels`]). Selection walks the fallback chain
//! `Avx2 → Sse → Neon → Portable → Scalar` and stops at the first tier the
//! CPU supports. Inside a tier, individual operations may pick a narrower
//! variant from the capability flags (the `Sse` tier uses SSSE3 `hadd` only if
//! present, SSE4.1 minimum only if present).
//!
//! This module is the only place that reads capability flags. Tables for the
//! running CPU are built once per element type and cached in a `OnceLock`.

use std::any::type_name;
use std::fmt;

use log::{debug, warn};
use vreduce_math::backends::{portable, scalar};
use vreduce_math::Element;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use vreduce_math::backends::{avx2, sse2, sse4};

#[cfg(target_arch = "aarch64")]
use vreduce_math::backends::neon;

use crate::capability::{capabilities, CapabilitySet};
use crate::error::{ReduceError, Result};

/// Sum kernel. `unsafe` because SIMD kernels require their instruction set.
pub type SumFn<T> = unsafe fn(&[T]) -> T;

/// Minimum kernel over a non-empty slice
pub type MinFn<T> = unsafe fn(&[T]) -> T;

/// Elementwise add kernel over three equal-length slices
pub type AddFn<T> = unsafe fn(&[T], &[T], &mut [T]);

/// One rung of the fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// 256-bit AVX2 with aligned loads (x86/x86_64)
    Avx2,
    /// 128-bit SSE2, upgraded per operation to SSSE3/SSE4.1 (x86/x86_64)
    Sse,
    /// 128-bit NEON (aarch64)
    Neon,
    /// Fixed-width `wide` vectors, any architecture
    Portable,
    /// Plain loops
    Scalar,
}

impl Tier {
    /// Fallback order, widest first
    pub const CHAIN: [Tier; 5] = [
        Tier::Avx2,
        Tier::Sse,
        Tier::Neon,
        Tier::Portable,
        Tier::Scalar,
    ];

    /// Short lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Avx2 => "avx2",
            Tier::Sse => "sse",
            Tier::Neon => "neon",
            Tier::Portable => "portable",
            Tier::Scalar => "scalar",
        }
    }

    /// Tier pinned by a `force-*` cargo feature, if any
    pub const fn forced() -> Option<Tier> {
        if cfg!(feature = "force-scalar") {
            Some(Tier::Scalar)
        } else if cfg!(feature = "force-portable") {
            Some(Tier::Portable)
        } else if cfg!(feature = "force-sse") {
            Some(Tier::Sse)
        } else if cfg!(feature = "force-avx2") {
            Some(Tier::Avx2)
        } else if cfg!(feature = "force-neon") {
            Some(Tier::Neon)
        } else {
            None
        }
    }

    /// Whether this build can run the tier on a CPU with `caps`
    pub fn is_supported(self, caps: &CapabilitySet) -> bool {
        let x86 = cfg!(any(target_arch = "x86", target_arch = "x86_64"));
        match self {
            Tier::Avx2 => x86 && caps.features.has_avx2,
            Tier::Sse => x86 && caps.features.has_sse2,
            Tier::Neon => cfg!(target_arch = "aarch64") && caps.features.has_neon,
            Tier::Portable | Tier::Scalar => true,
        }
    }

    /// First supported tier in [`Tier::CHAIN`], unless a supported tier is forced
    pub fn select(caps: &CapabilitySet) -> Tier {
        if let Some(forced) = Tier::forced() {
            if forced.is_supported(caps) {
                return forced;
            }
            warn!("forced tier {forced} is not supported on this CPU, using normal selection");
        }

        Tier::CHAIN
            .into_iter()
            .find(|tier| tier.is_supported(caps))
            .unwrap_or(Tier::Scalar)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved function table for element type `T`
///
/// A `Kernels` value is only ever built for a tier the running CPU supports,
/// which is what makes the safe wrappers sound.
#[derive(Clone, Copy)]
pub struct Kernels<T> {
    tier: Tier,
    sum_fn: SumFn<T>,
    sum_variant: &'static str,
    min_fn: MinFn<T>,
    min_variant: &'static str,
    add_fn: AddFn<T>,
    add_variant: &'static str,
}

impl<T: Element> Kernels<T> {
    /// Plain-loop table, valid on every CPU
    pub fn scalar() -> Self {
        Self {
            tier: Tier::Scalar,
            sum_fn: scalar::sum::<T>,
            sum_variant: "scalar-unrolled",
            min_fn: scalar::min::<T>,
            min_variant: "scalar",
            add_fn: scalar::add::<T>,
            add_variant: "scalar",
        }
    }

    /// Tier the table was built for
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Name of the sum variant (for example `"ssse3-hadd"`)
    pub fn sum_variant(&self) -> &'static str {
        self.sum_variant
    }

    /// Name of the minimum variant
    pub fn min_variant(&self) -> &'static str {
        self.min_variant
    }

    /// Name of the elementwise add variant
    pub fn add_variant(&self) -> &'static str {
        self.add_variant
    }

    /// Sum of `data`; zero for an empty slice. Integer sums wrap.
    #[inline]
    pub fn sum(&self, data: &[T]) -> T {
        // SAFETY: tables are only built for tiers the CPU supports
        unsafe { (self.sum_fn)(data) }
    }

    /// Minimum of `data`
    #[inline]
    pub fn min(&self, data: &[T]) -> Result<T> {
        if data.is_empty() {
            return Err(ReduceError::EmptyInput);
        }
        // SAFETY: non-empty, and the tier is supported
        Ok(unsafe { (self.min_fn)(data) })
    }

    /// `a[i] + b[i]` into a new vector
    pub fn add(&self, a: &[T], b: &[T]) -> Result<Vec<T>> {
        check_operands(a, b)?;
        let mut out = vec![T::ZERO; a.len()];
        self.add_into(a, b, &mut out)?;
        Ok(out)
    }

    /// `out[i] = a[i] + b[i]`
    #[inline]
    pub fn add_into(&self, a: &[T], b: &[T], out: &mut [T]) -> Result<()> {
        check_operands(a, b)?;
        if out.len() != a.len() {
            return Err(ReduceError::OutputLengthMismatch {
                expected: a.len(),
                actual: out.len(),
            });
        }
        // SAFETY: lengths checked above, and the tier is supported
        unsafe { (self.add_fn)(a, b, out) };
        Ok(())
    }
}

impl<T: DispatchElement> Kernels<T> {
    /// Build the table for a specific tier
    ///
    /// `caps` is clamped to the running CPU, so a fabricated capability set can
    /// never select an instruction set the hardware lacks. Returns `None` if
    /// the tier is unsupported after clamping.
    pub fn for_tier(tier: Tier, caps: &CapabilitySet) -> Option<Self> {
        // SAFETY: clamped to the running CPU
        unsafe { T::build(tier, &caps.intersect(&capabilities())) }
    }
}

impl<T> fmt::Debug for Kernels<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernels")
            .field("element", &type_name::<T>())
            .field("tier", &self.tier)
            .field("sum", &self.sum_variant)
            .field("min", &self.min_variant)
            .field("add", &self.add_variant)
            .finish()
    }
}

#[inline]
fn check_operands<T>(a: &[T], b: &[T]) -> Result<()> {
    if a.len() != b.len() {
        return Err(ReduceError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

mod private {
    pub trait Sealed {}

    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for u16 {}
}

/// Element types with a full set of tier kernels (`i32`, `f32`, `u16`)
///
/// Tables are obtained through [`DispatchElement::dispatched`],
/// [`Kernels::for_tier`] or [`select_variant`], all of which clamp the
/// capability set to the running CPU. The raw constructor is `unsafe`:
///
/// ```compile_fail
/// use vreduce::{CapabilitySet, CpuFeatures, DispatchElement, Tier};
///
/// let claimed = CapabilitySet::from_features(CpuFeatures {
///     has_avx2: true,
///     ..CpuFeatures::default()
/// });
/// let _ = <i32 as DispatchElement>::build(Tier::Avx2, &claimed);
/// ```
pub trait DispatchElement: Element + private::Sealed {
    /// Table for `tier` under `caps`, or `None` if `caps` cannot run it
    ///
    /// # Safety
    ///
    /// `caps` must not claim features the running CPU lacks, otherwise the
    /// safe methods of the returned table execute unsupported instructions.
    /// Use [`Kernels::for_tier`] or [`select_variant`], which clamp it.
    #[doc(hidden)]
    unsafe fn build(tier: Tier, caps: &CapabilitySet) -> Option<Kernels<Self>>;

    /// Table for the running CPU, resolved on first use
    fn dispatched() -> &'static Kernels<Self>;
}

/// Pure mapping from a capability set to a kernel table
///
/// `caps` is clamped to the running CPU first. The same input always yields
/// the same table.
pub fn select_variant<T: DispatchElement>(caps: &CapabilitySet) -> Kernels<T> {
    let caps = caps.intersect(&capabilities());
    let tier = Tier::select(&caps);
    // SAFETY: clamped to the running CPU above
    unsafe { T::build(tier, &caps) }.unwrap_or_else(Kernels::scalar)
}

fn resolve<T: DispatchElement>() -> Kernels<T> {
    let caps = capabilities();
    let kernels = select_variant::<T>(&caps);
    debug!(
        "{} kernels: tier={} sum={} min={} add={} (width {})",
        type_name::<T>(),
        kernels.tier,
        kernels.sum_variant,
        kernels.min_variant,
        kernels.add_variant,
        caps.width
    );
    kernels
}

/// SSE-tier minimum: SSE4.1 when available and the element has one
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
macro_rules! sse_min {
    ($caps:expr, $min:ident) => {
        (sse2::$min as MinFn<_>, "sse2")
    };
    ($caps:expr, $min:ident, $sse41:ident) => {
        if $caps.features.has_sse41 {
            (sse4::$sse41 as MinFn<_>, "sse4.1")
        } else {
            (sse2::$min as MinFn<_>, "sse2-emulated")
        }
    };
}

macro_rules! impl_dispatch_element {
    ($ty:ty, $sum:ident, $min:ident, $add:ident $(, sse41_min = $sse41:ident)?) => {
        impl DispatchElement for $ty {
            unsafe fn build(tier: Tier, caps: &CapabilitySet) -> Option<Kernels<Self>> {
                if !tier.is_supported(caps) {
                    return None;
                }
                match tier {
                    Tier::Scalar => Some(Kernels::scalar()),
                    Tier::Portable => Some(Kernels {
                        tier,
                        sum_fn: portable::$sum,
                        sum_variant: "portable",
                        min_fn: portable::$min,
                        min_variant: "portable",
                        add_fn: portable::$add,
                        add_variant: "portable",
                    }),
                    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                    Tier::Avx2 => Some(Kernels {
                        tier,
                        sum_fn: avx2::$sum,
                        sum_variant: "avx2-aligned-x4",
                        min_fn: avx2::$min,
                        min_variant: "avx2-aligned",
                        add_fn: avx2::$add,
                        add_variant: "avx2",
                    }),
                    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                    Tier::Sse => {
                        let (sum_fn, sum_variant) = if caps.features.has_ssse3 {
                            (sse4::$sum as SumFn<$ty>, "ssse3-hadd")
                        } else {
                            (sse2::$sum as SumFn<$ty>, "sse2-shuffle")
                        };
                        let (min_fn, min_variant) = sse_min!(caps, $min $(, $sse41)?);
                        Some(Kernels {
                            tier,
                            sum_fn,
                            sum_variant,
                            min_fn,
                            min_variant,
                            add_fn: sse2::$add,
                            add_variant: "sse2",
                        })
                    }
                    #[cfg(target_arch = "aarch64")]
                    Tier::Neon => Some(Kernels {
                        tier,
                        sum_fn: neon::$sum,
                        sum_variant: "neon-addv",
                        min_fn: neon::$min,
                        min_variant: "neon-minv",
                        add_fn: neon::$add,
                        add_variant: "neon",
                    }),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }

            fn dispatched() -> &'static Kernels<Self> {
                static KERNELS: std::sync::OnceLock<Kernels<$ty>> = std::sync::OnceLock::new();
                KERNELS.get_or_init(resolve::<$ty>)
            }
        }
    };
}

impl_dispatch_element!(i32, sum_i32, min_i32, add_i32, sse41_min = min_i32);
impl_dispatch_element!(u16, sum_u16, min_u16, add_u16, sse41_min = min_u16);
impl_dispatch_element!(f32, sum_f32, min_f32, add_f32);
