//! CPU capability detection
//!
//! Detects which vector widths and horizontal instructions the running CPU
//! offers. On x86/x86_64 the raw flags come from the `cpufeatures` crate, which
//! runs CPUID once and also checks that the OS saves the AVX register state.
//! NEON is architecturally mandatory on aarch64 and needs no runtime query.
//!
//! Absence of SIMD is a valid result: a CPU with no flags maps to
//! [`CapabilitySet::scalar_only`], never to an error.

use std::fmt;
use std::sync::OnceLock;

/// Raw instruction-set flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CpuFeatures {
    /// SSE2 (baseline 128-bit integer and float SIMD)
    pub has_sse2: bool,

    /// SSSE3 (`phaddd`, `phaddw`; implies SSE3 `haddps`)
    pub has_ssse3: bool,

    /// SSE4.1 (`pminsd`, `pminuw`, `phminposuw`)
    pub has_sse41: bool,

    /// AVX2 (256-bit integer SIMD)
    pub has_avx2: bool,

    /// NEON / Advanced SIMD (aarch64)
    pub has_neon: bool,
}

impl CpuFeatures {
    /// Query the running CPU
    ///
    /// The first call issues CPUID; `cpufeatures` caches the answer, so later
    /// calls are a few atomic loads.
    pub fn detect() -> Self {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            cpufeatures::new!(cpuid_sse2, "sse2");
            cpufeatures::new!(cpuid_ssse3, "ssse3");
            cpufeatures::new!(cpuid_sse41, "sse4.1");
            cpufeatures::new!(cpuid_avx2, "avx2");

            Self {
                has_sse2: cpuid_sse2::get(),
                has_ssse3: cpuid_ssse3::get(),
                has_sse41: cpuid_sse41::get(),
                has_avx2: cpuid_avx2::get(),
                has_neon: false,
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            Self {
                has_neon: true,
                ..Self::default()
            }
        }

        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Self::default()
        }
    }

    /// Flags present in both sets
    pub fn intersect(self, other: Self) -> Self {
        Self {
            has_sse2: self.has_sse2 && other.has_sse2,
            has_ssse3: self.has_ssse3 && other.has_ssse3,
            has_sse41: self.has_sse41 && other.has_sse41,
            has_avx2: self.has_avx2 && other.has_avx2,
            has_neon: self.has_neon && other.has_neon,
        }
    }
}

/// Widest usable vector register
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VectorWidth {
    /// No SIMD registers
    #[default]
    None,
    /// 128-bit registers (SSE2, NEON)
    W128,
    /// 256-bit registers (AVX2)
    W256,
}

impl VectorWidth {
    /// Register width in bits (0 for `None`)
    pub const fn bits(self) -> usize {
        match self {
            VectorWidth::None => 0,
            VectorWidth::W128 => 128,
            VectorWidth::W256 => 256,
        }
    }

    /// Register width in bytes, the alignment an aligned load requires
    pub const fn bytes(self) -> usize {
        self.bits() / 8
    }
}

impl fmt::Display for VectorWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorWidth::None => f.write_str("none"),
            other => write!(f, "{}-bit", other.bits()),
        }
    }
}

/// Capabilities derived from the raw flags
///
/// Immutable once built. [`capabilities`] holds the process-wide instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet {
    /// Raw flags this set was derived from
    pub features: CpuFeatures,

    /// Widest vector register
    pub width: VectorWidth,

    /// A horizontal-add instruction exists at `width`
    pub horizontal_add: bool,

    /// A horizontal-min instruction exists at `width`
    pub horizontal_min: bool,
}

impl CapabilitySet {
    /// Derive widths and horizontal-instruction availability from raw flags
    ///
    /// Pure, so tests can describe CPUs other than the one they run on.
    pub fn from_features(features: CpuFeatures) -> Self {
        let width = if features.has_avx2 {
            VectorWidth::W256
        } else if features.has_sse2 || features.has_neon {
            VectorWidth::W128
        } else {
            VectorWidth::None
        };

        // AVX2 has vphaddd; the 256-bit minimum narrows to phminposuw at 128
        let (horizontal_add, horizontal_min) = match width {
            VectorWidth::W256 => (true, features.has_sse41),
            VectorWidth::W128 => (
                features.has_ssse3 || features.has_neon,
                features.has_sse41 || features.has_neon,
            ),
            VectorWidth::None => (false, false),
        };

        Self {
            features,
            width,
            horizontal_add,
            horizontal_min,
        }
    }

    /// Detect the running CPU (uncached; see [`capabilities`])
    pub fn detect() -> Self {
        Self::from_features(CpuFeatures::detect())
    }

    /// Hardware without any SIMD support
    pub fn scalar_only() -> Self {
        Self::from_features(CpuFeatures::default())
    }

    /// Restrict this set to what `other` also supports
    pub fn intersect(&self, other: &CapabilitySet) -> Self {
        Self::from_features(self.features.intersect(other.features))
    }

    /// True if any vector register is available
    pub fn has_simd(&self) -> bool {
        self.width != VectorWidth::None
    }
}

/// Capabilities of the running CPU, detected on first use and cached for the
/// lifetime of the process
pub fn capabilities() -> CapabilitySet {
    static CAPABILITIES: OnceLock<CapabilitySet> = OnceLock::new();
    *CAPABILITIES.get_or_init(CapabilitySet::detect)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x86(sse2: bool, ssse3: bool, sse41: bool, avx2: bool) -> CpuFeatures {
        CpuFeatures {
            has_sse2: sse2,
            has_ssse3: ssse3,
            has_sse41: sse41,
            has_avx2: avx2,
            has_neon: false,
        }
    }

    #[test]
    fn test_no_features_is_scalar_only() {
        let caps = CapabilitySet::from_features(CpuFeatures::default());
        assert_eq!(caps.width, VectorWidth::None);
        assert!(!caps.horizontal_add);
        assert!(!caps.horizontal_min);
        assert!(!caps.has_simd());
        assert_eq!(caps, CapabilitySet::scalar_only());
    }

    #[test]
    fn test_sse2_only_has_no_horizontal_instructions() {
        let caps = CapabilitySet::from_features(x86(true, false, false, false));
        assert_eq!(caps.width, VectorWidth::W128);
        assert!(!caps.horizontal_add);
        assert!(!caps.horizontal_min);
    }

    #[test]
    fn test_ssse3_adds_hadd_sse41_adds_minpos() {
        let caps = CapabilitySet::from_features(x86(true, true, false, false));
        assert!(caps.horizontal_add);
        assert!(!caps.horizontal_min);

        let caps = CapabilitySet::from_features(x86(true, true, true, false));
        assert!(caps.horizontal_add);
        assert!(caps.horizontal_min);
    }

    #[test]
    fn test_avx2_is_256_bit() {
        let caps = CapabilitySet::from_features(x86(true, true, true, true));
        assert_eq!(caps.width, VectorWidth::W256);
        assert_eq!(caps.width.bytes(), 32);
        assert!(caps.horizontal_add);
        assert!(caps.horizontal_min);
    }

    #[test]
    fn test_neon_is_128_bit_with_across_vector_ops() {
        let caps = CapabilitySet::from_features(CpuFeatures {
            has_neon: true,
            ..CpuFeatures::default()
        });
        assert_eq!(caps.width, VectorWidth::W128);
        assert!(caps.horizontal_add);
        assert!(caps.horizontal_min);
    }

    #[test]
    fn test_intersect_drops_missing_flags() {
        let full = CapabilitySet::from_features(x86(true, true, true, true));
        let old = CapabilitySet::from_features(x86(true, false, false, false));
        let both = full.intersect(&old);
        assert_eq!(both.features, old.features);
        assert_eq!(both.width, VectorWidth::W128);
    }

    #[test]
    fn test_cached_capabilities_are_stable() {
        assert_eq!(capabilities(), capabilities());
        assert_eq!(capabilities(), CapabilitySet::detect());
    }

    #[cfg(target_arch = "aarch64")]
    #[test]
    fn test_aarch64_always_has_neon() {
        assert!(capabilities().features.has_neon);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_x86_64_always_has_sse2() {
        assert!(capabilities().features.has_sse2);
    }

    #[test]
    fn test_width_display() {
        assert_eq!(VectorWidth::None.to_string(), "none");
        assert_eq!(VectorWidth::W256.to_string(), "256-bit");
    }
}
