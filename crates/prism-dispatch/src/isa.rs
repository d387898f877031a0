//! Instruction-set selection.
//!
//! The CPU is probed once per process. The selected [`Isa`] is the widest
//! one the CPU supports, optionally capped by the `PRISM_ISA` setting:
//!
//! ```text
//!   unselected ──probe──> CpuFeatures ──cap──> Isa (cached, read-only)
//! ```

use crate::error::{DispatchError, DispatchResult};
use bitflags::bitflags;
use prism_core::FloatKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, warn};

bitflags! {
    /// CPU features relevant to dispatch.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CpuFeatures: u32 {
        /// SSE4.2 (128-bit).
        const SSE4_2 = 0b0000_0001;
        /// AVX (256-bit floating point).
        const AVX = 0b0000_0010;
        /// AVX2 (256-bit).
        const AVX2 = 0b0000_0100;
        /// Fused multiply-add.
        const FMA = 0b0000_1000;
        /// AVX-512 Foundation (512-bit).
        const AVX512F = 0b0001_0000;
        /// Advanced SIMD on AArch64 (128-bit).
        const NEON = 0b0010_0000;
    }
}

impl CpuFeatures {
    /// Probe the running CPU.
    #[must_use]
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut features = Self::empty();
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            if is_x86_feature_detected!("sse4.2") {
                features |= Self::SSE4_2;
            }
            if is_x86_feature_detected!("avx") {
                features |= Self::AVX;
            }
            if is_x86_feature_detected!("avx2") {
                features |= Self::AVX2;
            }
            if is_x86_feature_detected!("fma") {
                features |= Self::FMA;
            }
            if is_x86_feature_detected!("avx512f") {
                features |= Self::AVX512F;
            }
        }
        #[cfg(target_arch = "aarch64")]
        {
            if std::arch::is_aarch64_feature_detected!("neon") {
                features |= Self::NEON;
            }
        }
        features
    }

    /// The running CPU's features, probed on first call.
    #[must_use]
    pub fn current() -> Self {
        static FEATURES: OnceLock<CpuFeatures> = OnceLock::new();
        *FEATURES.get_or_init(Self::detect)
    }
}

/// A dispatch target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Isa {
    /// Portable code, one lane at a time.
    Scalar,
    /// x86 SSE4.2, 16-byte vectors.
    Sse4,
    /// x86 AVX2 with FMA, 32-byte vectors.
    Avx2,
    /// x86 AVX-512F, 64-byte vectors.
    Avx512,
    /// AArch64 Advanced SIMD, 16-byte vectors.
    Neon,
}

impl Isa {
    /// Every target, in preference order (widest first).
    pub const ALL: [Isa; 5] = [Isa::Avx512, Isa::Avx2, Isa::Sse4, Isa::Neon, Isa::Scalar];

    /// Lowercase name, as accepted by `PRISM_ISA`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Isa::Scalar => "scalar",
            Isa::Sse4 => "sse4",
            Isa::Avx2 => "avx2",
            Isa::Avx512 => "avx512",
            Isa::Neon => "neon",
        }
    }

    /// Features the target's code is compiled with.
    #[must_use]
    pub const fn required_features(self) -> CpuFeatures {
        match self {
            Isa::Scalar => CpuFeatures::empty(),
            Isa::Sse4 => CpuFeatures::SSE4_2,
            Isa::Avx2 => CpuFeatures::AVX.union(CpuFeatures::AVX2).union(CpuFeatures::FMA),
            Isa::Avx512 => CpuFeatures::AVX512F
                .union(CpuFeatures::AVX2)
                .union(CpuFeatures::FMA),
            Isa::Neon => CpuFeatures::NEON,
        }
    }

    /// Native vector size in bytes; `None` for [`Isa::Scalar`].
    #[must_use]
    pub const fn vector_bytes(self) -> Option<usize> {
        match self {
            Isa::Scalar => None,
            Isa::Sse4 | Isa::Neon => Some(16),
            Isa::Avx2 => Some(32),
            Isa::Avx512 => Some(64),
        }
    }

    /// Lanes of `kind` in one native vector.
    #[must_use]
    pub const fn native_lanes(self, kind: FloatKind) -> usize {
        match self.vector_bytes() {
            Some(bytes) => bytes / kind.size_bytes(),
            None => 1,
        }
    }

    /// Whether a CPU with `features` can run this target.
    #[must_use]
    pub fn is_supported_by(self, features: CpuFeatures) -> bool {
        features.contains(self.required_features())
    }

    /// Whether the running CPU can run this target.
    #[must_use]
    pub fn is_available(self) -> bool {
        self.is_supported_by(CpuFeatures::current())
    }

    /// The widest target a CPU with `features` supports.
    #[must_use]
    pub fn best_for(features: CpuFeatures) -> Isa {
        Isa::ALL
            .into_iter()
            .find(|isa| isa.is_supported_by(features))
            .unwrap_or(Isa::Scalar)
    }

    /// The target to use given `features` and an optional name cap.
    ///
    /// A malformed or unsupported cap is logged and ignored.
    #[must_use]
    pub fn select(features: CpuFeatures, cap: Option<&str>) -> Isa {
        let best = Isa::best_for(features);
        let Some(name) = cap else {
            return best;
        };
        match name.parse::<Isa>() {
            Ok(isa) if isa.is_supported_by(features) => isa,
            Ok(isa) => {
                warn!(requested = %isa, using = %best, "requested ISA not supported by this CPU");
                best
            }
            Err(err) => {
                warn!(%err, using = %best, "ignoring ISA override");
                best
            }
        }
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Isa {
    type Err = DispatchError;

    fn from_str(s: &str) -> DispatchResult<Self> {
        let name = s.trim();
        Isa::ALL
            .into_iter()
            .find(|isa| isa.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| DispatchError::UnknownIsa {
                name: name.to_owned(),
            })
    }
}

/// The process-wide dispatch target, selected on first call.
#[must_use]
pub fn current_isa() -> Isa {
    static CURRENT: OnceLock<Isa> = OnceLock::new();
    *CURRENT.get_or_init(|| {
        let features = CpuFeatures::current();
        let config = prism_config::global_config();
        let isa = Isa::select(features, config.isa.as_deref());
        debug!(%isa, ?features, cap = ?config.isa, "selected dispatch target");
        isa
    })
}

/// A lane kind and width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaneShape {
    /// Lane kind.
    pub kind: FloatKind,
    /// Number of lanes.
    pub lanes: usize,
}

impl LaneShape {
    /// `lanes` lanes of `kind`.
    #[must_use]
    pub const fn new(kind: FloatKind, lanes: usize) -> Self {
        Self { kind, lanes }
    }

    /// Whether one native vector of `isa` holds the whole shape.
    #[must_use]
    pub const fn fits(self, isa: Isa) -> bool {
        self.lanes <= isa.native_lanes(self.kind)
    }
}

impl fmt::Display for LaneShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.kind.suffix(), self.lanes)
    }
}
