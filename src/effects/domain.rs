/// Edge-handling policy for sampling outside a content domain.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DomainMode {
    /// Sample freely; the texture beyond the domain is assumed valid.
    #[default]
    Ignore,
    /// Clamp coordinates to the domain edge.
    Clamp,
    /// Wrap coordinates around the domain.
    Repeat,
    /// Outside the domain reads transparent black.
    Decal,
}

impl DomainMode {
    /// Mode used when the domain is sampled with bilinear filtering.
    ///
    /// Filtered domain sampling has no repeat variant, so `Repeat` degrades to `Decal`.
    pub fn for_scaling(self) -> Self {
        match self {
            Self::Repeat => Self::Decal,
            m => m,
        }
    }

    /// Whether reads skip domain handling entirely.
    pub fn is_ignore(self) -> bool {
        self == Self::Ignore
    }

    /// Resolve an integer texel index against the half-open domain `[lo, hi)`.
    ///
    /// Returns `None` when the texel reads as transparent (decal outside the domain). `Ignore`
    /// returns the index unchanged; the caller still clamps to the texture extent.
    pub fn resolve_texel(self, t: i32, lo: i32, hi: i32) -> Option<i32> {
        if hi <= lo {
            return match self {
                Self::Ignore => Some(t),
                _ => None,
            };
        }
        match self {
            Self::Ignore => Some(t),
            Self::Clamp => Some(t.clamp(lo, hi - 1)),
            Self::Repeat => Some(lo + (t - lo).rem_euclid(hi - lo)),
            Self::Decal => (lo..hi).contains(&t).then_some(t),
        }
    }

    /// Resolve a continuous coordinate against the closed domain `[lo, hi]`.
    pub fn resolve_coord(self, c: f64, lo: f64, hi: f64) -> Option<f64> {
        match self {
            Self::Ignore => Some(c),
            Self::Clamp => Some(if hi < lo { (lo + hi) * 0.5 } else { c.clamp(lo, hi) }),
            Self::Repeat => {
                let span = hi - lo;
                if span <= 0.0 {
                    Some(lo)
                } else {
                    Some(lo + (c - lo).rem_euclid(span))
                }
            }
            Self::Decal => (c >= lo && c <= hi).then_some(c),
        }
    }
}

/// Axis of a separable convolution pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

#[cfg(test)]
#[path = "../../tests/unit/effects/domain.rs"]
mod tests;
