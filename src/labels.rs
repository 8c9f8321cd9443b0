//! # Activity Labels
//!
//! Flag set over the fixed motion activity taxonomy reported by the platform
//! classifier: stationary, automotive, walking, running and cycling, plus an
//! `Unknown` sentinel for samples that asserted none of them.
//!
//! ## Invariant
//!
//! A set is never `Unknown` together with a concrete label. Inserting any
//! concrete label clears `Unknown`, so the only way to hold `Unknown` is to
//! start from [`ActivityLabels::UNKNOWN`] and add nothing.
//!
//! ## Example
//!
//! ```rust
//! use motion_timeline::{ActivityKind, ActivityLabels};
//!
//! let mut labels = ActivityLabels::UNKNOWN;
//! labels.insert(ActivityLabels::WALKING);
//! assert!(!labels.contains(ActivityLabels::UNKNOWN));
//!
//! let both = labels.union(ActivityLabels::RUNNING);
//! assert_eq!(both.to_string(), "running+walking");
//! assert_eq!(both.kinds(), vec![ActivityKind::Running, ActivityKind::Walking]);
//! ```

use std::fmt;
use std::str::FromStr;

/// A single activity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ActivityKind {
    Unknown,
    Stationary,
    Automotive,
    Walking,
    Running,
    Cycling,
}

impl ActivityKind {
    /// Concrete kinds in display priority order (vehicle first, resting last).
    pub const DISPLAY_ORDER: [ActivityKind; 5] = [
        ActivityKind::Automotive,
        ActivityKind::Cycling,
        ActivityKind::Running,
        ActivityKind::Walking,
        ActivityKind::Stationary,
    ];

    /// Lowercase name, stable across releases.
    pub fn name(self) -> &'static str {
        match self {
            ActivityKind::Unknown => "unknown",
            ActivityKind::Stationary => "stationary",
            ActivityKind::Automotive => "automotive",
            ActivityKind::Walking => "walking",
            ActivityKind::Running => "running",
            ActivityKind::Cycling => "cycling",
        }
    }

    /// The single-flag label set for this kind.
    pub fn labels(self) -> ActivityLabels {
        match self {
            ActivityKind::Unknown => ActivityLabels::UNKNOWN,
            ActivityKind::Stationary => ActivityLabels::STATIONARY,
            ActivityKind::Automotive => ActivityLabels::AUTOMOTIVE,
            ActivityKind::Walking => ActivityLabels::WALKING,
            ActivityKind::Running => ActivityLabels::RUNNING,
            ActivityKind::Cycling => ActivityLabels::CYCLING,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unrecognised activity name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownActivityName(pub String);

impl fmt::Display for UnknownActivityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised activity name: {:?}", self.0)
    }
}

impl std::error::Error for UnknownActivityName {}

impl FromStr for ActivityKind {
    type Err = UnknownActivityName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unknown" => Ok(ActivityKind::Unknown),
            "stationary" => Ok(ActivityKind::Stationary),
            "automotive" => Ok(ActivityKind::Automotive),
            "walking" => Ok(ActivityKind::Walking),
            "running" => Ok(ActivityKind::Running),
            "cycling" => Ok(ActivityKind::Cycling),
            _ => Err(UnknownActivityName(s.to_string())),
        }
    }
}

/// Bitmask of activity labels.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
pub struct ActivityLabels(u8);

impl ActivityLabels {
    /// None of the concrete flags was set.
    pub const UNKNOWN: ActivityLabels = ActivityLabels(1 << 0);
    pub const STATIONARY: ActivityLabels = ActivityLabels(1 << 1);
    pub const AUTOMOTIVE: ActivityLabels = ActivityLabels(1 << 2);
    pub const WALKING: ActivityLabels = ActivityLabels(1 << 3);
    pub const RUNNING: ActivityLabels = ActivityLabels(1 << 4);
    pub const CYCLING: ActivityLabels = ActivityLabels(1 << 5);

    const CONCRETE_MASK: u8 = 0b0011_1110;
    const ALL_MASK: u8 = 0b0011_1111;

    /// Build a set from the five classifier flags.
    ///
    /// Starts as `UNKNOWN` and stays that way only if every flag is false.
    pub fn from_flags(
        stationary: bool,
        automotive: bool,
        walking: bool,
        running: bool,
        cycling: bool,
    ) -> Self {
        let mut labels = Self::UNKNOWN;
        for (set, flag) in [
            (stationary, Self::STATIONARY),
            (automotive, Self::AUTOMOTIVE),
            (walking, Self::WALKING),
            (running, Self::RUNNING),
            (cycling, Self::CYCLING),
        ] {
            if set {
                labels.insert(flag);
            }
        }
        labels
    }

    /// Rebuild a set from raw bits, dropping bits outside the taxonomy.
    ///
    /// An empty or Unknown-plus-concrete input is normalised so the
    /// Unknown invariant holds.
    pub fn from_bits(bits: u8) -> Self {
        let concrete = bits & Self::CONCRETE_MASK;
        if concrete == 0 {
            Self::UNKNOWN
        } else {
            ActivityLabels(concrete)
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// True if every flag in `flag` is present.
    pub fn contains(self, flag: ActivityLabels) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// True if every flag of `self` is also present in `other`.
    pub fn is_subset_of(self, other: ActivityLabels) -> bool {
        self.0 & !other.0 == 0
    }

    /// Carries no concrete information.
    pub fn is_unknown(self) -> bool {
        self.is_subset_of(Self::UNKNOWN)
    }

    /// Return the union of both sets.
    pub fn union(self, other: ActivityLabels) -> Self {
        let mut merged = self;
        merged.insert(other);
        merged
    }

    /// Add all flags of `other`, clearing `Unknown` if anything concrete was added.
    pub fn insert(&mut self, other: ActivityLabels) {
        self.0 = (self.0 | other.0) & Self::ALL_MASK;
        if self.0 & Self::CONCRETE_MASK != 0 {
            self.0 &= !Self::UNKNOWN.0;
        }
    }

    /// Remove `flag`. Removing the last concrete label leaves `UNKNOWN`.
    pub fn remove(&mut self, flag: ActivityLabels) {
        self.0 &= !flag.0;
        if self.0 == 0 {
            self.0 = Self::UNKNOWN.0;
        }
    }

    /// Any of walking, running or cycling.
    pub fn is_walking_running_cycling(self) -> bool {
        self.contains(Self::WALKING) || self.contains(Self::RUNNING) || self.contains(Self::CYCLING)
    }

    /// Concrete kinds present, in [`ActivityKind::DISPLAY_ORDER`].
    pub fn kinds(self) -> Vec<ActivityKind> {
        ActivityKind::DISPLAY_ORDER
            .iter()
            .copied()
            .filter(|kind| self.contains(kind.labels()))
            .collect()
    }
}

impl Default for ActivityLabels {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl From<ActivityKind> for ActivityLabels {
    fn from(kind: ActivityKind) -> Self {
        kind.labels()
    }
}

impl From<u8> for ActivityLabels {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

impl From<ActivityLabels> for u8 {
    fn from(labels: ActivityLabels) -> Self {
        labels.bits()
    }
}

impl fmt::Display for ActivityLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds = self.kinds();
        if kinds.is_empty() {
            return f.write_str(ActivityKind::Unknown.name());
        }
        let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
        f.write_str(&names.join("+"))
    }
}

impl fmt::Debug for ActivityLabels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActivityLabels({})", self)
    }
}
