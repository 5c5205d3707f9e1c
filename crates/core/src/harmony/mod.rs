//! Diatonic triad derivation for major and minor keys.
//!
//! A key is analysed by rotating the chromatic cycle so that it starts on the
//! root, picking the seven scale tones at fixed semitone offsets, and pairing
//! each with the quality label the mode assigns to that degree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{pitch, ChordError, ModePolicy, PitchClass, Result};

const MAJOR_OFFSETS: [usize; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_OFFSETS: [usize; 7] = [0, 2, 3, 5, 7, 8, 10];

const MAJOR_QUALITIES: [ChordQuality; 7] = [
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Minor,
    ChordQuality::Major,
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Major,
];

// Literal table used by the chord charts this tool reproduces. It is not the
// textbook natural-minor harmonisation.
const MINOR_QUALITIES: [ChordQuality; 7] = [
    ChordQuality::Minor,
    ChordQuality::Ambiguous,
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Major,
    ChordQuality::Major,
    ChordQuality::Major,
];

const MAJOR_EASY: [u8; 4] = [1, 6, 4, 5];
const MAJOR_SUPER_EASY: [u8; 3] = [1, 4, 5];
const MINOR_EASY: [u8; 4] = [1, 7, 6, 5];

/// Key mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Maps a mode character leniently: `m` is minor, everything else major.
    pub fn from_flag(flag: char) -> Self {
        match flag {
            'm' => Mode::Minor,
            _ => Mode::Major,
        }
    }

    /// Maps a mode character, accepting only `m` and `M`.
    pub fn from_flag_strict(flag: char) -> Option<Self> {
        match flag {
            'm' => Some(Mode::Minor),
            'M' => Some(Mode::Major),
            _ => None,
        }
    }

    /// Semitone offsets from the root for scale degrees 1 through 7.
    pub fn offsets(self) -> [usize; 7] {
        match self {
            Mode::Major => MAJOR_OFFSETS,
            Mode::Minor => MINOR_OFFSETS,
        }
    }

    /// Chord quality for scale degrees 1 through 7.
    pub fn qualities(self) -> [ChordQuality; 7] {
        match self {
            Mode::Major => MAJOR_QUALITIES,
            Mode::Minor => MINOR_QUALITIES,
        }
    }

    /// Degrees of the "easy" chord subset, in display order.
    pub fn easy_degrees(self) -> &'static [u8] {
        match self {
            Mode::Major => &MAJOR_EASY,
            Mode::Minor => &MINOR_EASY,
        }
    }

    /// Degrees of the "super easy" subset. Minor keys do not have one.
    pub fn super_easy_degrees(self) -> Option<&'static [u8]> {
        match self {
            Mode::Major => Some(&MAJOR_SUPER_EASY),
            Mode::Minor => None,
        }
    }
}

/// Chord type label attached to a scale degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    #[serde(rename = "Maj")]
    Major,
    #[serde(rename = "min")]
    Minor,
    /// Slash marker used for degree 2 of the minor table.
    #[serde(rename = "Maj/min")]
    Ambiguous,
}

impl ChordQuality {
    pub fn label(self) -> &'static str {
        match self {
            ChordQuality::Major => "Maj",
            ChordQuality::Minor => "min",
            ChordQuality::Ambiguous => "Maj/min",
        }
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A triad built on one scale degree of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiatonicTriad {
    pub degree: u8,
    pub root: PitchClass,
    pub quality: ChordQuality,
}

impl fmt::Display for DiatonicTriad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.quality)
    }
}

/// The seven diatonic triads of a key, in degree order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAnalysis {
    root: PitchClass,
    mode: Mode,
    triads: [DiatonicTriad; 7],
}

impl KeyAnalysis {
    fn build(root: PitchClass, mode: Mode) -> Self {
        let rotated = root.rotation();
        let offsets = mode.offsets();
        let qualities = mode.qualities();
        let triads = std::array::from_fn(|index| DiatonicTriad {
            degree: index as u8 + 1,
            root: rotated[offsets[index]],
            quality: qualities[index],
        });

        Self { root, mode, triads }
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// All seven triads, degree 1 first.
    pub fn triads(&self) -> &[DiatonicTriad; 7] {
        &self.triads
    }

    /// Triad on `degree` (1-based), if the degree is in range.
    pub fn triad(&self, degree: u8) -> Option<&DiatonicTriad> {
        usize::from(degree)
            .checked_sub(1)
            .and_then(|index| self.triads.get(index))
    }

    pub fn easy(&self) -> Vec<DiatonicTriad> {
        self.select(self.mode.easy_degrees())
    }

    pub fn super_easy(&self) -> Option<Vec<DiatonicTriad>> {
        self.mode
            .super_easy_degrees()
            .map(|degrees| self.select(degrees))
    }

    fn select(&self, degrees: &[u8]) -> Vec<DiatonicTriad> {
        degrees
            .iter()
            .filter_map(|degree| self.triad(*degree).copied())
            .collect()
    }
}

/// Derives the diatonic triads of the key rooted at `root_name`.
///
/// The first character of `root_name` is folded to uppercase before it is
/// matched against the twelve sharp-spelled pitch names.
pub fn analyze(root_name: &str, mode: Mode) -> Result<KeyAnalysis> {
    let root = pitch::parse_root(root_name)?;
    Ok(KeyAnalysis::build(root, mode))
}

/// Resolves raw query tokens into key analyses under a [`ModePolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyAnalyzer {
    policy: ModePolicy,
}

impl KeyAnalyzer {
    pub fn new(policy: ModePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ModePolicy {
        self.policy
    }

    pub fn analyze(&self, root_name: &str, mode: Mode) -> Result<KeyAnalysis> {
        analyze(root_name, mode)
    }

    /// Interprets a mode character according to the configured policy.
    pub fn resolve_mode(&self, flag: char) -> Result<Mode> {
        match self.policy {
            ModePolicy::Lenient => Ok(Mode::from_flag(flag)),
            ModePolicy::Strict => {
                Mode::from_flag_strict(flag).ok_or(ChordError::InvalidMode { flag })
            }
        }
    }

    /// Analyses a query given as a root token and a mode token. Only the first
    /// character of the mode token is significant.
    pub fn query(&self, root_token: &str, mode_token: &str) -> Result<KeyAnalysis> {
        let flag = mode_token.chars().next().ok_or(ChordError::MalformedInput)?;
        let mode = self.resolve_mode(flag)?;
        tracing::debug!(root = root_token, ?mode, "analysing key");
        self.analyze(root_token, mode)
    }
}
