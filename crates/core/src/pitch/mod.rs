use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ChordError, Result};

/// Number of pitch classes in the chromatic cycle.
pub const PITCH_COUNT: usize = 12;

/// Pitch-class names in cycle order, starting from A. Sharps only.
pub const PITCH_NAMES: [&str; PITCH_COUNT] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];

/// One of the twelve note names of the chromatic scale, ignoring octave.
///
/// The variant order matches [`PITCH_NAMES`]: `A` is index 0 and `G#` is
/// index 11. Stepping past `G#` wraps back to `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    A,
    #[serde(rename = "A#")]
    As,
    B,
    C,
    #[serde(rename = "C#")]
    Cs,
    D,
    #[serde(rename = "D#")]
    Ds,
    E,
    F,
    #[serde(rename = "F#")]
    Fs,
    G,
    #[serde(rename = "G#")]
    Gs,
}

impl PitchClass {
    /// Every pitch class in cycle order.
    pub const ALL: [PitchClass; PITCH_COUNT] = [
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
    ];

    /// Position within the cycle (0 = A, 11 = G#).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pitch class at `index`, wrapping modulo 12.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % PITCH_COUNT]
    }

    pub fn name(self) -> &'static str {
        PITCH_NAMES[self.index()]
    }

    /// Exact, case-sensitive lookup of a pitch-class name.
    pub fn from_name(name: &str) -> Option<Self> {
        PITCH_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(Self::from_index)
    }

    /// Pitch class `semitones` steps above this one.
    pub fn transpose(self, semitones: usize) -> Self {
        Self::from_index(self.index() + semitones)
    }

    /// The twelve pitch classes starting at `self`, in cycle order.
    pub fn rotation(self) -> [PitchClass; PITCH_COUNT] {
        std::array::from_fn(|offset| self.transpose(offset))
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Uppercases the first character of a root token when it is an ASCII
/// lowercase letter. The rest of the token is left untouched.
pub fn normalize_root_name(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            let mut normalized = String::with_capacity(raw.len());
            normalized.push(first.to_ascii_uppercase());
            normalized.push_str(chars.as_str());
            normalized
        }
        _ => raw.to_string(),
    }
}

/// Normalises `raw` and resolves it to a pitch class.
pub fn parse_root(raw: &str) -> Result<PitchClass> {
    let normalized = normalize_root_name(raw);
    PitchClass::from_name(&normalized).ok_or_else(|| ChordError::unknown_root(raw))
}
