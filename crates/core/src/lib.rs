//! Core library for the Chord Table application.
//!
//! Given a root note and a major/minor mode, the crate derives the seven
//! diatonic triads of the key together with two smaller chord subsets that are
//! easier to play. Each module owns one concern: pitch names, harmony, output
//! rendering, the interactive session loop, and configuration.

pub mod config;
pub mod error;
pub mod harmony;
pub mod pitch;
pub mod render;
pub mod session;

pub use config::{AppConfig, ModePolicy, OutputFormat};
pub use error::{ChordError, Result};
pub use harmony::{analyze, ChordQuality, DiatonicTriad, KeyAnalysis, KeyAnalyzer, Mode};
pub use pitch::{normalize_root_name, PitchClass, PITCH_NAMES};
pub use render::{AnalysisReport, TableRenderer, PROMPT};
pub use session::{Session, SessionSummary, TokenReader};
