use std::io::Write;

use serde::Serialize;

use crate::{ChordError, DiatonicTriad, KeyAnalysis, Mode, OutputFormat, PitchClass, Result};

pub const PROMPT: &str = "Input chord with (M/m) : ";

const EASY_HEADER: &str = "Easy version :";
const SUPER_EASY_HEADER: &str = "Super easy version :";

/// Serialisable view of a [`KeyAnalysis`] including both chord subsets.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport<'a> {
    pub root: PitchClass,
    pub mode: Mode,
    pub triads: &'a [DiatonicTriad],
    pub easy: Vec<DiatonicTriad>,
    pub super_easy: Option<Vec<DiatonicTriad>>,
}

impl<'a> From<&'a KeyAnalysis> for AnalysisReport<'a> {
    fn from(analysis: &'a KeyAnalysis) -> Self {
        Self {
            root: analysis.root(),
            mode: analysis.mode(),
            triads: analysis.triads(),
            easy: analysis.easy(),
            super_easy: analysis.super_easy(),
        }
    }
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    error: &'a str,
}

/// Writes chord tables in the configured [`OutputFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer {
    format: OutputFormat,
}

impl TableRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render<W: Write>(&self, analysis: &KeyAnalysis, out: &mut W) -> Result<()> {
        match self.format {
            OutputFormat::Text => render_text(analysis, out),
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &AnalysisReport::from(analysis))?;
                writeln!(out)?;
                Ok(())
            }
        }
    }

    /// Reports a failed query on the output stream.
    pub fn render_error<W: Write>(&self, err: &ChordError, out: &mut W) -> Result<()> {
        let message = err.to_string();
        match self.format {
            OutputFormat::Text => writeln!(out, "error: {message}")?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &ErrorReport { error: &message })?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

/// Minor keys print the table and the easy subset. Major keys start with a
/// blank line and add the super easy subset.
fn render_text<W: Write>(analysis: &KeyAnalysis, out: &mut W) -> Result<()> {
    if analysis.mode() == Mode::Major {
        writeln!(out)?;
    }

    for triad in analysis.triads() {
        write!(out, "{triad}\t")?;
    }
    writeln!(out)?;
    writeln!(out)?;

    writeln!(out, "{EASY_HEADER}")?;
    for triad in analysis.easy() {
        writeln!(out, "{triad}")?;
    }

    if let Some(super_easy) = analysis.super_easy() {
        writeln!(out, "{SUPER_EASY_HEADER}")?;
        for triad in super_easy {
            writeln!(out, "{triad}")?;
        }
    }

    Ok(())
}
