use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::{AppConfig, ChordError, KeyAnalyzer, Result, TableRenderer, PROMPT};

/// Splits a line-oriented reader into whitespace-separated tokens. A token
/// sequence may span several lines. Invalid UTF-8 is replaced rather than
/// rejected, so a garbled token fails lookup like any other unknown name.
#[derive(Debug)]
pub struct TokenReader<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Returns the next token, or `None` once the reader is exhausted.
    pub fn next_token(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }

            let mut line = Vec::new();
            if self.reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(
                String::from_utf8_lossy(&line)
                    .split_whitespace()
                    .map(str::to_string),
            );
        }
    }
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub queries: usize,
    pub failures: usize,
}

/// Interactive read-eval-print loop: prompt, read a root and a mode, print the
/// chord table, repeat until the input ends.
#[derive(Debug)]
pub struct Session<R, W> {
    tokens: TokenReader<R>,
    out: W,
    analyzer: KeyAnalyzer,
    renderer: TableRenderer,
    show_prompt: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W, config: &AppConfig) -> Self {
        Self {
            tokens: TokenReader::new(input),
            out,
            analyzer: KeyAnalyzer::new(config.mode_policy),
            renderer: TableRenderer::new(config.format),
            show_prompt: config.prompt_enabled(),
        }
    }

    /// Runs until end-of-input. Per-query errors are reported on the output
    /// and the loop continues; IO failures abort the session.
    pub fn run(&mut self) -> Result<SessionSummary> {
        tracing::info!(
            policy = ?self.analyzer.policy(),
            format = ?self.renderer.format(),
            "session started"
        );
        let mut summary = SessionSummary::default();

        loop {
            if self.show_prompt {
                write!(self.out, "{PROMPT}")?;
                self.out.flush()?;
            }

            let Some(root) = self.tokens.next_token()? else {
                break;
            };
            summary.queries += 1;

            let Some(mode) = self.tokens.next_token()? else {
                summary.failures += 1;
                self.report(&ChordError::MalformedInput)?;
                break;
            };

            match self.analyzer.query(&root, &mode) {
                Ok(analysis) => self.renderer.render(&analysis, &mut self.out)?,
                Err(err) if err.is_recoverable() => {
                    summary.failures += 1;
                    self.report(&err)?;
                }
                Err(err) => return Err(err),
            }
            self.out.flush()?;
        }

        tracing::info!(
            queries = summary.queries,
            failures = summary.failures,
            "session finished"
        );
        Ok(summary)
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn report(&mut self, err: &ChordError) -> Result<()> {
        tracing::warn!(error = %err, "query failed");
        self.renderer.render_error(err, &mut self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
