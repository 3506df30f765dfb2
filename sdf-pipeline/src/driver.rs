use std::time::Instant;

use log::debug;
use sdf_parser::{Compound, ParserOptions};
use sdf_tokenizer::LineContext;

use crate::outcome::{Cancelled, ParseOutcome, SdfFile};
use crate::progress::{NoProgress, Progress, YieldClock, YieldPolicy};
use crate::reader::SdfReader;

/// Drives an [`SdfReader`] to the end of input, stopping at record
/// boundaries to talk to a [`Progress`] collaborator.
pub struct Driver<C, P>
where
    C: LineContext,
    P: Progress,
{
    reader: SdfReader<C>,
    progress: P,
    policy: YieldPolicy,
}

impl<C, P> Driver<C, P>
where
    C: LineContext,
    P: Progress,
{
    pub fn new(reader: SdfReader<C>, progress: P, policy: YieldPolicy) -> Self {
        Self {
            reader,
            progress,
            policy,
        }
    }

    /// Runs until the reader is exhausted, an error occurs or the
    /// collaborator cancels. Nothing is returned but the failure on error.
    pub fn run(mut self) -> ParseOutcome {
        let started = Instant::now();
        let total = self.reader.len();
        let mut clock = YieldClock::new(self.policy);
        let mut compounds = Vec::new();

        if self.progress.is_cancelled() {
            return Err(self.cancelled(compounds).into());
        }
        while let Some(compound) = self.reader.next() {
            compounds.push(compound?);
            if !clock.tick() {
                continue;
            }
            if self.progress.should_yield() {
                self.progress.report_progress(self.reader.offset(), total);
            }
            if self.progress.is_cancelled() {
                return Err(self.cancelled(compounds).into());
            }
        }

        self.progress.report_progress(total, total);
        debug!(
            "parsed {} records ({} bytes) in {:?}",
            compounds.len(),
            total,
            started.elapsed()
        );
        Ok(SdfFile { compounds })
    }

    fn cancelled(&self, compounds: Vec<Compound>) -> Cancelled {
        debug!(
            "parse cancelled after {} records at {}",
            compounds.len(),
            self.reader.position()
        );
        Cancelled {
            compounds,
            position: self.reader.position(),
        }
    }
}

/// Parses a whole SD file with default options.
pub fn parse_sdf(input: &str) -> ParseOutcome {
    parse_sdf_with(input, &ParserOptions::default(), YieldPolicy::default(), NoProgress)
}

/// Parses a whole SD file, consulting `progress` at record boundaries.
pub fn parse_sdf_with<P: Progress>(
    input: &str,
    options: &ParserOptions,
    policy: YieldPolicy,
    progress: P,
) -> ParseOutcome {
    let reader = SdfReader::new(input, options.clone());
    Driver::new(reader, progress, policy).run()
}
