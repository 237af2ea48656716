/// Advisory checkpoints reported while a job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Started,
    DirectoryReady,
    BackendDispatched,
    ArtifactsResolved,
    Finalizing,
    Done,
}

impl Milestone {
    /// Fraction of the job completed at this milestone.
    pub fn fraction(&self) -> f32 {
        match self {
            Self::Started => 0.0,
            Self::DirectoryReady => 0.1,
            Self::BackendDispatched => 0.2,
            Self::ArtifactsResolved => 0.7,
            Self::Finalizing => 0.9,
            Self::Done => 1.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Started => "Starting transcription...",
            Self::DirectoryReady => "Output directory ready",
            Self::BackendDispatched => "Calling transcription backend...",
            Self::ArtifactsResolved => "Processing output files...",
            Self::Finalizing => "Finalizing...",
            Self::Done => "Done",
        }
    }
}

/// Receives progress milestones. Implementations must return quickly; the
/// job does not wait on them and ignores whatever they do.
pub trait ProgressSink {
    fn report(&self, milestone: Milestone);
}

/// Discards all progress.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _milestone: Milestone) {}
}

/// Logs each milestone through tracing.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, milestone: Milestone) {
        tracing::info!(
            "[{:>3.0}%] {}",
            milestone.fraction() * 100.0,
            milestone.description()
        );
    }
}

impl<F> ProgressSink for F
where
    F: Fn(Milestone),
{
    fn report(&self, milestone: Milestone) {
        self(milestone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_fractions_increase() {
        let all = [
            Milestone::Started,
            Milestone::DirectoryReady,
            Milestone::BackendDispatched,
            Milestone::ArtifactsResolved,
            Milestone::Finalizing,
            Milestone::Done,
        ];
        for pair in all.windows(2) {
            assert!(pair[0].fraction() < pair[1].fraction());
        }
    }

    #[test]
    fn test_closure_sink() {
        let seen = RefCell::new(Vec::new());
        let sink = |m: Milestone| seen.borrow_mut().push(m);
        sink.report(Milestone::Started);
        sink.report(Milestone::Done);
        assert_eq!(*seen.borrow(), vec![Milestone::Started, Milestone::Done]);
    }
}
