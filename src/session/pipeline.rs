//! Preview derivation state machine.
//!
//! Every change that affects the preview issues a [`PreviewRequest`] tagged
//! with a fresh sequence number. Completions may come back in any order; only
//! the completion carrying the most recently issued sequence number is allowed
//! to touch the stored markup.

use crate::convert::ConvertError;

/// Whether a conversion for the newest input is still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewState {
    #[default]
    Idle,
    Recomputing,
}

/// A conversion the runtime must hand to the markdown collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub seq: u64,
    pub source: String,
}

/// The collaborator's answer to a [`PreviewRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewCompletion {
    pub seq: u64,
    pub result: Result<String, ConvertError>,
}

impl PreviewCompletion {
    pub const fn new(seq: u64, result: Result<String, ConvertError>) -> Self {
        Self { seq, result }
    }
}

/// What happened to a completion handed to [`PreviewPipeline::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The markup now reflects this completion.
    Applied,
    /// A newer request was issued after this one; the result was dropped.
    Stale,
    /// The newest request failed; the previous markup is kept.
    Failed(ConvertError),
}

#[derive(Debug, Default)]
pub struct PreviewPipeline {
    markup: String,
    state: PreviewState,
    /// Sequence number of the most recently issued request (0 = none yet).
    latest_seq: u64,
    last_error: Option<ConvertError>,
}

impl PreviewPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request for `source`, superseding any request in flight.
    pub fn schedule(&mut self, source: impl Into<String>) -> PreviewRequest {
        self.latest_seq += 1;
        self.state = PreviewState::Recomputing;
        PreviewRequest {
            seq: self.latest_seq,
            source: source.into(),
        }
    }

    /// Apply a completion if it answers the newest request.
    pub fn resolve(&mut self, completion: PreviewCompletion) -> Resolution {
        if completion.seq != self.latest_seq || self.state == PreviewState::Idle {
            return Resolution::Stale;
        }
        self.state = PreviewState::Idle;
        match completion.result {
            Ok(markup) => {
                self.markup = markup;
                self.last_error = None;
                Resolution::Applied
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                Resolution::Failed(err)
            }
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub const fn state(&self) -> PreviewState {
        self.state
    }

    pub const fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Error from the newest request, cleared by the next successful one.
    pub const fn last_error(&self) -> Option<&ConvertError> {
        self.last_error.as_ref()
    }
}
