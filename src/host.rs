//! Host grammar API.
//!
//! Grammar matching and the recognition engine live in the host application;
//! this crate only registers a grammar and consumes per-utterance results.
//! These traits capture the host capabilities the forwarder needs, so the
//! handler stays independent of any concrete host binding.

use anyhow::Result;

/// Grammar registration surface of the recognition host.
pub trait GrammarHost {
    /// Loads a grammar specification. With `all_results` set, the host
    /// reports every ranked alternative for an utterance instead of only
    /// the best one.
    fn load_grammar(&mut self, spec: &str, all_results: bool) -> Result<()>;

    /// Activates every rule of the loaded grammar.
    fn activate_all(&mut self) -> Result<()>;

    /// Deregisters the grammar from the host.
    fn unload_grammar(&mut self) -> Result<()>;
}

/// Per-utterance recognition results, indexed by rank.
pub trait RecognitionResults {
    /// Raw word bytes of the alternative ranked at `index` (0 = best).
    ///
    /// Returns `Ok(None)` once no alternative exists at `index`. `Err` means
    /// the host failed to produce an alternative that should exist.
    fn words(&self, index: usize) -> Result<Option<Vec<Vec<u8>>>>;
}
