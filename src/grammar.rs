//! The catch-all grammar handler.
//!
//! This module contains the bridge between the host's recognition callbacks
//! and the interpretation sink: it registers a grammar that matches any
//! utterance, and forwards every ranked interpretation the host reports for
//! each recognition event.

use log::{debug, warn};

use crate::error::Error;
use crate::host::{GrammarHost, RecognitionResults};
use crate::sink::{InterpretationSink, Payload};
use crate::text::decode_word;

/// Grammar specification matching any utterance: one exported rule over an
/// empty word list.
pub const CATCH_ALL_SPEC: &str = "<start> exported = {emptyList};";

/// Ceiling on ranked alternatives collected per utterance. Exhaustion of the
/// results object is the normal termination condition; the ceiling only
/// bounds a misbehaving host.
pub const MAX_ALTERNATIVES: usize = 100;

/// Bridges host recognition callbacks to an interpretation sink.
///
/// Lifecycle: construct, [`initialize`](Self::initialize) before the host
/// delivers any recognition event, then [`unload`](Self::unload) to
/// deregister. The handler owns its host handle and sink; no global state.
pub struct CatchAllGrammar<H, S> {
    host: H,
    sink: S,
    loaded: bool,
}

impl<H: GrammarHost, S: InterpretationSink> CatchAllGrammar<H, S> {
    pub fn new(host: H, sink: S) -> Self {
        Self {
            host,
            sink,
            loaded: false,
        }
    }

    /// Registers the catch-all grammar in all-results mode and activates
    /// every rule.
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.host.load_grammar(CATCH_ALL_SPEC, true)?;
        self.host.activate_all()?;
        self.loaded = true;
        debug!("Catch-all grammar registered and activated");
        Ok(())
    }

    /// Host callback for one recognized utterance.
    ///
    /// Collects the ranked interpretations and delivers them to the sink,
    /// exactly once per event. An utterance with no retrievable alternatives
    /// still produces an empty payload.
    pub fn on_recognition(&mut self, results: &dyn RecognitionResults) -> Result<(), Error> {
        let interpretations = collect_interpretations(results);
        self.sink.deliver(Payload { interpretations })
    }

    /// Deregisters the grammar from the host. Calling it again is a no-op.
    pub fn unload(&mut self) -> Result<(), Error> {
        if !self.loaded {
            return Ok(());
        }
        // Marked unloaded up front so a failed deregistration is not retried.
        self.loaded = false;
        self.host.unload_grammar()?;
        debug!("Catch-all grammar deregistered");
        Ok(())
    }
}

/// Walks the ranked alternatives of one results object, best first.
///
/// Stops at the first index with no alternative. A host failure is logged
/// and treated the same way: collection stops, and whatever was gathered so
/// far is still forwarded.
fn collect_interpretations(results: &dyn RecognitionResults) -> Vec<Vec<String>> {
    let mut interpretations = Vec::new();
    for index in 0..MAX_ALTERNATIVES {
        match results.words(index) {
            Ok(Some(words)) => {
                interpretations.push(words.iter().map(|word| decode_word(word)).collect());
            }
            Ok(None) => break,
            Err(err) => {
                warn!("Fetching alternative {index}: {err}");
                break;
            }
        }
    }
    interpretations
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[derive(Default)]
    struct FakeHost {
        loaded: Option<(String, bool)>,
        activated: bool,
        unload_calls: usize,
    }

    impl GrammarHost for FakeHost {
        fn load_grammar(&mut self, spec: &str, all_results: bool) -> anyhow::Result<()> {
            self.loaded = Some((spec.to_string(), all_results));
            Ok(())
        }
        fn activate_all(&mut self) -> anyhow::Result<()> {
            self.activated = true;
            Ok(())
        }
        fn unload_grammar(&mut self) -> anyhow::Result<()> {
            self.unload_calls += 1;
            Ok(())
        }
    }

    struct FakeResults {
        alternatives: Vec<Vec<Vec<u8>>>,
        fail_at: Option<usize>,
    }

    impl FakeResults {
        fn new(alternatives: &[&[&str]]) -> Self {
            Self {
                alternatives: alternatives
                    .iter()
                    .map(|words| words.iter().map(|w| w.as_bytes().to_vec()).collect())
                    .collect(),
                fail_at: None,
            }
        }
    }

    impl RecognitionResults for FakeResults {
        fn words(&self, index: usize) -> anyhow::Result<Option<Vec<Vec<u8>>>> {
            if self.fail_at == Some(index) {
                return Err(anyhow!("results object gone"));
            }
            Ok(self.alternatives.get(index).cloned())
        }
    }

    #[derive(Default)]
    struct MemorySink(Vec<Vec<Vec<String>>>);

    impl InterpretationSink for MemorySink {
        fn deliver(&mut self, payload: Payload) -> Result<(), Error> {
            self.0.push(payload.interpretations);
            Ok(())
        }
    }

    fn words(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_initialize_registers_catch_all() {
        let mut handler = CatchAllGrammar::new(FakeHost::default(), MemorySink::default());
        handler.initialize().unwrap();
        assert_eq!(
            handler.host.loaded,
            Some((CATCH_ALL_SPEC.to_string(), true))
        );
        assert!(handler.host.activated);
    }

    #[test]
    fn test_collects_all_alternatives_in_order() {
        let results = FakeResults::new(&[
            &["turn", "on", "lights"],
            &["turn", "on", "light", "s"],
            &["return", "on", "lights"],
        ]);
        let collected = collect_interpretations(&results);
        assert_eq!(
            collected,
            vec![
                words(&["turn", "on", "lights"]),
                words(&["turn", "on", "light", "s"]),
                words(&["return", "on", "lights"]),
            ]
        );
    }

    #[test]
    fn test_collects_nothing_on_immediate_exhaustion() {
        let results = FakeResults::new(&[]);
        assert!(collect_interpretations(&results).is_empty());
    }

    #[test]
    fn test_collection_capped_at_ceiling() {
        let alternatives: Vec<Vec<Vec<u8>>> = (0..105)
            .map(|i| vec![format!("alt{i}").into_bytes()])
            .collect();
        let results = FakeResults {
            alternatives,
            fail_at: None,
        };
        let collected = collect_interpretations(&results);
        assert_eq!(collected.len(), MAX_ALTERNATIVES);
        assert_eq!(collected[0], words(&["alt0"]));
        assert_eq!(collected[99], words(&["alt99"]));
    }

    #[test]
    fn test_host_failure_truncates_collection() {
        let mut results = FakeResults::new(&[
            &["turn", "on", "lights"],
            &["return", "on", "lights"],
        ]);
        results.fail_at = Some(1);
        let collected = collect_interpretations(&results);
        assert_eq!(collected, vec![words(&["turn", "on", "lights"])]);
    }

    #[test]
    fn test_words_decoded_from_windows_1252() {
        let results = FakeResults {
            alternatives: vec![vec![b"caf\xe9".to_vec(), vec![0x80]]],
            fail_at: None,
        };
        let collected = collect_interpretations(&results);
        assert_eq!(collected, vec![words(&["caf\u{e9}", "\u{20ac}"])]);
    }

    #[test]
    fn test_recognition_delivers_one_payload_per_event() {
        let mut handler = CatchAllGrammar::new(FakeHost::default(), MemorySink::default());
        handler.initialize().unwrap();

        handler
            .on_recognition(&FakeResults::new(&[&["turn", "on", "lights"]]))
            .unwrap();
        handler.on_recognition(&FakeResults::new(&[])).unwrap();

        assert_eq!(handler.sink.0.len(), 2);
        assert_eq!(handler.sink.0[0], vec![words(&["turn", "on", "lights"])]);
        assert!(handler.sink.0[1].is_empty());
    }

    #[test]
    fn test_unload_is_idempotent() {
        let mut handler = CatchAllGrammar::new(FakeHost::default(), MemorySink::default());
        handler.initialize().unwrap();
        handler.unload().unwrap();
        handler.unload().unwrap();
        assert_eq!(handler.host.unload_calls, 1);
    }

    #[test]
    fn test_unload_before_initialize_is_noop() {
        let mut handler = CatchAllGrammar::new(FakeHost::default(), MemorySink::default());
        handler.unload().unwrap();
        assert_eq!(handler.host.unload_calls, 0);
    }
}
