//! [`SequenceBuilder`]: the utterance under construction.
//!
//! The builder owns an ordered list of pictograms (duplicates allowed) and
//! notifies registered [`SequenceObserver`]s after every mutation.  It never
//! fails: out-of-range removals are silently ignored.

use std::sync::Arc;

use crate::catalog::Pictogram;

// ---------------------------------------------------------------------------
// SequenceEvent / SequenceObserver
// ---------------------------------------------------------------------------

/// Change notification emitted by [`SequenceBuilder`].
#[derive(Debug, Clone, Copy)]
pub enum SequenceEvent<'a> {
    /// The user edited the sequence; any cached sentence is stale.
    Edited(&'a [Pictogram]),
    /// The sequence was swapped wholesale together with a known-good sentence.
    Restored {
        pictograms: &'a [Pictogram],
        text: &'a str,
    },
}

impl<'a> SequenceEvent<'a> {
    pub fn pictograms(&self) -> &'a [Pictogram] {
        match *self {
            SequenceEvent::Edited(pictograms) => pictograms,
            SequenceEvent::Restored { pictograms, .. } => pictograms,
        }
    }
}

/// Subscriber to sequence changes.
pub trait SequenceObserver: Send + Sync {
    fn on_sequence_event(&self, event: SequenceEvent<'_>);
}

// ---------------------------------------------------------------------------
// SequenceBuilder
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct SequenceBuilder {
    items: Vec<Pictogram>,
    observers: Vec<Arc<dyn SequenceObserver>>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; it receives every subsequent change.
    pub fn subscribe(&mut self, observer: Arc<dyn SequenceObserver>) {
        self.observers.push(observer);
    }

    /// Append a pictogram at the end.
    pub fn append(&mut self, pictogram: Pictogram) {
        self.items.push(pictogram);
        self.notify_edited();
    }

    /// Remove the element at `index`.  Out-of-range indices are a no-op and
    /// emit no event.
    pub fn remove_at(&mut self, index: usize) -> Option<Pictogram> {
        if index >= self.items.len() {
            log::debug!(
                "sequence: remove_at({index}) ignored, len = {}",
                self.items.len()
            );
            return None;
        }
        let removed = self.items.remove(index);
        self.notify_edited();
        Some(removed)
    }

    /// Empty the sequence.
    pub fn clear(&mut self) {
        self.items.clear();
        self.notify_edited();
    }

    /// Swap in `pictograms` together with the sentence already known for
    /// them.  Observers see a single [`SequenceEvent::Restored`].
    pub fn replace(&mut self, pictograms: Vec<Pictogram>, text: &str) {
        self.items = pictograms;
        let event = SequenceEvent::Restored {
            pictograms: &self.items,
            text,
        };
        for observer in &self.observers {
            observer.on_sequence_event(event);
        }
    }

    pub fn pictograms(&self) -> &[Pictogram] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn notify_edited(&self) {
        let event = SequenceEvent::Edited(&self.items);
        for observer in &self.observers {
            observer.on_sequence_event(event);
        }
    }
}

impl std::fmt::Debug for SequenceBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceBuilder")
            .field("items", &self.items)
            .field("observers", &self.observers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::catalog::builtin_pictograms;

    /// Records `(kind, ids)` for every event.
    #[derive(Default)]
    struct Recorder(Mutex<Vec<(&'static str, Vec<String>)>>);

    impl SequenceObserver for Recorder {
        fn on_sequence_event(&self, event: SequenceEvent<'_>) {
            let kind = match event {
                SequenceEvent::Edited(_) => "edited",
                SequenceEvent::Restored { .. } => "restored",
            };
            let ids = event.pictograms().iter().map(|p| p.id.clone()).collect();
            self.0.lock().unwrap().push((kind, ids));
        }
    }

    fn picto(n: usize) -> Pictogram {
        builtin_pictograms()[n].clone()
    }

    fn ids(builder: &SequenceBuilder) -> Vec<String> {
        builder.pictograms().iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn operations_match_reference_list() {
        // Deterministic pseudo-random op stream replayed against a Vec.
        let mut builder = SequenceBuilder::new();
        let mut reference: Vec<String> = Vec::new();
        let mut seed: u64 = 0x5eed;

        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let roll = (seed >> 33) as usize;
            match roll % 10 {
                0 => {
                    builder.clear();
                    reference.clear();
                }
                1..=3 => {
                    let index = roll % 8;
                    builder.remove_at(index);
                    if index < reference.len() {
                        reference.remove(index);
                    }
                }
                _ => {
                    let p = picto(roll % builtin_pictograms().len());
                    reference.push(p.id.clone());
                    builder.append(p);
                }
            }
            assert_eq!(ids(&builder), reference);
        }
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let mut builder = SequenceBuilder::new();
        builder.append(picto(0));
        builder.append(picto(1));
        builder.append(picto(0));
        assert_eq!(ids(&builder), vec!["need_1", "need_2", "need_1"]);
    }

    #[test]
    fn out_of_range_removal_is_silent() {
        let recorder = Arc::new(Recorder::default());
        let mut builder = SequenceBuilder::new();
        builder.subscribe(recorder.clone());

        builder.append(picto(0));
        assert!(builder.remove_at(5).is_none());
        assert_eq!(builder.len(), 1);
        assert_eq!(recorder.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn observers_see_every_mutation() {
        let recorder = Arc::new(Recorder::default());
        let mut builder = SequenceBuilder::new();
        builder.subscribe(recorder.clone());

        builder.append(picto(4));
        builder.append(picto(14));
        builder.remove_at(0);
        builder.replace(vec![picto(0)], "Ayuda.");
        builder.clear();

        let events = recorder.0.lock().unwrap();
        let kinds: Vec<&str> = events.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, vec!["edited", "edited", "edited", "restored", "edited"]);
        assert_eq!(events[1].1, vec!["act_1", "food_3"]);
        assert_eq!(events[3].1, vec!["need_1"]);
        assert!(events[4].1.is_empty());
    }

    #[test]
    fn labels_follow_utterance_order() {
        let mut builder = SequenceBuilder::new();
        builder.append(picto(4));
        builder.append(picto(14));
        let labels: Vec<&str> = builder.pictograms().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Quiero", "Agua"]);
    }
}
