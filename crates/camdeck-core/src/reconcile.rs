//! Device-card reconciliation.
//!
//! Each refresh delivers the full device list in registry order. Instead
//! of rebuilding the pane, the reconciler diffs the list against the
//! cards it already owns: existing cards are updated in place, new ones
//! created, vanished ones removed, and positions fixed up so pane order
//! matches list order. Card identity is stable across refreshes, so any
//! transient UI state a front end hangs off a card survives.

use indexmap::IndexMap;

use camdeck_api::DeviceRecord;
use tracing::debug;

use crate::card::{CardContent, CardPane};

/// Owns the `deviceId` → card-handle map for one pane.
pub struct CardReconciler<P: CardPane> {
    cards: IndexMap<String, P::Handle>,
}

impl<P: CardPane> Default for CardReconciler<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: CardPane> CardReconciler<P> {
    pub fn new() -> Self {
        Self {
            cards: IndexMap::new(),
        }
    }

    /// Number of cards currently rendered.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The handle for a device's card, if it is rendered.
    pub fn card_for(&self, device_id: &str) -> Option<&P::Handle> {
        self.cards.get(device_id)
    }

    /// Reconcile the pane against a freshly fetched device list.
    ///
    /// `now` is the current epoch-seconds instant used for the
    /// online/offline classification. Records without a usable id are
    /// skipped. Duplicate ids keep the last occurrence's content.
    pub fn reconcile(&mut self, pane: &mut P, devices: &[DeviceRecord], now: i64) {
        let mut seen: Vec<&str> = Vec::with_capacity(devices.len());

        // Upsert pass: update in place, create missing.
        for record in devices {
            let id = record.device_id.as_str();
            if id.is_empty() {
                continue;
            }
            let card = match self.cards.get(id) {
                Some(card) => card.clone(),
                None => {
                    debug!(device_id = id, "creating card");
                    let card = pane.create_card(id);
                    self.cards.insert(id.to_owned(), card.clone());
                    card
                }
            };
            pane.apply(&card, &CardContent::from_record(record, now));
            if !seen.contains(&id) {
                seen.push(id);
            }
        }

        // Prune pass: drop cards whose device vanished from the list.
        let stale: Vec<String> = self
            .cards
            .keys()
            .filter(|id| !seen.contains(&id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            if let Some(card) = self.cards.shift_remove(&id) {
                debug!(device_id = %id, "removing card");
                pane.remove_card(&card);
            }
        }

        // Order pass: move each card into its list position. Already-placed
        // cards are left untouched so an unchanged list causes zero moves.
        for (index, id) in seen.iter().enumerate() {
            let Some(card) = self.cards.get(*id) else {
                continue;
            };
            if pane.card_at(index).as_ref() != Some(card) {
                pane.move_card(card, index);
            }
        }
        self.cards.sort_by_cached_key(|id, _| {
            seen.iter().position(|s| s == id).unwrap_or(usize::MAX)
        });
    }

    /// Remove every card from the pane.
    pub fn clear(&mut self, pane: &mut P) {
        for (_, card) in self.cards.drain(..) {
            pane.remove_card(&card);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: &str) -> DeviceRecord {
        DeviceRecord {
            device_id: id.into(),
            ..DeviceRecord::default()
        }
    }

    /// In-memory pane tracking card order and per-card write counts.
    #[derive(Default)]
    struct FakePane {
        order: Vec<u32>,
        contents: Vec<(u32, CardContent)>,
        next_id: u32,
        moves: usize,
        creates: usize,
        removes: usize,
    }

    impl CardPane for FakePane {
        type Handle = u32;

        fn create_card(&mut self, _device_id: &str) -> u32 {
            let handle = self.next_id;
            self.next_id += 1;
            self.creates += 1;
            self.order.push(handle);
            handle
        }

        fn apply(&mut self, card: &u32, content: &CardContent) {
            self.contents.retain(|(h, _)| h != card);
            self.contents.push((*card, content.clone()));
        }

        fn card_at(&self, index: usize) -> Option<u32> {
            self.order.get(index).copied()
        }

        fn move_card(&mut self, card: &u32, index: usize) {
            self.moves += 1;
            self.order.retain(|h| h != card);
            let index = index.min(self.order.len());
            self.order.insert(index, *card);
        }

        fn remove_card(&mut self, card: &u32) {
            self.removes += 1;
            self.order.retain(|h| h != card);
            self.contents.retain(|(h, _)| h != card);
        }
    }

    impl FakePane {
        fn ids_in_order(&self, rec: &CardReconciler<Self>) -> Vec<String> {
            self.order
                .iter()
                .map(|h| {
                    rec.cards
                        .iter()
                        .find(|(_, card)| *card == h)
                        .map(|(id, _)| id.clone())
                        .unwrap_or_default()
                })
                .collect()
        }
    }

    #[test]
    fn creates_updates_and_removes() {
        let mut pane = FakePane::default();
        let mut rec = CardReconciler::new();

        rec.reconcile(&mut pane, &[record("a"), record("b")], 0);
        assert_eq!(pane.creates, 2);
        assert_eq!(rec.len(), 2);

        rec.reconcile(&mut pane, &[record("b")], 0);
        assert_eq!(pane.removes, 1);
        assert_eq!(rec.len(), 1);
        assert!(rec.card_for("a").is_none());
        assert!(rec.card_for("b").is_some());
        assert_eq!(pane.order.len(), 1);
    }

    #[test]
    fn identity_survives_refresh() {
        let mut pane = FakePane::default();
        let mut rec = CardReconciler::new();

        rec.reconcile(&mut pane, &[record("a"), record("b")], 0);
        let a_before = *rec.card_for("a").expect("card a");

        let mut a2 = record("a");
        a2.ip = Some("10.0.0.9".into());
        rec.reconcile(&mut pane, &[a2, record("b")], 0);

        // Same handle, updated content, no churn.
        assert_eq!(*rec.card_for("a").expect("card a"), a_before);
        assert_eq!(pane.creates, 2);
        assert_eq!(pane.removes, 0);
        let (_, content) = pane
            .contents
            .iter()
            .find(|(h, _)| *h == a_before)
            .expect("content for a");
        assert_eq!(content.ip, "IP: 10.0.0.9");
    }

    #[test]
    fn unchanged_list_causes_no_moves() {
        let mut pane = FakePane::default();
        let mut rec = CardReconciler::new();
        let list = [record("a"), record("b"), record("c")];

        rec.reconcile(&mut pane, &list, 0);
        let moves_after_first = pane.moves;
        rec.reconcile(&mut pane, &list, 0);
        assert_eq!(pane.moves, moves_after_first);
    }

    #[test]
    fn reorder_matches_list_order() {
        let mut pane = FakePane::default();
        let mut rec = CardReconciler::new();

        rec.reconcile(&mut pane, &[record("a"), record("b"), record("c")], 0);
        rec.reconcile(&mut pane, &[record("c"), record("a"), record("b")], 0);

        assert_eq!(pane.ids_in_order(&rec), vec!["c", "a", "b"]);
        // Cards were reordered, not recreated.
        assert_eq!(pane.creates, 3);
        assert_eq!(pane.removes, 0);
    }

    #[test]
    fn blank_ids_are_skipped() {
        let mut pane = FakePane::default();
        let mut rec = CardReconciler::new();

        rec.reconcile(&mut pane, &[record(""), record("a")], 0);
        assert_eq!(rec.len(), 1);
        assert_eq!(pane.creates, 1);
    }

    #[test]
    fn duplicate_ids_keep_one_card() {
        let mut pane = FakePane::default();
        let mut rec = CardReconciler::new();

        let mut dup = record("a");
        dup.ip = Some("10.0.0.2".into());
        rec.reconcile(&mut pane, &[record("a"), dup, record("b")], 0);

        assert_eq!(rec.len(), 2);
        assert_eq!(pane.creates, 2);
        // Last occurrence wins.
        let handle = *rec.card_for("a").expect("card a");
        let (_, content) = pane
            .contents
            .iter()
            .find(|(h, _)| *h == handle)
            .expect("content for a");
        assert_eq!(content.ip, "IP: 10.0.0.2");
    }

    #[test]
    fn clear_empties_pane_and_map() {
        let mut pane = FakePane::default();
        let mut rec = CardReconciler::new();

        rec.reconcile(&mut pane, &[record("a"), record("b")], 0);
        rec.clear(&mut pane);

        assert!(rec.is_empty());
        assert!(pane.order.is_empty());
        assert_eq!(pane.removes, 2);
    }
}
