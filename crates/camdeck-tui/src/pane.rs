//! Retained device-card list backing the left pane.
//!
//! Implements [`CardPane`] over a plain `Vec` of card view-models. The
//! cursor (the highlighted row) is transient UI state hung off the pane,
//! not the cards — it tracks its card across reorders and clamps when
//! the card is removed, which is exactly the state-preservation the
//! reconciler's stable handles exist for.

use camdeck_core::{CardContent, CardPane};

/// One rendered card. The handle is the `id`, not the index — indices
/// shift as the reconciler reorders.
#[derive(Debug)]
pub struct CardView {
    id: u32,
    pub device_id: String,
    pub content: Option<CardContent>,
}

#[derive(Debug, Default)]
pub struct TuiCardPane {
    cards: Vec<CardView>,
    next_id: u32,
    /// Id of the highlighted card, if any.
    cursor: Option<u32>,
}

impl TuiCardPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[CardView] {
        &self.cards
    }

    /// Index of the highlighted row, for the list widget.
    pub fn cursor_index(&self) -> Option<usize> {
        let cursor = self.cursor?;
        self.cards.iter().position(|c| c.id == cursor)
    }

    /// Device id under the cursor.
    pub fn device_under_cursor(&self) -> Option<&str> {
        let index = self.cursor_index()?;
        Some(self.cards[index].device_id.as_str())
    }

    pub fn cursor_up(&mut self) {
        if let Some(current) = self.current_or_first() {
            self.cursor = Some(self.cards[current.saturating_sub(1)].id);
        }
    }

    pub fn cursor_down(&mut self) {
        if let Some(current) = self.current_or_first() {
            let next = (current + 1).min(self.cards.len() - 1);
            self.cursor = Some(self.cards[next].id);
        }
    }

    /// Put the cursor on a specific device (e.g. after auto-selection).
    pub fn cursor_to(&mut self, device_id: &str) {
        if let Some(card) = self.cards.iter().find(|c| c.device_id == device_id) {
            self.cursor = Some(card.id);
        }
    }

    fn current_or_first(&mut self) -> Option<usize> {
        if self.cards.is_empty() {
            self.cursor = None;
            return None;
        }
        Some(self.cursor_index().unwrap_or(0))
    }
}

impl CardPane for TuiCardPane {
    type Handle = u32;

    fn create_card(&mut self, device_id: &str) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.cards.push(CardView {
            id,
            device_id: device_id.to_owned(),
            content: None,
        });
        // First card ever: give the cursor somewhere to be.
        if self.cursor.is_none() {
            self.cursor = Some(id);
        }
        id
    }

    fn apply(&mut self, card: &u32, content: &CardContent) {
        if let Some(view) = self.cards.iter_mut().find(|c| c.id == *card) {
            view.content = Some(content.clone());
        }
    }

    fn card_at(&self, index: usize) -> Option<u32> {
        self.cards.get(index).map(|c| c.id)
    }

    fn move_card(&mut self, card: &u32, index: usize) {
        if let Some(pos) = self.cards.iter().position(|c| c.id == *card) {
            let view = self.cards.remove(pos);
            let index = index.min(self.cards.len());
            self.cards.insert(index, view);
        }
    }

    fn remove_card(&mut self, card: &u32) {
        let removed_index = self.cards.iter().position(|c| c.id == *card);
        self.cards.retain(|c| c.id != *card);
        // Cursor followed the removed card: clamp to a neighbour.
        if self.cursor == Some(*card) {
            self.cursor = removed_index
                .map(|i| i.min(self.cards.len().saturating_sub(1)))
                .and_then(|i| self.cards.get(i))
                .map(|c| c.id);
        }
    }
}
