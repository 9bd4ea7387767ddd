use std::fmt;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::board::edit::EditSession;

/// Size given to every card created by [`CardBoard::add_card`].
pub const DEFAULT_CARD_SIZE: Size = Size {
    width: 200.0,
    height: 100.0,
};

/// Bounds enforced by the resize surface.
pub const CARD_SIZE_LIMITS: SizeLimits = SizeLimits {
    min: Size {
        width: 100.0,
        height: 50.0,
    },
    max: Size {
        width: 500.0,
        height: 300.0,
    },
};

/// New cards land uniformly in `[0, extent)²`.
pub const DEFAULT_SPAWN_EXTENT: f64 = 400.0;

/// Number of characters shown before the ellipsis in a card preview.
pub const PREVIEW_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in canvas coordinates. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Inclusive min/max box for card dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    pub min: Size,
    pub max: Size,
}

impl SizeLimits {
    pub fn clamp(&self, size: Size) -> Size {
        Size {
            width: size.width.clamp(self.min.width, self.max.width),
            height: size.height.clamp(self.min.height, self.max.height),
        }
    }

    #[allow(dead_code)] // used by tests
    pub fn contains(&self, size: Size) -> bool {
        (self.min.width..=self.max.width).contains(&size.width)
            && (self.min.height..=self.max.height).contains(&size.height)
    }
}

/// A positioned, sized, text-bearing card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub text: String,
    pub position: Position,
    pub size: Size,
}

impl Card {
    pub fn new(id: CardId, text: impl Into<String>, position: Position, size: Size) -> Self {
        Self {
            id,
            text: text.into(),
            position,
            size,
        }
    }

    pub fn center(&self) -> Position {
        Position {
            x: self.position.x + self.size.width / 2.0,
            y: self.position.y + self.size.height / 2.0,
        }
    }

}

/// Chain link between two consecutive cards, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub from: usize,
    pub to: usize,
}

/// A link with its geometry: center of `from` to center of `to`.
/// The arrow head belongs at `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkSegment {
    pub link: Link,
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    #[error("no card at index {index} (board holds {len})")]
    NoSuchCard { index: usize, len: usize },
    #[error("geometry ({x}, {y}) must be finite and non-negative")]
    InvalidGeometry { x: f64, y: f64 },
}

/// The card collection plus transient UI state.
///
/// All mutation goes through the methods below; each one bumps
/// [`CardBoard::revision`] so a renderer can tell when it is stale.
#[derive(Debug)]
pub struct CardBoard {
    cards: Vec<Card>,
    next_id: u64,
    editing: Option<EditSession>,
    detail: Option<String>,
    revision: u64,
    spawn_extent: f64,
    rng: StdRng,
}

impl CardBoard {
    /// A board holding the two seed cards, with positions for new cards
    /// drawn from `rng`.
    pub fn new(rng: StdRng) -> Self {
        let mut board = Self::empty(rng);
        board.push_card(
            "This is a card with some text.",
            Position::new(50.0, 50.0),
            DEFAULT_CARD_SIZE,
        );
        board.push_card(
            "Another card with more text.",
            Position::new(300.0, 150.0),
            DEFAULT_CARD_SIZE,
        );
        board.revision = 0;
        board
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// A board with no cards at all.
    pub fn empty(rng: StdRng) -> Self {
        Self {
            cards: Vec::new(),
            next_id: 1,
            editing: None,
            detail: None,
            revision: 0,
            spawn_extent: DEFAULT_SPAWN_EXTENT,
            rng,
        }
    }

    pub fn with_spawn_extent(mut self, extent: f64) -> Self {
        if extent.is_finite() && extent > 0.0 {
            self.spawn_extent = extent;
        } else {
            warn!("ignoring spawn extent {extent}; keeping {}", self.spawn_extent);
        }
        self
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Append a card with the default size and text at a random position.
    /// Returns the index of the new card.
    pub fn add_card(&mut self) -> usize {
        let id = self.next_id;
        let x = self.rng.gen_range(0.0..self.spawn_extent);
        let y = self.rng.gen_range(0.0..self.spawn_extent);
        let index = self.push_card(
            format!("This is card number {id}. Here is some more dummy text to show."),
            Position::new(x, y),
            DEFAULT_CARD_SIZE,
        );
        debug!("added card {id} at ({x:.1}, {y:.1})");
        index
    }

    fn push_card(&mut self, text: impl Into<String>, position: Position, size: Size) -> usize {
        let id = CardId(self.next_id);
        self.next_id += 1;
        self.cards.push(Card::new(id, text, position, size));
        self.bump();
        self.cards.len() - 1
    }

    /// Commit the end of a drag gesture. No clamping against canvas edges.
    pub fn move_card(&mut self, index: usize, x: f64, y: f64) -> Result<(), BoardError> {
        check_geometry(x, y)?;
        let card = self.card_mut(index)?;
        card.position = Position::new(x, y);
        let id = card.id;
        self.bump();
        info!("moved card {id} to ({x:.1}, {y:.1})");
        Ok(())
    }

    /// Commit the end of a resize gesture. The resize surface has already
    /// applied [`CARD_SIZE_LIMITS`].
    pub fn resize_card(&mut self, index: usize, width: f64, height: f64) -> Result<(), BoardError> {
        check_geometry(width, height)?;
        let card = self.card_mut(index)?;
        card.size = Size::new(width, height);
        let id = card.id;
        self.bump();
        info!("resized card {id} to {width:.0}x{height:.0}");
        Ok(())
    }

    /// Enter edit mode for `index`. Any draft for another card is dropped.
    pub fn begin_edit(&mut self, index: usize) -> Result<(), BoardError> {
        let card = self
            .cards
            .get(index)
            .ok_or(BoardError::NoSuchCard {
                index,
                len: self.cards.len(),
            })?;
        let session = EditSession::new(index, card.text.clone());
        if let Some(previous) = self.editing.replace(session)
            && previous.index != index
        {
            debug!("abandoned unsaved draft for card index {}", previous.index);
        }
        self.bump();
        Ok(())
    }

    /// Commit the draft into the edited card and leave edit mode.
    ///
    /// Returns `None` without touching anything when no card is being edited.
    pub fn save_edit(&mut self) -> Option<CardId> {
        let session = self.editing.take()?;
        let index = session.index;
        let card = self.cards.get_mut(index)?;
        card.text = session.into_buffer();
        let id = card.id;
        self.bump();
        info!("saved text of card {id}");
        Some(id)
    }

    /// Leave edit mode without committing. Returns whether a session was open.
    pub fn cancel_edit(&mut self) -> bool {
        if self.editing.take().is_some() {
            self.bump();
            return true;
        }
        false
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// Apply `f` to the open edit session, if any.
    pub fn update_edit<R>(&mut self, f: impl FnOnce(&mut EditSession) -> R) -> Option<R> {
        let session = self.editing.as_mut()?;
        let out = f(session);
        self.bump();
        Some(out)
    }

    pub fn show_detail(&mut self, text: impl Into<String>) {
        self.detail = Some(text.into());
        self.bump();
    }

    pub fn close_detail(&mut self) {
        if self.detail.take().is_some() {
            self.bump();
        }
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Consecutive index pairs in insertion order.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        (1..self.cards.len()).map(|to| Link { from: to - 1, to })
    }

    pub fn link_segments(&self) -> Vec<LinkSegment> {
        self.links()
            .map(|link| LinkSegment {
                link,
                start: self.cards[link.from].center(),
                end: self.cards[link.to].center(),
            })
            .collect()
    }

    fn card_mut(&mut self, index: usize) -> Result<&mut Card, BoardError> {
        let len = self.cards.len();
        self.cards
            .get_mut(index)
            .ok_or(BoardError::NoSuchCard { index, len })
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}

/// First [`PREVIEW_CHARS`] characters of `text` followed by an ellipsis.
pub fn preview(text: &str) -> String {
    let mut out = text.chars().take(PREVIEW_CHARS).collect::<String>();
    out.push_str("...");
    out
}

fn check_geometry(a: f64, b: f64) -> Result<(), BoardError> {
    if a.is_finite() && b.is_finite() && a >= 0.0 && b >= 0.0 {
        Ok(())
    } else {
        Err(BoardError::InvalidGeometry { x: a, y: b })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> CardBoard {
        CardBoard::seeded(7)
    }

    #[test]
    fn starts_with_two_seed_cards() {
        let b = board();
        assert_eq!(b.len(), 2);
        assert_eq!(b.cards()[0].id, CardId(1));
        assert_eq!(b.cards()[0].text, "This is a card with some text.");
        assert_eq!(b.cards()[0].position, Position::new(50.0, 50.0));
        assert_eq!(b.cards()[1].id, CardId(2));
        assert_eq!(b.cards()[1].position, Position::new(300.0, 150.0));
        assert_eq!(b.revision(), 0);
        assert!(b.editing().is_none());
        assert!(b.detail().is_none());
    }

    #[test]
    fn add_card_grows_by_one_each_time_with_default_size() {
        let mut b = board();
        for n in 1..=25 {
            let idx = b.add_card();
            assert_eq!(b.len(), 2 + n);
            assert_eq!(idx, b.len() - 1);
            let card = &b.cards()[idx];
            assert_eq!(card.size, DEFAULT_CARD_SIZE);
            assert!((0.0..DEFAULT_SPAWN_EXTENT).contains(&card.position.x));
            assert!((0.0..DEFAULT_SPAWN_EXTENT).contains(&card.position.y));
        }
    }

    #[test]
    fn added_card_ids_are_unique_and_monotonic() {
        let mut b = board();
        for _ in 0..10 {
            b.add_card();
        }
        let ids = b.cards().iter().map(|c| c.id.0).collect::<Vec<_>>();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn spawn_extent_bounds_new_positions() {
        let mut b = board().with_spawn_extent(10.0);
        for _ in 0..20 {
            let idx = b.add_card();
            let p = b.cards()[idx].position;
            assert!(p.x < 10.0 && p.y < 10.0);
        }
    }

    #[test]
    fn invalid_spawn_extent_is_ignored() {
        let mut b = board().with_spawn_extent(f64::NAN);
        let idx = b.add_card();
        assert!(b.cards()[idx].position.x < DEFAULT_SPAWN_EXTENT);
    }

    #[test]
    fn same_seed_gives_same_positions() {
        let mut a = CardBoard::seeded(42);
        let mut b = CardBoard::seeded(42);
        a.add_card();
        b.add_card();
        assert_eq!(a.cards()[2].position, b.cards()[2].position);
    }

    #[test]
    fn move_card_changes_only_that_position() {
        let mut b = board();
        b.add_card();
        let before = b.cards().to_vec();
        b.move_card(1, 12.5, 900.0).unwrap();

        let moved = &b.cards()[1];
        assert_eq!(moved.position, Position::new(12.5, 900.0));
        assert_eq!(moved.id, before[1].id);
        assert_eq!(moved.text, before[1].text);
        assert_eq!(moved.size, before[1].size);
        assert_eq!(b.cards()[0], before[0]);
        assert_eq!(b.cards()[2], before[2]);
    }

    #[test]
    fn move_card_rejects_bad_index_and_geometry() {
        let mut b = board();
        assert_eq!(
            b.move_card(5, 1.0, 1.0),
            Err(BoardError::NoSuchCard { index: 5, len: 2 })
        );
        assert!(matches!(
            b.move_card(0, f64::INFINITY, 1.0),
            Err(BoardError::InvalidGeometry { .. })
        ));
        assert!(matches!(
            b.move_card(0, -1.0, 1.0),
            Err(BoardError::InvalidGeometry { .. })
        ));
        assert_eq!(b.cards()[0].position, Position::new(50.0, 50.0));
        assert_eq!(b.revision(), 0);
    }

    #[test]
    fn resize_card_changes_only_that_size() {
        let mut b = board();
        let before = b.cards().to_vec();
        b.resize_card(0, 320.0, 75.0).unwrap();

        let resized = &b.cards()[0];
        assert_eq!(resized.size, Size::new(320.0, 75.0));
        assert_eq!(resized.position, before[0].position);
        assert_eq!(resized.text, before[0].text);
        assert_eq!(b.cards()[1], before[1]);
    }

    #[test]
    fn begin_then_save_commits_buffer() {
        let mut b = board();
        b.begin_edit(1).unwrap();
        assert_eq!(b.editing().unwrap().buffer(), "Another card with more text.");
        b.update_edit(|s| s.set_text("hello")).unwrap();

        assert_eq!(b.save_edit(), Some(CardId(2)));
        assert_eq!(b.cards()[1].text, "hello");
        assert!(b.editing().is_none());
        assert_eq!(b.cards()[0].text, "This is a card with some text.");
    }

    #[test]
    fn begin_edit_on_other_card_discards_draft() {
        let mut b = board();
        b.begin_edit(0).unwrap();
        b.update_edit(|s| s.set_text("never saved")).unwrap();
        b.begin_edit(1).unwrap();

        assert_eq!(b.editing().map(|s| s.index), Some(1));
        assert_eq!(b.editing().unwrap().buffer(), "Another card with more text.");
        b.save_edit();
        assert_eq!(b.cards()[0].text, "This is a card with some text.");
    }

    #[test]
    fn begin_edit_rejects_bad_index() {
        let mut b = board();
        assert!(b.begin_edit(9).is_err());
        assert!(b.editing().is_none());
    }

    #[test]
    fn save_without_edit_is_guarded_noop() {
        let mut b = board();
        let before = b.cards().to_vec();
        let rev = b.revision();
        assert_eq!(b.save_edit(), None);
        assert_eq!(b.cards(), before.as_slice());
        assert_eq!(b.revision(), rev);
    }

    #[test]
    fn cancel_edit_keeps_text() {
        let mut b = board();
        b.begin_edit(0).unwrap();
        b.update_edit(|s| s.insert_char('!'));
        assert!(b.cancel_edit());
        assert!(!b.cancel_edit());
        assert_eq!(b.cards()[0].text, "This is a card with some text.");
        assert!(b.update_edit(|s| s.insert_char('x')).is_none());
    }

    #[test]
    fn detail_overlay_is_independent_of_cards() {
        let mut b = board();
        b.show_detail("foo");
        assert_eq!(b.detail(), Some("foo"));

        b.begin_edit(0).unwrap();
        b.update_edit(|s| s.set_text("changed"));
        b.save_edit();
        assert_eq!(b.detail(), Some("foo"));

        b.close_detail();
        assert_eq!(b.detail(), None);
    }

    #[test]
    fn every_transition_bumps_revision() {
        let mut b = board();
        let mut last = b.revision();
        let mut step = |b: &CardBoard| {
            assert!(b.revision() > last);
            last = b.revision();
        };
        b.add_card();
        step(&b);
        b.move_card(0, 1.0, 1.0).unwrap();
        step(&b);
        b.resize_card(0, 100.0, 50.0).unwrap();
        step(&b);
        b.begin_edit(0).unwrap();
        step(&b);
        b.save_edit();
        step(&b);
        b.show_detail("x");
        step(&b);
        b.close_detail();
        step(&b);
    }

    #[test]
    fn add_card_scenario_links_chain() {
        let mut b = board();
        let idx = b.add_card();
        assert_eq!(b.len(), 3);
        let card = &b.cards()[idx];
        assert_eq!(card.id, CardId(3));
        assert!(card.text.contains('3'));

        let links = b.links().collect::<Vec<_>>();
        assert_eq!(
            links,
            vec![Link { from: 0, to: 1 }, Link { from: 1, to: 2 }]
        );
        assert!(links.iter().all(|l| l.from != 2));
    }

    #[test]
    fn link_segments_run_center_to_center() {
        let b = board();
        let segments = b.link_segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, Position::new(150.0, 100.0));
        assert_eq!(segments[0].end, Position::new(400.0, 200.0));
    }

    #[test]
    fn single_or_empty_board_has_no_links() {
        let mut b = CardBoard::empty(StdRng::seed_from_u64(1));
        assert_eq!(b.links().count(), 0);
        b.add_card();
        assert_eq!(b.links().count(), 0);
        assert_eq!(b.cards()[0].id, CardId(1));
    }

    #[test]
    fn preview_truncates_by_chars() {
        assert_eq!(preview("This is a card with some text."), "This is a card with ...");
        assert_eq!(preview("short"), "short...");
        assert_eq!(preview("ééééééééééééééééééééé"), "éééééééééééééééééééé...");
    }

    #[test]
    fn size_limits_clamp_both_axes() {
        let clamped = CARD_SIZE_LIMITS.clamp(Size::new(20.0, 999.0));
        assert_eq!(clamped, Size::new(100.0, 300.0));
        assert!(CARD_SIZE_LIMITS.contains(DEFAULT_CARD_SIZE));
        assert!(!CARD_SIZE_LIMITS.contains(Size::new(501.0, 100.0)));
    }
}
