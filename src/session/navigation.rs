//! Cursor over the upload batch.

use serde::Serialize;

/// Direction of a navigation command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

/// Tracks which image of the batch is current.
///
/// The cursor is kept inside `[0, batch_len - 1]`; moving past either end is
/// a silent no-op. With an empty batch the cursor stays at 0 and there is no
/// current image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Navigator {
    cursor: usize,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The item at the cursor.
    pub fn current<'a, T>(&self, batch: &'a [T]) -> Option<&'a T> {
        batch.get(self.cursor)
    }

    /// Moves one step back, stopping at the first item.
    pub fn previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves one step forward, stopping at the last item.
    pub fn next(&mut self, batch_len: usize) {
        self.cursor = (self.cursor + 1).min(batch_len.saturating_sub(1));
    }

    /// Applies `direction`.
    pub fn step(&mut self, direction: Direction, batch_len: usize) {
        match direction {
            Direction::Previous => self.previous(),
            Direction::Next => self.next(batch_len),
        }
        self.clamp(batch_len);
    }

    /// Pulls the cursor back into range after the batch changed size.
    pub fn clamp(&mut self, batch_len: usize) {
        self.cursor = self.cursor.min(batch_len.saturating_sub(1));
    }

    /// True when the cursor sits on the final item.
    pub fn is_at_last(&self, batch_len: usize) -> bool {
        batch_len > 0 && self.cursor == batch_len - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_at_start_is_noop() {
        let mut nav = Navigator::new();
        nav.previous();
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn next_stops_at_last_item() {
        let mut nav = Navigator::new();
        for _ in 0..10 {
            nav.next(3);
        }
        assert_eq!(nav.cursor(), 2);
        assert!(nav.is_at_last(3));
    }

    #[test]
    fn current_follows_cursor() {
        let batch = ["c.jpg", "b.jpg", "a.jpg"];
        let mut nav = Navigator::new();
        assert_eq!(nav.current(&batch), Some(&"c.jpg"));
        nav.step(Direction::Next, batch.len());
        nav.step(Direction::Next, batch.len());
        assert_eq!(nav.current(&batch), Some(&"a.jpg"));
        nav.step(Direction::Previous, batch.len());
        assert_eq!(nav.current(&batch), Some(&"b.jpg"));
    }

    #[test]
    fn clamp_after_batch_shrinks() {
        let mut nav = Navigator::new();
        nav.next(5);
        nav.next(5);
        nav.next(5);
        nav.clamp(2);
        assert_eq!(nav.cursor(), 1);
    }

    #[test]
    fn single_item_batch_never_moves() {
        let mut nav = Navigator::new();
        nav.step(Direction::Next, 1);
        nav.step(Direction::Previous, 1);
        assert_eq!(nav.cursor(), 0);
        assert!(nav.is_at_last(1));
    }
}
