//! Reading list store
//!
//! The `ReadingList` holds the books a user has chosen to keep, in the order
//! they were added, with at most one entry per title.
//!
//! ## Snapshots
//!
//! Every mutation that changes the list publishes an immutable
//! `ReadingListSnapshot` on a watch channel. Consumers call `subscribe()`
//! and redraw when the receiver reports a change. Publishing happens before
//! the mutating call returns, so `borrow()` on any receiver already sees the
//! new contents.
//!
//! ## Usage
//!
//! ```ignore
//! let mut list = ReadingList::new();
//! let mut rx = list.subscribe();
//!
//! list.add_book(book);
//! assert_eq!(rx.borrow_and_update().count(), 1);
//! ```
//!
//! Callers on other threads go through `spawn_reading_list_task`, which
//! moves the store into a single owning task and accepts commands over a
//! channel.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::models::Book;

/// Immutable view of the reading list at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingListSnapshot {
    /// Number of effective mutations applied before this snapshot
    pub version: u64,
    /// Books in insertion order
    pub books: Arc<[Book]>,
}

impl Default for ReadingListSnapshot {
    fn default() -> Self {
        Self {
            version: 0,
            books: Arc::from(Vec::new()),
        }
    }
}

impl ReadingListSnapshot {
    /// Number of books on the list
    pub fn count(&self) -> usize {
        self.books.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Whether a book with exactly this title is on the list
    pub fn contains(&self, title: &str) -> bool {
        self.books.iter().any(|b| b.title == title)
    }
}

/// Deduplicated, insertion-ordered list of books
#[derive(Debug)]
pub struct ReadingList {
    books: Vec<Book>,
    version: u64,
    publisher: watch::Sender<ReadingListSnapshot>,
}

impl Default for ReadingList {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingList {
    /// Create an empty reading list
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(ReadingListSnapshot::default());
        Self {
            books: Vec::new(),
            version: 0,
            publisher,
        }
    }

    /// Add a book to the end of the list
    ///
    /// If a book with the same title is already present the call does
    /// nothing: the existing entry is kept as is. Returns whether the book
    /// was appended.
    pub fn add_book(&mut self, book: Book) -> bool {
        if self.contains(&book.title) {
            debug!(title = %book.title, "book already on reading list");
            return false;
        }

        debug!(title = %book.title, "adding book to reading list");
        self.books.push(book);
        self.publish();
        true
    }

    /// Remove the book with exactly this title
    ///
    /// Unknown titles are ignored. Returns whether anything was removed.
    pub fn remove_book(&mut self, title: &str) -> bool {
        let before = self.books.len();
        self.books.retain(|b| b.title != title);

        if self.books.len() == before {
            return false;
        }

        debug!(title, "removed book from reading list");
        self.publish();
        true
    }

    /// Books in insertion order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Number of books on the list
    pub fn count(&self) -> usize {
        self.books.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Whether a book with exactly this title is on the list
    pub fn contains(&self, title: &str) -> bool {
        self.books.iter().any(|b| b.title == title)
    }

    /// Current contents as an immutable snapshot
    pub fn snapshot(&self) -> ReadingListSnapshot {
        self.publisher.borrow().clone()
    }

    /// Subscribe to snapshots published after each change
    ///
    /// The receiver starts out holding the current snapshot, marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<ReadingListSnapshot> {
        self.publisher.subscribe()
    }

    fn publish(&mut self) {
        self.version += 1;
        let snapshot = ReadingListSnapshot {
            version: self.version,
            books: Arc::from(self.books.as_slice()),
        };
        // Replacing works with zero receivers, which is the common case
        self.publisher.send_replace(snapshot);
    }
}

// ==================== Owning task ====================

/// Commands sent to the reading list task
#[derive(Debug, Clone)]
pub enum ReadingListCommand {
    /// Add a book (no-op for a duplicate title)
    Add(Book),
    /// Remove the book with this title
    Remove(String),
    /// Stop the task
    Shutdown,
}

/// Handle to a reading list owned by a background task
pub struct ReadingListHandle {
    /// Send commands to the task
    pub command_tx: mpsc::Sender<ReadingListCommand>,
    /// Watch the published snapshots
    pub snapshot_rx: watch::Receiver<ReadingListSnapshot>,
}

impl ReadingListHandle {
    /// Queue a book to be added
    pub async fn add_book(&self, book: Book) -> anyhow::Result<()> {
        self.send(ReadingListCommand::Add(book)).await
    }

    /// Queue a title to be removed
    pub async fn remove_book(&self, title: impl Into<String>) -> anyhow::Result<()> {
        self.send(ReadingListCommand::Remove(title.into())).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> ReadingListSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    async fn send(&self, command: ReadingListCommand) -> anyhow::Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| anyhow::anyhow!("Reading list task has stopped"))
    }
}

/// Move a reading list into a task that applies commands in order
///
/// The task is the only writer. It exits on `Shutdown` or when every
/// command sender has been dropped.
pub fn spawn_reading_list_task(list: ReadingList) -> ReadingListHandle {
    let (command_tx, command_rx) = mpsc::channel(32);
    let snapshot_rx = list.subscribe();

    tokio::spawn(reading_list_task_loop(list, command_rx));

    ReadingListHandle {
        command_tx,
        snapshot_rx,
    }
}

async fn reading_list_task_loop(
    mut list: ReadingList,
    mut command_rx: mpsc::Receiver<ReadingListCommand>,
) {
    while let Some(command) = command_rx.recv().await {
        match command {
            ReadingListCommand::Add(book) => {
                list.add_book(book);
            }
            ReadingListCommand::Remove(title) => {
                list.remove_book(&title);
            }
            ReadingListCommand::Shutdown => break,
        }
    }
    debug!("reading list task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str) -> Book {
        Book::new(title, author)
    }

    fn titles(list: &ReadingList) -> Vec<&str> {
        list.books().iter().map(|b| b.title.as_str()).collect()
    }

    #[test]
    fn test_new_list_is_empty() {
        let list = ReadingList::new();
        assert!(list.is_empty());
        assert_eq!(list.count(), 0);
        assert_eq!(list.snapshot().version, 0);
    }

    #[test]
    fn test_add_to_empty_list() {
        let mut list = ReadingList::new();
        let a = Book::new("A", "X").with_reading_level("1");

        assert!(list.add_book(a.clone()));

        assert_eq!(list.count(), 1);
        assert_eq!(list.books(), &[a]);
    }

    #[test]
    fn test_duplicate_add_is_idempotent() {
        let mut list = ReadingList::new();
        let b = book("Cats", "Jane");

        list.add_book(b.clone());
        let after_first = list.books().to_vec();

        assert!(!list.add_book(b));
        assert_eq!(list.books(), after_first.as_slice());
    }

    #[test]
    fn test_distinct_adds_preserve_order() {
        let mut list = ReadingList::new();
        let b1 = book("First", "X");
        let b2 = book("Second", "Y");

        list.add_book(b1.clone());
        list.add_book(b2.clone());

        assert_eq!(list.books(), &[b1, b2]);
    }

    #[test]
    fn test_same_title_does_not_replace() {
        let mut list = ReadingList::new();
        let a = book("A", "Original");
        let b = book("B", "Other");
        list.add_book(a.clone());
        list.add_book(b.clone());

        let a_prime = book("A", "Someone Else");
        assert!(!list.add_book(a_prime));

        assert_eq!(list.books(), &[a, b]);
    }

    #[test]
    fn test_titles_are_case_sensitive() {
        let mut list = ReadingList::new();
        list.add_book(book("cats", "X"));
        assert!(list.add_book(book("Cats", "X")));
        assert_eq!(titles(&list), vec!["cats", "Cats"]);
    }

    #[test]
    fn test_remove_missing_title_is_noop() {
        let mut list = ReadingList::new();
        list.add_book(book("A", "X"));
        let before = list.books().to_vec();

        assert!(!list.remove_book("Z"));
        assert_eq!(list.books(), before.as_slice());
    }

    #[test]
    fn test_remove_by_title() {
        let mut list = ReadingList::new();
        list.add_book(book("A", "X"));
        list.add_book(book("B", "Y"));

        assert!(list.remove_book("B"));
        assert_eq!(titles(&list), vec!["A"]);
    }

    #[test]
    fn test_add_then_remove_restores_previous() {
        let mut list = ReadingList::new();
        list.add_book(book("A", "X"));
        let before = list.books().to_vec();

        let b = book("B", "Y");
        list.add_book(b.clone());
        list.remove_book(&b.title);

        assert_eq!(list.books(), before.as_slice());
    }

    #[test]
    fn test_subscriber_sees_change_synchronously() {
        let mut list = ReadingList::new();
        let mut rx = list.subscribe();
        assert!(!rx.has_changed().unwrap());

        list.add_book(book("A", "X"));

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.count(), 1);
        assert!(snapshot.contains("A"));
    }

    #[test]
    fn test_noop_mutations_publish_nothing() {
        let mut list = ReadingList::new();
        list.add_book(book("A", "X"));
        let mut rx = list.subscribe();

        list.add_book(book("A", "Y"));
        list.remove_book("missing");

        assert!(!rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().version, 1);
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let mut list = ReadingList::new();
        list.add_book(book("A", "X"));
        let old = list.snapshot();

        list.add_book(book("B", "Y"));

        assert_eq!(old.count(), 1);
        assert_eq!(list.snapshot().count(), 2);
        assert_eq!(list.snapshot().version, 2);
    }

    #[tokio::test]
    async fn test_task_applies_commands_in_order() {
        let handle = spawn_reading_list_task(ReadingList::new());
        let mut rx = handle.snapshot_rx.clone();

        handle.add_book(book("A", "X")).await.unwrap();
        handle.add_book(book("B", "Y")).await.unwrap();
        handle.add_book(book("A", "Z")).await.unwrap();
        handle.remove_book("A").await.unwrap();

        let snapshot = rx
            .wait_for(|s| s.version == 3)
            .await
            .unwrap()
            .clone();
        let titles: Vec<_> = snapshot.books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["B"]);
        assert_eq!(handle.snapshot(), snapshot);
    }

    #[tokio::test]
    async fn test_task_stops_on_shutdown() {
        let handle = spawn_reading_list_task(ReadingList::new());
        handle
            .command_tx
            .send(ReadingListCommand::Shutdown)
            .await
            .unwrap();

        handle.command_tx.closed().await;
        assert!(handle.add_book(book("A", "X")).await.is_err());
    }
}
