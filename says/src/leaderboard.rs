//! Top-ten leaderboard persisted as line-delimited decimal scores.
//!
//! Every operation is a fresh transaction against the card: the file is read
//! in full, merged in memory and, only when the ranking changed, rewritten in
//! full.

use core::fmt::Write;

use heapless::{
    consts::{U10, U128},
    String, Vec,
};
use log::{debug, info, warn};

use crate::storage::{Storage, StorageError};

/// Maximum number of scores kept
pub const MAX_SCORES: usize = 10;

/// Well-known name of the score file on the card
pub const SCORES_FILE: &str = "scores.txt";

const READ_BUFFER: usize = 128;

/// Outcome of merging a candidate score
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Merge {
    /// Inserted at 1-based `rank`
    Inserted { rank: usize },
    /// Did not beat any entry of a full leaderboard
    Discarded,
}

/// Scores sorted from highest to lowest, never more than `MAX_SCORES`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Leaderboard {
    scores: Vec<u32, U10>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    /// Build a leaderboard out of arbitrary scores, keeping the ten highest
    pub fn from_scores(scores: &[u32]) -> Self {
        let mut board = Self::new();
        scores.iter().for_each(|&score| {
            board.merge(score);
        });
        board
    }

    /// Parse the contents of a score file
    ///
    /// Reads at most ten lines holding a decimal score. Blank and malformed
    /// lines are skipped. The result is sorted, so an out of order file is
    /// repaired on the next rewrite.
    pub fn parse(text: &[u8]) -> Self {
        let mut board = Self::new();
        text.split(|&b| b == b'\n')
            .filter_map(|line| core::str::from_utf8(line).ok())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match line.parse::<u32>() {
                Ok(score) => Some(score),
                Err(_) => {
                    warn!("skipping malformed score line {:?}", line);
                    None
                }
            })
            .take(MAX_SCORES)
            .for_each(|score| {
                board.merge(score);
            });
        board
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.scores.len() >= MAX_SCORES
    }

    pub fn top_score(&self) -> Option<u32> {
        self.scores.first().copied()
    }

    /// Check if a score would enter the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        !self.is_full() || self.scores.iter().any(|&entry| score > entry)
    }

    /// Insert `score` at its rank, evicting the lowest entry when full
    ///
    /// Ties never displace an existing entry: the candidate goes below every
    /// score equal to it.
    pub fn merge(&mut self, score: u32) -> Merge {
        let position = self.scores.iter().position(|&entry| score > entry);
        let index = match position {
            Some(index) => index,
            None if !self.is_full() => self.scores.len(),
            None => return Merge::Discarded,
        };
        if self.is_full() {
            self.scores.pop();
        }
        // Capacity was made above, push cannot fail
        let _ = self.scores.push(score);
        self.scores[index..].rotate_right(1);
        Merge::Inserted { rank: index + 1 }
    }

    /// Serialize one score per line, each newline-terminated
    pub fn write_to<W: Write>(&self, out: &mut W) -> core::fmt::Result {
        self.scores
            .iter()
            .try_for_each(|score| writeln!(out, "{}", score))
    }
}

/// Read the leaderboard from the card
///
/// A missing file is an empty leaderboard.
pub fn load<S: Storage>(card: &mut S) -> Result<Leaderboard, StorageError> {
    let mut buf = [0u8; READ_BUFFER];
    match card.read(&mut buf) {
        Ok(len) => {
            // a full buffer may end in the middle of a line
            let text = if len == buf.len() {
                let end = buf.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
                &buf[..end]
            } else {
                &buf[..len]
            };
            let board = Leaderboard::parse(text);
            debug!("loaded {} scores from {}", board.len(), SCORES_FILE);
            Ok(board)
        }
        Err(StorageError::NotFound) => {
            debug!("{} not found, starting fresh", SCORES_FILE);
            Ok(Leaderboard::new())
        }
        Err(err) => {
            warn!("reading {} failed: {}", SCORES_FILE, err.as_str());
            Err(err)
        }
    }
}

/// Merge `score` into the leaderboard on the card
///
/// Nothing is written when the score is discarded. When the rewrite fails the
/// merged snapshot is dropped and the card keeps its previous contents.
pub fn record<S: Storage>(card: &mut S, score: u32) -> Result<Merge, StorageError> {
    let mut board = load(card)?;
    let merge = board.merge(score);
    if let Merge::Inserted { rank } = merge {
        let mut text: String<U128> = String::new();
        board
            .write_to(&mut text)
            .or(Err(StorageError::WriteFail))?;
        card.write(text.as_bytes()).map_err(|err| {
            warn!("rewriting {} failed: {}", SCORES_FILE, err.as_str());
            StorageError::WriteFail
        })?;
        info!("score {} recorded at rank {}", score, rank);
    } else {
        info!("score {} did not reach the leaderboard", score);
    }
    Ok(merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCard;

    extern crate std;
    use std::string::String as StdString;

    const FULL: [u32; 10] = [90, 80, 70, 60, 50, 40, 30, 20, 10, 5];

    fn text_of(board: &Leaderboard) -> StdString {
        let mut text = StdString::new();
        board.write_to(&mut text).unwrap();
        text
    }

    #[test]
    fn tie_goes_below_and_evicts_lowest() {
        let mut board = Leaderboard::from_scores(&FULL);
        assert_eq!(board.merge(50), Merge::Inserted { rank: 6 });
        assert_eq!(board.scores(), &[90, 80, 70, 60, 50, 50, 40, 30, 20, 10]);
    }

    #[test]
    fn tie_with_lowest_is_discarded() {
        let mut board = Leaderboard::from_scores(&FULL);
        assert_eq!(board.merge(5), Merge::Discarded);
        assert_eq!(board.scores(), &FULL);
    }

    #[test]
    fn insert_evicts_lowest() {
        let mut board = Leaderboard::from_scores(&FULL);
        assert_eq!(board.merge(65), Merge::Inserted { rank: 4 });
        assert_eq!(board.scores(), &[90, 80, 70, 65, 60, 50, 40, 30, 20, 10]);
    }

    #[test]
    fn insert_into_empty() {
        let mut board = Leaderboard::new();
        assert_eq!(board.merge(95), Merge::Inserted { rank: 1 });
        assert_eq!(board.scores(), &[95]);
    }

    #[test]
    fn append_when_not_full() {
        let mut board = Leaderboard::from_scores(&[90, 80, 70, 60, 50, 40, 30, 20, 10]);
        assert_eq!(board.merge(3), Merge::Inserted { rank: 10 });
        assert_eq!(board.len(), MAX_SCORES);
        assert_eq!(board.scores()[9], 3);
        assert_eq!(board.merge(3), Merge::Discarded);
        assert_eq!(board.merge(0), Merge::Discarded);
    }

    #[test]
    fn tie_goes_below_existing() {
        let mut board = Leaderboard::from_scores(&[30, 20, 10]);
        assert_eq!(board.merge(20), Merge::Inserted { rank: 3 });
        assert_eq!(board.scores(), &[30, 20, 20, 10]);
    }

    #[test]
    fn new_top_score() {
        let mut board = Leaderboard::from_scores(&FULL);
        assert_eq!(board.merge(100), Merge::Inserted { rank: 1 });
        assert_eq!(board.top_score(), Some(100));
        assert_eq!(board.scores()[9], 10);
    }

    #[test]
    fn qualifies_matches_merge() {
        let board = Leaderboard::from_scores(&FULL);
        assert!(!board.qualifies(5));
        assert!(board.qualifies(6));
        assert!(Leaderboard::new().qualifies(0));
    }

    #[test]
    fn parse_skips_garbage_and_sorts() {
        let board = Leaderboard::parse(b"12\n\nabc\n40\r\n7\n");
        assert_eq!(board.scores(), &[40, 12, 7]);
    }

    #[test]
    fn parse_reads_ten_lines_at_most() {
        let board = Leaderboard::parse(b"11\n10\n9\n8\n7\n6\n5\n4\n3\n2\n1000\n");
        assert_eq!(board.scores(), &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    }

    #[test]
    fn serialize_newline_terminated() {
        let board = Leaderboard::from_scores(&[5, 17]);
        assert_eq!(text_of(&board), "17\n5\n");
        assert_eq!(text_of(&Leaderboard::new()), "");
    }

    #[test]
    fn load_missing_file_is_empty() {
        let mut card = MemoryCard::new();
        assert_eq!(load(&mut card), Ok(Leaderboard::new()));
    }

    #[test]
    fn load_drops_partial_trailing_line() {
        let mut contents = std::vec::Vec::new();
        for _ in 0..READ_BUFFER / 3 {
            contents.extend_from_slice(b"42\n");
        }
        contents.extend_from_slice(b"99999");
        let mut card = MemoryCard::with_file(&contents[..READ_BUFFER.min(contents.len())]);
        let board = load(&mut card).unwrap();
        assert_eq!(board.len(), MAX_SCORES);
        assert!(board.scores().iter().all(|&score| score == 42));
    }

    #[test]
    fn record_rewrites_whole_file() {
        let mut card = MemoryCard::with_file(b"90\n80\n70\n60\n50\n40\n30\n20\n10\n5\n");
        assert_eq!(record(&mut card, 65), Ok(Merge::Inserted { rank: 4 }));
        assert_eq!(
            card.contents(),
            Some(&b"90\n80\n70\n65\n60\n50\n40\n30\n20\n10\n"[..])
        );
    }

    #[test]
    fn record_creates_file() {
        let mut card = MemoryCard::new();
        assert_eq!(record(&mut card, 95), Ok(Merge::Inserted { rank: 1 }));
        assert_eq!(card.contents(), Some(&b"95\n"[..]));
    }

    #[test]
    fn record_discarded_writes_nothing() {
        let original = b"90\n80\n70\n60\n50\n40\n30\n20\n10\n5\n";
        let mut card = MemoryCard::with_file(original);
        card.fail_writes(true);
        assert_eq!(record(&mut card, 3), Ok(Merge::Discarded));
        assert_eq!(card.contents(), Some(&original[..]));
    }

    #[test]
    fn record_read_failure_skips_merge() {
        let mut card = MemoryCard::with_file(b"10\n");
        card.fail_reads(true);
        assert_eq!(record(&mut card, 95), Err(StorageError::ReadFail));
        assert_eq!(card.contents(), Some(&b"10\n"[..]));
    }

    #[test]
    fn record_write_failure_keeps_file() {
        let mut card = MemoryCard::with_file(b"10\n");
        card.fail_writes(true);
        assert_eq!(record(&mut card, 95), Err(StorageError::WriteFail));
        assert_eq!(card.contents(), Some(&b"10\n"[..]));
    }

    #[test]
    fn nine_entries_gain_a_tenth() {
        let mut card = MemoryCard::with_file(b"90\n80\n70\n60\n50\n40\n30\n20\n10\n");
        assert_eq!(record(&mut card, 1), Ok(Merge::Inserted { rank: 10 }));
        let board = load(&mut card).unwrap();
        assert_eq!(board.scores(), &[90, 80, 70, 60, 50, 40, 30, 20, 10, 1]);
    }
}
