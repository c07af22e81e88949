//! Raw access to the removable card holding the score file.
//!
//! The core never edits a file in place: it reads the whole file and
//! replaces it as a whole.

use heapless::{consts::U256, Vec};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StorageError {
    /// The file does not exist yet
    NotFound,
    ReadFail,
    WriteFail,
}

impl StorageError {
    pub fn as_str(&self) -> &'static str {
        match *self {
            StorageError::NotFound => "No scores yet!",
            StorageError::ReadFail => "SD Card - Read fail!",
            StorageError::WriteFail => "SD Card - Write fail!",
        }
    }
}

/// File access on a mounted card
pub trait Storage {
    /// Read the score file into `buf`, returning the number of bytes read
    ///
    /// Files longer than `buf` are truncated to its length.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError>;
    /// Replace the score file with `data`
    ///
    /// On error the previous contents must be left untouched.
    fn write(&mut self, data: &[u8]) -> Result<(), StorageError>;
}

/// Card kept in RAM
///
/// Holds a single file. Used on boards without a card slot, where scores
/// survive until power is removed, and in tests, where reads and writes can
/// be made to fail.
#[derive(Clone, Debug, Default)]
pub struct MemoryCard {
    file: Option<Vec<u8, U256>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryCard {
    pub fn new() -> Self {
        Self {
            file: None,
            fail_reads: false,
            fail_writes: false,
        }
    }

    /// Create a card already holding `contents`
    pub fn with_file(contents: &[u8]) -> Self {
        let mut card = Self::new();
        card.file = Vec::from_slice(contents).ok();
        card
    }

    pub fn contents(&self) -> Option<&[u8]> {
        self.file.as_deref()
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl Storage for MemoryCard {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        if self.fail_reads {
            return Err(StorageError::ReadFail);
        }
        let file = self.file.as_ref().ok_or(StorageError::NotFound)?;
        let len = file.len().min(buf.len());
        buf[..len].copy_from_slice(&file[..len]);
        Ok(len)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::WriteFail);
        }
        let file = Vec::from_slice(data).or(Err(StorageError::WriteFail))?;
        self.file = Some(file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file() {
        let mut card = MemoryCard::new();
        let mut buf = [0u8; 16];
        assert_eq!(card.read(&mut buf), Err(StorageError::NotFound));
    }

    #[test]
    fn write_then_read_truncated() {
        let mut card = MemoryCard::new();
        card.write(b"90\n80\n70\n").unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(card.read(&mut buf), Ok(4));
        assert_eq!(&buf, b"90\n8");
    }

    #[test]
    fn failed_write_keeps_file() {
        let mut card = MemoryCard::with_file(b"12\n");
        card.fail_writes(true);
        assert_eq!(card.write(b"40\n12\n"), Err(StorageError::WriteFail));
        assert_eq!(card.contents(), Some(&b"12\n"[..]));
    }

    #[test]
    fn failed_read() {
        let mut card = MemoryCard::with_file(b"12\n");
        card.fail_reads(true);
        let mut buf = [0u8; 16];
        assert_eq!(card.read(&mut buf), Err(StorageError::ReadFail));
    }
}
