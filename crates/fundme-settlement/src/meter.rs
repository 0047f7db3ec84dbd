//! Storage access counter.
//!
//! Settlement strategies report every ledger storage read and write here,
//! so the cost difference between them shows up in the receipt.

/// Counts storage reads and writes for one settlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageMeter {
    reads: u64,
    writes: u64,
}

impl StorageMeter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&mut self) {
        self.reads += 1;
    }

    /// Record `n` reads at once (bulk copy of a list).
    pub fn read_n(&mut self, n: usize) {
        self.reads += n as u64;
    }

    pub fn write(&mut self) {
        self.writes += 1;
    }

    #[must_use]
    pub fn reads(&self) -> u64 {
        self.reads
    }

    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }
}
