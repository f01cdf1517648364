//! Minimal view of a sequence record used by the counting pipeline.
//!
//! The counter only needs a record's identifier and bases. `SeqRecord` captures that
//! shape so needletail records and in-memory records can be counted interchangeably.

use std::borrow::Cow;

use needletail::parser::SequenceRecord;

pub trait SeqRecord {
    fn identifier(&self) -> &[u8];
    fn bases(&self) -> Cow<'_, [u8]>;
}

impl SeqRecord for SequenceRecord<'_> {
    fn identifier(&self) -> &[u8] {
        self.id()
    }

    fn bases(&self) -> Cow<'_, [u8]> {
        self.seq()
    }
}

/// Owned record, convenient for counting sequences held in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedRecord {
    pub id: Vec<u8>,
    pub seq: Vec<u8>,
}

impl OwnedRecord {
    pub fn new(id: impl Into<Vec<u8>>, seq: impl Into<Vec<u8>>) -> Self {
        OwnedRecord {
            id: id.into(),
            seq: seq.into(),
        }
    }
}

impl SeqRecord for OwnedRecord {
    fn identifier(&self) -> &[u8] {
        &self.id
    }

    fn bases(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.seq)
    }
}

impl<T: SeqRecord + ?Sized> SeqRecord for &T {
    fn identifier(&self) -> &[u8] {
        (**self).identifier()
    }

    fn bases(&self) -> Cow<'_, [u8]> {
        (**self).bases()
    }
}
