//! In-memory sequence collection backing an index

use crate::seed::utils::complement_nucleotide;
use crate::types::SeqId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub header: String,
    pub data: Vec<u8>,
    /// Identity assigned by whoever loaded the sequence; defaults to the
    /// positional id
    pub abs_id: i64,
}

impl Sequence {
    pub fn new(header: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            header: header.into(),
            data,
            abs_id: -1,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Header up to the first whitespace
    pub fn name(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }

    /// `data[start..end]` as text, optionally reverse complemented.
    /// Returns `None` when the bounds do not describe a non-empty slice.
    pub fn substring(&self, start: usize, end: usize, reverse_complement: bool) -> Option<String> {
        if end <= start || start >= self.len() || end > self.len() {
            return None;
        }
        let slice = &self.data[start..end];
        let bytes: Vec<u8> = if reverse_complement {
            slice.iter().rev().map(|&b| complement_nucleotide(b)).collect()
        } else {
            slice.to_vec()
        };
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SequenceFile {
    seqs: Vec<Sequence>,
    total_len: usize,
}

impl SequenceFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sequence and return its positional id
    pub fn add(&mut self, mut seq: Sequence) -> SeqId {
        let id = self.seqs.len() as SeqId;
        if seq.abs_id < 0 {
            seq.abs_id = id as i64;
        }
        self.total_len += seq.len();
        self.seqs.push(seq);
        id
    }

    pub fn get(&self, id: SeqId) -> Option<&Sequence> {
        self.seqs.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.total_len
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
        self.seqs.iter()
    }

    pub fn clear(&mut self) {
        self.seqs.clear();
        self.total_len = 0;
    }
}

impl FromIterator<Sequence> for SequenceFile {
    fn from_iter<I: IntoIterator<Item = Sequence>>(iter: I) -> Self {
        let mut file = SequenceFile::new();
        for seq in iter {
            file.add(seq);
        }
        file
    }
}
