use crate::PageRecord;

/// Insertion-ordered accumulation of accepted pages. Records arrive in
/// completion order within a batch, so the sequence approximates but does
/// not equal discovery order.
#[derive(Debug, Default)]
pub struct Collector {
    records: Vec<PageRecord>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: PageRecord) {
        self.records.push(record);
    }

    pub fn all(&self) -> &[PageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<PageRecord> {
        self.records
    }
}
