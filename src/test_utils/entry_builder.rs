use crate::Entry;

/// Produces consecutive entries starting at `start_index`.
pub struct EntryBuilder {
    index: u64,
    term: u64,
}

impl EntryBuilder {
    pub fn new(
        start_index: u64,
        term: u64,
    ) -> Self {
        Self {
            index: start_index,
            term,
        }
    }

    pub fn command(
        mut self,
        data: &[u8],
    ) -> (Self, Entry) {
        let entry = Entry::new(self.index, self.term, data);
        self.index += 1;
        (self, entry)
    }

    pub fn config(
        mut self,
        data: &[u8],
    ) -> (Self, Entry) {
        let entry = Entry::configuration(self.index, self.term, data);
        self.index += 1;
        (self, entry)
    }

    pub fn noop(mut self) -> (Self, Entry) {
        let entry = Entry::noop(self.index, self.term);
        self.index += 1;
        (self, entry)
    }

    pub fn term(
        mut self,
        term: u64,
    ) -> Self {
        self.term = term;
        self
    }
}
