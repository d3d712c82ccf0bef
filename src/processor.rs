use crate::domain::ListingRecord;

/// One step in the chain a crawled listing goes through.
pub trait Processor {
    fn process_listing(&self, listing: ListingRecord) -> ListingRecord;
}

/// Runs processors in order, feeding each the previous one's output.
#[derive(Default)]
pub struct ProcessorChain {
    processors: Vec<Box<dyn Processor>>,
}

impl ProcessorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Push every listing through the chain, one at a time.
    pub fn process(&self, listings: impl IntoIterator<Item = ListingRecord>) -> Vec<ListingRecord> {
        listings
            .into_iter()
            .map(|listing| {
                self.processors
                    .iter()
                    .fold(listing, |listing, p| p.process_listing(listing))
            })
            .collect()
    }
}
