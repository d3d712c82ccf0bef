mod listing;
mod recipient;
mod template;

pub use listing::ListingRecord;
pub use recipient::Recipient;
pub use template::MessageTemplate;
