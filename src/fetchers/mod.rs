pub mod event_page;

pub use event_page::{EventPage, EventPageFetcher};
