pub mod export;
pub mod poll;

pub use export::ExportService;
pub use poll::PollService;
