pub mod history;

pub use history::{HistoryRecorder, JsonHistoryStore};
