mod forms;
mod query;

pub use forms::TagForm;
pub use query::JournalQuery;
