mod error;
mod ordering;
mod traits;

pub use error::{Result, StoreError};
pub use ordering::order_by_date_desc;
pub use traits::EntryStore;
