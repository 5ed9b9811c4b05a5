mod draft;
mod error;
mod normalize;
mod types;

pub use draft::{ensure_unique_tags, parse_tags_input, EditDraft, NewEntryDraft};
pub use error::ValidationError;
pub use normalize::{
    format_iso, normalize_date, normalize_document, normalize_snapshot, parse_datetime_input,
    parse_timestamp,
};
pub use types::{
    DocumentFields, Entry, EntryDocument, EntryId, EntryPatch, NewEntry, RawDate, Snapshot,
    UNTITLED,
};
