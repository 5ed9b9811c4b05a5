mod render;
mod types;

pub use render::render;
pub use types::{
    Affordance, AffordanceAction, EditFields, EntryCard, JournalView, RenderContext, TagChip, ViewBody,
    NO_CONTENT, NO_RESULTS,
};
