mod command;
mod error;
mod http_mapping;

pub use command::{plan_command, EditChanges, EntryCommand, Mutation, Plan, SkipReason};
pub use error::ActionError;
pub use http_mapping::action_error_to_status_code;
