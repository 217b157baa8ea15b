mod entry;
mod flag;
mod header;
mod message_id;
mod source_ref;

pub use entry::Entry;
pub use flag::Flag;
pub use header::{DEFAULT_PLURAL_FORMS, Header};
pub use message_id::MessageId;
pub use source_ref::SourceRef;
