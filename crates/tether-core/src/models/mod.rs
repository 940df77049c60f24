//! Domain types exchanged with the backend.

pub mod page;
pub mod person;
pub mod record_id;

pub use page::Page;
pub use person::{Name, Person, PersonForCreate, PersonForUpdate};
pub use record_id::RecordId;
