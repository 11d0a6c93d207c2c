//! Person records, their identifiers, and the repository that owns them.

pub mod repository;
pub mod types;

pub use repository::{AddressBookStore, InMemoryAddressBook};
pub use types::{
    AddressBookResource, ContactsError, InvalidPersonId, PERSON_PATH_PREFIX, Person, PersonDraft,
    PersonId, PersonResource, person_href,
};
