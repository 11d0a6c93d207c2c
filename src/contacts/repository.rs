//! In-memory person repository with a monotonic identifier allocator.
//!
//! All state sits behind a single [`RwLock`]: mutations (allocation plus append, rename,
//! removal) take the write half so that an id is consumed and its person appended in one
//! step, while listings and lookups share the read half. Callers only ever receive owned
//! snapshots, never references into the guarded state.

use crate::contacts::types::{ContactsError, Person, PersonDraft, PersonId};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Storage operations backing the contacts resources.
#[async_trait]
pub trait AddressBookStore: Send + Sync {
    /// Identifier the next insertion will receive, `None` once the id space is used up.
    /// Does not consume it.
    async fn peek_next_id(&self) -> Option<PersonId>;

    /// Assign the next identifier to a new person, append it and return the stored entity.
    ///
    /// Fails only with [`ContactsError::IdSpaceExhausted`]; an id is never handed out twice.
    async fn allocate_and_insert(&self, name: String) -> Result<Person, ContactsError>;

    /// Look up a person by identifier.
    async fn find(&self, id: PersonId) -> Result<Person, ContactsError>;

    /// Overwrite the name of an existing person. Never creates.
    async fn replace(&self, id: PersonId, name: String) -> Result<Person, ContactsError>;

    /// Remove a person. Its identifier is never handed out again.
    async fn remove(&self, id: PersonId) -> Result<(), ContactsError>;

    /// Snapshot of all persons in insertion order.
    async fn list(&self) -> Vec<Person>;

    /// Number of stored persons.
    async fn len(&self) -> usize;
}

#[derive(Debug)]
struct BookState {
    persons: Vec<Person>,
    next_id: Option<PersonId>,
}

impl BookState {
    fn position(&self, id: PersonId) -> Option<usize> {
        self.persons.iter().position(|person| person.id == id)
    }

    fn allocate(&mut self) -> Result<PersonId, ContactsError> {
        let id = self.next_id.ok_or(ContactsError::IdSpaceExhausted)?;
        self.next_id = id.successor();
        Ok(id)
    }
}

/// Process-wide address book held in memory for the lifetime of the server.
#[derive(Debug)]
pub struct InMemoryAddressBook {
    state: RwLock<BookState>,
}

impl Default for InMemoryAddressBook {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAddressBook {
    /// Create an empty book whose first allocation yields id 1.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BookState {
                persons: Vec::new(),
                next_id: Some(PersonId::FIRST),
            }),
        }
    }

    /// Create a pre-populated book.
    ///
    /// Drafts carrying a positive `id` keep it; the rest receive fresh ids in listing order
    /// once all explicit ids are known. The allocator resumes above the largest id present;
    /// a seed that leaves no id above its largest one is rejected.
    pub fn from_persons(drafts: Vec<PersonDraft>) -> Result<Self, ContactsError> {
        let mut seen = HashSet::new();
        let mut next_id = PersonId::FIRST;
        for id in drafts.iter().filter_map(|draft| draft.id.and_then(PersonId::new)) {
            if !seen.insert(id) {
                return Err(ContactsError::DuplicateId(id));
            }
            if id >= next_id {
                next_id = id.successor().ok_or(ContactsError::IdSpaceExhausted)?;
            }
        }

        let mut state = BookState {
            persons: Vec::with_capacity(drafts.len()),
            next_id: Some(next_id),
        };
        for draft in drafts {
            let id = match draft.id.and_then(PersonId::new) {
                Some(id) => id,
                None => state.allocate()?,
            };
            state.persons.push(Person {
                id,
                name: draft.name,
            });
        }
        tracing::debug!(
            persons = state.persons.len(),
            next_id = ?state.next_id,
            "Seeded address book"
        );

        Ok(Self {
            state: RwLock::new(state),
        })
    }
}

#[async_trait]
impl AddressBookStore for InMemoryAddressBook {
    async fn peek_next_id(&self) -> Option<PersonId> {
        self.state.read().await.next_id
    }

    async fn allocate_and_insert(&self, name: String) -> Result<Person, ContactsError> {
        let mut state = self.state.write().await;
        let id = state.allocate()?;
        let person = Person { id, name };
        state.persons.push(person.clone());
        tracing::debug!(%id, total = state.persons.len(), "Inserted person");
        Ok(person)
    }

    async fn find(&self, id: PersonId) -> Result<Person, ContactsError> {
        let state = self.state.read().await;
        state
            .persons
            .iter()
            .find(|person| person.id == id)
            .cloned()
            .ok_or(ContactsError::NotFound(id))
    }

    async fn replace(&self, id: PersonId, name: String) -> Result<Person, ContactsError> {
        let mut state = self.state.write().await;
        let index = state.position(id).ok_or(ContactsError::NotFound(id))?;
        let person = &mut state.persons[index];
        person.name = name;
        Ok(person.clone())
    }

    async fn remove(&self, id: PersonId) -> Result<(), ContactsError> {
        let mut state = self.state.write().await;
        let index = state.position(id).ok_or(ContactsError::NotFound(id))?;
        state.persons.remove(index);
        tracing::debug!(%id, total = state.persons.len(), "Removed person");
        Ok(())
    }

    async fn list(&self) -> Vec<Person> {
        self.state.read().await.persons.clone()
    }

    async fn len(&self) -> usize {
        self.state.read().await.persons.len()
    }
}
