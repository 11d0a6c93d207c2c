//! Value types and error definitions for the address book.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;
use thiserror::Error;

/// Path prefix under which every person is addressable.
pub const PERSON_PATH_PREFIX: &str = "/contacts/person";

/// System-assigned identifier of a person. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(NonZeroU64);

impl PersonId {
    /// The first identifier handed out by an empty book.
    pub const FIRST: PersonId = PersonId(NonZeroU64::MIN);

    /// Wrap a raw value, returning `None` for zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Identifier following this one, or `None` once the id space is used up.
    pub(crate) fn successor(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a path segment does not name a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid person id")]
pub struct InvalidPersonId(String);

impl FromStr for PersonId {
    type Err = InvalidPersonId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(PersonId::new)
            .ok_or_else(|| InvalidPersonId(s.to_string()))
    }
}

/// A stored person. The locator is derived from `id` on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    /// Identifier assigned by the repository.
    pub id: PersonId,
    /// Display name.
    pub name: String,
}

impl Person {
    /// Absolute locator of this person under `base_url` (e.g. `http://localhost:8282`).
    pub fn href(&self, base_url: &str) -> String {
        person_href(base_url, self.id)
    }
}

/// Build the canonical locator `{base}/contacts/person/{id}`.
pub fn person_href(base_url: &str, id: PersonId) -> String {
    format!("{}{PERSON_PATH_PREFIX}/{id}", base_url.trim_end_matches('/'))
}

/// Client-supplied person payload for create and update requests.
///
/// `name` is required. Identity always comes from the allocator or the request path, so `id`
/// is ignored on create and update and any other field (such as `href`) is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PersonDraft {
    /// Requested display name.
    pub name: String,
    /// Honoured only when seeding a book.
    #[serde(default)]
    pub id: Option<u64>,
}

impl PersonDraft {
    /// Draft carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Wire representation of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonResource {
    /// Identifier assigned by the server.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Absolute locator of the person.
    pub href: String,
}

impl PersonResource {
    /// Render a stored person against the public base URL.
    pub fn from_person(person: &Person, base_url: &str) -> Self {
        Self {
            id: person.id.get(),
            name: person.name.clone(),
            href: person.href(base_url),
        }
    }
}

/// Wire representation of the whole collection, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBookResource {
    /// Persons in listing order.
    pub persons: Vec<PersonResource>,
}

impl AddressBookResource {
    /// Render a snapshot of stored persons against the public base URL.
    pub fn from_persons(persons: &[Person], base_url: &str) -> Self {
        Self {
            persons: persons
                .iter()
                .map(|person| PersonResource::from_person(person, base_url))
                .collect(),
        }
    }
}

/// Failures surfaced by address book operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactsError {
    /// The referenced person does not exist.
    #[error("person {0} not found")]
    NotFound(PersonId),
    /// An update targeted a person that does not exist; updates never create.
    #[error("person {0} does not exist and cannot be updated")]
    InvalidTarget(PersonId),
    /// Two seeded persons claimed the same identifier.
    #[error("person id {0} is already in use")]
    DuplicateId(PersonId),
    /// No unused identifier is left to allocate.
    #[error("person id space is exhausted")]
    IdSpaceExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_id_rejects_zero_and_garbage() {
        assert!("0".parse::<PersonId>().is_err());
        assert!("-3".parse::<PersonId>().is_err());
        assert!("abc".parse::<PersonId>().is_err());
        assert!("".parse::<PersonId>().is_err());
        assert_eq!("42".parse::<PersonId>().map(PersonId::get), Ok(42));
    }

    #[test]
    fn href_tracks_id_and_ignores_trailing_slash() {
        let person = Person {
            id: PersonId::new(7).expect("positive"),
            name: "Juan".into(),
        };
        assert_eq!(
            person.href("http://localhost:8282/"),
            "http://localhost:8282/contacts/person/7"
        );
        assert_eq!(
            person.href("http://localhost:8282"),
            "http://localhost:8282/contacts/person/7"
        );
    }

    #[test]
    fn draft_requires_name_and_drops_client_href() {
        let draft: PersonDraft = serde_json::from_str(
            r#"{"name":"Maria","id":99,"href":"http://evil/contacts/person/99"}"#,
        )
        .expect("draft parses");
        assert_eq!(draft.name, "Maria");
        assert_eq!(draft.id, Some(99));

        assert!(serde_json::from_str::<PersonDraft>("{}").is_err());
        assert!(serde_json::from_str::<PersonDraft>(r#"{"id":1}"#).is_err());
    }

    #[test]
    fn successor_stops_at_the_end_of_the_id_space() {
        assert_eq!(PersonId::FIRST.successor(), PersonId::new(2));
        let last = PersonId::new(u64::MAX).expect("positive");
        assert_eq!(last.successor(), None);
    }

    #[test]
    fn book_resource_preserves_order() {
        let persons = vec![
            Person {
                id: PersonId::new(2).expect("positive"),
                name: "Salvador".into(),
            },
            Person {
                id: PersonId::new(1).expect("positive"),
                name: "Juan".into(),
            },
        ];
        let book = AddressBookResource::from_persons(&persons, "http://h:1");
        let names: Vec<_> = book.persons.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Salvador", "Juan"]);
        assert_eq!(book.persons[0].href, "http://h:1/contacts/person/2");
    }
}
