//! Author and Book, the entities of the bookstore backend

use crate::entity::{Entity, EntityDescriptor};
use chrono::NaiveDate;
use crudcheck_api_types::EntityId;
use serde::{Deserialize, Serialize};

pub const AUTHORS_PATH: &str = "/api/authors";
pub const BOOKS_PATH: &str = "/api/books";
pub const AUTHOR_SCHEMA: &str = "/schemas/author-schema.json";
pub const BOOK_SCHEMA: &str = "/schemas/book-schema.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub nationality: Option<String>,
}

impl Entity for Author {
    fn id(&self) -> Option<EntityId> {
        self.id.map(EntityId::from)
    }
}

/// Create/update payload for [`Author`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

impl AuthorRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birth_date: None,
            nationality: None,
        }
    }

    pub fn birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn nationality(mut self, nationality: impl Into<String>) -> Self {
        self.nationality = Some(nationality.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub author_id: Option<i64>,
}

impl Entity for Book {
    fn id(&self) -> Option<EntityId> {
        self.id.map(EntityId::from)
    }
}

/// Create/update payload for [`Book`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
}

impl BookRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            isbn: None,
            publication_year: None,
            author_id: None,
        }
    }

    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn publication_year(mut self, year: i32) -> Self {
        self.publication_year = Some(year);
        self
    }

    pub fn author_id(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }
}

pub fn author_descriptor() -> EntityDescriptor {
    EntityDescriptor::new("Author", AUTHORS_PATH, AUTHOR_SCHEMA).with_content_schema(AUTHOR_SCHEMA)
}

pub fn book_descriptor() -> EntityDescriptor {
    EntityDescriptor::new("Book", BOOKS_PATH, BOOK_SCHEMA).with_content_schema(BOOK_SCHEMA)
}
