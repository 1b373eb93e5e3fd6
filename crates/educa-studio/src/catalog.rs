//! The static book collection shown in the library.

use educa_render::CatalogRow;
use serde::Serialize;

/// A book in the library collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Stable identifier.
    pub id: &'static str,
    /// Title.
    pub title: &'static str,
    /// Author.
    pub author: &'static str,
    /// One-line summary.
    pub description: &'static str,
    /// Cover image URL.
    pub cover_url: &'static str,
}

impl CatalogRow for Book {
    fn title(&self) -> &str {
        self.title
    }

    fn author(&self) -> &str {
        self.author
    }

    fn description(&self) -> &str {
        self.description
    }
}

const BOOKS: [Book; 4] = [
    Book {
        id: "1",
        title: "O Pequeno Príncipe",
        author: "Antoine de Saint-Exupéry",
        description: "Um clássico sobre amizade e amor.",
        cover_url: "https://picsum.photos/seed/prince/200/300",
    },
    Book {
        id: "2",
        title: "Menina Bonita do Laço de Fita",
        author: "Ana Maria Machado",
        description: "História sobre diversidade e autoestima.",
        cover_url: "https://picsum.photos/seed/menina/200/300",
    },
    Book {
        id: "3",
        title: "A Lagarta Comilona",
        author: "Eric Carle",
        description: "Ensina sobre metamorfose e dias da semana.",
        cover_url: "https://picsum.photos/seed/lagarta/200/300",
    },
    Book {
        id: "4",
        title: "Elmer, o Elefante Xadrez",
        author: "David McKee",
        description: "Celebração das diferenças.",
        cover_url: "https://picsum.photos/seed/elmer/200/300",
    },
];

/// All books, in display order.
#[must_use]
pub const fn books() -> &'static [Book] {
    &BOOKS
}

/// Looks a book up by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static Book> {
    BOOKS.iter().find(|b| b.id == id)
}
