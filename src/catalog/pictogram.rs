//! Pictogram and category types.

use serde::{Deserialize, Serialize};

/// Style tag shared by every user-created pictogram.
pub const CUSTOM_STYLE_TAG: &str = "bg-indigo-600 text-white";

/// Id prefix of user-created pictograms.
pub const CUSTOM_ID_PREFIX: &str = "custom_";

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Closed set of board categories.
///
/// [`Category::Favorites`] is virtual: it selects the saved-phrase view and is
/// never assigned to a [`Pictogram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(alias = "Acciones")]
    Actions,
    #[serde(alias = "Comida")]
    Food,
    #[serde(alias = "Emociones")]
    Emotions,
    #[serde(alias = "Personas")]
    People,
    #[serde(alias = "Lugares")]
    Places,
    #[serde(alias = "Necesidades")]
    Needs,
    #[serde(alias = "Tiempo")]
    Time,
    #[serde(alias = "Objetos")]
    Objects,
    #[serde(alias = "Favoritos")]
    Favorites,
}

impl Category {
    /// Every category in board order, Favorites included.
    pub const ALL: [Category; 9] = [
        Category::Actions,
        Category::Food,
        Category::Emotions,
        Category::People,
        Category::Places,
        Category::Needs,
        Category::Time,
        Category::Objects,
        Category::Favorites,
    ];

    /// Categories a pictogram may belong to.
    pub fn assignable() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter().filter(|c| c.is_assignable())
    }

    /// `false` only for the virtual Favorites category.
    pub fn is_assignable(self) -> bool {
        self != Category::Favorites
    }

    /// Label shown on the category tab.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Actions => "Acciones",
            Category::Food => "Comida",
            Category::Emotions => "Emociones",
            Category::People => "Personas",
            Category::Places => "Lugares",
            Category::Needs => "Necesidades",
            Category::Time => "Tiempo",
            Category::Objects => "Objetos",
            Category::Favorites => "Favoritos",
        }
    }

    /// Tile style of the built-in pictograms in this category.
    pub fn style_tag(self) -> &'static str {
        match self {
            Category::Actions => "bg-blue-500 text-white",
            Category::Food => "bg-green-500 text-white",
            Category::Emotions | Category::Favorites => "bg-yellow-500 text-white",
            Category::People => "bg-purple-500 text-white",
            Category::Places => "bg-orange-500 text-white",
            Category::Needs => "bg-red-500 text-white",
            Category::Time => "bg-teal-500 text-white",
            Category::Objects => "bg-indigo-500 text-white",
        }
    }

    /// Case-insensitive lookup by English variant name or display name.
    pub fn parse(name: &str) -> Option<Category> {
        let name = name.trim();
        Self::ALL.into_iter().find(|c| {
            c.display_name().eq_ignore_ascii_case(name)
                || format!("{c:?}").eq_ignore_ascii_case(name)
        })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Pictogram
// ---------------------------------------------------------------------------

/// A labelled, iconised unit of meaning.
///
/// Immutable once created.  Lookups go by [`Pictogram::id`]; equality
/// compares every field, so a snapshot equals its source only while both
/// are unchanged copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pictogram {
    pub id: String,
    pub label: String,
    #[serde(alias = "emoji")]
    pub glyph: String,
    pub category: Category,
    #[serde(alias = "color")]
    pub style_tag: String,
}

impl Pictogram {
    pub fn is_custom(&self) -> bool {
        is_custom_id(&self.id)
    }
}

/// `true` for ids minted by [`PictogramCatalog::create`](super::PictogramCatalog::create).
pub fn is_custom_id(id: &str) -> bool {
    id.starts_with(CUSTOM_ID_PREFIX)
}

/// Millisecond stamp embedded in a custom id, if any.
pub(crate) fn custom_id_stamp(id: &str) -> Option<i64> {
    id.strip_prefix(CUSTOM_ID_PREFIX)?.parse().ok()
}
