//! Built-in pictograms shipped with the board.

use std::sync::OnceLock;

use super::pictogram::{Category, Pictogram};

/// `(id, label, glyph, category)` rows, in board order.
const BUILTIN_ROWS: &[(&str, &str, &str, Category)] = &[
    // Needs
    ("need_1", "Ayuda", "🆘", Category::Needs),
    ("need_2", "Baño", "🚻", Category::Needs),
    ("need_3", "Dolor", "🤕", Category::Needs),
    ("need_4", "Sed", "🥤", Category::Needs),
    // Actions
    ("act_1", "Quiero", "🙋‍♂️", Category::Actions),
    ("act_2", "Comer", "🍽️", Category::Actions),
    ("act_3", "Beber", "🧃", Category::Actions),
    ("act_4", "Jugar", "🎮", Category::Actions),
    ("act_5", "Dormir", "😴", Category::Actions),
    ("act_6", "Ir", "🚶‍♂️", Category::Actions),
    ("act_7", "Escuchar", "🎧", Category::Actions),
    ("act_8", "Ver", "📺", Category::Actions),
    // Food
    ("food_1", "Manzana", "🍎", Category::Food),
    ("food_2", "Pan", "🍞", Category::Food),
    ("food_3", "Agua", "💧", Category::Food),
    ("food_4", "Leche", "🥛", Category::Food),
    ("food_5", "Galleta", "🍪", Category::Food),
    // Emotions
    ("emo_1", "Feliz", "😊", Category::Emotions),
    ("emo_2", "Triste", "😢", Category::Emotions),
    ("emo_3", "Enojado", "😠", Category::Emotions),
    ("emo_4", "Cansado", "🥱", Category::Emotions),
    // People
    ("peo_1", "Mamá", "👩", Category::People),
    ("peo_2", "Papá", "👨", Category::People),
    ("peo_3", "Profesor", "👨‍🏫", Category::People),
    ("peo_4", "Amigo", "🧑‍🤝‍🧑", Category::People),
    // Places
    ("pla_1", "Casa", "🏠", Category::Places),
    ("pla_2", "Escuela", "🏫", Category::Places),
    ("pla_3", "Parque", "🌳", Category::Places),
    // Objects
    ("obj_1", "Libro", "📖", Category::Objects),
    ("obj_2", "Teléfono", "📱", Category::Objects),
    ("obj_3", "Computadora", "💻", Category::Objects),
    ("obj_4", "Pelota", "⚽", Category::Objects),
    ("obj_5", "Lápiz", "✏️", Category::Objects),
    ("obj_6", "Llaves", "🔑", Category::Objects),
    ("obj_7", "Mochila", "🎒", Category::Objects),
    ("obj_8", "Tablet", "📟", Category::Objects),
    // Time
    ("tim_1", "Ahora", "⏰", Category::Time),
    ("tim_2", "Después", "⏳", Category::Time),
];

/// Process-wide built-in pictograms, materialised on first use.
pub fn builtin_pictograms() -> &'static [Pictogram] {
    static BUILTINS: OnceLock<Vec<Pictogram>> = OnceLock::new();
    BUILTINS.get_or_init(|| {
        BUILTIN_ROWS
            .iter()
            .map(|&(id, label, glyph, category)| Pictogram {
                id: id.to_string(),
                label: label.to_string(),
                glyph: glyph.to_string(),
                category,
                style_tag: category.style_tag().to_string(),
            })
            .collect()
    })
}
