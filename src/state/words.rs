//! Built-in word table and avatar set

use crate::types::WordEntry;
use rand::seq::IndexedRandom;
use rand::Rng;

pub const WORD_TABLE: &[WordEntry] = &[
    WordEntry { topic: "Breakfast Foods", word: "Pancakes", hints: &["Syrup", "Griddle", "Stack"] },
    WordEntry { topic: "Breakfast Foods", word: "Scrambled Eggs", hints: &["Whisk", "Yolk", "Pan"] },
    WordEntry { topic: "Pets", word: "Golden Retriever", hints: &["Fetch", "Fur", "Leash"] },
    WordEntry { topic: "Pets", word: "Siamese Cat", hints: &["Whiskers", "Purr", "Blue eyes"] },
    WordEntry { topic: "Fruits", word: "Mango", hints: &["Tropical", "Pit", "Smoothie"] },
    WordEntry { topic: "Fruits", word: "Pomegranate", hints: &["Seeds", "Red", "Juice"] },
    WordEntry { topic: "Sports", word: "Tennis", hints: &["Racket", "Court", "Serve"] },
    WordEntry { topic: "Sports", word: "Ice Hockey", hints: &["Puck", "Skates", "Rink"] },
    WordEntry { topic: "Countries", word: "Japan", hints: &["Island", "Sushi", "Cherry blossom"] },
    WordEntry { topic: "Countries", word: "Brazil", hints: &["Carnival", "Rainforest", "Samba"] },
    WordEntry { topic: "Movies", word: "Titanic", hints: &["Iceberg", "Ship", "Romance"] },
    WordEntry { topic: "Movies", word: "The Lion King", hints: &["Savanna", "Pride", "Song"] },
    WordEntry { topic: "Vehicles", word: "Motorcycle", hints: &["Helmet", "Two wheels", "Engine"] },
    WordEntry { topic: "Vehicles", word: "Submarine", hints: &["Periscope", "Deep", "Sonar"] },
    WordEntry { topic: "Desserts", word: "Cheesecake", hints: &["Crust", "Creamy", "Slice"] },
    WordEntry { topic: "Desserts", word: "Tiramisu", hints: &["Coffee", "Layers", "Cocoa"] },
    WordEntry { topic: "Musical Instruments", word: "Saxophone", hints: &["Jazz", "Reed", "Brass"] },
    WordEntry { topic: "Musical Instruments", word: "Violin", hints: &["Bow", "Strings", "Orchestra"] },
    WordEntry { topic: "Furniture", word: "Recliner", hints: &["Lever", "Comfy", "Living room"] },
    WordEntry { topic: "Furniture", word: "Bookshelf", hints: &["Shelves", "Library", "Wood"] },
    WordEntry { topic: "Drinks", word: "Cappuccino", hints: &["Foam", "Espresso", "Cafe"] },
    WordEntry { topic: "Drinks", word: "Lemonade", hints: &["Sour", "Summer", "Stand"] },
    WordEntry { topic: "Occupations", word: "Firefighter", hints: &["Hose", "Siren", "Ladder"] },
    WordEntry { topic: "Occupations", word: "Architect", hints: &["Blueprint", "Building", "Design"] },
    WordEntry { topic: "Clothing", word: "Tuxedo", hints: &["Formal", "Bow tie", "Black"] },
    WordEntry { topic: "Clothing", word: "Sneakers", hints: &["Laces", "Running", "Rubber"] },
];

pub const AVATARS: &[&str] = &[
    "😀", "😎", "🤠", "🥳", "😺", "🦊", "🐸", "🦉", "🐙", "🦋", "🌸", "⭐", "🔥", "💎", "🎮", "🎨",
];

/// Pick an avatar no one in `used` has yet. Once the set is exhausted any
/// avatar may repeat.
pub fn pick_avatar<R: Rng + ?Sized>(used: &[&str], rng: &mut R) -> String {
    let available: Vec<&str> = AVATARS
        .iter()
        .copied()
        .filter(|a| !used.contains(a))
        .collect();

    let pool = if available.is_empty() {
        AVATARS
    } else {
        available.as_slice()
    };

    pool.choose(rng).copied().unwrap_or(AVATARS[0]).to_string()
}
