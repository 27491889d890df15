/// Icon catalog and the availability filter used by the category editor.
use std::collections::HashSet;

use crate::types::Category;

/// Every icon a category can carry, in picker order, with its terminal glyph.
pub const ICON_CATALOG: &[(&str, &str)] = &[
    ("utensils", "🍴"),
    ("coffee", "☕"),
    ("shopping-cart", "🛒"),
    ("shopping-bag", "🛍"),
    ("shirt", "👕"),
    ("plane", "✈"),
    ("car", "🚗"),
    ("bus", "🚌"),
    ("fuel", "⛽"),
    ("train", "🚆"),
    ("home", "🏠"),
    ("zap", "⚡"),
    ("droplet", "💧"),
    ("wifi", "📶"),
    ("smartphone", "📱"),
    ("receipt", "🧾"),
    ("film", "🎬"),
    ("music", "🎵"),
    ("gamepad", "🎮"),
    ("book", "📖"),
    ("graduation-cap", "🎓"),
    ("heart-pulse", "💓"),
    ("pill", "💊"),
    ("dumbbell", "🏋"),
    ("gift", "🎁"),
    ("baby", "👶"),
    ("paw-print", "🐾"),
    ("wrench", "🔧"),
    ("briefcase", "💼"),
    ("landmark", "🏛"),
    ("piggy-bank", "🐷"),
    ("wallet", "👛"),
    ("credit-card", "💳"),
    ("arrow-left-right", "⇄"),
    ("trending-up", "📈"),
    ("shield", "🛡"),
    ("scissors", "✂"),
    ("package", "📦"),
];

/// Icon identifiers in catalog order.
pub fn catalog() -> Vec<&'static str> {
    ICON_CATALOG.iter().map(|(name, _)| *name).collect()
}

/// Terminal glyph for an icon, or a neutral marker for unknown names.
pub fn glyph(name: &str) -> &'static str {
    ICON_CATALOG
        .iter()
        .find(|(icon, _)| *icon == name)
        .map(|(_, glyph)| *glyph)
        .unwrap_or("•")
}

/// Icons still free for assignment, in catalog order.
///
/// An icon is taken once any category carries it. The category being edited
/// keeps its own icon selectable.
pub fn filter_available_icons<'a>(
    catalog: &[&'a str],
    categories: &[Category],
    editing: Option<&Category>,
) -> Vec<&'a str> {
    let mut used: HashSet<&str> = categories
        .iter()
        .filter_map(|category| category.icon_name.as_deref())
        .collect();
    if let Some(own) = editing.and_then(|category| category.icon_name.as_deref()) {
        used.remove(own);
    }
    catalog
        .iter()
        .copied()
        .filter(|icon| !used.contains(icon))
        .collect()
}
