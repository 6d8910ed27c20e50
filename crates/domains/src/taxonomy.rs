//! # Taxonomy
//!
//! The static category/subcategory tree threads are filed under.
//! Immutable once built; threads reference categories by id.

use serde::{Deserialize, Serialize};

use crate::error::{ForumError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    pub fn subcategory(&self, id: &str) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Checks that `category_id` exists and, when given, that
    /// `subcategory_id` belongs to it.
    pub fn validate(&self, category_id: &str, subcategory_id: Option<&str>) -> Result<&Category> {
        let category = self
            .category(category_id)
            .ok_or_else(|| ForumError::InvalidCategory(category_id.to_string()))?;
        if let Some(sub) = subcategory_id {
            if category.subcategory(sub).is_none() {
                return Err(ForumError::InvalidCategory(format!("{category_id}/{sub}")));
            }
        }
        Ok(category)
    }

    /// The default community layout.
    pub fn builtin() -> Self {
        Self::new(vec![
            category(
                "ANNOUNCEMENTS",
                "Announcements",
                "📢",
                "News and updates from the team",
                &[("NEWS", "News", "📰"), ("EVENTS", "Events", "📅")],
            ),
            category(
                "GENERAL",
                "General Discussion",
                "💬",
                "Anything that doesn't fit elsewhere",
                &[
                    ("INTRODUCTIONS", "Introductions", "👋"),
                    ("FEEDBACK", "Feedback", "📝"),
                    ("OFFTOPIC", "Off-Topic", "🌀"),
                ],
            ),
            category(
                "GAMES",
                "Games",
                "🎮",
                "Strategy, guides and game talk",
                &[
                    ("STRATEGY", "Strategy", "♟"),
                    ("GUIDES", "Guides", "🗺"),
                    ("LFG", "Looking for Group", "🤝"),
                ],
            ),
            category(
                "TECH",
                "Technology",
                "🖥",
                "Software, hardware and AI",
                &[
                    ("AI", "Artificial Intelligence", "🤖"),
                    ("DEV", "Development", "⌨"),
                    ("HARDWARE", "Hardware", "🔧"),
                ],
            ),
            category(
                "CREATIVE",
                "Creative",
                "🎨",
                "Art, music, writing and showcases",
                &[
                    ("ART", "Art", "🖌"),
                    ("MUSIC", "Music", "🎵"),
                    ("WRITING", "Writing", "✍"),
                ],
            ),
            category(
                "HELP",
                "Help & Support",
                "🛟",
                "Questions with accepted answers",
                &[("QUESTIONS", "Questions", "❓"), ("BUGS", "Bug Reports", "🐞")],
            ),
        ])
    }
}

fn category(
    id: &str,
    name: &str,
    icon: &str,
    description: &str,
    subcategories: &[(&str, &str, &str)],
) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        subcategories: subcategories
            .iter()
            .map(|(id, name, icon)| Subcategory {
                id: id.to_string(),
                name: name.to_string(),
                icon: icon.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_category_and_subcategory() {
        let taxonomy = Taxonomy::builtin();
        assert!(taxonomy.validate("GAMES", None).is_ok());
        assert!(taxonomy.validate("GAMES", Some("STRATEGY")).is_ok());
        assert_eq!(
            taxonomy.validate("NOPE", None),
            Err(ForumError::InvalidCategory("NOPE".into()))
        );
        // subcategory of a different category
        assert!(matches!(
            taxonomy.validate("GAMES", Some("AI")),
            Err(ForumError::InvalidCategory(_))
        ));
    }
}
