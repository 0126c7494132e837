use std::{fmt, str::FromStr};

use chrono::NaiveDate;

use crate::domain::{
    Id,
    validation::{self, Field, RequiredText, ValidationError},
};

/// How important a gift idea is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    /// Nice to have.
    Low,
    /// The default for gifts that don't say otherwise.
    #[default]
    Medium,
    /// Top of the list.
    High,
}

impl Priority {
    /// Sort weight: higher weights sort first under priority ordering.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// The lowercase name used in saved data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown priority name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority '{0}' (expected low, medium or high)")]
pub struct UnknownPriority(String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(UnknownPriority(s.to_string())),
        }
    }
}

/// A gift idea for one person.
#[derive(Debug, Clone, PartialEq)]
pub struct Gift {
    pub(crate) id: Id,
    pub(crate) title: RequiredText,
    pub(crate) price: f64,
    pub(crate) purchased: bool,
    pub(crate) url: String,
    pub(crate) priority: Priority,
    pub(crate) tags: Vec<String>,
    pub(crate) image_url: String,
    pub(crate) due_date: Option<NaiveDate>,
}

impl Gift {
    /// Check a draft and build a gift from it.
    pub(crate) fn from_draft(id: Id, draft: GiftDraft) -> Result<Self, ValidationError> {
        let draft = draft.validate()?;
        Ok(Self {
            id,
            title: validation::required(Field::Title, &draft.title)?,
            price: draft.price,
            purchased: draft.purchased,
            url: draft.url,
            priority: draft.priority,
            tags: draft.tags,
            image_url: draft.image_url,
            due_date: draft.due_date,
        })
    }

    /// The gift's unique identifier within its owner.
    #[must_use]
    pub const fn id(&self) -> &Id {
        &self.id
    }

    /// Short description of the gift.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Price in dollars. Never negative.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Whether the gift has been bought.
    #[must_use]
    pub const fn purchased(&self) -> bool {
        self.purchased
    }

    /// Product link, or an empty string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// How important the gift is.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Labels in the order they were entered.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns `true` if the gift carries `tag` (exact match).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Image link, or an empty string.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// The day the gift is needed by, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

/// The full set of user-editable gift fields.
///
/// Used both to create a gift and to replace an existing gift's fields on
/// edit. Drafts are checked before they reach the store: the title must not
/// be blank, the price must not be negative, and both links must be empty or
/// valid URLs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GiftDraft {
    /// Short description. Required.
    pub title: String,
    /// Price in dollars.
    pub price: f64,
    /// Whether the gift has been bought.
    pub purchased: bool,
    /// Product link, may be empty.
    pub url: String,
    /// How important the gift is.
    pub priority: Priority,
    /// Labels; blank entries are dropped.
    pub tags: Vec<String>,
    /// Image link, may be empty.
    pub image_url: String,
    /// The day the gift is needed by.
    pub due_date: Option<NaiveDate>,
}

impl GiftDraft {
    /// A draft with the given title and every other field at its default.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Check the draft and normalise its text fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first field that fails.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: validation::required(Field::Title, &self.title)?.into(),
            price: validation::amount(Field::Price, self.price)?,
            purchased: self.purchased,
            url: validation::optional_url(Field::Url, &self.url)?,
            priority: self.priority,
            tags: normalise_tags(self.tags),
            image_url: validation::optional_url(Field::ImageUrl, &self.image_url)?,
            due_date: self.due_date,
        })
    }
}

impl From<&Gift> for GiftDraft {
    fn from(gift: &Gift) -> Self {
        Self {
            title: gift.title.to_string(),
            price: gift.price,
            purchased: gift.purchased,
            url: gift.url.clone(),
            priority: gift.priority,
            tags: gift.tags.clone(),
            image_url: gift.image_url.clone(),
            due_date: gift.due_date,
        }
    }
}

/// Split comma separated tag input into trimmed, non-empty labels.
#[must_use]
pub fn parse_tags(text: &str) -> Vec<String> {
    normalise_tags(text.split(','))
}

fn normalise_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::validation::Problem;

    #[test_case("low" => Ok(Priority::Low); "low")]
    #[test_case("HIGH" => Ok(Priority::High); "uppercase")]
    #[test_case(" medium " => Ok(Priority::Medium); "padded")]
    #[test_case("urgent" => Err(UnknownPriority("urgent".to_string())); "unknown")]
    fn priority_parsing(text: &str) -> Result<Priority, UnknownPriority> {
        text.parse()
    }

    #[test]
    fn priority_weights_are_ordered() {
        assert!(Priority::High.weight() > Priority::Medium.weight());
        assert!(Priority::Medium.weight() > Priority::Low.weight());
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn validate_trims_and_drops_blank_tags() {
        let draft = GiftDraft {
            title: "  Lego set ".to_string(),
            url: " https://example.com/lego ".to_string(),
            tags: vec![" toys ".to_string(), "  ".to_string(), "kids".to_string()],
            ..GiftDraft::default()
        }
        .validate()
        .unwrap();

        assert_eq!(draft.title, "Lego set");
        assert_eq!(draft.url, "https://example.com/lego");
        assert_eq!(draft.tags, ["toys", "kids"]);
    }

    #[test]
    fn validate_rejects_bad_image_url() {
        let error = GiftDraft {
            image_url: "picture.png".to_string(),
            ..GiftDraft::new("Scarf")
        }
        .validate()
        .unwrap_err();

        assert_eq!(error.field, Field::ImageUrl);
        assert_eq!(error.problem, Problem::InvalidUrl);
    }

    #[test]
    fn validate_rejects_blank_title() {
        let error = GiftDraft::new("   ").validate().unwrap_err();
        assert_eq!(error.field, Field::Title);
    }

    #[test]
    fn parse_tags_splits_on_commas() {
        assert_eq!(parse_tags("toys, books,,  outdoors "), [
            "toys", "books", "outdoors"
        ]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn draft_from_gift_round_trips() {
        let draft = GiftDraft {
            price: 12.5,
            priority: Priority::High,
            tags: vec!["books".to_string()],
            due_date: NaiveDate::from_ymd_opt(2024, 12, 24),
            ..GiftDraft::new("Novel")
        };
        let gift = Gift::from_draft(Id::from("g1"), draft.clone()).unwrap();
        assert_eq!(GiftDraft::from(&gift), draft);
        assert_eq!(gift.id().as_str(), "g1");
    }
}
