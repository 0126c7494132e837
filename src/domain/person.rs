use crate::domain::{
    Gift, Id,
    validation::{self, Field, RequiredText, ValidationError},
};

/// Someone to buy gifts for.
///
/// A person owns their gift ideas outright: removing the person removes every
/// gift with them.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub(crate) id: Id,
    pub(crate) name: RequiredText,
    pub(crate) notes: String,
    pub(crate) budget: f64,
    pub(crate) gifts: Vec<Gift>,
}

impl Person {
    /// Check a draft and build a person with no gifts from it.
    pub(crate) fn from_draft(id: Id, draft: PersonDraft) -> Result<Self, ValidationError> {
        let draft = draft.validate()?;
        Ok(Self {
            id,
            name: validation::required(Field::Name, &draft.name)?,
            notes: draft.notes,
            budget: draft.budget,
            gifts: Vec::new(),
        })
    }

    /// Take the editable fields from `details`. The id and the gifts are kept.
    pub(crate) fn replace_with(&mut self, details: Self) {
        self.name = details.name;
        self.notes = details.notes;
        self.budget = details.budget;
    }

    /// The person's unique identifier.
    #[must_use]
    pub const fn id(&self) -> &Id {
        &self.id
    }

    /// Display name, also used to order the list of people.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form notes.
    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Spending cap in dollars.
    ///
    /// `0` means no budget has been set. A deliberate zero budget can't be
    /// told apart from "unset"; saved data from older versions relies on this.
    #[must_use]
    pub const fn budget(&self) -> f64 {
        self.budget
    }

    /// Returns `true` if a budget has been set.
    #[must_use]
    pub fn has_budget(&self) -> bool {
        self.budget != 0.0
    }

    /// Gift ideas in the order they were added.
    #[must_use]
    pub fn gifts(&self) -> &[Gift] {
        &self.gifts
    }

    /// Look up a gift by id.
    #[must_use]
    pub fn gift(&self, id: &Id) -> Option<&Gift> {
        self.gifts.iter().find(|gift| &gift.id == id)
    }

    pub(crate) fn gift_mut(&mut self, id: &Id) -> Option<&mut Gift> {
        self.gifts.iter_mut().find(|gift| &gift.id == id)
    }

    /// Returns `true` if any of the person's gifts carries `tag`.
    #[must_use]
    pub fn has_gift_tagged(&self, tag: &str) -> bool {
        self.gifts.iter().any(|gift| gift.has_tag(tag))
    }
}

/// The user-editable fields of a person.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonDraft {
    /// Display name. Required.
    pub name: String,
    /// Free-form notes.
    pub notes: String,
    /// Spending cap in dollars; `0` for none.
    pub budget: f64,
}

impl PersonDraft {
    /// A draft with the given name, no notes and no budget.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check the draft and normalise its text fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name is blank or the budget is
    /// negative.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validation::required(Field::Name, &self.name)?.into(),
            notes: self.notes.trim().to_string(),
            budget: validation::amount(Field::Budget, self.budget)?,
        })
    }
}

impl From<&Person> for PersonDraft {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.to_string(),
            notes: person.notes.clone(),
            budget: person.budget,
        }
    }
}
