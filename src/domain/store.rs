//! The in-memory record store.
//!
//! The [`Store`] owns every person and, through them, every gift. It is the
//! only way to change records: each operation validates its input, applies
//! the change in one step, and hands the new collection to the persistence
//! [`Backend`]. Operations that refer to a person or gift that no longer
//! exists do nothing.

use std::fmt;

use tracing::instrument;

use crate::{
    domain::{Gift, GiftDraft, Id, Person, PersonDraft, ValidationError},
    storage::{Backend, Detached},
};

/// The authoritative collection of people and their gifts for a session.
#[derive(Debug)]
pub struct Store<B = Detached> {
    people: Vec<Person>,
    selected: Option<Id>,
    backend: B,
}

impl Default for Store<Detached> {
    fn default() -> Self {
        Self::new(Vec::new(), Detached)
    }
}

impl<B: Backend> Store<B> {
    /// Open a store with whatever the backend has saved.
    ///
    /// The first person, if any, is selected.
    pub fn open(backend: B) -> Self {
        let people = backend.load();
        tracing::debug!("Loaded {} people", people.len());
        Self::new(people, backend)
    }

    /// Create a store from an existing collection without saving it.
    ///
    /// The first person, if any, is selected.
    pub fn new(people: Vec<Person>, backend: B) -> Self {
        let selected = people.first().map(|person| person.id.clone());
        Self {
            people,
            selected,
            backend,
        }
    }

    /// Everyone in the store, in the order they were added.
    #[must_use]
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// Look up a person by id.
    #[must_use]
    pub fn person(&self, id: &Id) -> Option<&Person> {
        self.people.iter().find(|person| &person.id == id)
    }

    fn person_mut(&mut self, id: &Id) -> Option<&mut Person> {
        self.people.iter_mut().find(|person| &person.id == id)
    }

    /// The persistence backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The id of the selected person, if any.
    #[must_use]
    pub const fn selected_id(&self) -> Option<&Id> {
        self.selected.as_ref()
    }

    /// The selected person, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Person> {
        self.selected.as_ref().and_then(|id| self.person(id))
    }

    /// Select a person. Returns `false`, leaving the selection alone, if no
    /// person has that id.
    pub fn select(&mut self, id: &Id) -> bool {
        if self.person(id).is_none() {
            tracing::debug!("Cannot select unknown person {id}");
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    /// Add a new person with no gifts and select them.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the draft is invalid. Nothing is
    /// changed in that case.
    #[instrument(level = "debug", skip(self))]
    pub fn add_person(&mut self, draft: PersonDraft) -> Result<Id, ValidationError> {
        let person = Person::from_draft(Id::generate(), draft)?;
        let id = person.id.clone();

        tracing::info!("Added person {} ({id})", person.name);
        self.people.push(person);
        self.selected = Some(id.clone());
        self.save();

        Ok(id)
    }

    /// Replace a person's name, notes and budget. Their gifts are untouched.
    ///
    /// Returns `Ok(false)` if there is no such person.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the draft is invalid. Nothing is
    /// changed in that case.
    #[instrument(level = "debug", skip(self))]
    pub fn edit_person(&mut self, id: &Id, draft: PersonDraft) -> Result<bool, ValidationError> {
        let details = Person::from_draft(id.clone(), draft)?;
        let Some(person) = self.person_mut(id) else {
            tracing::debug!("Ignoring edit of unknown person {id}");
            return Ok(false);
        };

        person.replace_with(details);
        tracing::info!("Updated person {id}");
        self.save();
        Ok(true)
    }

    /// Append a new gift to a person's list.
    ///
    /// Returns `Ok(None)` if there is no such person.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the draft is invalid. Nothing is
    /// changed in that case.
    #[instrument(level = "debug", skip(self))]
    pub fn add_gift(
        &mut self,
        person_id: &Id,
        draft: GiftDraft,
    ) -> Result<Option<Id>, ValidationError> {
        let gift = Gift::from_draft(Id::generate(), draft)?;
        let Some(person) = self.person_mut(person_id) else {
            tracing::debug!("Ignoring new gift for unknown person {person_id}");
            return Ok(None);
        };

        let id = gift.id.clone();
        tracing::info!("Added gift {} ({id}) for {}", gift.title, person.name);
        person.gifts.push(gift);
        self.save();

        Ok(Some(id))
    }

    /// Append a new gift to the selected person's list.
    ///
    /// Returns `Ok(None)` if nobody is selected.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the draft is invalid.
    pub fn add_gift_to_selected(&mut self, draft: GiftDraft) -> Result<Option<Id>, ValidationError> {
        match self.selected.clone() {
            Some(person_id) => self.add_gift(&person_id, draft),
            None => {
                draft.validate()?;
                tracing::debug!("Ignoring new gift: no person selected");
                Ok(None)
            }
        }
    }

    /// Replace every field of a gift except its id.
    ///
    /// Returns `Ok(false)` if the person or the gift can't be found.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the draft is invalid. Nothing is
    /// changed in that case.
    #[instrument(level = "debug", skip(self))]
    pub fn edit_gift(
        &mut self,
        person_id: &Id,
        gift_id: &Id,
        draft: GiftDraft,
    ) -> Result<bool, ValidationError> {
        let replacement = Gift::from_draft(gift_id.clone(), draft)?;
        let Some(gift) = self.gift_mut(person_id, gift_id) else {
            return Ok(false);
        };

        *gift = replacement;
        tracing::info!("Updated gift {gift_id}");
        self.save();
        Ok(true)
    }

    /// Flip a gift's purchased flag, returning the new value.
    ///
    /// Returns `None` if the person or the gift can't be found.
    pub fn toggle_purchased(&mut self, person_id: &Id, gift_id: &Id) -> Option<bool> {
        let gift = self.gift_mut(person_id, gift_id)?;
        gift.purchased = !gift.purchased;
        let purchased = gift.purchased;

        tracing::info!("Marked gift {gift_id} purchased={purchased}");
        self.save();
        Some(purchased)
    }

    /// Mark every gift of a person as purchased.
    ///
    /// Returns `false` if there is no such person.
    pub fn mark_all_purchased(&mut self, person_id: &Id) -> bool {
        self.set_all_purchased(person_id, true)
    }

    /// Mark every gift of a person as not purchased.
    ///
    /// Returns `false` if there is no such person.
    pub fn unmark_all_purchased(&mut self, person_id: &Id) -> bool {
        self.set_all_purchased(person_id, false)
    }

    fn set_all_purchased(&mut self, person_id: &Id, purchased: bool) -> bool {
        let Some(person) = self.person_mut(person_id) else {
            tracing::debug!("Ignoring bulk update for unknown person {person_id}");
            return false;
        };

        for gift in &mut person.gifts {
            gift.purchased = purchased;
        }
        tracing::info!(
            "Marked {} gifts of {person_id} purchased={purchased}",
            person.gifts.len()
        );
        self.save();
        true
    }

    fn gift_mut(&mut self, person_id: &Id, gift_id: &Id) -> Option<&mut Gift> {
        let gift = self
            .person_mut(person_id)
            .and_then(|person| person.gift_mut(gift_id));
        if gift.is_none() {
            tracing::debug!("Gift {gift_id} of person {person_id} not found");
        }
        gift
    }

    /// Ask to delete something.
    ///
    /// Deletion can't be undone, so it happens in two steps: this method
    /// describes what would be removed, and [`Store::commit_delete`] removes
    /// it once the user has agreed.
    ///
    /// Returns `None` if the target doesn't exist, or if there is nothing to
    /// delete (a person with no purchased gifts).
    #[must_use]
    pub fn request_delete(&self, target: DeleteTarget) -> Option<ConfirmationToken> {
        let (title, message) = match &target {
            DeleteTarget::Person(id) => {
                let person = self.person(id)?;
                (
                    "Delete Person",
                    format!(
                        "Are you sure you want to delete {}? This will also delete all their gift \
                         ideas.",
                        person.name
                    ),
                )
            }
            DeleteTarget::Gift { person, gift } => {
                self.person(person)?.gift(gift)?;
                (
                    "Delete Gift",
                    "Are you sure you want to delete this gift idea?".to_string(),
                )
            }
            DeleteTarget::PurchasedGifts(id) => {
                let person = self.person(id)?;
                let count = person.gifts.iter().filter(|gift| gift.purchased).count();
                if count == 0 {
                    return None;
                }
                (
                    "Delete Purchased Gifts",
                    format!(
                        "Are you sure you want to delete {count} purchased gift(s) for {}? This \
                         cannot be undone.",
                        person.name
                    ),
                )
            }
        };

        Some(ConfirmationToken {
            target,
            title,
            message,
        })
    }

    /// Carry out a confirmed deletion.
    ///
    /// Returns `false` if the target disappeared since the token was issued.
    ///
    /// Deleting the selected person moves the selection to the first
    /// remaining person, or clears it if nobody is left.
    #[instrument(level = "debug", skip(self), fields(target = %token.target))]
    pub fn commit_delete(&mut self, token: ConfirmationToken) -> bool {
        let deleted = match token.target {
            DeleteTarget::Person(id) => self.delete_person(&id),
            DeleteTarget::Gift { person, gift } => self.delete_gift(&person, &gift),
            DeleteTarget::PurchasedGifts(id) => self.delete_purchased_gifts(&id),
        };

        if deleted {
            self.save();
        }
        deleted
    }

    fn delete_person(&mut self, id: &Id) -> bool {
        let before = self.people.len();
        self.people.retain(|person| &person.id != id);
        if self.people.len() == before {
            tracing::debug!("Person {id} already gone");
            return false;
        }

        if self.selected.as_ref() == Some(id) {
            self.selected = self.people.first().map(|person| person.id.clone());
        }
        tracing::info!("Deleted person {id}");
        true
    }

    fn delete_gift(&mut self, person_id: &Id, gift_id: &Id) -> bool {
        let Some(person) = self.person_mut(person_id) else {
            return false;
        };
        let before = person.gifts.len();
        person.gifts.retain(|gift| &gift.id != gift_id);
        let deleted = person.gifts.len() != before;
        if deleted {
            tracing::info!("Deleted gift {gift_id}");
        }
        deleted
    }

    fn delete_purchased_gifts(&mut self, person_id: &Id) -> bool {
        let Some(person) = self.person_mut(person_id) else {
            return false;
        };
        let before = person.gifts.len();
        person.gifts.retain(|gift| !gift.purchased);
        let removed = before - person.gifts.len();
        tracing::info!("Deleted {removed} purchased gifts of {person_id}");
        removed > 0
    }

    /// Swap the whole collection for an imported one.
    ///
    /// The first imported person, if any, becomes selected.
    pub fn replace_all(&mut self, people: Vec<Person>) {
        tracing::info!("Replacing store with {} people", people.len());
        self.selected = people.first().map(|person| person.id.clone());
        self.people = people;
        self.save();
    }

    fn save(&self) {
        if let Err(e) = self.backend.save(&self.people) {
            tracing::warn!("Failed to save data: {e}");
        }
    }
}

/// Something that can be deleted from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// A person and all of their gifts.
    Person(Id),
    /// A single gift.
    Gift {
        /// The owner of the gift.
        person: Id,
        /// The gift to delete.
        gift: Id,
    },
    /// Every purchased gift of a person.
    PurchasedGifts(Id),
}

impl fmt::Display for DeleteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person(id) => write!(f, "person {id}"),
            Self::Gift { person, gift } => write!(f, "gift {gift} of {person}"),
            Self::PurchasedGifts(id) => write!(f, "purchased gifts of {id}"),
        }
    }
}

/// Permission to perform one deletion, issued by [`Store::request_delete`].
///
/// Tokens can only be created by the store and are used up by
/// [`Store::commit_delete`].
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmationToken {
    target: DeleteTarget,
    title: &'static str,
    message: String,
}

impl ConfirmationToken {
    /// What will be deleted.
    #[must_use]
    pub const fn target(&self) -> &DeleteTarget {
        &self.target
    }

    /// A short heading for the confirmation prompt.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.title
    }

    /// The question to put to the user.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        domain::{
            Field,
            summary::{total_cost, total_spent},
        },
        storage::PersistenceError,
    };

    /// Records every save so tests can check that mutations are persisted.
    #[derive(Debug, Default, Clone)]
    struct Recorder {
        saves: Rc<RefCell<Vec<Vec<Person>>>>,
        fail: bool,
    }

    impl Backend for Recorder {
        fn load(&self) -> Vec<Person> {
            Vec::new()
        }

        fn save(&self, people: &[Person]) -> Result<(), PersistenceError> {
            self.saves.borrow_mut().push(people.to_vec());
            if self.fail {
                Err(PersistenceError::Io(std::io::Error::other("disk full")))
            } else {
                Ok(())
            }
        }
    }

    impl Recorder {
        fn count(&self) -> usize {
            self.saves.borrow().len()
        }
    }

    fn gift_draft(title: &str, price: f64, purchased: bool) -> GiftDraft {
        GiftDraft {
            price,
            purchased,
            ..GiftDraft::new(title)
        }
    }

    fn store_with_alex() -> (Store, Id) {
        let mut store = Store::new(Vec::new(), Detached);
        let alex = store
            .add_person(PersonDraft {
                budget: 100.0,
                ..PersonDraft::new("Alex")
            })
            .unwrap();
        (store, alex)
    }

    #[test]
    fn add_person_selects_them() {
        let mut store = Store::new(Vec::new(), Detached);
        let first = store.add_person(PersonDraft::new("Alex")).unwrap();
        assert_eq!(store.selected_id(), Some(&first));

        let second = store.add_person(PersonDraft::new("Sam")).unwrap();
        assert_eq!(store.selected_id(), Some(&second));
        assert_eq!(store.people().len(), 2);
        assert!(store.person(&second).unwrap().gifts().is_empty());
    }

    #[test]
    fn blank_name_is_rejected_without_change() {
        let recorder = Recorder::default();
        let mut store = Store::new(Vec::new(), recorder.clone());

        let error = store.add_person(PersonDraft::new("  ")).unwrap_err();

        assert_eq!(error.field, Field::Name);
        assert!(store.people().is_empty());
        assert_eq!(store.selected_id(), None);
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn stored_notes_are_trimmed() {
        let mut store = Store::new(Vec::new(), Detached);
        let alex = store
            .add_person(PersonDraft {
                notes: "  likes games \n".to_string(),
                ..PersonDraft::new("Alex")
            })
            .unwrap();
        assert_eq!(store.person(&alex).unwrap().notes(), "likes games");
    }

    #[test]
    fn edit_person_keeps_id_and_gifts() {
        let (mut store, alex) = store_with_alex();
        store.add_gift(&alex, GiftDraft::new("Book")).unwrap();

        let edited = store
            .edit_person(&alex, PersonDraft {
                name: "Alexandra".to_string(),
                notes: "prefers e-books".to_string(),
                budget: 0.0,
            })
            .unwrap();

        assert!(edited);
        let person = store.person(&alex).unwrap();
        assert_eq!(person.name(), "Alexandra");
        assert_eq!(person.gifts().len(), 1);
        assert!(!person.has_budget());
    }

    #[test]
    fn edit_unknown_person_is_a_no_op() {
        let (mut store, _) = store_with_alex();
        let before = store.people().to_vec();

        let edited = store
            .edit_person(&Id::from("missing"), PersonDraft::new("Ghost"))
            .unwrap();

        assert!(!edited);
        assert_eq!(store.people(), before.as_slice());
    }

    #[test]
    fn add_gift_appends_in_order() {
        let (mut store, alex) = store_with_alex();
        let first = store.add_gift(&alex, GiftDraft::new("Book")).unwrap().unwrap();
        let second = store.add_gift(&alex, GiftDraft::new("Scarf")).unwrap().unwrap();

        let ids: Vec<&Id> = store.person(&alex).unwrap().gifts().iter().map(Gift::id).collect();
        assert_eq!(ids, [&first, &second]);
    }

    #[test]
    fn add_gift_for_unknown_person_is_a_no_op() {
        let (mut store, _) = store_with_alex();
        let added = store
            .add_gift(&Id::from("missing"), GiftDraft::new("Book"))
            .unwrap();
        assert_eq!(added, None);
    }

    #[test]
    fn add_gift_to_selected_requires_a_selection() {
        let mut store = Store::new(Vec::new(), Detached);
        assert_eq!(store.add_gift_to_selected(GiftDraft::new("Book")), Ok(None));

        let alex = store.add_person(PersonDraft::new("Alex")).unwrap();
        let gift = store
            .add_gift_to_selected(GiftDraft::new("Book"))
            .unwrap()
            .unwrap();
        assert!(store.person(&alex).unwrap().gift(&gift).is_some());
    }

    #[test]
    fn invalid_url_blocks_add_and_edit() {
        let (mut store, alex) = store_with_alex();
        let gift = store.add_gift(&alex, GiftDraft::new("Book")).unwrap().unwrap();

        let bad = GiftDraft {
            url: "not a url".to_string(),
            ..GiftDraft::new("Lamp")
        };
        let error = store.add_gift(&alex, bad.clone()).unwrap_err();
        assert_eq!(error.field, Field::Url);

        let error = store.edit_gift(&alex, &gift, bad).unwrap_err();
        assert_eq!(error.field, Field::Url);

        let person = store.person(&alex).unwrap();
        assert_eq!(person.gifts().len(), 1);
        assert_eq!(person.gifts()[0].title(), "Book");
    }

    #[test]
    fn edit_gift_replaces_fields_but_keeps_id() {
        let (mut store, alex) = store_with_alex();
        let gift = store
            .add_gift(&alex, gift_draft("Book", 10.0, false))
            .unwrap()
            .unwrap();

        let edited = store
            .edit_gift(&alex, &gift, GiftDraft {
                tags: vec!["books".to_string()],
                ..gift_draft("Hardback", 25.0, true)
            })
            .unwrap();

        assert!(edited);
        let updated = store.person(&alex).unwrap().gift(&gift).unwrap();
        assert_eq!(updated.id(), &gift);
        assert_eq!(updated.title(), "Hardback");
        assert!(updated.purchased());
        assert_eq!(updated.tags(), ["books"]);
    }

    #[test]
    fn edit_unknown_gift_is_a_no_op() {
        let (mut store, alex) = store_with_alex();
        let edited = store
            .edit_gift(&alex, &Id::from("missing"), GiftDraft::new("Anything"))
            .unwrap();
        assert!(!edited);
    }

    #[test]
    fn toggle_flips_purchased() {
        let (mut store, alex) = store_with_alex();
        let gift = store.add_gift(&alex, GiftDraft::new("Book")).unwrap().unwrap();

        assert_eq!(store.toggle_purchased(&alex, &gift), Some(true));
        assert_eq!(store.toggle_purchased(&alex, &gift), Some(false));
        assert_eq!(store.toggle_purchased(&alex, &Id::from("missing")), None);
    }

    #[test]
    fn bulk_mark_and_unmark() {
        let (mut store, alex) = store_with_alex();
        store.add_gift(&alex, gift_draft("a", 1.0, false)).unwrap();
        store.add_gift(&alex, gift_draft("b", 2.0, true)).unwrap();

        assert!(store.mark_all_purchased(&alex));
        let gifts = store.person(&alex).unwrap().gifts();
        assert!((total_spent(gifts) - total_cost(gifts)).abs() < f64::EPSILON);

        assert!(store.unmark_all_purchased(&alex));
        assert!(total_spent(store.person(&alex).unwrap().gifts()).abs() < f64::EPSILON);

        assert!(!store.mark_all_purchased(&Id::from("missing")));
    }

    #[test]
    fn deleting_a_person_removes_their_gifts() {
        let (mut store, alex) = store_with_alex();
        store.add_gift(&alex, GiftDraft::new("Book")).unwrap();
        let sam = store.add_person(PersonDraft::new("Sam")).unwrap();

        let token = store
            .request_delete(DeleteTarget::Person(alex.clone()))
            .unwrap();
        assert_eq!(token.title(), "Delete Person");
        assert!(token.message().contains("Alex"));
        assert!(store.commit_delete(token));

        assert!(store.person(&alex).is_none());
        assert_eq!(store.people().len(), 1);
        assert!(store.people().iter().all(|p| p.id() == &sam));
    }

    #[test]
    fn request_alone_changes_nothing() {
        let (store, alex) = store_with_alex();
        let _token = store.request_delete(DeleteTarget::Person(alex.clone()));
        assert!(store.person(&alex).is_some());
    }

    #[test]
    fn deleting_selected_person_selects_first_remaining() {
        let mut store = Store::new(Vec::new(), Detached);
        let alex = store.add_person(PersonDraft::new("Alex")).unwrap();
        let sam = store.add_person(PersonDraft::new("Sam")).unwrap();
        let kim = store.add_person(PersonDraft::new("Kim")).unwrap();
        assert_eq!(store.selected_id(), Some(&kim));

        let token = store.request_delete(DeleteTarget::Person(kim)).unwrap();
        store.commit_delete(token);
        assert_eq!(store.selected_id(), Some(&alex));

        // Deleting someone else leaves the selection alone.
        let token = store.request_delete(DeleteTarget::Person(sam)).unwrap();
        store.commit_delete(token);
        assert_eq!(store.selected_id(), Some(&alex));

        let token = store
            .request_delete(DeleteTarget::Person(alex))
            .unwrap();
        store.commit_delete(token);
        assert_eq!(store.selected_id(), None);
        assert!(store.selected().is_none());
    }

    #[test]
    fn delete_single_gift() {
        let (mut store, alex) = store_with_alex();
        let book = store.add_gift(&alex, GiftDraft::new("Book")).unwrap().unwrap();
        let scarf = store.add_gift(&alex, GiftDraft::new("Scarf")).unwrap().unwrap();

        let token = store
            .request_delete(DeleteTarget::Gift {
                person: alex.clone(),
                gift: book.clone(),
            })
            .unwrap();
        assert!(store.commit_delete(token));

        let person = store.person(&alex).unwrap();
        assert!(person.gift(&book).is_none());
        assert!(person.gift(&scarf).is_some());
    }

    #[test]
    fn delete_purchased_keeps_the_rest() {
        let (mut store, alex) = store_with_alex();
        store.add_gift(&alex, gift_draft("bought", 5.0, true)).unwrap();
        let pending = store
            .add_gift(&alex, gift_draft("pending", 7.0, false))
            .unwrap()
            .unwrap();

        let token = store
            .request_delete(DeleteTarget::PurchasedGifts(alex.clone()))
            .unwrap();
        assert!(token.message().contains("1 purchased"));
        assert!(store.commit_delete(token));

        let gifts = store.person(&alex).unwrap().gifts();
        assert_eq!(gifts.len(), 1);
        assert_eq!(gifts[0].id(), &pending);

        // Nothing left to delete, so there is nothing to confirm.
        assert!(
            store
                .request_delete(DeleteTarget::PurchasedGifts(alex))
                .is_none()
        );
    }

    #[test]
    fn request_for_missing_target_is_refused() {
        let (store, alex) = store_with_alex();
        assert!(
            store
                .request_delete(DeleteTarget::Person(Id::from("missing")))
                .is_none()
        );
        assert!(
            store
                .request_delete(DeleteTarget::Gift {
                    person: alex,
                    gift: Id::from("missing"),
                })
                .is_none()
        );
    }

    #[test]
    fn stale_token_commits_nothing() {
        let (mut store, alex) = store_with_alex();
        let first = store
            .request_delete(DeleteTarget::Person(alex.clone()))
            .unwrap();
        let second = store.request_delete(DeleteTarget::Person(alex)).unwrap();

        assert!(store.commit_delete(first));
        assert!(!store.commit_delete(second));
    }

    #[test]
    fn every_mutation_is_saved() {
        let recorder = Recorder::default();
        let mut store = Store::new(Vec::new(), recorder.clone());

        let alex = store.add_person(PersonDraft::new("Alex")).unwrap();
        let gift = store.add_gift(&alex, GiftDraft::new("Book")).unwrap().unwrap();
        store.toggle_purchased(&alex, &gift);
        store.mark_all_purchased(&alex);
        let token = store.request_delete(DeleteTarget::Person(alex)).unwrap();
        store.commit_delete(token);

        assert_eq!(recorder.count(), 5);
        assert!(recorder.saves.borrow().last().unwrap().is_empty());
    }

    #[test]
    fn no_op_lookups_are_not_saved() {
        let recorder = Recorder::default();
        let mut store = Store::new(Vec::new(), recorder.clone());
        let missing = Id::from("missing");

        store.toggle_purchased(&missing, &missing);
        store.unmark_all_purchased(&missing);
        store.edit_person(&missing, PersonDraft::new("x")).unwrap();

        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn save_failures_do_not_block_mutations() {
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let mut store = Store::new(Vec::new(), recorder);

        let alex = store.add_person(PersonDraft::new("Alex")).unwrap();
        assert!(store.person(&alex).is_some());
    }

    #[test]
    fn replace_all_selects_first_person() {
        let (mut store, _) = store_with_alex();
        let mut other = Store::new(Vec::new(), Detached);
        let kim = other.add_person(PersonDraft::new("Kim")).unwrap();
        other.add_person(PersonDraft::new("Lee")).unwrap();

        store.replace_all(other.people().to_vec());
        assert_eq!(store.people(), other.people());
        assert_eq!(store.selected_id(), Some(&kim));

        store.replace_all(Vec::new());
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn open_selects_first_loaded_person() {
        let (source, alex) = store_with_alex();
        let store = Store::new(source.people().to_vec(), Detached);
        assert_eq!(store.selected_id(), Some(&alex));
        assert!(Store::open(Detached).people().is_empty());
    }

    #[test]
    fn select_unknown_person_keeps_selection() {
        let (mut store, alex) = store_with_alex();
        assert!(!store.select(&Id::from("missing")));
        assert_eq!(store.selected_id(), Some(&alex));
    }
}
