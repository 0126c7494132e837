//! Read-only views over the store: filtering and sorting of gifts and people.
//!
//! Nothing here mutates the collections it is given. Views borrow from the
//! underlying records.

use std::{cmp::Ordering, collections::BTreeSet, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::domain::{Clock, Gift, Person};

/// Number of days ahead (inclusive) that counts as "due soon".
pub const DUE_SOON_DAYS: i64 = 7;

/// Restricts a view to gifts carrying one tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    /// No restriction.
    #[default]
    All,
    /// Keep gifts tagged with exactly this label.
    Tag(String),
}

impl TagFilter {
    /// Returns `true` if `gift` passes the filter.
    #[must_use]
    pub fn matches(&self, gift: &Gift) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => gift.has_tag(tag),
        }
    }
}

impl FromStr for TagFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            Ok(Self::All)
        } else {
            Ok(Self::Tag(s.to_string()))
        }
    }
}

/// Restricts a view by purchase state or due date. Only one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// No restriction.
    #[default]
    All,
    /// Only bought gifts.
    Purchased,
    /// Only gifts still to buy.
    NotPurchased,
    /// Only gifts due within the next [`DUE_SOON_DAYS`] days, today included.
    DueSoon,
}

impl StatusFilter {
    /// Returns `true` if `gift` passes the filter on the given day.
    #[must_use]
    pub fn matches(self, gift: &Gift, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Purchased => gift.purchased(),
            Self::NotPurchased => !gift.purchased(),
            Self::DueSoon => is_due_soon(gift, today),
        }
    }
}

/// Error returned when parsing an unknown filter or sort name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what} '{value}'")]
pub struct UnknownOption {
    what: &'static str,
    value: String,
}

/// Lowercase and strip separators so `price-asc`, `price_asc` and
/// `priceAsc` are all accepted.
fn option_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(*c, '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for StatusFilter {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match option_key(s).as_str() {
            "all" => Ok(Self::All),
            "purchased" => Ok(Self::Purchased),
            "notpurchased" => Ok(Self::NotPurchased),
            "duesoon" => Ok(Self::DueSoon),
            _ => Err(UnknownOption {
                what: "status filter",
                value: s.to_string(),
            }),
        }
    }
}

/// Ordering applied after filtering. All orderings are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Keep the order the gifts were added in.
    #[default]
    Default,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
    /// High, then medium, then low priority.
    Priority,
}

impl SortOrder {
    /// Sort `gifts` in place. Ties keep their relative order.
    pub fn sort(self, gifts: &mut [&Gift]) {
        match self {
            Self::Default => {}
            Self::PriceAsc => gifts.sort_by(|a, b| a.price().total_cmp(&b.price())),
            Self::PriceDesc => gifts.sort_by(|a, b| b.price().total_cmp(&a.price())),
            Self::Priority => {
                gifts.sort_by_key(|gift| std::cmp::Reverse(gift.priority().weight()));
            }
        }
    }

    /// The name used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::PriceAsc => "priceAsc",
            Self::PriceDesc => "priceDesc",
            Self::Priority => "priority",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match option_key(s).as_str() {
            "default" => Ok(Self::Default),
            "priceasc" => Ok(Self::PriceAsc),
            "pricedesc" => Ok(Self::PriceDesc),
            "priority" => Ok(Self::Priority),
            _ => Err(UnknownOption {
                what: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

/// The user's current selection of filters and sort order for a gift list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GiftQuery {
    /// Tag restriction, applied first.
    pub tag: TagFilter,
    /// Purchase/due restriction, applied second.
    pub status: StatusFilter,
    /// Ordering of the filtered gifts.
    pub sort: SortOrder,
}

impl GiftQuery {
    /// Filter and sort `gifts` for display.
    ///
    /// The tag filter runs first, then the status filter, then the sort.
    #[must_use]
    pub fn apply<'a>(&self, gifts: &'a [Gift], clock: &impl Clock) -> Vec<&'a Gift> {
        let today = clock.today();
        let mut view: Vec<&Gift> = gifts
            .iter()
            .filter(|gift| self.tag.matches(gift))
            .filter(|gift| self.status.matches(gift, today))
            .collect();
        self.sort.sort(&mut view);
        view
    }
}

/// Whole days from `today` until `due`; negative once the date has passed.
#[must_use]
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Returns `true` if the gift has a due date between today and
/// [`DUE_SOON_DAYS`] days from now, both ends included.
#[must_use]
pub fn is_due_soon(gift: &Gift, today: NaiveDate) -> bool {
    gift.due_date()
        .map(|due| days_until(due, today))
        .is_some_and(|days| (0..=DUE_SOON_DAYS).contains(&days))
}

/// Returns `true` if the gift is still to buy and its due date has passed.
#[must_use]
pub fn is_overdue(gift: &Gift, today: NaiveDate) -> bool {
    !gift.purchased() && gift.due_date().is_some_and(|due| due < today)
}

/// Compare two names the way a person would alphabetise them.
///
/// Accents and case are ignored first, so "Émile" sorts with the E's. Names
/// that still tie are ordered unaccented before accented, then lowercase
/// before uppercase, so the order is total.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| fold_case(a).cmp(fold_case(b)))
        .then_with(|| b.cmp(a))
}

/// Compatibility-decomposed, accent-free, lowercased form of a name.
fn collation_key(name: &str) -> String {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn fold_case(name: &str) -> impl Iterator<Item = char> + '_ {
    name.chars().flat_map(char::to_lowercase)
}

/// People matching `search` and `tag`, sorted by name.
///
/// `search` is a case-insensitive substring of the name (empty matches
/// everyone). When a tag is selected, a person must have at least one gift
/// carrying it.
#[must_use]
pub fn filter_people<'a>(people: &'a [Person], search: &str, tag: &TagFilter) -> Vec<&'a Person> {
    let needle = search.to_lowercase();
    let mut view: Vec<&Person> = people
        .iter()
        .filter(|person| person.name().to_lowercase().contains(&needle))
        .filter(|person| match tag {
            TagFilter::All => true,
            TagFilter::Tag(tag) => person.has_gift_tagged(tag),
        })
        .collect();
    view.sort_by(|a, b| compare_names(a.name(), b.name()));
    view
}

/// Every tag used on any gift of any person, deduplicated and sorted.
#[must_use]
pub fn tag_vocabulary(people: &[Person]) -> Vec<String> {
    people
        .iter()
        .flat_map(Person::gifts)
        .flat_map(Gift::tags)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::{FixedClock, GiftDraft, Id, PersonDraft, Priority};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn gift(title: &str, draft: GiftDraft) -> Gift {
        Gift::from_draft(
            Id::from(title),
            GiftDraft {
                title: title.to_string(),
                ..draft
            },
        )
        .unwrap()
    }

    fn priced(title: &str, price: f64) -> Gift {
        gift(
            title,
            GiftDraft {
                price,
                ..GiftDraft::default()
            },
        )
    }

    fn tagged(title: &str, tags: &[&str]) -> Gift {
        gift(
            title,
            GiftDraft {
                tags: tags.iter().map(ToString::to_string).collect(),
                ..GiftDraft::default()
            },
        )
    }

    fn due(title: &str, due_date: Option<NaiveDate>) -> Gift {
        gift(
            title,
            GiftDraft {
                due_date,
                ..GiftDraft::default()
            },
        )
    }

    fn titles(view: &[&Gift]) -> Vec<String> {
        view.iter().map(|gift| gift.title().to_string()).collect()
    }

    fn person(name: &str, gifts: Vec<Gift>) -> Person {
        let mut person = Person::from_draft(Id::from(name), PersonDraft::new(name)).unwrap();
        person.gifts = gifts;
        person
    }

    fn clock() -> FixedClock {
        FixedClock(date(2024, 1, 1))
    }

    #[test]
    fn tag_filter_keeps_matching_gifts() {
        let gifts = vec![tagged("truck", &["toys"]), tagged("novel", &["books"])];
        let query = GiftQuery {
            tag: TagFilter::Tag("toys".to_string()),
            ..GiftQuery::default()
        };
        assert_eq!(titles(&query.apply(&gifts, &clock())), ["truck"]);
    }

    #[test]
    fn due_soon_window() {
        let gifts = vec![
            due("soon", Some(date(2024, 1, 5))),
            due("later", Some(date(2024, 1, 10))),
            due("past", Some(date(2023, 12, 30))),
            due("undated", None),
            due("today", Some(date(2024, 1, 1))),
            due("edge", Some(date(2024, 1, 8))),
        ];
        let query = GiftQuery {
            status: StatusFilter::DueSoon,
            ..GiftQuery::default()
        };
        assert_eq!(titles(&query.apply(&gifts, &clock())), [
            "soon", "today", "edge"
        ]);
    }

    #[test_case(date(2024, 1, 5) => 4; "ahead")]
    #[test_case(date(2024, 1, 10) => 9; "beyond window")]
    #[test_case(date(2023, 12, 30) => -2; "past")]
    fn day_differences(due: NaiveDate) -> i64 {
        days_until(due, date(2024, 1, 1))
    }

    #[test]
    fn purchase_filters() {
        let mut bought = priced("bought", 1.0);
        bought.purchased = true;
        let gifts = vec![bought, priced("pending", 2.0)];

        let purchased = GiftQuery {
            status: StatusFilter::Purchased,
            ..GiftQuery::default()
        };
        let pending = GiftQuery {
            status: StatusFilter::NotPurchased,
            ..GiftQuery::default()
        };

        assert_eq!(titles(&purchased.apply(&gifts, &clock())), ["bought"]);
        assert_eq!(titles(&pending.apply(&gifts, &clock())), ["pending"]);
        assert_eq!(GiftQuery::default().apply(&gifts, &clock()).len(), 2);
    }

    #[test]
    fn tag_filter_runs_before_status_filter() {
        let mut bought_toy = tagged("bought toy", &["toys"]);
        bought_toy.purchased = true;
        let gifts = vec![bought_toy, tagged("toy", &["toys"]), tagged("book", &["books"])];

        let query = GiftQuery {
            tag: TagFilter::Tag("toys".to_string()),
            status: StatusFilter::NotPurchased,
            sort: SortOrder::Default,
        };
        assert_eq!(titles(&query.apply(&gifts, &clock())), ["toy"]);
    }

    #[test]
    fn price_sorts_are_stable_mirrors() {
        let gifts = vec![
            priced("a", 30.0),
            priced("b", 10.0),
            priced("c", 20.0),
            priced("d", 10.0),
        ];
        let sorted = |sort| {
            let query = GiftQuery {
                sort,
                ..GiftQuery::default()
            };
            titles(&query.apply(&gifts, &clock()))
        };

        assert_eq!(sorted(SortOrder::PriceAsc), ["b", "d", "c", "a"]);
        // Tied gifts keep their input order in both directions.
        assert_eq!(sorted(SortOrder::PriceDesc), ["a", "c", "b", "d"]);
        assert_eq!(sorted(SortOrder::Default), ["a", "b", "c", "d"]);
    }

    #[test]
    fn price_desc_reverses_price_asc_for_distinct_prices() {
        let gifts = vec![priced("a", 3.0), priced("b", 1.0), priced("c", 2.0)];
        let mut asc = GiftQuery {
            sort: SortOrder::PriceAsc,
            ..GiftQuery::default()
        }
        .apply(&gifts, &clock());
        let desc = GiftQuery {
            sort: SortOrder::PriceDesc,
            ..GiftQuery::default()
        }
        .apply(&gifts, &clock());
        asc.reverse();
        assert_eq!(titles(&asc), titles(&desc));
    }

    #[test]
    fn priority_sort_puts_high_first_and_is_stable() {
        let with = |title: &str, priority| {
            gift(
                title,
                GiftDraft {
                    priority,
                    ..GiftDraft::default()
                },
            )
        };
        let gifts = vec![
            with("low", Priority::Low),
            with("medium 1", Priority::Medium),
            with("high", Priority::High),
            with("medium 2", Priority::Medium),
        ];
        let query = GiftQuery {
            sort: SortOrder::Priority,
            ..GiftQuery::default()
        };
        assert_eq!(titles(&query.apply(&gifts, &clock())), [
            "high", "medium 1", "medium 2", "low"
        ]);
    }

    #[test]
    fn query_does_not_mutate_input() {
        let gifts = vec![priced("a", 3.0), priced("b", 1.0)];
        let before = gifts.clone();
        let _ = GiftQuery {
            sort: SortOrder::PriceAsc,
            ..GiftQuery::default()
        }
        .apply(&gifts, &clock());
        assert_eq!(gifts, before);
    }

    #[test]
    fn people_are_filtered_and_sorted_by_name() {
        let people = vec![
            person("zoe", vec![tagged("kite", &["toys"])]),
            person("Alex", vec![tagged("novel", &["books"])]),
            person("alexandra", vec![tagged("puzzle", &["toys"])]),
            person("Bob", vec![]),
        ];

        let names = |view: Vec<&Person>| -> Vec<String> {
            view.iter().map(|p| p.name().to_string()).collect()
        };

        assert_eq!(names(filter_people(&people, "", &TagFilter::All)), [
            "Alex",
            "alexandra",
            "Bob",
            "zoe"
        ]);
        assert_eq!(names(filter_people(&people, "ALEX", &TagFilter::All)), [
            "Alex",
            "alexandra"
        ]);
        assert_eq!(
            names(filter_people(
                &people,
                "",
                &TagFilter::Tag("toys".to_string())
            )),
            ["alexandra", "zoe"]
        );
        assert!(filter_people(&people, "nobody", &TagFilter::All).is_empty());
    }

    #[test]
    fn names_differing_only_in_case_sort_lowercase_first() {
        assert_eq!(compare_names("alex", "Alex"), Ordering::Less);
        assert_eq!(compare_names("Alex", "alex"), Ordering::Greater);
        assert_eq!(compare_names("Alex", "Alex"), Ordering::Equal);
        assert_eq!(compare_names("bob", "Alice"), Ordering::Greater);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let people = vec![
            person("Zoe", vec![]),
            person("Émile", vec![]),
            person("Adam", vec![]),
            person("élodie", vec![]),
        ];
        let names: Vec<&str> = filter_people(&people, "", &TagFilter::All)
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, ["Adam", "élodie", "Émile", "Zoe"]);
    }

    #[test]
    fn unaccented_name_sorts_before_accented_twin() {
        assert_eq!(compare_names("Emile", "Émile"), Ordering::Less);
        assert_eq!(compare_names("Émile", "Emile"), Ordering::Greater);
    }

    #[test]
    fn vocabulary_is_sorted_and_unique() {
        let people = vec![
            person("a", vec![tagged("x", &["toys", "kids"])]),
            person("b", vec![tagged("y", &["books", "toys"])]),
        ];
        assert_eq!(tag_vocabulary(&people), ["books", "kids", "toys"]);
    }

    #[test_case("all" => TagFilter::All; "sentinel")]
    #[test_case("" => TagFilter::All; "empty")]
    #[test_case("toys" => TagFilter::Tag("toys".to_string()); "tag")]
    fn tag_filter_parsing(text: &str) -> TagFilter {
        text.parse().unwrap()
    }

    #[test_case("price-asc" => Ok(SortOrder::PriceAsc); "kebab")]
    #[test_case("priceDesc" => Ok(SortOrder::PriceDesc); "camel")]
    #[test_case("PRIORITY" => Ok(SortOrder::Priority); "upper")]
    #[test_case("cheapest" => Err(()); "unknown")]
    fn sort_order_parsing(text: &str) -> Result<SortOrder, ()> {
        text.parse().map_err(|_| ())
    }

    #[test_case("due-soon" => Ok(StatusFilter::DueSoon); "kebab")]
    #[test_case("notPurchased" => Ok(StatusFilter::NotPurchased); "camel")]
    #[test_case("bought" => Err(()); "unknown")]
    fn status_filter_parsing(text: &str) -> Result<StatusFilter, ()> {
        text.parse().map_err(|_| ())
    }

    #[test]
    fn overdue_ignores_purchased_gifts() {
        let mut late = due("late", Some(date(2023, 12, 1)));
        assert!(is_overdue(&late, date(2024, 1, 1)));
        late.purchased = true;
        assert!(!is_overdue(&late, date(2024, 1, 1)));
    }
}
