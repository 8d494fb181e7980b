//! Selections: the active filter values of one session.

use crate::categories::GuestCategory;
use crate::errors::InvalidSelection;
use crate::input::Year;
use crate::output::{self, Years};
use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Geographic scope of the map. Does not restrict which bookings are counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Region {
    #[serde(rename = "world")]
    World,
    #[serde(rename = "europe")]
    Europe,
    #[serde(rename = "asia")]
    Asia,
    #[serde(rename = "africa")]
    Africa,
    #[serde(rename = "north america")]
    NorthAmerica,
    #[serde(rename = "south america")]
    SouthAmerica,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::World,
        Region::Europe,
        Region::Asia,
        Region::Africa,
        Region::NorthAmerica,
        Region::SouthAmerica,
    ];

    /// Projection scope understood by the map renderer.
    pub fn scope(&self) -> &'static str {
        match self {
            Region::World => "world",
            Region::Europe => "europe",
            Region::Asia => "asia",
            Region::Africa => "africa",
            Region::NorthAmerica => "north america",
            Region::SouthAmerica => "south america",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::World => "World",
            Region::Europe => "Europe",
            Region::Asia => "Asia",
            Region::Africa => "Africa",
            Region::NorthAmerica => "North America",
            Region::SouthAmerica => "South America",
        }
    }

    /// Accepts "north america", "North_America", "north-america" and so on.
    pub fn parse(s: &str) -> Option<Region> {
        let s = s.trim().replace(['_', '-'], " ");
        Region::ALL
            .into_iter()
            .find(|r| s.eq_ignore_ascii_case(r.scope()))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Scope for an optional region; no region means the whole world.
pub fn scope(region: Option<Region>) -> &'static str {
    region.unwrap_or(Region::World).scope()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Keep only these categories. An empty set keeps nothing.
    pub categories: BTreeSet<GuestCategory>,
    /// Inclusive range of arrival years.
    pub years: Years,
    /// Keep only bookings that were not canceled.
    pub exclude_canceled: bool,
    pub region: Option<Region>,
}

impl Selection {
    /// All categories, canceled bookings included, no region.
    pub fn all(years: Years) -> Selection {
        Selection {
            categories: GuestCategory::ALL.into_iter().collect(),
            years,
            exclude_canceled: false,
            region: None,
        }
    }

    pub fn contains_year(&self, year: Year) -> bool {
        self.years.0 <= year && year <= self.years.1
    }

    pub fn pretty(&self) -> String {
        let categories = if self.categories.is_empty() {
            "no categories".to_owned()
        } else {
            self.categories.iter().join(", ")
        };
        let mut s = format!("{}, {}", output::pretty_years(&self.years), categories);
        if self.exclude_canceled {
            s.push_str(", not canceled");
        }
        if let Some(region) = self.region {
            s.push_str(&format!(", {region}"));
        }
        s
    }

    /// Validates a loosely typed selection.
    ///
    /// Fields that are not given are taken from `defaults`.
    /// Unrecognized categories are dropped and an unrecognized region is replaced with `None`;
    /// every such value is reported in the returned list.
    pub fn from_raw(raw: &RawSelection, defaults: &Selection) -> (Selection, Vec<InvalidSelection>) {
        let mut problems = vec![];
        let categories = match &raw.categories {
            None => defaults.categories.clone(),
            Some(values) => values
                .iter()
                .filter_map(|v| {
                    let c = GuestCategory::parse(v);
                    if c.is_none() {
                        problems.push(InvalidSelection(format!("unknown guest category '{v}'")));
                    }
                    c
                })
                .collect(),
        };
        let region = match &raw.region {
            None => defaults.region,
            Some(v) => {
                let r = Region::parse(v);
                if r.is_none() {
                    problems.push(InvalidSelection(format!("unknown region '{v}'")));
                }
                r
            }
        };
        let years = (
            raw.start.unwrap_or(defaults.years.0),
            raw.end.unwrap_or(defaults.years.1),
        );
        if years.0 > years.1 {
            problems.push(InvalidSelection(format!(
                "year range {}-{} is empty",
                years.0, years.1
            )));
        }
        let selection = Selection {
            categories,
            years,
            exclude_canceled: raw.exclude_canceled,
            region,
        };
        (selection, problems)
    }

    /// Like [Selection::from_raw], but the problems are logged as warnings.
    pub fn resolve(raw: &RawSelection, defaults: &Selection) -> Selection {
        let (selection, problems) = Selection::from_raw(raw, defaults);
        for p in &problems {
            warn!(target: "bookings", "{p}");
        }
        selection
    }
}

/// Selection as received from a front end or a sessions file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawSelection {
    pub categories: Option<Vec<String>>,
    pub start: Option<Year>,
    pub end: Option<Year>,
    #[serde(default)]
    pub exclude_canceled: bool,
    pub region: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;
    use GuestCategory::*;

    fn defaults() -> Selection {
        Selection::all((2015, 2017))
    }

    #[test]
    fn region_spellings() {
        assert_eq!(Region::parse("north america"), Some(Region::NorthAmerica));
        assert_eq!(Region::parse("South_America"), Some(Region::SouthAmerica));
        assert_eq!(Region::parse("EUROPE"), Some(Region::Europe));
        assert_eq!(Region::parse("atlantis"), None);
        assert_eq!(scope(None), "world");
        assert_eq!(scope(Some(Region::Asia)), "asia");
    }

    #[test]
    fn raw_defaults() {
        let (s, problems) = Selection::from_raw(&RawSelection::default(), &defaults());
        assert!(problems.is_empty());
        assert_eq!(s, defaults());
    }

    #[test]
    fn raw_full() {
        let raw = RawSelection {
            categories: Some(vec!["Babies".to_owned(), "no kids".to_owned()]),
            start: Some(2016),
            end: Some(2016),
            exclude_canceled: true,
            region: Some("europe".to_owned()),
        };
        let (s, problems) = Selection::from_raw(&raw, &defaults());
        assert!(problems.is_empty());
        assert_eq!(s.categories, BTreeSet::from([NoKids, Babies]));
        assert_eq!(s.years, (2016, 2016));
        assert!(s.exclude_canceled);
        assert_eq!(s.region, Some(Region::Europe));
    }

    #[test]
    fn unknown_values_are_excluded() {
        let raw = RawSelection {
            categories: Some(vec!["Children".to_owned(), "Pets".to_owned()]),
            region: Some("Mars".to_owned()),
            ..RawSelection::default()
        };
        let (s, problems) = Selection::from_raw(&raw, &defaults());
        assert_eq!(s.categories, BTreeSet::from([Children]));
        assert_eq!(s.region, None);
        assert_eq!(
            problems,
            [
                InvalidSelection("unknown guest category 'Pets'".to_owned()),
                InvalidSelection("unknown region 'Mars'".to_owned()),
            ]
        );
    }

    #[test]
    fn only_unknown_categories_give_empty_set() {
        let raw = RawSelection {
            categories: Some(vec!["Pets".to_owned()]),
            ..RawSelection::default()
        };
        let s = Selection::resolve(&raw, &defaults());
        assert!(s.categories.is_empty());
    }

    #[test]
    fn inverted_years_are_reported() {
        let raw = RawSelection {
            start: Some(2017),
            end: Some(2015),
            ..RawSelection::default()
        };
        let (s, problems) = Selection::from_raw(&raw, &defaults());
        assert_eq!(s.years, (2017, 2015));
        assert_eq!(problems.len(), 1);
        assert!(!s.contains_year(2016));
    }

    #[test]
    fn raw_from_json() {
        let raw: RawSelection =
            serde_json::from_str(r#"{"categories": ["Babies"], "start": 2016}"#).unwrap();
        assert_eq!(raw.categories, Some(vec!["Babies".to_owned()]));
        assert_eq!(raw.start, Some(2016));
        assert_eq!(raw.end, None);
        assert!(!raw.exclude_canceled);
        assert!(serde_json::from_str::<RawSelection>(r#"{"kids": ["Babies"]}"#).is_err());
    }

    #[test]
    fn pretty() {
        let mut s = Selection::all((2015, 2016));
        s.exclude_canceled = true;
        s.region = Some(Region::NorthAmerica);
        assert_eq!(
            s.pretty(),
            "2015-2016, No Kids, Children, Babies, not canceled, North America"
        );
        s.categories.clear();
        assert!(s.pretty().contains("no categories"));
    }
}
