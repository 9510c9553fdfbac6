//! Catalog reconciliation: merges a freshly fetched provider catalog with
//! previously saved curation (ordering, exclusion flags, colors/icons) so
//! that re-syncing never silently discards it.
//!
//! Matching is two independent lookup passes over the prior structure: an
//! id-keyed primary index and an exact-name fallback for legacy data saved
//! before provider ids were stored. An id match always wins when both are
//! available.
//!
//! The output is deterministic for a given (fresh, prior) pair: providers
//! do not guarantee stable response ordering across calls, so carried-over
//! order values decide placement and case-insensitive names break ties
//! between entries that received the same running-count order.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::catalog::{
    CatalogCategory, CatalogItem, NoteType, NoteTypeRow, SiteRow, TaskType, TaskTypeRow,
    UNCATEGORIZED_ID, UNCATEGORIZED_NAME,
};

/// Color assigned to type entries with no saved configuration.
pub const FALLBACK_COLOR: &str = "#9e9e9e";

/// Icon assigned to type entries with no saved configuration.
pub const FALLBACK_ICON: &str = "event";

/// Built-in styling for the provider's well-known task types.
fn default_task_style(id: &str) -> (&'static str, &'static str) {
    match id {
        // Housekeeping.
        "-1" => ("#4CAF50", "vacuum"),
        // Maintenance.
        "-2" => ("#FF9800", "build"),
        _ => (FALLBACK_COLOR, FALLBACK_ICON),
    }
}

/// Merge freshly fetched site rows with the previously saved category
/// structure.
///
/// Walks `fresh` in provider order. The first sighting of a category key
/// carries over prior order/excluded (matched by id, else by exact name)
/// or appends the category after every known one; later sightings refresh
/// only the display name, so upstream name drift cannot reposition a
/// curated category. Items resolve prior order/excluded the same way
/// within their matched prior category, with unmatched items likewise
/// appended after all carried ones.
///
/// Categories are sorted ascending by carried order, items by carried
/// order with a case-insensitive name tiebreak, and both levels are then
/// re-indexed sequentially so every survivor holds a distinct order value.
pub fn reconcile_sites(fresh: &[SiteRow], prior: &[CatalogCategory]) -> Vec<CatalogCategory> {
    let prior_by_id: HashMap<&str, &CatalogCategory> = prior
        .iter()
        .filter_map(|c| c.id.as_deref().map(|id| (id, c)))
        .collect();
    let prior_by_name: HashMap<&str, &CatalogCategory> =
        prior.iter().map(|c| (c.name.as_str(), c)).collect();

    // Placement order of first sightings, keyed by resolved category key.
    let mut placed: IndexMap<String, CatalogCategory> = IndexMap::new();
    // The prior category backing each placed key, for item lookups.
    let mut prior_for_key: HashMap<String, &CatalogCategory> = HashMap::new();

    // New entries sort after everything carried over, even when the
    // provider lists them first.
    let category_base = prior
        .iter()
        .map(|c| c.order.saturating_add(1))
        .max()
        .unwrap_or(0);
    let mut new_categories: i64 = 0;
    let mut new_items: HashMap<String, i64> = HashMap::new();

    for row in fresh {
        let key = row
            .category_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(UNCATEGORIZED_ID)
            .to_string();
        let name = row
            .category_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(UNCATEGORIZED_NAME)
            .to_string();

        let next_order = category_base.saturating_add(new_categories);
        let prior_category = prior_by_id
            .get(key.as_str())
            .copied()
            .or_else(|| prior_by_name.get(name.as_str()).copied());

        let category = placed
            .entry(key.clone())
            // Repeat sighting: refresh the display name only, never
            // order/excluded.
            .and_modify(|c| c.name.clone_from(&name))
            .or_insert_with(|| {
                let (order, excluded) = match prior_category {
                    Some(p) => (p.order, p.excluded),
                    None => {
                        new_categories += 1;
                        (next_order, false)
                    }
                };
                if let Some(p) = prior_category {
                    prior_for_key.insert(key.clone(), p);
                }
                CatalogCategory {
                    id: Some(key.clone()),
                    name: name.clone(),
                    order,
                    excluded,
                    sites: Vec::new(),
                }
            });

        let matched_prior = prior_for_key.get(key.as_str()).copied();
        let prior_item = find_prior_item(matched_prior, &row.site_id, &row.site_name);
        let (order, excluded) = match prior_item {
            Some(item) => (item.order, item.excluded),
            None => {
                let item_base = matched_prior
                    .map(|p| {
                        p.sites
                            .iter()
                            .map(|s| s.order.saturating_add(1))
                            .max()
                            .unwrap_or(0)
                    })
                    .unwrap_or(0);
                let placed_new = new_items.entry(key.clone()).or_insert(0);
                let order = item_base.saturating_add(*placed_new);
                *placed_new += 1;
                (order, false)
            }
        };
        category.sites.push(CatalogItem {
            site_id: row.site_id.clone(),
            site_name: row.site_name.clone(),
            order,
            excluded,
        });
    }

    let mut categories: Vec<CatalogCategory> = placed.into_values().collect();
    // Stable sort: categories with equal carried orders keep first-sighting
    // order, which is itself deterministic for a given input.
    categories.sort_by_key(|c| c.order);

    for (index, category) in categories.iter_mut().enumerate() {
        category.order = index as i64;
        category.sites.sort_by(|a, b| {
            a.order.cmp(&b.order).then_with(|| {
                a.site_name
                    .to_lowercase()
                    .cmp(&b.site_name.to_lowercase())
            })
        });
        for (site_index, site) in category.sites.iter_mut().enumerate() {
            site.order = site_index as i64;
        }
    }

    categories
}

/// Resolve a fresh item against the prior category it landed in: id match
/// first, exact-name match second.
fn find_prior_item<'a>(
    prior: Option<&'a CatalogCategory>,
    site_id: &str,
    site_name: &str,
) -> Option<&'a CatalogItem> {
    let prior = prior?;
    prior
        .sites
        .iter()
        .find(|s| !s.site_id.is_empty() && s.site_id == site_id)
        .or_else(|| prior.sites.iter().find(|s| s.site_name == site_name))
}

/// Merge freshly fetched task types with saved color/icon configuration.
///
/// Entries keep their provider order; curation is carried by id, and new
/// entries receive the built-in defaults for well-known task types.
pub fn reconcile_task_types(fresh: &[TaskTypeRow], prior: &[TaskType]) -> Vec<TaskType> {
    let prior_by_id: HashMap<&str, &TaskType> =
        prior.iter().map(|t| (t.id.as_str(), t)).collect();

    fresh
        .iter()
        .map(|row| {
            let (color, icon) = match prior_by_id.get(row.id.as_str()) {
                Some(existing) => (existing.color.clone(), existing.icon.clone()),
                None => {
                    let (color, icon) = default_task_style(&row.id);
                    (color.to_string(), icon.to_string())
                }
            };
            TaskType {
                id: row.id.clone(),
                name: row.name.clone(),
                color,
                icon,
            }
        })
        .collect()
}

/// Merge freshly fetched note types with saved color/icon configuration.
///
/// The provider's default flag always reflects the fresh response; color
/// and icon are carried by id.
pub fn reconcile_note_types(fresh: &[NoteTypeRow], prior: &[NoteType]) -> Vec<NoteType> {
    let prior_by_id: HashMap<&str, &NoteType> =
        prior.iter().map(|n| (n.id.as_str(), n)).collect();

    fresh
        .iter()
        .map(|row| {
            let (color, icon) = match prior_by_id.get(row.note_type_id.as_str()) {
                Some(existing) => (existing.color.clone(), existing.icon.clone()),
                None => (FALLBACK_COLOR.to_string(), FALLBACK_ICON.to_string()),
            };
            NoteType {
                id: row.note_type_id.clone(),
                name: row.note_type_name.clone(),
                is_default: row.note_type_default,
                color,
                icon,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(category_id: &str, category_name: &str, site_id: &str, site_name: &str) -> SiteRow {
        SiteRow {
            category_id: Some(category_id.to_string()),
            category_name: Some(category_name.to_string()),
            site_id: site_id.to_string(),
            site_name: site_name.to_string(),
        }
    }

    fn category(
        id: Option<&str>,
        name: &str,
        order: i64,
        excluded: bool,
        sites: Vec<CatalogItem>,
    ) -> CatalogCategory {
        CatalogCategory {
            id: id.map(str::to_string),
            name: name.to_string(),
            order,
            excluded,
            sites,
        }
    }

    fn item(site_id: &str, site_name: &str, order: i64, excluded: bool) -> CatalogItem {
        CatalogItem {
            site_id: site_id.to_string(),
            site_name: site_name.to_string(),
            order,
            excluded,
        }
    }

    #[test]
    fn first_sync_assigns_appearance_order() {
        let fresh = vec![
            site("2", "Suites", "s3", "Suite 1"),
            site("1", "Standard", "s1", "Room 1"),
            site("1", "Standard", "s2", "Room 2"),
        ];

        let result = reconcile_sites(&fresh, &[]);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Suites");
        assert_eq!(result[0].order, 0);
        assert_eq!(result[1].name, "Standard");
        assert_eq!(result[1].order, 1);
        assert_eq!(result[1].sites[0].site_name, "Room 1");
        assert_eq!(result[1].sites[1].site_name, "Room 2");
        assert!(!result[0].excluded);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let fresh = vec![
            site("2", "Suites", "s3", "Suite 1"),
            site("1", "Standard", "s2", "Room 2"),
            site("1", "Standard", "s1", "Room 1"),
        ];

        let first = reconcile_sites(&fresh, &[]);
        let second = reconcile_sites(&fresh, &first);
        let third = reconcile_sites(&fresh, &second);

        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[test]
    fn prior_order_wins_over_response_position() {
        let prior = vec![
            category(Some("a"), "Alpha", 1, false, vec![]),
            category(Some("b"), "Beta", 0, false, vec![]),
        ];
        let fresh = vec![
            site("a", "Alpha", "s1", "Room A"),
            site("b", "Beta", "s2", "Room B"),
        ];

        let result = reconcile_sites(&fresh, &prior);

        assert_eq!(result[0].name, "Beta");
        assert_eq!(result[1].name, "Alpha");
        // Orders are re-indexed to stay distinct and contiguous.
        assert_eq!(result[0].order, 0);
        assert_eq!(result[1].order, 1);
    }

    #[test]
    fn new_items_append_after_known_ones() {
        let prior = vec![category(
            Some("1"),
            "Standard",
            0,
            false,
            vec![item("s1", "Room 1", 0, false), item("s2", "Room 2", 1, false)],
        )];
        let fresh = vec![
            site("1", "Standard", "s9", "Annex Room"),
            site("1", "Standard", "s1", "Room 1"),
            site("1", "Standard", "s2", "Room 2"),
        ];

        let result = reconcile_sites(&fresh, &prior);
        let names: Vec<&str> = result[0].sites.iter().map(|s| s.site_name.as_str()).collect();
        assert_eq!(names, vec!["Room 1", "Room 2", "Annex Room"]);
    }

    #[test]
    fn exclusion_sticks_across_upstream_rename() {
        let prior = vec![category(
            Some("1"),
            "Standard",
            0,
            false,
            vec![item("s1", "Old Name", 0, true)],
        )];
        let fresh = vec![site("1", "Standard", "s1", "New Name")];

        let result = reconcile_sites(&fresh, &prior);

        assert_eq!(result[0].sites[0].site_name, "New Name");
        assert!(result[0].sites[0].excluded);
    }

    #[test]
    fn category_name_refresh_keeps_order_and_exclusion() {
        let prior = vec![
            category(Some("1"), "Old Category", 1, true, vec![]),
            category(Some("2"), "Other", 0, false, vec![]),
        ];
        let fresh = vec![
            site("1", "Renamed Category", "s1", "Room 1"),
            site("2", "Other", "s2", "Room 2"),
        ];

        let result = reconcile_sites(&fresh, &prior);

        assert_eq!(result[0].name, "Other");
        assert_eq!(result[1].name, "Renamed Category");
        assert!(result[1].excluded);
    }

    #[test]
    fn legacy_prior_without_ids_matches_by_name() {
        let prior = vec![category(
            None,
            "Standard",
            3,
            true,
            vec![item("", "Room 1", 5, true)],
        )];
        let fresh = vec![
            site("44", "Standard", "s1", "Room 1"),
            site("45", "Suites", "s2", "Suite 1"),
        ];

        let result = reconcile_sites(&fresh, &prior);

        // The name-matched category keeps its curation and adopts the
        // provider id going forward.
        let standard = result.iter().find(|c| c.name == "Standard").unwrap();
        assert_eq!(standard.id.as_deref(), Some("44"));
        assert!(standard.excluded);
        assert!(standard.sites[0].excluded);
    }

    #[test]
    fn id_match_wins_over_name_match() {
        let prior = vec![
            category(Some("1"), "Shared Name", 0, true, vec![]),
            category(Some("2"), "Shared Name", 1, false, vec![]),
        ];
        let fresh = vec![site("2", "Shared Name", "s1", "Room 1")];

        let result = reconcile_sites(&fresh, &prior);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.as_deref(), Some("2"));
        assert!(!result[0].excluded);
    }

    #[test]
    fn missing_category_lands_in_uncategorized_sentinel() {
        let fresh = vec![SiteRow {
            category_id: None,
            category_name: None,
            site_id: "s1".to_string(),
            site_name: "Lone Room".to_string(),
        }];

        let result = reconcile_sites(&fresh, &[]);

        assert_eq!(result[0].id.as_deref(), Some(UNCATEGORIZED_ID));
        assert_eq!(result[0].name, UNCATEGORIZED_NAME);
    }

    #[test]
    fn item_order_ties_break_case_insensitively() {
        // Legacy data can hold duplicate orders; the tiebreak keeps two
        // runs over the same input in agreement.
        let prior = vec![category(
            Some("1"),
            "Standard",
            0,
            false,
            vec![item("s1", "zulu", 1, false), item("s2", "Alpha", 1, false)],
        )];
        let fresh = vec![
            site("1", "Standard", "s1", "zulu"),
            site("1", "Standard", "s2", "Alpha"),
        ];

        let result = reconcile_sites(&fresh, &prior);
        let names: Vec<&str> = result[0].sites.iter().map(|s| s.site_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "zulu"]);
    }

    #[test]
    fn new_item_listed_first_still_appends_after_known_ones() {
        let prior = vec![category(
            Some("1"),
            "Standard",
            0,
            false,
            vec![item("s1", "Room 1", 0, false)],
        )];
        let fresh = vec![
            site("1", "Standard", "s9", "Annex Room"),
            site("1", "Standard", "s1", "Room 1"),
        ];

        let result = reconcile_sites(&fresh, &prior);
        let names: Vec<&str> = result[0].sites.iter().map(|s| s.site_name.as_str()).collect();
        assert_eq!(names, vec!["Room 1", "Annex Room"]);
    }

    #[test]
    fn new_category_listed_first_appends_after_known_ones() {
        let prior = vec![category(Some("1"), "Standard", 0, false, vec![])];
        let fresh = vec![
            site("9", "Penthouse", "s9", "Sky Suite"),
            site("1", "Standard", "s1", "Room 1"),
        ];

        let result = reconcile_sites(&fresh, &prior);

        assert_eq!(result[0].name, "Standard");
        assert_eq!(result[1].name, "Penthouse");
        assert_eq!(result[1].order, 1);
    }

    #[test]
    fn extreme_prior_orders_do_not_overflow() {
        // Manual saves accept arbitrary order values, so the append base
        // must survive a prior order of i64::MAX.
        let prior = vec![category(
            Some("1"),
            "Standard",
            i64::MAX,
            false,
            vec![item("s1", "Room 1", i64::MAX, false)],
        )];
        let fresh = vec![
            site("1", "Standard", "s1", "Room 1"),
            site("1", "Standard", "s3", "Room 3"),
            site("2", "Deluxe", "s2", "Room 2"),
        ];

        let result = reconcile_sites(&fresh, &prior);

        assert_eq!(result[0].name, "Standard");
        assert_eq!(result[1].name, "Deluxe");
        assert_eq!(result[0].sites[0].site_id, "s1");
        assert_eq!(result[0].sites[1].site_id, "s3");
        // Re-indexed sequentially despite the saturated append orders.
        assert_eq!(result[0].order, 0);
        assert_eq!(result[1].order, 1);
        assert_eq!(result[0].sites[1].order, 1);
    }

    #[test]
    fn concrete_resync_scenario() {
        // Prior: one category "Deluxe" with Room 1 excluded; fresh adds
        // Room 2 and renames the category upstream.
        let prior = vec![category(
            Some("1"),
            "Deluxe",
            0,
            false,
            vec![item("s1", "Room 1", 0, true)],
        )];
        let fresh = vec![
            site("1", "Deluxe Rooms", "s1", "Room 1"),
            site("1", "Deluxe Rooms", "s2", "Room 2"),
        ];

        let result = reconcile_sites(&fresh, &prior);

        assert_eq!(result.len(), 1);
        let cat = &result[0];
        assert_eq!(cat.id.as_deref(), Some("1"));
        assert_eq!(cat.name, "Deluxe Rooms");
        assert_eq!(cat.order, 0);
        assert!(!cat.excluded);
        assert_eq!(cat.sites.len(), 2);
        assert_eq!(cat.sites[0].site_id, "s1");
        assert_eq!(cat.sites[0].order, 0);
        assert!(cat.sites[0].excluded);
        assert_eq!(cat.sites[1].site_id, "s2");
        assert_eq!(cat.sites[1].order, 1);
        assert!(!cat.sites[1].excluded);
    }

    #[test]
    fn task_types_keep_saved_colors_and_default_new_ones() {
        let prior = vec![TaskType {
            id: "-1".to_string(),
            name: "Housekeeping".to_string(),
            color: "#123456".to_string(),
            icon: "custom".to_string(),
        }];
        let fresh = vec![
            TaskTypeRow {
                id: "-1".to_string(),
                name: "Housekeeping".to_string(),
            },
            TaskTypeRow {
                id: "-2".to_string(),
                name: "Maintenance".to_string(),
            },
            TaskTypeRow {
                id: "7".to_string(),
                name: "Concierge".to_string(),
            },
        ];

        let result = reconcile_task_types(&fresh, &prior);

        assert_eq!(result[0].color, "#123456");
        assert_eq!(result[0].icon, "custom");
        assert_eq!(result[1].color, "#FF9800");
        assert_eq!(result[1].icon, "build");
        assert_eq!(result[2].color, FALLBACK_COLOR);
        assert_eq!(result[2].icon, FALLBACK_ICON);
    }

    #[test]
    fn note_types_carry_curation_and_track_fresh_default_flag() {
        let prior = vec![NoteType {
            id: "5".to_string(),
            name: "Guest note".to_string(),
            is_default: true,
            color: "#abcdef".to_string(),
            icon: "note".to_string(),
        }];
        let fresh = vec![
            NoteTypeRow {
                note_type_id: "5".to_string(),
                note_type_name: "Guest note".to_string(),
                note_type_default: false,
            },
            NoteTypeRow {
                note_type_id: "6".to_string(),
                note_type_name: "Internal".to_string(),
                note_type_default: true,
            },
        ];

        let result = reconcile_note_types(&fresh, &prior);

        assert_eq!(result[0].color, "#abcdef");
        assert!(!result[0].is_default);
        assert_eq!(result[1].color, FALLBACK_COLOR);
        assert!(result[1].is_default);
    }
}
