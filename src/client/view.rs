use std::cmp::Ordering;

use super::item::Item;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
    Total,
    Date,
    CreatedAt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

#[derive(Clone, Debug)]
pub struct ViewQuery {
    pub search: String,
    pub sort_key: SortKey,
    pub sort_dir: SortDir,
    pub page_size: usize,
    pub page: usize,
}

impl Default for ViewQuery {
    fn default() -> ViewQuery {
        ViewQuery {
            search: String::new(),
            sort_key: SortKey::Name,
            sort_dir: SortDir::Asc,
            page_size: 10,
            page: 1,
        }
    }
}

/// One rendered date bucket. `date` is the `YYYY-MM-DD` key, or `None`
/// for the trailing "no date" bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct DateGroup {
    pub date: Option<String>,
    pub items: Vec<Item>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemView {
    pub groups: Vec<DateGroup>,
    pub total_items: usize,
    pub total_pages: usize,
    pub page: usize,
    /// 1-based "showing X–Y of Z" range; both zero when nothing shows.
    pub start_item: usize,
    pub end_item: usize,
    pub search_active: bool,
}

/// Pure pipeline from the raw collection to the displayed page:
/// filter, stable sort, slice the flat sequence, then bucket the slice
/// by date (newest bucket first, dateless items trailing). The page
/// number is taken as given; out-of-range pages are the caller's to
/// clamp and simply come back empty.
pub fn derive_view(items: &[Item], query: &ViewQuery) -> ItemView {
    // The needle is lowercased but not trimmed; whitespace in the
    // search box matches literally.
    let needle = query.search.to_lowercase();
    let search_active = !needle.is_empty();

    let mut sorted: Vec<&Item> = items
        .iter()
        .filter(|item| !search_active || matches_search(item, &needle))
        .collect();

    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_key);
        match query.sort_dir {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    });

    let total_items = sorted.len();
    let page_size = query.page_size.max(1);
    let total_pages = (total_items + page_size - 1) / page_size;

    let start = query.page.saturating_sub(1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(total_items);
    let page_items: &[&Item] = if start < total_items {
        &sorted[start..end]
    } else {
        &[]
    };

    let mut groups: Vec<DateGroup> = Vec::new();
    for item in page_items {
        let key = item.date_key().map(str::to_string);
        match groups.iter_mut().find(|group| group.date == key) {
            Some(group) => group.items.push((*item).clone()),
            None => groups.push(DateGroup {
                date: key,
                items: vec![(*item).clone()],
            }),
        }
    }

    groups.sort_by(|a, b| match (&a.date, &b.date) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let (start_item, end_item) = if page_items.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    ItemView {
        groups,
        total_items,
        total_pages,
        page: query.page,
        start_item,
        end_item,
        search_active,
    }
}

/// Clamp helper for the pagination controls; the deriver itself never
/// adjusts the requested page.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages).max(1)
}

fn matches_search(item: &Item, needle: &str) -> bool {
    let field_matches = |field: &str| field.to_lowercase().contains(needle);

    field_matches(&item.name)
        || field_matches(&item.created_by)
        || item.notes.as_deref().map_or(false, field_matches)
        || item.category.as_deref().map_or(false, field_matches)
        || item.custom_fields.values().any(|value| field_matches(value))
}

fn compare(a: &Item, b: &Item, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Price => compare_f64(a.price.unwrap_or(0.0), b.price.unwrap_or(0.0)),
        SortKey::Total => compare_f64(a.total_value(), b.total_value()),
        // Fixed-width ISO-8601, so lexicographic order is time order.
        SortKey::Date | SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn item(id: i64, name: &str, created_at: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
            created_by: "alice".to_string(),
            created_at: created_at.to_string(),
            quantity: None,
            price: None,
            total: None,
            notes: None,
            category: None,
            custom_fields: HashMap::new(),
        }
    }

    fn priced(id: i64, name: &str, quantity: f64, price: f64) -> Item {
        let mut item = item(id, name, "2024-01-01T00:00:00+00:00");
        item.quantity = Some(quantity);
        item.price = Some(price);
        item
    }

    fn query() -> ViewQuery {
        ViewQuery {
            page_size: 100,
            ..ViewQuery::default()
        }
    }

    fn page_ids(view: &ItemView) -> Vec<i64> {
        view.groups
            .iter()
            .flat_map(|group| group.items.iter().map(|item| item.id))
            .collect()
    }

    #[test]
    fn empty_search_keeps_everything() {
        let items = vec![item(1, "a", "2024-01-01"), item(2, "b", "2024-01-02")];
        let view = derive_view(&items, &query());
        assert_eq!(view.total_items, 2);
        assert!(!view.search_active);
    }

    #[test]
    fn search_is_case_insensitive_across_all_text_fields() {
        let mut by_note = item(1, "a", "2024-01-01");
        by_note.notes = Some("Urgent restock".to_string());

        let mut by_category = item(2, "b", "2024-01-01");
        by_category.category = Some("Hardware".to_string());

        let mut by_custom = item(3, "c", "2024-01-01");
        by_custom
            .custom_fields
            .insert("supplier".to_string(), "Acme Corp".to_string());

        let mut by_author = item(4, "d", "2024-01-01");
        by_author.created_by = "Bob".to_string();

        let items = vec![
            item(0, "Widget", "2024-01-01"),
            by_note,
            by_category,
            by_custom,
            by_author,
        ];

        for (needle, expected) in [
            ("WIDGET", 0),
            ("urgent", 1),
            ("hardware", 2),
            ("acme", 3),
            ("bob", 4),
        ] {
            let view = derive_view(
                &items,
                &ViewQuery {
                    search: needle.to_string(),
                    ..query()
                },
            );
            assert_eq!(page_ids(&view), vec![expected], "needle {:?}", needle);
            assert!(view.search_active);
        }
    }

    #[test]
    fn search_whitespace_matches_literally() {
        let items = vec![item(1, "two words", "2024-01-01"), item(2, "single", "2024-01-01")];

        let spaced = derive_view(
            &items,
            &ViewQuery {
                search: " ".to_string(),
                ..query()
            },
        );
        assert!(spaced.search_active);
        assert_eq!(page_ids(&spaced), vec![1]);

        let leading = derive_view(
            &items,
            &ViewQuery {
                search: " words".to_string(),
                ..query()
            },
        );
        assert_eq!(page_ids(&leading), vec![1]);
    }

    #[test]
    fn total_sort_recomputes_from_operands_and_is_stable() {
        // id 2 has a stored total inconsistent with its operands; the
        // sort must ignore it. id 3 lacks operands and counts as zero.
        let mut stale = priced(2, "stale", 2.0, 2.0);
        stale.total = Some(100.0);

        let items = vec![
            priced(1, "big", 5.0, 3.0),
            stale,
            item(3, "none", "2024-01-01"),
            priced(4, "tie", 2.0, 2.0),
        ];

        let view = derive_view(
            &items,
            &ViewQuery {
                sort_key: SortKey::Total,
                ..query()
            },
        );
        // 0, 4, 4, 15 — ties keep input order (2 before 4).
        assert_eq!(page_ids(&view), vec![3, 2, 4, 1]);

        let reversed = derive_view(
            &items,
            &ViewQuery {
                sort_key: SortKey::Total,
                sort_dir: SortDir::Desc,
                ..query()
            },
        );
        assert_eq!(page_ids(&reversed), vec![1, 2, 4, 3]);
    }

    #[test]
    fn name_sort_orders_lexicographically_and_flips() {
        let items = vec![
            item(1, "pear", "2024-01-01"),
            item(2, "apple", "2024-01-01"),
            item(3, "mango", "2024-01-01"),
        ];

        let asc = derive_view(
            &items,
            &ViewQuery {
                sort_key: SortKey::Name,
                ..query()
            },
        );
        assert_eq!(page_ids(&asc), vec![2, 3, 1]);

        let desc = derive_view(
            &items,
            &ViewQuery {
                sort_key: SortKey::Name,
                sort_dir: SortDir::Desc,
                ..query()
            },
        );
        assert_eq!(page_ids(&desc), vec![1, 3, 2]);
    }

    #[test]
    fn date_sort_compares_iso_strings() {
        let items = vec![
            item(1, "a", "2024-01-01T23:59:59+00:00"),
            item(2, "b", "2024-01-02T00:00:01+00:00"),
            item(3, "c", ""),
        ];

        let view = derive_view(
            &items,
            &ViewQuery {
                sort_key: SortKey::Date,
                sort_dir: SortDir::Desc,
                ..query()
            },
        );
        assert_eq!(page_ids(&view), vec![2, 1, 3]);
    }

    #[test]
    fn items_sharing_a_day_land_in_one_bucket_newest_first() {
        let items = vec![
            item(1, "a", "2024-01-01T08:00:00+00:00"),
            item(2, "b", "2024-01-02T09:00:00+00:00"),
            item(3, "c", "2024-01-02T17:00:00+00:00"),
        ];

        let view = derive_view(
            &items,
            &ViewQuery {
                sort_key: SortKey::Date,
                sort_dir: SortDir::Desc,
                ..query()
            },
        );

        let dates: Vec<Option<&str>> = view
            .groups
            .iter()
            .map(|group| group.date.as_deref())
            .collect();
        assert_eq!(dates, vec![Some("2024-01-02"), Some("2024-01-01")]);
        assert_eq!(view.groups[0].items.len(), 2);
    }

    #[test]
    fn dateless_items_trail_in_a_sentinel_bucket() {
        let items = vec![
            item(1, "undated", ""),
            item(2, "old", "2023-06-01T00:00:00+00:00"),
            item(3, "new", "2024-06-01T00:00:00+00:00"),
        ];

        let view = derive_view(&items, &query());

        let dates: Vec<Option<&str>> = view
            .groups
            .iter()
            .map(|group| group.date.as_deref())
            .collect();
        assert_eq!(dates, vec![Some("2024-06-01"), Some("2023-06-01"), None]);
    }

    #[test]
    fn pagination_slices_the_flat_sequence() {
        let items: Vec<Item> = (0..23)
            .map(|i| item(i, &format!("item-{:02}", i), "2024-01-01"))
            .collect();

        let mut seen = Vec::new();
        for page in 1..=3 {
            let view = derive_view(
                &items,
                &ViewQuery {
                    page_size: 10,
                    page,
                    ..ViewQuery::default()
                },
            );
            assert_eq!(view.total_items, 23);
            assert_eq!(view.total_pages, 3);
            seen.extend(page_ids(&view));
        }

        // 10 + 10 + 3, no duplicates or omissions.
        assert_eq!(seen.len(), 23);
        let mut deduped = seen.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), 23);

        let past_the_end = derive_view(
            &items,
            &ViewQuery {
                page_size: 10,
                page: 4,
                ..ViewQuery::default()
            },
        );
        assert!(past_the_end.groups.is_empty());
        assert_eq!(past_the_end.start_item, 0);
        assert_eq!(past_the_end.end_item, 0);
    }

    #[test]
    fn page_sizes_report_the_shown_range() {
        let items: Vec<Item> = (0..23)
            .map(|i| item(i, "x", "2024-01-01"))
            .collect();

        let page3 = derive_view(
            &items,
            &ViewQuery {
                page_size: 10,
                page: 3,
                ..ViewQuery::default()
            },
        );
        assert_eq!(page3.start_item, 21);
        assert_eq!(page3.end_item, 23);
        assert_eq!(page_ids(&page3).len(), 3);
    }

    #[test]
    fn buckets_emptied_by_the_slice_are_omitted() {
        let mut items: Vec<Item> = (0..10)
            .map(|i| item(i, "a", "2024-01-02T00:00:00+00:00"))
            .collect();
        items.push(item(10, "b", "2024-01-01T00:00:00+00:00"));

        let page1 = derive_view(
            &items,
            &ViewQuery {
                sort_key: SortKey::Date,
                sort_dir: SortDir::Desc,
                page_size: 10,
                page: 1,
                ..ViewQuery::default()
            },
        );
        assert_eq!(page1.groups.len(), 1);
        assert_eq!(page1.groups[0].date.as_deref(), Some("2024-01-02"));

        let page2 = derive_view(
            &items,
            &ViewQuery {
                sort_key: SortKey::Date,
                sort_dir: SortDir::Desc,
                page_size: 10,
                page: 2,
                ..ViewQuery::default()
            },
        );
        assert_eq!(page2.groups.len(), 1);
        assert_eq!(page2.groups[0].date.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn empty_results_distinguish_search_from_an_empty_store() {
        let no_items = derive_view(&[], &query());
        assert_eq!(no_items.total_items, 0);
        assert_eq!(no_items.total_pages, 0);
        assert!(!no_items.search_active);

        let no_hits = derive_view(
            &[item(1, "a", "2024-01-01")],
            &ViewQuery {
                search: "zzz".to_string(),
                ..query()
            },
        );
        assert_eq!(no_hits.total_items, 0);
        assert!(no_hits.search_active);
    }

    #[test]
    fn clamp_page_bounds_the_requested_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(1, 0), 1);
    }
}
