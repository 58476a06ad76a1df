//! Translation of a shopper's filter selection into a catalog query.

use std::collections::BTreeSet;

use crate::domain::filter::{CustomPrice, FilterState, PriceBounds, PriceBucket};
use crate::domain::product::ProductListQuery;

/// Resolve the effective price interval.
///
/// Custom bounds take precedence as soon as either side is set; a missing
/// minimum reads as zero and a missing maximum as unbounded. Negative or
/// inverted custom bounds place no restriction at all. Otherwise the selected
/// buckets collapse into the single interval spanning all of them.
pub fn resolve_price_bounds(
    custom: &CustomPrice,
    buckets: &BTreeSet<PriceBucket>,
) -> Option<PriceBounds> {
    if custom.is_set() {
        let min = custom.min.unwrap_or(0);
        let max = custom.max;
        if min < 0 || max.is_some_and(|max| max < 0 || max < min) {
            return None;
        }
        return Some(PriceBounds { min, max });
    }

    let min = buckets.iter().map(|bucket| bucket.bounds().0).min()?;
    // Any open-ended bucket lifts the upper bound entirely.
    let max = buckets
        .iter()
        .map(|bucket| bucket.bounds().1)
        .try_fold(0, |acc, upper| upper.map(|upper| acc.max(upper)));

    Some(PriceBounds { min, max })
}

/// Compile `state` into a product query for `hub_id`.
///
/// Returns `None` while the town set is empty: the catalog is never queried
/// without a town scope.
pub fn compile_query(hub_id: i32, state: &FilterState, per_page: usize) -> Option<ProductListQuery> {
    if state.towns.is_empty() {
        return None;
    }

    let mut query = ProductListQuery::new(hub_id, state.towns.iter().cloned())
        .brands(state.brands.iter().cloned())
        .shops(state.shops.iter().cloned())
        .categories(state.categories.iter().cloned())
        .sort(state.sort)
        .paginate(state.page.max(1), per_page);

    if let Some(tab) = state.category {
        query = query.category(tab.category_name());
    }

    if let Some(bounds) = resolve_price_bounds(&state.custom_price, &state.price_ranges) {
        query = query.price(bounds);
    }

    if let Some(term) = state
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
    {
        query = query.search(term);
    }

    Some(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::{CategoryTab, FilterChange, SortKey};
    use proptest::prelude::*;

    fn buckets(items: &[PriceBucket]) -> BTreeSet<PriceBucket> {
        items.iter().copied().collect()
    }

    #[test]
    fn adjacent_buckets_span_their_union() {
        let bounds = resolve_price_bounds(
            &CustomPrice::default(),
            &buckets(&[PriceBucket::UpTo500, PriceBucket::From1001To1500]),
        );

        assert_eq!(
            bounds,
            Some(PriceBounds {
                min: 0,
                max: Some(1500)
            })
        );
    }

    #[test]
    fn open_bucket_removes_upper_bound() {
        let bounds = resolve_price_bounds(
            &CustomPrice::default(),
            &buckets(&[PriceBucket::From501To1000, PriceBucket::Above3000]),
        );

        assert_eq!(
            bounds,
            Some(PriceBounds {
                min: 501,
                max: None
            })
        );
    }

    #[test]
    fn custom_bounds_override_buckets() {
        let custom = CustomPrice {
            min: None,
            max: Some(800),
        };
        let bounds = resolve_price_bounds(&custom, &buckets(&[PriceBucket::Above3000]));

        assert_eq!(
            bounds,
            Some(PriceBounds {
                min: 0,
                max: Some(800)
            })
        );
    }

    #[test]
    fn invalid_custom_bounds_restrict_nothing() {
        let inverted = CustomPrice {
            min: Some(900),
            max: Some(100),
        };
        let negative = CustomPrice {
            min: Some(-5),
            max: None,
        };

        assert_eq!(
            resolve_price_bounds(&inverted, &buckets(&[PriceBucket::UpTo500])),
            None
        );
        assert_eq!(resolve_price_bounds(&negative, &BTreeSet::new()), None);
    }

    #[test]
    fn no_price_selection_means_no_bounds() {
        assert_eq!(
            resolve_price_bounds(&CustomPrice::default(), &BTreeSet::new()),
            None
        );
    }

    #[test]
    fn compile_query_requires_towns() {
        assert!(compile_query(1, &FilterState::default(), 20).is_none());
    }

    #[test]
    fn compile_query_maps_every_dimension() {
        let mut state = FilterState::for_town("Mumbai");
        state.set(FilterChange::Brands(BTreeSet::from(["Nike".to_string()])));
        state.set(FilterChange::Shops(BTreeSet::from(["Urban Style".to_string()])));
        state.set(FilterChange::Category(Some(CategoryTab::Footwear)));
        state.set(FilterChange::PriceRanges(buckets(&[
            PriceBucket::UpTo500,
            PriceBucket::From1001To1500,
        ])));
        state.set(FilterChange::Search(Some("  runner ".to_string())));
        state.set(FilterChange::Sort(SortKey::PriceAsc));
        state.page = 3;

        let query = compile_query(7, &state, 20).expect("query");

        assert_eq!(query.hub_id, 7);
        assert_eq!(query.towns, vec!["Mumbai".to_string()]);
        assert_eq!(query.brands, vec!["Nike".to_string()]);
        assert_eq!(query.shops, vec!["Urban Style".to_string()]);
        assert!(query.categories.is_empty());
        assert_eq!(query.category.as_deref(), Some("Footwear"));
        assert_eq!(
            query.price,
            Some(PriceBounds {
                min: 0,
                max: Some(1500)
            })
        );
        assert_eq!(query.search.as_deref(), Some("runner"));
        assert_eq!(query.sort, SortKey::PriceAsc);
        let pagination = query.pagination.expect("pagination");
        assert_eq!(pagination.page, 3);
        assert_eq!(pagination.per_page, 20);
    }

    #[test]
    fn blank_search_is_ignored() {
        let mut state = FilterState::for_town("Pune");
        state.set(FilterChange::Search(Some("   ".to_string())));

        let query = compile_query(1, &state, 20).expect("query");

        assert!(query.search.is_none());
    }

    fn bucket_strategy() -> impl Strategy<Value = BTreeSet<PriceBucket>> {
        prop::collection::btree_set(prop::sample::select(PriceBucket::ALL.to_vec()), 1..=6)
    }

    proptest! {
        #[test]
        fn bucket_union_contains_every_selected_band(selected in bucket_strategy()) {
            let bounds = resolve_price_bounds(&CustomPrice::default(), &selected)
                .expect("bounds for non-empty selection");

            for bucket in &selected {
                let (low, high) = bucket.bounds();
                prop_assert!(bounds.contains(low));
                if let Some(high) = high {
                    prop_assert!(bounds.contains(high));
                }
            }
        }

        #[test]
        fn valid_custom_bounds_are_kept(min in 0i64..10_000, span in 0i64..10_000) {
            let custom = CustomPrice { min: Some(min), max: Some(min + span) };
            let bounds = resolve_price_bounds(&custom, &BTreeSet::new());

            prop_assert_eq!(bounds, Some(PriceBounds { min, max: Some(min + span) }));
        }
    }
}
