//! Catalog browsing for shoppers.
//!
//! Every call restores the shopper's filter machine from the session, runs
//! one transition and writes the machine back. Session storage problems are
//! logged and never fail a request.

use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::CatalogConfig;
use crate::domain::filter::{FilterLayer, FilterState};
use crate::forms::catalog::{CatalogEntryQuery, FacetsQuery, FilterChangeForm, SwitchTownForm};
use crate::forms::sanitize_inline_text;
use crate::repository::{FacetReader, ProductReader, TownReader, UserReader};
use crate::services::facets::{FacetCache, FacetView, facet_view};
use crate::services::filters::{FilterMachine, FilterSnapshot, FilterTransition, TownUnresolved};
use crate::services::pagination::{NextPage, PageCursor, ProductPage, fetch_page};
use crate::services::query::compile_query;
use crate::services::{ServiceError, ServiceResult};
use crate::session::{SessionStore, load_json, save_json};

/// Persisted applied layer, restored on every new catalog visit.
pub const FILTERS_KEY: &str = "catalog.filters";
/// Working applied layer of the current visit.
pub const APPLIED_KEY: &str = "catalog.applied";
pub const DRAFT_KEY: &str = "catalog.draft";
pub const GENERATION_KEY: &str = "catalog.generation";
pub const CURSOR_KEY: &str = "catalog.cursor";
/// Town picked in the header switcher. Wins over the profile town.
pub const TOWN_KEY: &str = "catalog.town";

/// Catalog state returned after every committed transition.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage {
    pub generation: u64,
    pub filters: FilterState,
    pub has_active_filters: bool,
    pub facets: FacetView,
    pub products: ProductPage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CatalogView {
    Ready(Box<CatalogPage>),
    /// Neither the session nor the profile names a town; the shopper has to
    /// pick one before anything can be listed.
    TownRequired,
}

fn read_session<T, S>(session: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: SessionStore + ?Sized,
{
    match load_json(session, key) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("Discarding session value {key}: {err}");
            None
        }
    }
}

fn write_session<T, S>(session: &S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: SessionStore + ?Sized,
{
    if let Err(err) = save_json(session, key, value) {
        log::warn!("Failed to store session value {key}: {err}");
    }
}

/// Remembered town override first, then the profile town.
fn resolve_default_town<R, S>(
    repo: &R,
    session: &S,
    user: &AuthenticatedUser,
) -> ServiceResult<Option<String>>
where
    R: UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    if let Some(town) = read_session::<String, _>(session, TOWN_KEY) {
        return Ok(Some(town));
    }

    let profile = repo
        .get_user_by_email(&user.email, user.hub_id)
        .map_err(ServiceError::from)?;

    Ok(profile.and_then(|profile| profile.town))
}

fn open_machine<R, S>(repo: &R, session: &S, user: &AuthenticatedUser) -> ServiceResult<FilterMachine>
where
    R: UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let default_town = resolve_default_town(repo, session, user)?;
    let snapshot = FilterSnapshot {
        applied: read_session(session, APPLIED_KEY),
        draft: read_session(session, DRAFT_KEY),
        persisted: read_session(session, FILTERS_KEY),
        generation: read_session(session, GENERATION_KEY).unwrap_or_default(),
    };

    Ok(FilterMachine::restore(snapshot, default_town))
}

fn store_machine<S>(session: &S, machine: &FilterMachine)
where
    S: SessionStore + ?Sized,
{
    let FilterSnapshot {
        applied,
        draft,
        persisted,
        generation,
    } = machine.snapshot();

    if let Some(applied) = applied {
        write_session(session, APPLIED_KEY, &applied);
    }
    if let Some(draft) = draft {
        write_session(session, DRAFT_KEY, &draft);
    }
    if let Some(persisted) = persisted {
        write_session(session, FILTERS_KEY, &persisted);
    }
    write_session(session, GENERATION_KEY, &generation);
}

/// Store the machine, then load facets and the current page of the applied
/// selection. Facets are resolved before products so option lists never lag
/// behind a town change.
fn render_catalog<R, S>(
    repo: &R,
    session: &S,
    facets: &FacetCache,
    config: &CatalogConfig,
    user: &AuthenticatedUser,
    machine: &FilterMachine,
    refresh_facets: bool,
) -> ServiceResult<CatalogView>
where
    R: ProductReader + FacetReader + TownReader + ?Sized,
    S: SessionStore + ?Sized,
{
    store_machine(session, machine);

    let applied = machine.applied();
    let Some(query) = compile_query(user.hub_id, applied, config.page_size) else {
        return Ok(CatalogView::TownRequired);
    };

    let facet_options = facet_view(repo, facets, user.hub_id, &applied.towns, refresh_facets);
    let products = fetch_page(
        repo,
        &query,
        machine.generation(),
        applied.page,
        config.page_size,
    )
    .map_err(ServiceError::from)?;
    write_session(session, CURSOR_KEY, &PageCursor::from_page(&products));

    Ok(CatalogView::Ready(Box::new(CatalogPage {
        generation: machine.generation(),
        filters: applied.clone(),
        has_active_filters: applied.has_active_filters(),
        facets: facet_options,
        products,
    })))
}

/// Run one committing transition and render the result.
fn commit<R, S, F>(
    repo: &R,
    session: &S,
    facets: &FacetCache,
    config: &CatalogConfig,
    user: &AuthenticatedUser,
    transition: F,
) -> ServiceResult<CatalogView>
where
    R: ProductReader + FacetReader + TownReader + UserReader + ?Sized,
    S: SessionStore + ?Sized,
    F: FnOnce(&mut FilterMachine) -> Result<FilterTransition, TownUnresolved>,
{
    let mut machine = open_machine(repo, session, user)?;

    match transition(&mut machine) {
        Ok(FilterTransition { towns_changed, .. }) => {
            render_catalog(repo, session, facets, config, user, &machine, towns_changed)
        }
        Err(TownUnresolved) => {
            store_machine(session, &machine);
            Ok(CatalogView::TownRequired)
        }
    }
}

/// Start a catalog visit from the persisted selection.
///
/// `entry` carries parameters of deep links into the catalog; they are
/// applied directly on top of the restored selection.
pub fn enter_catalog<R, S>(
    repo: &R,
    session: &S,
    facets: &FacetCache,
    config: &CatalogConfig,
    user: &AuthenticatedUser,
    entry: CatalogEntryQuery,
) -> ServiceResult<CatalogView>
where
    R: ProductReader + FacetReader + TownReader + UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let changes = entry
        .into_changes()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let mut machine = open_machine(repo, session, user)?;
    machine.reenter();
    for change in changes {
        if machine.apply_direct(change).is_err() {
            break;
        }
    }

    render_catalog(repo, session, facets, config, user, &machine, true)
}

/// Current page of the applied selection, without any transition.
pub fn current_page<R, S>(
    repo: &R,
    session: &S,
    facets: &FacetCache,
    config: &CatalogConfig,
    user: &AuthenticatedUser,
) -> ServiceResult<CatalogView>
where
    R: ProductReader + FacetReader + TownReader + UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let machine = open_machine(repo, session, user)?;
    render_catalog(repo, session, facets, config, user, &machine, false)
}

/// Load the page after the last delivered one.
///
/// `generation` is the generation the caller's list belongs to. A mismatch
/// means the selection changed since and the request is answered with
/// [`NextPage::Stale`] without touching storage.
pub fn load_next_page<R, S>(
    repo: &R,
    session: &S,
    config: &CatalogConfig,
    user: &AuthenticatedUser,
    generation: u64,
) -> ServiceResult<NextPage>
where
    R: ProductReader + UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let mut machine = open_machine(repo, session, user)?;
    if generation != machine.generation() {
        log::debug!(
            "Ignoring next page request for generation {generation}, current is {}",
            machine.generation()
        );
        return Ok(NextPage::Stale);
    }

    let cursor: Option<PageCursor> = read_session(session, CURSOR_KEY);
    if cursor.is_some_and(|cursor| cursor.is_exhausted(generation)) {
        return Ok(NextPage::Exhausted);
    }

    let Some(query) = compile_query(user.hub_id, machine.applied(), config.page_size) else {
        return Ok(NextPage::Exhausted);
    };

    let next = machine.applied().page + 1;
    let page = fetch_page(repo, &query, generation, next, config.page_size)
        .map_err(ServiceError::from)?;
    write_session(session, CURSOR_KEY, &PageCursor::from_page(&page));

    if next > page.total_pages {
        return Ok(NextPage::Exhausted);
    }

    machine.advance_page();
    store_machine(session, &machine);

    Ok(NextPage::Page(page))
}

/// One of the three filter layers. The persisted layer is `None` until the
/// first commit.
pub fn get_filter_state<R, S>(
    repo: &R,
    session: &S,
    user: &AuthenticatedUser,
    layer: FilterLayer,
) -> ServiceResult<Option<FilterState>>
where
    R: UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let machine = open_machine(repo, session, user)?;
    Ok(machine.state(layer).cloned())
}

/// Copy the applied selection into the draft and return it.
pub fn open_filter_panel<R, S>(
    repo: &R,
    session: &S,
    user: &AuthenticatedUser,
) -> ServiceResult<FilterState>
where
    R: UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let mut machine = open_machine(repo, session, user)?;
    let draft = machine.open_filter_panel().clone();
    store_machine(session, &machine);
    Ok(draft)
}

/// Edit one draft dimension and return the draft.
pub fn set_draft_filter<R, S>(
    repo: &R,
    session: &S,
    user: &AuthenticatedUser,
    form: FilterChangeForm,
) -> ServiceResult<FilterState>
where
    R: UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let change = form
        .into_change()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let mut machine = open_machine(repo, session, user)?;
    let draft = machine.set_draft(change).clone();
    store_machine(session, &machine);
    Ok(draft)
}

/// Commit the draft.
pub fn apply_filters<R, S>(
    repo: &R,
    session: &S,
    facets: &FacetCache,
    config: &CatalogConfig,
    user: &AuthenticatedUser,
) -> ServiceResult<CatalogView>
where
    R: ProductReader + FacetReader + TownReader + UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    commit(repo, session, facets, config, user, FilterMachine::apply_filters)
}

/// Commit one change straight to the applied selection.
pub fn apply_direct_filter<R, S>(
    repo: &R,
    session: &S,
    facets: &FacetCache,
    config: &CatalogConfig,
    user: &AuthenticatedUser,
    form: FilterChangeForm,
) -> ServiceResult<CatalogView>
where
    R: ProductReader + FacetReader + TownReader + UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let change = form
        .into_change()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    commit(repo, session, facets, config, user, |machine| {
        machine.apply_direct(change)
    })
}

/// Reset every filter layer to the default town.
pub fn clear_filters<R, S>(
    repo: &R,
    session: &S,
    facets: &FacetCache,
    config: &CatalogConfig,
    user: &AuthenticatedUser,
) -> ServiceResult<CatalogView>
where
    R: ProductReader + FacetReader + TownReader + UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    commit(repo, session, facets, config, user, FilterMachine::clear_all)
}

/// Scope the catalog to a single known town and remember the choice.
pub fn switch_town<R, S>(
    repo: &R,
    session: &S,
    facets: &FacetCache,
    config: &CatalogConfig,
    user: &AuthenticatedUser,
    form: SwitchTownForm,
) -> ServiceResult<CatalogView>
where
    R: ProductReader + FacetReader + TownReader + UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let name = sanitize_inline_text(&form.town);
    if name.is_empty() {
        return Err(ServiceError::Form("town name cannot be empty".to_string()));
    }

    let town = repo
        .get_town_by_name(&name, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    write_session(session, TOWN_KEY, &town.name);
    commit(repo, session, facets, config, user, |machine| {
        machine.switch_town(town.name)
    })
}

/// Facet options for the requested towns, or for the applied towns when not
/// given, optionally narrowed by an option search. Always rebuilt; cached
/// lists are only served when the rebuild fails.
pub fn load_facets<R, S>(
    repo: &R,
    session: &S,
    facets: &FacetCache,
    user: &AuthenticatedUser,
    query: FacetsQuery,
) -> ServiceResult<FacetView>
where
    R: FacetReader + TownReader + UserReader + ?Sized,
    S: SessionStore + ?Sized,
{
    let towns = match query.towns() {
        Some(towns) => towns,
        None => open_machine(repo, session, user)?.applied().towns.clone(),
    };

    let mut view = facet_view(repo, facets, user.hub_id, &towns, true);
    if let Some((dimension, term)) = query.option_search() {
        view.options = view.options.narrowed(dimension, &term);
    }
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::{Arc, Mutex};

    use chrono::{NaiveDate, NaiveDateTime};
    use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

    use crate::domain::facet::FacetValues;
    use crate::domain::filter::{PriceBounds, PriceBucket, SortKey};
    use crate::domain::product::{Product, ProductListQuery};
    use crate::domain::town::Town;
    use crate::domain::user::User;
    use crate::repository::mock::{
        MockFacetReader, MockProductReader, MockTownReader, MockUserReader,
    };
    use crate::session::MemorySessionStore;

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn shopper() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "shopper-1".to_string(),
            email: "shopper@example.com".to_string(),
            hub_id: 2,
            name: "Shopper".to_string(),
            roles: Vec::new(),
            exp: 0,
        }
    }

    fn profile(town: Option<&str>) -> User {
        User {
            id: 1,
            hub_id: 2,
            name: "Shopper".to_string(),
            email: "shopper@example.com".to_string(),
            town: town.map(str::to_string),
        }
    }

    fn product(id: i32, town: &str) -> Product {
        Product {
            id,
            hub_id: 2,
            shop_id: 1,
            shop_name: "Urban Style".to_string(),
            town: town.to_string(),
            name: format!("Product {id}"),
            brand: Some("Nike".to_string()),
            category: Some("Footwear".to_string()),
            price: 750,
            original_price: None,
            image_url: None,
            rating: 4.2,
            review_count: 3,
            is_active: true,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn town(name: &str) -> Town {
        Town {
            id: 1,
            hub_id: 2,
            name: name.to_string(),
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    fn config() -> CatalogConfig {
        CatalogConfig::new(2)
    }

    struct FakeRepo {
        product_reader: MockProductReader,
        facet_reader: MockFacetReader,
        town_reader: MockTownReader,
        user_reader: MockUserReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                product_reader: MockProductReader::new(),
                facet_reader: MockFacetReader::new(),
                town_reader: MockTownReader::new(),
                user_reader: MockUserReader::new(),
            }
        }

        /// Repo whose shopper lives in `town`, with a small catalog of
        /// `total` products and one brand.
        fn with_catalog(
            home_town: Option<&'static str>,
            total: usize,
        ) -> (Self, Arc<Mutex<Vec<ProductListQuery>>>) {
            let mut repo = Self::new();
            let seen = Arc::new(Mutex::new(Vec::new()));

            repo.user_reader
                .expect_get_user_by_email()
                .returning(move |_, _| Ok(Some(profile(home_town))));
            repo.facet_reader
                .expect_list_facet_values()
                .returning(|_, _| {
                    Ok(FacetValues {
                        brands: vec![Some("Nike".into())],
                        shops: vec!["Urban Style".into()],
                        categories: vec![Some("Footwear".into())],
                    })
                });
            repo.town_reader
                .expect_list_towns()
                .returning(|_| Ok(vec![town("Mumbai"), town("Pune")]));

            let recorded = Arc::clone(&seen);
            repo.product_reader
                .expect_list_products()
                .returning(move |query| {
                    let page = query.pagination.as_ref().map_or(1, |p| p.page);
                    let per_page = query.pagination.as_ref().map_or(total, |p| p.per_page);
                    let first = (page - 1) * per_page;
                    let items = (first..total.min(first + per_page))
                        .map(|index| product(index as i32 + 1, &query.towns[0]))
                        .collect();
                    if let Ok(mut seen) = recorded.lock() {
                        seen.push(query);
                    }
                    Ok((total, items))
                });

            (repo, seen)
        }
    }

    impl ProductReader for FakeRepo {
        fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>> {
            self.product_reader.get_product_by_id(id, hub_id)
        }

        fn get_products_by_ids(&self, ids: &[i32], hub_id: i32) -> RepositoryResult<Vec<Product>> {
            self.product_reader.get_products_by_ids(ids, hub_id)
        }

        fn list_products(
            &self,
            query: ProductListQuery,
        ) -> RepositoryResult<(usize, Vec<Product>)> {
            self.product_reader.list_products(query)
        }
    }

    impl FacetReader for FakeRepo {
        fn list_facet_values(&self, hub_id: i32, towns: &[String]) -> RepositoryResult<FacetValues> {
            self.facet_reader.list_facet_values(hub_id, towns)
        }
    }

    impl TownReader for FakeRepo {
        fn list_towns(&self, hub_id: i32) -> RepositoryResult<Vec<Town>> {
            self.town_reader.list_towns(hub_id)
        }

        fn get_town_by_name(&self, name: &str, hub_id: i32) -> RepositoryResult<Option<Town>> {
            self.town_reader.get_town_by_name(name, hub_id)
        }
    }

    impl UserReader for FakeRepo {
        fn get_user_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<User>> {
            self.user_reader.get_user_by_email(email, hub_id)
        }
    }

    fn ready(view: CatalogView) -> CatalogPage {
        match view {
            CatalogView::Ready(page) => *page,
            CatalogView::TownRequired => panic!("expected a catalog page"),
        }
    }

    fn change(json: &str) -> FilterChangeForm {
        serde_json::from_str(json).expect("filter change")
    }

    #[test]
    fn catalog_without_town_blocks_queries() {
        let mut repo = FakeRepo::new();
        repo.user_reader
            .expect_get_user_by_email()
            .returning(|_, _| Ok(Some(profile(None))));
        repo.product_reader.expect_list_products().never();

        let session = MemorySessionStore::new();
        let view = enter_catalog(
            &repo,
            &session,
            &FacetCache::new(),
            &config(),
            &shopper(),
            CatalogEntryQuery::default(),
        )
        .expect("view");

        assert!(matches!(view, CatalogView::TownRequired));
    }

    #[test]
    fn entering_catalog_scopes_to_profile_town() {
        let (repo, seen) = FakeRepo::with_catalog(Some("Mumbai"), 5);
        let session = MemorySessionStore::new();

        let page = ready(
            enter_catalog(
                &repo,
                &session,
                &FacetCache::new(),
                &config(),
                &shopper(),
                CatalogEntryQuery::default(),
            )
            .expect("view"),
        );

        assert_eq!(page.filters, FilterState::for_town("Mumbai"));
        assert!(!page.has_active_filters);
        assert_eq!(page.products.page, 1);
        assert_eq!(page.products.items.len(), 2);
        assert_eq!(page.products.total_pages, 3);
        assert_eq!(page.facets.options.brands, vec!["Nike"]);
        assert_eq!(page.facets.options.towns, vec!["Mumbai", "Pune"]);

        let queries = seen.lock().expect("queries");
        assert_eq!(queries[0].hub_id, 2);
        assert_eq!(queries[0].towns, vec!["Mumbai".to_string()]);
        assert_eq!(queries[0].sort, SortKey::RatingDesc);
    }

    #[test]
    fn entry_parameters_are_applied_directly() {
        let (repo, seen) = FakeRepo::with_catalog(Some("Mumbai"), 1);
        let session = MemorySessionStore::new();

        let page = ready(
            enter_catalog(
                &repo,
                &session,
                &FacetCache::new(),
                &config(),
                &shopper(),
                CatalogEntryQuery {
                    search: Some("runner".into()),
                    category: None,
                },
            )
            .expect("view"),
        );

        assert_eq!(page.filters.search.as_deref(), Some("runner"));
        let queries = seen.lock().expect("queries");
        assert_eq!(queries[0].search.as_deref(), Some("runner"));
    }

    #[test]
    fn applying_price_buckets_queries_their_union() {
        let (repo, seen) = FakeRepo::with_catalog(Some("Mumbai"), 3);
        let session = MemorySessionStore::new();
        let facets = FacetCache::new();
        let user = shopper();

        enter_catalog(&repo, &session, &facets, &config(), &user, CatalogEntryQuery::default())
            .expect("enter");
        open_filter_panel(&repo, &session, &user).expect("open");
        set_draft_filter(
            &repo,
            &session,
            &user,
            change(r#"{"dimension":"price_ranges","value":["0-500","1001-1500"]}"#),
        )
        .expect("draft");

        let applied = get_filter_state(&repo, &session, &user, FilterLayer::Applied)
            .expect("state")
            .expect("applied");
        assert!(applied.price_ranges.is_empty());

        let page = ready(apply_filters(&repo, &session, &facets, &config(), &user).expect("apply"));

        assert_eq!(page.generation, 2);
        assert_eq!(
            page.filters.price_ranges,
            BTreeSet::from([PriceBucket::UpTo500, PriceBucket::From1001To1500])
        );
        let queries = seen.lock().expect("queries");
        let last = queries.last().expect("query");
        assert_eq!(
            last.price,
            Some(PriceBounds {
                min: 0,
                max: Some(1500)
            })
        );
        let persisted = get_filter_state(&repo, &session, &user, FilterLayer::Persisted);
        assert_eq!(persisted.expect("state"), Some(page.filters.clone()));
    }

    #[test]
    fn town_change_clears_shops_and_refreshes_facets() {
        let (mut repo, _) = FakeRepo::with_catalog(Some("Mumbai"), 3);
        repo.town_reader
            .expect_get_town_by_name()
            .returning(|name, _| Ok(Some(town(name))));
        let session = MemorySessionStore::new();
        let facets = FacetCache::new();
        let user = shopper();

        apply_direct_filter(
            &repo,
            &session,
            &facets,
            &config(),
            &user,
            change(r#"{"dimension":"shops","value":["Urban Style"]}"#),
        )
        .expect("shops");

        let page = ready(
            switch_town(
                &repo,
                &session,
                &facets,
                &config(),
                &user,
                SwitchTownForm {
                    town: "Pune".into(),
                },
            )
            .expect("switch"),
        );

        assert_eq!(page.filters.towns, BTreeSet::from(["Pune".to_string()]));
        assert!(page.filters.shops.is_empty());
        assert_eq!(page.facets.towns, BTreeSet::from(["Pune".to_string()]));
        assert!(session.contains(TOWN_KEY));

        // The remembered town now wins over the profile town.
        let page = ready(
            clear_filters(&repo, &session, &facets, &config(), &user).expect("clear"),
        );
        assert_eq!(page.filters, FilterState::for_town("Pune"));
    }

    #[test]
    fn switching_to_unknown_town_is_not_found() {
        let mut repo = FakeRepo::new();
        repo.town_reader
            .expect_get_town_by_name()
            .returning(|_, _| Ok(None));
        let session = MemorySessionStore::new();

        let result = switch_town(
            &repo,
            &session,
            &FacetCache::new(),
            &config(),
            &shopper(),
            SwitchTownForm {
                town: "Atlantis".into(),
            },
        );

        assert!(matches!(result, Err(ServiceError::NotFound)));
        assert!(!session.contains(TOWN_KEY));
    }

    #[test]
    fn next_page_walks_to_exhaustion() {
        let (repo, _) = FakeRepo::with_catalog(Some("Mumbai"), 5);
        let session = MemorySessionStore::new();
        let user = shopper();

        let page = ready(
            enter_catalog(
                &repo,
                &session,
                &FacetCache::new(),
                &config(),
                &user,
                CatalogEntryQuery::default(),
            )
            .expect("enter"),
        );
        let generation = page.generation;

        let mut ids: Vec<i32> = page.products.items.iter().map(|item| item.id).collect();
        loop {
            match load_next_page(&repo, &session, &config(), &user, generation).expect("next") {
                NextPage::Page(page) => ids.extend(page.items.iter().map(|item| item.id)),
                NextPage::Exhausted => break,
                NextPage::Stale => panic!("generation should be current"),
            }
        }

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        let applied = get_filter_state(&repo, &session, &user, FilterLayer::Applied)
            .expect("state")
            .expect("applied");
        assert_eq!(applied.page, 3);
    }

    #[test]
    fn next_page_for_old_generation_is_stale() {
        let mut repo = FakeRepo::new();
        repo.user_reader
            .expect_get_user_by_email()
            .returning(|_, _| Ok(Some(profile(Some("Mumbai")))));
        repo.product_reader.expect_list_products().never();
        let session = MemorySessionStore::new();
        write_session(&session, GENERATION_KEY, &4u64);

        let result = load_next_page(&repo, &session, &config(), &shopper(), 3).expect("next");

        assert_eq!(result, NextPage::Stale);
    }

    #[test]
    fn failed_next_page_keeps_page_counter() {
        let mut repo = FakeRepo::new();
        repo.user_reader
            .expect_get_user_by_email()
            .returning(|_, _| Ok(Some(profile(Some("Mumbai")))));
        repo.product_reader
            .expect_list_products()
            .returning(|_| Err(RepositoryError::NotFound));
        let session = MemorySessionStore::new();
        write_session(&session, GENERATION_KEY, &1u64);

        let result = load_next_page(&repo, &session, &config(), &shopper(), 1);

        assert!(result.is_err());
        let applied = get_filter_state(&repo, &session, &shopper(), FilterLayer::Applied)
            .expect("state")
            .expect("applied");
        assert_eq!(applied.page, 1);
    }

    #[test]
    fn facet_failure_serves_cached_lists() {
        let (mut repo, _) = FakeRepo::with_catalog(Some("Mumbai"), 1);
        let session = MemorySessionStore::new();
        let facets = FacetCache::new();
        let user = shopper();

        enter_catalog(&repo, &session, &facets, &config(), &user, CatalogEntryQuery::default())
            .expect("enter");

        repo.facet_reader.checkpoint();
        repo.facet_reader
            .expect_list_facet_values()
            .returning(|_, _| Err(RepositoryError::NotFound));

        let page = ready(
            enter_catalog(&repo, &session, &facets, &config(), &user, CatalogEntryQuery::default())
                .expect("enter"),
        );

        assert!(page.facets.stale);
        assert_eq!(page.facets.options.brands, vec!["Nike"]);
        assert_eq!(page.products.items.len(), 1);
    }

    #[test]
    fn corrupt_session_values_are_ignored() {
        let (repo, _) = FakeRepo::with_catalog(Some("Mumbai"), 1);
        let session = MemorySessionStore::new();
        session
            .save_value(APPLIED_KEY, "{broken".to_string())
            .expect("save");

        let page = ready(
            current_page(&repo, &session, &FacetCache::new(), &config(), &shopper())
                .expect("page"),
        );

        assert_eq!(page.filters, FilterState::for_town("Mumbai"));
    }

    #[test]
    fn invalid_filter_change_is_form_error() {
        let repo = FakeRepo::new();
        let session = MemorySessionStore::new();

        let result = set_draft_filter(
            &repo,
            &session,
            &shopper(),
            change(r#"{"dimension":"sort","value":"cheapest"}"#),
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn facets_default_to_applied_towns() {
        let (mut repo, _) = FakeRepo::with_catalog(Some("Mumbai"), 1);
        repo.facet_reader.checkpoint();
        repo.facet_reader
            .expect_list_facet_values()
            .times(1)
            .withf(|_, towns| towns.to_vec() == vec!["Mumbai".to_string()])
            .returning(|_, _| Ok(FacetValues::default()));

        let view = load_facets(
            &repo,
            &MemorySessionStore::new(),
            &FacetCache::new(),
            &shopper(),
            FacetsQuery::default(),
        )
        .expect("facets");

        assert_eq!(view.towns, BTreeSet::from(["Mumbai".to_string()]));
    }
}
