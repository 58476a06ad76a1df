use pushkind_common::domain::auth::AuthenticatedUser;

/// Owner of a set of stored catalog state values: one shopper of one hub.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogStateScope {
    pub hub_id: i32,
    pub user_sub: String,
}

impl CatalogStateScope {
    pub fn new(hub_id: i32, user_sub: impl Into<String>) -> Self {
        Self {
            hub_id,
            user_sub: user_sub.into(),
        }
    }
}

impl From<&AuthenticatedUser> for CatalogStateScope {
    fn from(user: &AuthenticatedUser) -> Self {
        Self::new(user.hub_id, user.sub.clone())
    }
}
