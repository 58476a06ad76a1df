use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::town::Town;
use crate::forms::towns::AddTownForm;
use crate::repository::{TownReader, TownWriter};
use crate::services::{ServiceError, ServiceResult};

/// Towns of the user's hub, sorted by name. Open to every shopper.
pub fn list_towns<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Town>>
where
    R: TownReader + ?Sized,
{
    repo.list_towns(user.hub_id).map_err(ServiceError::from)
}

/// Adds a town to the hub. Requires the admin role.
pub fn create_town<R>(repo: &R, user: &AuthenticatedUser, form: AddTownForm) -> ServiceResult<Town>
where
    R: TownReader + TownWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_town = form
        .into_new_town(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_town_by_name(&new_town.name, user.hub_id)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict);
    }

    repo.create_town(&new_town).map_err(ServiceError::from)
}

/// Removes a town from the hub. Shops keep their town label.
pub fn delete_town<R>(repo: &R, user: &AuthenticatedUser, town_id: i32) -> ServiceResult<()>
where
    R: TownWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_town(town_id, user.hub_id)
        .map_err(ServiceError::from)
}
