//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use bazar_app::{auth::models::UserUuid, domain::carts::models::CartOwner};

const CART_OWNER_KEY: &str = "bazar.cart_owner";
const USER_UUID_KEY: &str = "bazar.user_uuid";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_cart_owner(&mut self, owner: CartOwner);

    /// The cart owner placed by the session middleware; its absence is a
    /// wiring bug, not a client error.
    fn cart_owner_or_500(&self) -> Result<CartOwner, StatusError>;

    fn insert_user_uuid(&mut self, user: UserUuid);

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_cart_owner(&mut self, owner: CartOwner) {
        self.insert(CART_OWNER_KEY, owner);
    }

    fn cart_owner_or_500(&self) -> Result<CartOwner, StatusError> {
        self.get::<CartOwner>(CART_OWNER_KEY)
            .copied()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_user_uuid(&mut self, user: UserUuid) {
        self.insert(USER_UUID_KEY, user);
    }

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError> {
        self.get::<UserUuid>(USER_UUID_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
