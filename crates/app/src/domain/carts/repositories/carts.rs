//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    auth::models::UserUuid,
    domain::carts::models::{Cart, CartOwner, CartUuid},
};

const GET_CART_BY_OWNER_SQL: &str = include_str!("../sql/get_cart_by_owner.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: CartOwner,
    ) -> Result<Option<Cart>, sqlx::Error> {
        let (user_uuid, session_uuid) = owner_columns(owner);

        query_as::<Postgres, Cart>(GET_CART_BY_OWNER_SQL)
            .bind(user_uuid)
            .bind(session_uuid)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch the owner's cart, creating it on first touch.
    ///
    /// The insert swallows unique violations so two concurrent first touches
    /// converge on the same row.
    pub(crate) async fn get_or_create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: CartOwner,
    ) -> Result<Cart, sqlx::Error> {
        if let Some(cart) = self.get_cart(tx, owner).await? {
            return Ok(cart);
        }

        let (user_uuid, session_uuid) = owner_columns(owner);

        query(CREATE_CART_SQL)
            .bind(Uuid::now_v7())
            .bind(user_uuid)
            .bind(session_uuid)
            .execute(&mut **tx)
            .await?;

        self.get_cart(tx, owner)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }
}

fn owner_columns(owner: CartOwner) -> (Option<Uuid>, Option<Uuid>) {
    match owner {
        CartOwner::User(user) => (Some(user.into_uuid()), None),
        CartOwner::Session(session) => (None, Some(session)),
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            session_uuid: row.try_get("session_uuid")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
