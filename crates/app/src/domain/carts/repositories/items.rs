//! Cart Items Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use bazar::lines::RawLine;

use crate::domain::{
    carts::models::{CartItem, CartItemUuid, CartUuid, NewCartItem},
    products::{
        models::{ProductUuid, VariantUuid},
        repository::try_get_amount,
    },
};

const LIST_RAW_LINES_SQL: &str = include_str!("../sql/list_raw_lines.sql");
const VARIANT_STATUS_SQL: &str = include_str!("../sql/variant_status.sql");
const UPSERT_ITEM_SQL: &str = include_str!("../sql/upsert_item.sql");
const SET_QUANTITY_SQL: &str = include_str!("../sql/set_quantity.sql");
const DELETE_ITEM_SQL: &str = include_str!("../sql/delete_item.sql");
const CLEAR_ITEMS_SQL: &str = include_str!("../sql/clear_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// The cart's lines as the pricing engine expects them: stored
    /// quantities joined against live, active variant rows. Inactive and
    /// deleted variants drop out of the join entirely.
    pub(crate) async fn list_raw_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<RawLine>, sqlx::Error> {
        let rows = query_as::<Postgres, RawLineRow>(LIST_RAW_LINES_SQL)
            .bind(cart.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    /// Whether a variant exists (`Some`) and is active (`true`).
    pub(crate) async fn variant_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<Option<bool>, sqlx::Error> {
        let row: Option<(bool,)> = query_as(VARIANT_STATUS_SQL)
            .bind(variant.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|(active,)| active))
    }

    /// Insert a line or increment the existing one for the same variant.
    pub(crate) async fn upsert_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: &NewCartItem,
    ) -> Result<CartItem, sqlx::Error> {
        query_as::<Postgres, CartItem>(UPSERT_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(cart.into_uuid())
            .bind(item.variant_uuid.into_uuid())
            .bind(try_to_quantity(item.quantity)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(SET_QUANTITY_SQL)
            .bind(cart.into_uuid())
            .bind(item.into_uuid())
            .bind(try_to_quantity(quantity)?)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn delete_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(item.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

struct RawLineRow(RawLine);

impl<'r> FromRow<'r, PgRow> for RawLineRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self(RawLine {
            item_uuid: row.try_get("item_uuid")?,
            variant_uuid: row.try_get("variant_uuid")?,
            product_uuid: row.try_get("product_uuid")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            image_url: row.try_get("image_url")?,
            unit_price: try_get_amount(row, "price")?,
            quantity: try_get_quantity(row)?,
            discount_blocked: row.try_get("discount_blocked")?,
            stock: row.try_get("stock")?,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            quantity: try_get_quantity(row)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

fn try_get_quantity(row: &PgRow) -> Result<u32, sqlx::Error> {
    let quantity_i32: i32 = row.try_get("quantity")?;

    u32::try_from(quantity_i32).map_err(|e| sqlx::Error::ColumnDecode {
        index: "quantity".to_string(),
        source: Box::new(e),
    })
}

fn try_to_quantity(quantity: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}
