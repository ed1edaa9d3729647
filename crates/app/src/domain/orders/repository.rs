//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use bazar::lines::PricedLine;

use crate::{
    auth::models::UserUuid,
    domain::{
        orders::models::{Customer, NewOrder, Order, OrderItem, OrderItemUuid, OrderStatus, OrderUuid},
        products::{
            models::{ProductUuid, VariantUuid},
            repository::{try_get_amount, try_to_amount},
        },
    },
};

const LOCK_VARIANT_STOCK_SQL: &str = include_str!("sql/lock_variant_stock.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_FOR_UPDATE_SQL: &str = include_str!("sql/get_order_for_update.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");
const UPDATE_STATUS_SQL: &str = include_str!("sql/update_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock a variant's row and return its current stock.
    ///
    /// The row lock serialises concurrent checkouts of the same variant so
    /// stock can never go negative under contention.
    pub(crate) async fn lock_variant_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: Uuid,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = query_as(LOCK_VARIANT_STOCK_SQL)
            .bind(variant)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|(stock,)| stock))
    }

    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: Uuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        query(DECREMENT_STOCK_SQL)
            .bind(variant)
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
        number: &str,
        user_uuid: Option<UserUuid>,
        subtotal: u64,
        discount_amount: u64,
        total: u64,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(number)
            .bind(user_uuid.map(UserUuid::into_uuid))
            .bind(try_to_amount(subtotal)?)
            .bind(try_to_amount(discount_amount)?)
            .bind(try_to_amount(order.shipping_cost)?)
            .bind(try_to_amount(total)?)
            .bind(&order.payment_method)
            .bind(&order.customer.name)
            .bind(&order.customer.email)
            .bind(&order.customer.phone)
            .bind(&order.customer.address)
            .bind(&order.customer.city)
            .bind(&order.customer.notes)
            .fetch_one(&mut **tx)
            .await
    }

    /// Snapshot one priced cart line as an order item.
    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        line: &PricedLine,
    ) -> Result<OrderItem, sqlx::Error> {
        let discount_percent: Option<Decimal> = line
            .discount_percent
            .map(|percent| percent * Decimal::ONE_HUNDRED);

        query_as::<Postgres, OrderItem>(CREATE_ORDER_ITEM_SQL)
            .bind(OrderItemUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(line.raw.product_uuid)
            .bind(line.raw.variant_uuid)
            .bind(&line.raw.name)
            .bind(try_to_quantity(line.raw.quantity)?)
            .bind(try_to_amount(line.raw.unit_price)?)
            .bind(discount_percent)
            .bind(try_to_amount(line.discount_amount)?)
            .bind(try_to_amount(line.subtotal)?)
            .bind(try_to_amount(line.total)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_FOR_UPDATE_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(UPDATE_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status)
            .fetch_one(&mut **tx)
            .await
    }
}

fn try_to_quantity(quantity: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            number: row.try_get("number")?,
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            status: row.try_get("status")?,
            subtotal: try_get_amount(row, "subtotal")?,
            discount_amount: try_get_amount(row, "discount_amount")?,
            shipping_cost: try_get_amount(row, "shipping_cost")?,
            total: try_get_amount(row, "total")?,
            payment_method: row.try_get("payment_method")?,
            customer: Customer {
                name: row.try_get("customer_name")?,
                email: row.try_get("customer_email")?,
                phone: row.try_get("customer_phone")?,
                address: row.try_get("shipping_address")?,
                city: row.try_get("shipping_city")?,
                notes: row.try_get("notes")?,
            },
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity_i32: i32 = row.try_get("quantity")?;

        let quantity = u32::try_from(quantity_i32).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            name: row.try_get("name")?,
            quantity,
            unit_price: try_get_amount(row, "unit_price")?,
            discount_percent: row.try_get("discount_percent")?,
            discount_amount: try_get_amount(row, "discount_amount")?,
            subtotal: try_get_amount(row, "subtotal")?,
            total: try_get_amount(row, "total")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
