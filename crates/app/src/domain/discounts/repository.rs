//! Discounts Repository

use decimal_percentage::Percentage;
use jiff::{Timestamp, civil::Date};
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use bazar::discounts::{AmountTier, ProductDiscount};

use crate::domain::{
    discounts::models::{Discount, DiscountKind, DiscountUpdate, DiscountUuid, NewDiscount},
    products::{
        models::VariantUuid,
        repository::{try_get_amount, try_get_optional_amount, try_to_amount},
    },
};

const LIST_DISCOUNTS_SQL: &str = include_str!("sql/list_discounts.sql");
const GET_DISCOUNT_SQL: &str = include_str!("sql/get_discount.sql");
const CREATE_DISCOUNT_SQL: &str = include_str!("sql/create_discount.sql");
const UPDATE_DISCOUNT_SQL: &str = include_str!("sql/update_discount.sql");
const DELETE_DISCOUNT_SQL: &str = include_str!("sql/delete_discount.sql");
const ACTIVE_PRODUCT_DISCOUNTS_SQL: &str = include_str!("sql/active_product_discounts.sql");
const BEST_AMOUNT_TIER_SQL: &str = include_str!("sql/best_amount_tier.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDiscountsRepository;

impl PgDiscountsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_discounts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        point_in_time: Timestamp,
    ) -> Result<Vec<Discount>, sqlx::Error> {
        query_as::<Postgres, Discount>(LIST_DISCOUNTS_SQL)
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_discount(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discount: DiscountUuid,
        point_in_time: Timestamp,
    ) -> Result<Discount, sqlx::Error> {
        query_as::<Postgres, Discount>(GET_DISCOUNT_SQL)
            .bind(discount.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_discount(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discount: &NewDiscount,
    ) -> Result<Discount, sqlx::Error> {
        let (variant_uuid, percent, amount_from, amount_to, validity) = match discount {
            NewDiscount::Product {
                variant_uuid,
                percent,
                validity,
                ..
            } => (Some(variant_uuid.into_uuid()), *percent, None, None, validity),
            NewDiscount::Amount {
                amount_from,
                amount_to,
                percent,
                validity,
                ..
            } => (
                None,
                *percent,
                Some(try_to_amount(*amount_from)?),
                Some(try_to_amount(*amount_to)?),
                validity,
            ),
        };

        query_as::<Postgres, Discount>(CREATE_DISCOUNT_SQL)
            .bind(discount.uuid().into_uuid())
            .bind(discount.kind())
            .bind(variant_uuid)
            .bind(percent)
            .bind(amount_from)
            .bind(amount_to)
            .bind(SqlxDate::from(validity.from))
            .bind(SqlxDate::from(validity.to))
            .bind(validity.active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_discount(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discount: DiscountUuid,
        update: &DiscountUpdate,
    ) -> Result<Discount, sqlx::Error> {
        let amount_from = update.amount_from.map(try_to_amount).transpose()?;
        let amount_to = update.amount_to.map(try_to_amount).transpose()?;

        query_as::<Postgres, Discount>(UPDATE_DISCOUNT_SQL)
            .bind(discount.into_uuid())
            .bind(update.percent)
            .bind(amount_from)
            .bind(amount_to)
            .bind(SqlxDate::from(update.validity.from))
            .bind(SqlxDate::from(update.validity.to))
            .bind(update.validity.active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_discount(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        discount: DiscountUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_DISCOUNT_SQL)
            .bind(discount.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Active, date-current product discounts for the given variants.
    ///
    /// Rows come back unaggregated; precedence between overlapping rows for
    /// one variant is the pricing engine's concern.
    pub(crate) async fn active_product_discounts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variants: &[Uuid],
        date: Date,
    ) -> Result<Vec<ProductDiscount>, sqlx::Error> {
        if variants.is_empty() {
            return Ok(Vec::new());
        }

        let rows = query_as::<Postgres, ProductDiscountRow>(ACTIVE_PRODUCT_DISCOUNTS_SQL)
            .bind(variants.to_vec())
            .bind(SqlxDate::from(date))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    /// The single best amount tier containing `eligible_subtotal`, if any.
    ///
    /// Ties on containment resolve to the highest percentage. `None` is a
    /// normal outcome, not a failure.
    pub(crate) async fn best_amount_tier(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        eligible_subtotal: u64,
        date: Date,
    ) -> Result<Option<AmountTier>, sqlx::Error> {
        let eligible = try_to_amount(eligible_subtotal)?;

        let row = query_as::<Postgres, AmountTierRow>(BEST_AMOUNT_TIER_SQL)
            .bind(eligible)
            .bind(SqlxDate::from(date))
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|row| row.0))
    }
}

impl<'r> FromRow<'r, PgRow> for Discount {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let amount_from = try_get_optional_amount(row, "amount_from")?;
        let amount_to = try_get_optional_amount(row, "amount_to")?;

        Ok(Self {
            uuid: DiscountUuid::from_uuid(row.try_get("uuid")?),
            kind: row.try_get("kind")?,
            variant_uuid: row
                .try_get::<Option<Uuid>, _>("variant_uuid")?
                .map(VariantUuid::from_uuid),
            percent: row.try_get("percent")?,
            amount_from,
            amount_to,
            valid_from: row.try_get::<SqlxDate, _>("valid_from")?.to_jiff(),
            valid_to: row.try_get::<SqlxDate, _>("valid_to")?.to_jiff(),
            active: row.try_get("active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

struct ProductDiscountRow(ProductDiscount);

impl<'r> FromRow<'r, PgRow> for ProductDiscountRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let percent: Decimal = row.try_get("percent")?;

        Ok(Self(ProductDiscount {
            variant_uuid: row.try_get("variant_uuid")?,
            percent: to_fraction(percent),
        }))
    }
}

struct AmountTierRow(AmountTier);

impl<'r> FromRow<'r, PgRow> for AmountTierRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let percent: Decimal = row.try_get("percent")?;

        Ok(Self(AmountTier {
            lower: try_get_amount(row, "amount_from")?,
            upper: try_get_amount(row, "amount_to")?,
            percent: to_fraction(percent),
        }))
    }
}

/// Stored percentages are human numbers (15 = 15%); the engine wants
/// fractions.
fn to_fraction(percent: Decimal) -> Percentage {
    Percentage::from(percent / Decimal::ONE_HUNDRED)
}
