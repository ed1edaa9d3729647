//! Discounts Service

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    database::Db,
    domain::discounts::{
        errors::DiscountsServiceError,
        models::{Discount, DiscountKind, DiscountUpdate, DiscountUuid, NewDiscount, Validity},
        repository::PgDiscountsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgDiscountsService {
    db: Db,
    repository: PgDiscountsRepository,
}

impl PgDiscountsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDiscountsRepository::new(),
        }
    }
}

#[async_trait]
impl DiscountsService for PgDiscountsService {
    async fn list_discounts(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<Discount>, DiscountsServiceError> {
        let mut tx = self.db.begin().await?;

        let discounts = self
            .repository
            .list_discounts(&mut tx, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(discounts)
    }

    async fn get_discount(
        &self,
        discount: DiscountUuid,
        point_in_time: Timestamp,
    ) -> Result<Discount, DiscountsServiceError> {
        let mut tx = self.db.begin().await?;

        let discount = self
            .repository
            .get_discount(&mut tx, discount, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(discount)
    }

    #[tracing::instrument(
        name = "discounts.service.create_discount",
        skip(self, discount),
        fields(discount_uuid = %discount.uuid()),
        err
    )]
    async fn create_discount(
        &self,
        discount: NewDiscount,
    ) -> Result<Discount, DiscountsServiceError> {
        match &discount {
            NewDiscount::Product {
                percent, validity, ..
            } => validate(*percent, None, validity)?,
            NewDiscount::Amount {
                amount_from,
                amount_to,
                percent,
                validity,
                ..
            } => validate(*percent, Some((*amount_from, *amount_to)), validity)?,
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_discount(&mut tx, &discount).await?;

        tx.commit().await?;

        info!(discount_uuid = %created.uuid, "created discount");

        Ok(created)
    }

    async fn update_discount(
        &self,
        discount: DiscountUuid,
        update: DiscountUpdate,
    ) -> Result<Discount, DiscountsServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .repository
            .get_discount(&mut tx, discount, Timestamp::now())
            .await?;

        let bounds = match current.kind {
            DiscountKind::Amount => {
                let bounds = update
                    .amount_from
                    .zip(update.amount_to)
                    .ok_or(DiscountsServiceError::MissingRequiredData)?;

                Some(bounds)
            }
            DiscountKind::Product => None,
        };

        validate(update.percent, bounds, &update.validity)?;

        let updated = self
            .repository
            .update_discount(&mut tx, discount, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_discount(&self, discount: DiscountUuid) -> Result<(), DiscountsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_discount(&mut tx, discount).await?;

        if rows_affected == 0 {
            return Err(DiscountsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

/// Admin-boundary validation: percentages stay in (0, 100], tier bounds are
/// ordered, validity ranges are ordered. The pricing engine additionally
/// clamps per line, but misconfigurations are rejected here first.
fn validate(
    percent: Decimal,
    bounds: Option<(u64, u64)>,
    validity: &Validity,
) -> Result<(), DiscountsServiceError> {
    if percent <= Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(DiscountsServiceError::InvalidData);
    }

    if validity.from > validity.to {
        return Err(DiscountsServiceError::InvalidData);
    }

    if let Some((from, to)) = bounds
        && from > to
    {
        return Err(DiscountsServiceError::InvalidData);
    }

    Ok(())
}

#[automock]
#[async_trait]
pub trait DiscountsService: Send + Sync {
    /// Retrieves all discounts.
    async fn list_discounts(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<Discount>, DiscountsServiceError>;

    /// Retrieve a single discount.
    async fn get_discount(
        &self,
        discount: DiscountUuid,
        point_in_time: Timestamp,
    ) -> Result<Discount, DiscountsServiceError>;

    /// Creates a new discount.
    async fn create_discount(
        &self,
        discount: NewDiscount,
    ) -> Result<Discount, DiscountsServiceError>;

    /// Updates a discount's percentage, bounds and validity.
    async fn update_discount(
        &self,
        discount: DiscountUuid,
        update: DiscountUpdate,
    ) -> Result<Discount, DiscountsServiceError>;

    /// Soft-deletes a discount with the given UUID.
    async fn delete_discount(&self, discount: DiscountUuid) -> Result<(), DiscountsServiceError>;
}
