//! Carts service.

use async_trait::async_trait;
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use mockall::automock;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use bazar::{
    discounts::product_discount_map,
    pricing::{apply_amount_tier, eligible_subtotal, price_lines},
    summary::summarize,
};

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{CartItem, CartItemUuid, CartOwner, CartUuid, NewCartItem, PricedCart},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        discounts::repository::PgDiscountsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    discounts_repository: PgDiscountsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            discounts_repository: PgDiscountsRepository::new(),
        }
    }

    async fn reprice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        point_in_time: Timestamp,
    ) -> Result<PricedCart, CartsServiceError> {
        reprice_cart(
            tx,
            &self.items_repository,
            &self.discounts_repository,
            cart,
            point_in_time,
        )
        .await
    }
}

/// Run the pricing pipeline over the cart's current rows.
///
/// Stage order matters: the eligible subtotal is computed after product
/// discounts and before the tier is applied, and that value drives the tier
/// lookup. Order placement runs the same pipeline inside its own
/// transaction, which is why this lives outside [`PgCartsService`].
pub(crate) async fn reprice_cart(
    tx: &mut Transaction<'_, Postgres>,
    items_repository: &PgCartItemsRepository,
    discounts_repository: &PgDiscountsRepository,
    cart: CartUuid,
    point_in_time: Timestamp,
) -> Result<PricedCart, CartsServiceError> {
    let raw = items_repository
        .list_raw_lines(tx, cart, point_in_time)
        .await?;

    let date = civil_date(point_in_time);

    let variants: Vec<Uuid> = raw.iter().map(|line| line.variant_uuid).collect();

    let product_discounts = discounts_repository
        .active_product_discounts(tx, &variants, date)
        .await?;

    let discount_map = product_discount_map(product_discounts);

    let lines = price_lines(raw, &discount_map)?;

    let eligible = eligible_subtotal(&lines)?;

    let tier = discounts_repository
        .best_amount_tier(tx, eligible, date)
        .await?;

    let lines = apply_amount_tier(lines, tier.as_ref())?;

    let summary = summarize(&lines)?;

    Ok(PricedCart {
        cart_uuid: cart,
        lines,
        summary,
    })
}

/// Discount validity is bounded by civil dates; "today" is the UTC date of
/// the request's point in time.
fn civil_date(point_in_time: Timestamp) -> Date {
    point_in_time.to_zoned(TimeZone::UTC).date()
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn price_cart(
        &self,
        owner: CartOwner,
        point_in_time: Timestamp,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .get_or_create_cart(&mut tx, owner)
            .await?;

        let priced = self.reprice(&mut tx, cart.uuid, point_in_time).await?;

        tx.commit().await?;

        Ok(priced)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(variant_uuid = %item.variant_uuid, quantity = item.quantity),
        err
    )]
    async fn add_item(
        &self,
        owner: CartOwner,
        item: NewCartItem,
        point_in_time: Timestamp,
    ) -> Result<PricedCart, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        match self
            .items_repository
            .variant_status(&mut tx, item.variant_uuid)
            .await?
        {
            None => return Err(CartsServiceError::NotFound),
            Some(false) => return Err(CartsServiceError::InactiveVariant),
            Some(true) => {}
        }

        let cart = self
            .carts_repository
            .get_or_create_cart(&mut tx, owner)
            .await?;

        self.items_repository
            .upsert_item(&mut tx, cart.uuid, &item)
            .await?;

        let priced = self.reprice(&mut tx, cart.uuid, point_in_time).await?;

        tx.commit().await?;

        Ok(priced)
    }

    async fn set_quantity(
        &self,
        owner: CartOwner,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .get_cart(&mut tx, owner)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let updated = self
            .items_repository
            .set_quantity(&mut tx, cart.uuid, item, quantity)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn remove_item(
        &self,
        owner: CartOwner,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .get_cart(&mut tx, owner)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let rows_affected = self
            .items_repository
            .delete_item(&mut tx, cart.uuid, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn clear(&self, owner: CartOwner) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        // clearing a cart that was never created is a no-op
        if let Some(cart) = self.carts_repository.get_cart(&mut tx, owner).await? {
            self.items_repository.clear_items(&mut tx, cart.uuid).await?;
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the owner's cart, fully re-priced. Creates the cart row on
    /// first touch.
    async fn price_cart(
        &self,
        owner: CartOwner,
        point_in_time: Timestamp,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Add a variant to the cart (or increment the existing line) and return
    /// the re-priced cart.
    async fn add_item(
        &self,
        owner: CartOwner,
        item: NewCartItem,
        point_in_time: Timestamp,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Set a line's quantity; the quantity must be positive.
    async fn set_quantity(
        &self,
        owner: CartOwner,
        item: CartItemUuid,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError>;

    /// Remove a line from the owner's cart.
    async fn remove_item(
        &self,
        owner: CartOwner,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError>;

    /// Remove every line from the owner's cart.
    async fn clear(&self, owner: CartOwner) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use bazar::lines::DiscountKind;

    use crate::test::TestContext;

    use super::*;

    fn session_owner() -> CartOwner {
        CartOwner::Session(Uuid::now_v7())
    }

    #[tokio::test]
    async fn price_cart_creates_empty_cart_on_first_touch() -> TestResult {
        let ctx = TestContext::new().await;

        let priced = ctx
            .carts
            .price_cart(session_owner(), Timestamp::now())
            .await?;

        assert!(priced.lines.is_empty());
        assert_eq!(priced.summary.subtotal, 0);
        assert_eq!(priced.summary.total, 0);
        assert_eq!(priced.summary.line_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_prices_the_line() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant("Yerba mate 500g", 10_000).await?;
        let owner = session_owner();

        let priced = ctx
            .carts
            .add_item(
                owner,
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    variant_uuid: variant.uuid,
                    quantity: 2,
                },
                Timestamp::now(),
            )
            .await?;

        assert_eq!(priced.lines.len(), 1);
        assert_eq!(priced.summary.subtotal, 20_000);
        assert_eq!(priced.summary.discount_amount, 0);
        assert_eq!(priced.summary.total, 20_000);

        Ok(())
    }

    #[tokio::test]
    async fn add_same_variant_twice_increments_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant("Yerba mate 500g", 10_000).await?;
        let owner = session_owner();

        ctx.add_to_cart(owner, variant.uuid, 1).await?;
        let priced = ctx.add_to_cart(owner, variant.uuid, 2).await?;

        assert_eq!(priced.lines.len(), 1, "same variant should merge lines");
        assert_eq!(priced.summary.subtotal, 30_000);

        Ok(())
    }

    #[tokio::test]
    async fn add_unknown_variant_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .add_item(
                session_owner(),
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    variant_uuid: crate::domain::products::models::VariantUuid::new(),
                    quantity: 1,
                },
                Timestamp::now(),
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_inactive_variant_returns_inactive() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant("Yerba mate 500g", 10_000).await?;

        ctx.deactivate_variant(&variant).await?;

        let result = ctx
            .carts
            .add_item(
                session_owner(),
                NewCartItem {
                    uuid: CartItemUuid::new(),
                    variant_uuid: variant.uuid,
                    quantity: 1,
                },
                Timestamp::now(),
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InactiveVariant)),
            "expected InactiveVariant, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn deactivated_variant_drops_out_of_cart_reads() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant("Yerba mate 500g", 10_000).await?;
        let owner = session_owner();

        ctx.add_to_cart(owner, variant.uuid, 1).await?;
        ctx.deactivate_variant(&variant).await?;

        let priced = ctx.carts.price_cart(owner, Timestamp::now()).await?;

        assert!(
            priced.lines.is_empty(),
            "inactive variant lines must be excluded from the read"
        );

        Ok(())
    }

    #[tokio::test]
    async fn product_discount_applies_to_matching_line() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant("Yerba mate 500g", 10_000).await?;
        let owner = session_owner();

        ctx.create_product_discount(variant.uuid, 15).await?;

        let priced = ctx.add_to_cart(owner, variant.uuid, 2).await?;
        let line = &priced.lines[0];

        assert_eq!(line.discount_kind, DiscountKind::Product);
        assert_eq!(line.discount_amount, 3_000);
        assert_eq!(priced.summary.total, 17_000);

        Ok(())
    }

    #[tokio::test]
    async fn amount_tier_applies_over_eligible_subtotal() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant("Yerba mate 500g", 10_000).await?;
        let owner = session_owner();

        ctx.create_amount_tier(0, 100_000, 10).await?;

        let priced = ctx.add_to_cart(owner, variant.uuid, 2).await?;
        let line = &priced.lines[0];

        assert_eq!(line.discount_kind, DiscountKind::Amount);
        assert_eq!(priced.summary.subtotal, 20_000);
        assert_eq!(priced.summary.discount_amount, 2_000);
        assert_eq!(priced.summary.total, 18_000);

        Ok(())
    }

    #[tokio::test]
    async fn blocked_variant_never_receives_amount_tier() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_blocked_variant("Promo pack", 10_000).await?;
        let owner = session_owner();

        ctx.create_amount_tier(0, 100_000, 10).await?;

        let priced = ctx.add_to_cart(owner, variant.uuid, 2).await?;
        let line = &priced.lines[0];

        assert_eq!(line.discount_kind, DiscountKind::None);
        assert_eq!(priced.summary.discount_amount, 0);
        assert_eq!(priced.summary.total, 20_000);

        Ok(())
    }

    // a product-discounted line is excluded from the tier base, so a tier
    // that only matches the smaller base is chosen
    #[tokio::test]
    async fn tier_lookup_uses_post_product_discount_base() -> TestResult {
        let ctx = TestContext::new().await;
        let discounted = ctx.create_variant("Yerba mate 500g", 80_000).await?;
        let plain = ctx.create_variant("Cocido 250g", 10_000).await?;
        let owner = session_owner();

        ctx.create_product_discount(discounted.uuid, 15).await?;
        // only matches the 10 000 base, not the raw 90 000 cart subtotal
        ctx.create_amount_tier(0, 20_000, 10).await?;

        ctx.add_to_cart(owner, discounted.uuid, 1).await?;
        ctx.add_to_cart(owner, plain.uuid, 1).await?;

        let priced = ctx.carts.price_cart(owner, Timestamp::now()).await?;

        let plain_line = priced
            .lines
            .iter()
            .find(|line| line.raw.variant_uuid == plain.uuid.into_uuid())
            .expect("plain line missing");

        assert_eq!(
            plain_line.discount_kind,
            DiscountKind::Amount,
            "tier must match the eligible base, not the raw subtotal"
        );

        Ok(())
    }

    #[tokio::test]
    async fn pricing_is_idempotent_across_reads() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant("Yerba mate 500g", 10_000).await?;
        let owner = session_owner();

        ctx.create_amount_tier(0, 100_000, 10).await?;
        ctx.add_to_cart(owner, variant.uuid, 2).await?;

        let at = Timestamp::now();

        let first = ctx.carts.price_cart(owner, at).await?;
        let second = ctx.carts.price_cart(owner, at).await?;

        assert_eq!(first.summary, second.summary);

        Ok(())
    }

    #[tokio::test]
    async fn carts_are_isolated_per_owner() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant("Yerba mate 500g", 10_000).await?;

        let owner_a = session_owner();
        let owner_b = session_owner();

        ctx.add_to_cart(owner_a, variant.uuid, 1).await?;

        let priced_b = ctx.carts.price_cart(owner_b, Timestamp::now()).await?;

        assert!(
            priced_b.lines.is_empty(),
            "one session's items must not leak into another's cart"
        );

        Ok(())
    }

    #[tokio::test]
    async fn set_quantity_updates_line() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant("Yerba mate 500g", 10_000).await?;
        let owner = session_owner();

        let priced = ctx.add_to_cart(owner, variant.uuid, 1).await?;
        let item = priced.lines[0].raw.item_uuid;

        let updated = ctx
            .carts
            .set_quantity(owner, CartItemUuid::from_uuid(item), 5)
            .await?;

        assert_eq!(updated.quantity, 5);

        Ok(())
    }

    #[tokio::test]
    async fn set_quantity_zero_returns_invalid_data() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .set_quantity(session_owner(), CartItemUuid::new(), 0)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn remove_item_from_other_owner_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant("Yerba mate 500g", 10_000).await?;

        let owner_a = session_owner();
        let owner_b = session_owner();

        let priced = ctx.add_to_cart(owner_a, variant.uuid, 1).await?;
        let item = priced.lines[0].raw.item_uuid;

        // owner B has a cart of their own, but not this item
        ctx.carts.price_cart(owner_b, Timestamp::now()).await?;

        let result = ctx
            .carts
            .remove_item(owner_b, CartItemUuid::from_uuid(item))
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_the_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = ctx.create_variant("Yerba mate 500g", 10_000).await?;
        let owner = session_owner();

        ctx.add_to_cart(owner, variant.uuid, 3).await?;
        ctx.carts.clear(owner).await?;

        let priced = ctx.carts.price_cart(owner, Timestamp::now()).await?;

        assert!(priced.lines.is_empty());
        assert_eq!(priced.summary.total, 0);

        Ok(())
    }
}
