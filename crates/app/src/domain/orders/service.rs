//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        carts::{
            models::CartOwner,
            repositories::{PgCartItemsRepository, PgCartsRepository},
            service::reprice_cart,
        },
        discounts::repository::PgDiscountsRepository,
        orders::{
            errors::OrdersServiceError,
            models::{NewOrder, Order, OrderStatus, OrderUuid},
            repository::PgOrdersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    discounts_repository: PgDiscountsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            discounts_repository: PgDiscountsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, order),
        fields(order_uuid = %order.uuid),
        err
    )]
    async fn place_order(
        &self,
        owner: CartOwner,
        order: NewOrder,
        point_in_time: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        if order.customer.name.is_empty() || order.customer.email.is_empty() {
            return Err(OrdersServiceError::MissingRequiredData);
        }

        if order.payment_method.is_empty() {
            return Err(OrdersServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .get_cart(&mut tx, owner)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        let priced = reprice_cart(
            &mut tx,
            &self.items_repository,
            &self.discounts_repository,
            cart.uuid,
            point_in_time,
        )
        .await?;

        if priced.lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        // Lock every variant row before any decrement so concurrent
        // checkouts of the same variants serialise rather than oversell.
        for line in &priced.lines {
            let stock = self
                .orders_repository
                .lock_variant_stock(&mut tx, line.raw.variant_uuid)
                .await?
                .ok_or(OrdersServiceError::InvalidReference)?;

            if stock < i64::from(line.raw.quantity) {
                return Err(OrdersServiceError::InsufficientStock);
            }
        }

        for line in &priced.lines {
            self.orders_repository
                .decrement_stock(&mut tx, line.raw.variant_uuid, line.raw.quantity)
                .await?;
        }

        let total = priced
            .summary
            .total
            .checked_add(order.shipping_cost)
            .ok_or(OrdersServiceError::InvalidData)?;

        let number = order_number(order.uuid);
        let user_uuid = cart.user_uuid;

        let mut created = self
            .orders_repository
            .create_order(
                &mut tx,
                &order,
                &number,
                user_uuid,
                priced.summary.subtotal,
                priced.summary.discount_amount,
                total,
            )
            .await?;

        for line in &priced.lines {
            let item = self
                .orders_repository
                .create_order_item(&mut tx, created.uuid, line)
                .await?;

            created.items.push(item);
        }

        self.items_repository.clear_items(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        info!(order_uuid = %created.uuid, number = %created.number, "placed order");

        Ok(created)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut found = self.orders_repository.get_order(&mut tx, order).await?;
        let items = self.orders_repository.get_order_items(&mut tx, order).await?;

        tx.commit().await?;

        found.items = items;

        Ok(found)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self
            .orders_repository
            .get_order_for_update(&mut tx, order)
            .await?;

        if !current.status.can_transition_to(status) {
            return Err(OrdersServiceError::InvalidTransition);
        }

        let updated = self
            .orders_repository
            .update_status(&mut tx, order, status)
            .await?;

        tx.commit().await?;

        info!(order_uuid = %order, "order status updated");

        Ok(updated)
    }
}

/// Human-facing order number derived from the order UUID.
fn order_number(order: OrderUuid) -> String {
    let digits = order.into_uuid().as_u128() % 100_000_000;

    format!("ORD-{digits:08}")
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the owner's priced cart into an order: decrement stock under row
    /// locks, snapshot the lines, empty the cart. All or nothing.
    async fn place_order(
        &self,
        owner: CartOwner,
        order: NewOrder,
        point_in_time: Timestamp,
    ) -> Result<Order, OrdersServiceError>;

    /// Retrieve an order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Move an order to a new status; illegal transitions are rejected.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;
}
