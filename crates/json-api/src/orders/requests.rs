//! Order wire payloads.

use rust_decimal::prelude::ToPrimitive;
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazar_app::domain::orders::models::{
    Customer, NewOrder, Order, OrderItem, OrderStatus, OrderUuid,
};

/// Customer details for order placement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ClienteRequest {
    /// Customer full name
    pub nombre: String,

    /// Customer email address
    pub email: String,

    /// Customer phone number
    #[serde(default)]
    pub telefono: String,

    /// Delivery street address
    pub direccion: String,

    /// Delivery city
    #[serde(default)]
    pub ciudad: String,

    /// Free-form delivery notes
    #[serde(default)]
    pub notas: String,
}

impl From<ClienteRequest> for Customer {
    fn from(request: ClienteRequest) -> Self {
        Self {
            name: request.nombre,
            email: request.email,
            phone: request.telefono,
            address: request.direccion,
            city: request.ciudad,
            notes: request.notas,
        }
    }
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    /// Customer and delivery details
    pub cliente: ClienteRequest,

    /// Payment method label
    pub metodo_pago: String,

    /// Shipping cost in guaraníes
    #[serde(default)]
    pub costo_envio: u64,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        Self {
            uuid: OrderUuid::new(),
            customer: request.cliente.into(),
            payment_method: request.metodo_pago,
            shipping_cost: request.costo_envio,
        }
    }
}

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateStatusRequest {
    /// New status: pendiente, confirmado, enviado, entregado or cancelado
    pub estado: String,
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PedidoResponse {
    /// The unique identifier of the order
    pub id: Uuid,

    /// Human-facing order number
    pub numero_pedido: String,

    /// Order status in storefront vocabulary
    pub estado: String,

    /// Sum of line subtotals at placement time
    pub subtotal: u64,

    /// Sum of line discounts at placement time
    pub importe_descuento: u64,

    /// Shipping cost in guaraníes
    pub costo_envio: u64,

    /// Grand total including shipping
    pub total: u64,

    /// Payment method label
    pub metodo_pago: String,

    /// The snapshotted lines
    pub items: Vec<ItemPedidoResponse>,
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemPedidoResponse {
    /// The unique identifier of the order item
    pub id: Uuid,

    /// Product the snapshot refers to
    pub producto_id: Uuid,

    /// Variant the snapshot refers to
    pub variante_id: Uuid,

    /// Variant name at placement time
    pub nombre: String,

    /// Quantity ordered
    pub cantidad: u32,

    /// Unit price at placement time
    pub precio_unitario: u64,

    /// Applied discount percentage, if any
    pub descuento: Option<f64>,

    /// Discount amount at placement time
    pub importe_descuento: u64,

    /// Line subtotal at placement time
    pub subtotal: u64,

    /// Line total at placement time
    pub total: u64,
}

impl From<Order> for PedidoResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.uuid.into_uuid(),
            numero_pedido: order.number,
            estado: status_label(order.status).to_string(),
            subtotal: order.subtotal,
            importe_descuento: order.discount_amount,
            costo_envio: order.shipping_cost,
            total: order.total,
            metodo_pago: order.payment_method,
            items: order.items.into_iter().map(ItemPedidoResponse::from).collect(),
        }
    }
}

impl From<OrderItem> for ItemPedidoResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.uuid.into_uuid(),
            producto_id: item.product_uuid.into_uuid(),
            variante_id: item.variant_uuid.into_uuid(),
            nombre: item.name,
            cantidad: item.quantity,
            precio_unitario: item.unit_price,
            descuento: item.discount_percent.and_then(|percent| percent.to_f64()),
            importe_descuento: item.discount_amount,
            subtotal: item.subtotal,
            total: item.total,
        }
    }
}

pub(crate) fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pendiente",
        OrderStatus::Confirmed => "confirmado",
        OrderStatus::Shipped => "enviado",
        OrderStatus::Delivered => "entregado",
        OrderStatus::Cancelled => "cancelado",
    }
}

pub(crate) fn parse_status(estado: &str) -> Result<OrderStatus, StatusError> {
    match estado {
        "pendiente" => Ok(OrderStatus::Pending),
        "confirmado" => Ok(OrderStatus::Confirmed),
        "enviado" => Ok(OrderStatus::Shipped),
        "entregado" => Ok(OrderStatus::Delivered),
        "cancelado" => Ok(OrderStatus::Cancelled),
        _ => Err(StatusError::bad_request()
            .brief("estado must be pendiente, confirmado, enviado, entregado or cancelado")),
    }
}
