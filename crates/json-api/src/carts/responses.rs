//! Cart wire payloads.
//!
//! Field names follow the storefront's existing JSON contract, hence the
//! Spanish camelCase on the wire.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazar::{
    fmt::percent_number,
    lines::{DiscountKind, PricedLine},
};
use bazar_app::domain::carts::models::PricedCart;

/// Full cart payload: the cart with its priced lines plus the summary.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartPayload {
    pub carrito: CarritoResponse,
    pub resumen: ResumenResponse,
}

/// The cart and its priced lines.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CarritoResponse {
    /// The unique identifier of the cart
    pub id: Uuid,

    /// The priced lines in the cart
    pub items: Vec<ItemResponse>,
}

/// Cart-level totals.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResumenResponse {
    /// Sum of line subtotals
    pub sub_total: u64,

    /// Sum of line discount amounts
    pub importe_descuento: u64,

    /// Sum of line totals, floored at zero
    pub total: u64,

    /// Number of lines in the cart
    pub cantidad_items: usize,
}

/// One priced cart line in the storefront card shape.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemResponse {
    /// Cart item identifier
    pub id: Uuid,

    /// Cart item identifier (storefront alias of `id`)
    pub item_carrito_id: Uuid,

    /// Variant the line refers to
    pub variante_id: Uuid,

    /// Parent product of the variant
    pub producto_id: Uuid,

    /// Variant display name
    pub nombre: String,

    /// Variant URL slug
    pub slug: String,

    /// Variant image URL
    pub imagen: String,

    /// Current unit price in guaraníes
    pub precio: u64,

    /// Stored quantity
    pub cantidad: u32,

    /// `precio × cantidad`
    pub subtotal: u64,

    /// `subtotal - importeDescuento`
    pub total: u64,

    /// Applied discount percentage as a human number (15 = 15%)
    pub descuento: f64,

    /// Variant flag: excluded from amount-tier discounts when set
    pub bloqueo_descuento: bool,

    /// Amount taken off the subtotal
    pub importe_descuento: u64,

    /// Human-readable description of the applied discount
    pub descripcion: String,

    /// Which discount stage claimed the line: "PRODUCTO", "IMPORTE" or ""
    pub tipo_descuento: String,

    /// Current variant stock
    pub stock: i64,
}

impl From<PricedCart> for CartPayload {
    fn from(priced: PricedCart) -> Self {
        Self {
            resumen: ResumenResponse {
                sub_total: priced.summary.subtotal,
                importe_descuento: priced.summary.discount_amount,
                total: priced.summary.total,
                cantidad_items: priced.summary.line_count,
            },
            carrito: CarritoResponse {
                id: priced.cart_uuid.into_uuid(),
                items: priced.lines.into_iter().map(ItemResponse::from).collect(),
            },
        }
    }
}

impl From<PricedLine> for ItemResponse {
    fn from(line: PricedLine) -> Self {
        Self {
            id: line.raw.item_uuid,
            item_carrito_id: line.raw.item_uuid,
            variante_id: line.raw.variant_uuid,
            producto_id: line.raw.product_uuid,
            nombre: line.raw.name,
            slug: line.raw.slug,
            imagen: line.raw.image_url,
            precio: line.raw.unit_price,
            cantidad: line.raw.quantity,
            subtotal: line.subtotal,
            total: line.total,
            descuento: line.discount_percent.map_or(0.0, percent_number),
            bloqueo_descuento: line.raw.discount_blocked,
            importe_descuento: line.discount_amount,
            descripcion: line.description.unwrap_or_default(),
            tipo_descuento: discount_kind_label(line.discount_kind).to_string(),
            stock: line.raw.stock,
        }
    }
}

pub(crate) fn discount_kind_label(kind: DiscountKind) -> &'static str {
    match kind {
        DiscountKind::Product => "PRODUCTO",
        DiscountKind::Amount => "IMPORTE",
        DiscountKind::None => "",
    }
}
