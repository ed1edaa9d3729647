//! Product wire payloads.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazar_app::domain::products::models::{Product, Variant};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductoResponse {
    /// The unique identifier of the product
    pub id: Uuid,

    /// Product display name
    pub nombre: String,

    /// Product URL slug
    pub slug: String,

    /// Whether the product is visible in the storefront
    pub activo: bool,
}

impl From<Product> for ProductoResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.uuid.into_uuid(),
            nombre: product.name,
            slug: product.slug,
            activo: product.active,
        }
    }
}

/// Variant Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VarianteResponse {
    /// The unique identifier of the variant
    pub id: Uuid,

    /// Parent product
    pub producto_id: Uuid,

    /// Variant display name
    pub nombre: String,

    /// Variant URL slug
    pub slug: String,

    /// Variant image URL
    pub imagen_url: String,

    /// Unit price in guaraníes
    pub precio: u64,

    /// Units in stock
    pub stock: i64,

    /// Excluded from amount-tier discounts when set
    pub bloqueo_descuento: bool,

    /// Whether the variant is purchasable
    pub activo: bool,
}

impl From<Variant> for VarianteResponse {
    fn from(variant: Variant) -> Self {
        Self {
            id: variant.uuid.into_uuid(),
            producto_id: variant.product_uuid.into_uuid(),
            nombre: variant.name,
            slug: variant.slug,
            imagen_url: variant.image_url,
            precio: variant.price,
            stock: variant.stock,
            bloqueo_descuento: variant.discount_blocked,
            activo: variant.active,
        }
    }
}

/// Product with its variants, as returned by the detail endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductoDetalleResponse {
    /// The product
    #[serde(flatten)]
    pub producto: ProductoResponse,

    /// The product's variants
    pub variantes: Vec<VarianteResponse>,
}
