//! Discount wire payloads.
//!
//! The wire keeps the storefront's discount vocabulary: `tipo` is either
//! `PRODUCTO` (per-variant percentage) or `IMPORTE` (amount tier), `valor` is
//! the human percentage, `cantDesde`/`cantHasta` bound the tier.

use jiff::civil::Date;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazar_app::domain::discounts::models::{
    Discount, DiscountKind, DiscountUpdate, DiscountUuid, NewDiscount, Validity,
};

/// Create Discount Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateDiscountRequest {
    /// Discount kind: "PRODUCTO" or "IMPORTE"
    pub tipo: String,

    /// Target variant, required for "PRODUCTO"
    pub variante_id: Option<Uuid>,

    /// Percentage as a human number (15 = 15%)
    pub valor: f64,

    /// Inclusive lower bound of the tier, required for "IMPORTE"
    pub cant_desde: Option<u64>,

    /// Inclusive upper bound of the tier, required for "IMPORTE"
    pub cant_hasta: Option<u64>,

    /// First day the discount is current (YYYY-MM-DD)
    pub fecha_desde: String,

    /// Last day the discount is current (YYYY-MM-DD)
    pub fecha_hasta: String,

    /// Whether the discount is switched on
    #[serde(default = "default_active")]
    pub activo: bool,
}

const fn default_active() -> bool {
    true
}

impl CreateDiscountRequest {
    pub(crate) fn into_new_discount(self) -> Result<NewDiscount, StatusError> {
        let uuid = DiscountUuid::new();
        let percent = parse_percent(self.valor)?;

        let validity = Validity {
            from: parse_date(&self.fecha_desde)?,
            to: parse_date(&self.fecha_hasta)?,
            active: self.activo,
        };

        match self.tipo.as_str() {
            "PRODUCTO" => {
                let variant = self
                    .variante_id
                    .ok_or_else(|| bad_request("varianteId is required for PRODUCTO discounts"))?;

                Ok(NewDiscount::Product {
                    uuid,
                    variant_uuid: variant.into(),
                    percent,
                    validity,
                })
            }
            "IMPORTE" => {
                let (amount_from, amount_to) = self
                    .cant_desde
                    .zip(self.cant_hasta)
                    .ok_or_else(|| {
                        bad_request("cantDesde and cantHasta are required for IMPORTE discounts")
                    })?;

                Ok(NewDiscount::Amount {
                    uuid,
                    amount_from,
                    amount_to,
                    percent,
                    validity,
                })
            }
            _ => Err(bad_request("tipo must be PRODUCTO or IMPORTE")),
        }
    }
}

/// Update Discount Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateDiscountRequest {
    /// Percentage as a human number (15 = 15%)
    pub valor: f64,

    /// Inclusive lower bound of the tier (IMPORTE only)
    pub cant_desde: Option<u64>,

    /// Inclusive upper bound of the tier (IMPORTE only)
    pub cant_hasta: Option<u64>,

    /// First day the discount is current (YYYY-MM-DD)
    pub fecha_desde: String,

    /// Last day the discount is current (YYYY-MM-DD)
    pub fecha_hasta: String,

    /// Whether the discount is switched on
    pub activo: bool,
}

impl UpdateDiscountRequest {
    pub(crate) fn into_update(self) -> Result<DiscountUpdate, StatusError> {
        Ok(DiscountUpdate {
            percent: parse_percent(self.valor)?,
            amount_from: self.cant_desde,
            amount_to: self.cant_hasta,
            validity: Validity {
                from: parse_date(&self.fecha_desde)?,
                to: parse_date(&self.fecha_hasta)?,
                active: self.activo,
            },
        })
    }
}

/// Discount Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DescuentoResponse {
    /// The unique identifier of the discount
    pub id: Uuid,

    /// Discount kind: "PRODUCTO" or "IMPORTE"
    pub tipo: String,

    /// Target variant for "PRODUCTO" discounts
    pub variante_id: Option<Uuid>,

    /// Percentage as a human number
    pub valor: f64,

    /// Inclusive lower bound of the tier
    pub cant_desde: Option<u64>,

    /// Inclusive upper bound of the tier
    pub cant_hasta: Option<u64>,

    /// First day the discount is current
    pub fecha_desde: String,

    /// Last day the discount is current
    pub fecha_hasta: String,

    /// Whether the discount is switched on
    pub activo: bool,
}

impl From<Discount> for DescuentoResponse {
    fn from(discount: Discount) -> Self {
        Self {
            id: discount.uuid.into_uuid(),
            tipo: match discount.kind {
                DiscountKind::Product => "PRODUCTO".to_string(),
                DiscountKind::Amount => "IMPORTE".to_string(),
            },
            variante_id: discount.variant_uuid.map(Into::into),
            valor: discount.percent.to_f64().unwrap_or(0.0),
            cant_desde: discount.amount_from,
            cant_hasta: discount.amount_to,
            fecha_desde: discount.valid_from.to_string(),
            fecha_hasta: discount.valid_to.to_string(),
            activo: discount.active,
        }
    }
}

fn parse_percent(valor: f64) -> Result<Decimal, StatusError> {
    Decimal::from_f64(valor).ok_or_else(|| bad_request("valor must be a finite number"))
}

fn parse_date(value: &str) -> Result<Date, StatusError> {
    value
        .parse()
        .map_err(|_error| bad_request("dates must be YYYY-MM-DD"))
}

fn bad_request(brief: &str) -> StatusError {
    StatusError::bad_request().brief(brief.to_string())
}
