//! Products service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        models::{
            NewProduct, NewVariant, Product, ProductUpdate, ProductUuid, Variant, VariantUpdate,
            VariantUuid,
        },
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx, point_in_time).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self
            .repository
            .get_product(&mut tx, product, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(product)
    }

    #[tracing::instrument(name = "products.service.create_product", skip(self, product), err)]
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_variants(
        &self,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<Variant>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let variants = self
            .repository
            .list_variants(&mut tx, product, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(variants)
    }

    async fn get_variant(
        &self,
        variant: VariantUuid,
        point_in_time: Timestamp,
    ) -> Result<Variant, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let variant = self
            .repository
            .get_variant(&mut tx, variant, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(variant)
    }

    #[tracing::instrument(name = "products.service.create_variant", skip(self, variant), err)]
    async fn create_variant(&self, variant: NewVariant) -> Result<Variant, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_variant(&mut tx, variant).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_variant(
        &self,
        variant: VariantUuid,
        update: VariantUpdate,
    ) -> Result<Variant, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_variant(&mut tx, variant, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_variant(&self, variant: VariantUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_variant(&mut tx, variant).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products.
    async fn list_products(
        &self,
        point_in_time: Timestamp,
    ) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(
        &self,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<Product, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Updates a product with the given UUID and update.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Soft-deletes a product with the given UUID.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;

    /// Retrieves a product's variants.
    async fn list_variants(
        &self,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<Variant>, ProductsServiceError>;

    /// Retrieve a single variant.
    async fn get_variant(
        &self,
        variant: VariantUuid,
        point_in_time: Timestamp,
    ) -> Result<Variant, ProductsServiceError>;

    /// Creates a new variant under an existing product.
    async fn create_variant(&self, variant: NewVariant) -> Result<Variant, ProductsServiceError>;

    /// Updates a variant with the given UUID and update.
    async fn update_variant(
        &self,
        variant: VariantUuid,
        update: VariantUpdate,
    ) -> Result<Variant, ProductsServiceError>;

    /// Soft-deletes a variant with the given UUID.
    async fn delete_variant(&self, variant: VariantUuid) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn create_product_returns_correct_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        let product = ctx
            .products
            .create_product(NewProduct {
                uuid,
                name: "Yerba mate".to_string(),
                slug: "yerba-mate".to_string(),
            })
            .await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.name, "Yerba mate");
        assert!(product.active, "new products start active");
        assert!(product.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .get_product(ProductUuid::new(), Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(NewProduct {
                uuid,
                name: "Yerba mate".to_string(),
                slug: "yerba-mate".to_string(),
            })
            .await?;

        let result = ctx
            .products
            .create_product(NewProduct {
                uuid,
                name: "Yerba mate".to_string(),
                slug: "yerba-mate-2".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn deleted_product_not_returned_in_list() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(NewProduct {
                uuid,
                name: "Cocido".to_string(),
                slug: "cocido".to_string(),
            })
            .await?;

        ctx.products.delete_product(uuid).await?;

        let products = ctx.products.list_products(Timestamp::now()).await?;

        assert!(
            !products.iter().any(|p| p.uuid == uuid),
            "deleted product should not appear in list"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_variant_returns_correct_fields() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product("Yerba mate", "yerba-mate").await?;
        let uuid = VariantUuid::new();

        let variant = ctx
            .products
            .create_variant(NewVariant {
                uuid,
                product_uuid: product.uuid,
                name: "Yerba mate 500g".to_string(),
                slug: "yerba-mate-500g".to_string(),
                image_url: String::new(),
                price: 25_000,
                stock: 40,
                discount_blocked: false,
            })
            .await?;

        assert_eq!(variant.uuid, uuid);
        assert_eq!(variant.product_uuid, product.uuid);
        assert_eq!(variant.price, 25_000);
        assert_eq!(variant.stock, 40);
        assert!(variant.active, "new variants start active");
        assert!(!variant.discount_blocked);

        Ok(())
    }

    #[tokio::test]
    async fn create_variant_unknown_product_returns_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .products
            .create_variant(NewVariant {
                uuid: VariantUuid::new(),
                product_uuid: ProductUuid::new(),
                name: "Orphan".to_string(),
                slug: "orphan".to_string(),
                image_url: String::new(),
                price: 1_000,
                stock: 0,
                discount_blocked: false,
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_variant_reflects_new_price_and_flags() -> TestResult {
        let ctx = TestContext::new().await;

        let variant = ctx.create_variant("Cocido 250g", 8_000).await?;

        let updated = ctx
            .products
            .update_variant(
                variant.uuid,
                VariantUpdate {
                    name: variant.name.clone(),
                    slug: variant.slug.clone(),
                    image_url: variant.image_url.clone(),
                    price: 9_500,
                    stock: variant.stock,
                    discount_blocked: true,
                    active: false,
                },
            )
            .await?;

        assert_eq!(updated.price, 9_500);
        assert!(updated.discount_blocked);
        assert!(!updated.active);

        Ok(())
    }

    #[tokio::test]
    async fn delete_variant_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let variant = ctx.create_variant("Cocido 250g", 8_000).await?;

        ctx.products.delete_variant(variant.uuid).await?;

        let result = ctx
            .products
            .get_variant(variant.uuid, Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        Ok(())
    }
}
