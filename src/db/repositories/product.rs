use crate::domain::ProductId;
use crate::entities::{prelude::*, products};
use crate::models::{NewProduct, Product, ProductFilter, ProductPatch};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{debug, info};

use super::{decode_metadata, encode_metadata, format_timestamp, parse_timestamp};

const MAX_UPDATE_ATTEMPTS: usize = 16;

/// Repository for product documents.
pub struct ProductRepository {
    conn: DatabaseConnection,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_model(model: products::Model) -> Result<Product> {
        Ok(Product {
            id: ProductId::parse(&model.id)?,
            name: model.name,
            description: model.description,
            category: model.category,
            price: model.price,
            marketplace: model.marketplace,
            product_id: model.external_id,
            url: model.url,
            metadata: decode_metadata(model.metadata.as_deref())?,
            created_at: parse_timestamp(&model.created_at)?,
            updated_at: parse_timestamp(&model.updated_at)?,
        })
    }

    fn active_model(product: &Product) -> Result<products::ActiveModel> {
        Ok(products::ActiveModel {
            id: Set(product.id.to_string()),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            category: Set(product.category.clone()),
            price: Set(product.price),
            marketplace: Set(product.marketplace.clone()),
            external_id: Set(product.product_id.clone()),
            url: Set(product.url.clone()),
            metadata: Set(encode_metadata(product.metadata.as_ref())?),
            created_at: Set(format_timestamp(&product.created_at)),
            updated_at: Set(format_timestamp(&product.updated_at)),
        })
    }

    /// Active model holding only the supplied fields; everything else stays `NotSet`.
    fn patch_model(patch: ProductPatch) -> Result<products::ActiveModel> {
        let mut model = products::ActiveModel::default();

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(marketplace) = patch.marketplace {
            model.marketplace = Set(marketplace);
        }
        if let Some(description) = patch.description {
            model.description = Set(description);
        }
        if let Some(category) = patch.category {
            model.category = Set(category);
        }
        if let Some(price) = patch.price {
            model.price = Set(price);
        }
        if let Some(product_id) = patch.product_id {
            model.external_id = Set(product_id);
        }
        if let Some(url) = patch.url {
            model.url = Set(url);
        }
        if let Some(metadata) = patch.metadata {
            model.metadata = Set(encode_metadata(metadata.as_ref())?);
        }

        Ok(model)
    }

    /// Store resolution is microseconds; truncate so returned values equal stored ones.
    fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }

    /// Next `updated_at`, strictly after the previous one even if the clock has not moved.
    fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
        let floor = previous + Duration::microseconds(1);
        Self::now().max(floor)
    }

    // ========================================================================
    // Product Operations
    // ========================================================================

    pub async fn create(&self, new: NewProduct) -> Result<Product> {
        let now = Self::now();
        let product = Product {
            id: ProductId::generate(),
            name: new.name,
            description: new.description,
            category: new.category,
            price: new.price,
            marketplace: new.marketplace,
            product_id: new.product_id,
            url: new.url,
            metadata: new.metadata,
            created_at: now,
            updated_at: now,
        };

        Products::insert(Self::active_model(&product)?)
            .exec(&self.conn)
            .await?;
        info!("Created product {} ({})", product.id, product.name);

        self.get(product.id)
            .await?
            .ok_or_else(|| anyhow!("Product {} missing right after insert", product.id))
    }

    pub async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        Products::find_by_id(id.to_string())
            .one(&self.conn)
            .await?
            .map(Self::map_model)
            .transpose()
    }

    /// Lists products in insertion order.
    pub async fn list(&self, skip: u64, limit: u64, filter: &ProductFilter) -> Result<Vec<Product>> {
        let mut query = Products::find();

        if let Some(marketplace) = &filter.marketplace {
            query = query.filter(products::Column::Marketplace.eq(marketplace.as_str()));
        }
        if let Some(category) = &filter.category {
            query = query.filter(products::Column::Category.eq(category.as_str()));
        }

        let rows = query
            .order_by_asc(products::Column::CreatedAt)
            .order_by_asc(Expr::cust("rowid"))
            .offset(skip)
            .limit(limit)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(Self::map_model).collect()
    }

    /// Writes only the fields the patch supplies, plus `updated_at`.
    ///
    /// The write is conditional on the `updated_at` that was read, so a
    /// concurrent update makes this attempt miss and retry against the fresh
    /// row. Returns `None` when no product matched.
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        let mut changes = Self::patch_model(patch)?;

        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let Some(current) = Products::find_by_id(id.to_string()).one(&self.conn).await? else {
                return Ok(None);
            };

            let next = Self::next_update_time(parse_timestamp(&current.updated_at)?);
            changes.updated_at = Set(format_timestamp(&next));

            let result = Products::update_many()
                .set(changes.clone())
                .filter(products::Column::Id.eq(id.to_string()))
                .filter(products::Column::UpdatedAt.eq(current.updated_at))
                .exec(&self.conn)
                .await?;

            if result.rows_affected > 0 {
                return self.get(id).await;
            }
            debug!("Product {} changed during update, retrying", id);
        }

        Err(anyhow!(
            "Product {id} kept changing; update abandoned after {MAX_UPDATE_ATTEMPTS} attempts"
        ))
    }

    pub async fn delete(&self, id: ProductId) -> Result<bool> {
        let result = Products::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await?;

        if result.rows_affected > 0 {
            info!("Deleted product {}", id);
        }
        Ok(result.rows_affected > 0)
    }
}
