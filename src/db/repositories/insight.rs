use crate::entities::{insights, prelude::*};
use crate::models::{Insight, NewInsight};
use anyhow::{Context, Result};
use chrono::SubsecRound;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;
use uuid::Uuid;

use super::{decode_metadata, encode_metadata, format_timestamp, parse_timestamp};

/// Upper bound on insights returned for a single product.
pub const MAX_INSIGHTS_PER_PRODUCT: u64 = 100;

/// Append-only repository for generated insights.
pub struct InsightRepository {
    conn: DatabaseConnection,
}

impl InsightRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: insights::Model) -> Result<Insight> {
        Ok(Insight {
            id: Uuid::parse_str(&model.id)
                .with_context(|| format!("Corrupt insight id in store: {}", model.id))?,
            product_id: model.product_id,
            insight_type: model.insight_type,
            insight_content: model.insight_content,
            metadata: decode_metadata(model.metadata.as_deref())?,
            generated_at: parse_timestamp(&model.generated_at)?,
        })
    }

    pub async fn save(&self, new: NewInsight) -> Result<Insight> {
        let insight = Insight {
            id: Uuid::new_v4(),
            product_id: new.product_id,
            insight_type: new.insight_type,
            insight_content: new.insight_content,
            metadata: new.metadata,
            generated_at: new.generated_at.trunc_subsecs(6),
        };

        let active_model = insights::ActiveModel {
            id: Set(insight.id.to_string()),
            product_id: Set(insight.product_id.clone()),
            insight_type: Set(insight.insight_type.clone()),
            insight_content: Set(insight.insight_content.clone()),
            metadata: Set(encode_metadata(insight.metadata.as_ref())?),
            generated_at: Set(format_timestamp(&insight.generated_at)),
        };

        Insights::insert(active_model).exec(&self.conn).await?;
        info!(
            "Stored {} insight {} for product {}",
            insight.insight_type, insight.id, insight.product_id
        );
        Ok(insight)
    }

    /// Newest first, capped at [`MAX_INSIGHTS_PER_PRODUCT`].
    pub async fn list_by_product(&self, product_id: &str) -> Result<Vec<Insight>> {
        let rows = Insights::find()
            .filter(insights::Column::ProductId.eq(product_id))
            .order_by_desc(insights::Column::GeneratedAt)
            .order_by_desc(Expr::cust("rowid"))
            .limit(MAX_INSIGHTS_PER_PRODUCT)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(Self::map_model).collect()
    }
}
