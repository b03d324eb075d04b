use sea_orm::entity::prelude::*;

/// `product_id` deliberately carries no foreign key: insights may outlive or
/// precede the product they reference.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "insights")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub product_id: String,
    pub insight_type: String,
    pub insight_content: String,
    pub metadata: Option<String>,
    pub generated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
