pub mod insights;
pub mod products;

pub mod prelude {
    pub use super::insights::Entity as Insights;
    pub use super::products::Entity as Products;
}
