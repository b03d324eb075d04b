mod models;
mod products;

pub use models::cmd_list_models;
pub use products::cmd_list_products;
