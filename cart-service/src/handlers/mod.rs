pub mod carts;
pub mod health;

pub use carts::{
    create_cart_item, delete_cart_item, get_cart_item, list_cart_items, update_cart_item,
};
pub use health::{health_check, home, metrics_endpoint};
