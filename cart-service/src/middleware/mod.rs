pub mod cart_item_id;

pub use cart_item_id::CartItemId;
