pub mod cart_item;

pub use cart_item::{parse_id, CartItem, CartItemPatch, NewCartItem};
