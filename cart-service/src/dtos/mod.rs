use crate::models::CartItem;
use serde::Serialize;

pub use service_core::error::MessageResponse;

/// `{message, data}` body returned by create and update.
#[derive(Debug, Serialize)]
pub struct CartItemEnvelope {
    pub message: &'static str,
    pub data: CartItem,
}

impl CartItemEnvelope {
    pub fn new(message: &'static str, data: CartItem) -> Self {
        Self { message, data }
    }
}
