//! HTTP request handlers.

mod demo;
mod health;

pub use demo::{demo_routes, EchoRequest, FriendlyGreeter, Greeter, Item, ItemCatalog};
pub use health::{health, root};
