pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod debounce;
pub mod error;
pub mod http;
pub mod normalize;
pub mod session;
pub mod types;

pub use cart::CartReconciler;
pub use checkout::{CheckoutRequest, OrderConfirmation, PickupLocation};
pub use debounce::{Debouncer, Generation};
pub use error::StoreError;
pub use http::StoreClient;
pub use session::{Access, MemoryTokenStore, SessionGate, TokenStore};
