//! Backend adapters: the relational pool and the Data API client.

pub mod data_api;
pub mod pool;

pub use data_api::{DataApiClient, Filter, Order, QueryOptions};
