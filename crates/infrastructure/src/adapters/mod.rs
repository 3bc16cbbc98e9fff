//! Adapters implementing application-layer ports.

mod reqwest_client;

pub use reqwest_client::ReqwestHttpClient;
