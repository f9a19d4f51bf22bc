/// GCP Compute Engine 访问层

pub mod client;
pub mod types;

pub use client::ComputeClient;
