//! Thin reqwest wrapper shared by the Graph and Bot Framework clients

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
