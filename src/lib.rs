//! Client-side core of the GloBus storefront: cart reconciliation over a
//! server record and a local cache, checkout with an external payment
//! gateway redirect, pure pricing, and thin catalog / order-history clients.
//!
//! Rendering, routing, and storage live in the host shell, which supplies
//! the capability seams: [`api::StorefrontApi`] (HTTP),
//! [`storage::CacheStore`] (key-value persistence),
//! [`auth::SessionProvider`] (ambient session), and
//! [`navigation::Navigator`] (full-page navigation).

pub mod api;
pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod events;
pub mod models;
pub mod navigation;
pub mod pricing;
pub mod services;
pub mod storage;

pub use error::{AppError, AppResult};
