//! # Bar Finder Telegram Bot
//!
//! A Telegram bot that finds bars and clubs near a user, or near the
//! average location of every registered user, using a places-search API
//! with a geocoding fallback for venues that come without coordinates.

pub mod app;
pub mod bot;
pub mod circuit_breaker;
pub mod config;
pub mod db;
pub mod errors;
pub mod geo;
pub mod geocoding;
pub mod group;
pub mod identity;
pub mod localization;
pub mod normalizer;
pub mod places;
pub mod store;
