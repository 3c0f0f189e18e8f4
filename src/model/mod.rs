//! Entities held by the store, and the specs and patches used to create and
//! edit them.

pub mod admin;
pub mod auth;
pub mod common;
pub mod election;
pub mod results;
pub mod vote;
pub mod voter;
