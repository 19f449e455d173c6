//! Core business logic - framework-agnostic workflow operations.
//!
//! Each submodule owns one workflow from the platform: purchase request
//! lifecycle, delivery & dispute handling, BOQ takeoff verification, and
//! investor capital management. Everything here takes a database connection
//! and returns `Result`; nothing in this layer knows about HTTP.

pub mod availability;
pub mod capital;
pub mod delivery;
pub mod purchase_request;
pub mod takeoff;
