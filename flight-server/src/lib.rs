//! Flight route planner server.
//!
//! A web application that answers: "How do I fly from here to there,
//! through these stops, with the passports and visas I hold?"

pub mod config;
pub mod domain;
pub mod planner;
pub mod store;
pub mod web;
