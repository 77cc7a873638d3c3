// src/lib.rs

//! Roster admin client library
//!
//! Headless controllers for a student and department administration
//! front-end, driven by a REST backend.

pub mod controllers;
pub mod error;
pub mod models;
pub mod query;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;
