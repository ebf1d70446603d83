//! Business logic and workflow services

pub mod services;
