//! Core application modules
//!
//! This module contains configuration, constants, errors, logging, model
//! selection and the provider layer.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod model_manager;
pub mod provider;
pub mod providers;
