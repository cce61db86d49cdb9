//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete
//! and other non-command interactions.

/// Autocomplete handlers for client names and service labels
pub mod autocomplete;
