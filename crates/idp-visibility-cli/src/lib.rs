// crates/idp-visibility-cli/src/lib.rs
// ============================================================================
// Module: IdP Visibility CLI Library
// Description: Shared helpers for the IdP visibility command-line interface.
// Purpose: Provide the message catalog for the CLI binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library module houses the CLI message catalog. The binary entry point
//! (`src/main.rs`) routes every user-facing string through it to keep output
//! consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog and formatting helpers.
pub mod i18n;
