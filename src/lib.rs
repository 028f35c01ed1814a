//! # oci-translator - Translation over HTTP
//!
//! `oci-translator` is a small web service that forwards text to an OCI
//! Generative AI chat model and returns the translation.
//!
//! ## API
//!
//! ```text
//! POST /translate   {"text": "Hello world", "target_language": "es"}
//!               ->  {"translated_text": "Hola mundo", "target_language": "es"}
//! GET  /languages   supported language codes and names
//! GET  /health      liveness and the configured model id
//! ```
//!
//! Errors come back as `{"detail": {"message": ..., "target_language": ...}}`
//! with status 400 for bad input and 500 for upstream or internal failures.
//!
//! ## Configuration
//!
//! Read once at start-up from CLI flags, the environment (`OCI_MODEL_ID`,
//! `OCI_SERVICE_ENDPOINT`, `OCI_COMPARTMENT_ID`, optionally via `.env`) and
//! `~/.config/oci-translator/config.toml`:
//!
//! ```toml
//! [oci]
//! model_id = "cohere.command-r-plus"
//! service_endpoint = "https://inference.generativeai.us-chicago-1.oci.oraclecloud.com"
//! compartment_id = "ocid1.compartment.oc1..example"
//! timeout_secs = 60
//! # API-key signing; used when no bearer token is configured
//! config_file = "~/.oci/config"
//! profile = "DEFAULT"
//!
//! [server]
//! port = 8000
//! ```

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file loading and resolution.
pub mod config;

/// Tracing subscriber setup.
pub mod logging;

/// XDG-style path utilities for configuration.
pub mod paths;

/// HTTP routes and server loop.
pub mod server;

/// Request validation, prompting and the model client.
pub mod translation;

/// Terminal styling.
pub mod ui;
