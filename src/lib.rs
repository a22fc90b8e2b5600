//! Plant disease recognition service.
//!
//! Classifies a base64-encoded leaf image with a pretrained CNN, maps the
//! result onto one of 38 PlantVillage labels, and for diseased plants asks a
//! text-generation service for a description split into named sections.

pub mod config;
pub mod dashboard;
pub mod disease_info;
pub mod error;
pub mod labels;
pub mod llm;
pub mod model;
pub mod preprocess;
pub mod routes;
pub mod sections;
pub mod state;

pub use routes::router;
pub use state::AppState;
