//! Headless client for the course manager: state tree, intents and view-models.
pub mod course_client;
