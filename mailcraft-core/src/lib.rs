//! Mailcraft Core - Email Block Compiler
//!
//! # Guarantees
//! 1. Rendering Is Pure: same blocks and settings, same bytes
//! 2. Sanitize Before Concatenate
//! 3. Merge Fields Pass Through Untouched
//! 4. Tables Everywhere, VML Where Outlook Needs It
//! 5. Migrate at Load, Never While Rendering

pub mod attributes;
pub mod components;
pub mod document;
pub mod factory;
pub mod hashing;
pub mod migrate;
pub mod offers;
pub mod pipeline;
pub mod preview;
pub mod project;
pub mod render;
pub mod sanitize;
pub mod settings;
pub mod validation;

pub use components::{Block, BlockContent, ComponentType, EmailComponent};
pub use document::Document;
pub use factory::{default_attributes, ComponentFactory};
pub use offers::{AdditionalOffer, OfferId};
pub use pipeline::{CompilationPipeline, CompiledEmail, PipelineError};
pub use preview::{Debouncer, LivePreview, PreviewConfig};
pub use project::{LoadError, Project};
pub use render::{render, render_components, EMPTY_PLACEHOLDER};
pub use settings::{ButtonStyle, DesignSettings, OffersLayout};
pub use validation::{FailureMode, ValidationResult, ValidationViolation, ViolationSeverity};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
