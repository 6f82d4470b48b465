//! Compilation Pipeline - Single Entry Point
//!
//! compile always validates first; the failure mode decides whether
//! violations stop it. Rendering itself cannot fail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::hashing::{compute_html_hash, compute_project_hash};
use crate::project::{LoadError, Project};
use crate::render::render;
use crate::validation::{FailureMode, ValidationResult, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledEmail {
    pub id: String,
    pub engine_version: String,
    pub schema_version: String,
    pub created_at: DateTime<Utc>,
    pub project_hash: String,
    pub html_hash: String,
    pub validation: ValidationResult,
    pub html: String,
}

/// The compilation pipeline - load, validate, render, fingerprint
pub struct CompilationPipeline {
    validator: Validator,
    failure_mode: FailureMode,
}

impl CompilationPipeline {
    pub fn new(failure_mode: FailureMode) -> Self {
        Self {
            validator: Validator::new(),
            failure_mode,
        }
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    pub fn validate(&self, project: &Project) -> ValidationResult {
        self.validator.validate(project, self.failure_mode)
    }

    /// Compile an already-loaded project.
    pub fn compile(&self, project: &Project) -> Result<CompiledEmail, PipelineError> {
        let validation = self.validate(project);
        if !validation.valid {
            let messages: Vec<_> = validation
                .violations
                .iter()
                .filter(|v| v.severity == crate::validation::ViolationSeverity::Error)
                .map(|v| format!("{}: {}", v.rule, v.message))
                .collect();
            return Err(PipelineError::ValidationFailed(messages.join("; ")));
        }

        let html = render(&project.document(), &project.settings);
        let email = CompiledEmail {
            id: Uuid::new_v4().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            schema_version: project.schema_version.clone(),
            created_at: Utc::now(),
            project_hash: compute_project_hash(project)?,
            html_hash: compute_html_hash(&html),
            validation,
            html,
        };

        info!(
            id = %email.id,
            components = project.components.len(),
            html_hash = %email.html_hash,
            "compiled email"
        );
        Ok(email)
    }

    /// Load (with migration) and compile a project file's contents.
    pub fn compile_json(&self, content: &str) -> Result<CompiledEmail, PipelineError> {
        let project = Project::from_json(content)?;
        self.compile(&project)
    }
}

impl Default for CompilationPipeline {
    fn default() -> Self {
        Self::new(FailureMode::default())
    }
}
