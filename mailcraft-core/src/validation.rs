//! Validation System - Rule/Policy Separation
//!
//! Rules inspect the wire components and produce structured violations.
//! Policy decides whether those violations block compilation. The renderer
//! never consults any of this; it tolerates everything flagged here.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::attributes::parse_number;
use crate::components::{ComponentType, EmailComponent};
use crate::offers::decode_offers;
use crate::project::Project;
use crate::sanitize;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub component_id: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

impl ValidationViolation {
    fn new(
        rule: &str,
        severity: ViolationSeverity,
        component: &EmailComponent,
        message: String,
    ) -> Self {
        Self {
            rule: rule.to_string(),
            severity,
            message,
            component_id: Some(component.id.clone()),
            actual: None,
            remediation: vec![],
        }
    }

    fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    fn remediation(mut self, hint: &str) -> Self {
        self.remediation.push(hint.to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
    pub schema_version: String,
    pub component_count: usize,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn count(&self, severity: ViolationSeverity) -> usize {
        self.violations.iter().filter(|v| v.severity == severity).count()
    }
}

/// What to do with violations once collected.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Errors make the result invalid.
    Block,
    #[default]
    Warn,
    Log,
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, project: &Project) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

pub struct DuplicateIdRule;

impl ValidationRule for DuplicateIdRule {
    fn name(&self) -> &'static str { "duplicate_id" }

    fn validate(&self, project: &Project) -> Vec<ValidationViolation> {
        let mut seen = HashSet::new();
        project
            .components
            .iter()
            .filter(|c| !seen.insert(c.id.as_str()))
            .map(|c| {
                ValidationViolation::new(
                    self.name(),
                    ViolationSeverity::Error,
                    c,
                    format!("Component id {} is used more than once", c.id),
                )
                .remediation("Recreate the duplicated component so it gets a fresh id")
            })
            .collect()
    }
}

pub struct UnknownTypeRule;

impl ValidationRule for UnknownTypeRule {
    fn name(&self) -> &'static str { "unknown_type" }

    fn validate(&self, project: &Project) -> Vec<ValidationViolation> {
        project
            .components
            .iter()
            .filter(|c| c.kind().is_none())
            .map(|c| {
                ValidationViolation::new(
                    self.name(),
                    ViolationSeverity::Warning,
                    c,
                    "Unknown component type renders nothing".to_string(),
                )
                .actual(c.component_type.clone())
            })
            .collect()
    }
}

pub struct NumericAttributeRule;

impl ValidationRule for NumericAttributeRule {
    fn name(&self) -> &'static str { "numeric_attribute" }

    fn validate(&self, project: &Project) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        for c in project.components.iter().filter(|c| c.kind() == Some(ComponentType::Divider)) {
            for key in ["width", "thickness"] {
                if let Some(value) = c.get(key) {
                    let trimmed = value.trim();
                    if parse_number(value).is_none()
                        || trimmed.ends_with('%')
                        || trimmed.ends_with("px")
                    {
                        violations.push(
                            ValidationViolation::new(
                                self.name(),
                                ViolationSeverity::Warning,
                                c,
                                format!("Divider {key} is not a plain number and is emitted as-is"),
                            )
                            .actual(value)
                            .remediation("Use digits only, e.g. \"100\""),
                        );
                    }
                }
            }
        }
        violations
    }
}

pub struct AdditionalOffersRule;

impl ValidationRule for AdditionalOffersRule {
    fn name(&self) -> &'static str { "additional_offers" }

    fn validate(&self, project: &Project) -> Vec<ValidationViolation> {
        project
            .components
            .iter()
            .filter(|c| c.kind() == Some(ComponentType::SalesOffer))
            .filter_map(|c| {
                let raw = c.get("additionalOffers")?;
                let err = decode_offers(raw).err()?;
                Some(
                    ValidationViolation::new(
                        self.name(),
                        ViolationSeverity::Warning,
                        c,
                        "Additional offers could not be decoded and will not render".to_string(),
                    )
                    .actual(err.to_string())
                    .remediation("Reset the additional offers list"),
                )
            })
            .collect()
    }
}

const URL_KEYS: [&str; 5] = ["link", "src", "buttonLink", "imageUrl", "imageLink"];

pub struct UnsafeUrlRule;

impl ValidationRule for UnsafeUrlRule {
    fn name(&self) -> &'static str { "unsafe_url" }

    fn validate(&self, project: &Project) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        for c in &project.components {
            for key in URL_KEYS {
                if let Some(value) = c.get(key).filter(|v| sanitize::is_unsafe_url(v)) {
                    violations.push(
                        ValidationViolation::new(
                            self.name(),
                            ViolationSeverity::Warning,
                            c,
                            format!("{key} uses a blocked scheme and is replaced with #"),
                        )
                        .actual(value)
                        .remediation("Use an https:// link"),
                    );
                }
            }
        }
        violations
    }
}

pub struct MergeFieldRule;

impl ValidationRule for MergeFieldRule {
    fn name(&self) -> &'static str { "merge_field" }

    fn validate(&self, project: &Project) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        for c in &project.components {
            for (key, value) in c.data.iter().filter(|(k, _)| k.as_str() != "additionalOffers") {
                if sanitize::has_unbalanced_braces(value) {
                    violations.push(
                        ValidationViolation::new(
                            self.name(),
                            ViolationSeverity::Info,
                            c,
                            format!("{key} contains an incomplete merge field"),
                        )
                        .actual(value.clone())
                        .remediation("Merge fields look like {{recipient.first_name}}"),
                    );
                }
            }
        }
        violations
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(DuplicateIdRule),
                Box::new(UnknownTypeRule),
                Box::new(NumericAttributeRule),
                Box::new(AdditionalOffersRule),
                Box::new(UnsafeUrlRule),
                Box::new(MergeFieldRule),
            ],
        }
    }

    pub fn validate(&self, project: &Project, mode: FailureMode) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(project))
            .collect();

        for v in &violations {
            match mode {
                FailureMode::Log => {
                    info!(rule = %v.rule, component = ?v.component_id, "{}", v.message)
                }
                FailureMode::Block | FailureMode::Warn => {
                    warn!(rule = %v.rule, component = ?v.component_id, "{}", v.message)
                }
            }
        }

        let has_errors = violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult {
            valid: !(mode == FailureMode::Block && has_errors),
            violations,
            schema_version: project.schema_version.clone(),
            component_count: project.components.len(),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeBag;
    use crate::settings::DesignSettings;

    fn component(id: &str, kind: &str, pairs: &[(&str, &str)]) -> EmailComponent {
        let data: AttributeBag = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EmailComponent::new(id, kind, data)
    }

    fn project(components: Vec<EmailComponent>) -> Project {
        Project::new(DesignSettings::default(), components)
    }

    #[test]
    fn test_duplicate_ids_block_only_in_block_mode() {
        let p = project(vec![
            component("1", "header", &[]),
            component("1", "spacer", &[]),
        ]);
        let validator = Validator::new();

        let blocked = validator.validate(&p, FailureMode::Block);
        assert!(!blocked.valid);
        assert_eq!(blocked.count(ViolationSeverity::Error), 1);

        let warned = validator.validate(&p, FailureMode::Warn);
        assert!(warned.valid);
        assert!(warned.has_errors());
    }

    #[test]
    fn test_warnings_never_block() {
        let p = project(vec![
            component("1", "divider", &[("width", "wide"), ("thickness", "2")]),
            component("2", "sales_offer", &[("additionalOffers", "{not json")]),
            component("3", "button", &[("link", "javascript:alert(1)")]),
            component("4", "carousel", &[]),
        ]);
        let result = Validator::new().validate(&p, FailureMode::Block);
        assert!(result.valid);
        let rules: Vec<_> = result.violations.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(rules, ["unknown_type", "numeric_attribute", "additional_offers", "unsafe_url"]);
    }

    #[test]
    fn test_incomplete_merge_field_is_info() {
        let p = project(vec![component(
            "1",
            "text_block",
            &[("text", "Hi {{recipient.first_name")],
        )]);
        let result = Validator::new().validate(&p, FailureMode::Warn);
        assert_eq!(result.count(ViolationSeverity::Info), 1);
        assert_eq!(result.violations[0].component_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_clean_defaults_have_no_violations() {
        let mut factory = crate::factory::ComponentFactory::new();
        let components = ComponentType::ALL.iter().map(|k| factory.create(k.as_str())).collect();
        let result = Validator::new().validate(&project(components), FailureMode::Block);
        assert!(result.valid);
        assert!(result.violations.is_empty(), "{:?}", result.violations);
    }
}
