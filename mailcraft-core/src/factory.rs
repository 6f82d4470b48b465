//! Component Factory - Canonical Default Bags
//!
//! Every component starts life with the complete attribute bag for its type.
//! The render path has fallbacks for missing keys, but the factory never
//! relies on them.

use chrono::{DateTime, Utc};

use crate::attributes::AttributeBag;
use crate::components::{BlockContent, ComponentType, EmailComponent};

/// Full default bag for a type name. Unknown types get an empty bag.
pub fn default_attributes(type_name: &str) -> AttributeBag {
    ComponentType::parse(type_name)
        .map(|kind| BlockContent::defaults(kind).to_bag())
        .unwrap_or_default()
}

/// Issues timestamp-derived component ids.
///
/// Ids are creation time in milliseconds, bumped forward when two components
/// are created within the same millisecond.
#[derive(Debug, Default)]
pub struct ComponentFactory {
    last_issued: i64,
}

impl ComponentFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        self.next_id_at(Utc::now())
    }

    pub fn next_id_at(&mut self, now: DateTime<Utc>) -> String {
        let id = now.timestamp_millis().max(self.last_issued + 1);
        self.last_issued = id;
        id.to_string()
    }

    pub fn create(&mut self, type_name: &str) -> EmailComponent {
        EmailComponent::new(self.next_id(), type_name, default_attributes(type_name))
    }
}
