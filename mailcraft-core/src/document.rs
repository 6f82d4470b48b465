//! Document - Ordered Block List
//!
//! Order is significant and ids are unique. Nothing here tracks UI state
//! keyed by id; that belongs to the editing surface.

use crate::components::{Block, EmailComponent};
use crate::factory::ComponentFactory;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse wire components into typed blocks, keeping their order.
    pub fn from_components(components: &[EmailComponent]) -> Self {
        Self {
            blocks: components.iter().map(Block::from_component).collect(),
        }
    }

    pub fn to_components(&self) -> Vec<EmailComponent> {
        self.blocks.iter().map(Block::to_component).collect()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.blocks.iter().any(|b| b.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Append a freshly defaulted component and return its id.
    pub fn push_new(&mut self, factory: &mut ComponentFactory, type_name: &str) -> String {
        let mut component = factory.create(type_name);
        while self.contains(&component.id) {
            component.id = factory.next_id();
        }
        let id = component.id.clone();
        self.blocks.push(Block::from_component(&component));
        id
    }

    pub fn remove(&mut self, id: &str) -> Option<Block> {
        let index = self.blocks.iter().position(|b| b.id == id)?;
        Some(self.blocks.remove(index))
    }
}
