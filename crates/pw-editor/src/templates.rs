//! Template registry ("smart objects").
//!
//! Holds the descriptors this layer has installed into the host's component
//! type system. Registration is last-write-wins per id and keeps the position
//! of the first registration, so palette order is stable.

use pw_core::effect::CanvasEffect;
use pw_core::error::{CanvasError, Result};
use pw_core::model::{SMART_OBJECT_ATTR, TemplateDescriptor};
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct TemplateRegistry {
    descriptors: Vec<TemplateDescriptor>,
    index: HashMap<String, usize>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace `descriptor`.
    ///
    /// Returns the effects that push the type and its palette entry into the
    /// host. The caller defers this until the host signalled `ready`.
    ///
    /// # Errors
    /// `InvalidTemplate` if the id or markup is empty.
    pub fn register(&mut self, mut descriptor: TemplateDescriptor) -> Result<Vec<CanvasEffect>> {
        if descriptor.id.trim().is_empty() {
            return Err(CanvasError::InvalidTemplate("template id is empty".into()));
        }
        if descriptor.default_markup.trim().is_empty() {
            return Err(CanvasError::InvalidTemplate(format!(
                "template `{}` has no default markup",
                descriptor.id
            )));
        }
        descriptor
            .default_attributes
            .entry(SMART_OBJECT_ATTR.to_string())
            .or_insert_with(|| descriptor.id.clone());

        let effects = vec![
            CanvasEffect::RegisterType {
                descriptor: Box::new(descriptor.clone()),
            },
            CanvasEffect::UpsertPaletteEntry {
                entry: descriptor.palette_entry(),
            },
        ];

        match self.index.get(&descriptor.id) {
            Some(&slot) => {
                log::debug!("replacing template `{}`", descriptor.id);
                self.descriptors[slot] = descriptor;
            }
            None => {
                log::debug!(
                    "registering template `{}` in `{}`",
                    descriptor.id,
                    descriptor.category
                );
                self.index
                    .insert(descriptor.id.clone(), self.descriptors.len());
                self.descriptors.push(descriptor);
            }
        }
        Ok(effects)
    }

    pub fn get(&self, id: &str) -> Option<&TemplateDescriptor> {
        self.index.get(id).map(|&slot| &self.descriptors[slot])
    }

    /// Descriptors in `category`, in registration order.
    pub fn list_by_category(&self, category: &str) -> Vec<&TemplateDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for d in &self.descriptors {
            if !seen.contains(&d.category.as_str()) {
                seen.push(&d.category);
            }
        }
        seen
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
