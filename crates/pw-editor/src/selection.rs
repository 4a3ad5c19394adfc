//! Selection ↔ trait panel synchronisation.
//!
//! Selecting a node classifies it and asks the embedder to resolve a field
//! schema (`ResolveSchema`). The answer comes back through
//! [`SelectionSyncController::complete_schema`] tagged with its ticket; answers
//! for anything but the current selection are dropped.
//!
//! Field edits come back as `update` events. Each one is translated to
//! attribute/style writes under an [`UpdateLock`] so the host's echo of our
//! own writes is not processed again.

use crate::config::SelectionConfig;
use crate::fields::map_field;
use crate::input::FieldUpdate;
use crate::lock::UpdateLock;
use pw_core::classify::{NodeInfo, classify};
use pw_core::effect::{CanvasEffect, SchemaRequest};
use pw_core::error::CanvasError;
use pw_core::host::ComponentModel;
use pw_core::id::NodeId;
use pw_core::model::FieldSchema;

#[derive(Debug, Clone, PartialEq)]
struct Verification {
    node: NodeId,
    schema: FieldSchema,
    attempts_left: u32,
}

pub struct SelectionSyncController {
    config: SelectionConfig,
    last_selected: Option<NodeId>,
    next_ticket: u64,
    pending: Option<SchemaRequest>,
    verification: Option<Verification>,
    lock: UpdateLock,
}

impl SelectionSyncController {
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            config,
            last_selected: None,
            next_ticket: 1,
            pending: None,
            verification: None,
            lock: UpdateLock::new(config.lock_ttl_ms),
        }
    }

    pub fn last_selected(&self) -> Option<NodeId> {
        self.last_selected
    }

    pub fn pending(&self) -> Option<&SchemaRequest> {
        self.pending.as_ref()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn on_selected(&mut self, node: NodeId, model: &impl ComponentModel) -> Vec<CanvasEffect> {
        if self.last_selected == Some(node) {
            log::debug!("{node} already selected; refreshing traits only");
            return vec![CanvasEffect::RefreshTraits { id: node }];
        }
        let Some(info) = NodeInfo::read(model, node) else {
            log::debug!("selection dropped: {}", CanvasError::UnknownNode(node));
            return vec![];
        };
        let type_tag = classify(&info);
        let request = SchemaRequest {
            ticket: self.next_ticket,
            node,
            type_tag,
            smart_object: info.smart_object,
        };
        self.next_ticket += 1;
        log::debug!(
            "resolving schema for {node} as {} (ticket {})",
            type_tag.as_str(),
            request.ticket
        );
        self.last_selected = Some(node);
        self.verification = None;
        self.pending = Some(request.clone());
        vec![CanvasEffect::ResolveSchema { request }]
    }

    pub fn on_deselected(&mut self) {
        self.last_selected = None;
        self.pending = None;
        self.verification = None;
    }

    /// Install the resolved schema, or the fallback when resolution failed.
    ///
    /// Results for a superseded ticket, or for a node that is no longer
    /// selected, are dropped.
    pub fn complete_schema(
        &mut self,
        ticket: u64,
        result: std::result::Result<FieldSchema, String>,
    ) -> Vec<CanvasEffect> {
        let request = match self.pending.take() {
            Some(request) if request.ticket == ticket => request,
            other => {
                log::debug!("stale schema result for ticket {ticket} dropped");
                self.pending = other;
                return vec![];
            }
        };
        if self.last_selected != Some(request.node) {
            log::debug!(
                "schema result dropped: {}",
                CanvasError::StaleEvent(request.node)
            );
            return vec![];
        }

        let schema = match result {
            Ok(schema) if !schema.is_empty() => schema,
            Ok(_) => {
                log::warn!("empty schema for {}; using fallback", request.node);
                FieldSchema::fallback()
            }
            Err(reason) => {
                let e = CanvasError::SchemaResolution {
                    type_tag: request.type_tag.as_str().to_string(),
                    reason,
                };
                log::warn!("{e}; {} gets the fallback schema", request.node);
                FieldSchema::fallback()
            }
        };
        self.verification = Some(Verification {
            node: request.node,
            schema: schema.clone(),
            attempts_left: self.config.verify_attempts,
        });
        vec![CanvasEffect::SetTraits {
            id: request.node,
            schema,
        }]
    }

    /// Check that the last installed schema took, re-installing it while
    /// attempts remain.
    pub fn verify(&mut self, model: &impl ComponentModel) -> Vec<CanvasEffect> {
        let Some(mut check) = self.verification.take() else {
            return vec![];
        };
        if self.last_selected != Some(check.node) {
            return vec![];
        }
        if model.traits(check.node).as_ref() == Some(&check.schema) {
            return vec![];
        }
        if check.attempts_left == 0 {
            log::warn!("trait schema for {} did not take", check.node);
            return vec![];
        }
        check.attempts_left -= 1;
        log::warn!("trait schema for {} missing; installing again", check.node);
        let effect = CanvasEffect::SetTraits {
            id: check.node,
            schema: check.schema.clone(),
        };
        self.verification = Some(check);
        vec![effect]
    }

    pub fn awaiting_verification(&self) -> bool {
        self.verification.is_some()
    }

    // ─── Updates ─────────────────────────────────────────────────────────

    /// Translate edited fields into writes. Dropped while `node` is locked.
    pub fn on_update(
        &mut self,
        node: NodeId,
        fields: &[FieldUpdate],
        now_ms: f64,
    ) -> Vec<CanvasEffect> {
        if !self.lock.try_acquire(node.as_str(), now_ms) {
            log::debug!("dropped: {}", CanvasError::Reentrancy(node.to_string()));
            return vec![];
        }
        fields
            .iter()
            .flat_map(|f| map_field(node, &f.name, &f.value))
            .collect()
    }

    // ─── Timers ──────────────────────────────────────────────────────────

    pub fn next_deadline(&self) -> Option<f64> {
        self.lock.next_release()
    }

    pub fn poll(&mut self, now_ms: f64) {
        self.lock.purge(now_ms);
    }

    pub fn destroy(&mut self) {
        self.on_deselected();
        self.lock.clear();
    }
}
