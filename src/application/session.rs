//! One editing session over one condition tree.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{
    codec, query, Clock, CondNode, ConditionEditor, DecodeError, DomainResult, IdAllocator,
    NodeId, ReadOnlyEditor, SystemClock, TreeEditor, ValidationError, WireCondition,
};

/// Whether edits made through the session take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Editable,
    ReadOnly,
}

/// Owns a tree together with the id allocator its ids came from.
///
/// The editor variant is chosen once, from the session's [`EditMode`], and
/// handed to every edit callback.
pub struct EditSession {
    ids: IdAllocator,
    root: CondNode,
    mode: EditMode,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("ids", &self.ids)
            .field("root", &self.root)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl EditSession {
    /// A new rule: a single empty OR group.
    pub fn new_campaign(mode: EditMode) -> Self {
        let ids = IdAllocator::new();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let root = TreeEditor::with_clock(&ids, clock.clone()).new_group().into();
        Self {
            ids,
            root,
            mode,
            clock,
        }
    }

    /// Decode an existing rule with fresh ids.
    pub fn from_wire(wire: &WireCondition, mode: EditMode) -> Result<Self, DecodeError> {
        let ids = IdAllocator::new();
        let root = codec::decode(wire, &ids)?;
        debug!("from_wire: {} nodes, mode={:?}", ids.allocated(), mode);
        Ok(Self {
            ids,
            root,
            mode,
            clock: Arc::new(SystemClock),
        })
    }

    /// Parse and decode a JSON rule document.
    pub fn from_json(json: &str, mode: EditMode) -> DomainResult<Self> {
        Ok(Self::from_wire(&codec::from_json(json)?, mode)?)
    }

    /// Replace the clock used for default time ranges.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn root(&self) -> &CondNode {
        &self.root
    }

    pub fn to_wire(&self) -> WireCondition {
        codec::encode(&self.root)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        crate::domain::validate(&self.root)
    }

    /// Run `f` with this session's editor and the root node.
    pub fn edit<R>(&mut self, f: impl FnOnce(&dyn ConditionEditor, &mut CondNode) -> R) -> R {
        match self.mode {
            EditMode::Editable => {
                let editor = TreeEditor::with_clock(&self.ids, self.clock.clone());
                f(&editor, &mut self.root)
            }
            EditMode::ReadOnly => f(&ReadOnlyEditor, &mut self.root),
        }
    }

    /// Run `f` on the node with `id`. Returns `None` if no such node exists.
    pub fn edit_node<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&dyn ConditionEditor, &mut CondNode) -> R,
    ) -> Option<R> {
        let node = query::find_mut(&mut self.root, id)?;
        let result = match self.mode {
            EditMode::Editable => {
                let editor = TreeEditor::with_clock(&self.ids, self.clock.clone());
                f(&editor, node)
            }
            EditMode::ReadOnly => f(&ReadOnlyEditor, node),
        };
        Some(result)
    }
}
