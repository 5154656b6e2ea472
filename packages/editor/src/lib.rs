//! # Scenecraft Editor
//!
//! Editing engine for scene documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: node tree + factory                  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: SceneDocument + mutations           │
//! │  - Validate and apply commands              │
//! │  - Snapshot history (undo/redo)             │
//! │  - Selection and hover focus                │
//! │  - Change events for UI bindings            │
//! │  - JSON import/export                       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compilers: RootNode → HTML / JSX            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is source of truth**: rendered output is always derived
//! 2. **One write path**: every change goes through a `Mutation`
//! 3. **Whole-tree snapshots**: undo restores exactly what was there
//! 4. **Single-threaded**: documents and subscriptions are `!Send`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scenecraft_editor::SceneDocument;
//! use scenecraft_model::{NodeType, ROOT_ID};
//!
//! let mut doc = SceneDocument::new("landing", 800.0, 600.0);
//! let _sub = doc.subscribe(|event| println!("{:?}", event));
//!
//! let title = doc.create_node(NodeType::Text);
//! let id = title.id.clone();
//! doc.add_child(ROOT_ID, title)?;
//! doc.set_text(&id, "Hello")?;
//!
//! doc.undo();
//! let json = doc.to_json()?;
//! ```

mod document;
mod errors;
mod events;
mod mutations;
mod selection;
mod serializer;
mod undo_stack;

pub use document::SceneDocument;
pub use errors::EditorError;
pub use events::{EventBus, SceneEvent, Subscription};
pub use mutations::{
    find_slot, resolve_binding, ChangeScope, Mutation, MutationError, MutationResult,
    PlacementIntent,
};
pub use selection::{FocusChange, SelectionState};
pub use serializer::SceneFile;
pub use undo_stack::{Snapshot, UndoStack, DEFAULT_MAX_LEVELS};
