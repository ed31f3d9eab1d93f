//! Editor state controller.
//!
//! One controller drives one draft record:
//!
//! ```text
//! open(None)          -> Creating ── save (inserted) ──> Editing(id)
//! open(Some(item))    -> Editing(id)
//!
//! request_delete() -> PendingDelete ── confirm ──> (terminated)
//!                                   └─ cancel ───> controller
//! navigate(kind)   -> Leave(kind)                       (clean)
//!                  -> Confirm(PendingDiscard) ── discard ──────> kind
//!                                             └─ keep_editing ─> controller
//! ```
//!
//! Terminal transitions consume the controller, so a deleted or abandoned
//! draft cannot be used again.

use std::sync::Arc;

use stockroom_core::{Column, FieldSet, ItemId, Value};
use stockroom_store::Store;

use crate::address::{Address, Route};
use crate::counter::{CounterStep, QuantityCounter};
use crate::error::{EditorError, GatewayError};
use crate::gateway::Gateway;
use crate::notice::Notice;

/// Whether the draft is backed by a stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Creating,
    Editing(ItemId),
}

/// The unsaved contents of the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    /// Price as typed. Parsed on save.
    pub price_text: String,
    pub quantity: QuantityCounter,
    pub supplier_name: String,
    pub supplier_phone: String,
}

impl Draft {
    /// True when no field has any content and the counter is at zero.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.price_text.trim().is_empty()
            && self.quantity.is_zero()
            && self.supplier_name.trim().is_empty()
            && self.supplier_phone.trim().is_empty()
    }

    /// The field set written on save.
    ///
    /// Text is trimmed. A blank price is 0; a non-numeric price is passed
    /// through as text so validation can reject it.
    pub fn to_field_set(&self) -> FieldSet {
        let price = self.price_text.trim();
        let price = if price.is_empty() {
            Value::Integer(0)
        } else {
            price
                .parse::<i64>()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::Text(price.to_string()))
        };

        FieldSet::new()
            .with(Column::Name, self.name.trim())
            .with(Column::Price, price)
            .with(Column::Quantity, self.quantity.value())
            .with(Column::SupplierName, self.supplier_name.trim())
            .with(Column::SupplierPhone, self.supplier_phone.trim())
    }
}

/// Result of [`EditorController::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New draft with nothing in it. Nothing was written.
    Skipped,
    /// A row was created at this address.
    Inserted(Address),
    /// This many rows were updated.
    Updated(usize),
    Failed(Notice),
}

impl SaveOutcome {
    /// The message to show, if any.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            SaveOutcome::Skipped => None,
            SaveOutcome::Inserted(_) => Some(Notice::InsertSucceeded),
            SaveOutcome::Updated(_) => Some(Notice::UpdateSucceeded),
            SaveOutcome::Failed(notice) => Some(notice.clone()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SaveOutcome::Inserted(_) | SaveOutcome::Updated(_))
    }
}

/// Result of confirming a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(usize),
    /// The draft was never stored.
    NothingToDelete,
    Failed(Notice),
}

impl DeleteOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            DeleteOutcome::Deleted(_) => Some(Notice::DeleteSucceeded),
            DeleteOutcome::NothingToDelete => None,
            DeleteOutcome::Failed(notice) => Some(notice.clone()),
        }
    }
}

/// Ways of leaving the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    Back,
    Up,
}

/// Result of [`EditorController::navigate`].
pub enum Navigation<S: Store> {
    /// Nothing unsaved; leave now.
    Leave(NavigationKind),
    /// Unsaved changes; ask first.
    Confirm(PendingDiscard<S>),
}

/// A navigation held back until the user decides about unsaved changes.
pub struct PendingDiscard<S: Store> {
    controller: EditorController<S>,
    kind: NavigationKind,
}

impl<S: Store> PendingDiscard<S> {
    pub fn kind(&self) -> NavigationKind {
        self.kind
    }

    /// Drop the draft and leave.
    pub fn discard(self) -> NavigationKind {
        tracing::debug!(kind = ?self.kind, "discarding unsaved changes");
        self.kind
    }

    /// Stay in the editor with the draft intact.
    pub fn keep_editing(self) -> EditorController<S> {
        self.controller
    }
}

/// A delete waiting for confirmation.
pub struct PendingDelete<S: Store> {
    controller: EditorController<S>,
}

impl<S: Store> PendingDelete<S> {
    /// Delete the backing row. The controller ends here whatever the result.
    pub async fn confirm(self) -> DeleteOutcome {
        let controller = self.controller;
        let EditorMode::Editing(id) = controller.mode else {
            return DeleteOutcome::NothingToDelete;
        };

        let address = controller.gateway.item_address(id);
        match controller.gateway.delete(&address, None).await {
            Ok(0) => DeleteOutcome::Failed(Notice::DeleteFailed),
            Ok(n) => DeleteOutcome::Deleted(n),
            Err(e) => {
                tracing::warn!(%address, error = %e, "delete failed");
                DeleteOutcome::Failed(Notice::DeleteFailed)
            }
        }
    }

    pub fn cancel(self) -> EditorController<S> {
        self.controller
    }
}

/// Drives one draft record through create, edit, save and delete.
pub struct EditorController<S: Store> {
    gateway: Arc<Gateway<S>>,
    mode: EditorMode,
    draft: Draft,
    dirty: bool,
}

impl<S: Store> EditorController<S> {
    /// Open an editor.
    ///
    /// With no address the editor creates a new record. Otherwise the
    /// address must name a single item, which is then edited; call
    /// [`load`](Self::load) to fill the draft.
    pub fn open(gateway: Arc<Gateway<S>>, address: Option<&Address>) -> Result<Self, EditorError> {
        let mode = match address {
            None => EditorMode::Creating,
            Some(address) => match gateway.matcher().resolve(address) {
                Some(Route::Item(id)) => EditorMode::Editing(id),
                _ => return Err(EditorError::NotAnItemAddress(address.clone())),
            },
        };

        Ok(Self {
            gateway,
            mode,
            draft: Draft::default(),
            dirty: false,
        })
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Whether the draft has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Only stored records can be deleted.
    pub fn can_delete(&self) -> bool {
        matches!(self.mode, EditorMode::Editing(_))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Field mutation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
        self.dirty = true;
    }

    pub fn set_price_text(&mut self, price: impl Into<String>) {
        self.draft.price_text = price.into();
        self.dirty = true;
    }

    pub fn set_supplier_name(&mut self, supplier_name: impl Into<String>) {
        self.draft.supplier_name = supplier_name.into();
        self.dirty = true;
    }

    pub fn set_supplier_phone(&mut self, supplier_phone: impl Into<String>) {
        self.draft.supplier_phone = supplier_phone.into();
        self.dirty = true;
    }

    /// Mark the draft as touched without changing a value.
    pub fn touch(&mut self) {
        self.dirty = true;
    }

    pub fn increment_quantity(&mut self) -> CounterStep {
        let step = self.draft.quantity.increment();
        self.mark_if_changed(&step);
        step
    }

    pub fn decrement_quantity(&mut self) -> CounterStep {
        let step = self.draft.quantity.decrement();
        self.mark_if_changed(&step);
        step
    }

    fn mark_if_changed(&mut self, step: &CounterStep) {
        if let CounterStep::Changed(_) = step {
            self.dirty = true;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Load / reset
    // ─────────────────────────────────────────────────────────────────────────

    /// Fill the draft from the backing row.
    ///
    /// Returns `Ok(false)` without touching the draft when there is no
    /// backing row (creating, or the row is gone).
    pub async fn load(&mut self) -> Result<bool, GatewayError> {
        let EditorMode::Editing(id) = self.mode else {
            return Ok(false);
        };

        let address = self.gateway.item_address(id);
        let Some(record) = self.gateway.query_records(&address).await?.into_iter().next() else {
            tracing::debug!(%address, "nothing to load");
            return Ok(false);
        };

        let (quantity, clamped) = QuantityCounter::clamped(record.quantity);
        if clamped {
            tracing::warn!(
                %id,
                stored = record.quantity,
                shown = quantity.value(),
                "stored quantity out of counter range"
            );
        }

        self.draft = Draft {
            name: record.name,
            price_text: record.price.to_string(),
            quantity,
            supplier_name: record.supplier_name,
            supplier_phone: record.supplier_phone,
        };
        Ok(true)
    }

    /// Clear every draft field and the counter.
    pub fn reset(&mut self) {
        self.draft = Draft::default();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Save
    // ─────────────────────────────────────────────────────────────────────────

    /// Write the draft. Never fails; failures come back as
    /// [`SaveOutcome::Failed`].
    pub async fn save(&mut self) -> SaveOutcome {
        match self.mode {
            EditorMode::Creating => self.save_new().await,
            EditorMode::Editing(id) => self.save_existing(id).await,
        }
    }

    async fn save_new(&mut self) -> SaveOutcome {
        if self.draft.is_blank() {
            return SaveOutcome::Skipped;
        }

        let collection = self.gateway.collection_address();
        match self.gateway.insert(&collection, &self.draft.to_field_set()).await {
            Ok(Some(address)) => {
                if let Some(Route::Item(id)) = self.gateway.matcher().resolve(&address) {
                    self.mode = EditorMode::Editing(id);
                }
                self.dirty = false;
                SaveOutcome::Inserted(address)
            }
            Ok(None) => SaveOutcome::Failed(Notice::InsertFailed),
            Err(e) => SaveOutcome::Failed(failure_notice(e, Notice::InsertFailed)),
        }
    }

    async fn save_existing(&mut self, id: ItemId) -> SaveOutcome {
        let address = self.gateway.item_address(id);
        match self
            .gateway
            .update(&address, &self.draft.to_field_set(), None)
            .await
        {
            Ok(0) => SaveOutcome::Failed(Notice::UpdateFailed),
            Ok(n) => {
                self.dirty = false;
                SaveOutcome::Updated(n)
            }
            Err(e) => SaveOutcome::Failed(failure_notice(e, Notice::UpdateFailed)),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Terminal transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Ask to delete the backing row.
    pub fn request_delete(self) -> PendingDelete<S> {
        PendingDelete { controller: self }
    }

    /// Try to leave the editor.
    pub fn navigate(self, kind: NavigationKind) -> Navigation<S> {
        if self.dirty {
            Navigation::Confirm(PendingDiscard {
                controller: self,
                kind,
            })
        } else {
            Navigation::Leave(kind)
        }
    }

    /// `tel:` URI for calling the supplier.
    pub fn supplier_dial_uri(&self) -> Option<String> {
        let phone = self.draft.supplier_phone.trim();
        if phone.is_empty() {
            None
        } else {
            Some(format!("tel:{}", phone))
        }
    }
}

fn failure_notice(error: GatewayError, fallback: Notice) -> Notice {
    match error {
        GatewayError::InvalidField { field, reason } => Notice::InvalidInput { field, reason },
        other => {
            tracing::warn!(error = %other, "save failed");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::MAX_QUANTITY;
    use stockroom_store::MemoryStore;

    use crate::config::GatewayConfig;

    fn gateway() -> Arc<Gateway<MemoryStore>> {
        Arc::new(Gateway::new(MemoryStore::new(), GatewayConfig::default()))
    }

    fn fill(editor: &mut EditorController<MemoryStore>) {
        editor.set_name("  Widget ");
        editor.set_price_text("10");
        editor.set_supplier_name("Acme");
        editor.set_supplier_phone("555-1234");
        for _ in 0..5 {
            editor.increment_quantity();
        }
    }

    fn expect_confirm(navigation: Navigation<MemoryStore>) -> PendingDiscard<MemoryStore> {
        match navigation {
            Navigation::Confirm(pending) => pending,
            Navigation::Leave(kind) => panic!("left immediately via {:?}", kind),
        }
    }

    #[test]
    fn test_open_modes() {
        let gw = gateway();
        let editor = EditorController::open(Arc::clone(&gw), None).unwrap();
        assert_eq!(editor.mode(), EditorMode::Creating);
        assert!(!editor.can_delete());

        let item = gw.item_address(ItemId::new(3));
        let editor = EditorController::open(Arc::clone(&gw), Some(&item)).unwrap();
        assert_eq!(editor.mode(), EditorMode::Editing(ItemId::new(3)));
        assert!(editor.can_delete());

        let collection = gw.collection_address();
        assert!(matches!(
            EditorController::open(gw, Some(&collection)),
            Err(EditorError::NotAnItemAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_new_draft_skips() {
        let gw = gateway();
        let mut editor = EditorController::open(Arc::clone(&gw), None).unwrap();
        editor.touch();

        assert_eq!(editor.save().await, SaveOutcome::Skipped);
        assert!(gw.query_records(&gw.collection_address()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_save_load_round_trip() {
        let gw = gateway();
        let mut editor = EditorController::open(Arc::clone(&gw), None).unwrap();
        fill(&mut editor);
        assert!(editor.is_dirty());

        let SaveOutcome::Inserted(address) = editor.save().await else {
            panic!("expected insert");
        };
        assert!(!editor.is_dirty());
        let EditorMode::Editing(id) = editor.mode() else {
            panic!("expected editing mode");
        };
        assert_eq!(gw.item_address(id), address);

        let mut reopened = EditorController::open(Arc::clone(&gw), Some(&address)).unwrap();
        assert!(reopened.load().await.unwrap());
        let draft = reopened.draft();
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.price_text, "10");
        assert_eq!(draft.quantity.value(), 5);
        assert_eq!(draft.supplier_name, "Acme");
        assert_eq!(draft.supplier_phone, "555-1234");
        assert!(!reopened.is_dirty());
    }

    #[tokio::test]
    async fn test_second_save_updates() {
        let gw = gateway();
        let mut editor = EditorController::open(Arc::clone(&gw), None).unwrap();
        fill(&mut editor);
        assert!(editor.save().await.is_success());

        editor.decrement_quantity();
        assert_eq!(editor.save().await, SaveOutcome::Updated(1));

        let records = gw.query_records(&gw.collection_address()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_blank_price_saves_as_zero() {
        let gw = gateway();
        let mut editor = EditorController::open(Arc::clone(&gw), None).unwrap();
        fill(&mut editor);
        editor.set_price_text("   ");

        let SaveOutcome::Inserted(address) = editor.save().await else {
            panic!("expected insert");
        };
        assert_eq!(gw.query_records(&address).await.unwrap()[0].price, 0);
    }

    #[tokio::test]
    async fn test_invalid_price_reports_field() {
        let gw = gateway();
        let mut editor = EditorController::open(Arc::clone(&gw), None).unwrap();
        fill(&mut editor);
        editor.set_price_text("ten");

        let outcome = editor.save().await;
        assert!(matches!(
            outcome,
            SaveOutcome::Failed(Notice::InvalidInput {
                field: Column::Price,
                ..
            })
        ));
        assert_eq!(editor.mode(), EditorMode::Creating);
        assert!(editor.is_dirty());
    }

    #[tokio::test]
    async fn test_update_of_missing_row_fails() {
        let gw = gateway();
        let address = gw.item_address(ItemId::new(77));
        let mut editor = EditorController::open(Arc::clone(&gw), Some(&address)).unwrap();

        assert!(!editor.load().await.unwrap());
        assert!(editor.draft().is_blank());

        fill(&mut editor);
        let outcome = editor.save().await;
        assert_eq!(outcome, SaveOutcome::Failed(Notice::UpdateFailed));
        assert_eq!(outcome.notice(), Some(Notice::UpdateFailed));
        assert!(editor.is_dirty());
    }

    #[tokio::test]
    async fn test_load_clamps_large_quantity() {
        let gw = gateway();
        let fields = FieldSet::new()
            .with(Column::Name, "Bulk")
            .with(Column::Quantity, 500)
            .with(Column::SupplierName, "Acme")
            .with(Column::SupplierPhone, "1");
        let address = gw
            .insert(&gw.collection_address(), &fields)
            .await
            .unwrap()
            .unwrap();

        let mut editor = EditorController::open(Arc::clone(&gw), Some(&address)).unwrap();
        assert!(editor.load().await.unwrap());
        assert_eq!(editor.draft().quantity.value(), MAX_QUANTITY);
    }

    #[test]
    fn test_counter_boundary_does_not_dirty() {
        let mut editor = EditorController::open(gateway(), None).unwrap();

        assert_eq!(
            editor.decrement_quantity(),
            CounterStep::AtBoundary(Notice::QuantityAtMinimum)
        );
        assert!(!editor.is_dirty());

        assert_eq!(editor.increment_quantity(), CounterStep::Changed(1));
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_reset_clears_draft() {
        let mut editor = EditorController::open(gateway(), None).unwrap();
        fill(&mut editor);
        editor.reset();
        assert!(editor.draft().is_blank());
    }

    #[test]
    fn test_discard_gate() {
        let editor = EditorController::open(gateway(), None).unwrap();
        assert!(matches!(
            editor.navigate(NavigationKind::Back),
            Navigation::Leave(NavigationKind::Back)
        ));

        let mut editor = EditorController::open(gateway(), None).unwrap();
        editor.set_name("Widget");

        let pending = expect_confirm(editor.navigate(NavigationKind::Up));
        assert_eq!(pending.kind(), NavigationKind::Up);
        let editor = pending.keep_editing();
        assert_eq!(editor.draft().name, "Widget");
        assert!(editor.is_dirty());

        let pending = expect_confirm(editor.navigate(NavigationKind::Back));
        assert_eq!(pending.discard(), NavigationKind::Back);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let gw = gateway();
        let mut editor = EditorController::open(Arc::clone(&gw), None).unwrap();
        fill(&mut editor);
        let SaveOutcome::Inserted(address) = editor.save().await else {
            panic!("expected insert");
        };

        let editor = editor.request_delete().cancel();
        assert_eq!(gw.query_records(&address).await.unwrap().len(), 1);

        let outcome = editor.request_delete().confirm().await;
        assert_eq!(outcome, DeleteOutcome::Deleted(1));
        assert_eq!(outcome.notice(), Some(Notice::DeleteSucceeded));
        assert!(gw.query_records(&address).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_or_new() {
        let gw = gateway();
        let editor = EditorController::open(Arc::clone(&gw), None).unwrap();
        assert_eq!(
            editor.request_delete().confirm().await,
            DeleteOutcome::NothingToDelete
        );

        let address = gw.item_address(ItemId::new(12));
        let editor = EditorController::open(gw, Some(&address)).unwrap();
        assert_eq!(
            editor.request_delete().confirm().await,
            DeleteOutcome::Failed(Notice::DeleteFailed)
        );
    }

    #[test]
    fn test_supplier_dial_uri() {
        let mut editor = EditorController::open(gateway(), None).unwrap();
        assert_eq!(editor.supplier_dial_uri(), None);
        editor.set_supplier_phone(" 555-1234 ");
        assert_eq!(editor.supplier_dial_uri().as_deref(), Some("tel:555-1234"));
    }
}
