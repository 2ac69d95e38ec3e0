//! Product list controller
//!
//! Owns the fetched catalog, the filter/sort inputs and the edit draft,
//! and drives them through an explicit [`Phase`]:
//!
//! ```text
//! Loading ──► Ready ◄──► Editing
//!    ▲          │           │
//!    └──────────┴───────────┘  (delete / successful submit / reload)
//! ```
//!
//! State lives behind a `RwLock` that is never held across a network
//! call, so a snapshot can be taken at any time (it shows `Loading` while
//! a refresh is in flight). Every failure is logged and reported once
//! through the injected [`Notifier`]; an `Err` returned from a method has
//! already been reported.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError};

use catalog_client::CatalogApi;
use shared::{Category, Product, Subcategory};
use tokio::sync::RwLock;

use crate::draft::EditDraft;
use crate::error::{ControllerError, ControllerResult};
use crate::notify::{Notice, Notifier};
use crate::prompt::ConfirmPrompt;
use crate::view::{self, CategoryFilter, FilterState, ImageSource, ProductCard, SortKey};

/// Phase without its payload, for display and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Loading,
    Ready,
    Editing,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PhaseKind::Loading => "loading",
            PhaseKind::Ready => "ready",
            PhaseKind::Editing => "editing",
        })
    }
}

/// Controller phase
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    Ready,
    Editing(EditSession),
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Loading => PhaseKind::Loading,
            Phase::Ready => PhaseKind::Ready,
            Phase::Editing(_) => PhaseKind::Editing,
        }
    }
}

/// An open edit of one product
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    product_id: String,
    draft: EditDraft,
    /// Subcategories of the draft's current category
    subcategories: Vec<Subcategory>,
    /// Ticket of the subcategory fetch whose result is still wanted
    pending_subcategories: Option<u64>,
    submitting: bool,
    error: Option<String>,
}

impl EditSession {
    fn new(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            draft: EditDraft::from_product(product),
            subcategories: Vec::new(),
            pending_subcategories: None,
            submitting: false,
            error: None,
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn draft(&self) -> &EditDraft {
        &self.draft
    }

    pub fn subcategories(&self) -> &[Subcategory] {
        &self.subcategories
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Outcome of a reload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// A newer reload finished first; nothing was applied
    pub stale: bool,
    pub products_error: Option<String>,
    pub categories_error: Option<String>,
}

impl ReloadReport {
    pub fn is_clean(&self) -> bool {
        !self.stale && self.products_error.is_none() && self.categories_error.is_none()
    }
}

/// Outcome of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The operator declined; nothing was sent
    Cancelled,
    Removed,
}

/// Read-only picture of the draft for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct EditView {
    pub product_id: String,
    pub draft: EditDraft,
    pub subcategories: Vec<Subcategory>,
    pub loading_subcategories: bool,
    pub submitting: bool,
    pub error: Option<String>,
}

/// Owned snapshot of everything the list screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub phase: PhaseKind,
    pub cards: Vec<ProductCard>,
    pub total: usize,
    pub category_options: Vec<String>,
    pub categories: Vec<Category>,
    pub filter: FilterState,
    pub edit: Option<EditView>,
}

impl ListView {
    pub fn is_loading(&self) -> bool {
        self.phase == PhaseKind::Loading
    }

    pub fn summary(&self) -> String {
        format!("Showing {} of {} products", self.cards.len(), self.total)
    }

    /// Hint shown when no card is visible
    pub fn empty_hint(&self) -> &'static str {
        if self.filter.is_active() {
            "Try adjusting your search or filters"
        } else {
            "Start by adding your first product"
        }
    }
}

#[derive(Debug)]
struct ListState {
    phase: Phase,
    products: Vec<Product>,
    categories: Vec<Category>,
    filter: FilterState,
    /// Products whose image failed to load since the last reload
    failed_images: HashSet<String>,
    /// Ticket of the newest reload whose results were applied
    applied_reload: u64,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            products: Vec::new(),
            categories: Vec::new(),
            filter: FilterState::default(),
            failed_images: HashSet::new(),
            applied_reload: 0,
        }
    }
}

impl ListState {
    fn editing(&mut self, action: &'static str) -> ControllerResult<&mut EditSession> {
        match &mut self.phase {
            Phase::Editing(session) => Ok(session),
            other => Err(ControllerError::InvalidPhase {
                action,
                phase: other.kind(),
            }),
        }
    }

    fn find(&self, id: &str) -> ControllerResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ControllerError::ProductNotFound(id.to_string()))
    }
}

/// Client-side controller of the product list screen
pub struct ListController<C, P, N> {
    api: std::sync::RwLock<Arc<C>>,
    prompt: P,
    notifier: N,
    state: RwLock<ListState>,
    reload_seq: AtomicU64,
    request_seq: AtomicU64,
}

impl<C, P, N> ListController<C, P, N>
where
    C: CatalogApi,
    P: ConfirmPrompt,
    N: Notifier,
{
    /// Create a controller in the `Loading` phase; call [`mount`](Self::mount) to fetch.
    pub fn new(api: C, prompt: P, notifier: N) -> Self {
        Self {
            api: std::sync::RwLock::new(Arc::new(api)),
            prompt,
            notifier,
            state: RwLock::new(ListState::default()),
            reload_seq: AtomicU64::new(0),
            request_seq: AtomicU64::new(0),
        }
    }

    fn api(&self) -> Arc<C> {
        self.api
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn report(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Initial load
    pub async fn mount(&self) -> ReloadReport {
        tracing::info!("Mounting product list");
        self.reload().await
    }

    /// Point the controller at another backend (the API base changed) and reload
    pub async fn switch_api(&self, api: C) -> ReloadReport {
        *self.api.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(api);
        tracing::info!("Catalog API switched, reloading");
        self.reload().await
    }

    /// Fetch products and categories concurrently.
    ///
    /// Each collection is replaced only when its own fetch succeeds. When
    /// reloads overlap, the most recently started one wins.
    pub async fn reload(&self) -> ReloadReport {
        let ticket = self.reload_seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write().await;
            if let Phase::Editing(session) = &state.phase {
                tracing::debug!(product_id = %session.product_id, "Reload discards open draft");
            }
            state.phase = Phase::Loading;
        }

        let api = self.api();
        let (products, categories) = tokio::join!(api.list_products(), api.list_categories());

        let mut report = ReloadReport::default();
        let mut notices = Vec::new();
        {
            let mut state = self.state.write().await;
            if ticket < state.applied_reload {
                tracing::debug!(ticket, applied = state.applied_reload, "Dropping stale reload");
                report.stale = true;
                return report;
            }
            state.applied_reload = ticket;

            match products {
                Ok(list) => {
                    tracing::info!(count = list.len(), "Product list loaded");
                    state.products = list;
                    state.failed_images.clear();
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load product list");
                    let message = e.user_message();
                    notices.push(Notice::error(format!("Failed to load products: {message}")));
                    report.products_error = Some(message);
                }
            }
            match categories {
                Ok(list) => {
                    tracing::debug!(count = list.len(), "Categories loaded");
                    state.categories = list;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load categories");
                    let message = e.user_message();
                    notices.push(Notice::error(format!("Failed to load categories: {message}")));
                    report.categories_error = Some(message);
                }
            }

            if ticket == self.reload_seq.load(Ordering::SeqCst) {
                state.phase = Phase::Ready;
            }
        }

        for notice in notices {
            self.report(notice);
        }
        report
    }

    // ========== Filter / sort ==========

    pub async fn set_search(&self, text: impl Into<String>) {
        self.state.write().await.filter.search = text.into();
    }

    /// Select a category name, or `"all"`
    pub async fn set_category_filter(&self, category: &str) {
        self.state.write().await.filter.category = CategoryFilter::from(category);
    }

    pub async fn set_sort(&self, sort: SortKey) {
        self.state.write().await.filter.sort = sort;
    }

    // ========== Queries ==========

    pub async fn phase(&self) -> PhaseKind {
        self.state.read().await.phase.kind()
    }

    /// Current phase without waiting, `None` while the state is being written
    pub fn try_phase(&self) -> Option<PhaseKind> {
        self.state.try_read().ok().map(|state| state.phase.kind())
    }

    /// Last fetched products, unfiltered
    pub async fn products(&self) -> Vec<Product> {
        self.state.read().await.products.clone()
    }

    /// Derive the current view
    pub async fn snapshot(&self) -> ListView {
        let state = self.state.read().await;
        let cards = view::derive_visible(&state.products, &state.filter)
            .into_iter()
            .map(|product| {
                let mut card = ProductCard::from_product(product);
                if state.failed_images.contains(&product.id) {
                    card.image_failed();
                }
                card
            })
            .collect();
        let edit = match &state.phase {
            Phase::Editing(session) => Some(EditView {
                product_id: session.product_id.clone(),
                draft: session.draft.clone(),
                subcategories: session.subcategories.clone(),
                loading_subcategories: session.pending_subcategories.is_some(),
                submitting: session.submitting,
                error: session.error.clone(),
            }),
            _ => None,
        };
        ListView {
            phase: state.phase.kind(),
            cards,
            total: state.products.len(),
            category_options: view::category_options(&state.products),
            categories: state.categories.clone(),
            filter: state.filter.clone(),
            edit,
        }
    }

    /// Record that a card's image failed to load.
    ///
    /// The card shows the fallback graphic until the next reload. Returns
    /// `false` when it already did (or has no such product), so the caller
    /// never retries a broken image.
    pub async fn image_failed(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        let remote = state
            .products
            .iter()
            .find(|p| p.id == id)
            .is_some_and(|p| matches!(ProductCard::from_product(p).image(), ImageSource::Remote(_)));
        if remote && state.failed_images.insert(id.to_string()) {
            tracing::debug!(product_id = %id, "Image failed, showing fallback");
            true
        } else {
            false
        }
    }

    // ========== Delete ==========

    /// Ask for confirmation, remove the product, then reload.
    ///
    /// The list is reloaded whether or not the server accepted the removal.
    pub async fn delete(&self, id: &str) -> ControllerResult<DeleteOutcome> {
        let name = {
            let state = self.state.read().await;
            match state.phase.kind() {
                PhaseKind::Ready => state.find(id).map(|product| product.name.clone()),
                phase => Err(ControllerError::InvalidPhase {
                    action: "delete",
                    phase,
                }),
            }
        };
        let name = name.map_err(|e| self.reject(e))?;

        if !self
            .prompt
            .confirm(&format!("Are you sure you want to delete \"{name}\"?"))
            .await
        {
            tracing::info!(product_id = %id, "Delete cancelled by operator");
            return Ok(DeleteOutcome::Cancelled);
        }

        let result = self.api().remove_product(id).await;
        self.reload().await;

        match result {
            Ok(_) => {
                self.report(Notice::success(format!("{name} removed successfully")));
                Ok(DeleteOutcome::Removed)
            }
            Err(e) => {
                tracing::error!(product_id = %id, error = %e, "Failed to remove product");
                Err(self.reject(e.into()))
            }
        }
    }

    // ========== Editing ==========

    /// Open a draft for `id`, replacing any unsaved draft, and load the
    /// subcategories of its category.
    pub async fn begin_edit(&self, id: &str) -> ControllerResult<()> {
        let opened = {
            let mut state = self.state.write().await;
            self.open_session(&mut state, id)
        };
        let fetch = opened.map_err(|e| self.reject(e))?;

        if let Some((ticket, category_id)) = fetch {
            self.load_subcategories(ticket, category_id).await;
        }
        Ok(())
    }

    /// Change the draft's category. A new category clears the subcategory
    /// and fetches that category's subcategories once.
    pub async fn set_draft_category(&self, category_id: &str) -> ControllerResult<()> {
        let selected = {
            let mut state = self.state.write().await;
            state.editing("change category").map(|session| {
                if !session.draft.select_category(category_id) {
                    return None;
                }
                session.subcategories.clear();
                self.schedule_subcategories(session)
            })
        };
        let fetch = selected.map_err(|e| self.reject(e))?;

        if let Some((ticket, category_id)) = fetch {
            self.load_subcategories(ticket, category_id).await;
        }
        Ok(())
    }

    /// Pick one of the offered subcategories, or clear it with `""`
    pub async fn set_draft_subcategory(&self, subcategory_id: &str) -> ControllerResult<()> {
        let selected = {
            let mut state = self.state.write().await;
            state.editing("change subcategory").and_then(|session| {
                if !subcategory_id.is_empty()
                    && !session.subcategories.iter().any(|s| s.id == subcategory_id)
                {
                    return Err(ControllerError::UnknownSubcategory(
                        subcategory_id.to_string(),
                    ));
                }
                session.draft.select_subcategory(subcategory_id);
                Ok(())
            })
        };
        selected.map_err(|e| self.reject(e))
    }

    /// Edit the free-text fields of the draft
    pub async fn update_draft<F>(&self, edit: F) -> ControllerResult<()>
    where
        F: FnOnce(&mut EditDraft),
    {
        let edited = {
            let mut state = self.state.write().await;
            state
                .editing("edit draft")
                .map(|session| edit(&mut session.draft))
        };
        edited.map_err(|e| self.reject(e))
    }

    /// Validate and send the draft.
    ///
    /// Success closes the draft and reloads. Any failure keeps the draft
    /// open with the operator's values and records the message on it.
    pub async fn submit(&self) -> ControllerResult<()> {
        let prepared = {
            let mut state = self.state.write().await;
            state.editing("submit").and_then(|session| {
                if session.submitting {
                    return Err(ControllerError::UpdateInFlight);
                }
                match session.draft.to_update() {
                    Ok(update) => {
                        session.submitting = true;
                        session.error = None;
                        Ok((session.product_id.clone(), update))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Draft rejected before submit");
                        session.error = Some(e.to_string());
                        Err(e.into())
                    }
                }
            })
        };
        let (product_id, update) = prepared.map_err(|e| self.reject(e))?;

        let result = self.api().update_product(&product_id, &update).await;

        match result {
            Ok(_) => {
                self.report(Notice::success("Product updated successfully"));
                self.reload().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(product_id = %product_id, error = %e, "Failed to update product");
                let message = e.user_message();
                {
                    let mut state = self.state.write().await;
                    if let Phase::Editing(session) = &mut state.phase {
                        if session.product_id == product_id {
                            session.submitting = false;
                            session.error = Some(message);
                        }
                    }
                }
                Err(self.reject(e.into()))
            }
        }
    }

    /// Discard the draft without any network call
    pub async fn cancel_edit(&self) -> ControllerResult<()> {
        let cancelled = {
            let mut state = self.state.write().await;
            match state.editing("cancel edit") {
                Ok(session) if session.submitting => Err(ControllerError::UpdateInFlight),
                Ok(session) => {
                    tracing::debug!(product_id = %session.product_id, "Edit cancelled");
                    state.phase = Phase::Ready;
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };
        cancelled.map_err(|e| self.reject(e))
    }

    // ========== Internals ==========

    /// Report an error to the operator and hand it back
    fn reject(&self, err: ControllerError) -> ControllerError {
        self.report(Notice::error(err.user_message()));
        err
    }

    /// Replace the phase with a fresh edit of `id`
    fn open_session(
        &self,
        state: &mut ListState,
        id: &str,
    ) -> ControllerResult<Option<(u64, String)>> {
        match &state.phase {
            Phase::Ready => {}
            Phase::Editing(session) if !session.submitting => {
                tracing::debug!(product_id = %session.product_id, "Discarding unsaved draft");
            }
            Phase::Editing(_) => return Err(ControllerError::UpdateInFlight),
            Phase::Loading => {
                return Err(ControllerError::InvalidPhase {
                    action: "edit",
                    phase: PhaseKind::Loading,
                });
            }
        }
        let mut session = EditSession::new(state.find(id)?);
        let fetch = self.schedule_subcategories(&mut session);
        tracing::info!(product_id = %id, "Editing product");
        state.phase = Phase::Editing(session);
        Ok(fetch)
    }

    /// Mark a subcategory fetch as wanted for the draft's category
    fn schedule_subcategories(&self, session: &mut EditSession) -> Option<(u64, String)> {
        let category_id = session.draft.category();
        if category_id.is_empty() {
            session.pending_subcategories = None;
            return None;
        }
        let ticket = self.request_seq.fetch_add(1, Ordering::SeqCst) + 1;
        session.pending_subcategories = Some(ticket);
        Some((ticket, category_id.to_string()))
    }

    async fn load_subcategories(&self, ticket: u64, category_id: String) {
        let result = self.api().list_subcategories(&category_id).await;

        let notice = {
            let mut state = self.state.write().await;
            let Phase::Editing(session) = &mut state.phase else {
                tracing::debug!(%category_id, "Edit closed before subcategories arrived");
                return;
            };
            if session.pending_subcategories != Some(ticket) {
                tracing::debug!(%category_id, "Dropping stale subcategories");
                return;
            }
            session.pending_subcategories = None;
            match result {
                Ok(list) => {
                    session.subcategories = list
                        .into_iter()
                        .filter(|s| !s.belongs_elsewhere(&category_id))
                        .collect();
                    tracing::debug!(%category_id, count = session.subcategories.len(), "Subcategories loaded");
                    None
                }
                Err(e) => {
                    tracing::error!(%category_id, error = %e, "Failed to load subcategories");
                    Some(Notice::error(format!(
                        "Failed to load subcategories: {}",
                        e.user_message()
                    )))
                }
            }
        };

        if let Some(notice) = notice {
            self.report(notice);
        }
    }
}
