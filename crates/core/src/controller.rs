//! The reconciliation loop of one open journal page.
//!
//! Three kinds of input drive it: snapshots pushed by the store, UI events
//! (filter edits, calendar navigation) and CRUD requests. Each one is a pure
//! state transition followed by a fresh render. CRUD requests never touch
//! local state directly; their effect shows up with the next snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::actions::{plan_command, ActionError, EntryCommand, Mutation, Plan, SkipReason};
use crate::auth::{AuthClient, Credentials, Identity};
use crate::entry::EntryId;
use crate::state::{JournalEvent, JournalState};
use crate::store::EntryStore;
use crate::view::{render, JournalView, RenderContext};

/// Something the page asks the controller to do.
#[derive(Debug, Clone)]
pub enum Input {
    Event(JournalEvent),
    Command(EntryCommand),
}

/// Something the page should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    View(Box<JournalView>),
    /// The action failed; the previous view stays valid.
    Rejected(ActionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The store acknowledged the mutation on this id.
    Submitted { id: EntryId },
    /// No store call was made.
    Skipped(SkipReason),
}

pub struct JournalController<S: ?Sized, A: ?Sized> {
    store: Arc<S>,
    auth: Arc<A>,
    state: JournalState,
    clock: fn() -> DateTime<Utc>,
}

impl<S, A> JournalController<S, A>
where
    S: EntryStore + ?Sized,
    A: AuthClient + ?Sized,
{
    pub fn new(store: Arc<S>, auth: Arc<A>, state: JournalState) -> Self {
        Self {
            store,
            auth,
            state,
            clock: Utc::now,
        }
    }

    /// Replaces the time source used for new entries and "today".
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &JournalState {
        &self.state
    }

    /// Renders the current state. Authentication is read now, not cached.
    pub fn render(&self) -> JournalView {
        render(
            &self.state,
            RenderContext {
                authenticated: self.auth.current_user().is_some(),
                today: (self.clock)().date_naive(),
            },
        )
    }

    /// Applies an event and re-renders.
    pub fn dispatch(&mut self, event: JournalEvent) -> JournalView {
        let month = self.state.month;
        let state = std::mem::replace(&mut self.state, JournalState::new(month));
        self.state = state.apply(event);
        self.render()
    }

    /// Checks and issues a CRUD request.
    ///
    /// On failure nothing local changes. A successful create resets the filter.
    pub async fn execute(&mut self, command: EntryCommand) -> Result<CommandOutcome, ActionError> {
        let identity = self.auth.current_user();
        let plan = plan_command(command, &self.state.cache, identity.as_ref(), (self.clock)())
            .inspect_err(|err| tracing::warn!(error = %err, "Command rejected"))?;

        let mutation = match plan {
            Plan::Apply(mutation) => mutation,
            Plan::Skip(reason) => {
                tracing::debug!(?reason, "Command skipped");
                return Ok(CommandOutcome::Skipped(reason));
            }
        };

        let outcome = match mutation {
            Mutation::Add(entry) => {
                let id = self.store.add(entry).await.inspect_err(log_store_error)?;
                tracing::info!(entry_id = %id, "Entry submitted");
                self.dispatch(JournalEvent::EntryCreated);
                CommandOutcome::Submitted { id }
            }
            Mutation::Update { id, patch } => {
                self.store
                    .update(&id, patch)
                    .await
                    .inspect_err(log_store_error)?;
                tracing::info!(entry_id = %id, "Entry update submitted");
                CommandOutcome::Submitted { id }
            }
            Mutation::Delete { id } => {
                self.store.delete(&id).await.inspect_err(log_store_error)?;
                tracing::info!(entry_id = %id, "Entry deletion submitted");
                CommandOutcome::Submitted { id }
            }
        };

        Ok(outcome)
    }

    pub async fn sign_in(&self, credentials: Credentials) -> Result<Identity, ActionError> {
        let credentials = credentials.validated()?;
        let identity = self
            .auth
            .sign_in(&credentials)
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "Sign-in failed"))?;
        tracing::info!(email = %identity.email, "Signed in");
        Ok(identity)
    }

    pub async fn sign_out(&self) -> Result<(), ActionError> {
        self.auth.sign_out().await?;
        Ok(())
    }

    /// Runs the page loop until inputs close, the store subscription ends,
    /// or nobody listens for updates. Inputs are handled one at a time.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<Input>,
        updates: mpsc::Sender<Update>,
    ) -> Result<(), ActionError> {
        let mut snapshots = self.store.subscribe().await?;
        let mut auth_changes = self.auth.on_auth_state_changed();

        let initial = snapshots.borrow_and_update().clone();
        let view = self.dispatch(JournalEvent::SnapshotReceived(initial));
        if updates.send(Update::View(Box::new(view))).await.is_err() {
            return Ok(());
        }

        loop {
            let update = tokio::select! {
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        tracing::info!("Entry store closed the subscription");
                        break;
                    }
                    let snapshot = snapshots.borrow_and_update().clone();
                    tracing::debug!(
                        version = snapshot.version,
                        documents = snapshot.documents.len(),
                        "Snapshot received"
                    );
                    Update::View(Box::new(self.dispatch(JournalEvent::SnapshotReceived(snapshot))))
                }
                changed = auth_changes.changed() => {
                    if changed.is_err() {
                        tracing::info!("Auth client closed");
                        break;
                    }
                    let signed_in = auth_changes.borrow_and_update().is_some();
                    tracing::debug!(signed_in, "Auth state changed");
                    Update::View(Box::new(self.render()))
                }
                input = inputs.recv() => {
                    let Some(input) = input else {
                        break;
                    };
                    match self.handle(input).await {
                        Ok(view) => Update::View(Box::new(view)),
                        Err(err) => Update::Rejected(err),
                    }
                }
            };

            if updates.send(update).await.is_err() {
                tracing::debug!("Update receiver dropped");
                break;
            }
        }

        Ok(())
    }

    async fn handle(&mut self, input: Input) -> Result<JournalView, ActionError> {
        match input {
            Input::Event(event) => Ok(self.dispatch(event)),
            Input::Command(command) => {
                self.execute(command).await?;
                Ok(self.render())
            }
        }
    }
}

fn log_store_error(err: &crate::store::StoreError) {
    tracing::error!(error = %err, "Entry store rejected the mutation");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::TimeZone;
    use tokio::sync::watch;

    use crate::actions::EditChanges;
    use crate::auth::{self, AuthError};
    use crate::calendar::{CalendarMonth, MonthStep};
    use crate::entry::{
        parse_timestamp, DocumentFields, EntryDocument, EntryPatch, NewEntry, NewEntryDraft,
        RawDate, Snapshot,
    };
    use crate::filter::{Filter, FilterChange};
    use crate::store::{self, StoreError};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()
    }

    struct MockStore {
        snapshots: watch::Sender<Snapshot>,
        documents: Mutex<Vec<EntryDocument>>,
        calls: AtomicUsize,
        failure: Option<StoreError>,
    }

    impl MockStore {
        fn new(documents: Vec<EntryDocument>) -> Self {
            let (snapshots, _) = watch::channel(Snapshot {
                version: 1,
                documents: documents.clone(),
            });
            Self {
                snapshots,
                documents: Mutex::new(documents),
                calls: AtomicUsize::new(0),
                failure: None,
            }
        }

        fn failing(mut self, err: StoreError) -> Self {
            self.failure = Some(err);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn begin(&self) -> store::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.failure {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        fn push(&self) {
            let documents = self.documents.lock().unwrap().clone();
            self.snapshots.send_modify(|snapshot| {
                snapshot.version += 1;
                snapshot.documents = documents;
            });
        }
    }

    #[async_trait]
    impl EntryStore for MockStore {
        async fn subscribe(&self) -> store::Result<watch::Receiver<Snapshot>> {
            Ok(self.snapshots.subscribe())
        }

        async fn add(&self, entry: NewEntry) -> store::Result<EntryId> {
            self.begin()?;
            let id = EntryId::new(format!("doc-{}", self.calls()));
            self.documents.lock().unwrap().insert(
                0,
                EntryDocument {
                    id: id.clone(),
                    fields: entry.into(),
                },
            );
            self.push();
            Ok(id)
        }

        async fn update(&self, id: &EntryId, patch: EntryPatch) -> store::Result<()> {
            self.begin()?;
            {
                let mut documents = self.documents.lock().unwrap();
                let doc = documents
                    .iter_mut()
                    .find(|d| &d.id == id)
                    .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
                patch.apply_to(&mut doc.fields);
            }
            self.push();
            Ok(())
        }

        async fn delete(&self, id: &EntryId) -> store::Result<()> {
            self.begin()?;
            self.documents.lock().unwrap().retain(|d| &d.id != id);
            self.push();
            Ok(())
        }
    }

    struct MockAuth {
        identity: watch::Sender<Option<Identity>>,
    }

    impl MockAuth {
        fn signed_out() -> Self {
            let (identity, _) = watch::channel(None);
            Self { identity }
        }

        fn signed_in() -> Self {
            let auth = Self::signed_out();
            auth.identity.send_replace(Some(Identity {
                email: "admin@example.com".to_string(),
            }));
            auth
        }
    }

    #[async_trait]
    impl AuthClient for MockAuth {
        async fn sign_in(&self, credentials: &Credentials) -> auth::Result<Identity> {
            if credentials.password != "secret" {
                return Err(AuthError::InvalidCredentials);
            }
            let identity = Identity {
                email: credentials.email.clone(),
            };
            self.identity.send_replace(Some(identity.clone()));
            Ok(identity)
        }

        async fn sign_out(&self) -> auth::Result<()> {
            self.identity.send_replace(None);
            Ok(())
        }

        fn current_user(&self) -> Option<Identity> {
            self.identity.borrow().clone()
        }

        fn on_auth_state_changed(&self) -> watch::Receiver<Option<Identity>> {
            self.identity.subscribe()
        }
    }

    fn seed() -> Vec<EntryDocument> {
        vec![
            EntryDocument {
                id: EntryId::new("walk"),
                fields: DocumentFields {
                    title: Some("Walk".to_string()),
                    content: Some("Park".to_string()),
                    tags: Some(vec!["outside".to_string()]),
                    date: Some(RawDate::Text("2024-03-05T10:00:00.000Z".to_string())),
                },
            },
            EntryDocument {
                id: EntryId::new("read"),
                fields: DocumentFields {
                    title: Some("Read".to_string()),
                    content: None,
                    tags: None,
                    date: Some(RawDate::Timestamp {
                        seconds: 1_709_280_000,
                        nanos: 0,
                    }),
                },
            },
        ]
    }

    async fn controller(
        store: Arc<MockStore>,
        auth: Arc<MockAuth>,
    ) -> JournalController<MockStore, MockAuth> {
        let mut controller = JournalController::new(
            store.clone(),
            auth,
            JournalState::new(CalendarMonth::new(2024, 3).unwrap()),
        )
        .with_clock(fixed_now);
        let snapshot = store.subscribe().await.unwrap().borrow().clone();
        controller.dispatch(JournalEvent::SnapshotReceived(snapshot));
        controller
    }

    #[tokio::test]
    async fn unauthenticated_delete_makes_no_store_call() {
        let store = Arc::new(MockStore::new(seed()));
        let mut controller = controller(store.clone(), Arc::new(MockAuth::signed_out())).await;

        let result = controller
            .execute(EntryCommand::Delete {
                id: EntryId::new("walk"),
            })
            .await;

        assert_eq!(result, Err(ActionError::Unauthorized));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn unauthenticated_edit_makes_no_store_call() {
        let store = Arc::new(MockStore::new(seed()));
        let mut controller = controller(store.clone(), Arc::new(MockAuth::signed_out())).await;

        let result = controller
            .execute(EntryCommand::Edit {
                id: EntryId::new("walk"),
                changes: EditChanges {
                    title: Some("Run".to_string()),
                    ..EditChanges::default()
                },
            })
            .await;

        assert_eq!(result, Err(ActionError::Unauthorized));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_id_is_a_silent_no_op() {
        let store = Arc::new(MockStore::new(seed()));
        let mut controller = controller(store.clone(), Arc::new(MockAuth::signed_in())).await;

        let result = controller
            .execute(EntryCommand::Delete {
                id: EntryId::new("missing"),
            })
            .await;

        assert_eq!(result, Ok(CommandOutcome::Skipped(SkipReason::NotFound)));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn added_entry_comes_back_with_the_next_snapshot() {
        let store = Arc::new(MockStore::new(seed()));
        let mut controller = controller(store.clone(), Arc::new(MockAuth::signed_in())).await;
        controller.dispatch(JournalEvent::FilterChanged(FilterChange::Tag {
            tag: "outside".to_string(),
        }));
        let mut snapshots = store.subscribe().await.unwrap();

        let outcome = controller
            .execute(EntryCommand::Create(NewEntryDraft {
                title: "Dinner".to_string(),
                content: "Soup".to_string(),
                tags: "a, b".to_string(),
            }))
            .await
            .unwrap();

        // Successful add resets the filter but does not touch the cache.
        assert_eq!(controller.state().filter, Filter::default());
        assert_eq!(controller.state().cache.len(), 2);

        let CommandOutcome::Submitted { id } = outcome else {
            panic!("expected submission");
        };

        snapshots.changed().await.unwrap();
        let snapshot = snapshots.borrow_and_update().clone();
        controller.dispatch(JournalEvent::SnapshotReceived(snapshot));

        let entry = controller.state().cache.get(&id).unwrap();
        let mut tags = entry.tags.clone();
        tags.sort();
        assert_eq!(tags, vec!["a".to_string(), "b".to_string()]);
        assert!(parse_timestamp(entry.date.as_deref().unwrap()).is_some());
        assert_eq!(entry.date.as_deref(), Some("2024-03-09T12:00:00.000Z"));
    }

    #[tokio::test]
    async fn dispatch_keeps_the_month_unless_navigating() {
        let mut controller = controller(
            Arc::new(MockStore::new(seed())),
            Arc::new(MockAuth::signed_out()),
        )
        .await;
        let march = CalendarMonth::new(2024, 3).unwrap();

        controller.dispatch(JournalEvent::FilterChanged(FilterChange::Clear));
        assert_eq!(controller.state().month, march);
        assert_eq!(controller.state().cache.len(), 2);

        controller.dispatch(JournalEvent::MonthNavigated(MonthStep::Next));
        assert_eq!(controller.state().month, march.next());
    }

    #[tokio::test]
    async fn remote_failure_leaves_state_unchanged() {
        let store = Arc::new(
            MockStore::new(seed()).failing(StoreError::PermissionDenied("read-only".into())),
        );
        let mut controller = controller(store.clone(), Arc::new(MockAuth::signed_in())).await;
        controller.dispatch(JournalEvent::FilterChanged(FilterChange::Search {
            date: None,
            text: "park".to_string(),
        }));
        let before = controller.state().clone();

        let result = controller
            .execute(EntryCommand::Create(NewEntryDraft {
                title: "Nope".to_string(),
                ..NewEntryDraft::default()
            }))
            .await;

        assert_eq!(
            result,
            Err(ActionError::Store(StoreError::PermissionDenied(
                "read-only".into()
            )))
        );
        assert_eq!(store.calls(), 1);
        assert_eq!(controller.state(), &before);
    }

    #[tokio::test]
    async fn render_reads_auth_state_each_time() {
        let store = Arc::new(MockStore::new(seed()));
        let auth = Arc::new(MockAuth::signed_out());
        let controller = controller(store, auth.clone()).await;

        assert!(controller.render().cards()[0].actions.is_empty());

        controller
            .sign_in(Credentials::new("admin@example.com", "secret"))
            .await
            .unwrap();
        assert_eq!(controller.render().cards()[0].actions.len(), 3);

        controller.sign_out().await.unwrap();
        assert!(controller.render().cards()[0].actions.is_empty());
    }

    #[tokio::test]
    async fn sign_in_validates_before_calling_auth() {
        let controller = controller(
            Arc::new(MockStore::new(seed())),
            Arc::new(MockAuth::signed_out()),
        )
        .await;

        assert_eq!(
            controller.sign_in(Credentials::new("", "")).await,
            Err(crate::entry::ValidationError::MissingCredentials.into())
        );
        assert_eq!(
            controller
                .sign_in(Credentials::new("admin@example.com", "wrong"))
                .await,
            Err(AuthError::InvalidCredentials.into())
        );
    }

    async fn next_view(updates: &mut mpsc::Receiver<Update>) -> JournalView {
        loop {
            let update = tokio::time::timeout(Duration::from_secs(2), updates.recv())
                .await
                .expect("timed out waiting for update")
                .expect("controller stopped");
            if let Update::View(view) = update {
                return *view;
            }
        }
    }

    #[tokio::test]
    async fn run_loop_reconciles_pushes_and_inputs() {
        let store = Arc::new(MockStore::new(seed()));
        let auth = Arc::new(MockAuth::signed_out());
        let controller = JournalController::new(
            store.clone(),
            auth.clone(),
            JournalState::new(CalendarMonth::new(2024, 3).unwrap()),
        )
        .with_clock(fixed_now);

        let (input_tx, input_rx) = mpsc::channel(8);
        let (update_tx, mut update_rx) = mpsc::channel(8);
        let handle = tokio::spawn(controller.run(input_rx, update_tx));

        let initial = next_view(&mut update_rx).await;
        assert_eq!(initial.cards().len(), 2);
        assert!(!initial.authenticated);

        input_tx
            .send(Input::Event(JournalEvent::FilterChanged(FilterChange::Tag {
                tag: "OUTSIDE".to_string(),
            })))
            .await
            .unwrap();
        let filtered = next_view(&mut update_rx).await;
        assert_eq!(filtered.visible_ids(), vec![&EntryId::new("walk")]);

        input_tx
            .send(Input::Command(EntryCommand::Delete {
                id: EntryId::new("walk"),
            }))
            .await
            .unwrap();
        let rejected = tokio::time::timeout(Duration::from_secs(2), update_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rejected, Update::Rejected(ActionError::Unauthorized));
        assert_eq!(store.calls(), 0);

        // Signing in elsewhere reaches the loop through the auth watch.
        auth.sign_in(&Credentials::new("admin@example.com", "secret"))
            .await
            .unwrap();
        loop {
            if next_view(&mut update_rx).await.authenticated {
                break;
            }
        }

        input_tx
            .send(Input::Command(EntryCommand::Delete {
                id: EntryId::new("walk"),
            }))
            .await
            .unwrap();
        loop {
            let view = next_view(&mut update_rx).await;
            if view.cards().is_empty() {
                assert_eq!(view.heading, "Entries tagged \"OUTSIDE\"");
                break;
            }
        }
        assert_eq!(store.calls(), 1);

        drop(input_tx);
        handle.await.unwrap().unwrap();
    }
}
