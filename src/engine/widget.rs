//! The consent widget.
//!
//! [`ConsentWidget`] owns every part of one widget instance: the consent
//! store, both dialogs, the element bindings and the host callbacks. All
//! state changes go through `&mut self`, so reactions to visitor input and to
//! the presentation timer never overlap.
//!
//! A widget can be driven synchronously (call [`ConsentWidget::activate`] /
//! [`ConsentWidget::dispatch`] and poll the presentation timer with
//! [`ConsentWidget::poll_presentation`]) or moved onto a tokio task with
//! [`ConsentWidget::start`], after which it is driven through a
//! [`WidgetHandle`].

use std::collections::HashMap;
use std::fmt::Display;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::engine::categories::CategoryId;
use crate::engine::config::{ConsentConfig, WidgetOptions};
use crate::engine::consent_store::ConsentStore;
use crate::engine::cookies::CookieJarHandle;
use crate::engine::dialog::{DialogKind, Transition, Visibility};
use crate::engine::errors::ConsentError;
use crate::engine::events::{Decision, UserAction, WidgetCommand, WidgetEvent, WidgetSnapshot};
use crate::engine::handle::WidgetHandle;
use crate::engine::prompt::{ConsentPrompt, PROMPT_ACCEPT_ID, PROMPT_REJECT_ID};
use crate::engine::settings::{
    SettingsDialog, SETTINGS_ACCEPT_ID, SETTINGS_CLOSE_ID, SETTINGS_REJECT_ID, SETTINGS_SAVE_ID,
};
use crate::engine::view::{MountPoint, WidgetContainer};
use crate::engine::DEFAULT_CHANNEL_CAPACITY;

/// Unique identifier of a widget instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(Uuid);

impl WidgetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for WidgetId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host callback receiving the categories of a decision.
pub type CategoryCallback = Box<dyn FnMut(&[CategoryId]) + Send>;

/// The three host callbacks. Each decision invokes exactly one of them, once,
/// after the record is stored and both dialogs are hidden.
pub struct ConsentCallbacks {
    on_accept_all: CategoryCallback,
    on_reject_all: CategoryCallback,
    on_apply_settings: CategoryCallback,
}

impl ConsentCallbacks {
    pub fn new<A, R, S>(on_accept_all: A, on_reject_all: R, on_apply_settings: S) -> Self
    where
        A: FnMut(&[CategoryId]) + Send + 'static,
        R: FnMut(&[CategoryId]) + Send + 'static,
        S: FnMut(&[CategoryId]) + Send + 'static,
    {
        Self {
            on_accept_all: Box::new(on_accept_all),
            on_reject_all: Box::new(on_reject_all),
            on_apply_settings: Box::new(on_apply_settings),
        }
    }

    /// Callbacks that ignore every decision.
    pub fn noop() -> Self {
        Self::new(|_| {}, |_| {}, |_| {})
    }

    fn invoke(&mut self, decision: Decision, categories: &[CategoryId]) {
        match decision {
            Decision::AcceptAll => (self.on_accept_all)(categories),
            Decision::RejectAll => (self.on_reject_all)(categories),
            Decision::ApplySettings => (self.on_apply_settings)(categories),
        }
    }
}

impl std::fmt::Debug for ConsentCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentCallbacks").finish_non_exhaustive()
    }
}

pub struct ConsentWidget {
    id: WidgetId,
    options: WidgetOptions,
    /// Single owner of the consent record
    store: ConsentStore,
    prompt: ConsentPrompt,
    settings: SettingsDialog,
    container: WidgetContainer,
    mount: Box<dyn MountPoint>,
    callbacks: ConsentCallbacks,
    /// Element id (or trigger marker) → action. Empty until wired.
    bindings: HashMap<String, UserAction>,
    wired: bool,
    /// When the consent prompt should be presented
    presentation_at: Option<Instant>,
    event_tx: broadcast::Sender<WidgetEvent>,
}

impl std::fmt::Debug for ConsentWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentWidget")
            .field("id", &self.id)
            .field("store", &self.store)
            .field("prompt", &self.prompt.visibility())
            .field("settings", &self.settings.visibility())
            .field("mount", &self.mount.name())
            .field("wired", &self.wired)
            .field("presentation_at", &self.presentation_at)
            .finish_non_exhaustive()
    }
}

impl ConsentWidget {
    /// Builds both dialogs from `config` and attaches the container to `mount`.
    ///
    /// Nothing is shown yet; call [`present_after_delay`](Self::present_after_delay)
    /// and [`wire_interactions`](Self::wire_interactions) afterwards.
    pub fn initialize(
        mut mount: Box<dyn MountPoint>,
        config: ConsentConfig,
        options: WidgetOptions,
        jar: CookieJarHandle,
        callbacks: ConsentCallbacks,
    ) -> Result<Self, ConsentError> {
        options.validate()?;

        let id = WidgetId::new();
        let container = WidgetContainer::build(id, &config, &options.settings_trigger);
        let settings = SettingsDialog::new(config.settings);
        let prompt = ConsentPrompt::new(config.consent);
        let store = ConsentStore::new(
            options.storage_key.clone(),
            options.host.clone(),
            settings.always_enabled_category_ids(),
            jar,
        );

        mount
            .attach(&container)
            .map_err(|e| ConsentError::Mount(format!("{:#}", e)))?;
        log::info!("consent widget {} mounted on {} for {}", id, mount.name(), store.scope());

        let (event_tx, _) = broadcast::channel::<WidgetEvent>(DEFAULT_CHANNEL_CAPACITY);

        Ok(Self {
            id,
            options,
            store,
            prompt,
            settings,
            container,
            mount,
            callbacks,
            bindings: HashMap::new(),
            wired: false,
            presentation_at: None,
            event_tx,
        })
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    pub fn store(&self) -> &ConsentStore {
        &self.store
    }

    pub fn prompt(&self) -> &ConsentPrompt {
        &self.prompt
    }

    pub fn settings(&self) -> &SettingsDialog {
        &self.settings
    }

    pub fn container(&self) -> &WidgetContainer {
        &self.container
    }

    pub fn is_wired(&self) -> bool {
        self.wired
    }

    pub fn presentation_pending(&self) -> bool {
        self.presentation_at.is_some()
    }

    /// Subscribes to the events of this widget.
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.event_tx.subscribe()
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            widget: self.id,
            prompt: self.prompt.visibility(),
            settings: self.settings.visibility(),
            toggles: self
                .settings
                .controls()
                .iter()
                .map(|c| (c.category.clone(), c.is_checked()))
                .collect(),
            stored: self.store.stored_categories(),
            wired: self.wired,
            presentation_pending: self.presentation_pending(),
        }
    }

    fn emit(&self, event: WidgetEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    fn emit_transition(&self, dialog: DialogKind, transition: Transition) {
        match transition {
            Transition::Changed(Visibility::Shown) => {
                self.emit(WidgetEvent::DialogShown { widget: self.id, dialog })
            }
            Transition::Changed(Visibility::Hidden) => {
                self.emit(WidgetEvent::DialogHidden { widget: self.id, dialog })
            }
            Transition::Unchanged(_) | Transition::Blocked => {}
        }
    }

    /// Schedules the consent prompt after the configured
    /// [`presentation_delay`](WidgetOptions::presentation_delay).
    pub fn present(&mut self) {
        self.present_after_delay(self.options.presentation_delay);
    }

    /// Schedules the consent prompt `delay` from now. A later call replaces
    /// the schedule.
    pub fn present_after_delay(&mut self, delay: Duration) {
        self.presentation_at = Some(Instant::now() + delay);
    }

    /// Presents the prompt if the scheduled time has been reached.
    ///
    /// Returns `None` when nothing was due.
    pub fn poll_presentation(&mut self, now: Instant) -> Option<Transition> {
        match self.presentation_at {
            Some(at) if at <= now => {
                self.presentation_at = None;
                Some(self.present_now())
            }
            _ => None,
        }
    }

    /// Shows the prompt right away, subject to the "no prior consent" guard.
    pub fn present_now(&mut self) -> Transition {
        let transition = self.prompt.show(&self.store);
        if transition == Transition::Blocked {
            self.emit(WidgetEvent::PresentationSkipped { widget: self.id });
        }
        self.emit_transition(DialogKind::Prompt, transition);
        transition
    }

    /// Binds the dialog buttons and the settings trigger marker to their actions.
    pub fn wire_interactions(&mut self) {
        let bindings = [
            (PROMPT_ACCEPT_ID, UserAction::AcceptAll(DialogKind::Prompt)),
            (PROMPT_REJECT_ID, UserAction::RejectAll(DialogKind::Prompt)),
            (SETTINGS_ACCEPT_ID, UserAction::AcceptAll(DialogKind::Settings)),
            (SETTINGS_REJECT_ID, UserAction::RejectAll(DialogKind::Settings)),
            (SETTINGS_SAVE_ID, UserAction::SaveSettings),
            (SETTINGS_CLOSE_ID, UserAction::CloseSettings),
        ];
        for (element, action) in bindings {
            self.bindings.insert(element.to_string(), action);
        }
        self.bindings
            .insert(self.options.settings_trigger.clone(), UserAction::OpenSettings);
        self.wired = true;
    }

    /// Activates the element with the given id or trigger marker.
    ///
    /// Returns `false` if the element is not bound to anything.
    pub fn activate(&mut self, element: &str) -> bool {
        let Some(action) = self.bindings.get(element).cloned() else {
            log::debug!("widget {}: no action bound to {:?}", self.id, element);
            return false;
        };
        self.dispatch(action);
        true
    }

    /// Applies a user action.
    ///
    /// Button actions are ignored until [`wire_interactions`](Self::wire_interactions)
    /// ran. Toggle and panel clicks belong to the controls and always apply.
    pub fn dispatch(&mut self, action: UserAction) {
        let needs_wiring = !matches!(action, UserAction::ToggleCategory(_) | UserAction::ToggleDetails(_));
        if needs_wiring && !self.wired {
            log::debug!("widget {}: ignoring {:?} before interactions are wired", self.id, action);
            return;
        }

        match action {
            UserAction::AcceptAll(_) => {
                let categories = self.settings.all_category_ids();
                self.decide(Decision::AcceptAll, categories);
            }
            UserAction::RejectAll(_) => {
                let categories = self.settings.always_enabled_category_ids();
                self.decide(Decision::RejectAll, categories);
            }
            UserAction::SaveSettings => {
                let categories = self.settings.accepted_category_ids();
                self.decide(Decision::ApplySettings, categories);
            }
            UserAction::OpenSettings => {
                let transition = self.settings.show(&self.store);
                self.emit_transition(DialogKind::Settings, transition);
            }
            UserAction::CloseSettings => {
                let transition = self.settings.hide();
                self.emit_transition(DialogKind::Settings, transition);
            }
            UserAction::ToggleCategory(category) => {
                if let Some(checked) = self.settings.toggle_category(&category) {
                    self.emit(WidgetEvent::ToggleChanged { widget: self.id, category, checked });
                }
            }
            UserAction::ToggleDetails(category) => {
                if let Some(panel) = self.settings.toggle_details(&category) {
                    self.emit(WidgetEvent::DetailsToggled { widget: self.id, category, panel });
                }
            }
        }
    }

    /// Store, hide both dialogs, then notify the host.
    fn decide(&mut self, decision: Decision, categories: Vec<CategoryId>) {
        log::info!("widget {}: {} {:?}", self.id, decision, categories);

        self.store.write_categories(&categories);
        self.emit(WidgetEvent::ConsentStored { widget: self.id, categories: categories.clone() });

        self.hide_all();

        self.callbacks.invoke(decision, &categories);
        self.emit(WidgetEvent::DecisionApplied { widget: self.id, decision, categories });
    }

    fn hide_all(&mut self) {
        let transition = self.prompt.hide();
        self.emit_transition(DialogKind::Prompt, transition);
        let transition = self.settings.hide();
        self.emit_transition(DialogKind::Settings, transition);
    }

    /// Cancels a pending presentation, hides both dialogs and detaches the container.
    pub fn teardown(mut self) {
        self.presentation_at = None;
        self.hide_all();
        self.mount.detach(&self.container);
        log::info!("consent widget {} torn down", self.id);
        self.emit(WidgetEvent::TornDown { widget: self.id });
    }

    /// Moves the widget onto a tokio task and returns a handle to it.
    pub fn start(self) -> (WidgetHandle, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WidgetCommand>(DEFAULT_CHANNEL_CAPACITY);
        let handle = WidgetHandle::new(self.id, cmd_tx, self.event_tx.clone());
        let join_handle = tokio::spawn(self.run(cmd_rx));
        (handle, join_handle)
    }

    /// Runs the widget until it is torn down or every command sender is dropped.
    ///
    /// The pending presentation fires on time while commands are processed.
    pub async fn run(mut self, mut cmd_rx: mpsc::Receiver<WidgetCommand>) {
        let reply = loop {
            let presentation_at = self.presentation_at;

            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(cmd) => {
                        if let Some(reply) = self.handle_command(cmd) {
                            break Some(reply);
                        }
                    }
                    None => {
                        log::debug!("widget {}: all handles dropped", self.id);
                        break None;
                    }
                },
                _ = async {
                    match presentation_at {
                        Some(at) => tokio::time::sleep_until(at).await,
                        None => std::future::pending().await,
                    }
                } => {
                    self.poll_presentation(Instant::now());
                }
            }
        };

        self.teardown();
        if let Some(reply) = reply {
            let _ = reply.send(());
        }
    }

    /// Applies one command. Returns the reply channel of a teardown request,
    /// which the run loop answers once the widget is gone.
    fn handle_command(&mut self, cmd: WidgetCommand) -> Option<oneshot::Sender<()>> {
        match cmd {
            WidgetCommand::Dispatch(action) => self.dispatch(action),
            WidgetCommand::Activate(element) => {
                self.activate(&element);
            }
            WidgetCommand::PresentAfterDelay(delay) => self.present_after_delay(delay),
            WidgetCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            WidgetCommand::Teardown { reply } => return Some(reply),
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{SettingsBlock, SettingsText, ToggleBlock, WidgetOptionsError};
    use crate::engine::cookies::{Cookie, CookieJar, DefaultCookieJar};
    use crate::engine::view::NullMount;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<(Decision, Vec<CategoryId>)>>>;

    fn toggle_block(value: &str, enabled: bool, readonly: bool) -> SettingsBlock {
        SettingsBlock {
            title: value.to_string(),
            toggle: Some(ToggleBlock { value: value.to_string(), enabled, readonly }),
            ..Default::default()
        }
    }

    fn config() -> ConsentConfig {
        ConsentConfig {
            settings: SettingsText {
                blocks: vec![
                    SettingsBlock { title: "Cookie usage".into(), ..Default::default() },
                    toggle_block("necessary", true, true),
                    toggle_block("analytics", false, false),
                    toggle_block("targeting", false, false),
                    SettingsBlock { title: "More information".into(), ..Default::default() },
                ],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn ids(v: &[&str]) -> Vec<CategoryId> {
        v.iter().map(|s| CategoryId::from(*s)).collect()
    }

    fn recording_callbacks(calls: &Calls) -> ConsentCallbacks {
        let (a, r, s) = (calls.clone(), calls.clone(), calls.clone());
        ConsentCallbacks::new(
            move |c| a.lock().unwrap().push((Decision::AcceptAll, c.to_vec())),
            move |c| r.lock().unwrap().push((Decision::RejectAll, c.to_vec())),
            move |c| s.lock().unwrap().push((Decision::ApplySettings, c.to_vec())),
        )
    }

    fn widget_on(host: &str, jar: &CookieJarHandle) -> (ConsentWidget, Calls) {
        let calls: Calls = Arc::default();
        let options = WidgetOptions::builder().host(host).build().unwrap();
        let widget = ConsentWidget::initialize(
            Box::new(NullMount::new()),
            config(),
            options,
            jar.clone(),
            recording_callbacks(&calls),
        )
        .unwrap();
        (widget, calls)
    }

    fn fresh() -> (ConsentWidget, Calls) {
        widget_on("www.example.com", &DefaultCookieJar::new().into_handle())
    }

    fn drain(rx: &mut broadcast::Receiver<WidgetEvent>) -> Vec<WidgetEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[test]
    fn first_visit_presents_prompt_without_delay() {
        let (mut widget, _) = fresh();
        assert!(!widget.store().has_prior_consent());
        assert_eq!(widget.prompt().visibility(), Visibility::Hidden);

        widget.present_after_delay(Duration::ZERO);
        assert_eq!(widget.poll_presentation(Instant::now()), Some(Transition::Changed(Visibility::Shown)));
        assert_eq!(widget.prompt().visibility(), Visibility::Shown);
        assert!(!widget.presentation_pending());
        assert_eq!(widget.poll_presentation(Instant::now()), None);
    }

    #[test]
    fn present_uses_the_configured_delay() {
        let calls: Calls = Arc::default();
        let options = WidgetOptions::builder()
            .host("www.example.com")
            .presentation_delay(Duration::from_millis(150))
            .build()
            .unwrap();
        let mut widget = ConsentWidget::initialize(
            Box::new(NullMount::new()),
            config(),
            options,
            DefaultCookieJar::new().into_handle(),
            recording_callbacks(&calls),
        )
        .unwrap();
        assert!(!widget.presentation_pending());

        widget.present();
        let scheduled = Instant::now();
        assert!(widget.presentation_pending());
        assert_eq!(widget.poll_presentation(scheduled), None);
        assert_eq!(widget.prompt().visibility(), Visibility::Hidden);

        let due = scheduled + Duration::from_millis(150);
        assert_eq!(widget.poll_presentation(due), Some(Transition::Changed(Visibility::Shown)));
        assert!(!widget.presentation_pending());
    }

    #[test]
    fn presentation_waits_for_its_deadline() {
        let (mut widget, _) = fresh();
        widget.present_after_delay(Duration::from_secs(60));

        assert_eq!(widget.poll_presentation(Instant::now()), None);
        assert!(widget.presentation_pending());
        assert_eq!(widget.prompt().visibility(), Visibility::Hidden);

        let later = Instant::now() + Duration::from_secs(61);
        assert!(widget.poll_presentation(later).is_some());
        assert_eq!(widget.prompt().visibility(), Visibility::Shown);
    }

    #[test]
    fn prior_consent_skips_presentation() {
        let jar = DefaultCookieJar::new().into_handle();
        jar.write()
            .unwrap()
            .set_cookie("example.com", Cookie::session("consent", r#"["necessary"]"#, "example.com"))
            .unwrap();

        let (mut widget, _) = widget_on("shop.example.com", &jar);
        let mut rx = widget.subscribe();

        widget.present_after_delay(Duration::ZERO);
        assert_eq!(widget.poll_presentation(Instant::now()), Some(Transition::Blocked));
        assert_eq!(widget.prompt().visibility(), Visibility::Hidden);
        assert_eq!(drain(&mut rx), vec![WidgetEvent::PresentationSkipped { widget: widget.id() }]);
    }

    #[test]
    fn reject_from_prompt_stores_necessary_only() {
        let (mut widget, calls) = fresh();
        widget.wire_interactions();
        widget.present_now();

        assert!(widget.activate(PROMPT_REJECT_ID));

        assert_eq!(widget.store().stored_categories(), Some(ids(&["necessary"])));
        assert_eq!(widget.prompt().visibility(), Visibility::Hidden);
        assert_eq!(widget.settings().visibility(), Visibility::Hidden);
        assert_eq!(*calls.lock().unwrap(), vec![(Decision::RejectAll, ids(&["necessary"]))]);
    }

    #[test]
    fn accept_from_settings_stores_every_category() {
        let (mut widget, calls) = fresh();
        widget.wire_interactions();
        widget.present_now();

        assert!(widget.activate("c-settings"));
        assert_eq!(widget.settings().visibility(), Visibility::Shown);
        // opening settings leaves the prompt alone
        assert_eq!(widget.prompt().visibility(), Visibility::Shown);

        assert!(widget.activate(SETTINGS_ACCEPT_ID));

        let all = ids(&["necessary", "analytics", "targeting"]);
        assert_eq!(widget.store().stored_categories(), Some(all.clone()));
        assert_eq!(widget.prompt().visibility(), Visibility::Hidden);
        assert_eq!(widget.settings().visibility(), Visibility::Hidden);
        assert_eq!(*calls.lock().unwrap(), vec![(Decision::AcceptAll, all)]);
    }

    #[test]
    fn save_stores_the_checked_toggles() {
        let (mut widget, calls) = fresh();
        widget.wire_interactions();
        widget.present_now();

        widget.dispatch(UserAction::OpenSettings);
        widget.dispatch(UserAction::ToggleCategory("analytics".into()));
        widget.activate(SETTINGS_SAVE_ID);

        let saved = ids(&["necessary", "analytics"]);
        assert_eq!(widget.store().stored_categories(), Some(saved.clone()));
        assert_eq!(widget.prompt().visibility(), Visibility::Hidden);
        assert_eq!(widget.settings().visibility(), Visibility::Hidden);
        assert_eq!(*calls.lock().unwrap(), vec![(Decision::ApplySettings, saved)]);
    }

    #[test]
    fn open_then_close_settings_changes_nothing_else() {
        let (mut widget, calls) = fresh();
        widget.wire_interactions();
        widget.present_now();

        widget.activate("c-settings");
        widget.dispatch(UserAction::ToggleCategory("targeting".into()));
        widget.activate(SETTINGS_CLOSE_ID);

        assert_eq!(widget.settings().visibility(), Visibility::Hidden);
        assert_eq!(widget.prompt().visibility(), Visibility::Shown);
        assert!(!widget.store().has_prior_consent());
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn reopening_settings_discards_unsaved_clicks() {
        let (mut widget, _) = fresh();
        widget.wire_interactions();

        widget.activate(PROMPT_REJECT_ID);
        widget.dispatch(UserAction::OpenSettings);
        widget.dispatch(UserAction::ToggleCategory("analytics".into()));
        widget.dispatch(UserAction::ToggleDetails("analytics".into()));
        widget.dispatch(UserAction::CloseSettings);

        widget.dispatch(UserAction::OpenSettings);
        let snapshot = widget.snapshot();
        assert_eq!(snapshot.is_checked(&"necessary".into()), Some(true));
        assert_eq!(snapshot.is_checked(&"analytics".into()), Some(false));
        assert!(!widget.settings().controls().get(&"analytics".into()).unwrap().is_expanded());
    }

    #[test]
    fn readonly_toggle_ignores_clicks() {
        let (mut widget, _) = fresh();
        let mut rx = widget.subscribe();

        widget.dispatch(UserAction::ToggleCategory("necessary".into()));
        assert!(drain(&mut rx).is_empty());
        assert_eq!(widget.snapshot().is_checked(&"necessary".into()), Some(true));
    }

    #[test]
    fn buttons_do_nothing_before_wiring() {
        let (mut widget, calls) = fresh();
        widget.present_now();

        assert!(!widget.activate(PROMPT_ACCEPT_ID));
        widget.dispatch(UserAction::AcceptAll(DialogKind::Prompt));
        widget.dispatch(UserAction::OpenSettings);

        assert!(!widget.store().has_prior_consent());
        assert_eq!(widget.prompt().visibility(), Visibility::Shown);
        assert_eq!(widget.settings().visibility(), Visibility::Hidden);
        assert!(calls.lock().unwrap().is_empty());

        widget.wire_interactions();
        assert!(!widget.activate("unknown-element"));
        assert!(widget.activate(PROMPT_ACCEPT_ID));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn custom_settings_trigger_is_bound() {
        let options = WidgetOptions::builder().settings_trigger("open-prefs").build().unwrap();
        let mut widget = ConsentWidget::initialize(
            Box::new(NullMount::new()),
            config(),
            options,
            DefaultCookieJar::new().into_handle(),
            ConsentCallbacks::noop(),
        )
        .unwrap();
        widget.wire_interactions();

        assert!(!widget.activate("c-settings"));
        assert!(widget.activate("open-prefs"));
        assert_eq!(widget.settings().visibility(), Visibility::Shown);
    }

    #[test]
    fn callback_runs_after_store_and_hide() {
        let jar = DefaultCookieJar::new().into_handle();
        let observed = Arc::new(Mutex::new(None));

        let (jar_cb, observed_cb) = (jar.clone(), observed.clone());
        let callbacks = ConsentCallbacks::new(
            move |_| {
                let stored = jar_cb.read().unwrap().get_cookie("example.com", "consent").is_some();
                *observed_cb.lock().unwrap() = Some(stored);
            },
            |_| {},
            |_| {},
        );

        let options = WidgetOptions::builder().host("example.com").build().unwrap();
        let mut widget =
            ConsentWidget::initialize(Box::new(NullMount::new()), config(), options, jar, callbacks).unwrap();
        let mut rx = widget.subscribe();
        let id = widget.id();

        widget.wire_interactions();
        widget.present_now();
        widget.activate(PROMPT_ACCEPT_ID);

        assert_eq!(*observed.lock().unwrap(), Some(true));

        let all = ids(&["necessary", "analytics", "targeting"]);
        assert_eq!(
            drain(&mut rx),
            vec![
                WidgetEvent::DialogShown { widget: id, dialog: DialogKind::Prompt },
                WidgetEvent::ConsentStored { widget: id, categories: all.clone() },
                WidgetEvent::DialogHidden { widget: id, dialog: DialogKind::Prompt },
                WidgetEvent::DecisionApplied { widget: id, decision: Decision::AcceptAll, categories: all },
            ]
        );
    }

    #[derive(Clone, Default)]
    struct RecordingMount {
        log: Arc<Mutex<Vec<String>>>,
        refuse: bool,
    }

    impl MountPoint for RecordingMount {
        fn name(&self) -> &str {
            "RecordingMount"
        }

        fn attach(&mut self, container: &WidgetContainer) -> anyhow::Result<()> {
            if self.refuse {
                anyhow::bail!("no root element");
            }
            self.log.lock().unwrap().push(format!("attach {}", container.element_id));
            Ok(())
        }

        fn detach(&mut self, container: &WidgetContainer) {
            self.log.lock().unwrap().push(format!("detach {}", container.element_id));
        }
    }

    #[test]
    fn teardown_hides_and_detaches() {
        let mount = RecordingMount::default();
        let log = mount.log.clone();
        let mut widget = ConsentWidget::initialize(
            Box::new(mount),
            config(),
            WidgetOptions::default(),
            DefaultCookieJar::new().into_handle(),
            ConsentCallbacks::noop(),
        )
        .unwrap();
        let mut rx = widget.subscribe();
        let id = widget.id();

        widget.wire_interactions();
        widget.present_now();
        widget.activate("c-settings");
        widget.present_after_delay(Duration::from_secs(5));
        drain(&mut rx);

        widget.teardown();

        assert_eq!(*log.lock().unwrap(), vec!["attach cc--main", "detach cc--main"]);
        assert_eq!(
            drain(&mut rx),
            vec![
                WidgetEvent::DialogHidden { widget: id, dialog: DialogKind::Prompt },
                WidgetEvent::DialogHidden { widget: id, dialog: DialogKind::Settings },
                WidgetEvent::TornDown { widget: id },
            ]
        );
    }

    #[test]
    fn initialize_reports_mount_and_option_errors() {
        let refused = ConsentWidget::initialize(
            Box::new(RecordingMount { refuse: true, ..Default::default() }),
            config(),
            WidgetOptions::default(),
            DefaultCookieJar::new().into_handle(),
            ConsentCallbacks::noop(),
        );
        assert!(matches!(refused, Err(ConsentError::Mount(msg)) if msg.contains("no root element")));

        let options = WidgetOptions { storage_key: "my key".into(), ..Default::default() };
        let invalid = ConsentWidget::initialize(
            Box::new(NullMount::new()),
            config(),
            options,
            DefaultCookieJar::new().into_handle(),
            ConsentCallbacks::noop(),
        );
        assert!(matches!(
            invalid,
            Err(ConsentError::InvalidOptions(WidgetOptionsError::InvalidStorageKey(_)))
        ));
    }
}
