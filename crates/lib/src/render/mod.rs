//! The render scheduler and lifecycle.
//!
//! A [`Renderer`] owns the data of one mount point. `set` writes data and, if
//! something changed, schedules a render; a render turns the data into markup
//! through the template, parses it, and patches the mount point with it.
//!
//! # Lifecycle
//!
//! A renderer starts uninitialized. The first render that finds its mount
//! point fires the `init` hooks and initializes it for good; every later patch
//! fires the `render` hooks instead. Renders whose markup equals the previous
//! render's markup return early without touching the page or firing hooks.
//!
//! # Scheduling
//!
//! With a non-zero debounce interval, a change arms a tokio timer; a later
//! change before it fires replaces it, so bursts of changes coalesce into one
//! render. With a zero interval (or outside a tokio runtime) renders happen
//! synchronously.
//!
//! # Locking
//!
//! Renderer state is locked before the page. Neither lock is held while the
//! template or a hook runs, so both may read and write the renderer and the
//! page. A render requested from inside a render runs as a follow-up pass once
//! the current one finishes.

pub mod handlers;
pub mod hooks;
pub mod input;
pub mod options;

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::{
    Result,
    data::{DataStore, Path, Value},
    diff::{self, PatchStats},
    dom::{Document, Event, Listener, Page, Selector, listener},
};

pub use handlers::HandlerRegistry;
pub use hooks::{HookCollection, InitHook, RenderHook, Stage};
pub use input::Bindings;
pub use options::{InputBinding, Options};

/// Produces markup from the current data.
pub type Template = Arc<dyn Fn(&Value) -> String + Send + Sync>;

struct State {
    store: DataStore,
    hooks: HookCollection,
    handlers: HandlerRegistry,
    initialized: bool,
    destroyed: bool,
    last_markup: Option<String>,
    last_patch: Option<PatchStats>,
    timer: Option<JoinHandle<()>>,
    input_listener: Option<Listener>,
    /// Count of data changes, to spot writes made while a render runs.
    revision: u64,
    rendering: bool,
    rerender: bool,
}

impl State {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Cancels the timer and detaches everything this renderer attached to
    /// the page.
    fn teardown(&mut self, page: &Page) {
        self.cancel_timer();
        if let Some(listener) = self.input_listener.take() {
            page.remove_document_listener("input", &listener);
        }
        self.handlers.clear(&mut page.lock());
    }
}

struct Shared {
    page: Page,
    mount: Selector,
    template: Template,
    options: Options,
    bindings: Bindings,
    state: Mutex<State>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if !state.destroyed {
            state.destroyed = true;
            state.teardown(&self.page);
        }
    }
}

/// Marks the end of a render, even one unwound by a panicking template or
/// hook.
struct RenderGuard<'a>(&'a Renderer);

impl Drop for RenderGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock_state();
        state.rendering = false;
        state.rerender = false;
    }
}

/// Keeps one mount point of a [`Page`] in sync with a template.
///
/// Cloning a renderer yields another handle to the same renderer. Dropping the
/// last handle tears it down like [`Renderer::destroy`].
///
/// ```
/// use myopie::{Page, Renderer, render::Options};
///
/// let page = Page::parse(r#"<div id="app"></div>"#);
/// let renderer = Renderer::new(
///     page.clone(),
///     "#app",
///     |data| format!("<p>{}</p>", data.text_at("name")),
///     serde_json::json!({"name": "Ada"}),
///     Options::immediate(),
/// )
/// .unwrap();
///
/// assert!(renderer.render());
/// assert_eq!(page.html(), r#"<div id="app"><p>Ada</p></div>"#);
///
/// renderer.set("name", "Grace", true).unwrap();
/// assert_eq!(page.html(), r#"<div id="app"><p>Grace</p></div>"#);
/// ```
#[derive(Clone)]
pub struct Renderer {
    shared: Arc<Shared>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("mount", &self.shared.mount.as_str())
            .field("options", &self.shared.options)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Creates a renderer for the element matching `selector` on `page`.
    ///
    /// Nothing is rendered yet. The mount point is looked up on every render,
    /// so it does not need to exist at this point.
    ///
    /// # Errors
    /// Returns [`DomError::InvalidSelector`](crate::dom::DomError) if the mount
    /// selector or an input binding selector cannot be parsed.
    pub fn new(
        page: Page,
        selector: &str,
        template: impl Fn(&Value) -> String + Send + Sync + 'static,
        initial: impl Into<Value>,
        options: Options,
    ) -> Result<Self> {
        let mount = Selector::parse(selector)?;
        let bindings = Bindings::parse(&options.input_to_path)?;
        let listen = !bindings.is_empty();
        let shared = Arc::new(Shared {
            page,
            mount,
            template: Arc::new(template),
            options,
            bindings,
            state: Mutex::new(State {
                store: DataStore::new(initial),
                hooks: HookCollection::new(),
                handlers: HandlerRegistry::new(),
                initialized: false,
                destroyed: false,
                last_markup: None,
                last_patch: None,
                timer: None,
                input_listener: None,
                revision: 0,
                rendering: false,
                rerender: false,
            }),
        });
        let renderer = Self { shared };
        if listen {
            renderer.listen_for_input();
        }
        Ok(renderer)
    }

    fn from_weak(weak: &Weak<Shared>) -> Option<Self> {
        weak.upgrade().map(|shared| Self { shared })
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn listen_for_input(&self) {
        let weak = Arc::downgrade(&self.shared);
        let input = listener(move |event| {
            if let Some(renderer) = Self::from_weak(&weak) {
                renderer.on_input(event);
            }
        });
        self.shared
            .page
            .add_document_listener("input", input.clone());
        self.lock_state().input_listener = Some(input);
    }

    fn on_input(&self, event: &Event) {
        let resolved = {
            let doc = event.page().lock();
            self.shared.bindings.resolve(&doc, event.target())
        };
        let Some((path, value)) = resolved else {
            return;
        };
        debug!(%path, "input binding update");
        if let Err(err) = self.write(&path, Some(value), self.shared.options.render_on_input) {
            warn!(%path, %err, "input binding could not write its value");
        }
    }

    /// The page this renderer patches.
    pub fn page(&self) -> &Page {
        &self.shared.page
    }

    /// The renderer's options.
    pub fn options(&self) -> &Options {
        &self.shared.options
    }

    /// The mount point selector.
    pub fn selector(&self) -> &str {
        self.shared.mount.as_str()
    }

    // ===== DATA =====

    /// Reads the value at `path`. See [`DataStore::get`].
    pub fn get(&self, path: impl Into<Path>) -> Option<Value> {
        self.lock_state().store.get(path)
    }

    /// A copy of the current data.
    pub fn data(&self) -> Value {
        self.lock_state().store.current().clone()
    }

    /// A copy of the pre-edit snapshot, if an edit happened since the last
    /// completed render.
    pub fn previous(&self) -> Option<Value> {
        self.lock_state().store.previous().cloned()
    }

    /// Writes `value` at `path`. If the data changed and `render` is true,
    /// schedules a render. Returns whether the data changed.
    ///
    /// # Errors
    /// Returns a [`DataError`](crate::data::DataError) if the path leads
    /// through a primitive or into a set. Nothing is written in that case.
    pub fn set(&self, path: impl Into<Path>, value: impl Into<Value>, render: bool) -> Result<bool> {
        self.write(&path.into(), Some(value.into()), render)
    }

    /// Deletes the value at `path`. Like [`Renderer::set`] otherwise.
    pub fn unset(&self, path: impl Into<Path>, render: bool) -> Result<bool> {
        self.write(&path.into(), None, render)
    }

    fn write(&self, path: &Path, value: Option<Value>, render: bool) -> Result<bool> {
        let (changed, schedule) = {
            let mut state = self.lock_state();
            let outcome = state.store.write(path, value)?;
            if outcome.changed {
                state.revision += 1;
            }
            (outcome.changed, outcome.changed && render && !state.destroyed)
        };
        if schedule {
            self.render_debounce();
        }
        Ok(changed)
    }

    // ===== RENDERING =====

    /// Schedules a render after the debounce interval, replacing any pending
    /// one. Renders synchronously when the interval is zero or no tokio
    /// runtime is available. Does nothing once destroyed.
    pub fn render_debounce(&self) {
        let delay = self.shared.options.debounce();
        {
            let mut state = self.lock_state();
            if state.destroyed {
                return;
            }
            state.cancel_timer();
            if !delay.is_zero() {
                match tokio::runtime::Handle::try_current() {
                    Ok(runtime) => {
                        let weak = Arc::downgrade(&self.shared);
                        state.timer = Some(runtime.spawn(async move {
                            tokio::time::sleep(delay).await;
                            if let Some(renderer) = Self::from_weak(&weak) {
                                renderer.render_scheduled();
                            }
                        }));
                        return;
                    }
                    Err(_) => warn!("no tokio runtime for a debounced render, rendering now"),
                }
            }
        }
        self.render();
    }

    fn render_scheduled(&self) {
        let destroyed = self.lock_state().destroyed;
        if !destroyed {
            self.render();
        }
    }

    /// Renders now, cancelling any pending debounced render.
    ///
    /// Returns false if the mount point does not exist, true otherwise
    /// (including when the markup did not change and nothing was done).
    ///
    /// A render requested while another one is running, for example from a
    /// hook, is folded into a follow-up pass of the running render and
    /// returns true right away.
    pub fn render(&self) -> bool {
        {
            let mut state = self.lock_state();
            state.cancel_timer();
            if state.rendering {
                state.rerender = true;
                return true;
            }
            state.rendering = true;
        }
        let _guard = RenderGuard(self);
        let mut found = self.render_pass();
        loop {
            {
                let mut state = self.lock_state();
                if !state.rerender {
                    break;
                }
                state.rerender = false;
            }
            trace!("render requested during render, running again");
            found = self.render_pass();
        }
        found
    }

    /// One template evaluation and patch. Locks are only held while state is
    /// read or written, never while the template or hooks run.
    fn render_pass(&self) -> bool {
        let shared = &self.shared;

        let mount = shared.page.lock().query_selector(&shared.mount);
        let Some(mount) = mount else {
            debug!(selector = shared.mount.as_str(), "mount point not found");
            return false;
        };

        let (current, previous, hooks, initialized, revision) = {
            let state = self.lock_state();
            (
                state.store.current().clone(),
                state.store.previous().cloned(),
                state.hooks.clone(),
                state.initialized,
                state.revision,
            )
        };

        let markup = (shared.template)(&current);
        if self.lock_state().last_markup.as_deref() == Some(markup.as_str()) {
            debug!("markup unchanged, skipping render");
            return true;
        }
        let template = Document::parse(&markup);

        hooks.run(Stage::Pre, initialized, &current, previous.as_ref());

        let stats = {
            let state = self.lock_state();
            let mut doc = shared.page.lock();
            state.handlers.detach_all(&mut doc);
            let stats = diff::patch(&template, &mut doc, mount);
            state.handlers.attach_all(&mut doc);
            stats
        };

        hooks.run(Stage::Post, initialized, &current, previous.as_ref());

        let mut state = self.lock_state();
        state.initialized = true;
        if state.revision == revision {
            state.store.clear_previous();
        } else {
            // Written to while rendering: the next render compares against
            // what this one showed.
            state.store.rebase_previous(current);
        }
        state.last_markup = Some(markup);
        state.last_patch = Some(stats);
        debug!(
            first = !initialized,
            mutations = stats.total(),
            inserted = stats.inserted,
            moved = stats.moved,
            removed = stats.removed,
            "render complete"
        );
        true
    }

    /// Returns true once a render has found the mount point.
    pub fn is_initialized(&self) -> bool {
        self.lock_state().initialized
    }

    /// Returns true if a debounced render is pending.
    pub fn is_render_pending(&self) -> bool {
        self.lock_state()
            .timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Statistics of the most recent patch.
    pub fn last_patch(&self) -> Option<PatchStats> {
        self.lock_state().last_patch
    }

    // ===== HOOKS =====

    /// Adds a hook run before the first patch.
    pub fn hooks_init_add_pre(&self, hook: impl Fn(&Value) + Send + Sync + 'static) {
        self.lock_state().hooks.add_init(Stage::Pre, Arc::new(hook));
    }

    /// Adds a hook run after the first patch.
    pub fn hooks_init_add_post(&self, hook: impl Fn(&Value) + Send + Sync + 'static) {
        self.lock_state().hooks.add_init(Stage::Post, Arc::new(hook));
    }

    /// Adds a hook run before every later patch.
    pub fn hooks_render_add_pre(
        &self,
        hook: impl Fn(&Value, Option<&Value>) + Send + Sync + 'static,
    ) {
        self.lock_state().hooks.add_render(Stage::Pre, Arc::new(hook));
    }

    /// Adds a hook run after every later patch.
    pub fn hooks_render_add_post(
        &self,
        hook: impl Fn(&Value, Option<&Value>) + Send + Sync + 'static,
    ) {
        self.lock_state().hooks.add_render(Stage::Post, Arc::new(hook));
    }

    // ===== HANDLERS =====

    /// Registers a permanent handler. Returns `Ok(false)` if the exact triple
    /// is already registered.
    pub fn handlers_permanent_add(
        &self,
        selector: &str,
        event: &str,
        listener: Listener,
    ) -> Result<bool> {
        let mut state = self.lock_state();
        let mut doc = self.shared.page.lock();
        Ok(state.handlers.add(&mut doc, selector, event, listener)?)
    }

    /// Removes permanent handlers. See [`HandlerRegistry::remove`].
    pub fn handlers_permanent_del(
        &self,
        selector: &str,
        event: Option<&str>,
        listener: Option<&Listener>,
    ) -> bool {
        let mut state = self.lock_state();
        let mut doc = self.shared.page.lock();
        state.handlers.remove(&mut doc, selector, event, listener)
    }

    // ===== LIFETIME =====

    /// Cancels any pending render and detaches the input listener and every
    /// permanent handler. Later changes never schedule a render.
    pub fn destroy(&self) {
        let mut state = self.lock_state();
        if state.destroyed {
            return;
        }
        state.destroyed = true;
        state.teardown(&self.shared.page);
        debug!(selector = self.shared.mount.as_str(), "renderer destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.lock_state().destroyed
    }
}
