//! Render lifecycle hooks.
//!
//! Hooks observe the data around each patch. `init` hooks fire for the first
//! render that finds a mount point and receive the current data; `render`
//! hooks fire for every later patch and also receive the `previous` snapshot.
//! Within a set, hooks run in registration order.

use std::sync::Arc;

use crate::data::Value;

/// Hook receiving the current data.
pub type InitHook = Arc<dyn Fn(&Value) + Send + Sync>;

/// Hook receiving the current data and the pre-edit snapshot, if any.
pub type RenderHook = Arc<dyn Fn(&Value, Option<&Value>) + Send + Sync>;

/// Which side of the patch a hook runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Before the live tree is patched
    Pre,
    /// After the patch and the directive sweep
    Post,
}

/// The four hook lists of a renderer.
#[derive(Default, Clone)]
pub struct HookCollection {
    init_pre: Vec<InitHook>,
    init_post: Vec<InitHook>,
    render_pre: Vec<RenderHook>,
    render_post: Vec<RenderHook>,
}

impl HookCollection {
    /// Create a new empty hook collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hook for the first render.
    pub fn add_init(&mut self, stage: Stage, hook: InitHook) {
        match stage {
            Stage::Pre => self.init_pre.push(hook),
            Stage::Post => self.init_post.push(hook),
        }
    }

    /// Add a hook for every render after the first.
    pub fn add_render(&mut self, stage: Stage, hook: RenderHook) {
        match stage {
            Stage::Pre => self.render_pre.push(hook),
            Stage::Post => self.render_post.push(hook),
        }
    }

    /// Runs the hooks of one stage. `initialized` selects between the init and
    /// render sets.
    pub fn run(&self, stage: Stage, initialized: bool, current: &Value, previous: Option<&Value>) {
        if initialized {
            let hooks = match stage {
                Stage::Pre => &self.render_pre,
                Stage::Post => &self.render_post,
            };
            for hook in hooks {
                hook(current, previous);
            }
        } else {
            let hooks = match stage {
                Stage::Pre => &self.init_pre,
                Stage::Post => &self.init_post,
            };
            for hook in hooks {
                hook(current);
            }
        }
    }

    /// Get the number of registered hooks.
    pub fn len(&self) -> usize {
        self.init_pre.len() + self.init_post.len() + self.render_pre.len() + self.render_post.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
