//! Lifecycle notifications from the host build.
//!
//! The host calls [`BuildListener`] methods from whichever thread runs the
//! corresponding unit of work. [`LifecycleBridge`] turns each call into
//! exactly one [`EventLog`] append:
//!
//! | Notification                    | Event                                    |
//! |---------------------------------|------------------------------------------|
//! | task about to execute / done    | `B` / `E`, `TASK`, task path             |
//! | dependency set resolving / done | `B` / `E`, `RESOLVE`, resolvable path    |
//! | project evaluating / done       | `B` / `E`, `EVALUATE`, project path      |
//! | build operation started / done  | `B` / `E`, `BUILD_OPERATION`, op name    |
//! | all projects evaluated          | `B`, `PHASE`, `"build task graph"`       |
//! | task graph ready                | `E`, `PHASE`, `"build task graph"`       |
//!
//! Names are optional: a host that cannot identify the unit passes `None`
//! and the event is recorded under an empty name.

use std::sync::Arc;

use crate::trace::{BuildClock, Category, EventLog, TraceEvent};

/// Name of the phase between "all projects evaluated" and "task graph ready".
pub const BUILD_TASK_GRAPH: &str = "build task graph";

/// The lifecycle hooks a host build invokes.
pub trait BuildListener: Send + Sync {
    fn on_task_begin(&self, path: Option<&str>);
    fn on_task_end(&self, path: Option<&str>);

    fn on_resolve_begin(&self, path: Option<&str>);
    fn on_resolve_end(&self, path: Option<&str>);

    fn on_evaluate_begin(&self, project_path: Option<&str>);
    fn on_evaluate_end(&self, project_path: Option<&str>);

    fn on_operation_begin(&self, display_name: Option<&str>);
    fn on_operation_end(&self, display_name: Option<&str>);

    /// All projects evaluated; task graph construction begins.
    fn on_projects_evaluated(&self);

    /// Task execution graph is ready.
    fn on_task_graph_ready(&self);
}

/// [`BuildListener`] that records every notification in an [`EventLog`].
#[derive(Debug, Clone)]
pub struct LifecycleBridge {
    log: Arc<EventLog>,
    clock: BuildClock,
}

impl LifecycleBridge {
    pub fn new(log: Arc<EventLog>, clock: BuildClock) -> Self {
        Self { log, clock }
    }

    fn begin(&self, name: Option<&str>, category: Category) {
        let name = name_or_fallback(name, category);
        self.log.append(TraceEvent::began(name, category, &self.clock));
    }

    fn end(&self, name: Option<&str>, category: Category) {
        let name = name_or_fallback(name, category);
        self.log.append(TraceEvent::ended(name, category, &self.clock));
    }
}

fn name_or_fallback(name: Option<&str>, category: Category) -> &str {
    match name {
        Some(name) => name,
        None => {
            log::debug!("{category} lifecycle event has no name; recording it unnamed");
            ""
        }
    }
}

impl BuildListener for LifecycleBridge {
    fn on_task_begin(&self, path: Option<&str>) {
        self.begin(path, Category::Task);
    }

    fn on_task_end(&self, path: Option<&str>) {
        self.end(path, Category::Task);
    }

    fn on_resolve_begin(&self, path: Option<&str>) {
        self.begin(path, Category::Resolve);
    }

    fn on_resolve_end(&self, path: Option<&str>) {
        self.end(path, Category::Resolve);
    }

    fn on_evaluate_begin(&self, project_path: Option<&str>) {
        self.begin(project_path, Category::Evaluate);
    }

    fn on_evaluate_end(&self, project_path: Option<&str>) {
        self.end(project_path, Category::Evaluate);
    }

    fn on_operation_begin(&self, display_name: Option<&str>) {
        self.begin(display_name, Category::BuildOperation);
    }

    fn on_operation_end(&self, display_name: Option<&str>) {
        self.end(display_name, Category::BuildOperation);
    }

    fn on_projects_evaluated(&self) {
        self.begin(Some(BUILD_TASK_GRAPH), Category::Phase);
    }

    fn on_task_graph_ready(&self) {
        self.end(Some(BUILD_TASK_GRAPH), Category::Phase);
    }
}
