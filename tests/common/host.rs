//! A stand-in for the host build system.
//!
//! Fires lifecycle notifications at every registered listener, the way a
//! build engine dispatches to its plugins.

use std::sync::Arc;

use build_trace::BuildListener;

#[derive(Default, Clone)]
pub struct SimulatedBuild {
    listeners: Vec<Arc<dyn BuildListener>>,
}

impl SimulatedBuild {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn BuildListener>) {
        self.listeners.push(listener);
    }

    fn each(&self, f: impl Fn(&dyn BuildListener)) {
        for listener in &self.listeners {
            f(listener.as_ref());
        }
    }

    pub fn evaluate_project(&self, path: &str) {
        self.each(|l| l.on_evaluate_begin(Some(path)));
        self.each(|l| l.on_evaluate_end(Some(path)));
    }

    pub fn build_task_graph(&self) {
        self.each(|l| l.on_projects_evaluated());
        self.each(|l| l.on_task_graph_ready());
    }

    pub fn resolve(&self, path: &str) {
        self.each(|l| l.on_resolve_begin(Some(path)));
        self.each(|l| l.on_resolve_end(Some(path)));
    }

    pub fn run_task(&self, path: &str, work: impl FnOnce()) {
        self.each(|l| l.on_task_begin(Some(path)));
        work();
        self.each(|l| l.on_task_end(Some(path)));
    }

    pub fn start_task(&self, path: &str) {
        self.each(|l| l.on_task_begin(Some(path)));
    }

    pub fn run_operation(&self, name: &str) {
        self.each(|l| l.on_operation_begin(Some(name)));
        self.each(|l| l.on_operation_end(Some(name)));
    }
}
