use portview_core::domain::project::{Project, ProjectCategory, ProjectId};

use crate::store::ProjectStore;

/// Closed set of dashboard views plus the entity selected within each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    Dashboard,
    CategoryDetail(ProjectCategory),
    ProjectDetail(ProjectId),
}

/// Holds "current view + selected entity" and resolves selections against the
/// project store.
#[derive(Clone, Debug)]
pub struct ViewController {
    view: View,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self { view: View::Dashboard }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn open_dashboard(&mut self) {
        self.view = View::Dashboard;
    }

    pub fn open_category(&mut self, category: ProjectCategory) {
        self.view = View::CategoryDetail(category);
    }

    pub fn open_project(&mut self, project_id: ProjectId) {
        self.view = View::ProjectDetail(project_id);
    }

    pub fn selected_category(&self) -> Option<ProjectCategory> {
        match self.view() {
            View::CategoryDetail(category) => Some(*category),
            _ => None,
        }
    }

    pub fn selected_project<'a>(&self, store: &'a ProjectStore) -> Option<&'a Project> {
        match self.view() {
            View::ProjectDetail(project_id) => store.find(project_id),
            _ => None,
        }
    }

    /// Drop back to the dashboard when the selected project no longer exists
    /// in the working set (e.g. after a refresh).
    pub fn reconcile(&mut self, store: &ProjectStore) {
        let stale = match &self.view {
            View::ProjectDetail(project_id) => store.find(project_id).is_none(),
            _ => false,
        };

        if stale {
            self.open_dashboard();
        }
    }
}
