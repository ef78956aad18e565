// Navigation state machine for the tree navigator. Pure data, no I/O:
// the interactive loop in `ui` fetches children and drives these types,
// which keeps the push/pop and menu-building logic testable without a
// terminal or a network.

use crate::api::{Group, Project};

/// Where the navigator currently sits. Exactly one state is current at
/// any time; the rest of the path back to the root lives in the
/// `HistoryStack`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationState {
    AtRoot,
    InGroup { id: u64, name: String },
}

impl NavigationState {
    /// The group to list children of / create under. `None` at the root.
    pub fn group_id(&self) -> Option<u64> {
        match self {
            NavigationState::AtRoot => None,
            NavigationState::InGroup { id, .. } => Some(*id),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            NavigationState::AtRoot => "top level",
            NavigationState::InGroup { name, .. } => name,
        }
    }
}

/// The path from the root to the current position, pushed on descent and
/// popped on ascent. Its depth always equals the distance from the root.
#[derive(Debug, Default)]
pub struct HistoryStack(Vec<NavigationState>);

impl HistoryStack {
    pub fn new() -> Self {
        HistoryStack(Vec::new())
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

/// Descend into a subgroup, recording where we came from.
pub fn descend(history: &mut HistoryStack, current: &mut NavigationState, group: &Group) {
    history.0.push(current.clone());
    *current = NavigationState::InGroup {
        id: group.id,
        name: group.name.clone(),
    };
}

/// Step back up one level. Returns `false` when already at the root, which
/// the caller reports as a warning; the state is left untouched in that
/// case.
pub fn go_back(history: &mut HistoryStack, current: &mut NavigationState) -> bool {
    match history.0.pop() {
        Some(prev) => {
            *current = prev;
            true
        }
        None => false,
    }
}

/// One selectable slot in the navigator menu.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Descend(Group),
    OpenProject(Project),
    CloneOrCreateProject,
    CreateSubgroup,
    GoBack,
    Cancel,
}

impl MenuEntry {
    pub fn label(&self) -> String {
        match self {
            MenuEntry::Descend(g) => format!("{}/", g.name),
            MenuEntry::OpenProject(p) => p.name.clone(),
            MenuEntry::CloneOrCreateProject => "Clone or create a project".into(),
            MenuEntry::CreateSubgroup => "Create a subgroup".into(),
            MenuEntry::GoBack => "Go back".into(),
            MenuEntry::Cancel => "Cancel".into(),
        }
    }
}

/// What the user came to do, taken from the main-menu entry they chose.
/// The matching action slot is preselected in the navigator menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    CreateSubgroup,
    CloneOrCreateProject,
}

/// Index of the navigator slot matching the stated intent. Falls back to
/// the first slot, though the fixed actions are always present.
pub fn preselected_slot(entries: &[MenuEntry], intent: Intent) -> usize {
    let target = match intent {
        Intent::CreateSubgroup => MenuEntry::CreateSubgroup,
        Intent::CloneOrCreateProject => MenuEntry::CloneOrCreateProject,
    };
    entries.iter().position(|e| *e == target).unwrap_or(0)
}

/// Route for the "clone or create a project" action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOrCreateRoute {
    /// Nothing to clone at this position; start creation immediately,
    /// with no sub-menu.
    StraightToCreate,
    /// Projects exist, so the user picks between cloning and creating.
    AskCloneOrCreate,
}

pub fn clone_or_create_route(projects: &[Project]) -> CloneOrCreateRoute {
    if projects.is_empty() {
        CloneOrCreateRoute::StraightToCreate
    } else {
        CloneOrCreateRoute::AskCloneOrCreate
    }
}

/// Build the menu for one render pass: subgroups first, then projects,
/// then the four fixed actions. The selection index maps straight into
/// this list, so there is no offset arithmetic between the sections.
pub fn build_entries(subgroups: &[Group], projects: &[Project]) -> Vec<MenuEntry> {
    let mut entries = Vec::with_capacity(subgroups.len() + projects.len() + 4);
    entries.extend(subgroups.iter().cloned().map(MenuEntry::Descend));
    entries.extend(projects.iter().cloned().map(MenuEntry::OpenProject));
    entries.push(MenuEntry::CloneOrCreateProject);
    entries.push(MenuEntry::CreateSubgroup);
    entries.push(MenuEntry::GoBack);
    entries.push(MenuEntry::Cancel);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn group(id: u64, name: &str) -> Group {
        Group {
            id,
            name: name.into(),
            full_path: name.to_lowercase(),
            parent_id: None,
        }
    }

    fn project(id: u64, name: &str) -> Project {
        Project {
            id,
            name: name.into(),
            path_with_namespace: format!("g/{}", name),
            ssh_url_to_repo: None,
            http_url_to_repo: None,
        }
    }

    #[test]
    fn menu_has_one_slot_per_child_plus_four_actions() {
        let subgroups = vec![group(1, "Alpha"), group(2, "Beta")];
        let projects = vec![project(10, "api"), project(11, "web"), project(12, "docs")];
        let entries = build_entries(&subgroups, &projects);

        assert_eq!(entries.len(), subgroups.len() + projects.len() + 4);
        assert!(matches!(entries[0], MenuEntry::Descend(ref g) if g.name == "Alpha"));
        assert!(matches!(entries[1], MenuEntry::Descend(ref g) if g.name == "Beta"));
        assert!(matches!(entries[2], MenuEntry::OpenProject(ref p) if p.name == "api"));
        assert_eq!(
            entries[5..].to_vec(),
            vec![
                MenuEntry::CloneOrCreateProject,
                MenuEntry::CreateSubgroup,
                MenuEntry::GoBack,
                MenuEntry::Cancel,
            ]
        );
    }

    #[test]
    fn empty_location_still_offers_the_four_actions() {
        let entries = build_entries(&[], &[]);
        assert_eq!(
            entries,
            vec![
                MenuEntry::CloneOrCreateProject,
                MenuEntry::CreateSubgroup,
                MenuEntry::GoBack,
                MenuEntry::Cancel,
            ]
        );
    }

    #[test]
    fn descend_then_go_back_restores_the_original_state() {
        let mut history = HistoryStack::new();
        let mut state = NavigationState::AtRoot;

        descend(&mut history, &mut state, &group(1, "Alpha"));
        descend(&mut history, &mut state, &group(3, "Gamma"));
        assert_eq!(history.depth(), 2);
        assert_eq!(state.group_id(), Some(3));

        assert!(go_back(&mut history, &mut state));
        assert_eq!(
            state,
            NavigationState::InGroup {
                id: 1,
                name: "Alpha".into()
            }
        );
        assert!(go_back(&mut history, &mut state));
        assert_eq!(state, NavigationState::AtRoot);
        assert_eq!(history.depth(), 0);
    }

    #[test]
    fn go_back_at_root_warns_instead_of_desyncing() {
        let mut history = HistoryStack::new();
        let mut state = NavigationState::AtRoot;

        assert!(!go_back(&mut history, &mut state));
        assert!(!go_back(&mut history, &mut state));
        assert_eq!(state, NavigationState::AtRoot);
        assert_eq!(history.depth(), 0);
    }

    #[test]
    fn zero_projects_routes_straight_to_creation() {
        assert_eq!(
            clone_or_create_route(&[]),
            CloneOrCreateRoute::StraightToCreate
        );
        assert_eq!(
            clone_or_create_route(&[project(10, "api")]),
            CloneOrCreateRoute::AskCloneOrCreate
        );
    }

    #[test]
    fn intent_preselects_the_matching_action_slot() {
        let subgroups = vec![group(1, "Alpha"), group(2, "Beta")];
        let projects = vec![project(10, "api")];
        let entries = build_entries(&subgroups, &projects);

        let slot = preselected_slot(&entries, Intent::CloneOrCreateProject);
        assert_eq!(entries[slot], MenuEntry::CloneOrCreateProject);
        assert_eq!(slot, 3);

        let slot = preselected_slot(&entries, Intent::CreateSubgroup);
        assert_eq!(entries[slot], MenuEntry::CreateSubgroup);
        assert_eq!(slot, 4);
    }

    #[test]
    fn round_trip_renders_the_same_root_menu() {
        let roots = vec![group(1, "Alpha"), group(2, "Beta")];
        let initial = build_entries(&roots, &[]);

        let mut history = HistoryStack::new();
        let mut state = NavigationState::AtRoot;
        descend(&mut history, &mut state, &roots[0]);
        go_back(&mut history, &mut state);

        assert_eq!(state, NavigationState::AtRoot);
        assert_eq!(build_entries(&roots, &[]), initial);
    }
}
