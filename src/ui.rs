// UI layer: interactive menus built with `dialoguer`, with `indicatif`
// spinners while a request is in flight. The functions are small and
// synchronous to make the flow easy to follow.

use crate::api::{ApiClient, ApiError, Group, NewGroup, NewProject, Project};
use crate::git;
use crate::list;
use crate::nav::{self, CloneOrCreateRoute, HistoryStack, Intent, MenuEntry, NavigationState};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Main interactive menu. Receives an `ApiClient` instance and runs a
/// select loop until the user chooses "Cancel".
///
/// Note: `Select::interact()` is keyboard-driven: arrow keys and Enter
/// choose an option, and an invalid choice is simply not possible, so
/// there is no reject-and-redisplay path to maintain by hand.
pub fn main_menu(api: ApiClient) -> Result<()> {
    loop {
        let items = vec![
            "List all groups and projects",
            "Navigate: create a subgroup",
            "Navigate: clone or create a project",
            "Cancel",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => list::print_tree(&api),
            // The navigator offers every action; the chosen entry only
            // decides which action its menu preselects. Cancelling inside
            // the navigator ends the whole session with a success exit.
            1 => {
                navigate(&api, Intent::CreateSubgroup)?;
                break;
            }
            2 => {
                navigate(&api, Intent::CloneOrCreateProject)?;
                break;
            }
            3 => break,
            _ => {}
        }
    }
    Ok(())
}

/// The tree navigator loop: fetch the children of the current position,
/// render them as a menu and dispatch the chosen entry. State is the
/// current `NavigationState` plus the history stack, both owned here.
/// Returns when the user cancels, which terminates the session.
fn navigate(api: &ApiClient, intent: Intent) -> Result<()> {
    let mut history = HistoryStack::new();
    let mut state = NavigationState::AtRoot;
    loop {
        let (subgroups, projects) = fetch_children(api, &state);
        println!("{}", format!("In: {}", state.label()).bold());
        if subgroups.is_empty() && projects.is_empty() {
            println!("{}", "Nothing here yet.".dark_grey());
        }

        let entries = nav::build_entries(&subgroups, &projects);
        let labels: Vec<String> = entries.iter().map(MenuEntry::label).collect();
        let default = nav::preselected_slot(&entries, intent);
        let choice = Select::new().items(&labels).default(default).interact()?;

        match &entries[choice] {
            MenuEntry::Descend(group) => nav::descend(&mut history, &mut state, group),
            MenuEntry::OpenProject(project) => project_menu(project)?,
            MenuEntry::CloneOrCreateProject => clone_or_create(api, &state, &projects)?,
            MenuEntry::CreateSubgroup => create_subgroup(api, &state)?,
            MenuEntry::GoBack => {
                if !nav::go_back(&mut history, &mut state) {
                    println!("{}", "Already at the top level.".yellow());
                }
            }
            MenuEntry::Cancel => break,
        }
    }
    Ok(())
}

/// List the children of the current position. At the root only groups
/// exist. A failed listing is reported and rendered as empty so the
/// navigator keeps running.
fn fetch_children(api: &ApiClient, state: &NavigationState) -> (Vec<Group>, Vec<Project>) {
    let pb = spinner("Loading...");
    let (groups, projects) = match state.group_id() {
        None => (api.list_top_level_groups(), Ok(Vec::new())),
        Some(id) => (api.list_subgroups(id), api.list_projects(id)),
    };
    pb.finish_and_clear();
    (
        report_or_empty(groups, "subgroups"),
        report_or_empty(projects, "projects"),
    )
}

fn report_or_empty<T>(res: Result<Vec<T>, ApiError>, what: &str) -> Vec<T> {
    match res {
        Ok(items) => items,
        Err(e) => {
            println!("{} Could not list {}: {}", "!".red(), what, e);
            Vec::new()
        }
    }
}

/// One-item sub-menu shown when a project entry is selected.
fn project_menu(project: &Project) -> Result<()> {
    let items = vec!["Clone this project", "Cancel"];
    if Select::new().items(&items).default(0).interact()? == 0 {
        clone_project(project);
    }
    Ok(())
}

/// With no projects at the current position this routes straight into
/// project creation; otherwise the user picks between cloning an existing
/// project and creating a new one.
fn clone_or_create(api: &ApiClient, state: &NavigationState, projects: &[Project]) -> Result<()> {
    if nav::clone_or_create_route(projects) == CloneOrCreateRoute::StraightToCreate {
        println!("No projects here; creating a new one.");
        return create_project(api, state);
    }
    let items = vec!["Clone an existing project", "Create a new project"];
    match Select::new().items(&items).default(0).interact()? {
        0 => {
            let labels: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
            let idx = Select::new().items(&labels).default(0).interact()?;
            clone_project(&projects[idx]);
        }
        _ => create_project(api, state)?,
    }
    Ok(())
}

fn clone_project(project: &Project) {
    let Some(url) = project.clone_url() else {
        println!("{} {} has no clone URL", "!".red(), project.name);
        return;
    };
    let pb = spinner(&format!("Cloning {}...", project.name));
    let outcome = git::clone(url);
    pb.finish_and_clear();
    match outcome {
        Ok(dest) => println!("{} Cloned into {}", "ok:".green(), dest),
        Err(e) => println!("{} {}", "error:".red(), e),
    }
}

/// Collect the fields for a new subgroup and create it under the current
/// group; at the root this creates a top-level group.
fn create_subgroup(api: &ApiClient, state: &NavigationState) -> Result<()> {
    let name: String = Input::new().with_prompt("Subgroup name").interact_text()?;
    let description: String = Input::new()
        .with_prompt("Description")
        .allow_empty(true)
        .interact_text()?;
    let visibility = pick_visibility()?;

    let req = NewGroup::new(&name, state.group_id(), description, visibility);
    let pb = spinner("Creating subgroup...");
    let created = api.create_subgroup(&req);
    pb.finish_and_clear();

    match created {
        Ok(g) => println!("{} Created group {} (id {})", "ok:".green(), g.name, g.id),
        Err(e) => println!("{} Could not create subgroup: {}", "error:".red(), e),
    }
    Ok(())
}

/// Collect the fields for a new project, create it and offer to clone the
/// result right away.
fn create_project(api: &ApiClient, state: &NavigationState) -> Result<()> {
    let name: String = Input::new().with_prompt("Project name").interact_text()?;
    let description: String = Input::new()
        .with_prompt("Description")
        .allow_empty(true)
        .interact_text()?;
    let visibility = pick_visibility()?;
    let initialize_with_readme = Confirm::new()
        .with_prompt("Initialize with a README?")
        .default(true)
        .interact()?;
    let auto_devops_enabled = Confirm::new()
        .with_prompt("Enable Auto DevOps?")
        .default(false)
        .interact()?;
    let ci_config_path: String = Input::new()
        .with_prompt("CI config path (leave empty for default)")
        .allow_empty(true)
        .interact_text()?;

    let req = NewProject {
        name,
        namespace_id: state.group_id(),
        description,
        visibility,
        initialize_with_readme,
        auto_devops_enabled,
        ci_config_path: if ci_config_path.trim().is_empty() {
            None
        } else {
            Some(ci_config_path)
        },
    };
    let pb = spinner("Creating project...");
    let created = api.create_project(&req);
    pb.finish_and_clear();

    match created {
        Ok(p) => {
            println!("{} Created project {} (id {})", "ok:".green(), p.name, p.id);
            if Confirm::new()
                .with_prompt("Clone it now?")
                .default(false)
                .interact()?
            {
                clone_project(&p);
            }
        }
        Err(e) => println!("{} Could not create project: {}", "error:".red(), e),
    }
    Ok(())
}

/// The server only accepts these three values; anything else would come
/// back as a 400, so the picker offers exactly the valid set.
fn pick_visibility() -> Result<String> {
    let choices = vec!["private", "internal", "public"];
    let idx = Select::new()
        .with_prompt("Visibility")
        .items(&choices)
        .default(0)
        .interact()?;
    Ok(choices[idx].to_string())
}

/// Spinner shown while a blocking request is in flight.
fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(msg.to_string());
    pb
}
