// Bulk lister: non-interactive depth-first report of every group and
// project the token can see. Purely side-effecting. An error on one node
// is reported and its children treated as absent, so one bad subtree does
// not abort the rest of the report.

use crate::api::{ApiClient, ApiError, Group};
use crossterm::style::Stylize;

/// Print the whole accessible hierarchy, projects before subgroups,
/// indented two spaces per level of nesting. Depth is unbounded; the
/// hierarchy is a strict tree so no cycle detection is needed.
pub fn print_tree(api: &ApiClient) {
    match api.list_top_level_groups() {
        Ok(groups) if groups.is_empty() => {
            println!("No groups are visible with this token.");
        }
        Ok(groups) => {
            for group in &groups {
                print_group(api, group, 0);
            }
        }
        Err(e) => println!("{} Could not list groups: {}", "!".red(), e),
    }
}

fn print_group(api: &ApiClient, group: &Group, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}{}", indent, group.name.clone().bold());
    for project in children(api.list_projects(group.id), &group.name) {
        println!("{}  {}", indent, project.name);
    }
    for child in children(api.list_subgroups(group.id), &group.name) {
        print_group(api, &child, depth + 1);
    }
}

fn children<T>(res: Result<Vec<T>, ApiError>, group: &str) -> Vec<T> {
    match res {
        Ok(items) => items,
        Err(e) => {
            println!("{} Skipping part of {}: {}", "!".red(), group, e);
            Vec::new()
        }
    }
}
