// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive tool.
//
// Module responsibilities:
// - `api`: typed blocking client for the GitLab REST API (listing and
//   creating groups and projects) plus credential lookup.
// - `nav`: pure navigation state machine (current position, history
//   stack, menu entries); no I/O, so it is testable without a terminal.
// - `ui`: dialoguer-driven menu flows; delegates requests to `api`.
// - `list`: non-interactive depth-first report of the whole hierarchy.
// - `git`: thin wrapper around the system `git` for cloning.
pub mod api;
pub mod git;
pub mod list;
pub mod nav;
pub mod ui;
