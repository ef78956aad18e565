// API client module: a small blocking HTTP client for the GitLab REST API.
// Every operation is a single synchronous request with no retries or
// caching, which is acceptable for a foreground interactive tool.

use anyhow::Context;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Errors an API operation can produce. A payload that fails typed
/// deserialization is `Malformed`, which keeps it distinguishable from a
/// genuinely empty listing: callers report the error instead of silently
/// showing nothing.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A GitLab group. `parent_id == None` means top-level.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Group {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_path: String,
    #[serde(default)]
    pub parent_id: Option<u64>,
}

/// A GitLab project with its clone endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub path_with_namespace: String,
    #[serde(default)]
    pub ssh_url_to_repo: Option<String>,
    #[serde(default)]
    pub http_url_to_repo: Option<String>,
}

impl Project {
    /// Preferred clone endpoint: ssh when present, http otherwise.
    pub fn clone_url(&self) -> Option<&str> {
        self.ssh_url_to_repo
            .as_deref()
            .or(self.http_url_to_repo.as_deref())
    }
}

/// Payload for `POST /groups`. `parent_id` is omitted from the JSON when
/// absent; GitLab treats a missing field as "create at the top level".
#[derive(Serialize, Debug)]
pub struct NewGroup {
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    pub description: String,
    pub visibility: String,
}

impl NewGroup {
    /// Build a creation payload, deriving the URL path from the display
    /// name ("My Team" becomes "my-team").
    pub fn new(name: &str, parent_id: Option<u64>, description: String, visibility: String) -> Self {
        NewGroup {
            path: path_from_name(name),
            name: name.trim().to_string(),
            parent_id,
            description,
            visibility,
        }
    }
}

/// Payload for `POST /projects`. With no `namespace_id` the project lands
/// in the token owner's personal namespace.
#[derive(Serialize, Debug)]
pub struct NewProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<u64>,
    pub description: String,
    pub visibility: String,
    pub initialize_with_readme: bool,
    pub auto_devops_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_config_path: Option<String>,
}

/// Derive a URL-safe path from a display name: lowercased, runs of
/// whitespace collapsed into single hyphens.
pub fn path_from_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Blocking client holding the base URL; the private token rides along as
/// a default `PRIVATE-TOKEN` header on every request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create an ApiClient configured from the environment: `GITLAB_URL`
    /// (default `https://gitlab.com`) and a token from `GITLAB_TOKEN` or,
    /// failing that, the `~/.labtree_token` file. A missing token is the
    /// one startup error this tool has.
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url =
            std::env::var("GITLAB_URL").unwrap_or_else(|_| "https://gitlab.com".into());
        let token = std::env::var("GITLAB_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(load_token_file)
            .context("no credential found: set GITLAB_TOKEN or put a token in ~/.labtree_token")?;

        let mut headers = HeaderMap::new();
        let mut value =
            HeaderValue::from_str(&token).context("token is not a valid header value")?;
        value.set_sensitive(true);
        headers.insert("PRIVATE-TOKEN", value);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List groups that have no parent.
    pub fn list_top_level_groups(&self) -> ApiResult<Vec<Group>> {
        self.get("/groups?top_level_only=true&per_page=100")
    }

    /// List the immediate subgroups of a group.
    pub fn list_subgroups(&self, group_id: u64) -> ApiResult<Vec<Group>> {
        self.get(&format!("/groups/{}/subgroups?per_page=100", group_id))
    }

    /// List the projects owned directly by a group.
    pub fn list_projects(&self, group_id: u64) -> ApiResult<Vec<Project>> {
        self.get(&format!("/groups/{}/projects?per_page=100", group_id))
    }

    /// Create a subgroup (or a top-level group when the payload carries no
    /// parent). Visibility is forwarded as given; an invalid value is
    /// rejected by the server and comes back as `ApiError::Status`.
    pub fn create_subgroup(&self, req: &NewGroup) -> ApiResult<Group> {
        self.post("/groups", req)
    }

    /// Create a project and return it with its clone URLs.
    pub fn create_project(&self, req: &NewProject) -> ApiResult<Project> {
        self.post("/projects", req)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = format!("{}/api/v4{}", self.base_url, path);
        debug!(%url, "GET");
        let res = self.client.get(&url).send()?;
        read_response(res)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, payload: &B) -> ApiResult<T> {
        let url = format!("{}/api/v4{}", self.base_url, path);
        debug!(%url, "POST");
        let res = self.client.post(&url).json(payload).send()?;
        read_response(res)
    }
}

fn read_response<T: DeserializeOwned>(res: Response) -> ApiResult<T> {
    let status = res.status();
    let body = res.text()?;
    if !status.is_success() {
        return Err(ApiError::Status { status, body });
    }
    decode(&body)
}

/// Typed deserialization that fails closed: a body that does not match the
/// expected shape is an error, never an empty result.
fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    Ok(serde_json::from_str(body)?)
}

/// Read a token persisted in the user's home directory.
fn load_token_file() -> Option<String> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let token = std::fs::read_to_string(dir.join(".labtree_token")).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn path_derivation_lowercases_and_hyphenates() {
        assert_eq!(path_from_name("My Team"), "my-team");
        assert_eq!(path_from_name("  Platform   Tools "), "platform-tools");
        assert_eq!(path_from_name("infra"), "infra");
    }

    #[test]
    fn decodes_group_listing() {
        let body = r#"[
            {"id": 1, "name": "Alpha", "full_path": "alpha", "parent_id": null},
            {"id": 2, "name": "Beta", "full_path": "alpha/beta", "parent_id": 1}
        ]"#;
        let groups: Vec<Group> = decode(body).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Alpha");
        assert_eq!(groups[0].parent_id, None);
        assert_eq!(groups[1].parent_id, Some(1));
    }

    #[test]
    fn malformed_body_is_a_typed_error_not_an_empty_listing() {
        let err = decode::<Vec<Group>>("{ not json at all").unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));

        // Well-formed JSON of the wrong shape fails closed too.
        let err = decode::<Vec<Group>>(r#"{"message": "ok"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[test]
    fn new_group_omits_parent_id_when_absent() {
        let req = NewGroup::new("My Team", None, "desc".into(), "private".into());
        assert_eq!(req.path, "my-team");
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("parent_id").is_none());

        let req = NewGroup::new("My Team", Some(7), "desc".into(), "private".into());
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["parent_id"], 7);
    }

    #[test]
    fn new_project_omits_empty_optionals() {
        let req = NewProject {
            name: "svc".into(),
            namespace_id: None,
            description: String::new(),
            visibility: "internal".into(),
            initialize_with_readme: true,
            auto_devops_enabled: false,
            ci_config_path: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("namespace_id").is_none());
        assert!(value.get("ci_config_path").is_none());
        assert_eq!(value["initialize_with_readme"], true);
    }

    #[test]
    fn clone_url_prefers_ssh() {
        let mut project = Project {
            id: 1,
            name: "svc".into(),
            path_with_namespace: "alpha/svc".into(),
            ssh_url_to_repo: Some("git@gitlab.com:alpha/svc.git".into()),
            http_url_to_repo: Some("https://gitlab.com/alpha/svc.git".into()),
        };
        assert_eq!(project.clone_url(), Some("git@gitlab.com:alpha/svc.git"));

        project.ssh_url_to_repo = None;
        assert_eq!(project.clone_url(), Some("https://gitlab.com/alpha/svc.git"));

        project.http_url_to_repo = None;
        assert_eq!(project.clone_url(), None);
    }
}
