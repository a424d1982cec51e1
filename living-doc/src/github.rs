//! # GitHub client (CLI <-> Core)
//!
//! Implements the [`IssueSource`] and [`ProjectSource`] contracts of `living-doc-core`
//! against the GitHub REST API (issues) and GraphQL API (Projects v2).
//!
//! - Construct [`GithubClient`] from the environment (`GITHUB_TOKEN` or `INPUT_GITHUB_TOKEN`)
//!   or with an explicit token.
//! - Response bodies are decoded by the pure `parse_*` functions below, which carry the
//!   mapping rules (pull requests excluded, single select values only) and are tested
//!   without network access.
//! - Failures are returned as-is. The client performs no retries.

use async_trait::async_trait;
use living_doc_core::contract::{IssueSource, ProjectSource, SourceError};
use living_doc_core::issue::RawIssue;
use living_doc_core::layout::split_repository_id;
use living_doc_core::project::{
    matches_title_filter, ProjectFieldOptions, RawProject, RawProjectIssue,
};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use std::env;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const ISSUES_PER_PAGE: usize = 100;
const CLIENT_USER_AGENT: &str = concat!("living-doc/", env!("CARGO_PKG_VERSION"));

const PROJECTS_QUERY: &str = r#"
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    projectsV2(first: 100) {
      nodes {
        id
        number
        title
        owner {
          ... on Organization { login }
          ... on User { login }
        }
        fields(first: 100) {
          nodes {
            ... on ProjectV2SingleSelectField {
              name
              options { name }
            }
          }
        }
      }
    }
  }
}
"#;

const PROJECT_ITEMS_QUERY: &str = r#"
query($id: ID!, $after: String) {
  node(id: $id) {
    ... on ProjectV2 {
      items(first: 100, after: $after) {
        pageInfo { hasNextPage endCursor }
        nodes {
          content {
            ... on Issue {
              number
              repository { name owner { login } }
            }
          }
          fieldValues(first: 100) {
            nodes {
              ... on ProjectV2ItemFieldSingleSelectValue { name }
            }
          }
        }
      }
    }
  }
}
"#;

pub struct GithubClient {
    http: reqwest::Client,
    token: String,
    api_url: String,
}

impl GithubClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    /// Client against another API root, such as a GitHub Enterprise server.
    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn new_from_env() -> Result<Self, SourceError> {
        dotenvy::dotenv().ok();
        match env::var("GITHUB_TOKEN").or_else(|_| env::var("INPUT_GITHUB_TOKEN")) {
            Ok(token) if !token.trim().is_empty() => {
                tracing::info!("Initialized GithubClient from environment");
                Ok(Self::new(token))
            }
            Ok(_) => {
                tracing::error!("GitHub token in environment is empty");
                Err("GitHub token in environment is empty".into())
            }
            Err(e) => {
                tracing::error!(error = ?e, "GITHUB_TOKEN missing in environment");
                Err(Box::new(e))
            }
        }
    }

    /// Every issue of one label query, following pagination.
    async fn fetch_issue_pages(
        &self,
        repository_id: &str,
        label: Option<&str>,
    ) -> Result<Vec<RawIssue>, SourceError> {
        let url = format!("{}/repos/{}/issues", self.api_url, repository_id);
        let mut issues = Vec::new();
        let mut page = 1usize;
        loop {
            let mut query = vec![
                ("state", "all".to_string()),
                ("per_page", ISSUES_PER_PAGE.to_string()),
                ("page", page.to_string()),
            ];
            if let Some(label) = label {
                query.push(("labels", label.to_string()));
            }

            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .header(USER_AGENT, CLIENT_USER_AGENT)
                .header(ACCEPT, "application/vnd.github+json")
                .query(&query)
                .send()
                .await?;
            if response.status() == StatusCode::NOT_FOUND {
                tracing::error!(repository = %repository_id, "Repository not found");
                return Err(format!("repository {repository_id} not found").into());
            }
            let body = response.error_for_status()?.text().await?;
            let parsed = parse_issues(&body)?;
            tracing::debug!(
                repository = %repository_id,
                label = ?label,
                page,
                items = parsed.item_count,
                "Fetched issue page"
            );
            issues.extend(parsed.issues);

            if parsed.item_count < ISSUES_PER_PAGE {
                return Ok(issues);
            }
            page += 1;
        }
    }

    async fn graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<String, SourceError> {
        let response = self
            .http
            .post(format!("{}/graphql", self.api_url))
            .bearer_auth(&self.token)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl IssueSource for GithubClient {
    async fn fetch_issues(
        &self,
        repository_id: &str,
        label_filter: &[String],
    ) -> Result<Vec<RawIssue>, SourceError> {
        // One query per label: the REST labels parameter ANDs labels together.
        let queries: Vec<Option<&str>> = if label_filter.is_empty() {
            vec![None]
        } else {
            label_filter.iter().map(|l| Some(l.as_str())).collect()
        };

        let mut seen = HashSet::new();
        let mut issues = Vec::new();
        for label in queries {
            for issue in self.fetch_issue_pages(repository_id, label).await? {
                if seen.insert(issue.number) {
                    issues.push(issue);
                }
            }
        }
        tracing::info!(repository = %repository_id, count = issues.len(), "Fetched issues from GitHub");
        Ok(issues)
    }
}

#[async_trait]
impl ProjectSource for GithubClient {
    async fn fetch_projects(
        &self,
        repository_id: &str,
        title_filter: &[String],
    ) -> Result<Vec<RawProject>, SourceError> {
        let (owner, name) = split_repository_id(repository_id);
        let body = self
            .graphql(PROJECTS_QUERY, json!({ "owner": owner, "name": name }))
            .await?;
        let projects = parse_projects(&body, owner, title_filter).map_err(|e| {
            tracing::error!(repository = %repository_id, error = %e, "Failed to read projects");
            e
        })?;
        tracing::info!(repository = %repository_id, count = projects.len(), "Fetched projects from GitHub");
        Ok(projects)
    }

    async fn fetch_project_issues(
        &self,
        project: &RawProject,
    ) -> Result<Vec<RawProjectIssue>, SourceError> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let body = self
                .graphql(
                    PROJECT_ITEMS_QUERY,
                    json!({ "id": project.id, "after": cursor }),
                )
                .await?;
            let page = parse_project_items(&body)?;
            items.extend(page.items);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        tracing::info!(project = %project.title, count = items.len(), "Fetched project items from GitHub");
        Ok(items)
    }
}

// ---- REST issues ----

#[derive(Debug, Deserialize)]
struct RestIssue {
    number: u64,
    title: Option<String>,
    state: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<RestLabel>,
    created_at: Option<String>,
    updated_at: Option<String>,
    closed_at: Option<String>,
    html_url: String,
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RestLabel {
    name: String,
}

/// One decoded page of the REST issues endpoint.
#[derive(Debug)]
pub struct IssuePage {
    /// Issues on the page, pull requests removed.
    pub issues: Vec<RawIssue>,
    /// Items on the page before removing pull requests; drives pagination.
    pub item_count: usize,
}

pub fn parse_issues(body: &str) -> Result<IssuePage, serde_json::Error> {
    let items: Vec<RestIssue> = serde_json::from_str(body)?;
    let item_count = items.len();
    let issues = items
        .into_iter()
        .filter(|item| item.pull_request.is_none())
        .map(|item| RawIssue {
            number: item.number,
            title: item.title.filter(|t| !t.trim().is_empty()),
            state: item.state,
            body: item.body,
            labels: item.labels.into_iter().map(|l| l.name).collect(),
            created_at: item.created_at,
            updated_at: item.updated_at,
            closed_at: item.closed_at,
            html_url: item.html_url,
        })
        .collect();
    Ok(IssuePage { issues, item_count })
}

// ---- GraphQL projects ----

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl<T> GraphQlResponse<T> {
    fn into_data(self) -> Result<T, SourceError> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(format!("GraphQL error: {}", messages.join("; ")).into());
        }
        self.data
            .ok_or_else(|| SourceError::from("GraphQL response without data"))
    }
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<Option<T>>,
}

#[derive(Debug, Deserialize)]
struct RepositoryProjectsData {
    repository: Option<RepositoryProjects>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryProjects {
    projects_v2: Connection<ProjectNode>,
}

#[derive(Debug, Deserialize)]
struct ProjectNode {
    id: String,
    number: u64,
    title: String,
    owner: Option<Owner>,
    fields: Connection<FieldNode>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FieldNode {
    name: Option<String>,
    options: Option<Vec<FieldOption>>,
}

#[derive(Debug, Deserialize)]
struct FieldOption {
    name: String,
}

/// Projects of a repository that pass `title_filter`, with their field option vocabulary.
///
/// `default_owner` names the organization when the project owner is not readable.
pub fn parse_projects(
    body: &str,
    default_owner: &str,
    title_filter: &[String],
) -> Result<Vec<RawProject>, SourceError> {
    let response: GraphQlResponse<RepositoryProjectsData> = serde_json::from_str(body)?;
    let repository = response
        .into_data()?
        .repository
        .ok_or_else(|| SourceError::from("repository not found"))?;

    let projects = repository
        .projects_v2
        .nodes
        .into_iter()
        .flatten()
        .filter(|project| matches_title_filter(&project.title, title_filter))
        .map(|project| {
            let mut field_options = ProjectFieldOptions::default();
            for field in project.fields.nodes.into_iter().flatten() {
                if let (Some(name), Some(options)) = (field.name, field.options) {
                    field_options.add_field(&name, options.into_iter().map(|o| o.name).collect());
                }
            }
            RawProject {
                id: project.id,
                number: project.number,
                title: project.title,
                organization_name: project
                    .owner
                    .and_then(|o| o.login)
                    .unwrap_or_else(|| default_owner.to_string()),
                field_options,
            }
        })
        .collect();
    Ok(projects)
}

#[derive(Debug, Deserialize)]
struct ProjectItemsData {
    node: Option<ProjectItemsNode>,
}

#[derive(Debug, Deserialize)]
struct ProjectItemsNode {
    items: ItemConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemConnection {
    page_info: PageInfo,
    #[serde(default = "Vec::new")]
    nodes: Vec<Option<ItemNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemNode {
    content: Option<ItemContent>,
    field_values: Connection<FieldValueNode>,
}

#[derive(Debug, Deserialize)]
struct ItemContent {
    number: Option<u64>,
    repository: Option<ItemRepository>,
}

#[derive(Debug, Deserialize)]
struct ItemRepository {
    name: String,
    owner: Owner,
}

#[derive(Debug, Deserialize)]
struct FieldValueNode {
    name: Option<String>,
}

/// One decoded page of a project's items.
#[derive(Debug)]
pub struct ProjectItemsPage {
    /// Issue items. Pull requests and draft issues are left out.
    pub items: Vec<RawProjectIssue>,
    pub next_cursor: Option<String>,
}

pub fn parse_project_items(body: &str) -> Result<ProjectItemsPage, SourceError> {
    let response: GraphQlResponse<ProjectItemsData> = serde_json::from_str(body)?;
    let connection = response
        .into_data()?
        .node
        .ok_or_else(|| SourceError::from("project not found"))?
        .items;

    let items = connection
        .nodes
        .into_iter()
        .flatten()
        .filter_map(|item| {
            let content = item.content?;
            let number = content.number?;
            let repository = content.repository?;
            Some(RawProjectIssue {
                organization_name: repository.owner.login?,
                repository_name: repository.name,
                number,
                field_values: item
                    .field_values
                    .nodes
                    .into_iter()
                    .flatten()
                    .filter_map(|value| value.name)
                    .collect(),
            })
        })
        .collect();

    let next_cursor = if connection.page_info.has_next_page {
        connection.page_info.end_cursor
    } else {
        None
    };
    Ok(ProjectItemsPage { items, next_cursor })
}
