use crate::config::JiraConfig;
use crate::duration::format_minutes;
use crate::error::{Result, WeeklogError};
use crate::models::{
    AdfDocument, Context, CreateWorklogRequest, CreatedWorklog, Issue, SearchResponse,
};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::{debug, info, warn};
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

/// JQL selecting the caller's not-yet-done assigned issues
const ASSIGNED_INCOMPLETE_JQL: &str = "assignee = currentUser() AND statusCategory != Done";

/// Fields requested alongside each issue; worklog brings the nested entries
const SEARCH_FIELDS: &str = "summary,project,worklog";

lazy_static! {
    static ref ISSUE_KEY_RE: Regex = Regex::new(r"^[A-Z][A-Z0-9]*-\d+$").unwrap();
}

/// Check that a string looks like a Jira issue key (e.g. PROJ-123)
pub fn is_issue_key(candidate: &str) -> bool {
    ISSUE_KEY_RE.is_match(candidate)
}

pub struct JiraClient {
    client: Client,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        // Authorization: Bearer {token}
        let auth_value = format!("Bearer {}", config.access_token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| WeeklogError::Config(format!("Invalid Jira access token: {}", e)))?,
        );

        // Content-Type: application/json
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| WeeklogError::Jira(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Fetch the caller's assigned, not-yet-done issues with their worklogs
    pub fn fetch_assigned_incomplete(&self) -> Result<Vec<Issue>> {
        let url = format!(
            "{}/rest/api/3/search",
            self.config.base_url.trim_end_matches('/')
        );

        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("jql", ASSIGNED_INCOMPLETE_JQL), ("fields", SEARCH_FIELDS)])
            .send()
            .map_err(|e| WeeklogError::Jira(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());

            // Common error cases
            if status == 401 {
                return Err(WeeklogError::Jira(
                    "Authentication failed. Check your Jira access token.".to_string(),
                ));
            } else if status == 403 {
                return Err(WeeklogError::Jira(
                    "Access denied when searching issues. Check your permissions.".to_string(),
                ));
            }

            return Err(WeeklogError::Jira(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let search: SearchResponse = response
            .json()
            .map_err(|e| WeeklogError::Jira(format!("Failed to parse search response: {}", e)))?;

        let issues = search
            .issues
            .into_iter()
            .map(|issue| {
                let worklog = issue.fields.worklog;
                if worklog.total as usize > worklog.worklogs.len() {
                    warn!(
                        "Worklog list for {} is truncated ({} of {} entries); weekly totals may undercount",
                        issue.key,
                        worklog.worklogs.len(),
                        worklog.total
                    );
                }

                Issue {
                    id: issue.id,
                    key: issue.key,
                    project: issue.fields.project.name,
                    summary: issue.fields.summary,
                    worklogs: worklog
                        .worklogs
                        .into_iter()
                        .map(|entry| crate::models::WorklogEntry {
                            started: entry.started,
                            time_spent: entry.time_spent,
                        })
                        .collect(),
                }
            })
            .collect::<Vec<_>>();

        debug!("Retrieved {} assigned issues", issues.len());

        Ok(issues)
    }

    /// Log time against an issue
    ///
    /// `minutes` must already be validated; `started` of `None` lets Jira
    /// stamp the submission time.
    pub fn log_work(
        &self,
        issue_key: &str,
        minutes: u32,
        started: Option<NaiveDate>,
        comment: Option<&str>,
        ctx: &Context,
    ) -> Result<CreatedWorklog> {
        let request = CreateWorklogRequest {
            time_spent_seconds: u64::from(minutes) * 60,
            comment: comment.map(AdfDocument::paragraph),
            started: started.map(|date| format!("{}T00:00:00.000+0000", date.format("%Y-%m-%d"))),
        };

        if ctx.dry_run {
            info!("[DRY RUN] Would log work:");
            info!("  Issue: {}", issue_key);
            info!("  Time spent: {}", format_minutes(minutes));
            if let Some(started) = &request.started {
                info!("  Started: {}", started);
            }
            if let Some(comment) = comment {
                info!("  Comment: {}", comment);
            }
            return Ok(CreatedWorklog {
                id: "0".to_string(),
                issue_id: None,
            });
        }

        let url = format!(
            "{}/rest/api/3/issue/{}/worklog",
            self.config.base_url.trim_end_matches('/'),
            issue_key
        );

        debug!("POST {}", url);
        debug!("Request body: {:?}", request);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| WeeklogError::Jira(format!("Failed to log work: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());

            // Common error cases
            if status == 404 {
                return Err(WeeklogError::Jira(format!(
                    "Issue {} not found. Verify the issue key is correct.",
                    issue_key
                )));
            } else if status == 401 {
                return Err(WeeklogError::Jira(
                    "Authentication failed. Check your Jira access token.".to_string(),
                ));
            } else if status == 403 {
                return Err(WeeklogError::Jira(format!(
                    "Not permitted to log work on {}. Check your permissions.",
                    issue_key
                )));
            }

            return Err(WeeklogError::Jira(format!(
                "Failed to log work ({}): {}",
                status, error_text
            )));
        }

        let created: CreatedWorklog = response
            .json()
            .map_err(|e| WeeklogError::Jira(format!("Failed to parse created worklog: {}", e)))?;

        info!("Logged {} on {}", format_minutes(minutes), issue_key);
        Ok(created)
    }

    /// Build the Jira issue URL
    pub fn issue_url(&self, issue_key: &str) -> String {
        format!(
            "{}/browse/{}",
            self.config.base_url.trim_end_matches('/'),
            issue_key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const SEARCH_BODY: &str = r#"{
        "issues": [
            {
                "id": "10001",
                "key": "APO-1",
                "fields": {
                    "summary": "Fix the widget",
                    "project": { "name": "Apollo" },
                    "worklog": {
                        "total": 2,
                        "worklogs": [
                            { "started": "2026-01-19T09:00:00.000+0000", "timeSpent": "1h" },
                            { "started": "2026-01-12T09:00:00.000+0000", "timeSpent": "3h" }
                        ]
                    }
                }
            },
            {
                "id": "10002",
                "key": "APO-2",
                "fields": {
                    "summary": "Ship the gadget",
                    "project": { "name": "Apollo" }
                }
            }
        ]
    }"#;

    fn test_client(base_url: String) -> JiraClient {
        JiraClient::new(JiraConfig {
            access_token: "test-token".to_string(),
            base_url,
        })
        .unwrap()
    }

    #[test]
    fn test_is_issue_key() {
        assert!(is_issue_key("APO-1"));
        assert!(is_issue_key("PROJ2-12345"));
        assert!(is_issue_key("A-123"));

        assert!(!is_issue_key("apo-1"));
        assert!(!is_issue_key("APO1"));
        assert!(!is_issue_key("APO-"));
        assert!(!is_issue_key("-1"));
        assert!(!is_issue_key("APO-12x"));
        assert!(!is_issue_key(" APO-1"));
    }

    #[test]
    fn test_fetch_assigned_incomplete() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/rest/api/3/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("jql".into(), ASSIGNED_INCOMPLETE_JQL.into()),
                Matcher::UrlEncoded("fields".into(), SEARCH_FIELDS.into()),
            ]))
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SEARCH_BODY)
            .create();

        let client = test_client(server.url());
        let issues = client.fetch_assigned_incomplete().unwrap();

        mock.assert();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].key, "APO-1");
        assert_eq!(issues[0].project, "Apollo");
        assert_eq!(issues[0].summary, "Fix the widget");
        assert_eq!(issues[0].worklogs.len(), 2);
        assert_eq!(issues[0].worklogs[0].time_spent.as_deref(), Some("1h"));
        assert_eq!(issues[1].key, "APO-2");
        assert!(issues[1].worklogs.is_empty());
    }

    #[test]
    fn test_fetch_auth_failure() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/rest/api/3/search")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("Unauthorized")
            .create();

        let client = test_client(server.url());
        let err = client.fetch_assigned_incomplete().unwrap_err();

        assert!(err.to_string().contains("access token"));
    }

    #[test]
    fn test_log_work_posts_request() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/rest/api/3/issue/APO-1/worklog")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "timeSpentSeconds": 5400,
                "started": "2026-01-21T00:00:00.000+0000"
            })))
            .with_status(201)
            .with_body(r#"{"id": "30001", "issueId": "10001"}"#)
            .create();

        let client = test_client(server.url());
        let started = NaiveDate::from_ymd_opt(2026, 1, 21).unwrap();
        let created = client
            .log_work("APO-1", 90, Some(started), None, &Context::default())
            .unwrap();

        mock.assert();
        assert_eq!(created.id, "30001");
        assert_eq!(created.issue_id.as_deref(), Some("10001"));
    }

    #[test]
    fn test_log_work_with_comment_builds_document() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/rest/api/3/issue/APO-2/worklog")
            .match_body(Matcher::Json(serde_json::json!({
                "timeSpentSeconds": 1800,
                "comment": {
                    "type": "doc",
                    "version": 1,
                    "content": [
                        {
                            "type": "paragraph",
                            "content": [{ "type": "text", "text": "Code review" }]
                        }
                    ]
                }
            })))
            .with_status(201)
            .with_body(r#"{"id": "30002"}"#)
            .create();

        let client = test_client(server.url());
        client
            .log_work("APO-2", 30, None, Some("Code review"), &Context::default())
            .unwrap();

        mock.assert();
    }

    #[test]
    fn test_log_work_unknown_issue() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/rest/api/3/issue/APO-999/worklog")
            .with_status(404)
            .with_body(r#"{"errorMessages":["Issue does not exist"]}"#)
            .create();

        let client = test_client(server.url());
        let err = client
            .log_work("APO-999", 60, None, None, &Context::default())
            .unwrap_err();

        assert!(err.to_string().contains("APO-999"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_log_work_failure_includes_status_and_body() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/rest/api/3/issue/APO-1/worklog")
            .with_status(400)
            .with_body(r#"{"errorMessages":["Worklog time cannot be zero"]}"#)
            .create();

        let client = test_client(server.url());
        let err = client
            .log_work("APO-1", 60, None, None, &Context::default())
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("Worklog time cannot be zero"));
    }

    #[test]
    fn test_log_work_dry_run_skips_request() {
        let mut server = mockito::Server::new();
        let mock = server.mock("POST", Matcher::Any).expect(0).create();

        let ctx = Context {
            dry_run: true,
            ..Default::default()
        };

        let client = test_client(server.url());
        let created = client.log_work("APO-1", 60, None, None, &ctx).unwrap();

        mock.assert();
        assert_eq!(created.id, "0");
    }

    #[test]
    fn test_issue_url_trims_trailing_slash() {
        let client = test_client("https://example.atlassian.net/".to_string());
        assert_eq!(
            client.issue_url("APO-1"),
            "https://example.atlassian.net/browse/APO-1"
        );
    }
}
