use serde::{Deserialize, Serialize};

/// An assigned issue with its historical work-log entries
#[derive(Debug, Clone)]
pub struct Issue {
    pub id: String,
    pub key: String,
    pub project: String,
    pub summary: String,
    pub worklogs: Vec<WorklogEntry>,
}

/// One timestamped record of time spent on an issue, as reported by Jira
#[derive(Debug, Clone)]
pub struct WorklogEntry {
    pub started: Option<String>,
    pub time_spent: Option<String>,
}

/// Response from the Jira issue search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub issues: Vec<JiraIssue>,
}

/// Jira issue as returned by the search endpoint
#[derive(Debug, Deserialize)]
pub struct JiraIssue {
    pub id: String,
    pub key: String,
    pub fields: JiraFields,
}

#[derive(Debug, Deserialize)]
pub struct JiraFields {
    pub summary: String,
    pub project: JiraProject,
    #[serde(default)]
    pub worklog: JiraWorklogs,
}

#[derive(Debug, Deserialize)]
pub struct JiraProject {
    pub name: String,
}

/// Worklog container embedded in an issue; the server caps it at one page
#[derive(Debug, Deserialize, Default)]
pub struct JiraWorklogs {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub worklogs: Vec<JiraWorklogEntry>,
}

/// One worklog row in the embedded container
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct JiraWorklogEntry {
    pub started: Option<String>,
    pub time_spent: Option<String>,
}

/// Worklog creation request for the Jira REST API
#[derive(Debug, Serialize)]
pub struct CreateWorklogRequest {
    #[serde(rename = "timeSpentSeconds")]
    pub time_spent_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<AdfDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
}

/// Minimal Atlassian Document Format wrapper for a plain-text comment
#[derive(Debug, Serialize)]
pub struct AdfDocument {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub version: u32,
    pub content: Vec<AdfParagraph>,
}

#[derive(Debug, Serialize)]
pub struct AdfParagraph {
    #[serde(rename = "type")]
    pub node_type: String,
    pub content: Vec<AdfText>,
}

#[derive(Debug, Serialize)]
pub struct AdfText {
    #[serde(rename = "type")]
    pub node_type: String,
    pub text: String,
}

impl AdfDocument {
    /// Wrap plain text in the single-paragraph document Jira expects
    pub fn paragraph(text: &str) -> Self {
        Self {
            doc_type: "doc".to_string(),
            version: 1,
            content: vec![AdfParagraph {
                node_type: "paragraph".to_string(),
                content: vec![AdfText {
                    node_type: "text".to_string(),
                    text: text.to_string(),
                }],
            }],
        }
    }
}

/// Worklog created by the Jira REST API
#[derive(Debug, Deserialize)]
pub struct CreatedWorklog {
    pub id: String,
    #[serde(rename = "issueId")]
    pub issue_id: Option<String>,
}

/// Application context for passing configuration and flags
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub dry_run: bool,
    pub quiet: bool,
    pub verbose: bool,
}
