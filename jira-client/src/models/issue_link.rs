use serde::{Deserialize, Serialize};

/// Body of the `issueLink` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueLink {
    #[serde(rename = "linkType")]
    pub link_type: String,
    #[serde(rename = "fromIssueKey")]
    pub from_issue_key: String,
    #[serde(rename = "toIssueKey")]
    pub to_issue_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<LinkComment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkComment {
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<CommentVisibility>,
}

/// Restricts who can read a comment, e.g. `GROUP` / `jira-users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentVisibility {
    #[serde(rename = "type")]
    pub visibility_type: String,
    pub value: String,
}

impl IssueLink {
    pub fn new(
        link_type: impl Into<String>,
        from_issue_key: impl Into<String>,
        to_issue_key: impl Into<String>,
    ) -> Self {
        Self {
            link_type: link_type.into(),
            from_issue_key: from_issue_key.into(),
            to_issue_key: to_issue_key.into(),
            comment: None,
        }
    }

    pub fn comment(mut self, body: impl Into<String>) -> Self {
        self.comment = Some(LinkComment {
            body: body.into(),
            visibility: None,
        });
        self
    }

    pub fn visible_to(mut self, visibility_type: impl Into<String>, value: impl Into<String>) -> Self {
        let visibility = CommentVisibility {
            visibility_type: visibility_type.into(),
            value: value.into(),
        };
        match self.comment.as_mut() {
            Some(comment) => comment.visibility = Some(visibility),
            None => {
                self.comment = Some(LinkComment {
                    body: String::new(),
                    visibility: Some(visibility),
                })
            }
        }
        self
    }
}
