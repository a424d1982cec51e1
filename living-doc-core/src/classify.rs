//! Label based classification of issues into documentation groups and topics.
//!
//! Classification never fails. Label combinations that do not make sense produce a usable
//! fallback plus entries for the issue's error bag, which end up on the report page.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::issue::IssueErrorKind;

/// Directory name used for issues without any topic label in topic grouped layouts.
pub const NO_TOPIC: &str = "NoTopic";

pub const NO_TOPIC_MESSAGE: &str = "No Topic label found.";
pub const MULTIPLE_TOPICS_MESSAGE: &str = "More than one Topic label found.";
pub const MULTIPLE_DOCUMENTATION_MESSAGE: &str = "More than one Documentation label found.";
pub const TOPIC_WITHOUT_DOCUMENTATION_MESSAGE: &str = "Topic label found without Documentation one.";

/// Documentation group of an issue.
///
/// The declaration order is the tie-break priority when an issue carries more than one
/// documentation label: the first declared group wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentationGroup {
    UserStory,
    Feature,
    Functionality,
    Unclassified,
}

impl DocumentationGroup {
    pub const ALL: [DocumentationGroup; 4] = [
        DocumentationGroup::UserStory,
        DocumentationGroup::Feature,
        DocumentationGroup::Functionality,
        DocumentationGroup::Unclassified,
    ];

    /// Root directory of the group inside the output directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            DocumentationGroup::UserStory => "user_stories",
            DocumentationGroup::Feature => "features",
            DocumentationGroup::Functionality => "functionalities",
            DocumentationGroup::Unclassified => "unclassified",
        }
    }

    /// Human readable plural, bound as `{group}` in templates.
    pub fn title(self) -> &'static str {
        match self {
            DocumentationGroup::UserStory => "User Stories",
            DocumentationGroup::Feature => "Features",
            DocumentationGroup::Functionality => "Functionalities",
            DocumentationGroup::Unclassified => "Unclassified Issues",
        }
    }
}

impl fmt::Display for DocumentationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentationGroup::UserStory => "User Story",
            DocumentationGroup::Feature => "Feature",
            DocumentationGroup::Functionality => "Functionality",
            DocumentationGroup::Unclassified => "Unclassified",
        };
        f.write_str(name)
    }
}

/// The two configured label categories: documentation type labels and topic labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationLabels {
    pub user_story: String,
    pub feature: String,
    pub functionality: String,
    /// Labels that always count as topics.
    pub topics: Vec<String>,
    /// Any other label ending with this suffix counts as a topic too.
    pub topic_suffix: Option<String>,
}

impl Default for ClassificationLabels {
    fn default() -> Self {
        Self {
            user_story: "DocumentedUserStory".to_string(),
            feature: "DocumentedFeature".to_string(),
            functionality: "DocumentedFunctionality".to_string(),
            topics: Vec::new(),
            topic_suffix: Some("Topic".to_string()),
        }
    }
}

/// Result of classifying one label set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub group: DocumentationGroup,
    pub topics: Vec<String>,
    pub errors: Vec<(IssueErrorKind, String)>,
}

impl ClassificationLabels {
    pub fn documentation_group(&self, label: &str) -> Option<DocumentationGroup> {
        if label == self.user_story {
            Some(DocumentationGroup::UserStory)
        } else if label == self.feature {
            Some(DocumentationGroup::Feature)
        } else if label == self.functionality {
            Some(DocumentationGroup::Functionality)
        } else {
            None
        }
    }

    pub fn is_topic(&self, label: &str) -> bool {
        if self.documentation_group(label).is_some() {
            return false;
        }
        if self.topics.iter().any(|t| t == label) {
            return true;
        }
        match &self.topic_suffix {
            Some(suffix) if !suffix.is_empty() => {
                label.len() > suffix.len() && label.ends_with(suffix.as_str())
            }
            _ => false,
        }
    }

    /// Classifies an issue by its labels.
    ///
    /// `grouped_by_topic` enables the `NoTopic` fallback for issues without any topic label.
    pub fn classify(&self, labels: &[String], grouped_by_topic: bool) -> Classification {
        let mut groups: Vec<DocumentationGroup> = Vec::new();
        let mut topics: Vec<String> = Vec::new();
        for label in labels {
            if let Some(group) = self.documentation_group(label) {
                if !groups.contains(&group) {
                    groups.push(group);
                }
            } else if self.is_topic(label) && !topics.contains(label) {
                topics.push(label.clone());
            }
        }

        let mut errors = Vec::new();
        if groups.len() > 1 {
            errors.push((
                IssueErrorKind::Documentation,
                MULTIPLE_DOCUMENTATION_MESSAGE.to_string(),
            ));
        }
        if groups.is_empty() && !topics.is_empty() {
            errors.push((
                IssueErrorKind::Documentation,
                TOPIC_WITHOUT_DOCUMENTATION_MESSAGE.to_string(),
            ));
        }
        if topics.len() > 1 {
            errors.push((IssueErrorKind::Topic, MULTIPLE_TOPICS_MESSAGE.to_string()));
        }
        if grouped_by_topic && topics.is_empty() {
            topics.push(NO_TOPIC.to_string());
            errors.push((IssueErrorKind::Topic, NO_TOPIC_MESSAGE.to_string()));
        }

        let group = groups
            .iter()
            .min()
            .copied()
            .unwrap_or(DocumentationGroup::Unclassified);

        debug!(?group, ?topics, errors = errors.len(), "Classified label set");
        Classification {
            group,
            topics,
            errors,
        }
    }
}
