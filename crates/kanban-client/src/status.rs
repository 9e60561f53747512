use kanban_domain::TaskStatus;

/// Outcome of normalizing a free-form status string, such as a column id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusResolution {
    Exact(TaskStatus),
    /// Nothing matched; the task is treated as `TODO`.
    Fallback { input: String },
}

impl StatusResolution {
    pub fn status(&self) -> TaskStatus {
        match self {
            StatusResolution::Exact(status) => *status,
            StatusResolution::Fallback { .. } => TaskStatus::Todo,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, StatusResolution::Fallback { .. })
    }
}

/// Case-insensitive match against the canonical statuses, after trimming.
/// Total: every input resolves to some status.
pub fn parse_status(input: &str) -> StatusResolution {
    let trimmed = input.trim();
    TaskStatus::ALL
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
        .map(StatusResolution::Exact)
        .unwrap_or_else(|| StatusResolution::Fallback {
            input: input.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches_ignore_case_and_whitespace() {
        assert_eq!(parse_status("done"), StatusResolution::Exact(TaskStatus::Done));
        assert_eq!(
            parse_status(" In_Progress "),
            StatusResolution::Exact(TaskStatus::InProgress)
        );
        assert_eq!(parse_status("TODO"), StatusResolution::Exact(TaskStatus::Todo));
    }

    #[test]
    fn test_unknown_falls_back_to_todo() {
        for input in ["", "ARCHIVED", "in progress", "inprogress"] {
            let resolution = parse_status(input);
            assert!(resolution.is_fallback(), "{input:?} should fall back");
            assert_eq!(resolution.status(), TaskStatus::Todo);
        }
        assert_eq!(
            parse_status("ARCHIVED"),
            StatusResolution::Fallback {
                input: "ARCHIVED".to_string()
            }
        );
    }
}
