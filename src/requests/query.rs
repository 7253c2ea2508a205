use serde::Deserialize;

/// Collapses absent and blank query parameters to None, the way the admin
/// panel treats empty filter inputs.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
pub struct FileListQuery {
    pub search: Option<String>,
    pub file_type: Option<String>,
    pub subfolder: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ArchivedListQuery {
    pub search: Option<String>,
    pub file_type: Option<String>,
    pub category: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TrashListQuery {
    pub search: Option<String>,
    pub file_type: Option<String>,
    pub category: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FolderPathQuery {
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_collapse_to_none() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("pdf".to_string())), Some("pdf".to_string()));
    }
}
