use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity collections the backend exposes list/get/create/update/delete for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Assets,
    Units,
    Tenants,
    Tasks,
    TaskGroups,
    Users,
    Roles,
    ScanInfo,
    Menus,
    ComplaintReports,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::Assets,
        Resource::Units,
        Resource::Tenants,
        Resource::Tasks,
        Resource::TaskGroups,
        Resource::Users,
        Resource::Roles,
        Resource::ScanInfo,
        Resource::Menus,
        Resource::ComplaintReports,
    ];

    /// Path segment under `/api/`
    pub fn segment(&self) -> &'static str {
        match self {
            Resource::Assets => "assets",
            Resource::Units => "units",
            Resource::Tenants => "tenants",
            Resource::Tasks => "tasks",
            Resource::TaskGroups => "task-groups",
            Resource::Users => "users",
            Resource::Roles => "roles",
            Resource::ScanInfo => "scan-info",
            Resource::Menus => "menus",
            Resource::ComplaintReports => "complaint-reports",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.segment() == wanted)
            .ok_or_else(|| format!("Unknown resource '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_segments_and_snake_case() {
        assert_eq!("task-groups".parse::<Resource>().unwrap(), Resource::TaskGroups);
        assert_eq!("complaint_reports".parse::<Resource>().unwrap(), Resource::ComplaintReports);
        assert_eq!("Scan-Info".parse::<Resource>().unwrap(), Resource::ScanInfo);
        assert!("invoices".parse::<Resource>().is_err());
    }
}
