use super::SidebarEntry;
use crate::menu::Icon;

fn link(id: &str, title: &str, url: &str, icon: Icon) -> SidebarEntry {
    SidebarEntry::Link {
        id: id.to_string(),
        title: title.to_string(),
        url: url.to_string(),
        icon,
        enabled: true,
    }
}

fn group(id: &str, title: &str, icon: Icon, children: Vec<SidebarEntry>) -> SidebarEntry {
    SidebarEntry::Group {
        id: id.to_string(),
        title: title.to_string(),
        url: None,
        icon,
        enabled: true,
        children,
    }
}

/// Minimal navigation shown while the menu tree is empty (loading, failed, or
/// a user without a role)
pub fn fallback_navigation() -> Vec<SidebarEntry> {
    vec![
        link("fallback-dashboard", "Dashboard", "/dashboard", Icon::LayoutDashboard),
        group(
            "fallback-property",
            "Property",
            Icon::Building,
            vec![
                link("fallback-assets", "Assets", "/assets", Icon::Building),
                link("fallback-units", "Units", "/units", Icon::Home),
                link("fallback-tenants", "Tenants", "/tenants", Icon::Users),
            ],
        ),
        group(
            "fallback-operations",
            "Operations",
            Icon::ClipboardList,
            vec![
                link("fallback-tasks", "Tasks", "/tasks", Icon::ClipboardList),
                link("fallback-complaints", "Complaint Reports", "/complaint-reports", Icon::MessageSquareWarning),
            ],
        ),
        link("fallback-profile", "Profile", "/profile", Icon::UserCog),
    ]
}
