use serde::{Deserialize, Serialize};

/// Icons the navigation can show. The backend sends free-form names; anything
/// not listed here renders as `Circle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    LayoutDashboard,
    Building,
    Home,
    Users,
    UserCog,
    ClipboardList,
    FolderKanban,
    ShieldCheck,
    Menu,
    CalendarCheck,
    QrCode,
    MessageSquareWarning,
    FileText,
    BarChart,
    Settings,
    Circle,
}

impl Icon {
    pub const DEFAULT: Icon = Icon::Circle;

    /// Resolve a symbolic name (`"LayoutDashboard"`, `"layout-dashboard"`,
    /// `"layout_dashboard"` are equivalent) to a known icon.
    pub fn resolve(name: &str) -> Icon {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "layoutdashboard" | "dashboard" => Icon::LayoutDashboard,
            "building" | "building2" | "assets" => Icon::Building,
            "home" | "house" | "units" => Icon::Home,
            "users" | "user" | "tenants" => Icon::Users,
            "usercog" | "usersettings" => Icon::UserCog,
            "clipboardlist" | "clipboard" | "tasks" => Icon::ClipboardList,
            "folderkanban" | "kanban" => Icon::FolderKanban,
            "shieldcheck" | "shield" | "roles" => Icon::ShieldCheck,
            "menu" | "listtree" => Icon::Menu,
            "calendarcheck" | "calendar" | "attendance" => Icon::CalendarCheck,
            "qrcode" | "scan" | "scanline" => Icon::QrCode,
            "messagesquarewarning" | "messagesquare" | "complaints" => Icon::MessageSquareWarning,
            "filetext" | "file" | "reports" => Icon::FileText,
            "barchart" | "barchart3" | "chart" => Icon::BarChart,
            "settings" | "settings2" | "cog" => Icon::Settings,
            "circle" => Icon::Circle,
            _ => Icon::DEFAULT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Icon::LayoutDashboard => "layout-dashboard",
            Icon::Building => "building",
            Icon::Home => "home",
            Icon::Users => "users",
            Icon::UserCog => "user-cog",
            Icon::ClipboardList => "clipboard-list",
            Icon::FolderKanban => "folder-kanban",
            Icon::ShieldCheck => "shield-check",
            Icon::Menu => "menu",
            Icon::CalendarCheck => "calendar-check",
            Icon::QrCode => "qr-code",
            Icon::MessageSquareWarning => "message-square-warning",
            Icon::FileText => "file-text",
            Icon::BarChart => "bar-chart",
            Icon::Settings => "settings",
            Icon::Circle => "circle",
        }
    }
}

impl Default for Icon {
    fn default() -> Self {
        Icon::DEFAULT
    }
}
