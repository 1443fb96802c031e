//! Role-filtered sidebar navigation and the mobile navigation panel

use crate::routing::Route;
use crate::session::{Role, RoleSet};
use serde::Serialize;

/// A sidebar entry. `allowed_roles: None` means every role sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub icon: &'static str,
    pub label: &'static str,
    pub path: &'static str,
    #[serde(skip)]
    pub allowed_roles: Option<RoleSet>,
}

impl NavItem {
    pub const fn new(icon: &'static str, label: &'static str, path: &'static str) -> Self {
        Self {
            icon,
            label,
            path,
            allowed_roles: None,
        }
    }

    pub const fn restricted_to(mut self, roles: RoleSet) -> Self {
        self.allowed_roles = Some(roles);
        self
    }

    /// With no role (signed out, or not loaded yet) only unrestricted
    /// items are visible.
    pub fn is_visible_to(&self, role: Option<Role>) -> bool {
        match (self.allowed_roles, role) {
            (None, _) => true,
            (Some(allowed), Some(role)) => allowed.contains(role),
            (Some(_), None) => false,
        }
    }

    /// Active means an exact path match; `/courses` does not light up on
    /// `/courses/12`.
    pub fn is_active(&self, current_path: &str) -> bool {
        self.path == current_path
    }
}

const STAFF: RoleSet = RoleSet::of(&[Role::SuperAdmin, Role::Admin, Role::Faculty, Role::Ta]);
const ADMINS: RoleSet = RoleSet::of(&[Role::SuperAdmin, Role::Admin]);
const TEACHING: RoleSet = RoleSet::of(&[Role::SuperAdmin, Role::Admin, Role::Faculty]);
const STUDENTS: RoleSet = RoleSet::of(&[Role::Student]);

/// The sidebar, in display order
pub const NAV_ITEMS: &[NavItem] = &[
    NavItem::new("layout-dashboard", "Dashboard", "/dashboard").restricted_to(STAFF),
    NavItem::new("layout-dashboard", "My Dashboard", "/student/dashboard")
        .restricted_to(STUDENTS),
    NavItem::new("id-card", "My Profile", "/student/profile").restricted_to(STUDENTS),
    NavItem::new("landmark", "Colleges", "/colleges")
        .restricted_to(RoleSet::of(&[Role::SuperAdmin])),
    NavItem::new("building", "Departments", "/departments").restricted_to(ADMINS),
    NavItem::new("book-open", "Courses", "/courses").restricted_to(TEACHING),
    NavItem::new("list-tree", "Curricula", "/curricula").restricted_to(ADMINS),
    NavItem::new("users-round", "Batches", "/batches").restricted_to(ADMINS),
    NavItem::new("layers", "Sections", "/sections").restricted_to(TEACHING),
    NavItem::new("calendar", "Terms", "/terms").restricted_to(ADMINS),
    NavItem::new("briefcase", "Faculty", "/faculty").restricted_to(ADMINS),
    NavItem::new("graduation-cap", "Students", "/students").restricted_to(STAFF),
    NavItem::new("settings", "Settings", "/settings"),
];

/// Items of `items` visible to `role`, in their original order
pub fn visible_items(items: &[NavItem], role: Option<Role>) -> Vec<&NavItem> {
    items.iter().filter(|item| item.is_visible_to(role)).collect()
}

/// The navigation table entry pointing at `route`, if any
pub fn nav_item_for(route: Route) -> Option<&'static NavItem> {
    NAV_ITEMS.iter().find(|item| item.path == route.path())
}

/// A rendered sidebar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    #[serde(flatten)]
    pub item: NavItem,
    pub active: bool,
}

/// Visible items with the active one marked
pub fn render_nav(items: &[NavItem], role: Option<Role>, current_path: &str) -> Vec<NavEntry> {
    visible_items(items, role)
        .into_iter()
        .map(|item| NavEntry {
            item: *item,
            active: item.is_active(current_path),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// The slide-over navigation panel shown on narrow screens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileNav {
    state: PanelState,
}

impl MobileNav {
    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == PanelState::Open
    }

    /// Header menu button
    pub fn toggle(&mut self) {
        self.state = match self.state {
            PanelState::Closed => PanelState::Open,
            PanelState::Open => PanelState::Closed,
        };
    }

    pub fn backdrop_clicked(&mut self) {
        self.state = PanelState::Closed;
    }

    pub fn item_selected(&mut self) {
        self.state = PanelState::Closed;
    }
}
