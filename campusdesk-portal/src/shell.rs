//! Dashboard shell
//!
//! [`Portal`] owns every piece of client state; [`DashboardShell`] turns it
//! into what the layout shows for the current route.

use crate::navigation::{render_nav, MobileNav, NavEntry, NavItem, NAV_ITEMS};
use crate::notifications::Notifications;
use crate::routing::{resolve, GuardDecision, Route, Router};
use crate::session::SessionStore;
use crate::storage::DurableStorage;
use crate::theme::{DocumentRoot, ThemeMode, ThemeStore};
use campusdesk_core::StorageConfig;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Client state. Fields are public so flows can borrow the session and the
/// router mutably at the same time.
#[derive(Debug)]
pub struct Portal {
    pub session: SessionStore,
    pub theme: ThemeStore,
    pub router: Router,
    pub mobile_nav: MobileNav,
    pub notifications: Notifications,
}

impl Portal {
    /// Rehydrate both stores from `storage`. The theme is applied to
    /// `document` here, before the first render.
    pub fn init(
        storage: Arc<dyn DurableStorage>,
        document: Arc<DocumentRoot>,
        config: &StorageConfig,
    ) -> Self {
        let session = SessionStore::init(Arc::clone(&storage), config.session_key.clone());
        let theme = ThemeStore::init(storage, config.theme_key.clone(), document);

        let start = match session.role() {
            Some(role) if session.is_authenticated() => Route::home_for(role),
            _ => Route::Login,
        };
        info!(
            authenticated = session.is_authenticated(),
            theme = %theme.mode(),
            start = %start,
            "Portal initialized"
        );

        Self {
            session,
            theme,
            router: Router::new(start),
            mobile_nav: MobileNav::default(),
            notifications: Notifications::default(),
        }
    }

    pub fn open(&mut self, route: Route) {
        self.router.navigate(route);
    }

    /// Sidebar click: go to the item's page and close the mobile panel
    pub fn select_nav_item(&mut self, item: &NavItem) {
        self.router.navigate(Route::from_path(item.path));
        self.mobile_nav.item_selected();
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme.toggle_theme()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    pub email: Option<String>,
    pub role_label: Option<&'static str>,
    pub theme: ThemeMode,
    pub mobile_nav_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageContent {
    pub route: Route,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellView {
    pub nav: Vec<NavEntry>,
    pub header: HeaderView,
    pub content: PageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    /// The guard sent the user elsewhere; nothing of the requested page is shown
    Redirect(Route),
    Page(ShellView),
}

pub struct DashboardShell;

impl DashboardShell {
    /// Run the route guard and lay out the current page.
    ///
    /// On a redirect the router is moved to the target (replacing the
    /// rejected entry) and no page content is produced.
    pub fn render(portal: &mut Portal) -> ShellOutcome {
        let route = portal.router.current();

        if let GuardDecision::Redirect(to) = resolve(route, &portal.session) {
            portal.router.replace(to);
            return ShellOutcome::Redirect(to);
        }

        let role = portal.session.role();
        let user = portal.session.user();
        let view = ShellView {
            nav: render_nav(NAV_ITEMS, role, route.path()),
            header: HeaderView {
                email: user.map(|u| u.email.clone()),
                role_label: role.map(|r| r.label()),
                theme: portal.theme.mode(),
                mobile_nav_open: portal.mobile_nav.is_open(),
            },
            content: PageContent {
                route,
                title: page_title(route),
            },
        };

        debug!(route = %route, nav_items = view.nav.len(), "Rendered shell");
        ShellOutcome::Page(view)
    }

    /// Navigate to `route` and render it through the guard
    pub fn enter(portal: &mut Portal, route: Route) -> ShellOutcome {
        portal.open(route);
        Self::render(portal)
    }
}

fn page_title(route: Route) -> &'static str {
    match route {
        Route::Login => "Sign in",
        Route::Dashboard => "Dashboard",
        Route::StudentDashboard => "My Dashboard",
        Route::StudentProfile => "My Profile",
        Route::Settings => "Settings",
        Route::Colleges => "Colleges",
        Route::Departments => "Departments",
        Route::Courses => "Courses",
        Route::Curricula => "Curricula",
        Route::Batches => "Batches",
        Route::Sections => "Sections",
        Route::Terms => "Terms",
        Route::Faculty => "Faculty",
        Route::Students => "Students",
        Route::NotFound => "Page not found",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Role, SessionUser};
    use crate::storage::MemoryStorage;

    fn portal() -> Portal {
        Portal::init(
            Arc::new(MemoryStorage::new()),
            Arc::new(DocumentRoot::new()),
            &StorageConfig::default(),
        )
    }

    fn user(role: Role) -> SessionUser {
        SessionUser {
            user_id: "u1".to_string(),
            email: "user@uni.edu".to_string(),
            role,
            status: Default::default(),
            name: None,
        }
    }

    #[test]
    fn signed_out_portal_starts_at_login() {
        let mut portal = portal();
        assert_eq!(portal.router.current(), Route::Login);

        portal.open(Route::Courses);
        assert_eq!(
            DashboardShell::render(&mut portal),
            ShellOutcome::Redirect(Route::Login)
        );
        assert_eq!(portal.router.current(), Route::Login);
    }

    #[test]
    fn header_reflects_session_and_panel() {
        let mut portal = portal();
        portal.session.login(user(Role::Admin), "token");
        portal.open(Route::Terms);
        portal.mobile_nav.toggle();

        let ShellOutcome::Page(view) = DashboardShell::render(&mut portal) else {
            panic!("admin may open terms");
        };
        assert_eq!(view.header.email.as_deref(), Some("user@uni.edu"));
        assert_eq!(view.header.role_label, Some(Role::Admin.label()));
        assert!(view.header.mobile_nav_open);
        assert_eq!(view.content.title, "Terms");

        let active: Vec<_> = view.nav.iter().filter(|e| e.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].item.path, "/terms");
    }

    #[test]
    fn selecting_nav_item_closes_panel() {
        let mut portal = portal();
        portal.session.login(user(Role::Faculty), "token");
        portal.mobile_nav.toggle();

        let courses = NAV_ITEMS
            .iter()
            .find(|item| item.path == "/courses")
            .copied()
            .unwrap();
        portal.select_nav_item(&courses);

        assert_eq!(portal.router.current(), Route::Courses);
        assert!(!portal.mobile_nav.is_open());
    }
}
