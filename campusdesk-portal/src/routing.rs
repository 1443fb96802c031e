//! Routes, navigation history and the route guard
//!
//! All page access decisions go through [`resolve`]; pages never check the
//! session themselves.

use crate::navigation::nav_item_for;
use crate::session::{Role, SessionStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Every page the client can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Login,
    Dashboard,
    StudentDashboard,
    StudentProfile,
    Settings,
    Colleges,
    Departments,
    Courses,
    Curricula,
    Batches,
    Sections,
    Terms,
    Faculty,
    Students,
    NotFound,
}

/// Which audience a route belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteArea {
    /// Reachable without a session
    Public,
    /// Staff dashboard pages
    Staff,
    /// Student portal pages
    Student,
    /// Any signed-in user
    Shared,
}

impl Route {
    pub const ALL: [Route; 15] = [
        Route::Login,
        Route::Dashboard,
        Route::StudentDashboard,
        Route::StudentProfile,
        Route::Settings,
        Route::Colleges,
        Route::Departments,
        Route::Courses,
        Route::Curricula,
        Route::Batches,
        Route::Sections,
        Route::Terms,
        Route::Faculty,
        Route::Students,
        Route::NotFound,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::StudentDashboard => "/student/dashboard",
            Route::StudentProfile => "/student/profile",
            Route::Settings => "/settings",
            Route::Colleges => "/colleges",
            Route::Departments => "/departments",
            Route::Courses => "/courses",
            Route::Curricula => "/curricula",
            Route::Batches => "/batches",
            Route::Sections => "/sections",
            Route::Terms => "/terms",
            Route::Faculty => "/faculty",
            Route::Students => "/students",
            Route::NotFound => "/404",
        }
    }

    /// Resolve a browser path. `/` goes to the login page, a trailing slash
    /// is ignored, and anything unknown is [`Route::NotFound`].
    pub fn from_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            return Route::Login;
        }

        Route::ALL
            .into_iter()
            .find(|r| *r != Route::NotFound && r.path() == trimmed)
            .unwrap_or(Route::NotFound)
    }

    pub fn area(&self) -> RouteArea {
        match self {
            Route::Login | Route::NotFound => RouteArea::Public,
            Route::StudentDashboard | Route::StudentProfile => RouteArea::Student,
            Route::Settings => RouteArea::Shared,
            Route::Dashboard
            | Route::Colleges
            | Route::Departments
            | Route::Courses
            | Route::Curricula
            | Route::Batches
            | Route::Sections
            | Route::Terms
            | Route::Faculty
            | Route::Students => RouteArea::Staff,
        }
    }

    /// Landing page after sign-in
    pub fn home_for(role: Role) -> Route {
        match role {
            Role::Student => Route::StudentDashboard,
            Role::SuperAdmin | Role::Admin | Role::Faculty | Role::Ta => Route::Dashboard,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of checking a route against the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Decide whether the current session may see `route`.
///
/// Rules, first match wins: public routes are open; everything else needs a
/// session; students are kept in the student portal and staff out of it;
/// pages listed in the navigation table also honor its role restriction.
pub fn resolve(route: Route, session: &SessionStore) -> GuardDecision {
    let decision = match (route.area(), session.is_authenticated(), session.role()) {
        (RouteArea::Public, _, _) => GuardDecision::Allow,
        (_, false, _) | (_, true, None) => GuardDecision::Redirect(Route::Login),
        (RouteArea::Staff, true, Some(Role::Student)) => {
            GuardDecision::Redirect(Route::StudentDashboard)
        }
        (RouteArea::Student, true, Some(role)) if role.is_staff() => {
            GuardDecision::Redirect(Route::Dashboard)
        }
        (_, true, Some(role)) => match nav_item_for(route).and_then(|item| item.allowed_roles) {
            Some(allowed) if !allowed.contains(role) => {
                GuardDecision::Redirect(Route::home_for(role))
            }
            _ => GuardDecision::Allow,
        },
    };

    if let GuardDecision::Redirect(to) = decision {
        debug!(from = %route, to = %to, role = ?session.role(), "Route guard redirect");
    }
    decision
}

/// Browser-style location and history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn current_path(&self) -> &'static str {
        self.current.path()
    }

    /// Push a new entry; navigating to the current route is a no-op
    pub fn navigate(&mut self, to: Route) {
        if to != self.current {
            self.history.push(self.current);
            self.current = to;
        }
    }

    /// Replace the current entry, as redirects do
    pub fn replace(&mut self, to: Route) {
        self.current = to;
    }

    pub fn back(&mut self) -> Option<Route> {
        let previous = self.history.pop()?;
        self.current = previous;
        Some(previous)
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_round_trip() {
        for route in Route::ALL.into_iter().filter(|r| *r != Route::NotFound) {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn from_path_normalizes() {
        assert_eq!(Route::from_path("/"), Route::Login);
        assert_eq!(Route::from_path(""), Route::Login);
        assert_eq!(Route::from_path("/colleges/"), Route::Colleges);
        assert_eq!(Route::from_path("/students?page=2"), Route::Students);
        assert_eq!(Route::from_path("/dashboards"), Route::NotFound);
        assert_eq!(Route::from_path("/404"), Route::NotFound);
    }

    #[test]
    fn router_history() {
        let mut router = Router::default();
        router.navigate(Route::Dashboard);
        router.navigate(Route::Dashboard);
        router.navigate(Route::Courses);
        assert_eq!(router.history(), &[Route::Login, Route::Dashboard]);

        router.replace(Route::Terms);
        assert_eq!(router.current_path(), "/terms");
        assert_eq!(router.back(), Some(Route::Dashboard));
        assert_eq!(router.back(), Some(Route::Login));
        assert_eq!(router.back(), None);
    }

    #[test]
    fn home_routes() {
        assert_eq!(Route::home_for(Role::Student), Route::StudentDashboard);
        for role in Role::ALL.into_iter().filter(Role::is_staff) {
            assert_eq!(Route::home_for(role), Route::Dashboard);
        }
    }
}
