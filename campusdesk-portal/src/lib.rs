//! CampusDesk Portal - client state for the university administration dashboard
//!
//! This crate holds everything the dashboard client keeps between renders:
//!
//! - Persisted session and theme stores over a pluggable durable storage
//! - The session gateway for sign-in and fail-open sign-out
//! - Role-filtered navigation and the route guard
//! - The dashboard shell and the entity administration pages
//!
//! ## Architecture
//!
//! - **Core** (campusdesk-core): errors, logging, configuration
//! - **Portal** (this crate): state, flows and layout decisions
//! - **Presentation** (campusdesk-cli): a terminal front end over the portal

pub mod api;
pub mod gateway;
pub mod navigation;
pub mod notifications;
pub mod pages;
pub mod routing;
pub mod session;
pub mod shell;
pub mod storage;
pub mod theme;
pub mod validation;

pub use api::{
    ApiClient, ApiEnvelope, Batch, College, Course, Curriculum, Department, Entity, EntityService,
    Faculty, Record, Section, Student, Term,
};
pub use gateway::{AuthApi, Credentials, HttpAuthApi, LoginPayload, SessionGateway};
pub use navigation::{
    nav_item_for, render_nav, visible_items, MobileNav, NavEntry, NavItem, PanelState, NAV_ITEMS,
};
pub use notifications::{Notice, NoticeLevel, Notifications};
pub use pages::{EntityPage, SubmitOutcome};
pub use routing::{resolve, GuardDecision, Route, RouteArea, Router};
pub use session::{Role, RoleSet, SessionStore, SessionUser};
pub use shell::{DashboardShell, HeaderView, PageContent, Portal, ShellOutcome, ShellView};
pub use storage::{DurableStorage, FileStorage, MemoryStorage};
pub use theme::{DocumentRoot, ThemeMode, ThemeStore};
pub use validation::{FieldCheck, Validate};
