//! User roles
//!
//! Every page and menu entry in the dashboard is gated on one of these.

use serde::{Deserialize, Serialize};

/// Role of the signed-in user, as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// University-wide administrator
    SuperAdmin,
    /// College or department administrator
    Admin,
    /// Teaching staff
    Faculty,
    /// Teaching assistant
    Ta,
    /// Enrolled student; uses the student portal instead of the staff dashboard
    Student,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Faculty,
        Role::Ta,
        Role::Student,
    ];

    /// Wire name, e.g. `SUPER_ADMIN`
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::Admin => "ADMIN",
            Role::Faculty => "FACULTY",
            Role::Ta => "TA",
            Role::Student => "STUDENT",
        }
    }

    /// Human readable label for headers
    pub fn label(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::Admin => "Admin",
            Role::Faculty => "Faculty",
            Role::Ta => "Teaching Assistant",
            Role::Student => "Student",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Role::SuperAdmin => 1 << 0,
            Role::Admin => 1 << 1,
            Role::Faculty => 1 << 2,
            Role::Ta => 1 << 3,
            Role::Student => 1 << 4,
        }
    }

    /// Whether this role uses the staff dashboard
    pub fn is_staff(&self) -> bool {
        match self {
            Role::SuperAdmin | Role::Admin | Role::Faculty | Role::Ta => true,
            Role::Student => false,
        }
    }
}

/// A set of roles, usable in `const` navigation tables
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const fn empty() -> Self {
        RoleSet(0)
    }

    pub const fn of(roles: &[Role]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < roles.len() {
            bits |= roles[i].bit();
            i += 1;
        }
        RoleSet(bits)
    }

    pub const fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub const fn with(self, role: Role) -> Self {
        RoleSet(self.0 | role.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

impl std::fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        iter.into_iter().fold(RoleSet::empty(), RoleSet::with)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "SUPER_ADMIN" | "SUPERADMIN" => Ok(Role::SuperAdmin),
            "ADMIN" => Ok(Role::Admin),
            "FACULTY" => Ok(Role::Faculty),
            "TA" => Ok(Role::Ta),
            "STUDENT" => Ok(Role::Student),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}
