//! Records managed by the administration pages
//!
//! Each type here is the editable form of one backend resource; a stored
//! row is a [`Record`] wrapping it with the backend id.

use crate::validation::{FieldCheck, Validate};
use campusdesk_core::FieldErrors;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A backend resource with CRUD endpoints under `/{RESOURCE}`
pub trait Entity:
    Serialize + DeserializeOwned + Validate + Clone + Debug + Send + Sync + 'static
{
    /// Path segment of the collection, e.g. `colleges`
    const RESOURCE: &'static str;
    /// Singular label used in notices, e.g. `College`
    const LABEL: &'static str;

    /// Text shown for the row in lists and confirmation prompts
    fn display_name(&self) -> String;
}

/// A stored row: backend id plus the entity fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<E> {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: E,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
    pub name: String,
    pub code: String,
}

impl Entity for College {
    const RESOURCE: &'static str = "colleges";
    const LABEL: &'static str = "College";

    fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

impl Validate for College {
    fn validate(&self) -> FieldErrors {
        FieldCheck::new()
            .required("name", &self.name)
            .max_len("name", &self.name, 120)
            .code("code", &self.code)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub name: String,
    pub code: String,
    pub college_id: String,
}

impl Entity for Department {
    const RESOURCE: &'static str = "departments";
    const LABEL: &'static str = "Department";

    fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

impl Validate for Department {
    fn validate(&self) -> FieldErrors {
        FieldCheck::new()
            .required("name", &self.name)
            .max_len("name", &self.name, 120)
            .code("code", &self.code)
            .required("collegeId", &self.college_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: String,
    pub title: String,
    pub credits: u8,
    pub department_id: String,
}

impl Entity for Course {
    const RESOURCE: &'static str = "courses";
    const LABEL: &'static str = "Course";

    fn display_name(&self) -> String {
        format!("{} {}", self.code, self.title)
    }
}

impl Validate for Course {
    fn validate(&self) -> FieldErrors {
        FieldCheck::new()
            .code("code", &self.code)
            .required("title", &self.title)
            .max_len("title", &self.title, 160)
            .range("credits", self.credits, 1, 6)
            .required("departmentId", &self.department_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curriculum {
    pub name: String,
    pub department_id: String,
    /// Academic year the curriculum takes effect
    pub effective_year: u16,
    #[serde(default)]
    pub course_ids: Vec<String>,
}

impl Entity for Curriculum {
    const RESOURCE: &'static str = "curricula";
    const LABEL: &'static str = "Curriculum";

    fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.effective_year)
    }
}

impl Validate for Curriculum {
    fn validate(&self) -> FieldErrors {
        let mut seen = std::collections::HashSet::new();
        let unique = self.course_ids.iter().all(|id| seen.insert(id));

        FieldCheck::new()
            .required("name", &self.name)
            .required("departmentId", &self.department_id)
            .range("effectiveYear", self.effective_year, 1950, 2100)
            .check("courseIds", unique, "must not list a course twice")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub name: String,
    pub start_year: u16,
    pub curriculum_id: String,
}

impl Entity for Batch {
    const RESOURCE: &'static str = "batches";
    const LABEL: &'static str = "Batch";

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl Validate for Batch {
    fn validate(&self) -> FieldErrors {
        FieldCheck::new()
            .required("name", &self.name)
            .range("startYear", self.start_year, 1950, 2100)
            .required("curriculumId", &self.curriculum_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub name: String,
    pub batch_id: String,
    pub capacity: u32,
}

impl Entity for Section {
    const RESOURCE: &'static str = "sections";
    const LABEL: &'static str = "Section";

    fn display_name(&self) -> String {
        format!("Section {}", self.name)
    }
}

impl Validate for Section {
    fn validate(&self) -> FieldErrors {
        FieldCheck::new()
            .required("name", &self.name)
            .max_len("name", &self.name, 10)
            .required("batchId", &self.batch_id)
            .range("capacity", self.capacity, 1, 500)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Entity for Term {
    const RESOURCE: &'static str = "terms";
    const LABEL: &'static str = "Term";

    fn display_name(&self) -> String {
        format!("{} ({} to {})", self.name, self.start_date, self.end_date)
    }
}

impl Validate for Term {
    fn validate(&self) -> FieldErrors {
        FieldCheck::new()
            .required("name", &self.name)
            .check(
                "endDate",
                self.end_date > self.start_date,
                "must be after the start date",
            )
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

impl Entity for Faculty {
    const RESOURCE: &'static str = "faculty";
    const LABEL: &'static str = "Faculty member";

    fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Validate for Faculty {
    fn validate(&self) -> FieldErrors {
        FieldCheck::new()
            .required("firstName", &self.first_name)
            .required("lastName", &self.last_name)
            .email("email", &self.email)
            .required("departmentId", &self.department_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roll_number: String,
    pub section_id: String,
}

impl Entity for Student {
    const RESOURCE: &'static str = "students";
    const LABEL: &'static str = "Student";

    fn display_name(&self) -> String {
        format!("{} {} ({})", self.first_name, self.last_name, self.roll_number)
    }
}

impl Validate for Student {
    fn validate(&self) -> FieldErrors {
        FieldCheck::new()
            .required("firstName", &self.first_name)
            .required("lastName", &self.last_name)
            .email("email", &self.email)
            .code("rollNumber", &self.roll_number)
            .required("sectionId", &self.section_id)
            .finish()
    }
}
