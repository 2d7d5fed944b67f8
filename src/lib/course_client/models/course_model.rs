//! Module with course and assignment models compatible with the course manager's REST API
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type CourseId = u32;
pub type GroupId = u32;
pub type AssignmentId = u32;

/// Format produced by a `datetime-local` form input.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Largest value the backend accepts for assignment points.
pub const MAX_POINTS: u16 = i16::MAX as u16;

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub course_id: String,
    pub title: String,
}

/// Courses of the current viewer, partitioned by the viewer's role in each of them.
#[derive(Deserialize, Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct CourseCollections {
    #[serde(default)]
    pub instructor_courses: Vec<Course>,
    #[serde(default)]
    pub ta_courses: Vec<Course>,
    #[serde(default)]
    pub student_courses: Vec<Course>,
}

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq, Eq)]
pub struct AssignmentGroup {
    pub id: GroupId,
    pub course: CourseId,
    pub title: String,
}

#[derive(Deserialize, Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: AssignmentId,
    pub group: GroupId,
    pub title: String,
    pub points: u16,
    pub due_date: NaiveDateTime,
}

/// Response of the assignment group endpoint: the group itself plus its assignments.
#[derive(Deserialize, Debug, Serialize, Clone, PartialEq, Eq)]
pub struct AssignmentGroupDetail {
    #[serde(flatten)]
    pub group: AssignmentGroup,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// Body of an assignment creation request.
#[derive(Deserialize, Debug, Serialize, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub course: CourseId,
    pub group: GroupId,
    pub title: String,
    pub points: u16,
    pub due_date: NaiveDateTime,
}

/// Body of a course edit request. `id` never changes, only the human code and title do.
#[derive(Deserialize, Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CourseEdit {
    pub id: CourseId,
    pub course_id: String,
    pub title: String,
}
