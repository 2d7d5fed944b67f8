//! Viewer roles relative to a course.
use std::collections::HashMap;

use log::debug;

use super::models::course_model::{Course, CourseCollections, CourseId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Instructor,
    Ta,
    Student,
    None,
}

impl Role {
    /// Only instructors may change a course or its assignment groups.
    pub fn can_edit(self) -> bool {
        self == Role::Instructor
    }

    pub fn has_access(self) -> bool {
        self != Role::None
    }
}

/// Finds the viewer's role for `course_id`. A course listed in several collections
/// resolves to the first hit in Instructor, Ta, Student order.
pub fn resolve_role(
    course_id: CourseId,
    instructor_courses: &[Course],
    ta_courses: &[Course],
    student_courses: &[Course],
) -> Role {
    let contains = |courses: &[Course]| courses.iter().any(|course| course.id == course_id);
    if contains(instructor_courses) {
        Role::Instructor
    } else if contains(ta_courses) {
        Role::Ta
    } else if contains(student_courses) {
        Role::Student
    } else {
        Role::None
    }
}

/// Course id -> role lookup, rebuilt only when the course collections change.
#[derive(Debug, Default, Clone)]
pub struct RoleIndex {
    revision: Option<u64>,
    roles: HashMap<CourseId, Role>,
}

impl RoleIndex {
    /// Rebuilds the index if `revision` differs from the one it was built for.
    /// Returns whether a rebuild happened.
    pub fn refresh(&mut self, revision: u64, courses: &CourseCollections) -> bool {
        if self.revision == Some(revision) {
            return false;
        }
        let mut roles = HashMap::new();
        // Lowest priority first so higher roles overwrite.
        for (role, list) in [
            (Role::Student, &courses.student_courses),
            (Role::Ta, &courses.ta_courses),
            (Role::Instructor, &courses.instructor_courses),
        ] {
            for course in list {
                roles.insert(course.id, role);
            }
        }
        debug!("Rebuilt role index with {} course(s)", roles.len());
        self.roles = roles;
        self.revision = Some(revision);
        true
    }

    pub fn role(&self, course_id: CourseId) -> Role {
        self.roles.get(&course_id).copied().unwrap_or(Role::None)
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }
}

#[cfg(test)]
#[path = "tests/permissions.rs"]
mod tests;
