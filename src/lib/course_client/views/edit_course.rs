use std::{fmt, str::FromStr};

use super::UnknownField;
use crate::course_client::{
    backend::CourseBackend,
    intents::Intents,
    models::course_model::{CourseEdit, CourseId},
    routes::Route,
    store::Store,
    tasks::TaskScope,
};

/// Why the edit screen is (or is not) still open. Both terminal phases leave to the
/// course page but are kept apart so callers can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Unauthorized,
    Completed,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseField {
    CourseId,
    Title,
}

impl FromStr for CourseField {
    type Err = UnknownField;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "courseId" | "course_id" => Ok(CourseField::CourseId),
            "title" => Ok(CourseField::Title),
            other => Err(UnknownField(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCourseScreen {
    Redirect { to: Route, cause: EditPhase },
    Form { course_id: String, title: String },
}

impl fmt::Display for EditCourseScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditCourseScreen::Redirect { to, cause } => {
                write!(f, "Redirecting to {} ({:?})", to, cause)
            }
            EditCourseScreen::Form { course_id, title } => {
                writeln!(f, "Edit Course")?;
                writeln!(f, "Course ID: {}", course_id)?;
                write!(f, "Title: {}", title)
            }
        }
    }
}

#[derive(Debug)]
pub struct EditCourseView {
    id: CourseId,
    course_id: String,
    title: String,
    completed: bool,
    scope: TaskScope,
}

impl EditCourseView {
    /// Opens the form with the instructor's current record of the course.
    pub fn new(id: CourseId, store: &Store) -> Self {
        let (course_id, title) = match store.course(id) {
            Some(course) if store.role_for(id).can_edit() => {
                (course.course_id.clone(), course.title.clone())
            }
            _ => (String::new(), String::new()),
        };
        EditCourseView {
            id,
            course_id,
            title,
            completed: false,
            scope: TaskScope::new(),
        }
    }

    pub fn scope(&self) -> &TaskScope {
        &self.scope
    }

    pub fn phase(&self, store: &Store) -> EditPhase {
        if !store.role_for(self.id).can_edit() {
            EditPhase::Unauthorized
        } else if self.completed {
            EditPhase::Completed
        } else {
            EditPhase::Editing
        }
    }

    pub fn render(&self, store: &Store) -> EditCourseScreen {
        match self.phase(store) {
            EditPhase::Editing => EditCourseScreen::Form {
                course_id: self.course_id.clone(),
                title: self.title.clone(),
            },
            cause if !store.is_authenticated() => EditCourseScreen::Redirect {
                to: Route::Login,
                cause,
            },
            cause => EditCourseScreen::Redirect {
                to: Route::CourseView(self.id),
                cause,
            },
        }
    }

    pub fn on_change(&mut self, field: CourseField, value: &str) {
        match field {
            CourseField::CourseId => self.course_id = value.to_owned(),
            CourseField::Title => self.title = value.to_owned(),
        }
    }

    pub fn record(&self) -> CourseEdit {
        CourseEdit {
            id: self.id,
            course_id: self.course_id.clone(),
            title: self.title.clone(),
        }
    }

    pub async fn on_submit<B: CourseBackend>(&mut self, intents: &Intents<B>) -> bool {
        if intents.store().read(|store| self.phase(store)) != EditPhase::Editing {
            return false;
        }
        let record = self.record();
        let edited = self.scope.run(intents.edit_course(&record)).await;
        self.completed = matches!(edited, Some(Some(_)));
        self.completed
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }
}
