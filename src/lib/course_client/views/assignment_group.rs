use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use log::{debug, warn};

use super::UnknownField;
use crate::course_client::{
    backend::CourseBackend,
    error::ApiError,
    intents::Intents,
    models::course_model::{CourseId, GroupId, NewAssignment, DUE_DATE_FORMAT, MAX_POINTS},
    routes::Route,
    store::Store,
    tasks::TaskScope,
};

pub const ACCESS_DENIED: &str = "This assignment group either does not exist or you do not have \
permission to access it. Please contact your professor if you believe this is a mistake.";
pub const EMPTY_GROUP: &str = "Assignments will appear here.";
pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this assignment group and all \
of its corresponding assignments?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupPhase {
    Loading,
    Denied,
    Loaded,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentField {
    Title,
    Points,
    DueDate,
}

impl FromStr for AssignmentField {
    type Err = UnknownField;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "title" => Ok(AssignmentField::Title),
            "points" => Ok(AssignmentField::Points),
            "dueDate" | "due_date" => Ok(AssignmentField::DueDate),
            other => Err(UnknownField(other.to_owned())),
        }
    }
}

/// Raw values of the add-assignment form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentForm {
    pub title: String,
    pub points: String,
    pub due_date: String,
}

impl AssignmentForm {
    pub fn set(&mut self, field: AssignmentField, value: &str) {
        let slot = match field {
            AssignmentField::Title => &mut self.title,
            AssignmentField::Points => &mut self.points,
            AssignmentField::DueDate => &mut self.due_date,
        };
        *slot = value.to_owned();
    }

    pub fn clear(&mut self) {
        *self = AssignmentForm::default();
    }

    pub fn is_empty(&self) -> bool {
        self == &AssignmentForm::default()
    }

    pub fn to_record(&self, course: CourseId, group: GroupId) -> Result<NewAssignment, ApiError> {
        let points = self
            .points
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|points| *points <= MAX_POINTS)
            .ok_or_else(|| {
                ApiError::Validation(format!(
                    "points must be a whole number from 0 to {}",
                    MAX_POINTS
                ))
            })?;
        let due_date = NaiveDateTime::parse_from_str(self.due_date.trim(), DUE_DATE_FORMAT)
            .map_err(|err| ApiError::Validation(format!("due date: {}", err)))?;

        Ok(NewAssignment {
            course,
            group,
            title: self.title.clone(),
            points,
            due_date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub title: String,
    pub points: u16,
}

/// What a loaded group shows. Instructor-only parts are `None` for everyone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPage {
    pub heading: String,
    pub edit_route: Option<Route>,
    pub add_form: Option<AssignmentForm>,
    pub confirm_prompt: Option<&'static str>,
    pub rows: Vec<AssignmentRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentGroupScreen {
    Redirect(Route),
    Denied,
    Loading,
    Loaded(GroupPage),
}

impl fmt::Display for AssignmentGroupScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentGroupScreen::Redirect(route) => write!(f, "Redirecting to {}", route),
            AssignmentGroupScreen::Denied => write!(f, "{}", ACCESS_DENIED),
            AssignmentGroupScreen::Loading => write!(f, "Loading..."),
            AssignmentGroupScreen::Loaded(page) => {
                writeln!(f, "{}", page.heading)?;
                if let Some(route) = page.edit_route {
                    writeln!(f, "Edit: {}", route)?;
                }
                if let Some(prompt) = page.confirm_prompt {
                    writeln!(f, "{}", prompt)?;
                }
                if page.rows.is_empty() {
                    return write!(f, "{}", EMPTY_GROUP);
                }
                write!(f, "{:<40} Points", "Assignment")?;
                for row in &page.rows {
                    write!(f, "\n{:<40} {}", row.title, row.points)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug)]
pub struct AssignmentGroupView {
    course: CourseId,
    group: GroupId,
    form: AssignmentForm,
    confirming: bool,
    deleted: bool,
    fetch_error: Option<ApiError>,
    scope: TaskScope,
}

impl AssignmentGroupView {
    pub fn new(course: CourseId, group: GroupId) -> Self {
        AssignmentGroupView {
            course,
            group,
            form: AssignmentForm::default(),
            confirming: false,
            deleted: false,
            fetch_error: None,
            scope: TaskScope::new(),
        }
    }

    pub fn form(&self) -> &AssignmentForm {
        &self.form
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    /// Whether the last fetch of the group came back with an error.
    pub fn fetch_failed(&self) -> bool {
        self.fetch_error.is_some()
    }

    pub fn scope(&self) -> &TaskScope {
        &self.scope
    }

    pub fn phase(&self, store: &Store) -> GroupPhase {
        if self.deleted {
            return GroupPhase::Deleted;
        }
        if !store.role_for(self.course).has_access() {
            return GroupPhase::Denied;
        }
        if self.fetch_error.as_ref().is_some_and(ApiError::is_denied) {
            return GroupPhase::Denied;
        }
        match &store.assignments.assignment_group {
            Some(group) if group.id == self.group && group.course != self.course => {
                GroupPhase::Denied
            }
            Some(group) if group.id == self.group => GroupPhase::Loaded,
            _ => GroupPhase::Loading,
        }
    }

    pub fn render(&self, store: &Store) -> AssignmentGroupScreen {
        if !store.is_authenticated() {
            return AssignmentGroupScreen::Redirect(Route::Login);
        }
        match self.phase(store) {
            GroupPhase::Deleted => AssignmentGroupScreen::Redirect(Route::CourseView(self.course)),
            GroupPhase::Denied => AssignmentGroupScreen::Denied,
            GroupPhase::Loading => AssignmentGroupScreen::Loading,
            GroupPhase::Loaded => AssignmentGroupScreen::Loaded(self.page(store)),
        }
    }

    fn page(&self, store: &Store) -> GroupPage {
        let can_edit = store.role_for(self.course).can_edit();
        let code = store
            .course(self.course)
            .map(|course| course.course_id.as_str())
            .unwrap_or_default();
        let title = store
            .assignments
            .assignment_group
            .as_ref()
            .map(|group| group.title.as_str())
            .unwrap_or_default();

        GroupPage {
            heading: format!("{}: {}", code, title),
            edit_route: can_edit.then_some(Route::EditAssignmentGroup {
                course: self.course,
                group: self.group,
            }),
            add_form: can_edit.then(|| self.form.clone()),
            confirm_prompt: (can_edit && self.confirming).then_some(CONFIRM_DELETE),
            rows: store
                .assignments
                .assignments
                .iter()
                .map(|assignment| AssignmentRow {
                    title: assignment.title.clone(),
                    points: assignment.points,
                })
                .collect(),
        }
    }

    /// Fetches the group of this route. Until it arrives the view stays in `Loading`;
    /// a missing or forbidden group turns it `Denied`, other failures leave it loading.
    pub async fn mount<B: CourseBackend>(&mut self, intents: &Intents<B>) -> bool {
        let fetched = self
            .scope
            .run(intents.get_assignment_group(self.group))
            .await;
        match fetched {
            Some(Ok(_)) => {
                self.fetch_error = None;
                true
            }
            Some(Err(err)) => {
                self.fetch_error = Some(err);
                false
            }
            None => false,
        }
    }

    /// Create and delete act only on a loaded group the viewer teaches.
    fn can_change(&self, store: &Store) -> bool {
        self.phase(store) == GroupPhase::Loaded && store.role_for(self.course).can_edit()
    }

    pub fn on_change(&mut self, field: AssignmentField, value: &str) {
        self.form.set(field, value);
    }

    /// Opens the delete confirmation. Nothing is sent to the backend yet.
    pub fn on_request_delete(&mut self, store: &Store) -> bool {
        self.confirming = self.can_change(store);
        self.confirming
    }

    pub fn on_cancel_delete(&mut self) {
        self.confirming = false;
    }

    /// Deletes the group, but only while the confirmation is open.
    pub async fn on_confirm_delete<B: CourseBackend>(&mut self, intents: &Intents<B>) -> bool {
        if !self.confirming {
            warn!(
                "Refusing to delete group {} without confirmation",
                self.group
            );
            return false;
        }
        if !intents.store().read(|store| self.can_change(store)) {
            self.confirming = false;
            return false;
        }
        let deleted = self
            .scope
            .run(intents.delete_assignment_group(self.group))
            .await
            .unwrap_or(false);
        if deleted {
            self.confirming = false;
            self.deleted = true;
        }
        deleted
    }

    /// Creates an assignment from the form; the form is cleared only on success.
    pub async fn on_submit<B: CourseBackend>(&mut self, intents: &Intents<B>) -> bool {
        if !intents.store().read(|store| self.can_change(store)) {
            warn!(
                "Group {} is not open for new assignments in course {}",
                self.group, self.course
            );
            return false;
        }
        let record = match self.form.to_record(self.course, self.group) {
            Ok(record) => record,
            Err(err) => {
                intents.report(&err);
                return false;
            }
        };
        debug!("Submitting assignment {}", record.title);

        match self.scope.run(intents.create_assignment(&record)).await {
            Some(Some(_)) => {
                self.form.clear();
                true
            }
            _ => false,
        }
    }

    pub fn teardown(&self) {
        self.scope.teardown();
    }
}
