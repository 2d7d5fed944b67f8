use std::{fmt, str::FromStr};

use thiserror::Error;

use super::models::course_model::{CourseId, GroupId};

/// Screens a view can send the viewer to, and the params the router hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    CourseView(CourseId),
    EditCourse(CourseId),
    AssignmentGroup { course: CourseId, group: GroupId },
    EditAssignmentGroup { course: CourseId, group: GroupId },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no route matches {0}")]
pub struct UnknownRoute(pub String);

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Login => write!(f, "/login"),
            Route::Register => write!(f, "/register"),
            Route::CourseView(id) => write!(f, "/courses/{}/view", id),
            Route::EditCourse(id) => write!(f, "/courses/{}/edit", id),
            Route::AssignmentGroup { course, group } => {
                write!(f, "/courses/{}/assignments/{}", course, group)
            }
            Route::EditAssignmentGroup { course, group } => {
                write!(f, "/courses/{}/assignments/{}/edit", course, group)
            }
        }
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownRoute(path.to_owned());
        let segments: Vec<&str> = path
            .trim_start_matches("/#")
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        let id = |segment: &str| segment.parse::<u32>().map_err(|_| unknown());

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["login"] => Ok(Route::Login),
            ["register"] => Ok(Route::Register),
            ["courses", course, "view"] => Ok(Route::CourseView(id(*course)?)),
            ["courses", course, "edit"] => Ok(Route::EditCourse(id(*course)?)),
            ["courses", course, "assignments", group] => Ok(Route::AssignmentGroup {
                course: id(*course)?,
                group: id(*group)?,
            }),
            ["courses", course, "assignments", group, "edit"] => {
                Ok(Route::EditAssignmentGroup {
                    course: id(*course)?,
                    group: id(*group)?,
                })
            }
            _ => Err(unknown()),
        }
    }
}
