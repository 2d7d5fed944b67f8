use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Deserialize;

pub mod auth_model;
pub mod course_model;

use course_model::{CourseId, GroupId};

/// A model for describing ARGS of the tool.
/// Consists of:
/// 1. Path to config.json, that contains the backend address and the login of the viewer.
/// 2. The screen to drive during this session.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the viewer's courses together with the viewer's role in each
    Courses,
    /// Show an assignment group
    Group {
        #[arg(long)]
        course: CourseId,
        #[arg(long)]
        group: GroupId,
    },
    /// Add an assignment to an assignment group
    AddAssignment {
        #[arg(long)]
        course: CourseId,
        #[arg(long)]
        group: GroupId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        points: String,
        /// Due date in `YYYY-MM-DDTHH:MM` form
        #[arg(long)]
        due_date: String,
    },
    /// Delete an assignment group with all of its assignments
    DeleteGroup {
        #[arg(long)]
        course: CourseId,
        #[arg(long)]
        group: GroupId,
        /// Confirm the deletion; without it only the confirmation prompt is shown
        #[arg(long)]
        yes: bool,
    },
    /// Change the code and title of a course
    EditCourse {
        #[arg(long)]
        id: CourseId,
        #[arg(long)]
        course_id: Option<String>,
        #[arg(long)]
        title: Option<String>,
    },
}

/// A model for describing configuration of the tool.
/// Consists of:
/// 1. Base address of the course manager REST API
/// 2. Username of the viewer
/// 3. Password of the viewer
/// 4. Optional request timeout in seconds
#[derive(Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub username: String,
    pub password: String,
    pub request_timeout_secs: Option<u64>,
}
