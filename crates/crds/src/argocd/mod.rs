//! Argo CD CRDs (`argoproj.io/v1alpha1`)
//!
//! - Applications (a source rendered into a destination cluster)
//! - AppProjects (grouping and guard rails for Applications)

pub mod app_project;
pub mod application;

pub use app_project::*;
pub use application::*;
