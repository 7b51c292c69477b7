// State management module.
// Dashboard selection and loading state for each panel.

#![allow(dead_code)]

pub mod dashboard;
pub mod loading;

pub use dashboard::DashboardState;
pub use loading::LoadingState;
