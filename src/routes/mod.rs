pub mod auth;

pub mod semesters;

pub mod modules;

pub mod enrollments;

pub mod submissions;

pub mod dashboard;

pub mod messenger;

pub mod ws;

pub mod media;

pub use auth::configure_auth_routes;
pub use dashboard::configure_dashboard_routes;
pub use enrollments::configure_enrollment_routes;
pub use media::configure_media_routes;
pub use messenger::configure_messenger_routes;
pub use modules::configure_module_routes;
pub use semesters::configure_semester_routes;
pub use submissions::configure_submission_routes;
pub use ws::configure_ws_routes;
