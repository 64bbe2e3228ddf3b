mod health;
mod redirect;

pub use health::HealthResponse;
pub use redirect::RegisterForm;
