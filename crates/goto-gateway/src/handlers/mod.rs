mod health;
mod redirect;

pub use health::health_handler;
pub use redirect::{redirect_handler, register_form_handler, register_handler};
