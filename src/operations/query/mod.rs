mod linearization;
mod newton;
mod projection;

pub use linearization::linearization_error;
pub use newton::{newton_refine, newton_refine_with_tolerance};
pub use projection::project_point;
