mod form;
mod input;

pub use form::{EmployeeForm, FormField, FormResult};
pub use input::TextInput;
