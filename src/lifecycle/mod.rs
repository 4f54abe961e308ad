//! Operator workflows: creating, editing and listing service orders

pub mod desk;
pub mod draft;
pub mod edit_order;
pub mod new_order;

pub use desk::OrderDesk;
pub use draft::ServiceDraft;
pub use edit_order::{EditOrderSession, EditOrderState};
pub use new_order::{NewOrderSession, NewOrderState};
