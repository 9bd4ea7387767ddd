pub mod defaults;
pub mod view;
