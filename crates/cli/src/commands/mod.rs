pub(crate) mod serialize;
pub(crate) mod types;
pub(crate) mod validate;
