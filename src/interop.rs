pub(crate) mod convert;
pub(crate) mod depth;
pub(crate) mod import;
