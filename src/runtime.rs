pub(crate) mod api;
pub(crate) mod software;

#[cfg(test)]
#[path = "../tests/unit/support/faulty_runtime.rs"]
pub(crate) mod faulty;
