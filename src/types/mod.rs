pub(crate) mod scalars;
