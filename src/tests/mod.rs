pub(crate) mod support;

mod end_to_end;
