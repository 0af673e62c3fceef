pub(crate) mod content;
pub(crate) mod dispatcher;
pub(crate) mod instruction;
