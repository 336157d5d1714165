pub mod entity_list;
pub mod form;
pub mod prompt;
pub mod summary;
pub mod transactions;
