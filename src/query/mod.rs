mod store;
mod text;

pub use store::{QueryStore, ResultTable};
pub use text::{
    TABLE_PLACEHOLDER, default_query, quote_identifier, substitute_table_placeholder,
    validate_query,
};
