//! Categories for grouping a user's transactions, e.g. 'Groceries', 'Salary'.

mod db;
mod domain;

pub use db::{
    create_category, create_category_table, delete_category, get_categories_for_user,
    get_category, get_category_by_name,
};
pub use domain::{Category, CategoryName, MAX_CATEGORY_NAME_LENGTH};
