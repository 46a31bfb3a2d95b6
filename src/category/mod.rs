//! Categories label transactions as a kind of income or expense, e.g. 'Salary' or 'Groceries'.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_category, create_category_table, get_categories, get_category, get_category_names,
    seed_default_categories,
};
pub use domain::{
    Category, CategoryId, CategoryName, CategoryNameError, DEFAULT_CATEGORIES, Kind,
    KindParseError,
};
pub use endpoints::{
    CategoryEndpointState, CategoryQuery, NewCategoryData, SeedResult, create_category_endpoint,
    get_categories_endpoint, seed_categories_endpoint,
};
