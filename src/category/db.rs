//! Database operations for categories.
//!
//! Every query is scoped to a single user. Categories owned by other users are
//! treated as if they do not exist.

use std::collections::HashMap;

use rusqlite::{Connection, Row, params_from_iter};

use crate::{
    Error,
    auth::UserID,
    category::{Category, CategoryId, CategoryName, DEFAULT_CATEGORIES, Kind},
};

/// Create a category for `user_id` and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateCategory] if the user already has a category with the same name
/// and kind.
pub fn create_category(
    user_id: UserID,
    name: CategoryName,
    kind: Kind,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (user_id, name, kind) VALUES (?1, ?2, ?3)",
        (user_id.as_i64(), name.as_ref(), kind),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name, kind })
}

/// Retrieve a single category owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such category for the user.
pub fn get_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, kind FROM category WHERE id = :id AND user_id = :user_id")?
        .query_row(
            &[(":id", &category_id), (":user_id", &user_id.as_i64())],
            map_category_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the categories of `user_id`, optionally only those of `kind`, ordered by kind and
/// then name.
pub fn get_categories(
    user_id: UserID,
    kind: Option<Kind>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, kind FROM category
             WHERE user_id = ?1 AND (?2 IS NULL OR kind = ?2)
             ORDER BY kind ASC, name ASC",
        )?
        .query_map((user_id.as_i64(), kind), map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Look up the names of the categories in `category_ids` that belong to `user_id`.
///
/// IDs that do not exist or belong to another user are absent from the returned map.
pub fn get_category_names(
    user_id: UserID,
    category_ids: &[CategoryId],
    connection: &Connection,
) -> Result<HashMap<CategoryId, String>, Error> {
    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let placeholders = vec!["?"; category_ids.len()].join(", ");
    let query = format!(
        "SELECT id, name FROM category WHERE user_id = ? AND id IN ({placeholders})"
    );
    let params = std::iter::once(user_id.as_i64()).chain(category_ids.iter().copied());

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), |row| {
            Ok((row.get::<_, CategoryId>(0)?, row.get::<_, String>(1)?))
        })?
        .map(|maybe_pair| maybe_pair.map_err(|error| error.into()))
        .collect()
}

/// Insert the [DEFAULT_CATEGORIES] for `user_id`, skipping any the user already has.
///
/// Returns the number of categories that were created.
pub fn seed_default_categories(user_id: UserID, connection: &Connection) -> Result<usize, Error> {
    let transaction = connection.unchecked_transaction()?;
    let mut created_count = 0;

    {
        let mut statement = transaction
            .prepare("INSERT OR IGNORE INTO category (user_id, name, kind) VALUES (?1, ?2, ?3)")?;

        for (name, kind) in DEFAULT_CATEGORIES {
            created_count += statement.execute((user_id.as_i64(), name, kind))?;
        }
    }

    transaction.commit()?;

    Ok(created_count)
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('INCOME', 'EXPENSE')),
            UNIQUE(user_id, name, kind),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_kind ON category(user_id, kind);",
    )?;

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let kind = row.get(2)?;

    Ok(Category { id, name, kind })
}

#[cfg(test)]
mod category_query_tests {
    use std::collections::HashMap;

    use rusqlite::Connection;

    use crate::{
        Error,
        auth::UserID,
        category::{CategoryName, DEFAULT_CATEGORIES, Kind},
        test_utils::{create_test_user, get_test_connection},
    };

    use super::{
        create_category, get_categories, get_category, get_category_names,
        seed_default_categories,
    };

    fn get_test_db() -> (Connection, UserID) {
        let connection = get_test_connection();
        let user_id = create_test_user("foo@bar.baz", "hunter2", &connection);

        (connection, user_id)
    }

    #[test]
    fn create_category_succeeds() {
        let (connection, user_id) = get_test_db();
        let name = CategoryName::new("Groceries").unwrap();

        let category = create_category(user_id, name.clone(), Kind::Expense, &connection)
            .expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.name, name);
        assert_eq!(category.kind, Kind::Expense);
    }

    #[test]
    fn create_duplicate_category_fails() {
        let (connection, user_id) = get_test_db();
        let name = CategoryName::new_unchecked("Other");
        create_category(user_id, name.clone(), Kind::Expense, &connection).unwrap();

        let result = create_category(user_id, name, Kind::Expense, &connection);

        assert_eq!(result, Err(Error::DuplicateCategory));
    }

    #[test]
    fn same_name_with_other_kind_is_allowed() {
        let (connection, user_id) = get_test_db();
        let name = CategoryName::new_unchecked("Other");
        create_category(user_id, name.clone(), Kind::Expense, &connection).unwrap();

        let result = create_category(user_id, name, Kind::Income, &connection);

        assert!(result.is_ok());
    }

    #[test]
    fn get_category_of_other_user_returns_not_found() {
        let (connection, user_id) = get_test_db();
        let other_user_id = create_test_user("bar@bar.baz", "hunter2", &connection);
        let category = create_category(
            other_user_id,
            CategoryName::new_unchecked("Foo"),
            Kind::Expense,
            &connection,
        )
        .unwrap();

        assert_eq!(
            get_category(user_id, category.id, &connection),
            Err(Error::NotFound)
        );
        assert_eq!(
            get_category(other_user_id, category.id, &connection),
            Ok(category)
        );
    }

    #[test]
    fn get_categories_orders_by_kind_then_name() {
        let (connection, user_id) = get_test_db();
        for (name, kind) in [
            ("Salary", Kind::Income),
            ("Rent", Kind::Expense),
            ("Food", Kind::Expense),
        ] {
            create_category(user_id, CategoryName::new_unchecked(name), kind, &connection).unwrap();
        }

        let got: Vec<_> = get_categories(user_id, None, &connection)
            .unwrap()
            .into_iter()
            .map(|category| (category.name.to_string(), category.kind))
            .collect();

        assert_eq!(
            got,
            vec![
                ("Food".to_owned(), Kind::Expense),
                ("Rent".to_owned(), Kind::Expense),
                ("Salary".to_owned(), Kind::Income),
            ]
        );
    }

    #[test]
    fn get_categories_filters_by_kind() {
        let (connection, user_id) = get_test_db();
        create_category(user_id, CategoryName::new_unchecked("Salary"), Kind::Income, &connection)
            .unwrap();
        create_category(user_id, CategoryName::new_unchecked("Rent"), Kind::Expense, &connection)
            .unwrap();

        let got = get_categories(user_id, Some(Kind::Income), &connection).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name.as_ref(), "Salary");
    }

    #[test]
    fn get_category_names_skips_unknown_and_foreign_ids() {
        let (connection, user_id) = get_test_db();
        let other_user_id = create_test_user("bar@bar.baz", "hunter2", &connection);
        let mine = create_category(
            user_id,
            CategoryName::new_unchecked("Mine"),
            Kind::Expense,
            &connection,
        )
        .unwrap();
        let theirs = create_category(
            other_user_id,
            CategoryName::new_unchecked("Theirs"),
            Kind::Expense,
            &connection,
        )
        .unwrap();

        let got = get_category_names(user_id, &[mine.id, theirs.id, 9999], &connection).unwrap();

        assert_eq!(got, HashMap::from([(mine.id, "Mine".to_owned())]));
    }

    #[test]
    fn get_category_names_with_no_ids_is_empty() {
        let (connection, user_id) = get_test_db();

        assert_eq!(get_category_names(user_id, &[], &connection), Ok(HashMap::new()));
    }

    #[test]
    fn seed_creates_defaults_once() {
        let (connection, user_id) = get_test_db();
        create_category(user_id, CategoryName::new_unchecked("Salary"), Kind::Income, &connection)
            .unwrap();

        let first = seed_default_categories(user_id, &connection).unwrap();
        let second = seed_default_categories(user_id, &connection).unwrap();

        assert_eq!(first, DEFAULT_CATEGORIES.len() - 1);
        assert_eq!(second, 0);
        assert_eq!(
            get_categories(user_id, None, &connection).unwrap().len(),
            DEFAULT_CATEGORIES.len()
        );
    }
}
