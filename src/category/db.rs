//! Database operations for categories.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    category::{Category, CategoryName},
    database_id::CategoryId,
    user::UserID,
};

/// Create a category for a user and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateCategoryName] if the user already has a category called `name`,
/// - [Error::NotFound] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    user_id: UserID,
    name: CategoryName,
    description: &str,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = connection
        .prepare(
            "INSERT INTO category (user_id, name, description, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, name, description, created_at",
        )?
        .query_row(
            (
                user_id.as_i64(),
                name.as_ref(),
                description.trim(),
                OffsetDateTime::now_utc(),
            ),
            map_category_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateCategoryName(name.to_string()),
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })?;

    tracing::debug!(
        "Created category \"{}\" with ID {} for user {}",
        category.name,
        category.id,
        user_id
    );

    Ok(category)
}

/// Retrieve a single category by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `category_id` does not refer to a valid category,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, description, created_at FROM category WHERE id = :id;",
        )?
        .query_row(&[(":id", &category_id)], map_category_row)
        .map_err(|error| error.into())
}

/// Retrieve a user's category by its name.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the user has no category called `name`,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_category_by_name(
    user_id: UserID,
    name: &CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, description, created_at FROM category
             WHERE user_id = ?1 AND name = ?2;",
        )?
        .query_row((user_id.as_i64(), name.as_ref()), map_category_row)
        .map_err(|error| error.into())
}

/// Retrieve all of a user's categories ordered alphabetically by name.
pub fn get_categories_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, description, created_at FROM category
             WHERE user_id = :user_id
             ORDER BY name ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete one of a user's categories along with all of its transactions.
///
/// # Errors
/// Returns [Error::DeleteMissingCategory] if the user has no category with the ID `category_id`.
pub fn delete_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    tracing::debug!("Deleted category {category_id} for user {user_id}");

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            UNIQUE(name, user_id),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let raw_name: String = row.get(2)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let description = row.get(3)?;
    let created_at = row.get(4)?;

    Ok(Category {
        id,
        user_id,
        name,
        description,
        created_at,
    })
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        category::{
            CategoryName, create_category, delete_category, get_categories_for_user,
            get_category, get_category_by_name,
        },
        db::initialize,
        user::{User, UserID, create_user},
    };

    fn get_test_db_connection() -> (Connection, User) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        let user = create_user("alice", &connection).expect("Could not create test user");

        (connection, user)
    }

    #[test]
    fn create_category_succeeds() {
        let (connection, user) = get_test_db_connection();
        let name = CategoryName::new("Categorically a category").unwrap();

        let category = create_category(user.id, name.clone(), "Food and such", &connection);

        let got_category = category.expect("Could not create category");
        assert!(got_category.id > 0);
        assert_eq!(got_category.name, name);
        assert_eq!(got_category.user_id, user.id);
        assert_eq!(got_category.description, "Food and such");
    }

    #[test]
    fn create_category_fails_on_duplicate_name_for_same_user() {
        let (connection, user) = get_test_db_connection();
        let name = CategoryName::new_unchecked("Food");
        create_category(user.id, name.clone(), "", &connection).unwrap();

        let duplicate = create_category(user.id, name, "", &connection);

        assert_eq!(
            duplicate,
            Err(Error::DuplicateCategoryName("Food".to_owned()))
        );
    }

    #[test]
    fn create_category_allows_same_name_for_different_users() {
        let (connection, alice) = get_test_db_connection();
        let bob = create_user("bob", &connection).unwrap();
        let name = CategoryName::new_unchecked("Food");
        create_category(alice.id, name.clone(), "", &connection).unwrap();

        let result = create_category(bob.id, name, "", &connection);

        assert!(result.is_ok(), "Unexpected error: {result:?}");
    }

    #[test]
    fn create_category_fails_on_unknown_user() {
        let (connection, user) = get_test_db_connection();

        let result = create_category(
            UserID::new(user.id.as_i64() + 42),
            CategoryName::new_unchecked("Food"),
            "",
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_category_succeeds() {
        let (connection, user) = get_test_db_connection();
        let inserted = create_category(user.id, CategoryName::new_unchecked("Foo"), "", &connection)
            .expect("Could not create test category");

        let selected = get_category(inserted.id, &connection);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let (connection, user) = get_test_db_connection();
        let inserted = create_category(user.id, CategoryName::new_unchecked("Foo"), "", &connection)
            .expect("Could not create test category");

        let selected = get_category(inserted.id + 123, &connection);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_category_by_name_only_finds_own_categories() {
        let (connection, alice) = get_test_db_connection();
        let bob = create_user("bob", &connection).unwrap();
        let name = CategoryName::new_unchecked("Rent");
        let alices = create_category(alice.id, name.clone(), "", &connection).unwrap();

        assert_eq!(get_category_by_name(alice.id, &name, &connection), Ok(alices));
        assert_eq!(
            get_category_by_name(bob.id, &name, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_categories_for_user_returns_only_their_categories_in_name_order() {
        let (connection, alice) = get_test_db_connection();
        let bob = create_user("bob", &connection).unwrap();
        let zoo = create_category(alice.id, CategoryName::new_unchecked("Zoo"), "", &connection)
            .unwrap();
        let bar = create_category(alice.id, CategoryName::new_unchecked("Bar"), "", &connection)
            .unwrap();
        create_category(bob.id, CategoryName::new_unchecked("Baz"), "", &connection).unwrap();

        let categories =
            get_categories_for_user(alice.id, &connection).expect("Could not get categories");

        assert_eq!(categories, vec![bar, zoo]);
    }

    #[test]
    fn get_categories_for_user_without_categories_is_empty() {
        let (connection, user) = get_test_db_connection();

        let categories = get_categories_for_user(user.id, &connection).unwrap();

        assert!(categories.is_empty(), "Want no categories, got {categories:?}");
    }

    #[test]
    fn delete_category_succeeds() {
        let (connection, user) = get_test_db_connection();
        let category = create_category(
            user.id,
            CategoryName::new_unchecked("ToDelete"),
            "",
            &connection,
        )
        .expect("Could not create test category");

        let result = delete_category(user.id, category.id, &connection);

        assert!(result.is_ok());
        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_category_owned_by_another_user_fails() {
        let (connection, alice) = get_test_db_connection();
        let bob = create_user("bob", &connection).unwrap();
        let category =
            create_category(alice.id, CategoryName::new_unchecked("Mine"), "", &connection)
                .unwrap();

        let result = delete_category(bob.id, category.id, &connection);

        assert_eq!(result, Err(Error::DeleteMissingCategory));
        assert!(get_category(category.id, &connection).is_ok());
    }

    #[test]
    fn delete_category_with_invalid_id_returns_not_found() {
        let (connection, user) = get_test_db_connection();

        let result = delete_category(user.id, 999999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingCategory));
    }
}
