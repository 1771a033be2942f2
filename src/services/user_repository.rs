// ==================== USER REPOSITORY ====================
// Acesso à tabela `user_model`. Todo SQL do serviço fica aqui.

use crate::models::User;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt;

const USER_SELECT_SQL: &str = "SELECT id, name, email FROM user_model";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// UNIQUE constraint on `name` rejected the write
    DuplicateName(String),
    /// UNIQUE constraint on `email` rejected the write
    DuplicateEmail(String),
    Sqlite(rusqlite::Error),
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::DuplicateName(name) => write!(f, "user name already exists: {}", name),
            RepoError::DuplicateEmail(email) => write!(f, "user email already exists: {}", email),
            RepoError::Sqlite(err) => write!(f, "{}", err),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RepoError::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(err: rusqlite::Error) -> Self {
        RepoError::Sqlite(err)
    }
}

/// CRUD operations over stored users
pub trait UserRepository {
    fn list_all(&self) -> RepoResult<Vec<User>>;
    fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<User>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    fn insert(&self, name: &str, email: &str) -> RepoResult<User>;
    /// Overwrites name and email of an existing row; the caller checks existence.
    fn update(&self, id: i64, name: &str, email: &str) -> RepoResult<User>;
    /// Removes a row; the caller checks existence.
    fn delete(&self, id: i64) -> RepoResult<()>;
}

pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn find_one(&self, filter: &str, value: &dyn rusqlite::ToSql) -> RepoResult<Option<User>> {
        let sql = format!("{} WHERE {} = ?1", USER_SELECT_SQL, filter);
        let user = self
            .conn
            .query_row(&sql, params![value], map_user_row)
            .optional()?;
        Ok(user)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn list_all(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY id", USER_SELECT_SQL))?;
        let users = stmt
            .query_map([], map_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        self.find_one("id", &id)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        self.find_one("name", &name)
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.find_one("email", &email)
    }

    fn insert(&self, name: &str, email: &str) -> RepoResult<User> {
        self.conn
            .execute(
                "INSERT INTO user_model (name, email) VALUES (?1, ?2)",
                params![name, email],
            )
            .map_err(|err| map_constraint_error(err, name, email))?;

        Ok(User {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    fn update(&self, id: i64, name: &str, email: &str) -> RepoResult<User> {
        self.conn
            .execute(
                "UPDATE user_model SET name = ?1, email = ?2 WHERE id = ?3",
                params![name, email, id],
            )
            .map_err(|err| map_constraint_error(err, name, email))?;

        Ok(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    fn delete(&self, id: i64) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM user_model WHERE id = ?1", params![id])?;
        Ok(())
    }
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

/// SQLite reports the failing column as "UNIQUE constraint failed: user_model.<col>"
fn map_constraint_error(err: rusqlite::Error, name: &str, email: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(code, Some(message)) = &err {
        if code.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE {
            if message.contains("user_model.name") {
                return RepoError::DuplicateName(name.to_string());
            }
            if message.contains("user_model.email") {
                return RepoError::DuplicateEmail(email.to_string());
            }
        }
    }
    RepoError::Sqlite(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SCHEMA_SQL;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA_SQL).unwrap();
        conn
    }

    #[test]
    fn test_insert_generates_sequential_ids() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);

        let alice = repo.insert("alice", "a@x.com").unwrap();
        let bob = repo.insert("bob", "b@x.com").unwrap();

        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(repo.list_all().unwrap(), vec![alice, bob]);
    }

    #[test]
    fn test_find_by_id_name_and_email() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);
        let alice = repo.insert("alice", "a@x.com").unwrap();

        assert_eq!(repo.find_by_id(alice.id).unwrap(), Some(alice.clone()));
        assert_eq!(repo.find_by_name("alice").unwrap(), Some(alice.clone()));
        assert_eq!(repo.find_by_email("a@x.com").unwrap(), Some(alice));

        assert_eq!(repo.find_by_id(99).unwrap(), None);
        assert_eq!(repo.find_by_name("nobody").unwrap(), None);
        assert_eq!(repo.find_by_email("n@x.com").unwrap(), None);
    }

    #[test]
    fn test_update_overwrites_fields_and_keeps_id() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);
        let alice = repo.insert("alice", "a@x.com").unwrap();

        let updated = repo.update(alice.id, "alicia", "alicia@x.com").unwrap();

        assert_eq!(updated.id, alice.id);
        let stored = repo.find_by_id(alice.id).unwrap().unwrap();
        assert_eq!(stored.name, "alicia");
        assert_eq!(stored.email, "alicia@x.com");
    }

    #[test]
    fn test_delete_removes_row() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);
        let alice = repo.insert("alice", "a@x.com").unwrap();
        let bob = repo.insert("bob", "b@x.com").unwrap();

        repo.delete(alice.id).unwrap();

        assert_eq!(repo.find_by_id(alice.id).unwrap(), None);
        assert_eq!(repo.list_all().unwrap(), vec![bob]);
    }

    #[test]
    fn test_unique_violations_are_typed() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);
        let alice = repo.insert("alice", "a@x.com").unwrap();
        let bob = repo.insert("bob", "b@x.com").unwrap();

        match repo.insert("alice", "other@x.com") {
            Err(RepoError::DuplicateName(name)) => assert_eq!(name, "alice"),
            other => panic!("expected DuplicateName, got {:?}", other),
        }
        match repo.insert("carol", "a@x.com") {
            Err(RepoError::DuplicateEmail(email)) => assert_eq!(email, "a@x.com"),
            other => panic!("expected DuplicateEmail, got {:?}", other),
        }
        match repo.update(bob.id, &alice.name, "b@x.com") {
            Err(RepoError::DuplicateName(_)) => {}
            other => panic!("expected DuplicateName, got {:?}", other),
        }

        assert_eq!(repo.list_all().unwrap().len(), 2);
    }
}
