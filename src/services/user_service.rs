// ==================== USER OPERATIONS ====================
// Regras dos endpoints: checagens de existência/unicidade antes de escrever.
// Cada função roda inteira com a conexão travada (ver Database::run).

use crate::{
    models::{User, UserInput},
    services::user_repository::UserRepository,
    utils::error::AppError,
};

pub fn list_users<R: UserRepository + ?Sized>(repo: &R) -> Result<Vec<User>, AppError> {
    Ok(repo.list_all()?)
}

/// Inserts a new user and returns the full collection afterwards
pub fn create_user<R: UserRepository + ?Sized>(
    repo: &R,
    input: &UserInput,
) -> Result<Vec<User>, AppError> {
    if repo.find_by_name(&input.name)?.is_some() {
        return Err(AppError::DuplicateName(input.name.clone()));
    }
    if repo.find_by_email(&input.email)?.is_some() {
        return Err(AppError::DuplicateEmail(input.email.clone()));
    }

    let user = repo.insert(&input.name, &input.email)?;
    log::info!("✅ Created {} with id {}", user, user.id);

    Ok(repo.list_all()?)
}

pub fn get_user<R: UserRepository + ?Sized>(repo: &R, id: i64) -> Result<User, AppError> {
    repo.find_by_id(id)?.ok_or(AppError::NotFound)
}

/// Overwrites name and email. Existence is checked before the body is
/// validated, so an unknown id is a 404 even with a bad payload.
pub fn update_user<R, F>(repo: &R, id: i64, parse_input: F) -> Result<User, AppError>
where
    R: UserRepository + ?Sized,
    F: FnOnce() -> Result<UserInput, AppError>,
{
    let existing = get_user(repo, id)?;
    let input = parse_input()?;

    let user = repo.update(existing.id, &input.name, &input.email)?;
    log::info!("✅ Updated user {}: {}", user.id, user);

    Ok(user)
}

/// Deletes a user and returns the remaining collection
pub fn delete_user<R: UserRepository + ?Sized>(repo: &R, id: i64) -> Result<Vec<User>, AppError> {
    let existing = get_user(repo, id)?;
    repo.delete(existing.id)?;
    log::info!("🗑️  Deleted {}", existing);

    Ok(repo.list_all()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SCHEMA_SQL;
    use crate::services::user_repository::SqliteUserRepository;
    use crate::services::user_validator;
    use rusqlite::Connection;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA_SQL).unwrap();
        conn
    }

    fn input(name: &str, email: &str) -> UserInput {
        UserInput { name: name.into(), email: email.into() }
    }

    #[test]
    fn test_create_returns_full_list() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);

        create_user(&repo, &input("alice", "a@x.com")).unwrap();
        let users = create_user(&repo, &input("bob", "b@x.com")).unwrap();

        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn test_create_rejects_duplicate_name_without_writing() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);
        create_user(&repo, &input("alice", "a@x.com")).unwrap();

        let err = create_user(&repo, &input("alice", "other@x.com")).unwrap_err();

        assert!(matches!(err, AppError::DuplicateName(ref n) if n == "alice"));
        assert_eq!(list_users(&repo).unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_duplicate_email() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);
        create_user(&repo, &input("alice", "a@x.com")).unwrap();

        let err = create_user(&repo, &input("bob", "a@x.com")).unwrap_err();

        assert!(matches!(err, AppError::DuplicateEmail(_)));
        assert_eq!(list_users(&repo).unwrap().len(), 1);
    }

    #[test]
    fn test_update_checks_existence_before_validating() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);

        let err = update_user(&repo, 42, || Ok(user_validator::parse(b"{}")?)).unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn test_update_with_invalid_body_leaves_row_untouched() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);
        create_user(&repo, &input("alice", "a@x.com")).unwrap();

        let err = update_user(&repo, 1, || Ok(user_validator::parse(br#"{"name":"x"}"#)?))
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(get_user(&repo, 1).unwrap().name, "alice");
    }

    #[test]
    fn test_update_allows_keeping_own_name() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);
        create_user(&repo, &input("alice", "a@x.com")).unwrap();

        let user = update_user(&repo, 1, || Ok(input("alice", "new@x.com"))).unwrap();

        assert_eq!(user.email, "new@x.com");
    }

    #[test]
    fn test_delete_returns_remaining_and_then_not_found() {
        let conn = conn();
        let repo = SqliteUserRepository::new(&conn);
        create_user(&repo, &input("alice", "a@x.com")).unwrap();
        create_user(&repo, &input("bob", "b@x.com")).unwrap();

        let remaining = delete_user(&repo, 1).unwrap();

        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "bob");
        assert!(matches!(get_user(&repo, 1), Err(AppError::NotFound)));
        assert!(matches!(delete_user(&repo, 1), Err(AppError::NotFound)));
    }
}
