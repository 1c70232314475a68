use diesel::prelude::*;
use tracing::{info, instrument};

use crate::db::Store;
use crate::dto::CreateUserDto;
use crate::errors::StoreError;
use crate::models::User;
use crate::schema::users;

/// Creates a user that cards can be assigned to
///
/// ### Errors
///
/// - `Validation` when the name or email is blank, the email has no `@`, or
///   another user already has the email
#[instrument(skip(store, dto), fields(email = %dto.email))]
pub async fn create_user(store: &Store, dto: &CreateUserDto) -> Result<User, StoreError> {
    let name = dto.name.trim().to_string();
    let email = dto.email.trim().to_lowercase();
    if name.is_empty() {
        return Err(StoreError::Validation("Name is required".to_string()));
    }
    if !email.contains('@') {
        return Err(StoreError::Validation(format!("Invalid email: '{}'", dto.email)));
    }

    let avatar = dto.avatar.clone();
    let user = store
        .write("create_user", move |conn| {
            let taken: i64 = users::table
                .filter(users::email.eq(&email))
                .count()
                .get_result(conn)?;
            if taken > 0 {
                return Err(StoreError::Validation(format!("Email {} is already registered", email)));
            }
            let user = User::new(name.clone(), email.clone(), avatar.clone());
            diesel::insert_into(users::table).values(&user).execute(conn)?;
            Ok(user)
        })
        .await?;

    info!("Created user {}", user.get_id());
    Ok(user)
}

/// Retrieves a user by ID
pub async fn get_user(store: &Store, user_id: &str) -> Result<Option<User>, StoreError> {
    let user_id = user_id.to_string();
    store
        .query(move |conn| {
            let user = users::table
                .find(&user_id)
                .select(User::as_select())
                .first(conn)
                .optional()?;
            Ok(user)
        })
        .await
}

/// Lists all users ordered by name
pub async fn list_users(store: &Store) -> Result<Vec<User>, StoreError> {
    store
        .query(|conn| {
            let all = users::table
                .order_by(users::name.asc())
                .select(User::as_select())
                .load(conn)?;
            Ok(all)
        })
        .await
}
