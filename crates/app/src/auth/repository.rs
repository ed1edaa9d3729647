//! Auth Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::auth::models::{ApiTokenUuid, NewUser, User, UserUuid};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const CREATE_TOKEN_SQL: &str = include_str!("sql/create_token.sql");
const FIND_USER_BY_TOKEN_HASH_SQL: &str = include_str!("sql/find_user_by_token_hash.sql");
const REVOKE_TOKEN_SQL: &str = include_str!("sql/revoke_token.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAuthRepository;

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: &NewUser,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(&user.email)
            .bind(&user.name)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token: ApiTokenUuid,
        user: UserUuid,
        token_hash: &str,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_TOKEN_SQL)
            .bind(token.into_uuid())
            .bind(user.into_uuid())
            .bind(token_hash)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn find_user_by_token_hash(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
    ) -> Result<Option<UserUuid>, sqlx::Error> {
        let uuid: Option<Uuid> = query_scalar(FIND_USER_BY_TOKEN_HASH_SQL)
            .bind(token_hash)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(uuid.map(UserUuid::from_uuid))
    }

    pub(crate) async fn revoke_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token: ApiTokenUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REVOKE_TOKEN_SQL)
            .bind(token.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
