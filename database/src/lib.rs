use lineup::{Member, Role};
use tracing::{debug, instrument};

mod error;
mod lineups;
pub mod models;
mod reports;
mod songs;

pub use error::{Error, Result};
pub use reports::months_before;

pub struct Database {
    pool: sqlx::Pool<sqlx::Postgres>,
}

impl Database {
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = sqlx::PgPool::connect(url).await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self), level = "trace")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("migrations applied");

        Ok(())
    }

    #[instrument(skip(self), ret, level = "trace")]
    pub async fn insert_role(&self, name: &str) -> Result<i64> {
        let (role_id,): (i64,) = sqlx::query_as("insert into roles(name) values ($1) returning id")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(role_id)
    }

    #[instrument(skip(self), ret, level = "trace")]
    pub async fn insert_member(&self, name: &str, role_ids: &[i64]) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let (member_id,): (i64,) =
            sqlx::query_as("insert into members(name) values ($1) returning id")
                .bind(name)
                .fetch_one(&mut *tx)
                .await?;

        sqlx::query(
            "
            insert into member_roles(member_id, role_id)
            select $1, unnest($2::bigint[])
        ",
        )
        .bind(member_id)
        .bind(role_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(member_id)
    }

    /// Loads a member together with the roles they currently hold.
    #[instrument(skip(self), level = "trace")]
    pub async fn member(&self, member_id: i64) -> Result<Option<Member>> {
        let row: Option<(i64, String)> =
            sqlx::query_as("select id, name from members where id = $1")
                .bind(member_id)
                .fetch_optional(&self.pool)
                .await?;

        let Some((id, name)) = row else {
            return Ok(None);
        };

        let roles: Vec<(i64, String)> = sqlx::query_as(
            "
            select r.id, r.name from roles r
            join member_roles mr on mr.role_id = r.id
            where mr.member_id = $1
            order by r.name
        ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Member {
            id,
            name,
            roles: roles
                .into_iter()
                .map(|(id, name)| Role { id, name })
                .collect(),
        }))
    }

    #[instrument(skip(self), level = "trace")]
    pub async fn role(&self, role_id: i64) -> Result<Option<Role>> {
        let row: Option<(i64, String)> = sqlx::query_as("select id, name from roles where id = $1")
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id, name)| Role { id, name }))
    }

    /// Deletes a member; their bookings stay behind with a null reference.
    #[instrument(skip(self), ret, level = "trace")]
    pub async fn delete_member(&self, member_id: i64) -> Result<bool> {
        let result = sqlx::query("delete from members where id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), ret, level = "trace")]
    pub async fn delete_role(&self, role_id: i64) -> Result<bool> {
        let result = sqlx::query("delete from roles where id = $1")
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
