use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::models::{Ingredient, Recipe, RecipeDetail, Tag, User};
use crate::database::store::{NewRecipe, NewUser, Store, StoreError};

/// Idempotent schema bootstrap, applied at startup.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ingredients (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        user_id UUID NOT NULL REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        user_id UUID NOT NULL REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        time_minutes INTEGER NOT NULL,
        price NUMERIC(10, 2) NOT NULL,
        user_id UUID NOT NULL REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipe_tags (
        recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        tag_id BIGINT NOT NULL REFERENCES tags(id),
        PRIMARY KEY (recipe_id, tag_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipe_ingredients (
        recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        ingredient_id BIGINT NOT NULL REFERENCES ingredients(id),
        PRIMARY KEY (recipe_id, ingredient_id)
    )
    "#,
];

/// Recipe rows with relation ids aggregated in one pass.
const RECIPE_SELECT: &str = r#"
    SELECT r.id, r.title, r.time_minutes, r.price, r.user_id,
           COALESCE(array_agg(DISTINCT rt.tag_id)
               FILTER (WHERE rt.tag_id IS NOT NULL), '{}') AS tag_ids,
           COALESCE(array_agg(DISTINCT ri.ingredient_id)
               FILTER (WHERE ri.ingredient_id IS NOT NULL), '{}') AS ingredient_ids
    FROM recipes r
    LEFT JOIN recipe_tags rt ON rt.recipe_id = r.id
    LEFT JOIN recipe_ingredients ri ON ri.recipe_id = r.id
"#;

/// PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Build the connection pool from the given URL with config-driven options.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let db_config = &config::config().database;

        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
            .connect(database_url)
            .await?;

        tracing::info!("Created database pool (max {})", db_config.max_connections);
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the schema DDL. Safe to run on every startup.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                StoreError::Conflict(format!("email already registered: {}", new.email)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_ingredients(&self, owner: Uuid) -> Result<Vec<Ingredient>, StoreError> {
        let rows = sqlx::query_as::<_, Ingredient>(
            "SELECT id, name, user_id FROM ingredients WHERE user_id = $1 ORDER BY name DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_ingredient(&self, owner: Uuid, name: &str) -> Result<Ingredient, StoreError> {
        let row = sqlx::query_as::<_, Ingredient>(
            "INSERT INTO ingredients (name, user_id) VALUES ($1, $2) RETURNING id, name, user_id",
        )
        .bind(name)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn ingredient_exists(&self, owner: Uuid, name: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM ingredients WHERE user_id = $1 AND name = $2)",
        )
        .bind(owner)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list_tags(&self, owner: Uuid) -> Result<Vec<Tag>, StoreError> {
        let rows = sqlx::query_as::<_, Tag>(
            "SELECT id, name, user_id FROM tags WHERE user_id = $1 ORDER BY name DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_tag(&self, owner: Uuid, name: &str) -> Result<Tag, StoreError> {
        let row = sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, user_id) VALUES ($1, $2) RETURNING id, name, user_id",
        )
        .bind(name)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_recipes(&self, owner: Uuid) -> Result<Vec<Recipe>, StoreError> {
        let sql = format!("{} WHERE r.user_id = $1 GROUP BY r.id ORDER BY r.id DESC", RECIPE_SELECT);
        let rows = sqlx::query_as::<_, Recipe>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_recipe(&self, owner: Uuid, new: NewRecipe) -> Result<Recipe, StoreError> {
        let mut tag_ids = new.tag_ids.clone();
        tag_ids.sort_unstable();
        tag_ids.dedup();

        let mut ingredient_ids = new.ingredient_ids.clone();
        ingredient_ids.sort_unstable();
        ingredient_ids.dedup();

        let mut tx = self.pool.begin().await?;

        // Attached relations must exist; owner matching is deliberately not
        // enforced here.
        if let Some(missing) = missing_id(&mut tx, "tags", &tag_ids).await? {
            return Err(StoreError::InvalidReference { kind: "tag", id: missing });
        }
        if let Some(missing) = missing_id(&mut tx, "ingredients", &ingredient_ids).await? {
            return Err(StoreError::InvalidReference { kind: "ingredient", id: missing });
        }

        let recipe_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO recipes (title, time_minutes, price, user_id) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&new.title)
        .bind(new.time_minutes)
        .bind(new.price)
        .bind(owner)
        .fetch_one(&mut *tx)
        .await?;

        if !tag_ids.is_empty() {
            sqlx::query(
                "INSERT INTO recipe_tags (recipe_id, tag_id) SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(recipe_id)
            .bind(&tag_ids)
            .execute(&mut *tx)
            .await?;
        }

        if !ingredient_ids.is_empty() {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id) \
                 SELECT $1, UNNEST($2::BIGINT[])",
            )
            .bind(recipe_id)
            .bind(&ingredient_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Recipe {
            id: recipe_id,
            title: new.title,
            time_minutes: new.time_minutes,
            price: new.price,
            user_id: owner,
            tag_ids,
            ingredient_ids,
        })
    }

    async fn recipe_detail(
        &self,
        owner: Uuid,
        id: i64,
    ) -> Result<Option<RecipeDetail>, StoreError> {
        let sql = format!("{} WHERE r.user_id = $1 AND r.id = $2 GROUP BY r.id", RECIPE_SELECT);
        let recipe = sqlx::query_as::<_, Recipe>(&sql)
            .bind(owner)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(recipe) = recipe else {
            return Ok(None);
        };

        let tags = sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.user_id FROM tags t \
             JOIN recipe_tags rt ON rt.tag_id = t.id \
             WHERE rt.recipe_id = $1 ORDER BY t.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let ingredients = sqlx::query_as::<_, Ingredient>(
            "SELECT i.id, i.name, i.user_id FROM ingredients i \
             JOIN recipe_ingredients ri ON ri.ingredient_id = i.id \
             WHERE ri.recipe_id = $1 ORDER BY i.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(RecipeDetail {
            recipe,
            tags,
            ingredients,
        }))
    }
}

/// Return the first id in `ids` that has no row in `table`, if any.
async fn missing_id(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    table: &str,
    ids: &[i64],
) -> Result<Option<i64>, StoreError> {
    if ids.is_empty() {
        return Ok(None);
    }

    // Table name comes from a fixed internal set, never from user input.
    let sql = format!("SELECT id FROM {} WHERE id = ANY($1)", table);
    let found: Vec<i64> = sqlx::query_scalar(&sql)
        .bind(ids)
        .fetch_all(&mut **tx)
        .await?;

    Ok(ids.iter().find(|id| !found.contains(id)).copied())
}
