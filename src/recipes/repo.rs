use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub cuisine: String,
    pub calories: i32,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub created_at: OffsetDateTime,
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, author_id, name, cuisine, calories, ingredients, instructions, created_at
          FROM recipes
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(recipe)
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, author_id, name, cuisine, calories, ingredients, instructions, created_at
          FROM recipes
         ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Case-insensitive match on the cuisine name.
pub async fn find_by_cuisine(db: &PgPool, cuisine: &str) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, author_id, name, cuisine, calories, ingredients, instructions, created_at
          FROM recipes
         WHERE lower(cuisine) = lower($1)
         ORDER BY created_at DESC
        "#,
    )
    .bind(cuisine)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Recipes with `lower <= calories <= upper`.
pub async fn find_by_calorie_range(
    db: &PgPool,
    lower: i32,
    upper: i32,
) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT id, author_id, name, cuisine, calories, ingredients, instructions, created_at
          FROM recipes
         WHERE calories >= $1 AND calories <= $2
         ORDER BY calories ASC
        "#,
    )
    .bind(lower)
    .bind(upper)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub struct NewRecipe<'a> {
    pub author_id: Uuid,
    pub name: &'a str,
    pub cuisine: &'a str,
    pub calories: i32,
    pub ingredients: Option<&'a str>,
    pub instructions: Option<&'a str>,
}

pub async fn create(db: &PgPool, new: NewRecipe<'_>) -> anyhow::Result<Recipe> {
    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        INSERT INTO recipes (author_id, name, cuisine, calories, ingredients, instructions)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, author_id, name, cuisine, calories, ingredients, instructions, created_at
        "#,
    )
    .bind(new.author_id)
    .bind(new.name)
    .bind(new.cuisine)
    .bind(new.calories)
    .bind(new.ingredients)
    .bind(new.instructions)
    .fetch_one(db)
    .await?;
    Ok(recipe)
}

/// Deletes a recipe owned by `author_id`; false when nothing matched.
pub async fn delete(db: &PgPool, author_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query(r#"DELETE FROM recipes WHERE id = $1 AND author_id = $2"#)
        .bind(id)
        .bind(author_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// Run against a live database with `DATABASE_URL` set:
/// `cargo test -- --ignored`.
#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::auth::{
        errors::AuthError,
        repo::{PgRoleStore, PgUserStore, RoleStore, UserStore},
        repo_types::NewUser,
        services::DEFAULT_ROLE,
    };

    async fn make_user(db: &PgPool, username: &str) -> Uuid {
        let role = PgRoleStore::new(db.clone())
            .find_by_name(DEFAULT_ROLE)
            .await
            .unwrap()
            .expect("migration seeds USER");
        PgUserStore::new(db.clone())
            .save(NewUser {
                username: username.into(),
                password_hash: "$argon2id$placeholder".into(),
                role,
            })
            .await
            .unwrap()
            .id
    }

    async fn make_recipe(
        db: &PgPool,
        author_id: Uuid,
        name: &str,
        cuisine: &str,
        calories: i32,
    ) -> Recipe {
        create(
            db,
            NewRecipe {
                author_id,
                name,
                cuisine,
                calories,
                ingredients: None,
                instructions: None,
            },
        )
        .await
        .unwrap()
    }

    #[sqlx::test]
    #[ignore]
    async fn calorie_range_is_inclusive(db: PgPool) {
        let author = make_user(&db, "chef.mario").await;
        make_recipe(&db, author, "Salad", "Greek", 300).await;
        make_recipe(&db, author, "Risotto", "Italian", 500).await;
        make_recipe(&db, author, "Lasagna", "Italian", 800).await;

        let hits = find_by_calorie_range(&db, 300, 500).await.unwrap();
        let names: Vec<_> = hits.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Salad", "Risotto"]);
        assert!(find_by_calorie_range(&db, 301, 499).await.unwrap().is_empty());
    }

    #[sqlx::test]
    #[ignore]
    async fn list_get_and_cuisine_lookup(db: PgPool) {
        let author = make_user(&db, "chef.mario").await;
        let risotto = make_recipe(&db, author, "Risotto", "Italian", 500).await;
        make_recipe(&db, author, "Gyros", "Greek", 700).await;

        assert_eq!(list_all(&db).await.unwrap().len(), 2);
        let found = find_by_id(&db, risotto.id).await.unwrap().expect("stored");
        assert_eq!(found.name, "Risotto");
        assert!(find_by_id(&db, Uuid::new_v4()).await.unwrap().is_none());

        let italian = find_by_cuisine(&db, "italian").await.unwrap();
        assert_eq!(italian.len(), 1);
        assert_eq!(italian[0].id, risotto.id);
    }

    #[sqlx::test]
    #[ignore]
    async fn only_the_author_can_delete(db: PgPool) {
        let author = make_user(&db, "chef.mario").await;
        let other = make_user(&db, "chef.luigi").await;
        let recipe = make_recipe(&db, author, "Risotto", "Italian", 500).await;

        assert!(!delete(&db, other, recipe.id).await.unwrap());
        assert!(delete(&db, author, recipe.id).await.unwrap());
        assert!(find_by_id(&db, recipe.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[ignore]
    async fn duplicate_username_is_rejected_by_constraint(db: PgPool) {
        make_user(&db, "chef.mario").await;
        let role = PgRoleStore::new(db.clone())
            .find_by_name(DEFAULT_ROLE)
            .await
            .unwrap()
            .unwrap();
        let err = PgUserStore::new(db.clone())
            .save(NewUser {
                username: "chef.mario".into(),
                password_hash: "$argon2id$placeholder".into(),
                role,
            })
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::UsernameTaken("chef.mario".into()));
    }
}
