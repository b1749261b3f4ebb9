//! Statements against the `posts` table.
//!
//! Each method is a single autocommit statement. Handlers that need more than
//! one call them in sequence without a surrounding transaction.

use chrono::NaiveDate;
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set,
};
use tracing::instrument;

use crate::entities::post;
use crate::pagination::PageWindow;

/// Values written by a full update. Fallbacks are resolved by the caller.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Clone, Debug)]
pub struct PostStore {
    db: DatabaseConnection,
}

fn is_published() -> SimpleExpr {
    post::Column::Published.eq(true)
}

fn title_contains(title: &str) -> SimpleExpr {
    post::Column::Title.contains(title)
}

/// Calendar date of `created_at`, as the store sees it.
fn created_on() -> Expr {
    Expr::expr(Func::cust(Alias::new("DATE")).arg(Expr::col(post::Column::CreatedAt)))
}

impl PostStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// A client-supplied date string, converted by the store itself.
    /// SQLite has no DATE type to cast to, so it goes through `DATE()` there.
    fn date_param(&self, raw: &str) -> SimpleExpr {
        match self.db.get_database_backend() {
            DbBackend::Postgres => Func::cast_as(raw, Alias::new("DATE")).into(),
            _ => Func::cust(Alias::new("DATE")).arg(raw).into(),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn count_published(&self) -> Result<u64, DbErr> {
        post::Entity::find()
            .filter(is_published())
            .count(&self.db)
            .await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn list_published(
        &self,
        title: &str,
        window: PageWindow,
    ) -> Result<Vec<post::Model>, DbErr> {
        post::Entity::find()
            .filter(is_published())
            .filter(title_contains(title))
            .limit(window.limit)
            .offset(window.offset)
            .all(&self.db)
            .await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn count_published_titled(&self, title: &str) -> Result<u64, DbErr> {
        post::Entity::find()
            .filter(is_published())
            .filter(title_contains(title))
            .count(&self.db)
            .await
    }

    /// Matches on title and creation date regardless of publication state.
    /// `date` is not validated here; a malformed value fails in the store.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_created_on(
        &self,
        title: &str,
        date: &str,
        window: PageWindow,
    ) -> Result<Vec<post::Model>, DbErr> {
        post::Entity::find()
            .filter(title_contains(title))
            .filter(created_on().eq(self.date_param(date)))
            .limit(window.limit)
            .offset(window.offset)
            .all(&self.db)
            .await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn count_published_created_on(
        &self,
        title: &str,
        date: &str,
    ) -> Result<u64, DbErr> {
        post::Entity::find()
            .filter(is_published())
            .filter(title_contains(title))
            .filter(created_on().eq(self.date_param(date)))
            .count(&self.db)
            .await
    }

    /// Both bounds are inclusive.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_created_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        window: PageWindow,
    ) -> Result<Vec<post::Model>, DbErr> {
        post::Entity::find()
            .filter(created_on().between(start, end))
            .limit(window.limit)
            .offset(window.offset)
            .all(&self.db)
            .await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn count_created_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<u64, DbErr> {
        post::Entity::find()
            .filter(created_on().between(start, end))
            .count(&self.db)
            .await
    }

    /// Bumps the view counter of a published post. Returns the rows touched,
    /// which is zero for unknown or unpublished ids.
    #[instrument(level = "debug", skip(self))]
    pub async fn increment_views(&self, id: &str) -> Result<u64, DbErr> {
        let result = post::Entity::update_many()
            .col_expr(
                post::Column::ViewCount,
                Expr::col(post::Column::ViewCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .filter(is_published())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn find(&self, id: &str) -> Result<Option<post::Model>, DbErr> {
        post::Entity::find_by_id(id).one(&self.db).await
    }

    #[instrument(level = "debug", skip(self, content))]
    pub async fn insert(
        &self,
        title: String,
        content: String,
        created_at: DateTimeWithTimeZone,
    ) -> Result<post::Model, DbErr> {
        let mut row = post::ActiveModel::new();
        row.title = Set(title);
        row.content = Set(content);
        row.created_at = Set(created_at);
        row.insert(&self.db).await
    }

    /// Overwrites every mutable column. A vanished row is not an error here.
    #[instrument(level = "debug", skip(self, changes))]
    pub async fn update(&self, id: &str, changes: PostChanges) -> Result<u64, DbErr> {
        let result = post::Entity::update_many()
            .set(post::ActiveModel {
                title: Set(changes.title),
                content: Set(changes.content),
                published: Set(changes.published),
                created_at: Set(changes.created_at),
                updated_at: Set(Some(changes.updated_at)),
                ..ActiveModelTrait::default()
            })
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&self, id: &str) -> Result<u64, DbErr> {
        let result = post::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
