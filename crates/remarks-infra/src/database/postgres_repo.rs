//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use remarks_core::domain::{Comment, Post};
use remarks_core::error::RepoError;
use remarks_core::ports::{CommentRepository, PostRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Storage order: oldest first, id breaks ties.
fn comments_in_order(select: Select<CommentEntity>) -> Select<CommentEntity> {
    select
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn ids_by_post(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        comments_in_order(CommentEntity::find())
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::PostId.eq(post_id))
            .into_tuple::<Uuid>()
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)
    }

    async fn find_page_by_post(
        &self,
        post_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Comment>, RepoError> {
        tracing::debug!(post_id = %post_id, offset, limit, "Loading comment page");

        let result = comments_in_order(CommentEntity::find())
            .filter(comment::Column::PostId.eq(post_id))
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(repo_error)
    }

    async fn ids_by_parent(&self, parent_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        comments_in_order(CommentEntity::find())
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::ParentCommentId.eq(parent_id))
            .into_tuple::<Uuid>()
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)
    }

    async fn find_by_parent(&self, parent_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = comments_in_order(CommentEntity::find())
            .filter(comment::Column::ParentCommentId.eq(parent_id))
            .all(self.db.as_ref())
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
