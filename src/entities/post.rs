// entities/post.rs
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub view_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {
    /// Fresh rows get a random id and an empty, unpublished, unviewed state.
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4().to_string()),
            content: Set(String::new()),
            published: Set(false),
            updated_at: Set(None),
            view_count: Set(0),
            ..ActiveModelTrait::default()
        }
    }
}
