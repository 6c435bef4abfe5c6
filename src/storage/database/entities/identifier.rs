use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per ingested input line
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "identifiers")]
pub struct Model {
    /// Row id, follows insertion order
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Normalized identifier text (not unique)
    pub key: String,

    /// Optional secondary qualifier from the input line
    pub qualifier: Option<String>,

    /// Lifecycle status: raw, success, invalid or retry
    pub status: String,

    /// Ingestion timestamp
    pub created_at: DateTimeWithTimeZone,

    /// Last status change
    pub updated_at: DateTimeWithTimeZone,
}

/// Identifier entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
