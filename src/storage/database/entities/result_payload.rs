use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Latest extracted payload of an identifier that reached success
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "results")]
pub struct Model {
    /// Identifier key
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,

    /// Extracted fields (JSON)
    pub payload: String,

    /// Last overwrite timestamp
    pub updated_at: DateTimeWithTimeZone,
}

/// Result entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
