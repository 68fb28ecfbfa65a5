use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Account that created the record; never reassigned. Every read and
    /// write is scoped to it.
    pub owner_id: Uuid,

    pub product_name: String,
    pub quantity: i32,
    /// Calendar date, no time component. Days-to-expiry and the urgency
    /// bucket are derived from it per request, never stored.
    pub expiry_date: Date,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
