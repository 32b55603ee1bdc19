//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Contact address for notifications
    #[sea_orm(unique)]
    pub email: String,

    /// Display name
    pub name: String,

    /// API access token
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    /// Is review submission currently suspended for this user?
    #[sea_orm(default_value = false)]
    pub is_suspended: bool,

    /// Consecutive failed unique-code attempts
    #[sea_orm(default_value = 0)]
    pub fail_attempts: i32,

    /// When the current suspension lifts; set iff `is_suspended`
    #[sea_orm(nullable)]
    pub suspension_lift_time: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
